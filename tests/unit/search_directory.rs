//! Company search against the built-in roster

use pretty_assertions::assert_eq;
use test_log::test;

use crate::common::logging::{init_test_logging, log_test_step};
use ratio_dashboard::directory::{all_companies, find_by_ticker};
use ratio_dashboard::search::{filter_companies, SearchState, MAX_DISPLAYED_RESULTS};

#[test]
fn test_display_is_capped_but_matches_are_not() {
    init_test_logging();
    log_test_step("Checking the results panel cap");

    let state = SearchState::with_query(all_companies(), "a");
    assert!(state.filtered_results.len() > MAX_DISPLAYED_RESULTS);
    assert_eq!(state.displayed_results().len(), MAX_DISPLAYED_RESULTS);
    assert_eq!(state.displayed_results(), &state.filtered_results[..MAX_DISPLAYED_RESULTS]);
}

#[test]
fn test_ticker_lookup() {
    assert_eq!(find_by_ticker("NFLX").map(|c| c.name.as_str()), Some("Netflix Inc."));
    assert!(find_by_ticker("ZZZZ").is_none());
}

#[test]
fn test_unknown_and_empty_queries_match_nothing() {
    assert!(filter_companies(all_companies(), "zzzz").is_empty());
    assert!(filter_companies(all_companies(), "").is_empty());
}

#[test]
fn test_apple_query_finds_only_apple() {
    let results = filter_companies(all_companies(), "Apple");
    assert_eq!(results, vec![ratio_dashboard::models::Company::new("Apple Inc.", "AAPL")]);
    assert_eq!(results[0].to_string(), "Apple Inc. (AAPL)");
}
