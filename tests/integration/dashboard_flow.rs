//! Keyboard-driven dashboard sessions against a mock ratio service

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::fixtures::{company_info_body, ratio_body};
use crate::common::logging::{init_test_logging, log_test_step};
use crate::common::{apply_next_update, render_screen};
use ratio_dashboard::api::RatioClient;
use ratio_dashboard::models::Config;
use ratio_dashboard::ui::state::SELECT_COMPANY_ALERT;
use ratio_dashboard::ui::{DashboardApp, EventManager, Focus};

const WIDTH: u16 = 120;
const HEIGHT: u16 = 40;

fn dashboard(server: &MockServer) -> (DashboardApp, EventManager) {
    let config = Config {
        api_base_url: server.uri(),
        ..Config::default()
    };
    let client = RatioClient::new(&config).expect("client");
    let events = EventManager::new();
    let app = DashboardApp::new(Arc::new(client), events.sender());
    (app, events)
}

fn press(app: &mut DashboardApp, code: KeyCode) {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE)).expect("key handling");
}

fn type_text(app: &mut DashboardApp, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

async fn mount_company_info(server: &MockServer, ticker: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/company-info/{}", ticker)))
        .respond_with(ResponseTemplate::new(200).set_body_json(company_info_body(ticker)))
        .expect(1)
        .mount(server)
        .await;
}

/// Search for `query`, take the first match and wait for company info
async fn pick_first_match(app: &mut DashboardApp, events: &mut EventManager, query: &str) {
    type_text(app, query);
    press(app, KeyCode::Enter);
    assert_eq!(app.focus, Focus::Search);
    apply_next_update(app, events).await;
}

#[test_log::test(tokio::test)]
async fn test_search_pick_and_chart_current_ratio() {
    init_test_logging();
    log_test_step("Apple -> Liquidity -> Current Ratio");

    let server = MockServer::start().await;
    mount_company_info(&server, "AAPL").await;
    Mock::given(method("GET"))
        .and(path("/api/liquidity/current-ratio/AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ratio_body(
            "Current Ratio",
            &[("2022-Q4", 0.94), ("2023-Q1", 0.98), ("2023-Q2", 1.0)],
            0.97,
            0.03,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let (mut app, mut events) = dashboard(&server);
    pick_first_match(&mut app, &mut events, "Apple").await;
    assert_eq!(app.state.selection.selected_ticker.as_deref(), Some("AAPL"));
    assert!(render_screen(&app, WIDTH, HEIGHT).contains("Data ready for Apple Inc.. Please select a metric"));

    // Tab into the menu, move to Liquidity, open it and take the first entry
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Down);
    assert!(render_screen(&app, WIDTH, HEIGHT).contains("Cash Ratio"));
    press(&mut app, KeyCode::Enter);
    assert!(render_screen(&app, WIDTH, HEIGHT).contains("Loading Current Ratio data..."));

    apply_next_update(&mut app, &mut events).await;
    let screen = render_screen(&app, WIDTH, HEIGHT);
    assert!(screen.contains("Currently analyzing: Apple Inc. (AAPL)"));
    assert!(screen.contains("Current Ratio Trend for Apple Inc."));
    assert!(screen.contains("Average Current Ratio: 0.97"));
    assert!(screen.contains("Standard Deviation Current Ratio: 0.03"));
}

#[test_log::test(tokio::test)]
async fn test_net_profit_margin_statistics() {
    init_test_logging();

    let server = MockServer::start().await;
    mount_company_info(&server, "AAPL").await;
    Mock::given(method("GET"))
        .and(path("/api/profitability/net-margin/AAPL"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ratio_body("Net Profit Margin", &[("2023-Q1", 0.25)], 0.25, 0.0)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (mut app, mut events) = dashboard(&server);
    pick_first_match(&mut app, &mut events, "AAPL").await;

    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Enter);
    apply_next_update(&mut app, &mut events).await;

    let screen = render_screen(&app, WIDTH, HEIGHT);
    assert!(screen.contains("Net Profit Margin Trend for Apple Inc."));
    assert!(screen.contains("Average Net Profit Margin: 0.25"));
    assert!(screen.contains("Standard Deviation Net Profit Margin: 0"));
}

#[test_log::test(tokio::test)]
async fn test_server_error_is_rendered() {
    init_test_logging();
    log_test_step("Ratio endpoint answers 500");

    let server = MockServer::start().await;
    mount_company_info(&server, "AAPL").await;
    Mock::given(method("GET"))
        .and(path("/api/profitability/net-margin/AAPL"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({ "message": "ticker not processed" })))
        .expect(1)
        .mount(&server)
        .await;

    let (mut app, mut events) = dashboard(&server);
    pick_first_match(&mut app, &mut events, "Apple").await;
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    apply_next_update(&mut app, &mut events).await;

    let screen = render_screen(&app, WIDTH, HEIGHT);
    assert!(screen.contains("HTTP error! status: 500, message: ticker not processed"));
    assert!(screen.contains("Ensure backend is running and data for Apple Inc. is processed."));
}

#[test_log::test(tokio::test)]
async fn test_metric_without_company_shows_alert() {
    init_test_logging();
    log_test_step("Choosing Cash Ratio before any company");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (mut app, _events) = dashboard(&server);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.state.alert.as_deref(), Some(SELECT_COMPANY_ALERT));
    let screen = render_screen(&app, WIDTH, HEIGHT);
    assert!(screen.contains(SELECT_COMPANY_ALERT));
    assert!(screen.contains("No company selected."));

    press(&mut app, KeyCode::Enter);
    assert!(app.state.alert.is_none());
    assert!(!render_screen(&app, WIDTH, HEIGHT).contains(SELECT_COMPANY_ALERT));
}

#[test_log::test(tokio::test)]
async fn test_unknown_search_shows_empty_panel() {
    init_test_logging();

    let server = MockServer::start().await;
    let (mut app, _events) = dashboard(&server);
    type_text(&mut app, "zzzz");

    let screen = render_screen(&app, WIDTH, HEIGHT);
    assert!(screen.contains("No companies found matching \"zzzz\""));
    press(&mut app, KeyCode::Enter);
    assert!(app.state.selection.selected_ticker.is_none());
}
