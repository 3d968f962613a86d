use std::sync::OnceLock;

use crate::models::Company;

/// Roster of searchable companies, in display order
const COMPANIES: &[(&str, &str)] = &[
    ("Apple Inc.", "AAPL"),
    ("Microsoft Corp.", "MSFT"),
    ("Amazon.com Inc.", "AMZN"),
    ("Alphabet Inc.", "GOOG"),
    ("NVIDIA Corp.", "NVDA"),
    ("Meta Platforms Inc.", "META"),
    ("Tesla Inc.", "TSLA"),
    ("Berkshire Hathaway Inc. (Class B)", "BRK.B"),
    ("Eli Lilly and Company", "LLY"),
    ("Johnson & Johnson", "JNJ"),
    ("Visa Inc.", "V"),
    ("JPMorgan Chase & Co.", "JPM"),
    ("Walmart Inc.", "WMT"),
    ("Exxon Mobil Corp.", "XOM"),
    ("UnitedHealth Group Inc.", "UNH"),
    ("Taiwan Semiconductor Manufacturing Company Limited (ADR)", "TSM"),
    ("Procter & Gamble Co.", "PG"),
    ("Broadcom Inc.", "AVGO"),
    ("Chevron Corp.", "CVX"),
    ("Merck & Co. Inc.", "MRK"),
    ("Coca-Cola Co.", "KO"),
    ("PepsiCo Inc.", "PEP"),
    ("Intel Corp.", "INTC"),
    ("Salesforce Inc.", "CRM"),
    ("Bank of America Corp.", "BAC"),
    ("AbbVie Inc.", "ABBV"),
    ("Adobe Inc.", "ADBE"),
    ("Costco Wholesale Corp.", "COST"),
    ("McDonald's Corporation", "MCD"),
    ("Boeing Co.", "BA"),
    ("Home Depot Inc.", "HD"),
    ("Netflix Inc.", "NFLX"),
];

static DIRECTORY: OnceLock<Vec<Company>> = OnceLock::new();

/// The full company directory. Built once, never mutated.
pub fn all_companies() -> &'static [Company] {
    DIRECTORY.get_or_init(|| {
        COMPANIES
            .iter()
            .map(|(name, ticker)| Company::new(name, ticker))
            .collect()
    })
}

/// Exact ticker lookup, case-insensitive
pub fn find_by_ticker(ticker: &str) -> Option<&'static Company> {
    let ticker = ticker.trim();
    all_companies()
        .iter()
        .find(|c| c.ticker.eq_ignore_ascii_case(ticker))
}

/// "Name (TICKER)" for roster tickers, the bare upper-cased ticker otherwise
pub fn describe_ticker(ticker: &str) -> String {
    find_by_ticker(ticker)
        .map(|company| company.to_string())
        .unwrap_or_else(|| ticker.trim().to_uppercase())
}
