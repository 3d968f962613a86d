//! HTTP client behaviour against a mock ratio service

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::fixtures::{company_info_body, error_body, ratio_body};
use crate::common::logging::{init_test_logging, log_test_data, log_test_step};
use ratio_dashboard::api::{RatioClient, RatioSource};
use ratio_dashboard::error::{ApiError, DashboardError};
use ratio_dashboard::models::{Config, GraphPoint, RatioKind};

fn client_for(server: &MockServer) -> RatioClient {
    let config = Config {
        api_base_url: server.uri(),
        ..Config::default()
    };
    RatioClient::new(&config).expect("client")
}

#[test_log::test(tokio::test)]
async fn test_every_ratio_hits_its_endpoint() {
    init_test_logging();
    log_test_step("Fetching all eight ratios from the mock service");

    let server = MockServer::start().await;
    for kind in RatioKind::ALL {
        Mock::given(method("GET"))
            .and(path(format!("/{}/AAPL", kind.endpoint())))
            .respond_with(ResponseTemplate::new(200).set_body_json(ratio_body(kind.label(), &[("2023-Q1", 0.5)], 0.5, 0.0)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    for kind in RatioKind::ALL {
        let result = client.fetch_ratio(kind, "AAPL").await.expect("fetch");
        log_test_data(kind.name(), &result);
        assert_eq!(result.success_data().map(|d| d.metric_name.as_deref()), Some(Some(kind.label())));
    }
}

#[test_log::test(tokio::test)]
async fn test_named_fetchers_match_generic_fetch() {
    init_test_logging();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/solvency/debtequity-ratio/MSFT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ratio_body(
            "Debt to Equity Ratio",
            &[("2022-12-31", 0.4), ("2023-12-31", 0.35)],
            0.375,
            0.025,
        )))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let named = client.fetch_debt_equity_ratio("MSFT").await.expect("named fetch");
    let generic = client.fetch_ratio(RatioKind::DebtEquityRatio, "MSFT").await.expect("generic fetch");
    assert_eq!(named, generic);
    assert_eq!(
        named.success_data().map(|d| d.graph_data.clone()),
        Some(vec![
            GraphPoint { date: "2022-12-31".to_string(), value: 0.4 },
            GraphPoint { date: "2023-12-31".to_string(), value: 0.35 },
        ])
    );
}

#[test_log::test(tokio::test)]
async fn test_http_error_carries_status_and_message() {
    init_test_logging();
    log_test_step("Server rejects an unprocessed ticker");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/profitability/net-margin/AAPL"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({ "message": "ticker not processed" })))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_net_profit_margin("AAPL").await.unwrap_err();
    assert_matches!(&err, ApiError::Http { status: 500, message } if message == "ticker not processed");
    assert_eq!(err.to_string(), "HTTP error! status: 500, message: ticker not processed");
    assert_eq!(
        DashboardError::from(err),
        DashboardError::Http { status: 500, message: "ticker not processed".to_string() }
    );
}

#[test_log::test(tokio::test)]
async fn test_http_error_without_json_body() {
    init_test_logging();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/liquidity/cash-ratio/TSLA"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_cash_ratio("TSLA").await.unwrap_err();
    assert_matches!(err, ApiError::Http { status: 404, message } if message == "Not Found");
}

#[test_log::test(tokio::test)]
async fn test_error_envelope_passes_through() {
    init_test_logging();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/efficiency/inventoryturnover-ratio/NVDA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_body("Inventory data not found.")))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_inventory_turnover("NVDA").await.expect("fetch");
    assert!(!result.is_success());
    assert_eq!(result.message.as_deref(), Some("Inventory data not found."));
}

#[test_log::test(tokio::test)]
async fn test_company_info_through_trait_object() {
    init_test_logging();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/company-info/JPM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(company_info_body("JPM")))
        .expect(1)
        .mount(&server)
        .await;

    let source: Box<dyn RatioSource> = Box::new(client_for(&server));
    let info = source.company_info("JPM").await.expect("company info");
    assert_eq!(info.ticker.as_deref(), Some("JPM"));
    assert_eq!(info.message.as_deref(), Some("Data for JPM processed and saved."));
}

#[test_log::test(tokio::test)]
async fn test_garbage_body_is_a_decode_error() {
    init_test_logging();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/efficiency/assetturnover-ratio/KO"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_asset_turnover("KO").await.unwrap_err();
    assert_matches!(err, ApiError::Decode(_));
}
