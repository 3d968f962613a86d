//! Canned ratio service payloads and an in-memory source

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

use ratio_dashboard::api::RatioSource;
use ratio_dashboard::error::ApiError;
use ratio_dashboard::models::{CompanyInfo, FetchResult, RatioKind};

/// Success envelope with the given (date, value) points
pub fn ratio_body(metric: &str, points: &[(&str, f64)], average: f64, std_dev: f64) -> Value {
    let graph_data: Vec<Value> = points
        .iter()
        .map(|(date, value)| json!({ "date": date, "value": value }))
        .collect();
    json!({
        "status": "success",
        "data": {
            "metric_name": metric,
            "graph_data": graph_data,
            "statistics": { "average_margin": average, "std_dev_margin": std_dev }
        }
    })
}

pub fn error_body(message: &str) -> Value {
    json!({ "status": "error", "message": message })
}

pub fn company_info_body(ticker: &str) -> Value {
    json!({
        "status": "success",
        "message": format!("Data for {} processed and saved.", ticker),
        "ticker": ticker
    })
}

/// Source that answers from memory and records every call
#[derive(Default)]
pub struct StaticSource {
    pub ratios: HashMap<(RatioKind, String), FetchResult>,
    pub calls: Mutex<Vec<String>>,
}

impl StaticSource {
    pub fn with_ratio(mut self, kind: RatioKind, ticker: &str, body: Value) -> Self {
        let result: FetchResult = serde_json::from_value(body).expect("fixture must parse");
        self.ratios.insert((kind, ticker.to_string()), result);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl RatioSource for StaticSource {
    async fn company_info(&self, ticker: &str) -> Result<CompanyInfo, ApiError> {
        self.calls.lock().expect("calls lock").push(format!("company_info/{}", ticker));
        Ok(CompanyInfo {
            status: Some("success".to_string()),
            message: None,
            ticker: Some(ticker.to_string()),
        })
    }

    async fn ratio(&self, kind: RatioKind, ticker: &str) -> Result<FetchResult, ApiError> {
        self.calls.lock().expect("calls lock").push(format!("{}/{}", kind.endpoint(), ticker));
        self.ratios
            .get(&(kind, ticker.to_string()))
            .cloned()
            .ok_or_else(|| ApiError::Http { status: 404, message: "Not Found".to_string() })
    }
}
