use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{CompanyInfo, FetchResult, RatioKind};

pub mod ratio_client;
pub use ratio_client::RatioClient;

/// Anything that can answer company-info and ratio requests.
///
/// The TUI only talks to this trait so tests can swap the HTTP client for
/// canned responses.
#[async_trait]
pub trait RatioSource: Send + Sync {
    /// Ask the service to prepare data for `ticker`
    async fn company_info(&self, ticker: &str) -> Result<CompanyInfo, ApiError>;

    /// Fetch one ratio series for `ticker`
    async fn ratio(&self, kind: RatioKind, ticker: &str) -> Result<FetchResult, ApiError>;
}
