use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::ApiError;
use crate::models::{CompanyInfo, Config, FetchResult, RatioKind};
use super::RatioSource;

/// Body the service sends with a non-2xx status
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP client for the ratio service
#[derive(Debug, Clone)]
pub struct RatioClient {
    client: Client,
    base_url: Url,
}

impl RatioClient {
    /// Create a new ratio client
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(concat!("ratio-dashboard/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Self::with_client(client, &config.api_base_url)
    }

    /// Build around an existing reqwest client
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::BaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::BaseUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for `api/...` path segments plus the ticker
    pub fn endpoint_url(&self, path: &str, ticker: &str) -> Result<Url, ApiError> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(ApiError::InvalidTicker);
        }

        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::BaseUrl(self.base_url.to_string()))?;
            segments.pop_if_empty();
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
            segments.push(ticker);
        }
        Ok(url)
    }

    /// GET a JSON document, turning non-2xx responses into `ApiError::Http`
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| {
                    if body.trim().is_empty() {
                        status.canonical_reason().unwrap_or("unknown error").to_string()
                    } else {
                        body.trim().to_string()
                    }
                });
            warn!("GET {} failed with status {}: {}", url, status.as_u16(), message);
            return Err(ApiError::Http { status: status.as_u16(), message });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Ask the service to load and process filings for `ticker`
    pub async fn fetch_company_info(&self, ticker: &str) -> Result<CompanyInfo, ApiError> {
        let url = self.endpoint_url("api/company-info", ticker)?;
        let info: CompanyInfo = self.get_json(url).await?;
        info!("Company info ready for {}", ticker.trim());
        Ok(info)
    }

    /// Fetch the series for any ratio kind
    pub async fn fetch_ratio(&self, kind: RatioKind, ticker: &str) -> Result<FetchResult, ApiError> {
        let url = self.endpoint_url(&kind.endpoint(), ticker)?;
        let result: FetchResult = self.get_json(url).await?;
        if result.is_success() {
            info!(
                "Fetched {} for {}: {} points",
                kind.name(),
                ticker.trim(),
                result.data.as_ref().map(|d| d.graph_data.len()).unwrap_or(0)
            );
        } else {
            warn!("{} for {} returned status '{}'", kind.name(), ticker.trim(), result.status);
        }
        Ok(result)
    }

    pub async fn fetch_net_profit_margin(&self, ticker: &str) -> Result<FetchResult, ApiError> {
        self.fetch_ratio(RatioKind::NetProfitMargin, ticker).await
    }

    pub async fn fetch_operating_margin(&self, ticker: &str) -> Result<FetchResult, ApiError> {
        self.fetch_ratio(RatioKind::OperatingMargin, ticker).await
    }

    pub async fn fetch_current_ratio(&self, ticker: &str) -> Result<FetchResult, ApiError> {
        self.fetch_ratio(RatioKind::CurrentRatio, ticker).await
    }

    pub async fn fetch_cash_ratio(&self, ticker: &str) -> Result<FetchResult, ApiError> {
        self.fetch_ratio(RatioKind::CashRatio, ticker).await
    }

    pub async fn fetch_debt_equity_ratio(&self, ticker: &str) -> Result<FetchResult, ApiError> {
        self.fetch_ratio(RatioKind::DebtEquityRatio, ticker).await
    }

    pub async fn fetch_debt_asset_ratio(&self, ticker: &str) -> Result<FetchResult, ApiError> {
        self.fetch_ratio(RatioKind::DebtAssetRatio, ticker).await
    }

    pub async fn fetch_inventory_turnover(&self, ticker: &str) -> Result<FetchResult, ApiError> {
        self.fetch_ratio(RatioKind::InventoryTurnover, ticker).await
    }

    pub async fn fetch_asset_turnover(&self, ticker: &str) -> Result<FetchResult, ApiError> {
        self.fetch_ratio(RatioKind::AssetTurnover, ticker).await
    }
}

#[async_trait]
impl RatioSource for RatioClient {
    async fn company_info(&self, ticker: &str) -> Result<CompanyInfo, ApiError> {
        self.fetch_company_info(ticker).await
    }

    async fn ratio(&self, kind: RatioKind, ticker: &str) -> Result<FetchResult, ApiError> {
        self.fetch_ratio(kind, ticker).await
    }
}
