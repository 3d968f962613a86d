use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A company from the fixed search roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub ticker: String,
}

impl Company {
    pub fn new(name: &str, ticker: &str) -> Self {
        Self {
            name: name.to_string(),
            ticker: ticker.to_string(),
        }
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.ticker)
    }
}

/// Ratio families exposed by the ratio service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatioCategory {
    Profitability,
    Liquidity,
    Solvency,
    Efficiency,
}

impl RatioCategory {
    /// Path segment used by the ratio service
    pub fn path_segment(&self) -> &'static str {
        match self {
            RatioCategory::Profitability => "profitability",
            RatioCategory::Liquidity => "liquidity",
            RatioCategory::Solvency => "solvency",
            RatioCategory::Efficiency => "efficiency",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RatioCategory::Profitability => "Profitability",
            RatioCategory::Liquidity => "Liquidity",
            RatioCategory::Solvency => "Solvency",
            RatioCategory::Efficiency => "Efficiency",
        }
    }
}

/// Every ratio the dashboard can chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatioKind {
    NetProfitMargin,
    OperatingMargin,
    CurrentRatio,
    CashRatio,
    DebtEquityRatio,
    DebtAssetRatio,
    InventoryTurnover,
    AssetTurnover,
}

impl RatioKind {
    pub const ALL: [RatioKind; 8] = [
        RatioKind::NetProfitMargin,
        RatioKind::OperatingMargin,
        RatioKind::CurrentRatio,
        RatioKind::CashRatio,
        RatioKind::DebtEquityRatio,
        RatioKind::DebtAssetRatio,
        RatioKind::InventoryTurnover,
        RatioKind::AssetTurnover,
    ];

    pub fn category(&self) -> RatioCategory {
        match self {
            RatioKind::NetProfitMargin | RatioKind::OperatingMargin => RatioCategory::Profitability,
            RatioKind::CurrentRatio | RatioKind::CashRatio => RatioCategory::Liquidity,
            RatioKind::DebtEquityRatio | RatioKind::DebtAssetRatio => RatioCategory::Solvency,
            RatioKind::InventoryTurnover | RatioKind::AssetTurnover => RatioCategory::Efficiency,
        }
    }

    /// Endpoint slug under the category path
    pub fn slug(&self) -> &'static str {
        match self {
            RatioKind::NetProfitMargin => "net-margin",
            RatioKind::OperatingMargin => "operating-margin",
            RatioKind::CurrentRatio => "current-ratio",
            RatioKind::CashRatio => "cash-ratio",
            RatioKind::DebtEquityRatio => "debtequity-ratio",
            RatioKind::DebtAssetRatio => "debtasset-ratio",
            RatioKind::InventoryTurnover => "inventoryturnover-ratio",
            RatioKind::AssetTurnover => "assetturnover-ratio",
        }
    }

    /// Human readable name, identical to the metric menu label
    pub fn label(&self) -> &'static str {
        match self {
            RatioKind::NetProfitMargin => "Net Profit Margin",
            RatioKind::OperatingMargin => "Operating Margin",
            RatioKind::CurrentRatio => "Current Ratio",
            RatioKind::CashRatio => "Cash Ratio",
            RatioKind::DebtEquityRatio => "Debt to Equity Ratio",
            RatioKind::DebtAssetRatio => "Debt to Asset Ratio",
            RatioKind::InventoryTurnover => "Inventory Turnover",
            RatioKind::AssetTurnover => "Asset Turnover",
        }
    }

    /// Variant name, as used in logs and JSON output
    pub fn name(&self) -> &'static str {
        match self {
            RatioKind::NetProfitMargin => "NetProfitMargin",
            RatioKind::OperatingMargin => "OperatingMargin",
            RatioKind::CurrentRatio => "CurrentRatio",
            RatioKind::CashRatio => "CashRatio",
            RatioKind::DebtEquityRatio => "DebtEquityRatio",
            RatioKind::DebtAssetRatio => "DebtAssetRatio",
            RatioKind::InventoryTurnover => "InventoryTurnover",
            RatioKind::AssetTurnover => "AssetTurnover",
        }
    }

    /// Path below the base URL, without the ticker: `api/<category>/<slug>`
    pub fn endpoint(&self) -> String {
        format!("api/{}/{}", self.category().path_segment(), self.slug())
    }
}

impl fmt::Display for RatioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RatioKind {
    type Err = String;

    /// Accepts the endpoint slug, the menu label or the variant name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RatioKind::ALL
            .iter()
            .copied()
            .find(|kind| {
                kind.slug().eq_ignore_ascii_case(wanted)
                    || kind.label().eq_ignore_ascii_case(wanted)
                    || kind.name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| format!("Unknown ratio '{}'", s))
    }
}

/// One period of a ratio series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint {
    pub date: String,
    pub value: f64,
}

/// Summary statistics computed by the ratio service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioStatistics {
    pub average_margin: f64,
    pub std_dev_margin: f64,
}

/// Payload of a successful ratio response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,
    #[serde(default)]
    pub graph_data: Vec<GraphPoint>,
    pub statistics: RatioStatistics,
}

/// Ratio service response envelope, passed through as received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RatioData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Series payload, present only on a successful envelope
    pub fn success_data(&self) -> Option<&RatioData> {
        if self.is_success() {
            self.data.as_ref()
        } else {
            None
        }
    }
}

/// Response of the company-info endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub ticker: Option<String>,
}

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TICK_MS: u64 = 250;

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    /// `None` leaves the HTTP client's own timeout behaviour in place
    pub request_timeout: Option<Duration>,
    pub tick_rate: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            tick_rate: Duration::from_millis(DEFAULT_TICK_MS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let request_timeout = match std::env::var("RATIO_API_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    anyhow::anyhow!("RATIO_API_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw)
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        let tick_rate = match std::env::var("RATIO_DASHBOARD_TICK_MS") {
            Ok(raw) => Duration::from_millis(raw.trim().parse().map_err(|_| {
                anyhow::anyhow!("RATIO_DASHBOARD_TICK_MS must be a whole number of milliseconds, got '{}'", raw)
            })?),
            Err(_) => Duration::from_millis(DEFAULT_TICK_MS),
        };

        let config = Config {
            api_base_url: std::env::var("RATIO_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            request_timeout,
            tick_rate,
        };
        config.validate()?;
        Ok(config)
    }

    /// Make sure the base URL is something the HTTP client can build paths on
    /// and the redraw tick is non-zero
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tick_rate.is_zero() {
            return Err(anyhow::anyhow!("RATIO_DASHBOARD_TICK_MS must be greater than zero"));
        }

        let url = url::Url::parse(&self.api_base_url)
            .map_err(|e| anyhow::anyhow!("Invalid RATIO_API_BASE_URL '{}': {}", self.api_base_url, e))?;
        if url.cannot_be_a_base() {
            return Err(anyhow::anyhow!("RATIO_API_BASE_URL '{}' cannot be used as a base URL", self.api_base_url));
        }
        Ok(())
    }
}
