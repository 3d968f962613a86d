use thiserror::Error;

/// Failures from talking to the ratio service
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response; `message` comes from the body's `message` field
    #[error("HTTP error! status: {status}, message: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Ticker must not be empty")]
    InvalidTicker,

    #[error("Invalid base URL: {0}")]
    BaseUrl(String),
}

/// Errors the dashboard shows to the user. None of them are fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("HTTP error! status: {status}, message: {message}")]
    Http { status: u16, message: String },

    /// 2xx response whose envelope did not report success
    #[error("{0}")]
    SoftFailure(String),

    /// Network, decoding and other failures below the HTTP layer
    #[error("{0}")]
    Request(String),

    #[error("{0}")]
    UserInput(String),

    #[error("'{0}' not yet implemented.")]
    UnimplementedMetric(String),

    #[error("Failed to process company info for {ticker}. {message}")]
    CompanyInfo { ticker: String, message: String },
}

impl From<&ApiError> for DashboardError {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Http { status, message } => DashboardError::Http {
                status: *status,
                message: message.clone(),
            },
            other => DashboardError::Request(other.to_string()),
        }
    }
}

impl From<ApiError> for DashboardError {
    fn from(err: ApiError) -> Self {
        DashboardError::from(&err)
    }
}
