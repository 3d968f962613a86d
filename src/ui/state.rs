use chrono::{DateTime, Utc};
use tracing::debug;

use crate::directory::all_companies;
use crate::error::DashboardError;
use crate::models::{Company, CompanyInfo, FetchResult, RatioData, RatioKind};
use crate::search::{filter_companies, SearchState};
use crate::ui::menu::MenuChoice;

pub const NO_COMPANY_SELECTED: &str = "No company selected.";
pub const SELECT_COMPANY_ALERT: &str = "Please select a company first from the search bar.";

/// Which company is being analysed and which ratio is on screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub selected_ticker: Option<String>,
    pub selected_name: Option<String>,
    pub active_ratio: Option<RatioKind>,
}

/// Identifies one ratio fetch. Ids are never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatioRequest {
    pub id: u64,
    pub ticker: String,
    pub kind: RatioKind,
}

/// Identifies one company-info fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyInfoRequest {
    pub id: u64,
    pub ticker: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestStatus {
    Loading,
    Loaded(RatioData),
    Failed(DashboardError),
}

/// The single ratio view, tied to the request that feeds it
#[derive(Debug, Clone, PartialEq)]
pub struct RatioView {
    pub request: RatioRequest,
    pub status: RequestStatus,
}

impl RatioView {
    pub fn is_loading(&self) -> bool {
        matches!(self.status, RequestStatus::Loading)
    }
}

/// Immutable snapshot of everything the dashboard shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub search: SearchState,
    pub selection: SelectionState,
    pub error: Option<DashboardError>,
    /// Company-info request in flight
    pub is_loading: bool,
    /// Blocking warning shown as a popup until dismissed
    pub alert: Option<String>,
    pub ratio_view: Option<RatioView>,
    pub pending_company_info: Option<CompanyInfoRequest>,
    next_request_id: u64,
}

/// Everything that can change the dashboard state
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    QueryChanged(String),
    SearchFocused,
    SearchBlurred,
    CompanyPicked(Company),
    MenuChosen(MenuChoice),
    CompanyInfoLoaded {
        request: CompanyInfoRequest,
        result: Result<CompanyInfo, DashboardError>,
    },
    RatioLoaded {
        request: RatioRequest,
        result: Result<FetchResult, DashboardError>,
    },
    AlertDismissed,
}

/// Work the reducer asks the app to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchCompanyInfo(CompanyInfoRequest),
    FetchRatio(RatioRequest),
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_selection(&self) -> bool {
        self.selection.selected_ticker.is_some()
    }

    fn allocate_request_id(&mut self) -> u64 {
        self.next_request_id += 1;
        self.next_request_id
    }

    /// True when a ratio response still belongs on screen
    pub fn accepts_ratio_response(&self, request: &RatioRequest) -> bool {
        self.selection.selected_ticker.as_deref() == Some(request.ticker.as_str())
            && self.selection.active_ratio == Some(request.kind)
            && self.ratio_view.as_ref().map(|v| &v.request) == Some(request)
    }
}

/// Apply one action to a state snapshot.
///
/// Returns the next snapshot plus the fetches to start. The input snapshot
/// is never modified.
pub fn reduce(state: &DashboardState, action: Action) -> (DashboardState, Vec<Effect>) {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match action {
        Action::QueryChanged(query) => {
            next.search = SearchState::with_query(all_companies(), &query);
            next.selection = SelectionState::default();
            next.ratio_view = None;
            next.pending_company_info = None;
            next.is_loading = false;
            next.error = None;
        }
        Action::SearchFocused => {
            next.search = state.search.focused();
        }
        Action::SearchBlurred => {
            next.search = state.search.blurred();
        }
        Action::CompanyPicked(company) => {
            next.search = SearchState {
                query: company.name.clone(),
                filtered_results: filter_companies(all_companies(), &company.name),
                results_visible: false,
            };
            next.selection = SelectionState {
                selected_ticker: Some(company.ticker.clone()),
                selected_name: Some(company.name.clone()),
                active_ratio: None,
            };
            next.ratio_view = None;
            next.error = None;
            next.alert = None;

            let request = CompanyInfoRequest {
                id: next.allocate_request_id(),
                ticker: company.ticker,
            };
            next.pending_company_info = Some(request.clone());
            next.is_loading = true;
            effects.push(Effect::FetchCompanyInfo(request));
        }
        Action::MenuChosen(choice) => {
            let Some(ticker) = state.selection.selected_ticker.clone() else {
                next.error = Some(DashboardError::UserInput(NO_COMPANY_SELECTED.to_string()));
                next.alert = Some(SELECT_COMPANY_ALERT.to_string());
                return (next, effects);
            };

            match choice {
                MenuChoice::Ratio(kind) => {
                    next.error = None;
                    // Same ratio for the same company: the view is already fed
                    let already_showing = state.selection.active_ratio == Some(kind)
                        && state.ratio_view.as_ref().map(|v| v.request.ticker.as_str()) == Some(ticker.as_str());
                    if !already_showing {
                        let request = RatioRequest {
                            id: next.allocate_request_id(),
                            ticker,
                            kind,
                        };
                        next.selection.active_ratio = Some(kind);
                        next.ratio_view = Some(RatioView {
                            request: request.clone(),
                            status: RequestStatus::Loading,
                        });
                        // The service only has this company's data once company info completes
                        if state.pending_company_info.is_none() {
                            effects.push(Effect::FetchRatio(request));
                        }
                    }
                }
                MenuChoice::Unimplemented(label) => {
                    next.selection.active_ratio = None;
                    next.ratio_view = None;
                    next.error = Some(DashboardError::UnimplementedMetric(label));
                }
            }
        }
        Action::CompanyInfoLoaded { request, result } => {
            if state.pending_company_info.as_ref() != Some(&request) {
                debug!("Discarding stale company info for {} (request {})", request.ticker, request.id);
                return (next, effects);
            }
            next.pending_company_info = None;
            next.is_loading = false;
            match result {
                Ok(_) => {
                    // Send a ratio request held back while company info was loading
                    if let Some(view) = state.ratio_view.as_ref().filter(|v| v.is_loading()) {
                        effects.push(Effect::FetchRatio(view.request.clone()));
                    }
                }
                Err(err) => {
                    next.selection.active_ratio = None;
                    next.ratio_view = None;
                    next.error = Some(DashboardError::CompanyInfo {
                        ticker: request.ticker,
                        message: err.to_string(),
                    });
                }
            }
        }
        Action::RatioLoaded { request, result } => {
            if !state.accepts_ratio_response(&request) {
                debug!(
                    "Discarding stale {} response for {} (request {})",
                    request.kind.name(),
                    request.ticker,
                    request.id
                );
                return (next, effects);
            }

            let status = match result {
                Ok(envelope) => match envelope.success_data() {
                    Some(data) => RequestStatus::Loaded(data.clone()),
                    None => RequestStatus::Failed(DashboardError::SoftFailure(
                        envelope
                            .message
                            .unwrap_or_else(|| format!("Failed to load {} data.", request.kind.label())),
                    )),
                },
                Err(err) => RequestStatus::Failed(err),
            };
            next.ratio_view = Some(RatioView { request, status });
        }
        Action::AlertDismissed => {
            next.alert = None;
        }
    }

    (next, effects)
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log message with timestamp
#[derive(Debug, Clone)]
pub struct LogMessage {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

const MAX_LOG_MESSAGES: usize = 100;

/// Recent activity shown in the status area
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    messages: Vec<LogMessage>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a log message, keeping only the last 100
    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        self.messages.push(LogMessage {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        });
        if self.messages.len() > MAX_LOG_MESSAGES {
            self.messages.remove(0);
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Get recent log messages (last N), oldest first
    pub fn recent(&self, count: usize) -> &[LogMessage] {
        let start = self.messages.len().saturating_sub(count);
        &self.messages[start..]
    }
}
