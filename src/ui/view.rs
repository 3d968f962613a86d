use ratatui::{layout::Rect, Frame};

use crate::error::DashboardError;
use crate::models::{RatioData, RatioKind};
use crate::ui::components::{
    render_error, render_loading_indicator, render_message, render_ratio_chart, render_statistics,
};
use crate::ui::layout::chart_layout;
use crate::ui::state::{DashboardState, RequestStatus};

/// What the ratio view shows for its request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatioRoute<'a> {
    Loading,
    Failed(&'a DashboardError),
    Empty,
    Chart(&'a RatioData),
}

/// The content panel to render for a state snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Route<'a> {
    Loading,
    Error(&'a DashboardError),
    NotImplemented(&'a str),
    NoCompany,
    AwaitingMetric { name: &'a str },
    Ratio {
        kind: RatioKind,
        name: &'a str,
        view: RatioRoute<'a>,
    },
}

/// Decide which panel the content area shows. Pure and deterministic.
pub fn route(state: &DashboardState) -> Route<'_> {
    if state.is_loading {
        return Route::Loading;
    }

    match &state.error {
        Some(DashboardError::UnimplementedMetric(label)) => return Route::NotImplemented(label),
        Some(err) => return Route::Error(err),
        None => {}
    }

    let Some(ticker) = state.selection.selected_ticker.as_deref() else {
        return Route::NoCompany;
    };
    let name = state.selection.selected_name.as_deref().unwrap_or(ticker);

    match (state.selection.active_ratio, &state.ratio_view) {
        (Some(kind), Some(view)) if view.request.kind == kind => {
            let view = match &view.status {
                RequestStatus::Loading => RatioRoute::Loading,
                RequestStatus::Failed(err) => RatioRoute::Failed(err),
                RequestStatus::Loaded(data) if data.graph_data.is_empty() => RatioRoute::Empty,
                RequestStatus::Loaded(data) => RatioRoute::Chart(data),
            };
            Route::Ratio { kind, name, view }
        }
        _ => Route::AwaitingMetric { name },
    }
}

/// Message for a failed ratio request
pub fn failure_text(kind: RatioKind, err: &DashboardError) -> String {
    match err {
        DashboardError::SoftFailure(message) => message.clone(),
        other => format!("Failed to load {}: {}.", kind.label(), other.to_string().trim_end_matches('.')),
    }
}

/// Short status line for the status bar
pub fn route_status(route: &Route<'_>) -> String {
    match route {
        Route::Loading => "Loading company data...".to_string(),
        Route::Error(_) => "Error".to_string(),
        Route::NotImplemented(label) => format!("'{}' not yet implemented", label),
        Route::NoCompany => "No company selected".to_string(),
        Route::AwaitingMetric { name } => format!("{} selected", name),
        Route::Ratio { kind, name, view } => match view {
            RatioRoute::Loading => format!("Loading {} for {}...", kind.label(), name),
            RatioRoute::Failed(_) => format!("{} failed for {}", kind.label(), name),
            RatioRoute::Empty => format!("No {} data for {}", kind.label(), name),
            RatioRoute::Chart(data) => format!("{} for {}: {} periods", kind.label(), name, data.graph_data.len()),
        },
    }
}

/// Render the content area for a route
pub fn render_route(f: &mut Frame, area: Rect, route: &Route<'_>) {
    match route {
        Route::Loading => render_loading_indicator(f, area, "Loading data..."),
        Route::Error(err) => render_error(
            f,
            area,
            &err.to_string(),
            Some("Please ensure the backend is running and a company's data has been processed."),
        ),
        Route::NotImplemented(label) => {
            render_message(f, area, "Not Available", &format!("'{}' not yet implemented.", label))
        }
        Route::NoCompany => render_message(
            f,
            area,
            "Welcome",
            "Please search and select a company to view its financial data.",
        ),
        Route::AwaitingMetric { name } => render_message(
            f,
            area,
            "Ready",
            &format!("Data ready for {}. Please select a metric to view details.", name),
        ),
        Route::Ratio { kind, name, view } => render_ratio(f, area, *kind, name, view),
    }
}

fn render_ratio(f: &mut Frame, area: Rect, kind: RatioKind, name: &str, view: &RatioRoute<'_>) {
    match view {
        RatioRoute::Loading => render_loading_indicator(f, area, &format!("Loading {} data...", kind.label())),
        RatioRoute::Failed(err) => render_error(
            f,
            area,
            &failure_text(kind, err),
            Some(&format!("Ensure backend is running and data for {} is processed.", name)),
        ),
        RatioRoute::Empty => render_message(
            f,
            area,
            kind.label(),
            &format!("No {} data available for {}.", kind.label(), name),
        ),
        RatioRoute::Chart(data) => {
            let (chart_area, stats_area) = chart_layout(area);
            let title = format!("{} Trend for {}", kind.label(), name);
            render_ratio_chart(f, chart_area, kind, &title, &data.graph_data);
            render_statistics(f, stats_area, kind, &data.statistics);
        }
    }
}
