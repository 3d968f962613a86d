/// UI components and utilities for the ratio dashboard
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};

use crate::models::{GraphPoint, RatioKind, RatioStatistics};

/// Render a loading indicator
pub fn render_loading_indicator(f: &mut Frame, area: Rect, message: &str) {
    let loading = Paragraph::new(message)
        .block(Block::default().borders(Borders::ALL).title("Loading"))
        .style(Style::default().fg(Color::Yellow));

    f.render_widget(loading, area);
}

/// Render an error panel with an optional hint line underneath
pub fn render_error(f: &mut Frame, area: Rect, error: &str, hint: Option<&str>) {
    let mut lines = vec![Line::from(Span::styled(
        format!("Error: {}", error),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ))];
    if let Some(hint) = hint {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(hint.to_string(), Style::default().fg(Color::Gray))));
    }

    let error_paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Error").border_style(Style::default().fg(Color::Red)))
        .wrap(Wrap { trim: true });

    f.render_widget(error_paragraph, area);
}

/// Render a plain informational message
pub fn render_message(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let paragraph = Paragraph::new(message)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

/// Render a popup over whatever is underneath
pub fn render_popup(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let popup = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled("Press any key to continue", Style::default().fg(Color::Gray))),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(Style::default().fg(Color::Yellow)),
    )
    .wrap(Wrap { trim: true });

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

/// Chart coordinates: x is the period index, y the ratio value
pub fn chart_series(points: &[GraphPoint]) -> Vec<(f64, f64)> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value))
        .collect()
}

/// Axis bounds for a series, padded so flat lines stay visible
pub fn chart_bounds(points: &[GraphPoint]) -> ([f64; 2], [f64; 2]) {
    let max_x = points.len().saturating_sub(1).max(1) as f64;

    let values = points.iter().map(|p| p.value).filter(|v| v.is_finite());
    let (min_y, max_y) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !min_y.is_finite() || !max_y.is_finite() {
        return ([0.0, max_x], [0.0, 1.0]);
    }

    let span = max_y - min_y;
    let pad = if span.abs() < f64::EPSILON {
        if min_y.abs() < f64::EPSILON { 1.0 } else { min_y.abs() * 0.1 }
    } else {
        span * 0.05
    };
    ([0.0, max_x], [min_y - pad, max_y + pad])
}

/// First, middle and last period labels
fn x_labels(points: &[GraphPoint]) -> Vec<Span<'static>> {
    match points.len() {
        0 => Vec::new(),
        1 => vec![Span::raw(points[0].date.clone())],
        2 => vec![Span::raw(points[0].date.clone()), Span::raw(points[1].date.clone())],
        n => vec![
            Span::raw(points[0].date.clone()),
            Span::raw(points[n / 2].date.clone()),
            Span::raw(points[n - 1].date.clone()),
        ],
    }
}

/// Format a value as the ratio service sent it
pub fn format_value(value: f64) -> String {
    format!("{}", value)
}

/// Statistic lines shown under the chart
pub fn statistics_lines(kind: RatioKind, stats: &RatioStatistics) -> Vec<String> {
    vec![
        format!("Average {}: {}", kind.label(), format_value(stats.average_margin)),
        format!("Standard Deviation {}: {}", kind.label(), format_value(stats.std_dev_margin)),
    ]
}

/// Render a ratio line chart
pub fn render_ratio_chart(f: &mut Frame, area: Rect, kind: RatioKind, title: &str, points: &[GraphPoint]) {
    let data = chart_series(points);
    let ([min_x, max_x], [min_y, max_y]) = chart_bounds(points);

    let datasets = vec![Dataset::default()
        .name(kind.label())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data)];

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .x_axis(
            Axis::default()
                .title("Period")
                .style(Style::default().fg(Color::Gray))
                .bounds([min_x, max_x])
                .labels(x_labels(points)),
        )
        .y_axis(
            Axis::default()
                .title(kind.label())
                .style(Style::default().fg(Color::Gray))
                .bounds([min_y, max_y])
                .labels(vec![
                    Span::raw(format!("{:.2}", min_y)),
                    Span::raw(format!("{:.2}", (min_y + max_y) / 2.0)),
                    Span::raw(format!("{:.2}", max_y)),
                ]),
        );

    f.render_widget(chart, area);
}

/// Render the statistics box
pub fn render_statistics(f: &mut Frame, area: Rect, kind: RatioKind, stats: &RatioStatistics) {
    let mut lines: Vec<Line> = statistics_lines(kind, stats)
        .into_iter()
        .map(|text| Line::from(Span::styled(text, Style::default().fg(Color::White))))
        .collect();
    lines.push(Line::from(Span::styled(
        format!("Note: This graph displays the {} over available periods.", kind.label()),
        Style::default().fg(Color::Gray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Statistics"))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}
