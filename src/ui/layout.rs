use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::ui::menu::METRIC_MENU;

/// Fixed regions of the dashboard screen
pub struct DashboardLayout {
    pub header: Rect,
    pub search: Rect,
    pub banner: Rect,
    pub menu: Rect,
    pub content: Rect,
    pub status_bar: Rect,
}

impl DashboardLayout {
    /// Create a new layout from the given area
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Search input
                Constraint::Length(1), // "Currently analyzing" banner
                Constraint::Length(3), // Metric menu
                Constraint::Min(0),    // Content
                Constraint::Length(4), // Status bar
            ])
            .split(area);

        Self {
            header: chunks[0],
            search: chunks[1],
            banner: chunks[2],
            menu: chunks[3],
            content: chunks[4],
            status_bar: chunks[5],
        }
    }

    /// Dropdown below the search input, sized for `rows` entries
    pub fn results_overlay(&self, rows: usize) -> Rect {
        below(self.search, self.search.width, rows)
    }

    /// Dropdown below the given menu group
    pub fn menu_overlay(&self, group: usize, rows: usize) -> Rect {
        let groups = METRIC_MENU.len().max(1) as u16;
        let slot = (self.menu.width / groups).max(24).min(self.menu.width);
        let offset = (slot * group as u16).min(self.menu.width.saturating_sub(slot));
        let anchor = Rect {
            x: self.menu.x + offset,
            ..self.menu
        };
        below(anchor, slot, rows)
    }
}

/// Area directly under `anchor`: one line per row plus borders
fn below(anchor: Rect, width: u16, rows: usize) -> Rect {
    let y = anchor.y + anchor.height;
    Rect {
        x: anchor.x,
        y,
        width,
        height: (rows as u16 + 2).max(3),
    }
}

/// Split the content area into chart and statistics panes
pub fn chart_layout(content: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(5)])
        .split(content);
    (chunks[0], chunks[1])
}

/// Create a centered rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Keep an overlay inside the frame
pub fn clamp_to(area: Rect, frame: Rect) -> Rect {
    area.intersection(frame)
}
