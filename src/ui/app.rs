use anyhow::Result;
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{RatioClient, RatioSource};
use crate::error::DashboardError;
use crate::models::{Company, Config};
use crate::ui::components::render_popup;
use crate::ui::events::{send_state_update, EventManager, TuiEvent};
use crate::ui::layout::{centered_rect, clamp_to, DashboardLayout};
use crate::ui::menu::{MenuChoice, MenuState, METRIC_MENU};
use crate::ui::state::{reduce, Action, ActivityLog, DashboardState, Effect, LogLevel, RequestStatus};
use crate::ui::view::{route, route_status, render_route};

/// Which widget receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Results,
    Menu,
}

pub struct DashboardApp {
    pub state: DashboardState,
    pub focus: Focus,
    pub results_cursor: usize,
    pub menu: MenuState,
    pub activity: ActivityLog,
    pub should_quit: bool,
    source: Arc<dyn RatioSource>,
    sender: mpsc::Sender<TuiEvent>,
}

impl DashboardApp {
    pub fn new(source: Arc<dyn RatioSource>, sender: mpsc::Sender<TuiEvent>) -> Self {
        let mut activity = ActivityLog::new();
        activity.push(LogLevel::Info, "Type to search for a company");

        Self {
            state: DashboardState::new(),
            focus: Focus::Search,
            results_cursor: 0,
            menu: MenuState::default(),
            activity,
            should_quit: false,
            source,
            sender,
        }
    }

    /// Run an action through the reducer and start any requested fetches
    pub fn dispatch(&mut self, action: Action) {
        self.record_activity(&action);
        let (next, effects) = reduce(&self.state, action);
        self.state = next;
        for effect in effects {
            self.spawn_effect(effect);
        }
    }

    fn spawn_effect(&self, effect: Effect) {
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();

        match effect {
            Effect::FetchCompanyInfo(request) => {
                debug!("Requesting company info for {} (request {})", request.ticker, request.id);
                tokio::spawn(async move {
                    let result = source.company_info(&request.ticker).await.map_err(DashboardError::from);
                    if let Err(e) = send_state_update(&sender, Action::CompanyInfoLoaded { request, result }).await {
                        debug!("Dropped company info result: {}", e);
                    }
                });
            }
            Effect::FetchRatio(request) => {
                debug!(
                    "Requesting {} for {} (request {})",
                    request.kind.name(),
                    request.ticker,
                    request.id
                );
                tokio::spawn(async move {
                    let result = source.ratio(request.kind, &request.ticker).await.map_err(DashboardError::from);
                    if let Err(e) = send_state_update(&sender, Action::RatioLoaded { request, result }).await {
                        debug!("Dropped ratio result: {}", e);
                    }
                });
            }
        }
    }

    /// Note user-visible events in the activity log before they are applied
    fn record_activity(&mut self, action: &Action) {
        match action {
            Action::CompanyPicked(company) => {
                info!("Company selected: {}", company);
                self.activity.push(LogLevel::Info, format!("Selected {}", company));
            }
            Action::MenuChosen(MenuChoice::Ratio(kind)) => match &self.state.selection.selected_ticker {
                Some(ticker) => self.activity.push(LogLevel::Info, format!("Loading {} for {}", kind.label(), ticker)),
                None => self.activity.push(LogLevel::Warning, "No company selected."),
            },
            Action::MenuChosen(MenuChoice::Unimplemented(label)) => {
                self.activity.push(LogLevel::Warning, format!("'{}' not yet implemented.", label));
            }
            Action::CompanyInfoLoaded { request, result } => {
                if self.state.pending_company_info.as_ref() != Some(request) {
                    return;
                }
                match result {
                    Ok(info) => self.activity.push(
                        LogLevel::Success,
                        info.message.clone().unwrap_or_else(|| format!("Company data ready for {}", request.ticker)),
                    ),
                    Err(e) => {
                        warn!("Company info for {} failed: {}", request.ticker, e);
                        self.activity.push(LogLevel::Error, format!("Company info for {} failed: {}", request.ticker, e));
                    }
                }
            }
            Action::RatioLoaded { request, result } => {
                if !self.state.accepts_ratio_response(request) {
                    self.activity.push(
                        LogLevel::Warning,
                        format!("Ignored stale {} response for {}", request.kind.label(), request.ticker),
                    );
                    return;
                }
                match result {
                    Ok(envelope) if envelope.is_success() => self.activity.push(
                        LogLevel::Success,
                        format!("Loaded {} for {}", request.kind.label(), request.ticker),
                    ),
                    Ok(envelope) => self.activity.push(
                        LogLevel::Error,
                        envelope
                            .message
                            .clone()
                            .unwrap_or_else(|| format!("{} unavailable for {}", request.kind.label(), request.ticker)),
                    ),
                    Err(e) => {
                        warn!("{} for {} failed: {}", request.kind.name(), request.ticker, e);
                        self.activity.push(LogLevel::Error, e.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    pub fn handle_event(&mut self, event: TuiEvent) -> Result<()> {
        match event {
            TuiEvent::Key(key) => self.handle_key_event(key),
            TuiEvent::StateUpdate(action) => {
                self.dispatch(action);
                Ok(())
            }
            TuiEvent::Resize(..) | TuiEvent::Tick => Ok(()),
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        // The alert blocks everything until acknowledged
        if self.state.alert.is_some() {
            self.dispatch(Action::AlertDismissed);
            return Ok(());
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key.code),
            Focus::Results => self.handle_results_key(key.code),
            Focus::Menu => self.handle_menu_key(key.code),
        }
        Ok(())
    }

    fn set_query(&mut self, query: String) {
        self.results_cursor = 0;
        self.dispatch(Action::QueryChanged(query));
    }

    fn pick(&mut self, company: Company) {
        self.focus = Focus::Search;
        self.results_cursor = 0;
        self.dispatch(Action::CompanyPicked(company));
    }

    fn focus_menu(&mut self) {
        self.dispatch(Action::SearchBlurred);
        self.focus = Focus::Menu;
    }

    fn focus_search(&mut self) {
        self.menu.close();
        self.focus = Focus::Search;
        self.dispatch(Action::SearchFocused);
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => {
                let mut query = self.state.search.query.clone();
                query.push(c);
                self.set_query(query);
            }
            KeyCode::Backspace => {
                let mut query = self.state.search.query.clone();
                if query.pop().is_some() {
                    self.set_query(query);
                }
            }
            KeyCode::Down => {
                if self.state.search.results_visible && !self.state.search.displayed_results().is_empty() {
                    self.focus = Focus::Results;
                    self.results_cursor = 0;
                }
            }
            KeyCode::Enter => {
                if self.state.search.results_visible {
                    if let Some(company) = self.state.search.displayed_results().first().cloned() {
                        self.pick(company);
                    }
                }
            }
            KeyCode::Tab => self.focus_menu(),
            KeyCode::Esc => {
                if self.state.search.results_visible {
                    self.dispatch(Action::SearchBlurred);
                } else {
                    self.should_quit = true;
                }
            }
            _ => {}
        }
    }

    fn handle_results_key(&mut self, code: KeyCode) {
        let count = self.state.search.displayed_results().len();
        if count == 0 {
            self.focus = Focus::Search;
            return;
        }

        match code {
            KeyCode::Up => {
                if self.results_cursor == 0 {
                    self.focus = Focus::Search;
                } else {
                    self.results_cursor -= 1;
                }
            }
            KeyCode::Down => {
                self.results_cursor = (self.results_cursor + 1).min(count - 1);
            }
            KeyCode::Enter => {
                let index = self.results_cursor.min(count - 1);
                let company = self.state.search.displayed_results()[index].clone();
                self.pick(company);
            }
            KeyCode::Esc => {
                self.focus = Focus::Search;
                self.dispatch(Action::SearchBlurred);
            }
            KeyCode::Tab => self.focus_menu(),
            KeyCode::Char(_) | KeyCode::Backspace => {
                self.focus = Focus::Search;
                self.handle_search_key(code);
            }
            _ => {}
        }
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => self.menu.previous_group(),
            KeyCode::Right => self.menu.next_group(),
            KeyCode::Down => {
                if self.menu.open {
                    self.menu.next_option();
                } else {
                    self.menu.toggle();
                }
            }
            KeyCode::Up => {
                if self.menu.open {
                    self.menu.previous_option();
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.menu.open {
                    if let Some(choice) = self.menu.choose() {
                        self.dispatch(Action::MenuChosen(choice));
                    }
                } else {
                    self.menu.toggle();
                }
            }
            KeyCode::Esc => {
                if self.menu.open {
                    self.menu.close();
                } else {
                    self.focus_search();
                }
            }
            KeyCode::Tab | KeyCode::Char('/') => self.focus_search(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    pub fn draw(&self, f: &mut Frame) {
        let frame_area = f.area();
        let layout = DashboardLayout::new(frame_area);

        self.render_header(f, layout.header);
        self.render_search(f, layout.search);
        self.render_banner(f, layout.banner);
        self.render_menu_bar(f, layout.menu);

        let current = route(&self.state);
        render_route(f, layout.content, &current);
        self.render_status_bar(f, layout.status_bar, &route_status(&current));

        // Overlays last so they sit on top of the content
        if self.state.search.results_visible && matches!(self.focus, Focus::Search | Focus::Results) {
            self.render_results(f, &layout, frame_area);
        }
        if self.focus == Focus::Menu && self.menu.open {
            self.render_menu_dropdown(f, &layout, frame_area);
        }
        if let Some(alert) = &self.state.alert {
            render_popup(f, centered_rect(50, 25, frame_area), "Warning", alert);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header = Paragraph::new("Financial Dashboard")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        f.render_widget(header, area);
    }

    fn render_search(&self, f: &mut Frame, area: Rect) {
        let focused = matches!(self.focus, Focus::Search | Focus::Results);
        let border = if focused { Color::Yellow } else { Color::Gray };
        let text = if self.state.search.query.is_empty() && !focused {
            Span::styled("Search US Public Companies (e.g., Apple)", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(self.state.search.query.clone())
        };

        let input = Paragraph::new(Line::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search")
                .border_style(Style::default().fg(border)),
        );
        f.render_widget(input, area);

        if self.focus == Focus::Search {
            let typed = self.state.search.query.chars().count() as u16;
            let x = (area.x + 1 + typed).min(area.x + area.width.saturating_sub(2));
            f.set_cursor_position(Position::new(x, area.y + 1));
        }
    }

    fn render_banner(&self, f: &mut Frame, area: Rect) {
        let line = match (&self.state.selection.selected_name, &self.state.selection.selected_ticker) {
            (Some(name), Some(ticker)) => Line::from(vec![
                Span::styled(" Currently analyzing: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("{} ({})", name, ticker),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
            ]),
            _ => Line::from(""),
        };
        f.render_widget(Paragraph::new(line), area);
    }

    fn render_menu_bar(&self, f: &mut Frame, area: Rect) {
        let titles: Vec<String> = METRIC_MENU.iter().map(|g| format!("{} \u{25be}", g.label)).collect();
        let highlight = if self.focus == Focus::Menu {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("Metrics"))
            .style(Style::default().fg(Color::Gray))
            .highlight_style(highlight)
            .select(self.menu.selected_group);
        f.render_widget(tabs, area);
    }

    fn render_results(&self, f: &mut Frame, layout: &DashboardLayout, frame_area: Rect) {
        let results = self.state.search.displayed_results();
        let rows = results.len().max(1);
        let area = clamp_to(layout.results_overlay(rows), frame_area);

        let list = if results.is_empty() {
            List::new(vec![ListItem::new(Span::styled(
                format!("No companies found matching \"{}\"", self.state.search.query),
                Style::default().fg(Color::Gray),
            ))])
        } else {
            List::new(
                results
                    .iter()
                    .enumerate()
                    .map(|(i, company)| {
                        let selected = self.focus == Focus::Results && i == self.results_cursor;
                        let style = if selected {
                            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(Color::White)
                        };
                        ListItem::new(Line::from(vec![
                            Span::styled(if selected { "> " } else { "  " }, style),
                            Span::styled(company.to_string(), style),
                        ]))
                    })
                    .collect::<Vec<_>>(),
            )
        };

        f.render_widget(Clear, area);
        f.render_widget(list.block(Block::default().borders(Borders::ALL).title("Results")), area);
    }

    fn render_menu_dropdown(&self, f: &mut Frame, layout: &DashboardLayout, frame_area: Rect) {
        let group = self.menu.group();
        let area = clamp_to(layout.menu_overlay(self.menu.selected_group, group.options.len()), frame_area);

        let items: Vec<ListItem> = group
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let style = if i == self.menu.highlighted {
                    Style::default().fg(Color::Black).bg(Color::Yellow)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(Span::styled(option.label, style))
            })
            .collect();

        f.render_widget(Clear, area);
        f.render_widget(
            List::new(items).block(Block::default().borders(Borders::ALL).title(group.label)),
            area,
        );
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect, status: &str) {
        let latest = self.activity.recent(1).first().map(|entry| {
            let color = match entry.level {
                LogLevel::Info => Color::Cyan,
                LogLevel::Success => Color::Green,
                LogLevel::Warning => Color::Yellow,
                LogLevel::Error => Color::Red,
            };
            Span::styled(
                format!("[{}] {}", entry.timestamp.format("%H:%M:%S"), entry.message),
                Style::default().fg(color),
            )
        });

        let ratio_busy = self
            .state
            .ratio_view
            .as_ref()
            .map(|v| matches!(v.status, RequestStatus::Loading))
            .unwrap_or(false);
        let status_color = if self.state.is_loading || ratio_busy { Color::Yellow } else { Color::Cyan };

        let status_content = vec![
            Line::from(vec![
                Span::styled("Tab", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::styled(" search/metrics \u{2022} ", Style::default().fg(Color::Gray)),
                Span::styled("\u{2191}\u{2193}\u{2190}\u{2192}", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::styled(" navigate \u{2022} ", Style::default().fg(Color::Gray)),
                Span::styled("Enter", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::styled(" select \u{2022} ", Style::default().fg(Color::Gray)),
                Span::styled("Ctrl+C", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled(" quit", Style::default().fg(Color::Gray)),
                Span::styled(format!("  |  {}", status), Style::default().fg(status_color)),
            ]),
            latest.map(Line::from).unwrap_or_default(),
        ];

        let paragraph = Paragraph::new(status_content).block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}

/// Draw and process events until the user quits
pub async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut DashboardApp,
    events: &mut EventManager,
) -> Result<()> {
    loop {
        terminal.draw(|f| app.draw(f))?;

        let Some(event) = events.receive().await else {
            return Ok(());
        };
        app.handle_event(event)?;
        while let Some(event) = events.try_receive() {
            app.handle_event(event)?;
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Run the main TUI application
pub async fn run_app(config: &Config) -> Result<()> {
    let client = RatioClient::new(config)?;
    info!("Using ratio service at {}", client.base_url());

    let mut events = EventManager::new();
    let mut app = DashboardApp::new(Arc::new(client), events.sender());

    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    events.spawn_input_reader();
    events.spawn_ticker(config.tick_rate);

    let result = event_loop(&mut terminal, &mut app, &mut events).await;

    // Cleanup terminal
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
