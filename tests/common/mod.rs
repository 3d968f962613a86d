//! Common test utilities and helpers

pub mod fixtures;

use std::time::Duration;

use ratatui::{backend::TestBackend, Terminal};
use ratio_dashboard::ui::{DashboardApp, EventManager};

/// Logging utilities for tests
pub mod logging {
    use std::sync::Once;
    use tracing::{debug, info};

    static INIT: Once = Once::new();

    /// Initialize test logging
    pub fn init_test_logging() {
        INIT.call_once(|| {
            // Another test may already own the global subscriber
            let _ = tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .with_env_filter("ratio_dashboard=debug,test=debug")
                    .with_test_writer()
                    .finish(),
            );
        });
    }

    /// Log test step
    pub fn log_test_step(step: &str) {
        info!("Test Step: {}", step);
    }

    /// Log test data
    pub fn log_test_data<T: std::fmt::Debug>(label: &str, data: &T) {
        debug!("{}: {:?}", label, data);
    }
}

/// Wait for the next background update and apply it to the app
pub async fn apply_next_update(app: &mut DashboardApp, events: &mut EventManager) {
    let event = tokio::time::timeout(Duration::from_secs(5), events.receive())
        .await
        .expect("timed out waiting for a state update")
        .expect("event channel closed");
    app.handle_event(event).expect("event handling failed");
}

/// Render the app once and return the screen as lines of text
pub fn render_screen(app: &DashboardApp, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");
    terminal.draw(|f| app.draw(f)).expect("draw");

    let buffer = terminal.backend().buffer();
    buffer
        .content
        .chunks(width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
