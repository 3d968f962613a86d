use anyhow::Result;
use crossterm::event::{Event, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::ui::state::Action;

/// Unified TUI events
#[derive(Debug, Clone)]
pub enum TuiEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Completion of a background fetch, fed back into the reducer
    StateUpdate(Action),
    Tick,
}

/// Event manager for handling all TUI events
pub struct EventManager {
    pub event_sender: mpsc::Sender<TuiEvent>,
    pub event_receiver: mpsc::Receiver<TuiEvent>,
}

impl EventManager {
    /// Create a new event manager
    pub fn new() -> Self {
        let (event_sender, event_receiver) = mpsc::channel::<TuiEvent>(100);
        Self {
            event_sender,
            event_receiver,
        }
    }

    /// Get a clone of the event sender for use in async tasks
    pub fn sender(&self) -> mpsc::Sender<TuiEvent> {
        self.event_sender.clone()
    }

    /// Read terminal input on a blocking thread and forward it as events.
    ///
    /// The thread exits once the receiving side is dropped.
    pub fn spawn_input_reader(&self) {
        let sender = self.sender();
        tokio::task::spawn_blocking(move || {
            loop {
                if sender.is_closed() {
                    break;
                }
                match crossterm::event::poll(Duration::from_millis(100)) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        warn!("Terminal poll failed: {}", e);
                        break;
                    }
                }
                let event = match crossterm::event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => TuiEvent::Key(key),
                    Ok(Event::Resize(w, h)) => TuiEvent::Resize(w, h),
                    Ok(_) => continue,
                    Err(e) => {
                        warn!("Terminal read failed: {}", e);
                        break;
                    }
                };
                if sender.blocking_send(event).is_err() {
                    break;
                }
            }
            debug!("Input reader stopped");
        });
    }

    /// Emit a tick at a fixed rate so the screen redraws while fetches run
    pub fn spawn_ticker(&self, rate: Duration) {
        let sender = self.sender();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(rate);
            loop {
                interval.tick().await;
                if sender.send(TuiEvent::Tick).await.is_err() {
                    break;
                }
            }
        });
    }

    /// Try to receive an event (non-blocking)
    pub fn try_receive(&mut self) -> Option<TuiEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive an event, waiting until one arrives
    pub async fn receive(&mut self) -> Option<TuiEvent> {
        self.event_receiver.recv().await
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Send a state update from a background task
pub async fn send_state_update(sender: &mpsc::Sender<TuiEvent>, action: Action) -> Result<()> {
    sender.send(TuiEvent::StateUpdate(action)).await?;
    Ok(())
}
