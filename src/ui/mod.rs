pub mod app;
pub mod components;
pub mod events;
pub mod layout;
pub mod menu;
pub mod state;
pub mod view;

pub use app::{run_app, DashboardApp, Focus};
pub use events::{EventManager, TuiEvent};
pub use state::{reduce, Action, DashboardState, Effect};
