pub mod api;
pub mod directory;
pub mod error;
pub mod models;
pub mod search;
pub mod ui;
