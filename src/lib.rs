// Tripboard Library
// Exposes the document, views, presenters and trip store for testing and reuse

pub mod app;
pub mod config;
pub mod dom;
pub mod error;
pub mod messages;
pub mod models;
pub mod presenter;
pub mod store;
pub mod ui;
pub mod ui_state;
pub mod utils;
pub mod view;

// Re-export commonly used types
pub use app::TripApp;
pub use error::{AppError, AppResult};
pub use models::*;
