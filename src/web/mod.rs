//! HTTP surface: JSON API, raw photo files, optional static front end.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{AppError, AppResult};
pub use router::build_app_router;
pub use state::AppState;
