//! Web layer for the live arrivals board.
//!
//! Serves the board page, the per-view selection and predictions endpoints
//! the page's script talks to, and a small stateless JSON API.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
