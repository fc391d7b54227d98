//! Web layer for the fuel price server.
//!
//! Provides HTTP endpoints for station lookups and price searches.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
