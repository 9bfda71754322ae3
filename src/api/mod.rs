//! HTTP API module for the payroll derivation engine.
//!
//! This module provides the REST API endpoint for running payroll
//! calculations over the loaded rule configuration.

mod handlers;
mod response;
mod state;

pub use handlers::create_router;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
