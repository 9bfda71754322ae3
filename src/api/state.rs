//! Application state for the payroll engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::engine::Engine;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers,
/// such as the calculation engine built over the loaded rule
/// configuration.
#[derive(Clone)]
pub struct AppState {
    /// The calculation engine.
    engine: Arc<Engine>,
}

impl AppState {
    /// Creates a new application state around the given engine.
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns a reference to the engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}
