//! Configuration loading and management for the payroll engine.
//!
//! Coefficient tables (rate bases, employer percentages, exemption rules,
//! policy defaults) are loaded once at process start from a directory of
//! YAML files and treated as read-only for the process lifetime.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/pl").unwrap();
//! println!("Loaded policy: {}", config.policy.name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ContributionBasisKind, ContributionConfig, ContributionKind, EmployerRates, EngineConfig,
    ExemptionRule, PolicyConfig, RateBasis, TaxBase,
};
