//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine's
//! coefficient tables from a directory of YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{ContributionConfig, EngineConfig, PolicyConfig};

/// Loads an [`EngineConfig`] from a configuration directory.
///
/// # Directory Structure
///
/// ```text
/// config/pl/
/// ├── policy.yaml         # policy defaults, rate bases, tax base
/// └── contributions.yaml  # employer rates, contribution bases, exemptions
/// ```
///
/// Loading fails closed: a missing file, malformed YAML, or a rule table
/// that does not cover every contract type or contribution kind is a
/// configuration error raised here, once, at process start.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let config = ConfigLoader::load("./config/pl").unwrap();
/// println!("Coefficient set: {} ({})", config.policy.name, config.policy.version);
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates configuration from the specified directory.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<EngineConfig> {
        let path = path.as_ref();

        let policy: PolicyConfig = Self::load_yaml(&path.join("policy.yaml"))?;
        let contributions: ContributionConfig =
            Self::load_yaml(&path.join("contributions.yaml"))?;

        let config = EngineConfig {
            policy,
            contributions,
        };
        config.validate()?;

        Ok(config)
    }

    /// Loads and parses a single YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }
}
