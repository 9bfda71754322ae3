//! Error types for the payroll derivation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate,
//! split along the taxonomy the engine exposes to its boundary: input
//! validation errors, configuration errors, and internal-consistency errors.

use thiserror::Error;

use crate::validation::FieldViolation;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The derivation graph contains a dependency cycle.
    ///
    /// Raised once at engine construction, never at request time.
    #[error("Cyclic dependency in derivation graph; unresolved steps: {steps}")]
    CyclicDependency {
        /// Comma-separated names of the steps that could not be ordered.
        steps: String,
    },

    /// A step declared a dependency on a fact that no step produces.
    #[error("Step '{step}' depends on fact '{fact}' which no step produces")]
    UnknownDependency {
        /// The step with the dangling dependency.
        step: String,
        /// The fact that has no producer.
        fact: String,
    },

    /// Two steps declared the same fact as an output.
    #[error("Fact '{fact}' is produced by more than one derivation step")]
    DuplicateProducer {
        /// The fact with multiple producers.
        fact: String,
    },

    /// No rule variant is configured for the given discriminators.
    ///
    /// The resolver fails closed: an uncovered contract type is a
    /// configuration defect, never a silently-defaulted calculation.
    #[error("No rule variant configured for step '{step}' and contract type '{contract_type}'")]
    UnresolvedRuleVariant {
        /// The derivation step that asked for a variant.
        step: String,
        /// The contract type that has no configured entry.
        contract_type: String,
    },

    /// A coefficient required by the configuration is missing.
    #[error("Missing configuration coefficient: {name}")]
    MissingCoefficient {
        /// The name of the missing coefficient.
        name: String,
    },

    /// The input payload violated one or more field-level constraints.
    #[error("Payload validation failed: {}", format_violations(violations))]
    Validation {
        /// The individual field violations, in field order.
        violations: Vec<FieldViolation>,
    },

    /// A derivation step read a fact that has not been produced yet.
    ///
    /// Unreachable when the dependency graph is well-formed; indicates a
    /// logic defect, not bad input.
    #[error("Internal consistency error: fact '{fact}' was read before being produced")]
    MissingFact {
        /// The fact that was missing.
        fact: String,
    },

    /// A derivation step produced a fact that already exists.
    ///
    /// Unreachable when the dependency graph is well-formed; indicates a
    /// logic defect, not bad input.
    #[error("Internal consistency error: fact '{fact}' was produced more than once")]
    DuplicateFact {
        /// The fact that was produced twice.
        fact: String,
    },
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl EngineError {
    /// Returns true if this error indicates an engine logic defect rather
    /// than bad input or bad configuration.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            EngineError::MissingFact { .. } | EngineError::DuplicateFact { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/policy.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/policy.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_cyclic_dependency_displays_steps() {
        let error = EngineError::CyclicDependency {
            steps: "gross, net".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Cyclic dependency in derivation graph; unresolved steps: gross, net"
        );
    }

    #[test]
    fn test_unresolved_rule_variant_displays_discriminators() {
        let error = EngineError::UnresolvedRuleVariant {
            step: "contributions".to_string(),
            contract_type: "B2B".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No rule variant configured for step 'contributions' and contract type 'B2B'"
        );
    }

    #[test]
    fn test_validation_displays_all_violations() {
        let error = EngineError::Validation {
            violations: vec![
                FieldViolation::new("overtime.overtime50Multiplier", "must be greater than 1"),
                FieldViolation::new("timesheet.hoursWorked", "must not be negative"),
            ],
        };
        let message = error.to_string();
        assert!(message.contains("overtime.overtime50Multiplier"));
        assert!(message.contains("timesheet.hoursWorked"));
    }

    #[test]
    fn test_missing_fact_is_internal() {
        let error = EngineError::MissingFact {
            fact: "gross".to_string(),
        };
        assert!(error.is_internal());
    }

    #[test]
    fn test_validation_is_not_internal() {
        let error = EngineError::Validation { violations: vec![] };
        assert!(!error.is_internal());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_config_not_found() -> EngineResult<()> {
            Err(EngineError::ConfigNotFound {
                path: "/test".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_config_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
