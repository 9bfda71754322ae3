//! Rule-variant resolution.
//!
//! Before a step applies its arithmetic, the resolver is consulted with the
//! step's discriminators (contract type, student flag) and answers which
//! variant of the rule applies. This isolates "which overrides apply" from
//! "how the arithmetic composes": new exemptions or contract types are new
//! configuration entries, not new branches in the step bodies.
//!
//! The resolver fails closed. A contract type or contribution kind with no
//! configured entry is a configuration error, never a silently-defaulted
//! calculation.

use crate::config::{ContributionBasisKind, ContributionKind, EngineConfig, RateBasis};
use crate::error::{EngineError, EngineResult};
use crate::models::ContractType;

/// The contribution-rule variant selected for one contribution kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributionVariant {
    /// Apply the input percentage to the given base.
    Basis(ContributionBasisKind),
    /// A statutory exemption matched; the contribution is zero regardless of
    /// the configured rate.
    Exempt,
}

/// Selects rule variants from the loaded configuration.
#[derive(Debug, Clone)]
pub struct RuleResolver {
    config: EngineConfig,
}

impl RuleResolver {
    /// Builds a resolver over the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Resolves the rate basis for the base-salary step.
    pub fn rate_basis(&self, contract_type: ContractType) -> EngineResult<RateBasis> {
        self.config
            .policy
            .rate_basis
            .get(&contract_type)
            .copied()
            .ok_or_else(|| EngineError::UnresolvedRuleVariant {
                step: "base-salary".to_string(),
                contract_type: contract_type.as_str().to_string(),
            })
    }

    /// Resolves the variant for one contribution kind.
    ///
    /// Exemption rules are checked first; when none matches, the configured
    /// basis for the kind applies.
    pub fn contribution_variant(
        &self,
        kind: ContributionKind,
        contract_type: ContractType,
        is_student: bool,
    ) -> EngineResult<ContributionVariant> {
        let exempt = self.config.contributions.exemptions.iter().any(|rule| {
            rule.contribution == kind
                && rule.contract_type == contract_type
                && (!rule.requires_student || is_student)
        });
        if exempt {
            return Ok(ContributionVariant::Exempt);
        }

        self.config
            .contributions
            .basis
            .get(&kind)
            .copied()
            .map(ContributionVariant::Basis)
            .ok_or_else(|| EngineError::UnresolvedRuleVariant {
                step: "contributions".to_string(),
                contract_type: contract_type.as_str().to_string(),
            })
    }

    /// The configuration this resolver answers from.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
