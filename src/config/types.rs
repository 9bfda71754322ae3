//! Configuration types for the payroll engine.
//!
//! These structures are deserialized from the YAML files in a configuration
//! directory and together form the read-only coefficient tables the engine
//! shares across invocations.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};
use crate::models::{ContractType, CurrencyCode};

/// Whether a contract type's base rate is a per-period or a per-hour amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateBasis {
    /// The base rate covers the whole settlement period; base pay is not
    /// prorated by attendance.
    Period,
    /// The base rate is hourly-rate-bearing; base pay is prorated by
    /// `hoursWorked / normHoursInPeriod`.
    Hourly,
}

/// The statutory contribution kinds the engine derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    /// Social insurance.
    Social,
    /// Health insurance.
    Health,
    /// Employee pension plan.
    PensionPlan,
}

impl ContributionKind {
    /// All contribution kinds. Used for fail-closed coverage checks.
    pub const ALL: [ContributionKind; 3] = [
        ContributionKind::Social,
        ContributionKind::Health,
        ContributionKind::PensionPlan,
    ];

    /// Returns the configuration name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionKind::Social => "social",
            ContributionKind::Health => "health",
            ContributionKind::PensionPlan => "pension_plan",
        }
    }
}

/// The base a contribution percentage is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionBasisKind {
    /// The contribution is applied to gross.
    Gross,
    /// The contribution is applied to gross minus the employee social
    /// insurance contribution.
    GrossLessSocial,
}

/// The base the income-tax advance is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxBase {
    /// Tax is computed from gross.
    Gross,
    /// Tax is computed from gross minus the configured deductible employee
    /// contributions.
    GrossLessContributions,
}

/// Policy defaults and rule-basis selections, from `policy.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Human-readable name of this coefficient set.
    pub name: String,
    /// Version or effective date of this coefficient set.
    pub version: String,
    /// Norm working hours assumed when the payload omits
    /// `period.normHoursInPeriod`.
    pub norm_hours_default: Decimal,
    /// Multiplier for night overtime hours.
    pub night_premium_default: Decimal,
    /// Rate basis per contract type. Must cover every contract type.
    pub rate_basis: BTreeMap<ContractType, RateBasis>,
    /// Currencies the engine accepts.
    pub supported_currencies: Vec<CurrencyCode>,
    /// Which base the tax advance is computed from.
    pub tax_base: TaxBase,
    /// Employee contributions subtracted from the tax base when `tax_base`
    /// is `gross_less_contributions`.
    pub tax_deductible_contributions: Vec<ContributionKind>,
}

/// Employer-side contribution percentages, in percent points.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployerRates {
    /// Employer social insurance rate.
    pub social_insurance_pct: Decimal,
    /// Employer pension-plan rate.
    pub pension_plan_pct: Decimal,
}

/// A statutory exemption: when it matches, the contribution base is zero.
#[derive(Debug, Clone, Deserialize)]
pub struct ExemptionRule {
    /// The contribution kind the exemption applies to.
    pub contribution: ContributionKind,
    /// The contract type the exemption applies to.
    pub contract_type: ContractType,
    /// Whether the employee must be a student for the exemption to match.
    pub requires_student: bool,
}

/// Contribution rules, from `contributions.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContributionConfig {
    /// Employer-side percentages.
    pub employer: EmployerRates,
    /// Contribution base per kind. Must cover every kind.
    pub basis: BTreeMap<ContributionKind, ContributionBasisKind>,
    /// Statutory exemptions.
    #[serde(default)]
    pub exemptions: Vec<ExemptionRule>,
}

/// The complete engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Policy defaults and bases.
    pub policy: PolicyConfig,
    /// Contribution rules.
    pub contributions: ContributionConfig,
}

impl EngineConfig {
    /// Verifies fail-closed coverage of the rule tables.
    ///
    /// Every contract type needs a rate basis and every contribution kind a
    /// contribution basis; a gap here must abort configuration load, never
    /// surface as a silently-defaulted calculation.
    pub fn validate(&self) -> EngineResult<()> {
        for contract_type in ContractType::ALL {
            if !self.policy.rate_basis.contains_key(&contract_type) {
                return Err(EngineError::MissingCoefficient {
                    name: format!("policy.rate_basis.{}", contract_type.as_str()),
                });
            }
        }
        for kind in ContributionKind::ALL {
            if !self.contributions.basis.contains_key(&kind) {
                return Err(EngineError::MissingCoefficient {
                    name: format!("contributions.basis.{}", kind.as_str()),
                });
            }
        }
        if self.policy.supported_currencies.is_empty() {
            return Err(EngineError::MissingCoefficient {
                name: "policy.supported_currencies".to_string(),
            });
        }
        if self.policy.norm_hours_default <= Decimal::ZERO {
            return Err(EngineError::MissingCoefficient {
                name: "policy.norm_hours_default".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
impl EngineConfig {
    /// A complete configuration for unit tests, mirroring `config/pl`.
    pub fn test_default() -> Self {
        use std::str::FromStr;
        let dec = |s: &str| Decimal::from_str(s).unwrap();

        let mut rate_basis = BTreeMap::new();
        rate_basis.insert(ContractType::Employment, RateBasis::Period);
        rate_basis.insert(ContractType::B2b, RateBasis::Period);
        rate_basis.insert(ContractType::Work, RateBasis::Period);
        rate_basis.insert(ContractType::Commission, RateBasis::Hourly);

        let mut basis = BTreeMap::new();
        basis.insert(ContributionKind::Social, ContributionBasisKind::Gross);
        basis.insert(ContributionKind::Health, ContributionBasisKind::Gross);
        basis.insert(ContributionKind::PensionPlan, ContributionBasisKind::Gross);

        EngineConfig {
            policy: PolicyConfig {
                name: "test".to_string(),
                version: "2025-01-01".to_string(),
                norm_hours_default: dec("160"),
                night_premium_default: dec("1.2"),
                rate_basis,
                supported_currencies: vec![CurrencyCode::PLN, CurrencyCode::EUR, CurrencyCode::USD],
                tax_base: TaxBase::GrossLessContributions,
                tax_deductible_contributions: vec![
                    ContributionKind::Social,
                    ContributionKind::Health,
                    ContributionKind::PensionPlan,
                ],
            },
            contributions: ContributionConfig {
                employer: EmployerRates {
                    social_insurance_pct: dec("20.48"),
                    pension_plan_pct: dec("1.5"),
                },
                basis,
                exemptions: vec![ExemptionRule {
                    contribution: ContributionKind::Social,
                    contract_type: ContractType::Commission,
                    requires_student: true,
                }],
            },
        }
    }
}
