//! Derived facts and the per-invocation fact store.
//!
//! Every derivation step reads previously-produced facts and produces new
//! ones. The store enforces the exactly-once contract: producing a fact
//! twice, or reading one before it exists, is an internal-consistency error
//! that is unreachable when the dependency graph is well-formed.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{EngineError, EngineResult};

/// The derived facts the built-in graph produces.
///
/// Grouped as Components, Contributions, Deductions-applied and Summary;
/// the assembler asserts each group is complete after graph execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FactKey {
    // Components
    /// Base pay for the period.
    BaseSalary,
    /// Overtime pay across all premium tiers.
    OvertimePay,
    /// Premium overtime hours beyond the monthly cap, paid at straight time.
    OvertimeExcessHours,
    /// Travel and delegation pay.
    TravelPay,
    /// Allowance and bonus pay.
    AllowPay,
    /// Sum of the four components above.
    Gross,

    // Contributions
    /// Employee social insurance contribution.
    SocialInsurance,
    /// Employee health insurance contribution.
    HealthInsurance,
    /// Employee pension-plan contribution.
    PensionPlan,
    /// Employer social insurance contribution (informational).
    SocialInsuranceEmployer,
    /// Employer pension-plan contribution (informational).
    PensionPlanEmployer,

    // Deductions-applied
    /// Income-tax advance actually withheld.
    TaxAdvance,
    /// Bail/garnishment amount withheld.
    BailDeduction,
    /// Sum of the ad hoc other deductions.
    OtherDeductions,

    // Summary
    /// Amount payable after contributions and deductions, clamped at zero.
    Net,
}

impl FactKey {
    /// The wire name of this fact, used in the result `details` map and in
    /// error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            FactKey::BaseSalary => "baseSalary",
            FactKey::OvertimePay => "overtimePay",
            FactKey::OvertimeExcessHours => "overtimeExcessHours",
            FactKey::TravelPay => "travelPay",
            FactKey::AllowPay => "allowPay",
            FactKey::Gross => "gross",
            FactKey::SocialInsurance => "socialInsurance",
            FactKey::HealthInsurance => "healthInsurance",
            FactKey::PensionPlan => "pensionPlan",
            FactKey::SocialInsuranceEmployer => "socialInsuranceEmployer",
            FactKey::PensionPlanEmployer => "pensionPlanEmployer",
            FactKey::TaxAdvance => "taxAdvance",
            FactKey::BailDeduction => "bailDeduction",
            FactKey::OtherDeductions => "otherDeductions",
            FactKey::Net => "net",
        }
    }
}

impl fmt::Display for FactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facts derived during a single calculation invocation.
///
/// Scoped to one invocation; nothing persists across calls.
#[derive(Debug, Default)]
pub struct FactStore {
    facts: BTreeMap<FactKey, Decimal>,
}

impl FactStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a derived fact. Fails if the fact already exists.
    pub fn produce(&mut self, key: FactKey, value: Decimal) -> EngineResult<()> {
        if self.facts.contains_key(&key) {
            return Err(EngineError::DuplicateFact {
                fact: key.as_str().to_string(),
            });
        }
        self.facts.insert(key, value);
        Ok(())
    }

    /// Reads a previously-produced fact. Fails if it has not been produced.
    pub fn get(&self, key: FactKey) -> EngineResult<Decimal> {
        self.facts
            .get(&key)
            .copied()
            .ok_or_else(|| EngineError::MissingFact {
                fact: key.as_str().to_string(),
            })
    }

    /// Returns whether the fact has been produced.
    pub fn contains(&self, key: FactKey) -> bool {
        self.facts.contains_key(&key)
    }

    /// Iterates over all produced facts in key order.
    pub fn iter(&self) -> impl Iterator<Item = (FactKey, Decimal)> + '_ {
        self.facts.iter().map(|(k, v)| (*k, *v))
    }
}
