//! Result assembly and the exactly-once invariant check.
//!
//! After the graph completes, the assembler asserts that every mandatory
//! derived fact group (Components, Contributions, Deductions-applied,
//! Summary) was produced, then builds the public result object. The check
//! can only fire on a logic defect; it is not expected-path logic.

use chrono::Utc;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{CalcWarning, PayrollPayload, PayrollResult};
use rust_decimal::Decimal;

use super::facts::{FactKey, FactStore};

/// Facts that must exist after a complete graph run.
const MANDATORY_FACTS: [FactKey; 15] = [
    // Components
    FactKey::BaseSalary,
    FactKey::OvertimePay,
    FactKey::OvertimeExcessHours,
    FactKey::TravelPay,
    FactKey::AllowPay,
    FactKey::Gross,
    // Contributions
    FactKey::SocialInsurance,
    FactKey::HealthInsurance,
    FactKey::PensionPlan,
    FactKey::SocialInsuranceEmployer,
    FactKey::PensionPlanEmployer,
    // Deductions-applied
    FactKey::TaxAdvance,
    FactKey::BailDeduction,
    FactKey::OtherDeductions,
    // Summary
    FactKey::Net,
];

/// Asserts completeness of the fact store and assembles the public result.
///
/// `gross`, `overtimePay` and `bonuses` become headline fields; every other
/// fact lands in `details` under its wire name. The overtime excess-hours
/// fact is only reported when a cap was actually hit.
pub fn assemble(
    payload: &PayrollPayload,
    facts: &FactStore,
    warnings: Vec<CalcWarning>,
) -> EngineResult<PayrollResult> {
    for key in MANDATORY_FACTS {
        if !facts.contains(key) {
            return Err(EngineError::MissingFact {
                fact: key.as_str().to_string(),
            });
        }
    }

    let mut details = BTreeMap::new();
    for (key, value) in facts.iter() {
        match key {
            FactKey::Gross | FactKey::OvertimePay | FactKey::AllowPay => {}
            FactKey::OvertimeExcessHours if value == Decimal::ZERO => {}
            _ => {
                details.insert(key.as_str().to_string(), value);
            }
        }
    }

    let calculation_id = payload
        .meta
        .as_ref()
        .map(|meta| meta.calculation_id.clone())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Ok(PayrollResult {
        calculation_id,
        gross: facts.get(FactKey::Gross)?,
        overtime_pay: facts.get(FactKey::OvertimePay)?,
        bonuses: facts.get(FactKey::AllowPay)?,
        details,
        warnings,
        calculated_at: Utc::now(),
    })
}
