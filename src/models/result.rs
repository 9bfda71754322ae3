//! Public result types for a payroll calculation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Machine-readable warning codes attached to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    /// Net would have been negative and was clamped to zero.
    NetClamped,
    /// Premium overtime hours exceeded the monthly cap; the excess was paid
    /// at straight time.
    OvertimeCapExceeded,
}

/// A non-fatal event reported alongside the calculation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalcWarning {
    /// Machine-readable warning code.
    pub code: WarningCode,
    /// Human-readable description of the event.
    pub message: String,
}

impl CalcWarning {
    /// Creates a new warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// The public result of one payroll calculation.
///
/// `gross`, `overtimePay` and `bonuses` are the headline figures; every other
/// derived line item travels in the flat `details` map under its camelCase
/// name. `details` is a `BTreeMap` so identical inputs always serialize to
/// identical bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollResult {
    /// Identifier of this calculation. Echoes `meta.calculationId` when the
    /// caller supplied one, otherwise a fresh uuid.
    pub calculation_id: String,
    /// Total pre-deduction compensation for the period.
    pub gross: Decimal,
    /// Overtime component of gross.
    pub overtime_pay: Decimal,
    /// Allowance component of gross.
    pub bonuses: Decimal,
    /// Every other derived line item, by name.
    pub details: BTreeMap<String, Decimal>,
    /// Non-fatal events (net clamping, overtime cap).
    #[serde(default)]
    pub warnings: Vec<CalcWarning>,
    /// When the calculation was performed (UTC).
    pub calculated_at: DateTime<Utc>,
}
