//! Field-level payload validation.
//!
//! Validation runs before the derivation graph ever sees a payload. Failures
//! are reported as a structured list of (field path, violated constraint)
//! pairs, never as an engine-internal error. Field paths use the wire
//! (camelCase) names, e.g. `overtime.overtime50Multiplier`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::PayrollPayload;

/// A single violated constraint on one payload field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Wire path of the offending field.
    pub field: String,
    /// Description of the violated constraint.
    pub constraint: String,
}

impl FieldViolation {
    /// Creates a new violation.
    pub fn new(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.constraint)
    }
}

/// Validates a payload against the engine's field-level constraints.
///
/// Returns `Ok(())` when the payload is acceptable, or
/// [`EngineError::Validation`] carrying every violation found (the check does
/// not stop at the first one).
pub fn validate_payload(payload: &PayrollPayload, config: &EngineConfig) -> EngineResult<()> {
    let mut v = Checker::default();

    // Position
    v.positive("position.baseRate", payload.position.base_rate);
    v.positive("position.fte", payload.position.fte);
    if !config
        .policy
        .supported_currencies
        .contains(&payload.position.currency)
    {
        v.push(
            "position.currency",
            format!(
                "currency {} is not supported by the loaded configuration",
                payload.position.currency.as_str()
            ),
        );
    }

    // Period
    if payload.period.pay_period_end < payload.period.pay_period_start {
        v.push(
            "period.payPeriodEnd",
            "must not be earlier than payPeriodStart",
        );
    }
    if let Some(norm) = payload.period.norm_hours_in_period {
        v.positive("period.normHoursInPeriod", norm);
    }

    // Overtime
    let ot = &payload.overtime;
    v.non_negative("overtime.overtime50h", ot.overtime50h);
    v.non_negative("overtime.overtime100h", ot.overtime100h);
    v.non_negative("overtime.overtimeNightH", ot.overtime_night_h);
    v.greater_than_one("overtime.overtime50Multiplier", ot.overtime50_multiplier);
    v.greater_than_one("overtime.overtime100Multiplier", ot.overtime100_multiplier);
    if let Some(limit) = ot.overtime_limit_monthly {
        v.non_negative("overtime.overtimeLimitMonthly", limit);
    }

    // Travel
    let tr = &payload.travel;
    v.non_negative("travel.travelDaysDomestic", tr.travel_days_domestic);
    v.non_negative("travel.travelDaysAbroad", tr.travel_days_abroad);
    v.non_negative("travel.dietRateDomestic", tr.diet_rate_domestic);
    v.non_negative("travel.dietRateAbroad", tr.diet_rate_abroad);
    v.non_negative("travel.accommodationCost", tr.accommodation_cost);
    v.non_negative("travel.lumpSumTransport", tr.lump_sum_transport);
    v.non_negative("travel.privateCarKm", tr.private_car_km);
    v.non_negative("travel.privateCarRatePerKm", tr.private_car_rate_per_km);

    // Allowances
    let al = &payload.allowances;
    v.non_negative("allowances.seniorityBonusPct", al.seniority_bonus_pct);
    v.non_negative("allowances.functionAllowance", al.function_allowance);
    v.non_negative("allowances.performanceBonus", al.performance_bonus);
    v.non_negative("allowances.regulationBonus", al.regulation_bonus);
    v.non_negative("allowances.nightWorkAllowance", al.night_work_allowance);
    v.non_negative(
        "allowances.weekendHolidayAllowance",
        al.weekend_holiday_allowance,
    );
    v.non_negative("allowances.remoteWorkAllowance", al.remote_work_allowance);
    v.non_negative("allowances.medicalBenefitValue", al.medical_benefit_value);
    v.non_negative(
        "allowances.companyCarBenefitValue",
        al.company_car_benefit_value,
    );

    // Deductions
    let de = &payload.deductions;
    v.non_negative(
        "deductions.employeeSocialInsurancePct",
        de.employee_social_insurance_pct,
    );
    v.non_negative("deductions.healthInsurancePct", de.health_insurance_pct);
    v.non_negative("deductions.incomeTaxAdvancePct", de.income_tax_advance_pct);
    v.non_negative("deductions.ppkEmployeePct", de.ppk_employee_pct);
    v.non_negative("deductions.bailDeduction", de.bail_deduction);
    for (i, other) in de.other_deductions.iter().enumerate() {
        if other.code.trim().is_empty() {
            v.push(
                format!("deductions.otherDeductions[{i}].code"),
                "must not be empty",
            );
        }
        v.non_negative(
            format!("deductions.otherDeductions[{i}].amount"),
            other.amount,
        );
    }

    // Tax parameters
    let tax = &payload.tax;
    if tax.tax_year < 2000 {
        v.push("tax.taxYear", "must be 2000 or later");
    }
    v.non_negative(
        "tax.taxFreeAllowanceMonthly",
        tax.tax_free_allowance_monthly,
    );
    v.non_negative("tax.costsOfIncomeMonthly", tax.costs_of_income_monthly);
    let mut previous: Option<Decimal> = None;
    for (i, bracket) in tax.tax_thresholds.iter().enumerate() {
        v.non_negative(format!("tax.taxThresholds[{i}].threshold"), bracket.threshold);
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            v.push(
                format!("tax.taxThresholds[{i}].rate"),
                "must be a fraction between 0 and 1",
            );
        }
        if let Some(prev) = previous {
            if bracket.threshold <= prev {
                v.push(
                    format!("tax.taxThresholds[{i}].threshold"),
                    "thresholds must be strictly ascending",
                );
            }
        }
        previous = Some(bracket.threshold);
    }

    // Timesheet
    let ts = &payload.timesheet;
    v.non_negative("timesheet.hoursWorked", ts.hours_worked);
    v.non_negative("timesheet.hoursAbsencePaid", ts.hours_absence_paid);
    v.non_negative("timesheet.hoursAbsenceUnpaid", ts.hours_absence_unpaid);
    v.non_negative("timesheet.hoursSickLeave", ts.hours_sick_leave);

    v.finish()
}

/// Accumulates violations across the whole payload before reporting.
#[derive(Default)]
struct Checker {
    violations: Vec<FieldViolation>,
}

impl Checker {
    fn push(&mut self, field: impl Into<String>, constraint: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, constraint));
    }

    fn non_negative(&mut self, field: impl Into<String>, value: Decimal) {
        if value < Decimal::ZERO {
            self.push(field, "must not be negative");
        }
    }

    fn positive(&mut self, field: impl Into<String>, value: Decimal) {
        if value <= Decimal::ZERO {
            self.push(field, "must be greater than 0");
        }
    }

    fn greater_than_one(&mut self, field: impl Into<String>, value: Decimal) {
        if value <= Decimal::ONE {
            self.push(field, "must be greater than 1");
        }
    }

    fn finish(self) -> EngineResult<()> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Validation {
                violations: self.violations,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::{OtherDeduction, TaxThreshold};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn test_config() -> EngineConfig {
        EngineConfig::test_default()
    }

    fn valid_payload() -> PayrollPayload {
        serde_json::from_str(
            r#"{
                "employee": {
                    "firstName": "Jan",
                    "lastName": "Kowalski",
                    "contractType": "EMPLOYMENT"
                },
                "position": { "baseRate": "6000" },
                "period": {
                    "payPeriodStart": "2025-06-01",
                    "payPeriodEnd": "2025-06-30"
                },
                "tax": {
                    "taxYear": 2025,
                    "taxFreeAllowanceMonthly": "300",
                    "costsOfIncomeMonthly": "250",
                    "taxThresholds": [
                        { "threshold": "0", "rate": "0.12" },
                        { "threshold": "10000", "rate": "0.32" }
                    ]
                },
                "timesheet": { "hoursWorked": "160" }
            }"#,
        )
        .unwrap()
    }

    fn violations(result: EngineResult<()>) -> Vec<FieldViolation> {
        match result {
            Err(EngineError::Validation { violations }) => violations,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(validate_payload(&valid_payload(), &test_config()).is_ok());
    }

    #[test]
    fn test_multiplier_of_one_is_rejected() {
        let mut payload = valid_payload();
        payload.overtime.overtime50_multiplier = Decimal::ONE;

        let violations = violations(validate_payload(&payload, &test_config()));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "overtime.overtime50Multiplier");
        assert_eq!(violations[0].constraint, "must be greater than 1");
    }

    #[test]
    fn test_negative_hours_are_rejected() {
        let mut payload = valid_payload();
        payload.timesheet.hours_worked = dec("-1");

        let violations = violations(validate_payload(&payload, &test_config()));
        assert_eq!(violations[0].field, "timesheet.hoursWorked");
    }

    #[test]
    fn test_zero_base_rate_is_rejected() {
        let mut payload = valid_payload();
        payload.position.base_rate = Decimal::ZERO;

        let violations = violations(validate_payload(&payload, &test_config()));
        assert_eq!(violations[0].field, "position.baseRate");
        assert_eq!(violations[0].constraint, "must be greater than 0");
    }

    #[test]
    fn test_inverted_period_is_rejected() {
        let mut payload = valid_payload();
        payload.period.pay_period_end = payload.period.pay_period_start.pred_opt().unwrap();

        let violations = violations(validate_payload(&payload, &test_config()));
        assert_eq!(violations[0].field, "period.payPeriodEnd");
    }

    #[test]
    fn test_descending_thresholds_are_rejected() {
        let mut payload = valid_payload();
        payload.tax.tax_thresholds = vec![
            TaxThreshold {
                threshold: dec("10000"),
                rate: dec("0.12"),
            },
            TaxThreshold {
                threshold: dec("0"),
                rate: dec("0.32"),
            },
        ];

        let violations = violations(validate_payload(&payload, &test_config()));
        assert!(violations
            .iter()
            .any(|v| v.field == "tax.taxThresholds[1].threshold"));
    }

    #[test]
    fn test_tax_rate_above_one_is_rejected() {
        let mut payload = valid_payload();
        payload.tax.tax_thresholds[0].rate = dec("1.2");

        let violations = violations(validate_payload(&payload, &test_config()));
        assert!(violations
            .iter()
            .any(|v| v.field == "tax.taxThresholds[0].rate"));
    }

    #[test]
    fn test_empty_other_deduction_code_is_rejected() {
        let mut payload = valid_payload();
        payload.deductions.other_deductions = vec![OtherDeduction {
            code: "  ".to_string(),
            amount: dec("10"),
        }];

        let violations = violations(validate_payload(&payload, &test_config()));
        assert_eq!(violations[0].field, "deductions.otherDeductions[0].code");
    }

    #[test]
    fn test_multiple_violations_are_all_reported() {
        let mut payload = valid_payload();
        payload.overtime.overtime50h = dec("-1");
        payload.overtime.overtime100_multiplier = dec("0.9");
        payload.deductions.bail_deduction = dec("-5");

        let violations = violations(validate_payload(&payload, &test_config()));
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn test_violation_display() {
        let violation = FieldViolation::new("position.fte", "must be greater than 0");
        assert_eq!(violation.to_string(), "position.fte: must be greater than 0");
    }
}
