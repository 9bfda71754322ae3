//! Input fact groups for a payroll calculation.
//!
//! One strongly-typed value object per payload section, mirroring the wire
//! schema (camelCase field names, exact-precision decimal strings). Facts are
//! immutable: they are constructed once per calculation by validated
//! deserialization and never mutated by the engine.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Employee;

/// Settlement frequency of the pay period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementFrequency {
    /// Monthly settlement.
    Monthly,
    /// Weekly settlement.
    Weekly,
    /// Biweekly settlement.
    Biweekly,
}

/// ISO currency code of the position's base rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CurrencyCode {
    /// Polish złoty.
    PLN,
    /// Euro.
    EUR,
    /// US dollar.
    USD,
}

impl CurrencyCode {
    /// Returns the ISO code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::PLN => "PLN",
            CurrencyCode::EUR => "EUR",
            CurrencyCode::USD => "USD",
        }
    }
}

/// Position and pay band facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Gross base amount, per period or per hour depending on the contract
    /// type's configured rate basis.
    pub base_rate: Decimal,
    /// Currency of the base rate.
    #[serde(default = "default_currency")]
    pub currency: CurrencyCode,
    /// Fractional full-time equivalent.
    #[serde(default = "default_fte")]
    pub fte: Decimal,
}

fn default_currency() -> CurrencyCode {
    CurrencyCode::PLN
}

fn default_fte() -> Decimal {
    Decimal::ONE
}

/// Settlement period facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    /// First day of the pay period (inclusive).
    pub pay_period_start: NaiveDate,
    /// Last day of the pay period (inclusive).
    pub pay_period_end: NaiveDate,
    /// Settlement frequency.
    #[serde(default = "default_frequency")]
    pub settlement_frequency: SettlementFrequency,
    /// Norm working hours in the period. Falls back to the configured policy
    /// default when absent.
    #[serde(default)]
    pub norm_hours_in_period: Option<Decimal>,
}

fn default_frequency() -> SettlementFrequency {
    SettlementFrequency::Monthly
}

/// Overtime facts: hours per premium tier and negotiable multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Overtime {
    /// Hours at the 50%-premium tier.
    pub overtime50h: Decimal,
    /// Hours at the 100%-premium tier.
    pub overtime100h: Decimal,
    /// Night overtime hours.
    pub overtime_night_h: Decimal,
    /// Multiplier for the 50% tier. Must be greater than 1.
    pub overtime50_multiplier: Decimal,
    /// Multiplier for the 100% tier. Must be greater than 1.
    pub overtime100_multiplier: Decimal,
    /// Optional monthly cap on premium-paid overtime hours. Hours beyond the
    /// cap are paid at straight time and reported separately.
    pub overtime_limit_monthly: Option<Decimal>,
}

impl Default for Overtime {
    fn default() -> Self {
        Self {
            overtime50h: Decimal::ZERO,
            overtime100h: Decimal::ZERO,
            overtime_night_h: Decimal::ZERO,
            overtime50_multiplier: Decimal::new(15, 1),
            overtime100_multiplier: Decimal::TWO,
            overtime_limit_monthly: None,
        }
    }
}

/// Travel and delegation facts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Travel {
    /// Days of domestic travel.
    pub travel_days_domestic: Decimal,
    /// Days of travel abroad.
    pub travel_days_abroad: Decimal,
    /// Per-diem rate for domestic travel days.
    pub diet_rate_domestic: Decimal,
    /// Per-diem rate for travel days abroad.
    pub diet_rate_abroad: Decimal,
    /// Accommodation cost reimbursement.
    pub accommodation_cost: Decimal,
    /// Lump-sum transport reimbursement.
    pub lump_sum_transport: Decimal,
    /// Kilometers driven with a private car.
    pub private_car_km: Decimal,
    /// Reimbursement rate per private-car kilometer.
    pub private_car_rate_per_km: Decimal,
}

/// Allowance and bonus facts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Allowances {
    /// Seniority bonus as a percentage of base salary (percent points).
    pub seniority_bonus_pct: Decimal,
    /// Flat function allowance.
    pub function_allowance: Decimal,
    /// Flat performance bonus.
    pub performance_bonus: Decimal,
    /// Flat regulation bonus.
    pub regulation_bonus: Decimal,
    /// Flat night work allowance.
    pub night_work_allowance: Decimal,
    /// Flat weekend/holiday work allowance.
    pub weekend_holiday_allowance: Decimal,
    /// Flat remote work allowance.
    pub remote_work_allowance: Decimal,
    /// Monetary value of the medical benefit.
    pub medical_benefit_value: Decimal,
    /// Monetary value of the company car benefit.
    pub company_car_benefit_value: Decimal,
}

/// An ad hoc deduction identified by a free-form code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherDeduction {
    /// Code identifying the deduction (e.g. "UNION_FEE").
    pub code: String,
    /// The amount to withhold.
    pub amount: Decimal,
}

/// Deduction and contribution rate facts (inputs, percent points).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Deductions {
    /// Employee social insurance rate.
    pub employee_social_insurance_pct: Decimal,
    /// Health insurance rate.
    pub health_insurance_pct: Decimal,
    /// Flat income-tax advance rate, used only when no progressive
    /// thresholds are supplied.
    pub income_tax_advance_pct: Decimal,
    /// Employee pension-plan contribution rate.
    pub ppk_employee_pct: Decimal,
    /// Ad hoc deductions withheld from net pay.
    pub other_deductions: Vec<OtherDeduction>,
    /// Fixed bail/garnishment amount.
    pub bail_deduction: Decimal,
}

/// A single progressive tax bracket.
///
/// Income above `threshold` (up to the next bracket's threshold) is taxed at
/// `rate`, expressed as a fraction in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxThreshold {
    /// Lower bound of the bracket.
    pub threshold: Decimal,
    /// Marginal rate for income in this bracket, in `[0, 1]`.
    pub rate: Decimal,
}

/// Tax parameter facts for the calculation year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxParameters {
    /// Tax year.
    pub tax_year: i32,
    /// Monthly tax-free allowance subtracted from the tax base.
    pub tax_free_allowance_monthly: Decimal,
    /// Monthly income-related cost deduction subtracted from the tax base.
    pub costs_of_income_monthly: Decimal,
    /// Progressive brackets, ordered by ascending threshold. May be empty,
    /// in which case the flat advance rate applies.
    #[serde(default)]
    pub tax_thresholds: Vec<TaxThreshold>,
}

/// Timesheet aggregate facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timesheet {
    /// Hours actually worked in the period.
    pub hours_worked: Decimal,
    /// Paid absence hours.
    #[serde(default)]
    pub hours_absence_paid: Decimal,
    /// Unpaid absence hours.
    #[serde(default)]
    pub hours_absence_unpaid: Decimal,
    /// Sick-leave hours.
    #[serde(default)]
    pub hours_sick_leave: Decimal,
    /// Number of public holidays falling in the period.
    #[serde(default)]
    pub public_holidays_in_period: u32,
}

/// Request metadata, passed through to the result when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Caller-supplied calculation identifier, echoed into the result.
    pub calculation_id: String,
    /// When the request was created by the caller.
    pub created_at: DateTime<Utc>,
    /// Who created the request.
    pub created_by: String,
    /// Originating system.
    #[serde(default = "default_source_system")]
    pub source_system: String,
    /// Version of the wire schema the caller used.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
}

fn default_source_system() -> String {
    "WEB_UI".to_string()
}

fn default_schema_version() -> String {
    "2025-06-01".to_string()
}

/// The complete input payload for one payroll calculation.
///
/// Optional sections default to all-zero facts, matching the wire schema's
/// defaults: a payload with no overtime section simply earns no overtime pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollPayload {
    /// Identity and contract facts.
    pub employee: Employee,
    /// Position and pay band facts.
    pub position: Position,
    /// Settlement period facts.
    pub period: Period,
    /// Overtime facts.
    #[serde(default)]
    pub overtime: Overtime,
    /// Travel facts.
    #[serde(default)]
    pub travel: Travel,
    /// Allowance facts.
    #[serde(default)]
    pub allowances: Allowances,
    /// Deduction rate facts.
    #[serde(default)]
    pub deductions: Deductions,
    /// Tax parameter facts.
    pub tax: TaxParameters,
    /// Timesheet facts.
    pub timesheet: Timesheet,
    /// Optional request metadata.
    #[serde(default)]
    pub meta: Option<Meta>,
}
