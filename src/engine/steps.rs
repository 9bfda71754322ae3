//! The built-in derivation steps.
//!
//! Each step is a pure function over the step context: it reads raw payload
//! facts and previously-derived facts, consults the resolver for the variant
//! that applies, and produces its declared facts, quantized exactly once at
//! the point of production.

use rust_decimal::Decimal;

use crate::config::{ContributionBasisKind, ContributionKind, RateBasis, TaxBase};
use crate::error::EngineResult;
use crate::models::{CalcWarning, TaxThreshold, WarningCode};
use crate::money::{fraction, pct, quantize};

use super::facts::FactKey;
use super::graph::{DerivationStep, StepContext};
use super::resolver::ContributionVariant;

/// The canonical step set, in declaration order.
///
/// The order here is documentation; execution order is computed by the
/// graph's topological sort.
pub fn builtin_steps() -> Vec<DerivationStep> {
    vec![
        DerivationStep {
            name: "base-salary",
            depends_on: &[],
            produces: &[FactKey::BaseSalary],
            run: base_salary,
        },
        DerivationStep {
            name: "overtime-pay",
            depends_on: &[FactKey::BaseSalary],
            produces: &[FactKey::OvertimePay, FactKey::OvertimeExcessHours],
            run: overtime_pay,
        },
        DerivationStep {
            name: "travel-pay",
            depends_on: &[],
            produces: &[FactKey::TravelPay],
            run: travel_pay,
        },
        DerivationStep {
            name: "allow-pay",
            depends_on: &[FactKey::BaseSalary],
            produces: &[FactKey::AllowPay],
            run: allow_pay,
        },
        DerivationStep {
            name: "gross",
            depends_on: &[
                FactKey::BaseSalary,
                FactKey::OvertimePay,
                FactKey::TravelPay,
                FactKey::AllowPay,
            ],
            produces: &[FactKey::Gross],
            run: gross,
        },
        DerivationStep {
            name: "contributions",
            depends_on: &[FactKey::Gross],
            produces: &[
                FactKey::SocialInsurance,
                FactKey::HealthInsurance,
                FactKey::PensionPlan,
                FactKey::SocialInsuranceEmployer,
                FactKey::PensionPlanEmployer,
            ],
            run: contributions,
        },
        DerivationStep {
            name: "deductions",
            depends_on: &[
                FactKey::Gross,
                FactKey::SocialInsurance,
                FactKey::HealthInsurance,
                FactKey::PensionPlan,
            ],
            produces: &[
                FactKey::TaxAdvance,
                FactKey::BailDeduction,
                FactKey::OtherDeductions,
            ],
            run: deductions,
        },
        DerivationStep {
            name: "net",
            depends_on: &[
                FactKey::Gross,
                FactKey::SocialInsurance,
                FactKey::HealthInsurance,
                FactKey::PensionPlan,
                FactKey::TaxAdvance,
                FactKey::BailDeduction,
                FactKey::OtherDeductions,
            ],
            produces: &[FactKey::Net],
            run: net,
        },
    ]
}

/// Norm working hours for the period, falling back to the policy default.
fn norm_hours(ctx: &StepContext<'_>) -> Decimal {
    ctx.payload
        .period
        .norm_hours_in_period
        .unwrap_or(ctx.config.policy.norm_hours_default)
}

/// The hourly rate used for overtime valuation.
///
/// Period-rated positions derive it from base salary and norm hours;
/// hourly-rate-bearing positions already carry it in the base rate.
fn hourly_rate(ctx: &StepContext<'_>) -> EngineResult<Decimal> {
    let basis = ctx
        .resolver
        .rate_basis(ctx.payload.employee.contract_type)?;
    match basis {
        RateBasis::Period => {
            let base_salary = ctx.facts.get(FactKey::BaseSalary)?;
            Ok(base_salary / norm_hours(ctx))
        }
        RateBasis::Hourly => Ok(ctx.payload.position.base_rate * ctx.payload.position.fte),
    }
}

/// Step 1: base pay, prorated by attendance for hourly-rate-bearing
/// contract types.
fn base_salary(ctx: &mut StepContext<'_>) -> EngineResult<()> {
    let position = &ctx.payload.position;
    let basis = ctx
        .resolver
        .rate_basis(ctx.payload.employee.contract_type)?;

    let raw = match basis {
        RateBasis::Period => position.base_rate * position.fte,
        RateBasis::Hourly => {
            position.base_rate * position.fte * ctx.payload.timesheet.hours_worked
                / norm_hours(ctx)
        }
    };

    ctx.facts.produce(FactKey::BaseSalary, quantize(raw))
}

/// Step 2: overtime pay across the three premium tiers.
///
/// When a monthly cap is set, premium hours are consumed in tier order
/// (50%, 100%, night); hours beyond the cap are paid at straight time and
/// reported as a separate fact plus a warning.
fn overtime_pay(ctx: &mut StepContext<'_>) -> EngineResult<()> {
    let ot = &ctx.payload.overtime;
    let rate = hourly_rate(ctx)?;

    let tiers = [
        (ot.overtime50h, ot.overtime50_multiplier),
        (ot.overtime100h, ot.overtime100_multiplier),
        (ot.overtime_night_h, ctx.config.policy.night_premium_default),
    ];

    let total_hours: Decimal = tiers.iter().map(|(hours, _)| *hours).sum();
    let mut premium_budget = match ot.overtime_limit_monthly {
        Some(cap) if total_hours > cap => cap,
        _ => total_hours,
    };
    let excess_hours = total_hours - premium_budget;

    let mut pay = Decimal::ZERO;
    for (hours, multiplier) in tiers {
        let premium_hours = hours.min(premium_budget);
        premium_budget -= premium_hours;
        let straight_hours = hours - premium_hours;
        pay += premium_hours * rate * multiplier + straight_hours * rate;
    }

    if excess_hours > Decimal::ZERO {
        ctx.warnings.push(CalcWarning::new(
            WarningCode::OvertimeCapExceeded,
            format!(
                "{} overtime hours exceed the monthly cap and were paid at straight time",
                excess_hours
            ),
        ));
    }

    ctx.facts.produce(FactKey::OvertimePay, quantize(pay))?;
    ctx.facts
        .produce(FactKey::OvertimeExcessHours, quantize(excess_hours))
}

/// Step 3: travel and delegation pay.
fn travel_pay(ctx: &mut StepContext<'_>) -> EngineResult<()> {
    let tr = &ctx.payload.travel;

    let raw = tr.travel_days_domestic * tr.diet_rate_domestic
        + tr.travel_days_abroad * tr.diet_rate_abroad
        + tr.accommodation_cost
        + tr.lump_sum_transport
        + tr.private_car_km * tr.private_car_rate_per_km;

    ctx.facts.produce(FactKey::TravelPay, quantize(raw))
}

/// Step 4: seniority bonus plus the flat allowances and benefits.
fn allow_pay(ctx: &mut StepContext<'_>) -> EngineResult<()> {
    let al = &ctx.payload.allowances;
    let base_salary = ctx.facts.get(FactKey::BaseSalary)?;

    let raw = pct(base_salary, al.seniority_bonus_pct)
        + al.function_allowance
        + al.performance_bonus
        + al.regulation_bonus
        + al.night_work_allowance
        + al.weekend_holiday_allowance
        + al.remote_work_allowance
        + al.medical_benefit_value
        + al.company_car_benefit_value;

    ctx.facts.produce(FactKey::AllowPay, quantize(raw))
}

/// Step 5: gross is the sum of the four components.
///
/// The components are already quantized, so the decomposition invariant
/// holds exactly at fixed-point precision.
fn gross(ctx: &mut StepContext<'_>) -> EngineResult<()> {
    let sum = ctx.facts.get(FactKey::BaseSalary)?
        + ctx.facts.get(FactKey::OvertimePay)?
        + ctx.facts.get(FactKey::TravelPay)?
        + ctx.facts.get(FactKey::AllowPay)?;

    ctx.facts.produce(FactKey::Gross, quantize(sum))
}

/// Step 6: statutory contributions, employee and employer side.
///
/// The base for each kind comes from the resolver: a matched exemption
/// zeroes the base (employer side included); otherwise the configured basis
/// applies. The student + COMMISSION social exemption lives entirely in
/// configuration.
fn contributions(ctx: &mut StepContext<'_>) -> EngineResult<()> {
    let de = &ctx.payload.deductions;
    let employer = &ctx.config.contributions.employer;
    let gross = ctx.facts.get(FactKey::Gross)?;

    let social_base = contribution_base(ctx, ContributionKind::Social, gross, Decimal::ZERO)?;
    let social_employee = quantize(pct(social_base, de.employee_social_insurance_pct));
    let social_employer = quantize(pct(social_base, employer.social_insurance_pct));

    let health_base = contribution_base(ctx, ContributionKind::Health, gross, social_employee)?;
    let health_employee = quantize(pct(health_base, de.health_insurance_pct));

    let pension_base =
        contribution_base(ctx, ContributionKind::PensionPlan, gross, social_employee)?;
    let pension_employee = quantize(pct(pension_base, de.ppk_employee_pct));
    let pension_employer = quantize(pct(pension_base, employer.pension_plan_pct));

    ctx.facts.produce(FactKey::SocialInsurance, social_employee)?;
    ctx.facts.produce(FactKey::HealthInsurance, health_employee)?;
    ctx.facts.produce(FactKey::PensionPlan, pension_employee)?;
    ctx.facts
        .produce(FactKey::SocialInsuranceEmployer, social_employer)?;
    ctx.facts
        .produce(FactKey::PensionPlanEmployer, pension_employer)
}

/// Resolves the contribution base for one kind.
///
/// `social_employee` is the already-quantized employee social contribution,
/// used by the `gross_less_social` basis; it is zero while resolving the
/// social kind itself.
fn contribution_base(
    ctx: &StepContext<'_>,
    kind: ContributionKind,
    gross: Decimal,
    social_employee: Decimal,
) -> EngineResult<Decimal> {
    let employee = &ctx.payload.employee;
    let variant =
        ctx.resolver
            .contribution_variant(kind, employee.contract_type, employee.is_student)?;

    Ok(match variant {
        ContributionVariant::Exempt => Decimal::ZERO,
        ContributionVariant::Basis(ContributionBasisKind::Gross) => gross,
        ContributionVariant::Basis(ContributionBasisKind::GrossLessSocial) => {
            gross - social_employee
        }
    })
}

/// Step 7: deductions actually withheld.
fn deductions(ctx: &mut StepContext<'_>) -> EngineResult<()> {
    let de = &ctx.payload.deductions;
    let tax = &ctx.payload.tax;
    let gross = ctx.facts.get(FactKey::Gross)?;

    let deductible = match ctx.config.policy.tax_base {
        TaxBase::Gross => Decimal::ZERO,
        TaxBase::GrossLessContributions => {
            let mut sum = Decimal::ZERO;
            for kind in &ctx.config.policy.tax_deductible_contributions {
                sum += match kind {
                    ContributionKind::Social => ctx.facts.get(FactKey::SocialInsurance)?,
                    ContributionKind::Health => ctx.facts.get(FactKey::HealthInsurance)?,
                    ContributionKind::PensionPlan => ctx.facts.get(FactKey::PensionPlan)?,
                };
            }
            sum
        }
    };

    let taxable = (gross - deductible - tax.tax_free_allowance_monthly
        - tax.costs_of_income_monthly)
        .max(Decimal::ZERO);

    let advance = if tax.tax_thresholds.is_empty() {
        pct(taxable, de.income_tax_advance_pct)
    } else {
        progressive_tax(taxable, &tax.tax_thresholds)
    };

    let other_total: Decimal = de.other_deductions.iter().map(|d| d.amount).sum();

    ctx.facts.produce(FactKey::TaxAdvance, quantize(advance))?;
    ctx.facts
        .produce(FactKey::BailDeduction, quantize(de.bail_deduction))?;
    ctx.facts
        .produce(FactKey::OtherDeductions, quantize(other_total))
}

/// Applies progressive brackets with marginal-rate accumulation.
///
/// Each entry taxes the portion of income above its threshold (up to the
/// next entry's threshold) at its rate; income above the last threshold is
/// taxed at the last rate. Thresholds are validated to be strictly
/// ascending. The result is not quantized.
pub fn progressive_tax(taxable: Decimal, thresholds: &[TaxThreshold]) -> Decimal {
    let mut total = Decimal::ZERO;
    for (i, bracket) in thresholds.iter().enumerate() {
        let lower = bracket.threshold;
        if taxable <= lower {
            break;
        }
        let portion = match thresholds.get(i + 1) {
            Some(next) => taxable.min(next.threshold) - lower,
            None => taxable - lower,
        };
        total += fraction(portion, bracket.rate);
    }
    total
}

/// Step 8: net pay, clamped at zero with a reported warning.
fn net(ctx: &mut StepContext<'_>) -> EngineResult<()> {
    let gross = ctx.facts.get(FactKey::Gross)?;

    let employee_contributions = ctx.facts.get(FactKey::SocialInsurance)?
        + ctx.facts.get(FactKey::HealthInsurance)?
        + ctx.facts.get(FactKey::PensionPlan)?;

    let deductions_applied = ctx.facts.get(FactKey::TaxAdvance)?
        + ctx.facts.get(FactKey::BailDeduction)?
        + ctx.facts.get(FactKey::OtherDeductions)?;

    let raw = gross - employee_contributions - deductions_applied;
    let clamped = if raw < Decimal::ZERO {
        ctx.warnings.push(CalcWarning::new(
            WarningCode::NetClamped,
            format!("net of {} clamped to 0.00", quantize(raw)),
        ));
        Decimal::ZERO
    } else {
        raw
    };

    ctx.facts.produce(FactKey::Net, quantize(clamped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bracket(threshold: &str, rate: &str) -> TaxThreshold {
        TaxThreshold {
            threshold: dec(threshold),
            rate: dec(rate),
        }
    }

    #[test]
    fn test_progressive_tax_single_bracket() {
        let thresholds = vec![bracket("0", "0.12")];
        assert_eq!(progressive_tax(dec("1000"), &thresholds), dec("120.00"));
    }

    #[test]
    fn test_progressive_tax_spans_brackets() {
        let thresholds = vec![bracket("0", "0.12"), bracket("10000", "0.32")];
        // 10000 * 0.12 + 2000 * 0.32 = 1200 + 640
        assert_eq!(progressive_tax(dec("12000"), &thresholds), dec("1840.00"));
    }

    #[test]
    fn test_progressive_tax_below_first_threshold_is_untaxed() {
        let thresholds = vec![bracket("1000", "0.12")];
        assert_eq!(progressive_tax(dec("800"), &thresholds), Decimal::ZERO);
    }

    #[test]
    fn test_progressive_tax_zero_income() {
        let thresholds = vec![bracket("0", "0.12")];
        assert_eq!(progressive_tax(Decimal::ZERO, &thresholds), Decimal::ZERO);
    }

    #[test]
    fn test_progressive_tax_exactly_at_threshold() {
        let thresholds = vec![bracket("0", "0.12"), bracket("10000", "0.32")];
        assert_eq!(progressive_tax(dec("10000"), &thresholds), dec("1200.00"));
    }

    #[test]
    fn test_progressive_tax_is_monotone_over_sample() {
        let thresholds = vec![bracket("0", "0.12"), bracket("10000", "0.32")];
        let mut previous = Decimal::ZERO;
        for income in ["0", "500", "9999", "10000", "10001", "50000"] {
            let tax = progressive_tax(dec(income), &thresholds);
            assert!(tax >= previous, "tax decreased at income {}", income);
            previous = tax;
        }
    }

    #[test]
    fn test_builtin_steps_form_a_valid_graph() {
        let graph = crate::engine::DerivationGraph::new(builtin_steps()).unwrap();
        assert_eq!(graph.len(), 8);

        let names: Vec<&str> = graph.ordered().map(|s| s.name).collect();
        let position = |name: &str| names.iter().position(|n| *n == name).unwrap();
        assert!(position("base-salary") < position("overtime-pay"));
        assert!(position("gross") < position("contributions"));
        assert!(position("contributions") < position("deductions"));
        assert!(position("deductions") < position("net"));
    }
}
