//! Core data models for the payroll engine.
//!
//! This module contains the input fact groups (mirroring the nine sections
//! of the payroll payload) and the public result types.

mod employee;
mod payload;
mod result;

pub use employee::{ContractType, Employee};
pub use payload::{
    Allowances, CurrencyCode, Deductions, Meta, OtherDeduction, Overtime, PayrollPayload, Period,
    Position, SettlementFrequency, TaxParameters, TaxThreshold, Timesheet, Travel,
};
pub use result::{CalcWarning, PayrollResult, WarningCode};
