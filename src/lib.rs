//! Payroll derivation engine.
//!
//! This crate computes a single pay period's payroll result for one employee:
//! a deterministic derivation graph turns a validated input payload into base
//! pay, overtime pay, travel pay, allowances, gross, statutory contributions,
//! deductions and net, using fixed-point decimal arithmetic and
//! contract-type-dependent rule variants selected from load-once
//! configuration.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod money;
pub mod validation;
