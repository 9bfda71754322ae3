//! Employee model and contract types.
//!
//! This module defines the Employee struct and the ContractType enum that
//! drives rule-variant selection throughout the derivation graph.

use serde::{Deserialize, Serialize};

/// The legal form of the engagement between employer and employee.
///
/// The contract type is the primary discriminator consulted by the rule
/// resolver: it decides whether the base rate is period- or hourly-based and
/// which statutory exemptions can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractType {
    /// Regular employment contract.
    Employment,
    /// Business-to-business contract.
    B2b,
    /// Civil-law commission contract (subject to the student exemption).
    Commission,
    /// Specific-work contract.
    Work,
}

impl ContractType {
    /// All contract types the engine knows about.
    ///
    /// Used by the configuration loader to verify fail-closed coverage.
    pub const ALL: [ContractType; 4] = [
        ContractType::Employment,
        ContractType::B2b,
        ContractType::Commission,
        ContractType::Work,
    ];

    /// Returns the wire name of this contract type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Employment => "EMPLOYMENT",
            ContractType::B2b => "B2B",
            ContractType::Commission => "COMMISSION",
            ContractType::Work => "WORK",
        }
    }
}

/// Identity and contract facts for the employee being paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Given name. Opaque to the engine.
    pub first_name: String,
    /// Family name. Opaque to the engine.
    pub last_name: String,
    /// The legal form of the engagement.
    pub contract_type: ContractType,
    /// Student status flag, drives the statutory exemption rules.
    #[serde(default)]
    pub is_student: bool,
}
