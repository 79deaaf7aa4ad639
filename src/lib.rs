//! Optimum Share - retention share and cost-of-risk calculator
//!
//! This library provides:
//! - The net loss ratio reference table keyed by risk code and TSI range
//! - Sum-insured ceiling resolution for exposure bands
//! - The retention calculator state machine (not recommended / awaiting input / calculated)
//! - Cost of risk and the expected underwriting result breakdown
//! - Batch reports over the whole table

pub mod error;
pub mod exposure;
pub mod calculator;
pub mod format;
pub mod config;
pub mod auth;
pub mod dashboard;
pub mod report;

// Re-export commonly used types
pub use error::{CalcError, CalcResult};
pub use exposure::{ExposureRecord, ExposureTable, CeilingMap};
pub use calculator::{
    CalculationInput, CalculationResult, CostLoadings, PresentationState, UwOutcome,
    Breakdown, BreakdownStep, Metrics, evaluate,
};
pub use config::Settings;
pub use auth::{Authenticator, CredentialStore, OpenAccess};
pub use dashboard::Dashboard;
pub use report::{Report, build_report};
