//! Error types shared by the exposure table, the calculator and the input surfaces

use thiserror::Error;

/// Failures surfaced by lookups, calculations and reference-data loading
#[derive(Debug, Error)]
pub enum CalcError {
    /// The (risk category, exposure range) pair has no row in the table
    #[error("no data for risk category {risk_category:?} and exposure range {exposure_range:?}")]
    NoMatchingRecord {
        risk_category: String,
        exposure_range: String,
    },

    /// A calculation was requested for a combination flagged not recommended
    #[error("risk category {risk_category:?} in range {exposure_range:?} is not recommended")]
    NotRecommended {
        risk_category: String,
        exposure_range: String,
    },

    /// Cost of risk needs the loss ratio but the row does not carry one
    #[error("adjusted net loss ratio is missing for {risk_category:?} / {exposure_range:?}")]
    MissingLossRatio {
        risk_category: String,
        exposure_range: String,
    },

    /// A user-supplied percentage was rejected by the input surface
    #[error("invalid {field} {value}: {reason}")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Reference data is missing or structurally invalid
    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl CalcError {
    /// True for failures that must stop the process at startup
    pub fn is_fatal(&self) -> bool {
        matches!(self, CalcError::DataIntegrity(_) | CalcError::Io(_) | CalcError::Csv(_))
    }
}

pub type CalcResult<T> = Result<T, CalcError>;
