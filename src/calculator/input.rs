//! Commission and overrider input slots
//!
//! Range checks belong to the input surface (CLI, service request); the
//! calculator itself accepts whatever it is handed.

use crate::error::{CalcError, CalcResult};
use serde::{Deserialize, Serialize};

pub const PERCENT_MIN: f64 = 0.0;
pub const PERCENT_MAX: f64 = 100.0;
pub const PERCENT_STEP: f64 = 0.1;

/// Description of one percentage input offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InputSlot {
    pub field: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl InputSlot {
    pub const COMMISSION: InputSlot = InputSlot {
        field: "commission",
        label: "Commission (%)",
        min: PERCENT_MIN,
        max: PERCENT_MAX,
        step: PERCENT_STEP,
    };

    pub const OVERRIDER: InputSlot = InputSlot {
        field: "overrider",
        label: "Overrider (%)",
        min: PERCENT_MIN,
        max: PERCENT_MAX,
        step: PERCENT_STEP,
    };

    /// Reject values outside the slot's range
    pub fn validate(&self, value: f64) -> CalcResult<f64> {
        if !value.is_finite() {
            return Err(CalcError::InvalidInput {
                field: self.field,
                value,
                reason: "must be a finite number",
            });
        }
        if value < self.min || value > self.max {
            return Err(CalcError::InvalidInput {
                field: self.field,
                value,
                reason: "must be between 0 and 100",
            });
        }
        Ok(value)
    }
}

/// Validate a percentage for the named slot ("commission" or "overrider")
pub fn validate_percent(field: &'static str, value: f64) -> CalcResult<f64> {
    match field {
        "commission" => InputSlot::COMMISSION.validate(value),
        "overrider" => InputSlot::OVERRIDER.validate(value),
        _ => Err(CalcError::InvalidInput {
            field,
            value,
            reason: "unknown input field",
        }),
    }
}

/// User-supplied acquisition costs, in percentage points of premium
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculationInput {
    pub commission_pct: f64,
    pub overrider_pct: f64,
}

impl CalculationInput {
    pub fn new(commission_pct: f64, overrider_pct: f64) -> Self {
        Self {
            commission_pct,
            overrider_pct,
        }
    }

    /// Build an input pair after range-checking both values
    pub fn validated(commission_pct: f64, overrider_pct: f64) -> CalcResult<Self> {
        Ok(Self {
            commission_pct: InputSlot::COMMISSION.validate(commission_pct)?,
            overrider_pct: InputSlot::OVERRIDER.validate(overrider_pct)?,
        })
    }
}
