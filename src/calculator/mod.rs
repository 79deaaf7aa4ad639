//! Retention calculator: presentation state, cost of risk and underwriting breakdown
//!
//! The calculator is a pure function of one exposure record, an optional
//! sum-insured ceiling and, once the user asks for it, a commission/overrider
//! input pair. Nothing here holds state between evaluations.

mod cost;
mod input;
mod breakdown;
mod state;

pub use cost::{
    CostLoadings, UwOutcome, cost_of_risk,
    DEFAULT_OPEX_LOADING_PCT, GROSS_PREMIUM_PCT, BREAK_EVEN_COST_OF_RISK,
};
pub use input::{CalculationInput, InputSlot, validate_percent, PERCENT_MIN, PERCENT_MAX, PERCENT_STEP};
pub use breakdown::{Breakdown, BreakdownStep, StepMeasure};
pub use state::{Metrics, CalculationResult, PresentationState, evaluate, calculate};
