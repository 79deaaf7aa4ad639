//! Presentation state machine over one exposure record

use super::breakdown::Breakdown;
use super::cost::{cost_of_risk, CostLoadings, UwOutcome};
use super::input::{CalculationInput, InputSlot};
use crate::error::{CalcError, CalcResult};
use crate::exposure::ExposureRecord;
use log::debug;
use serde::Serialize;

/// Figures shown for every found row, whatever the state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub risk_category: String,
    pub exposure_range: String,

    /// Suggested share to retain as a fraction
    pub share_to_retain: f64,

    /// Retention buffer as a fraction
    pub buffer: f64,

    /// Adjusted net loss ratio as a fraction
    pub net_loss_ratio: Option<f64>,

    /// Loss ratio is displayed as "-" instead of a number
    pub loss_ratio_placeholder: bool,

    /// Representative sum-insured ceiling of the exposure band
    pub ceiling: Option<f64>,

    /// share_to_retain * ceiling
    pub retained_amount: Option<f64>,

    /// buffer * ceiling
    pub buffer_amount: Option<f64>,
}

impl Metrics {
    pub fn from_record(record: &ExposureRecord, ceiling: Option<f64>) -> Self {
        Self {
            risk_category: record.risk_category.clone(),
            exposure_range: record.exposure_range.clone(),
            share_to_retain: record.suggested_share,
            buffer: record.buffer,
            net_loss_ratio: record.adjusted_net_loss_ratio,
            loss_ratio_placeholder: record.loss_ratio_placeholder(),
            ceiling,
            retained_amount: ceiling.map(|c| record.suggested_share * c),
            buffer_amount: ceiling.map(|c| record.buffer * c),
        }
    }

    pub fn is_recommended(&self) -> bool {
        self.share_to_retain > 0.0
    }
}

/// Derived figures of one calculation; replaced wholesale on recalculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    pub cost_of_risk: f64,
    pub outcome: UwOutcome,
    pub retained_amount: Option<f64>,
    pub buffer_amount: Option<f64>,
    pub breakdown: Breakdown,
}

/// What the rendering layer should show for a selection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresentationState {
    /// Suggested share <= 0: warning only, no inputs, no calculation
    NotRecommended { metrics: Metrics },

    /// Inputs offered, waiting for the user to calculate
    RecommendedAwaitingInput {
        metrics: Metrics,
        inputs: [InputSlot; 2],
    },

    /// Cost of risk and breakdown computed from the last input pair
    Calculated {
        metrics: Metrics,
        input: CalculationInput,
        result: CalculationResult,
    },
}

impl PresentationState {
    pub fn metrics(&self) -> &Metrics {
        match self {
            PresentationState::NotRecommended { metrics }
            | PresentationState::RecommendedAwaitingInput { metrics, .. }
            | PresentationState::Calculated { metrics, .. } => metrics,
        }
    }

    /// Input slots on offer; empty unless the combination is recommended
    pub fn input_slots(&self) -> &[InputSlot] {
        match self {
            PresentationState::RecommendedAwaitingInput { inputs, .. } => inputs,
            _ => &[],
        }
    }

    pub fn result(&self) -> Option<&CalculationResult> {
        match self {
            PresentationState::Calculated { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PresentationState::NotRecommended { .. } => "NOT_RECOMMENDED",
            PresentationState::RecommendedAwaitingInput { .. } => "RECOMMENDED_AWAITING_INPUT",
            PresentationState::Calculated { .. } => "CALCULATED",
        }
    }

    /// Move to CALCULATED with a new input pair
    ///
    /// Works from RECOMMENDED_AWAITING_INPUT and from CALCULATED (the previous
    /// result is dropped). NOT_RECOMMENDED never calculates.
    pub fn calculate(&self, input: CalculationInput, loadings: &CostLoadings) -> CalcResult<Self> {
        let metrics = match self {
            PresentationState::NotRecommended { metrics } => {
                return Err(CalcError::NotRecommended {
                    risk_category: metrics.risk_category.clone(),
                    exposure_range: metrics.exposure_range.clone(),
                });
            }
            PresentationState::RecommendedAwaitingInput { metrics, .. }
            | PresentationState::Calculated { metrics, .. } => metrics,
        };

        let result = compute(metrics, &input, loadings)?;
        Ok(PresentationState::Calculated {
            metrics: metrics.clone(),
            input,
            result,
        })
    }
}

fn compute(
    metrics: &Metrics,
    input: &CalculationInput,
    loadings: &CostLoadings,
) -> CalcResult<CalculationResult> {
    let loss_ratio = metrics
        .net_loss_ratio
        .ok_or_else(|| CalcError::MissingLossRatio {
            risk_category: metrics.risk_category.clone(),
            exposure_range: metrics.exposure_range.clone(),
        })?;
    let loss_ratio_pct = loss_ratio * 100.0;

    let cor = cost_of_risk(
        loss_ratio_pct,
        input.commission_pct,
        input.overrider_pct,
        loadings,
    );
    let breakdown = Breakdown::build(loss_ratio_pct, input, loadings);
    debug!(
        "{} / {}: cost of risk {:.2} ({})",
        metrics.risk_category,
        metrics.exposure_range,
        cor,
        breakdown.outcome.as_str()
    );

    Ok(CalculationResult {
        cost_of_risk: cor,
        outcome: UwOutcome::from_cost_of_risk(cor),
        retained_amount: metrics.retained_amount,
        buffer_amount: metrics.buffer_amount,
        breakdown,
    })
}

/// Initial presentation state for a found record
pub fn evaluate(record: &ExposureRecord, ceiling: Option<f64>) -> PresentationState {
    let metrics = Metrics::from_record(record, ceiling);
    if metrics.is_recommended() {
        PresentationState::RecommendedAwaitingInput {
            metrics,
            inputs: [InputSlot::COMMISSION, InputSlot::OVERRIDER],
        }
    } else {
        PresentationState::NotRecommended { metrics }
    }
}

/// Evaluate and calculate in one step
pub fn calculate(
    record: &ExposureRecord,
    ceiling: Option<f64>,
    input: CalculationInput,
    loadings: &CostLoadings,
) -> CalcResult<CalculationResult> {
    let metrics = Metrics::from_record(record, ceiling);
    if !metrics.is_recommended() {
        return Err(CalcError::NotRecommended {
            risk_category: metrics.risk_category,
            exposure_range: metrics.exposure_range,
        });
    }
    compute(&metrics, &input, loadings)
}
