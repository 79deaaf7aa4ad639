//! Waterfall breakdown of the expected underwriting result

use super::cost::{cost_of_risk, CostLoadings, UwOutcome, GROSS_PREMIUM_PCT};
use super::input::CalculationInput;
use serde::{Deserialize, Serialize};

/// How a chart renderer should place a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepMeasure {
    /// Absolute baseline
    Absolute,
    /// Change relative to the previous bar
    Relative,
    /// Running total
    Total,
}

/// One bar of the waterfall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownStep {
    pub label: String,
    pub value: f64,
    pub measure: StepMeasure,
}

impl BreakdownStep {
    fn new(label: &str, value: f64, measure: StepMeasure) -> Self {
        Self {
            label: label.to_string(),
            value,
            measure,
        }
    }
}

/// Ordered waterfall steps plus the terminal profit/loss balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub steps: Vec<BreakdownStep>,
    pub running_total: f64,
    pub outcome: UwOutcome,
}

impl Breakdown {
    /// Build the six-step sequence: gross premium, the four deductions, profit/loss
    ///
    /// The terminal balance is the gross premium less the cost of risk, so its
    /// sign always agrees with the cost-of-risk threshold.
    pub fn build(loss_ratio_pct: f64, input: &CalculationInput, loadings: &CostLoadings) -> Self {
        let cor = cost_of_risk(
            loss_ratio_pct,
            input.commission_pct,
            input.overrider_pct,
            loadings,
        );
        let running_total = GROSS_PREMIUM_PCT - cor;

        let steps = vec![
            BreakdownStep::new("Gross Premium", GROSS_PREMIUM_PCT, StepMeasure::Absolute),
            BreakdownStep::new("Net Loss Ratio", -loss_ratio_pct, StepMeasure::Relative),
            BreakdownStep::new("Commission", -input.commission_pct, StepMeasure::Relative),
            BreakdownStep::new("Overrider", -input.overrider_pct, StepMeasure::Relative),
            BreakdownStep::new("Opex Loading", -loadings.opex_loading_pct, StepMeasure::Relative),
            BreakdownStep::new("Profit/Loss", running_total, StepMeasure::Total),
        ];

        Self {
            steps,
            running_total,
            outcome: UwOutcome::from_running_total(running_total),
        }
    }

    /// Sum of the deduction steps
    pub fn deductions(&self) -> f64 {
        self.steps
            .iter()
            .filter(|s| s.measure == StepMeasure::Relative)
            .map(|s| s.value)
            .sum()
    }

    pub fn terminal(&self) -> Option<&BreakdownStep> {
        self.steps.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_step_order_and_signs() {
        let input = CalculationInput::new(10.0, 5.0);
        let breakdown = Breakdown::build(55.0, &input, &CostLoadings::default());

        let labels: Vec<_> = breakdown.steps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Gross Premium", "Net Loss Ratio", "Commission", "Overrider", "Opex Loading", "Profit/Loss"]
        );

        let values: Vec<_> = breakdown.steps.iter().map(|s| s.value).collect();
        assert_eq!(values[..5], [100.0, -55.0, -10.0, -5.0, -15.0]);
        assert_abs_diff_eq!(values[5], 15.0, epsilon = 1e-9);

        assert_eq!(breakdown.steps[0].measure, StepMeasure::Absolute);
        assert_eq!(breakdown.terminal().unwrap().measure, StepMeasure::Total);
    }

    #[test]
    fn test_running_total_matches_step_sum() {
        let input = CalculationInput::new(22.5, 7.3);
        let breakdown = Breakdown::build(61.8, &input, &CostLoadings::default());
        assert_abs_diff_eq!(
            breakdown.running_total,
            GROSS_PREMIUM_PCT + breakdown.deductions(),
            epsilon = 1e-9
        );
        assert_eq!(breakdown.outcome, UwOutcome::Deficit);
    }

    #[test]
    fn test_zero_balance_is_deficit() {
        let input = CalculationInput::new(20.0, 10.0);
        let breakdown = Breakdown::build(55.0, &input, &CostLoadings::default());
        assert_abs_diff_eq!(breakdown.running_total, 0.0);
        assert_eq!(breakdown.outcome, UwOutcome::Deficit);
    }
}
