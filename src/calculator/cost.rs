//! Cost-of-risk derivation and surplus/deficit classification

use serde::{Deserialize, Serialize};

/// Fixed operating-expense loading, in percentage points of premium
pub const DEFAULT_OPEX_LOADING_PCT: f64 = 15.0;

/// Gross premium baseline of the underwriting breakdown
pub const GROSS_PREMIUM_PCT: f64 = 100.0;

/// Cost of risk at or above this level is a deficit
pub const BREAK_EVEN_COST_OF_RISK: f64 = 100.0;

/// Loadings added on top of the loss ratio and acquisition costs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostLoadings {
    /// Operating-expense loading in percentage points
    pub opex_loading_pct: f64,
}

impl CostLoadings {
    pub fn new(opex_loading_pct: f64) -> Self {
        Self { opex_loading_pct }
    }
}

impl Default for CostLoadings {
    fn default() -> Self {
        Self {
            opex_loading_pct: DEFAULT_OPEX_LOADING_PCT,
        }
    }
}

/// Cost of risk in percentage points:
/// loss ratio + commission + overrider + opex loading
pub fn cost_of_risk(
    loss_ratio_pct: f64,
    commission_pct: f64,
    overrider_pct: f64,
    loadings: &CostLoadings,
) -> f64 {
    loss_ratio_pct + commission_pct + overrider_pct + loadings.opex_loading_pct
}

/// Expected underwriting result of a calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UwOutcome {
    Surplus,
    Deficit,
}

impl UwOutcome {
    /// Strictly below break-even is a surplus; exactly 100 is a deficit
    pub fn from_cost_of_risk(cost_of_risk: f64) -> Self {
        if cost_of_risk < BREAK_EVEN_COST_OF_RISK {
            UwOutcome::Surplus
        } else {
            UwOutcome::Deficit
        }
    }

    /// A positive profit/loss balance is a surplus; zero is a deficit
    pub fn from_running_total(running_total: f64) -> Self {
        if running_total > 0.0 {
            UwOutcome::Surplus
        } else {
            UwOutcome::Deficit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UwOutcome::Surplus => "surplus",
            UwOutcome::Deficit => "deficit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cost_of_risk_sums_four_terms() {
        let cor = cost_of_risk(55.0, 10.0, 5.0, &CostLoadings::default());
        assert_relative_eq!(cor, 85.0);
    }

    #[test]
    fn test_opex_loading_is_overridable() {
        let cor = cost_of_risk(55.0, 10.0, 5.0, &CostLoadings::new(20.0));
        assert_relative_eq!(cor, 90.0);
    }

    #[test]
    fn test_break_even_is_a_deficit() {
        assert_eq!(UwOutcome::from_cost_of_risk(99.99), UwOutcome::Surplus);
        assert_eq!(UwOutcome::from_cost_of_risk(100.0), UwOutcome::Deficit);
        assert_eq!(UwOutcome::from_cost_of_risk(130.0), UwOutcome::Deficit);

        assert_eq!(UwOutcome::from_running_total(0.01), UwOutcome::Surplus);
        assert_eq!(UwOutcome::from_running_total(0.0), UwOutcome::Deficit);
        assert_eq!(UwOutcome::from_running_total(-30.0), UwOutcome::Deficit);
    }
}
