//! Calculator facade over the loaded reference data
//!
//! Reference data is loaded once at startup; every selection after that is
//! a pure, stateless evaluation against the shared immutable handle.

use crate::calculator::{evaluate, CalculationInput, CostLoadings, PresentationState};
use crate::config::Settings;
use crate::error::CalcResult;
use crate::exposure::{load_ceilings, load_table, CeilingMap, ExposureTable};
use log::{debug, info};

/// Immutable table, ceiling mapping and loadings shared by every request
///
/// # Example
/// ```ignore
/// let dashboard = Dashboard::from_settings(&Settings::from_env())?;
///
/// for category in dashboard.risk_categories() {
///     for range in dashboard.exposure_ranges(category) {
///         let state = dashboard.select(category, range)?;
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: ExposureTable,
    ceilings: CeilingMap,
    loadings: CostLoadings,
}

impl Dashboard {
    pub fn new(table: ExposureTable, ceilings: CeilingMap, loadings: CostLoadings) -> Self {
        Self {
            table,
            ceilings,
            loadings,
        }
    }

    /// Load everything the settings point at; any failure is fatal
    pub fn from_settings(settings: &Settings) -> CalcResult<Self> {
        let table = load_table(&settings.table_path)?;
        let ceilings = match &settings.ceilings_path {
            Some(path) => load_ceilings(path)?,
            None => {
                info!("no ceiling mapping configured, using built-in bands");
                CeilingMap::default_bands()
            }
        };
        Ok(Self::new(table, ceilings, settings.loadings()))
    }

    /// First selection stage
    pub fn risk_categories(&self) -> Vec<&str> {
        self.table.risk_categories()
    }

    /// Second selection stage, conditioned on the chosen category
    pub fn exposure_ranges(&self, risk_category: &str) -> Vec<&str> {
        self.table.exposure_ranges(risk_category)
    }

    /// Ceiling for an exposure range, if the mapping covers it
    pub fn ceiling_for(&self, exposure_range: &str) -> Option<f64> {
        self.ceilings.lookup(exposure_range)
    }

    /// Presentation state for a selection; a missing row is `NoMatchingRecord`
    pub fn select(&self, risk_category: &str, exposure_range: &str) -> CalcResult<PresentationState> {
        let record = self.table.get(risk_category, exposure_range)?;
        let state = evaluate(record, self.ceiling_for(exposure_range));
        debug!("{} / {} -> {}", risk_category, exposure_range, state.name());
        Ok(state)
    }

    /// Select and calculate with one input pair
    pub fn calculate(
        &self,
        risk_category: &str,
        exposure_range: &str,
        input: CalculationInput,
    ) -> CalcResult<PresentationState> {
        self.select(risk_category, exposure_range)?
            .calculate(input, &self.loadings)
    }

    pub fn table(&self) -> &ExposureTable {
        &self.table
    }

    pub fn ceilings(&self) -> &CeilingMap {
        &self.ceilings
    }

    pub fn loadings(&self) -> &CostLoadings {
        &self.loadings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::UwOutcome;
    use crate::error::CalcError;
    use crate::exposure::ExposureRecord;
    use approx::assert_abs_diff_eq;

    fn dashboard() -> Dashboard {
        let table = ExposureTable::new(vec![
            ExposureRecord::new("2910", "05. (10 Bio, 25 Bio]", Some(0.55), 0.40, 0.15),
            ExposureRecord::new("2910", "08. > 100 Bio", None, 0.0, 0.0),
            ExposureRecord::new("2976", "03. (1 Bio, 5 Bio]", Some(1.05), 0.0, 0.15),
        ])
        .unwrap();
        Dashboard::new(table, CeilingMap::default_bands(), CostLoadings::default())
    }

    #[test]
    fn test_two_stage_selection() {
        let dashboard = dashboard();
        assert_eq!(dashboard.risk_categories(), vec!["2910", "2976"]);
        assert_eq!(
            dashboard.exposure_ranges("2910"),
            vec!["05. (10 Bio, 25 Bio]", "08. > 100 Bio"]
        );
    }

    #[test]
    fn test_select_resolves_ceiling() {
        let state = dashboard().select("2910", "05. (10 Bio, 25 Bio]").unwrap();
        assert_eq!(state.metrics().ceiling, Some(2.5e10));
        assert_eq!(state.input_slots().len(), 2);
    }

    #[test]
    fn test_select_without_ceiling() {
        let state = dashboard().select("2910", "08. > 100 Bio").unwrap();
        assert_eq!(state.name(), "NOT_RECOMMENDED");
        assert!(state.metrics().ceiling.is_none());
        assert!(state.metrics().retained_amount.is_none());
    }

    #[test]
    fn test_select_unknown_pair() {
        let err = dashboard().select("2976", "05. (10 Bio, 25 Bio]").unwrap_err();
        assert!(matches!(err, CalcError::NoMatchingRecord { .. }));
    }

    #[test]
    fn test_calculate_through_dashboard() {
        let state = dashboard()
            .calculate("2910", "05. (10 Bio, 25 Bio]", CalculationInput::new(10.0, 5.0))
            .unwrap();
        let result = state.result().unwrap();
        assert_abs_diff_eq!(result.cost_of_risk, 85.0, epsilon = 1e-9);
        assert_eq!(result.outcome, UwOutcome::Surplus);
        assert_abs_diff_eq!(result.retained_amount.unwrap(), 1.0e10, epsilon = 1e-3);
    }

    #[test]
    fn test_calculate_not_recommended() {
        let err = dashboard()
            .calculate("2976", "03. (1 Bio, 5 Bio]", CalculationInput::new(10.0, 5.0))
            .unwrap_err();
        assert!(matches!(err, CalcError::NotRecommended { .. }));
    }

    #[test]
    fn test_ceiling_resolution_is_deterministic() {
        let dashboard = dashboard();
        let first = dashboard.ceiling_for("05. (10 Bio, 25 Bio]");
        for _ in 0..10 {
            assert_eq!(dashboard.ceiling_for("05. (10 Bio, 25 Bio]"), first);
        }
    }

    #[test]
    fn test_from_settings_with_default_data() {
        let settings = Settings::from_lookup(|_| None);
        let dashboard = Dashboard::from_settings(&settings).expect("Failed to load default data");
        assert!(!dashboard.risk_categories().is_empty());
        assert_eq!(dashboard.ceilings().len(), 7);
    }
}
