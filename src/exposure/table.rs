//! Immutable exposure table with two-stage selection domains

use super::ExposureRecord;
use crate::error::{CalcError, CalcResult};
use log::{debug, warn};
use std::collections::HashSet;

/// Net loss ratio table keyed by (risk category, exposure range)
///
/// Rows keep their source order. When the source carries the same key twice
/// the first row wins on lookup.
#[derive(Debug, Clone)]
pub struct ExposureTable {
    records: Vec<ExposureRecord>,
}

impl ExposureTable {
    /// Build a table from loaded rows, rejecting structurally invalid data
    pub fn new(records: Vec<ExposureRecord>) -> CalcResult<Self> {
        if records.is_empty() {
            return Err(CalcError::DataIntegrity("exposure table has no rows".into()));
        }

        let mut seen = HashSet::new();
        for (idx, record) in records.iter().enumerate() {
            let row = idx + 1;
            if record.risk_category.trim().is_empty() {
                return Err(CalcError::DataIntegrity(format!("row {}: empty risk category", row)));
            }
            if record.exposure_range.trim().is_empty() {
                return Err(CalcError::DataIntegrity(format!("row {}: empty exposure range", row)));
            }
            if !record.suggested_share.is_finite() || !record.buffer.is_finite() {
                return Err(CalcError::DataIntegrity(format!(
                    "row {}: share and buffer must be finite numbers",
                    row
                )));
            }
            if record.buffer < 0.0 {
                return Err(CalcError::DataIntegrity(format!(
                    "row {}: negative buffer {}",
                    row, record.buffer
                )));
            }
            if matches!(record.adjusted_net_loss_ratio, Some(lr) if !lr.is_finite()) {
                return Err(CalcError::DataIntegrity(format!(
                    "row {}: loss ratio must be a finite number",
                    row
                )));
            }
            if !seen.insert((record.risk_category.as_str(), record.exposure_range.as_str())) {
                warn!(
                    "duplicate row {} for {} / {}; the first occurrence is used",
                    row, record.risk_category, record.exposure_range
                );
            }
        }

        Ok(Self { records })
    }

    /// Find the row for a selection; `None` means no data for the combination
    pub fn lookup(&self, risk_category: &str, exposure_range: &str) -> Option<&ExposureRecord> {
        let found = self
            .records
            .iter()
            .find(|r| r.matches(risk_category, exposure_range));
        debug!(
            "lookup {} / {}: {}",
            risk_category,
            exposure_range,
            if found.is_some() { "hit" } else { "miss" }
        );
        found
    }

    /// Like `lookup`, but a miss becomes `NoMatchingRecord`
    pub fn get(&self, risk_category: &str, exposure_range: &str) -> CalcResult<&ExposureRecord> {
        self.lookup(risk_category, exposure_range)
            .ok_or_else(|| CalcError::NoMatchingRecord {
                risk_category: risk_category.to_string(),
                exposure_range: exposure_range.to_string(),
            })
    }

    /// Distinct risk categories in first-seen order
    pub fn risk_categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.risk_category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Distinct exposure ranges available for one risk category, in first-seen order
    pub fn exposure_ranges(&self, risk_category: &str) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| r.risk_category == risk_category)
            .map(|r| r.exposure_range.as_str())
            .filter(|r| seen.insert(*r))
            .collect()
    }

    /// Rows reachable through `lookup` (duplicates after the first are skipped)
    pub fn unique_records(&self) -> Vec<&ExposureRecord> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert((r.risk_category.as_str(), r.exposure_range.as_str())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
