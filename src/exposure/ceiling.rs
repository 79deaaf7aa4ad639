//! Exposure band to sum-insured ceiling mapping
//!
//! Keys are matched against exposure-range labels in their defined order. The
//! substring policy tolerates labels reformatted between datasets, but keys
//! that overlap make the result depend on key order. `lookup` tries an exact
//! match on normalized labels first and only then falls back to that policy.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Ordered mapping from exposure-range label to a representative TSI ceiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CeilingMap {
    entries: Vec<(String, f64)>,
}

/// Trim, ASCII case-fold and collapse internal whitespace
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

impl CeilingMap {
    /// Create from ordered (label, ceiling) pairs
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Default band ceilings used when no mapping file is configured
    pub fn default_bands() -> Self {
        Self {
            entries: vec![
                ("01. [0, 500 Mio]".to_string(), 5.0e8),
                ("02. (500 Mio, 1 Bio]".to_string(), 1.0e9),
                ("03. (1 Bio, 5 Bio]".to_string(), 5.0e9),
                ("04. (5 Bio, 10 Bio]".to_string(), 1.0e10),
                ("05. (10 Bio, 25 Bio]".to_string(), 2.5e10),
                ("06. (25 Bio, 50 Bio]".to_string(), 5.0e10),
                ("07. (50 Bio, 100 Bio]".to_string(), 1.0e11),
            ],
        }
    }

    /// First key (in defined order) contained in `exposure_range`
    pub fn resolve(&self, exposure_range: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(key, _)| exposure_range.contains(key.as_str()))
            .map(|(_, ceiling)| *ceiling)
    }

    /// Exact match after normalizing both labels
    pub fn resolve_normalized(&self, exposure_range: &str) -> Option<f64> {
        let wanted = normalize_label(exposure_range);
        self.entries
            .iter()
            .find(|(key, _)| normalize_label(key) == wanted)
            .map(|(_, ceiling)| *ceiling)
    }

    /// Normalized exact match, falling back to the first-containing-key rule
    pub fn lookup(&self, exposure_range: &str) -> Option<f64> {
        if let Some(ceiling) = self.resolve_normalized(exposure_range) {
            return Some(ceiling);
        }
        match self.resolve(exposure_range) {
            Some(ceiling) => {
                debug!("ceiling for {:?} resolved by substring fallback", exposure_range);
                Some(ceiling)
            }
            None => {
                warn!("no ceiling mapped for exposure range {:?}", exposure_range);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CeilingMap {
    fn default() -> Self {
        Self::default_bands()
    }
}
