//! Exposure record matching the net loss ratio dataset format

use serde::{Deserialize, Serialize};

/// One row of the net loss ratio table, keyed by risk category and TSI range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureRecord {
    /// Risk classification code
    pub risk_category: String,

    /// Bucketed total-sum-insured band, e.g. "05. (10 Bio, 25 Bio]"
    pub exposure_range: String,

    /// Adjusted net loss ratio as a fraction (absent for some rows)
    pub adjusted_net_loss_ratio: Option<f64>,

    /// Recommended share to retain as a fraction; <= 0 means not recommended
    pub suggested_share: f64,

    /// Retention buffer as a fraction
    pub buffer: f64,
}

impl ExposureRecord {
    pub fn new(
        risk_category: impl Into<String>,
        exposure_range: impl Into<String>,
        adjusted_net_loss_ratio: Option<f64>,
        suggested_share: f64,
        buffer: f64,
    ) -> Self {
        Self {
            risk_category: risk_category.into(),
            exposure_range: exposure_range.into(),
            adjusted_net_loss_ratio,
            suggested_share,
            buffer,
        }
    }

    /// Whether retaining a share of this combination is recommended at all
    pub fn is_recommended(&self) -> bool {
        self.suggested_share > 0.0
    }

    /// Loss ratio expressed in percentage points of premium
    pub fn loss_ratio_pct(&self) -> Option<f64> {
        self.adjusted_net_loss_ratio.map(|lr| lr * 100.0)
    }

    /// The loss ratio is shown as a placeholder when it is absent and the row
    /// carries neither a share nor a buffer
    pub fn loss_ratio_placeholder(&self) -> bool {
        self.adjusted_net_loss_ratio.is_none() && self.suggested_share <= 0.0 && self.buffer <= 0.0
    }

    /// Check whether this row belongs to the given selection
    pub fn matches(&self, risk_category: &str, exposure_range: &str) -> bool {
        self.risk_category == risk_category && self.exposure_range == exposure_range
    }
}
