//! Display formatting for metrics and ceiling-derived amounts

use crate::calculator::{CalculationResult, Metrics};

/// Shown in place of a loss ratio that is not available
pub const PLACEHOLDER: &str = "-";

/// Fraction as a percentage with two decimals, e.g. 0.4 -> "40.00%"
pub fn format_fraction_pct(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Percentage points with two decimals, e.g. 85.0 -> "85.00%"
pub fn format_points(points: f64) -> String {
    format!("{:.2}%", points)
}

/// Loss ratio percentage, or the placeholder when absent
pub fn format_loss_ratio(loss_ratio: Option<f64>) -> String {
    match loss_ratio {
        Some(lr) => format_fraction_pct(lr),
        None => PLACEHOLDER.to_string(),
    }
}

/// Monetary amount scaled to a unit suffix, e.g. 1.0e10 -> "10.00 Bio"
pub fn format_scaled(amount: f64) -> String {
    let magnitude = amount.abs();
    if magnitude >= 1e12 {
        format!("{:.2} Tri", amount / 1e12)
    } else if magnitude >= 1e9 {
        format!("{:.2} Bio", amount / 1e9)
    } else if magnitude >= 1e6 {
        format!("{:.2} Mio", amount / 1e6)
    } else {
        format!("{:.2}", amount)
    }
}

/// Optional amount, or the placeholder when the ceiling did not resolve
pub fn format_optional_scaled(amount: Option<f64>) -> String {
    amount.map(format_scaled).unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Text lines for the three headline metrics and any ceiling amounts
pub fn metric_lines(metrics: &Metrics) -> Vec<(String, String)> {
    let loss_ratio = if metrics.loss_ratio_placeholder {
        PLACEHOLDER.to_string()
    } else {
        format_loss_ratio(metrics.net_loss_ratio)
    };

    let mut lines = vec![
        ("Share to Retain".to_string(), format_fraction_pct(metrics.share_to_retain)),
        ("Buffer 15%".to_string(), format_fraction_pct(metrics.buffer)),
        ("Net Loss Ratio".to_string(), loss_ratio),
    ];

    if let Some(ceiling) = metrics.ceiling {
        lines.push(("TSI Ceiling".to_string(), format_scaled(ceiling)));
        lines.push(("Retained Amount".to_string(), format_optional_scaled(metrics.retained_amount)));
        lines.push(("Buffer Amount".to_string(), format_optional_scaled(metrics.buffer_amount)));
    }

    lines
}

/// Text lines for a calculation: cost of risk, then each breakdown step
pub fn result_lines(result: &CalculationResult) -> Vec<(String, String)> {
    let mut lines = vec![(
        "CoR".to_string(),
        format!("{} ({})", format_points(result.cost_of_risk), result.outcome.as_str()),
    )];
    for step in &result.breakdown.steps {
        lines.push((step.label.clone(), format_points(step.value)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::ExposureRecord;

    #[test]
    fn test_scaled_units() {
        assert_eq!(format_scaled(2.5e10 * 0.4), "10.00 Bio");
        assert_eq!(format_scaled(7.5e8), "750.00 Mio");
        assert_eq!(format_scaled(1.5e12), "1.50 Tri");
        assert_eq!(format_scaled(1234.5), "1234.50");
        assert_eq!(format_scaled(-2.0e9), "-2.00 Bio");
    }

    #[test]
    fn test_percentages() {
        assert_eq!(format_fraction_pct(0.4), "40.00%");
        assert_eq!(format_points(85.0), "85.00%");
        assert_eq!(format_loss_ratio(Some(0.55)), "55.00%");
        assert_eq!(format_loss_ratio(None), "-");
    }

    #[test]
    fn test_metric_lines_with_and_without_ceiling() {
        let record = ExposureRecord::new("2910", "05. (10 Bio, 25 Bio]", Some(0.55), 0.40, 0.15);

        let bare = metric_lines(&Metrics::from_record(&record, None));
        assert_eq!(bare.len(), 3);
        assert_eq!(bare[0], ("Share to Retain".to_string(), "40.00%".to_string()));

        let full = metric_lines(&Metrics::from_record(&record, Some(2.5e10)));
        assert_eq!(full.len(), 6);
        assert_eq!(full[4].1, "10.00 Bio");
    }

    #[test]
    fn test_placeholder_metric() {
        let record = ExposureRecord::new("2910", "08. > 100 Bio", None, 0.0, 0.0);
        let lines = metric_lines(&Metrics::from_record(&record, None));
        assert_eq!(lines[2].1, "-");
    }
}
