//! Batch report: one input pair evaluated against every table row

use crate::calculator::{evaluate, CalculationInput, PresentationState, UwOutcome};
use crate::dashboard::Dashboard;
use crate::error::CalcResult;
use chrono::{DateTime, Utc};
use log::info;
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;

/// Outcome of evaluating one row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub risk_category: String,
    pub exposure_range: String,
    pub state: &'static str,
    pub share_to_retain: f64,
    pub buffer: f64,
    pub net_loss_ratio: Option<f64>,
    pub cost_of_risk: Option<f64>,
    pub outcome: Option<UwOutcome>,
    pub retained_amount: Option<f64>,
    pub buffer_amount: Option<f64>,
    pub note: Option<String>,
}

impl ReportRow {
    fn from_state(state: &PresentationState, note: Option<String>) -> Self {
        let metrics = state.metrics();
        let result = state.result();
        Self {
            risk_category: metrics.risk_category.clone(),
            exposure_range: metrics.exposure_range.clone(),
            state: state.name(),
            share_to_retain: metrics.share_to_retain,
            buffer: metrics.buffer,
            net_loss_ratio: metrics.net_loss_ratio,
            cost_of_risk: result.map(|r| r.cost_of_risk),
            outcome: result.map(|r| r.outcome),
            retained_amount: metrics.retained_amount,
            buffer_amount: metrics.buffer_amount,
            note,
        }
    }
}

/// Every reachable row evaluated with the same commission and overrider
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub input: CalculationInput,
    pub opex_loading_pct: f64,
    pub rows: Vec<ReportRow>,
}

/// Row counts by state and outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub rows: usize,
    pub not_recommended: usize,
    pub surplus: usize,
    pub deficit: usize,
    pub failed: usize,
}

impl Report {
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            rows: self.rows.len(),
            ..Default::default()
        };
        for row in &self.rows {
            match (row.state, row.outcome) {
                (_, Some(UwOutcome::Surplus)) => summary.surplus += 1,
                (_, Some(UwOutcome::Deficit)) => summary.deficit += 1,
                ("NOT_RECOMMENDED", None) => summary.not_recommended += 1,
                _ => summary.failed += 1,
            }
        }
        summary
    }

    /// Write rows as CSV with a header line
    pub fn write_csv<W: Write>(&self, writer: W) -> CalcResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write the whole report, metadata included, as pretty JSON
    pub fn write_json<W: Write>(&self, writer: W) -> CalcResult<()> {
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        Ok(())
    }
}

/// Evaluate every (risk category, exposure range) pair with one input pair
pub fn build_report(dashboard: &Dashboard, input: CalculationInput) -> Report {
    let records = dashboard.table().unique_records();

    let rows: Vec<ReportRow> = records
        .par_iter()
        .map(|record| {
            let state = evaluate(record, dashboard.ceiling_for(&record.exposure_range));
            if !state.metrics().is_recommended() {
                return ReportRow::from_state(&state, None);
            }
            match state.calculate(input, dashboard.loadings()) {
                Ok(calculated) => ReportRow::from_state(&calculated, None),
                Err(e) => ReportRow::from_state(&state, Some(e.to_string())),
            }
        })
        .collect();

    info!("report evaluated {} rows", rows.len());

    Report {
        generated_at: Utc::now(),
        input,
        opex_loading_pct: dashboard.loadings().opex_loading_pct,
        rows,
    }
}
