//! Summary Export Module
//! Writes the aggregated records behind each chart as a JSON report.

use crate::charts::ChartData;
use crate::stats::{AverageLikes, DailyAverage, PlatformSummary};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write summary: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Aggregates for every rendered chart, keyed by chart id.
#[derive(Debug, Serialize)]
pub struct SummaryReport<'a> {
    pub source: String,
    pub generated_at: String,
    pub rows: usize,
    pub rejected_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boxplot: Option<&'a [PlatformSummary]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barplot: Option<&'a [AverageLikes]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineplot: Option<&'a [DailyAverage]>,
}

impl<'a> SummaryReport<'a> {
    pub fn new(source: &Path, rows: usize, rejected_rows: usize) -> Self {
        Self {
            source: source.display().to_string(),
            generated_at: Utc::now().to_rfc3339(),
            rows,
            rejected_rows,
            boxplot: None,
            barplot: None,
            lineplot: None,
        }
    }

    pub fn add(&mut self, chart: &'a ChartData) {
        match chart {
            ChartData::BoxPlot(records) => self.boxplot = Some(records),
            ChartData::BarPlot(records) => self.barplot = Some(records),
            ChartData::LinePlot(records) => self.lineplot = Some(records),
        }
    }

    pub fn write(&self, path: &Path) -> Result<(), ExportError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!(path = %path.display(), "summary written");
        Ok(())
    }
}
