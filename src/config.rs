//! Run configuration assembled from the command line.

use crate::charts::{ChartFormat, ChartKind};
use crate::data::MalformedRowPolicy;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Output path {} exists and is not a directory", .0.display())]
    OutputNotDirectory(PathBuf),
    #[error("Summary path {} is a directory", .0.display())]
    SummaryIsDirectory(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub format: ChartFormat,
    /// Charts to render, in order, without duplicates
    pub charts: Vec<ChartKind>,
    pub policy: MalformedRowPolicy,
    pub summary: Option<PathBuf>,
    pub open: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("socialMedia.csv"),
            output_dir: PathBuf::from("charts"),
            format: ChartFormat::default(),
            charts: ChartKind::ALL.to_vec(),
            policy: MalformedRowPolicy::default(),
            summary: None,
            open: false,
        }
    }
}

impl RunConfig {
    /// Normalise the chart list and reject output paths that cannot work.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.charts.is_empty() {
            self.charts = ChartKind::ALL.to_vec();
        } else {
            let mut seen = Vec::with_capacity(self.charts.len());
            for kind in self.charts {
                if !seen.contains(&kind) {
                    seen.push(kind);
                }
            }
            self.charts = seen;
        }

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(ConfigError::OutputNotDirectory(self.output_dir));
        }
        if let Some(summary) = &self.summary {
            if summary.is_dir() {
                return Err(ConfigError::SummaryIsDirectory(summary.clone()));
            }
        }

        Ok(self)
    }
}
