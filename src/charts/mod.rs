//! Charts module - Chart rendering

mod canvas;
mod curve;
mod renderer;
mod scale;

pub use renderer::StaticChartRenderer;

use crate::stats::{AverageLikes, DailyAverage, PlatformSummary};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("No data to draw for {0}")]
    EmptyData(ChartKind),
}

pub(crate) fn draw_err(err: impl fmt::Display) -> RenderError {
    RenderError::Draw(err.to_string())
}

/// The three charts, named after their drawing targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
pub enum ChartKind {
    /// Likes distribution per platform
    #[value(name = "boxplot")]
    #[serde(rename = "boxplot")]
    BoxPlot,
    /// Average likes per platform and post type
    #[value(name = "barplot")]
    #[serde(rename = "barplot")]
    BarPlot,
    /// Average likes per day
    #[value(name = "lineplot")]
    #[serde(rename = "lineplot")]
    LinePlot,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::BoxPlot, ChartKind::BarPlot, ChartKind::LinePlot];

    /// Target identifier, also used as the output file stem.
    pub fn id(&self) -> &'static str {
        match self {
            ChartKind::BoxPlot => "boxplot",
            ChartKind::BarPlot => "barplot",
            ChartKind::LinePlot => "lineplot",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Output encoding of a rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ChartFormat {
    #[default]
    Svg,
    Png,
}

impl ChartFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ChartFormat::Svg => "svg",
            ChartFormat::Png => "png",
        }
    }
}

/// Aggregated records ready to be drawn, one variant per chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    BoxPlot(Vec<PlatformSummary>),
    BarPlot(Vec<AverageLikes>),
    LinePlot(Vec<DailyAverage>),
}

impl ChartData {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartData::BoxPlot(_) => ChartKind::BoxPlot,
            ChartData::BarPlot(_) => ChartKind::BarPlot,
            ChartData::LinePlot(_) => ChartKind::LinePlot,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ChartData::BoxPlot(records) => records.len(),
            ChartData::BarPlot(records) => records.len(),
            ChartData::LinePlot(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
