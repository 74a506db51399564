//! Load -> aggregate -> render, once per requested chart.

use crate::charts::{ChartData, ChartKind, StaticChartRenderer};
use crate::config::RunConfig;
use crate::data::{DataLoader, PostRow};
use crate::export::SummaryReport;
use crate::stats::{average_likes_by_date, average_likes_by_platform_and_type, likes_by_platform};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Files produced by one run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub charts: Vec<PathBuf>,
    pub summary: Option<PathBuf>,
}

/// Reduce the rows to the records a chart draws.
pub fn aggregate(kind: ChartKind, rows: &[PostRow]) -> ChartData {
    match kind {
        ChartKind::BoxPlot => ChartData::BoxPlot(likes_by_platform(rows)),
        ChartKind::BarPlot => ChartData::BarPlot(average_likes_by_platform_and_type(rows)),
        ChartKind::LinePlot => ChartData::LinePlot(average_likes_by_date(rows)),
    }
}

pub fn run(config: &RunConfig) -> Result<RunReport> {
    info!(input = %config.input.display(), "loading posts");
    let mut loader = DataLoader::new(config.policy);
    loader
        .load_csv(&config.input)
        .with_context(|| format!("Failed to load {}", config.input.display()))?;
    debug!(
        columns = ?loader.get_columns(),
        rows = loader.get_row_count(),
        "csv read"
    );
    let posts = loader
        .posts()
        .with_context(|| format!("Failed to load {}", config.input.display()))?;

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    let charts: Vec<ChartData> = config
        .charts
        .iter()
        .map(|&kind| aggregate(kind, &posts.rows))
        .collect();

    let mut report = RunReport::default();
    for chart in &charts {
        info!(chart = %chart.kind(), records = chart.len(), "rendering");
        let path = StaticChartRenderer::write_chart(chart, config.format, &config.output_dir)
            .with_context(|| format!("Failed to render {}", chart.kind()))?;
        info!(path = %path.display(), "chart saved");

        if config.open {
            if let Err(err) = open::that(&path) {
                warn!(%err, path = %path.display(), "could not open chart");
            }
        }
        report.charts.push(path);
    }

    if let Some(summary_path) = &config.summary {
        let mut summary = SummaryReport::new(&config.input, posts.rows.len(), posts.rejected);
        for chart in &charts {
            summary.add(chart);
        }
        summary.write(summary_path)?;
        report.summary = Some(summary_path.clone());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartFormat;
    use crate::data::MalformedRowPolicy;
    use serde_json::Value;
    use tempfile::tempdir;

    const POSTS: &str = "\
Platform,PostType,Date,Likes
Instagram,Image,3/1/2024 (Friday),120
Instagram,Video,3/1/2024 (Friday),310
Twitter,Link,3/1/2024 (Friday),40
Facebook,Image,3/2/2024 (Saturday),85
Twitter,Video,3/2/2024 (Saturday),77
Instagram,Image,3/3/2024 (Sunday),150
Facebook,Link,3/3/2024 (Sunday),not-a-number
";

    fn config_for(dir: &std::path::Path) -> RunConfig {
        let input = dir.join("socialMedia.csv");
        fs::write(&input, POSTS).unwrap();
        RunConfig {
            input,
            output_dir: dir.join("out"),
            format: ChartFormat::Svg,
            policy: MalformedRowPolicy::Skip,
            summary: Some(dir.join("out").join("summary.json")),
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_run_renders_every_chart() {
        let dir = tempdir().unwrap();
        let config = config_for(dir.path());

        let report = run(&config).unwrap();

        let names: Vec<String> = report
            .charts
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["boxplot.svg", "barplot.svg", "lineplot.svg"]);
        assert!(report.charts.iter().all(|p| p.is_file()));

        let summary: Value =
            serde_json::from_str(&fs::read_to_string(report.summary.unwrap()).unwrap()).unwrap();
        assert_eq!(summary["rows"], 6);
        assert_eq!(summary["rejected_rows"], 1);
        assert_eq!(summary["boxplot"].as_array().map(Vec::len), Some(3));
        assert_eq!(summary["barplot"].as_array().map(Vec::len), Some(5));
        assert_eq!(summary["lineplot"][0]["label"], "3/1/2024 (Friday)");
        assert_eq!(summary["lineplot"][0]["avg_likes"], 156.67);
    }

    #[test]
    fn test_strict_policy_aborts_run() {
        let dir = tempdir().unwrap();
        let config = RunConfig {
            policy: MalformedRowPolicy::Fail,
            ..config_for(dir.path())
        };

        let err = run(&config).unwrap_err();
        assert!(format!("{err:#}").contains("line 8"));
        assert!(!dir.path().join("out").join("boxplot.svg").exists());
    }

    #[test]
    fn test_selected_charts_only() {
        let dir = tempdir().unwrap();
        let config = RunConfig {
            charts: vec![ChartKind::LinePlot],
            summary: None,
            ..config_for(dir.path())
        };

        let report = run(&config).unwrap();
        assert_eq!(report.charts, vec![dir.path().join("out").join("lineplot.svg")]);
        assert!(report.summary.is_none());
    }

    #[test]
    fn test_aggregate_matches_chart_kind() {
        for kind in ChartKind::ALL {
            assert_eq!(aggregate(kind, &[]).kind(), kind);
        }
    }
}
