//! Social Charts - static engagement charts from a CSV of social-media posts
//!
//! Reads a post table and renders a likes box plot per platform, a grouped bar
//! chart of average likes per platform and post type, and a line chart of
//! average likes per day.

mod charts;
mod config;
mod data;
mod export;
mod logging;
mod pipeline;
mod stats;

use anyhow::{Context, Result};
use charts::{ChartFormat, ChartKind};
use clap::{ArgAction, Parser};
use config::RunConfig;
use data::MalformedRowPolicy;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "social_charts")]
#[command(version)]
#[command(
    about = "Render box, bar and line charts of post likes from a CSV file",
    long_about = None
)]
struct Cli {
    /// CSV file with Platform, PostType, Date and Likes columns
    #[arg(value_name = "INPUT", default_value = "socialMedia.csv")]
    input: PathBuf,

    /// Directory the charts are written to
    #[arg(short, long, value_name = "DIR", default_value = "charts")]
    output_dir: PathBuf,

    /// Output image format
    #[arg(short, long, value_enum, default_value_t = ChartFormat::Svg)]
    format: ChartFormat,

    /// Chart to render; repeat for several. Defaults to all three
    #[arg(short, long = "chart", value_enum, value_name = "ID")]
    charts: Vec<ChartKind>,

    /// What to do with rows whose Likes or Date cannot be parsed
    #[arg(long, value_enum, default_value_t = MalformedRowPolicy::Fail)]
    on_malformed: MalformedRowPolicy,

    /// Also write the aggregated records to this JSON file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Open each chart with the system viewer when done
    #[arg(long, action = ArgAction::SetTrue)]
    open: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        Self {
            input: cli.input,
            output_dir: cli.output_dir,
            format: cli.format,
            charts: cli.charts,
            policy: cli.on_malformed,
            summary: cli.summary,
            open: cli.open,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let config = RunConfig::from(cli)
        .validate()
        .context("Invalid arguments")?;

    let report = pipeline::run(&config)?;

    info!(
        charts = report.charts.len(),
        output_dir = %config.output_dir.display(),
        "done"
    );
    for path in &report.charts {
        println!("{}", path.display());
    }
    if let Some(summary) = &report.summary {
        println!("{}", summary.display());
    }

    Ok(())
}
