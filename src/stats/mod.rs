//! Stats module - grouping and descriptive statistics

mod calculator;
mod rollup;

pub use calculator::FiveNumberSummary;
pub use rollup::{
    average_likes_by_date, average_likes_by_platform_and_type, likes_by_platform, AverageLikes,
    DailyAverage, PlatformSummary,
};
