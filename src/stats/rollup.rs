//! Grouping and per-group reductions for the three charts.
//!
//! Groups are kept in the order their key is first seen in the input, so the
//! category order of every chart follows the file.

use super::calculator::{FiveNumberSummary, StatsCalculator};
use crate::data::PostRow;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// One group of rows sharing a key.
#[derive(Debug, Clone)]
pub struct Group<'a, K> {
    pub key: K,
    pub rows: Vec<&'a PostRow>,
}

impl<K> Group<'_, K> {
    pub fn likes(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.likes).collect()
    }
}

/// Likes distribution of one platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformSummary {
    pub platform: String,
    pub count: usize,
    #[serde(flatten)]
    pub summary: FiveNumberSummary,
}

/// Mean likes of one (platform, post type) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageLikes {
    pub platform: String,
    pub post_type: String,
    pub count: usize,
    pub avg_likes: f64,
}

/// Mean likes of one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAverage {
    pub date: NaiveDate,
    pub label: String,
    pub count: usize,
    pub avg_likes: f64,
}

/// Partition `rows` by `key`, preserving first-seen key order.
pub fn group_by<'a, K, F>(rows: impl IntoIterator<Item = &'a PostRow>, key: F) -> Vec<Group<'a, K>>
where
    K: Eq + Hash + Clone,
    F: Fn(&PostRow) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Group<'a, K>> = Vec::new();

    for row in rows {
        let k = key(row);
        match index.get(&k) {
            Some(&slot) => groups[slot].rows.push(row),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push(Group {
                    key: k,
                    rows: vec![row],
                });
            }
        }
    }

    groups
}

/// Five-number summary of likes per platform.
pub fn likes_by_platform(rows: &[PostRow]) -> Vec<PlatformSummary> {
    group_by(rows, |row| row.platform.clone())
        .into_iter()
        .filter_map(|group| {
            let summary = StatsCalculator::five_number_summary(&group.likes())?;
            Some(PlatformSummary {
                platform: group.key,
                count: group.rows.len(),
                summary,
            })
        })
        .collect()
}

/// Mean likes per platform, then per post type within the platform,
/// flattened to one record per pair that occurs in the data.
pub fn average_likes_by_platform_and_type(rows: &[PostRow]) -> Vec<AverageLikes> {
    let mut out = Vec::new();

    for platform in group_by(rows, |row| row.platform.clone()) {
        for post_type in group_by(platform.rows.iter().copied(), |row| row.post_type.clone()) {
            if let Some(avg_likes) = StatsCalculator::rounded_mean(&post_type.likes()) {
                out.push(AverageLikes {
                    platform: platform.key.clone(),
                    post_type: post_type.key,
                    count: post_type.rows.len(),
                    avg_likes,
                });
            }
        }
    }

    out
}

/// Mean likes per calendar day, ascending by date.
pub fn average_likes_by_date(rows: &[PostRow]) -> Vec<DailyAverage> {
    let mut series: Vec<DailyAverage> = group_by(rows, |row| row.date)
        .into_iter()
        .filter_map(|group| {
            let avg_likes = StatsCalculator::rounded_mean(&group.likes())?;
            Some(DailyAverage {
                date: group.key,
                label: group.rows[0].date_label.clone(),
                count: group.rows.len(),
                avg_likes,
            })
        })
        .collect();

    // Stable, so equal dates keep first-seen order.
    series.sort_by_key(|day| day.date);
    series
}
