//! Data Processor Module
//! Turns raw CSV text fields into validated post rows.

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

pub const PLATFORM_COL: &str = "Platform";
pub const POST_TYPE_COL: &str = "PostType";
pub const DATE_COL: &str = "Date";
pub const LIKES_COL: &str = "Likes";

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = [PLATFORM_COL, POST_TYPE_COL, DATE_COL, LIKES_COL];

/// Date layouts accepted in the `Date` column, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Validation failure for one record. `line` is the record number with the
/// header as 1, which is the file line unless a quoted field spans lines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("line {line}: missing value for column {field}")]
    MissingField { line: usize, field: &'static str },
    #[error("line {line}: Likes value {value:?} is not a finite number")]
    InvalidLikes { line: usize, value: String },
    #[error("line {line}: Date value {value:?} is not a recognised calendar date")]
    InvalidDate { line: usize, value: String },
}

/// What to do with a row whose fields cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MalformedRowPolicy {
    /// Abort the whole run on the first bad row
    #[default]
    Fail,
    /// Drop the row, log a warning and keep going
    Skip,
}

/// One post, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRow {
    pub platform: String,
    pub post_type: String,
    pub date: NaiveDate,
    /// Date text exactly as it appeared in the file
    pub date_label: String,
    pub likes: f64,
}

/// Unparsed field text of one CSV record. `None` means the cell was empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawRecord<'a> {
    pub platform: Option<&'a str>,
    pub post_type: Option<&'a str>,
    pub date: Option<&'a str>,
    pub likes: Option<&'a str>,
}

impl RawRecord<'_> {
    /// True for an empty line, where the CSV reader yields no field text.
    pub fn is_blank(&self) -> bool {
        [self.platform, self.post_type, self.date, self.likes]
            .iter()
            .all(|field| field.map_or(true, |text| text.trim().is_empty()))
    }
}

/// Rows that survived validation plus the number that were dropped.
#[derive(Debug, Clone, Default)]
pub struct CleanRows {
    pub rows: Vec<PostRow>,
    pub rejected: usize,
}

/// Handles field coercion and malformed-row policy.
pub struct DataProcessor;

impl DataProcessor {
    /// Validate a batch of `(line number, record)` pairs.
    pub fn clean_rows<'a, I>(records: I, policy: MalformedRowPolicy) -> Result<CleanRows, RowError>
    where
        I: IntoIterator<Item = (usize, RawRecord<'a>)>,
    {
        let mut clean = CleanRows::default();

        for (line, raw) in records {
            match Self::parse_row(line, &raw) {
                Ok(row) => clean.rows.push(row),
                Err(err) => match policy {
                    MalformedRowPolicy::Fail => return Err(err),
                    MalformedRowPolicy::Skip => {
                        warn!(%err, "skipping malformed row");
                        clean.rejected += 1;
                    }
                },
            }
        }

        Ok(clean)
    }

    /// Parse a single record numbered `line`.
    pub fn parse_row(line: usize, raw: &RawRecord<'_>) -> Result<PostRow, RowError> {
        let platform = Self::required(line, raw.platform, PLATFORM_COL)?;
        let post_type = Self::required(line, raw.post_type, POST_TYPE_COL)?;
        let date_text = Self::required(line, raw.date, DATE_COL)?;
        let likes_text = Self::required(line, raw.likes, LIKES_COL)?;

        let likes = Self::parse_likes(likes_text).ok_or_else(|| RowError::InvalidLikes {
            line,
            value: likes_text.to_string(),
        })?;
        let date = Self::parse_date(date_text).ok_or_else(|| RowError::InvalidDate {
            line,
            value: date_text.to_string(),
        })?;

        Ok(PostRow {
            platform: platform.to_string(),
            post_type: post_type.to_string(),
            date,
            date_label: date_text.to_string(),
            likes,
        })
    }

    /// Parse a like count. Rejects anything that is not a finite number.
    pub fn parse_likes(text: &str) -> Option<f64> {
        text.trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    }

    /// Parse a calendar date, ignoring a trailing parenthesised note such as
    /// `3/1/2024 (Friday)`.
    pub fn parse_date(text: &str) -> Option<NaiveDate> {
        let without_note = match text.find('(') {
            Some(idx) => &text[..idx],
            None => text,
        };
        let trimmed = without_note.trim();

        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
    }

    fn required<'a>(
        line: usize,
        value: Option<&'a str>,
        field: &'static str,
    ) -> Result<&'a str, RowError> {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(RowError::MissingField { line, field })
    }
}
