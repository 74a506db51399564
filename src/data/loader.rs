//! CSV Data Loader Module
//! Handles CSV file loading and row extraction using Polars.

use super::processor::{
    CleanRows, DataProcessor, MalformedRowPolicy, RawRecord, RowError, DATE_COL, LIKES_COL,
    PLATFORM_COL, POST_TYPE_COL, REQUIRED_COLUMNS,
};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Malformed row: {0}")]
    MalformedRow(#[from] RowError),
    #[error("No data loaded")]
    NoData,
}

/// Handles CSV file loading with Polars.
pub struct DataLoader {
    df: Option<DataFrame>,
    policy: MalformedRowPolicy,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(MalformedRowPolicy::default())
    }
}

impl DataLoader {
    pub fn new(policy: MalformedRowPolicy) -> Self {
        Self { df: None, policy }
    }

    /// Load a CSV file using Polars. Every column is read as text so that
    /// numeric and date coercion stays under our control.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        for required in REQUIRED_COLUMNS {
            if df.column(required).is_err() {
                return Err(LoaderError::MissingColumn(required.to_string()));
            }
        }

        debug!(rows = df.height(), columns = df.width(), "csv parsed");
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Convert the loaded frame into validated post rows, applying the
    /// malformed-row policy.
    pub fn posts(&self) -> Result<CleanRows, LoaderError> {
        let df = self.df.as_ref().ok_or(LoaderError::NoData)?;

        let platform = Self::text_column(df, PLATFORM_COL)?;
        let post_type = Self::text_column(df, POST_TYPE_COL)?;
        let date = Self::text_column(df, DATE_COL)?;
        let likes = Self::text_column(df, LIKES_COL)?;

        // Record numbers count the header as 1. They match file lines unless a
        // quoted field spans several lines.
        let mut blank = 0;
        let records = (0..df.height())
            .map(|i| {
                (
                    i + 2,
                    RawRecord {
                        platform: platform.get(i),
                        post_type: post_type.get(i),
                        date: date.get(i),
                        likes: likes.get(i),
                    },
                )
            })
            .filter(|(_, raw)| {
                let keep = !raw.is_blank();
                if !keep {
                    blank += 1;
                }
                keep
            });

        let clean = DataProcessor::clean_rows(records, self.policy)?;
        if blank > 0 {
            debug!(blank, "ignored blank lines");
        }
        info!(
            rows = clean.rows.len(),
            rejected = clean.rejected,
            "posts loaded"
        );
        Ok(clean)
    }

    fn text_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked, LoaderError> {
        let column = df
            .column(name)
            .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
        Ok(column.as_materialized_series().str()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn load_posts(path: &Path, policy: MalformedRowPolicy) -> Result<CleanRows, LoaderError> {
        let mut loader = DataLoader::new(policy);
        loader.load_csv(path)?;
        loader.posts()
    }

    const SAMPLE: &str = "\
Platform,PostType,Date,Likes
Instagram,Image,3/1/2024 (Friday),120
Twitter,Link,3/1/2024 (Friday),45
Instagram,Video,3/2/2024 (Saturday),300
";

    #[test]
    fn test_load_sample_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts.csv");
        fs::write(&path, SAMPLE).unwrap();

        let mut loader = DataLoader::default();
        loader.load_csv(&path).unwrap();
        assert_eq!(loader.get_row_count(), 3);
        assert_eq!(loader.get_columns(), vec!["Platform", "PostType", "Date", "Likes"]);

        let clean = loader.posts().unwrap();
        assert_eq!(clean.rejected, 0);
        assert_eq!(clean.rows[2].platform, "Instagram");
        assert_eq!(clean.rows[2].post_type, "Video");
        assert_eq!(clean.rows[2].likes, 300.0);
        assert_eq!(clean.rows[2].date_label, "3/2/2024 (Saturday)");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.csv");

        let err = load_posts(&path, MalformedRowPolicy::Fail).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(p) if p == path));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts.csv");
        fs::write(&path, "Platform,PostType,Date\nA,photo,2024-01-01\n").unwrap();

        let err = load_posts(&path, MalformedRowPolicy::Fail).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(c) if c == "Likes"));
    }

    #[test]
    fn test_malformed_rows_follow_policy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts.csv");
        fs::write(
            &path,
            "Platform,PostType,Date,Likes\nA,photo,2024-01-01,10\nA,photo,2024-01-02,ten\n",
        )
        .unwrap();

        let err = load_posts(&path, MalformedRowPolicy::Fail).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::MalformedRow(RowError::InvalidLikes { line: 3, .. })
        ));

        let clean = load_posts(&path, MalformedRowPolicy::Skip).unwrap();
        assert_eq!(clean.rows.len(), 1);
        assert_eq!(clean.rejected, 1);
    }

    #[test]
    fn test_blank_lines_are_not_rows() {
        let dir = tempdir().unwrap();
        let trailing = dir.path().join("trailing.csv");
        fs::write(
            &trailing,
            "Platform,PostType,Date,Likes\nA,photo,2024-01-01,10\nA,photo,2024-01-02,12\n\n",
        )
        .unwrap();
        let interior = dir.path().join("interior.csv");
        fs::write(
            &interior,
            "Platform,PostType,Date,Likes\nA,photo,2024-01-01,10\n\nA,photo,2024-01-02,12\n",
        )
        .unwrap();

        for path in [&trailing, &interior] {
            for policy in [MalformedRowPolicy::Fail, MalformedRowPolicy::Skip] {
                let clean = load_posts(path, policy).unwrap();
                assert_eq!(clean.rows.len(), 2, "{} {policy:?}", path.display());
                assert_eq!(clean.rejected, 0, "{} {policy:?}", path.display());
            }
        }
    }

    #[test]
    fn test_partially_empty_row_is_still_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts.csv");
        fs::write(&path, "Platform,PostType,Date,Likes\nA,photo,2024-01-01,10\n,,,7\n").unwrap();

        let err = load_posts(&path, MalformedRowPolicy::Fail).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::MalformedRow(RowError::MissingField { line: 3, field: "Platform" })
        ));
    }

    #[test]
    fn test_record_numbers_count_records_not_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posts.csv");
        fs::write(
            &path,
            concat!(
                "Platform,PostType,Date,Likes\n",
                "\"Insta\ngram\",Image,2024-01-01,10\n",
                "A,photo,2024-01-02,lots\n",
            ),
        )
        .unwrap();

        let err = load_posts(&path, MalformedRowPolicy::Fail).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::MalformedRow(RowError::InvalidLikes { line: 3, .. })
        ));
    }

    #[test]
    fn test_posts_before_load_is_an_error() {
        let loader = DataLoader::default();
        assert!(matches!(loader.posts(), Err(LoaderError::NoData)));
    }
}
