use std::path::{Path, PathBuf};

use thiserror::Error;

/// Low-level cause behind a [`LoadError::StorageUnavailable`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// Store exists but its columns do not match the documented layout.
    #[error("{0}")]
    Schema(String),
}

/// Loader failure taxonomy.
///
/// Bad-key failures (`UnknownStation`, `NoPartitionForYear`) are recoverable
/// by prompting for a different input; the other two abort the render cycle.
/// Failures are never retried and never memoized.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Backing store is missing or corrupt. Fatal to the current render.
    #[error("storage unavailable: {path}: {source}")]
    StorageUnavailable { path: PathBuf, source: StoreError },

    /// No backing files exist for this station identifier.
    #[error("unknown weather station {0:?}")]
    UnknownStation(String),

    /// The hexagon-band store has no partition file for this year.
    #[error("no hexagon partition for year {0}")]
    NoPartitionForYear(i32),

    /// The histogram table must hold exactly one row per (year, doy);
    /// `found > 1` means the upstream table is corrupt.
    #[error("histogram table has {found} rows for {year} doy {doy}, expected exactly one")]
    NoHistogramForDate { year: i32, doy: u16, found: usize },
}

impl LoadError {
    /// Wrap a low-level store failure with the path it occurred on.
    pub fn storage(path: &Path, source: impl Into<StoreError>) -> Self {
        LoadError::StorageUnavailable {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}
