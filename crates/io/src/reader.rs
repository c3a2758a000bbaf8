//! High-level Parquet reader for seasonal-mean tables.

use std::collections::BTreeMap;
use std::path::Path;

use kcs_segments::SegmentMeans;
use tracing::info;

use crate::error::IoError;
use crate::parquet_read;

/// Reads a long-format Parquet file of seasonal means into one
/// [`SegmentMeans`] per period name.
///
/// Expected columns: `period: Utf8`, `member: UInt32`, `segment: UInt32`,
/// `season: Utf8`, `variable: Utf8`, `value: Float64`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::FileNotFound`] | `path` does not exist |
/// | [`IoError::Parquet`] | the file cannot be decoded |
/// | [`IoError::Validation`] | wrong schema, bad labels, duplicates, nulls or no rows |
/// | [`IoError::Segments`] | non-finite values |
pub fn read_segment_means(path: &Path) -> Result<BTreeMap<String, SegmentMeans>, IoError> {
    let batches = parquet_read::read_batches(path)?;
    for batch in &batches {
        parquet_read::validate_schema(batch)?;
    }
    let periods = parquet_read::group_by_period(&batches)?;

    info!(
        path = %path.display(),
        periods = periods.len(),
        "segment means loaded"
    );
    Ok(periods)
}
