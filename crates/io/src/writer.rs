//! High-level Parquet writer configuration and orchestration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use kcs_pipeline::SelectionTable;
use kcs_segments::SegmentMeans;
use parquet::file::properties::WriterProperties;
use tracing::debug;

use crate::error::IoError;
use crate::parquet_write;

/// Compression algorithm for Parquet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    /// Converts to the corresponding `parquet::basic::Compression` variant.
    fn to_parquet(self) -> Result<parquet::basic::Compression, IoError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => parquet::basic::Compression::ZSTD(parquet::basic::ZstdLevel::try_new(3)?),
        })
    }
}

/// Configuration for Parquet output.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    compression: Compression,
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Returns the compression algorithm.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Returns the maximum number of rows per row group.
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    fn validate(&self) -> Result<(), IoError> {
        if self.row_group_size == 0 {
            return Err(IoError::validation("row_group_size must be greater than 0"));
        }
        Ok(())
    }

    fn properties(&self) -> Result<WriterProperties, IoError> {
        self.validate()?;
        Ok(WriterProperties::builder()
            .set_compression(self.compression.to_parquet()?)
            .set_max_row_group_size(self.row_group_size)
            .build())
    }
}

/// Output path of a scenario's selection table: `<dir>/<scenario>.parquet`.
pub fn selection_path(output_dir: &Path, scenario: &str) -> PathBuf {
    output_dir.join(format!("{scenario}.parquet"))
}

/// Writes one scenario's selection table to Parquet.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the configuration or table is
/// inconsistent, or [`IoError::Parquet`] if writing fails.
pub fn write_selection_parquet(
    path: &Path,
    table: &SelectionTable,
    config: &WriterConfig,
) -> Result<(), IoError> {
    let props = config.properties()?;
    let schema = parquet_write::selection_schema(table.n_segments());
    let batch = parquet_write::selection_to_record_batch(table, &schema)?;
    parquet_write::write_batches(path, &[batch], &schema, props)?;
    debug!(path = %path.display(), rows = table.len(), "selection table written");
    Ok(())
}

/// Writes named seasonal-mean tables to a long-format Parquet file readable
/// by [`read_segment_means`](crate::read_segment_means).
///
/// # Errors
///
/// Returns [`IoError::Validation`] or [`IoError::Parquet`].
pub fn write_segment_means(
    path: &Path,
    periods: &BTreeMap<String, SegmentMeans>,
    config: &WriterConfig,
) -> Result<(), IoError> {
    let props = config.properties()?;
    let schema = parquet_write::means_schema();
    let batch = parquet_write::means_to_record_batch(periods, &schema)?;
    parquet_write::write_batches(path, &[batch], &schema, props)?;
    debug!(path = %path.display(), periods = periods.len(), "segment means written");
    Ok(())
}
