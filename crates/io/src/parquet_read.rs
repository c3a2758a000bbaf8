//! Low-level Parquet reading and column extraction.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use arrow::array::{Array, AsArray, RecordBatch};
use arrow::datatypes::{DataType, Float64Type, UInt32Type};
use kcs_segments::{Season, SegmentMeans, Variable};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::IoError;

/// Key of one long-format row within a period.
type EntryKey = (usize, usize, Season, Variable);

/// Expected `(name, type)` of each column of the segment-means schema.
pub(crate) fn means_columns() -> [(&'static str, DataType); 6] {
    [
        ("period", DataType::Utf8),
        ("member", DataType::UInt32),
        ("segment", DataType::UInt32),
        ("season", DataType::Utf8),
        ("variable", DataType::Utf8),
        ("value", DataType::Float64),
    ]
}

/// Reads all record batches from a Parquet file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist, or
/// [`IoError::Parquet`] if the file cannot be opened or read.
pub(crate) fn read_batches(path: &Path) -> Result<Vec<RecordBatch>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;

    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(batches)
}

/// Checks column count, names and types against [`means_columns`].
///
/// # Errors
///
/// Returns [`IoError::Validation`] listing every mismatch.
pub(crate) fn validate_schema(batch: &RecordBatch) -> Result<(), IoError> {
    let expected = means_columns();
    let num_cols = batch.num_columns();
    if num_cols != expected.len() {
        return Err(IoError::validation(format!(
            "expected {} columns, got {num_cols}",
            expected.len()
        )));
    }

    let schema = batch.schema();
    let mismatches: Vec<String> = expected
        .iter()
        .enumerate()
        .filter_map(|(i, (name, data_type))| {
            let field = schema.field(i);
            if field.name().as_str() != *name {
                Some(format!("column {i}: expected '{name}', got '{}'", field.name()))
            } else if field.data_type() != data_type {
                Some(format!(
                    "column '{name}': expected {data_type}, got {}",
                    field.data_type()
                ))
            } else {
                None
            }
        })
        .collect();

    if !mismatches.is_empty() {
        return Err(IoError::Validation {
            count: mismatches.len(),
            details: mismatches.join("; "),
        });
    }
    Ok(())
}

/// Groups long-format rows by period and builds one [`SegmentMeans`] per
/// period.
///
/// Table dimensions are `max(member) + 1` by `max(segment) + 1` of each
/// period; entries that never appear stay missing.
///
/// # Errors
///
/// Returns [`IoError::Validation`] for null cells, unknown season or
/// variable labels, duplicate keys or an empty file, and
/// [`IoError::Segments`] for non-finite values.
pub(crate) fn group_by_period(
    batches: &[RecordBatch],
) -> Result<BTreeMap<String, SegmentMeans>, IoError> {
    let mut periods: BTreeMap<String, BTreeMap<EntryKey, f64>> = BTreeMap::new();
    let mut problems: Vec<String> = Vec::new();
    let mut row_offset = 0;

    for batch in batches {
        let period_col = batch.column(0).as_string::<i32>();
        let member_col = batch.column(1).as_primitive::<UInt32Type>();
        let segment_col = batch.column(2).as_primitive::<UInt32Type>();
        let season_col = batch.column(3).as_string::<i32>();
        let variable_col = batch.column(4).as_string::<i32>();
        let value_col = batch.column(5).as_primitive::<Float64Type>();

        for i in 0..batch.num_rows() {
            let row = row_offset + i;
            if batch.columns().iter().any(|c| c.is_null(i)) {
                problems.push(format!("row {row}: null cell"));
                continue;
            }
            let season: Season = match season_col.value(i).parse() {
                Ok(s) => s,
                Err(e) => {
                    problems.push(format!("row {row}: {e}"));
                    continue;
                }
            };
            let variable: Variable = match variable_col.value(i).parse() {
                Ok(v) => v,
                Err(e) => {
                    problems.push(format!("row {row}: {e}"));
                    continue;
                }
            };
            let period = period_col.value(i);
            let key = (
                member_col.value(i) as usize,
                segment_col.value(i) as usize,
                season,
                variable,
            );
            let entries = periods.entry(period.to_string()).or_default();
            if entries.insert(key, value_col.value(i)).is_some() {
                problems.push(format!(
                    "row {row}: duplicate entry for period {period:?}, member {}, segment {}, {variable} {season}",
                    key.0, key.1
                ));
            }
        }
        row_offset += batch.num_rows();
    }

    if !problems.is_empty() {
        return Err(IoError::Validation {
            count: problems.len(),
            details: problems.join("; "),
        });
    }
    if periods.is_empty() {
        return Err(IoError::validation("input contains no rows"));
    }

    periods
        .into_iter()
        .map(|(name, entries)| -> Result<(String, SegmentMeans), IoError> {
            let n_members = dense_extent(&name, "member", entries.keys().map(|k| k.0))?;
            let n_segments = dense_extent(&name, "segment", entries.keys().map(|k| k.1))?;
            let mut builder = SegmentMeans::builder(n_members, n_segments)?;
            for ((member, segment, season, variable), value) in entries {
                builder.insert(member, segment, season, variable, value)?;
            }
            Ok((name, builder.build()))
        })
        .collect()
}

/// Returns `max + 1` of `indices`, requiring every index below it to occur.
fn dense_extent(
    period: &str,
    axis: &str,
    indices: impl Iterator<Item = usize>,
) -> Result<usize, IoError> {
    let seen: BTreeSet<usize> = indices.collect();
    let extent = seen.last().map_or(0, |&max| max.saturating_add(1));
    if seen.len() != extent {
        return Err(IoError::validation(format!(
            "period {period:?}: {axis} indices are not contiguous from 0 \
             ({} distinct, largest {})",
            seen.len(),
            extent.saturating_sub(1)
        )));
    }
    Ok(extent)
}
