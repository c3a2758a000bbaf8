//! Low-level Parquet column building.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use kcs_pipeline::SelectionTable;
use kcs_segments::{Season, SegmentMeans, Variable};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::error::IoError;
use crate::parquet_read::means_columns;

fn to_u32(value: usize, what: &str) -> Result<u32, IoError> {
    u32::try_from(value).map_err(|_| IoError::validation(format!("{what} {value} exceeds u32")))
}

/// Builds the Arrow schema for a selection table with `n_segments`
/// segment columns per period.
///
/// Columns: `row`, `control_seg_0..n`, `control_penalty`,
/// `future_seg_0..n`, `future_penalty`, all `UInt32`.
pub(crate) fn selection_schema(n_segments: usize) -> Schema {
    let mut fields = vec![Field::new("row", DataType::UInt32, false)];
    for period in ["control", "future"] {
        for s in 0..n_segments {
            fields.push(Field::new(
                format!("{period}_seg_{s}"),
                DataType::UInt32,
                false,
            ));
        }
        fields.push(Field::new(
            format!("{period}_penalty"),
            DataType::UInt32,
            false,
        ));
    }
    Schema::new(fields)
}

/// Converts a [`SelectionTable`] into one [`RecordBatch`] matching
/// [`selection_schema`].
pub(crate) fn selection_to_record_batch(
    table: &SelectionTable,
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let n_segments = table.n_segments();
    let rows = table.rows();

    let mut row_col = Vec::with_capacity(rows.len());
    let mut control_cols = vec![Vec::with_capacity(rows.len()); n_segments];
    let mut future_cols = vec![Vec::with_capacity(rows.len()); n_segments];
    let mut control_penalty = Vec::with_capacity(rows.len());
    let mut future_penalty = Vec::with_capacity(rows.len());

    for r in rows {
        if r.control.len() != n_segments || r.future.len() != n_segments {
            return Err(IoError::validation(format!(
                "row {}: expected {n_segments} segments per period",
                r.row
            )));
        }
        row_col.push(to_u32(r.row, "row")?);
        for (s, &m) in r.control.members().iter().enumerate() {
            control_cols[s].push(to_u32(m, "member")?);
        }
        for (s, &m) in r.future.members().iter().enumerate() {
            future_cols[s].push(to_u32(m, "member")?);
        }
        control_penalty.push(r.control_penalty);
        future_penalty.push(r.future_penalty);
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(3 + 2 * n_segments);
    columns.push(Arc::new(UInt32Array::from(row_col)));
    for col in control_cols {
        columns.push(Arc::new(UInt32Array::from(col)));
    }
    columns.push(Arc::new(UInt32Array::from(control_penalty)));
    for col in future_cols {
        columns.push(Arc::new(UInt32Array::from(col)));
    }
    columns.push(Arc::new(UInt32Array::from(future_penalty)));

    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Builds the long-format Arrow schema for seasonal-mean tables.
pub(crate) fn means_schema() -> Schema {
    Schema::new(
        means_columns()
            .into_iter()
            .map(|(name, data_type)| Field::new(name, data_type, false))
            .collect::<Vec<_>>(),
    )
}

/// Flattens named tables into one long-format [`RecordBatch`]. Missing
/// entries are skipped.
pub(crate) fn means_to_record_batch(
    periods: &BTreeMap<String, SegmentMeans>,
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let mut period_col = Vec::new();
    let mut member_col = Vec::new();
    let mut segment_col = Vec::new();
    let mut season_col = Vec::new();
    let mut variable_col = Vec::new();
    let mut value_col = Vec::new();

    for (name, means) in periods {
        for member in 0..means.n_members() {
            for segment in 0..means.n_segments() {
                for season in Season::ALL {
                    for variable in Variable::ALL {
                        let Some(value) = means.get(member, segment, season, variable) else {
                            continue;
                        };
                        period_col.push(name.as_str());
                        member_col.push(to_u32(member, "member")?);
                        segment_col.push(to_u32(segment, "segment")?);
                        season_col.push(season.label());
                        variable_col.push(variable.short_name());
                        value_col.push(value);
                    }
                }
            }
        }
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(period_col)),
        Arc::new(UInt32Array::from(member_col)),
        Arc::new(UInt32Array::from(segment_col)),
        Arc::new(StringArray::from(season_col)),
        Arc::new(StringArray::from(variable_col)),
        Arc::new(Float64Array::from(value_col)),
    ];
    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Writes a sequence of [`RecordBatch`]es to a Parquet file at `path`.
///
/// # Errors
///
/// Returns [`IoError::Parquet`] if file creation, batch writing, or file
/// finalisation fails.
pub(crate) fn write_batches(
    path: &Path,
    batches: &[RecordBatch],
    schema: &Schema,
    props: WriterProperties,
) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Parquet {
        reason: format!("{}: {e}", path.display()),
    })?;
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))?;

    for batch in batches {
        writer.write(batch)?;
    }

    writer.close()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_schema_columns() {
        let schema = selection_schema(2);
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(
            names,
            vec![
                "row",
                "control_seg_0",
                "control_seg_1",
                "control_penalty",
                "future_seg_0",
                "future_seg_1",
                "future_penalty",
            ]
        );
    }

    #[test]
    fn means_batch_skips_missing_entries() {
        let mut builder = SegmentMeans::builder(2, 1).unwrap();
        builder.insert(0, 0, Season::Djf, Variable::Pr, 1.5).unwrap();
        builder.insert(1, 0, Season::Jja, Variable::Tas, 18.0).unwrap();
        let mut periods = BTreeMap::new();
        periods.insert("control".to_string(), builder.build());

        let schema = means_schema();
        let batch = means_to_record_batch(&periods, &schema).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 6);
    }

    #[test]
    fn to_u32_rejects_large_values() {
        assert_eq!(to_u32(7, "member").unwrap(), 7);
        assert!(to_u32(usize::MAX, "member").is_err());
    }
}
