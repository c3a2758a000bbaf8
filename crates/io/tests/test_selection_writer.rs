//! Integration tests: selection tables written to Parquet.

use std::fs::File;

use arrow::array::AsArray;
use arrow::datatypes::{DataType, UInt32Type};
use kcs_io::{Compression, WriterConfig, selection_path, write_selection_parquet};
use kcs_pipeline::{SelectionRow, SelectionTable};
use kcs_segments::Combination;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

fn table() -> SelectionTable {
    let rows = (0..8)
        .map(|i| SelectionRow {
            row: i,
            control: Combination::new(vec![i % 3, (i + 1) % 3, 2]),
            control_penalty: 6,
            future: Combination::new(vec![(i + 2) % 3, 0, i % 3]),
            future_penalty: 5,
        })
        .collect();
    SelectionTable::new(rows)
}

#[test]
fn writes_expected_schema_and_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = selection_path(dir.path(), "WL");
    write_selection_parquet(&path, &table(), &WriterConfig::default()).unwrap();
    assert!(path.ends_with("WL.parquet"));

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
    assert_eq!(batches.len(), 1);
    let batch = &batches[0];

    let schema = batch.schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(
        names,
        vec![
            "row",
            "control_seg_0",
            "control_seg_1",
            "control_seg_2",
            "control_penalty",
            "future_seg_0",
            "future_seg_1",
            "future_seg_2",
            "future_penalty",
        ]
    );
    assert!(schema.fields().iter().all(|f| f.data_type() == &DataType::UInt32));
    assert_eq!(batch.num_rows(), 8);

    let col = |name: &str| {
        batch
            .column_by_name(name)
            .unwrap()
            .as_primitive::<UInt32Type>()
            .values()
            .to_vec()
    };
    assert_eq!(col("row"), (0..8).collect::<Vec<u32>>());
    assert_eq!(col("control_seg_0"), vec![0, 1, 2, 0, 1, 2, 0, 1]);
    assert_eq!(col("control_seg_2"), vec![2; 8]);
    assert_eq!(col("control_penalty"), vec![6; 8]);
    assert_eq!(col("future_seg_0"), vec![2, 0, 1, 2, 0, 1, 2, 0]);
    assert_eq!(col("future_penalty"), vec![5; 8]);
}

#[test]
fn zstd_output_is_readable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zstd.parquet");
    let config = WriterConfig::default().with_compression(Compression::Zstd);
    write_selection_parquet(&path, &table(), &config).unwrap();

    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap()).unwrap();
    assert_eq!(builder.metadata().file_metadata().num_rows(), 8);
}

#[test]
fn inconsistent_rows_are_rejected() {
    let mut rows: Vec<SelectionRow> = table().rows().to_vec();
    rows[3].future = Combination::new(vec![0, 1]);
    let dir = tempfile::tempdir().unwrap();
    let err = write_selection_parquet(
        &dir.path().join("bad.parquet"),
        &SelectionTable::new(rows),
        &WriterConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, kcs_io::IoError::Validation { .. }));
}
