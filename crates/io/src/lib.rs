//! # kcs-io
//!
//! Reads seasonal-mean tables from long-format Parquet and writes
//! per-scenario selection tables back to Parquet.

mod error;
mod parquet_read;
mod parquet_write;
mod reader;
mod writer;

pub use error::IoError;
pub use reader::read_segment_means;
pub use writer::{
    Compression, WriterConfig, selection_path, write_segment_means, write_selection_parquet,
};
