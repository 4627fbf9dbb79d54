//! Report export adapters

pub mod csv_writer;

pub use csv_writer::{write_table, CsvReportWriter};
