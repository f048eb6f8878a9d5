//! CSV-backed row source

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use serde_json::Value;
use tq_core::{Row, Table};

use crate::infer::SchemaInferencer;
use crate::DataError;

/// Loads a CSV file into an in-memory [`Table`] with an inferred schema.
///
/// Cells stay as raw strings (empty cells become null); the inferencer
/// decides what they mean. This is the whole ingestion path - once the
/// table exists it is never written again.
pub struct CsvSource;

impl CsvSource {
    pub async fn load(path: PathBuf) -> Result<Table, DataError> {
        tokio::task::spawn_blocking(move || Self::load_blocking(&path)).await?
    }

    fn load_blocking(path: &Path) -> Result<Table, DataError> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row = Row::new();
            for (name, field) in headers.iter().zip(record.iter()) {
                let value = if field.is_empty() {
                    Value::Null
                } else {
                    Value::String(field.to_string())
                };
                row.insert(name.to_string(), value);
            }
            rows.push(row);
        }

        let schema = SchemaInferencer::new().infer(&rows);
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("table")
            .to_string();

        tracing::info!(
            table = %name,
            rows = rows.len(),
            columns = schema.columns.len(),
            "loaded csv table"
        );

        Ok(Table::new(name, schema, rows))
    }
}
