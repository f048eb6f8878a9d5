//! Ingested tables

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::Schema;
use crate::value::Row;

/// Opaque identifier for an ingested table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableId(Uuid);

impl TableId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TableId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An in-memory table: rows plus the schema inferred at ingestion.
///
/// Read-only after creation; every pipeline stage works on snapshots of
/// `rows` and never writes back.
#[derive(Debug, Clone)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub schema: Schema,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>, schema: Schema, rows: Vec<Row>) -> Self {
        Self {
            id: TableId::new(),
            name: name.into(),
            schema,
            rows,
        }
    }

    /// The first `limit` rows, used as prompt preview context.
    pub fn preview(&self, limit: usize) -> &[Row] {
        &self.rows[..limit.min(self.rows.len())]
    }
}
