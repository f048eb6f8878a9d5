//! Inferred column and schema definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Semantic type inferred for a column from sampled values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Date,
    Boolean,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
        }
    }
}

/// A single column as seen at ingestion time.
///
/// Immutable once the owning schema is built; `sample_values` keeps up to
/// three raw values for prompt context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub sample_values: Vec<Value>,
}

/// Ordered column definitions describing a table's shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Columns in source order.
    pub columns: Vec<Column>,
    pub row_count: usize,
}

impl Schema {
    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column(name).map(|c| c.column_type)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}
