//! Core types for the table question-answering pipeline
//!
//! This crate provides the shared vocabulary used by every stage of the
//! pipeline: raw rows and cell values, inferred schemas, ingested tables,
//! query plans, and the external text-completion capability.

pub mod completion;
pub mod dates;
pub mod plan;
pub mod schema;
pub mod store;
pub mod table;
pub mod value;

// Re-export commonly used types
pub use completion::{CompletionError, TextCompleter};
pub use plan::{AggregationKind, QueryPlan};
pub use schema::{Column, ColumnType, Schema};
pub use store::TableStore;
pub use table::{Table, TableId};
pub use value::{coerce_number, display_string, extract, Row};
