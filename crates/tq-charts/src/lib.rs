//! Chart selection and renderer-agnostic chart payloads

pub mod select;
pub mod spec;

// Re-exports
pub use select::{select_visualization, ChartKind, ChartSelection, FieldMapping};
pub use spec::{generate_spec, CategoryPoint, ChartData, ChartSpec, LinePoint, ScatterPoint, EMPTY_NOTE};
