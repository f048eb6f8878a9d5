//! Chart payload generation
//!
//! Transforms result rows into one of the normalized payload shapes the
//! renderer understands. Malformed cells degrade (default or drop); this
//! module never fails.

use serde::Serialize;
use serde_json::Value;
use tq_core::{coerce_number, dates, display_string, extract, Row};

use crate::select::{ChartKind, FieldMapping};

/// Marker attached to specs generated from zero rows.
pub const EMPTY_NOTE: &str = "no data available";

/// One bar or pie slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPoint {
    pub name: String,
    pub value: f64,
}

/// One line-chart point; x keeps its display form (dates come out
/// formatted, everything else as-is).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub x: String,
    pub y: f64,
}

/// One scatter point; both axes numeric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// Normalized chart rows, shaped per chart kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartData {
    Categories(Vec<CategoryPoint>),
    Line(Vec<LinePoint>),
    Scatter(Vec<ScatterPoint>),
    Rows(Vec<Row>),
}

impl ChartData {
    pub fn len(&self) -> usize {
        match self {
            ChartData::Categories(points) => points.len(),
            ChartData::Line(points) => points.len(),
            ChartData::Scatter(points) => points.len(),
            ChartData::Rows(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Renderer-agnostic chart payload: the entire contract with the
/// rendering consumer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub data: ChartData,
    pub mapping: FieldMapping,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

/// Shape result rows into a chart payload.
///
/// Empty input short-circuits to an explicit empty spec before any
/// per-kind transform runs; the data field is never absent.
pub fn generate_spec(kind: ChartKind, rows: &[Row], mapping: &FieldMapping) -> ChartSpec {
    if rows.is_empty() {
        return ChartSpec {
            kind,
            data: empty_data(kind),
            mapping: mapping.clone(),
            note: Some(EMPTY_NOTE),
        };
    }

    let data = match kind {
        ChartKind::Bar => ChartData::Categories(category_points(rows, mapping, false)),
        // Zero and negative slices are meaningless in a pie.
        ChartKind::Pie => ChartData::Categories(category_points(rows, mapping, true)),
        ChartKind::Line => ChartData::Line(line_points(rows, mapping)),
        ChartKind::Scatter => ChartData::Scatter(scatter_points(rows, mapping)),
        ChartKind::Table => ChartData::Rows(rows.to_vec()),
    };

    if data.is_empty() {
        tracing::debug!(kind = ?kind, "all rows dropped during chart shaping");
    }

    ChartSpec {
        kind,
        data,
        mapping: mapping.clone(),
        note: None,
    }
}

fn empty_data(kind: ChartKind) -> ChartData {
    match kind {
        ChartKind::Bar | ChartKind::Pie => ChartData::Categories(Vec::new()),
        ChartKind::Line => ChartData::Line(Vec::new()),
        ChartKind::Scatter => ChartData::Scatter(Vec::new()),
        ChartKind::Table => ChartData::Rows(Vec::new()),
    }
}

// Mappings of the wrong flavor still produce something sensible; the
// generator has no failure path.
fn name_value_fields(mapping: &FieldMapping) -> (&str, &str) {
    match mapping {
        FieldMapping::NameValue {
            name_field,
            value_field,
        } => (name_field, value_field),
        FieldMapping::Axes { x_axis, y_axis } => (x_axis, y_axis),
        FieldMapping::PassThrough => ("name", "value"),
    }
}

fn axis_fields(mapping: &FieldMapping) -> (&str, &str) {
    match mapping {
        FieldMapping::Axes { x_axis, y_axis } => (x_axis, y_axis),
        FieldMapping::NameValue {
            name_field,
            value_field,
        } => (name_field, value_field),
        FieldMapping::PassThrough => ("x", "y"),
    }
}

fn category_points(rows: &[Row], mapping: &FieldMapping, drop_nonpositive: bool) -> Vec<CategoryPoint> {
    let (name_field, value_field) = name_value_fields(mapping);
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| {
            // Missing cells default to 0; unparseable ones drop the row.
            let value = match extract(row, value_field) {
                None => 0.0,
                Some(raw) => coerce_number(raw)?,
            };
            if drop_nonpositive && value <= 0.0 {
                return None;
            }
            let name = extract(row, name_field)
                .map(display_string)
                .unwrap_or_else(|| format!("Item {}", index + 1));
            Some(CategoryPoint { name, value })
        })
        .collect()
}

fn line_points(rows: &[Row], mapping: &FieldMapping) -> Vec<LinePoint> {
    let (x_field, y_field) = axis_fields(mapping);
    rows.iter()
        .filter_map(|row| {
            let y = match extract(row, y_field) {
                None => 0.0,
                Some(raw) => coerce_number(raw)?,
            };
            let x = extract(row, x_field)
                .map(format_axis_value)
                .unwrap_or_default();
            Some(LinePoint { x, y })
        })
        .collect()
}

fn scatter_points(rows: &[Row], mapping: &FieldMapping) -> Vec<ScatterPoint> {
    let (x_field, y_field) = axis_fields(mapping);
    rows.iter()
        .filter_map(|row| {
            let x = extract(row, x_field).and_then(coerce_number)?;
            let y = extract(row, y_field).and_then(coerce_number)?;
            Some(ScatterPoint { x, y })
        })
        .collect()
}

/// Format a cell for the x-axis of a line chart: date strings render as
/// dates, everything else keeps its display form.
fn format_axis_value(value: &Value) -> String {
    if let Value::String(s) = value {
        if dates::looks_date_shaped(s) {
            if let Some(date) = dates::parse_date(s) {
                return dates::format_date(date);
            }
        }
    }
    display_string(value)
}
