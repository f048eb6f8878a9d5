//! Deterministic prompt construction

use std::fmt::Write;

use tq_core::{display_string, Row, Schema};

/// Rows of preview data embedded in the prompt.
pub const PREVIEW_ROWS: usize = 5;

/// Build the planning prompt for one question.
///
/// Everything here is deterministic: same question, schema, and preview
/// always produce byte-identical prompts, which keeps planner behavior
/// reproducible under a fixed completer.
pub fn build_prompt(question: &str, schema: &Schema, preview: &[Row]) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a data analyst. A table with the following columns is loaded:\n\n",
    );
    for column in &schema.columns {
        let samples = column
            .sample_values
            .iter()
            .map(display_string)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            prompt,
            "- {} ({}){}",
            column.name,
            column.column_type.as_str(),
            if samples.is_empty() {
                String::new()
            } else {
                format!(", e.g. {samples}")
            }
        );
    }
    let _ = writeln!(prompt, "\nTotal rows: {}", schema.row_count);

    if !preview.is_empty() {
        prompt.push_str("\nFirst rows:\n");
        for row in preview.iter().take(PREVIEW_ROWS) {
            let _ = writeln!(
                prompt,
                "{}",
                serde_json::to_string(row).unwrap_or_default()
            );
        }
    }

    let _ = writeln!(prompt, "\nQuestion: {question}");
    prompt.push_str(
        "\nRespond with a single JSON object and nothing else:\n\
         {\n\
         \x20 \"intent\": \"<what the question asks for>\",\n\
         \x20 \"neededColumns\": [\"<column name>\", ...],\n\
         \x20 \"aggregation\": \"sum\" | \"count\" | \"average\" | \"groupby\" | \"none\",\n\
         \x20 \"wantsVisualization\": true | false\n\
         }\n\
         For grouped reductions put the grouping column first and the value column second. \
         Use only column names that appear above.\n",
    );

    prompt
}
