//! Query plans extracted from natural-language questions

use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// The reduction a plan asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationKind {
    Sum,
    Count,
    Average,
    #[serde(rename = "groupby")]
    GroupBy,
    #[default]
    None,
}

impl AggregationKind {
    /// Parse the wire token used in completion responses.
    pub fn parse_token(token: &str) -> Option<Self> {
        match token {
            "sum" => Some(AggregationKind::Sum),
            "count" => Some(AggregationKind::Count),
            "average" => Some(AggregationKind::Average),
            "groupby" => Some(AggregationKind::GroupBy),
            "none" => Some(AggregationKind::None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationKind::Sum => "sum",
            AggregationKind::Count => "count",
            AggregationKind::Average => "average",
            AggregationKind::GroupBy => "groupby",
            AggregationKind::None => "none",
        }
    }

    /// How many plan columns the aggregation engine needs: a grouping
    /// column, plus a value column for the numeric kinds.
    pub fn required_columns(&self) -> usize {
        match self {
            AggregationKind::Sum | AggregationKind::Average | AggregationKind::GroupBy => 2,
            AggregationKind::Count => 1,
            AggregationKind::None => 0,
        }
    }
}

/// Structured intent for one user question. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPlan {
    /// Free-text restatement of what the question asks for.
    pub intent: String,
    /// Columns the answer needs, in the order the reduction uses them.
    pub needed_columns: Vec<String>,
    pub aggregation: AggregationKind,
    pub wants_visualization: bool,
}

impl QueryPlan {
    /// Columns the plan references that the schema does not have.
    pub fn unknown_columns(&self, schema: &Schema) -> Vec<String> {
        self.needed_columns
            .iter()
            .filter(|name| !schema.contains(name))
            .cloned()
            .collect()
    }
}
