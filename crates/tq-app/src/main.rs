//! Demo CLI: ask a natural-language question of a CSV file
//!
//! The completion service is replayed from a file (see
//! [`completer::ScriptedCompleter`]), so runs are deterministic and
//! offline. Everything downstream of the response - validation,
//! aggregation, chart selection, payload generation - is the real
//! pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Arg, Command};
use tracing::info;

use tq_core::TableStore;
use tq_data::CsvSource;

mod completer;
mod pipeline;

use completer::ScriptedCompleter;
use pipeline::Pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let matches = Command::new("tq")
        .about("Ask questions of tabular data and get chart-ready answers")
        .arg(
            Arg::new("file")
                .required(true)
                .help("CSV file to load"),
        )
        .arg(
            Arg::new("question")
                .long("question")
                .short('q')
                .required(true)
                .help("Natural-language question to answer"),
        )
        .arg(
            Arg::new("response-file")
                .long("response-file")
                .required(true)
                .help("File holding the completion service's response for this question"),
        )
        .get_matches();

    let path = PathBuf::from(matches.get_one::<String>("file").expect("required arg"));
    let question = matches
        .get_one::<String>("question")
        .expect("required arg")
        .clone();
    let response_file = PathBuf::from(
        matches
            .get_one::<String>("response-file")
            .expect("required arg"),
    );

    let table = CsvSource::load(path.clone())
        .await
        .with_context(|| format!("loading {}", path.display()))?;

    let store = TableStore::new();
    let id = store.insert(table);
    let table = store.get(&id).context("table missing from store")?;

    info!(%id, table = %table.name, "table ready");
    for column in &table.schema.columns {
        info!(
            column = %column.name,
            kind = column.column_type.as_str(),
            "inferred column"
        );
    }

    let completer = Arc::new(ScriptedCompleter::from_file(&response_file)?);
    let pipeline = Pipeline::new(completer);

    let answer = pipeline.answer(&table, &question).await?;

    println!("intent: {}", answer.plan.intent);
    println!(
        "aggregation: {} ({})",
        answer.plan.aggregation.as_str(),
        if answer.aggregated {
            "applied"
        } else {
            "passed through"
        }
    );
    println!("result rows: {}", answer.rows.len());
    match &answer.chart {
        Some(chart) => {
            println!("chart:");
            println!("{}", serde_json::to_string_pretty(chart)?);
        }
        None => println!("chart: none requested"),
    }

    Ok(())
}
