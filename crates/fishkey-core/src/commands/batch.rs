use std::collections::BTreeSet;
use std::path::Path;

use crate::FishkeyResult;
use crate::commands::common::{load_index, read_descriptions, read_input};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{BatchData, BatchRow, BatchSummary};
use crate::key::comparison_key;
use crate::record::parse_batch;

#[derive(Debug, Default)]
pub struct BatchOptions<'a> {
    /// File path, or `-` for stdin.
    pub path: String,
    pub data_dir: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

pub fn run(path: &str) -> FishkeyResult<SuccessEnvelope> {
    run_with_options(BatchOptions {
        path: path.to_string(),
        data_dir: None,
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: BatchOptions<'_>) -> FishkeyResult<SuccessEnvelope> {
    let loaded = load_index(options.data_dir)?;
    let input = read_input(&options.path, options.stdin_override)?;
    let (format, descriptions) = read_descriptions(&input.content)?;

    let rows = parse_batch(&loaded.index, &descriptions)
        .into_iter()
        .enumerate()
        .map(|(position, record)| BatchRow {
            row: position + 1,
            comparison_key: comparison_key(&record),
            record,
        })
        .collect::<Vec<BatchRow>>();

    let species_resolved = rows
        .iter()
        .filter(|row| row.record.species.is_some())
        .count();
    let distinct_keys = rows
        .iter()
        .map(|row| row.comparison_key.as_str())
        .collect::<BTreeSet<&str>>()
        .len();
    let summary = BatchSummary {
        rows_read: rows.len(),
        species_resolved,
        species_unresolved: rows.len() - species_resolved,
        distinct_keys,
    };
    tracing::debug!(
        rows = summary.rows_read,
        unresolved = summary.species_unresolved,
        "parsed batch"
    );

    let data = BatchData {
        source_used: input.source_used,
        input_format: format.as_str().to_string(),
        summary,
        rows,
    };
    success("batch", data)
}
