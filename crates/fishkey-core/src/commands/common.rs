use std::fs;
use std::io::{IsTerminal, Read};
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::alias::{AliasIndex, builtin};
use crate::config::{ReferenceSource, resolve_reference_source};
use crate::{FishkeyError, FishkeyResult};

pub(crate) const STDIN_PATH: &str = "-";
const DESCRIPTION_HEADER: &str = "description";

pub(crate) struct LoadedIndex {
    pub(crate) index: Arc<AliasIndex>,
    pub(crate) source: ReferenceSource,
}

/// Resolves the reference source and builds its index. The bundled tables
/// share the process-wide index instead of being rebuilt.
pub(crate) fn load_index(data_dir: Option<&Path>) -> FishkeyResult<LoadedIndex> {
    let source = resolve_reference_source(data_dir)?;
    let index = match &source {
        ReferenceSource::Bundled => builtin()?,
        ReferenceSource::Directory(_) => Arc::new(AliasIndex::load(&source)?),
    };
    Ok(LoadedIndex { index, source })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedInput {
    pub(crate) source_used: String,
    pub(crate) content: String,
}

pub(crate) fn read_input(
    path: &str,
    stdin_override: Option<String>,
) -> FishkeyResult<ResolvedInput> {
    if path == STDIN_PATH {
        let Some(content) = read_stdin(stdin_override)? else {
            return Err(FishkeyError::invalid_input_format(
                "Path `-` means stdin input, but stdin was empty. Pipe descriptions or pass a file path.",
                "empty",
            ));
        };
        return Ok(ResolvedInput {
            source_used: "stdin".to_string(),
            content,
        });
    }

    let content = fs::read_to_string(path)
        .map_err(|error| FishkeyError::input_unreadable(path, &error.to_string()))?;
    Ok(ResolvedInput {
        source_used: path.to_string(),
        content,
    })
}

fn read_stdin(stdin_override: Option<String>) -> FishkeyResult<Option<String>> {
    if let Some(value) = stdin_override {
        return Ok(Some(value).filter(|value| !value.trim().is_empty()));
    }

    if std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|error| FishkeyError::input_unreadable("stdin", &error.to_string()))?;

    if buffer.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(buffer))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputFormat {
    Csv,
    JsonArray,
    Lines,
}

impl InputFormat {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::JsonArray => "json_array",
            Self::Lines => "lines",
        }
    }
}

/// Splits input into descriptions. Accepts a JSON array of strings or of
/// objects with a `description` field, a CSV whose header row names a
/// `description` column, or plain text with one description per line.
/// Text that starts with `[` but is not valid JSON is read as lines.
pub(crate) fn read_descriptions(content: &str) -> FishkeyResult<(InputFormat, Vec<String>)> {
    let trimmed = content.trim_start_matches('\u{feff}').trim();
    let json = trimmed
        .starts_with('[')
        .then(|| serde_json::from_str::<Value>(trimmed).ok())
        .flatten();
    let (format, descriptions) = if let Some(json) = json {
        (InputFormat::JsonArray, json_descriptions(&json)?)
    } else if let Some(column) = description_column(trimmed) {
        (InputFormat::Csv, parse_csv(trimmed, column)?)
    } else {
        let lines = trimmed
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        (InputFormat::Lines, lines)
    };

    if descriptions.is_empty() {
        return Err(FishkeyError::invalid_input_format(
            "No descriptions found in input.",
            format.as_str(),
        ));
    }
    Ok((format, descriptions))
}

fn json_descriptions(parsed: &Value) -> FishkeyResult<Vec<String>> {
    let Some(items) = parsed.as_array() else {
        return Err(FishkeyError::invalid_input_format(
            "JSON input must be a top-level array.",
            "json_non_array",
        ));
    };

    let mut descriptions = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let description = match item {
            Value::String(text) => Some(text.clone()),
            Value::Object(fields) => fields
                .get(DESCRIPTION_HEADER)
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        };
        let Some(description) = description else {
            return Err(FishkeyError::invalid_input_format(
                &format!(
                    "JSON item {} must be a string or an object with a string `description`.",
                    position + 1
                ),
                "json_array",
            ));
        };
        descriptions.push(description);
    }
    Ok(descriptions)
}

fn description_column(content: &str) -> Option<usize> {
    let header = content.lines().next()?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(header.as_bytes());
    let record = reader.records().next()?.ok()?;
    record.iter().position(is_description_header)
}

fn is_description_header(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(DESCRIPTION_HEADER)
}

fn parse_csv(content: &str, column: usize) -> FishkeyResult<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut descriptions = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|_| {
            FishkeyError::invalid_input_format("CSV rows are malformed or not UTF-8.", "csv")
        })?;
        descriptions.push(record.get(column).unwrap_or_default().to_string());
    }
    Ok(descriptions)
}
