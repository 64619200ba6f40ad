use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const REFERENCE_HELP_COMMAND: &str = "fishkey codes --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct FishkeyError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl FishkeyError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Failures caused by the tool itself or by its reference tables rather
    /// than by the arguments a caller passed.
    pub fn is_internal(&self) -> bool {
        self.code.starts_with("internal_") || self.code.starts_with("reference_")
    }

    pub fn ambiguous_alias(table: &str, alias: &str, first: &str, second: &str) -> Self {
        Self::new(
            "reference_ambiguous_alias",
            &format!("Alias `{alias}` in `{table}` maps to both `{first}` and `{second}`."),
            vec![
                format!("Keep `{alias}` under exactly one entry of `{table}`."),
                "Reload the reference data after fixing the table.".to_string(),
            ],
        )
        .with_data(json!({
            "table": table,
            "alias": alias,
            "targets": [first, second],
        }))
    }

    pub fn invalid_reference_data(source: &str, detail: &str) -> Self {
        Self::new(
            "reference_data_invalid",
            &format!("Reference data `{source}` is malformed: {detail}"),
            vec![
                format!("Fix `{source}` so it matches the bundled table layout."),
                format!("Run `{REFERENCE_HELP_COMMAND}` to inspect the bundled codes."),
            ],
        )
        .with_data(json!({
            "source": source,
        }))
    }

    pub fn reference_data_unreadable(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "reference_data_unreadable",
            &format!("Cannot read reference data at `{location}`: {detail}"),
            vec![
                format!("Make sure `{location}` exists and is readable."),
                "Unset `FISHKEY_DATA_DIR` to fall back to the bundled tables.".to_string(),
            ],
        )
        .with_data(json!({
            "path": location,
        }))
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `fishkey {cmd} --help` for usage."),
            None => "Run `fishkey --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn input_unreadable(source: &str, detail: &str) -> Self {
        Self::new(
            "input_unreadable",
            &format!("Cannot read descriptions from `{source}`: {detail}"),
            vec![
                "Check that the path exists and is readable.".to_string(),
                "Pass `-` to read descriptions from stdin.".to_string(),
            ],
        )
        .with_data(json!({
            "source": source,
        }))
    }

    pub fn invalid_input_format(message: &str, received_format: &str) -> Self {
        Self::invalid_argument_with_recovery(
            message,
            vec![
                "Provide a CSV with a `description` header, a JSON array, or one description per line."
                    .to_string(),
                "Run `fishkey batch --help` to confirm the accepted layouts.".to_string(),
            ],
        )
        .with_data(json!({
            "received_format": received_format,
            "supported_formats": ["csv", "json_array", "lines"],
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

pub type FishkeyResult<T> = Result<T, FishkeyError>;
