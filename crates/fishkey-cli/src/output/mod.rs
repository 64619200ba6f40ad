mod catalog_text;
mod error_text;
mod format;
mod json;
mod match_text;
mod mode;
mod record_text;

use std::io;

use fishkey_core::{FishkeyError, SuccessEnvelope};

pub use mode::{OutputMode, mode_for_command};

use crate::stdout_io::write_stdout_line;

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &FishkeyError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "parse" => record_text::render_parse(&success.data),
        "key" => record_text::render_key(&success.data),
        "batch" => record_text::render_batch(&success.data),
        "match" => match_text::render_match(&success.data),
        "find" => match_text::render_find(&success.data),
        "codes" => catalog_text::render_codes(&success.data),
        "species" if success.data.get("category").is_some() => {
            catalog_text::render_species_detail(&success.data)
        }
        "species" => catalog_text::render_species_list(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
