mod cli;
mod dispatch;
mod logging;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use fishkey_core::FishkeyError;
use stdout_io::write_stdout_text;

const ROOT_HELP: &str = "fishkey - seafood catalog description normalizer

Usage:
  fishkey <command>

Start here:
  fishkey parse \"SALMON FIL ATL SKON DTRM 6OZ IVP\"
  fishkey match \"<description>\" \"<description>\"
  fishkey --help
";

const TOP_LEVEL_HELP: &str = "fishkey - seafood catalog description normalizer

USAGE: fishkey [--data-dir <dir>] <command>

Read one description:
  fishkey parse <description>                             Extract species, codes, size and origin
  fishkey key <description>                               Print the comparison key only

Compare products:
  fishkey match <left> <right>                            Score two descriptions for price comparison
  fishkey find <description> --candidates <path>          Rank comparable rows from a file (`-` for stdin)

Work with catalogs:
  fishkey batch <path>                                    Parse a CSV, JSON array or line file (`-` for stdin)

Browse reference data:
  fishkey codes [family] [--lookup <text>]                List standard codes, or resolve one alias
  fishkey species [category]                              List species categories and their varieties

Every command accepts --json for machine-readable output.
Set FISHKEY_DATA_DIR or pass --data-dir to use your own species and code tables.
Set FISHKEY_LOG=debug to trace extraction on stderr.
";

fn main() -> ExitCode {
    logging::init();
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }
    let parsed = cli::Cli::try_parse();
    let cli = match parsed {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let text = if is_top_level_help_request(&raw_args) {
                    TOP_LEVEL_HELP.to_string()
                } else {
                    err.to_string()
                };
                if write_stdout_text(&text).is_err() {
                    return Err(ExitCode::from(2));
                }
                return Ok(ExitCode::SUCCESS);
            }
            let command_hint = if matches!(
                err.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
                    | ErrorKind::InvalidSubcommand
            ) {
                command_path_from_args(&raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                FishkeyError::invalid_argument_for_command(&clean_message, command_hint);
            let mode = infer_requested_output_mode(&raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(ExitCode::from(1));
        }
    };
    let mode = output::mode_for_command(&cli.command);
    tracing::debug!(command = cli.command.name(), "dispatching");

    match dispatch::dispatch(&cli) {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            tracing::debug!(code = %error.code, "command failed");
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Strips clap's trailing boilerplate (Usage line, "For more information" hint)
/// so the "What to do next" section is the single source of guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// Finds the subcommand named on the command line for help hints. Flag
/// values such as `--data-dir <dir>` are skipped.
fn command_path_from_args(raw_args: &[String]) -> Option<&'static str> {
    let mut args = raw_args.iter().skip(1);
    while let Some(value) = args.next() {
        if value == "--data-dir" {
            args.next();
            continue;
        }
        if value.starts_with('-') {
            continue;
        }
        return match value.as_str() {
            "parse" => Some("parse"),
            "key" => Some("key"),
            "match" => Some("match"),
            "find" => Some("find"),
            "batch" => Some("batch"),
            "codes" => Some("codes"),
            "species" => Some("species"),
            _ => None,
        };
    }
    None
}

fn exit_code_for_error(error: &FishkeyError) -> ExitCode {
    if error.is_internal() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

#[cfg(test)]
mod tests {
    use super::{command_path_from_args, strip_clap_boilerplate};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn command_hint_skips_global_data_dir_value() {
        assert_eq!(
            command_path_from_args(&args(&["fishkey", "--data-dir", "parse", "find", "x"])),
            Some("find")
        );
        assert_eq!(
            command_path_from_args(&args(&["fishkey", "--json", "species"])),
            Some("species")
        );
        assert_eq!(command_path_from_args(&args(&["fishkey", "bogus"])), None);
    }

    #[test]
    fn clap_usage_tail_is_removed() {
        let message = "error: invalid value '2' for '--threshold'\n\nUsage: fishkey find";
        assert_eq!(
            strip_clap_boilerplate(message),
            "error: invalid value '2' for '--threshold'"
        );
    }
}
