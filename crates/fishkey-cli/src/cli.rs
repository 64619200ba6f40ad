use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub fn parse_threshold(value: &str) -> Result<f64, String> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|_| "threshold must be a number between 0 and 1".to_string())?;
    if !parsed.is_finite() || !(0.0..=1.0).contains(&parsed) {
        return Err("threshold must be a number between 0 and 1".to_string());
    }
    Ok(parsed)
}

/// Extended help shown after `fishkey find --help` and `fishkey batch --help`.
pub const DESCRIPTION_INPUT_AFTER_HELP: &str = "\
Accepted input:
  <path> is a local file path. Use `-` to read stdin.
  Example: cat catalog.csv | fishkey batch -

  Layouts (detected automatically):
    CSV        header row with a `description` column; other columns are ignored
    JSON       one top-level array of strings, or of objects with a `description` field
    Lines      one description per line; blank lines are skipped

  CSV example:
    sku,description,price
    1001,SALMON FIL ATL SKON DTRM 6OZ IVP,9.95
    1002,SHRIMP WHITE P&D RAW 16/20 IQF,7.40

Reference data:
  Pass --data-dir <dir> or set FISHKEY_DATA_DIR to use your own species.json and
  codes.json instead of the bundled tables.
";

const MATCH_AFTER_HELP: &str = "\
Hard blocks (always NOT COMPARABLE):
  - single-frozen vs twice-frozen finfish
  - raw vs cooked
  - value-added (breaded, stuffed, marinated, ...) vs plain

Otherwise confidence starts at 1.0 and each differing attribute subtracts its
weight. Pairs at or above 0.8 are comparable, unless the species is known on
only one side (REVIEW) or differs (NOT COMPARABLE).
";

#[derive(Debug, Parser)]
#[command(
    name = "fishkey",
    version,
    about = "seafood catalog description parser and comparability matcher",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Directory holding species.json and codes.json (overrides FISHKEY_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse one description into structured attributes
    Parse {
        /// Description text; unquoted words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Print the comparison key for one description
    Key {
        /// Description text; unquoted words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Decide whether two descriptions are comparable for pricing
    #[command(after_long_help = MATCH_AFTER_HELP)]
    Match {
        /// First description (quoted)
        left: String,
        /// Second description (quoted)
        right: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Rank candidate descriptions by comparability with a query
    #[command(after_long_help = DESCRIPTION_INPUT_AFTER_HELP)]
    Find {
        /// Query description (quoted)
        query: String,
        /// Candidate descriptions file (use `-` for stdin)
        #[arg(long, value_name = "PATH")]
        candidates: String,
        /// Minimum confidence, 0 to 1 (default 0.8)
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<f64>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Parse every description in a file
    #[command(after_long_help = DESCRIPTION_INPUT_AFTER_HELP)]
    Batch {
        /// Descriptions file (use `-` for stdin)
        path: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// List standard attribute codes and their aliases
    Codes {
        /// Family to list, e.g. form, skin, trim, countries, brands
        family: Option<String>,
        /// Map free text onto the family's standard code
        #[arg(long, value_name = "TEXT")]
        lookup: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// List species categories, or one category's subcategories
    Species {
        /// Category id, e.g. salmon or sea_bass
        category: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse",
            Self::Key { .. } => "key",
            Self::Match { .. } => "match",
            Self::Find { .. } => "find",
            Self::Batch { .. } => "batch",
            Self::Codes { .. } => "codes",
            Self::Species { .. } => "species",
        }
    }

    pub const fn json(&self) -> bool {
        match self {
            Self::Parse { json, .. }
            | Self::Key { json, .. }
            | Self::Match { json, .. }
            | Self::Find { json, .. }
            | Self::Batch { json, .. }
            | Self::Codes { json, .. }
            | Self::Species { json, .. } => *json,
        }
    }
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
