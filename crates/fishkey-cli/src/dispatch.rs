use fishkey_core::commands::batch::BatchOptions;
use fishkey_core::commands::codes::CodesOptions;
use fishkey_core::commands::compare::MatchOptions;
use fishkey_core::commands::find::FindOptions;
use fishkey_core::commands::key::KeyOptions;
use fishkey_core::commands::parse::ParseOptions;
use fishkey_core::commands::species::SpeciesOptions;
use fishkey_core::commands::{batch, codes, compare, find, key, parse, species};
use fishkey_core::{FishkeyResult, SuccessEnvelope};

use crate::cli::{Cli, Commands};

pub fn dispatch(cli: &Cli) -> FishkeyResult<SuccessEnvelope> {
    let data_dir = cli.data_dir.as_deref();
    match &cli.command {
        Commands::Parse { description, .. } => parse::run_with_options(ParseOptions {
            description: description.join(" "),
            data_dir,
        }),
        Commands::Key { description, .. } => key::run_with_options(KeyOptions {
            description: description.join(" "),
            data_dir,
        }),
        Commands::Match { left, right, .. } => compare::run_with_options(MatchOptions {
            left: left.clone(),
            right: right.clone(),
            data_dir,
        }),
        Commands::Find {
            query,
            candidates,
            threshold,
            ..
        } => find::run_with_options(FindOptions {
            query: query.clone(),
            candidates: candidates.clone(),
            threshold: *threshold,
            data_dir,
            stdin_override: None,
        }),
        Commands::Batch { path, .. } => batch::run_with_options(BatchOptions {
            path: path.clone(),
            data_dir,
            stdin_override: None,
        }),
        Commands::Codes { family, lookup, .. } => codes::run_with_options(CodesOptions {
            family: family.clone(),
            lookup: lookup.clone(),
            data_dir,
        }),
        Commands::Species { category, .. } => species::run_with_options(SpeciesOptions {
            category: category.clone(),
            data_dir,
        }),
    }
}
