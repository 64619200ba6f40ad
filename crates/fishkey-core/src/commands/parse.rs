use std::path::Path;

use crate::FishkeyResult;
use crate::commands::common::load_index;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ParseData;
use crate::key::comparison_key;
use crate::record::parse;

#[derive(Debug, Default)]
pub struct ParseOptions<'a> {
    pub description: String,
    pub data_dir: Option<&'a Path>,
}

pub fn run(description: &str) -> FishkeyResult<SuccessEnvelope> {
    run_with_options(ParseOptions {
        description: description.to_string(),
        data_dir: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ParseOptions<'_>) -> FishkeyResult<SuccessEnvelope> {
    let loaded = load_index(options.data_dir)?;
    let record = parse(&loaded.index, &options.description);
    let data = ParseData {
        reference_source: loaded.source.describe(),
        comparison_key: comparison_key(&record),
        record,
    };
    success("parse", data)
}
