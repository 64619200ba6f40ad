use std::path::Path;

use crate::FishkeyResult;
use crate::commands::common::load_index;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{KeyData, KeyField};
use crate::key::{KEY_FIELDS, comparison_key};
use crate::record::parse;

#[derive(Debug, Default)]
pub struct KeyOptions<'a> {
    pub description: String,
    pub data_dir: Option<&'a Path>,
}

pub fn run(description: &str) -> FishkeyResult<SuccessEnvelope> {
    run_with_options(KeyOptions {
        description: description.to_string(),
        data_dir: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: KeyOptions<'_>) -> FishkeyResult<SuccessEnvelope> {
    let loaded = load_index(options.data_dir)?;
    let record = parse(&loaded.index, &options.description);
    let fields = KEY_FIELDS
        .iter()
        .map(|field| KeyField {
            field: field.as_str().to_string(),
            value: record.attribute(*field).map(str::to_uppercase),
        })
        .collect();
    let data = KeyData {
        comparison_key: comparison_key(&record),
        raw: record.raw,
        fields,
    };
    success("key", data)
}
