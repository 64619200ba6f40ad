use std::path::Path;

use crate::FishkeyResult;
use crate::commands::common::load_index;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{MatchData, MatchSide};
use crate::key::comparison_key;
use crate::matcher::Matcher;
use crate::matcher::policy::MATCH_POLICY_VERSION;
use crate::record::{AttributeRecord, parse};

#[derive(Debug, Default)]
pub struct MatchOptions<'a> {
    pub left: String,
    pub right: String,
    pub data_dir: Option<&'a Path>,
}

pub fn run(left: &str, right: &str) -> FishkeyResult<SuccessEnvelope> {
    run_with_options(MatchOptions {
        left: left.to_string(),
        right: right.to_string(),
        data_dir: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: MatchOptions<'_>) -> FishkeyResult<SuccessEnvelope> {
    let loaded = load_index(options.data_dir)?;
    let matcher = Matcher::default();
    let left = parse(&loaded.index, &options.left);
    let right = parse(&loaded.index, &options.right);

    let data = MatchData {
        policy_version: MATCH_POLICY_VERSION.to_string(),
        result: matcher.compare(&left, &right),
        explanation: matcher.explain_difference(&left, &right),
        left: side(left),
        right: side(right),
    };
    success("match", data)
}

pub(crate) fn side(record: AttributeRecord) -> MatchSide {
    MatchSide {
        comparison_key: comparison_key(&record),
        record,
    }
}
