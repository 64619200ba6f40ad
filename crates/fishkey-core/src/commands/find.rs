use std::path::Path;

use crate::commands::common::{load_index, read_descriptions, read_input};
use crate::commands::compare::side;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{FindData, FindMatchRow};
use crate::key::comparison_key;
use crate::matcher::Matcher;
use crate::matcher::policy::MATCH_POLICY_VERSION;
use crate::record::{parse, parse_batch};
use crate::{FishkeyError, FishkeyResult};

#[derive(Debug, Default)]
pub struct FindOptions<'a> {
    pub query: String,
    /// File path, or `-` for stdin.
    pub candidates: String,
    pub threshold: Option<f64>,
    pub data_dir: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

pub fn run(query: &str, candidates: &str, threshold: Option<f64>) -> FishkeyResult<SuccessEnvelope> {
    run_with_options(FindOptions {
        query: query.to_string(),
        candidates: candidates.to_string(),
        threshold,
        data_dir: None,
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: FindOptions<'_>) -> FishkeyResult<SuccessEnvelope> {
    let matcher = Matcher::default();
    let threshold = validate_threshold(options.threshold.unwrap_or(matcher.policy().min_confidence))?;

    let loaded = load_index(options.data_dir)?;
    let input = read_input(&options.candidates, options.stdin_override)?;
    let (_, descriptions) = read_descriptions(&input.content)?;

    let query = parse(&loaded.index, &options.query);
    let candidates = parse_batch(&loaded.index, &descriptions);
    let matches = matcher
        .find_matches(&query, &candidates, Some(threshold))
        .into_iter()
        .map(|ranked| {
            let candidate = &candidates[ranked.candidate_index];
            FindMatchRow {
                row: ranked.candidate_index + 1,
                description: candidate.raw.clone(),
                confidence: ranked.confidence,
                comparison_key: comparison_key(candidate),
                recommendation: ranked.result.recommendation,
                differences: ranked.result.differences,
            }
        })
        .collect::<Vec<FindMatchRow>>();
    tracing::debug!(
        candidates = candidates.len(),
        matches = matches.len(),
        threshold,
        "ranked candidates"
    );

    let data = FindData {
        policy_version: MATCH_POLICY_VERSION.to_string(),
        threshold,
        source_used: input.source_used,
        query: side(query),
        candidates_read: candidates.len(),
        matches,
    };
    success("find", data)
}

pub(crate) fn validate_threshold(threshold: f64) -> FishkeyResult<f64> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        return Ok(threshold);
    }
    Err(FishkeyError::invalid_argument_for_command(
        &format!("Threshold must be a number between 0 and 1, got `{threshold}`."),
        Some("find"),
    ))
}

#[cfg(test)]
mod tests {
    use super::validate_threshold;

    #[test]
    fn threshold_bounds_are_inclusive() {
        assert_eq!(validate_threshold(0.0).ok(), Some(0.0));
        assert_eq!(validate_threshold(1.0).ok(), Some(1.0));
        assert!(validate_threshold(1.01).is_err());
        assert!(validate_threshold(-0.1).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
    }
}
