//! Comparability decisions between two attribute records.
//!
//! Hard blocks are checked first: a pair that differs in freeze cycle, raw
//! versus cooked preparation, or value-added processing is never comparable
//! no matter how close the rest is. Otherwise confidence starts at 1 and
//! each differing attribute subtracts its policy weight.

pub mod policy;

use std::fmt::Write as _;

use serde::Serialize;

use crate::alias::AliasIndex;
use crate::record::{Attribute, AttributeRecord, parse};
use policy::{MATCH_POLICY_V1, MATCH_POLICY_VERSION, MatchPolicy};

const ABSENT: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HardBlock {
    FreezeCycle,
    RawVsCooked,
    ValueAdded,
}

impl HardBlock {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FreezeCycle => "freeze_cycle",
            Self::RawVsCooked => "raw_vs_cooked",
            Self::ValueAdded => "value_added",
        }
    }

    pub const fn attribute(self) -> Attribute {
        match self {
            Self::FreezeCycle => Attribute::FreezeCycle,
            Self::RawVsCooked => Attribute::Preparation,
            Self::ValueAdded => Attribute::ValueAdded,
        }
    }

    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::FreezeCycle => "NOT COMPARABLE - Different freeze cycle (single vs twice-frozen)",
            Self::RawVsCooked => "NOT COMPARABLE - Raw vs cooked preparation",
            Self::ValueAdded => "NOT COMPARABLE - Value-added vs plain product",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub is_match: bool,
    pub confidence: f64,
    pub differences: Vec<String>,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<HardBlock>,
    pub different_attributes: Vec<Attribute>,
    pub missing_attributes: Vec<Attribute>,
    pub matching_attributes: Vec<Attribute>,
    pub policy_version: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatch {
    pub candidate_index: usize,
    pub confidence: f64,
    pub result: MatchResult,
}

/// Attributes `explain_difference` reports, with what each one usually
/// means for price.
const PRICE_FACTORS: &[(Attribute, &str)] = &[
    (Attribute::Trim, "trim level changes yield"),
    (Attribute::CutStyle, "center cuts command a premium over block or random cuts"),
    (Attribute::Subcategory, "species variety sets the market price tier"),
    (Attribute::Harvest, "wild and farmed supply are priced separately"),
    (Attribute::FreezeCycle, "single vs twice-frozen"),
    (Attribute::Preparation, "cooking and curing add processing cost"),
    (Attribute::ValueAdded, "breading, stuffing or seasoning adds cost"),
    (Attribute::SizeBucket, "larger portions usually cost more per pound"),
];

#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    policy: MatchPolicy,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(MATCH_POLICY_V1)
    }
}

impl Matcher {
    pub const fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn compare(&self, a: &AttributeRecord, b: &AttributeRecord) -> MatchResult {
        if let Some((block, difference)) = hard_block(a, b) {
            tracing::debug!(block = block.as_str(), %difference, "comparison hard-blocked");
            return MatchResult {
                is_match: false,
                confidence: 0.0,
                differences: vec![difference],
                recommendation: block.recommendation().to_string(),
                blocked_by: Some(block),
                different_attributes: vec![block.attribute()],
                missing_attributes: Vec::new(),
                matching_attributes: Vec::new(),
                policy_version: MATCH_POLICY_VERSION,
            };
        }

        let category_differs = species_differ(a, b);
        let species_one_sided = a.category().is_some() != b.category().is_some();

        let mut penalty = 0.0;
        let mut differences = Vec::new();
        let mut different_attributes = Vec::new();
        let mut missing_attributes = Vec::new();
        let mut matching_attributes = Vec::new();

        for entry in self.policy.weights {
            let attribute = entry.attribute;
            if attribute == Attribute::Subcategory && category_differs {
                continue;
            }
            match (a.attribute(attribute), b.attribute(attribute)) {
                (Some(left), Some(right)) if left == right => matching_attributes.push(attribute),
                (Some(left), Some(right)) => {
                    penalty += entry.weight;
                    different_attributes.push(attribute);
                    differences.push(format!("{}: {left} vs {right}", attribute.as_str()));
                }
                (None, None) => {}
                _ => {
                    penalty += self.policy.missing_penalty(attribute);
                    missing_attributes.push(attribute);
                }
            }
        }

        let confidence = self.policy.confidence(penalty);
        let is_match =
            !category_differs && !species_one_sided && self.policy.passes(confidence);
        let recommendation = recommend(
            is_match,
            category_differs,
            species_one_sided,
            &different_attributes,
            &missing_attributes,
        );

        MatchResult {
            is_match,
            confidence,
            differences,
            recommendation,
            blocked_by: None,
            different_attributes,
            missing_attributes,
            matching_attributes,
            policy_version: MATCH_POLICY_VERSION,
        }
    }

    pub fn compare_text(&self, index: &AliasIndex, a: &str, b: &str) -> MatchResult {
        self.compare(&parse(index, a), &parse(index, b))
    }

    pub fn is_comparable(&self, a: &AttributeRecord, b: &AttributeRecord) -> bool {
        self.compare(a, b).is_match
    }

    pub fn match_score(&self, a: &AttributeRecord, b: &AttributeRecord) -> f64 {
        self.compare(a, b).confidence
    }

    /// Candidates comparable to `query` at or above `threshold` (policy
    /// threshold when `None`), best first. Hard-blocked candidates and
    /// candidates of another species never appear, whatever the threshold.
    /// Equal confidences keep input order.
    pub fn find_matches(
        &self,
        query: &AttributeRecord,
        candidates: &[AttributeRecord],
        threshold: Option<f64>,
    ) -> Vec<RankedMatch> {
        let threshold = threshold.unwrap_or(self.policy.min_confidence);
        let mut ranked = candidates
            .iter()
            .enumerate()
            .map(|(candidate_index, candidate)| (candidate_index, self.compare(query, candidate)))
            .filter(|(candidate_index, result)| {
                result.blocked_by.is_none()
                    && result.confidence >= threshold
                    && !species_differ(query, &candidates[*candidate_index])
            })
            .map(|(candidate_index, result)| RankedMatch {
                candidate_index,
                confidence: result.confidence,
                result,
            })
            .collect::<Vec<RankedMatch>>();
        ranked.sort_by(|left, right| right.confidence.total_cmp(&left.confidence));
        ranked
    }

    /// Human-readable list of attribute differences that can justify a
    /// price gap between two products.
    pub fn explain_difference(&self, a: &AttributeRecord, b: &AttributeRecord) -> String {
        let mut lines = String::new();
        for (attribute, note) in PRICE_FACTORS {
            let left = a.attribute(*attribute);
            let right = b.attribute(*attribute);
            if left == right {
                continue;
            }
            let _ = write!(
                lines,
                "\n- {}: {} vs {} ({note})",
                attribute.as_str(),
                left.unwrap_or(ABSENT),
                right.unwrap_or(ABSENT)
            );
        }

        if lines.is_empty() {
            return "No attribute differences explain a price difference.".to_string();
        }
        format!("Price difference may be justified by:{lines}")
    }
}

fn species_differ(a: &AttributeRecord, b: &AttributeRecord) -> bool {
    matches!((a.category(), b.category()), (Some(left), Some(right)) if left != right)
}

fn hard_block(a: &AttributeRecord, b: &AttributeRecord) -> Option<(HardBlock, String)> {
    if let (Some(left), Some(right)) = (a.freeze_cycle, b.freeze_cycle)
        && left != right
    {
        return Some((
            HardBlock::FreezeCycle,
            format!("freeze_cycle: {} vs {}", left.as_str(), right.as_str()),
        ));
    }

    if let (Some(left), Some(right)) = (a.preparation.as_deref(), b.preparation.as_deref())
        && matches!((left, right), ("RAW", "COOKED") | ("COOKED", "RAW"))
    {
        return Some((
            HardBlock::RawVsCooked,
            format!("preparation: {left} vs {right}"),
        ));
    }

    if a.value_added.is_some() != b.value_added.is_some() {
        return Some((
            HardBlock::ValueAdded,
            format!(
                "value_added: {} vs {}",
                a.value_added.as_deref().unwrap_or(ABSENT),
                b.value_added.as_deref().unwrap_or(ABSENT)
            ),
        ));
    }

    None
}

fn recommend(
    is_match: bool,
    category_differs: bool,
    species_one_sided: bool,
    different: &[Attribute],
    missing: &[Attribute],
) -> String {
    if category_differs {
        return "NOT COMPARABLE - Different species".to_string();
    }
    if species_one_sided {
        return "REVIEW - Species unknown on one side".to_string();
    }
    let listed = different
        .iter()
        .chain(missing)
        .map(|attribute| attribute.as_str())
        .collect::<Vec<&str>>()
        .join(", ");
    match (is_match, listed.is_empty()) {
        (true, true) => "COMPARABLE - Identical attributes".to_string(),
        (true, false) => format!("COMPARABLE - Minor differences: {listed}"),
        (false, _) => format!("REVIEW - Significant differences: {listed}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{HardBlock, Matcher};
    use crate::alias::{AliasIndex, builtin};
    use crate::record::{Attribute, AttributeRecord, parse};

    fn with_index(check: impl FnOnce(&AliasIndex)) {
        let index = builtin();
        assert!(index.is_ok());
        if let Ok(index) = index {
            check(&index);
        }
    }

    #[test]
    fn identical_descriptions_are_comparable() {
        with_index(|index| {
            let result = Matcher::default().compare_text(
                index,
                "SALMON FIL ATL SKON DTRM 6OZ",
                "SALMON FIL ATL SKON DTRM 6OZ",
            );
            assert!(result.is_match);
            assert_eq!(result.confidence, 1.0);
            assert!(result.differences.is_empty());
            assert_eq!(result.recommendation, "COMPARABLE - Identical attributes");
        });
    }

    #[test]
    fn spelled_out_variant_is_comparable() {
        with_index(|index| {
            let result = Matcher::default().compare_text(
                index,
                "SALMON FIL ATL SKON DTRM 6OZ",
                "SALMON FILLET ATLANTIC SKIN ON D TRIM 6 OZ",
            );
            assert!(result.is_match);
            assert!(result.confidence >= 0.9);
        });
    }

    #[test]
    fn different_species_are_not_comparable() {
        with_index(|index| {
            let result =
                Matcher::default().compare_text(index, "SALMON FIL ATL 6OZ", "COD FIL ATL 6OZ");
            assert!(!result.is_match);
            assert!(result.confidence < 0.8);
            assert_eq!(result.recommendation, "NOT COMPARABLE - Different species");
            assert_eq!(result.differences[0], "category: salmon vs cod");
            assert!(!result.different_attributes.contains(&Attribute::Subcategory));
        });
    }

    #[test]
    fn raw_vs_cooked_is_a_hard_block() {
        with_index(|index| {
            let result = Matcher::default().compare_text(
                index,
                "SHRIMP WHITE P&D RAW 16/20",
                "SHRIMP WHITE P&D COOKED 16/20",
            );
            assert!(!result.is_match);
            assert_eq!(result.confidence, 0.0);
            assert_eq!(result.blocked_by, Some(HardBlock::RawVsCooked));
            assert_eq!(result.differences, vec!["preparation: RAW vs COOKED"]);
            assert_eq!(result.recommendation, "NOT COMPARABLE - Raw vs cooked preparation");
        });
    }

    #[test]
    fn freeze_cycle_mismatch_is_a_hard_block() {
        with_index(|index| {
            let result = Matcher::default().compare_text(
                index,
                "POLLOCK FIL WILD ALASKA PROCESSED IN CHINA 6OZ",
                "POLLOCK FIL WILD ALASKA PROCESSED IN USA 6OZ",
            );
            assert!(!result.is_match);
            assert_eq!(result.blocked_by, Some(HardBlock::FreezeCycle));
            assert_eq!(result.different_attributes, vec![Attribute::FreezeCycle]);
            assert!(result.recommendation.to_lowercase().contains("freeze cycle"));
        });
    }

    #[test]
    fn missing_freeze_cycle_is_not_a_block() {
        with_index(|index| {
            let result = Matcher::default().compare_text(
                index,
                "POLLOCK FIL PROCESSED IN CHINA 6OZ",
                "POLLOCK FIL 6OZ",
            );
            assert!(result.blocked_by.is_none());
            assert!(result.missing_attributes.contains(&Attribute::FreezeCycle));
            assert!(!result.different_attributes.contains(&Attribute::FreezeCycle));
            assert!(result.confidence < 1.0);
        });
    }

    #[test]
    fn same_freeze_cycle_counts_as_matching() {
        with_index(|index| {
            let result = Matcher::default().compare_text(
                index,
                "POLLOCK FIL PROCESSED CHINA 6OZ",
                "POLLOCK FIL PROCESSED VIETNAM 6OZ",
            );
            assert!(result.matching_attributes.contains(&Attribute::FreezeCycle));
            assert!(result.is_match);
        });
    }

    #[test]
    fn value_added_on_one_side_is_a_hard_block() {
        with_index(|index| {
            let result = Matcher::default().compare_text(
                index,
                "COD FIL BREADED 4OZ",
                "COD FIL 4OZ",
            );
            assert_eq!(result.blocked_by, Some(HardBlock::ValueAdded));
            assert_eq!(result.differences, vec!["value_added: BREADED vs none"]);
        });
    }

    #[test]
    fn unknown_records_compare_as_identical() {
        let matcher = Matcher::default();
        let empty = AttributeRecord::default();
        let result = matcher.compare(&empty, &empty);
        assert!(result.is_match);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn minor_and_significant_differences_are_labelled() {
        with_index(|index| {
            let matcher = Matcher::default();
            let minor = matcher.compare_text(
                index,
                "SALMON FIL ATL SKON D 6OZ",
                "SALMON FIL ATL SKLS D 6OZ",
            );
            assert!(minor.is_match);
            assert_eq!(minor.recommendation, "COMPARABLE - Minor differences: skin");

            let significant = matcher.compare_text(
                index,
                "SALMON FIL ATL SKON D 6OZ",
                "SALMON LOIN ATL SKON D 12OZ",
            );
            assert!(!significant.is_match);
            assert!(
                significant
                    .recommendation
                    .starts_with("REVIEW - Significant differences: form, size_bucket")
            );
        });
    }

    #[test]
    fn find_matches_ranks_and_filters() {
        with_index(|index| {
            let matcher = Matcher::default();
            let query = parse(index, "SALMON FIL ATL SKON D 6OZ");
            let candidates = [
                "SALMON FIL ATL SKON D 6OZ",
                "SALMON FIL ATL SKLS E 6OZ",
                "COD FIL ATL 6OZ",
                "SALMON FIL ATL SKON D 6OZ BREADED",
            ]
            .iter()
            .map(|raw| parse(index, raw))
            .collect::<Vec<_>>();

            let ranked = matcher.find_matches(&query, &candidates, None);
            assert_eq!(ranked.len(), 2);
            assert_eq!(ranked[0].candidate_index, 0);
            assert_eq!(ranked[1].candidate_index, 1);
            assert!(ranked[0].confidence >= ranked[1].confidence);

            let loose = matcher.find_matches(&query, &candidates, Some(0.0));
            assert_eq!(loose.len(), 2);
            assert!(loose.iter().all(|ranked| ranked.candidate_index != 2));
        });
    }

    #[test]
    fn find_matches_never_returns_another_species() {
        with_index(|index| {
            let matcher = Matcher::default();
            let query = parse(index, "SALMON FIL 6OZ");
            let candidates = [parse(index, "COD FIL 6OZ"), parse(index, "SALMON FIL 8OZ")];

            let ranked = matcher.find_matches(&query, &candidates, Some(0.3));
            assert_eq!(ranked.len(), 1);
            assert_eq!(ranked[0].candidate_index, 1);
            assert!(matcher.find_matches(&query, &candidates[..1], Some(0.0)).is_empty());
        });
    }

    #[test]
    fn species_known_on_one_side_goes_to_review() {
        with_index(|index| {
            let matcher = Matcher::default();
            let result = matcher.compare_text(index, "SALMON FIL 6OZ", "FIL 6OZ");
            assert!(!result.is_match);
            assert!(result.confidence < 1.0);
            assert_eq!(result.recommendation, "REVIEW - Species unknown on one side");
            assert!(result.missing_attributes.contains(&Attribute::Category));

            let flipped = matcher.compare_text(index, "FIL 6OZ", "SALMON FIL 6OZ");
            assert!(!flipped.is_match);
            assert_eq!(flipped.recommendation, result.recommendation);
        });
    }

    #[test]
    fn find_matches_keeps_input_order_on_ties() {
        with_index(|index| {
            let matcher = Matcher::default();
            let query = parse(index, "COD LOIN 6OZ");
            let candidates = ["COD LOIN 6OZ", "COD LOIN 6 OZ", "COD LOINS 6OZ"]
                .iter()
                .map(|raw| parse(index, raw))
                .collect::<Vec<_>>();
            let order = matcher
                .find_matches(&query, &candidates, None)
                .iter()
                .map(|ranked| ranked.candidate_index)
                .collect::<Vec<_>>();
            assert_eq!(order, vec![0, 1, 2]);
        });
    }

    #[test]
    fn explain_difference_lists_price_factors() {
        with_index(|index| {
            let matcher = Matcher::default();
            let explanation = matcher.explain_difference(
                &parse(index, "POLLOCK FIL PROCESSED IN CHINA 6OZ"),
                &parse(index, "POLLOCK FIL PROCESSED IN USA 6OZ"),
            );
            assert!(explanation.starts_with("Price difference may be justified by:"));
            assert!(explanation.contains("- freeze_cycle: TWICE vs SINGLE"));

            let same = matcher.explain_difference(
                &parse(index, "COD LOIN 6OZ"),
                &parse(index, "COD LOIN 6OZ"),
            );
            assert_eq!(same, "No attribute differences explain a price difference.");
        });
    }

    #[test]
    fn match_score_and_is_comparable_agree_with_compare() {
        with_index(|index| {
            let matcher = Matcher::default();
            let a = parse(index, "SALMON FIL ATL SKON D 6OZ");
            let b = parse(index, "SALMON FIL ATL SKON D 6OZ");
            assert!(matcher.is_comparable(&a, &b));
            assert!(matcher.match_score(&a, &b) >= 0.9);
            let cod = parse(index, "COD FIL");
            assert!(!matcher.is_comparable(&parse(index, "SALMON FIL"), &cod));
        });
    }
}
