mod support;

use fishkey_core::{Attribute, HardBlock, Matcher};
use support::{bundled_index, parsed};

#[test]
fn raw_and_cooked_shrimp_are_never_comparable() {
    let matcher = Matcher::default();
    let result = matcher.compare(
        &parsed("SHRIMP 16/20 P&D RAW"),
        &parsed("SHRIMP 16/20 P&D COOKED"),
    );
    assert!(!result.is_match);
    assert_eq!(result.blocked_by, Some(HardBlock::RawVsCooked));
    assert_eq!(result.confidence, 0.0);
}

#[test]
fn twice_frozen_against_single_frozen_is_blocked() {
    let matcher = Matcher::default();
    let result = matcher.compare(
        &parsed("POLLOCK FIL WILD ALASKA PROCESSED IN CHINA 6OZ"),
        &parsed("POLLOCK FIL WILD ALASKA 6OZ PROCESSED IN USA"),
    );
    assert!(!result.is_match);
    assert_eq!(result.blocked_by, Some(HardBlock::FreezeCycle));
    assert!(result.recommendation.to_lowercase().contains("freeze cycle"));
}

#[test]
fn species_mismatch_alone_falls_below_threshold() {
    let matcher = Matcher::default();
    let result = matcher.compare(&parsed("SALMON LOIN 6OZ"), &parsed("COD LOIN 6OZ"));
    assert!(!result.is_match);
    assert!(result.blocked_by.is_none());
    assert!(result.confidence < matcher.policy().min_confidence);
    assert_eq!(result.different_attributes, vec![Attribute::Category]);
    assert!(result.matching_attributes.contains(&Attribute::Form));
}

#[test]
fn confidence_shrinks_as_attributes_diverge() {
    let matcher = Matcher::default();
    let base = parsed("SALMON FIL ATL SKON D 6OZ");
    let one = matcher.match_score(&base, &parsed("SALMON FIL ATL SKLS D 6OZ"));
    let two = matcher.match_score(&base, &parsed("SALMON FIL ATL SKLS E 6OZ"));
    let three = matcher.match_score(&base, &parsed("SALMON LOIN ATL SKLS E 6OZ"));
    assert!(one > two);
    assert!(two > three);
    assert!((0.0..=1.0).contains(&three));
}

#[test]
fn compare_is_symmetric_in_confidence() {
    let matcher = Matcher::default();
    let a = parsed("SALMON FIL ATL SKON D 6OZ IVP FRZ");
    let b = parsed("SALMON PRTN ATL SKLS 8OZ");
    assert_eq!(matcher.match_score(&a, &b), matcher.match_score(&b, &a));
    assert_eq!(matcher.is_comparable(&a, &b), matcher.is_comparable(&b, &a));
}

#[test]
fn find_matches_orders_best_first() {
    let Some(index) = bundled_index() else {
        return;
    };
    let matcher = Matcher::default();
    let query = fishkey_core::parse(&index, "SALMON FILLET ATLANTIC SKIN ON 6 OZ");
    let candidates = fishkey_core::parse_batch(
        &index,
        [
            "SALMON FIL ATL SKON 6OZ",
            "SALMON FIL ATL SKLS 6OZ",
            "TILAPIA FIL 6OZ",
            "SALMON FIL ATL SKON 6OZ COOKED",
        ],
    );
    let ranked = matcher.find_matches(&query, &candidates, None);
    let order = ranked
        .iter()
        .map(|entry| entry.candidate_index)
        .collect::<Vec<usize>>();
    assert_eq!(order, vec![0, 3, 1]);
    assert!(ranked.windows(2).all(|pair| pair[0].confidence >= pair[1].confidence));
    assert!(ranked.iter().all(|entry| entry.result.blocked_by.is_none()));

    let everything = matcher.find_matches(&query, &candidates, Some(0.0));
    assert!(everything.iter().all(|entry| entry.candidate_index != 2));
}

#[test]
fn match_result_serializes_attribute_names() {
    let matcher = Matcher::default();
    let result = matcher.compare(
        &parsed("SALMON FIL ATL SKON D 6OZ"),
        &parsed("SALMON FIL ATL SKLS D 6OZ"),
    );
    let value = serde_json::to_value(&result);
    assert!(value.is_ok());
    if let Ok(value) = value {
        assert_eq!(value["different_attributes"][0], "skin");
        assert_eq!(value["policy_version"], "match/v1");
        assert!(value.get("blocked_by").is_none());
    }
}
