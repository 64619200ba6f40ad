use crate::record::Attribute;

/// Deterministic comparability policy identifier.
///
/// Emitted with match results so weight changes stay auditable across
/// versions.
pub const MATCH_POLICY_VERSION: &str = "match/v1";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeWeight {
    pub attribute: Attribute,
    pub weight: f64,
}

/// v1 comparability policy.
///
/// Notes:
/// - A differing species category costs more than the whole confidence
///   headroom above `min_confidence`, so different species never match.
/// - Any one secondary attribute (trim, skin, bone, form) may differ and the
///   pair still matches; two of them push it into review.
/// - An attribute stated on one side only costs `missing_fraction` of its
///   weight.
#[derive(Debug, Clone, Copy)]
pub struct MatchPolicy {
    pub weights: &'static [AttributeWeight],
    pub missing_fraction: f64,
    pub min_confidence: f64,
}

impl MatchPolicy {
    pub fn weight(self, attribute: Attribute) -> f64 {
        self.weights
            .iter()
            .find(|entry| entry.attribute == attribute)
            .map(|entry| entry.weight)
            .unwrap_or(0.0)
    }

    pub fn missing_penalty(self, attribute: Attribute) -> f64 {
        self.weight(attribute) * self.missing_fraction
    }

    /// Confidence after penalties, clamped to `[0, 1]` and rounded to four
    /// decimals so equal inputs always compare equal.
    pub fn confidence(self, penalty: f64) -> f64 {
        let clamped = (1.0 - penalty).clamp(0.0, 1.0);
        (clamped * 10_000.0).round() / 10_000.0
    }

    pub fn passes(self, confidence: f64) -> bool {
        confidence >= self.min_confidence
    }
}

const WEIGHTS_V1: &[AttributeWeight] = &[
    AttributeWeight {
        attribute: Attribute::Category,
        weight: 0.60,
    },
    AttributeWeight {
        attribute: Attribute::Subcategory,
        weight: 0.25,
    },
    AttributeWeight {
        attribute: Attribute::Form,
        weight: 0.15,
    },
    AttributeWeight {
        attribute: Attribute::Skin,
        weight: 0.10,
    },
    AttributeWeight {
        attribute: Attribute::Bone,
        weight: 0.10,
    },
    AttributeWeight {
        attribute: Attribute::Trim,
        weight: 0.10,
    },
    AttributeWeight {
        attribute: Attribute::SizeBucket,
        weight: 0.15,
    },
    AttributeWeight {
        attribute: Attribute::MeatGrade,
        weight: 0.20,
    },
    AttributeWeight {
        attribute: Attribute::Preparation,
        weight: 0.20,
    },
    AttributeWeight {
        attribute: Attribute::ValueAdded,
        weight: 0.20,
    },
    AttributeWeight {
        attribute: Attribute::CutStyle,
        weight: 0.08,
    },
    AttributeWeight {
        attribute: Attribute::Harvest,
        weight: 0.05,
    },
    AttributeWeight {
        attribute: Attribute::FreezeCycle,
        weight: 0.05,
    },
    AttributeWeight {
        attribute: Attribute::Origin,
        weight: 0.03,
    },
    AttributeWeight {
        attribute: Attribute::Pack,
        weight: 0.02,
    },
    AttributeWeight {
        attribute: Attribute::Storage,
        weight: 0.02,
    },
];

pub const MATCH_POLICY_V1: MatchPolicy = MatchPolicy {
    weights: WEIGHTS_V1,
    missing_fraction: 0.25,
    min_confidence: 0.80,
};
