//! Portion sizes, size buckets and shellfish counts.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

const NUMBER: &str = r"(\d+(?:\.\d+)?)";

/// Keeps a value from starting inside another number or right after a
/// slash, so `5 1/3OZ` never reads as `3OZ`.
const LEAD: &str = r"(?:^|[^\d./])";

/// Denominators a portion fraction may use.
const FRACTION_DENOMINATORS: &[u32] = &[2, 3, 4, 8, 16];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// `5 1/3OZ` or `1/2LB`.
    Fraction,
    /// `5-7OZ`.
    Range,
    /// `6OZ`.
    Single,
}

static SIZE_PATTERNS: LazyLock<Vec<(SizeUnit, Shape, Regex)>> = LazyLock::new(|| {
    let mut patterns = Vec::new();
    for unit in [SizeUnit::Ounce, SizeUnit::Pound, SizeUnit::Gram] {
        let fraction = format!(r"{LEAD}(?:(\d+)\s+)?(\d+)/(\d+)\s*(?:{})", unit.pattern());
        let range = format!(r"{LEAD}{NUMBER}\s*-\s*{NUMBER}\s*(?:{})", unit.pattern());
        let single = format!(r"{LEAD}{NUMBER}\s*(?:{})", unit.pattern());
        for (shape, source) in [
            (Shape::Fraction, fraction),
            (Shape::Range, range),
            (Shape::Single, single),
        ] {
            if let Ok(regex) = Regex::new(&source) {
                patterns.push((unit, shape, regex));
            }
        }
    }
    patterns
});

static UNDER_COUNT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\bU[/-]?(\d+)\b").ok());

static RANGE_COUNT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\b(\d+)\s*[/-]\s*(\d+)\b(\s*(?:(?:OZ|OUNCES?|LBS?|POUNDS?|GRAMS?|GMS?|GR|G)\b|#))?")
        .ok()
});

/// Ounce buckets, lower bound inclusive.
const OZ_BUCKETS: &[(f64, f64, &str)] = &[
    (0.0, 1.0, "UNDER-1OZ"),
    (1.0, 2.0, "1-2OZ"),
    (2.0, 3.0, "2-3OZ"),
    (3.0, 4.0, "3-4OZ"),
    (4.0, 5.0, "4-5OZ"),
    (5.0, 6.0, "5-6OZ"),
    (6.0, 8.0, "6-8OZ"),
    (8.0, 10.0, "8-10OZ"),
    (10.0, 12.0, "10-12OZ"),
    (12.0, 16.0, "12-16OZ"),
    (16.0, f64::INFINITY, "16OZ+"),
];

/// Pound buckets, lower bound inclusive.
const LB_BUCKETS: &[(f64, f64, &str)] = &[
    (0.0, 1.0, "UNDER-1LB"),
    (1.0, 2.0, "1-2LB"),
    (2.0, 3.0, "2-3LB"),
    (3.0, 4.0, "3-4LB"),
    (4.0, 5.0, "4-5LB"),
    (5.0, 7.0, "5-7LB"),
    (7.0, 9.0, "7-9LB"),
    (9.0, f64::INFINITY, "9LB+"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    Ounce,
    Pound,
    Gram,
}

impl SizeUnit {
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Ounce => "OZ",
            Self::Pound => "LB",
            Self::Gram => "GM",
        }
    }

    const fn pattern(self) -> &'static str {
        match self {
            Self::Ounce => r"OZ|OUNCE",
            Self::Pound => r"LB|#|POUND",
            Self::Gram => r"(?:GRAMS?|GMS?|GR|G)\b",
        }
    }

    fn buckets(self) -> Option<&'static [(f64, f64, &'static str)]> {
        match self {
            Self::Ounce => Some(OZ_BUCKETS),
            Self::Pound => Some(LB_BUCKETS),
            Self::Gram => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Size {
    pub raw: String,
    pub unit: SizeUnit,
    pub low: f64,
    pub high: Option<f64>,
}

impl Size {
    pub fn midpoint(&self) -> f64 {
        match self.high {
            Some(high) => (self.low + high) / 2.0,
            None => self.low,
        }
    }

    /// Competitive size bucket; gram sizes are never bucketed.
    pub fn bucket(&self) -> Option<&'static str> {
        let value = self.midpoint();
        self.unit
            .buckets()?
            .iter()
            .find(|(lower, upper, _)| *lower <= value && value < *upper)
            .map(|(_, _, label)| *label)
    }
}

/// First size in normalized text. Ounces are tried before pounds and pounds
/// before grams; fractions, then ranges, then single values within a unit.
/// A slashed value that is not a portion fraction yields no size.
pub fn extract_size(text: &str) -> Option<Size> {
    SIZE_PATTERNS.iter().find_map(|(unit, shape, regex)| {
        let captures = regex.captures(text)?;
        match shape {
            Shape::Fraction => fraction_size(*unit, &captures),
            Shape::Range | Shape::Single => {
                let low_text = captures.get(1)?.as_str();
                let low = low_text.parse::<f64>().ok()?;
                let (high, raw) = match captures.get(2) {
                    Some(high_text) => (
                        Some(high_text.as_str().parse::<f64>().ok()?),
                        format!("{low_text}-{}{}", high_text.as_str(), unit.suffix()),
                    ),
                    None => (None, format!("{low_text}{}", unit.suffix())),
                };
                Some(Size {
                    raw,
                    unit: *unit,
                    low,
                    high,
                })
            }
        }
    })
}

fn fraction_size(unit: SizeUnit, captures: &Captures<'_>) -> Option<Size> {
    let numerator = captures.get(2)?.as_str().parse::<u32>().ok()?;
    let denominator = captures.get(3)?.as_str().parse::<u32>().ok()?;
    if numerator == 0 || numerator >= denominator || !FRACTION_DENOMINATORS.contains(&denominator) {
        return None;
    }

    let whole = match captures.get(1) {
        Some(whole) => Some(whole.as_str().parse::<u32>().ok()?),
        None => None,
    };
    let low = f64::from(whole.unwrap_or(0)) + f64::from(numerator) / f64::from(denominator);
    let raw = match whole {
        Some(whole) => format!("{whole} {numerator}/{denominator}{}", unit.suffix()),
        None => format!("{numerator}/{denominator}{}", unit.suffix()),
    };
    Some(Size {
        raw,
        unit,
        low,
        high: None,
    })
}

/// Piece count such as `16/20` or `U10`. A number range followed by a size
/// unit is a weight, not a count.
pub fn extract_count(text: &str) -> Option<String> {
    if let Some(captures) = UNDER_COUNT.as_ref().and_then(|regex| regex.captures(text)) {
        return captures.get(1).map(|count| format!("U{}", count.as_str()));
    }

    let regex = RANGE_COUNT.as_ref()?;
    regex
        .captures_iter(text)
        .filter(|captures| captures.get(3).is_none())
        .find_map(|captures| {
            let low = captures.get(1)?.as_str();
            let high = captures.get(2)?.as_str();
            Some(format!("{low}/{high}"))
        })
}
