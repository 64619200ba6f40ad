//! Attribute code extraction for the code families, countries and brands.
//!
//! Every lookup picks the longest alias present and breaks ties on the
//! earliest position.

use std::cmp::Reverse;

use crate::alias::{AliasIndex, AttributeFamily, CodeAlias, CodeTable};
use crate::normalize::find_all;
use crate::reference::ProductClass;

#[derive(Debug, Clone, Copy)]
enum Neighbor {
    Previous,
    Next,
}

/// An alias that must not fire when a neighbouring token is one of `tokens`.
#[derive(Debug, Clone, Copy)]
struct ExclusionRule {
    family: AttributeFamily,
    alias: &'static str,
    neighbor: Neighbor,
    tokens: &'static [&'static str],
}

const EXCLUSION_RULES: &[ExclusionRule] = &[
    ExclusionRule {
        family: AttributeFamily::MeatGrade,
        alias: "LUMP",
        neighbor: Neighbor::Previous,
        tokens: &["LUMPFISH"],
    },
    ExclusionRule {
        family: AttributeFamily::Form,
        alias: "TAIL",
        neighbor: Neighbor::Next,
        tokens: &["ON", "OFF"],
    },
    ExclusionRule {
        family: AttributeFamily::Form,
        alias: "TAILS",
        neighbor: Neighbor::Next,
        tokens: &["ON", "OFF"],
    },
];

impl ExclusionRule {
    fn rejects(&self, alias: &CodeAlias, tokens: &[String], position: usize) -> bool {
        if alias.alias != self.alias {
            return false;
        }
        let neighbor = match self.neighbor {
            Neighbor::Previous => position.checked_sub(1).and_then(|at| tokens.get(at)),
            Neighbor::Next => tokens.get(position + alias.tokens.len()),
        };
        neighbor.is_some_and(|token| self.tokens.contains(&token.as_str()))
    }
}

/// Whether a family is meaningful for a product class. Meat grades only
/// describe shellfish meat and trims only describe fish fillets.
pub fn applies_to(family: AttributeFamily, class: Option<ProductClass>) -> bool {
    match (family, class) {
        (AttributeFamily::MeatGrade, Some(ProductClass::Finfish)) => false,
        (AttributeFamily::Trim, Some(class)) => !class.is_shellfish(),
        _ => true,
    }
}

pub fn extract_code(
    index: &AliasIndex,
    family: AttributeFamily,
    tokens: &[String],
) -> Option<String> {
    let rules = EXCLUSION_RULES
        .iter()
        .filter(|rule| rule.family == family)
        .collect::<Vec<&ExclusionRule>>();
    best_alias(index.family(family), tokens, |alias, position| {
        !rules.iter().any(|rule| rule.rejects(alias, tokens, position))
    })
    .map(|alias| alias.code.clone())
}

/// Extracts a family only when it applies to the resolved product class.
pub fn extract_for_class(
    index: &AliasIndex,
    family: AttributeFamily,
    class: Option<ProductClass>,
    tokens: &[String],
) -> Option<String> {
    if !applies_to(family, class) {
        return None;
    }
    extract_code(index, family, tokens)
}

pub fn extract_brand(index: &AliasIndex, tokens: &[String]) -> Option<String> {
    best_alias(index.brands(), tokens, |_, _| true).map(|alias| alias.code.clone())
}

/// Longest alias of `table` present in `tokens` at a position `accept`
/// allows; earliest position on equal length.
pub fn best_alias<'a, F>(table: &'a CodeTable, tokens: &[String], accept: F) -> Option<&'a CodeAlias>
where
    F: Fn(&CodeAlias, usize) -> bool,
{
    table
        .aliases()
        .iter()
        .filter_map(|alias| {
            find_all(tokens, &alias.tokens)
                .find(|&position| accept(alias, position))
                .map(|position| (alias, position))
        })
        .min_by_key(|(alias, position)| (Reverse(alias.len()), *position))
        .map(|(alias, _)| alias)
}
