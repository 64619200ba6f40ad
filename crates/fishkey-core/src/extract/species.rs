//! Species resolution.
//!
//! Three tiers run in order and the first one that resolves a category
//! wins:
//!
//! 1. a category's own name (`SALMON`, `SEA BASS`) appears in the text,
//!    or appears as a plural or compound (`CRABMEAT`, `SHRIMPS`);
//! 2. a whitelisted alias appears (`SABLEFISH`, `TOOTHFISH`);
//! 3. a context-required alias appears together with one of its category's
//!    context terms (`CHILEAN` only next to `BASS`).
//!
//! Once a category is known, its subcategory is refined from that
//! category's aliases alone, so `KING` means King Crab next to `CRAB` and
//! King Salmon next to `SALMON`.

use std::cmp::Reverse;

use serde::Serialize;

use crate::alias::{AliasEntry, AliasIndex};
use crate::normalize::{contains, find_first};
use crate::reference::{MinContext, ProductClass};

const MIN_CONTEXT_ALIAS_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesTier {
    CategoryName,
    UnambiguousAlias,
    ContextRequired,
}

pub const SPECIES_TIERS: [SpeciesTier; 3] = [
    SpeciesTier::CategoryName,
    SpeciesTier::UnambiguousAlias,
    SpeciesTier::ContextRequired,
];

impl SpeciesTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CategoryName => "category_name",
            Self::UnambiguousAlias => "unambiguous_alias",
            Self::ContextRequired => "context_required",
        }
    }

    fn resolve(self, index: &AliasIndex, tokens: &[String]) -> Option<Resolution> {
        match self {
            Self::CategoryName => by_category_name(index, tokens),
            Self::UnambiguousAlias => by_alias(index, tokens, MinContext::Whitelist),
            Self::ContextRequired => by_alias(index, tokens, MinContext::Required),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Species {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub name: String,
    pub class: ProductClass,
    pub tier: SpeciesTier,
}

#[derive(Debug, Clone)]
struct Resolution {
    category: String,
    subcategory: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct AliasHit<'a> {
    entry: &'a AliasEntry,
    position: usize,
}

impl AliasHit<'_> {
    fn rank(&self) -> (Reverse<usize>, usize) {
        (Reverse(self.entry.len()), self.position)
    }
}

pub fn extract_species(index: &AliasIndex, tokens: &[String]) -> Option<Species> {
    for tier in SPECIES_TIERS {
        let Some(resolution) = tier.resolve(index, tokens) else {
            continue;
        };
        let Some(category) = index.category(&resolution.category) else {
            continue;
        };

        let subcategory = resolution
            .subcategory
            .or_else(|| refine(index, &category.id, tokens).and_then(|hit| hit.entry.subcategory.clone()))
            .or_else(|| category.default_subcategory.clone());

        tracing::debug!(
            tier = tier.as_str(),
            category = %category.id,
            subcategory = subcategory.as_deref().unwrap_or("-"),
            "resolved species"
        );

        return Some(Species {
            name: category.display_name(subcategory.as_deref()),
            category: category.id.clone(),
            subcategory,
            class: category.class,
            tier,
        });
    }
    None
}

/// Longest (then earliest) subcategory alias of `category` in the text.
fn refine<'a>(index: &'a AliasIndex, category: &'a str, tokens: &[String]) -> Option<AliasHit<'a>> {
    best_hit(index.subcategory_aliases(category), tokens)
}

fn best_hit<'a, I>(entries: I, tokens: &[String]) -> Option<AliasHit<'a>>
where
    I: IntoIterator<Item = &'a AliasEntry>,
{
    entries
        .into_iter()
        .filter_map(|entry| {
            position_of(entry, tokens).map(|position| AliasHit { entry, position })
        })
        .min_by_key(AliasHit::rank)
}

fn position_of(entry: &AliasEntry, tokens: &[String]) -> Option<usize> {
    let forward = find_first(tokens, &entry.tokens);
    if !entry.order_insensitive {
        return forward;
    }
    let reversed = entry.tokens.iter().rev().cloned().collect::<Vec<String>>();
    match (forward, find_first(tokens, &reversed)) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

#[derive(Debug, Clone, Copy)]
struct NameHit<'a> {
    category: &'a str,
    start: usize,
    width: usize,
    chars: usize,
}

impl NameHit<'_> {
    fn end(&self) -> usize {
        self.start + self.width
    }

    fn covered_by(&self, other: &NameHit<'_>) -> bool {
        other.width > self.width && other.start <= self.start && self.end() <= other.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameMatch {
    /// The name's tokens appear as they are.
    Exact,
    /// The name's last token carries a plural or compound ending: `CRABMEAT`, `SHRIMPS`.
    Prefix,
}

fn by_category_name(index: &AliasIndex, tokens: &[String]) -> Option<Resolution> {
    resolve_names(index, tokens, NameMatch::Exact)
        .or_else(|| resolve_names(index, tokens, NameMatch::Prefix))
}

fn resolve_names(index: &AliasIndex, tokens: &[String], mode: NameMatch) -> Option<Resolution> {
    let names = index
        .categories()
        .filter_map(|category| {
            let start = match mode {
                NameMatch::Exact => find_first(tokens, &category.canonical),
                NameMatch::Prefix => find_prefixed(tokens, &category.canonical),
            }?;
            Some(NameHit {
                category: category.id.as_str(),
                start,
                width: category.canonical.len(),
                chars: category.canonical.iter().map(String::len).sum(),
            })
        })
        .collect::<Vec<NameHit<'_>>>();

    let survivors = names
        .iter()
        .filter(|name| !names.iter().any(|other| name.covered_by(other)))
        .collect::<Vec<&NameHit<'_>>>();

    let refined = survivors
        .iter()
        .filter_map(|name| refine(index, name.category, tokens).map(|hit| (name, hit)))
        .min_by_key(|(name, hit)| (hit.rank(), name.start));
    if let Some((name, hit)) = refined {
        return Some(Resolution {
            category: name.category.to_string(),
            subcategory: hit.entry.subcategory.clone(),
        });
    }

    survivors
        .iter()
        .min_by_key(|name| (name.start, Reverse(name.chars)))
        .map(|name| Resolution {
            category: name.category.to_string(),
            subcategory: None,
        })
}

/// Endings that turn a category name into a compound or plural:
/// `CRABMEAT`, `SHRIMPS`, `CODFISH`.
const NAME_SUFFIXES: &[&str] = &["S", "ES", "MEAT", "MEATS", "FISH"];

/// First position where `name` appears with its last token extended by one
/// of [`NAME_SUFFIXES`]. `EEL` stays out of `STEELHEAD` and `CHAR` out of
/// `CHARGRILLED`.
fn find_prefixed(tokens: &[String], name: &[String]) -> Option<usize> {
    let (last, leading) = name.split_last()?;
    if tokens.len() < name.len() {
        return None;
    }
    (0..=tokens.len() - name.len()).find(|&start| {
        tokens[start..start + leading.len()] == *leading
            && tokens[start + leading.len()]
                .strip_prefix(last.as_str())
                .is_some_and(|rest| NAME_SUFFIXES.contains(&rest))
    })
}

fn by_alias(index: &AliasIndex, tokens: &[String], context: MinContext) -> Option<Resolution> {
    let eligible = index
        .species_aliases()
        .iter()
        .filter(|entry| entry.min_context == context)
        .filter(|entry| context != MinContext::Required || context_satisfied(index, entry, tokens));

    best_hit(eligible, tokens).map(|hit| Resolution {
        category: hit.entry.category.clone(),
        subcategory: hit.entry.subcategory.clone(),
    })
}

fn context_satisfied(index: &AliasIndex, entry: &AliasEntry, tokens: &[String]) -> bool {
    if entry.tokens.len() == 1 && entry.len() < MIN_CONTEXT_ALIAS_LEN {
        return false;
    }
    index
        .category(&entry.category)
        .is_some_and(|category| category.context.iter().any(|term| contains(tokens, term)))
}

#[cfg(test)]
mod tests {
    use super::{SpeciesTier, extract_species};
    use crate::alias::{AliasIndex, builtin};
    use crate::reference::ReferenceData;

    fn species_of(index: &AliasIndex, raw: &str) -> Option<(String, Option<String>, SpeciesTier)> {
        let normalized = index.normalize(raw);
        extract_species(index, &normalized.tokens)
            .map(|species| (species.category, species.subcategory, species.tier))
    }

    fn name_of(raw: &str) -> Option<String> {
        let index = builtin().ok()?;
        let normalized = index.normalize(raw);
        extract_species(&index, &normalized.tokens).map(|species| species.name)
    }

    #[test]
    fn category_name_refines_with_its_own_aliases() {
        assert_eq!(name_of("SALMON FIL ATL SKON").as_deref(), Some("Atlantic Salmon"));
        assert_eq!(name_of("COD ATLANTIC LOIN").as_deref(), Some("Atlantic Cod"));
        assert_eq!(name_of("CRAB KING LEGS").as_deref(), Some("King Crab"));
        assert_eq!(name_of("KING SALMON FIL").as_deref(), Some("King Salmon"));
    }

    #[test]
    fn category_name_beats_aliases_of_other_categories() {
        assert_eq!(name_of("ABALONE CHILEAN").as_deref(), Some("Abalone"));
        assert_eq!(name_of("SNAPPER YELLOWTAIL FIL").as_deref(), Some("Yellowtail Snapper"));
    }

    #[test]
    fn longer_category_name_covers_shorter_one() {
        let index = builtin();
        assert!(index.is_ok());
        if let Ok(index) = index {
            let resolved = species_of(&index, "CHILEAN SEA BASS FIL");
            assert_eq!(
                resolved,
                Some((
                    "sea_bass".to_string(),
                    Some("chilean".to_string()),
                    SpeciesTier::CategoryName
                ))
            );
        }
    }

    #[test]
    fn category_with_subcategory_match_wins_over_earlier_name() {
        assert_eq!(
            name_of("CAVIAR MASAGO ORNG SMELT ROE").as_deref(),
            Some("Masago (Smelt Roe)")
        );
        assert_eq!(
            name_of("PIKE PERCH FIL ZANDER 4-6 OZ").as_deref(),
            Some("Pike Perch (Zander)")
        );
    }

    fn category_of(raw: &str) -> Option<String> {
        let index = builtin().ok()?;
        species_of(&index, raw).map(|(category, _, _)| category)
    }

    #[test]
    fn category_name_starting_a_longer_token_resolves() {
        assert_eq!(category_of("CRABMEAT LUMP PASTEURIZED").as_deref(), Some("crab"));
        assert_eq!(category_of("LOBSTERMEAT CLAW").as_deref(), Some("lobster"));
        assert_eq!(category_of("SHRIMPS 16/20 P&D").as_deref(), Some("shrimp"));
        assert_eq!(name_of("CRABMEAT BLUE JUMBO LUMP").as_deref(), Some("Blue Crab"));
    }

    #[test]
    fn category_name_inside_a_token_does_not_resolve() {
        assert_eq!(category_of("STEELHEAD FIL").as_deref(), Some("trout"));
        assert_eq!(category_of("CHARGRILLED FIL 6OZ"), None);
        assert_eq!(category_of("SOLEMN COD LOIN").as_deref(), Some("cod"));
    }

    #[test]
    fn longest_subcategory_alias_wins_in_either_order() {
        assert_eq!(
            name_of("YELLOWEDGE GROUPER FIL").as_deref(),
            Some("Yellowedge Grouper")
        );
        assert_eq!(
            name_of("GROUPER YELLOWEDGE FIL").as_deref(),
            Some("Yellowedge Grouper")
        );
        assert_eq!(
            name_of("GROUPER YELLOW EDGE FIL").as_deref(),
            Some("Yellowedge Grouper")
        );
    }

    #[test]
    fn sea_alone_never_means_sea_scallop() {
        assert_eq!(name_of("SEA"), None);
        assert_eq!(name_of("SEA FIL"), None);
        assert_eq!(name_of("SEA SCALLOPS U10").as_deref(), Some("Sea Scallop"));
    }

    #[test]
    fn whitelisted_alias_resolves_without_category_name() {
        let index = builtin();
        assert!(index.is_ok());
        if let Ok(index) = index {
            let resolved = species_of(&index, "SABLEFISH FIL 8OZ");
            assert_eq!(
                resolved,
                Some((
                    "cod".to_string(),
                    Some("black".to_string()),
                    SpeciesTier::UnambiguousAlias
                ))
            );
        }
        assert_eq!(
            name_of("SEABASS FIL BRNZNO 6-8 SKON").as_deref(),
            Some("Branzino (European Sea Bass)")
        );
        assert_eq!(name_of("FISH FOOD CAPELIN").as_deref(), Some("Smelt"));
    }

    #[test]
    fn order_insensitive_alias_matches_reversed() {
        assert_eq!(name_of("BASS STRIPED FIL").as_deref(), Some("Striped Bass"));
        assert_eq!(name_of("STRIPED BASS FIL").as_deref(), Some("Striped Bass"));
    }

    #[test]
    fn context_required_alias_needs_its_context() {
        let index = builtin();
        assert!(index.is_ok());
        if let Ok(index) = index {
            let resolved = species_of(&index, "CHILEAN SEABASS FIL 6OZ");
            assert_eq!(
                resolved,
                Some((
                    "sea_bass".to_string(),
                    Some("chilean".to_string()),
                    SpeciesTier::ContextRequired
                ))
            );
            assert_eq!(species_of(&index, "CHILEAN FIL 6OZ"), None);
        }
    }

    #[test]
    fn refine_only_aliases_never_establish_a_category() {
        assert_eq!(name_of("SAUSAGE ALLIGATOR BAYOU"), None);
        assert_eq!(name_of("ATL SKON 6OZ"), None);
        assert_eq!(name_of("SAMPLE SEAFOOD FRZN"), None);
    }

    #[test]
    fn default_subcategory_applies_when_nothing_refines() {
        assert_eq!(name_of("CONCH MEAT 100% CLEANED").as_deref(), Some("Queen Conch"));
    }

    #[test]
    fn short_context_alias_never_matches() {
        let species = r#"{
            "sea_bass": {"name": "Sea Bass", "class": "finfish", "context": ["BASS"],
                "aliases": [{"alias": "SB", "context": "required"}]}
        }"#;
        let codes = r#"{"families": {}, "countries": {}}"#;
        let data = ReferenceData::from_json(species, codes);
        assert!(data.is_ok());
        if let Ok(data) = data {
            let index = AliasIndex::from_reference(data);
            assert!(index.is_ok());
            if let Ok(index) = index {
                assert_eq!(species_of(&index, "SB BASS FIL"), None);
            }
        }
    }

    #[test]
    fn empty_tokens_resolve_nothing() {
        let index = builtin();
        assert!(index.is_ok());
        if let Ok(index) = index {
            assert!(extract_species(&index, &[]).is_none());
        }
    }
}
