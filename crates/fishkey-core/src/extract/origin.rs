//! Country of origin, split into where the product was harvested and where
//! it was processed.
//!
//! A marker word (`PRODUCT OF`, `CAUGHT`, `PROCESSED`, ...) opens a short
//! window of following tokens; the first country found in that window
//! belongs to the marker's side. Country codes such as `CHN` only count
//! inside a window. When no marker yields a country, the longest country
//! alias anywhere in the text is taken as the harvest country.

use serde::Serialize;

use crate::alias::AliasIndex;
use crate::extract::codes::best_alias;

const WINDOW_LEN: usize = 3;
const WINDOW_LEAD: &str = "IN";

const HARVEST_MARKERS: &[&[&str]] = &[
    &["WILD", "CAUGHT"],
    &["FARM", "RAISED"],
    &["PRODUCT", "OF"],
    &["IMPORTED", "FROM"],
    &["CAUGHT"],
    &["HARVESTED"],
    &["FARMED"],
    &["FISHED"],
    &["SOURCED"],
    &["ORIGIN"],
    &["FROM"],
    &["WILD"],
];

const PROCESSING_MARKERS: &[&[&str]] = &[
    &["PROCESSED"],
    &["REPROCESSED"],
    &["PROC"],
    &["REPROC"],
    &["PACKED"],
    &["PACKAGED"],
    &["PKD"],
    &["CUT"],
    &["PORTIONED"],
    &["FILLETED"],
];

/// Markers that are part of a cut or pack description when preceded by one
/// of `after`, e.g. `CENTER CUT` or `VACUUM PACKED`.
struct MarkerGuard {
    marker: &'static str,
    after: &'static [&'static str],
}

const MARKER_GUARDS: &[MarkerGuard] = &[
    MarkerGuard {
        marker: "CUT",
        after: &["CENTER", "CTR", "BIAS", "BLOCK", "RANDOM"],
    },
    MarkerGuard {
        marker: "PACKED",
        after: &["VACUUM", "VAC", "LAYER"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Harvest,
    Processing,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Origins {
    pub harvest: Option<String>,
    pub processed: Option<String>,
}

impl Origins {
    /// Single-country view: harvest country, else processing country.
    pub fn legacy(&self) -> Option<String> {
        self.harvest.clone().or_else(|| self.processed.clone())
    }
}

pub fn marker_words() -> impl Iterator<Item = &'static str> {
    HARVEST_MARKERS
        .iter()
        .chain(PROCESSING_MARKERS.iter())
        .flat_map(|marker| marker.iter().copied())
}

pub fn resolve_origins(index: &AliasIndex, tokens: &[String]) -> Origins {
    let mut origins = Origins::default();

    let mut position = 0;
    while position < tokens.len() {
        let Some((side, width)) = marker_at(tokens, position) else {
            position += 1;
            continue;
        };
        let slot = match side {
            Side::Harvest => &mut origins.harvest,
            Side::Processing => &mut origins.processed,
        };
        if slot.is_none() {
            *slot = country_in_window(index, window_after(tokens, position + width));
        }
        position += width;
    }

    if origins.harvest.is_none() && origins.processed.is_none() {
        origins.harvest =
            best_alias(index.countries(), tokens, |_, _| true).map(|alias| alias.code.clone());
    }

    origins
}

fn marker_at(tokens: &[String], position: usize) -> Option<(Side, usize)> {
    let harvest = HARVEST_MARKERS.iter().map(|marker| (Side::Harvest, *marker));
    let processing = PROCESSING_MARKERS
        .iter()
        .map(|marker| (Side::Processing, *marker));

    harvest
        .chain(processing)
        .filter(|(_, marker)| matches_at(tokens, position, marker))
        .filter(|(_, marker)| !guarded(tokens, position, marker))
        .max_by_key(|(_, marker)| marker.len())
        .map(|(side, marker)| (side, marker.len()))
}

fn matches_at(tokens: &[String], position: usize, marker: &[&str]) -> bool {
    tokens
        .get(position..position + marker.len())
        .is_some_and(|window| window.iter().zip(marker).all(|(token, word)| token == word))
}

fn guarded(tokens: &[String], position: usize, marker: &[&str]) -> bool {
    let Some(previous) = position.checked_sub(1).and_then(|at| tokens.get(at)) else {
        return false;
    };
    MARKER_GUARDS.iter().any(|guard| {
        marker.len() == 1 && marker[0] == guard.marker && guard.after.contains(&previous.as_str())
    })
}

fn window_after(tokens: &[String], start: usize) -> &[String] {
    let mut start = start.min(tokens.len());
    if tokens.get(start).is_some_and(|token| token == WINDOW_LEAD) {
        start += 1;
    }
    let mut end = start;
    while end < tokens.len() && end - start < WINDOW_LEN && marker_at(tokens, end).is_none() {
        end += 1;
    }
    &tokens[start..end]
}

/// First position in the window holding a country alias (longest at that
/// position) or a bare country code.
fn country_in_window(index: &AliasIndex, window: &[String]) -> Option<String> {
    let countries = index.countries();
    (0..window.len()).find_map(|offset| {
        let rest = &window[offset..];
        countries
            .aliases()
            .iter()
            .find(|alias| rest.starts_with(&alias.tokens))
            .map(|alias| alias.code.clone())
            .or_else(|| {
                countries
                    .contains_code(&rest[0])
                    .then(|| rest[0].clone())
            })
    })
}
