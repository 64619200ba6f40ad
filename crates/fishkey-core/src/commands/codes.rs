use std::path::Path;

use serde_json::json;

use crate::alias::{AliasIndex, AttributeFamily, CodeTable};
use crate::commands::common::load_index;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{CodeFamilyListing, CodeListData, CodeLookup};
use crate::{FishkeyError, FishkeyResult};

const COUNTRIES: &str = "countries";
const BRANDS: &str = "brands";

#[derive(Debug, Default)]
pub struct CodesOptions<'a> {
    pub family: Option<String>,
    /// Free text to map onto the family's standard code.
    pub lookup: Option<String>,
    pub data_dir: Option<&'a Path>,
}

pub fn run(family: Option<&str>) -> FishkeyResult<SuccessEnvelope> {
    run_with_options(CodesOptions {
        family: family.map(str::to_string),
        lookup: None,
        data_dir: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: CodesOptions<'_>) -> FishkeyResult<SuccessEnvelope> {
    let loaded = load_index(options.data_dir)?;
    let index = loaded.index.as_ref();

    let selected = match options.family.as_deref() {
        Some(name) => vec![CodeSelection::parse(name)?],
        None => CodeSelection::all(),
    };

    let lookup = match options.lookup {
        Some(text) => {
            let [selection] = selected.as_slice() else {
                return Err(FishkeyError::invalid_argument_for_command(
                    "`--lookup` needs a code family, e.g. `fishkey codes form --lookup FILLET`.",
                    Some("codes"),
                ));
            };
            let code = selection.table(index).standardize(&text).map(str::to_string);
            Some(CodeLookup {
                family: selection.name().to_string(),
                text,
                code,
            })
        }
        None => None,
    };

    let twice_frozen_processing = selected
        .iter()
        .any(|selection| matches!(selection, CodeSelection::Countries))
        .then(|| {
            index
                .twice_frozen_processors()
                .map(str::to_string)
                .collect::<Vec<String>>()
        });

    let families = selected
        .iter()
        .map(|selection| CodeFamilyListing {
            family: selection.name().to_string(),
            codes: selection.table(index).entries().cloned().collect(),
        })
        .collect();

    let data = CodeListData {
        reference_source: loaded.source.describe(),
        families,
        twice_frozen_processing,
        lookup,
    };
    success("codes", data)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeSelection {
    Family(AttributeFamily),
    Countries,
    Brands,
}

impl CodeSelection {
    fn all() -> Vec<Self> {
        AttributeFamily::ALL
            .into_iter()
            .map(Self::Family)
            .chain([Self::Countries, Self::Brands])
            .collect()
    }

    fn parse(value: &str) -> FishkeyResult<Self> {
        if let Some(family) = AttributeFamily::parse(value) {
            return Ok(Self::Family(family));
        }
        match value.trim().to_ascii_lowercase().as_str() {
            "countries" | "country" => Ok(Self::Countries),
            "brands" | "brand" => Ok(Self::Brands),
            _ => Err(unknown_family(value)),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Family(family) => family.as_str(),
            Self::Countries => COUNTRIES,
            Self::Brands => BRANDS,
        }
    }

    fn table(self, index: &AliasIndex) -> &CodeTable {
        match self {
            Self::Family(family) => index.family(family),
            Self::Countries => index.countries(),
            Self::Brands => index.brands(),
        }
    }
}

fn unknown_family(value: &str) -> FishkeyError {
    let known = CodeSelection::all()
        .into_iter()
        .map(CodeSelection::name)
        .collect::<Vec<&str>>();
    FishkeyError::new(
        "unknown_code_family",
        &format!("Unknown code family `{value}`."),
        vec![
            format!("Use one of: {}.", known.join(", ")),
            "Run `fishkey codes` to list every family.".to_string(),
        ],
    )
    .with_data(json!({
        "family": value,
        "known_families": known,
    }))
}
