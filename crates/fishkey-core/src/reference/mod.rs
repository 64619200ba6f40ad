//! Curated reference tables: species aliases and attribute code tables.
//!
//! The tables are plain JSON so they can be edited without touching code. A
//! copy of each is compiled into the crate and used unless a data directory
//! is configured.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::alias::AttributeFamily;
use crate::config::ReferenceSource;
use crate::{FishkeyError, FishkeyResult};

pub const SPECIES_FILE: &str = "species.json";
pub const CODES_FILE: &str = "codes.json";

const BUNDLED_SPECIES: &str = include_str!("../../data/species.json");
const BUNDLED_CODES: &str = include_str!("../../data/codes.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductClass {
    Finfish,
    Crustacean,
    Mollusk,
    Cephalopod,
    Roe,
    Other,
}

impl ProductClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Finfish => "finfish",
            Self::Crustacean => "crustacean",
            Self::Mollusk => "mollusk",
            Self::Cephalopod => "cephalopod",
            Self::Roe => "roe",
            Self::Other => "other",
        }
    }

    pub const fn is_shellfish(self) -> bool {
        matches!(self, Self::Crustacean | Self::Mollusk | Self::Cephalopod)
    }
}

/// How much surrounding evidence an alias needs before it may establish a
/// species category on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinContext {
    Whitelist,
    Required,
    #[default]
    #[serde(rename = "none")]
    RefineOnly,
}

impl MinContext {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Whitelist => "whitelist",
            Self::Required => "required",
            Self::RefineOnly => "none",
        }
    }

    pub const fn establishes_category(self) -> bool {
        !matches!(self, Self::RefineOnly)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AliasSpec {
    Plain(String),
    Detailed {
        alias: String,
        #[serde(default)]
        context: MinContext,
        #[serde(default)]
        order_insensitive: bool,
    },
}

impl AliasSpec {
    pub fn alias(&self) -> &str {
        match self {
            Self::Plain(alias) => alias,
            Self::Detailed { alias, .. } => alias,
        }
    }

    pub fn context(&self) -> MinContext {
        match self {
            Self::Plain(_) => MinContext::RefineOnly,
            Self::Detailed { context, .. } => *context,
        }
    }

    pub fn order_insensitive(&self) -> bool {
        match self {
            Self::Plain(_) => false,
            Self::Detailed {
                order_insensitive, ..
            } => *order_insensitive,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    pub class: ProductClass,
    #[serde(default)]
    pub context: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<AliasSpec>,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub subcategories: BTreeMap<String, SubcategorySpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubcategorySpec {
    pub name: String,
    #[serde(default)]
    pub price_tier: Option<String>,
    #[serde(default)]
    pub harvest: Option<String>,
    #[serde(default)]
    pub aliases: Vec<AliasSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeSpec {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodesData {
    pub families: BTreeMap<AttributeFamily, BTreeMap<String, CodeSpec>>,
    pub countries: BTreeMap<String, CodeSpec>,
    #[serde(default)]
    pub twice_frozen_processing: Vec<String>,
    #[serde(default)]
    pub brands: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub species: BTreeMap<String, CategorySpec>,
    pub codes: CodesData,
}

impl ReferenceData {
    pub fn bundled() -> FishkeyResult<Self> {
        Self::from_json(BUNDLED_SPECIES, BUNDLED_CODES)
    }

    pub fn from_json(species: &str, codes: &str) -> FishkeyResult<Self> {
        let species = serde_json::from_str(species).map_err(|error| {
            FishkeyError::invalid_reference_data(SPECIES_FILE, &error.to_string())
        })?;
        let codes = serde_json::from_str(codes)
            .map_err(|error| FishkeyError::invalid_reference_data(CODES_FILE, &error.to_string()))?;
        Ok(Self { species, codes })
    }

    pub fn load_dir(dir: &Path) -> FishkeyResult<Self> {
        let species = read_table(&dir.join(SPECIES_FILE))?;
        let codes = read_table(&dir.join(CODES_FILE))?;
        Self::from_json(&species, &codes)
    }

    pub fn load(source: &ReferenceSource) -> FishkeyResult<Self> {
        match source {
            ReferenceSource::Bundled => Self::bundled(),
            ReferenceSource::Directory(dir) => Self::load_dir(dir),
        }
    }
}

fn read_table(path: &Path) -> FishkeyResult<String> {
    fs::read_to_string(path)
        .map_err(|error| FishkeyError::reference_data_unreadable(path, &error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{AliasSpec, MinContext, ProductClass, ReferenceData};
    use crate::alias::AttributeFamily;

    #[test]
    fn bundled_tables_deserialize() {
        let data = ReferenceData::bundled();
        assert!(data.is_ok());
        if let Ok(data) = data {
            assert!(data.species.contains_key("salmon"));
            assert!(data.species.contains_key("sea_bass"));
            for family in AttributeFamily::ALL {
                assert!(
                    data.codes.families.contains_key(&family),
                    "missing family {}",
                    family.as_str()
                );
            }
            assert!(data.codes.countries.contains_key("NOR"));
            assert!(!data.codes.twice_frozen_processing.is_empty());
        }
    }

    #[test]
    fn bare_alias_string_refines_only() {
        let parsed = serde_json::from_str::<AliasSpec>("\"ATL\"");
        assert!(parsed.is_ok());
        if let Ok(spec) = parsed {
            assert_eq!(spec.alias(), "ATL");
            assert_eq!(spec.context(), MinContext::RefineOnly);
            assert!(!spec.order_insensitive());
        }
    }

    #[test]
    fn detailed_alias_carries_flags() {
        let parsed = serde_json::from_str::<AliasSpec>(
            r#"{"alias": "STRIPED BASS", "context": "whitelist", "order_insensitive": true}"#,
        );
        assert!(parsed.is_ok());
        if let Ok(spec) = parsed {
            assert_eq!(spec.context(), MinContext::Whitelist);
            assert!(spec.order_insensitive());
        }
    }

    #[test]
    fn unknown_family_is_rejected() {
        let codes = r#"{"families": {"colour": {}}, "countries": {}}"#;
        let result = ReferenceData::from_json("{}", codes);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "reference_data_invalid");
        }
    }

    #[test]
    fn shellfish_classes() {
        assert!(ProductClass::Crustacean.is_shellfish());
        assert!(ProductClass::Cephalopod.is_shellfish());
        assert!(!ProductClass::Finfish.is_shellfish());
        assert!(!ProductClass::Roe.is_shellfish());
    }
}
