use serde::Serialize;

use crate::alias::{AliasIndex, AttributeFamily};
use crate::extract::codes::{extract_brand, extract_for_class};
use crate::extract::origin::resolve_origins;
use crate::extract::size::{extract_count, extract_size};
use crate::extract::species::{Species, extract_species};
use crate::freeze::{FreezeCycle, ProcessingGeography, infer_freeze_cycle};

const FRESH_STORAGE: &str = "FRSH";

/// Structured attributes of one catalog description. Attributes the text
/// does not state are `None` and left out of serialized output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttributeRecord {
    pub raw: String,
    pub normalized: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<Species>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cut_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harvest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meat_grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_added: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_harvest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_processed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeze_cycle: Option<FreezeCycle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

/// Attributes the comparison key and the matcher look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Category,
    Subcategory,
    Form,
    Skin,
    Bone,
    Trim,
    SizeBucket,
    MeatGrade,
    Preparation,
    ValueAdded,
    CutStyle,
    Harvest,
    Origin,
    Pack,
    Storage,
    FreezeCycle,
}

impl Attribute {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Subcategory => "subcategory",
            Self::Form => "form",
            Self::Skin => "skin",
            Self::Bone => "bone",
            Self::Trim => "trim",
            Self::SizeBucket => "size_bucket",
            Self::MeatGrade => "meat_grade",
            Self::Preparation => "preparation",
            Self::ValueAdded => "value_added",
            Self::CutStyle => "cut_style",
            Self::Harvest => "harvest",
            Self::Origin => "origin",
            Self::Pack => "pack",
            Self::Storage => "storage",
            Self::FreezeCycle => "freeze_cycle",
        }
    }
}

impl AttributeRecord {
    pub fn category(&self) -> Option<&str> {
        self.species.as_ref().map(|species| species.category.as_str())
    }

    pub fn subcategory(&self) -> Option<&str> {
        self.species
            .as_ref()
            .and_then(|species| species.subcategory.as_deref())
    }

    pub fn species_name(&self) -> Option<&str> {
        self.species.as_ref().map(|species| species.name.as_str())
    }

    pub fn attribute(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::Category => self.category(),
            Attribute::Subcategory => self.subcategory(),
            Attribute::Form => self.form.as_deref(),
            Attribute::Skin => self.skin.as_deref(),
            Attribute::Bone => self.bone.as_deref(),
            Attribute::Trim => self.trim.as_deref(),
            Attribute::SizeBucket => self.size_bucket.as_deref(),
            Attribute::MeatGrade => self.meat_grade.as_deref(),
            Attribute::Preparation => self.preparation.as_deref(),
            Attribute::ValueAdded => self.value_added.as_deref(),
            Attribute::CutStyle => self.cut_style.as_deref(),
            Attribute::Harvest => self.harvest.as_deref(),
            Attribute::Origin => self.origin.as_deref(),
            Attribute::Pack => self.pack.as_deref(),
            Attribute::Storage => self.storage.as_deref(),
            Attribute::FreezeCycle => self.freeze_cycle.map(FreezeCycle::as_str),
        }
    }
}

/// Parses one free-text description. Never fails: text that resolves
/// nothing yields a record with every attribute absent.
pub fn parse(index: &AliasIndex, raw: &str) -> AttributeRecord {
    let normalized = index.normalize(raw);
    let tokens = normalized.tokens.as_slice();

    let species = extract_species(index, tokens);
    let class = species.as_ref().map(|species| species.class);
    let code = |family: AttributeFamily| extract_for_class(index, family, class, tokens);

    let size = extract_size(&normalized.text);
    let size_bucket = size
        .as_ref()
        .and_then(|size| size.bucket())
        .map(str::to_string);

    let storage = code(AttributeFamily::Storage);
    let origins = resolve_origins(index, tokens);
    let geography = ProcessingGeography::classify(
        index,
        origins.harvest.as_deref(),
        origins.processed.as_deref(),
    );
    let fresh = storage.as_deref() == Some(FRESH_STORAGE);
    let freeze_cycle = infer_freeze_cycle(class, fresh, geography);

    AttributeRecord {
        raw: raw.to_string(),
        species,
        form: code(AttributeFamily::Form),
        skin: code(AttributeFamily::Skin),
        bone: code(AttributeFamily::Bone),
        trim: code(AttributeFamily::Trim),
        pack: code(AttributeFamily::Pack),
        storage,
        cut_style: code(AttributeFamily::CutStyle),
        harvest: code(AttributeFamily::Harvest),
        size: size.map(|size| size.raw),
        size_bucket,
        count: extract_count(&normalized.text),
        meat_grade: code(AttributeFamily::MeatGrade),
        preparation: code(AttributeFamily::Preparation),
        value_added: code(AttributeFamily::ValueAdded),
        origin: origins.legacy(),
        origin_harvest: origins.harvest,
        origin_processed: origins.processed,
        freeze_cycle,
        brand: extract_brand(index, tokens),
        normalized: normalized.text,
    }
}

pub fn parse_batch<I, S>(index: &AliasIndex, descriptions: I) -> Vec<AttributeRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    descriptions
        .into_iter()
        .map(|description| parse(index, description.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Attribute, AttributeRecord, parse, parse_batch};
    use crate::alias::builtin;
    use crate::freeze::FreezeCycle;

    fn parsed(raw: &str) -> AttributeRecord {
        match builtin() {
            Ok(index) => parse(&index, raw),
            Err(_) => AttributeRecord::default(),
        }
    }

    #[test]
    fn empty_input_yields_an_empty_record() {
        let record = parsed("   ");
        assert!(record.species.is_none());
        assert!(record.form.is_none());
        assert!(record.size.is_none());
        assert!(record.origin.is_none());
        assert_eq!(record.normalized, "");
    }

    #[test]
    fn absent_attributes_are_not_serialized() {
        let record = parsed("SALMON");
        let value = serde_json::to_value(&record);
        assert!(value.is_ok());
        if let Ok(value) = value {
            assert!(value.get("species").is_some());
            assert!(value.get("form").is_none());
            assert!(value.get("freeze_cycle").is_none());
            assert_eq!(value.get("raw").and_then(|raw| raw.as_str()), Some("SALMON"));
        }
    }

    #[test]
    fn freshness_suppresses_freeze_cycle() {
        let record = parsed("SALMON FIL FRESH WILD ALASKA PROCESSED IN CHINA");
        assert_eq!(record.storage.as_deref(), Some("FRSH"));
        assert_eq!(record.origin_processed.as_deref(), Some("CHN"));
        assert_eq!(record.freeze_cycle, None);

        let record = parsed("SALMON FIL FROZEN WILD ALASKA PROCESSED IN CHINA");
        assert_eq!(record.freeze_cycle, Some(FreezeCycle::Twice));
    }

    #[test]
    fn trim_is_ignored_for_shellfish() {
        let record = parsed("SHRIMP P&D 16/20 E");
        assert!(record.trim.is_none());
        let record = parsed("SALMON FIL TRIM E");
        assert_eq!(record.trim.as_deref(), Some("E"));
    }

    #[test]
    fn attribute_accessor_reads_species_and_freeze() {
        let record = parsed("COD FIL WILD CAUGHT USA PROCESSED IN CHINA");
        assert_eq!(record.attribute(Attribute::Category), Some("cod"));
        assert_eq!(record.attribute(Attribute::FreezeCycle), Some("TWICE"));
        assert_eq!(record.attribute(Attribute::Origin), Some("USA"));
        assert_eq!(record.attribute(Attribute::MeatGrade), None);
    }

    #[test]
    fn batch_parses_in_input_order() {
        let index = builtin();
        assert!(index.is_ok());
        if let Ok(index) = index {
            let records = parse_batch(&index, ["COD LOIN", "", "SHRIMP 16/20"]);
            assert_eq!(records.len(), 3);
            assert_eq!(records[0].category(), Some("cod"));
            assert!(records[1].species.is_none());
            assert_eq!(records[2].count.as_deref(), Some("16/20"));
        }
    }
}
