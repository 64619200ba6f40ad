//! Immutable lookup view over the reference tables.
//!
//! An [`AliasIndex`] is built once from [`ReferenceData`], validated for
//! ambiguous aliases, and then shared read-only by every parse. Alias lists
//! are pre-tokenized with the same tokenizer descriptions go through and are
//! kept longest-first so extractors can stop at the first hit per position.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

use crate::config::ReferenceSource;
use crate::extract::origin;
use crate::normalize::{NormalizedText, SplitVocabulary, normalize, tokenize};
use crate::reference::{AliasSpec, CodeSpec, MinContext, ProductClass, ReferenceData};
use crate::{FishkeyError, FishkeyResult};

static BUILTIN: LazyLock<FishkeyResult<Arc<AliasIndex>>> =
    LazyLock::new(|| AliasIndex::bundled().map(Arc::new));

static EMPTY_TABLE: CodeTable = CodeTable {
    table: String::new(),
    aliases: Vec::new(),
    entries: BTreeMap::new(),
};

/// The index over the tables compiled into the crate, built on first use.
pub fn builtin() -> FishkeyResult<Arc<AliasIndex>> {
    BUILTIN.clone()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeFamily {
    Form,
    Skin,
    Bone,
    Trim,
    Pack,
    Storage,
    CutStyle,
    Harvest,
    MeatGrade,
    Preparation,
    ValueAdded,
}

impl AttributeFamily {
    pub const ALL: [Self; 11] = [
        Self::Form,
        Self::Skin,
        Self::Bone,
        Self::Trim,
        Self::Pack,
        Self::Storage,
        Self::CutStyle,
        Self::Harvest,
        Self::MeatGrade,
        Self::Preparation,
        Self::ValueAdded,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Skin => "skin",
            Self::Bone => "bone",
            Self::Trim => "trim",
            Self::Pack => "pack",
            Self::Storage => "storage",
            Self::CutStyle => "cut_style",
            Self::Harvest => "harvest",
            Self::MeatGrade => "meat_grade",
            Self::Preparation => "preparation",
            Self::ValueAdded => "value_added",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let wanted = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|family| family.as_str() == wanted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub alias: String,
    pub tokens: Vec<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub min_context: MinContext,
    pub order_insensitive: bool,
}

impl AliasEntry {
    pub fn len(&self) -> usize {
        self.alias.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.alias.is_empty()
    }

    fn target(&self) -> String {
        match &self.subcategory {
            Some(subcategory) => format!("{}/{subcategory}", self.category),
            None => self.category.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubcategoryInfo {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harvest: Option<String>,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
    pub class: ProductClass,
    /// Category id read as words, e.g. `SEA BASS` for `sea_bass`.
    pub canonical: Vec<String>,
    pub context: Vec<Vec<String>>,
    pub aliases: Vec<String>,
    pub default_subcategory: Option<String>,
    pub subcategories: BTreeMap<String, SubcategoryInfo>,
}

impl CategoryInfo {
    pub fn display_name(&self, subcategory: Option<&str>) -> String {
        subcategory
            .and_then(|id| self.subcategories.get(id))
            .map(|info| info.name.clone())
            .unwrap_or_else(|| self.name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAlias {
    pub alias: String,
    pub tokens: Vec<String>,
    pub code: String,
}

impl CodeAlias {
    pub fn len(&self) -> usize {
        self.alias.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.alias.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CodeEntry {
    pub code: String,
    pub name: String,
    pub aliases: Vec<String>,
}

/// One code family (or the country or brand list) with aliases ranked
/// longest first.
#[derive(Debug, Clone)]
pub struct CodeTable {
    table: String,
    aliases: Vec<CodeAlias>,
    entries: BTreeMap<String, CodeEntry>,
}

impl CodeTable {
    fn build<'a, I>(table: &str, specs: I) -> FishkeyResult<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a CodeSpec)>,
    {
        let mut aliases = Vec::new();
        let mut entries = BTreeMap::new();
        let mut owner_by_tokens: HashMap<Vec<String>, String> = HashMap::new();

        for (code, spec) in specs {
            for alias in &spec.aliases {
                let tokens = tokenize(alias);
                if tokens.is_empty() {
                    return Err(FishkeyError::invalid_reference_data(
                        table,
                        &format!("code `{code}` has an empty alias"),
                    ));
                }
                if let Some(owner) = owner_by_tokens.get(&tokens) {
                    if owner != code {
                        return Err(FishkeyError::ambiguous_alias(table, alias, owner, code));
                    }
                    continue;
                }
                owner_by_tokens.insert(tokens.clone(), code.clone());
                aliases.push(CodeAlias {
                    alias: tokens.join(" "),
                    tokens,
                    code: code.clone(),
                });
            }
            entries.insert(
                code.clone(),
                CodeEntry {
                    code: code.clone(),
                    name: spec.name.clone(),
                    aliases: spec.aliases.clone(),
                },
            );
        }

        aliases.sort_by_key(|alias| std::cmp::Reverse(alias.len()));
        Ok(Self {
            table: table.to_string(),
            aliases,
            entries,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn aliases(&self) -> &[CodeAlias] {
        &self.aliases
    }

    pub fn entries(&self) -> impl Iterator<Item = &CodeEntry> {
        self.entries.values()
    }

    pub fn entry(&self, code: &str) -> Option<&CodeEntry> {
        self.entries.get(code)
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Resolves text that is exactly one alias or one code.
    pub fn standardize(&self, text: &str) -> Option<&str> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return None;
        }
        if let Some(hit) = self.aliases.iter().find(|alias| alias.tokens == tokens) {
            return Some(hit.code.as_str());
        }
        let joined = tokens.join(" ");
        self.entries.get_key_value(&joined).map(|(code, _)| code.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct AliasIndex {
    categories: BTreeMap<String, CategoryInfo>,
    species_aliases: Vec<AliasEntry>,
    families: BTreeMap<AttributeFamily, CodeTable>,
    countries: CodeTable,
    twice_frozen: BTreeSet<String>,
    brands: CodeTable,
    vocabulary: SplitVocabulary,
}

impl AliasIndex {
    pub fn bundled() -> FishkeyResult<Self> {
        Self::from_reference(ReferenceData::bundled()?)
    }

    pub fn load(source: &ReferenceSource) -> FishkeyResult<Self> {
        let index = Self::from_reference(ReferenceData::load(source)?)?;
        tracing::debug!(source = %source.describe(), "loaded reference data");
        Ok(index)
    }

    pub fn from_reference(data: ReferenceData) -> FishkeyResult<Self> {
        let (categories, species_aliases) = build_species(&data)?;

        let mut families = BTreeMap::new();
        for family in AttributeFamily::ALL {
            let table = match data.codes.families.get(&family) {
                Some(specs) => CodeTable::build(family.as_str(), specs)?,
                None => CodeTable::build(family.as_str(), std::iter::empty())?,
            };
            families.insert(family, table);
        }

        let countries = CodeTable::build("countries", &data.codes.countries)?;
        let mut twice_frozen = BTreeSet::new();
        for code in &data.codes.twice_frozen_processing {
            if !countries.contains_code(code) {
                return Err(FishkeyError::invalid_reference_data(
                    "codes.json",
                    &format!("twice-frozen processor `{code}` is not a known country"),
                ));
            }
            twice_frozen.insert(code.clone());
        }

        let brand_specs = data
            .codes
            .brands
            .iter()
            .map(|(name, aliases)| {
                (
                    name.clone(),
                    CodeSpec {
                        name: name.clone(),
                        aliases: aliases.clone(),
                    },
                )
            })
            .collect::<BTreeMap<String, CodeSpec>>();
        let brands = CodeTable::build("brands", &brand_specs)?;

        let vocabulary = build_vocabulary(&categories, &species_aliases, &families, &countries, &brands);

        tracing::debug!(
            categories = categories.len(),
            species_aliases = species_aliases.len(),
            countries = countries.len(),
            brands = brands.len(),
            "built alias index"
        );

        Ok(Self {
            categories,
            species_aliases,
            families,
            countries,
            twice_frozen,
            brands,
            vocabulary,
        })
    }

    pub fn normalize(&self, raw: &str) -> NormalizedText {
        normalize(raw, &self.vocabulary)
    }

    pub fn category(&self, id: &str) -> Option<&CategoryInfo> {
        self.categories.get(id)
    }

    pub fn categories(&self) -> impl Iterator<Item = &CategoryInfo> {
        self.categories.values()
    }

    /// Every species alias, longest first.
    pub fn species_aliases(&self) -> &[AliasEntry] {
        &self.species_aliases
    }

    /// Subcategory aliases of one category regardless of context flag,
    /// longest first.
    pub fn subcategory_aliases<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a AliasEntry> + 'a {
        self.species_aliases
            .iter()
            .filter(move |entry| entry.category == category && entry.subcategory.is_some())
    }

    pub fn family(&self, family: AttributeFamily) -> &CodeTable {
        self.families.get(&family).unwrap_or(&EMPTY_TABLE)
    }

    pub fn countries(&self) -> &CodeTable {
        &self.countries
    }

    pub fn brands(&self) -> &CodeTable {
        &self.brands
    }

    pub fn is_twice_frozen_processor(&self, country: &str) -> bool {
        self.twice_frozen.contains(country)
    }

    pub fn twice_frozen_processors(&self) -> impl Iterator<Item = &str> {
        self.twice_frozen.iter().map(String::as_str)
    }

    /// Maps free text to the family's standard code when the text is exactly
    /// one alias or one code, e.g. `FILLET` to `FIL`.
    pub fn standardize(&self, family: AttributeFamily, text: &str) -> Option<String> {
        self.family(family).standardize(text).map(str::to_string)
    }

    pub fn list_codes(&self, family: AttributeFamily) -> Vec<&CodeEntry> {
        self.family(family).entries().collect()
    }
}

fn build_species(
    data: &ReferenceData,
) -> FishkeyResult<(BTreeMap<String, CategoryInfo>, Vec<AliasEntry>)> {
    let mut categories = BTreeMap::new();
    let mut entries = Vec::new();
    let mut establishing: HashMap<Vec<String>, AliasEntry> = HashMap::new();

    for (id, spec) in &data.species {
        let canonical = tokenize(&id.replace('_', " "));
        if canonical.is_empty() {
            return Err(FishkeyError::invalid_reference_data(
                "species.json",
                &format!("category id `{id}` has no usable name"),
            ));
        }

        let mut within_category: HashMap<Vec<String>, AliasEntry> = HashMap::new();
        let mut category_entries = Vec::new();
        let mut aliases = Vec::new();
        for alias in &spec.aliases {
            let entry = alias_entry(id, None, alias)?;
            aliases.push(entry.alias.clone());
            category_entries.push(entry);
        }

        let mut subcategories = BTreeMap::new();
        for (sub_id, sub_spec) in &spec.subcategories {
            let mut sub_aliases = Vec::new();
            for alias in &sub_spec.aliases {
                let entry = alias_entry(id, Some(sub_id), alias)?;
                sub_aliases.push(entry.alias.clone());
                category_entries.push(entry);
            }
            subcategories.insert(
                sub_id.clone(),
                SubcategoryInfo {
                    id: sub_id.clone(),
                    name: sub_spec.name.clone(),
                    price_tier: sub_spec.price_tier.clone(),
                    harvest: sub_spec.harvest.clone(),
                    aliases: sub_aliases,
                },
            );
        }

        if let Some(default) = &spec.default
            && !subcategories.contains_key(default)
        {
            return Err(FishkeyError::invalid_reference_data(
                "species.json",
                &format!("category `{id}` defaults to unknown subcategory `{default}`"),
            ));
        }

        for entry in category_entries {
            if let Some(existing) = within_category.get(&entry.tokens) {
                if existing.target() != entry.target() {
                    return Err(FishkeyError::ambiguous_alias(
                        "species",
                        &entry.alias,
                        &existing.target(),
                        &entry.target(),
                    ));
                }
                continue;
            }
            if entry.min_context.establishes_category() {
                if let Some(existing) = establishing.get(&entry.tokens)
                    && existing.target() != entry.target()
                {
                    return Err(FishkeyError::ambiguous_alias(
                        "species",
                        &entry.alias,
                        &existing.target(),
                        &entry.target(),
                    ));
                }
                establishing.insert(entry.tokens.clone(), entry.clone());
            }
            within_category.insert(entry.tokens.clone(), entry.clone());
            entries.push(entry);
        }

        categories.insert(
            id.clone(),
            CategoryInfo {
                id: id.clone(),
                name: spec.name.clone(),
                class: spec.class,
                canonical,
                context: spec
                    .context
                    .iter()
                    .map(|term| tokenize(term))
                    .filter(|tokens| !tokens.is_empty())
                    .collect(),
                aliases,
                default_subcategory: spec.default.clone(),
                subcategories,
            },
        );
    }

    entries.sort_by_key(|entry| std::cmp::Reverse(entry.len()));
    Ok((categories, entries))
}

fn alias_entry(
    category: &str,
    subcategory: Option<&String>,
    spec: &AliasSpec,
) -> FishkeyResult<AliasEntry> {
    let tokens = tokenize(spec.alias());
    if tokens.is_empty() {
        return Err(FishkeyError::invalid_reference_data(
            "species.json",
            &format!("category `{category}` has an empty alias"),
        ));
    }
    if spec.order_insensitive() && tokens.len() != 2 {
        return Err(FishkeyError::invalid_reference_data(
            "species.json",
            &format!(
                "alias `{}` is order-insensitive but is not two words",
                spec.alias()
            ),
        ));
    }
    Ok(AliasEntry {
        alias: tokens.join(" "),
        tokens,
        category: category.to_string(),
        subcategory: subcategory.cloned(),
        min_context: spec.context(),
        order_insensitive: spec.order_insensitive(),
    })
}

fn build_vocabulary(
    categories: &BTreeMap<String, CategoryInfo>,
    species_aliases: &[AliasEntry],
    families: &BTreeMap<AttributeFamily, CodeTable>,
    countries: &CodeTable,
    brands: &CodeTable,
) -> SplitVocabulary {
    let mut vocabulary = SplitVocabulary::default();

    for category in categories.values() {
        for word in category.canonical.iter().chain(category.context.iter().flatten()) {
            vocabulary.insert_known(word);
        }
    }
    for entry in species_aliases {
        for word in &entry.tokens {
            vocabulary.insert_known(word);
        }
    }
    for table in families.values() {
        for alias in table.aliases() {
            if let [single] = alias.tokens.as_slice() {
                vocabulary.insert_piece(single);
            } else {
                for word in &alias.tokens {
                    vocabulary.insert_known(word);
                }
            }
        }
        for entry in table.entries() {
            vocabulary.insert_piece(&entry.code);
        }
    }
    for table in [countries, brands] {
        for alias in table.aliases() {
            for word in &alias.tokens {
                vocabulary.insert_known(word);
            }
        }
        for entry in table.entries() {
            vocabulary.insert_known(&entry.code);
        }
    }
    for word in origin::marker_words() {
        vocabulary.insert_known(word);
    }

    vocabulary
}
