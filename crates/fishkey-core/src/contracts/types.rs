use serde::Serialize;

use crate::alias::{CodeEntry, SubcategoryInfo};
use crate::matcher::MatchResult;
use crate::record::AttributeRecord;

#[derive(Debug, Clone, Serialize)]
pub struct ParseData {
    pub reference_source: String,
    pub comparison_key: String,
    pub record: AttributeRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyField {
    pub field: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyData {
    pub raw: String,
    pub comparison_key: String,
    pub fields: Vec<KeyField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchSide {
    pub comparison_key: String,
    pub record: AttributeRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchData {
    pub policy_version: String,
    pub left: MatchSide,
    pub right: MatchSide,
    pub result: MatchResult,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FindMatchRow {
    /// 1-based position of the candidate in the input.
    pub row: usize,
    pub description: String,
    pub confidence: f64,
    pub comparison_key: String,
    pub recommendation: String,
    pub differences: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FindData {
    pub policy_version: String,
    pub threshold: f64,
    pub source_used: String,
    pub query: MatchSide,
    pub candidates_read: usize,
    pub matches: Vec<FindMatchRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub rows_read: usize,
    pub species_resolved: usize,
    pub species_unresolved: usize,
    pub distinct_keys: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRow {
    pub row: usize,
    pub comparison_key: String,
    pub record: AttributeRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchData {
    pub source_used: String,
    pub input_format: String,
    pub summary: BatchSummary,
    pub rows: Vec<BatchRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CodeFamilyListing {
    pub family: String,
    pub codes: Vec<CodeEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CodeLookup {
    pub family: String,
    pub text: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CodeListData {
    pub reference_source: String,
    pub families: Vec<CodeFamilyListing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twice_frozen_processing: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup: Option<CodeLookup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryListing {
    pub id: String,
    pub name: String,
    pub class: String,
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_subcategory: Option<String>,
    pub subcategory_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeciesListData {
    pub reference_source: String,
    pub categories: Vec<CategoryListing>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeciesDetailData {
    pub reference_source: String,
    pub category: CategoryListing,
    pub context: Vec<String>,
    pub subcategories: Vec<SubcategoryInfo>,
}
