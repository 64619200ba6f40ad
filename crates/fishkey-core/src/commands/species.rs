use std::path::Path;

use serde_json::json;

use crate::alias::CategoryInfo;
use crate::commands::common::load_index;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{CategoryListing, SpeciesDetailData, SpeciesListData};
use crate::{FishkeyError, FishkeyResult};

#[derive(Debug, Default)]
pub struct SpeciesOptions<'a> {
    pub category: Option<String>,
    pub data_dir: Option<&'a Path>,
}

pub fn run(category: Option<&str>) -> FishkeyResult<SuccessEnvelope> {
    run_with_options(SpeciesOptions {
        category: category.map(str::to_string),
        data_dir: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: SpeciesOptions<'_>) -> FishkeyResult<SuccessEnvelope> {
    let loaded = load_index(options.data_dir)?;
    let reference_source = loaded.source.describe();

    let Some(requested) = options.category else {
        let data = SpeciesListData {
            reference_source,
            categories: loaded.index.categories().map(listing).collect(),
        };
        return success("species", data);
    };

    let id = requested.trim().to_lowercase().replace([' ', '-'], "_");
    let Some(category) = loaded.index.category(&id) else {
        return Err(FishkeyError::new(
            "unknown_category",
            &format!("Unknown species category `{requested}`."),
            vec![
                "Run `fishkey species` to list categories.".to_string(),
                "Use the category id, e.g. `fishkey species sea_bass`.".to_string(),
            ],
        )
        .with_data(json!({
            "category": requested,
        })));
    };

    let data = SpeciesDetailData {
        reference_source,
        category: listing(category),
        context: category
            .context
            .iter()
            .map(|term| term.join(" "))
            .collect(),
        subcategories: category.subcategories.values().cloned().collect(),
    };
    success("species", data)
}

fn listing(category: &CategoryInfo) -> CategoryListing {
    CategoryListing {
        id: category.id.clone(),
        name: category.name.clone(),
        class: category.class.as_str().to_string(),
        aliases: category.aliases.clone(),
        default_subcategory: category.default_subcategory.clone(),
        subcategory_count: category.subcategories.len(),
    }
}
