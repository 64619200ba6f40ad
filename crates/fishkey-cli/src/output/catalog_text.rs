use std::io;

use serde_json::{Map, Value};

use super::format::{self, Column};
use super::record_text::get_str;

pub fn render_codes(data: &Value) -> io::Result<String> {
    let families = data
        .get("families")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("codes output requires families"))?;

    let mut lines = Vec::new();
    if let Some(lookup) = data.get("lookup").and_then(Value::as_object) {
        let family = get_str(lookup, "family");
        let text = get_str(lookup, "text");
        match lookup.get("code").and_then(Value::as_str) {
            Some(code) => lines.push(format!("`{text}` is {family} code {code}.")),
            None => lines.push(format!("`{text}` does not match any {family} code.")),
        }
        lines.push(String::new());
    }

    lines.push(format!("Reference data: {}", reference_source(data)));

    let width = format::terminal_width();
    for family in families.iter().filter_map(Value::as_object) {
        let codes = family
            .get("codes")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        lines.push(String::new());
        lines.push(format!("{} ({}):", get_str(family, "family"), codes.len()));
        let rows = codes
            .iter()
            .filter_map(Value::as_object)
            .map(|entry| {
                vec![
                    get_str(entry, "code"),
                    get_str(entry, "name"),
                    joined(entry, "aliases"),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(format::render_table_or_blocks(
            &[
                Column::left("Code"),
                Column::left("Name"),
                Column::left("Aliases"),
            ],
            &rows,
            width,
            "Code",
        ));
    }

    if let Some(processors) = data.get("twice_frozen_processing").and_then(Value::as_array) {
        let codes = processors
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<&str>>();
        lines.push(String::new());
        lines.push(format!(
            "Processing in these countries after foreign harvest means twice frozen: {}",
            codes.join(", ")
        ));
    }

    Ok(lines.join("\n"))
}

pub fn render_species_list(data: &Value) -> io::Result<String> {
    let categories = data
        .get("categories")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("species output requires categories"))?;

    let mut lines = vec![
        format!("{} species categories.", categories.len()),
        format!("Reference data: {}", reference_source(data)),
        String::new(),
    ];
    let rows = categories
        .iter()
        .filter_map(Value::as_object)
        .map(|category| {
            vec![
                get_str(category, "id"),
                get_str(category, "name"),
                get_str(category, "class"),
                category
                    .get("subcategory_count")
                    .and_then(Value::as_u64)
                    .unwrap_or(0)
                    .to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table_or_blocks(
        &[
            Column::left("Id"),
            Column::left("Name"),
            Column::left("Class"),
            Column::right("Varieties"),
        ],
        &rows,
        format::terminal_width(),
        "Category",
    ));
    lines.push(String::new());
    lines.push("Show one category:".to_string());
    lines.push("  fishkey species <id>".to_string());

    Ok(lines.join("\n"))
}

pub fn render_species_detail(data: &Value) -> io::Result<String> {
    let category = data
        .get("category")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other("species output requires category"))?;

    let mut entries = vec![
        ("Id:", get_str(category, "id")),
        ("Class:", get_str(category, "class")),
        ("Aliases:", joined(category, "aliases")),
    ];
    if let Some(default) = category.get("default_subcategory").and_then(Value::as_str) {
        entries.push(("Default variety:", default.to_string()));
    }
    let context = data
        .get("context")
        .and_then(Value::as_array)
        .map(|terms| {
            terms
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<&str>>()
                .join(", ")
        })
        .unwrap_or_default();
    if !context.is_empty() {
        entries.push(("Context terms:", context));
    }

    let mut lines = vec![get_str(category, "name"), String::new()];
    lines.extend(format::key_value_rows(&entries, 2));

    let subcategories = data
        .get("subcategories")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    lines.push(String::new());
    if subcategories.is_empty() {
        lines.push("No varieties defined.".to_string());
        return Ok(lines.join("\n"));
    }

    lines.push("Varieties:".to_string());
    let rows = subcategories
        .iter()
        .filter_map(Value::as_object)
        .map(|subcategory| {
            vec![
                get_str(subcategory, "id"),
                get_str(subcategory, "name"),
                optional(subcategory, "price_tier"),
                optional(subcategory, "harvest"),
                joined(subcategory, "aliases"),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table_or_blocks(
        &[
            Column::left("Id"),
            Column::left("Name"),
            Column::left("Tier"),
            Column::left("Harvest"),
            Column::left("Aliases"),
        ],
        &rows,
        format::terminal_width(),
        "Variety",
    ));

    Ok(lines.join("\n"))
}

fn reference_source(data: &Value) -> &str {
    data.get("reference_source")
        .and_then(Value::as_str)
        .unwrap_or("bundled")
}

fn joined(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<&str>>()
                .join(", ")
        })
        .unwrap_or_default()
}

fn optional(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or("-")
        .to_string()
}
