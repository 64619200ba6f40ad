use std::io;

use serde_json::{Map, Value};

use super::format::{self, Column};

/// Record fields shown in text output, in display order.
const ATTRIBUTE_LABELS: &[(&str, &str)] = &[
    ("form", "Form:"),
    ("skin", "Skin:"),
    ("bone", "Bone:"),
    ("trim", "Trim:"),
    ("cut_style", "Cut style:"),
    ("size", "Size:"),
    ("size_bucket", "Size bucket:"),
    ("count", "Count:"),
    ("meat_grade", "Meat grade:"),
    ("preparation", "Preparation:"),
    ("value_added", "Value added:"),
    ("pack", "Pack:"),
    ("storage", "Storage:"),
    ("harvest", "Harvest:"),
    ("origin_harvest", "Harvested in:"),
    ("origin_processed", "Processed in:"),
    ("origin", "Origin:"),
    ("freeze_cycle", "Freeze cycle:"),
    ("brand", "Brand:"),
];

pub fn render_parse(data: &Value) -> io::Result<String> {
    let record = require_object(data, "record", "parse")?;
    let key = data
        .get("comparison_key")
        .and_then(Value::as_str)
        .unwrap_or("");

    let mut lines = vec!["Parsed description.".to_string(), String::new()];
    lines.extend(format::key_value_rows(
        &[
            ("Input:", get_str(record, "raw")),
            ("Normalized:", get_str(record, "normalized")),
            ("Comparison key:", key.to_string()),
        ],
        2,
    ));

    lines.push(String::new());
    lines.push("Attributes:".to_string());
    let attributes = attribute_entries(record);
    if attributes.is_empty() {
        lines.push("  (none recognized)".to_string());
    } else {
        lines.extend(format::key_value_rows(&attributes, 2));
    }

    Ok(lines.join("\n"))
}

pub fn render_key(data: &Value) -> io::Result<String> {
    let key = data
        .get("comparison_key")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("key output requires comparison_key"))?;
    let fields = data
        .get("fields")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("key output requires fields"))?;

    let entries = fields
        .iter()
        .filter_map(Value::as_object)
        .map(|field| {
            let value = field
                .get("value")
                .and_then(Value::as_str)
                .unwrap_or("-")
                .to_string();
            (
                field.get("field").and_then(Value::as_str).unwrap_or(""),
                value,
            )
        })
        .collect::<Vec<(&str, String)>>();

    let mut lines = vec![key.to_string(), String::new(), "Fields:".to_string()];
    lines.extend(format::key_value_rows(&entries, 2));
    Ok(lines.join("\n"))
}

pub fn render_batch(data: &Value) -> io::Result<String> {
    let summary = require_object(data, "summary", "batch")?;
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("batch output requires rows"))?;

    let mut lines = vec!["Batch parse completed.".to_string(), String::new()];
    lines.push("Summary:".to_string());
    lines.extend(format::key_value_rows(
        &[
            ("Source:", get_str_value(data, "source_used")),
            ("Input format:", get_str_value(data, "input_format")),
            ("Rows read:", get_u64(summary, "rows_read").to_string()),
            (
                "Species resolved:",
                get_u64(summary, "species_resolved").to_string(),
            ),
            (
                "Species unresolved:",
                get_u64(summary, "species_unresolved").to_string(),
            ),
            ("Distinct keys:", get_u64(summary, "distinct_keys").to_string()),
        ],
        2,
    ));

    let columns = [
        Column::right("Row"),
        Column::left("Species"),
        Column::left("Comparison Key"),
        Column::left("Description"),
    ];
    let table_rows = rows
        .iter()
        .filter_map(Value::as_object)
        .map(|row| {
            let record = row.get("record").and_then(Value::as_object);
            vec![
                get_u64(row, "row").to_string(),
                record.map(species_label).unwrap_or_else(|| "-".to_string()),
                get_str(row, "comparison_key"),
                record.map(|record| get_str(record, "raw")).unwrap_or_default(),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    lines.push(String::new());
    lines.extend(format::render_table_or_blocks(
        &columns,
        &table_rows,
        format::terminal_width(),
        "Row",
    ));
    Ok(lines.join("\n"))
}

pub(super) fn species_label(record: &Map<String, Value>) -> String {
    let Some(species) = record.get("species").and_then(Value::as_object) else {
        return "-".to_string();
    };
    let name = get_str(species, "name");
    let category = get_str(species, "category");
    match species.get("subcategory").and_then(Value::as_str) {
        Some(subcategory) => format!("{name} ({category}/{subcategory})"),
        None => format!("{name} ({category})"),
    }
}

fn attribute_entries(record: &Map<String, Value>) -> Vec<(&'static str, String)> {
    let mut entries = Vec::new();
    if record.contains_key("species") {
        entries.push(("Species:", species_label(record)));
    }
    for (field, label) in ATTRIBUTE_LABELS {
        if let Some(value) = record.get(*field).and_then(Value::as_str) {
            entries.push((*label, value.to_string()));
        }
    }
    entries
}

fn require_object<'a>(
    data: &'a Value,
    field: &str,
    command: &str,
) -> io::Result<&'a Map<String, Value>> {
    data.get(field)
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other(format!("{command} output requires {field}")))
}

pub(super) fn get_str(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn get_str_value(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn get_u64(map: &Map<String, Value>, key: &str) -> u64 {
    map.get(key).and_then(Value::as_u64).unwrap_or(0)
}
