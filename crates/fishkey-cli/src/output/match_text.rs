use std::io;

use serde_json::{Map, Value};

use super::format::{self, Column};
use super::record_text::get_str;

pub fn render_match(data: &Value) -> io::Result<String> {
    let result = data
        .get("result")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other("match output requires result"))?;

    let mut lines = vec![get_str(result, "recommendation"), String::new()];
    let mut entries = vec![
        ("Confidence:", format_confidence(result.get("confidence"))),
        ("Policy:", get_str(result, "policy_version")),
        ("Left key:", side_key(data, "left")),
        ("Right key:", side_key(data, "right")),
    ];
    if let Some(block) = result.get("blocked_by").and_then(Value::as_str) {
        entries.push(("Blocked by:", block.to_string()));
    }
    lines.extend(format::key_value_rows(&entries, 2));

    let differences = string_list(result, "differences");
    if !differences.is_empty() {
        lines.push(String::new());
        lines.push("Differences:".to_string());
        lines.extend(differences.iter().map(|line| format!("  - {line}")));
    }

    let missing = string_list(result, "missing_attributes");
    if !missing.is_empty() {
        lines.push(String::new());
        lines.push(format!("Stated on one side only: {}", missing.join(", ")));
    }

    if let Some(explanation) = data.get("explanation").and_then(Value::as_str) {
        lines.push(String::new());
        lines.push(explanation.to_string());
    }

    Ok(lines.join("\n"))
}

pub fn render_find(data: &Value) -> io::Result<String> {
    let matches = data
        .get("matches")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("find output requires matches"))?;
    let read = data
        .get("candidates_read")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let threshold = format_confidence(data.get("threshold"));
    let query_key = data
        .get("query")
        .and_then(|query| query.get("comparison_key"))
        .and_then(Value::as_str)
        .unwrap_or("");

    let mut lines = Vec::new();
    if matches.is_empty() {
        lines.push(format!(
            "No comparable candidates found among {read} at confidence {threshold} or above."
        ));
        lines.push(String::new());
        lines.push(format!("  Query key:  {query_key}"));
        lines.push(String::new());
        lines.push("Next step:".to_string());
        lines.push("  fishkey find <description> --candidates <path> --threshold <lower>".to_string());
        return Ok(lines.join("\n"));
    }

    lines.push(format!(
        "{} of {read} candidates matched at confidence {threshold} or above.",
        matches.len()
    ));
    lines.push(String::new());
    lines.push(format!("  Query key:  {query_key}"));
    lines.push(String::new());

    let columns = [
        Column::right("Row"),
        Column::right("Confidence"),
        Column::left("Description"),
        Column::left("Differences"),
    ];
    let rows = matches
        .iter()
        .filter_map(Value::as_object)
        .map(|row| {
            let differences = string_list(row, "differences");
            vec![
                row.get("row")
                    .and_then(Value::as_u64)
                    .unwrap_or(0)
                    .to_string(),
                format_confidence(row.get("confidence")),
                get_str(row, "description"),
                if differences.is_empty() {
                    "none".to_string()
                } else {
                    differences.join("; ")
                },
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table_or_blocks(
        &columns,
        &rows,
        format::terminal_width(),
        "Match",
    ));

    Ok(lines.join("\n"))
}

fn side_key(data: &Value, side: &str) -> String {
    data.get(side)
        .and_then(|value| value.get("comparison_key"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn string_list(map: &Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn format_confidence(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_f64)
        .map(|confidence| format!("{confidence:.2}"))
        .unwrap_or_else(|| "-".to_string())
}
