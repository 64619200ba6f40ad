use std::cmp;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

impl<'a> Column<'a> {
    pub const fn left(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Left,
        }
    }

    pub const fn right(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Right,
        }
    }
}

const INDENT: usize = 2;
const COLUMN_GAP: usize = 2;
const MIN_COLUMN_WIDTH: usize = 6;
const DEFAULT_WIDTH: usize = 120;
const NARROWEST_WIDTH: usize = 40;

pub fn terminal_width() -> usize {
    let columns = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_WIDTH);
    cmp::max(columns, NARROWEST_WIDTH)
}

/// Width in characters. Descriptions may carry accented names, so byte
/// length would misalign columns.
fn width_of(value: &str) -> usize {
    value.chars().count()
}

fn pad(value: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(width_of(value)));
    match align {
        Align::Left => format!("{value}{fill}"),
        Align::Right => format!("{fill}{value}"),
    }
}

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    let label_width = entries
        .iter()
        .map(|(label, _)| width_of(label))
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| {
            format!("{padding}{}  {value}", pad(label, label_width, Align::Left))
        })
        .collect()
}

/// Renders rows as an aligned table that fits `max_width`, wrapping long
/// cells onto extra lines. Falls back to one labelled block per row when
/// even the column headers cannot fit.
pub fn render_table_or_blocks(
    columns: &[Column<'_>],
    rows: &[Vec<String>],
    max_width: usize,
    block_label: &str,
) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let minimums = columns
        .iter()
        .map(|column| cmp::max(width_of(column.name), MIN_COLUMN_WIDTH))
        .collect::<Vec<usize>>();
    let budget = max_width
        .saturating_sub(INDENT)
        .saturating_sub(COLUMN_GAP * columns.len().saturating_sub(1));

    let Some(widths) = fit_widths(&natural_widths(columns, rows), &minimums, budget) else {
        return render_blocks(columns, rows, block_label);
    };

    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<String>>();
    let mut output = vec![format_line(columns, &header, &widths)];

    for row in rows {
        let wrapped = widths
            .iter()
            .enumerate()
            .map(|(index, width)| wrap_text(row.get(index).map_or("", String::as_str), *width))
            .collect::<Vec<Vec<String>>>();
        let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);

        for line in 0..height {
            let cells = wrapped
                .iter()
                .map(|chunks| chunks.get(line).cloned().unwrap_or_default())
                .collect::<Vec<String>>();
            output.push(format_line(columns, &cells, &widths));
        }
    }

    output
}

fn natural_widths(columns: &[Column<'_>], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths = columns
        .iter()
        .map(|column| width_of(column.name))
        .collect::<Vec<usize>>();
    for row in rows {
        for (slot, value) in widths.iter_mut().zip(row) {
            *slot = cmp::max(*slot, width_of(value));
        }
    }
    widths
}

/// Shrinks the widest column one character at a time until the row fits.
/// Short code columns keep their natural width while long description
/// columns absorb the wrapping.
fn fit_widths(natural: &[usize], minimums: &[usize], budget: usize) -> Option<Vec<usize>> {
    if natural.len() != minimums.len() || minimums.iter().sum::<usize>() > budget {
        return None;
    }

    let mut widths = natural.to_vec();
    let mut total = widths.iter().sum::<usize>();
    while total > budget {
        let widest = widths
            .iter()
            .zip(minimums)
            .enumerate()
            .filter(|(_, (width, minimum))| width > minimum)
            .max_by_key(|(_, (width, _))| **width)
            .map(|(index, _)| index)?;
        widths[widest] -= 1;
        total -= 1;
    }
    Some(widths)
}

fn format_line(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let pieces = columns
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (column, width))| {
            pad(cells.get(index).map_or("", String::as_str), *width, column.align)
        })
        .collect::<Vec<String>>();
    format!("{}{}", " ".repeat(INDENT), pieces.join(&" ".repeat(COLUMN_GAP)))
        .trim_end()
        .to_string()
}

fn wrap_text(value: &str, width: usize) -> Vec<String> {
    if width == 0 || width_of(value) <= width {
        return vec![value.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in value.split_whitespace() {
        let needed = if current.is_empty() {
            width_of(word)
        } else {
            width_of(&current) + 1 + width_of(word)
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if width_of(word) <= width {
            current.push_str(word);
        } else {
            let mut chunks = split_long_token(word, width);
            current = chunks.pop().unwrap_or_default();
            lines.extend(chunks);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_long_token(token: &str, width: usize) -> Vec<String> {
    let chars = token.chars().collect::<Vec<char>>();
    chars
        .chunks(cmp::max(width, 1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn render_blocks(columns: &[Column<'_>], rows: &[Vec<String>], block_label: &str) -> Vec<String> {
    let mut output = Vec::new();
    for (position, row) in rows.iter().enumerate() {
        if position > 0 {
            output.push(String::new());
        }
        output.push(format!("  {block_label} {}:", position + 1));
        let labels = columns
            .iter()
            .map(|column| format!("{}:", column.name))
            .collect::<Vec<String>>();
        let entries = labels
            .iter()
            .enumerate()
            .map(|(index, label)| (label.as_str(), row.get(index).cloned().unwrap_or_default()))
            .collect::<Vec<(&str, String)>>();
        output.extend(key_value_rows(&entries, 4));
    }
    output
}
