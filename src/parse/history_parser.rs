use std::sync::LazyLock;

use regex::Regex;

use crate::model::history::{HistoryRow, HistoryTable};

/// `<br>` in any casing, with or without a self-closing slash.
static BR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

/// Parse a document containing a habit history table into intro
/// prose, raw header lines, data rows, and outro prose.
///
/// The first `| ... |` line starts the table; a following separator
/// row of dashes/colons joins the header verbatim (its alignment
/// syntax is never reparsed). Data rows continue while lines are table
/// rows or single spacer blank lines — a human-edited table may hold
/// blank lines between logical groups of rows, so a blank terminates
/// the table only when no row follows it.
pub fn split_history(text: &str) -> HistoryTable {
    let lines: Vec<&str> = text.lines().collect();
    let mut table = HistoryTable::default();

    let Some(start) = lines.iter().position(|l| is_table_row(l)) else {
        table.intro = text.trim_end().to_string();
        return table;
    };

    table.intro = lines[..start].join("\n").trim_end().to_string();
    table.header.push(lines[start].to_string());

    let mut idx = start + 1;
    if idx < lines.len() && is_separator_row(lines[idx]) {
        table.header.push(lines[idx].to_string());
        idx += 1;
    }

    while idx < lines.len() {
        let line = lines[idx];
        if is_table_row(line) {
            table.rows.push(parse_row(line));
            idx += 1;
        } else if line.trim().is_empty()
            && idx + 1 < lines.len()
            && is_table_row(lines[idx + 1])
        {
            // Spacer blank line inside the table.
            idx += 1;
        } else {
            break;
        }
    }

    let mut rest = idx;
    while rest < lines.len() && lines[rest].trim().is_empty() {
        rest += 1;
    }
    table.outro = lines[rest..].join("\n").trim_end().to_string();

    table
}

fn is_table_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

fn is_separator_row(line: &str) -> bool {
    let trimmed = line.trim();
    is_table_row(trimmed)
        && trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

/// Split a row on unescaped pipes and map cells positionally onto the
/// five fixed columns; anything beyond them is an extra cell. A row
/// with too few cells keeps what it has, the rest default to empty.
fn parse_row(line: &str) -> HistoryRow {
    let mut cells = split_row(line);
    while cells.len() < 5 {
        cells.push(String::new());
    }
    let extra_cells = cells.split_off(5);
    // Cells cannot hold raw newlines; details carries them as <br>.
    let details = decode_br(&cells[4]);
    let mut iter = cells.into_iter();
    HistoryRow {
        date: iter.next().unwrap_or_default(),
        time: iter.next().unwrap_or_default(),
        status: iter.next().unwrap_or_default(),
        action: iter.next().unwrap_or_default(),
        details,
        extra_cells,
    }
}

/// Cell split honoring `\|` as an escaped literal pipe.
fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('|') => cell.push('|'),
                Some(other) => {
                    cell.push('\\');
                    cell.push(other);
                }
                None => cell.push('\\'),
            },
            '|' => cells.push(std::mem::take(&mut cell)),
            _ => cell.push(c),
        }
    }
    cells.push(cell);

    cells.into_iter().map(|c| c.trim().to_string()).collect()
}

pub(crate) fn decode_br(cell: &str) -> String {
    BR_RE.replace_all(cell, "\n").into_owned()
}
