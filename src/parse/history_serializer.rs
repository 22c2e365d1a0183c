use crate::model::history::{HistoryRow, HistoryTable};

/// Reassemble a history document: intro prose, the raw header lines,
/// the serialized rows, and outro prose.
///
/// If the intro does not already end in a blank line, exactly one is
/// inserted before the header so downstream renderers recognize the
/// table as a distinct block. The outro follows after exactly one
/// blank line.
pub fn reconstruct_history(table: &HistoryTable) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !table.intro.is_empty() {
        lines.extend(table.intro.lines().map(str::to_string));
        let has_table_content = !table.header.is_empty() || !table.rows.is_empty();
        if has_table_content && lines.last().is_some_and(|l| !l.trim().is_empty()) {
            lines.push(String::new());
        }
    }

    lines.extend(table.header.iter().cloned());
    for row in &table.rows {
        lines.push(serialize_row(row));
    }

    if !table.outro.is_empty() {
        lines.push(String::new());
        lines.extend(table.outro.lines().map(str::to_string));
    }

    lines.join("\n")
}

/// One `| ... |` line: literal pipes re-escaped, embedded newlines in
/// details re-encoded as `<br>`, extra cells reassembled after the
/// fixed five.
pub fn serialize_row(row: &HistoryRow) -> String {
    let mut cells: Vec<String> = vec![
        escape_cell(&row.date),
        escape_cell(&row.time),
        escape_cell(&row.status),
        escape_cell(&row.action),
        escape_cell(&encode_br(&row.details)),
    ];
    cells.extend(row.extra_cells.iter().map(|c| escape_cell(c)));
    format!("| {} |", cells.join(" | "))
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
}

fn encode_br(details: &str) -> String {
    details.replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::history_parser::split_history;
    use pretty_assertions::assert_eq;

    fn row(details: &str) -> HistoryRow {
        HistoryRow::new("2024-01-01", "09:00", "Complete", "Reset", details)
    }

    #[test]
    fn test_reconstruct_basic_table() {
        let table = HistoryTable {
            intro: "Intro.".to_string(),
            header: vec![
                "| Date | Time | Status | Action | Details |".to_string(),
                "|---|---|---|---|---|".to_string(),
            ],
            rows: vec![row("Did thing")],
            outro: String::new(),
        };
        let text = reconstruct_history(&table);
        assert!(text.contains("Intro.\n\n| Date"));
        assert!(text.ends_with("| 2024-01-01 | 09:00 | Complete | Reset | Did thing |"));
    }

    #[test]
    fn test_intro_already_ending_blank_gets_no_second_blank() {
        let table = HistoryTable {
            intro: "Intro.\n\n".to_string(),
            header: vec!["| a | b | c | d | e |".to_string()],
            rows: Vec::new(),
            outro: String::new(),
        };
        let text = reconstruct_history(&table);
        assert_eq!(text, "Intro.\n\n| a | b | c | d | e |");
    }

    #[test]
    fn test_pipe_escape_round_trip() {
        let table = HistoryTable {
            intro: String::new(),
            header: HistoryTable::default_header(),
            rows: vec![row("Had tea | lemon")],
            outro: String::new(),
        };
        let text = reconstruct_history(&table);
        assert!(text.contains("Had tea \\| lemon"));

        let reparsed = split_history(&text);
        assert_eq!(reparsed.rows[0].details, "Had tea | lemon");
    }

    #[test]
    fn test_multiline_details_round_trip() {
        let table = HistoryTable {
            intro: String::new(),
            header: HistoryTable::default_header(),
            rows: vec![row("First line\nSecond line")],
            outro: String::new(),
        };
        let text = reconstruct_history(&table);
        assert!(text.contains("First line<br>Second line"));

        let reparsed = split_history(&text);
        assert_eq!(reparsed.rows[0].details, "First line\nSecond line");
    }

    #[test]
    fn test_extra_cells_and_custom_header_round_trip() {
        let source = "\
Intro prose.

| Day | Clock | State | Act | Note | Mood |
|---|---|---|---|---|---|
| 2024-01-01 | 09:00 | Done | Reset | ok | happy |

Outro prose.";
        let table = split_history(source);
        let rebuilt = reconstruct_history(&table);
        assert_eq!(rebuilt, source);

        let reparsed = split_history(&rebuilt);
        assert_eq!(reparsed.header, table.header);
        assert_eq!(reparsed.rows, table.rows);
        assert_eq!(reparsed.rows[0].extra_cells, vec!["happy"]);
    }

    #[test]
    fn test_outro_separated_by_one_blank_line() {
        let table = HistoryTable {
            intro: String::new(),
            header: vec!["| a | b | c | d | e |".to_string()],
            rows: Vec::new(),
            outro: "After.".to_string(),
        };
        assert_eq!(
            reconstruct_history(&table),
            "| a | b | c | d | e |\n\nAfter."
        );
    }

    #[test]
    fn test_prose_only_document() {
        let table = HistoryTable {
            intro: "Only prose.".to_string(),
            header: Vec::new(),
            rows: Vec::new(),
            outro: String::new(),
        };
        assert_eq!(reconstruct_history(&table), "Only prose.");
    }
}
