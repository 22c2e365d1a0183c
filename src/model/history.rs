use serde::{Deserialize, Serialize};

/// One logical row of a habit history table. The five fixed columns
/// map positionally; columns beyond them land in `extra_cells` so a
/// custom schema survives a parse/rebuild cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub date: String,
    pub time: String,
    pub status: String,
    pub action: String,
    /// May contain embedded newlines in memory; serialized as `<br>`
    /// on disk because table cells cannot hold raw newlines.
    pub details: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_cells: Vec<String>,
}

impl HistoryRow {
    pub fn new(
        date: impl Into<String>,
        time: impl Into<String>,
        status: impl Into<String>,
        action: impl Into<String>,
        details: impl Into<String>,
    ) -> HistoryRow {
        HistoryRow {
            date: date.into(),
            time: time.into(),
            status: status.into(),
            action: action.into(),
            details: details.into(),
            extra_cells: Vec::new(),
        }
    }
}

/// A document containing an append-only history table: the prose
/// before it, the raw header lines (label row plus separator row,
/// never reparsed), the data rows, and the prose after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTable {
    pub intro: String,
    pub header: Vec<String>,
    pub rows: Vec<HistoryRow>,
    pub outro: String,
}

impl HistoryTable {
    /// Whether a table was actually found in the source text.
    pub fn has_table(&self) -> bool {
        !self.header.is_empty()
    }

    /// Default header lines for a freshly created habit history.
    pub fn default_header() -> Vec<String> {
        vec![
            "| Date | Time | Status | Action | Notes |".to_string(),
            "|------|------|--------|--------|-------|".to_string(),
        ]
    }
}
