//! Codec for GTD markdown documents.
//!
//! Documents are plain markdown annotated with a compact marker
//! dialect (`[!kind:subtype:payload]`) encoding structured fields and
//! widgets, with a legacy HTML-attribute form kept for
//! backward-compatible reads. This crate translates losslessly between
//! the flat on-disk text, a structured header-fields-plus-body view,
//! and the habit history table format. It performs no I/O; all state
//! of record lives in the markdown file, owned by the caller.

pub mod model;
pub mod ops;
pub mod parse;

pub use model::{
    DocumentSections, DocumentType, ExtractedMetadata, FieldKey, FieldSet, FieldValue,
    HistoryRow, HistoryTable, MarkerKind, MarkerToken,
};
pub use ops::EditSession;
pub use parse::{
    build_document, extract_metadata, reconstruct_history, split_document, split_history,
    strip_header, to_date_only, to_time_only,
};
