use crate::model::document::{DocumentSections, DocumentType};
use crate::model::field::{ExtractedMetadata, FieldFallback, FieldKey, FieldValue};
use crate::parse::marker_parser::{decode, decode_value, find_all};

/// Scan a full document and project its widgets into a structured
/// field map. Markers are recognized anywhere in the text, not just in
/// a header region; when a non-repeatable kind appears twice, the last
/// occurrence wins (the recovery behavior for a saved duplicate, not
/// an error).
pub fn extract_metadata(text: &str) -> ExtractedMetadata {
    let mut meta = ExtractedMetadata::default();

    for m in find_all(text) {
        let Some(key) = FieldKey::from_marker(m.token.kind, &m.token.subtype) else {
            continue;
        };
        if let Some(reason) = m.fallback {
            meta.fallbacks.push(FieldFallback { key, reason });
        }
        let decoded = decode_value(&m.token);
        if let Some(reason) = decoded.fallback {
            meta.fallbacks.push(FieldFallback { key, reason });
        }
        meta.fields.insert(key, decoded.value);
        meta.raw.insert(key, text[m.start..m.end].to_string());
    }

    if let Some(title) = extract_title(text) {
        meta.fields.insert(FieldKey::Title, FieldValue::Text(title));
    }

    meta
}

/// The first top-level `# ` heading, if any. Callers default a missing
/// title to `"Untitled"`.
pub fn extract_title(text: &str) -> Option<String> {
    for line in text.lines() {
        if let Some(rest) = line.trim().strip_prefix("# ") {
            return Some(rest.trim().to_string());
        }
    }
    None
}

/// Strip the canonical header sections of a structured document,
/// returning only the freeform body.
///
/// Header groups are consumed greedily from the top: a heading line
/// followed by one or more recognized marker lines and an optional
/// blank run. The canonical trailing sections (References, Horizon
/// References, Created) are detected and removed from the end, since
/// the editing surface appends body content between the leading header
/// and those sections on every save. Anything that does not match is
/// body and comes back verbatim.
pub fn strip_header(doc_type: DocumentType, text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut idx = 0;

    // Leading blanks and the H1 title line.
    while idx < lines.len() && lines[idx].trim().is_empty() {
        idx += 1;
    }
    if idx < lines.len() && lines[idx].trim().starts_with("# ") {
        idx += 1;
    }
    while idx < lines.len() && lines[idx].trim().is_empty() {
        idx += 1;
    }

    // Leading header groups.
    while let Some(next) = consume_header_group(doc_type, &lines, idx) {
        idx = next;
    }

    // Trailing canonical sections.
    let mut end = lines.len();
    while let Some(new_end) = strip_trailing_section(doc_type, &lines, idx, end) {
        end = new_end;
    }
    while end > idx && lines[end - 1].trim().is_empty() {
        end -= 1;
    }

    lines[idx..end].join("\n")
}

/// Extract and split in one call.
pub fn split_document(doc_type: DocumentType, text: &str) -> DocumentSections {
    DocumentSections {
        metadata: extract_metadata(text),
        body: strip_header(doc_type, text),
    }
}

/// A line that is wholly a recognized widget, decoded to its field.
fn recognized_field(line: &str) -> Option<FieldKey> {
    let trimmed = line.trim();
    if !trimmed.starts_with("[!") && !trimmed.starts_with("<div") {
        return None;
    }
    let token = decode(trimmed)?;
    FieldKey::from_marker(token.kind, &token.subtype)
}

/// Try to consume one `heading + markers + blanks` group belonging to
/// the document type's header-field set. Returns the index past the
/// group, or `None` if the lines at `idx` are not such a group.
fn consume_header_group(doc_type: DocumentType, lines: &[&str], idx: usize) -> Option<usize> {
    let mut i = idx;
    if !lines.get(i)?.trim().starts_with("##") {
        return None;
    }
    i += 1;

    let mut marker_count = 0;
    while i < lines.len() {
        match recognized_field(lines[i]) {
            Some(key) if doc_type.is_header_field(key) => {
                marker_count += 1;
                i += 1;
            }
            _ => break,
        }
    }
    if marker_count == 0 {
        return None;
    }

    while i < lines.len() && lines[i].trim().is_empty() {
        i += 1;
    }
    Some(i)
}

/// Detect one canonical section at the end of the `start..end` range:
/// a heading (or `---` rule) immediately followed only by recognized
/// trailing markers. Returns the new end, or `None` to leave the tail
/// untouched as body content.
fn strip_trailing_section(
    doc_type: DocumentType,
    lines: &[&str],
    start: usize,
    end: usize,
) -> Option<usize> {
    let mut e = end;
    while e > start && lines[e - 1].trim().is_empty() {
        e -= 1;
    }

    let mut i = e;
    let mut saw_marker = false;
    while i > start {
        let trimmed = lines[i - 1].trim();
        if trimmed.is_empty() {
            i -= 1;
            continue;
        }
        match recognized_field(lines[i - 1]) {
            Some(key) if doc_type.is_trailing_field(key) => {
                saw_marker = true;
                i -= 1;
            }
            _ => break,
        }
    }
    if !saw_marker || i <= start {
        return None;
    }

    let head = lines[i - 1].trim();
    if head.starts_with("##") || head == "---" {
        Some(i - 1)
    } else {
        None
    }
}
