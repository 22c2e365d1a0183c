use crate::model::document::{DocumentType, SectionSpec};
use crate::model::field::{FieldKey, FieldSet};
use crate::parse::marker_serializer::{default_field_value, encode_field};

/// Rebuild a full document from a field set plus body text.
///
/// Sections come out in the type's fixed order. A field the caller
/// explicitly set this cycle is re-encoded; an untouched field falls
/// back to its raw snapshot from extraction time, so an
/// already-encoded payload (or a legacy block) is never re-encoded
/// lossily by a save triggered elsewhere. A required section the
/// document never had is re-created with an empty-payload marker —
/// omitting the marker would change the header's line-group shape on
/// the next parse.
pub fn build_document(doc_type: DocumentType, fields: &FieldSet, body: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("# {}", fields.title_or_untitled()));

    for section in doc_type.leading_sections() {
        emit_section(&mut lines, fields, section);
    }

    let body = body.trim_matches('\n');
    if !body.is_empty() {
        lines.push(String::new());
        lines.extend(body.lines().map(str::to_string));
    }

    for section in doc_type.trailing_sections() {
        emit_section(&mut lines, fields, section);
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn emit_section(lines: &mut Vec<String>, fields: &FieldSet, section: &SectionSpec) {
    let mut marker_lines: Vec<String> = Vec::new();
    for &key in section.keys {
        if let Some(text) = emit_field(fields, key) {
            // Raw legacy snapshots can span lines.
            marker_lines.extend(text.lines().map(str::to_string));
        }
    }

    if marker_lines.is_empty() {
        if !section.required {
            return;
        }
        let key = section.keys[0];
        if let Some(text) = encode_field(key, &default_field_value(key)) {
            marker_lines.push(text);
        }
    }

    lines.push(String::new());
    lines.push(format!("## {}", section.heading));
    lines.extend(marker_lines);
}

fn emit_field(fields: &FieldSet, key: FieldKey) -> Option<String> {
    if fields.is_dirty(key)
        && let Some(value) = fields.value(key)
    {
        return encode_field(key, value);
    }
    if let Some(raw) = fields.raw(key) {
        return Some(raw.to_string());
    }
    // Extracted value with no raw form (does not happen for marker
    // fields today, but harmless to encode).
    let value = fields.value(key)?;
    encode_field(key, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field::{ExtractedMetadata, FieldValue};
    use crate::parse::document_parser::{extract_metadata, strip_header};
    use pretty_assertions::assert_eq;

    fn action_fields(status: &str) -> FieldSet {
        let mut fields = FieldSet::from_extracted(&ExtractedMetadata::default());
        fields.set(FieldKey::Title, FieldValue::text("Call the landlord"));
        fields.set(FieldKey::Status, FieldValue::text(status));
        fields.set(FieldKey::DueDate, FieldValue::text("2024-03-08"));
        fields.set(
            FieldKey::CreatedDateTime,
            FieldValue::text("2024-03-01T08:30:00"),
        );
        fields
    }

    #[test]
    fn test_build_emits_fixed_section_order() {
        let text = build_document(
            DocumentType::Action,
            &action_fields("waiting"),
            "Ask about the radiator.",
        );
        let expected = "\
# Call the landlord

## Status
[!singleselect:status:waiting]

## Focus Date
[!datetime:focus_date_time:]

## Due Date
[!datetime:due_date:2024-03-08]

## Effort
[!singleselect:effort:]

## Contexts
[!multiselect:contexts:]

Ask about the radiator.

## References
[!references:]

## Created
[!datetime:created_date_time:2024-03-01T08:30:00]
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_build_then_extract_round_trips() {
        let text = build_document(
            DocumentType::Action,
            &action_fields("waiting"),
            "Body paragraph.",
        );
        let meta = extract_metadata(&text);
        assert_eq!(meta.get(FieldKey::Status), Some(&FieldValue::text("waiting")));
        assert_eq!(
            meta.get(FieldKey::DueDate),
            Some(&FieldValue::text("2024-03-08"))
        );
        assert_eq!(strip_header(DocumentType::Action, &text), "Body paragraph.");
    }

    #[test]
    fn test_rebuild_of_unmodified_extraction_is_stable() {
        let original = build_document(
            DocumentType::Action,
            &action_fields("waiting"),
            "Body paragraph.",
        );

        let meta = extract_metadata(&original);
        let fields = FieldSet::from_extracted(&meta);
        let body = strip_header(DocumentType::Action, &original);
        let rebuilt = build_document(DocumentType::Action, &fields, &body);
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_untouched_field_keeps_raw_encoding() {
        // A horizon list that needed percent-encoding must come back
        // byte-identical when a different field is edited.
        let mut fields = FieldSet::from_extracted(&ExtractedMetadata::default());
        fields.set(
            FieldKey::ProjectsReferences,
            FieldValue::list(["Smith, Jane.md"]),
        );
        let original = build_document(DocumentType::Action, &fields, "");

        let meta = extract_metadata(&original);
        let raw_horizon = meta.raw.get(&FieldKey::ProjectsReferences).cloned().unwrap();

        let mut fields = FieldSet::from_extracted(&meta);
        fields.set(FieldKey::Status, FieldValue::text("completed"));
        let rebuilt = build_document(DocumentType::Action, &fields, "");

        assert!(rebuilt.contains(&raw_horizon));
        assert!(rebuilt.contains("[!singleselect:status:completed]"));
    }

    #[test]
    fn test_legacy_raw_preserved_verbatim() {
        let legacy =
            r#"<div data-singleselect='{"type":"status","value":"waiting"}' class="singleselect-block">waiting</div>"#;
        let doc = format!("# Doc\n\n## Status\n{legacy}\n\nbody\n");
        let meta = extract_metadata(&doc);
        let fields = FieldSet::from_extracted(&meta);
        let rebuilt = build_document(DocumentType::Action, &fields, "body");
        assert!(rebuilt.contains(legacy));
    }

    #[test]
    fn test_empty_title_falls_back_to_untitled() {
        let fields = FieldSet::from_extracted(&ExtractedMetadata::default());
        let text = build_document(DocumentType::Action, &fields, "");
        assert!(text.starts_with("# Untitled\n"));
    }

    #[test]
    fn test_optional_horizon_section_omitted_when_absent() {
        let fields = FieldSet::from_extracted(&ExtractedMetadata::default());
        let text = build_document(DocumentType::Action, &fields, "");
        assert!(!text.contains("## Horizon References"));

        let mut fields = FieldSet::from_extracted(&ExtractedMetadata::default());
        fields.set(FieldKey::GoalsReferences, FieldValue::list(["Goals/Run.md"]));
        let text = build_document(DocumentType::Action, &fields, "");
        assert!(text.contains("## Horizon References\n[!goals-references:Goals/Run.md]"));
    }

    #[test]
    fn test_habit_document_shape() {
        let mut fields = FieldSet::from_extracted(&ExtractedMetadata::default());
        fields.set(FieldKey::Title, FieldValue::text("Morning Review"));
        fields.set(FieldKey::HabitFrequency, FieldValue::text("daily"));
        fields.set(FieldKey::CreatedDate, FieldValue::text("2024-03-01"));
        let text = build_document(DocumentType::Habit, &fields, "## Notes\nReview the day.");

        assert!(text.contains("## Status\n[!checkbox:habit-status:false]"));
        assert!(text.contains("## Frequency\n[!singleselect:habit-frequency:daily]"));
        assert!(text.contains("## Created\n[!datetime:created_date:2024-03-01]"));
        // Habits without references skip that section entirely.
        assert!(!text.contains("## References"));
    }
}
