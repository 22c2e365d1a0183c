use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::marker::{Horizon, MarkerKind};

/// Fixed identity of an extractable field.
///
/// Keys serialize in camelCase because extracted field maps cross the
/// IPC boundary to the editing surface as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    Title,
    Status,
    ProjectStatus,
    Effort,
    HabitFrequency,
    HabitStatus,
    Tags,
    Contexts,
    FocusDateTime,
    DueDate,
    CreatedDate,
    CreatedDateTime,
    References,
    ProjectsReferences,
    AreasReferences,
    GoalsReferences,
    VisionReferences,
    PurposeReferences,
}

impl FieldKey {
    /// The key name as it appears in a serialized field map.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::Title => "title",
            FieldKey::Status => "status",
            FieldKey::ProjectStatus => "projectStatus",
            FieldKey::Effort => "effort",
            FieldKey::HabitFrequency => "habitFrequency",
            FieldKey::HabitStatus => "habitStatus",
            FieldKey::Tags => "tags",
            FieldKey::Contexts => "contexts",
            FieldKey::FocusDateTime => "focusDateTime",
            FieldKey::DueDate => "dueDate",
            FieldKey::CreatedDate => "createdDate",
            FieldKey::CreatedDateTime => "createdDateTime",
            FieldKey::References => "references",
            FieldKey::ProjectsReferences => "projectsReferences",
            FieldKey::AreasReferences => "areasReferences",
            FieldKey::GoalsReferences => "goalsReferences",
            FieldKey::VisionReferences => "visionReferences",
            FieldKey::PurposeReferences => "purposeReferences",
        }
    }

    /// The marker kind and subtype that carry this field in a document.
    /// `Title` has no marker (it lives in the H1 line).
    pub fn marker(self) -> Option<(MarkerKind, &'static str)> {
        match self {
            FieldKey::Title => None,
            FieldKey::Status => Some((MarkerKind::SingleSelect, "status")),
            FieldKey::ProjectStatus => Some((MarkerKind::SingleSelect, "project-status")),
            FieldKey::Effort => Some((MarkerKind::SingleSelect, "effort")),
            FieldKey::HabitFrequency => Some((MarkerKind::SingleSelect, "habit-frequency")),
            FieldKey::HabitStatus => Some((MarkerKind::Checkbox, "habit-status")),
            FieldKey::Tags => Some((MarkerKind::MultiSelect, "tags")),
            FieldKey::Contexts => Some((MarkerKind::MultiSelect, "contexts")),
            FieldKey::FocusDateTime => Some((MarkerKind::DateTime, "focus_date_time")),
            FieldKey::DueDate => Some((MarkerKind::DateTime, "due_date")),
            FieldKey::CreatedDate => Some((MarkerKind::DateTime, "created_date")),
            FieldKey::CreatedDateTime => Some((MarkerKind::DateTime, "created_date_time")),
            FieldKey::References => Some((MarkerKind::References, "")),
            FieldKey::ProjectsReferences => {
                Some((MarkerKind::HorizonReferences(Horizon::Projects), ""))
            }
            FieldKey::AreasReferences => {
                Some((MarkerKind::HorizonReferences(Horizon::Areas), ""))
            }
            FieldKey::GoalsReferences => {
                Some((MarkerKind::HorizonReferences(Horizon::Goals), ""))
            }
            FieldKey::VisionReferences => {
                Some((MarkerKind::HorizonReferences(Horizon::Vision), ""))
            }
            FieldKey::PurposeReferences => {
                Some((MarkerKind::HorizonReferences(Horizon::Purpose), ""))
            }
        }
    }

    /// Reverse lookup: which field does a decoded marker carry?
    /// Returns `None` for unrecognized subtypes and for widget kinds
    /// that never map to a field (list placeholders).
    pub fn from_marker(kind: MarkerKind, subtype: &str) -> Option<FieldKey> {
        match kind {
            MarkerKind::SingleSelect => match subtype {
                "status" => Some(FieldKey::Status),
                "project-status" => Some(FieldKey::ProjectStatus),
                "effort" => Some(FieldKey::Effort),
                "habit-frequency" => Some(FieldKey::HabitFrequency),
                _ => None,
            },
            MarkerKind::MultiSelect => match subtype {
                "tags" => Some(FieldKey::Tags),
                "contexts" => Some(FieldKey::Contexts),
                _ => None,
            },
            MarkerKind::Checkbox => match subtype {
                "habit-status" => Some(FieldKey::HabitStatus),
                _ => None,
            },
            MarkerKind::DateTime => match subtype {
                "focus_date_time" => Some(FieldKey::FocusDateTime),
                "due_date" => Some(FieldKey::DueDate),
                "created_date" => Some(FieldKey::CreatedDate),
                "created_date_time" => Some(FieldKey::CreatedDateTime),
                _ => None,
            },
            MarkerKind::References => Some(FieldKey::References),
            MarkerKind::HorizonReferences(h) => Some(match h {
                Horizon::Projects => FieldKey::ProjectsReferences,
                Horizon::Areas => FieldKey::AreasReferences,
                Horizon::Goals => FieldKey::GoalsReferences,
                Horizon::Vision => FieldKey::VisionReferences,
                Horizon::Purpose => FieldKey::PurposeReferences,
            }),
            MarkerKind::ListPlaceholder(_) => None,
        }
    }
}

/// A decoded field value: a scalar or an ordered set of strings.
/// Date fields hold their original string form (precision class is
/// preserved by keeping the text, see `parse::datetime`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> FieldValue {
        FieldValue::Text(s.into())
    }

    pub fn list<I: IntoIterator<Item = S>, S: Into<String>>(items: I) -> FieldValue {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Why a decode path substituted a default for what the document said.
/// These are values, not errors: the codec never refuses a document,
/// it records what it had to paper over so callers can log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum FallbackReason {
    #[error("unknown status value `{0}`, defaulted to in-progress")]
    UnknownStatus(String),
    #[error("unknown effort value `{0}`, defaulted to medium")]
    UnknownEffort(String),
    #[error("legacy block JSON payload did not parse")]
    BadLegacyJson,
    #[error("unparseable date `{0}`, kept verbatim")]
    BadDate(String),
    #[error("malformed checkbox payload `{0}`, defaulted to false")]
    BadFlag(String),
    #[error("empty marker payload, defaulted")]
    MissingPayload,
}

/// A decoded value together with the reason a default was substituted,
/// if one was. Decode paths return this instead of `Result` so a
/// malformed document still produces a usable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub value: T,
    pub fallback: Option<FallbackReason>,
}

impl<T> Decoded<T> {
    pub fn clean(value: T) -> Decoded<T> {
        Decoded {
            value,
            fallback: None,
        }
    }

    pub fn fallback(value: T, reason: FallbackReason) -> Decoded<T> {
        Decoded {
            value,
            fallback: Some(reason),
        }
    }
}

/// A fallback that occurred while extracting a specific field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFallback {
    pub key: FieldKey,
    pub reason: FallbackReason,
}

/// The structured projection of one document's marker content.
///
/// `fields` holds decoded values in first-seen order; `raw` holds the
/// verbatim marker (or legacy block) text each field was decoded from,
/// which the builder re-emits for fields the caller did not touch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    pub fields: IndexMap<FieldKey, FieldValue>,
    pub raw: IndexMap<FieldKey, String>,
    pub fallbacks: Vec<FieldFallback>,
}

impl ExtractedMetadata {
    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.fields.get(&key)
    }

    /// Extracted title, or the documented default.
    pub fn title_or_untitled(&self) -> &str {
        match self.get(FieldKey::Title).and_then(FieldValue::as_text) {
            Some(t) if !t.trim().is_empty() => t,
            _ => "Untitled",
        }
    }
}

/// Field state carried through an edit cycle: current values layered
/// over the raw snapshots captured at extraction time. Only fields the
/// caller explicitly set (`dirty`) are re-encoded on rebuild; everything
/// else round-trips through its original raw text.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    values: IndexMap<FieldKey, FieldValue>,
    original_raw: IndexMap<FieldKey, String>,
    dirty: IndexSet<FieldKey>,
}

impl FieldSet {
    /// Snapshot an extraction result. Nothing is dirty yet.
    pub fn from_extracted(meta: &ExtractedMetadata) -> FieldSet {
        FieldSet {
            values: meta.fields.clone(),
            original_raw: meta.raw.clone(),
            dirty: IndexSet::new(),
        }
    }

    /// Record a caller edit. The field will be re-encoded on the next
    /// rebuild instead of falling back to its raw snapshot.
    pub fn set(&mut self, key: FieldKey, value: FieldValue) {
        self.values.insert(key, value);
        self.dirty.insert(key);
    }

    pub fn value(&self, key: FieldKey) -> Option<&FieldValue> {
        self.values.get(&key)
    }

    pub fn raw(&self, key: FieldKey) -> Option<&str> {
        self.original_raw.get(&key).map(String::as_str)
    }

    pub fn is_dirty(&self, key: FieldKey) -> bool {
        self.dirty.contains(&key)
    }

    /// Whether the field has anything to emit at all.
    pub fn has(&self, key: FieldKey) -> bool {
        self.values.contains_key(&key) || self.original_raw.contains_key(&key)
    }

    /// Forget dirty marks and adopt fresh raw snapshots, after a
    /// rebuild has been written out.
    pub fn adopt(&mut self, meta: &ExtractedMetadata) {
        self.values = meta.fields.clone();
        self.original_raw = meta.raw.clone();
        self.dirty.clear();
    }

    pub fn title_or_untitled(&self) -> &str {
        match self.value(FieldKey::Title).and_then(FieldValue::as_text) {
            Some(t) if !t.trim().is_empty() => t,
            _ => "Untitled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_key_marker_round_trip() {
        for key in [
            FieldKey::Status,
            FieldKey::Effort,
            FieldKey::HabitStatus,
            FieldKey::Tags,
            FieldKey::FocusDateTime,
            FieldKey::References,
            FieldKey::ProjectsReferences,
            FieldKey::PurposeReferences,
        ] {
            let (kind, subtype) = key.marker().unwrap();
            assert_eq!(FieldKey::from_marker(kind, subtype), Some(key));
        }
    }

    #[test]
    fn test_title_has_no_marker() {
        assert!(FieldKey::Title.marker().is_none());
    }

    #[test]
    fn test_unknown_subtype_maps_to_no_field() {
        assert_eq!(
            FieldKey::from_marker(MarkerKind::SingleSelect, "priority"),
            None
        );
    }

    #[test]
    fn test_field_set_dirty_tracking() {
        let mut meta = ExtractedMetadata::default();
        meta.fields
            .insert(FieldKey::Status, FieldValue::text("waiting"));
        meta.raw
            .insert(FieldKey::Status, "[!singleselect:status:waiting]".to_string());

        let mut fields = FieldSet::from_extracted(&meta);
        assert!(!fields.is_dirty(FieldKey::Status));
        assert_eq!(fields.raw(FieldKey::Status), Some("[!singleselect:status:waiting]"));

        fields.set(FieldKey::Status, FieldValue::text("completed"));
        assert!(fields.is_dirty(FieldKey::Status));
        assert_eq!(
            fields.value(FieldKey::Status).and_then(FieldValue::as_text),
            Some("completed")
        );
    }

    #[test]
    fn test_untitled_fallback() {
        let meta = ExtractedMetadata::default();
        assert_eq!(meta.title_or_untitled(), "Untitled");

        let mut meta = ExtractedMetadata::default();
        meta.fields.insert(FieldKey::Title, FieldValue::text("  "));
        assert_eq!(meta.title_or_untitled(), "Untitled");
    }
}
