use serde::{Deserialize, Serialize};

use super::field::{ExtractedMetadata, FieldKey};

/// One canonical header section: a heading line plus the fields whose
/// markers live under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    pub heading: &'static str,
    pub keys: &'static [FieldKey],
    /// Required sections are re-created with empty-payload markers when
    /// the document lacks them (omitting the marker entirely would break
    /// the splitter's line-group shape on the next parse).
    pub required: bool,
}

const HORIZON_KEYS: &[FieldKey] = &[
    FieldKey::ProjectsReferences,
    FieldKey::AreasReferences,
    FieldKey::GoalsReferences,
    FieldKey::VisionReferences,
    FieldKey::PurposeReferences,
];

const ACTION_LEADING: &[SectionSpec] = &[
    SectionSpec {
        heading: "Status",
        keys: &[FieldKey::Status],
        required: true,
    },
    SectionSpec {
        heading: "Focus Date",
        keys: &[FieldKey::FocusDateTime],
        required: true,
    },
    SectionSpec {
        heading: "Due Date",
        keys: &[FieldKey::DueDate],
        required: true,
    },
    SectionSpec {
        heading: "Effort",
        keys: &[FieldKey::Effort],
        required: true,
    },
    SectionSpec {
        heading: "Contexts",
        keys: &[FieldKey::Contexts],
        required: true,
    },
];

const ACTION_TRAILING: &[SectionSpec] = &[
    SectionSpec {
        heading: "References",
        keys: &[FieldKey::References],
        required: true,
    },
    SectionSpec {
        heading: "Horizon References",
        keys: HORIZON_KEYS,
        required: false,
    },
    SectionSpec {
        heading: "Created",
        keys: &[FieldKey::CreatedDateTime, FieldKey::CreatedDate],
        required: true,
    },
];

const PROJECT_LEADING: &[SectionSpec] = &[
    SectionSpec {
        heading: "Status",
        keys: &[FieldKey::ProjectStatus],
        required: true,
    },
    SectionSpec {
        heading: "Due Date",
        keys: &[FieldKey::DueDate],
        required: true,
    },
];

const PROJECT_TRAILING: &[SectionSpec] = &[
    SectionSpec {
        heading: "References",
        keys: &[FieldKey::References],
        required: true,
    },
    SectionSpec {
        heading: "Horizon References",
        keys: HORIZON_KEYS,
        required: false,
    },
    SectionSpec {
        heading: "Created",
        keys: &[FieldKey::CreatedDate, FieldKey::CreatedDateTime],
        required: true,
    },
];

const HABIT_LEADING: &[SectionSpec] = &[
    SectionSpec {
        heading: "Status",
        keys: &[FieldKey::HabitStatus],
        required: true,
    },
    SectionSpec {
        heading: "Frequency",
        keys: &[FieldKey::HabitFrequency],
        required: true,
    },
    SectionSpec {
        heading: "Focus Time",
        keys: &[FieldKey::FocusDateTime],
        required: true,
    },
];

const HABIT_TRAILING: &[SectionSpec] = &[
    SectionSpec {
        heading: "References",
        keys: &[FieldKey::References],
        required: false,
    },
    SectionSpec {
        heading: "Horizon References",
        keys: HORIZON_KEYS,
        required: false,
    },
    SectionSpec {
        heading: "Created",
        keys: &[FieldKey::CreatedDate, FieldKey::CreatedDateTime],
        required: true,
    },
];

/// Structured document types with a fixed header schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Action,
    Project,
    Habit,
}

impl DocumentType {
    /// Sections consumed from the top of the document, in order.
    pub fn leading_sections(self) -> &'static [SectionSpec] {
        match self {
            DocumentType::Action => ACTION_LEADING,
            DocumentType::Project => PROJECT_LEADING,
            DocumentType::Habit => HABIT_LEADING,
        }
    }

    /// Canonical sections stripped from the end of the document, in
    /// the order the builder emits them.
    pub fn trailing_sections(self) -> &'static [SectionSpec] {
        match self {
            DocumentType::Action => ACTION_TRAILING,
            DocumentType::Project => PROJECT_TRAILING,
            DocumentType::Habit => HABIT_TRAILING,
        }
    }

    /// Whether a field belongs to this type's header-field set (leading
    /// or trailing). Fields outside the set stay in the body untouched.
    pub fn is_header_field(self, key: FieldKey) -> bool {
        self.leading_sections()
            .iter()
            .chain(self.trailing_sections())
            .any(|s| s.keys.contains(&key))
    }

    /// Whether a field belongs to a trailing canonical section.
    pub fn is_trailing_field(self, key: FieldKey) -> bool {
        self.trailing_sections().iter().any(|s| s.keys.contains(&key))
    }

    /// Classify a raw document by the markers it contains. A habit
    /// status checkbox wins over a project status select; anything else
    /// is an action.
    pub fn detect(text: &str) -> DocumentType {
        // Subtype names are distinctive enough to match in either the
        // marker or the legacy encoding.
        if text.contains("habit-status") {
            DocumentType::Habit
        } else if text.contains("project-status") {
            DocumentType::Project
        } else {
            DocumentType::Action
        }
    }
}

/// A document split into its structured halves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSections {
    pub metadata: ExtractedMetadata,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_schema_order() {
        let headings: Vec<&str> = DocumentType::Action
            .leading_sections()
            .iter()
            .map(|s| s.heading)
            .collect();
        assert_eq!(
            headings,
            vec!["Status", "Focus Date", "Due Date", "Effort", "Contexts"]
        );
        let trailing: Vec<&str> = DocumentType::Action
            .trailing_sections()
            .iter()
            .map(|s| s.heading)
            .collect();
        assert_eq!(trailing, vec!["References", "Horizon References", "Created"]);
    }

    #[test]
    fn test_header_field_membership() {
        assert!(DocumentType::Action.is_header_field(FieldKey::Status));
        assert!(DocumentType::Action.is_header_field(FieldKey::ProjectsReferences));
        assert!(!DocumentType::Action.is_header_field(FieldKey::Tags));
        assert!(!DocumentType::Action.is_header_field(FieldKey::HabitStatus));
        assert!(DocumentType::Habit.is_header_field(FieldKey::HabitStatus));
    }

    #[test]
    fn test_detect_by_markers() {
        assert_eq!(
            DocumentType::detect("# H\n\n## Status\n[!checkbox:habit-status:false]\n"),
            DocumentType::Habit
        );
        assert_eq!(
            DocumentType::detect("# P\n\n## Status\n[!singleselect:project-status:in-progress]\n"),
            DocumentType::Project
        );
        assert_eq!(
            DocumentType::detect("# A\n\n## Status\n[!singleselect:status:waiting]\n"),
            DocumentType::Action
        );
        assert_eq!(DocumentType::detect("just prose"), DocumentType::Action);
    }
}
