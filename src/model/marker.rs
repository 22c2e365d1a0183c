use serde::{Deserialize, Serialize};

use super::field::{Decoded, FallbackReason};

/// Horizon of focus for cross-document references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    Projects,
    Areas,
    Goals,
    Vision,
    Purpose,
}

impl Horizon {
    pub const ALL: [Horizon; 5] = [
        Horizon::Projects,
        Horizon::Areas,
        Horizon::Goals,
        Horizon::Vision,
        Horizon::Purpose,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Horizon::Projects => "projects",
            Horizon::Areas => "areas",
            Horizon::Goals => "goals",
            Horizon::Vision => "vision",
            Horizon::Purpose => "purpose",
        }
    }

    pub fn from_name(name: &str) -> Option<Horizon> {
        match name {
            "projects" => Some(Horizon::Projects),
            "areas" => Some(Horizon::Areas),
            "goals" => Some(Horizon::Goals),
            "vision" => Some(Horizon::Vision),
            "purpose" => Some(Horizon::Purpose),
            _ => None,
        }
    }
}

/// Named list placeholder: a widget that renders a live list of
/// documents (all projects, all habits, ...) where the marker sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListName {
    Projects,
    Areas,
    Goals,
    Vision,
    Purpose,
    Habits,
}

impl ListName {
    pub fn name(self) -> &'static str {
        match self {
            ListName::Projects => "projects",
            ListName::Areas => "areas",
            ListName::Goals => "goals",
            ListName::Vision => "vision",
            ListName::Purpose => "purpose",
            ListName::Habits => "habits",
        }
    }

    pub fn from_name(name: &str) -> Option<ListName> {
        match name {
            "projects" => Some(ListName::Projects),
            "areas" => Some(ListName::Areas),
            "goals" => Some(ListName::Goals),
            "vision" => Some(ListName::Vision),
            "purpose" => Some(ListName::Purpose),
            "habits" => Some(ListName::Habits),
            _ => None,
        }
    }
}

/// Widget kind of a marker token or legacy block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    SingleSelect,
    MultiSelect,
    Checkbox,
    DateTime,
    References,
    HorizonReferences(Horizon),
    ListPlaceholder(ListName),
}

impl MarkerKind {
    /// The kind name as written in a token (`[!<name>:...]`) or a
    /// legacy block attribute (`data-<name>`).
    pub fn token_name(self) -> String {
        match self {
            MarkerKind::SingleSelect => "singleselect".to_string(),
            MarkerKind::MultiSelect => "multiselect".to_string(),
            MarkerKind::Checkbox => "checkbox".to_string(),
            MarkerKind::DateTime => "datetime".to_string(),
            MarkerKind::References => "references".to_string(),
            MarkerKind::HorizonReferences(h) => format!("{}-references", h.name()),
            MarkerKind::ListPlaceholder(l) => format!("{}-list", l.name()),
        }
    }

    pub fn from_token_name(name: &str) -> Option<MarkerKind> {
        match name {
            "singleselect" => Some(MarkerKind::SingleSelect),
            "multiselect" => Some(MarkerKind::MultiSelect),
            "checkbox" => Some(MarkerKind::Checkbox),
            "datetime" => Some(MarkerKind::DateTime),
            "references" => Some(MarkerKind::References),
            _ => {
                if let Some(h) = name.strip_suffix("-references") {
                    return Horizon::from_name(h).map(MarkerKind::HorizonReferences);
                }
                if let Some(l) = name.strip_suffix("-list") {
                    return ListName::from_name(l).map(MarkerKind::ListPlaceholder);
                }
                None
            }
        }
    }

    /// Whether tokens of this kind carry a subtype segment.
    pub fn has_subtype(self) -> bool {
        matches!(
            self,
            MarkerKind::SingleSelect
                | MarkerKind::MultiSelect
                | MarkerKind::Checkbox
                | MarkerKind::DateTime
        )
    }

    /// Whether the payload is a reference-style string list.
    pub fn is_list_payload(self) -> bool {
        matches!(
            self,
            MarkerKind::MultiSelect | MarkerKind::References | MarkerKind::HorizonReferences(_)
        )
    }
}

/// The canonical decoded form of a widget, whichever on-disk encoding
/// it came from. `subtype` is empty for kinds without one; `payload` is
/// the raw payload text exactly as a marker token would carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerToken {
    pub kind: MarkerKind,
    pub subtype: String,
    pub payload: String,
}

impl MarkerToken {
    pub fn new(kind: MarkerKind, subtype: impl Into<String>, payload: impl Into<String>) -> Self {
        MarkerToken {
            kind,
            subtype: subtype.into(),
            payload: payload.into(),
        }
    }
}

/// Canonical status values for status-like single selects.
pub const STATUS_VALUES: [&str; 3] = ["in-progress", "waiting", "completed"];

/// Canonical effort values.
pub const EFFORT_VALUES: [&str; 3] = ["small", "medium", "large"];

/// Normalize a status payload. Legacy aliases collapse onto the
/// canonical set (`cancelled` maps to `completed`: the data model has
/// no cancelled state). Unknown values default to `in-progress`.
pub fn normalize_status(raw: &str) -> Decoded<String> {
    let lowered = raw.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "in-progress" | "waiting" | "completed" => Decoded::clean(lowered),
        "complete" | "done" | "cancelled" | "canceled" => {
            Decoded::clean("completed".to_string())
        }
        "" => Decoded::fallback("in-progress".to_string(), FallbackReason::MissingPayload),
        _ => Decoded::fallback(
            "in-progress".to_string(),
            FallbackReason::UnknownStatus(raw.trim().to_string()),
        ),
    }
}

/// Normalize an effort payload. Unknown values default to `medium`.
pub fn normalize_effort(raw: &str) -> Decoded<String> {
    let lowered = raw.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "small" | "medium" | "large" => Decoded::clean(lowered),
        "" => Decoded::fallback("medium".to_string(), FallbackReason::MissingPayload),
        _ => Decoded::fallback(
            "medium".to_string(),
            FallbackReason::UnknownEffort(raw.trim().to_string()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_name_round_trip() {
        let kinds = [
            MarkerKind::SingleSelect,
            MarkerKind::MultiSelect,
            MarkerKind::Checkbox,
            MarkerKind::DateTime,
            MarkerKind::References,
            MarkerKind::HorizonReferences(Horizon::Projects),
            MarkerKind::HorizonReferences(Horizon::Purpose),
            MarkerKind::ListPlaceholder(ListName::Habits),
        ];
        for kind in kinds {
            assert_eq!(MarkerKind::from_token_name(&kind.token_name()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_token_name() {
        assert_eq!(MarkerKind::from_token_name("slider"), None);
        assert_eq!(MarkerKind::from_token_name("someday-references"), None);
    }

    #[test]
    fn test_status_aliases_collapse() {
        assert_eq!(normalize_status("waiting").value, "waiting");
        assert_eq!(normalize_status("complete").value, "completed");
        assert_eq!(normalize_status("Cancelled").value, "completed");
        assert!(normalize_status("complete").fallback.is_none());
    }

    #[test]
    fn test_status_unknown_defaults() {
        let decoded = normalize_status("blocked");
        assert_eq!(decoded.value, "in-progress");
        assert_eq!(
            decoded.fallback,
            Some(FallbackReason::UnknownStatus("blocked".to_string()))
        );
    }

    #[test]
    fn test_effort_unknown_defaults() {
        let decoded = normalize_effort("huge");
        assert_eq!(decoded.value, "medium");
        assert_eq!(
            decoded.fallback,
            Some(FallbackReason::UnknownEffort("huge".to_string()))
        );
        assert_eq!(normalize_effort("Large").value, "large");
    }
}
