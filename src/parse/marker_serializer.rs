use crate::model::field::{FieldKey, FieldValue};
use crate::model::marker::{MarkerKind, MarkerToken};

/// Encode a widget as a marker token. New writes always emit this
/// form; the legacy HTML encoding is read-only input.
pub fn encode(kind: MarkerKind, subtype: &str, payload: &str) -> String {
    let payload = sanitize_payload(payload);
    if kind.has_subtype() {
        format!("[!{}:{}:{}]", kind.token_name(), subtype, payload)
    } else if let MarkerKind::ListPlaceholder(_) = kind {
        format!("[!{}]", kind.token_name())
    } else {
        format!("[!{}:{}]", kind.token_name(), payload)
    }
}

pub fn encode_token(token: &MarkerToken) -> String {
    encode(token.kind, &token.subtype, &token.payload)
}

/// Encode a reference array. The human-readable comma-joined form is
/// preferred; items containing characters the delimiter encoding
/// cannot carry switch the whole payload to a percent-encoded JSON
/// array.
pub fn encode_reference_list(items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let needs_json = items.iter().any(|item| {
        item.contains(',')
            || item.contains('\\')
            || item.contains(']')
            || item.contains('%')
            || item.contains('\n')
    });
    if needs_json {
        let json = serde_json::to_string(items).unwrap_or_default();
        urlencoding::encode(&json).into_owned()
    } else {
        items.join(",")
    }
}

/// Encode a field's current value as a full marker string. Returns
/// `None` only for `Title`, which has no marker form.
pub fn encode_field(key: FieldKey, value: &FieldValue) -> Option<String> {
    let (kind, subtype) = key.marker()?;
    let payload = match value {
        FieldValue::Text(s) => s.clone(),
        FieldValue::Flag(b) => b.to_string(),
        FieldValue::List(items) => encode_reference_list(items),
    };
    Some(encode(kind, subtype, &payload))
}

/// The empty/default value a rebuilt section uses when a document
/// never had the field.
pub fn default_field_value(key: FieldKey) -> FieldValue {
    match key.marker() {
        Some((MarkerKind::Checkbox, _)) => FieldValue::Flag(false),
        Some((kind, _)) if kind.is_list_payload() => FieldValue::List(Vec::new()),
        _ => FieldValue::Text(String::new()),
    }
}

/// Scalar payloads must never carry an unescaped `]` or a raw newline,
/// or the token would terminate early on the next parse.
fn sanitize_payload(payload: &str) -> String {
    if payload.contains(']') || payload.contains('\n') {
        payload.replace(']', "").replace('\n', " ")
    } else {
        payload.to_string()
    }
}
