use std::sync::LazyLock;

use regex::Regex;

use crate::model::field::{Decoded, FallbackReason, FieldValue};
use crate::model::marker::{MarkerKind, MarkerToken, normalize_effort, normalize_status};
use crate::parse::datetime::is_bare_date;
use crate::parse::marker_serializer::encode_reference_list;

static SUBTYPED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[!(singleselect|multiselect|checkbox|datetime):([A-Za-z0-9_-]+):([^\]\n]*)\]")
        .unwrap()
});

static REFERENCES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[!references:([^\]\n]*)\]").unwrap());

static HORIZON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[!((?:projects|areas|goals|vision|purpose)-references):([^\]\n]*)\]").unwrap()
});

static LIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[!((?:projects|areas|goals|vision|purpose|habits)-list)\]").unwrap()
});

/// Legacy HTML widget block. Only the `data-*` attribute is decoded;
/// the element text is a human-readable duplicate of the value.
static LEGACY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<div[^>]*\bdata-([a-z][a-z-]*)='([^']*)'[^>]*>").unwrap());

/// A decoded widget occurrence inside a document, with the byte range
/// of the raw text it was decoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch {
    pub token: MarkerToken,
    pub fallback: Option<FallbackReason>,
    pub start: usize,
    pub end: usize,
}

/// Decode the first widget found in `text`, trying the marker token
/// patterns and then the legacy block pattern. Returns `None` when the
/// text contains no recognizable widget.
pub fn decode(text: &str) -> Option<MarkerToken> {
    find_all(text).into_iter().next().map(|m| m.token)
}

/// Find and decode every widget in `text`, in document order. Both
/// encodings converge on `MarkerToken`; an undecodable legacy payload
/// still yields its kind, with a fallback reason attached.
pub fn find_all(text: &str) -> Vec<MarkerMatch> {
    let mut matches: Vec<MarkerMatch> = Vec::new();

    for caps in SUBTYPED_RE.captures_iter(text) {
        let Some(kind) = MarkerKind::from_token_name(&caps[1]) else {
            continue;
        };
        let m = caps.get(0).unwrap();
        matches.push(MarkerMatch {
            token: MarkerToken::new(kind, &caps[2], &caps[3]),
            fallback: None,
            start: m.start(),
            end: m.end(),
        });
    }

    for caps in REFERENCES_RE.captures_iter(text) {
        let m = caps.get(0).unwrap();
        matches.push(MarkerMatch {
            token: MarkerToken::new(MarkerKind::References, "", &caps[1]),
            fallback: None,
            start: m.start(),
            end: m.end(),
        });
    }

    for re in [&*HORIZON_RE, &*LIST_RE] {
        for caps in re.captures_iter(text) {
            let Some(kind) = MarkerKind::from_token_name(&caps[1]) else {
                continue;
            };
            let payload = caps.get(2).map(|p| p.as_str()).unwrap_or("");
            let m = caps.get(0).unwrap();
            matches.push(MarkerMatch {
                token: MarkerToken::new(kind, "", payload),
                fallback: None,
                start: m.start(),
                end: m.end(),
            });
        }
    }

    for caps in LEGACY_RE.captures_iter(text) {
        let Some(kind) = MarkerKind::from_token_name(&caps[1]) else {
            continue;
        };
        let (token, fallback) = decode_legacy(kind, &caps[2]);
        let m = caps.get(0).unwrap();
        // The raw span covers the whole element, so an untouched legacy
        // field round-trips with its closing tag and human text intact.
        let end = text[m.end()..]
            .find("</div>")
            .map(|p| m.end() + p + "</div>".len())
            .unwrap_or(m.end());
        matches.push(MarkerMatch {
            token,
            fallback,
            start: m.start(),
            end,
        });
    }

    matches.sort_by_key(|m| m.start);
    matches
}

/// Decode a legacy `data-*` JSON payload into the canonical token
/// form. The attribute is HTML-entity unescaped, then parsed; if that
/// fails, backslash-escaped quotes are normalized and parsing retried.
fn decode_legacy(kind: MarkerKind, attr: &str) -> (MarkerToken, Option<FallbackReason>) {
    if let MarkerKind::ListPlaceholder(_) = kind {
        // Placeholders carry no payload worth decoding.
        return (MarkerToken::new(kind, "", ""), None);
    }

    let unescaped = unescape_html_attr(attr);
    let parsed = serde_json::from_str::<serde_json::Value>(&unescaped)
        .or_else(|_| serde_json::from_str(&unescaped.replace("\\\"", "\"")));
    let json = match parsed {
        Ok(v) => v,
        Err(_) => {
            return (
                MarkerToken::new(kind, "", ""),
                Some(FallbackReason::BadLegacyJson),
            );
        }
    };

    let subtype = if kind.has_subtype() {
        json.get("type")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    } else {
        String::new()
    };

    let payload = if kind.is_list_payload() {
        let values: Vec<String> = json
            .get("values")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        encode_reference_list(&values)
    } else {
        match json.get("value") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Bool(b)) => b.to_string(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    };

    (MarkerToken::new(kind, subtype, payload), None)
}

/// Decode a token's payload into a typed field value, applying the
/// alias tables and documented defaults. Never fails; a malformed
/// payload yields a usable value plus the reason it was substituted.
pub fn decode_value(token: &MarkerToken) -> Decoded<FieldValue> {
    match token.kind {
        MarkerKind::SingleSelect => match token.subtype.as_str() {
            "status" | "project-status" => {
                let d = normalize_status(&token.payload);
                Decoded {
                    value: FieldValue::Text(d.value),
                    fallback: d.fallback,
                }
            }
            "effort" => {
                let d = normalize_effort(&token.payload);
                Decoded {
                    value: FieldValue::Text(d.value),
                    fallback: d.fallback,
                }
            }
            _ => Decoded::clean(FieldValue::text(token.payload.trim())),
        },
        MarkerKind::Checkbox => {
            let payload = token.payload.trim();
            if payload.is_empty() || payload.eq_ignore_ascii_case("false") {
                Decoded::clean(FieldValue::Flag(false))
            } else if payload.eq_ignore_ascii_case("true") {
                Decoded::clean(FieldValue::Flag(true))
            } else {
                Decoded::fallback(
                    FieldValue::Flag(false),
                    FallbackReason::BadFlag(payload.to_string()),
                )
            }
        }
        MarkerKind::DateTime => {
            let payload = token.payload.trim();
            if payload.is_empty() || payload.get(..10).is_some_and(is_bare_date) {
                Decoded::clean(FieldValue::text(payload))
            } else {
                // Kept verbatim: the normalizer degrades gracefully and
                // the user can still fix the value in the editor.
                Decoded::fallback(
                    FieldValue::text(payload),
                    FallbackReason::BadDate(payload.to_string()),
                )
            }
        }
        MarkerKind::MultiSelect | MarkerKind::References | MarkerKind::HorizonReferences(_) => {
            Decoded::clean(FieldValue::List(decode_reference_list(&token.payload)))
        }
        MarkerKind::ListPlaceholder(_) => Decoded::clean(FieldValue::text("")),
    }
}

/// Decode a reference-array payload. A percent-encoded JSON array is
/// tried first; anything else is treated as the human-readable
/// comma-joined form.
pub fn decode_reference_list(payload: &str) -> Vec<String> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if let Ok(decoded) = urlencoding::decode(trimmed)
        && decoded.trim_start().starts_with('[')
        && let Ok(items) = serde_json::from_str::<Vec<String>>(&decoded)
    {
        return items;
    }

    trimmed
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn unescape_html_attr(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
