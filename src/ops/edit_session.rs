use std::io;

use crate::model::document::DocumentType;
use crate::model::field::{FieldKey, FieldSet, FieldValue};
use crate::parse::document_parser::{extract_metadata, strip_header};
use crate::parse::document_serializer::build_document;

/// One open document's edit cycle.
///
/// The session holds the fields and body cached from the last
/// extraction (`Viewing`). Any field or body change followed by
/// `rebuild` emits the full document text, compares it byte-for-byte
/// against the last known on-disk text, and calls the injected write
/// port only when they differ — then the new text becomes the cache.
/// Rebuild is synchronous and total; there is no partial state.
///
/// Write interception is a port passed at call time, not an ambient
/// global hook, so callers (and tests) decide what a write means.
#[derive(Debug, Clone)]
pub struct EditSession {
    doc_type: DocumentType,
    fields: FieldSet,
    body: String,
    text: String,
}

impl EditSession {
    /// Open a document of a known type: extract its fields and split
    /// off the body.
    pub fn open(doc_type: DocumentType, text: &str) -> EditSession {
        let meta = extract_metadata(text);
        EditSession {
            doc_type,
            fields: FieldSet::from_extracted(&meta),
            body: strip_header(doc_type, text),
            text: text.to_string(),
        }
    }

    /// Open a document, classifying it from its marker content first.
    pub fn detect_and_open(text: &str) -> EditSession {
        EditSession::open(DocumentType::detect(text), text)
    }

    pub fn doc_type(&self) -> DocumentType {
        self.doc_type
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Replace the body with what the editing surface reports. The
    /// surface only ever sees and returns body text; header markers
    /// never pass through it.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn field(&self, key: FieldKey) -> Option<&FieldValue> {
        self.fields.value(key)
    }

    pub fn set_field(&mut self, key: FieldKey, value: FieldValue) {
        self.fields.set(key, value);
    }

    /// The last known on-disk text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Rebuild the document and push it through the write port if it
    /// changed. Returns whether a write happened. On success the
    /// session re-enters `Viewing` with fresh raw snapshots, so
    /// subsequent rebuilds treat the emitted encodings as original.
    pub fn rebuild<W>(&mut self, mut write: W) -> io::Result<bool>
    where
        W: FnMut(&str) -> io::Result<()>,
    {
        let rebuilt = build_document(self.doc_type, &self.fields, &self.body);
        if rebuilt == self.text {
            return Ok(false);
        }
        write(&rebuilt)?;

        self.fields.adopt(&extract_metadata(&rebuilt));
        self.body = strip_header(self.doc_type, &rebuilt);
        self.text = rebuilt;
        Ok(true)
    }
}
