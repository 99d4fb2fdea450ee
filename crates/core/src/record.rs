//! Schema-driven record assembly.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::extract::{
    BULLET_LIMIT, extract_bullets, extract_list, extract_pipe_list, extract_section,
    extract_token_value, extract_value,
};
use crate::schema::{Fallback, FieldDescriptor, FieldKind, Schema};

/// A single extracted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            FieldValue::Text(_) => None,
        }
    }
}

impl From<&Fallback> for FieldValue {
    fn from(fallback: &Fallback) -> Self {
        match fallback {
            Fallback::Text(text) => FieldValue::Text(text.clone()),
            Fallback::List(items) => FieldValue::List(items.clone()),
        }
    }
}

/// Where a record entry's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Extracted,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    pub key: String,
    pub value: FieldValue,
    pub origin: Origin,
}

/// Fully populated extraction result, in schema order.
///
/// Serializes as a JSON object of key to value; origins are not part of the
/// serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRecord {
    entries: Vec<RecordEntry>,
}

impl ExtractedRecord {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entry(key).map(|entry| &entry.value)
    }

    pub fn entry(&self, key: &str) -> Option<&RecordEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Text value for `key`, if present and a text field.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    /// List value for `key`, if present and a list field.
    pub fn list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(FieldValue::as_list)
    }

    pub fn entries(&self) -> &[RecordEntry] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys whose value is the schema fallback.
    pub fn fallback_keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.origin == Origin::Fallback)
            .map(|entry| entry.key.as_str())
            .collect()
    }
}

impl Serialize for ExtractedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.key, &entry.value)?;
        }
        map.end()
    }
}

/// Build a record for `schema` from one raw response.
///
/// Each descriptor is extracted according to its kind; anything that comes
/// back empty is replaced by the descriptor's fallback. An empty `text`
/// therefore yields an all-fallback record. This never fails: a valid
/// [`Schema`] guarantees non-empty fallbacks.
pub fn build_record(text: &str, schema: &Schema) -> ExtractedRecord {
    let entries = schema
        .fields()
        .iter()
        .map(|field| {
            let extracted = extract_field(text, field);
            let (value, origin) = if extracted.is_empty() {
                (FieldValue::from(&field.fallback), Origin::Fallback)
            } else {
                (extracted, Origin::Extracted)
            };
            RecordEntry {
                key: field.output_key().to_string(),
                value,
                origin,
            }
        })
        .collect();

    ExtractedRecord { entries }
}

/// Run the extractor for one descriptor.
///
/// A scoped descriptor searches the body of its section. When that section
/// is missing or empty the whole text is searched instead.
fn extract_field(text: &str, field: &FieldDescriptor) -> FieldValue {
    let scoped = field
        .within
        .as_deref()
        .map(|section| extract_section(text, section))
        .filter(|body| !body.is_empty());
    let haystack = scoped.as_deref().unwrap_or(text);
    let name = field.name.as_str();

    match field.kind {
        FieldKind::SingleValue => FieldValue::Text(extract_value(haystack, name)),
        FieldKind::Section => FieldValue::Text(extract_section(haystack, name)),
        FieldKind::DelimitedList => FieldValue::List(extract_list(haystack, name)),
        FieldKind::BulletList => FieldValue::List(extract_bullets(haystack, name, BULLET_LIMIT)),
        FieldKind::PipeList => FieldValue::List(extract_pipe_list(haystack, name)),
        FieldKind::TokenValue => FieldValue::Text(extract_token_value(haystack, name)),
    }
}
