//! Extraction schemas: what to look for in a response and what to show
//! when it is not there.

use std::collections::HashSet;

use crate::error::SchemaError;

/// How a field is pulled out of the response text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `Label: value` on a single line.
    SingleValue,
    /// Body under a `**NAME:**` header.
    Section,
    /// `Label: a, b and c` split into items.
    DelimitedList,
    /// Bullet lines following the first line that mentions a keyword.
    BulletList,
    /// `KEY: a | b | c` split on pipes.
    PipeList,
    /// `KEY: value` with a case-sensitive upper-case token.
    TokenValue,
}

impl FieldKind {
    /// Whether this kind produces a list of items rather than a string.
    pub fn is_list(self) -> bool {
        matches!(
            self,
            FieldKind::DelimitedList | FieldKind::BulletList | FieldKind::PipeList
        )
    }
}

/// Default content used when extraction yields nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    Text(String),
    List(Vec<String>),
}

impl Fallback {
    fn is_blank(&self) -> bool {
        match self {
            Fallback::Text(text) => text.trim().is_empty(),
            Fallback::List(items) => {
                items.is_empty() || items.iter().any(|item| item.trim().is_empty())
            }
        }
    }
}

/// One entry of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Label, section name or keyword searched for in the text.
    pub name: String,
    pub kind: FieldKind,
    pub fallback: Fallback,
    /// Output key; `None` means the record is keyed by `name`.
    pub key: Option<String>,
    /// Section that scopes the search, for labels that repeat across sections.
    pub within: Option<String>,
}

impl FieldDescriptor {
    fn new(name: &str, kind: FieldKind, fallback: Fallback) -> Self {
        Self {
            name: name.to_string(),
            kind,
            fallback,
            key: None,
            within: None,
        }
    }

    /// A `Label: value` field.
    pub fn value(name: &str, fallback: &str) -> Self {
        Self::new(name, FieldKind::SingleValue, Fallback::Text(fallback.to_string()))
    }

    /// A `**NAME:**` section body.
    pub fn section(name: &str, fallback: &str) -> Self {
        Self::new(name, FieldKind::Section, Fallback::Text(fallback.to_string()))
    }

    /// A comma/semicolon/"and" separated list on a `Label:` line.
    pub fn list(name: &str, fallback: &[&str]) -> Self {
        Self::new(name, FieldKind::DelimitedList, list_fallback(fallback))
    }

    /// Bullet lines below the first line mentioning `keyword`.
    pub fn bullets(keyword: &str, fallback: &[&str]) -> Self {
        Self::new(keyword, FieldKind::BulletList, list_fallback(fallback))
    }

    /// A `KEY: a | b` list.
    pub fn pipe_list(name: &str, fallback: &[&str]) -> Self {
        Self::new(name, FieldKind::PipeList, list_fallback(fallback))
    }

    /// A case-sensitive `KEY: value` field.
    pub fn token(name: &str, fallback: &str) -> Self {
        Self::new(name, FieldKind::TokenValue, Fallback::Text(fallback.to_string()))
    }

    /// Store the result under `key` instead of the label.
    pub fn keyed(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    /// Restrict the search to the body of `section`.
    pub fn within(mut self, section: &str) -> Self {
        self.within = Some(section.to_string());
        self
    }

    /// Key this field is stored under in the record.
    pub fn output_key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.name)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }
        let shape_matches = match self.fallback {
            Fallback::Text(_) => !self.kind.is_list(),
            Fallback::List(_) => self.kind.is_list(),
        };
        if !shape_matches {
            return Err(SchemaError::KindMismatch {
                name: self.name.clone(),
                kind: self.kind,
            });
        }
        if self.fallback.is_blank() {
            return Err(SchemaError::EmptyFallback {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

fn list_fallback(items: &[&str]) -> Fallback {
    Fallback::List(items.iter().map(|item| item.to_string()).collect())
}

/// An ordered, validated list of field descriptors.
///
/// Construction is the only place a schema can fail: every fallback is
/// non-empty and shaped like its kind, and output keys are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for field in &fields {
            field.validate()?;
            if !seen.insert(field.output_key().to_string()) {
                return Err(SchemaError::DuplicateKey {
                    key: field.output_key().to_string(),
                });
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a descriptor by output key.
    pub fn get(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.output_key() == key)
    }
}
