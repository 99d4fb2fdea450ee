use thiserror::Error;

use crate::schema::FieldKind;

/// Schema authoring errors.
///
/// These are programming errors in a call site's schema, reported once when
/// the schema is built. Extraction itself never fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Field descriptor has an empty name")]
    EmptyName,

    #[error("Field '{name}' has an empty fallback")]
    EmptyFallback { name: String },

    #[error("Field '{name}' of kind {kind:?} has a fallback of the wrong shape")]
    KindMismatch { name: String, kind: FieldKind },

    #[error("Duplicate output key: {key}")]
    DuplicateKey { key: String },
}

/// A request finished after a newer request on the same channel started.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Generation {generation} is no longer current (current: {current})")]
pub struct StaleGeneration {
    pub generation: u64,
    pub current: u64,
}
