//! Prompts and schemas for each kind of assessment.
//!
//! Each call site pairs a prompt asking the generator for a labeled format
//! with the schema that reads that format back, so the two stay in step.

pub mod diabetes;
pub mod medicine;
pub mod symptom;

use crate::schema::FieldDescriptor;

/// Scope every descriptor to `section`.
fn in_section(section: &str, fields: Vec<FieldDescriptor>) -> Vec<FieldDescriptor> {
    fields.into_iter().map(|field| field.within(section)).collect()
}
