//! mymedi-core: turning free-text generator answers into complete records
//!
//! A [`Schema`] lists the fields a page needs, how to find each one in the
//! response text, and what to show when it is not there. [`build_record`]
//! applies a schema to a response and always returns every field, using the
//! fallback for anything the response did not contain.

pub mod catalog;
pub mod error;
pub mod extract;
pub mod generation;
pub mod record;
pub mod schema;
pub mod table;
pub mod urgency;

pub use error::{SchemaError, StaleGeneration};
pub use extract::{extract_bullets, extract_list, extract_section, extract_value};
pub use generation::{Generation, LatestSlots};
pub use record::{ExtractedRecord, FieldValue, Origin, RecordEntry, build_record};
pub use schema::{Fallback, FieldDescriptor, FieldKind, Schema};
pub use table::{Column, Table, TableSpec, build_table};
pub use urgency::Urgency;
