//! `profdash-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure
//! concerns): the professor record model, the record-id allocation
//! contract, and the domain error type.

pub mod error;
pub mod id;
pub mod record;

pub use error::{DomainError, DomainResult};
pub use id::{RecordId, next_record_id};
pub use record::{ProfessorRecord, RecordDraft, RecordPatch};
