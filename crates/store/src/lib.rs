//! `profdash-store` — persistence for the professor collection.
//!
//! One collection of JSON documents, one row per record. The `DocumentStore`
//! trait is the seam between the HTTP/reporting layers and storage; the
//! Postgres implementation is the production backend, the in-memory
//! implementation serves tests and local development.

pub mod documents;
pub mod in_memory;
pub mod postgres;
pub mod seed;

pub use documents::{DocumentStore, StoreError};
pub use in_memory::InMemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use seed::{seed_if_empty, seed_records};
