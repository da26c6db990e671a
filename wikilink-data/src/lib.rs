//! Persistent knowledge-base cache for the Wikimedia link detector.
//!
//! Responsibilities:
//! - Store Wikidata entities with their `P31`/`P279` type links and `P625`
//!   coordinates in SQLite.
//! - Import entity JSON documents into that store.
//! - Answer the core [`KnowledgeBase`](wikilink_core::KnowledgeBase) queries.
//!
//! Boundaries:
//! - Do not encode link rules (live in `wikilink-core`).
//! - No network access; the cache is filled from documents on disk.
//!
//! Invariants:
//! - No global mutable state.
#![forbid(unsafe_code)]

pub mod cache;
pub mod entity;
pub mod fs;

pub use cache::{
    CacheEntityError, CacheSchemaError, OpenCacheError, SCHEMA_VERSION, SqliteKnowledgeBase,
    initialise_schema, persist_entities,
};
pub use entity::{EntityDocumentError, EntityFacts, parse_entity_documents};
