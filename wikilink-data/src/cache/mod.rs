//! SQLite cache of Wikidata entities.
//!
//! The module is split into focused submodules:
//! - [`schema`] materialises the tables backing the cache.
//! - [`persistence`] writes parsed entity facts into those tables.
//! - [`knowledge`] answers ancestry and coordinate queries from them.
#![forbid(unsafe_code)]

mod knowledge;
mod persistence;
mod schema;

pub use knowledge::{OpenCacheError, SqliteKnowledgeBase};
pub use persistence::{CacheEntityError, persist_entities};
pub use schema::{CacheSchemaError, SCHEMA_VERSION, initialise_schema};

#[cfg(test)]
mod tests;
