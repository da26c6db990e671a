//! Facade crate for the OSM Wikimedia link checker.
//!
//! This crate re-exports the core detector API and, behind the
//! `store-sqlite` feature, the SQLite entity cache that backs it.

#![forbid(unsafe_code)]

pub use wikilink_core::{
    DetectorConfig, GeometryKind, IssueKind, IssueReport, KnowledgeBase, LookupError, Severity,
    TagSet, TypeAncestry, WikidataId, WikimediaLinkIssueDetector,
};

#[cfg(feature = "store-sqlite")]
pub use wikilink_data::{SqliteKnowledgeBase, parse_entity_documents};
