//! Validation of links between OpenStreetMap features and Wikimedia projects.
//!
//! Responsibilities:
//! - Check the syntax of `wikidata`, `wikipedia` and `wikipedia:LANG` tags.
//! - Classify linked entities by their Wikidata type ancestry and flag those
//!   that belong in secondary tags such as `subject:wikidata`.
//! - Describe distances between a feature and its linked entity.
//!
//! Boundaries:
//! - Knowledge-base access goes through the [`KnowledgeBase`] trait; this
//!   crate performs no I/O of its own beyond logging.
//! - Detection only: tags are never rewritten.
//!
//! Invariants:
//! - The blacklist is validated once when a detector is built.
//! - Lookup failures degrade to "no verdict", never to a finding.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod blacklist;
pub mod classify;
mod config;
pub mod countries;
mod detector;
pub mod distance;
mod id;
mod knowledge;
pub mod language;
mod report;
pub mod syntax;
mod tags;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use config::DetectorConfig;
pub use detector::WikimediaLinkIssueDetector;
pub use id::{WikidataId, WikidataIdError};
pub use knowledge::{KnowledgeBase, LookupError, TypeAncestry};
pub use report::{IssueKind, IssueReport, Severity};
pub use tags::{GeometryKind, GeometryKindError, TagSet};
