//! Error types emitted by the wikilink CLI.
//!
//! Keep this error type reasonably small, as CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use wikilink_core::blacklist::BlacklistError;
use wikilink_data::{CacheEntityError, EntityDocumentError, OpenCacheError};

/// Errors emitted by the wikilink CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// The distance threshold is not a positive number of kilometres.
    #[error("--distance-warning-km must be a positive number of kilometres, got {value}")]
    InvalidDistanceThreshold {
        /// Rejected value.
        value: f64,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        /// Flag naming the input.
        field: &'static str,
        /// Rejected path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the input.
        field: &'static str,
        /// Path being inspected.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening an input file failed.
    #[error("failed to open {field} at {path:?}: {source}")]
    OpenInput {
        /// Flag naming the input.
        field: &'static str,
        /// Path being opened.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The features file was not a JSON array of features.
    #[error("failed to parse features JSON at {path:?}: {source}")]
    ParseFeatures {
        /// Features file.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// Entity documents could not be parsed.
    #[error("failed to read entity documents at {path:?}: {source}")]
    ParseDocuments {
        /// Documents file.
        path: Utf8PathBuf,
        /// Underlying parse error.
        #[source]
        source: EntityDocumentError,
    },
    /// Opening the entity cache failed.
    #[error(transparent)]
    OpenCache(#[from] OpenCacheError),
    /// Writing entities into the cache failed.
    #[error("failed to import entities into {path:?}: {source}")]
    PersistEntities {
        /// Cache file.
        path: Utf8PathBuf,
        /// Underlying persistence error.
        #[source]
        source: CacheEntityError,
    },
    /// The built-in blacklist failed its startup self-check.
    #[error("built-in wikidata blacklist is defective: {0}")]
    Blacklist(#[from] BlacklistError),
    /// Serialising a finding failed.
    #[error("failed to serialise finding: {0}")]
    SerialiseFinding(#[source] serde_json::Error),
    /// Writing findings failed.
    #[error("failed to write findings: {0}")]
    WriteFindings(#[source] std::io::Error),
}
