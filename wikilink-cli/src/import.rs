//! Import command implementation for the wikilink CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wikilink_data::{SqliteKnowledgeBase, fs::open_utf8_file, parse_entity_documents};

use crate::{
    ARG_CACHE_DB, ARG_DOCUMENTS, CliError, ENV_IMPORT_CACHE_DB, ENV_IMPORT_DOCUMENTS,
    require_existing,
};

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Read Wikidata entity documents, one JSON value per line \
                 (dump lines or Special:EntityData bodies), and store their \
                 type links and coordinates in the SQLite entity cache. \
                 Missing parent directories of the cache are created.",
    about = "Populate the entity cache from Wikidata documents"
)]
#[ortho_config(prefix = "WIKILINK")]
pub(crate) struct ImportArgs {
    /// Path to the newline-delimited entity documents.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) documents: Option<Utf8PathBuf>,
    /// Path to the SQLite entity cache to create or update.
    #[arg(long = ARG_CACHE_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) cache_db: Option<Utf8PathBuf>,
}

impl ImportArgs {
    pub(crate) fn into_config(self) -> Result<ImportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ImportConfig::try_from(merged)
    }
}

/// Resolved `import` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportConfig {
    pub(crate) documents: Utf8PathBuf,
    pub(crate) cache_db: Utf8PathBuf,
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = CliError;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        let documents = args.documents.ok_or(CliError::MissingArgument {
            field: ARG_DOCUMENTS,
            env: ENV_IMPORT_DOCUMENTS,
        })?;
        let cache_db = args.cache_db.ok_or(CliError::MissingArgument {
            field: ARG_CACHE_DB,
            env: ENV_IMPORT_CACHE_DB,
        })?;
        Ok(Self {
            documents,
            cache_db,
        })
    }
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let imported = import_documents(&config)?;
    info!("imported {imported} entities into {}", config.cache_db);
    Ok(())
}

/// Parse the configured documents and write them into the cache, returning
/// the number of entities stored.
pub(crate) fn import_documents(config: &ImportConfig) -> Result<usize, CliError> {
    require_existing(&config.documents, ARG_DOCUMENTS)?;
    let file = open_utf8_file(&config.documents).map_err(|source| CliError::OpenInput {
        field: ARG_DOCUMENTS,
        path: config.documents.clone(),
        source,
    })?;
    let entities = parse_entity_documents(file).map_err(|source| CliError::ParseDocuments {
        path: config.documents.clone(),
        source,
    })?;
    let mut cache = SqliteKnowledgeBase::create(&config.cache_db)?;
    cache
        .import(&entities)
        .map_err(|source| CliError::PersistEntities {
            path: config.cache_db.clone(),
            source,
        })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ImportConfig, CliError> {
    let merged = ImportArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ImportConfig::try_from(merged)
}
