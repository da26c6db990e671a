//! Command-line interface for checking Wikimedia links on OSM features.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use wikilink_data::fs::file_is_file;

mod check;
mod error;
mod import;

pub use error::CliError;

use check::{CheckArgs, run_check};
use import::{ImportArgs, run_import};

const ARG_CACHE_DB: &str = "cache-db";
const ARG_FEATURES: &str = "features";
const ARG_DOCUMENTS: &str = "documents";
const ARG_DISTANCE_WARNING_KM: &str = "distance-warning-km";
const ENV_CHECK_CACHE_DB: &str = "WIKILINK_CMDS_CHECK_CACHE_DB";
const ENV_CHECK_FEATURES: &str = "WIKILINK_CMDS_CHECK_FEATURES";
const ENV_IMPORT_CACHE_DB: &str = "WIKILINK_CMDS_IMPORT_CACHE_DB";
const ENV_IMPORT_DOCUMENTS: &str = "WIKILINK_CMDS_IMPORT_DOCUMENTS";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] when arguments or configuration are invalid, or
/// when the selected command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Check(args) => run_check(args),
        Command::Import(args) => run_import(args),
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "wikilink",
    about = "Detect problems in how OpenStreetMap features link to Wikipedia and Wikidata",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check features against the entity cache and print findings.
    Check(CheckArgs),
    /// Populate the entity cache from Wikidata entity documents.
    Import(ImportArgs),
}

#[cfg(test)]
mod tests;
