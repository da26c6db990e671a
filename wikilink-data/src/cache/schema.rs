#![forbid(unsafe_code)]

use rusqlite::{Connection, Error as SqliteError, OptionalExtension, Transaction};
use thiserror::Error;

/// Version recorded in `wikilink_schema_version` by [`initialise_schema`].
pub const SCHEMA_VERSION: i64 = 1;

/// Initialise the entity cache schema inside an SQLite database.
///
/// Foreign keys are enabled, the tables are created when missing and the
/// schema version is recorded. A database carrying another version is
/// rejected so migrations can be applied explicitly.
///
/// # Errors
/// Returns a [`CacheSchemaError`] naming the failed migration step, or the
/// unexpected version found in the database.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use wikilink_data::initialise_schema;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create cache schema");
///
/// let version: i64 = conn
///     .query_row("SELECT version FROM wikilink_schema_version LIMIT 1", [], |row| row.get(0))
///     .expect("read schema version");
/// assert_eq!(version, 1);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), CacheSchemaError> {
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| CacheSchemaError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| CacheSchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_core_tables(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| CacheSchemaError::Migration {
            step: "commit schema transaction",
            source,
        })
}

fn create_core_tables(transaction: &Transaction<'_>) -> Result<(), CacheSchemaError> {
    run_migration_step(
        transaction,
        "create wikidata_entities",
        "CREATE TABLE IF NOT EXISTS wikidata_entities (
            entity_id TEXT PRIMARY KEY CHECK (length(trim(entity_id)) > 0),
            lat REAL CHECK (lat BETWEEN -90.0 AND 90.0),
            lon REAL CHECK (lon BETWEEN -180.0 AND 180.0),
            CHECK ((lat IS NULL) = (lon IS NULL))
        ) WITHOUT ROWID",
    )?;
    // Parents are not required to be cached themselves, so `parent_id` has no
    // foreign key.
    run_migration_step(
        transaction,
        "create wikidata_type_links",
        "CREATE TABLE IF NOT EXISTS wikidata_type_links (
            entity_id TEXT NOT NULL,
            property_id TEXT NOT NULL CHECK (property_id IN ('P31', 'P279')),
            parent_id TEXT NOT NULL,
            PRIMARY KEY (entity_id, property_id, parent_id),
            FOREIGN KEY (entity_id) REFERENCES wikidata_entities(entity_id) ON DELETE CASCADE
        ) WITHOUT ROWID",
    )
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), CacheSchemaError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS wikilink_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing_version: Option<i64> = transaction
        .query_row(
            "SELECT version FROM wikilink_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| CacheSchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing_version {
        Some(version) if version == SCHEMA_VERSION => Ok(()),
        Some(found) => Err(CacheSchemaError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
        None => transaction
            .execute(
                "INSERT INTO wikilink_schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map(|_| ())
            .map_err(|source| CacheSchemaError::Migration {
                step: "record schema version",
                source,
            }),
    }
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), CacheSchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| CacheSchemaError::Migration { step, source })
}

/// Errors raised when initialising the cache schema.
#[derive(Debug, Error)]
pub enum CacheSchemaError {
    /// Foreign key enforcement could not be switched on.
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
    /// A schema statement failed.
    #[error("failed to execute migration step '{step}'")]
    Migration {
        /// Name of the failing step.
        step: &'static str,
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
    /// The database was created by another schema version.
    #[error(
        "expected cache schema version {expected} but found {found}; rebuild the cache before retrying"
    )]
    VersionMismatch {
        /// Version this build understands.
        expected: i64,
        /// Version stored in the database.
        found: i64,
    },
}
