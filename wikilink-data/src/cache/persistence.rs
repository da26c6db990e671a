#![forbid(unsafe_code)]

use rusqlite::{Connection, Error as SqliteError, Transaction};
use thiserror::Error;

use crate::entity::{EntityFacts, INSTANCE_OF_PROPERTY, SUBCLASS_OF_PROPERTY};

use super::schema::{CacheSchemaError, initialise_schema};

/// Persist parsed entities into the cache.
///
/// The schema is created when missing. Writing an entity that is already
/// cached replaces its coordinate and type links, so re-importing a newer
/// document never leaves stale parents behind. Returns the number of
/// entities written.
///
/// # Errors
/// Returns [`CacheEntityError::Schema`] when the schema cannot be initialised
/// and [`CacheEntityError::Sqlite`] when a statement fails. The transaction
/// is rolled back, so a failed import stores nothing.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use rusqlite::Connection;
/// use wikilink_data::{parse_entity_documents, persist_entities};
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// let entities = parse_entity_documents(Cursor::new(r#"{"id":"Q64","claims":{}}"#))
///     .expect("parse document");
///
/// assert_eq!(persist_entities(&mut conn, &entities).expect("persist entities"), 1);
/// ```
pub fn persist_entities(
    connection: &mut Connection,
    entities: &[EntityFacts],
) -> Result<usize, CacheEntityError> {
    initialise_schema(connection)?;
    if entities.is_empty() {
        return Ok(0);
    }

    let transaction = connection
        .transaction()
        .map_err(|source| CacheEntityError::Sqlite {
            operation: "begin persistence transaction",
            source,
        })?;
    write_entities(&transaction, entities)?;
    transaction
        .commit()
        .map_err(|source| CacheEntityError::Sqlite {
            operation: "commit persistence transaction",
            source,
        })?;

    Ok(entities.len())
}

fn write_entities(
    transaction: &Transaction<'_>,
    entities: &[EntityFacts],
) -> Result<(), CacheEntityError> {
    let mut upsert_entity = transaction
        .prepare_cached(
            "INSERT INTO wikidata_entities (entity_id, lat, lon) VALUES (?1, ?2, ?3)
                ON CONFLICT(entity_id) DO UPDATE SET lat = excluded.lat, lon = excluded.lon",
        )
        .map_err(|source| CacheEntityError::Sqlite {
            operation: "prepare upsert entity",
            source,
        })?;
    let mut clear_links = transaction
        .prepare_cached("DELETE FROM wikidata_type_links WHERE entity_id = ?1")
        .map_err(|source| CacheEntityError::Sqlite {
            operation: "prepare clear type links",
            source,
        })?;
    let mut insert_link = transaction
        .prepare_cached(
            "INSERT OR IGNORE INTO wikidata_type_links (entity_id, property_id, parent_id)
                VALUES (?1, ?2, ?3)",
        )
        .map_err(|source| CacheEntityError::Sqlite {
            operation: "prepare insert type link",
            source,
        })?;

    for entity in entities {
        let id = entity.id.as_str();
        let (lat, lon) = entity
            .coordinate
            .map_or((None, None), |coord| (Some(coord.y), Some(coord.x)));
        upsert_entity
            .execute((id, lat, lon))
            .map_err(|source| CacheEntityError::Sqlite {
                operation: "upsert entity",
                source,
            })?;
        clear_links
            .execute([id])
            .map_err(|source| CacheEntityError::Sqlite {
                operation: "clear type links",
                source,
            })?;

        let links = entity
            .instance_of
            .iter()
            .map(|parent| (INSTANCE_OF_PROPERTY, parent))
            .chain(
                entity
                    .subclass_of
                    .iter()
                    .map(|parent| (SUBCLASS_OF_PROPERTY, parent)),
            );
        for (property, parent) in links {
            insert_link
                .execute((id, property, parent.as_str()))
                .map_err(|source| CacheEntityError::Sqlite {
                    operation: "insert type link",
                    source,
                })?;
        }
    }

    Ok(())
}

/// Errors raised when writing entities into the cache.
#[derive(Debug, Error)]
pub enum CacheEntityError {
    /// The schema could not be prepared.
    #[error(transparent)]
    Schema(#[from] CacheSchemaError),
    /// A write statement failed.
    #[error("failed to persist {operation}")]
    Sqlite {
        /// Name of the failing operation.
        operation: &'static str,
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
}
