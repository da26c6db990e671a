#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use log::debug;
use rusqlite::{Connection, Error as SqliteError, OpenFlags, OptionalExtension};
use thiserror::Error;
use wikilink_core::{KnowledgeBase, LookupError, TypeAncestry, WikidataId};

use crate::{
    entity::EntityFacts,
    fs::{ensure_parent_dir, file_is_file},
};

use super::{
    persistence::{CacheEntityError, persist_entities},
    schema::{CacheSchemaError, initialise_schema},
};

/// Every type reachable from an entity: its direct `P31` and `P279` parents,
/// then `P279` transitively. `UNION` discards revisited rows so subclass
/// cycles terminate.
const ANCESTRY_QUERY: &str = "WITH RECURSIVE ancestry(type_id) AS (
        SELECT parent_id FROM wikidata_type_links
            WHERE entity_id = ?1 AND property_id IN ('P31', 'P279')
        UNION
        SELECT links.parent_id FROM wikidata_type_links AS links
            JOIN ancestry ON links.entity_id = ancestry.type_id
            WHERE links.property_id = 'P279'
    )
    SELECT type_id FROM ancestry";

/// [`KnowledgeBase`] backed by the SQLite entity cache.
///
/// Lookups only see cached entities: an identifier never imported reports
/// [`LookupError::NotFound`], and SQLite failures report
/// [`LookupError::Unavailable`].
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use wikilink_core::{KnowledgeBase, WikidataId};
/// use wikilink_data::{SqliteKnowledgeBase, parse_entity_documents};
///
/// let mut cache = SqliteKnowledgeBase::open_in_memory().expect("open cache");
/// let documents = Cursor::new(concat!(
///     r#"{"id":"Q7368","claims":{"P31":[{"mainsnak":{"snaktype":"value","#,
///     r#""datavalue":{"type":"wikibase-entityid","value":{"id":"Q16521"}}}}]}}"#,
/// ));
/// cache
///     .import(&parse_entity_documents(documents).expect("parse documents"))
///     .expect("import entities");
///
/// let sheep = WikidataId::parse("Q7368").expect("valid identifier");
/// let ancestry = cache.resolve_type_ancestry(&sheep).expect("resolve ancestry");
/// assert!(ancestry.contains(&WikidataId::parse("Q16521").expect("valid identifier")));
/// ```
#[derive(Debug)]
pub struct SqliteKnowledgeBase {
    connection: Connection,
}

impl SqliteKnowledgeBase {
    /// Open an existing cache file for querying.
    ///
    /// # Errors
    /// Returns [`OpenCacheError::Missing`] when no cache exists at `path`,
    /// [`OpenCacheError::Sqlite`] when it cannot be opened and
    /// [`OpenCacheError::Schema`] when its schema cannot be initialised.
    pub fn open(path: &Utf8Path) -> Result<Self, OpenCacheError> {
        let exists = file_is_file(path).map_err(|source| OpenCacheError::Inspect {
            path: path.to_path_buf(),
            source,
        })?;
        if !exists {
            return Err(OpenCacheError::Missing {
                path: path.to_path_buf(),
            });
        }
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)
            .map_err(|source| OpenCacheError::Sqlite {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_connection(connection)?)
    }

    /// Open the cache at `path`, creating the file and its parent
    /// directories when missing.
    ///
    /// # Errors
    /// Returns [`OpenCacheError::CreateParent`] when a directory cannot be
    /// created, otherwise fails like [`SqliteKnowledgeBase::open`].
    pub fn create(path: &Utf8Path) -> Result<Self, OpenCacheError> {
        ensure_parent_dir(path).map_err(|source| OpenCacheError::CreateParent {
            path: path.to_path_buf(),
            source,
        })?;
        let connection = Connection::open(path).map_err(|source| OpenCacheError::Sqlite {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_connection(connection)?)
    }

    /// Open a throwaway cache held in memory.
    ///
    /// # Errors
    /// Returns an [`OpenCacheError`] when `SQLite` cannot set up the database.
    pub fn open_in_memory() -> Result<Self, OpenCacheError> {
        let connection = Connection::open_in_memory().map_err(|source| OpenCacheError::Sqlite {
            path: Utf8PathBuf::from(":memory:"),
            source,
        })?;
        Ok(Self::from_connection(connection)?)
    }

    /// Wrap an open connection, initialising the schema when needed.
    ///
    /// # Errors
    /// Returns a [`CacheSchemaError`] when the schema cannot be created or
    /// carries another version.
    pub fn from_connection(mut connection: Connection) -> Result<Self, CacheSchemaError> {
        initialise_schema(&mut connection)?;
        Ok(Self { connection })
    }

    /// Write `entities` into the cache, returning how many were stored.
    ///
    /// # Errors
    /// Returns a [`CacheEntityError`] when a write fails. Nothing is stored
    /// in that case.
    pub fn import(&mut self, entities: &[EntityFacts]) -> Result<usize, CacheEntityError> {
        persist_entities(&mut self.connection, entities)
    }

    /// Number of entities held in the cache.
    ///
    /// # Errors
    /// Returns the underlying [`SqliteError`] when the count query fails.
    pub fn entity_count(&self) -> Result<u64, SqliteError> {
        self.connection
            .query_row("SELECT COUNT(*) FROM wikidata_entities", [], |row| {
                row.get(0)
            })
    }

    fn cached_coordinate(&self, id: &WikidataId) -> Result<Option<Coord<f64>>, LookupError> {
        let row: Option<(Option<f64>, Option<f64>)> = self
            .connection
            .query_row(
                "SELECT lat, lon FROM wikidata_entities WHERE entity_id = ?1",
                [id.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|source| unavailable(id, source))?;
        match row {
            None => Err(LookupError::NotFound { id: id.clone() }),
            Some((Some(lat), Some(lon))) => Ok(Some(Coord { x: lon, y: lat })),
            Some(_) => Ok(None),
        }
    }
}

impl KnowledgeBase for SqliteKnowledgeBase {
    fn resolve_type_ancestry(&self, id: &WikidataId) -> Result<TypeAncestry, LookupError> {
        // Uncached entities are NotFound even though the query would be empty.
        self.cached_coordinate(id)?;
        let mut statement = self
            .connection
            .prepare_cached(ANCESTRY_QUERY)
            .map_err(|source| unavailable(id, source))?;
        let rows = statement
            .query_map([id.as_str()], |row| row.get::<_, String>(0))
            .map_err(|source| unavailable(id, source))?;

        let mut ancestry = Vec::new();
        for row in rows {
            let raw = row.map_err(|source| unavailable(id, source))?;
            match WikidataId::parse(&raw) {
                Ok(type_id) => ancestry.push(type_id),
                Err(err) => debug!("skipping cached parent {raw:?} of {id}: {err}"),
            }
        }
        Ok(ancestry.into_iter().collect())
    }

    fn resolve_coordinate(&self, id: &WikidataId) -> Result<Option<Coord<f64>>, LookupError> {
        self.cached_coordinate(id)
    }
}

fn unavailable(id: &WikidataId, source: SqliteError) -> LookupError {
    LookupError::Unavailable {
        id: id.clone(),
        source: Box::new(source),
    }
}

/// Errors raised when opening the entity cache.
#[derive(Debug, Error)]
pub enum OpenCacheError {
    /// No cache file exists at the path.
    #[error("no entity cache at {path}; run `wikilink import` first")]
    Missing {
        /// Requested cache path.
        path: Utf8PathBuf,
    },
    /// The cache path could not be inspected.
    #[error("failed to inspect entity cache path {path}")]
    Inspect {
        /// Requested cache path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The cache directory could not be created.
    #[error("failed to create parent directory for entity cache {path}")]
    CreateParent {
        /// Requested cache path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// SQLite refused to open the database.
    #[error("failed to open SQLite database at {path}")]
    Sqlite {
        /// Requested cache path.
        path: Utf8PathBuf,
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
    /// The database schema could not be prepared.
    #[error(transparent)]
    Schema(#[from] CacheSchemaError),
}
