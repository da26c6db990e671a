//! Unit tests for the SQLite entity cache.

use super::{
    CacheEntityError, CacheSchemaError, OpenCacheError, SCHEMA_VERSION, SqliteKnowledgeBase,
    initialise_schema, persist_entities,
};
use crate::entity::EntityFacts;
use camino::Utf8PathBuf;
use geo::Coord;
use rstest::{fixture, rstest};
use rusqlite::Connection;
use std::collections::BTreeSet;
use wikilink_core::{KnowledgeBase, LookupError, WikidataId};

fn qid(raw: &str) -> WikidataId {
    WikidataId::parse(raw).expect("valid identifier")
}

fn ids(raw: &[&str]) -> BTreeSet<WikidataId> {
    raw.iter().copied().map(qid).collect()
}

fn facts(id: &str, instance_of: &[&str], subclass_of: &[&str]) -> EntityFacts {
    EntityFacts {
        id: qid(id),
        instance_of: ids(instance_of),
        subclass_of: ids(subclass_of),
        coordinate: None,
    }
}

fn ancestry_of(cache: &SqliteKnowledgeBase, id: &str) -> Vec<String> {
    cache
        .resolve_type_ancestry(&qid(id))
        .expect("resolve ancestry")
        .iter()
        .map(|type_id| type_id.as_str().to_owned())
        .collect()
}

#[fixture]
fn connection() -> Connection {
    Connection::open_in_memory().expect("open in-memory database")
}

#[fixture]
fn cache() -> SqliteKnowledgeBase {
    let mut cache = SqliteKnowledgeBase::open_in_memory().expect("open cache");
    let sheep = facts("Q7368", &["Q16521"], &[]);
    let taxon = facts("Q16521", &[], &["Q2116951"]);
    let city = EntityFacts {
        coordinate: Some(Coord {
            x: 19.938_333,
            y: 50.061_389,
        }),
        ..facts("Q31487", &["Q515"], &[])
    };
    let town = facts("Q515", &["Q3327874"], &["Q486972"]);
    let settlement = facts("Q486972", &[], &["Q2221906"]);
    cache
        .import(&[sheep, taxon, city, town, settlement])
        .expect("import entities");
    cache
}

#[rstest]
fn initialises_schema_records_version(mut connection: Connection) -> Result<(), CacheSchemaError> {
    initialise_schema(&mut connection)?;
    initialise_schema(&mut connection)?;

    let version: i64 = connection
        .query_row(
            "SELECT version FROM wikilink_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .expect("schema version present");
    assert_eq!(version, SCHEMA_VERSION);
    Ok(())
}

#[rstest]
fn rejects_foreign_schema_version(mut connection: Connection) {
    initialise_schema(&mut connection).expect("initialise schema");
    connection
        .execute("UPDATE wikilink_schema_version SET version = 99", [])
        .expect("bump version");

    let err = initialise_schema(&mut connection).expect_err("version mismatch");

    assert!(matches!(
        err,
        CacheSchemaError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found: 99
        }
    ));
}

#[rstest]
fn persisting_nothing_still_creates_schema(mut connection: Connection) {
    assert_eq!(
        persist_entities(&mut connection, &[]).expect("persist nothing"),
        0
    );

    let tables: i64 = connection
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN (
                'wikidata_entities',
                'wikidata_type_links'
            )",
            [],
            |row| row.get(0),
        )
        .expect("count tables");
    assert_eq!(tables, 2);
}

#[rstest]
fn type_links_rely_on_their_primary_key(mut connection: Connection) {
    initialise_schema(&mut connection).expect("create cache schema");

    let indexes: i64 = connection
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'index' AND tbl_name = 'wikidata_type_links'",
            [],
            |row| row.get(0),
        )
        .expect("count indexes");
    assert_eq!(indexes, 0);
}

#[rstest]
fn reimport_replaces_type_links(mut connection: Connection) -> Result<(), CacheEntityError> {
    persist_entities(&mut connection, &[facts("Q1", &["Q5"], &[])])?;
    persist_entities(&mut connection, &[facts("Q1", &["Q43229"], &[])])?;

    let cache = SqliteKnowledgeBase::from_connection(connection)?;
    assert_eq!(ancestry_of(&cache, "Q1"), vec!["Q43229"]);
    Ok(())
}

#[rstest]
fn follows_instance_then_subclass_links(cache: SqliteKnowledgeBase) {
    assert_eq!(ancestry_of(&cache, "Q7368"), vec!["Q16521", "Q2116951"]);
    assert_eq!(
        ancestry_of(&cache, "Q31487"),
        vec!["Q2221906", "Q486972", "Q515"]
    );
}

#[rstest]
fn instance_links_of_parents_are_not_followed(cache: SqliteKnowledgeBase) {
    let ancestry = ancestry_of(&cache, "Q31487");

    assert!(!ancestry.iter().any(|type_id| type_id == "Q3327874"));
}

#[rstest]
fn subclass_cycles_terminate(mut connection: Connection) -> Result<(), CacheEntityError> {
    persist_entities(
        &mut connection,
        &[
            facts("Q10", &["Q11"], &[]),
            facts("Q11", &[], &["Q12"]),
            facts("Q12", &[], &["Q11"]),
        ],
    )?;

    let cache = SqliteKnowledgeBase::from_connection(connection)?;
    assert_eq!(ancestry_of(&cache, "Q10"), vec!["Q11", "Q12"]);
    Ok(())
}

#[rstest]
fn uncached_entities_are_not_found(cache: SqliteKnowledgeBase) {
    let missing = qid("Q999");

    let ancestry = cache.resolve_type_ancestry(&missing);
    let coordinate = cache.resolve_coordinate(&missing);

    assert!(matches!(ancestry, Err(LookupError::NotFound { .. })));
    assert!(matches!(coordinate, Err(LookupError::NotFound { .. })));
}

#[rstest]
fn parents_without_documents_resolve_to_empty_ancestry(mut connection: Connection) {
    persist_entities(&mut connection, &[facts("Q1", &[], &[])]).expect("persist entity");
    let cache = SqliteKnowledgeBase::from_connection(connection).expect("wrap connection");

    assert!(ancestry_of(&cache, "Q1").is_empty());
}

#[rstest]
fn resolves_stored_coordinates(cache: SqliteKnowledgeBase) {
    let city = cache
        .resolve_coordinate(&qid("Q31487"))
        .expect("lookup city");
    assert_eq!(
        city,
        Some(Coord {
            x: 19.938_333,
            y: 50.061_389,
        })
    );
    let sheep = cache
        .resolve_coordinate(&qid("Q7368"))
        .expect("lookup sheep");
    assert_eq!(sheep, None);
}

#[rstest]
fn counts_cached_entities(cache: SqliteKnowledgeBase) {
    assert_eq!(cache.entity_count().expect("count entities"), 5);
}

#[rstest]
fn open_requires_existing_cache() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let path = Utf8PathBuf::from_path_buf(temp.path().join("absent.db")).expect("utf-8 path");

    let err = SqliteKnowledgeBase::open(&path).expect_err("cache is missing");

    assert!(matches!(err, OpenCacheError::Missing { .. }));
}

#[rstest]
fn create_then_open_round_trips_through_disk() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let path = Utf8PathBuf::from_path_buf(temp.path().join("nested/cache.db")).expect("utf-8 path");

    let mut created = SqliteKnowledgeBase::create(&path).expect("create cache");
    created
        .import(&[facts("Q5", &[], &["Q215627"])])
        .expect("import entity");
    drop(created);

    let reopened = SqliteKnowledgeBase::open(&path).expect("reopen cache");
    assert_eq!(ancestry_of(&reopened, "Q5"), vec!["Q215627"]);
}
