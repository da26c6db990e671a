//! In-memory [`KnowledgeBase`] used by unit and behaviour tests.

use std::collections::{BTreeMap, BTreeSet};

use geo::Coord;

use crate::{KnowledgeBase, LookupError, TypeAncestry, WikidataId};

#[derive(Debug, Clone, Default)]
struct StubEntity {
    ancestry: BTreeSet<WikidataId>,
    coordinate: Option<Coord<f64>>,
}

/// Stub knowledge base keyed by entity identifier.
///
/// Entities that were never added resolve to [`LookupError::NotFound`].
/// Entities marked with [`StubKnowledgeBase::with_failure`] resolve to
/// [`LookupError::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct StubKnowledgeBase {
    entities: BTreeMap<WikidataId, StubEntity>,
    failing: BTreeSet<WikidataId>,
}

/// Parse a fixture identifier, panicking on typos.
///
/// # Panics
/// Panics when `raw` is not a valid identifier.
#[must_use]
pub fn qid(raw: &str) -> WikidataId {
    WikidataId::parse(raw).unwrap_or_else(|err| panic!("invalid fixture id {raw:?}: {err}"))
}

impl StubKnowledgeBase {
    /// Create an empty stub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity with its ancestor types.
    #[must_use]
    pub fn with_entity(mut self, id: &str, ancestors: &[&str]) -> Self {
        let entity = self.entities.entry(qid(id)).or_default();
        entity.ancestry.extend(ancestors.iter().map(|raw| qid(raw)));
        self
    }

    /// Attach a coordinate to an entity, registering it when missing.
    #[must_use]
    pub fn with_coordinate(mut self, id: &str, lat: f64, lon: f64) -> Self {
        self.entities.entry(qid(id)).or_default().coordinate = Some(Coord { x: lon, y: lat });
        self
    }

    /// Make every lookup for `id` fail as if the backing store were down.
    #[must_use]
    pub fn with_failure(mut self, id: &str) -> Self {
        self.failing.insert(qid(id));
        self
    }

    /// Stub pre-loaded with the animals and places used across the test suite.
    ///
    /// Sheep, goat, horse and llama are taxa (`Q16521`) of animals (`Q729`);
    /// Kraków (`Q31487`) is a located city; Piotr Skrzynecki (`Q561127`) is a
    /// human without a coordinate.
    #[must_use]
    pub fn with_reference_entities() -> Self {
        const ANIMAL: &[&str] = &["Q16521", "Q729", "Q7239"];
        Self::new()
            .with_entity("Q7368", ANIMAL)
            .with_entity("Q2934", ANIMAL)
            .with_entity("Q726", ANIMAL)
            .with_entity("Q42569", ANIMAL)
            .with_entity("Q31487", &["Q515", "Q486972", "Q2221906"])
            .with_coordinate("Q31487", 50.061_389, 19.938_333)
            .with_entity("Q561127", &["Q5", "Q215627"])
            .with_entity("Q824359", &["Q16970", "Q41176", "Q811979"])
            .with_entity("Q12345", &[])
    }

    fn lookup(&self, id: &WikidataId) -> Result<&StubEntity, LookupError> {
        if self.failing.contains(id) {
            return Err(LookupError::Unavailable {
                id: id.clone(),
                source: "stub knowledge base is offline".into(),
            });
        }
        self.entities
            .get(id)
            .ok_or_else(|| LookupError::NotFound { id: id.clone() })
    }
}

impl KnowledgeBase for StubKnowledgeBase {
    fn resolve_type_ancestry(&self, id: &WikidataId) -> Result<TypeAncestry, LookupError> {
        self.lookup(id)
            .map(|entity| TypeAncestry::new(entity.ancestry.clone()))
    }

    fn resolve_coordinate(&self, id: &WikidataId) -> Result<Option<Coord<f64>>, LookupError> {
        self.lookup(id).map(|entity| entity.coordinate)
    }
}
