//! Capability interface onto the Wikidata knowledge base.
//!
//! The detector never talks to Wikidata itself. It asks a [`KnowledgeBase`]
//! for an entity's ancestor types and stored coordinate, so the classification
//! logic can be exercised against an in-memory stub and deployed against a
//! persistent cache without change.

use std::collections::BTreeSet;

use geo::Coord;
use thiserror::Error;

use crate::WikidataId;

/// Every type an entity transitively belongs to through `instance of` (`P31`)
/// and `subclass of` (`P279`).
///
/// Only membership and ordered iteration are offered. Iteration order is the
/// identifier order, which keeps verdicts deterministic when several
/// ancestors match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeAncestry {
    types: BTreeSet<WikidataId>,
}

impl TypeAncestry {
    /// Build an ancestry from resolved type identifiers.
    #[must_use]
    pub const fn new(types: BTreeSet<WikidataId>) -> Self {
        Self { types }
    }

    /// Report whether `type_id` is among the ancestors.
    #[must_use]
    pub fn contains(&self, type_id: &WikidataId) -> bool {
        self.types.contains(type_id)
    }

    /// Iterate over ancestors in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &WikidataId> {
        self.types.iter()
    }

    /// Number of distinct ancestors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Report whether no ancestor type is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<WikidataId> for TypeAncestry {
    fn from_iter<I: IntoIterator<Item = WikidataId>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}

/// Failures reported by a [`KnowledgeBase`].
#[derive(Debug, Error)]
pub enum LookupError {
    /// The knowledge base holds no entity with this identifier.
    #[error("wikidata entity {id} was not found")]
    NotFound {
        /// Requested identifier.
        id: WikidataId,
    },
    /// The lookup could not be completed.
    #[error("wikidata entity {id} could not be looked up")]
    Unavailable {
        /// Requested identifier.
        id: WikidataId,
        /// Underlying failure from the backing store.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl LookupError {
    /// Report whether the entity is known not to exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Read-only access to cached Wikidata entities.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wikilink_core::{KnowledgeBase, LookupError, TypeAncestry, WikidataId};
///
/// struct EmptyKnowledgeBase;
///
/// impl KnowledgeBase for EmptyKnowledgeBase {
///     fn resolve_type_ancestry(&self, id: &WikidataId) -> Result<TypeAncestry, LookupError> {
///         Err(LookupError::NotFound { id: id.clone() })
///     }
///
///     fn resolve_coordinate(&self, id: &WikidataId) -> Result<Option<Coord<f64>>, LookupError> {
///         Err(LookupError::NotFound { id: id.clone() })
///     }
/// }
///
/// let id = WikidataId::parse("Q64")?;
/// assert!(EmptyKnowledgeBase.resolve_type_ancestry(&id).is_err());
/// # Ok::<(), wikilink_core::WikidataIdError>(())
/// ```
pub trait KnowledgeBase {
    /// Resolve every ancestor type of `id`.
    ///
    /// # Errors
    /// Returns [`LookupError::NotFound`] when `id` is unknown and
    /// [`LookupError::Unavailable`] when the backing store fails.
    fn resolve_type_ancestry(&self, id: &WikidataId) -> Result<TypeAncestry, LookupError>;

    /// Resolve the coordinate stored on `id`, if it has one.
    ///
    /// # Errors
    /// Fails in the same way as [`KnowledgeBase::resolve_type_ancestry`].
    fn resolve_coordinate(&self, id: &WikidataId) -> Result<Option<Coord<f64>>, LookupError>;
}

impl<K> KnowledgeBase for &K
where
    K: KnowledgeBase + ?Sized,
{
    fn resolve_type_ancestry(&self, id: &WikidataId) -> Result<TypeAncestry, LookupError> {
        (**self).resolve_type_ancestry(id)
    }

    fn resolve_coordinate(&self, id: &WikidataId) -> Result<Option<Coord<f64>>, LookupError> {
        (**self).resolve_coordinate(id)
    }
}
