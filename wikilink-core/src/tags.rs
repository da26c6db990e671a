//! OpenStreetMap feature input: the tag mapping and geometry kind.

use std::{collections::BTreeMap, fmt, str::FromStr};

use thiserror::Error;

/// Key/value tags read from one OpenStreetMap feature.
///
/// Keys are unique. Iteration follows key order so scans over the tags are
/// deterministic.
///
/// # Examples
/// ```
/// use wikilink_core::TagSet;
///
/// let tags = TagSet::from([("wikidata", "Q36"), ("wikipedia", "pl:Polska")]);
/// assert_eq!(tags.get("wikidata"), Some("Q36"));
/// assert!(!tags.contains_key("name"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TagSet {
    tags: BTreeMap<String, String>,
}

impl TagSet {
    /// Create an empty tag set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tags: BTreeMap::new(),
        }
    }

    /// Insert or replace a tag, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.tags.insert(key.into(), value.into())
    }

    /// Look up the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Report whether `key` is present, whatever its value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Iterate over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// Number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Report whether the feature carries no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for TagSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            tags: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for TagSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// The OpenStreetMap element type a tag set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "lowercase", try_from = "String")
)]
pub enum GeometryKind {
    /// A single point.
    Node,
    /// An ordered list of nodes.
    Way,
    /// A group of members.
    Relation,
}

impl GeometryKind {
    /// Lower-case OSM name of the element type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown geometry kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown OSM geometry kind {value:?}; expected node, way or relation")]
pub struct GeometryKindError {
    /// Offending input.
    pub value: String,
}

impl FromStr for GeometryKind {
    type Err = GeometryKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "node" => Ok(Self::Node),
            "way" => Ok(Self::Way),
            "relation" => Ok(Self::Relation),
            _ => Err(GeometryKindError {
                value: s.to_owned(),
            }),
        }
    }
}

impl TryFrom<String> for GeometryKind {
    type Error = GeometryKindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
