//! Wikidata entity documents reduced to the facts the detector consults.
//!
//! Two layouts are accepted, one JSON value per line:
//! - dump lines (`{"id":"Q64","claims":{..}}`), optionally wrapped in the
//!   `[`/`]` array framing and trailing commas of the full JSON dump;
//! - `Special:EntityData` bodies (`{"entities":{"Q64":{..}}}`).
//!
//! Only items (`Q` identifiers) are kept. Properties, lexemes and media info
//! entities that appear in full dumps are skipped.
#![forbid(unsafe_code)]

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    io::{BufRead, BufReader, Read},
};

use geo::Coord;
use log::debug;
use serde::{
    Deserialize, Deserializer,
    de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor},
};
use thiserror::Error;
use wikilink_core::{WikidataId, WikidataIdError};

/// Wikidata `instance of`.
pub const INSTANCE_OF_PROPERTY: &str = "P31";
/// Wikidata `subclass of`.
pub const SUBCLASS_OF_PROPERTY: &str = "P279";
/// Wikidata `coordinate location`.
pub const COORDINATE_PROPERTY: &str = "P625";

const EARTH_GLOBE_SUFFIX: &str = "/Q2";

/// Facts extracted from one entity document.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityFacts {
    /// The entity identifier.
    pub id: WikidataId,
    /// Targets of `P31` claims.
    pub instance_of: BTreeSet<WikidataId>,
    /// Targets of `P279` claims.
    pub subclass_of: BTreeSet<WikidataId>,
    /// Terrestrial `P625` coordinate, `x = longitude` and `y = latitude`.
    pub coordinate: Option<Coord<f64>>,
}

/// Errors that can occur while reading entity documents.
#[derive(Debug, Error)]
pub enum EntityDocumentError {
    /// Reading from the underlying source failed.
    #[error("failed to read entity documents at line {line}")]
    ReadLine {
        /// Line that could not be read.
        line: usize,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A line was not a valid entity document.
    #[error("failed to parse entity document at line {line}")]
    ParseEntity {
        /// Offending line.
        line: usize,
        /// Underlying JSON error.
        #[source]
        source: simd_json::Error,
    },
    /// An item identifier did not have the `Q<digits>` shape.
    #[error("invalid item identifier at line {line}")]
    InvalidId {
        /// Offending line.
        line: usize,
        /// Validation failure.
        #[source]
        source: WikidataIdError,
    },
}

/// Parse every item described by the documents in `reader`.
///
/// Entities are returned in document order. Claims with `deprecated` rank and
/// `somevalue`/`novalue` snaks are ignored.
///
/// # Errors
/// Returns [`EntityDocumentError::ReadLine`] when the reader fails,
/// [`EntityDocumentError::ParseEntity`] when a line is not an entity document
/// and [`EntityDocumentError::InvalidId`] when an item identifier is not of the
/// `Q<digits>` shape.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use wikilink_data::parse_entity_documents;
///
/// let documents = Cursor::new(concat!(
///     r#"{"id":"Q7368","claims":{"P31":[{"mainsnak":{"snaktype":"value","#,
///     r#""datavalue":{"type":"wikibase-entityid","value":{"id":"Q16521"}}}}]}}"#,
/// ));
/// let entities = parse_entity_documents(documents)?;
///
/// assert_eq!(entities[0].id.as_str(), "Q7368");
/// assert_eq!(entities[0].instance_of.len(), 1);
/// # Ok::<(), wikilink_data::EntityDocumentError>(())
/// ```
pub fn parse_entity_documents<R>(reader: R) -> Result<Vec<EntityFacts>, EntityDocumentError>
where
    R: Read,
{
    let mut buffered = BufReader::new(reader);
    let mut line = String::new();
    let mut line_number = 0usize;
    let mut entities = Vec::new();

    loop {
        line.clear();
        let read = buffered
            .read_line(&mut line)
            .map_err(|source| EntityDocumentError::ReadLine {
                line: line_number + 1,
                source,
            })?;
        if read == 0 {
            break;
        }
        line_number += 1;

        let Some(document) = strip_dump_framing(&line) else {
            continue;
        };
        let mut bytes = document.as_bytes().to_vec();
        let raw: RawDocument = simd_json::from_slice(bytes.as_mut_slice()).map_err(|source| {
            EntityDocumentError::ParseEntity {
                line: line_number,
                source,
            }
        })?;
        for entity in raw.into_entities() {
            if let Some(facts) = entity.into_facts(line_number)? {
                entities.push(facts);
            }
        }
    }

    Ok(entities)
}

fn strip_dump_framing(line: &str) -> Option<&str> {
    let leading = line.trim().trim_start_matches(',').trim();
    let document = leading.strip_suffix(',').unwrap_or(leading).trim();
    if document.is_empty() || document == "[" || document == "]" {
        None
    } else {
        Some(document)
    }
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_claims")]
    claims: RawClaims,
    #[serde(default)]
    entities: BTreeMap<String, RawEntity>,
}

impl RawDocument {
    fn into_entities(self) -> Vec<RawEntity> {
        if self.entities.is_empty() {
            let claims = self.claims;
            self.id
                .map(|id| RawEntity { id, claims })
                .into_iter()
                .collect()
        } else {
            self.entities.into_values().collect()
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    id: String,
    #[serde(default, deserialize_with = "deserialize_claims")]
    claims: RawClaims,
}

impl RawEntity {
    fn into_facts(self, line: usize) -> Result<Option<EntityFacts>, EntityDocumentError> {
        if !self.id.starts_with('Q') {
            debug!("skipping non-item entity {} at line {line}", self.id);
            return Ok(None);
        }
        let id = WikidataId::parse(&self.id)
            .map_err(|source| EntityDocumentError::InvalidId { line, source })?;

        Ok(Some(EntityFacts {
            id,
            instance_of: self.entity_targets(INSTANCE_OF_PROPERTY),
            subclass_of: self.entity_targets(SUBCLASS_OF_PROPERTY),
            coordinate: self.coordinate(),
        }))
    }

    fn claims(&self, property: &str) -> impl Iterator<Item = &RawClaim> {
        self.claims
            .get(property)
            .into_iter()
            .flatten()
            .filter(|claim| claim.rank != RawRank::Deprecated)
    }

    fn entity_targets(&self, property: &str) -> BTreeSet<WikidataId> {
        self.claims(property)
            .filter_map(|claim| claim.main_snak.entity_target())
            .collect()
    }

    fn coordinate(&self) -> Option<Coord<f64>> {
        let preferred = self
            .claims(COORDINATE_PROPERTY)
            .filter(|claim| claim.rank == RawRank::Preferred)
            .find_map(|claim| claim.main_snak.terrestrial_coordinate());
        preferred.or_else(|| {
            self.claims(COORDINATE_PROPERTY)
                .find_map(|claim| claim.main_snak.terrestrial_coordinate())
        })
    }
}

type RawClaims = BTreeMap<String, Vec<RawClaim>>;

/// Statements keyed by property. Items without statements are written as
/// `"claims":[]` rather than `{}`, so an empty array is accepted too.
fn deserialize_claims<'de, D>(deserializer: D) -> Result<RawClaims, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ClaimsVisitor)
}

struct ClaimsVisitor;

impl<'de> Visitor<'de> for ClaimsVisitor {
    type Value = RawClaims;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of claims or an empty array")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut claims = RawClaims::new();
        while let Some((property, statements)) = map.next_entry::<String, Vec<RawClaim>>()? {
            claims.insert(property, statements);
        }
        Ok(claims)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        if seq.next_element::<IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(1, &self));
        }
        Ok(RawClaims::new())
    }
}

#[derive(Debug, Deserialize)]
struct RawClaim {
    #[serde(rename = "mainsnak")]
    main_snak: RawSnak,
    #[serde(default)]
    rank: RawRank,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum RawRank {
    Preferred,
    #[default]
    Normal,
    Deprecated,
}

#[derive(Debug, Deserialize)]
struct RawSnak {
    #[serde(rename = "snaktype")]
    snak_type: RawSnakType,
    #[serde(rename = "datavalue")]
    data_value: Option<RawDataValue>,
}

impl RawSnak {
    fn value(&self) -> Option<&RawDataValue> {
        if self.snak_type == RawSnakType::Value {
            self.data_value.as_ref()
        } else {
            None
        }
    }

    fn entity_target(&self) -> Option<WikidataId> {
        let RawDataValue::Entity { value } = self.value()? else {
            return None;
        };
        WikidataId::parse(&value.id).ok()
    }

    fn terrestrial_coordinate(&self) -> Option<Coord<f64>> {
        let RawDataValue::GlobeCoordinate { value } = self.value()? else {
            return None;
        };
        let on_earth = value
            .globe
            .as_deref()
            .is_none_or(|globe| globe.ends_with(EARTH_GLOBE_SUFFIX));
        let in_range = value.latitude.is_finite()
            && value.longitude.is_finite()
            && (-90.0..=90.0).contains(&value.latitude)
            && (-180.0..=180.0).contains(&value.longitude);
        (on_earth && in_range).then_some(Coord {
            x: value.longitude,
            y: value.latitude,
        })
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum RawSnakType {
    Value,
    Somevalue,
    Novalue,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawDataValue {
    #[serde(rename = "wikibase-entityid")]
    Entity { value: RawEntityId },
    #[serde(rename = "globecoordinate")]
    GlobeCoordinate { value: RawGlobeCoordinate },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
struct RawEntityId {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RawGlobeCoordinate {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    globe: Option<String>,
}

#[cfg(test)]
mod tests;
