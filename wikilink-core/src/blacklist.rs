//! Entity types that must not be the primary subject of an OSM feature.
//!
//! A feature tagged `wikidata=Q7368` (sheep) is not the sheep: it is a
//! paddock, a statue or a farm that is *about* sheep. Each entry maps a type
//! on which that confusion is common to the secondary tags the link belongs
//! in instead.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::{WikidataId, WikidataIdError};

/// Policy attached to one blacklisted type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlacklistEntry {
    /// Tag-key prefix the link should move under, e.g. `subject:`.
    pub expected_prefix: &'static str,
    /// Full alternate keys, e.g. `subject:wikidata`.
    pub expected_tags: &'static [&'static str],
    /// Short name of the blacklisted type, used in messages.
    pub description: &'static str,
}

const SUBJECT: &[&str] = &["subject:wikidata", "subject:wikipedia"];
const SPECIES: &[&str] = &["species:wikidata", "species:wikipedia"];
const BREED: &[&str] = &["breed:wikidata", "breed:wikipedia"];
const BRAND: &[&str] = &["brand:wikidata", "brand:wikipedia"];
const OPERATOR: &[&str] = &["operator:wikidata", "operator:wikipedia"];

const fn entry(
    expected_prefix: &'static str,
    expected_tags: &'static [&'static str],
    description: &'static str,
) -> BlacklistEntry {
    BlacklistEntry {
        expected_prefix,
        expected_tags,
        description,
    }
}

/// Raw table compiled into the binary. Validated by
/// [`WikidataConnectionBlacklist::from_entries`].
pub const WIKIDATA_CONNECTION_BLACKLIST: &[(&str, BlacklistEntry)] = &[
    ("Q5", entry("subject:", SUBJECT, "human")),
    ("Q215627", entry("subject:", SUBJECT, "person")),
    ("Q95074", entry("subject:", SUBJECT, "fictional character")),
    ("Q16521", entry("species:", SPECIES, "taxon")),
    ("Q729", entry("species:", SPECIES, "animal")),
    ("Q38829", entry("breed:", BREED, "breed")),
    ("Q431289", entry("brand:", BRAND, "brand")),
    ("Q2424752", entry("brand:", BRAND, "product")),
    ("Q4830453", entry("operator:", OPERATOR, "business")),
    ("Q1190554", entry("subject:", SUBJECT, "occurrence")),
    ("Q1656682", entry("subject:", SUBJECT, "event")),
    ("Q7725634", entry("subject:", SUBJECT, "literary work")),
    ("Q11424", entry("subject:", SUBJECT, "film")),
    ("Q7366", entry("subject:", SUBJECT, "song")),
    ("Q11862829", entry("subject:", SUBJECT, "academic discipline")),
];

/// Configuration defects in a blacklist table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlacklistError {
    /// A key is not a valid Wikidata identifier.
    #[error("blacklist key {key:?} is not a wikidata identifier")]
    InvalidKey {
        /// Offending key.
        key: String,
        /// Reason the key was rejected.
        #[source]
        source: WikidataIdError,
    },
    /// An entry has an empty or unterminated prefix.
    #[error("blacklist entry {key} must have an expected_prefix ending in ':'")]
    MissingPrefix {
        /// Key of the defective entry.
        key: String,
    },
    /// An entry lists no alternate tags.
    #[error("blacklist entry {key} must list at least one expected tag")]
    MissingExpectedTags {
        /// Key of the defective entry.
        key: String,
    },
    /// An alternate tag does not start with the entry's prefix.
    #[error("blacklist entry {key} lists {tag} outside its prefix {prefix}")]
    TagOutsidePrefix {
        /// Key of the defective entry.
        key: String,
        /// The stray tag.
        tag: String,
        /// The declared prefix.
        prefix: String,
    },
    /// The same type is listed twice.
    #[error("blacklist key {key} is listed more than once")]
    DuplicateKey {
        /// Repeated key.
        key: String,
    },
}

/// Validated, immutable lookup from blacklisted type to policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikidataConnectionBlacklist {
    entries: BTreeMap<WikidataId, BlacklistEntry>,
}

impl WikidataConnectionBlacklist {
    /// Validate a raw table.
    ///
    /// Every key must be a `Q` identifier and every entry must carry a
    /// `:`-terminated prefix and at least one alternate tag under it.
    ///
    /// # Errors
    /// Returns the [`BlacklistError`] for the first entry that breaks a rule.
    ///
    /// # Examples
    /// ```
    /// use wikilink_core::blacklist::{BlacklistEntry, WikidataConnectionBlacklist};
    ///
    /// let entry = BlacklistEntry {
    ///     expected_prefix: "subject:",
    ///     expected_tags: &["subject:wikidata"],
    ///     description: "human",
    /// };
    /// let blacklist = WikidataConnectionBlacklist::from_entries(&[("Q5", entry)])?;
    /// assert_eq!(blacklist.len(), 1);
    ///
    /// assert!(WikidataConnectionBlacklist::from_entries(&[("P31", entry)]).is_err());
    /// # Ok::<(), wikilink_core::blacklist::BlacklistError>(())
    /// ```
    pub fn from_entries(table: &[(&str, BlacklistEntry)]) -> Result<Self, BlacklistError> {
        let mut entries = BTreeMap::new();
        for (key, entry) in table {
            let id = WikidataId::parse(key).map_err(|source| BlacklistError::InvalidKey {
                key: (*key).to_owned(),
                source,
            })?;
            validate_entry(key, entry)?;
            if entries.insert(id, *entry).is_some() {
                return Err(BlacklistError::DuplicateKey {
                    key: (*key).to_owned(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Look up the policy for a type.
    #[must_use]
    pub fn get(&self, type_id: &WikidataId) -> Option<&BlacklistEntry> {
        self.entries.get(type_id)
    }

    /// Iterate over all entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&WikidataId, &BlacklistEntry)> {
        self.entries.iter()
    }

    /// Number of blacklisted types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_entry(key: &str, entry: &BlacklistEntry) -> Result<(), BlacklistError> {
    let prefix = entry.expected_prefix;
    if prefix.len() < 2 || !prefix.ends_with(':') {
        return Err(BlacklistError::MissingPrefix {
            key: key.to_owned(),
        });
    }
    if entry.expected_tags.is_empty() {
        return Err(BlacklistError::MissingExpectedTags {
            key: key.to_owned(),
        });
    }
    if let Some(stray) = entry
        .expected_tags
        .iter()
        .find(|tag| !tag.starts_with(prefix))
    {
        return Err(BlacklistError::TagOutsidePrefix {
            key: key.to_owned(),
            tag: (*stray).to_owned(),
            prefix: prefix.to_owned(),
        });
    }
    Ok(())
}

/// Validate and return the built-in blacklist.
///
/// # Errors
/// Returns [`BlacklistError`] when [`WIKIDATA_CONNECTION_BLACKLIST`] is
/// defective; callers should treat that as fatal at startup.
pub fn wikidata_connection_blacklist() -> Result<WikidataConnectionBlacklist, BlacklistError> {
    WikidataConnectionBlacklist::from_entries(WIKIDATA_CONNECTION_BLACKLIST)
}
