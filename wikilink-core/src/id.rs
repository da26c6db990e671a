//! Validated Wikidata entity identifiers.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Identifier of a Wikidata item, e.g. `Q64`.
///
/// The type only guarantees the `Q<digits>` shape. Whether the entity exists
/// is decided by a later lookup against a
/// [`KnowledgeBase`](crate::KnowledgeBase).
///
/// # Examples
/// ```
/// use wikilink_core::WikidataId;
///
/// let id = WikidataId::parse("Q36")?;
/// assert_eq!(id.as_str(), "Q36");
/// assert_eq!(id.number(), Some(36));
/// # Ok::<(), wikilink_core::WikidataIdError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct WikidataId(String);

/// Reasons a string cannot be used as a [`WikidataId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WikidataIdError {
    /// The value was empty.
    #[error("wikidata identifier is empty")]
    Empty,
    /// The value did not start with an upper-case `Q`.
    #[error("wikidata identifier {value:?} does not start with 'Q'")]
    MissingPrefix {
        /// Offending input.
        value: String,
    },
    /// The characters after `Q` were missing or not all ASCII digits.
    #[error("wikidata identifier {value:?} must be 'Q' followed by digits only")]
    InvalidDigits {
        /// Offending input.
        value: String,
    },
}

impl WikidataId {
    /// Parse a strict `Q<digits>` identifier.
    ///
    /// Surrounding whitespace, lower-case prefixes and URL forms are all
    /// rejected: tag values must carry the bare identifier.
    ///
    /// # Errors
    /// Returns a [`WikidataIdError`] naming the first rule `value` breaks.
    pub fn parse(value: &str) -> Result<Self, WikidataIdError> {
        if value.is_empty() {
            return Err(WikidataIdError::Empty);
        }
        let Some(digits) = value.strip_prefix('Q') else {
            return Err(WikidataIdError::MissingPrefix {
                value: value.to_owned(),
            });
        };
        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(WikidataIdError::InvalidDigits {
                value: value.to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The digit run after the `Q` prefix.
    #[must_use]
    pub fn digits(&self) -> &str {
        self.0.strip_prefix('Q').unwrap_or_default()
    }

    /// Numeric part of the identifier, or `None` when it overflows `u64`.
    #[must_use]
    pub fn number(&self) -> Option<u64> {
        self.digits().parse().ok()
    }
}

impl fmt::Display for WikidataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for WikidataId {
    type Err = WikidataIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WikidataId {
    type Error = WikidataIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WikidataId> for String {
    fn from(id: WikidataId) -> Self {
        id.0
    }
}

impl AsRef<str> for WikidataId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
