//! Findings produced by the issue detector.

use std::{collections::BTreeMap, fmt};

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Severity {
    /// The linkage is structurally wrong and should be fixed.
    CriticalStructural,
    /// Worth a look, but not provably wrong.
    Informational,
}

/// Category of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IssueKind {
    /// `wikidata` is empty or not `Q<digits>`.
    MalformedWikidata,
    /// `wikidata` has the right shape but cannot name a real entity.
    ImplausibleWikidata,
    /// `wikipedia` is not a `lang:Title` pair with a known language.
    BrokenWikipedia,
    /// A `wikipedia:LANG` key uses something other than a language code.
    InvalidOldStyleWikipediaKey,
    /// The linked entity belongs in a secondary tag such as `subject:wikidata`.
    SecondaryTagExpected,
    /// The linked entity could not be found in the knowledge base.
    UnresolvedWikidata,
    /// The linked entity is stored far away from the feature.
    DistantWikidataLocation,
}

impl IssueKind {
    /// Stable identifier for grouping findings across runs.
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::MalformedWikidata => "malformed wikidata tag",
            Self::ImplausibleWikidata => "implausible wikidata id",
            Self::BrokenWikipedia => "malformed wikipedia tag",
            Self::InvalidOldStyleWikipediaKey => "invalid old-style wikipedia tag",
            Self::SecondaryTagExpected => "should use a secondary wikipedia tag",
            Self::UnresolvedWikidata => "wikidata entry not found",
            Self::DistantWikidataLocation => "wikidata location far from object",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// A single finding about how a feature links to Wikipedia or Wikidata.
///
/// `prerequisite` records the tag values the finding was derived from, with
/// `None` marking a tag that had to be absent. A consumer holding a newer
/// version of the feature can compare these to decide whether the report is
/// stale.
///
/// # Examples
/// ```
/// use wikilink_core::{IssueKind, IssueReport, Severity};
///
/// let report = IssueReport::critical(IssueKind::MalformedWikidata, "wikidata tag is empty")
///     .with_prerequisite("wikidata", Some(""));
/// assert_eq!(report.severity, Severity::CriticalStructural);
/// assert!(report.is_critical());
/// assert_eq!(report.prerequisite.get("wikidata"), Some(&Some(String::new())));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IssueReport {
    /// Category of the finding.
    pub kind: IssueKind,
    /// Severity of the finding.
    pub severity: Severity,
    /// Human-readable explanation.
    pub message: String,
    /// Tag values the finding depends on.
    #[cfg_attr(feature = "serde", serde(default))]
    pub prerequisite: BTreeMap<String, Option<String>>,
}

impl IssueReport {
    /// Build a critical structural finding.
    #[must_use]
    pub fn critical(kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::CriticalStructural, message)
    }

    /// Build an informational finding.
    #[must_use]
    pub fn informational(kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Informational, message)
    }

    fn new(kind: IssueKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            prerequisite: BTreeMap::new(),
        }
    }

    /// Record a tag value the finding depends on.
    #[must_use]
    pub fn with_prerequisite(mut self, key: impl Into<String>, value: Option<&str>) -> Self {
        self.prerequisite
            .insert(key.into(), value.map(str::to_owned));
        self
    }

    /// Report whether this is a critical structural finding.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::CriticalStructural
    }
}

impl fmt::Display for IssueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
