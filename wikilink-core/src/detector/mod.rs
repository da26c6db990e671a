//! Issue detection for one OSM feature at a time.
//!
//! [`WikimediaLinkIssueDetector`] runs the cheap local syntax checks first and
//! only consults the [`KnowledgeBase`] once the tags are well-formed. Lookup
//! failures never become findings: a verdict that cannot be proven is
//! reported as absent and logged.

mod diagnostics;

use std::collections::BTreeSet;

use geo::Coord;
use log::warn;

use crate::{
    DetectorConfig, GeometryKind, IssueKind, IssueReport, KnowledgeBase, TagSet, TypeAncestry,
    WikidataId,
    blacklist::{BlacklistError, WikidataConnectionBlacklist, wikidata_connection_blacklist},
    classify::{find_blacklisted_type, secondary_tag_report},
    countries::{BuiltinCountryLanguages, CountryLanguages, countries_with_language},
    distance::{describe_distance, distance_in_metres},
    syntax::{
        check_is_invalid_old_style_wikipedia_tag_present, is_wikidata_id_implausible,
        is_wikipedia_tag_clearly_broken,
    },
};

const WIKIDATA_KEY: &str = "wikidata";
const WIKIPEDIA_KEY: &str = "wikipedia";

/// Detects structural problems in a feature's Wikipedia and Wikidata tags.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wikilink_core::{
///     GeometryKind, KnowledgeBase, LookupError, TagSet, TypeAncestry, WikidataId,
///     WikimediaLinkIssueDetector,
/// };
///
/// struct Offline;
///
/// impl KnowledgeBase for Offline {
///     fn resolve_type_ancestry(&self, id: &WikidataId) -> Result<TypeAncestry, LookupError> {
///         Err(LookupError::NotFound { id: id.clone() })
///     }
///
///     fn resolve_coordinate(&self, id: &WikidataId) -> Result<Option<Coord<f64>>, LookupError> {
///         Err(LookupError::NotFound { id: id.clone() })
///     }
/// }
///
/// let detector = WikimediaLinkIssueDetector::new(Offline)?;
/// let tags = TagSet::from([("wikidata", ""), ("wikipedia", "en:Oslo")]);
/// assert!(detector.critical_structural_issue_report(GeometryKind::Node, &tags).is_some());
/// # Ok::<(), wikilink_core::blacklist::BlacklistError>(())
/// ```
#[derive(Debug)]
pub struct WikimediaLinkIssueDetector<K, C = BuiltinCountryLanguages> {
    knowledge_base: K,
    countries: C,
    blacklist: WikidataConnectionBlacklist,
    config: DetectorConfig,
}

impl<K> WikimediaLinkIssueDetector<K, BuiltinCountryLanguages>
where
    K: KnowledgeBase,
{
    /// Build a detector with the built-in country mapping and default config.
    ///
    /// # Errors
    /// Returns [`BlacklistError`] when the built-in blacklist is defective.
    pub fn new(knowledge_base: K) -> Result<Self, BlacklistError> {
        Self::with_parts(
            knowledge_base,
            BuiltinCountryLanguages,
            DetectorConfig::default(),
        )
    }
}

impl<K, C> WikimediaLinkIssueDetector<K, C>
where
    K: KnowledgeBase,
    C: CountryLanguages,
{
    /// Build a detector from explicit collaborators.
    ///
    /// The blacklist is validated here, once, so a defective table stops the
    /// process at startup rather than on the first feature.
    ///
    /// # Errors
    /// Returns [`BlacklistError`] when the built-in blacklist is defective.
    pub fn with_parts(
        knowledge_base: K,
        countries: C,
        config: DetectorConfig,
    ) -> Result<Self, BlacklistError> {
        Ok(Self {
            knowledge_base,
            countries,
            blacklist: wikidata_connection_blacklist()?,
            config,
        })
    }

    /// The validated blacklist in use.
    pub const fn wikidata_connection_blacklist(&self) -> &WikidataConnectionBlacklist {
        &self.blacklist
    }

    /// The active configuration.
    pub const fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Return the first critical structural problem with the feature's links.
    ///
    /// Checks run in order and stop at the first finding:
    /// 1. `wikidata` is empty or not `Q<digits>`;
    /// 2. `wikidata` is well-formed but implausible;
    /// 3. `wikipedia` is not a `lang:Title` pair;
    /// 4. an old-style `wikipedia:LANG` key has no language code;
    /// 5. the `wikidata` entity belongs in a secondary tag.
    ///
    /// A missing `wikidata` tag is not itself a problem.
    pub fn critical_structural_issue_report(
        &self,
        geometry: GeometryKind,
        tags: &TagSet,
    ) -> Option<IssueReport> {
        let wikidata = match tags.get(WIKIDATA_KEY) {
            Some(raw) => match WikidataId::parse(raw) {
                Ok(id) => Some(id),
                Err(_) => return Some(malformed_wikidata_report(geometry, raw)),
            },
            None => None,
        };
        if let Some(id) = wikidata
            .as_ref()
            .filter(|id| is_wikidata_id_implausible(id))
        {
            return Some(implausible_wikidata_report(geometry, id));
        }
        if let Some(value) = tags
            .get(WIKIPEDIA_KEY)
            .filter(|value| is_wikipedia_tag_clearly_broken(value))
        {
            return Some(broken_wikipedia_report(geometry, value));
        }
        if let Some(report) = check_is_invalid_old_style_wikipedia_tag_present(tags, tags) {
            return Some(report);
        }
        let report = self.secondary_tag_verdict(wikidata.as_ref()?)?;
        Some(report.with_prerequisite(WIKIPEDIA_KEY, tags.get(WIKIPEDIA_KEY)))
    }

    /// Report when `wikidata_id` names something that cannot be the feature
    /// itself, such as an animal species or a person.
    ///
    /// Malformed identifiers and failed lookups yield `None`: an issue is only
    /// reported when the ancestry proving it was obtained.
    pub fn get_error_report_if_secondary_wikipedia_tag_should_be_used(
        &self,
        wikidata_id: &str,
    ) -> Option<IssueReport> {
        let id = WikidataId::parse(wikidata_id).ok()?;
        self.secondary_tag_verdict(&id)
    }

    fn secondary_tag_verdict(&self, id: &WikidataId) -> Option<IssueReport> {
        let ancestry = self.ancestry_or_log(id)?;
        find_blacklisted_type(&ancestry, &self.blacklist)
            .map(|found| secondary_tag_report(id, found))
    }

    /// Findings worth showing but not provably wrong.
    ///
    /// Reports a `wikidata` entry missing from the knowledge base, or one
    /// stored further than [`DetectorConfig::distance_warning_km`] from
    /// `location`.
    pub fn informational_issue_report(
        &self,
        geometry: GeometryKind,
        tags: &TagSet,
        location: Option<Coord<f64>>,
    ) -> Option<IssueReport> {
        let raw = tags.get(WIKIDATA_KEY)?;
        let id = WikidataId::parse(raw).ok()?;
        if is_wikidata_id_implausible(&id) {
            return None;
        }
        let entity_location = match self.knowledge_base.resolve_coordinate(&id) {
            Ok(found) => found,
            Err(err) if err.is_not_found() => {
                return Some(
                    IssueReport::informational(
                        IssueKind::UnresolvedWikidata,
                        format!("{geometry} links to {id}, which the knowledge base does not know"),
                    )
                    .with_prerequisite(WIKIDATA_KEY, Some(raw)),
                );
            }
            Err(err) => {
                warn!("could not verify location of {id}: {err}");
                return None;
            }
        };
        let (from, to) = (location?, entity_location?);
        self.is_beyond_warning_distance(from, to).then(|| {
            IssueReport::informational(
                IssueKind::DistantWikidataLocation,
                format!(
                    "{geometry} tagged wikidata={id}: {}",
                    describe_distance(Some(from), Some(to), &id)
                ),
            )
            .with_prerequisite(WIKIDATA_KEY, Some(raw))
        })
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "threshold is configured in kilometres"
    )]
    fn is_beyond_warning_distance(&self, from: Coord<f64>, to: Coord<f64>) -> bool {
        distance_in_metres(from, to) > self.config.distance_warning_km * 1_000.0
    }

    /// Describe how far the entity lies from `location`.
    ///
    /// Never fails: missing coordinates on either side, malformed identifiers
    /// and lookup failures all produce explanatory text.
    pub fn get_distance_description_between_location_and_wikidata_id(
        &self,
        location: Option<Coord<f64>>,
        wikidata_id: &str,
    ) -> String {
        let Ok(id) = WikidataId::parse(wikidata_id) else {
            return format!("{wikidata_id:?} is not a wikidata identifier, so no distance is known");
        };
        match self.knowledge_base.resolve_coordinate(&id) {
            Ok(entity) => describe_distance(location, entity, &id),
            Err(err) => {
                warn!("could not resolve location of {id}: {err}");
                format!("location of wikidata entry {id} could not be looked up")
            }
        }
    }

    /// Every country whose official or majority language is `language_code`.
    pub fn wikidata_ids_of_countries_with_language(
        &self,
        language_code: &str,
    ) -> BTreeSet<WikidataId> {
        countries_with_language(&self.countries, language_code)
    }

    fn ancestry_or_log(&self, id: &WikidataId) -> Option<TypeAncestry> {
        match self.knowledge_base.resolve_type_ancestry(id) {
            Ok(ancestry) => Some(ancestry),
            Err(err) => {
                warn!("type ancestry of {id} is unknown: {err}");
                None
            }
        }
    }
}

fn malformed_wikidata_report(geometry: GeometryKind, raw: &str) -> IssueReport {
    let message = if raw.is_empty() {
        format!("{geometry} has an empty wikidata tag")
    } else {
        format!("{geometry} has wikidata={raw}, which is not of the form Q followed by digits")
    };
    IssueReport::critical(IssueKind::MalformedWikidata, message)
        .with_prerequisite(WIKIDATA_KEY, Some(raw))
}

fn implausible_wikidata_report(geometry: GeometryKind, id: &WikidataId) -> IssueReport {
    IssueReport::critical(
        IssueKind::ImplausibleWikidata,
        format!("{geometry} has wikidata={id}, which cannot refer to an existing Wikidata entry"),
    )
    .with_prerequisite(WIKIDATA_KEY, Some(id.as_str()))
}

fn broken_wikipedia_report(geometry: GeometryKind, value: &str) -> IssueReport {
    IssueReport::critical(
        IssueKind::BrokenWikipedia,
        format!(
            "{geometry} has wikipedia={value}, expected a language code and article title such as en:Oslo"
        ),
    )
    .with_prerequisite(WIKIPEDIA_KEY, Some(value))
}
