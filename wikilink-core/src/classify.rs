//! Decide whether an entity may be the primary subject of a feature.

use crate::{
    IssueKind, IssueReport, TypeAncestry, WikidataId,
    blacklist::{BlacklistEntry, WikidataConnectionBlacklist},
};

/// Supertypes that are normal targets of a feature's own `wikidata` tag.
///
/// Only consulted by diagnostics: an entity outside every one of these is
/// not wrong, merely unfamiliar.
pub const KNOWN_SAFE_TYPES: &[&str] = &[
    "Q2221906",  // geographic location
    "Q17334923", // location
    "Q618123",   // geographical feature
    "Q811979",   // architectural structure
    "Q41176",    // building
    "Q13226383", // facility
    "Q486972",   // human settlement
    "Q56061",    // administrative territorial entity
    "Q43229",    // organization
    "Q4989906",  // monument
    "Q33506",    // museum
    "Q22698",    // park
    "Q12280",    // bridge
    "Q34442",    // road
    "Q15324",    // body of water
    "Q8502",     // mountain
    "Q55488",    // railway station
    "Q1248784",  // airport
    "Q3914",     // school
    "Q16917",    // hospital
    "Q16970",    // church building
    "Q2319498",  // landmark
];

/// A blacklisted ancestor together with its policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlacklistMatch<'a> {
    /// The ancestor type that matched.
    pub type_id: &'a WikidataId,
    /// Policy for that type.
    pub entry: &'a BlacklistEntry,
}

/// Find a blacklisted type among `ancestry`.
///
/// Any single match is enough to prove the verdict. When several ancestors
/// match, the lowest identifier in [`TypeAncestry`] order wins.
#[must_use]
pub fn find_blacklisted_type<'a>(
    ancestry: &'a TypeAncestry,
    blacklist: &'a WikidataConnectionBlacklist,
) -> Option<BlacklistMatch<'a>> {
    ancestry.iter().find_map(|type_id| {
        blacklist
            .get(type_id)
            .map(|entry| BlacklistMatch { type_id, entry })
    })
}

/// Report whether any ancestor is on the [`KNOWN_SAFE_TYPES`] list.
#[must_use]
pub fn has_known_safe_type(ancestry: &TypeAncestry) -> bool {
    ancestry
        .iter()
        .any(|type_id| KNOWN_SAFE_TYPES.contains(&type_id.as_str()))
}

/// Build the finding for an entity that belongs in a secondary tag.
#[must_use]
pub fn secondary_tag_report(wikidata_id: &WikidataId, found: BlacklistMatch<'_>) -> IssueReport {
    let BlacklistMatch { type_id, entry } = found;
    let message = format!(
        "{wikidata_id} is a {description} ({type_id}), which cannot be the object itself; \
         link it through {prefix} tags such as {tags} instead",
        description = entry.description,
        prefix = entry.expected_prefix,
        tags = entry.expected_tags.join(" or "),
    );
    IssueReport::critical(IssueKind::SecondaryTagExpected, message)
        .with_prerequisite("wikidata", Some(wikidata_id.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blacklist::wikidata_connection_blacklist;
    use rstest::{fixture, rstest};

    fn ancestry(ids: &[&str]) -> TypeAncestry {
        ids.iter()
            .map(|raw| WikidataId::parse(raw).expect("fixture identifier"))
            .collect()
    }

    #[fixture]
    fn blacklist() -> WikidataConnectionBlacklist {
        wikidata_connection_blacklist().expect("built-in blacklist")
    }

    #[rstest]
    fn matches_blacklisted_ancestor(blacklist: WikidataConnectionBlacklist) {
        let types = ancestry(&["Q16521", "Q35120"]);
        let found = find_blacklisted_type(&types, &blacklist).expect("taxon is blacklisted");
        assert_eq!(found.type_id.as_str(), "Q16521");
        assert_eq!(found.entry.expected_prefix, "species:");
    }

    #[rstest]
    fn lowest_identifier_wins_between_matches(blacklist: WikidataConnectionBlacklist) {
        let types = ancestry(&["Q729", "Q16521"]);
        let found = find_blacklisted_type(&types, &blacklist).expect("both are blacklisted");
        assert_eq!(found.type_id.as_str(), "Q16521");
    }

    #[rstest]
    fn accepts_places(blacklist: WikidataConnectionBlacklist) {
        let types = ancestry(&["Q486972", "Q2221906"]);
        assert_eq!(find_blacklisted_type(&types, &blacklist), None);
        assert!(has_known_safe_type(&types));
    }

    #[rstest]
    fn unknown_types_are_not_safe() {
        assert!(!has_known_safe_type(&ancestry(&["Q12345"])));
        assert!(!has_known_safe_type(&TypeAncestry::default()));
    }

    #[rstest]
    fn report_names_expected_tags(blacklist: WikidataConnectionBlacklist) {
        let types = ancestry(&["Q5"]);
        let found = find_blacklisted_type(&types, &blacklist).expect("human is blacklisted");
        let id = WikidataId::parse("Q1067").expect("fixture identifier");
        let report = secondary_tag_report(&id, found);
        assert_eq!(report.kind, IssueKind::SecondaryTagExpected);
        assert!(report.message.contains("subject:wikidata"));
        assert!(report.message.contains("Q1067"));
    }
}
