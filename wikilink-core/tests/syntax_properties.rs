//! Property tests for the tag syntax validator.

use proptest::prelude::*;
use wikilink_core::{
    GeometryKind, IssueKind, TagSet, WikimediaLinkIssueDetector,
    syntax::{
        check_is_it_valid_key_for_old_style_wikipedia_tag, is_wikidata_id_malformed,
        is_wikipedia_tag_clearly_broken,
    },
    test_support::StubKnowledgeBase,
};

proptest! {
    #[test]
    fn arbitrary_strings_are_classified_consistently(value in ".*") {
        if !is_wikidata_id_malformed(&value) {
            prop_assert!(value.starts_with('Q'));
        }
        if !is_wikipedia_tag_clearly_broken(&value) {
            prop_assert!(value.contains(':'));
        }
        if check_is_it_valid_key_for_old_style_wikipedia_tag(&value) {
            prop_assert!(value.starts_with("wikipedia:"));
        }
    }

    #[test]
    fn prefixed_digit_runs_are_well_formed(digits in "[0-9]{1,60}") {
        let id = format!("Q{digits}");
        prop_assert!(!is_wikidata_id_malformed(&id));
    }

    #[test]
    fn trailing_noise_is_malformed(digits in "[0-9]{1,12}", noise in "[^0-9]{1,4}") {
        let id = format!("Q{digits}{noise}");
        prop_assert!(is_wikidata_id_malformed(&id));
    }

    #[test]
    fn long_digit_runs_are_reported(digits in "[1-9][0-9]{12,60}") {
        let detector = WikimediaLinkIssueDetector::new(StubKnowledgeBase::new())
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let tags = TagSet::from([("wikidata", format!("Q{digits}"))]);
        let report = detector.critical_structural_issue_report(GeometryKind::Node, &tags);
        let kind = report.map(|found| found.kind);
        prop_assert_eq!(kind, Some(IssueKind::ImplausibleWikidata));
    }

    #[test]
    fn empty_wikidata_is_always_reported(name in "[a-zA-Z ]{0,20}") {
        let detector = WikimediaLinkIssueDetector::new(StubKnowledgeBase::new())
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let tags = TagSet::from([("wikidata", String::new()), ("name", name)]);
        let report = detector.critical_structural_issue_report(GeometryKind::Way, &tags);
        prop_assert!(report.is_some());
    }

    #[test]
    fn tag_sets_without_wikimedia_keys_are_accepted(name in "[a-zA-Z ]{0,20}") {
        let detector = WikimediaLinkIssueDetector::new(StubKnowledgeBase::new())
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let tags = TagSet::from([("name", name)]);
        let report = detector.critical_structural_issue_report(GeometryKind::Node, &tags);
        prop_assert!(report.is_none());
    }
}
