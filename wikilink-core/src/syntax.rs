//! Local checks on the shape of `wikidata` and `wikipedia` tags.
//!
//! Everything here is computed from the strings alone. Nothing consults the
//! knowledge base, so these checks run first and short-circuit the more
//! expensive classification.

use crate::{IssueKind, IssueReport, TagSet, WikidataId, language::is_wikipedia_language_code};

/// Prefix shared by every old-style `wikipedia:LANG` key.
pub const OLD_STYLE_WIKIPEDIA_PREFIX: &str = "wikipedia:";

/// Highest entity number treated as resolvable.
///
/// Wikidata allocates item numbers sequentially; anything above this bound
/// is far past the allocated range.
pub const MAX_PLAUSIBLE_ENTITY_NUMBER: u64 = 1_000_000_000;

/// Report whether a `wikidata` value is not a bare `Q<digits>` identifier.
///
/// Empty values, wrong prefixes and trailing noise such as `Q81927)` are
/// malformed. A long digit run is still well-formed; see
/// [`is_wikidata_id_implausible`] for that condition.
///
/// # Examples
/// ```
/// use wikilink_core::syntax::is_wikidata_id_malformed;
///
/// assert!(is_wikidata_id_malformed(""));
/// assert!(is_wikidata_id_malformed("Q81927)"));
/// assert!(!is_wikidata_id_malformed("Q812843783738234723482347238272487927"));
/// ```
#[must_use]
pub fn is_wikidata_id_malformed(value: &str) -> bool {
    WikidataId::parse(value).is_err()
}

/// Report whether a well-formed identifier cannot name a real entity.
///
/// Leading zeros, `Q0` and numbers above [`MAX_PLAUSIBLE_ENTITY_NUMBER`]
/// never occur on Wikidata.
#[must_use]
pub fn is_wikidata_id_implausible(id: &WikidataId) -> bool {
    if id.digits().starts_with('0') {
        return true;
    }
    id.number()
        .is_none_or(|number| number > MAX_PLAUSIBLE_ENTITY_NUMBER)
}

/// Split a `lang:Title` value into its language and title.
///
/// Returns `None` when there is no `:` separator. The language is not
/// validated.
#[must_use]
pub fn split_wikipedia_tag(value: &str) -> Option<(&str, &str)> {
    value.split_once(':')
}

/// Report whether a `wikipedia` value is clearly not a `lang:Title` pair.
///
/// # Examples
/// ```
/// use wikilink_core::syntax::is_wikipedia_tag_clearly_broken;
///
/// assert!(is_wikipedia_tag_clearly_broken("pl"));
/// assert!(is_wikipedia_tag_clearly_broken("polski:Smok"));
/// assert!(!is_wikipedia_tag_clearly_broken("pl:smok"));
/// ```
#[must_use]
pub fn is_wikipedia_tag_clearly_broken(value: &str) -> bool {
    match split_wikipedia_tag(value) {
        None => true,
        Some((language, _)) => !is_wikipedia_language_code(language),
    }
}

/// Language carried by an old-style `wikipedia:LANG` key, if the key has
/// that shape. The language itself is not validated.
#[must_use]
pub fn old_style_wikipedia_language(key: &str) -> Option<&str> {
    key.strip_prefix(OLD_STYLE_WIKIPEDIA_PREFIX)
}

/// Report whether `key` is `wikipedia:` followed by a known language code.
///
/// # Examples
/// ```
/// use wikilink_core::syntax::check_is_it_valid_key_for_old_style_wikipedia_tag;
///
/// assert!(check_is_it_valid_key_for_old_style_wikipedia_tag("wikipedia:pl"));
/// assert!(!check_is_it_valid_key_for_old_style_wikipedia_tag("wikipedia:fixme"));
/// assert!(!check_is_it_valid_key_for_old_style_wikipedia_tag("wikipedia"));
/// ```
#[must_use]
pub fn check_is_it_valid_key_for_old_style_wikipedia_tag(key: &str) -> bool {
    old_style_wikipedia_language(key).is_some_and(is_wikipedia_language_code)
}

/// Find the first old-style `wikipedia:*` key in `tags` whose suffix is not
/// a language code.
///
/// `tags_for_main_object` supplies the context recorded in the report: the
/// main `wikipedia` and `wikidata` values the finding was made against.
/// Usually both arguments are the same tag set.
#[must_use]
pub fn check_is_invalid_old_style_wikipedia_tag_present(
    tags: &TagSet,
    tags_for_main_object: &TagSet,
) -> Option<IssueReport> {
    let (key, value) = tags.iter().find(|(key, _)| {
        old_style_wikipedia_language(key).is_some()
            && !check_is_it_valid_key_for_old_style_wikipedia_tag(key)
    })?;
    let suffix = old_style_wikipedia_language(key).unwrap_or_default();
    let context = tags_for_main_object
        .get("wikipedia")
        .map_or_else(String::new, |main| {
            format!(" (the object already has wikipedia={main})")
        });
    let message = format!(
        "{key}={value} is not a valid old-style wikipedia tag: \"{suffix}\" is not a Wikipedia language code{context}"
    );
    Some(
        IssueReport::critical(IssueKind::InvalidOldStyleWikipediaKey, message)
            .with_prerequisite(key, Some(value))
            .with_prerequisite("wikipedia", tags_for_main_object.get("wikipedia"))
            .with_prerequisite("wikidata", tags_for_main_object.get("wikidata")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Q0", true)]
    #[case("Q036", true)]
    #[case("Q1000000001", true)]
    #[case("Q812843783738234723482347238272487927", true)]
    #[case("Q1", false)]
    #[case("Q31487", false)]
    #[case("Q1000000000", false)]
    fn flags_implausible_identifiers(#[case] raw: &str, #[case] expected: bool) {
        let id = WikidataId::parse(raw).expect("well-formed fixture");
        assert_eq!(is_wikidata_id_implausible(&id), expected);
    }

    #[rstest]
    #[case("en:Oslo", false)]
    #[case("pl:Kościół Najświętszego Serca Pana Jezusa", false)]
    #[case("de:Berlin: Mitte", false)]
    #[case("pl", true)]
    #[case(":Oslo", true)]
    #[case("https://en.wikipedia.org/wiki/Oslo", true)]
    #[case("English:Oslo", true)]
    fn detects_broken_wikipedia_values(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_wikipedia_tag_clearly_broken(value), expected);
    }

    #[rstest]
    fn accepts_valid_old_style_keys() {
        let tags = TagSet::from([("wikipedia:pl", "Kościół Najświętszego Serca Pana Jezusa")]);
        assert_eq!(
            check_is_invalid_old_style_wikipedia_tag_present(&tags, &tags),
            None
        );
    }

    #[rstest]
    fn ignores_tag_sets_without_old_style_keys() {
        let tags = TagSet::from([("wikipedia", "en:Oslo"), ("wikidata", "Q585")]);
        assert_eq!(
            check_is_invalid_old_style_wikipedia_tag_present(&tags, &tags),
            None
        );
    }

    #[rstest]
    fn reports_invalid_old_style_key() {
        let tags = TagSet::from([("wikipedia:fixme", "Kościół Najświętszego Serca Pana Jezusa")]);
        let report = check_is_invalid_old_style_wikipedia_tag_present(&tags, &tags)
            .expect("fixme is not a language");
        assert_eq!(report.kind, IssueKind::InvalidOldStyleWikipediaKey);
        assert!(report.message.contains("wikipedia:fixme"));
        assert_eq!(report.prerequisite.get("wikipedia"), Some(&None));
    }

    #[rstest]
    fn mentions_main_wikipedia_tag_from_context() {
        let tags = TagSet::from([("wikipedia:polski", "Smok")]);
        let main = TagSet::from([("wikipedia", "pl:Smok wawelski")]);
        let report = check_is_invalid_old_style_wikipedia_tag_present(&tags, &main)
            .expect("polski is not a language code");
        assert!(report.message.contains("wikipedia=pl:Smok wawelski"));
        assert_eq!(
            report.prerequisite.get("wikipedia"),
            Some(&Some("pl:Smok wawelski".to_owned()))
        );
    }
}
