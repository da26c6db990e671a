//! Country to language mapping.
//!
//! Relates an old-style `wikipedia:LANG` key to the countries where `LANG`
//! is an official or majority language.

use std::collections::BTreeSet;

use crate::WikidataId;

/// Source of country language data.
pub trait CountryLanguages {
    /// Every country the mapping knows about.
    fn countries(&self) -> Vec<WikidataId>;

    /// Wikipedia language codes used in `country`.
    fn languages_of_country(&self, country: &WikidataId) -> BTreeSet<String>;
}

/// Countries and their Wikipedia language codes.
const COUNTRY_LANGUAGES: &[(&str, &[&str])] = &[
    ("Q16", &["en", "fr"]),             // Canada
    ("Q17", &["ja"]),                   // Japan
    ("Q20", &["no", "nn"]),             // Norway
    ("Q27", &["en", "ga"]),             // Ireland
    ("Q28", &["hu"]),                   // Hungary
    ("Q29", &["es"]),                   // Spain
    ("Q30", &["en"]),                   // United States of America
    ("Q31", &["nl", "fr", "de"]),       // Belgium
    ("Q32", &["lb", "fr", "de"]),       // Luxembourg
    ("Q33", &["fi", "sv"]),             // Finland
    ("Q34", &["sv"]),                   // Sweden
    ("Q35", &["da"]),                   // Denmark
    ("Q36", &["pl"]),                   // Poland
    ("Q37", &["lt"]),                   // Lithuania
    ("Q38", &["it"]),                   // Italy
    ("Q39", &["de", "fr", "it", "rm"]), // Switzerland
    ("Q40", &["de"]),                   // Austria
    ("Q41", &["el"]),                   // Greece
    ("Q45", &["pt"]),                   // Portugal
    ("Q55", &["nl"]),                   // Netherlands
    ("Q96", &["es"]),                   // Mexico
    ("Q142", &["fr"]),                  // France
    ("Q145", &["en"]),                  // United Kingdom
    ("Q148", &["zh"]),                  // People's Republic of China
    ("Q155", &["pt"]),                  // Brazil
    ("Q159", &["ru"]),                  // Russia
    ("Q183", &["de"]),                  // Germany
    ("Q189", &["is"]),                  // Iceland
    ("Q191", &["et"]),                  // Estonia
    ("Q211", &["lv"]),                  // Latvia
    ("Q212", &["uk"]),                  // Ukraine
    ("Q213", &["cs"]),                  // Czech Republic
    ("Q214", &["sk"]),                  // Slovakia
    ("Q215", &["sl"]),                  // Slovenia
    ("Q218", &["ro"]),                  // Romania
    ("Q219", &["bg"]),                  // Bulgaria
    ("Q224", &["hr"]),                  // Croatia
    ("Q403", &["sr"]),                  // Serbia
    ("Q408", &["en"]),                  // Australia
    ("Q414", &["es"]),                  // Argentina
    ("Q664", &["en", "mi"]),            // New Zealand
    ("Q668", &["hi", "en"]),            // India
    ("Q884", &["ko"]),                  // South Korea
];

/// Mapping compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCountryLanguages;

impl CountryLanguages for BuiltinCountryLanguages {
    fn countries(&self) -> Vec<WikidataId> {
        COUNTRY_LANGUAGES
            .iter()
            .filter_map(|(country, _)| WikidataId::parse(country).ok())
            .collect()
    }

    fn languages_of_country(&self, country: &WikidataId) -> BTreeSet<String> {
        COUNTRY_LANGUAGES
            .iter()
            .find(|(id, _)| *id == country.as_str())
            .map(|(_, languages)| languages.iter().map(|code| (*code).to_owned()).collect())
            .unwrap_or_default()
    }
}

/// Invert a [`CountryLanguages`] mapping: every country using `language_code`.
#[must_use]
pub fn countries_with_language<C>(mapping: &C, language_code: &str) -> BTreeSet<WikidataId>
where
    C: CountryLanguages + ?Sized,
{
    mapping
        .countries()
        .into_iter()
        .filter(|country| {
            mapping
                .languages_of_country(country)
                .contains(language_code)
        })
        .collect()
}
