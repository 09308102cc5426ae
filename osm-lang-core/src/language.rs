//! Language tables shared by every attribution decision.
//!
//! The tables are loaded once at startup into a [`LanguageContext`] and passed
//! by reference; nothing here is mutated while entities are processed.

use std::collections::{BTreeMap, BTreeSet};

/// A language plausibly spoken at a point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateLanguage {
    /// Language code, e.g. `en` or `zh`.
    pub lang: String,
    /// Whether the language is a default for the enclosing area.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_default: bool,
}

impl CandidateLanguage {
    /// Construct a candidate.
    ///
    /// # Examples
    /// ```
    /// use osm_lang_core::CandidateLanguage;
    ///
    /// let fr = CandidateLanguage::new("fr", true);
    /// assert!(fr.is_default);
    /// ```
    pub fn new(lang: impl Into<String>, is_default: bool) -> Self {
        Self {
            lang: lang.into(),
            is_default,
        }
    }
}

/// Language declarations of one polygon enclosing a point.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdminLanguageProps {
    /// Administrative rank; `0` is a country, anything higher a subdivision.
    pub admin_level: u32,
    /// Languages declared for the polygon, ranked.
    pub languages: Vec<CandidateLanguage>,
}

impl AdminLanguageProps {
    /// Number of default-flagged languages the polygon declares.
    #[must_use]
    pub fn default_count(&self) -> usize {
        self.languages.iter().filter(|l| l.is_default).count()
    }

    /// Report whether the polygon is a country.
    #[must_use]
    pub const fn is_country(&self) -> bool {
        self.admin_level == 0
    }
}

/// Immutable language tables.
///
/// # Examples
/// ```
/// use osm_lang_core::{CandidateLanguage, LanguageContext};
///
/// let ctx = LanguageContext::new(["en", "fr", "de"])
///     .with_well_represented("en", ["gb", "us"])
///     .with_official_languages("ca", [CandidateLanguage::new("en", true), CandidateLanguage::new("fr", true)]);
///
/// assert!(ctx.is_known("fr"));
/// assert!(!ctx.is_known("xx"));
/// assert!(ctx.is_well_represented("en"));
/// assert!(ctx.is_origin_country("en", "gb"));
/// assert_eq!(ctx.official_languages("ca").len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LanguageContext {
    known_languages: BTreeSet<String>,
    well_represented: BTreeMap<String, BTreeSet<String>>,
    official_languages: BTreeMap<String, Vec<CandidateLanguage>>,
}

impl LanguageContext {
    /// Build a context recognising the given language codes.
    pub fn new<I, S>(known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known_languages: known.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Mark `lang` as well-represented, originating from `countries`.
    #[must_use]
    pub fn with_well_represented<I, S>(mut self, lang: &str, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.well_represented
            .entry(lang.to_owned())
            .or_default()
            .extend(countries.into_iter().map(Into::into));
        self
    }

    /// Record the ranked official languages of `country`.
    #[must_use]
    pub fn with_official_languages<I>(mut self, country: &str, languages: I) -> Self
    where
        I: IntoIterator<Item = CandidateLanguage>,
    {
        self.official_languages
            .insert(country.to_owned(), languages.into_iter().collect());
        self
    }

    /// Report whether `lang` is a recognised language code.
    #[must_use]
    pub fn is_known(&self, lang: &str) -> bool {
        self.known_languages.contains(lang)
    }

    /// Report whether `lang` already has abundant training data.
    #[must_use]
    pub fn is_well_represented(&self, lang: &str) -> bool {
        self.well_represented.contains_key(lang)
    }

    /// Report whether `country` is an origin country of well-represented `lang`.
    #[must_use]
    pub fn is_origin_country(&self, lang: &str, country: &str) -> bool {
        self.well_represented
            .get(lang)
            .is_some_and(|countries| countries.contains(country))
    }

    /// Ranked official languages of `country`; empty when unknown.
    #[must_use]
    pub fn official_languages(&self, country: &str) -> &[CandidateLanguage] {
        self.official_languages
            .get(country)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of recognised language codes.
    #[must_use]
    pub fn known_count(&self) -> usize {
        self.known_languages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unknown_country_has_no_official_languages() {
        let ctx = LanguageContext::new(["en"]);
        assert!(ctx.official_languages("zz").is_empty());
        assert!(!ctx.is_origin_country("en", "gb"));
    }

    #[rstest]
    fn default_count_ignores_secondary_languages() {
        let props = AdminLanguageProps {
            admin_level: 4,
            languages: vec![
                CandidateLanguage::new("ca", true),
                CandidateLanguage::new("es", false),
            ],
        };
        assert_eq!(props.default_count(), 1);
        assert!(!props.is_country());
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn context_deserialises_from_json() {
        let ctx: LanguageContext = serde_json::from_value(serde_json::json!({
            "known_languages": ["en", "fr"],
            "well_represented": { "en": ["gb", "us"] },
            "official_languages": { "ca": [{ "lang": "en", "is_default": true }, { "lang": "fr" }] }
        }))
        .expect("deserialise context");

        assert_eq!(ctx.known_count(), 2);
        assert!(ctx.is_origin_country("en", "us"));
        assert_eq!(
            ctx.official_languages("ca"),
            [CandidateLanguage::new("en", true), CandidateLanguage::new("fr", false)]
        );
    }
}
