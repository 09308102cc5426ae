//! Seams to the geo index, the disambiguator and the address formatter.
//!
//! The attribution engine only sees these traits; concrete implementations
//! live in `osm-lang-data` and in [`crate::test_support`].

use crate::coordinate::Coordinate;
use crate::language::{AdminLanguageProps, CandidateLanguage};
use crate::tags::Tags;

/// Result of a point lookup against the region index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoMatch {
    /// Lowercase country code of the enclosing country.
    pub country: String,
    /// Ranked candidate languages for the point.
    pub candidates: Vec<CandidateLanguage>,
    /// One entry per enclosing polygon.
    pub admin_languages: Vec<AdminLanguageProps>,
}

impl GeoMatch {
    /// Languages declared by the enclosing country polygon(s).
    pub fn country_languages(&self) -> impl Iterator<Item = &CandidateLanguage> {
        self.admin_languages
            .iter()
            .filter(|props| props.is_country())
            .flat_map(|props| props.languages.iter())
    }

    /// Number of defaults declared at country level.
    #[must_use]
    pub fn country_default_count(&self) -> usize {
        self.admin_languages
            .iter()
            .filter(|props| props.is_country())
            .map(AdminLanguageProps::default_count)
            .sum()
    }

    /// Number of defaults declared by subdivisions.
    #[must_use]
    pub fn regional_default_count(&self) -> usize {
        self.admin_languages
            .iter()
            .filter(|props| !props.is_country())
            .map(AdminLanguageProps::default_count)
            .sum()
    }
}

/// Geo index collaborator: country and candidate languages for a point.
pub trait LanguageLookup {
    /// Look up the point; `None` when no country or language applies.
    fn lookup(&self, point: Coordinate) -> Option<GeoMatch>;
}

impl<T: LanguageLookup + ?Sized> LanguageLookup for &T {
    fn lookup(&self, point: Coordinate) -> Option<GeoMatch> {
        (**self).lookup(point)
    }
}

/// Outcome of classifying a piece of text against candidate languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disambiguation {
    /// The text belongs to this language.
    Language(String),
    /// Several candidates fit equally well.
    Ambiguous,
    /// No candidate could be confirmed.
    Unknown,
}

/// Disambiguation collaborator.
pub trait Disambiguator {
    /// Classify `text` against `candidates`.
    fn classify(&self, text: &str, candidates: &[CandidateLanguage]) -> Disambiguation;
}

impl<T: Disambiguator + ?Sized> Disambiguator for &T {
    fn classify(&self, text: &str, candidates: &[CandidateLanguage]) -> Disambiguation {
        (**self).classify(text, candidates)
    }
}

/// Address formatter collaborator.
///
/// Implementations must be deterministic for a given country and tag bag and
/// must keep the ` | ` line-break marker verbatim.
pub trait AddressFormatter {
    /// Render `tags` as a printed address for `country`.
    ///
    /// With `tag_components` set, each token is labelled with its component.
    fn format(&self, country: &str, tags: &Tags, tag_components: bool) -> Option<String>;
}

impl<T: AddressFormatter + ?Sized> AddressFormatter for &T {
    fn format(&self, country: &str, tags: &Tags, tag_components: bool) -> Option<String> {
        (**self).format(country, tags, tag_components)
    }
}
