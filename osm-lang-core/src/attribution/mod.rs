//! Language attribution for name-like tags.
//!
//! Given an entity's tags and the geo index match for its position, the
//! engine decides which language each qualifying tag value is written in.
//! Language-qualified alternates (`name:fr`) are trusted unless several
//! alternates share the same text; the bare tag (`name`) is only considered
//! when no alternates exist, and then relies on the candidate languages of
//! the point plus the disambiguation collaborator.

mod toponym;

use std::collections::{BTreeMap, BTreeSet};

use crate::collaborators::{Disambiguation, Disambiguator, GeoMatch, LanguageLookup};
use crate::coordinate::Coordinate;
use crate::language::{CandidateLanguage, LanguageContext};
use crate::tags::Tags;

/// Texts attributed to each language for one entity.
///
/// Languages iterate in code order; texts keep the order in which they were
/// attributed. The same text is never recorded twice for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameLanguageMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl NameLanguageMap {
    /// Construct an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Attribute `text` to `lang`.
    pub fn insert(&mut self, lang: impl Into<String>, text: impl Into<String>) {
        let texts = self.entries.entry(lang.into()).or_default();
        let owned_text = text.into();
        if !texts.contains(&owned_text) {
            texts.push(owned_text);
        }
    }

    /// Texts attributed to `lang`.
    #[must_use]
    pub fn get(&self, lang: &str) -> Option<&[String]> {
        self.entries.get(lang).map(Vec::as_slice)
    }

    /// Iterate over `(language, texts)` in language-code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(lang, texts)| (lang.as_str(), texts.as_slice()))
    }

    /// Iterate over attributed languages in code order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of languages with at least one text.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether nothing was attributed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Country and per-language texts for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    /// Country code of the point.
    pub country: String,
    /// Attributed texts.
    pub names: NameLanguageMap,
}

/// Resolve a tag suffix to a known language code.
///
/// The exact suffix wins; otherwise a trailing `_script` qualifier is
/// stripped (`sr_Latn` resolves to `sr`).
///
/// # Examples
/// ```
/// use osm_lang_core::{LanguageContext, resolve_language};
///
/// let ctx = LanguageContext::new(["sr", "en"]);
/// assert_eq!(resolve_language(&ctx, "sr_Latn"), Some("sr"));
/// assert_eq!(resolve_language(&ctx, "old"), None);
/// ```
#[must_use]
pub fn resolve_language<'k>(languages: &LanguageContext, suffix: &'k str) -> Option<&'k str> {
    if languages.is_known(suffix) {
        return Some(suffix);
    }
    suffix
        .split('_')
        .next()
        .filter(|stripped| languages.is_known(stripped))
}

/// Final `:`-separated segment of a tag key.
fn last_segment(key: &str) -> &str {
    key.rsplit(':').next().unwrap_or(key)
}

/// Report whether `key` is the bare, unqualified form of `prefix`.
///
/// `name` and numbered variants such as `name_1` qualify for the `name`
/// prefix; `addr:street` qualifies for `addr:street`.
fn is_bare_key(key: &str, prefix: &str) -> bool {
    let first = prefix.split(':').next().unwrap_or(prefix);
    let last = last_segment(prefix);
    let segment = last_segment(key);
    let script_stripped = segment.split('_').next().unwrap_or(segment);
    key.starts_with(first) && (prefix.contains(':') || !key.contains(':')) && script_stripped == last
}

#[derive(Debug, Clone, Copy)]
struct Alternate<'t> {
    lang: &'t str,
    text: &'t str,
}

/// Assigns tag values to languages using the geo index and a disambiguator.
#[derive(Debug)]
pub struct AttributionEngine<'a, L: ?Sized, D: ?Sized> {
    languages: &'a LanguageContext,
    lookup: &'a L,
    disambiguator: &'a D,
}

impl<L: ?Sized, D: ?Sized> Clone for AttributionEngine<'_, L, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: ?Sized, D: ?Sized> Copy for AttributionEngine<'_, L, D> {}

impl<'a, L, D> AttributionEngine<'a, L, D>
where
    L: LanguageLookup + ?Sized,
    D: Disambiguator + ?Sized,
{
    /// Bind the engine to its tables and collaborators.
    pub const fn new(languages: &'a LanguageContext, lookup: &'a L, disambiguator: &'a D) -> Self {
        Self {
            languages,
            lookup,
            disambiguator,
        }
    }

    /// Language tables the engine consults.
    #[must_use]
    pub const fn languages(&self) -> &'a LanguageContext {
        self.languages
    }

    /// Geolocate an entity from its `lat`/`lon` tags.
    ///
    /// `None` when the coordinate is missing or unparseable, or the point has
    /// no country or candidate language.
    #[must_use]
    pub fn locate(&self, tags: &Tags) -> Option<GeoMatch> {
        let point = Coordinate::from_tags(tags).ok()?;
        self.lookup
            .lookup(point)
            .filter(|geo| !geo.country.is_empty() && !geo.candidates.is_empty())
    }

    /// Classify `text` with the engine's disambiguator.
    pub fn classify(&self, text: &str, candidates: &[CandidateLanguage]) -> Disambiguation {
        self.disambiguator.classify(text, candidates)
    }

    /// Attribute the `prefix` tags of an entity, geolocating it first.
    #[must_use]
    pub fn attribute(&self, tags: &Tags, prefix: &str) -> Option<Attribution> {
        let geo = self.locate(tags)?;
        self.attribute_at(tags, &geo, prefix)
    }

    /// Attribute the `prefix` tags of an entity already located at `geo`.
    ///
    /// Returns `None` when the point has no candidate language or when the
    /// bare tag cannot be resolved confidently. A `Some` result may hold an
    /// empty map when no tag qualified.
    #[must_use]
    pub fn attribute_at(&self, tags: &Tags, geo: &GeoMatch, prefix: &str) -> Option<Attribution> {
        let top = geo.candidates.first()?;
        let mut names = NameLanguageMap::new();

        let alternates = self.alternates(tags, prefix);
        if alternates.is_empty() {
            for (_, text) in tags.iter().filter(|(key, _)| is_bare_key(key, prefix)) {
                let lang = self.resolve_bare(text, geo, top)?;
                if self.languages.is_known(&lang) {
                    names.insert(lang, text);
                }
            }
        } else {
            self.resolve_alternates(&alternates, geo, &mut names);
        }

        Some(Attribution {
            country: geo.country.clone(),
            names,
        })
    }

    /// Language of a `prefix:<lang>` key, if the suffix is a known language.
    #[must_use]
    pub fn alternate_language<'k>(&self, key: &'k str, prefix: &str) -> Option<&'k str> {
        let rest = key.strip_prefix(prefix)?.strip_prefix(':')?;
        resolve_language(self.languages, last_segment(rest))
    }

    fn alternates<'t>(&self, tags: &'t Tags, prefix: &str) -> Vec<Alternate<'t>> {
        tags.iter()
            .filter_map(|(key, text)| {
                self.alternate_language(key, prefix)
                    .map(|lang| Alternate { lang, text })
            })
            .collect()
    }

    fn resolve_alternates(&self, alternates: &[Alternate<'_>], geo: &GeoMatch, names: &mut NameLanguageMap) {
        let mut sharing: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for alt in alternates {
            let langs = sharing.entry(alt.text).or_default();
            if !langs.contains(&alt.lang) {
                langs.push(alt.lang);
            }
        }
        let defaults: BTreeSet<&str> = geo
            .candidates
            .iter()
            .filter(|c| c.is_default)
            .map(|c| c.lang.as_str())
            .collect();

        let mut seen_ambiguous = BTreeSet::new();
        for alt in alternates {
            let langs = sharing.get(alt.text).map(Vec::as_slice).unwrap_or_default();
            if langs.len() <= 1 {
                names.insert(alt.lang, alt.text);
                continue;
            }
            if !seen_ambiguous.insert(alt.text) {
                continue;
            }
            let candidates: Vec<CandidateLanguage> = langs
                .iter()
                .map(|lang| CandidateLanguage::new(*lang, defaults.contains(lang)))
                .collect();
            if let Disambiguation::Language(lang) = self.classify(alt.text, &candidates)
                && self.languages.is_known(&lang)
            {
                names.insert(lang, alt.text);
            }
        }
    }

    /// Language for a bare tag value; `None` aborts the whole entity.
    fn resolve_bare(&self, text: &str, geo: &GeoMatch, top: &CandidateLanguage) -> Option<String> {
        if geo.candidates.len() == 1 {
            return Some(top.lang.clone());
        }
        match self.classify(text, &geo.candidates) {
            Disambiguation::Ambiguous => None,
            Disambiguation::Unknown => single_default(&geo.candidates).map(str::to_owned),
            Disambiguation::Language(lang) => {
                let demoted = lang != top.lang
                    && geo.country_languages().any(|c| c.lang == lang)
                    && geo.country_default_count() > 1
                    && geo.regional_default_count() > 0
                    && self.languages.is_well_represented(&lang);
                (!demoted).then_some(lang)
            }
        }
    }
}

/// The only default-flagged language among `candidates`, if exactly one.
fn single_default(candidates: &[CandidateLanguage]) -> Option<&str> {
    let defaults: BTreeSet<&str> = candidates
        .iter()
        .filter(|c| c.is_default)
        .map(|c| c.lang.as_str())
        .collect();
    let mut iter = defaults.into_iter();
    match (iter.next(), iter.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}
