//! Stricter attribution for place and border names.
//!
//! Toponyms borrow heavily across languages, so only languages that plausibly
//! produced the name in this country are accepted: the country's defaults and
//! the point's candidates, minus well-represented languages spoken far from
//! their origin countries.

use std::collections::BTreeSet;

use super::{Attribution, AttributionEngine, NameLanguageMap, resolve_language};
use crate::collaborators::{Disambiguator, GeoMatch, LanguageLookup};
use crate::tags::Tags;

const NAME: &str = "name";
const NAME_PREFIX: &str = "name:";

impl<L, D> AttributionEngine<'_, L, D>
where
    L: LanguageLookup + ?Sized,
    D: Disambiguator + ?Sized,
{
    /// Attribute the names of a place or border, geolocating it first.
    ///
    /// Entities without any `name*` tag are skipped.
    #[must_use]
    pub fn attribute_toponym(&self, tags: &Tags) -> Option<Attribution> {
        if !tags.keys().any(|key| key.starts_with(NAME)) {
            return None;
        }
        let geo = self.locate(tags)?;
        self.attribute_toponym_at(tags, &geo)
    }

    /// Toponym attribution for an entity already located at `geo`.
    #[must_use]
    pub fn attribute_toponym_at(&self, tags: &Tags, geo: &GeoMatch) -> Option<Attribution> {
        if geo.candidates.is_empty() {
            return None;
        }
        let valid = self.valid_toponym_languages(geo);
        if valid.is_empty() {
            return None;
        }

        let mut names = NameLanguageMap::new();
        for (key, text) in tags.iter() {
            let Some(suffix) = key.strip_prefix(NAME_PREFIX) else {
                continue;
            };
            let segment = suffix.rsplit(':').next().unwrap_or(suffix);
            if let Some(lang) = resolve_language(self.languages, segment)
                && valid.contains(lang)
            {
                names.insert(lang, text);
            }
        }

        if names.is_empty()
            && regional_language_count(geo) <= 1
            && valid.len() == 1
            && let (Some(text), Some(lang)) = (tags.get(NAME), valid.first())
        {
            names.insert(*lang, text);
        }

        Some(Attribution {
            country: geo.country.clone(),
            names,
        })
    }

    fn valid_toponym_languages<'g>(&'g self, geo: &'g GeoMatch) -> BTreeSet<&'g str> {
        let languages = self.languages;
        let official = languages.official_languages(&geo.country);
        let mut defaults: BTreeSet<&str> = official
            .iter()
            .filter(|l| l.is_default)
            .map(|l| l.lang.as_str())
            .collect();
        // Hindi in India, Urdu in Pakistan: a local primary language keeps
        // the well-represented co-officials out.
        if let Some(top) = official.first()
            && !languages.is_well_represented(&top.lang)
            && defaults.len() > 1
        {
            defaults.retain(|lang| !languages.is_well_represented(lang));
        }

        let mut valid: BTreeSet<&str> = geo
            .candidates
            .iter()
            .map(|c| c.lang.as_str())
            .filter(|lang| {
                !languages.is_well_represented(lang) || languages.is_origin_country(lang, &geo.country)
            })
            .collect();
        valid.extend(defaults);
        valid.retain(|lang| languages.is_known(lang));
        valid
    }
}

/// Languages declared by subdivisions enclosing the point.
fn regional_language_count(geo: &GeoMatch) -> usize {
    geo.admin_languages
        .iter()
        .filter(|props| !props.is_country())
        .map(|props| props.languages.len())
        .sum()
}
