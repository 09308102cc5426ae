//! Formatted-address builders.

use std::collections::BTreeSet;

use log::debug;
use osm_lang_core::{Disambiguation, GeoMatch, KindFilter, OsmEntity, Tags};

use super::streets::STREET_PREFIX;
use super::{Row, TrainingContext, clean_text};

const IGNORED_KEYS: &[&str] = &["house"];
const NAME_KEYS: &[&str] = &["name", "addr:housename"];
const COUNTRY_KEYS: &[&str] = &["country", "country_name", "addr:country"];
const POSTAL_KEYS: &[&str] = &["postcode", "postal_code", "addr:postcode", "addr:postal_code"];

/// Tag keys removed from an element before its address is formatted.
///
/// # Examples
/// ```
/// use osm_lang_core::Tags;
/// use osm_lang_data::AddressDenylist;
///
/// let mut tags = Tags::from([("addr:housename", "Rose Cottage"), ("addr:street", "Mill Lane")]);
/// AddressDenylist::limited().strip(&mut tags);
/// assert_eq!(tags.keys().collect::<Vec<_>>(), ["addr:street"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressDenylist {
    keys: BTreeSet<String>,
}

impl AddressDenylist {
    /// Keys dropped from full formatted addresses: the generic `house` flag.
    #[must_use]
    pub fn formatted() -> Self {
        Self::from_keys(IGNORED_KEYS)
    }

    /// Keys dropped from per-language addresses: house names, countries,
    /// postal codes and the `house` flag.
    #[must_use]
    pub fn limited() -> Self {
        Self::from_keys(
            NAME_KEYS
                .iter()
                .chain(COUNTRY_KEYS)
                .chain(POSTAL_KEYS)
                .chain(IGNORED_KEYS),
        )
    }

    fn from_keys<'k>(keys: impl IntoIterator<Item = &'k &'k str>) -> Self {
        Self {
            keys: keys.into_iter().map(|key| (*key).to_owned()).collect(),
        }
    }

    /// Report whether `key` is removed.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Removed keys in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Remove every denied key from `tags`.
    pub fn strip(&self, tags: &mut Tags) {
        tags.retain(|key, _| !self.contains(key));
    }
}

impl<S: Into<String>> Extend<S> for AddressDenylist {
    fn extend<I: IntoIterator<Item = S>>(&mut self, keys: I) {
        self.keys.extend(keys.into_iter().map(Into::into));
    }
}

pub(super) fn formatted_rows(
    entity: &OsmEntity,
    ctx: &TrainingContext<'_>,
    tagged: bool,
    kinds: KindFilter,
) -> Vec<Row> {
    let Some(geo) = ctx.locate(entity, kinds) else {
        return Vec::new();
    };
    let mut tags = entity.tags.clone();
    ctx.formatted_denylist.strip(&mut tags);

    let language = if tagged {
        let Some(lang) = representative_language(&tags, &geo, ctx) else {
            debug!(
                "Skipped OSM element: key={}, reason=no representative address language",
                entity.key(kinds)
            );
            return Vec::new();
        };
        Some(lang)
    } else {
        None
    };

    let Some(formatted) = ctx.formatter.format(&geo.country, &tags, tagged) else {
        return Vec::new();
    };
    let Some(text) = clean_text(&formatted) else {
        return Vec::new();
    };
    let row = match language {
        Some(lang) => vec![lang, geo.country.clone(), text.to_owned()],
        None => vec![text.to_owned()],
    };
    vec![row]
}

/// One language for a whole address: the only candidate, or the
/// disambiguated language of its street.
fn representative_language(tags: &Tags, geo: &GeoMatch, ctx: &TrainingContext<'_>) -> Option<String> {
    let lang = match geo.candidates.as_slice() {
        [only] => only.lang.clone(),
        candidates => match ctx.engine.classify(tags.get(STREET_PREFIX)?, candidates) {
            Disambiguation::Language(lang) => lang,
            Disambiguation::Ambiguous | Disambiguation::Unknown => return None,
        },
    };
    ctx.engine.languages().is_known(&lang).then_some(lang)
}

pub(super) fn limited_rows(
    entity: &OsmEntity,
    ctx: &TrainingContext<'_>,
    kinds: KindFilter,
) -> Vec<Row> {
    let mut tags = entity.tags.clone();
    ctx.limited_denylist.strip(&mut tags);
    if tags.is_empty() {
        return Vec::new();
    }
    let Some(geo) = ctx.locate(entity, kinds) else {
        return Vec::new();
    };
    let Some(attribution) = ctx.engine.attribute_at(&tags, &geo, STREET_PREFIX) else {
        debug!(
            "Skipped OSM element: key={}, reason=unresolved street language",
            entity.key(kinds)
        );
        return Vec::new();
    };

    let single_language = attribution.names.len() == 1;
    attribution
        .names
        .languages()
        .filter_map(|lang| {
            let localised = localise(&tags, lang, single_language);
            if localised.is_empty() {
                return None;
            }
            let formatted = ctx.formatter.format(&attribution.country, &localised, false)?;
            let text = clean_text(&formatted)?;
            Some(vec![
                lang.to_owned(),
                attribution.country.clone(),
                text.to_owned(),
            ])
        })
        .collect()
}

/// Replace each value with its `key:lang` override. Values without an
/// override are kept only when the element has a single language.
pub(super) fn localise(tags: &Tags, lang: &str, single_language: bool) -> Tags {
    tags.iter()
        .filter_map(|(key, value)| match tags.get(&format!("{key}:{lang}")) {
            Some(localised) => Some((key, localised)),
            None => single_language.then_some((key, value)),
        })
        .collect()
}
