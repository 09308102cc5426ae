//! Street names by language, from `name*` or `addr:street*` tags.

use log::debug;
use osm_lang_core::{Attribution, KindFilter, OsmEntity};

use super::{Row, TrainingContext, clean_text};

pub(super) const NAME_PREFIX: &str = "name";
pub(super) const STREET_PREFIX: &str = "addr:street";

pub(super) fn rows(
    entity: &OsmEntity,
    ctx: &TrainingContext<'_>,
    prefix: &str,
    kinds: KindFilter,
) -> Vec<Row> {
    let Some(geo) = ctx.locate(entity, kinds) else {
        return Vec::new();
    };
    let Some(attribution) = ctx.engine.attribute_at(&entity.tags, &geo, prefix) else {
        debug!(
            "Skipped OSM element: key={}, reason=unresolved {prefix} language",
            entity.key(kinds)
        );
        return Vec::new();
    };
    language_rows(&attribution)
}

/// `(language, country, text)` rows for every attributed text.
pub(super) fn language_rows(attribution: &Attribution) -> Vec<Row> {
    attribution
        .names
        .iter()
        .flat_map(|(lang, texts)| {
            texts.iter().filter_map(move |text| {
                clean_text(text)
                    .map(|text| vec![lang.to_owned(), attribution.country.clone(), text.to_owned()])
            })
        })
        .collect()
}
