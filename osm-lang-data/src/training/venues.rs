//! Venue names with their amenity or building type.

use log::debug;
use osm_lang_core::{KindFilter, OsmEntity, Tags};

use super::streets::{NAME_PREFIX, language_rows};
use super::{Row, TrainingContext};

const VENUE_KEYS: [&str; 2] = ["amenity", "building"];

/// `amenity:<value>` or `building:<value>`, ignoring bare `yes`/`y` flags.
pub(super) fn venue_type(tags: &Tags) -> Option<String> {
    VENUE_KEYS.iter().find_map(|key| {
        let value = tags.get(key).map(str::trim).unwrap_or_default();
        if value.is_empty() || matches!(value, "yes" | "y") {
            None
        } else {
            Some(format!("{key}:{value}"))
        }
    })
}

pub(super) fn rows(entity: &OsmEntity, ctx: &TrainingContext<'_>, kinds: KindFilter) -> Vec<Row> {
    let Some(venue) = venue_type(&entity.tags) else {
        return Vec::new();
    };
    let Some(geo) = ctx.locate(entity, kinds) else {
        return Vec::new();
    };
    let Some(attribution) = ctx.engine.attribute_at(&entity.tags, &geo, NAME_PREFIX) else {
        debug!(
            "Skipped OSM element: key={}, reason=unresolved venue name language",
            entity.key(kinds)
        );
        return Vec::new();
    };
    language_rows(&attribution)
        .into_iter()
        .map(|mut row| {
            row.insert(2, venue.clone());
            row
        })
        .collect()
}
