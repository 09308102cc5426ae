//! Place and border names under the toponym policy.

use log::debug;
use osm_lang_core::{KindFilter, OsmEntity};

use super::streets::language_rows;
use super::{Row, TrainingContext};

pub(super) fn rows(entity: &OsmEntity, ctx: &TrainingContext<'_>, kinds: KindFilter) -> Vec<Row> {
    if !entity.tags.keys().any(|key| key.starts_with("name")) {
        return Vec::new();
    }
    let Some(geo) = ctx.locate(entity, kinds) else {
        return Vec::new();
    };
    let Some(attribution) = ctx.engine.attribute_toponym_at(&entity.tags, &geo) else {
        debug!(
            "Skipped OSM element: key={}, reason=no valid toponym language",
            entity.key(kinds)
        );
        return Vec::new();
    };
    language_rows(&attribution)
}
