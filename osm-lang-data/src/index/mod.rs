//! Country and language lookup over administrative boundary polygons.
//!
//! Records are bulk-loaded into an R\*-tree keyed by their bounding boxes;
//! a lookup narrows candidates by envelope and then tests the point against
//! the exact boundary.

mod persistence;

use std::collections::BTreeSet;

use camino::Utf8Path;
use geo::{BoundingRect, Intersects, MultiPolygon, Point};
use osm_lang_core::{AdminLanguageProps, CandidateLanguage, Coordinate, GeoMatch, LanguageLookup};
use rstar::RTree;
use rstar::primitives::{GeomWithData, Rectangle};
use serde::{Deserialize, Serialize};

pub use persistence::{
    REGION_INDEX_MAGIC, REGION_INDEX_VERSION, RegionIndexError, RegionIndexWriteError,
    write_region_index,
};

/// One administrative polygon with its declared languages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    /// ISO country code of the polygon's country.
    pub country: String,
    /// Administrative rank; `0` for countries.
    pub admin_level: u32,
    /// Ranked languages declared for the polygon.
    pub languages: Vec<CandidateLanguage>,
    /// Boundary in WGS84, `x = longitude`, `y = latitude`.
    pub boundary: MultiPolygon<f64>,
}

type Envelope = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// In-memory region index answering [`LanguageLookup`] queries.
#[derive(Debug)]
pub struct RegionIndex {
    records: Vec<RegionRecord>,
    tree: RTree<Envelope>,
}

impl RegionIndex {
    /// Index `records`; records with empty boundaries are never matched.
    #[must_use]
    pub fn new(records: Vec<RegionRecord>) -> Self {
        let envelopes = records
            .iter()
            .enumerate()
            .filter_map(|(position, record)| {
                let rect = record.boundary.bounding_rect()?;
                let (min, max) = (rect.min(), rect.max());
                Some(GeomWithData::new(
                    Rectangle::from_corners([min.x, min.y], [max.x, max.y]),
                    position,
                ))
            })
            .collect();
        Self {
            records,
            tree: RTree::bulk_load(envelopes),
        }
    }

    /// Load a persisted index.
    pub fn load(path: &Utf8Path) -> Result<Self, RegionIndexError> {
        persistence::load_records(path).map(Self::new)
    }

    /// Number of indexed regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Report whether the index holds no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Regions containing `point`, most specific first.
    #[must_use]
    pub fn containing(&self, point: Coordinate) -> Vec<&RegionRecord> {
        let target = Point::new(point.lon, point.lat);
        let mut found: Vec<&RegionRecord> = self
            .tree
            .locate_all_at_point(&[point.lon, point.lat])
            .filter_map(|envelope| self.records.get(envelope.data))
            .filter(|record| record.boundary.intersects(&target))
            .collect();
        // Envelope order is arbitrary; stabilise before ranking.
        found.sort_by(|a, b| {
            b.admin_level
                .cmp(&a.admin_level)
                .then_with(|| a.country.cmp(&b.country))
        });
        found
    }
}

/// Merge the languages of `regions` (most specific first) into ranked
/// candidates.
///
/// Once a subdivision declares a default, defaults inherited from larger
/// areas are demoted. Defaults are then moved to the front, keeping their
/// relative order.
fn merge_candidates(regions: &[&RegionRecord]) -> Vec<CandidateLanguage> {
    let mut seen = BTreeSet::new();
    let mut regional_default = false;
    let mut candidates = Vec::new();
    for region in regions {
        for language in &region.languages {
            if !seen.insert(language.lang.as_str()) {
                continue;
            }
            if region.admin_level > 0 && language.is_default {
                regional_default = true;
                candidates.push(language.clone());
            } else if regional_default {
                candidates.push(CandidateLanguage::new(language.lang.clone(), false));
            } else {
                candidates.push(language.clone());
            }
        }
    }
    candidates.sort_by_key(|candidate| !candidate.is_default);
    candidates
}

impl LanguageLookup for RegionIndex {
    fn lookup(&self, point: Coordinate) -> Option<GeoMatch> {
        let regions = self.containing(point);
        let country = regions
            .iter()
            .find(|region| region.admin_level == 0)?
            .country
            .to_lowercase();
        let candidates = merge_candidates(&regions);
        if candidates.is_empty() {
            return None;
        }
        let admin_languages = regions
            .iter()
            .map(|region| AdminLanguageProps {
                admin_level: region.admin_level,
                languages: region.languages.clone(),
            })
            .collect();
        Some(GeoMatch {
            country,
            candidates,
            admin_languages,
        })
    }
}
