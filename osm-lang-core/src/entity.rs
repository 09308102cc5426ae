//! OSM elements recovered from a packed id space.
//!
//! Planet extracts are pre-converted so every element is written as a plain
//! node. The original element kind survives only in the id: ways are shifted
//! by [`WAY_OFFSET`] and relations by [`RELATION_OFFSET`].

use std::fmt;

use crate::coordinate::{Coordinate, CoordinateError};
use crate::tags::Tags;

/// Offset added to way ids in the packed id space.
pub const WAY_OFFSET: u64 = 1_000_000_000_000_000;

/// Offset added to relation ids in the packed id space.
pub const RELATION_OFFSET: u64 = 2 * WAY_OFFSET;

/// Kind of OSM element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OsmKind {
    /// A point element.
    Node,
    /// An ordered list of nodes.
    Way,
    /// A group of members.
    Relation,
}

impl OsmKind {
    /// Lowercase OSM name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Node => 0b001,
            Self::Way => 0b010,
            Self::Relation => 0b100,
        }
    }
}

impl fmt::Display for OsmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recover the element kind and local id from a packed id.
///
/// # Examples
/// ```
/// use osm_lang_core::{OsmKind, WAY_OFFSET, decode_element_id};
///
/// assert_eq!(decode_element_id(42), (OsmKind::Node, 42));
/// assert_eq!(decode_element_id(WAY_OFFSET + 5), (OsmKind::Way, 5));
/// ```
#[must_use]
pub const fn decode_element_id(packed: u64) -> (OsmKind, u64) {
    if packed >= RELATION_OFFSET {
        (OsmKind::Relation, packed - RELATION_OFFSET)
    } else if packed >= WAY_OFFSET {
        (OsmKind::Way, packed - WAY_OFFSET)
    } else {
        (OsmKind::Node, packed)
    }
}

/// Set of element kinds a reader should yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindFilter {
    bits: u8,
}

impl KindFilter {
    /// Nodes, ways and relations.
    pub const ALL: Self = Self { bits: 0b111 };

    /// Ways and relations only.
    pub const WAYS_AND_RELATIONS: Self = Self { bits: 0b110 };

    /// A filter admitting exactly one kind.
    #[must_use]
    pub const fn only(kind: OsmKind) -> Self {
        Self { bits: kind.bit() }
    }

    /// Report whether `kind` passes the filter.
    #[must_use]
    pub const fn contains(self, kind: OsmKind) -> bool {
        self.bits & kind.bit() != 0
    }

    /// Number of admitted kinds.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.bits.count_ones()
    }

    /// Report whether the filter admits nothing.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Report whether the filter admits exactly one kind.
    #[must_use]
    pub const fn is_single(self) -> bool {
        self.len() == 1
    }
}

/// A tagged OSM element decoded from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsmEntity {
    /// Local id after removing the packing offset.
    pub id: u64,
    /// Element kind recovered from the packed id.
    pub kind: OsmKind,
    /// Native attributes (minus `id`) overlaid with `tag` children.
    pub tags: Tags,
}

impl OsmEntity {
    /// Build an entity from a packed id and its tags.
    #[must_use]
    pub fn from_packed(packed: u64, tags: Tags) -> Self {
        let (kind, id) = decode_element_id(packed);
        Self { id, kind, tags }
    }

    /// Output key for the entity under `filter`.
    ///
    /// A single-kind filter cannot produce colliding ids, so the bare id is
    /// used; otherwise the kind is prefixed.
    ///
    /// # Examples
    /// ```
    /// use osm_lang_core::{KindFilter, OsmEntity, Tags, WAY_OFFSET};
    ///
    /// let way = OsmEntity::from_packed(WAY_OFFSET + 7, Tags::new());
    /// assert_eq!(way.key(KindFilter::WAYS_AND_RELATIONS), "way:7");
    /// assert_eq!(way.key(KindFilter::only(way.kind)), "7");
    /// ```
    #[must_use]
    pub fn key(&self, filter: KindFilter) -> String {
        if filter.is_single() {
            self.id.to_string()
        } else {
            format!("{}:{}", self.kind, self.id)
        }
    }

    /// Parse the entity's `lat`/`lon` tags.
    pub fn coordinate(&self) -> Result<Coordinate, CoordinateError> {
        Coordinate::from_tags(&self.tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, OsmKind::Node, 0)]
    #[case(WAY_OFFSET - 1, OsmKind::Node, WAY_OFFSET - 1)]
    #[case(WAY_OFFSET, OsmKind::Way, 0)]
    #[case(WAY_OFFSET + 5, OsmKind::Way, 5)]
    #[case(RELATION_OFFSET - 1, OsmKind::Way, WAY_OFFSET - 1)]
    #[case(RELATION_OFFSET, OsmKind::Relation, 0)]
    #[case(RELATION_OFFSET + 99, OsmKind::Relation, 99)]
    fn decodes_packed_ids(#[case] packed: u64, #[case] kind: OsmKind, #[case] id: u64) {
        assert_eq!(decode_element_id(packed), (kind, id));
    }

    #[rstest]
    fn filters_report_membership() {
        let filter = KindFilter::WAYS_AND_RELATIONS;
        assert!(!filter.contains(OsmKind::Node));
        assert!(filter.contains(OsmKind::Way));
        assert!(filter.contains(OsmKind::Relation));
        assert_eq!(filter.len(), 2);
        assert_eq!(KindFilter::ALL.len(), 3);
        assert!(KindFilter::only(OsmKind::Node).is_single());
    }

    #[rstest]
    fn keys_qualify_kind_for_mixed_filters() {
        let relation = OsmEntity::from_packed(RELATION_OFFSET + 3, Tags::new());
        assert_eq!(relation.key(KindFilter::ALL), "relation:3");
        assert_eq!(relation.key(KindFilter::only(OsmKind::Relation)), "3");
    }
}
