//! Core domain rules for extracting multilingual OSM training data.
//!
//! The crate models the tags of an OSM element, recovers element kinds from
//! packed ids, normalises coordinate text, and attributes name-like tags to
//! languages. It performs no I/O: the geo index, the disambiguator and the
//! address formatter are reached through the traits in [`collaborators`].
#![forbid(unsafe_code)]

pub mod attribution;
pub mod collaborators;
pub mod coordinate;
pub mod entity;
pub mod language;
pub mod tags;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use attribution::{Attribution, AttributionEngine, NameLanguageMap, resolve_language};
pub use collaborators::{AddressFormatter, Disambiguation, Disambiguator, GeoMatch, LanguageLookup};
pub use coordinate::{
    Coordinate, CoordinateError, LATITUDE_TAG, LONGITUDE_TAG, parse_latitude, parse_longitude,
};
pub use entity::{KindFilter, OsmEntity, OsmKind, RELATION_OFFSET, WAY_OFFSET, decode_element_id};
pub use language::{AdminLanguageProps, CandidateLanguage, LanguageContext};
pub use tags::Tags;
