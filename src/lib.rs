//! Facade crate for building language-labelled training sets from
//! OpenStreetMap extracts.
//!
//! This crate re-exports the core attribution types and, behind the
//! `pipelines` feature, the adapters and training-set builders.

#![forbid(unsafe_code)]

pub use osm_lang_core::{
    AddressFormatter, AdminLanguageProps, Attribution, AttributionEngine, CandidateLanguage,
    Coordinate, CoordinateError, Disambiguation, Disambiguator, GeoMatch, KindFilter,
    LanguageContext, LanguageLookup, NameLanguageMap, OsmEntity, OsmKind, Tags,
    decode_element_id,
};

#[cfg(feature = "test-support")]
pub use osm_lang_core::test_support;

#[cfg(feature = "pipelines")]
pub use osm_lang_data::{
    ComponentFormatter, DictionaryDisambiguator, IndexPaths, OsmReader, RegionIndex,
    RegionRecord, TrainingContext, TrainingError, TrainingReport, TrainingSet,
    build_training_set, load_language_context, write_region_index, write_training_set,
};
