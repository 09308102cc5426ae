//! Adapters and pipelines for building multilingual OSM training sets.
//!
//! Responsibilities:
//! - Stream packed-id OSM XML extracts, plain or bzip2-compressed.
//! - Load the on-disk collaborators: region index, language tables and
//!   phrase dictionaries.
//! - Render addresses and write the tab-separated training sets.
//!
//! Boundaries:
//! - Attribution rules live in `osm-lang-core`; this crate only feeds them.
//! - Building region indices from raw boundaries is out of scope; indices are
//!   persisted with [`write_region_index`] by external tooling.
//!
//! Invariants:
//! - At most one OSM element is held in memory at a time.
//! - No global mutable state.

pub mod dictionary;
pub mod format;
pub mod index;
pub mod languages;
pub mod osm;
pub mod training;
pub mod tsv;

use camino::{Utf8Path, Utf8PathBuf};

pub use dictionary::{DictionaryDisambiguator, DictionaryError};
pub use format::{ComponentFormatter, LINE_BREAK, NUMBER_FIRST_COUNTRIES};
pub use index::{
    REGION_INDEX_MAGIC, REGION_INDEX_VERSION, RegionIndex, RegionIndexError,
    RegionIndexWriteError, RegionRecord, write_region_index,
};
pub use languages::{LanguageTableError, load_language_context};
pub use osm::{OsmReadError, OsmReader};
pub use training::{
    AddressDenylist, Engine, PROGRESS_INTERVAL, TrainingContext, TrainingError, TrainingReport,
    TrainingSet, build_training_set, write_training_set,
};
pub use tsv::{TsvWriter, escape_field};

/// Region index file inside an index directory.
pub const REGION_INDEX_FILE: &str = "regions.olri";
/// Language tables file inside an index directory.
pub const LANGUAGE_TABLES_FILE: &str = "languages.json";
/// Phrase dictionaries file inside an index directory.
pub const DICTIONARIES_FILE: &str = "dictionaries.json";

/// Locations of the collaborator files kept in one index directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPaths {
    /// Persisted [`RegionIndex`].
    pub regions: Utf8PathBuf,
    /// Language tables read by [`load_language_context`].
    pub languages: Utf8PathBuf,
    /// Phrase lists read by [`DictionaryDisambiguator::load`].
    pub dictionaries: Utf8PathBuf,
}

impl IndexPaths {
    /// Standard file locations below `index_dir`.
    ///
    /// # Examples
    /// ```
    /// use camino::Utf8Path;
    /// use osm_lang_data::IndexPaths;
    ///
    /// let paths = IndexPaths::in_dir(Utf8Path::new("/srv/index"));
    /// assert_eq!(paths.regions, "/srv/index/regions.olri");
    /// ```
    #[must_use]
    pub fn in_dir(index_dir: &Utf8Path) -> Self {
        Self {
            regions: index_dir.join(REGION_INDEX_FILE),
            languages: index_dir.join(LANGUAGE_TABLES_FILE),
            dictionaries: index_dir.join(DICTIONARIES_FILE),
        }
    }
}
