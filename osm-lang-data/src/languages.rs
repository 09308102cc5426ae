//! Loading the language tables consulted by attribution.

use std::io::{self, BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use osm_lang_core::LanguageContext;
use simd_json::serde::from_reader;
use thiserror::Error;

/// Errors raised while loading language tables.
#[derive(Debug, Error)]
pub enum LanguageTableError {
    /// The tables could not be opened.
    #[error("failed to open language tables at {path}")]
    Io {
        /// Location of the tables.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The tables are not valid JSON of the expected shape.
    #[error("failed to parse language tables at {path}")]
    Parse {
        /// Location of the tables.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: simd_json::Error,
    },
    /// The tables declare no known language, so nothing could be attributed.
    #[error("language tables at {path} declare no known languages")]
    Empty {
        /// Location of the tables.
        path: Utf8PathBuf,
    },
}

/// Load a [`LanguageContext`] from its JSON form.
///
/// The document holds `known_languages` (array of codes),
/// `well_represented` (language to origin countries) and
/// `official_languages` (country to ranked `{lang, is_default}` entries).
pub fn load_language_context(path: &Utf8Path) -> Result<LanguageContext, LanguageTableError> {
    let file = osm_lang_fs::open_utf8_file(path).map_err(|source| LanguageTableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let context: LanguageContext =
        from_reader(BufReader::new(file)).map_err(|source| LanguageTableError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if context.known_count() == 0 {
        return Err(LanguageTableError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(context)
}
