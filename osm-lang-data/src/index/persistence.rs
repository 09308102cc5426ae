//! On-disk format of the region index.
//!
//! Files start with the `OLRI` magic and a little-endian `u16` version,
//! followed by a `bincode` payload of [`RegionRecord`] entries.

use std::io::{self, Read, Write};

use bincode::{deserialize_from, serialize_into};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use thiserror::Error;

use super::RegionRecord;

/// File identifier for persisted region indices.
pub const REGION_INDEX_MAGIC: [u8; 4] = *b"OLRI";

/// Supported version of the persisted region index format.
pub const REGION_INDEX_VERSION: u16 = 1;

#[derive(Debug, Serialize)]
struct RegionIndexFile<'a> {
    magic: [u8; 4],
    version: u16,
    entries: &'a [RegionRecord],
}

/// Error emitted when loading or validating a persisted region index.
#[derive(Debug, Error)]
pub enum RegionIndexError {
    /// The index file could not be read from disk.
    #[error("failed to read region index from {path}: {source}")]
    Io {
        /// Location of the artefact.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The payload could not be decoded.
    #[error("failed to decode region index from {path}: {source}")]
    Decode {
        /// Location of the artefact.
        path: Utf8PathBuf,
        /// Decoder error returned by `bincode`.
        #[source]
        source: bincode::Error,
    },
    /// The file did not contain the expected header.
    #[error("invalid region index magic: expected {expected:?}, found {found:?}")]
    InvalidMagic {
        /// Expected byte sequence.
        expected: [u8; 4],
        /// Sequence read from the file.
        found: [u8; 4],
    },
    /// The reader encountered an unsupported format version.
    #[error("unsupported region index version {found}; supported version is {supported}")]
    UnsupportedVersion {
        /// Version present in the file header.
        found: u16,
        /// Version supported by this binary.
        supported: u16,
    },
}

/// Error emitted when serialising a region index to disk.
#[derive(Debug, Error)]
pub enum RegionIndexWriteError {
    /// Writing bytes to disk failed.
    #[error("failed to write region index to {path}: {source}")]
    Io {
        /// Destination file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The records could not be encoded.
    #[error("failed to encode region index for {path}: {source}")]
    Encode {
        /// Destination file path.
        path: Utf8PathBuf,
        /// Encoder failure from `bincode`.
        #[source]
        source: bincode::Error,
    },
}

/// Persist `entries` as a region index artefact, truncating any existing file.
pub fn write_region_index(
    path: &Utf8Path,
    entries: &[RegionRecord],
) -> Result<(), RegionIndexWriteError> {
    let io_error = |source| RegionIndexWriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = osm_lang_fs::create_utf8_file(path).map_err(io_error)?;
    let payload = RegionIndexFile {
        magic: REGION_INDEX_MAGIC,
        version: REGION_INDEX_VERSION,
        entries,
    };
    serialize_into(&mut file, &payload).map_err(|source| RegionIndexWriteError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    file.flush().map_err(io_error)?;
    file.sync_all().map_err(io_error)
}

/// Load the records of a region index artefact.
pub(crate) fn load_records(path: &Utf8Path) -> Result<Vec<RegionRecord>, RegionIndexError> {
    let io_error = |source| RegionIndexError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = io::BufReader::new(osm_lang_fs::open_utf8_file(path).map_err(io_error)?);

    let mut magic = [0_u8; 4];
    file.read_exact(&mut magic).map_err(io_error)?;
    if magic != REGION_INDEX_MAGIC {
        return Err(RegionIndexError::InvalidMagic {
            expected: REGION_INDEX_MAGIC,
            found: magic,
        });
    }

    let mut version_bytes = [0_u8; 2];
    file.read_exact(&mut version_bytes).map_err(io_error)?;
    let version = u16::from_le_bytes(version_bytes);
    if version != REGION_INDEX_VERSION {
        return Err(RegionIndexError::UnsupportedVersion {
            found: version,
            supported: REGION_INDEX_VERSION,
        });
    }

    deserialize_from(&mut file).map_err(|source| RegionIndexError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
