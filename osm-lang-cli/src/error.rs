//! Error types emitted by the osm-lang CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use osm_lang_data::{
    DictionaryError, LanguageTableError, RegionIndexError, TrainingError, TrainingSet,
};
use thiserror::Error;

/// Errors emitted by the osm-lang CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// No input extract was configured, so there is nothing to build.
    #[error(
        "no input extracts given (set at least one of --streets-file, --address-file, \
         --venues-file or --borders-file)"
    )]
    NoInputs,
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The output directory exists but is not a directory.
    #[error("output directory {path:?} is not a directory")]
    OutputDirectoryNotDirectory { path: Utf8PathBuf },
    /// The output directory could not be inspected.
    #[error("failed to inspect output directory {path:?}: {source}")]
    InspectOutputDirectory {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The persisted region index could not be loaded.
    #[error(transparent)]
    LoadRegions(#[from] Box<RegionIndexError>),
    /// The language tables could not be loaded.
    #[error(transparent)]
    LoadLanguages(#[from] Box<LanguageTableError>),
    /// The phrase dictionaries could not be loaded.
    #[error(transparent)]
    LoadDictionaries(#[from] Box<DictionaryError>),
    /// A training-set build failed.
    #[error("failed to build {set}: {source}")]
    Training {
        set: TrainingSet,
        #[source]
        source: Box<TrainingError>,
    },
}
