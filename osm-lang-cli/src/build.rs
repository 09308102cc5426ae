//! Build command implementation for the osm-lang CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use osm_lang_data::{
    ComponentFormatter, DictionaryDisambiguator, IndexPaths, RegionIndex, TrainingContext,
    TrainingReport, TrainingSet, build_training_set, load_language_context,
};
use osm_lang_fs::PathKind;
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ADDRESS_FILE, ARG_BORDERS_FILE, ARG_FORMAT_ONLY, ARG_INDEX_DIR, ARG_LIMITED_ADDRESSES,
    ARG_OUT_DIR, ARG_STREETS_FILE, ARG_STRIP_KEY, ARG_UNTAGGED, ARG_VENUES_FILE, CliError,
    ENV_INDEX_DIR,
};

/// CLI arguments for the `build` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Stream OSM extracts, attribute each name to the languages \
                 spoken where the element lies, and write one tab-separated \
                 training set per selected builder. Paths can come from CLI \
                 flags, configuration files, or environment variables.",
    about = "Build language-labelled training sets"
)]
#[ortho_config(prefix = "OSM_LANG")]
pub(crate) struct BuildArgs {
    /// Path to the ways extract (`planet-ways.osm`).
    #[arg(short = 's', long = ARG_STREETS_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) streets_file: Option<Utf8PathBuf>,
    /// Path to the addresses extract (`planet-addresses.osm`).
    #[arg(short = 'a', long = ARG_ADDRESS_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) address_file: Option<Utf8PathBuf>,
    /// Path to the venues extract (`planet-venues.osm`).
    #[arg(short = 'v', long = ARG_VENUES_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) venues_file: Option<Utf8PathBuf>,
    /// Path to the borders extract (`planet-borders.osm`).
    #[arg(short = 'b', long = ARG_BORDERS_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) borders_file: Option<Utf8PathBuf>,
    /// Write formatted addresses instead of address street names.
    #[arg(short = 'f', long = ARG_FORMAT_ONLY)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) format_only: bool,
    /// Drop component labels and the language column from formatted addresses.
    #[arg(short = 'u', long = ARG_UNTAGGED)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) untagged: bool,
    /// Write one formatted address per attributed language.
    #[arg(short = 'l', long = ARG_LIMITED_ADDRESSES)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) limited_addresses: bool,
    /// Directory holding the region index, language tables and dictionaries.
    #[arg(short = 'i', long = ARG_INDEX_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) index_dir: Option<Utf8PathBuf>,
    /// Directory receiving the training sets (defaults to the working directory).
    #[arg(short = 'o', long = ARG_OUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) out_dir: Option<Utf8PathBuf>,
    /// Extra tag keys removed before formatting addresses.
    #[arg(long = ARG_STRIP_KEY, value_name = "key", value_delimiter = ',')]
    #[serde(default)]
    pub(crate) strip_keys: Option<Vec<String>>,
}

impl BuildArgs {
    pub(crate) fn into_config(self) -> Result<BuildConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        BuildConfig::try_from(merged)
    }
}

/// Resolved `build` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BuildConfig {
    pub(crate) streets_file: Option<Utf8PathBuf>,
    pub(crate) address_file: Option<Utf8PathBuf>,
    pub(crate) venues_file: Option<Utf8PathBuf>,
    pub(crate) borders_file: Option<Utf8PathBuf>,
    pub(crate) format_only: bool,
    pub(crate) untagged: bool,
    pub(crate) limited_addresses: bool,
    pub(crate) index_dir: Utf8PathBuf,
    pub(crate) out_dir: Utf8PathBuf,
    pub(crate) strip_keys: Vec<String>,
}

/// One builder run: which set to build from which extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BuildJob {
    pub(crate) set: TrainingSet,
    pub(crate) input: Utf8PathBuf,
}

impl BuildConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        for (path, field) in self.inputs() {
            Self::require_existing(path, field)?;
        }
        self.validate_out_dir()
    }

    fn inputs(&self) -> impl Iterator<Item = (&Utf8Path, &'static str)> {
        [
            (&self.streets_file, ARG_STREETS_FILE),
            (&self.address_file, ARG_ADDRESS_FILE),
            (&self.venues_file, ARG_VENUES_FILE),
            (&self.borders_file, ARG_BORDERS_FILE),
        ]
        .into_iter()
        .filter_map(|(path, field)| path.as_deref().map(|path| (path, field)))
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match osm_lang_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn validate_out_dir(&self) -> Result<(), CliError> {
        match osm_lang_fs::path_kind(&self.out_dir) {
            Ok(PathKind::Missing | PathKind::Directory) => Ok(()),
            Ok(PathKind::File | PathKind::Other) => Err(CliError::OutputDirectoryNotDirectory {
                path: self.out_dir.clone(),
            }),
            Err(source) => Err(CliError::InspectOutputDirectory {
                path: self.out_dir.clone(),
                source,
            }),
        }
    }

    /// Builders to run, in the order they run.
    pub(crate) fn jobs(&self) -> Vec<BuildJob> {
        let mut jobs = Vec::new();
        let mut push = |set: TrainingSet, input: &Option<Utf8PathBuf>| {
            if let Some(input) = input {
                jobs.push(BuildJob {
                    set,
                    input: input.clone(),
                });
            }
        };
        push(TrainingSet::Streets, &self.streets_file);
        push(TrainingSet::Toponyms, &self.borders_file);
        if !self.format_only && !self.limited_addresses {
            push(TrainingSet::AddressStreets, &self.address_file);
        }
        if self.format_only {
            push(
                TrainingSet::FormattedAddresses {
                    tagged: !self.untagged,
                },
                &self.address_file,
            );
        }
        if self.limited_addresses {
            push(TrainingSet::LimitedAddresses, &self.address_file);
        }
        push(TrainingSet::Venues, &self.venues_file);
        jobs
    }

    fn warn_unused_address_modes(&self) {
        if self.address_file.is_some() {
            return;
        }
        let flags = [
            (self.format_only, ARG_FORMAT_ONLY),
            (self.untagged, ARG_UNTAGGED),
            (self.limited_addresses, ARG_LIMITED_ADDRESSES),
        ];
        for (_, flag) in flags.into_iter().filter(|(set, _)| *set) {
            warn!("--{flag} has no effect without --{ARG_ADDRESS_FILE}");
        }
    }
}

impl TryFrom<BuildArgs> for BuildConfig {
    type Error = CliError;

    fn try_from(args: BuildArgs) -> Result<Self, Self::Error> {
        let index_dir = args.index_dir.ok_or(CliError::MissingArgument {
            field: ARG_INDEX_DIR,
            env: ENV_INDEX_DIR,
        })?;
        if args.streets_file.is_none()
            && args.address_file.is_none()
            && args.venues_file.is_none()
            && args.borders_file.is_none()
        {
            return Err(CliError::NoInputs);
        }
        let out_dir = args.out_dir.unwrap_or_else(|| Utf8PathBuf::from("."));

        Ok(Self {
            streets_file: args.streets_file,
            address_file: args.address_file,
            venues_file: args.venues_file,
            borders_file: args.borders_file,
            format_only: args.format_only,
            untagged: args.untagged,
            limited_addresses: args.limited_addresses,
            index_dir,
            out_dir,
            strip_keys: args.strip_keys.unwrap_or_default(),
        })
    }
}

pub(crate) fn run_build(args: BuildArgs) -> Result<(), CliError> {
    let config = resolve_build_config(args)?;
    let reports = execute_build(&config)?;
    let rows: u64 = reports.iter().map(|(_, report)| report.rows).sum();
    info!(
        "Wrote {rows} rows across {} training sets into {}",
        reports.len(),
        config.out_dir
    );
    Ok(())
}

fn resolve_build_config(args: BuildArgs) -> Result<BuildConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    config.warn_unused_address_modes();
    Ok(config)
}

/// Load the collaborators from the index directory and run every job.
///
/// Collaborators are loaded before any output is created, so a broken index
/// directory leaves the output directory untouched.
pub(crate) fn execute_build(
    config: &BuildConfig,
) -> Result<Vec<(TrainingSet, TrainingReport)>, CliError> {
    let paths = IndexPaths::in_dir(&config.index_dir);
    let regions = RegionIndex::load(&paths.regions).map_err(Box::new)?;
    let languages = load_language_context(&paths.languages).map_err(Box::new)?;
    let dictionary = DictionaryDisambiguator::load(&paths.dictionaries).map_err(Box::new)?;
    info!(
        "Loaded {} regions, {} known languages and phrases for {} languages from {}",
        regions.len(),
        languages.known_count(),
        dictionary.language_count(),
        config.index_dir
    );

    let formatter = ComponentFormatter::new();
    let ctx = TrainingContext::new(&languages, &regions, &dictionary, &formatter)
        .with_strip_keys(config.strip_keys.iter().cloned());
    config
        .jobs()
        .into_iter()
        .map(|job| {
            build_training_set(job.set, &job.input, &config.out_dir, &ctx)
                .map(|report| (job.set, report))
                .map_err(|source| CliError::Training {
                    set: job.set,
                    source: Box::new(source),
                })
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<BuildConfig, CliError> {
    let merged = BuildArgs::merge_from_layers(layers).map_err(CliError::from)?;
    BuildConfig::try_from(merged)
}
