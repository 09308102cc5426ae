//! Test helpers for writing index directories and OSM extracts to disk.

use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use geo::{MultiPolygon, Rect, coord};
use osm_lang_core::{CandidateLanguage, WAY_OFFSET};
use osm_lang_data::{IndexPaths, RegionRecord, TrainingReport, TrainingSet, write_region_index};
use std::fs;
use tempfile::TempDir;

const LANGUAGE_TABLES: &str = r#"{
    "known_languages": ["en", "fr"],
    "well_represented": {"en": ["gb", "us"], "fr": ["fr"]},
    "official_languages": {
        "ca": [{"lang": "en", "is_default": true}, {"lang": "fr"}]
    }
}"#;

const DICTIONARIES: &str = r#"{"en": ["street", "avenue"], "fr": ["rue", "chemin"]}"#;

/// A temporary workspace holding a Canadian index directory and two extracts.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        let workspace = Self { _dir: dir, root };
        workspace.write_index();
        workspace.write_extracts();
        workspace
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn index_dir(&self) -> Utf8PathBuf {
        self.root.join("index")
    }

    pub(super) fn out_dir(&self) -> Utf8PathBuf {
        self.root.join("out")
    }

    pub(super) fn ways(&self) -> Utf8PathBuf {
        self.root.join("planet-ways.osm")
    }

    pub(super) fn addresses(&self) -> Utf8PathBuf {
        self.root.join("planet-addresses.osm")
    }

    pub(super) fn output(&self, set: TrainingSet) -> String {
        fs::read_to_string(self.out_dir().join(set.file_name())).expect("read training set")
    }

    fn write_index(&self) {
        let paths = IndexPaths::in_dir(&self.index_dir());
        fs::create_dir_all(self.index_dir()).expect("create index dir");
        let canada = RegionRecord {
            country: "CA".to_owned(),
            admin_level: 0,
            languages: vec![
                CandidateLanguage::new("en", true),
                CandidateLanguage::new("fr", false),
            ],
            boundary: MultiPolygon::new(vec![
                Rect::new(coord! { x: -141.0, y: 42.0 }, coord! { x: -52.0, y: 83.0 })
                    .to_polygon(),
            ]),
        };
        write_region_index(&paths.regions, &[canada]).expect("persist region index");
        fs::write(&paths.languages, LANGUAGE_TABLES).expect("write language tables");
        fs::write(&paths.dictionaries, DICTIONARIES).expect("write dictionaries");
    }

    fn write_extracts(&self) {
        let way = WAY_OFFSET + 42;
        fs::write(
            self.ways(),
            format!(
                r#"<osm><way id="{way}" lat="45.5017" lon="-73.5673">
                    <tag k="name:en" v="Main Street"/>
                    <tag k="name:fr" v="Rue Principale"/>
                </way></osm>"#
            ),
        )
        .expect("write ways extract");
        fs::write(
            self.addresses(),
            r#"<osm><node id="7" lat="45.4972" lon="-73.5790">
                <tag k="addr:housenumber" v="1455"/>
                <tag k="addr:street" v="Rue Sainte-Catherine"/>
                <tag k="addr:city" v="Montréal"/>
                <tag k="addr:postcode" v="H3G 1M8"/>
            </node></osm>"#,
        )
        .expect("write addresses extract");
    }
}

/// Parse `build` arguments the way the binary does.
pub(super) fn parse_build(args: &[&str]) -> Result<BuildArgs, CliError> {
    let invocation = ["osm-lang", "build"].iter().chain(args);
    let cli = Cli::try_parse_from(invocation).map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Build(args) => Ok(args),
    }
}

/// Resolve and run `args` without consulting configuration files or the
/// process environment.
pub(super) fn build_from_args(
    args: BuildArgs,
) -> Result<Vec<(TrainingSet, TrainingReport)>, CliError> {
    let config = BuildConfig::try_from(args)?;
    config.validate_sources()?;
    execute_build(&config)
}
