//! Training-set builders.
//!
//! Every builder runs the same loop: stream entities, geolocate them,
//! attribute their names to languages and write one tab-separated row per
//! `(language, text)` pair. Entities that cannot be located or attributed are
//! skipped; only unreadable input or unwritable output stops a build.

mod addresses;
mod streets;
mod toponyms;
mod venues;

use std::fmt;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use osm_lang_core::{
    AddressFormatter, AttributionEngine, Disambiguator, GeoMatch, KindFilter, LanguageContext,
    LanguageLookup, OsmEntity,
};
use thiserror::Error;

use crate::osm::{OsmReadError, OsmReader};
use crate::tsv::TsvWriter;

pub use addresses::AddressDenylist;

/// Number of contributing records between progress messages.
pub const PROGRESS_INTERVAL: u64 = 1000;

/// One output row.
type Row = Vec<String>;

/// The training sets that can be built from an OSM extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrainingSet {
    /// `name*` tags of ways and relations.
    Streets,
    /// `addr:street*` tags of any element.
    AddressStreets,
    /// Rendered addresses, optionally with labelled tokens and a language.
    FormattedAddresses {
        /// Label tokens and prefix each row with a language.
        tagged: bool,
    },
    /// Rendered addresses per attributed language, using only that
    /// language's field values.
    LimitedAddresses,
    /// Place and border names under the stricter toponym policy.
    Toponyms,
    /// Names of amenities and buildings with their venue type.
    Venues,
}

impl TrainingSet {
    /// Output file written into the output directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Streets => "streets_by_language.tsv",
            Self::AddressStreets => "address_streets_by_language.tsv",
            Self::FormattedAddresses { tagged: true } => "formatted_addresses_tagged.tsv",
            Self::FormattedAddresses { tagged: false } => "formatted_addresses.tsv",
            Self::LimitedAddresses => "formatted_addresses_by_language.tsv",
            Self::Toponyms => "toponyms_by_language.tsv",
            Self::Venues => "names_by_language.tsv",
        }
    }

    /// Element kinds the builder reads.
    #[must_use]
    pub const fn kinds(self) -> KindFilter {
        match self {
            Self::Streets => KindFilter::WAYS_AND_RELATIONS,
            _ => KindFilter::ALL,
        }
    }
}

impl fmt::Display for TrainingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Streets => "streets",
            Self::AddressStreets => "address streets",
            Self::FormattedAddresses { tagged: true } => "tagged formatted addresses",
            Self::FormattedAddresses { tagged: false } => "formatted addresses",
            Self::LimitedAddresses => "limited formatted addresses",
            Self::Toponyms => "toponyms",
            Self::Venues => "venues",
        };
        f.write_str(label)
    }
}

/// Attribution engine over type-erased collaborators.
pub type Engine<'a> = AttributionEngine<'a, dyn LanguageLookup + 'a, dyn Disambiguator + 'a>;

/// Read-only state shared by every builder.
pub struct TrainingContext<'a> {
    engine: Engine<'a>,
    formatter: &'a (dyn AddressFormatter + 'a),
    formatted_denylist: AddressDenylist,
    limited_denylist: AddressDenylist,
}

impl<'a> TrainingContext<'a> {
    /// Bind the language tables and collaborators.
    pub fn new(
        languages: &'a LanguageContext,
        lookup: &'a (dyn LanguageLookup + 'a),
        disambiguator: &'a (dyn Disambiguator + 'a),
        formatter: &'a (dyn AddressFormatter + 'a),
    ) -> Self {
        Self {
            engine: AttributionEngine::new(languages, lookup, disambiguator),
            formatter,
            formatted_denylist: AddressDenylist::formatted(),
            limited_denylist: AddressDenylist::limited(),
        }
    }

    /// Also strip `keys` before formatting addresses.
    #[must_use]
    pub fn with_strip_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        self.formatted_denylist.extend(keys.iter().cloned());
        self.limited_denylist.extend(keys);
        self
    }

    /// The attribution engine.
    #[must_use]
    pub const fn engine(&self) -> Engine<'a> {
        self.engine
    }

    /// Keys removed before formatting full addresses.
    #[must_use]
    pub const fn formatted_denylist(&self) -> &AddressDenylist {
        &self.formatted_denylist
    }

    /// Keys removed before formatting per-language addresses.
    #[must_use]
    pub const fn limited_denylist(&self) -> &AddressDenylist {
        &self.limited_denylist
    }

    /// Geolocate `entity`, logging why it is skipped when it cannot be.
    fn locate(&self, entity: &OsmEntity, kinds: KindFilter) -> Option<GeoMatch> {
        if let Err(err) = entity.coordinate() {
            debug!(
                "Skipped OSM element: key={}, reason=no usable coordinate ({err})",
                entity.key(kinds)
            );
            return None;
        }
        let geo = self.engine.locate(&entity.tags);
        if geo.is_none() {
            debug!(
                "Skipped OSM element: key={}, reason=no country or candidate language",
                entity.key(kinds)
            );
        }
        geo
    }
}

impl fmt::Debug for TrainingContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainingContext")
            .field("known_languages", &self.engine.languages().known_count())
            .field("formatted_denylist", &self.formatted_denylist)
            .field("limited_denylist", &self.limited_denylist)
            .finish_non_exhaustive()
    }
}

/// Counters reported by a finished build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainingReport {
    /// Entities read from the input.
    pub entities: u64,
    /// Entities that contributed at least one row.
    pub records: u64,
    /// Rows written.
    pub rows: u64,
}

/// Errors that stop a build.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// The OSM input could not be opened or parsed.
    #[error(transparent)]
    Read(#[from] OsmReadError),
    /// The output directory or file could not be created.
    #[error("failed to create training output at {path}")]
    CreateOutput {
        /// Path that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A row could not be written.
    #[error("failed to write training rows")]
    Write {
        /// Writer error.
        #[source]
        source: csv::Error,
    },
    /// Buffered rows could not be flushed.
    #[error("failed to flush training output")]
    Flush {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Build `set` from the extract at `input` into `out_dir`.
///
/// The input is opened before the output file is created, so an unreadable
/// extract leaves the output directory untouched. An existing output file is
/// truncated.
pub fn build_training_set(
    set: TrainingSet,
    input: &Utf8Path,
    out_dir: &Utf8Path,
    ctx: &TrainingContext<'_>,
) -> Result<TrainingReport, TrainingError> {
    let reader = OsmReader::open(input, set.kinds())?;
    let create_error = |path: &Utf8Path| {
        let path = path.to_path_buf();
        move |source: io::Error| TrainingError::CreateOutput { path, source }
    };
    osm_lang_fs::ensure_dir(out_dir).map_err(create_error(out_dir))?;
    let path = out_dir.join(set.file_name());
    let file = osm_lang_fs::create_utf8_file(&path).map_err(create_error(&path))?;
    let mut writer = TsvWriter::new(io::BufWriter::new(file));

    info!("Building {set} from {input} into {path}");
    let report = write_training_set(set, reader, &mut writer, ctx)?;
    writer
        .finish()
        .map_err(|source| TrainingError::Flush { source })?;
    Ok(report)
}

/// Run the `set` builder over `entities`, writing rows to `writer`.
pub fn write_training_set<I, W>(
    set: TrainingSet,
    entities: I,
    writer: &mut TsvWriter<W>,
    ctx: &TrainingContext<'_>,
) -> Result<TrainingReport, TrainingError>
where
    I: IntoIterator<Item = Result<OsmEntity, OsmReadError>>,
    W: Write,
{
    let mut report = TrainingReport::default();
    for entity in entities {
        let entity = entity?;
        report.entities += 1;
        let rows = rows_for(set, &entity, ctx);
        if rows.is_empty() {
            continue;
        }
        for row in &rows {
            writer
                .write_row(row)
                .map_err(|source| TrainingError::Write { source })?;
        }
        report.records += 1;
        report.rows += rows.len() as u64;
        if report.records % PROGRESS_INTERVAL == 0 {
            info!("Processed {} {set}", report.records);
        }
    }
    writer
        .flush()
        .map_err(|source| TrainingError::Flush { source })?;
    info!(
        "Finished {set}: entities={}, records={}, rows={}",
        report.entities, report.records, report.rows
    );
    Ok(report)
}

fn rows_for(set: TrainingSet, entity: &OsmEntity, ctx: &TrainingContext<'_>) -> Vec<Row> {
    match set {
        TrainingSet::Streets => streets::rows(entity, ctx, streets::NAME_PREFIX, set.kinds()),
        TrainingSet::AddressStreets => {
            streets::rows(entity, ctx, streets::STREET_PREFIX, set.kinds())
        }
        TrainingSet::FormattedAddresses { tagged } => {
            addresses::formatted_rows(entity, ctx, tagged, set.kinds())
        }
        TrainingSet::LimitedAddresses => addresses::limited_rows(entity, ctx, set.kinds()),
        TrainingSet::Toponyms => toponyms::rows(entity, ctx, set.kinds()),
        TrainingSet::Venues => venues::rows(entity, ctx, set.kinds()),
    }
}

/// Trimmed `text`, or `None` when nothing is left.
fn clean_text(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
