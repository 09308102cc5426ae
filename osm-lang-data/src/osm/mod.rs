//! Streaming reader for packed-id OSM XML extracts.
//!
//! The reader pulls one XML event at a time and holds at most one element's
//! tags in memory, so peak usage stays flat regardless of input size.
//! Bzip2-compressed inputs are detected by their `BZh` magic and decoded on
//! the fly.

use std::io::{self, BufRead, BufReader};

use bzip2::bufread::MultiBzDecoder;
use camino::{Utf8Path, Utf8PathBuf};
use log::warn;
use osm_lang_core::{KindFilter, OsmEntity, Tags, decode_element_id};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

const BZIP2_MAGIC: &[u8] = b"BZh";

/// Errors raised while reading an OSM extract.
#[derive(Debug, Error)]
pub enum OsmReadError {
    /// The input file could not be opened or sniffed.
    #[error("failed to open OSM input at {path}")]
    Open {
        /// Location of the extract.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The XML stream is malformed; reading cannot continue.
    #[error("malformed OSM XML near byte {position}")]
    Xml {
        /// Byte offset reported by the XML reader.
        position: usize,
        /// Parser error.
        #[source]
        source: quick_xml::Error,
    },
}

enum Pending {
    Entity(OsmEntity),
    Skipped,
}

/// Pull-based iterator over the tagged elements of an OSM extract.
///
/// # Examples
/// ```
/// use osm_lang_core::{KindFilter, OsmKind};
/// use osm_lang_data::OsmReader;
///
/// let xml = r#"<osm><node id="1000000000000007" lat="1" lon="2"><tag k="name" v="Main St"/></node></osm>"#;
/// let mut reader = OsmReader::new(xml.as_bytes(), KindFilter::ALL);
/// let way = reader.next().expect("one element").expect("valid XML");
/// assert_eq!(way.kind, OsmKind::Way);
/// assert_eq!(way.tags.get("name"), Some("Main St"));
/// ```
pub struct OsmReader<R> {
    reader: Reader<R>,
    filter: KindFilter,
    buf: Vec<u8>,
    pending: Option<Pending>,
    finished: bool,
}

impl OsmReader<Box<dyn BufRead>> {
    /// Open an extract on disk, decompressing bzip2 input transparently.
    pub fn open(path: &Utf8Path, filter: KindFilter) -> Result<Self, OsmReadError> {
        let open_error = |source| OsmReadError::Open {
            path: path.to_path_buf(),
            source,
        };
        let file = osm_lang_fs::open_utf8_file(path).map_err(open_error)?;
        let mut buffered = BufReader::new(file);
        let compressed = buffered
            .fill_buf()
            .map_err(open_error)?
            .starts_with(BZIP2_MAGIC);
        let input: Box<dyn BufRead> = if compressed {
            Box::new(BufReader::new(MultiBzDecoder::new(buffered)))
        } else {
            Box::new(buffered)
        };
        Ok(Self::new(input, filter))
    }
}

impl<R: BufRead> OsmReader<R> {
    /// Read elements from an in-memory or already-opened source.
    pub fn new(input: R, filter: KindFilter) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.trim_text(true);
        Self {
            reader,
            filter,
            buf: Vec::new(),
            pending: None,
            finished: false,
        }
    }

    /// Kinds this reader yields.
    pub const fn filter(&self) -> KindFilter {
        self.filter
    }
}

impl<R: BufRead> Iterator for OsmReader<R> {
    type Item = Result<OsmEntity, OsmReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let Self {
            reader,
            filter,
            buf,
            pending,
            finished,
        } = self;

        while !*finished {
            buf.clear();
            let event = match reader.read_event_into(buf) {
                Ok(event) => event,
                Err(source) => return Some(Err(fail(finished, reader.buffer_position(), source))),
            };
            let step = match event {
                Event::Start(start) => handle_open(&start, *filter, pending, false),
                Event::Empty(start) => handle_open(&start, *filter, pending, true),
                Event::End(end) if is_entity(end.name().as_ref()) => {
                    Ok(take_entity(pending))
                }
                Event::Eof => {
                    *finished = true;
                    Ok(None)
                }
                _ => Ok(None),
            };
            match step {
                Ok(Some(entity)) => return Some(Ok(entity)),
                Ok(None) => {}
                Err(source) => return Some(Err(fail(finished, reader.buffer_position(), source))),
            }
        }
        None
    }
}

fn fail(finished: &mut bool, position: usize, source: quick_xml::Error) -> OsmReadError {
    *finished = true;
    OsmReadError::Xml { position, source }
}

fn is_entity(name: &[u8]) -> bool {
    matches!(name, b"node" | b"way" | b"relation")
}

fn take_entity(pending: &mut Option<Pending>) -> Option<OsmEntity> {
    match pending.take() {
        Some(Pending::Entity(entity)) => Some(entity),
        _ => None,
    }
}

/// Handle a start or self-closing element; returns an entity when one is
/// complete.
fn handle_open(
    start: &BytesStart<'_>,
    filter: KindFilter,
    pending: &mut Option<Pending>,
    self_closing: bool,
) -> Result<Option<OsmEntity>, quick_xml::Error> {
    let name = start.name();
    if is_entity(name.as_ref()) {
        *pending = Some(open_entity(start, filter)?);
        return Ok(if self_closing { take_entity(pending) } else { None });
    }
    if name.as_ref() == b"tag"
        && let Some(Pending::Entity(entity)) = pending.as_mut()
        && let Some((key, value)) = tag_pair(start)?
    {
        entity.tags.insert(key, value);
    }
    Ok(None)
}

fn open_entity(start: &BytesStart<'_>, filter: KindFilter) -> Result<Pending, quick_xml::Error> {
    let mut raw_id = None;
    let mut tags = Tags::new();
    for attribute in start.attributes().with_checks(false) {
        let attr = attribute?;
        let value = attr.unescape_value()?.into_owned();
        if attr.key.as_ref() == b"id" {
            raw_id = Some(value);
        } else {
            tags.insert(String::from_utf8_lossy(attr.key.as_ref()).into_owned(), value);
        }
    }

    let Some(packed) = raw_id.as_deref().and_then(|id| id.trim().parse::<u64>().ok()) else {
        warn!(
            "Skipped OSM element: element={}, raw_id={:?} (unparseable identifier)",
            String::from_utf8_lossy(start.name().as_ref()),
            raw_id
        );
        return Ok(Pending::Skipped);
    };
    let (kind, _) = decode_element_id(packed);
    if !filter.contains(kind) {
        return Ok(Pending::Skipped);
    }
    Ok(Pending::Entity(OsmEntity::from_packed(packed, tags)))
}

fn tag_pair(start: &BytesStart<'_>) -> Result<Option<(String, String)>, quick_xml::Error> {
    let mut key = None;
    let mut value = None;
    for attribute in start.attributes().with_checks(false) {
        let attr = attribute?;
        match attr.key.as_ref() {
            b"k" => key = Some(attr.unescape_value()?.into_owned()),
            b"v" => value = Some(attr.unescape_value()?.into_owned()),
            _ => {}
        }
    }
    Ok(key.zip(value))
}
