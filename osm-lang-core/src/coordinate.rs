//! Normalise free-form latitude/longitude text into signed degrees.
//!
//! Each axis is tried against three grammars in a fixed order:
//! degrees-minutes-seconds, decimal degrees with a cardinal letter, then a
//! lenient plain decimal. Only the first two apply a cardinal sign.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::tags::Tags;

/// Tag holding the latitude of an element.
pub const LATITUDE_TAG: &str = "lat";
/// Tag holding the longitude of an element.
pub const LONGITUDE_TAG: &str = "lon";

/// Characters stripped from both ends before parsing.
const SURROUNDING: &[char] = &[' ', ',', ';', '|'];

/// Errors returned while normalising coordinate text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    /// The element carries no value for the named axis tag.
    #[error("missing `{field}` value")]
    Missing {
        /// Tag that was absent.
        field: &'static str,
    },
    /// The residual text could not be read as a number.
    #[error("cannot parse coordinate from {text:?}")]
    Unparseable {
        /// Text as supplied by the caller.
        text: String,
    },
}

/// A parsed latitude/longitude pair in signed degrees.
///
/// # Examples
/// ```
/// use osm_lang_core::Coordinate;
///
/// let point = Coordinate::parse("40 42 46 N", "74 0 21 W").expect("parse DMS");
/// assert!((point.lat - 40.7128).abs() < 1e-3);
/// assert!((point.lon + 74.0060).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Latitude in degrees, south negative.
    pub lat: f64,
    /// Longitude in degrees, west negative.
    pub lon: f64,
}

impl Coordinate {
    /// Parse both axes.
    pub fn parse(lat: &str, lon: &str) -> Result<Self, CoordinateError> {
        Ok(Self {
            lat: parse_latitude(lat)?,
            lon: parse_longitude(lon)?,
        })
    }

    /// Parse the `lat`/`lon` tags of an element.
    pub fn from_tags(tags: &Tags) -> Result<Self, CoordinateError> {
        let lat = tags.get(LATITUDE_TAG).ok_or(CoordinateError::Missing {
            field: LATITUDE_TAG,
        })?;
        let lon = tags.get(LONGITUDE_TAG).ok_or(CoordinateError::Missing {
            field: LONGITUDE_TAG,
        })?;
        Self::parse(lat, lon)
    }
}

struct AxisGrammar {
    dms: Regex,
    decimal_with_direction: Regex,
    negative: &'static str,
}

/// Compile one of the literal grammars below.
///
/// # Panics
///
/// Only on an invalid pattern. Every caller passes a literal covered by
/// `grammars_compile`, so this cannot fire at runtime.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("coordinate grammar compiles")
}

// Cardinal letters match in either case, except that a lowercase `s` closing
// a DMS latitude is the seconds marker.
static LATITUDE: LazyLock<AxisGrammar> = LazyLock::new(|| AxisGrammar {
    dms: compile(
        r#"^(-?[0-9]{1,2})[ ]*[ :°ºd][ ]*([0-5]?[0-9])?[ ]*[:'′m]?[ ]*([0-5]?[0-9](?:\.[0-9]+)?)?[ ]*[:?"″s]?[ ]*([NSn])?$"#,
    ),
    decimal_with_direction: compile(r"^(-?[0-9]{1,2}(?:\.[0-9]+)?)[ ]*[ :°ºd]?[ ]*([NSns])$"),
    negative: "S",
});

static LONGITUDE: LazyLock<AxisGrammar> = LazyLock::new(|| AxisGrammar {
    dms: compile(
        r#"^(-?(?:180|1[0-7][0-9]|0?[0-9]{1,2}))[ ]*[ :°ºd][ ]*([0-5]?[0-9])?[ ]*[:'′m]?[ ]*([0-5]?[0-9](?:\.[0-9]+)?)?[ ]*[:?"″s]?[ ]*([EWew])?$"#,
    ),
    decimal_with_direction: compile(
        r"^(-?(?:180|1[0-7][0-9]|0?[0-9]{1,2})(?:\.[0-9]+)?)[ ]*[ :°ºd]?[ ]*([EWew])$",
    ),
    negative: "W",
});

static LEADING_JUNK: LazyLock<Regex> = LazyLock::new(|| compile(r"^[^0-9\-]+"));
static TRAILING_JUNK: LazyLock<Regex> = LazyLock::new(|| compile(r"[^0-9]+$"));

/// Parse a latitude string.
///
/// # Examples
/// ```
/// use osm_lang_core::parse_latitude;
///
/// assert_eq!(parse_latitude("12,5 S"), Ok(-12.5));
/// ```
pub fn parse_latitude(text: &str) -> Result<f64, CoordinateError> {
    parse_axis(&LATITUDE, text)
}

/// Parse a longitude string.
pub fn parse_longitude(text: &str) -> Result<f64, CoordinateError> {
    parse_axis(&LONGITUDE, text)
}

fn parse_axis(grammar: &AxisGrammar, text: &str) -> Result<f64, CoordinateError> {
    let unparseable = || CoordinateError::Unparseable {
        text: text.to_owned(),
    };
    let normalised = text.trim_matches(SURROUNDING).replace(',', ".");

    if let Some(caps) = grammar.dms.captures(&normalised) {
        return from_dms(&caps, grammar.negative).ok_or_else(unparseable);
    }
    if let Some(caps) = grammar.decimal_with_direction.captures(&normalised) {
        let degrees: f64 = caps
            .get(1)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or_else(unparseable)?;
        return Ok(apply_direction(
            degrees.abs(),
            caps.get(2).map(|m| m.as_str()),
            grammar.negative,
        ));
    }

    let head = LEADING_JUNK.replace(&normalised, "");
    let stripped = TRAILING_JUNK.replace(&head, "");
    stripped.parse().map_err(|_| unparseable())
}

fn from_dms(caps: &Captures<'_>, negative: &str) -> Option<f64> {
    let degrees_text = caps.get(1)?.as_str();
    let degrees: f64 = degrees_text.parse().ok()?;
    let minutes: f64 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0.0,
    };
    let seconds: f64 = match caps.get(3) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0.0,
    };
    let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;

    match caps.get(4) {
        Some(letter) => Some(apply_direction(magnitude, Some(letter.as_str()), negative)),
        None if degrees_text.starts_with('-') => Some(-magnitude),
        None => Some(magnitude),
    }
}

fn apply_direction(magnitude: f64, letter: Option<&str>, negative: &str) -> f64 {
    match letter {
        Some(dir) if dir.eq_ignore_ascii_case(negative) => -magnitude,
        _ => magnitude,
    }
}
