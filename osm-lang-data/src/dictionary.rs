//! Phrase-dictionary disambiguation.
//!
//! Each language lists phrases typical of its street and place names
//! ("rue", "strasse", "calle de"). A text is classified by which of the
//! candidate languages have a phrase occurring in it as whole words.

use std::collections::BTreeMap;
use std::io::{self, BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use osm_lang_core::{CandidateLanguage, Disambiguation, Disambiguator};
use simd_json::serde::from_reader;
use thiserror::Error;

/// Errors raised while loading a phrase dictionary.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The dictionary file could not be opened.
    #[error("failed to open dictionaries at {path}")]
    Io {
        /// Location of the dictionary file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file is not a `language -> [phrase]` JSON object.
    #[error("failed to parse dictionaries at {path}")]
    Parse {
        /// Location of the dictionary file.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: simd_json::Error,
    },
}

/// [`Disambiguator`] backed by per-language phrase lists.
///
/// # Examples
/// ```
/// use osm_lang_core::{CandidateLanguage, Disambiguation, Disambiguator};
/// use osm_lang_data::DictionaryDisambiguator;
///
/// let dictionary = DictionaryDisambiguator::from_phrases([
///     ("fr", vec!["rue", "avenue"]),
///     ("nl", vec!["straat"]),
/// ]);
/// let candidates = [CandidateLanguage::new("nl", true), CandidateLanguage::new("fr", true)];
///
/// assert_eq!(
///     dictionary.classify("Rue de la Loi", &candidates),
///     Disambiguation::Language("fr".into())
/// );
/// assert_eq!(dictionary.classify("Grand-Place", &candidates), Disambiguation::Unknown);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryDisambiguator {
    phrases: BTreeMap<String, Vec<Vec<String>>>,
}

impl DictionaryDisambiguator {
    /// Build a dictionary from `(language, phrases)` pairs.
    pub fn from_phrases<I, L, P, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (L, P)>,
        L: Into<String>,
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut phrases: BTreeMap<String, Vec<Vec<String>>> = BTreeMap::new();
        for (lang, list) in entries {
            let tokenised = list
                .into_iter()
                .map(|phrase| tokenise(phrase.as_ref()))
                .filter(|words| !words.is_empty());
            phrases.entry(lang.into()).or_default().extend(tokenised);
        }
        Self { phrases }
    }

    /// Load a JSON object mapping language codes to phrase lists.
    pub fn load(path: &Utf8Path) -> Result<Self, DictionaryError> {
        let file = osm_lang_fs::open_utf8_file(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: BTreeMap<String, Vec<String>> =
            from_reader(BufReader::new(file)).map_err(|source| DictionaryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_phrases(raw))
    }

    /// Number of languages with at least one phrase.
    #[must_use]
    pub fn language_count(&self) -> usize {
        self.phrases.values().filter(|list| !list.is_empty()).count()
    }

    fn mentions(&self, lang: &str, words: &[String]) -> bool {
        self.phrases.get(lang).is_some_and(|list| {
            list.iter().any(|phrase| {
                words
                    .windows(phrase.len())
                    .any(|window| window == phrase.as_slice())
            })
        })
    }
}

fn tokenise(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

impl Disambiguator for DictionaryDisambiguator {
    fn classify(&self, text: &str, candidates: &[CandidateLanguage]) -> Disambiguation {
        let words = tokenise(text);
        let matched: Vec<&CandidateLanguage> = candidates
            .iter()
            .filter(|candidate| self.mentions(&candidate.lang, &words))
            .collect();
        match matched.as_slice() {
            [] => Disambiguation::Unknown,
            [only] => Disambiguation::Language(only.lang.clone()),
            several => {
                let defaults: Vec<&&CandidateLanguage> =
                    several.iter().filter(|candidate| candidate.is_default).collect();
                match defaults.as_slice() {
                    [only] => Disambiguation::Language(only.lang.clone()),
                    _ => Disambiguation::Ambiguous,
                }
            }
        }
    }
}
