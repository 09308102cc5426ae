//! In-memory collaborators for unit and behaviour tests.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::collaborators::{Disambiguation, Disambiguator, GeoMatch, LanguageLookup};
use crate::coordinate::Coordinate;
use crate::language::{AdminLanguageProps, CandidateLanguage};

/// Lookup answering every point with the same match.
#[derive(Debug, Clone, Default)]
pub struct StubLookup {
    answer: Option<GeoMatch>,
}

impl StubLookup {
    /// Answer every lookup with `answer`.
    #[must_use]
    pub const fn new(answer: GeoMatch) -> Self {
        Self {
            answer: Some(answer),
        }
    }

    /// Miss every lookup.
    #[must_use]
    pub const fn missing() -> Self {
        Self { answer: None }
    }

    /// Answer with a single country polygon declaring `candidates`.
    #[must_use]
    pub fn country<'s>(country: &str, candidates: impl IntoIterator<Item = (&'s str, bool)>) -> Self {
        let languages: Vec<CandidateLanguage> = candidates
            .into_iter()
            .map(|(lang, is_default)| CandidateLanguage::new(lang, is_default))
            .collect();
        Self::new(GeoMatch {
            country: country.to_owned(),
            candidates: languages.clone(),
            admin_languages: vec![AdminLanguageProps {
                admin_level: 0,
                languages,
            }],
        })
    }
}

impl LanguageLookup for StubLookup {
    fn lookup(&self, _point: Coordinate) -> Option<GeoMatch> {
        self.answer.clone()
    }
}

/// Disambiguator with scripted answers per text.
///
/// Texts without a scripted answer classify as [`Disambiguation::Unknown`].
/// Every call is recorded so tests can assert the collaborator was skipped.
#[derive(Debug, Default)]
pub struct StubDisambiguator {
    answers: BTreeMap<String, Disambiguation>,
    calls: RefCell<Vec<(String, Vec<CandidateLanguage>)>>,
}

impl StubDisambiguator {
    /// Construct a disambiguator that answers `Unknown` to everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the answer for `text`.
    #[must_use]
    pub fn answer(mut self, text: &str, outcome: Disambiguation) -> Self {
        self.answers.insert(text.to_owned(), outcome);
        self
    }

    /// Texts classified so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Vec<CandidateLanguage>)> {
        self.calls.borrow().clone()
    }

    /// Number of classification requests.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Disambiguator for StubDisambiguator {
    fn classify(&self, text: &str, candidates: &[CandidateLanguage]) -> Disambiguation {
        self.calls
            .borrow_mut()
            .push((text.to_owned(), candidates.to_vec()));
        self.answers
            .get(text)
            .cloned()
            .unwrap_or(Disambiguation::Unknown)
    }
}
