use serde::{Deserialize, Serialize};

use crate::textutil::{
    is_clause_punct, is_sentence_end, normalize_for_timing, split_sentences, tokens,
    HEADING_MARKER,
};

pub const DEFAULT_WPM: f64 = 150.0;

/// Speaking units added per event. One unit lasts `60 / wpm` seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PauseWeights {
    pub word: f64,
    pub clause: f64,
    pub heading: f64,
    pub sentence_end: f64,
}

impl Default for PauseWeights {
    fn default() -> Self {
        Self {
            word: 1.0,
            clause: 1.0,
            heading: 2.0,
            sentence_end: 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum DurationInput<'a> {
    Words(usize),
    Text(&'a str),
}

impl From<usize> for DurationInput<'_> {
    fn from(count: usize) -> Self {
        Self::Words(count)
    }
}

impl<'a> From<&'a str> for DurationInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for DurationInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DurationEstimator {
    wpm: f64,
    pauses: PauseWeights,
}

impl Default for DurationEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_WPM, PauseWeights::default())
    }
}

impl DurationEstimator {
    /// `wpm` must be positive; the config layer rejects anything else.
    #[must_use]
    pub fn new(wpm: f64, pauses: PauseWeights) -> Self {
        Self { wpm, pauses }
    }

    #[must_use]
    pub fn with_wpm(wpm: f64) -> Self {
        Self::new(wpm, PauseWeights::default())
    }

    #[must_use]
    pub fn wpm(&self) -> f64 {
        self.wpm
    }

    #[must_use]
    pub fn pauses(&self) -> PauseWeights {
        self.pauses
    }

    pub fn estimate<'a>(&self, input: impl Into<DurationInput<'a>>) -> f64 {
        match input.into() {
            DurationInput::Words(n) => self.seconds_for_words(n),
            DurationInput::Text(t) => self.seconds_for_text(t),
        }
    }

    /// Plain rate: no pause modelling.
    #[must_use]
    pub fn seconds_for_words(&self, count: usize) -> f64 {
        self.units_to_seconds(count as f64)
    }

    #[must_use]
    pub fn seconds_for_text(&self, text: &str) -> f64 {
        self.units_to_seconds(self.speaking_units(text))
    }

    /// Words plus clause, heading and sentence-end pauses, in word-equivalents.
    #[must_use]
    pub fn speaking_units(&self, text: &str) -> f64 {
        let flat = normalize_for_timing(text);
        let mut units = 0.0;
        for sentence in split_sentences(&flat) {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }
            for tok in tokens(sentence) {
                units += self.pauses.word;
                if tok.chars().next_back().is_some_and(is_clause_punct) {
                    units += self.pauses.clause;
                }
                if tok.len() == HEADING_MARKER.len_utf8() && tok.starts_with(HEADING_MARKER) {
                    units += self.pauses.heading;
                }
            }
            if sentence.chars().next_back().is_some_and(is_sentence_end) {
                units += self.pauses.sentence_end;
            }
        }
        units
    }

    fn units_to_seconds(&self, units: f64) -> f64 {
        units / self.wpm * 60.0
    }
}
