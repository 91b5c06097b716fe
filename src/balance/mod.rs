mod options;
mod presentation;
mod speech;

use tracing::info;

use crate::duration::DurationEstimator;
use crate::ir::{Lang, MergeResult, MergedSegment};
use crate::textutil::count_words;

pub use options::{
    MergeMode, MergeOptions, MixedPattern, SlideMode, DEFAULT_BLOCK_TIME_SECONDS,
    DEFAULT_SEPARATOR,
};
pub use presentation::merge_presentation;
pub use speech::merge_speech;

pub fn merge_documents(
    primary: &str,
    secondary: &str,
    mode: MergeMode,
    options: &MergeOptions,
    estimator: &DurationEstimator,
) -> MergeResult {
    let result = match mode {
        MergeMode::Speech => merge_speech(primary, secondary, options, estimator),
        MergeMode::Presentation => merge_presentation(primary, secondary, options, estimator),
    };
    info!(
        ?mode,
        segments = result.segments.len(),
        primary_words = result.primary_lang_words,
        secondary_words = result.secondary_lang_words,
        primary_secs = result.primary_lang_duration,
        secondary_secs = result.secondary_lang_duration,
        "merge finished"
    );
    result
}

/// A block of text with its word count and estimated speaking time.
#[derive(Clone, Debug)]
pub(crate) struct TimedText {
    pub(crate) text: String,
    pub(crate) words: usize,
    pub(crate) seconds: f64,
}

impl TimedText {
    pub(crate) fn new(text: String, estimator: &DurationEstimator) -> Self {
        Self {
            words: count_words(&text),
            seconds: estimator.seconds_for_text(&text),
            text,
        }
    }
}

/// Running per-language words and seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct LangTotals {
    words: [usize; 2],
    seconds: [f64; 2],
}

impl LangTotals {
    pub(crate) fn add(&mut self, lang: Lang, words: usize, seconds: f64) {
        self.words[lang.index()] += words;
        self.seconds[lang.index()] += seconds;
    }

    pub(crate) fn remove(&mut self, lang: Lang, words: usize, seconds: f64) {
        self.words[lang.index()] = self.words[lang.index()].saturating_sub(words);
        self.seconds[lang.index()] -= seconds;
    }

    pub(crate) fn words(&self, lang: Lang) -> usize {
        self.words[lang.index()]
    }

    pub(crate) fn seconds(&self, lang: Lang) -> f64 {
        self.seconds[lang.index()]
    }

    pub(crate) fn word_gap(&self) -> usize {
        self.words[0].abs_diff(self.words[1])
    }

    pub(crate) fn seconds_gap(&self) -> f64 {
        (self.seconds[0] - self.seconds[1]).abs()
    }

    pub(crate) fn into_result(self, segments: Vec<MergedSegment>, joiner: &str) -> MergeResult {
        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(joiner);
        MergeResult {
            text,
            primary_lang_words: self.words(Lang::Primary),
            secondary_lang_words: self.words(Lang::Secondary),
            primary_lang_duration: self.seconds(Lang::Primary),
            secondary_lang_duration: self.seconds(Lang::Secondary),
            segments,
        }
    }
}

/// Picks one side of a pair by language.
pub(crate) fn pick<T>(pair: (T, T), lang: Lang) -> T {
    match lang {
        Lang::Primary => pair.0,
        Lang::Secondary => pair.1,
    }
}
