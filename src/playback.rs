use serde::Serialize;

use crate::duration::DurationEstimator;
use crate::textutil::{is_divider_line, tokens};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cue {
    pub index: usize,
    pub word: String,
    /// Offset from the start of playback at which this word is revealed.
    pub at_seconds: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CueSchedule {
    pub total_seconds: f64,
    pub interval_seconds: f64,
    pub cues: Vec<Cue>,
}

/// Word-by-word reveal schedule for rehearsing a merged text. Words are spaced evenly across
/// the estimated speaking time; separator lines are not spoken and get no cue.
pub fn build_cues(text: &str, estimator: &DurationEstimator) -> CueSchedule {
    let spoken = text
        .lines()
        .filter(|line| !is_divider_line(line))
        .collect::<Vec<_>>()
        .join("\n");
    let words: Vec<&str> = tokens(&spoken).collect();
    if words.is_empty() {
        return CueSchedule::default();
    }
    let total_seconds = estimator.seconds_for_text(&spoken);
    let interval_seconds = total_seconds / words.len() as f64;
    let cues = words
        .into_iter()
        .enumerate()
        .map(|(index, word)| Cue {
            index,
            word: word.to_string(),
            at_seconds: index as f64 * interval_seconds,
        })
        .collect();
    CueSchedule {
        total_seconds,
        interval_seconds,
        cues,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::build_cues;
    use crate::duration::DurationEstimator;

    #[test]
    fn evenly_spaced_over_estimated_time() {
        let est = DurationEstimator::default();
        // 2 words + clause + sentence end = 5 units = 2s
        let schedule = build_cues("Hello, world.", &est);
        assert_eq!(schedule.cues.len(), 2);
        assert_abs_diff_eq!(schedule.total_seconds, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(schedule.interval_seconds, 1.0, epsilon = 1e-9);
        assert_eq!(schedule.cues[1].word, "world.");
        assert_abs_diff_eq!(schedule.cues[1].at_seconds, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn separator_lines_are_skipped() {
        let est = DurationEstimator::default();
        let schedule = build_cues("One.\n\n---\n\nTwo.", &est);
        let words: Vec<&str> = schedule.cues.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, vec!["One.", "Two."]);
    }

    #[test]
    fn guillemet_phrase_is_one_cue() {
        let est = DurationEstimator::default();
        let schedule = build_cues("Er sagte «bis bald» und ging.", &est);
        assert_eq!(schedule.cues.len(), 5);
        assert_eq!(schedule.cues[2].word, "«bis bald»");
    }

    #[test]
    fn empty_text_has_no_cues() {
        let est = DurationEstimator::default();
        let schedule = build_cues("  \n---\n", &est);
        assert!(schedule.cues.is_empty());
        assert_abs_diff_eq!(schedule.total_seconds, 0.0);
    }
}
