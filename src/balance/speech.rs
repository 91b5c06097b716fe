use tracing::debug;

use super::{pick, LangTotals, MergeOptions, TimedText};
use crate::duration::DurationEstimator;
use crate::ir::{Lang, MergeResult, MergedSegment};
use crate::segment::parse_paragraphs;

const FALLBACK_PARAGRAPH_SECONDS: f64 = 5.0;
const FORCE_SWITCH_PENALTY: f64 = 1_000_000.0;
const OFF_STREAK_WEIGHT: usize = 2;

fn timed_paragraphs(text: &str, estimator: &DurationEstimator) -> Vec<TimedText> {
    parse_paragraphs(text)
        .into_iter()
        .map(|p| TimedText::new(p, estimator))
        .collect()
}

/// How many same-language paragraphs make one block before a switch is due.
fn target_streak(
    sides: &[Vec<TimedText>; 2],
    total_pairs: usize,
    block_time_seconds: f64,
) -> usize {
    let count = sides[0].len() + sides[1].len();
    let avg = if count == 0 {
        FALLBACK_PARAGRAPH_SECONDS
    } else {
        let sum: f64 = sides.iter().flatten().map(|p| p.seconds).sum();
        sum / count as f64
    };
    let avg = if avg > 0.0 { avg } else { FALLBACK_PARAGRAPH_SECONDS };
    let max_allowed = (total_pairs / 2).max(1);
    let raw = (block_time_seconds / avg).round();
    let raw = if raw.is_finite() && raw > 0.0 { raw as usize } else { 0 };
    raw.clamp(1, max_allowed.max(2))
}

#[derive(Default)]
struct WalkState {
    totals: LangTotals,
    streak: Option<(Lang, usize)>,
}

impl WalkState {
    fn score(&self, lang: Lang, words: (usize, usize), target: usize) -> f64 {
        let w = pick(words, lang);
        if w == 0 {
            return f64::INFINITY;
        }
        let mine = (self.totals.words(lang) + w) as f64;
        let theirs = self.totals.words(lang.other()) as f64;
        let mut score = (mine - theirs).abs();
        if let Some((streak_lang, len)) = self.streak {
            if len >= target {
                if streak_lang == lang {
                    score += FORCE_SWITCH_PENALTY;
                }
            } else if streak_lang != lang {
                score += ((target - len) * OFF_STREAK_WEIGHT) as f64;
            }
        }
        score
    }

    fn choose(&self, words: (usize, usize), target: usize, start: Lang) -> Lang {
        let sp = self.score(Lang::Primary, words, target);
        let ss = self.score(Lang::Secondary, words, target);
        if sp < ss {
            return Lang::Primary;
        }
        if ss < sp {
            return Lang::Secondary;
        }
        let wp = self.totals.words(Lang::Primary);
        let ws = self.totals.words(Lang::Secondary);
        let behind = match wp.cmp(&ws) {
            std::cmp::Ordering::Less => Some(Lang::Primary),
            std::cmp::Ordering::Greater => Some(Lang::Secondary),
            std::cmp::Ordering::Equal => None,
        };
        match behind {
            Some(lang) if pick(words, lang) > 0 => lang,
            _ if pick(words, start) > 0 => start,
            _ => start.other(),
        }
    }

    fn commit(&mut self, lang: Lang, words: usize, seconds: f64) {
        self.totals.add(lang, words, seconds);
        self.streak = match self.streak {
            Some((l, n)) if l == lang => Some((l, n + 1)),
            _ => Some((lang, 1)),
        };
    }
}

/// Interleaves two paragraph sequences into one speech script, switching language in blocks
/// of roughly `block_time_seconds` while keeping cumulative word counts close.
pub fn merge_speech(
    primary: &str,
    secondary: &str,
    options: &MergeOptions,
    estimator: &DurationEstimator,
) -> MergeResult {
    let sides = [
        timed_paragraphs(primary, estimator),
        timed_paragraphs(secondary, estimator),
    ];
    let total_pairs = sides[0].len().max(sides[1].len());
    let target = target_streak(&sides, total_pairs, options.block_time_seconds);
    debug!(total_pairs, target, "speech walk start");

    let at = |lang: Lang, idx: usize| sides[lang.index()].get(idx);
    let words_at = |lang: Lang, idx: usize| at(lang, idx).map_or(0, |p| p.words);

    let mut state = WalkState::default();
    let mut picks: Vec<(usize, Lang)> = Vec::with_capacity(total_pairs);
    for idx in 0..total_pairs {
        let words = (words_at(Lang::Primary, idx), words_at(Lang::Secondary, idx));
        if words == (0, 0) {
            continue;
        }
        let lang = if picks.is_empty() && pick(words, options.start_lang) > 0 {
            options.start_lang
        } else {
            state.choose(words, target, options.start_lang)
        };
        let seconds = at(lang, idx).map_or(0.0, |p| p.seconds);
        state.commit(lang, pick(words, lang), seconds);
        debug!(idx, %lang, streak = ?state.streak, "paragraph chosen");
        picks.push((idx, lang));
    }

    let mut totals = state.totals;
    if let Some(last) = picks.last_mut() {
        let (idx, lang) = *last;
        if let (Some(cur), Some(alt)) = (at(lang, idx), at(lang.other(), idx)) {
            let mut swapped = totals;
            swapped.remove(lang, cur.words, cur.seconds);
            swapped.add(lang.other(), alt.words, alt.seconds);
            if swapped.word_gap() < totals.word_gap() {
                debug!(idx, from = %lang, "final paragraph swapped for balance");
                totals = swapped;
                last.1 = lang.other();
            }
        }
    }

    let segments = picks
        .into_iter()
        .filter_map(|(position, lang)| {
            at(lang, position).map(|p| MergedSegment {
                position,
                lang,
                text: p.text.clone(),
            })
        })
        .collect();
    totals.into_result(segments, &options.joiner())
}
