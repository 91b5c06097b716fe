use tracing::{debug, trace};

use super::{pick, LangTotals, MergeOptions, MixedPattern, SlideMode, TimedText};
use crate::duration::DurationEstimator;
use crate::ir::{Lang, MergeResult, MergedSegment};
use crate::segment::parse_slides;

const EPS: f64 = 1e-9;
const SEARCH_BUDGET_PER_SLIDE: usize = 4;

struct TimedSlide {
    title: String,
    title_seconds: f64,
    body: String,
    paragraphs: Vec<TimedText>,
    words: usize,
}

impl TimedSlide {
    fn seconds(&self) -> f64 {
        self.title_seconds + self.paragraphs.iter().map(|p| p.seconds).sum::<f64>()
    }

    fn render(&self) -> String {
        if self.body.is_empty() {
            self.title.clone()
        } else {
            format!("{}\n\n{}", self.title, self.body)
        }
    }
}

fn timed_slides(text: &str, estimator: &DurationEstimator) -> Vec<TimedSlide> {
    parse_slides(text)
        .into_iter()
        .map(|s| TimedSlide {
            title_seconds: estimator.seconds_for_text(&s.title),
            paragraphs: s
                .paragraphs
                .into_iter()
                .map(|p| TimedText::new(p, estimator))
                .collect(),
            words: s.word_count,
            title: s.title,
            body: s.body,
        })
        .collect()
}

/// Both language versions of the slide at one ordinal position.
struct SlidePair<'a> {
    position: usize,
    primary: Option<&'a TimedSlide>,
    secondary: Option<&'a TimedSlide>,
}

impl<'a> SlidePair<'a> {
    fn side(&self, lang: Lang) -> Option<&'a TimedSlide> {
        pick((self.primary, self.secondary), lang)
    }

    fn para(&self, lang: Lang, idx: usize) -> Option<&'a TimedText> {
        self.side(lang).and_then(|s| s.paragraphs.get(idx))
    }

    fn side_or_other(&self, lang: Lang) -> Option<(Lang, &'a TimedSlide)> {
        self.side(lang)
            .map(|s| (lang, s))
            .or_else(|| self.side(lang.other()).map(|s| (lang.other(), s)))
    }

    fn para_or_other(&self, lang: Lang, idx: usize) -> Option<(Lang, &'a TimedText)> {
        self.para(lang, idx)
            .map(|p| (lang, p))
            .or_else(|| self.para(lang.other(), idx).map(|p| (lang.other(), p)))
    }

    fn para_count(&self) -> usize {
        let count = |s: Option<&TimedSlide>| s.map_or(0, |s| s.paragraphs.len());
        count(self.primary).max(count(self.secondary))
    }
}

fn pair_slides<'a>(primary: &'a [TimedSlide], secondary: &'a [TimedSlide]) -> Vec<SlidePair<'a>> {
    (0..primary.len().max(secondary.len()))
        .map(|position| SlidePair {
            position,
            primary: primary.get(position),
            secondary: secondary.get(position),
        })
        .filter(|p| p.primary.is_some() || p.secondary.is_some())
        .collect()
}

/// Produces slide-by-slide merged output, either whole slides per language or each slide
/// split between the languages at a cut point tuned to even out speaking time.
pub fn merge_presentation(
    primary: &str,
    secondary: &str,
    options: &MergeOptions,
    estimator: &DurationEstimator,
) -> MergeResult {
    let primary = timed_slides(primary, estimator);
    let secondary = timed_slides(secondary, estimator);
    let pairs = pair_slides(&primary, &secondary);
    debug!(slides = pairs.len(), mode = ?options.slide_mode, "presentation merge start");
    match options.slide_mode {
        SlideMode::Single => merge_single(&pairs, options),
        SlideMode::Mixed => merge_mixed(&pairs, options),
    }
}

fn merge_single(pairs: &[SlidePair<'_>], options: &MergeOptions) -> MergeResult {
    let mut totals = LangTotals::default();
    let mut picks: Vec<(&SlidePair<'_>, Lang)> = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let leading = if pair.position % 2 == 0 {
            options.start_lang
        } else {
            options.start_lang.other()
        };
        if let Some((lang, slide)) = pair.side_or_other(leading) {
            totals.add(lang, slide.words, slide.seconds());
            picks.push((pair, lang));
        }
    }

    if let Some(last) = picks.last_mut() {
        let (pair, lang) = *last;
        if let (Some(cur), Some(alt)) = (pair.side(lang), pair.side(lang.other())) {
            let mut swapped = totals;
            swapped.remove(lang, cur.words, cur.seconds());
            swapped.add(lang.other(), alt.words, alt.seconds());
            if swapped.word_gap() < totals.word_gap() {
                debug!(position = pair.position, from = %lang, "final slide swapped for balance");
                totals = swapped;
                last.1 = lang.other();
            }
        }
    }

    let segments = picks
        .into_iter()
        .filter_map(|(pair, lang)| {
            pair.side(lang).map(|slide| MergedSegment {
                position: pair.position,
                lang,
                text: slide.render(),
            })
        })
        .collect();
    totals.into_result(segments, &options.joiner())
}

/// Paragraphs before the cut lead, the rest trail. One-paragraph slides are not split.
fn default_cut(para_count: usize) -> usize {
    if para_count <= 1 {
        para_count
    } else {
        para_count.div_ceil(2).clamp(1, para_count - 1)
    }
}

struct PlannedSlide<'a> {
    position: usize,
    lead: Lang,
    title: &'a str,
    parts: Vec<(Lang, &'a str)>,
}

impl PlannedSlide<'_> {
    fn render(&self) -> String {
        let mut blocks = Vec::with_capacity(self.parts.len() + 1);
        blocks.push(self.title);
        blocks.extend(self.parts.iter().map(|(_, text)| *text));
        blocks.join("\n\n")
    }
}

struct Plan<'a> {
    slides: Vec<PlannedSlide<'a>>,
    totals: LangTotals,
}

impl Plan<'_> {
    fn gap(&self) -> f64 {
        self.totals.seconds_gap()
    }
}

fn build_plan<'a>(pairs: &[SlidePair<'a>], cuts: &[usize], options: &MergeOptions) -> Plan<'a> {
    let mut totals = LangTotals::default();
    let mut slides = Vec::with_capacity(pairs.len());
    let mut ended_on = options.start_lang;

    for (pair, &cut) in pairs.iter().zip(cuts) {
        let lead = match options.mixed_pattern {
            MixedPattern::Repeating => options.start_lang,
            MixedPattern::Alternating => ended_on,
        };

        let Some((title_lang, title_slide)) = pair.side_or_other(lead) else {
            continue;
        };
        totals.add(title_lang, 0, title_slide.title_seconds);

        let mut parts: Vec<(Lang, &'a str)> = Vec::new();
        for idx in 0..pair.para_count() {
            let planned = if idx < cut { lead } else { lead.other() };
            if let Some((lang, para)) = pair.para_or_other(planned, idx) {
                totals.add(lang, para.words, para.seconds);
                parts.push((lang, para.text.as_str()));
            }
        }

        if let Some(&(only, _)) = parts.first() {
            if parts.iter().all(|(lang, _)| *lang == only) {
                let missing = only.other();
                if let Some(para) = pair.side(missing).and_then(|s| s.paragraphs.last()) {
                    totals.add(missing, para.words, para.seconds);
                    parts.push((missing, para.text.as_str()));
                }
            }
        }

        ended_on = parts.last().map_or(title_lang, |(lang, _)| *lang);
        slides.push(PlannedSlide {
            position: pair.position,
            lead,
            title: title_slide.title.as_str(),
            parts,
        });
    }

    Plan { slides, totals }
}

fn merge_mixed(pairs: &[SlidePair<'_>], options: &MergeOptions) -> MergeResult {
    let mut cuts: Vec<usize> = pairs.iter().map(|p| default_cut(p.para_count())).collect();
    let mut best = build_plan(pairs, &cuts, options);
    let budget = SEARCH_BUDGET_PER_SLIDE * pairs.len();

    for round in 0..budget {
        let mut best_move: Option<(usize, usize, Plan<'_>)> = None;
        for (slot, pair) in pairs.iter().enumerate() {
            let para_count = pair.para_count();
            if para_count <= 1 {
                continue;
            }
            let current = cuts[slot];
            for candidate in [current.saturating_sub(1), current + 1] {
                if candidate == current || candidate < 1 || candidate > para_count - 1 {
                    continue;
                }
                let mut trial = cuts.clone();
                trial[slot] = candidate;
                let plan = build_plan(pairs, &trial, options);
                trace!(round, slot, candidate, gap = plan.gap(), "cut candidate");
                let to_beat = best_move
                    .as_ref()
                    .map_or(best.gap() - EPS, |(_, _, p)| p.gap());
                if plan.gap() < to_beat {
                    best_move = Some((slot, candidate, plan));
                }
            }
        }
        let Some((slot, cut, plan)) = best_move else {
            break;
        };
        debug!(round, slot, cut, gap = plan.gap(), "cut moved");
        cuts[slot] = cut;
        best = plan;
    }

    let segments = best
        .slides
        .iter()
        .map(|s| MergedSegment {
            position: s.position,
            lang: s.lead,
            text: s.render(),
        })
        .collect();
    best.totals.into_result(segments, &options.joiner())
}
