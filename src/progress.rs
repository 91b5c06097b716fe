use std::io::{self, Write};
use std::time::Instant;

use crate::config::LangLabels;
use crate::ir::{Lang, MergeResult};

/// Timestamped status lines on stderr. Merged text goes to stdout, so the two never mix.
pub struct ConsoleProgress {
    enabled: bool,
    t0: Instant,
}

impl ConsoleProgress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            t0: Instant::now(),
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if !self.enabled {
            return;
        }
        let ts = fmt_clock(self.t0.elapsed().as_secs_f64());
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "[{ts}] {}", msg.as_ref());
    }

    /// One line per language: words, estimated speaking time and share of the total.
    pub fn totals(&self, result: &MergeResult, labels: &LangLabels) {
        if !self.enabled {
            return;
        }
        let total_secs = result.primary_lang_duration + result.secondary_lang_duration;
        for lang in Lang::BOTH {
            let secs = result.duration(lang);
            let share = if total_secs > 0.0 {
                secs / total_secs * 100.0
            } else {
                0.0
            };
            self.info(format!(
                "{:<10} {:>6} words  {:>8}  ({share:5.1}%)",
                labels.get(lang),
                result.words(lang),
                fmt_clock(secs),
            ));
        }
    }
}

/// `mm:ss`, or `hh:mm:ss` past the hour.
pub fn fmt_clock(seconds: f64) -> String {
    let seconds = seconds.max(0.0).round() as u64;
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}
