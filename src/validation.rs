use anyhow::anyhow;

use crate::balance::SlideMode;
use crate::ir::Lang;
use crate::segment::{parse_paragraphs, parse_slides};

// Strict pre-merge checks. The balancers never call these; they merge mismatched inputs on a
// best-effort basis.

pub fn validate_speech(primary: &str, secondary: &str) -> anyhow::Result<()> {
    let mut issues: Vec<String> = Vec::new();
    let counts = [parse_paragraphs(primary).len(), parse_paragraphs(secondary).len()];
    for lang in Lang::BOTH {
        if counts[lang.index()] == 0 {
            issues.push(format!("{lang} text is empty"));
        }
    }
    if counts[0] > 0 && counts[1] > 0 && counts[0] != counts[1] {
        issues.push(format!(
            "paragraph count mismatch: primary={} secondary={}",
            counts[0], counts[1]
        ));
    }
    into_result(issues)
}

pub fn validate_presentation(
    primary: &str,
    secondary: &str,
    slide_mode: SlideMode,
) -> anyhow::Result<()> {
    let mut issues: Vec<String> = Vec::new();
    let slides = [parse_slides(primary), parse_slides(secondary)];
    for lang in Lang::BOTH {
        if slides[lang.index()].is_empty() {
            issues.push(format!("{lang} text has no slides (no lines starting with #)"));
        }
    }
    let (p, s) = (&slides[0], &slides[1]);
    if !p.is_empty() && !s.is_empty() {
        if p.len() != s.len() {
            issues.push(format!(
                "slide count mismatch: primary={} secondary={}",
                p.len(),
                s.len()
            ));
        }
        if slide_mode == SlideMode::Mixed {
            for (idx, (ps, ss)) in p.iter().zip(s.iter()).enumerate() {
                if ps.paragraphs.len() != ss.paragraphs.len() {
                    issues.push(format!(
                        "slide {} ({}) paragraph count mismatch: primary={} secondary={}",
                        idx + 1,
                        ps.title,
                        ps.paragraphs.len(),
                        ss.paragraphs.len()
                    ));
                }
            }
        }
    }
    into_result(issues)
}

fn into_result(issues: Vec<String>) -> anyhow::Result<()> {
    if issues.is_empty() {
        return Ok(());
    }
    Err(anyhow!("input validation failed:\n  - {}", issues.join("\n  - ")))
}
