use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::{Paragraph, Slide};
use crate::textutil::count_words;

static BLANK_LINES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n(?:[ \t\f\v]*\n)+").expect("blank lines regex"));
static HEADING_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*#").expect("heading line regex"));

pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Blank-line delimited blocks, trimmed, empties dropped. Order is the pairing key across
/// languages.
pub fn parse_paragraphs(text: &str) -> Vec<String> {
    let text = normalize_newlines(text);
    BLANK_LINES_RE
        .split(&text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn paragraphs_from_text(text: &str) -> Vec<Paragraph> {
    parse_paragraphs(text)
        .into_iter()
        .map(|text| {
            let word_count = count_words(&text);
            Paragraph { text, word_count }
        })
        .collect()
}

/// Slides start at heading lines. Lines before the first heading belong to no slide, and a
/// text without headings yields no slides at all.
pub fn parse_slides(text: &str) -> Vec<Slide> {
    let text = normalize_newlines(text);
    let mut slides = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.split('\n') {
        if HEADING_LINE_RE.is_match(line) {
            if let Some((title, body)) = current.take() {
                slides.push(build_slide(title, &body));
            }
            current = Some((line.trim().to_string(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((title, body)) = current {
        slides.push(build_slide(title, &body));
    }
    slides
}

fn build_slide(title: String, body_lines: &[&str]) -> Slide {
    let body = body_lines.join("\n").trim().to_string();
    let paragraphs = parse_paragraphs(&body);
    let word_count = paragraphs.iter().map(|p| count_words(p)).sum();
    Slide {
        title,
        body,
        paragraphs,
        word_count,
    }
}

#[cfg(test)]
mod tests {
    use super::{paragraphs_from_text, parse_paragraphs, parse_slides};

    #[test]
    fn splits_on_blank_lines() {
        assert_eq!(parse_paragraphs("A\n\nB\n\nC"), vec!["A", "B", "C"]);
    }

    #[test]
    fn irregular_blank_runs_and_whitespace_lines() {
        assert_eq!(parse_paragraphs("A\n\n\n\nB"), vec!["A", "B"]);
        assert_eq!(parse_paragraphs("A\n   \t\nB\n \n \nC"), vec!["A", "B", "C"]);
        assert_eq!(parse_paragraphs("\n\n  A  \n\n"), vec!["A"]);
    }

    #[test]
    fn single_newlines_stay_inside_a_paragraph() {
        assert_eq!(
            parse_paragraphs("line one\nline two\n\nnext"),
            vec!["line one\nline two", "next"]
        );
    }

    #[test]
    fn windows_and_old_mac_line_endings() {
        assert_eq!(parse_paragraphs("A\r\n\r\nB\r\rC"), vec!["A", "B", "C"]);
    }

    #[test]
    fn empty_input_has_no_paragraphs() {
        assert!(parse_paragraphs("").is_empty());
        assert!(parse_paragraphs(" \n\n \n").is_empty());
    }

    #[test]
    fn segmentation_is_idempotent() {
        let text = "First para\nstill first.\n\n\n   \nSecond.\n\nThird «a b»  \n\n";
        let once = parse_paragraphs(text);
        let twice = parse_paragraphs(&once.join("\n\n"));
        assert_eq!(once, twice);
    }

    #[test]
    fn paragraphs_carry_word_counts() {
        let paras = paragraphs_from_text("one two\n\nthree «four five»");
        assert_eq!(paras.len(), 2);
        assert_eq!(paras[0].word_count, 2);
        assert_eq!(paras[1].word_count, 2);
    }

    #[test]
    fn two_headings_make_two_slides() {
        let text = "# Welcome\nHello there.\n\nSecond para here.\n  # Next\nOnly one.\n";
        let slides = parse_slides(text);
        assert_eq!(slides.len(), 2);

        assert_eq!(slides[0].title, "# Welcome");
        assert_eq!(slides[0].body, "Hello there.\n\nSecond para here.");
        assert_eq!(slides[0].paragraphs, vec!["Hello there.", "Second para here."]);
        assert_eq!(slides[0].word_count, 5);

        assert_eq!(slides[1].title, "# Next");
        assert_eq!(slides[1].paragraphs, vec!["Only one."]);
        assert_eq!(slides[1].word_count, 2);
    }

    #[test]
    fn no_heading_means_no_slides() {
        assert!(parse_slides("Just text.\n\nMore text.").is_empty());
        assert!(parse_slides("").is_empty());
    }

    #[test]
    fn preamble_before_first_heading_is_dropped() {
        let slides = parse_slides("stray line\n# Only\nbody");
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].body, "body");
    }

    #[test]
    fn heading_without_body() {
        let slides = parse_slides("# A\n# B\ntext");
        assert_eq!(slides.len(), 2);
        assert!(slides[0].body.is_empty());
        assert!(slides[0].paragraphs.is_empty());
        assert_eq!(slides[0].word_count, 0);
    }
}
