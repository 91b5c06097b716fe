use once_cell::sync::Lazy;
use regex::Regex;

/// Character that opens a slide heading line.
pub const HEADING_MARKER: char = '#';

// A «...» phrase is one token even when it contains spaces.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"«[^»]*»|\S+").expect("token regex"));
static DIVIDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*{3,}|-{3,}").expect("divider regex"));
static WS_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("ws regex"));
static QUOTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""\s*([^"]*?)\s*""#).expect("quoted regex"));
static DIVIDER_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:\*{3,}|-{3,})\s*$").expect("divider line regex"));
static SENTENCE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("sentence end regex"));

pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    TOKEN_RE.find_iter(text).map(|m| m.as_str())
}

pub fn count_words(text: &str) -> usize {
    let text = text.trim();
    if text.is_empty() {
        return 0;
    }
    tokens(text).count()
}

/// Flattens text for timing: divider runs and whitespace runs become single spaces, and the
/// inside of straight double quotes is trimmed.
pub fn normalize_for_timing(text: &str) -> String {
    let text = DIVIDER_RE.replace_all(text, " ");
    let text = WS_RUN_RE.replace_all(&text, " ");
    let text = QUOTED_RE.replace_all(&text, "\"$1\"");
    text.trim().to_string()
}

/// Splits on `.`, `!` or `?` followed by whitespace. The delimiter stays with the sentence it
/// ends; the whitespace is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    for m in SENTENCE_END_RE.find_iter(text) {
        out.push(&text[pos..m.start() + 1]);
        pos = m.end();
    }
    if pos < text.len() {
        out.push(&text[pos..]);
    }
    out
}

pub fn is_divider_line(line: &str) -> bool {
    DIVIDER_LINE_RE.is_match(line)
}

#[inline]
pub fn is_clause_punct(c: char) -> bool {
    matches!(c, ',' | ';' | ':')
}

#[inline]
pub fn is_sentence_end(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

#[cfg(test)]
mod tests {
    use super::{count_words, is_divider_line, normalize_for_timing, split_sentences};

    #[test]
    fn empty_and_blank_count_zero() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("  \n\t "), 0);
    }

    #[test]
    fn counts_whitespace_tokens() {
        assert_eq!(count_words("  one two\nthree\tfour "), 4);
    }

    #[test]
    fn guillemet_phrase_is_one_token() {
        assert_eq!(count_words("Sie sagte «guten Morgen allerseits» laut"), 4);
    }

    #[test]
    fn unclosed_guillemet_falls_back_to_whitespace() {
        assert_eq!(count_words("«open ended text"), 3);
    }

    #[test]
    fn normalize_collapses_dividers_and_quotes() {
        assert_eq!(normalize_for_timing("Intro\n\n***\n\nOutro."), "Intro Outro.");
        assert_eq!(normalize_for_timing("a ------ b"), "a b");
        assert_eq!(
            normalize_for_timing(r#"He said " hi there " ok."#),
            r#"He said "hi there" ok."#
        );
    }

    #[test]
    fn divider_lines() {
        assert!(is_divider_line("---"));
        assert!(is_divider_line("  *****  "));
        assert!(!is_divider_line("--"));
        assert!(!is_divider_line("--- end"));
    }

    #[test]
    fn sentences_keep_their_delimiters() {
        assert_eq!(
            split_sentences("One. Two! Three? tail"),
            vec!["One.", "Two!", "Three?", "tail"]
        );
        assert_eq!(split_sentences("No break.Here."), vec!["No break.Here."]);
    }
}
