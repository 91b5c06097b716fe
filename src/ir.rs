use std::fmt;

use serde::{Deserialize, Serialize};

/// One side of a bilingual document pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lang {
    Primary,
    Secondary,
}

impl Lang {
    pub const BOTH: [Lang; 2] = [Lang::Primary, Lang::Secondary];

    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Primary => Self::Secondary,
            Self::Secondary => Self::Primary,
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
        }
    }

    /// Parses a role name. Language codes are resolved by the config layer.
    pub fn parse_role(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" | "first" | "a" => Some(Self::Primary),
            "secondary" | "second" | "b" => Some(Self::Secondary),
            _ => None,
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Secondary => f.write_str("secondary"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub word_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    pub body: String,
    pub paragraphs: Vec<String>,
    pub word_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MergedSegment {
    /// Ordinal input position (paragraph or slide index) this segment came from.
    pub position: usize,
    /// Language the segment leads with.
    pub lang: Lang,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeResult {
    pub text: String,
    pub primary_lang_words: usize,
    pub secondary_lang_words: usize,
    pub primary_lang_duration: f64,
    pub secondary_lang_duration: f64,
    pub segments: Vec<MergedSegment>,
}

impl MergeResult {
    #[must_use]
    pub fn words(&self, lang: Lang) -> usize {
        match lang {
            Lang::Primary => self.primary_lang_words,
            Lang::Secondary => self.secondary_lang_words,
        }
    }

    #[must_use]
    pub fn duration(&self, lang: Lang) -> f64 {
        match lang {
            Lang::Primary => self.primary_lang_duration,
            Lang::Secondary => self.secondary_lang_duration,
        }
    }

    #[must_use]
    pub fn total_words(&self) -> usize {
        self.primary_lang_words + self.secondary_lang_words
    }
}
