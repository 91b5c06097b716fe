use serde::{Deserialize, Serialize};

use crate::ir::Lang;

pub const DEFAULT_BLOCK_TIME_SECONDS: f64 = 45.0;
pub const DEFAULT_SEPARATOR: &str = "---";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    #[default]
    Speech,
    Presentation,
}

impl MergeMode {
    pub fn parse(s: Option<&str>) -> Self {
        match s.unwrap_or("speech").trim().to_ascii_lowercase().as_str() {
            "presentation" | "slides" => Self::Presentation,
            _ => Self::Speech,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideMode {
    /// Whole slide in one language.
    Single,
    /// Slide split between the languages at a cut point.
    #[default]
    Mixed,
}

impl SlideMode {
    pub fn parse(s: Option<&str>) -> Self {
        match s.unwrap_or("mixed").trim().to_ascii_lowercase().as_str() {
            "single" => Self::Single,
            _ => Self::Mixed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixedPattern {
    /// Each slide leads with the language the previous slide ended on.
    #[default]
    Alternating,
    /// Every slide leads with the start language.
    Repeating,
}

impl MixedPattern {
    pub fn parse(s: Option<&str>) -> Self {
        match s.unwrap_or("alternating").trim().to_ascii_lowercase().as_str() {
            "repeating" | "same" => Self::Repeating,
            _ => Self::Alternating,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    pub start_lang: Lang,
    pub block_time_seconds: f64,
    pub slide_mode: SlideMode,
    pub mixed_pattern: MixedPattern,
    /// Marker line placed between merged segments.
    pub separator: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            start_lang: Lang::Primary,
            block_time_seconds: DEFAULT_BLOCK_TIME_SECONDS,
            slide_mode: SlideMode::default(),
            mixed_pattern: MixedPattern::default(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl MergeOptions {
    /// Full joiner placed between segments, the marker on its own line.
    #[must_use]
    pub fn joiner(&self) -> String {
        let marker = self.separator.trim();
        if marker.is_empty() {
            "\n\n".to_string()
        } else {
            format!("\n\n{marker}\n\n")
        }
    }
}
