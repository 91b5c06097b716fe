use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::balance::{MergeMode, MergeOptions, MixedPattern, SlideMode};
use crate::duration::{DurationEstimator, PauseWeights, DEFAULT_WPM};
use crate::ir::Lang;

pub const CONFIG_FILENAME: &str = "bilingual-merge.toml";
pub const CONFIG_ENV: &str = "BILINGUAL_MERGE_CONFIG";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub merge: MergeSection,
    #[serde(default)]
    pub languages: LanguagesSection,
    #[serde(default)]
    pub timing: TimingSection,
    #[serde(default)]
    pub validation: ValidationSection,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct MergeSection {
    /// "speech" or "presentation".
    #[serde(default)]
    pub mode: Option<String>,
    /// Role name ("primary"/"secondary") or one of the codes in `[languages]`.
    #[serde(default)]
    pub start_lang: Option<String>,
    #[serde(default)]
    pub block_time_seconds: Option<f64>,
    #[serde(default)]
    pub slide_mode: Option<String>,
    #[serde(default)]
    pub mixed_pattern: Option<String>,
    #[serde(default)]
    pub separator: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct LanguagesSection {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub secondary: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct TimingSection {
    #[serde(default)]
    pub wpm: Option<f64>,
    #[serde(default)]
    pub clause_pause: Option<f64>,
    #[serde(default)]
    pub heading_pause: Option<f64>,
    #[serde(default)]
    pub sentence_pause: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ValidationSection {
    /// Reject mismatched paragraph/slide counts before merging.
    #[serde(default)]
    pub strict: Option<bool>,
}

/// Display names for the two sides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LangLabels {
    pub primary: String,
    pub secondary: String,
}

impl Default for LangLabels {
    fn default() -> Self {
        Self {
            primary: "primary".to_string(),
            secondary: "secondary".to_string(),
        }
    }
}

impl LangLabels {
    pub fn get(&self, lang: Lang) -> &str {
        match lang {
            Lang::Primary => &self.primary,
            Lang::Secondary => &self.secondary,
        }
    }

    /// Role names always work; configured codes match case-insensitively.
    pub fn resolve(&self, s: &str) -> Option<Lang> {
        if let Some(lang) = Lang::parse_role(s) {
            return Some(lang);
        }
        let s = s.trim();
        Lang::BOTH
            .into_iter()
            .find(|&lang| self.get(lang).eq_ignore_ascii_case(s))
    }
}

pub fn find_file_upwards(start_dir: &Path, filename: &str, max_levels: usize) -> Option<PathBuf> {
    let mut dir = start_dir;
    for _ in 0..=max_levels {
        let candidate = dir.join(filename);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
    None
}

pub fn find_default_config(workdir: &Path) -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(p) = find_file_upwards(&cwd, CONFIG_FILENAME, 8) {
            return Some(p);
        }
    }
    if let Some(p) = find_file_upwards(workdir, CONFIG_FILENAME, 8) {
        return Some(p);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            if let Some(p) = find_file_upwards(dir, CONFIG_FILENAME, 4) {
                return Some(p);
            }
        }
    }
    None
}

pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    parse_config(&text).with_context(|| format!("parse config: {}", path.display()))
}

pub fn parse_config(text: &str) -> anyhow::Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(text).context("parse config toml")?;
    Ok(cfg)
}

/// Command-line values that take precedence over the config file.
#[derive(Clone, Debug, Default)]
pub struct SettingsOverrides {
    pub config: Option<PathBuf>,
    pub mode: Option<String>,
    pub start_lang: Option<String>,
    pub block_time_seconds: Option<f64>,
    pub slide_mode: Option<String>,
    pub mixed_pattern: Option<String>,
    pub separator: Option<String>,
    pub wpm: Option<f64>,
    pub lenient: bool,
}

#[derive(Clone, Debug)]
pub struct MergeSettings {
    pub config_path: Option<PathBuf>,
    pub mode: MergeMode,
    pub options: MergeOptions,
    pub estimator: DurationEstimator,
    pub labels: LangLabels,
    pub strict: bool,
}

impl MergeSettings {
    /// Finds and loads the config file (if any), then applies `overrides`.
    pub fn discover(workdir: &Path, overrides: SettingsOverrides) -> anyhow::Result<Self> {
        let cfg_file = overrides
            .config
            .clone()
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
            .or_else(|| find_default_config(workdir));

        let mut file_cfg = AppConfig::default();
        if let Some(p) = cfg_file.as_ref() {
            if p.exists() {
                file_cfg = load_config(p)?;
            } else if overrides.config.is_some() {
                return Err(anyhow!("config not found: {}", p.display()));
            }
        }
        Self::from_config(&file_cfg, cfg_file.filter(|p| p.exists()), overrides)
    }

    pub fn from_config(
        file_cfg: &AppConfig,
        config_path: Option<PathBuf>,
        overrides: SettingsOverrides,
    ) -> anyhow::Result<Self> {
        let merge = &file_cfg.merge;
        let defaults = MergeOptions::default();

        let labels = LangLabels {
            primary: non_empty(file_cfg.languages.primary.as_deref())
                .unwrap_or_else(|| LangLabels::default().primary),
            secondary: non_empty(file_cfg.languages.secondary.as_deref())
                .unwrap_or_else(|| LangLabels::default().secondary),
        };

        let mode = MergeMode::parse(overrides.mode.as_deref().or(merge.mode.as_deref()));
        let slide_mode =
            SlideMode::parse(overrides.slide_mode.as_deref().or(merge.slide_mode.as_deref()));
        let mixed_pattern = MixedPattern::parse(
            overrides
                .mixed_pattern
                .as_deref()
                .or(merge.mixed_pattern.as_deref()),
        );

        let start_lang = match overrides.start_lang.as_deref().or(merge.start_lang.as_deref()) {
            None => defaults.start_lang,
            Some(s) => labels.resolve(s).ok_or_else(|| {
                anyhow!(
                    "unknown start language {s:?} (expected primary, secondary, {}, or {})",
                    labels.primary,
                    labels.secondary
                )
            })?,
        };

        let block_time_seconds = overrides
            .block_time_seconds
            .or(merge.block_time_seconds)
            .unwrap_or(defaults.block_time_seconds);
        if !block_time_seconds.is_finite() || block_time_seconds < 0.0 {
            return Err(anyhow!(
                "block_time_seconds must be a non-negative number, got {block_time_seconds}"
            ));
        }

        let separator = overrides
            .separator
            .or_else(|| merge.separator.clone())
            .unwrap_or(defaults.separator);

        let timing = &file_cfg.timing;
        let wpm = overrides.wpm.or(timing.wpm).unwrap_or(DEFAULT_WPM);
        if !wpm.is_finite() || wpm <= 0.0 {
            return Err(anyhow!("wpm must be a positive number, got {wpm}"));
        }
        let base = PauseWeights::default();
        let pauses = PauseWeights {
            word: base.word,
            clause: timing.clause_pause.unwrap_or(base.clause),
            heading: timing.heading_pause.unwrap_or(base.heading),
            sentence_end: timing.sentence_pause.unwrap_or(base.sentence_end),
        };

        let strict = !overrides.lenient && file_cfg.validation.strict.unwrap_or(true);

        Ok(Self {
            config_path,
            mode,
            options: MergeOptions {
                start_lang,
                block_time_seconds,
                slide_mode,
                mixed_pattern,
                separator,
            },
            estimator: DurationEstimator::new(wpm, pauses),
            labels,
            strict,
        })
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub fn init_default_config(dir: &Path, force: bool) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create config dir: {}", dir.display()))?;
    let cfg_path = dir.join(CONFIG_FILENAME);
    if cfg_path.exists() && !force {
        return Ok(cfg_path);
    }
    std::fs::write(&cfg_path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("write config: {}", cfg_path.display()))?;
    Ok(cfg_path)
}

pub const DEFAULT_CONFIG_TOML: &str = r##"[merge]
# "speech": one interleaved script. "presentation": slide by slide (slides start at "#" lines).
mode = "speech"
# "primary", "secondary", or one of the codes under [languages].
start_lang = "primary"
# Speech mode: target seconds in one language before switching.
block_time_seconds = 45
# Presentation mode: "single" (whole slide per language) or "mixed" (split inside a slide).
slide_mode = "mixed"
# Mixed mode: "alternating" (next slide continues the language the last one ended on)
# or "repeating" (every slide leads with start_lang).
mixed_pattern = "alternating"
# Marker line placed between merged paragraphs/slides.
separator = "---"

[languages]
primary = "EN"
secondary = "DE"

[timing]
wpm = 150
# Extra word-equivalents for a trailing , ; or :
clause_pause = 1
# Extra word-equivalents for a standalone "#" heading marker.
heading_pause = 2
# Extra word-equivalents at the end of a sentence (. ! ?).
sentence_pause = 2

[validation]
# Refuse to merge when paragraph or slide counts differ between the two texts.
strict = true
"##;
