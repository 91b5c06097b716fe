use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use bilingual_merge::balance::{merge_documents, MergeMode};
use bilingual_merge::config::{init_default_config, MergeSettings, SettingsOverrides};
use bilingual_merge::playback::build_cues;
use bilingual_merge::progress::{fmt_clock, ConsoleProgress};
use bilingual_merge::segment::paragraphs_from_text;
use bilingual_merge::validation::{validate_presentation, validate_speech};

#[derive(Parser, Debug)]
#[command(name = "bilingual-merge")]
#[command(about = "Merge two language versions of a talk into one balanced bilingual script", long_about = None)]
struct Args {
    /// Generate a default config file, then exit
    #[arg(long)]
    init_config: bool,

    /// Directory to write the config file (default: current directory)
    #[arg(long, value_name = "DIR")]
    init_config_dir: Option<PathBuf>,

    /// Overwrite an existing config file when used with --init-config
    #[arg(long)]
    force: bool,

    /// Print word counts and duration estimates for one text file, then exit
    #[arg(long, value_name = "FILE")]
    count: Option<PathBuf>,

    /// Primary-language text (paragraphs separated by blank lines; slides start with #)
    #[arg(value_name = "PRIMARY")]
    primary: Option<PathBuf>,

    /// Secondary-language text, same structure as PRIMARY
    #[arg(value_name = "SECONDARY")]
    secondary: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// speech | presentation
    #[arg(long)]
    mode: Option<String>,

    /// primary | secondary | a language code from the config
    #[arg(long)]
    start_lang: Option<String>,

    /// Speech mode: seconds to stay in one language before switching
    #[arg(long, value_name = "SECS")]
    block_time: Option<f64>,

    /// Presentation mode: single | mixed
    #[arg(long)]
    slide_mode: Option<String>,

    /// Mixed presentation mode: alternating | repeating
    #[arg(long)]
    pattern: Option<String>,

    /// Marker line placed between merged segments
    #[arg(long)]
    separator: Option<String>,

    /// Speaking rate in words per minute
    #[arg(long)]
    wpm: Option<f64>,

    /// Config file path (default: search for bilingual-merge.toml upwards)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Merge even when paragraph/slide counts differ
    #[arg(long)]
    lenient: bool,

    /// Write the merge result (text, totals, segments) as JSON
    #[arg(long, value_name = "JSON")]
    summary_json: Option<PathBuf>,

    /// Write a word-by-word rehearsal cue schedule as JSON
    #[arg(long, value_name = "JSON")]
    cues_json: Option<PathBuf>,

    /// No status lines on stderr
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let progress = ConsoleProgress::new(!args.quiet);

    if args.init_config {
        let dir = args
            .init_config_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let cfg_path = init_default_config(&dir, args.force).context("init default config")?;
        eprintln!("Wrote config: {}", cfg_path.display());
        return Ok(());
    }

    let overrides = SettingsOverrides {
        config: args.config.clone(),
        mode: args.mode.clone(),
        start_lang: args.start_lang.clone(),
        block_time_seconds: args.block_time,
        slide_mode: args.slide_mode.clone(),
        mixed_pattern: args.pattern.clone(),
        separator: args.separator.clone(),
        wpm: args.wpm,
        lenient: args.lenient,
    };

    if let Some(path) = args.count.as_ref() {
        let settings = MergeSettings::discover(&workdir_of(path), overrides)?;
        return print_counts(path, &settings);
    }

    let (primary_path, secondary_path) = match (args.primary.as_ref(), args.secondary.as_ref()) {
        (Some(p), Some(s)) => (p, s),
        _ => {
            let mut cmd = Args::command();
            cmd.print_help().context("print help")?;
            eprintln!(
                "\n\nUSAGE:\n  bilingual-merge <primary.txt> <secondary.txt> [-o merged.md]\n\nTIPS:\n  - Slides for --mode presentation start with a line beginning with #.\n  - Default config search: bilingual-merge.toml (upwards), or set BILINGUAL_MERGE_CONFIG.\n"
            );
            return Ok(());
        }
    };

    let settings = MergeSettings::discover(&workdir_of(primary_path), overrides)
        .context("build settings")?;
    if let Some(p) = settings.config_path.as_ref() {
        progress.info(format!("config: {}", p.display()));
    }

    let primary = read_text(primary_path)?;
    let secondary = read_text(secondary_path)?;

    if settings.strict {
        let checked = match settings.mode {
            MergeMode::Speech => validate_speech(&primary, &secondary),
            MergeMode::Presentation => {
                validate_presentation(&primary, &secondary, settings.options.slide_mode)
            }
        };
        checked.context("inputs rejected (pass --lenient to merge anyway)")?;
    }

    progress.info(format!(
        "merging {:?} ({}, start={})",
        settings.mode,
        match settings.mode {
            MergeMode::Speech => format!("block={}s", settings.options.block_time_seconds),
            MergeMode::Presentation => format!(
                "{:?}/{:?}",
                settings.options.slide_mode, settings.options.mixed_pattern
            ),
        },
        settings.labels.get(settings.options.start_lang),
    ));
    let result = merge_documents(
        &primary,
        &secondary,
        settings.mode,
        &settings.options,
        &settings.estimator,
    );
    if result.segments.is_empty() {
        progress.info("nothing to merge: both inputs are empty or have no slides");
    }
    progress.totals(&result, &settings.labels);

    match args.output.as_ref() {
        Some(out) => {
            std::fs::write(out, format!("{}\n", result.text))
                .with_context(|| format!("write output: {}", out.display()))?;
            progress.info(format!("wrote {}", out.display()));
        }
        None => println!("{}", result.text),
    }

    if let Some(path) = args.summary_json.as_ref() {
        std::fs::write(
            path,
            serde_json::to_vec_pretty(&result).context("serialize merge result json")?,
        )
        .with_context(|| format!("write summary json: {}", path.display()))?;
    }

    if let Some(path) = args.cues_json.as_ref() {
        let cues = build_cues(&result.text, &settings.estimator);
        std::fs::write(
            path,
            serde_json::to_vec_pretty(&cues).context("serialize cue json")?,
        )
        .with_context(|| format!("write cues json: {}", path.display()))?;
        progress.info(format!(
            "cues: {} words over {}",
            cues.cues.len(),
            fmt_clock(cues.total_seconds)
        ));
    }
    Ok(())
}

fn workdir_of(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read input: {}", path.display()))?;
    Ok(text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text))
}

fn print_counts(path: &Path, settings: &MergeSettings) -> anyhow::Result<()> {
    let text = read_text(path)?;
    let est = &settings.estimator;
    let paragraphs = paragraphs_from_text(&text);
    let mut words = 0usize;
    let mut secs = 0.0;
    for (idx, p) in paragraphs.iter().enumerate() {
        let s = est.seconds_for_text(&p.text);
        words += p.word_count;
        secs += s;
        println!("{:>4}  {:>6} words  {:>7.1}s", idx + 1, p.word_count, s);
    }
    println!(
        "total {} paragraphs, {} words, {:.1}s at plain rate, {:.1}s with pauses",
        paragraphs.len(),
        words,
        est.seconds_for_words(words),
        secs
    );
    Ok(())
}
