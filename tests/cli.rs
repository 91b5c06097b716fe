use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).expect("write fixture");
    path
}

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bilingual-merge").expect("binary");
    cmd.current_dir(dir.path())
        .env("BILINGUAL_MERGE_CONFIG", dir.path().join("absent.toml"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn no_inputs_prints_help() {
    let dir = TempDir::new().expect("tempdir");
    cmd(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn speech_merge_to_stdout() {
    let dir = TempDir::new().expect("tempdir");
    let p = write(dir.path(), "en.txt", "P1.\n\nP2.\n");
    let s = write(dir.path(), "de.txt", "S1.\n\nS2.\n");
    cmd(&dir)
        .arg(&p)
        .arg(&s)
        .arg("--quiet")
        .assert()
        .success()
        .stdout("P1.\n\n---\n\nS2.\n");
}

#[test]
fn strict_validation_rejects_mismatch() {
    let dir = TempDir::new().expect("tempdir");
    let p = write(dir.path(), "en.txt", "A.\n\nB.\n\nC.");
    let s = write(dir.path(), "de.txt", "X.");
    cmd(&dir)
        .arg(&p)
        .arg(&s)
        .assert()
        .failure()
        .stderr(predicate::str::contains("paragraph count mismatch"));

    cmd(&dir)
        .arg(&p)
        .arg(&s)
        .args(["--lenient", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("A."));
}

#[test]
fn presentation_writes_output_and_summary() {
    let dir = TempDir::new().expect("tempdir");
    let p = write(dir.path(), "en.md", "# One\nHello world.\n\n# Two\nSecond slide here.\n");
    let s = write(dir.path(), "de.md", "# Eins\nHallo Welt.\n\n# Zwei\nZweite Folie hier.\n");
    let out = dir.path().join("merged.md");
    let summary = dir.path().join("summary.json");
    cmd(&dir)
        .arg(&p)
        .arg(&s)
        .args(["--mode", "presentation", "--slide-mode", "single"])
        .arg("-o")
        .arg(&out)
        .arg("--summary-json")
        .arg(&summary)
        .assert()
        .success()
        .stderr(predicate::str::contains("words"));

    let merged = fs::read_to_string(&out).expect("read output");
    assert_eq!(
        merged,
        "# One\n\nHello world.\n\n---\n\n# Zwei\n\nZweite Folie hier.\n"
    );
    let json: serde_json::Value =
        serde_json::from_slice(&fs::read(&summary).expect("read summary")).expect("json");
    assert_eq!(json["primary_lang_words"], 2);
    assert_eq!(json["secondary_lang_words"], 3);
    assert_eq!(json["segments"].as_array().map(Vec::len), Some(2));
}

#[test]
fn presentation_without_headings_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let p = write(dir.path(), "en.md", "No slides here.");
    let s = write(dir.path(), "de.md", "# Eins\nHallo.");
    cmd(&dir)
        .arg(&p)
        .arg(&s)
        .args(["--mode", "presentation"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no slides"));
}

#[test]
fn config_file_sets_start_language() {
    let dir = TempDir::new().expect("tempdir");
    let cfg = write(
        dir.path(),
        "custom.toml",
        "[merge]\nstart_lang = \"DE\"\n\n[languages]\nprimary = \"EN\"\nsecondary = \"DE\"\n",
    );
    let p = write(dir.path(), "en.txt", "P1.\n\nP2.");
    let s = write(dir.path(), "de.txt", "S1.\n\nS2.");
    cmd(&dir)
        .arg(&p)
        .arg(&s)
        .arg("--config")
        .arg(&cfg)
        .arg("--quiet")
        .assert()
        .success()
        .stdout("S1.\n\n---\n\nP2.\n");
}

#[test]
fn unknown_start_language_fails() {
    let dir = TempDir::new().expect("tempdir");
    let p = write(dir.path(), "en.txt", "P1.");
    let s = write(dir.path(), "de.txt", "S1.");
    cmd(&dir)
        .arg(&p)
        .arg(&s)
        .args(["--start-lang", "fr"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown start language"));
}

#[test]
fn cues_json_lists_spoken_words() {
    let dir = TempDir::new().expect("tempdir");
    let p = write(dir.path(), "en.txt", "Hello, world.");
    let s = write(dir.path(), "de.txt", "Hallo, Welt.");
    let cues = dir.path().join("cues.json");
    cmd(&dir)
        .arg(&p)
        .arg(&s)
        .arg("--cues-json")
        .arg(&cues)
        .arg("--quiet")
        .assert()
        .success();
    let json: serde_json::Value =
        serde_json::from_slice(&fs::read(&cues).expect("read cues")).expect("json");
    let words: Vec<&str> = json["cues"]
        .as_array()
        .expect("cues array")
        .iter()
        .filter_map(|c| c["word"].as_str())
        .collect();
    assert_eq!(words, vec!["Hello,", "world."]);
}

#[test]
fn init_config_writes_default_file() {
    let dir = TempDir::new().expect("tempdir");
    cmd(&dir)
        .arg("--init-config")
        .arg("--init-config-dir")
        .arg(dir.path())
        .assert()
        .success();
    let text = fs::read_to_string(dir.path().join("bilingual-merge.toml")).expect("config");
    assert!(text.contains("block_time_seconds = 45"));
}

#[test]
fn count_mode_reports_totals() {
    let dir = TempDir::new().expect("tempdir");
    let p = write(dir.path(), "en.txt", "One two three.\n\nFour, five.");
    cmd(&dir)
        .arg("--count")
        .arg(&p)
        .assert()
        .success()
        .stdout(predicate::str::contains("total 2 paragraphs, 5 words, 2.0s at plain rate"));
}
