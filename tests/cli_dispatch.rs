use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

fn write(path: &Path, body: &str) {
    std::fs::write(path, body).expect("fixture should be writable");
}

fn setup_library(root: &Path) {
    write(
        &root.join("blocks.json"),
        r#"[
            {"name": "Fuzz", "description": "Broken-speaker saturation.",
             "required": false, "key_parameters": ["gain", "tone"]},
            {"name": "Reverb", "description": "Adds space and depth.",
             "required": true, "key_parameters": ["mix", "decay"]}
        ]"#,
    );
    write(
        &root.join("aliases.json"),
        r#"{"bands": {"nirvana": "Nirvana", "sabbath": "Black Sabbath"},
            "genres": {"grunge": "Grunge"},
            "tags": ["fuzz"]}"#,
    );
    let tones = root.join("tones");
    std::fs::create_dir_all(&tones).expect("tones dir should be creatable");
    write(
        &tones.join("grunge.json"),
        r#"[{"band": "Nirvana", "preset_name": "Bleach Wall", "genre": "Grunge",
             "amp_model": "Brit 800", "cab_ir": "4x12",
             "effects": ["Fuzz", "Reverb"],
             "summary": "Saturated wall of fuzz."}]"#,
    );
    write(
        &tones.join("doom.json"),
        r#"[{"band": "Sleep", "preset_name": "Dopesmoker", "genre": "Doom",
             "amp_model": "Matamp", "cab_ir": "8x10",
             "effects": ["Fuzz", "Sub Octave"],
             "summary": "Slow and heavy."}]"#,
    );
}

fn run_tdx(library: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tdx"))
        .arg("--library")
        .arg(library)
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("tdx should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn recommend_prints_the_featured_preset_and_insights() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    setup_library(dir.path());

    let output = run_tdx(dir.path(), &["recommend", "grunge"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.contains("Bleach Wall"));
    assert!(text.contains("Brit 800"));
    assert!(text.contains("Adds space and depth."));
}

#[test]
fn recommend_miss_lists_available_genres_and_fails() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    setup_library(dir.path());

    let output = run_tdx(dir.path(), &["recommend", "polka"]);
    assert!(!output.status.success());

    let err = stderr(&output);
    assert!(err.contains("no close match found for genre 'polka'"));
    assert!(err.contains("doom"));
    assert!(err.contains("grunge"));
}

#[test]
fn search_json_reports_an_alias_hit_with_tags() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    setup_library(dir.path());

    let output = run_tdx(dir.path(), &["search", "90s grunge fuzz", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value: Value = serde_json::from_str(&stdout(&output)).expect("output should be JSON");
    assert_eq!(value["outcome"]["kind"], "alias");
    assert_eq!(value["outcome"]["target"], "genre");
    assert_eq!(value["outcome"]["value"], "Grunge");
    assert_eq!(value["matched_tags"][0], "fuzz");
}

#[test]
fn block_json_resolves_typos_with_a_score() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    setup_library(dir.path());

    let output = run_tdx(dir.path(), &["block", "Revrb", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value: Value = serde_json::from_str(&stdout(&output)).expect("output should be JSON");
    assert_eq!(value["resolution"]["kind"], "fuzzy");
    assert_eq!(value["insight"]["name"], "Reverb");
    let score = value["resolution"]["score"]
        .as_f64()
        .expect("score should be a number");
    assert!(score >= 75.0);
}

#[test]
fn insights_embeds_placeholders_for_unknown_names() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    setup_library(dir.path());

    let output = run_tdx(dir.path(), &["insights", "Reverb", "Talkbox", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value: Value = serde_json::from_str(&stdout(&output)).expect("output should be JSON");
    let records = value.as_array().expect("output should be an array");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], "Reverb");
    assert_eq!(records[0]["required"], true);
    assert_eq!(records[1]["name"], "Talkbox");
    assert_eq!(records[1]["required"], false);
}

#[test]
fn genres_lists_tone_file_stems() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    setup_library(dir.path());

    let output = run_tdx(dir.path(), &["genres"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("doom"));
    assert!(text.contains("grunge"));
}

#[test]
fn sync_flags_unresolved_effects_then_check_reports_them() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    setup_library(dir.path());

    let clean_before = std::fs::read(dir.path().join("tones/grunge.json"))
        .expect("fixture should be readable");

    let sync = run_tdx(dir.path(), &["sync"]);
    assert!(sync.status.success(), "stderr: {}", stderr(&sync));
    let text = stdout(&sync);
    assert!(text.contains("corrected doom"));
    assert!(text.contains("ok grunge"));

    // The clean file is byte-untouched; the flagged one carries the marker.
    let clean_after = std::fs::read(dir.path().join("tones/grunge.json"))
        .expect("fixture should be readable");
    assert_eq!(clean_before, clean_after);
    let doom = std::fs::read_to_string(dir.path().join("tones/doom.json"))
        .expect("fixture should be readable");
    assert!(doom.contains("Sub Octave [review]"));

    // check is read-only and fails on the marked effect.
    let check = run_tdx(dir.path(), &["check"]);
    assert!(!check.status.success());
    assert!(stdout(&check).contains("marked for review"));
}

#[test]
fn check_passes_on_a_clean_library() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    setup_library(dir.path());
    // Drop the file with the unknown effect so everything resolves.
    std::fs::remove_file(dir.path().join("tones/doom.json"))
        .expect("fixture should be removable");

    let output = run_tdx(dir.path(), &["check"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("issues=0"));
}

#[test]
fn missing_library_fails_with_a_catalog_error() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");

    let output = run_tdx(dir.path(), &["genres"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unable to read catalog"));
}
