mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

use common::BundleFixture;

fn cli_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("stardict"))
}

#[test]
fn prints_definition() {
    let tmp = tempdir().unwrap();
    BundleFixture::new("words").entry("word1", "word1_defn").write(tmp.path());
    let dir = tmp.path().to_str().unwrap();

    cli_cmd()
        .args([dir, "word1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("word1_defn"));
}

#[test]
fn not_found_still_succeeds() {
    let tmp = tempdir().unwrap();
    BundleFixture::new("words").entry("word1", "word1_defn").write(tmp.path());
    let dir = tmp.path().to_str().unwrap();

    cli_cmd()
        .args([dir, "word"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not found: word"));
}

#[test]
fn debug_flag_enables_verbose_logging() {
    let tmp = tempdir().unwrap();
    BundleFixture::new("words").entry("word1", "word1_defn").write(tmp.path());
    let dir = tmp.path().to_str().unwrap();

    cli_cmd()
        .env_remove("RUST_LOG")
        .args([dir, "word", "--debug"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Verbose messages are enabled."));
}

#[test]
fn info_flag_lists_dictionaries() {
    let tmp = tempdir().unwrap();
    BundleFixture::new("words").book_name("Sample Words").entry("word1", "word1_defn").write(tmp.path());
    let dir = tmp.path().to_str().unwrap();

    cli_cmd()
        .args([dir, "word1", "--info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sample Words (1 words)"));
}

#[test]
fn nonexistent_path_is_usage_error() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("nope");

    cli_cmd()
        .args([missing.to_str().unwrap(), "word"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn missing_word_is_usage_error() {
    let tmp = tempdir().unwrap();
    cli_cmd().arg(tmp.path().to_str().unwrap()).assert().failure();
}
