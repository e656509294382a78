#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movv");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("discover"))
        .stdout(predicate::str::contains("filters"))
        .stdout(predicate::str::contains("sort-types"));
}

#[test]
fn test_discover_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movv");
    cmd.args(["discover", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--genres"))
        .stdout(predicate::str::contains("--years"))
        .stdout(predicate::str::contains("--countries"))
        .stdout(predicate::str::contains("--sort-by"));
}

#[test]
fn test_movie_missing_id() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movv");
    cmd.arg("movie")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id"));
}

#[test]
fn test_sort_types_marks_default() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("movv");
    cmd.arg("--dir")
        .arg(dir.path())
        .arg("sort-types")
        .assert()
        .success()
        .stdout(predicate::str::contains("*popularity.desc"))
        .stdout(predicate::str::contains("Vote count desc"));
}

#[test]
fn test_years_starts_at_1900() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movv");
    cmd.arg("years")
        .assert()
        .success()
        .stdout(predicate::str::contains("1900"));
}

#[test]
fn test_discover_without_api_key() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("movv");
    cmd.env_remove("TMDB_API_KEY")
        .arg("--dir")
        .arg(dir.path())
        .arg("discover")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB API key is required"));
}

#[test]
fn test_filters_years_descending_rejected() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("movv");
    cmd.arg("--dir")
        .arg(dir.path())
        .args(["filters", "years", "set", "--from", "2000", "--to", "1990"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ascending"));
    assert!(!dir.path().join("config.toml").exists());
}

#[test]
fn test_filters_sort_by_unknown_rejected() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("movv");
    cmd.arg("--dir")
        .arg(dir.path())
        .args(["filters", "sort-by", "budget.desc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown sort type: budget.desc"));
}

#[test]
fn test_filters_persist_between_runs() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("movv")
        .arg("--dir")
        .arg(dir.path())
        .args(["filters", "genres", "add", "--ids", "18,35"])
        .assert()
        .success();
    cargo_bin_cmd!("movv")
        .arg("--dir")
        .arg(dir.path())
        .args(["filters", "years", "set", "--from", "1970", "--to", "1979"])
        .assert()
        .success();
    cargo_bin_cmd!("movv")
        .arg("--dir")
        .arg(dir.path())
        .args(["filters", "countries", "set", "--codes", "fr,it"])
        .assert()
        .success();

    // Act & Assert
    cargo_bin_cmd!("movv")
        .arg("--dir")
        .arg(dir.path())
        .args(["filters", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Genres: 18,35"))
        .stdout(predicate::str::contains("Years: 1970-1979"))
        .stdout(predicate::str::contains("Countries: FR,IT"));
    let saved = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(saved.contains("[filters]"));
}

#[test]
fn test_filters_reset_clears_selection() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("movv")
        .arg("--dir")
        .arg(dir.path())
        .args(["filters", "genres", "add", "--ids", "27"])
        .assert()
        .success();

    // Act & Assert
    cargo_bin_cmd!("movv")
        .arg("--dir")
        .arg(dir.path())
        .args(["filters", "reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Genres: (any)"))
        .stdout(predicate::str::contains("Years: (any)"));
}
