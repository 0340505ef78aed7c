//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mathdrill(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("mathdrill").unwrap();
    cmd.arg("--data-dir").arg(dir.path());
    cmd
}

#[test]
fn history_starts_empty() {
    let dir = TempDir::new().unwrap();
    mathdrill(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches yet"));
}

#[test]
fn stats_starts_empty() {
    let dir = TempDir::new().unwrap();
    mathdrill(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches yet"));
}

#[test]
fn clear_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    mathdrill(&dir)
        .arg("clear")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    mathdrill(&dir)
        .arg("clear")
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Match history cleared"));
}

#[test]
fn settings_shows_defaults() {
    let dir = TempDir::new().unwrap();
    mathdrill(&dir)
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("multiply"))
        .stdout(predicate::str::contains("Default timer: 60s"));
}

#[test]
fn settings_updates_persist() {
    let dir = TempDir::new().unwrap();
    mathdrill(&dir)
        .arg("settings")
        .arg("--disable")
        .arg("divide")
        .arg("--range")
        .arg("multiply=2:9")
        .arg("--count")
        .arg("20")
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings saved"));

    mathdrill(&dir)
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("2..9"))
        .stdout(predicate::str::contains("Default question count: 20"));
}

#[test]
fn settings_rejects_unknown_operator() {
    let dir = TempDir::new().unwrap();
    mathdrill(&dir)
        .arg("settings")
        .arg("--enable")
        .arg("modulo")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown operator"));
}

#[test]
fn play_refuses_empty_operator_pool() {
    let dir = TempDir::new().unwrap();
    mathdrill(&dir)
        .arg("settings")
        .arg("--disable")
        .arg("add,subtract,multiply,divide")
        .assert()
        .success();

    mathdrill(&dir)
        .arg("play")
        .arg("--count")
        .arg("3")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no operators enabled"));
}

#[test]
fn play_abandons_when_stdin_closes() {
    let dir = TempDir::new().unwrap();
    mathdrill(&dir)
        .arg("play")
        .arg("--count")
        .arg("3")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Match abandoned"));

    mathdrill(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches yet"));
}

#[test]
fn play_fixed_match_saves_and_shows_in_history() {
    let dir = TempDir::new().unwrap();
    mathdrill(&dir)
        .arg("play")
        .arg("--count")
        .arg("2")
        .write_stdin("0\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Match summary"))
        .stdout(predicate::str::contains("Saved match"));

    mathdrill(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 questions"));
}

#[test]
fn show_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    mathdrill(&dir)
        .arg("show")
        .arg("--id")
        .arg("00000000-0000-0000-0000-000000000000")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no match with id"));
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    mathdrill(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Arithmetic practice"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    mathdrill(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mathdrill"));
}
