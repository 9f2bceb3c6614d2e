#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

/// Commande isolée dans `dir` (base, mails et images y sont créés).
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("acme-cli").expect("binary exists");
    cmd.current_dir(dir)
        .arg("--config")
        .arg(dir.join("absent.toml"))
        .arg("--db")
        .arg(dir.join("db.json"));
    cmd
}

#[test]
fn countdown_needs_no_database() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .args(["countdown", "--birthday", "1990-03-15", "--today", "2024-03-16"])
        .assert()
        .success()
        .stdout(predicate::str::contains("364 days until the birthday"));
    assert!(!dir.path().join("db.json").exists());
}

#[test]
fn countdown_rejects_impossible_dates() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .args(["countdown", "--birthday", "2023-02-29"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid calendar date: 2023-02-29"));
}

#[test]
fn create_requires_a_user() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .args(["create", "--first-name", "Ada", "--birthday", "1990-03-15"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("login required"));
}

#[test]
fn crud_round_trip() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .args(["register", "--username", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered alice"));

    cli(dir.path())
        .args([
            "--user", "alice", "create", "--first-name", "Ada", "--last-name", "Lovelace",
            "--birthday", "1990-03-15", "--today", "2024-03-14",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved birthday #1: Ada Lovelace"));

    cli(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Ada Lovelace (1990-03-15)"));

    cli(dir.path())
        .args(["show", "--id", "1", "--today", "2024-03-14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 day until the birthday"));

    cli(dir.path())
        .args(["--user", "alice", "delete", "--id", "1"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Re-run with --yes"));

    cli(dir.path())
        .args(["--user", "alice", "delete", "--id", "1", "--yes"])
        .assert()
        .success();

    cli(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No birthdays yet."));
}

#[test]
fn unknown_user_is_rejected() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .args(["--user", "mallory", "members"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown user: mallory"));
}

#[test]
fn import_then_export() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .args(["register", "--username", "alice"])
        .assert()
        .success();

    let input = dir.path().join("people.csv");
    std::fs::write(
        &input,
        "first_name,last_name,birthday\nAda,Lovelace,1990-03-15\nAlan,Turing,1990-13-01\n",
    )
    .unwrap();
    cli(dir.path())
        .args(["--user", "alice", "import", "--today", "2024-03-14", "--csv"])
        .arg(&input)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("row 2: saved #1"))
        .stderr(predicate::str::contains("row 3:"))
        .stderr(predicate::str::contains("1 row(s) rejected"));

    let csv_out = dir.path().join("out.csv");
    let json_out = dir.path().join("out.json");
    cli(dir.path())
        .args(["export", "--today", "2024-03-14", "--csv"])
        .arg(&csv_out)
        .arg("--json")
        .arg(&json_out)
        .assert()
        .success();

    let csv = std::fs::read_to_string(&csv_out).unwrap();
    assert_eq!(
        csv,
        "id,first_name,last_name,birthday,author,countdown_days\n\
         1,Ada,Lovelace,1990-03-15,alice,1\n"
    );
    let json = std::fs::read_to_string(&json_out).unwrap();
    assert!(json.contains("\"first_name\": \"Ada\""));
    assert!(!json.contains("Turing"));
}

#[test]
fn import_without_user_stops_at_login() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("people.csv");
    std::fs::write(&input, "first_name,last_name,birthday\nAda,Lovelace,1990-03-15\n").unwrap();
    cli(dir.path())
        .args(["import", "--csv"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("login required"));
}

#[test]
fn tags_need_login_to_add() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .args(["tags", "add", "--name", "family"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("login required"));

    cli(dir.path())
        .args(["register", "--username", "alice"])
        .assert()
        .success();
    cli(dir.path())
        .args(["--user", "alice", "tags", "add", "--name", "family"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added tag #1 family"));
    cli(dir.path())
        .args(["tags", "list"])
        .assert()
        .success()
        .stdout("1. family\n");
}

#[test]
fn builtin_pages_are_listed_and_shown() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .args(["pages", "list"])
        .assert()
        .success()
        .stdout("about: About\nhomepage: Birthdays\nrules: Rules\n");
    cli(dir.path())
        .args(["pages", "show", "--slug", "rules"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Rules\n=====\n"));
    cli(dir.path())
        .args(["pages", "show", "--slug", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
