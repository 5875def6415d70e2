use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("deck")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("clusters"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn test_import_help_shows_scan() {
    cargo_bin_cmd!("deck")
        .args(["import", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"));
}

#[test]
fn test_import_scan_rejects_unknown_launcher() {
    cargo_bin_cmd!("deck")
        .args(["import", "scan", "tlauncher"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown launcher"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("deck")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
