use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("deck")
        .env("DECK_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    assert!(!config_path.exists());

    cargo_bin_cmd!("deck")
        .env("DECK_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    assert!(config_path.exists());

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("default_loader ="));
    assert!(contents.contains("# data_dir ="));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    fs::write(&config_path, "# existing config").unwrap();

    cargo_bin_cmd!("deck")
        .env("DECK_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_clusters_list_empty() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("deck")
        .env("DECK_HOME", dir.path())
        .args(["clusters", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No clusters found."));
}

#[test]
fn test_broken_config_is_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "default_loader = \"rift\"\n").unwrap();

    cargo_bin_cmd!("deck")
        .env("DECK_HOME", dir.path())
        .args(["clusters", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("load config"));
}

#[test]
fn test_import_scan_lists_prism_instances() {
    let home = tempdir().unwrap();
    let prism = tempdir().unwrap();
    let instance = prism.path().join("instances").join("skyblock");
    fs::create_dir_all(&instance).unwrap();
    fs::write(instance.join("instance.cfg"), "name=Skyblock\n").unwrap();

    cargo_bin_cmd!("deck")
        .env("DECK_HOME", home.path())
        .args(["import", "scan", "prism", "--path"])
        .arg(prism.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Skyblock"));
}

#[test]
fn test_import_scan_missing_directory_fails() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("deck")
        .env("DECK_HOME", home.path())
        .args(["import", "scan", "modrinth", "--path"])
        .arg(home.path().join("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_launcher_requires_terminal() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("deck")
        .env("DECK_HOME", dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a terminal"));
}

#[test]
fn test_empty_game_versions_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "game_versions = []\n").unwrap();

    cargo_bin_cmd!("deck")
        .env("DECK_HOME", dir.path())
        .args(["clusters", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("game_versions must list at least one version"));
}
