//! End-to-end tests for the `geo-drawer` binary.

use assert_cmd::Command;
use geo_drawer_core::Container;
use predicates::prelude::*;
use std::path::Path;

fn geo_drawer() -> Command {
    let mut cmd = Command::cargo_bin("geo-drawer").unwrap();
    cmd.args(["--log-level", "error"]);
    cmd
}

fn write_config(dir: &Path, name: &str, repo_dir: &Path) -> std::path::PathBuf {
    let config = dir.join("repository_conf.toml");
    std::fs::write(
        &config,
        format!(
            "[metadata]\nname = \"{name}\"\npath = \"{}\"\n",
            repo_dir.display()
        ),
    )
    .unwrap();
    config
}

#[test]
fn bootstraps_repository_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "demo", dir.path());

    geo_drawer()
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Geopackage repository 'demo.gpkg' created at"))
        .stdout(predicate::str::contains("point_layer is created in"))
        .stdout(predicate::str::contains("line_layer is created in"));

    let container = Container::open(dir.path().join("demo.gpkg")).unwrap();
    assert_eq!(
        container.layer_names().unwrap(),
        vec!["demo", "line_layer", "point_layer"]
    );
}

#[test]
fn missing_repository_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nowhere");
    let config = write_config(dir.path(), "demo", &missing);

    geo_drawer()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));

    assert!(!missing.exists());
}

#[test]
fn repository_named_after_default_layer_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "point_layer", dir.path());

    geo_drawer()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid repository name `point_layer`"));

    assert!(!dir.path().join("point_layer.gpkg").exists());
}

#[test]
fn rerun_requires_overwrite_flag() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "demo", dir.path());

    geo_drawer().arg("--config").arg(&config).assert().success();

    geo_drawer()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    geo_drawer()
        .arg("--config")
        .arg(&config)
        .arg("--overwrite")
        .assert()
        .success();
}

#[test]
fn missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    geo_drawer()
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load"));
}
