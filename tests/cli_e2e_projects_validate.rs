//! End-to-end tests for the `projects`, `validate` and `completions` commands.

mod common;
use common::prelude::*;

#[test]
fn test_projects_lists_names() {
    let fixture = TestFixture::new().with_config(
        r#"
projects:
  Trading:
    categories: { application: Applications, database: DataBases, report: Reports }
    databases: [Counterparty]
  Risk:
    categories: { application: Apps, database: Databases, report: Reports }
"#,
    );

    fixture
        .command()
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains("Risk  (0 database units)"))
        .stdout(predicate::str::contains("Trading  (1 database units)"));
}

#[test]
fn test_projects_uses_config_env() {
    let fixture = TestFixture::new().with_file("conf/custom.yaml", configs::TRADING);

    fixture
        .command()
        .env("VERSIONS_AGGREGATE_CONFIG", fixture.path().join("conf/custom.yaml"))
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains("Trading"));
}

#[test]
fn test_validate_valid_config() {
    let fixture = TestFixture::new().with_config(configs::TRADING);

    fixture
        .command()
        .args(["validate", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Trading: Applications / DataBases / Reports; units: Counterparty, AccountManagement",
        ))
        .stdout(predicate::str::contains("[OK] Configuration is valid"));
}

#[test]
fn test_validate_legacy_config() {
    let fixture = TestFixture::new().with_config(configs::LEGACY_APPSETTINGS);

    fixture
        .command()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("unmatched units: bucket"));
}

#[test]
fn test_validate_overlapping_names() {
    let fixture = TestFixture::new().with_config(configs::OVERLAPPING);

    fixture
        .command()
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Configuration is invalid"))
        .stderr(predicate::str::contains("overlap"));
}

#[test]
fn test_validate_invalid_yaml() {
    let fixture = TestFixture::new().with_config(configs::INVALID_YAML);

    fixture
        .command()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration validation failed"));
}

#[test]
fn test_completions_bash() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("versions-aggregate"));
}
