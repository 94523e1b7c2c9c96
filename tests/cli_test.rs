//! Integration tests for the milaidy binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
];

/// A milaidy command isolated from the caller's config and environment.
fn milaidy(config: &PathBuf, registry: &str) -> Command {
    let mut cmd = Command::new(cargo_bin("milaidy"));
    cmd.env("MILAIDY_CONFIG", config)
        .env("MILAIDY_REGISTRY_URL", registry)
        .env("NO_COLOR", "1")
        .env_remove("MILAIDY_UPDATE_CHANNEL")
        .env_remove("MILAIDY_NO_UPDATE_CHECK");
    for var in CI_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn config_in(temp: &TempDir) -> PathBuf {
    temp.path().join(".milaidy").join("config.yml")
}

fn dist_tags_body(latest: &str) -> String {
    format!(
        r#"{{"name":"milaidy","dist-tags":{{"latest":"{}","beta":"99.0.0-beta.1"}}}}"#,
        latest
    )
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("milaidy"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn version_subcommand_matches_flag() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("milaidy"));
    cmd.arg("version");
    cmd.assert().success().stdout(predicate::str::contains(format!(
        "milaidy {}",
        env!("CARGO_PKG_VERSION")
    )));
    Ok(())
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("milaidy"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("completions"));
    Ok(())
}

#[test]
fn update_check_reports_available_update() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/milaidy");
        then.status(200)
            .header("content-type", "application/json")
            .body(dist_tags_body("99.0.0"));
    });
    let temp = TempDir::new()?;
    let config = config_in(&temp);

    milaidy(&config, &server.base_url())
        .args(["update", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-> 99.0.0 (stable channel)"));

    mock.assert_calls(1);
    let saved = fs::read_to_string(&config)?;
    assert!(saved.contains("lastCheckVersion"));
    assert!(saved.contains("99.0.0"));
    assert!(saved.contains("lastCheckAt"));
    Ok(())
}

#[test]
fn update_when_current_is_latest_succeeds() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/milaidy");
        then.status(200)
            .header("content-type", "application/json")
            .body(dist_tags_body(env!("CARGO_PKG_VERSION")));
    });
    let temp = TempDir::new()?;

    milaidy(&config_in(&temp), &server.base_url())
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("is up to date"));
    Ok(())
}

#[test]
fn update_with_channel_persists_choice() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/milaidy");
        then.status(200)
            .header("content-type", "application/json")
            .body(dist_tags_body("1.0.0"));
    });
    let temp = TempDir::new()?;
    let config = config_in(&temp);
    fs::create_dir_all(config.parent().unwrap())?;
    fs::write(&config, "agent:\n  name: milady\n")?;

    milaidy(&config, &server.base_url())
        .args(["update", "--check", "--channel", "beta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("99.0.0-beta.1 (beta channel)"));

    let saved = fs::read_to_string(&config)?;
    assert!(saved.contains("channel: beta"));
    assert!(saved.contains("name: milady"));
    Ok(())
}

#[test]
fn update_fails_when_registry_errors() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/milaidy");
        then.status(500);
    });
    let temp = TempDir::new()?;

    milaidy(&config_in(&temp), &server.base_url())
        .args(["update", "--check"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unable to reach the npm registry"));
    Ok(())
}

#[test]
fn update_on_unpublished_channel_fails() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/milaidy");
        then.status(200)
            .header("content-type", "application/json")
            .body(dist_tags_body("99.0.0"));
    });
    let temp = TempDir::new()?;

    milaidy(&config_in(&temp), &server.base_url())
        .env("MILAIDY_UPDATE_CHANNEL", "  NIGHTLY ")
        .args(["update", "--check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Release channel \"nightly\" does not have any published releases (dist-tag \"nightly\")",
        ));
    Ok(())
}

#[test]
fn update_channel_set_and_show() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = config_in(&temp);

    milaidy(&config, "http://127.0.0.1:9")
        .args(["update", "channel", "nightly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Release channel set to nightly"));

    milaidy(&config, "http://127.0.0.1:9")
        .args(["update", "channel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Release channel: nightly"));
    Ok(())
}

#[test]
fn update_channel_rejects_unknown_name() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = config_in(&temp);

    milaidy(&config, "http://127.0.0.1:9")
        .args(["update", "channel", "canary"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid release channel 'canary'"));

    assert!(!config.exists());
    Ok(())
}

#[test]
fn update_status_lists_channels() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/milaidy");
        then.status(200)
            .header("content-type", "application/json")
            .body(dist_tags_body("99.0.0"));
    });
    let temp = TempDir::new()?;

    milaidy(&config_in(&temp), &server.base_url())
        .args(["update", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Install method:"))
        .stdout(predicate::str::contains("99.0.0-beta.1"))
        .stdout(predicate::str::contains("not published"));
    Ok(())
}

#[test]
fn bare_invocation_uses_cached_check() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/milaidy");
        then.status(200).body(dist_tags_body("1.0.0"));
    });
    let temp = TempDir::new()?;
    let config = config_in(&temp);
    fs::create_dir_all(config.parent().unwrap())?;
    fs::write(
        &config,
        format!(
            "update:\n  lastCheckAt: {}\n  lastCheckVersion: 99.0.0\n",
            chrono::Utc::now().to_rfc3339()
        ),
    )?;

    milaidy(&config, &server.base_url())
        .assert()
        .success()
        .stdout(predicate::str::contains("milaidy"))
        .stderr(predicate::str::contains("Update available"))
        .stderr(predicate::str::contains("-> 99.0.0"));

    mock.assert_calls(0);
    Ok(())
}

#[test]
fn bare_invocation_respects_opt_out() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/milaidy");
        then.status(200).body(dist_tags_body("99.0.0"));
    });
    let temp = TempDir::new()?;

    milaidy(&config_in(&temp), &server.base_url())
        .env("MILAIDY_NO_UPDATE_CHECK", "1")
        .assert()
        .success()
        .stderr(predicate::str::contains("Update available").not());

    mock.assert_calls(0);
    Ok(())
}

#[test]
fn completions_generate_for_bash() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("milaidy"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("milaidy"));
    Ok(())
}
