//! CLI-level tests for the `ghup` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ghup::test_utils::ReleaseFixture;

fn write_config(dir: &TempDir, server_uri: &str, installed: &str) -> std::path::PathBuf {
    let config_path = dir.path().join("ghup.toml");
    let config = format!(
        r#"
            [github]
            owner = "JustCasey76"
            repo = "aqm-sitemaps"
            api_base = "{server_uri}"
            download_base = "{server_uri}"

            [plugin]
            id = "aqm-sitemaps/aqm-sitemaps.php"
            slug = "aqm-sitemaps"
            version = "{installed}"

            [update]
            probe_timeout = 2
            request_timeout = 5
        "#
    );
    std::fs::write(&config_path, config).unwrap();
    config_path
}

fn ghup() -> Command {
    Command::cargo_bin("ghup").unwrap()
}

#[test]
fn help_lists_commands() {
    ghup()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn missing_config_file_fails_with_context() {
    let temp = TempDir::new().unwrap();
    ghup()
        .arg("--config")
        .arg(temp.path().join("absent.toml"))
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[tokio::test(flavor = "multi_thread")]
async fn check_reports_available_update() {
    let server = MockServer::start().await;
    let asset_url = format!("{}/dl/aqm-sitemaps-2.2.2.zip", server.uri());

    Mock::given(method("GET"))
        .and(path("/repos/JustCasey76/aqm-sitemaps/releases/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            ReleaseFixture::new("v2.2.2")
                .asset("aqm-sitemaps-2.2.2.zip", &asset_url)
                .body("Improved sitemap rendering.")
                .build(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let config_path = write_config(&temp, &server.uri(), "2.2.1");
    let store_path = temp.path().join("store.json");

    let assert = tokio::task::spawn_blocking(move || {
        ghup()
            .arg("--config")
            .arg(&config_path)
            .arg("--store")
            .arg(&store_path)
            .arg("check")
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("Update available: 2.2.1 -> 2.2.2"))
        .stdout(predicate::str::contains("aqm-sitemaps-2.2.2.zip"));
}

#[tokio::test(flavor = "multi_thread")]
async fn check_reports_up_to_date() {
    let server = MockServer::start().await;
    let zipball = format!("{}/zipball/2.2.2", server.uri());

    Mock::given(method("GET"))
        .and(path("/repos/JustCasey76/aqm-sitemaps/releases/latest"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ReleaseFixture::new("2.2.2").zipball_url(Some(&zipball)).build()),
        )
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let config_path = write_config(&temp, &server.uri(), "2.2.2");
    let store_path = temp.path().join("store.json");

    let assert = tokio::task::spawn_blocking(move || {
        ghup()
            .arg("--config")
            .arg(&config_path)
            .arg("--store")
            .arg(&store_path)
            .arg("check")
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("You are on the latest version (2.2.2)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn check_failure_shows_generic_message_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let config_path = write_config(&temp, &server.uri(), "2.2.1");
    let store_path = temp.path().join("store.json");

    let assert = tokio::task::spawn_blocking(move || {
        ghup()
            .arg("--config")
            .arg(&config_path)
            .arg("--store")
            .arg(&store_path)
            .arg("check")
            .assert()
    })
    .await
    .unwrap();

    // The raw HTTP status must not leak to the user.
    assert
        .failure()
        .stderr(predicate::str::contains("Could not check for updates"))
        .stderr(predicate::str::contains("500").not());
}
