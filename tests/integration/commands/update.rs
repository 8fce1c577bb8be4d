use assert_cmd::Command;
use bds_updater::constants::platform_download_type;
use bds_updater::test_utils::{links_response, seed_installation, tree_snapshot};
use httpmock::prelude::*;
use predicates::prelude::*;

use crate::common::{RELEASE_VERSION, UpdaterTestEnv, mock_release, release_archive};

#[test]
fn test_missing_install_dir_is_usage_error() {
    Command::cargo_bin("bds-update")
        .unwrap()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_declined_eula_changes_nothing() {
    let env = UpdaterTestEnv::new();

    env.command()
        .write_stdin("n\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Do you agree? (y/n):"))
        .stdout(predicate::str::contains("https://www.minecraft.net/en-us/eula"))
        .stderr(predicate::str::contains("Bedrock Dedicated Server update failed: consent"))
        .stderr(predicate::str::contains("EULA agreement required to continue"));

    assert!(!env.install_dir.exists());
    assert!(!env.backup_dir().exists());
    assert!(env.staging_is_empty());
}

#[test]
fn test_closed_stdin_counts_as_decline() {
    let env = UpdaterTestEnv::new();
    seed_installation(&env.install_dir);
    let before = tree_snapshot(&env.install_dir);

    env.command()
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("EULA agreement required"));

    assert_eq!(tree_snapshot(&env.install_dir), before);
    assert!(!env.backup_dir().exists());
}

#[test]
fn test_accept_eula_update_end_to_end() {
    let server = MockServer::start();
    let (links, download) = mock_release(&server, &release_archive());
    let env = UpdaterTestEnv::with_links_endpoint(&server.url("/links"));
    seed_installation(&env.install_dir);
    let before = tree_snapshot(&env.install_dir);

    env.command()
        .arg("--accept-eula")
        .assert()
        .success()
        .stdout(predicate::str::contains("Checking latest Bedrock Dedicated Server version..."))
        .stdout(predicate::str::contains("Downloading Bedrock Dedicated Server..."))
        .stdout(predicate::str::contains("Creating backup of current server..."))
        .stdout(predicate::str::contains("Extracting server files..."))
        .stdout(predicate::str::contains(format!(
            "Installed Bedrock Dedicated Server {RELEASE_VERSION}"
        )))
        .stdout(predicate::str::contains("Update completed successfully."));

    links.assert();
    download.assert();
    assert_eq!(tree_snapshot(&env.backup_dir()), before);
    assert_eq!(std::fs::read(env.install_dir.join("bedrock_server")).unwrap(), b"binary 1.21.44");
    assert!(env.install_dir.join("behavior_packs/vanilla/manifest.json").exists());
    assert!(env.install_dir.join("worlds/Bedrock level/level.dat").exists());
    assert!(env.staging_is_empty());
}

#[test]
fn test_interactive_yes_with_no_backup() {
    let server = MockServer::start();
    let _release = mock_release(&server, &release_archive());
    let env = UpdaterTestEnv::with_links_endpoint(&server.url("/links"));
    seed_installation(&env.install_dir);

    env.command()
        .arg("--no-backup")
        .write_stdin("Yes\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup skipped (--no-backup)"))
        .stdout(predicate::str::contains("Creating backup").not());

    assert!(!env.backup_dir().exists());
    assert_eq!(std::fs::read(env.install_dir.join("bedrock_server")).unwrap(), b"binary 1.21.44");
}

#[test]
fn test_first_install_creates_directory() {
    let server = MockServer::start();
    let _release = mock_release(&server, &release_archive());
    let env = UpdaterTestEnv::with_links_endpoint(&server.url("/links"));

    env.command()
        .arg("--accept-eula")
        .assert()
        .success()
        .stdout(predicate::str::contains("No existing installation found, nothing to back up"))
        .stdout(predicate::str::contains("Creating backup").not());

    assert!(env.install_dir.join("bedrock_server").exists());
    assert!(!env.backup_dir().exists());
    assert!(env.staging_is_empty());
}

#[test]
fn test_parent_dir_argument_backs_up_beside_install() {
    let server = MockServer::start();
    let _release = mock_release(&server, &release_archive());
    let env = UpdaterTestEnv::with_links_endpoint(&server.url("/links"));
    seed_installation(&env.install_dir);
    let before = tree_snapshot(&env.install_dir);

    env.command_for(env.install_dir.join("worlds").join(".."))
        .arg("--accept-eula")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "BDS install path: {}",
            env.install_dir.display()
        )));

    assert_eq!(tree_snapshot(&env.backup_dir()), before);
    assert!(!env.install_dir.join("_backup").exists());
    assert!(!env.install_dir.join("worlds/_backup").exists());
    assert_eq!(std::fs::read(env.install_dir.join("bedrock_server")).unwrap(), b"binary 1.21.44");
}

#[test]
fn test_download_failure_leaves_install_untouched() {
    let server = MockServer::start();
    let missing = server.url("/bin/bedrock-server-1.21.44.01.zip");
    server.mock(|when, then| {
        when.method(GET).path("/links");
        then.status(200).body(links_response(&[(platform_download_type(), &missing)]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/bin/bedrock-server-1.21.44.01.zip");
        then.status(404);
    });
    let env = UpdaterTestEnv::with_links_endpoint(&server.url("/links"));
    seed_installation(&env.install_dir);
    let before = tree_snapshot(&env.install_dir);

    env.command()
        .arg("--accept-eula")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Bedrock Dedicated Server update failed: download"))
        .stderr(predicate::str::contains("HTTP 404"));

    assert_eq!(tree_snapshot(&env.install_dir), before);
    assert!(!env.backup_dir().exists());
    assert!(env.staging_is_empty());
}

#[test]
fn test_resolution_failure_reports_stage() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/links");
        then.status(500);
    });
    let env = UpdaterTestEnv::with_links_endpoint(&server.url("/links"));

    env.command()
        .arg("--accept-eula")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Bedrock Dedicated Server update failed: version resolution",
        ))
        .stderr(predicate::str::contains("HTTP 500"));

    assert!(!env.install_dir.exists());
}

#[test]
fn test_invalid_config_is_reported() {
    let env = UpdaterTestEnv::new();
    std::fs::write(&env.config_path, "links_endpont = 'https://example.com'\n").unwrap();

    env.command()
        .arg("--accept-eula")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("links_endpont"));

    assert!(!env.install_dir.exists());
}

#[test]
fn test_explicit_config_flag_overrides_env() {
    let server = MockServer::start();
    let (links, _download) = mock_release(&server, &release_archive());
    let env = UpdaterTestEnv::new();
    let explicit = env.temp.path().join("explicit.toml");
    std::fs::write(
        &explicit,
        format!(
            "links_endpoint = '{}'\nstaging_dir = '{}'\n",
            server.url("/links"),
            env.staging_dir.display()
        ),
    )
    .unwrap();

    env.command().arg("--accept-eula").arg("--config").arg(&explicit).assert().success();

    links.assert();
    assert!(env.staging_is_empty());
}
