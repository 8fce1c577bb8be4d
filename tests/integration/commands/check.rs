use bds_updater::test_utils::{seed_installation, tree_snapshot};
use httpmock::prelude::*;
use predicates::prelude::*;

use crate::common::{RELEASE_FILE, RELEASE_VERSION, UpdaterTestEnv, mock_release, release_archive};

#[test]
fn test_check_prints_latest_release_without_changes() {
    let server = MockServer::start();
    let (links, download) = mock_release(&server, &release_archive());
    let env = UpdaterTestEnv::with_links_endpoint(&server.url("/links"));
    seed_installation(&env.install_dir);
    let before = tree_snapshot(&env.install_dir);

    env.command()
        .arg("--check")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Latest version: {RELEASE_VERSION}")))
        .stdout(predicate::str::contains(RELEASE_FILE))
        .stdout(predicate::str::contains("Do you agree").not());

    links.assert();
    download.assert_hits(0);
    assert_eq!(tree_snapshot(&env.install_dir), before);
    assert!(!env.backup_dir().exists());
}

#[test]
fn test_check_reports_missing_link() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/links");
        then.status(200).body(r#"{"result":{"links":[]}}"#);
    });
    let env = UpdaterTestEnv::with_links_endpoint(&server.url("/links"));

    env.command()
        .arg("--check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to resolve the latest Bedrock Dedicated Server download"))
        .stderr(predicate::str::contains("available: none"));
}

#[test]
fn test_check_conflicts_with_rollback() {
    let env = UpdaterTestEnv::new();

    env.command()
        .arg("--check")
        .arg("--rollback")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}
