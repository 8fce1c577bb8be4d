use bds_updater::test_utils::{seed_installation, tree_snapshot};
use httpmock::prelude::*;
use predicates::prelude::*;

use crate::common::{UpdaterTestEnv, mock_release, release_archive};

#[test]
fn test_rollback_without_backup_fails() {
    let env = UpdaterTestEnv::new();
    seed_installation(&env.install_dir);

    env.command()
        .arg("--rollback")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to restore backup"))
        .stderr(predicate::str::contains("No backup found"));
}

#[test]
fn test_update_then_rollback_restores_previous_files() {
    let server = MockServer::start();
    let _release = mock_release(&server, &release_archive());
    let env = UpdaterTestEnv::with_links_endpoint(&server.url("/links"));
    seed_installation(&env.install_dir);
    let before = tree_snapshot(&env.install_dir);

    env.command().arg("--accept-eula").assert().success();
    assert_ne!(tree_snapshot(&env.install_dir), before);

    env.command()
        .arg("--rollback")
        .assert()
        .success()
        .stdout(predicate::str::contains("Restoring previous installation from backup..."));

    // Restore copies the backup over the installation; files only the new
    // release shipped stay behind.
    let restored = tree_snapshot(&env.install_dir);
    for (path, contents) in &before {
        assert_eq!(restored.get(path), Some(contents), "{} not restored", path.display());
    }
    assert!(env.install_dir.join("behavior_packs/vanilla/manifest.json").exists());
}
