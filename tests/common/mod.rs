//! Shared helpers for the integration suite.

#![allow(dead_code)]

use assert_cmd::Command;
use bds_updater::config::CONFIG_PATH_ENV;
use bds_updater::constants::platform_download_type;
use bds_updater::test_utils::{links_response, server_archive};
use httpmock::prelude::*;
use httpmock::{Mock, MockServer};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name of the release served by [`mock_release`].
pub const RELEASE_FILE: &str = "bedrock-server-1.21.44.01.zip";

/// Version embedded in [`RELEASE_FILE`].
pub const RELEASE_VERSION: &str = "1.21.44.01";

/// The release archive served by [`mock_release`].
pub fn release_archive() -> Vec<u8> {
    server_archive(&[
        ("bedrock_server", b"binary 1.21.44"),
        ("behavior_packs/", b""),
        ("behavior_packs/vanilla/manifest.json", b"{}"),
    ])
}

/// Serve a links API at `/links` pointing at an archive under `/bin/`.
///
/// Returns the links and download mocks so tests can check hit counts.
pub fn mock_release<'a>(server: &'a MockServer, archive: &[u8]) -> (Mock<'a>, Mock<'a>) {
    let download_path = format!("/bin/{RELEASE_FILE}");
    let body = links_response(&[
        ("serverJar", "https://example.com/server.jar"),
        (platform_download_type(), &server.url(&download_path)),
    ]);

    let links = server.mock(|when, then| {
        when.method(GET).path("/links");
        then.status(200).header("content-type", "application/json").body(body);
    });
    let archive = archive.to_vec();
    let download = server.mock(|when, then| {
        when.method(GET).path(download_path);
        then.status(200).header("content-type", "application/zip").body(archive);
    });

    (links, download)
}

/// A scratch directory holding an install target, a staging directory and a
/// config file pointing the updater at them.
pub struct UpdaterTestEnv {
    pub temp: TempDir,
    pub install_dir: PathBuf,
    pub staging_dir: PathBuf,
    pub config_path: PathBuf,
}

impl UpdaterTestEnv {
    /// Config with only `staging_dir` set; the links endpoint is the real one.
    pub fn new() -> Self {
        Self::with_config_lines(&[])
    }

    /// Config whose links endpoint is `endpoint`.
    pub fn with_links_endpoint(endpoint: &str) -> Self {
        Self::with_config_lines(&[format!("links_endpoint = '{endpoint}'")])
    }

    fn with_config_lines(lines: &[String]) -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let install_dir = temp.path().join("bds");
        let staging_dir = temp.path().join("staging");
        let config_path = temp.path().join("config.toml");
        std::fs::create_dir_all(&staging_dir).expect("create staging dir");

        let mut config = format!("staging_dir = '{}'\n", staging_dir.display());
        for line in lines {
            config.push_str(line);
            config.push('\n');
        }
        std::fs::write(&config_path, config).expect("write config");

        Self {
            temp,
            install_dir,
            staging_dir,
            config_path,
        }
    }

    pub fn backup_dir(&self) -> PathBuf {
        let mut name = self.install_dir.file_name().expect("install dir name").to_os_string();
        name.push("_backup");
        self.install_dir.with_file_name(name)
    }

    /// `bds-update <install_dir> --no-progress` wired to this environment.
    pub fn command(&self) -> Command {
        self.command_for(&self.install_dir)
    }

    /// Like [`command`](Self::command) with `install_arg` as the positional.
    pub fn command_for(&self, install_arg: impl AsRef<OsStr>) -> Command {
        let mut cmd = Command::cargo_bin("bds-update").expect("binary built");
        cmd.env(CONFIG_PATH_ENV, &self.config_path)
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .arg(install_arg)
            .arg("--no-progress");
        cmd
    }

    pub fn staging_is_empty(&self) -> bool {
        staging_is_empty(&self.staging_dir)
    }
}

pub fn staging_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).map(|mut entries| entries.next().is_none()).unwrap_or(true)
}
