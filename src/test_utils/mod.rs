//! Test utilities shared by unit and integration tests.
//!
//! Available under `cfg(test)` and with the `test-utils` feature, which the
//! crate's own dev-dependency enables for `tests/`.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use zip::write::SimpleFileOptions;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; does nothing when neither
/// is set. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=bds_updater=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// An in-memory zip shaped like a server release.
///
/// Names ending in `/` become directory entries.
pub fn server_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, contents) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).expect("add directory entry");
        } else {
            zip.start_file(*name, options).expect("start file entry");
            zip.write_all(contents).expect("write file entry");
        }
    }
    zip.finish().expect("finish archive").into_inner()
}

/// A links API response body listing `(downloadType, downloadUrl)` pairs.
pub fn links_response(links: &[(&str, &str)]) -> String {
    let links: Vec<_> = links
        .iter()
        .map(|(download_type, url)| {
            serde_json::json!({
                "downloadType": download_type,
                "downloadUrl": url,
            })
        })
        .collect();
    serde_json::json!({ "result": { "links": links } }).to_string()
}

/// Relative path to contents for every regular file under `root`.
///
/// An absent `root` gives an empty map, so "still absent" and "unchanged"
/// compare the same way.
pub fn tree_snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    if !root.exists() {
        return BTreeMap::new();
    }
    walkdir::WalkDir::new(root)
        .into_iter()
        .map(|entry| entry.expect("walk directory"))
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let relative = entry.path().strip_prefix(root).expect("entry under root").to_path_buf();
            let contents = std::fs::read(entry.path()).expect("read file");
            (relative, contents)
        })
        .collect()
}

/// Lay out a small existing installation under `install_dir`.
pub fn seed_installation(install_dir: &Path) {
    std::fs::create_dir_all(install_dir.join("worlds/Bedrock level")).expect("create worlds");
    std::fs::write(install_dir.join("bedrock_server"), b"binary 1.21.40").expect("write binary");
    std::fs::write(install_dir.join("server.properties"), b"max-players=10")
        .expect("write properties");
    std::fs::write(install_dir.join("worlds/Bedrock level/level.dat"), b"world")
        .expect("write world");
}
