//! Configuration loading.
//!
//! The updater has a single optional TOML file, see [`UpdaterConfig`].

pub mod updater;

pub use updater::{CONFIG_PATH_ENV, UpdaterConfig};
