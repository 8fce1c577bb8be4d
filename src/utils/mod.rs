//! Cross-cutting helpers: directory operations and progress display.

pub mod fs;
pub mod progress;

pub use fs::{copy_dir, ensure_dir, ensure_parent_dir, normalize_path, remove_dir_if_exists};
pub use progress::ProgressBar;
