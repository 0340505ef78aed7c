//! CLI subcommand implementations.

pub mod clear;
pub mod history;
pub mod play;
pub mod settings;
pub mod show;
pub mod stats;

use std::path::{Path, PathBuf};

pub(crate) fn matches_path(data_dir: &Path) -> PathBuf {
    data_dir.join("matches.json")
}

pub(crate) fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}
