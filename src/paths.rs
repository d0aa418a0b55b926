//! # Path Utilities Module
//!
//! Discovery ricorsiva di file e sostituzione dell'estensione, usate dal
//! comando batch per il workflow "converti tutti i file di una cartella".

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collect the files under `dir` whose paths pass `filter`.
///
/// # Example
/// ```rust,no_run
/// use fileconvert::paths::find_files_under;
/// use std::path::Path;
///
/// let waves = find_files_under(Path::new("recordings"), |p| {
///     p.extension().map(|e| e == "wav").unwrap_or(false)
/// });
/// ```
pub fn find_files_under<F>(dir: &Path, filter: F) -> Vec<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| filter(path))
        .collect()
}

/// Return `path` with its extension replaced; `new_ext` may carry a
/// leading dot or not.
pub fn replace_ext(path: &Path, new_ext: &str) -> PathBuf {
    path.with_extension(new_ext.trim_start_matches('.'))
}
