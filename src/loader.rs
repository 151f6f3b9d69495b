//! Local source loader
//!
//! Collects the files of a directory into [`SourceFile`] records for the
//! assembler: repo-relative `/`-separated paths, sorted, hidden entries and
//! build/vendor directories skipped, non-UTF-8 files ignored.

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::{DirEntry, WalkDir};

use crate::prompt::SourceFile;

const IGNORED_DIR_NAMES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "target",
    "node_modules",
    "dist",
    "build",
    "vendor",
];

/// Files larger than this are skipped unless the caller raises the limit
pub const DEFAULT_MAX_FILE_BYTES: u64 = 512 * 1024;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Glob matched against the relative path (e.g. `src/**/*.rs`)
    pub pattern: Option<String>,
    pub max_file_bytes: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            pattern: None,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// Load a single file or every eligible file below a directory.
pub fn load_path(path: &Path, options: &LoadOptions) -> Result<Vec<SourceFile>> {
    if !path.exists() {
        eyre::bail!("Path does not exist: {}", path.display());
    }

    let matcher = options
        .pattern
        .as_deref()
        .map(build_globset)
        .transpose()
        .wrap_err("Invalid glob pattern")?;

    let root_dir = if path.is_file() {
        path.parent().map(PathBuf::from).unwrap_or_default()
    } else {
        path.to_path_buf()
    };

    let mut files = Vec::new();
    let walker = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(should_descend);

    for entry in walker {
        let entry = match entry {
            Ok(value) => value,
            Err(err) => {
                log::debug!("Skipping entry due to error: {err}");
                continue;
            }
        };

        if !entry.file_type().is_file() || is_hidden(entry.path()) {
            continue;
        }

        let rel_path = normalize_path(&relative_path(&root_dir, entry.path()));
        if let Some(matcher) = matcher.as_ref() {
            if !matcher.is_match(&rel_path) {
                continue;
            }
        }

        if let Some(file) = read_source(entry.path(), rel_path, options.max_file_bytes) {
            files.push(file);
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    log::info!("Loaded {} files from {}", files.len(), path.display());
    Ok(files)
}

/// Read one file, skipping it when it is too large, unreadable or not UTF-8.
fn read_source(path: &Path, rel_path: String, max_bytes: u64) -> Option<SourceFile> {
    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(err) => {
            log::debug!("Skipping {rel_path}: {err}");
            return None;
        }
    };
    if size > max_bytes {
        log::debug!("Skipping {rel_path}: {size} bytes exceeds {max_bytes}");
        return None;
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::debug!("Skipping {rel_path}: {err}");
            return None;
        }
    };
    match String::from_utf8(bytes) {
        Ok(content) => Some(SourceFile::from_path(rel_path, content)),
        Err(_) => {
            log::debug!("Skipping {rel_path}: not valid UTF-8");
            None
        }
    }
}

fn build_globset(pattern: &str) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    builder.add(Glob::new(pattern)?);
    builder.build().map_err(Into::into)
}

fn should_descend(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }

    let Some(name) = entry.file_name().to_str() else {
        return false;
    };

    if name.starts_with('.') {
        return false;
    }

    !IGNORED_DIR_NAMES
        .iter()
        .any(|skip| skip.eq_ignore_ascii_case(name))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn relative_path(root: &Path, file: &Path) -> PathBuf {
    match file.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
        _ => file
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| file.to_path_buf()),
    }
}

fn normalize_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
