//! Finds HTML files left over from earlier runs and asks what to do with
//! them.
//!
//! A file can be protected from this pass by putting its absolute path on
//! its own line in `ssg-ignore.txt` in the site folder. Trashing moves the
//! file into `.trash/` inside the site folder rather than deleting it, so a
//! wrong answer at the prompt is recoverable.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::infra::{normalize_path, FsError};

/// What to do with one stale file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleAction {
    /// Leave the file in place.
    Keep,
    /// Move the file into the site's trash folder.
    Trash,
    /// Open the file for inspection, then ask again.
    Open,
}

/// Decides the fate of stale files, one at a time.
pub trait ConfirmStale {
    fn confirm(&mut self, path: &Path) -> StaleAction;
    /// Invoked when [`StaleAction::Open`] is chosen, before re-prompting.
    fn open(&mut self, _path: &Path) {}
}

/// Keeps every stale file without asking.
pub struct KeepAll;

impl ConfirmStale for KeepAll {
    fn confirm(&mut self, _path: &Path) -> StaleAction {
        StaleAction::Keep
    }
}

/// Compares the HTML files present before the run against the ones this run
/// produced and prompts for each file only the previous run accounts for.
/// Returns the paths that were moved to the trash folder.
pub fn reconcile(
    old_html_paths: &[PathBuf],
    new_html_paths: &[PathBuf],
    site_dir: &Path,
    confirm: &mut dyn ConfirmStale,
) -> Result<Vec<PathBuf>, FsError> {
    let ignored = read_ignore_list(site_dir)?;
    let new_paths: HashSet<PathBuf> = new_html_paths.iter().map(|p| normalize_path(p)).collect();

    let mut trashed = Vec::new();
    let mut stale_count = 0;
    for old_path in old_html_paths {
        let old_path = normalize_path(old_path);
        let name = old_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if new_paths.contains(&old_path)
            || name == "header.html"
            || name == "footer.html"
            || ignored.contains(&old_path)
        {
            continue;
        }
        stale_count += 1;

        loop {
            match confirm.confirm(&old_path) {
                StaleAction::Open => confirm.open(&old_path),
                StaleAction::Keep => break,
                StaleAction::Trash => {
                    trashed.push(move_to_trash(&old_path, site_dir)?);
                    break;
                }
            }
        }
    }

    if stale_count == 0 {
        info!("no stale HTML files found");
    } else {
        info!(
            "{} stale HTML files, {} moved to the trash folder",
            stale_count,
            trashed.len()
        );
    }
    Ok(trashed)
}

fn read_ignore_list(site_dir: &Path) -> Result<HashSet<PathBuf>, FsError> {
    let ignore_path = site_dir.join("ssg-ignore.txt");
    if !ignore_path.exists() {
        info!("ssg-ignore.txt not found");
        return Ok(HashSet::new());
    }
    let contents = crate::infra::read_text(&ignore_path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| normalize_path(Path::new(line)))
        .collect())
}

fn move_to_trash(path: &Path, site_dir: &Path) -> Result<PathBuf, FsError> {
    let trash_dir = site_dir.join(".trash");
    std::fs::create_dir_all(&trash_dir).map_err(|source| FsError::Io {
        path: trash_dir.clone(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string());
    let mut dest = trash_dir.join(&file_name);
    let mut suffix = 1;
    while dest.exists() {
        dest = trash_dir.join(format!("{file_name}.{suffix}"));
        suffix += 1;
    }

    std::fs::rename(path, &dest).map_err(|source| FsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(dest)
}
