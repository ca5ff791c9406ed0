//! Finds attachment references (images, PDFs) in note text and copies the
//! files into the site tree.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::{Patterns, Zettel};
use crate::infra::{normalize_path, read_text, rewrite_files_guarded, FsError};

/// Extracts the attachment paths referenced by markdown links in `contents`.
///
/// Relative targets are resolved against `folder` (the note's original
/// directory). Only targets that exist on disk are kept: anything else is an
/// external URL or an intentionally absent file, not an error.
pub fn attachment_paths(contents: &str, folder: &Path, patterns: &Patterns) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for caps in patterns.link_path.captures_iter(contents) {
        let target = match caps.get(1) {
            Some(m) => m.as_str(),
            None => continue,
        };
        let candidate = if Path::new(target).is_absolute() {
            PathBuf::from(target)
        } else {
            folder.join(target)
        };
        let candidate = normalize_path(&candidate);
        if candidate.exists() {
            paths.push(candidate);
        }
    }
    paths
}

/// Rewrites absolute attachment links to their bare file name, so the link
/// still resolves once note and attachment sit together in the site tree.
///
/// A match is only rewritten when the absolute path resolves to an existing
/// file; bracketed text that merely looks like a path is left alone.
pub fn relativize_absolute_links(
    paths: &[PathBuf],
    patterns: &Patterns,
) -> Result<usize, FsError> {
    rewrite_files_guarded(paths, patterns, |text| {
        let mut out = String::with_capacity(text.len());
        let mut last_end = 0;
        let mut replaced = 0;
        for caps in patterns.absolute_attachment_link.captures_iter(text) {
            let (whole, absolute, file_name) =
                match (caps.get(0), caps.get(1), caps.get(2)) {
                    (Some(w), Some(a), Some(f)) => (w, a.as_str(), f.as_str()),
                    _ => continue,
                };
            let fs_path = absolute.strip_prefix("file://").unwrap_or(absolute);
            if Path::new(fs_path).is_file() {
                out.push_str(&text[last_end..whole.start()]);
                out.push_str("](");
                out.push_str(file_name);
                out.push(')');
                last_end = whole.end();
                replaced += 1;
            }
        }
        out.push_str(&text[last_end..]);
        (out, replaced)
    })
}

/// Copies every attachment referenced by the zettels into the pages folder.
/// Copying a file onto itself is informational, not an error.
pub fn copy_attachments(
    zettels: &[Zettel],
    pages_dir: &Path,
    patterns: &Patterns,
) -> Result<usize> {
    let mut count = 0;
    for zettel in zettels {
        let contents = read_text(&zettel.path)?;
        for source in attachment_paths(&contents, &zettel.folder, patterns) {
            let file_name = match source.file_name() {
                Some(name) => name,
                None => continue,
            };
            let dest = pages_dir.join(file_name);
            if normalize_path(&source) == normalize_path(&dest) {
                info!(
                    "did not copy {} because it is already there",
                    file_name.to_string_lossy()
                );
                continue;
            }
            std::fs::copy(&source, &dest).with_context(|| {
                format!("failed to copy attachment {}", source.display())
            })?;
            count += 1;
        }
    }
    Ok(count)
}
