//! Finds the publishable subset of the zettelkasten and copies it into the
//! site tree.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::config::Config;
use crate::domain::{Patterns, Zettel};
use crate::infra::{files_with_extensions, read_text};

/// Scans `zettelkasten_dir` for notes carrying the publish marker.
///
/// Paths are scanned in sorted order so the discovery order (which later
/// determines "undated" listing order and resolution ties) is deterministic.
/// An unreadable or undecodable file aborts the run: link resolution assumes
/// the full candidate set is known, so partial publishing is rejected.
pub fn discover_published(
    zettelkasten_dir: &Path,
    extensions: &[String],
    patterns: &Patterns,
) -> Result<Vec<Zettel>> {
    let paths = files_with_extensions(zettelkasten_dir, extensions)
        .with_context(|| format!("failed to scan {}", zettelkasten_dir.display()))?;

    let mut zettels = Vec::new();
    for path in paths {
        let contents = read_text(&path)?;
        if patterns.is_published(&contents) {
            zettels.push(Zettel::new(&path, &contents, patterns)?);
        }
    }
    info!("found {} published zettels", zettels.len());
    Ok(zettels)
}

/// Copies each zettel into the site tree and updates its path in place:
/// root pages go to the site root, everything else to the pages subfolder.
pub fn copy_to_site(zettels: &mut [Zettel], config: &Config) -> Result<()> {
    let pages_dir = config.pages_dir();
    for zettel in zettels.iter_mut() {
        let target_dir = if config.is_root_page(&zettel.file_stem) {
            config.site_dir.as_path()
        } else {
            pages_dir.as_path()
        };
        let new_path = target_dir.join(&zettel.file_name);
        std::fs::copy(&zettel.path, &new_path)
            .with_context(|| format!("failed to copy {} into the site", zettel.path.display()))?;
        zettel.set_path(new_path);
    }
    Ok(())
}

/// Removes the markdown files left in the pages subfolder by a previous run.
/// They are regenerated from the zettelkasten every time.
pub fn clear_stale_markdown(pages_dir: &Path, extensions: &[String]) -> Result<()> {
    for path in files_with_extensions(pages_dir, extensions)? {
        std::fs::remove_file(&path)
            .with_context(|| format!("failed to remove {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PatternConfig;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn patterns() -> Patterns {
        Patterns::compile(&PatternConfig::default()).unwrap()
    }

    fn md_exts() -> Vec<String> {
        vec![".md".into(), ".markdown".into()]
    }

    #[test]
    fn only_marked_notes_are_discovered() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("20200101000000.md"),
            "# Alpha\n\nbody #published \n",
        )
        .unwrap();
        std::fs::write(dir.path().join("draft.md"), "# Draft\n\nno marker\n").unwrap();
        std::fs::write(
            dir.path().join("sneaky.md"),
            "# Sneaky\n\nword#published glued\n",
        )
        .unwrap();

        let zettels = discover_published(dir.path(), &md_exts(), &patterns()).unwrap();
        let titles: Vec<_> = zettels.iter().map(|z| z.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha"]);
    }

    #[test]
    fn undecodable_note_aborts_discovery() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.md"), [0xFF, 0xFE, 0x01]).unwrap();
        assert!(discover_published(dir.path(), &md_exts(), &patterns()).is_err());
    }

    #[test]
    fn marked_note_without_title_aborts_discovery() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("20200101000000.md"),
            "no header #published \n",
        )
        .unwrap();
        assert!(discover_published(dir.path(), &md_exts(), &patterns()).is_err());
    }

    #[test]
    fn copy_splits_root_pages_from_the_rest() {
        let zk = TempDir::new().unwrap();
        let site = TempDir::new().unwrap();
        std::fs::write(zk.path().join("index.md"), "body #published \n").unwrap();
        std::fs::write(
            zk.path().join("20200101000000.md"),
            "# Alpha\n\nbody #published \n",
        )
        .unwrap();

        let mut config = Config::default();
        config.site_dir = site.path().to_path_buf();
        std::fs::create_dir(config.pages_dir()).unwrap();

        let mut zettels = discover_published(zk.path(), &md_exts(), &patterns()).unwrap();
        copy_to_site(&mut zettels, &config).unwrap();

        assert!(site.path().join("pages/20200101000000.md").is_file());
        assert!(site.path().join("index.md").is_file());
        // Paths were updated in place; original folders retained.
        let alpha = zettels.iter().find(|z| z.title == "Alpha").unwrap();
        assert_eq!(alpha.path, site.path().join("pages/20200101000000.md"));
        assert_eq!(alpha.folder, zk.path());
    }

    #[test]
    fn clear_stale_markdown_leaves_other_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("old.md"), "x").unwrap();
        std::fs::write(dir.path().join("image.png"), "x").unwrap();
        clear_stale_markdown(dir.path(), &md_exts()).unwrap();
        assert!(!dir.path().join("old.md").exists());
        assert!(dir.path().join("image.png").exists());
    }
}
