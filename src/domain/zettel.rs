//! The zettel model: one published note and how other notes address it.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::patterns::Patterns;

/// Errors constructing a zettel. All of these are fatal to a run: a malformed
/// source note would otherwise produce broken links site-wide.
#[derive(Debug, Error)]
pub enum ZettelError {
    #[error("zettel missing a level-1 header title: {path}")]
    MissingTitle { path: PathBuf },

    #[error("zettel path has no file name: {path}")]
    InvalidPath { path: PathBuf },

    #[error("failed to read zettel {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("zettel is not valid UTF-8: {path}")]
    InvalidEncoding { path: PathBuf },
}

/// One discovered note.
///
/// The `path` is the single mutable handle the pipeline holds: it is updated
/// in place as the file is copied from the zettelkasten into the site tree.
/// `folder` stays the note's original directory, because relative attachment
/// links in the body are relative to where the note was authored.
#[derive(Debug, Clone)]
pub struct Zettel {
    pub path: PathBuf,
    pub folder: PathBuf,
    /// File name including the extension.
    pub file_name: String,
    /// File name without the extension; the fallback identifier.
    pub file_stem: String,
    /// The stable identifier, when the note has one.
    pub id: Option<String>,
    pub title: String,
    /// The canonical wiki-link text other notes are expected to use:
    /// `[[id]] title` when an ID exists, `[[file_stem]]` otherwise.
    pub link: String,
    /// The file-name form `[[file_stem]]`, always available; matched as a
    /// fallback when the canonical form has gone stale.
    pub alt_link: String,
    /// Every tag in the body, in order, duplicates preserved.
    pub tags: Vec<String>,
}

impl Zettel {
    /// Reads and parses the note at `path`.
    pub fn from_path(path: &Path, patterns: &Patterns) -> Result<Self, ZettelError> {
        let bytes = std::fs::read(path).map_err(|source| ZettelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let contents = String::from_utf8(bytes).map_err(|_| ZettelError::InvalidEncoding {
            path: path.to_path_buf(),
        })?;
        Self::new(path, &contents, patterns)
    }

    /// Constructs a zettel from already-read contents. Every derived field is
    /// computed here, from local bindings, with no partial state.
    pub fn new(path: &Path, contents: &str, patterns: &Patterns) -> Result<Self, ZettelError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ZettelError::InvalidPath {
                path: path.to_path_buf(),
            })?
            .to_string();
        let file_stem = path
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or(&file_name)
            .to_string();
        let folder = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();

        let id = patterns
            .id_at_start(&file_stem)
            .or_else(|| patterns.id_outside_link(contents))
            .map(str::to_string);

        let title = match file_name.as_str() {
            "index.md" => "index".to_string(),
            "about.md" => "about".to_string(),
            _ => patterns
                .first_title(contents)
                .map(str::to_string)
                .ok_or_else(|| ZettelError::MissingTitle {
                    path: path.to_path_buf(),
                })?,
        };

        let alt_link = format!(
            "{}{}{}",
            patterns.zk_link_start, file_stem, patterns.zk_link_end
        );
        let link = match &id {
            Some(id) => format!(
                "{}{}{} {}",
                patterns.zk_link_start, id, patterns.zk_link_end, title
            ),
            None => alt_link.clone(),
        };

        Ok(Self {
            path: path.to_path_buf(),
            folder,
            file_name,
            file_stem,
            id,
            title,
            link,
            alt_link,
            tags: patterns.tags(contents),
        })
    }

    /// Records the note's new location after a copy. The original folder is
    /// kept for attachment resolution.
    pub fn set_path(&mut self, new_path: PathBuf) {
        self.path = new_path;
    }

    /// The `.html` path corresponding to the note's current path.
    pub fn html_path(&self) -> PathBuf {
        self.path.with_extension("html")
    }
}

/// Resolves a wiki-link's contents to a zettel.
///
/// Tries, in order: ID equality (only when the identifier starts with an ID
/// match, so a numeric file name cannot shadow a genuine ID lookup), file
/// stem equality, then file name with extension. Returns the first match in
/// collection order; IDs are assumed unique and duplicates are not detected.
pub fn find_zettel<'a>(
    identifier: &str,
    zettels: &'a [Zettel],
    patterns: &Patterns,
) -> Option<&'a Zettel> {
    if patterns.id_at_start(identifier).is_some() {
        if let Some(zettel) = zettels.iter().find(|z| z.id.as_deref() == Some(identifier)) {
            return Some(zettel);
        }
    }
    zettels
        .iter()
        .find(|z| z.file_stem == identifier)
        .or_else(|| zettels.iter().find(|z| z.file_name == identifier))
}
