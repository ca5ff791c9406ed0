//! Configuration file support.
//!
//! Replaces the original tool's settings GUI: one strongly typed struct,
//! loaded from a TOML file, with serde defaults for every field so a missing
//! or partial file still yields a working configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::domain::PatternConfig;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The folder containing the zettelkasten.
    pub zettelkasten_dir: PathBuf,
    /// The folder that will contain the site's files.
    pub site_dir: PathBuf,
    /// Title shown in the site header.
    pub site_title: String,
    /// Copyright notice appended to the index page.
    pub copyright_text: String,
    /// Remove all tags from the copied notes.
    pub hide_tags: bool,
    /// Hide file-creation dates in the chronological index.
    pub hide_chrono_index_dates: bool,
    /// Text prepended to the display text of internal links. May be empty.
    pub internal_link_prefix: String,
    /// Name of the subfolder holding the non-root pages.
    pub site_subfolder_name: String,
    /// File name of the note that serves as the categorical index.
    pub categorical_index_file: String,
    /// File stems of the pages that live in the site root.
    pub root_pages: Vec<String>,
    /// Extensions of files that count as zettels, leading period included.
    pub zettel_file_extensions: Vec<String>,
    pub colors: Colors,
    pub patterns: PatternConfig,
}

/// Site colors patched into style.css.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Colors {
    pub body_background: String,
    pub header_background: String,
    pub header_text: String,
    pub header_hover: String,
    pub body_link: String,
    pub body_hover: String,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            body_background: "#fffafa".into(),
            header_background: "#81b622".into(),
            header_text: "#ecf87f".into(),
            header_hover: "#3d550c".into(),
            body_link: "#59981a".into(),
            body_hover: "#3d550c".into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let year = chrono::Utc::now().year();
        Self {
            zettelkasten_dir: PathBuf::new(),
            site_dir: PathBuf::new(),
            site_title: "Site Title Here".into(),
            copyright_text: format!("© {year}, your name"),
            hide_tags: true,
            hide_chrono_index_dates: true,
            internal_link_prefix: "[§] ".into(),
            site_subfolder_name: "pages".into(),
            categorical_index_file: "index.md".into(),
            root_pages: vec![
                "index".into(),
                "about".into(),
                "alphabetical-index".into(),
                "chronological-index".into(),
            ],
            zettel_file_extensions: vec![".md".into(), ".markdown".into()],
            colors: Colors::default(),
            patterns: PatternConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from the default location when
    /// `path` is `None`. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path(),
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Default config file location: `~/.config/zk-ssg/config.toml`.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zk-ssg")
            .join("config.toml")
    }

    /// Whether a file stem names a root page.
    pub fn is_root_page(&self, file_stem: &str) -> bool {
        self.root_pages.iter().any(|p| p == file_stem)
    }

    /// The site's pages subfolder path.
    pub fn pages_dir(&self) -> PathBuf {
        self.site_dir.join(&self.site_subfolder_name)
    }
}
