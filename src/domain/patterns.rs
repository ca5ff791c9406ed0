//! The compiled text patterns shared by every pipeline stage.
//!
//! All patterns are injectable configuration: the defaults match Zettlr-style
//! notes (14-digit IDs, `[[...]]` links), but the ID syntax and the link
//! delimiters can be changed in the config file. Centralizing them here keeps
//! every stage in agreement about what counts as a tag, a link, or a code
//! span.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pattern strings as they appear in the config file.
///
/// Group conventions (the code relies on these):
/// - `tag`: group 1 is the leading whitespace, group 2 the tag itself
///   (including `#`).
/// - `h1_content`: group 1 is the header text.
/// - `link_path`: group 1 is the link target.
/// - `absolute_attachment_link`: group 1 is the full absolute path, group 2
///   the trailing file name with extension.
/// - `md_ext_in_link`: group 1 is the character preceding the extension.
/// - `md_link`: group 1 is the display text, group 2 the target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub zk_id: String,
    pub h1_content: String,
    pub tag: String,
    pub published_tag: String,
    pub md_link: String,
    pub link_path: String,
    pub absolute_attachment_link: String,
    pub md_ext_in_link: String,
    pub fenced_codeblock: String,
    pub inline_codeblock: String,
    pub zk_link_start: String,
    pub zk_link_end: String,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            zk_id: r"\d{14}".into(),
            h1_content: r"(?m)^# (.+)$".into(),
            tag: r"(\s)(#[a-zA-Z0-9_-]+)".into(),
            published_tag: r"\s#published\s".into(),
            md_link: r"\[(.+)\]\((.+)\)".into(),
            link_path: r"\]\(([^)\n]+)\)".into(),
            absolute_attachment_link:
                r"\]\(((?:file://)?(?:[a-zA-Z]:|/)[^)\n]*?([^\\/)\n]+\.[a-zA-Z0-9_-]+))\)".into(),
            md_ext_in_link: r"(?i)(\S)\.(?:md|markdown)\)".into(),
            fenced_codeblock: "(?s)\n(`{3}.*?\n`{3})".into(),
            inline_codeblock: "(`[^`]+?`)".into(),
            zk_link_start: "[[".into(),
            zk_link_end: "]]".into(),
        }
    }
}

/// Error compiling a configured pattern.
#[derive(Debug, Error)]
#[error("invalid `{name}` pattern: {source}")]
pub struct PatternError {
    pub name: &'static str,
    #[source]
    pub source: regex::Error,
}

/// The compiled pattern set.
#[derive(Debug)]
pub struct Patterns {
    pub zk_id: Regex,
    pub h1_content: Regex,
    pub tag: Regex,
    pub published_tag: Regex,
    pub md_link: Regex,
    pub link_path: Regex,
    pub absolute_attachment_link: Regex,
    pub md_ext_in_link: Regex,
    pub fenced_codeblock: Regex,
    pub inline_codeblock: Regex,
    /// Matches a whole zettelkasten link; group 1 is the contents between the
    /// delimiters. Assembled from the configured delimiters.
    pub zk_link_contents: Regex,
    /// The configured ID pattern anchored to the start of its input.
    zk_id_at_start: Regex,
    pub zk_link_start: String,
    pub zk_link_end: String,
}

impl Patterns {
    pub fn compile(config: &PatternConfig) -> Result<Self, PatternError> {
        fn build(name: &'static str, pattern: &str) -> Result<Regex, PatternError> {
            Regex::new(pattern).map_err(|source| PatternError { name, source })
        }

        let zk_link_contents = build(
            "zk link contents",
            &format!(
                "{}(.+?){}",
                regex::escape(&config.zk_link_start),
                regex::escape(&config.zk_link_end)
            ),
        )?;
        let zk_id_at_start = build("zk id", &format!("^(?:{})", config.zk_id))?;

        Ok(Self {
            zk_id: build("zk id", &config.zk_id)?,
            h1_content: build("h1 content", &config.h1_content)?,
            tag: build("tag", &config.tag)?,
            published_tag: build("published tag", &config.published_tag)?,
            md_link: build("md link", &config.md_link)?,
            link_path: build("link path", &config.link_path)?,
            absolute_attachment_link: build(
                "absolute attachment link",
                &config.absolute_attachment_link,
            )?,
            md_ext_in_link: build("md ext in link", &config.md_ext_in_link)?,
            fenced_codeblock: build("fenced codeblock", &config.fenced_codeblock)?,
            inline_codeblock: build("inline codeblock", &config.inline_codeblock)?,
            zk_link_contents,
            zk_id_at_start,
            zk_link_start: config.zk_link_start.clone(),
            zk_link_end: config.zk_link_end.clone(),
        })
    }

    /// Returns the ID at the start of `text`, if the text begins with one.
    pub fn id_at_start<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.zk_id_at_start.find(text).map(|m| m.as_str())
    }

    /// Searches `text` for an ID that is not part of a zettelkasten link and
    /// not escaped with a backslash.
    pub fn id_outside_link<'t>(&self, text: &'t str) -> Option<&'t str> {
        for m in self.zk_id.find_iter(text) {
            let before = &text[..m.start()];
            if before.ends_with(&self.zk_link_start) || before.ends_with('\\') {
                continue;
            }
            return Some(m.as_str());
        }
        None
    }

    /// Returns the content of the first level-1 header in `text`.
    pub fn first_title<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.h1_content
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    /// Returns every tag in `text`, in order, duplicates preserved.
    pub fn tags(&self, text: &str) -> Vec<String> {
        self.tag
            .captures_iter(text)
            .filter_map(|c| c.get(2))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Whether `text` carries the whitespace-bounded publish marker.
    pub fn is_published(&self, text: &str) -> bool {
        self.published_tag.is_match(text)
    }
}
