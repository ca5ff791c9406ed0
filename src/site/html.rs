//! Markdown to HTML rendering for the site pages.

use std::path::PathBuf;

use pulldown_cmark::{html, Options, Parser};

use crate::domain::{Patterns, Zettel};
use crate::infra::{normalize_path, read_text, rewrite_files_guarded, write_text, FsError};

/// Converts markdown text to HTML.
///
/// Enables common markdown extensions:
/// - Tables
/// - Footnotes
/// - Strikethrough
/// - Task lists
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// Renders a zettel's markdown file to an HTML file next to it and returns
/// the normalized path of the new file.
pub fn create_html_file(zettel: &Zettel) -> Result<PathBuf, FsError> {
    let contents = read_text(&zettel.path)?;
    let rendered = markdown_to_html(&contents);
    let html_path = zettel.html_path();
    write_text(&html_path, &rendered)?;
    Ok(normalize_path(&html_path))
}

/// Rewrites markdown links the renderer left untouched (links embedded in
/// raw HTML blocks pass through verbatim) into anchor tags.
pub fn convert_md_links_to_anchors(
    paths: &[PathBuf],
    patterns: &Patterns,
) -> Result<usize, FsError> {
    rewrite_files_guarded(paths, patterns, |text| {
        let count = patterns.md_link.find_iter(text).count();
        if count == 0 {
            return (text.to_string(), 0);
        }
        let rewritten = patterns
            .md_link
            .replace_all(text, r#"<a href="$2">$1</a>"#)
            .into_owned();
        (rewritten, count)
    })
}
