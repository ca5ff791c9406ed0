//! Wraps the rendered pages in the site's header and footer templates and
//! applies the post-render touches: copyright notice, index cross-links, and
//! code block highlighting.
//!
//! The templates live in the site folder as `header.html` and `footer.html`.
//! Defaults are provided on first run and never overwritten afterward, so
//! users can edit them freely. The only substitution syntax is three literal
//! tokens: `{{site_title}}`, `{{folder}}`, and `{{footer_text}}`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::config::Config;
use crate::infra::{provide_default_file, read_text, write_text};

pub const DEFAULT_HEADER: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{{site_title}}</title>
    <link rel="stylesheet" href="{{folder}}style.css">
</head>
<body>
<header>
    <h1>{{site_title}}</h1>
    <nav>
        <a href="{{folder}}index.html">home</a>
        <a href="{{folder}}about.html">about</a>
        <a href="{{folder}}alphabetical-index.html">index</a>
    </nav>
</header>
<main>
"#;

pub const DEFAULT_FOOTER: &str = r#"</main>
<footer>
    <p>{{footer_text}}</p>
</footer>
</body>
</html>
"#;

/// Produces HTML fragments inserted into `<code>` blocks in place of the
/// plain escaped code.
///
/// `language` is the bare language name from the renderer's
/// `language-` class. Returning `None` leaves the block untouched.
pub trait Highlighter {
    fn highlight(&self, code: &str, language: &str) -> Option<String>;
}

/// Leaves every code block as plain escaped text.
pub struct NoHighlight;

impl Highlighter for NoHighlight {
    fn highlight(&self, _code: &str, _language: &str) -> Option<String> {
        None
    }
}

/// Wraps each HTML file with the site's header and footer templates.
///
/// Pages in the site root reference site-root assets directly; pages in the
/// subfolder reach them through `../`.
pub fn wrap_all(site_dir: &Path, html_paths: &[PathBuf], config: &Config) -> Result<()> {
    let header_path = provide_default_file(site_dir, "header.html", DEFAULT_HEADER)?;
    let footer_path = provide_default_file(site_dir, "footer.html", DEFAULT_FOOTER)?;
    let header_template = read_text(&header_path)?;
    let footer_template = read_text(&footer_path)?;
    let footer = footer_template.replace("{{footer_text}}", "");

    for path in html_paths {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let folder = if config.is_root_page(stem) { "" } else { "../" };
        let header = header_template
            .replace("{{site_title}}", &config.site_title)
            .replace("{{folder}}", folder);

        let contents = read_text(path)?;
        write_text(path, &format!("{header}{contents}{footer}"))?;
    }
    info!("wrapped {} pages in the site template", html_paths.len());
    Ok(())
}

/// Appends the copyright notice to the end of index.html.
pub fn append_copyright(site_dir: &Path, copyright_text: &str) -> Result<()> {
    let index_path = site_dir.join("index.html");
    let contents = read_text(&index_path)
        .with_context(|| format!("failed to read {}", index_path.display()))?;
    let notice = format!(
        "<br><br><br><br><br><br><br><p style=\"text-align: center\">{copyright_text}</p>"
    );
    write_text(&index_path, &format!("{contents}{notice}"))?;
    Ok(())
}

/// Inserts "sort by" links into each index page, just inside `<main>`.
/// Must run after the template wrap, which is what provides `<main>`.
pub fn insert_index_links(site_dir: &Path) -> Result<()> {
    let inserts = [
        (
            "index.html",
            "<p>sort by: <a href=\"alphabetical-index.html\">α</a> \
             <a href=\"chronological-index.html\">🕑</a></p>",
        ),
        (
            "alphabetical-index.html",
            "<p>sort by: <a href=\"index.html\">💡</a> \
             <a href=\"chronological-index.html\">🕑</a></p>",
        ),
        (
            "chronological-index.html",
            "<p>sort by: <a href=\"alphabetical-index.html\">α</a> \
             <a href=\"index.html\">💡</a></p>",
        ),
    ];
    for (file_name, links) in inserts {
        let path = site_dir.join(file_name);
        if !path.exists() {
            continue;
        }
        let contents = read_text(&path)?;
        let updated = contents.replacen("<main>", &format!("<main>\n{links}"), 1);
        write_text(&path, &updated)?;
    }
    Ok(())
}

/// Runs the highlighter over every fenced code block in the HTML files.
///
/// The renderer marks fenced blocks with a `language-X` class and escapes
/// the code body; the body is unescaped before it reaches the highlighter.
pub fn highlight_code_blocks(html_paths: &[PathBuf], highlighter: &dyn Highlighter) -> Result<()> {
    for path in html_paths {
        let contents = read_text(path)?;
        let mut updated = contents.clone();
        let mut changed = false;

        let mut search_from = 0;
        while let Some(offset) = contents[search_from..].find("<code class=\"language-") {
            let class_start = search_from + offset + "<code class=\"language-".len();
            let Some(class_len) = contents[class_start..].find('"') else {
                break;
            };
            let language = &contents[class_start..class_start + class_len];
            let Some(body_offset) = contents[class_start..].find('>') else {
                break;
            };
            let body_start = class_start + body_offset + 1;
            let Some(body_len) = contents[body_start..].find("</code>") else {
                break;
            };
            let escaped = &contents[body_start..body_start + body_len];
            search_from = body_start + body_len;

            let code = unescape_entities(escaped);
            if let Some(highlighted) = highlighter.highlight(&code, language) {
                updated = updated.replacen(escaped, &highlighted, 1);
                changed = true;
            }
        }
        if changed {
            write_text(path, &updated)?;
        }
    }
    Ok(())
}

fn unescape_entities(escaped: &str) -> String {
    escaped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn config_for(site: &Path) -> Config {
        let mut config = Config::default();
        config.site_dir = site.to_path_buf();
        config.site_title = "My Notes".into();
        config
    }

    #[test]
    fn wrap_substitutes_title_and_folder() {
        let site = TempDir::new().unwrap();
        std::fs::create_dir(site.path().join("pages")).unwrap();
        let root_page = site.path().join("index.html");
        let sub_page = site.path().join("pages/20200101000000.html");
        std::fs::write(&root_page, "<h1>index</h1>\n").unwrap();
        std::fs::write(&sub_page, "<h1>Alpha</h1>\n").unwrap();

        let config = config_for(site.path());
        wrap_all(
            site.path(),
            &[root_page.clone(), sub_page.clone()],
            &config,
        )
        .unwrap();

        let root = std::fs::read_to_string(&root_page).unwrap();
        assert!(root.contains("<title>My Notes</title>"));
        assert!(root.contains("href=\"style.css\""));
        assert!(root.contains("<h1>index</h1>"));
        assert!(root.ends_with("</html>\n"));

        let sub = std::fs::read_to_string(&sub_page).unwrap();
        assert!(sub.contains("href=\"../style.css\""));
        assert!(sub.contains("href=\"../index.html\""));
        // Footer text token is cleared, not left in place.
        assert!(!sub.contains("{{footer_text}}"));
    }

    #[test]
    fn existing_templates_are_respected() {
        let site = TempDir::new().unwrap();
        std::fs::write(site.path().join("header.html"), "<custom>{{site_title}}\n<main>\n").unwrap();
        std::fs::write(site.path().join("footer.html"), "</main>\n").unwrap();
        let page = site.path().join("index.html");
        std::fs::write(&page, "body\n").unwrap();

        wrap_all(site.path(), &[page.clone()], &config_for(site.path())).unwrap();
        let out = std::fs::read_to_string(&page).unwrap();
        assert!(out.starts_with("<custom>My Notes"));
    }

    #[test]
    fn copyright_lands_at_the_end_of_the_index() {
        let site = TempDir::new().unwrap();
        let index = site.path().join("index.html");
        std::fs::write(&index, "<main></main>\n").unwrap();

        append_copyright(site.path(), "© 2024, someone").unwrap();
        let out = std::fs::read_to_string(&index).unwrap();
        assert!(out.ends_with("<p style=\"text-align: center\">© 2024, someone</p>"));
    }

    #[test]
    fn index_links_go_inside_main() {
        let site = TempDir::new().unwrap();
        std::fs::write(site.path().join("index.html"), "<main>\n<p>hi</p>\n</main>\n").unwrap();
        std::fs::write(
            site.path().join("alphabetical-index.html"),
            "<main>\n</main>\n",
        )
        .unwrap();

        insert_index_links(site.path()).unwrap();
        let index = std::fs::read_to_string(site.path().join("index.html")).unwrap();
        assert!(index.contains("<main>\n<p>sort by: <a href=\"alphabetical-index.html\">α</a>"));
        let alpha =
            std::fs::read_to_string(site.path().join("alphabetical-index.html")).unwrap();
        assert!(alpha.contains("<a href=\"index.html\">💡</a>"));
    }

    struct Shout;
    impl Highlighter for Shout {
        fn highlight(&self, code: &str, language: &str) -> Option<String> {
            if language == "rust" {
                Some(format!("<span class=\"hl\">{}</span>", code.to_uppercase()))
            } else {
                None
            }
        }
    }

    #[test]
    fn highlighter_sees_unescaped_code_in_marked_blocks() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("a.html");
        std::fs::write(
            &page,
            "<pre><code class=\"language-rust\">if a &lt; b {}\n</code></pre>\n\
             <pre><code class=\"language-toml\">x = 1\n</code></pre>\n\
             <pre><code>plain\n</code></pre>\n",
        )
        .unwrap();

        highlight_code_blocks(&[page.clone()], &Shout).unwrap();
        let out = std::fs::read_to_string(&page).unwrap();
        assert!(out.contains("<span class=\"hl\">IF A < B {}\n</span>"));
        // Unknown language and unmarked blocks stay escaped and untouched.
        assert!(out.contains("x = 1"));
        assert!(out.contains("<pre><code>plain\n</code></pre>"));
    }

    #[test]
    fn no_highlight_leaves_files_untouched() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("a.html");
        let original = "<pre><code class=\"language-rust\">let x = 1;\n</code></pre>\n";
        std::fs::write(&page, original).unwrap();

        highlight_code_blocks(&[page.clone()], &NoHighlight).unwrap();
        assert_eq!(std::fs::read_to_string(&page).unwrap(), original);
    }
}
