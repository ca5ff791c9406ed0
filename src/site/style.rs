//! Provides the site stylesheet and patches the configured colors into it.

use std::path::Path;

use anyhow::Result;
use regex::Regex;
use tracing::error;

use crate::cli::config::Colors;
use crate::infra::{provide_default_file, read_text, write_text};

pub const DEFAULT_STYLE: &str = r#"html body {
    background-color: #fffafa;
    font-family: Georgia, serif;
    margin: 0;
}

header {
    background-color: #81b622;
    padding: 1em 2em;
}

header h1 {
    margin: 0 0 0.3em 0;
}

nav a {
    color: #ecf87f;
    margin-right: 1em;
    text-decoration: none;
}

nav a:hover {
    color: #3d550c;
}

main {
    margin: 0 auto;
    max-width: 42em;
    padding: 1em 2em 4em 2em;
}

main a {
    color: #59981a;
}

main a:hover {
    color: #3d550c;
}

main img {
    max-width: 100%;
}

pre {
    overflow-x: auto;
}
"#;

/// Ensures the site has a style.css and patches the configured colors into
/// it.
///
/// The patch only recognizes the rule layout of the default stylesheet. When
/// any of the six color declarations cannot be located the file is left
/// unmodified and an error is logged; a hand-rewritten stylesheet is not a
/// reason to abort the run.
pub fn check_style(site_dir: &Path, colors: &Colors) -> Result<()> {
    let style_path = provide_default_file(site_dir, "style.css", DEFAULT_STYLE)?;
    let mut contents = read_text(&style_path)?;

    let replacements = [
        (r"(html body \{\n    background-color: )[^;\n]+(;)", &colors.body_background),
        (r"(header \{\n    background-color: )[^;\n]+(;)", &colors.header_background),
        (r"(nav a \{\n    color: )[^;\n]+(;)", &colors.header_text),
        (r"(nav a:hover \{\n    color: )[^;\n]+(;)", &colors.header_hover),
        (r"(main a \{\n    color: )[^;\n]+(;)", &colors.body_link),
        (r"(main a:hover \{\n    color: )[^;\n]+(;)", &colors.body_hover),
    ];

    for (pattern, color) in replacements {
        let re = Regex::new(pattern)?;
        if !re.is_match(&contents) {
            error!("style.css cannot be parsed, leaving it unmodified");
            return Ok(());
        }
        contents = re
            .replacen(&contents, 1, format!("${{1}}{color}${{2}}"))
            .into_owned();
    }
    write_text(&style_path, &contents)?;
    Ok(())
}
