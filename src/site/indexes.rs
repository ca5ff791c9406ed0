//! Builds the alphabetical, chronological, and categorical index pages.
//!
//! The alphabetical and chronological indexes are synthesized markdown files;
//! once written they are parsed like any other zettel and appended to the
//! working set, so their links flow through the same rewrite and render
//! passes. The categorical index rewrites a pre-existing note in place.

use anyhow::{bail, Context, Result};

use crate::cli::config::Config;
use crate::domain::{Patterns, Zettel};
use crate::infra::{read_text, write_text};

/// Renders the alphabetical index: every non-root zettel, sorted
/// case-insensitively by title.
pub fn alphabetical_index(zettels: &[Zettel], config: &Config) -> String {
    let mut listed: Vec<&Zettel> = zettels
        .iter()
        .filter(|z| !config.is_root_page(&z.file_stem))
        .collect();
    listed.sort_by_key(|z| z.title.to_lowercase());

    let lines: Vec<String> = listed.iter().map(|z| format!("* {}", z.link)).collect();
    format!("# alphabetical index\n\n{}\n", lines.join("\n"))
}

/// Renders the chronological index: zettels with IDs sorted newest first,
/// undated zettels appended afterward in discovery order.
pub fn chronological_index(zettels: &[Zettel], config: &Config) -> String {
    let non_root: Vec<&Zettel> = zettels
        .iter()
        .filter(|z| !config.is_root_page(&z.file_stem))
        .collect();

    let mut dated: Vec<&Zettel> = non_root
        .iter()
        .copied()
        .filter(|z| z.id.is_some())
        .collect();
    dated.sort_by(|a, b| b.id.cmp(&a.id));

    let mut out = String::from("# chronological index\n\n");
    if !config.hide_chrono_index_dates {
        out.push_str(
            "_Dates shown here are the original file creation dates, not necessarily \
             latest edit or post dates._\n\n",
        );
    }

    let dated_lines: Vec<String> = dated
        .iter()
        .map(|z| {
            let id = z.id.as_deref().unwrap_or_default();
            if !config.hide_chrono_index_dates && id.len() >= 8 {
                format!("* {}/{}/{} {}", &id[0..4], &id[4..6], &id[6..8], z.link)
            } else {
                format!("* {}", z.link)
            }
        })
        .collect();
    out.push_str(&dated_lines.join("\n"));

    let undated_lines: Vec<String> = non_root
        .iter()
        .filter(|z| z.id.is_none())
        .map(|z| format!("* {}", z.link))
        .collect();
    if !undated_lines.is_empty() {
        out.push_str("\n\n### undated pages\n\n");
        out.push_str(&undated_lines.join("\n"));
    }
    out.push('\n');
    out
}

/// Writes the alphabetical index into the site folder and appends it to the
/// working set.
pub fn write_alphabetical_index(
    zettels: &mut Vec<Zettel>,
    config: &Config,
    patterns: &Patterns,
) -> Result<()> {
    let contents = alphabetical_index(zettels, config);
    let path = config.site_dir.join("alphabetical-index.md");
    write_text(&path, &contents)?;
    zettels.push(Zettel::new(&path, &contents, patterns)?);
    Ok(())
}

/// Writes the chronological index into the site folder and appends it to the
/// working set.
pub fn write_chronological_index(
    zettels: &mut Vec<Zettel>,
    config: &Config,
    patterns: &Patterns,
) -> Result<()> {
    let contents = chronological_index(zettels, config);
    let path = config.site_dir.join("chronological-index.md");
    write_text(&path, &contents)?;
    zettels.push(Zettel::new(&path, &contents, patterns)?);
    Ok(())
}

/// Rewrites the categorical index note in place: each tag in its body is
/// replaced (first occurrence) with a bullet list of links to the published
/// non-root zettels carrying that tag; zettels matching none of the declared
/// tags land in an `#other` bucket, inserted where the body carries that
/// token.
///
/// The categorical index note is structurally required: it must be among the
/// published zettels and carry the publish marker, or the run aborts.
pub fn edit_categorical_index(
    zettels: &[Zettel],
    config: &Config,
    patterns: &Patterns,
) -> Result<()> {
    let index_zettel = match zettels
        .iter()
        .find(|z| z.file_name == config.categorical_index_file)
    {
        Some(z) => z,
        None => bail!(
            "{} is required but was not found among the published zettels",
            config.categorical_index_file
        ),
    };
    let mut contents = read_text(&index_zettel.path)
        .with_context(|| format!("failed to read {}", index_zettel.path.display()))?;
    if !patterns.is_published(&contents) {
        bail!(
            "{} must have the publish marker tag",
            config.categorical_index_file
        );
    }

    // The declared categories: every tag in the index body except the
    // publish marker, first occurrence wins.
    let mut index_tags: Vec<String> = Vec::new();
    for tag in patterns.tags(&contents) {
        let is_marker = patterns.is_published(&format!(" {} ", tag));
        if !is_marker && !index_tags.contains(&tag) {
            index_tags.push(tag);
        }
    }

    let non_root: Vec<&Zettel> = zettels
        .iter()
        .filter(|z| !config.is_root_page(&z.file_stem))
        .collect();
    let mut unlinked: Vec<&Zettel> = non_root.clone();

    let mut categories: Vec<(String, Vec<String>)> = Vec::new();
    for index_tag in &index_tags {
        let mut lines = Vec::new();
        for zettel in &non_root {
            if zettel.tags.iter().any(|t| t == index_tag) {
                lines.push(format!("* {}", zettel.link));
                unlinked.retain(|z| !std::ptr::eq(*z, *zettel));
            }
        }
        categories.push((index_tag.clone(), lines));
    }
    if !unlinked.is_empty() {
        let lines: Vec<String> = unlinked.iter().map(|z| format!("* {}", z.link)).collect();
        // `#other` may also be one of the declared tags; merge instead of
        // adding a second replacement for the same token.
        match categories.iter_mut().find(|(tag, _)| tag == "#other") {
            Some((_, existing)) => existing.extend(lines),
            None => categories.push(("#other".to_string(), lines)),
        }
    }

    for (tag, lines) in categories {
        contents = contents.replacen(&tag, &lines.join("\n"), 1);
    }
    write_text(&index_zettel.path, &contents)?;
    Ok(())
}
