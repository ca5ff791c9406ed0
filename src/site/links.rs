//! The link conversion core: rewrites wiki-style cross-references into
//! markdown links, then redirects markdown link targets to their HTML
//! counterparts.
//!
//! The source notes are tolerated as authored: references may use an ID or a
//! bare file name, display text may have gone stale after a retitle, and
//! references may point at nothing. Broken references warn and stay as they
//! are; stale display text warns but the resolved target wins.

use std::path::PathBuf;

use tracing::warn;

use crate::cli::config::Config;
use crate::domain::{find_zettel, Patterns, Zettel};
use crate::infra::{read_text, rewrite_files_guarded, rewrite_guarded, write_text, FsError};

/// A caller-supplied strategy producing the markdown link text that replaces
/// a wiki link from the first zettel to the second.
pub type MdLinker<'a> = dyn Fn(&Zettel, &Zettel) -> String + 'a;

/// A non-fatal problem found while converting one zettel's links.
#[derive(Debug)]
pub struct LinkWarning {
    /// The wiki link as written, delimiters included.
    pub link: String,
    /// Title of the zettel the link occurs in.
    pub zettel_title: String,
    /// Path of the zettel the link occurs in.
    pub path: PathBuf,
    pub kind: WarningKind,
}

#[derive(Debug, PartialEq, Eq)]
pub enum WarningKind {
    /// The reference resolves to no published zettel; the occurrence is left
    /// unmodified.
    Broken,
    /// The reference resolved, but the note's inline text no longer matches
    /// the target's canonical link text. The rewrite proceeds with the
    /// resolved target.
    StaleText { expected: String },
}

/// Result of a conversion pass.
#[derive(Debug, Default)]
pub struct ConvertOutcome {
    /// Number of distinct references rewritten.
    pub converted: usize,
    pub warnings: Vec<LinkWarning>,
}

/// The default linker for a site split between a root folder and a pages
/// subfolder: prefixes the configured display prefix and adjusts the target
/// path when source and target land in different directories.
pub fn site_linker(config: &Config) -> impl Fn(&Zettel, &Zettel) -> String + '_ {
    move |source: &Zettel, target: &Zettel| {
        let source_in_root = config.is_root_page(&source.file_stem);
        let target_in_root = config.is_root_page(&target.file_stem);
        let path = if source_in_root && !target_in_root {
            format!("{}/{}", config.site_subfolder_name, target.file_name)
        } else if !source_in_root && target_in_root {
            format!("../{}", target.file_name)
        } else {
            target.file_name.clone()
        };
        format!(
            "[{}{}]({})",
            config.internal_link_prefix, target.title, path
        )
    }
}

/// Converts wiki links to markdown links in every zettel.
pub fn convert_links_to_md(
    zettels: &[Zettel],
    linker: &MdLinker,
    patterns: &Patterns,
) -> Result<ConvertOutcome, FsError> {
    let mut outcome = ConvertOutcome::default();
    for zettel in zettels {
        convert_zettel_links(zettel, zettels, linker, patterns, &mut outcome)?;
    }
    Ok(outcome)
}

/// Converts the links in one zettel and persists the rewritten body.
fn convert_zettel_links(
    zettel: &Zettel,
    zettels: &[Zettel],
    linker: &MdLinker,
    patterns: &Patterns,
    outcome: &mut ConvertOutcome,
) -> Result<(), FsError> {
    let contents = match read_text(&zettel.path) {
        Ok(contents) => contents,
        Err(FsError::NotFound { .. }) => {
            warn!(
                "zettel not found: `{}` at {}",
                zettel.title,
                zettel.path.display()
            );
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let (rewritten, converted) = rewrite_guarded(&contents, patterns, |masked| {
        let mut text = masked.to_string();
        let mut converted = 0;

        // Each distinct reference is handled once; replacement covers every
        // occurrence of both its forms.
        let mut seen: Vec<String> = Vec::new();
        for caps in patterns.zk_link_contents.captures_iter(masked) {
            let content = caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
            if seen.contains(&content) {
                continue;
            }
            seen.push(content);
        }

        for content in seen {
            let link = format!(
                "{}{}{}",
                patterns.zk_link_start, content, patterns.zk_link_end
            );
            let target = match find_zettel(&content, zettels, patterns) {
                Some(target) => target,
                None => {
                    warn!(
                        "broken link detected: \"{}\" in \"{}\" at {}",
                        link,
                        zettel.title,
                        zettel.path.display()
                    );
                    outcome.warnings.push(LinkWarning {
                        link,
                        zettel_title: zettel.title.clone(),
                        path: zettel.path.clone(),
                        kind: WarningKind::Broken,
                    });
                    continue;
                }
            };
            if !text.contains(&target.link) && !text.contains(&target.alt_link) {
                warn!(
                    "unexpected link text for \"{}\" in \"{}\"; expected \"{}\"",
                    link, zettel.title, target.link
                );
                outcome.warnings.push(LinkWarning {
                    link: link.clone(),
                    zettel_title: zettel.title.clone(),
                    path: zettel.path.clone(),
                    kind: WarningKind::StaleText {
                        expected: target.link.clone(),
                    },
                });
            }
            let markdown_link = linker(zettel, target);
            // The `[[x]] title` form first, then any bare `[[x]]` left over.
            text = text.replace(&format!("{} {}", link, target.title), &markdown_link);
            text = text.replace(&link, &markdown_link);
            converted += 1;
        }
        (text, converted)
    });

    if rewritten != contents {
        write_text(&zettel.path, &rewritten)?;
    }
    outcome.converted += converted;
    Ok(())
}

/// Rewrites `.md`-family extensions inside markdown link targets to `.html`.
/// Applied once the HTML files are about to exist; idempotent, since `.html`
/// targets no longer match the extension pattern.
pub fn redirect_links_to_html(
    paths: &[PathBuf],
    patterns: &Patterns,
) -> Result<usize, FsError> {
    rewrite_files_guarded(paths, patterns, |text| {
        let count = patterns.md_ext_in_link.find_iter(text).count();
        let rewritten = patterns
            .md_ext_in_link
            .replace_all(text, "${1}.html)")
            .into_owned();
        (rewritten, count)
    })
}
