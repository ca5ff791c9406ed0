//! Site generation: the pipeline that turns the published subset of a
//! zettelkasten into a static site.
//!
//! The stages run in a fixed order because later stages consume what earlier
//! stages wrote to disk: discovery and copying first, then the markdown
//! rewrites (indexes, attachments, tags, links), then rendering, then the
//! HTML touches, and finally the stylesheet check and the stale-file
//! reconciliation.

pub mod attachments;
pub mod discover;
pub mod html;
pub mod indexes;
pub mod links;
pub mod reconcile;
pub mod style;
pub mod template;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::config::Config;
use crate::domain::Patterns;
use crate::infra::{files_with_extensions, normalize_path, rewrite_files_guarded};

pub use links::{site_linker, ConvertOutcome, LinkWarning, MdLinker, WarningKind};
pub use reconcile::{ConfirmStale, KeepAll, StaleAction};
pub use template::{Highlighter, NoHighlight};

/// What a generation run did, for the end-of-run summary.
#[derive(Debug, Serialize)]
pub struct GenerateReport {
    /// Zettels carrying the publish marker, generated indexes included.
    pub published: usize,
    /// HTML files written this run.
    pub html_files: usize,
    /// Attachments copied into the pages folder.
    pub attachments: usize,
    /// Distinct internal references rewritten to markdown links.
    pub links_converted: usize,
    /// Broken references and stale link text, in discovery order.
    pub warnings: Vec<String>,
    /// Stale HTML files moved to the site's trash folder.
    pub trashed: Vec<PathBuf>,
}

/// Runs the whole generation pipeline.
pub fn generate(
    config: &Config,
    patterns: &Patterns,
    confirm: &mut dyn ConfirmStale,
    highlighter: &dyn Highlighter,
) -> Result<GenerateReport> {
    if !config.zettelkasten_dir.is_dir() {
        bail!(
            "zettelkasten folder not found: {}",
            config.zettelkasten_dir.display()
        );
    }
    if !config.site_dir.is_dir() {
        bail!("site folder not found: {}", config.site_dir.display());
    }
    if normalize_path(&config.zettelkasten_dir) == normalize_path(&config.site_dir) {
        bail!("the zettelkasten and site folders must be different");
    }

    let mut zettels = discover::discover_published(
        &config.zettelkasten_dir,
        &config.zettel_file_extensions,
        patterns,
    )?;

    let pages_dir = config.pages_dir();
    std::fs::create_dir_all(&pages_dir)
        .with_context(|| format!("failed to create {}", pages_dir.display()))?;
    discover::clear_stale_markdown(&pages_dir, &config.zettel_file_extensions)?;
    discover::copy_to_site(&mut zettels, config)?;

    indexes::edit_categorical_index(&zettels, config, patterns)?;
    indexes::write_alphabetical_index(&mut zettels, config, patterns)?;
    indexes::write_chronological_index(&mut zettels, config, patterns)?;

    let attachments = attachments::copy_attachments(&zettels, &pages_dir, patterns)?;
    info!("copied {} attachments to the pages folder", attachments);

    let zettel_paths: Vec<PathBuf> = zettels.iter().map(|z| z.path.clone()).collect();
    let n = attachments::relativize_absolute_links(&zettel_paths, patterns)?;
    info!("converted {} absolute attachment links to relative links", n);
    if config.hide_tags {
        let n = remove_tags(&zettel_paths, patterns)?;
        info!("removed {} tags", n);
    }

    let linker = site_linker(config);
    let outcome = links::convert_links_to_md(&zettels, &linker, patterns)?;
    info!(
        "converted {} internal links to the markdown format",
        outcome.converted
    );
    links::redirect_links_to_html(&zettel_paths, patterns)?;

    // The HTML files present before rendering; anything in this set the
    // render pass does not re-create is a leftover from an earlier run.
    let html_ext = vec![".html".to_string()];
    let mut old_html = files_with_extensions(&config.site_dir, &html_ext)?;
    old_html.extend(files_with_extensions(&pages_dir, &html_ext)?);

    let mut new_html = Vec::with_capacity(zettels.len());
    for zettel in &zettels {
        new_html.push(html::create_html_file(zettel)?);
    }
    let trashed = reconcile::reconcile(&old_html, &new_html, &config.site_dir, confirm)?;

    html::convert_md_links_to_anchors(&new_html, patterns)?;
    template::highlight_code_blocks(&new_html, highlighter)?;
    template::wrap_all(&config.site_dir, &new_html, config)?;
    template::append_copyright(&config.site_dir, &config.copyright_text)?;
    template::insert_index_links(&config.site_dir)?;
    style::check_style(&config.site_dir, &config.colors)?;

    Ok(GenerateReport {
        published: zettels.len(),
        html_files: new_html.len(),
        attachments,
        links_converted: outcome.converted,
        warnings: outcome.warnings.iter().map(describe_warning).collect(),
        trashed,
    })
}

fn describe_warning(warning: &LinkWarning) -> String {
    match &warning.kind {
        WarningKind::Broken => format!(
            "broken link {} in \"{}\" at {}",
            warning.link,
            warning.zettel_title,
            warning.path.display()
        ),
        WarningKind::StaleText { expected } => format!(
            "stale link text for {} in \"{}\"; expected \"{}\"",
            warning.link, warning.zettel_title, expected
        ),
    }
}

/// Strips tags from the copied notes, keeping the whitespace that preceded
/// them.
fn remove_tags(paths: &[PathBuf], patterns: &Patterns) -> Result<usize> {
    let n = rewrite_files_guarded(paths, patterns, |text| {
        let count = patterns.tag.find_iter(text).count();
        let rewritten = patterns.tag.replace_all(text, "$1").into_owned();
        (rewritten, count)
    })?;
    Ok(n)
}
