//! Protects code spans from the text-rewrite passes.
//!
//! Every rewrite over note text goes through [`rewrite_guarded`]: fenced and
//! inline code spans are masked with sentinel characters, the rewrite runs on
//! the masked text, and the original spans are spliced back byte-exact. This
//! keeps link-like or tag-like text inside example code from being mistaken
//! for real links or tags.

use std::path::PathBuf;

use crate::domain::Patterns;
use crate::infra::fs::{read_text, write_text, FsError};

/// Sentinel for a masked fenced code block. Non-printable, so it cannot occur
/// in legitimate note text.
const FENCED_SENTINEL: char = '\u{241D}';
/// Sentinel for a masked inline code span.
const INLINE_SENTINEL: char = '\u{241E}';

/// Applies `rewrite` to `text` with all code spans masked out, then restores
/// the spans verbatim. The restore is a plain splice, not a regex
/// replacement, so backslashes in code survive untouched. Returns the new
/// text and the rewrite's replacement count.
pub fn rewrite_guarded<F>(text: &str, patterns: &Patterns, rewrite: F) -> (String, usize)
where
    F: FnOnce(&str) -> (String, usize),
{
    let (masked, fenced) = mask_spans(text, &patterns.fenced_codeblock, FENCED_SENTINEL);
    let (masked, inline) = mask_spans(&masked, &patterns.inline_codeblock, INLINE_SENTINEL);

    let (rewritten, count) = rewrite(&masked);

    let mut fenced = fenced.into_iter();
    let mut inline = inline.into_iter();
    let mut restored = String::with_capacity(rewritten.len());
    for c in rewritten.chars() {
        match c {
            FENCED_SENTINEL => restored.push_str(&fenced.next().unwrap_or_default()),
            INLINE_SENTINEL => restored.push_str(&inline.next().unwrap_or_default()),
            _ => restored.push(c),
        }
    }
    (restored, count)
}

/// Replaces each group-1 span matched by `pattern` with `sentinel`, returning
/// the masked text and the removed spans in document order.
fn mask_spans(text: &str, pattern: &regex::Regex, sentinel: char) -> (String, Vec<String>) {
    let mut spans = Vec::new();
    let mut masked = String::with_capacity(text.len());
    let mut last_end = 0;
    for caps in pattern.captures_iter(text) {
        let m = match caps.get(1) {
            Some(m) => m,
            None => continue,
        };
        masked.push_str(&text[last_end..m.start()]);
        masked.push(sentinel);
        spans.push(m.as_str().to_string());
        last_end = m.end();
    }
    masked.push_str(&text[last_end..]);
    (masked, spans)
}

/// Runs a guarded rewrite over each file, saving a file back only when its
/// rewrite replaced something. Returns the total replacement count.
pub fn rewrite_files_guarded<F>(
    paths: &[PathBuf],
    patterns: &Patterns,
    mut rewrite: F,
) -> Result<usize, FsError>
where
    F: FnMut(&str) -> (String, usize),
{
    let mut total = 0;
    for path in paths {
        let contents = read_text(path)?;
        let (rewritten, count) = rewrite_guarded(&contents, patterns, &mut rewrite);
        if count > 0 {
            write_text(path, &rewritten)?;
            total += count;
        }
    }
    Ok(total)
}
