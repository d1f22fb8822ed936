// src/document/rewrite.rs
// =============================================================================
// Sorts every block by stars and writes the star badge into each line.
//
// Order inside a block:
//   1. more stars first
//   2. on a tie, API endpoint in ascending string order
//
// A line is rewritten by inserting the badge right after its bullet:
//
//   - [tokio](https://github.com/tokio-rs/tokio)
//   - **<code>&nbsp;25000</code>** [tokio](https://github.com/tokio-rs/tokio)
//
// Everything before the bullet (indentation) and after it (the link and
// its description) is kept exactly as it was.
// =============================================================================

use tracing::debug;

use super::{Document, Entry};
use crate::error::{Error, Result};

pub fn sort_entries(entries: &mut [Entry]) {
    // sort_by is stable, so equal keys keep document order
    entries.sort_by(|a, b| {
        b.stars
            .cmp(&a.stars)
            .then_with(|| a.endpoint_key().cmp(b.endpoint_key()))
    });
}

/// `42` -> `<code>&nbsp;&nbsp;&nbsp;&nbsp;42</code>`
pub fn badge(stars: u64) -> String {
    format!("<code>{:>6}</code>", stars).replace(' ', "&nbsp;")
}

pub fn rewrite_line(entry: &Entry) -> Result<String> {
    let marker = format!("{} ", entry.separator);
    let index = entry
        .text
        .find(&marker)
        .ok_or_else(|| Error::SeparatorMissing {
            separator: entry.separator,
            line: entry.text.clone(),
        })?;

    Ok(format!(
        "{}{} **{}** {}",
        &entry.text[..index],
        entry.separator,
        badge(entry.stars),
        &entry.text[index + marker.len()..]
    ))
}

impl Document {
    /// Sorts each block and rewrites its lines in place
    ///
    /// Fails only if a list item lost its bullet between parsing and now,
    /// which means the parser and this module disagree about line layout.
    pub fn sort_and_rewrite(&mut self) -> Result<()> {
        for (number, block) in self.blocks.iter_mut().enumerate() {
            debug!(block = number, entries = block.entries.len(), "sorting block");
            debug_assert_eq!(block.end - block.start + 1, block.entries.len());
            sort_entries(&mut block.entries);

            for (offset, entry) in block.entries.iter().enumerate() {
                self.lines[block.start + offset] = rewrite_line(entry)?;
            }
        }
        Ok(())
    }
}
