// src/document/mod.rs
// =============================================================================
// The awesome list we are sorting.
//
// A Document is the raw markdown split into lines, plus the Blocks found in
// it. A Block is a run of consecutive list items like:
//
//   - [tokio](https://github.com/tokio-rs/tokio) - Async runtime
//   - [rayon](https://github.com/rayon-rs/rayon) - Data parallelism
//
// Each list item becomes an Entry. Lines outside blocks are never touched,
// and a block's lines are only ever rewritten in place, so the output always
// has exactly as many lines as the input.
//
// Submodules:
// - parse:    text -> Document
// - schedule: fills in the star counts, one block at a time
// - rewrite:  sorts each block and writes the badges into the lines
// =============================================================================

mod parse;
mod rewrite;
mod schedule;

pub use schedule::fetch_stars;

use url::Url;

/// One list item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The line exactly as it appeared in the source
    pub text: String,
    /// The bullet, '*' or '-'
    pub separator: char,
    /// The GitHub link the endpoint was resolved from
    pub url: Option<Url>,
    /// https://api.github.com/repos/{owner}/{repo}, None when unresolved
    pub endpoint: Option<String>,
    pub stars: u64,
}

impl Entry {
    // Unresolved entries sort as the empty string
    fn endpoint_key(&self) -> &str {
        self.endpoint.as_deref().unwrap_or("")
    }
}

/// A run of consecutive list items, lines `start..=end`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub end: usize,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub lines: Vec<String>,
    pub blocks: Vec<Block>,
}

impl Document {
    /// Number of list items across all blocks
    pub fn entry_count(&self) -> usize {
        self.blocks.iter().map(|block| block.entries.len()).sum()
    }

    pub fn to_markdown(&self) -> String {
        self.lines.join("\n")
    }
}
