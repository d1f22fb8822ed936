// src/document/schedule.rs
// =============================================================================
// Fills in the star count of every entry.
//
// Blocks are handled one after another, in document order. Inside a block
// every entry gets its own request and they all run at the same time; we
// wait for the whole block before moving on, so sorting always sees final
// numbers.
//
// Each future borrows exactly one Entry mutably, so the borrow checker
// guarantees no two requests write the same star count.
// =============================================================================

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use super::{Block, Document};
use crate::github::StarFetcher;
use crate::requests::Transport;

/// Fetches stars for all blocks
///
/// `width` caps the number of in-flight requests per block. `None` sends
/// one request per entry at once.
pub async fn fetch_stars<T: Transport>(
    document: &mut Document,
    fetcher: &StarFetcher<T>,
    width: Option<usize>,
) {
    info!(
        blocks = document.blocks.len(),
        entries = document.entry_count(),
        "fetching stars"
    );

    for (number, block) in document.blocks.iter_mut().enumerate() {
        debug!(block = number, "started fetching stars");
        fetch_block(block, fetcher, width).await;
        debug!(block = number, "fetching stars done");
    }
}

async fn fetch_block<T: Transport>(block: &mut Block, fetcher: &StarFetcher<T>, width: Option<usize>) {
    let mut pending = Vec::with_capacity(block.entries.len());
    for entry in block.entries.iter_mut() {
        match entry.endpoint.clone() {
            Some(endpoint) => pending.push((entry, endpoint)),
            // Never sent to GitHub
            None => entry.stars = 0,
        }
    }

    let width = width.unwrap_or(pending.len()).max(1);

    stream::iter(pending)
        .map(|(entry, endpoint)| async move {
            entry.stars = fetcher.fetch(&endpoint).await;
            debug!(url = ?entry.url.as_ref().map(|url| url.as_str()), stars = entry.stars, "entry scored");
        })
        .buffer_unordered(width)
        .collect::<Vec<()>>()
        .await;
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why no tokio::spawn?
//    - Spawned tasks must own their data ('static), but our futures borrow
//      the entries of the block
//    - buffer_unordered polls all of them inside the current task, which is
//      enough for network I/O: while one request waits, others make progress
//
// 2. What does buffer_unordered(width) do?
//    - Runs up to `width` futures at once and yields results as they finish
//    - We throw the results away (they are `()`); collecting just drives the
//      stream to the end, and that end is our "whole block is done" barrier
//
// 3. Why clone the endpoint string?
//    - The future mutably borrows the Entry to store the stars
//    - Holding an owned copy of the endpoint keeps that the only borrow
// -----------------------------------------------------------------------------
