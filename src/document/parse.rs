// src/document/parse.rs
// =============================================================================
// Turns markdown text into a Document.
//
// Parsing happens in two passes:
// 1. scan(): a single forward pass over the lines that finds list items
//    linking somewhere and groups consecutive ones into blocks. Pure, no I/O.
// 2. Document::parse(): builds an Entry for every list item, resolving its
//    GitHub endpoint. This may download a project homepage to find the
//    repository link, so entries of one block are built concurrently.
//
// A list item is a line like `  * [name](https://...)`: optional indent,
// a single '*' or '-', a space, a [description] and a link whose scheme is
// http, https or mailto.
// =============================================================================

use std::sync::LazyLock;

use futures::future::join_all;
use regex::Regex;
use tracing::debug;
use url::Url;

use super::{Block, Document, Entry};
use crate::github::{resolve_url, Discoverer};
use crate::requests::Transport;

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([*-]) \[.*?\]\((?:https?|mailto):").expect("constant regex is valid")
});

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((https?://.*?)\)").expect("constant regex is valid"));

// Where a block sits and the bullet of each of its lines
#[derive(Debug, PartialEq, Eq)]
struct Span {
    start: usize,
    separators: Vec<char>,
}

impl Span {
    fn end(&self) -> usize {
        self.start + self.separators.len() - 1
    }
}

fn list_item_separator(line: &str) -> Option<char> {
    LIST_ITEM
        .captures(line)
        .and_then(|captures| captures[1].chars().next())
}

fn scan(text: &str) -> (Vec<String>, Vec<Span>) {
    let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let mut spans = Vec::new();
    let mut open: Option<Span> = None;

    for (index, line) in lines.iter().enumerate() {
        let Some(separator) = list_item_separator(line) else {
            // Any other line closes the open block
            spans.extend(open.take());
            continue;
        };

        match open.as_mut() {
            Some(span) => span.separators.push(separator),
            None => {
                open = Some(Span {
                    start: index,
                    separators: vec![separator],
                })
            }
        }
    }
    spans.extend(open);

    (lines, spans)
}

// Every http(s) link in parentheses, in the order they appear
fn candidate_urls(line: &str) -> Vec<Url> {
    LINK.captures_iter(line)
        .filter_map(|captures| Url::parse(&captures[1]).ok())
        .collect()
}

// Tries each link directly first; only if none of them is a GitHub link do
// we go looking for one on the first link's page.
async fn build_entry<T: Transport>(
    line: &str,
    separator: char,
    discoverer: &Discoverer<T>,
) -> Entry {
    let candidates = candidate_urls(line);

    let direct = candidates
        .iter()
        .find_map(|url| resolve_url(url).map(|endpoint| (url.clone(), endpoint)));

    let resolved = match (direct, candidates.first()) {
        (Some(found), _) => Some(found),
        (None, Some(first)) => discoverer
            .discover(first)
            .await
            .and_then(|url| resolve_url(&url).map(|endpoint| (url, endpoint))),
        (None, None) => None,
    };

    if resolved.is_none() {
        debug!(line, "no repository found for list item");
    }

    let (url, endpoint) = resolved.unzip();
    Entry {
        text: line.to_string(),
        separator,
        url,
        endpoint,
        stars: 0,
    }
}

impl Document {
    pub async fn parse<T: Transport>(text: &str, discoverer: &Discoverer<T>) -> Document {
        let (lines, spans) = scan(text);
        let mut blocks = Vec::with_capacity(spans.len());

        for span in spans {
            let entries = join_all(
                span.separators
                    .iter()
                    .enumerate()
                    .map(|(offset, &separator)| {
                        build_entry(&lines[span.start + offset], separator, discoverer)
                    }),
            )
            .await;

            blocks.push(Block {
                start: span.start,
                end: span.end(),
                entries,
            });
        }

        debug!(lines = lines.len(), blocks = blocks.len(), "parsed markdown");
        Document { lines, blocks }
    }
}
