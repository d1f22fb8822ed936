// src/error.rs
// =============================================================================
// Errors that can stop a run.
//
// Most failures in this tool are NOT errors: a repository we can't fetch
// just ends up with 0 stars. The variants here are the ones that either
// describe a failed request (so callers can decide whether to absorb it)
// or that must abort the whole run.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be sent or its body could not be read
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-success status code
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// A list item no longer contains the "<separator> " the parser saw
    #[error("separator '{separator}' followed by a space not found in line: {line}")]
    SeparatorMissing { separator: char, line: String },

    /// We never overwrite an existing file
    #[error("file already exists in path {}", .0.display())]
    OutputExists(PathBuf),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
