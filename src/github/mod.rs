// src/github/mod.rs
// =============================================================================
// Everything GitHub-specific:
// - endpoint: link -> https://api.github.com/repos/{owner}/{repo}
// - discover: project homepage -> GitHub link found on that page
// - stars:    API endpoint -> star count, with bounded retries
// =============================================================================

mod discover;
mod endpoint;
mod stars;

pub use discover::Discoverer;
pub use endpoint::resolve_url;
pub use stars::{RetryPolicy, StarFetcher};
