// src/github/stars.rs
// =============================================================================
// Fetches the star count of a repository from the GitHub API.
//
// GitHub answers every request with JSON. A healthy answer carries
// `stargazers_count`; a problem carries `message`:
//   - "Not Found"           -> the repository is gone or renamed, 0 stars
//   - anything else         -> rate limiting or a hiccup, wait and retry
//
// Retries are a plain bounded loop. When the budget runs out the entry
// simply gets 0 stars; one bad repository never stops the run.
// =============================================================================

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::requests::Transport;

const NOT_FOUND: &str = "Not Found";

/// How often to ask again after a transient API message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of requests, including the first one
    pub attempts: u32,
    /// Fixed wait between two requests
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            backoff: Duration::from_millis(500),
        }
    }
}

// The part of GET /repos/{owner}/{repo} we care about
#[derive(Debug, Default, Deserialize)]
struct Repository {
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    message: Option<String>,
}

// What one request told us
#[derive(Debug, PartialEq, Eq)]
enum Attempt {
    Stars(u64),
    Transient(String),
}

pub struct StarFetcher<T> {
    transport: T,
    authorization: String,
    policy: RetryPolicy,
}

impl<T: Transport> StarFetcher<T> {
    pub fn new(transport: T, token: &str, policy: RetryPolicy) -> Self {
        Self {
            transport,
            authorization: format!("token {}", token),
            policy,
        }
    }

    /// Returns the star count behind `endpoint`, or 0 when it can't be known
    pub async fn fetch(&self, endpoint: &str) -> u64 {
        let attempts = self.policy.attempts.max(1);

        for attempt in 1..=attempts {
            match self.fetch_once(endpoint).await {
                Attempt::Stars(stars) => {
                    debug!(endpoint, stars, attempt, "fetched stars");
                    return stars;
                }
                Attempt::Transient(message) if attempt < attempts => {
                    debug!(endpoint, %message, attempt, "temporary API error, retrying");
                    tokio::time::sleep(self.policy.backoff).await;
                }
                Attempt::Transient(message) => {
                    warn!(endpoint, %message, attempts, "giving up on repository, counting 0 stars");
                }
            }
        }

        0
    }

    async fn fetch_once(&self, endpoint: &str) -> Attempt {
        let headers = [("Authorization", self.authorization.as_str())];

        let response = match self.transport.get(endpoint, &headers).await {
            Ok(response) => response,
            Err(e) => {
                // Local failure, not an API answer, so retrying won't help
                warn!(endpoint, error = %e, "could not fetch repository");
                return Attempt::Stars(0);
            }
        };

        match serde_json::from_str::<Repository>(&response.body) {
            Ok(repo) => classify(repo),
            Err(e) => {
                warn!(endpoint, status = response.status, error = %e, "could not decode repository JSON");
                Attempt::Stars(0)
            }
        }
    }
}

fn classify(repo: Repository) -> Attempt {
    match repo.message {
        // An empty message is the same as none at all
        Some(message) if !message.is_empty() && message != NOT_FOUND => {
            Attempt::Transient(message)
        }
        _ => Attempt::Stars(repo.stargazers_count),
    }
}
