// src/requests.rs
// =============================================================================
// The one place that talks HTTP.
//
// Everything else (document download, GitHub API, homepage scraping) goes
// through the `Transport` trait, so tests can swap in an in-memory fake and
// never touch the network.
//
// Rust concepts:
// - Traits: A shared interface that several types implement
// - impl Future: Async methods in traits without extra crates
// - Clone on reqwest::Client: cheap, it shares one connection pool
// =============================================================================

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use crate::error::{Error, Result};

/// Status code and body of a finished GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// "Perform GET with headers, return status + body"
pub trait Transport: Send + Sync {
    fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> impl Future<Output = Result<Response>> + Send;
}

// Lets several components share one transport by reference
impl<T: Transport> Transport for &T {
    fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> impl Future<Output = Result<Response>> + Send {
        (**self).get(url, headers)
    }
}

/// Production transport backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    // Builds the shared client.
    //
    // The timeout keeps one stuck request from holding up a whole block
    // forever.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!("awesome-sort/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport {
                url: String::new(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response> {
        let transport_error = |e: reqwest::Error| Error::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;

        Ok(Response { status, body })
    }
}

// In-memory transport for tests
//
// Responses are keyed by URL and replayed in order; the last one repeats
// once the queue is down to a single item. Every call is recorded.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockTransport {
        routes: Mutex<HashMap<String, VecDeque<Result<Response>>>>,
        calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, url: &str, status: u16, body: &str) -> Self {
            self.push(
                url,
                Ok(Response {
                    status,
                    body: body.to_string(),
                }),
            )
        }

        pub fn fail(self, url: &str) -> Self {
            self.push(
                url,
                Err(Error::Transport {
                    url: url.to_string(),
                    message: "connection refused".to_string(),
                }),
            )
        }

        fn push(self, url: &str, response: Result<Response>) -> Self {
            self.routes
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_default()
                .push_back(response);
            self
        }

        pub fn calls_to(&self, url: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(called, _)| called == url)
                .count()
        }

        /// URLs in the order they were requested
        pub fn call_order(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }

        pub fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn headers_of_first_call(&self, url: &str) -> Vec<(String, String)> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .find(|(called, _)| called == url)
                .map(|(_, headers)| headers.clone())
                .unwrap_or_default()
        }
    }

    impl Transport for MockTransport {
        async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response> {
            self.calls.lock().unwrap().push((
                url.to_string(),
                headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));

            let mut routes = self.routes.lock().unwrap();
            let queue = match routes.get_mut(url) {
                Some(queue) if !queue.is_empty() => queue,
                _ => {
                    return Ok(Response {
                        status: 404,
                        body: String::new(),
                    })
                }
            };

            if queue.len() > 1 {
                queue.pop_front().unwrap()
            } else {
                match queue.front().unwrap() {
                    Ok(response) => Ok(response.clone()),
                    Err(_) => Err(Error::Transport {
                        url: url.to_string(),
                        message: "connection refused".to_string(),
                    }),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockTransport;
    use super::*;

    #[test]
    fn test_success_range() {
        let ok = Response { status: 204, body: String::new() };
        let missing = Response { status: 404, body: String::new() };
        assert!(ok.is_success());
        assert!(!missing.is_success());
    }

    #[test]
    fn test_build_client() {
        assert!(HttpTransport::new(Duration::from_secs(10)).is_ok());
    }

    #[tokio::test]
    async fn test_mock_replays_then_repeats_last() {
        let transport = MockTransport::new()
            .respond("https://a.test", 500, "first")
            .respond("https://a.test", 200, "second");

        let first = transport.get("https://a.test", &[]).await.unwrap();
        let second = transport.get("https://a.test", &[]).await.unwrap();
        let third = transport.get("https://a.test", &[]).await.unwrap();

        assert_eq!(first.body, "first");
        assert_eq!(second.body, "second");
        assert_eq!(third.body, "second");
        assert_eq!(transport.calls_to("https://a.test"), 3);
    }

    #[tokio::test]
    async fn test_mock_unknown_url_is_404() {
        let transport = MockTransport::new();
        let response = transport.get("https://nowhere.test", &[]).await.unwrap();
        assert_eq!(response.status, 404);
    }
}
