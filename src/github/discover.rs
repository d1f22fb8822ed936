// src/github/discover.rs
// =============================================================================
// Finds the repository behind a project homepage.
//
// Many awesome lists link to a project's website instead of its repository.
// When that happens we download the page and look for the first <a> tag
// pointing at github.com.
//
// We use the `scraper` crate for this, so quoted and unquoted href
// attributes are both handled by the HTML parser.
// =============================================================================

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::endpoint::HOST_NAME;
use crate::requests::Transport;

// Hosts that never lead to a repository: social, video, meetup and search
// sites. Subdomains are matched too (www.youtube.com, m.facebook.com, ...).
const DENYLIST: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "vimeo.com",
    "twitch.tv",
    "twitter.com",
    "x.com",
    "facebook.com",
    "instagram.com",
    "linkedin.com",
    "reddit.com",
    "meetup.com",
    "google.com",
    "bing.com",
    "duckduckgo.com",
];

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("constant selector is valid"));

pub struct Discoverer<T> {
    transport: T,
}

impl<T: Transport> Discoverer<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    // Fetches `url` and returns the first GitHub link found on the page
    //
    // Returns None for denied hosts, GitHub itself, failed requests and
    // pages without a GitHub link. None of these are errors.
    pub async fn discover(&self, url: &Url) -> Option<Url> {
        let host = url.host_str()?;
        // A github.com link that didn't resolve is a user or org page, not a project
        if is_denied(host) || host == HOST_NAME {
            debug!(%url, "skipping repository discovery");
            return None;
        }

        let response = match self.transport.get(url.as_str(), &[]).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "could not fetch page for repository discovery");
                return None;
            }
        };

        if !response.is_success() {
            warn!(%url, status = response.status, "page for repository discovery returned an error");
            return None;
        }

        let found = first_github_link(&response.body);
        debug!(%url, found = ?found.as_ref().map(Url::as_str), "repository discovery finished");
        found
    }
}

fn is_denied(host: &str) -> bool {
    DENYLIST.iter().any(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

// Only absolute links count, a relative href on the page belongs to the page's
// own host and can't be a GitHub repository.
fn first_github_link(html: &str) -> Option<Url> {
    let document = Html::parse_document(html);

    document
        .select(&ANCHOR)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| Url::parse(href.trim()).ok())
        .find(|url| {
            matches!(url.scheme(), "http" | "https")
                && url
                    .host_str()
                    .is_some_and(|host| host == HOST_NAME || host == "www.github.com")
        })
        .and_then(|mut url| {
            if url.host_str() == Some("www.github.com") {
                url.set_host(Some(HOST_NAME)).ok()?;
            }
            Some(url)
        })
}
