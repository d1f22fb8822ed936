// src/github/endpoint.rs
// =============================================================================
// Turns a link into the GitHub API endpoint of the repository it points at.
//
// Supported formats:
//   - https://github.com/owner/repo
//   - https://github.com/owner/repo/tree/master/some/dir
//   - https://owner.github.io/repo
//
// Anything else resolves to None.
// =============================================================================

use url::Url;

pub const HOST_NAME: &str = "github.com";
const PAGES_SUFFIX: &str = ".github.io";
const REPOS_ENDPOINT: &str = "https://api.github.com/repos";

// Resolves a hostname and path to a repos API endpoint
//
// Example:
//   ("github.com", "/rust-lang/rust/tree/master/src")
//     -> Some("https://api.github.com/repos/rust-lang/rust")
pub fn resolve(hostname: &str, path: &str) -> Option<String> {
    if hostname == HOST_NAME {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let owner = segments.next()?;
        let repo = segments.next()?;
        Some(repos_endpoint(owner, repo))
    } else if let Some(user) = hostname.strip_suffix(PAGES_SUFFIX) {
        pages_repository(user, path).map(|(owner, repo)| repos_endpoint(owner, repo))
    } else {
        None
    }
}

pub fn resolve_url(url: &Url) -> Option<String> {
    resolve(url.host_str()?, url.path())
}

// A bare user site (https://user.github.io/) has no repository to infer
fn pages_repository<'a>(user: &'a str, path: &'a str) -> Option<(&'a str, &'a str)> {
    let owner = user.split('.').next().filter(|s| !s.is_empty())?;
    let repo = path.trim_matches('/');
    if repo.is_empty() {
        return None;
    }
    Some((owner, repo))
}

fn repos_endpoint(owner: &str, repo: &str) -> String {
    format!("{}/{}/{}", REPOS_ENDPOINT, owner, repo)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does resolve() use `?` on Option?
//    - Inside a function returning Option, `segments.next()?` returns None
//      early when the iterator runs dry
//    - So "/username" (only one segment) fails cleanly instead of panicking
//      on an out-of-range index
//
// 2. What does strip_suffix do?
//    - "user.github.io".strip_suffix(".github.io") == Some("user")
//    - It returns None when the suffix isn't there, which doubles as our check
// -----------------------------------------------------------------------------
