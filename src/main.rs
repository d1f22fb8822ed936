// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Download the markdown awesome list
// 3. Parse it, fetch GitHub stars block by block, sort and rewrite
// 4. Print the result or write it to a new file
// 5. Exit with proper code (0 = success, 1 = error)
//
// Only two kinds of failure end the run: not getting the document at all,
// and the internal line-layout check in the rewriter. Everything that goes
// wrong for a single repository just leaves it at 0 stars.
// =============================================================================

mod cli;       // src/cli.rs - command-line parsing
mod document;  // src/document/ - parsing, scheduling, sorting
mod error;     // src/error.rs - fatal error types
mod github;    // src/github/ - GitHub-specific functionality
mod requests;  // src/requests.rs - HTTP transport

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::AsyncWriteExt;
use tracing::info;

use cli::{Cli, Config};
use document::Document;
use github::{Discoverer, StarFetcher};
use requests::{HttpTransport, Transport};

#[tokio::main]
async fn main() {
    let config = Config::from(Cli::parse());

    let exit_code = match run(config).await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run(config: Config) -> Result<()> {
    init_tracing(config.verbose)?;

    let transport = HttpTransport::new(config.timeout)?;
    process(&transport, &config).await
}

async fn process<T: Transport>(transport: &T, config: &Config) -> Result<()> {
    // Fail before spending any API quota on a run whose result can't be saved
    if let Some(path) = &config.output {
        check_output_path(path).await?;
    }

    info!(url = %config.url, "URL to parse markdown");
    let markdown = fetch_markdown(transport, &config.url).await?;

    let sorted = sort_markdown(&markdown, transport, config).await?;

    match &config.output {
        Some(path) => write_output(path, &sorted).await?,
        None => println!("{}", sorted),
    }

    Ok(())
}

async fn check_output_path(path: &Path) -> Result<()> {
    let exists = tokio::fs::try_exists(path)
        .await
        .with_context(|| format!("specified output path is invalid: {}", path.display()))?;

    if exists {
        return Err(error::Error::OutputExists(path.to_path_buf()).into());
    }
    Ok(())
}

// Logs go to stderr so stdout only ever carries the document
fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_env("AWESOME_SORT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}

async fn fetch_markdown<T: Transport>(transport: &T, url: &str) -> Result<String> {
    info!("Retrieving markdown...");
    let started = Instant::now();

    let response = transport
        .get(url, &[])
        .await
        .context("an error occurred retrieving markdown")?;

    if !response.is_success() {
        return Err(error::Error::Status {
            url: url.to_string(),
            status: response.status,
        })
        .context("an error occurred retrieving markdown");
    }

    info!(took = ?started.elapsed(), "Markdown retrieved");
    Ok(response.body)
}

// Parse -> fetch stars -> sort & rewrite
async fn sort_markdown<T: Transport>(markdown: &str, transport: &T, config: &Config) -> Result<String> {
    let discoverer = Discoverer::new(transport);
    let fetcher = StarFetcher::new(transport, &config.token, config.retry);

    let mut document = Document::parse(markdown, &discoverer).await;
    document::fetch_stars(&mut document, &fetcher, config.width).await;
    document
        .sort_and_rewrite()
        .context("failed to rewrite sorted markdown")?;

    Ok(document.to_markdown())
}

// create_new makes "already exists" and "create" a single step
async fn write_output(path: &Path, contents: &str) -> Result<()> {
    let mut file = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(error::Error::OutputExists(path.to_path_buf()).into());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to write to file {}", path.display()));
        }
    };

    file.write_all(contents.as_bytes())
        .await
        .with_context(|| format!("failed to write to file {}", path.display()))?;
    file.flush().await?;

    info!(path = %path.display(), "wrote sorted markdown");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::RetryPolicy;
    use crate::requests::mock::MockTransport;
    use std::time::Duration;

    fn config() -> Config {
        Config {
            url: "https://raw.test/README.md".to_string(),
            token: "t".to_string(),
            output: None,
            verbose: false,
            width: None,
            retry: RetryPolicy {
                attempts: 5,
                backoff: Duration::ZERO,
            },
            timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_fetch_markdown_failures_are_fatal() {
        let transport = MockTransport::new()
            .fail("https://down.test/README.md")
            .respond("https://missing.test/README.md", 404, "404: Not Found");

        assert!(fetch_markdown(&transport, "https://down.test/README.md").await.is_err());
        assert!(fetch_markdown(&transport, "https://missing.test/README.md").await.is_err());
    }

    #[tokio::test]
    async fn test_sort_markdown_preserves_line_count() {
        let markdown = "# List\n- [a](https://github.com/a/a)\n- [b](https://github.com/b/b)\n\ntrailer\n";
        let transport = MockTransport::new()
            .respond("https://api.github.com/repos/a/a", 200, r#"{"stargazers_count": 1}"#)
            .respond("https://api.github.com/repos/b/b", 200, r#"{"stargazers_count": 2}"#);

        let sorted = sort_markdown(markdown, &transport, &config()).await.unwrap();

        assert_eq!(sorted.split('\n').count(), markdown.split('\n').count());
        assert!(sorted.lines().nth(1).unwrap().contains("[b]"));
        assert!(sorted.ends_with("trailer\n"));
    }

    #[tokio::test]
    async fn test_existing_output_stops_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sorted.md");
        std::fs::write(&path, "keep me").unwrap();

        let transport = MockTransport::new().respond("https://raw.test/README.md", 200, "- [a](https://github.com/a/a)");
        let config = Config {
            output: Some(path.clone()),
            ..config()
        };

        let err = process(&transport, &config).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<error::Error>(),
            Some(error::Error::OutputExists(_))
        ));
        assert_eq!(transport.total_calls(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[tokio::test]
    async fn test_process_writes_new_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sorted.md");

        let transport = MockTransport::new()
            .respond("https://raw.test/README.md", 200, "- [a](https://github.com/a/a)")
            .respond("https://api.github.com/repos/a/a", 200, r#"{"stargazers_count": 3}"#);
        let config = Config {
            output: Some(path.clone()),
            ..config()
        };

        process(&transport, &config).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "- **<code>&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;3</code>** [a](https://github.com/a/a)"
        );
    }

    #[tokio::test]
    async fn test_write_output_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sorted.md");

        write_output(&path, "first").await.unwrap();
        let err = write_output(&path, "second").await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<error::Error>(),
            Some(error::Error::OutputExists(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");
    }
}
