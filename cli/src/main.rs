//! `tagfeed`: print pages of a tag feed as JSON lines.

mod pagination;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tagfeed_core::{
    Backoff, ClientConfig, Credentials, RetryPolicy, TagFeedClient, Transport, DEFAULT_BASE_URL,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tagfeed", version, about = "Fetch entries for a tag from the feed API")]
struct Args {
    /// Tag to fetch, without the leading '#'
    tag: String,

    /// Application key issued by the API
    #[arg(long, env = "WYKOP_APP_KEY")]
    app_key: String,

    /// Application secret used to sign requests
    #[arg(long, env = "WYKOP_APP_SECRET", hide_env_values = true)]
    app_secret: String,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// First page to fetch (1-based)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,

    /// Number of pages to fetch by following next-page links
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,

    /// Attempts per page before giving up
    #[arg(long, default_value_t = tagfeed_core::DEFAULT_MAX_ATTEMPTS)]
    retries: u32,

    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Fixed pause between attempts in milliseconds (0 = retry immediately)
    #[arg(long, default_value_t = 0)]
    backoff_ms: u64,
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        let mut retry = RetryPolicy::new(self.retries);
        if self.backoff_ms > 0 {
            retry = retry.with_backoff(Backoff::Fixed(Duration::from_millis(self.backoff_ms)));
        }
        ClientConfig::with_base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .retry(retry)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let client = TagFeedClient::new(
        Credentials::new(&args.app_key, &args.app_secret),
        args.client_config(),
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_pages(&client, &args.tag, args.page, args.pages, &mut out)?;
    Ok(())
}

/// Write up to `pages` pages of `tag`, starting at `first_page`, as JSON
/// lines. Stops early when a page has no next link. Returns the number of
/// pages written.
fn print_pages<T: Transport, W: Write>(
    client: &TagFeedClient<T>,
    tag: &str,
    first_page: u32,
    pages: u32,
    out: &mut W,
) -> Result<u32> {
    let mut response = client
        .fetch_tag_page(tag, first_page)
        .with_context(|| format!("fetching page {first_page} of #{tag}"))?;
    let mut fetched = 1;
    loop {
        if response.status() >= 400 {
            info!(status = response.status(), "API answered with an error status");
        }
        serde_json::to_writer(&mut *out, response.body())?;
        writeln!(out)?;

        if fetched >= pages {
            break;
        }
        let Some(next) = pagination::next_page_url(response.body()) else {
            info!(pages = fetched, "no more pages");
            break;
        };
        response = client
            .fetch_next_page(&next)
            .with_context(|| format!("fetching {next}"))?;
        fetched += 1;
    }
    Ok(fetched)
}
