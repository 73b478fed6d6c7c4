//! `foto watch` – drive navigation from stdin and print listing updates.

use anyhow::{Context, Result};
use foto_core::client::HttpListingClient;
use foto_core::config::ClientConfig;
use foto_core::fetcher::{FetchedListing, ListingFetcher};
use foto_core::navigation::NavigationState;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tokio::sync::watch;

/// Navigation path for one stdin line. Only the line terminator is removed;
/// a blank line selects the default path, any other text is used as typed.
fn navigation_path(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

fn render_update(fetched: &FetchedListing) -> Result<String> {
    Ok(format!(
        "== {}\n{}",
        fetched.path,
        super::print::render_listing(&fetched.listing, false)?
    ))
}

fn print_update(rx: &mut watch::Receiver<Option<FetchedListing>>) -> Result<()> {
    let fetched = rx.borrow_and_update().clone();
    if let Some(fetched) = fetched {
        println!("{}", render_update(&fetched)?);
    }
    Ok(())
}

pub async fn run_watch(cfg: &ClientConfig) -> Result<()> {
    let client = HttpListingClient::from_config(cfg).context("listing client")?;
    let fetcher =
        ListingFetcher::with_default_path(client, Handle::current(), cfg.default_path.clone());
    let mut rx = fetcher.subscribe();

    let nav = NavigationState::new("");
    fetcher.bind(&nav);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("read stdin")? {
                    Some(line) => {
                        nav.set_path(navigation_path(&line));
                    }
                    None => break,
                }
            }
            changed = rx.changed() => {
                changed.context("listing channel closed")?;
                print_update(&mut rx)?;
            }
        }
    }

    // stdin closed: let the last request land before exiting.
    fetcher.idle().await;
    if rx.has_changed().unwrap_or(false) {
        print_update(&mut rx)?;
    }
    tracing::debug!("watch finished at {}", nav.path());
    Ok(())
}
