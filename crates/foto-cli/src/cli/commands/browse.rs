//! `foto browse [path]` – fetch one listing and print it.

use anyhow::{Context, Result};
use foto_core::client::HttpListingClient;
use foto_core::config::ClientConfig;
use foto_core::fetcher::ListingFetcher;
use tokio::runtime::Handle;

use super::print::render_listing;

pub async fn run_browse(cfg: &ClientConfig, path: Option<&str>, json: bool) -> Result<()> {
    let client = HttpListingClient::from_config(cfg).context("listing client")?;
    let fetcher =
        ListingFetcher::with_default_path(client, Handle::current(), cfg.default_path.clone());

    fetcher
        .on_path_change(path)
        .await
        .context("fetch task join")?;

    // The fetcher only logs failures; an empty slot after a single fetch means it failed.
    let listing = fetcher.listing().ok_or_else(|| {
        anyhow::anyhow!(
            "no listing for {} on {} (see log for details)",
            fetcher.path(),
            cfg.server_url
        )
    })?;
    println!("{}", render_listing(&listing, json)?);
    Ok(())
}
