//! `foto serve` – run the photo server.

use anyhow::{Context, Result};
use foto_core::config::ServerConfig;
use foto_core::server;

pub async fn run_serve(cfg: &ServerConfig) -> Result<()> {
    let meta = tokio::fs::metadata(&cfg.storage_root)
        .await
        .with_context(|| format!("storage root {}", cfg.storage_root.display()))?;
    if !meta.is_dir() {
        anyhow::bail!("storage root {} is not a directory", cfg.storage_root.display());
    }
    if !cfg.static_dir.is_dir() {
        tracing::warn!(
            "static dir {} missing; web UI will 404",
            cfg.static_dir.display()
        );
    }
    println!("Serving {} on {}", cfg.storage_root.display(), cfg.listen_addr);
    server::serve(cfg).await
}
