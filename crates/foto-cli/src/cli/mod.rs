//! CLI for fotobrowser.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use foto_core::config::{self, ClientConfig, ServerConfig};
use std::path::PathBuf;

use commands::{run_browse, run_serve, run_watch};

/// Top-level CLI for fotobrowser.
#[derive(Debug, Parser)]
#[command(name = "foto")]
#[command(about = "fotobrowser: browse photo directories over HTTP", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Serve the photo storage directory, thumbnails and the web UI.
    Serve {
        /// Address to listen on (overrides config), e.g. 0.0.0.0:8000.
        #[arg(long, value_name = "ADDR")]
        listen: Option<String>,
        /// Photo storage directory (overrides config).
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
        /// Static web UI directory (overrides config).
        #[arg(long, value_name = "DIR")]
        static_dir: Option<PathBuf>,
    },

    /// Fetch and print the listing for a path (empty means the default path).
    Browse {
        /// Navigation path, e.g. /photos/2020/.
        path: Option<String>,
        /// Server base URL (overrides config).
        #[arg(long, value_name = "URL")]
        server: Option<String>,
        /// Print the raw JSON payload instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Read navigation paths from stdin, one per line, and print each listing update.
    ///
    /// Lines are used as typed; an empty line selects the default path.
    Watch {
        /// Server base URL (overrides config).
        #[arg(long, value_name = "URL")]
        server: Option<String>,
    },
}

/// Applies `serve` flag overrides on top of the configured server settings.
fn server_config(
    base: &ServerConfig,
    listen: Option<String>,
    root: Option<PathBuf>,
    static_dir: Option<PathBuf>,
) -> ServerConfig {
    let mut cfg = base.clone();
    if let Some(listen) = listen {
        cfg.listen_addr = listen;
    }
    if let Some(root) = root {
        cfg.storage_root = root;
    }
    if let Some(static_dir) = static_dir {
        cfg.static_dir = static_dir;
    }
    cfg
}

/// Applies `--server` on top of the configured client settings.
fn client_config(base: &ClientConfig, server: Option<String>) -> ClientConfig {
    let mut cfg = base.clone();
    if let Some(server) = server {
        cfg.server_url = server;
    }
    cfg
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Serve {
                listen,
                root,
                static_dir,
            } => run_serve(&server_config(&cfg.server, listen, root, static_dir)).await?,
            CliCommand::Browse { path, server, json } => {
                run_browse(&client_config(&cfg.client, server), path.as_deref(), json).await?
            }
            CliCommand::Watch { server } => run_watch(&client_config(&cfg.client, server)).await?,
        }

        Ok(())
    }
}
