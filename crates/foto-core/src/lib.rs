pub mod config;
pub mod logging;

pub mod client;
pub mod fetcher;
pub mod listing;
pub mod navigation;
pub mod server;
