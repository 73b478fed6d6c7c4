//! CLI command handlers, one file per subcommand.

mod browse;
mod print;
mod serve;
mod watch;

pub use browse::run_browse;
pub use serve::run_serve;
pub use watch::run_watch;
