mod compare;
mod history;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{Config, DEFAULT_API_URL};
use crate::services::compare_client::DEFAULT_TIMEOUT_SECS;
use crate::services::{ComparisonSession, FileHistoryStore};

pub use compare::CompareArgs;
pub use history::HistoryArgs;

/// Compare product prices across Amazon, eBay, and Walmart
#[derive(Parser)]
#[command(name = "pricecmp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Comparison API base URL
    #[arg(long, global = true, env = "PRICECMP_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Directory for search history and logs (default: ~/.pricecmp)
    #[arg(long, global = true, env = "PRICECMP_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive TUI (default)
    Tui,

    /// Compare prices for one product
    Compare(CompareArgs),

    /// Show or clear recent searches
    History(HistoryArgs),
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = Config::new(
            self.global.api_url,
            self.global.timeout,
            self.global.data_dir,
        )?;

        match self.command {
            None | Some(Commands::Tui) => {
                crate::logging::init_file(&config.log_path())?;
                crate::tui::run(&config)
            }
            Some(Commands::Compare(args)) => {
                crate::logging::init_stderr();
                args.run(&config)
            }
            Some(Commands::History(args)) => {
                crate::logging::init_stderr();
                args.run(&config)
            }
        }
    }
}

/// Session backed by the history file in the configured data dir
pub(crate) fn open_session(config: &Config) -> ComparisonSession {
    ComparisonSession::new(Box::new(FileHistoryStore::new(&config.data_dir)))
}
