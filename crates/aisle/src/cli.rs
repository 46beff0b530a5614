use crate::config::ThemeName;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Browse a paged product catalog in the terminal.
#[derive(Debug, Parser)]
#[command(name = "aisle", version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: <config dir>/aisle/config.toml).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Catalog API base URL.
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Products fetched per request.
    #[arg(long, value_name = "N")]
    pub page_size: Option<usize>,

    /// Open at a shared location: `q=shoe&page=3` or `aisle://catalog?q=shoe`.
    #[arg(long, value_name = "LOCATION")]
    pub at: Option<String>,

    /// Browse the built-in sample catalog instead of the network.
    #[arg(long)]
    pub offline: bool,

    /// Neither read nor write the saved position.
    #[arg(long)]
    pub no_persist: bool,

    #[arg(long, value_enum)]
    pub theme: Option<ThemeName>,

    /// Leave the mouse to the terminal.
    #[arg(long)]
    pub no_mouse: bool,

    /// Write logs here. Without it nothing is logged.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// More log detail (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::parse_from(["aisle", "-vv", "--offline"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.offline);
    }

    #[test]
    fn at_takes_a_location() {
        let cli = Cli::parse_from(["aisle", "--at", "q=shoe&page=3"]);
        assert_eq!(cli.at.as_deref(), Some("q=shoe&page=3"));
    }
}
