use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Axe Charts: axe throwing league statistics")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Fetch standings, profiles and matches from axescores and store them
    Scrape,
    /// Recompute match, season and career statistics plus badges
    Analyze,
    /// Render the static site into the dist directory
    Build,
    /// Scrape, analyze and build in one go
    Run,
    /// Serve the built site and the JSON API
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
