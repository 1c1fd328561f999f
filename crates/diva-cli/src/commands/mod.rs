//! Subcommands of the `diva` CLI.

use super::*;

pub mod crawl;
pub mod fetch;
pub mod init;
pub mod links;

pub use crawl::{crawl, CrawlOptions};
pub use fetch::{fetch, FetchOptions};
pub use init::{init, InitOptions};
pub use links::{links, LinksOptions};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Write the default configuration file
  Init(InitOptions),

  /// Crawl a listing and append every publication to the output file
  Crawl(CrawlOptions),

  /// Fetch and print a single publication
  Fetch(FetchOptions),

  /// List the publication ids on a saved listing page
  Links(LinksOptions),
}
