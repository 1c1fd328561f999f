//! Command line front end for the `diva` crawler.
//!
//! Crawls a DiVA listing and appends every publication it links to, normalized, to a JSON-lines
//! file. Single records and saved listing pages can be inspected without a full crawl.
//!
//! # Usage
//!
//! ```bash
//! # Write the default configuration
//! diva init
//!
//! # Crawl the default subject category
//! diva crawl
//!
//! # Crawl the newest publications, first twenty pages only
//! diva crawl --latest --stop 1001
//!
//! # Print one normalized publication
//! diva fetch diva2:1600051
//!
//! # List the publication ids on a saved listing page
//! diva links page.html
//! ```
//!
//! Logging is controlled with `-v` flags or `RUST_LOG`.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{path::PathBuf, process::ExitCode};

use clap::{builder::ArgAction, Args, Parser, Subcommand};
use console::style;
use diva::{
  configuration::{EnumPolicy, ListingKind},
  prelude::*,
  Config,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;

use crate::{commands::*, error::*};

/// Prefix for information messages
static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for error messages
static ERROR_PREFIX: &str = "✗ ";

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Crawler for the DiVA research publication portal")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(short, long, action = ArgAction::Count, global = true, help = "Increase logging verbosity")]
  verbose: u8,

  /// Path to the configuration file. If not specified, uses the default platform-specific
  /// configuration directory.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,
}

impl Cli {
  /// The configuration file in use.
  fn config_path(&self) -> PathBuf { self.config.clone().unwrap_or_else(Config::default_path) }

  /// Loads the configuration file, falling back to defaults when there is none yet.
  fn load_config(&self) -> Result<Config> {
    let path = self.config_path();
    if path.exists() {
      Ok(Config::from_path(&path)?)
    } else {
      info!("No configuration at {}, using defaults", path.display());
      Ok(Config::default())
    }
  }
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true)
    .init();
}

/// Runs the requested command.
async fn run(cli: &Cli) -> Result<()> {
  debug!("Using configuration path {}", cli.config_path().display());
  match cli.command.clone() {
    Commands::Init(options) => init(cli, options),
    Commands::Crawl(options) => crawl(cli.load_config()?, options).await,
    Commands::Fetch(options) => fetch(cli.load_config()?, options).await,
    Commands::Links(options) => links(cli.load_config()?, options).await,
  }
}

/// Entry point for the `diva` CLI application
///
/// Any error ends the process with a non-zero exit code after printing it.
#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  match run(&cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("{} {e}", style(ERROR_PREFIX).red());
      ExitCode::FAILURE
    },
  }
}
