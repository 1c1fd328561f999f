//! Module for writing a fresh configuration file

use super::*;

/// Options for [`Commands::Init`].
#[derive(Args, Clone)]
pub struct InitOptions {
  /// Overwrite an existing configuration
  #[arg(long, action = ArgAction::SetTrue)]
  pub force: bool,
}

/// Function for the [`Commands::Init`] in the CLI.
pub fn init(cli: &Cli, options: InitOptions) -> Result<()> {
  let path = cli.config_path();
  if path.exists() && !options.force {
    return Err(DivaCliError::ConfigExists(path));
  }

  let config = Config::default();
  config.save(&path)?;

  println!(
    "{} Wrote default configuration to {}",
    style(SUCCESS_PREFIX).green(),
    style(path.display()).yellow()
  );
  println!(
    "{} Publications will be appended to {}",
    style(INFO_PREFIX).blue(),
    style(config.output_path.display()).yellow()
  );
  Ok(())
}
