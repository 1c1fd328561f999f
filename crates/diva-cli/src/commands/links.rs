//! Module for inspecting a saved listing page

use diva::listing::{extract_identifiers, LinkSelectors};

use super::*;

/// Options for [`Commands::Links`].
#[derive(Args, Clone)]
pub struct LinksOptions {
  /// HTML file of a saved listing page
  pub file: PathBuf,
}

/// Function for the [`Commands::Links`] in the CLI.
///
/// Prints one id per line on stdout and the summary on stderr, so the output can be piped.
pub async fn links(config: Config, options: LinksOptions) -> Result<()> {
  let html = tokio::fs::read_to_string(&options.file).await?;
  let selectors = LinkSelectors::from_config(&config.listing)?;
  let identifiers = extract_identifiers(&html, &selectors)?;

  for diva_id in &identifiers {
    println!("{diva_id}");
  }
  eprintln!(
    "{} Found {} publication ids in {}",
    style(INFO_PREFIX).blue(),
    identifiers.len(),
    options.file.display()
  );
  Ok(())
}
