//! Module for running a full crawl

use diva::{session::Session, sink::JsonLinesSink};

use super::*;

/// Options for [`Commands::Crawl`], each overriding the configuration file.
#[derive(Args, Clone, Default)]
pub struct CrawlOptions {
  /// Walk the newest-publications listing instead of a subject category
  #[arg(long, conflicts_with = "category")]
  pub latest: bool,

  /// Subject category id to walk
  #[arg(long)]
  pub category: Option<String>,

  /// First listing offset
  #[arg(long)]
  pub start: Option<usize>,

  /// Offset to stop before
  #[arg(long)]
  pub stop: Option<usize>,

  /// Entries requested per listing page
  #[arg(long)]
  pub page_size: Option<usize>,

  /// File publications are appended to
  #[arg(long, short)]
  pub output: Option<PathBuf>,

  /// Keep unrecognized type, status and language values instead of failing
  #[arg(long, action = ArgAction::SetTrue)]
  pub lenient: bool,
}

impl CrawlOptions {
  /// Layers the command line overrides on top of `config`.
  pub fn apply(&self, mut config: Config) -> Config {
    if self.latest {
      config = config.with_listing_kind(ListingKind::Latest);
    }
    if let Some(category) = &self.category {
      config = config.with_listing_kind(ListingKind::Subject).with_category(category.as_str());
    }
    let start = self.start.unwrap_or(config.listing.start);
    let stop = self.stop.unwrap_or(config.listing.stop);
    config = config.with_range(start, stop);
    if let Some(page_size) = self.page_size {
      config = config.with_page_size(page_size);
    }
    if let Some(output) = &self.output {
      config = config.with_output_path(output);
    }
    if self.lenient {
      config = config.with_enum_policy(EnumPolicy::Lenient);
    }
    config
  }
}

/// Function for the [`Commands::Crawl`] in the CLI.
pub async fn crawl(config: Config, options: CrawlOptions) -> Result<()> {
  let config = options.apply(config);
  config.validate()?;

  let listing = &config.listing;
  let target = match listing.kind {
    ListingKind::Latest => "latest publications".to_string(),
    ListingKind::Subject => format!("subject category {}", listing.category_id),
  };
  println!(
    "{} Crawling {target} from offset {} to {} in pages of {}",
    style(INFO_PREFIX).blue(),
    listing.start,
    listing.stop,
    listing.page_size
  );

  let mut session = Session::new(&config)?;
  let mut sink = JsonLinesSink::open(&config.output_path).await?;
  let stats = session.run(&mut sink).await?;

  println!(
    "{} Wrote {} publications from {} institutions to {}",
    style(SUCCESS_PREFIX).green(),
    style(stats.publications).cyan(),
    style(stats.institutions.len()).cyan(),
    style(sink.path().display()).yellow()
  );
  Ok(())
}
