//! Module for fetching a single publication

use diva::{export::RecordFetcher, sink::JsonLinesSink};

use super::*;

/// Options for [`Commands::Fetch`].
#[derive(Args, Clone)]
pub struct FetchOptions {
  /// Publication id, e.g. "diva2:1600051"
  pub pid: String,

  /// Append the publication to this file instead of printing it
  #[arg(long, short)]
  pub output: Option<PathBuf>,

  /// Keep unrecognized type, status and language values instead of failing
  #[arg(long, action = ArgAction::SetTrue)]
  pub lenient: bool,
}

/// Function for the [`Commands::Fetch`] in the CLI.
pub async fn fetch(mut config: Config, options: FetchOptions) -> Result<()> {
  if options.lenient {
    config = config.with_enum_policy(EnumPolicy::Lenient);
  }
  let publication = RecordFetcher::new(&config)?.fetch(&options.pid).await?;

  match options.output {
    Some(path) => {
      let mut sink = JsonLinesSink::open(&path).await?;
      sink.write(&publication).await?;
      sink.flush().await?;
      println!("{publication}");
      println!(
        "{} Appended {} to {}",
        style(SUCCESS_PREFIX).green(),
        style(&publication.diva_id).cyan(),
        style(path.display()).yellow()
      );
    },
    None => println!("{}", serde_json::to_string_pretty(&publication)?),
  }
  Ok(())
}
