//! Crawler and metadata normalizer for the DiVA research portal.
//!
//! `diva` walks the paginated listing pages of the [DiVA portal](http://www.diva-portal.org),
//! collects the publication identifiers (`pid`s) linked from them, fetches the CSL-JSON export of
//! every publication and normalizes it into a [`Publication`](publication::Publication):
//!
//! - Listing crawl over a fixed offset range (latest publications or a subject category)
//! - Retrying HTTP client with exponential backoff on transport failures
//! - Repair of the known escaping defects in the upstream export
//! - Best-effort, field-by-field normalization of the loosely typed export
//! - Append-only JSON-lines output
//!
//! # Getting Started
//!
//! ```no_run
//! use diva::{prelude::*, session::Session, sink::JsonLinesSink, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = Config::default().with_range(1, 501);
//!   let mut sink = JsonLinesSink::open(&config.output_path).await?;
//!
//!   let mut session = Session::new(&config)?;
//!   let stats = session.run(&mut sink).await?;
//!   println!("{} publications from {} institutions", stats.publications, stats.institutions.len());
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`publication`]: Normalized record types and the upstream enumerations
//! - [`listing`]: Listing crawler and link extraction
//! - [`export`]: Export fetcher and CSL-JSON normalizer
//! - [`sanitize`]: Repairs applied to the raw export body before parsing
//! - [`client`]: HTTP client with retry
//! - [`sink`]: Output destinations for normalized records
//! - [`session`]: One crawl run tying everything together
//! - [`configuration`]: TOML configuration

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::{BTreeMap, BTreeSet},
  fmt::Display,
  path::{Path, PathBuf},
  str::FromStr,
  time::Duration,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::{stream, Stream, StreamExt, TryStreamExt};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, trace, warn};
use url::Url;
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod client;
pub mod configuration;
pub mod error;
pub mod export;
pub mod listing;
pub mod publication;
pub mod sanitize;
pub mod session;
pub mod sink;

pub use configuration::Config;

use crate::{client::*, configuration::*, error::*, publication::*};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use diva::{prelude::*, sink::MemorySink};
///
/// async fn example(sink: &mut MemorySink) -> Result<(), DivaError> {
///   sink.flush().await?;
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{error::DivaError, sink::RecordSink};
}
