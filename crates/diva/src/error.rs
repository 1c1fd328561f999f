//! Error types for the diva library.
//!
//! Every failure mode of a crawl run is represented by [`DivaError`]:
//! - Transport failures, which the [`client`](crate::client) retries
//! - Upstream contract violations (error statuses, malformed listing links, empty exports)
//! - Normalization failures (unknown enumeration values, unparseable dates, broken JSON)
//! - Local configuration and file system errors
//!
//! # Examples
//!
//! ```no_run
//! use diva::{error::DivaError, export::RecordFetcher, Config};
//!
//! # async fn example() -> Result<(), DivaError> {
//! let fetcher = RecordFetcher::new(&Config::default())?;
//! match fetcher.fetch("diva2:1600051").await {
//!   Err(DivaError::RecordNotFound(id)) => println!("nothing exported for {id}"),
//!   Err(DivaError::UpstreamStatus { status, .. }) => println!("portal answered {status}"),
//!   Err(e) => println!("Other error: {e}"),
//!   Ok(publication) => println!("{publication}"),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Error type alias used for the [`diva`](crate) crate.
pub type Result<T> = core::result::Result<T, DivaError>;

/// Errors that can occur while crawling and normalizing DiVA records.
#[derive(Error, Debug)]
pub enum DivaError {
  /// A network request failed before a response status was received.
  ///
  /// Connection errors, timeouts and DNS failures end up here and are retried with backoff
  /// (see [`DivaError::is_transient`]).
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The portal answered with something other than `200 OK`.
  ///
  /// This is never retried: an error status is taken to mean a bad identifier or an outage,
  /// and aborts processing of the current page or record.
  #[error("got {status} from DiVA for {url}")]
  UpstreamStatus {
    /// The HTTP status code returned.
    status: u16,
    /// The URL that was requested.
    url:    String,
  },

  /// A listing link carried more than one `pid` query parameter.
  #[error("more than one publication id in listing link {href}: {values:?}")]
  MalformedListingLink {
    /// The offending `href` attribute.
    href:   String,
    /// Every `pid` value found on the link.
    values: Vec<String>,
  },

  /// The export for an identifier contained no usable publication object.
  #[error("no publication exported for {0}")]
  RecordNotFound(String),

  /// A raw `type`, `status` or `language` value outside the known enumeration.
  #[error("unrecognized {field} value \"{value}\"")]
  UnrecognizedValue {
    /// Name of the export field.
    field: &'static str,
    /// The raw value found.
    value: String,
  },

  /// A publication date that is not ISO-8601.
  #[error("invalid publication date \"{0}\"")]
  InvalidDate(String),

  /// The export body was not valid JSON, even after sanitizing.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// A configured CSS selector could not be parsed.
  #[error("invalid selector \"{0}\"")]
  Selector(String),

  /// A configured or derived URL could not be parsed.
  #[error(transparent)]
  Url(#[from] url::ParseError),

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// The configuration file could not be deserialized.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// The configuration could not be serialized.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// Catch-all for invalid configuration values.
  #[error("{0}")]
  Config(String),
}

impl DivaError {
  /// Whether the error is a transport-level failure worth retrying.
  ///
  /// Only [`DivaError::Network`] errors raised while connecting, sending or reading qualify.
  /// Status codes, redirects policy violations and decode failures are permanent.
  pub fn is_transient(&self) -> bool {
    match self {
      Self::Network(e) =>
        !(e.is_status() || e.is_builder() || e.is_redirect() || e.is_decode())
          && (e.is_connect() || e.is_timeout() || e.is_request() || e.is_body()),
      _ => false,
    }
  }
}
