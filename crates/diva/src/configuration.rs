//! TOML configuration for a crawl run.
//!
//! Every field has a default, so an empty file (or [`Config::default`]) describes a full
//! crawl of DiVA's medicine subject category. See `config/diva.toml` for a documented sample.
//!
//! # Examples
//!
//! ```
//! use diva::{configuration::ListingKind, Config};
//!
//! let config = Config::default().with_listing_kind(ListingKind::Latest).with_range(1, 501);
//! assert_eq!(config.listing.page_size, 50);
//! ```

use super::*;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Base URL of the portal; the listing and export pages are resolved against it
  pub portal_url:  String,
  /// JSON-lines file publications are appended to
  pub output_path: PathBuf,
  /// What to do with unknown `type`, `status` and `language` values
  pub enum_policy: EnumPolicy,
  /// Which listing to crawl and over which offsets
  pub listing:     ListingConfig,
  /// HTTP client settings
  pub http:        HttpConfig,
  /// Retry settings for transport failures
  pub backoff:     BackoffConfig,
}

/// How the normalizer treats a raw enumeration value outside the known set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumPolicy {
  /// Fail the record with [`DivaError::UnrecognizedValue`]
  #[default]
  Strict,
  /// Keep the raw value in the `Unrecognized` variant and log a warning
  Lenient,
}

/// The listing pages walked by the [`ListingCrawler`](crate::listing::ListingCrawler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
  /// `latest.jsf`, the most recently registered publications
  Latest,
  /// `resultList.jsf` restricted to one subject category
  Subject,
}

/// Listing crawl settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
  /// Listing to crawl
  pub kind:          ListingKind,
  /// DiVA subject category id for [`ListingKind::Subject`], `11649` is medicine
  pub category_id:   String,
  /// First offset requested (the portal counts from 1)
  pub start:         usize,
  /// Offsets at or above this bound are not requested
  pub stop:          usize,
  /// Entries per listing page, which is also the offset stride
  pub page_size:     usize,
  /// CSS selector for one listing entry
  pub item_selector: String,
  /// CSS selector for the title link inside an entry
  pub link_selector: String,
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
  /// `User-Agent` header
  pub user_agent:   String,
  /// Per-request timeout; none when absent
  pub timeout_secs: Option<u64>,
  /// Extra static headers sent with every request
  pub headers:      BTreeMap<String, String>,
}

/// Exponential backoff settings for transport failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
  /// Delay before the first retry
  pub min_delay_ms: u64,
  /// Upper bound for a single delay
  pub max_delay_ms: u64,
  /// Growth factor between delays
  pub factor:       f32,
  /// Whether to randomize delays
  pub jitter:       bool,
  /// Retry ceiling; unbounded when absent
  pub max_retries:  Option<usize>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      portal_url:  "http://www.diva-portal.org/smash/".to_string(),
      output_path: Self::default_output_path(),
      enum_policy: EnumPolicy::default(),
      listing:     ListingConfig::default(),
      http:        HttpConfig::default(),
      backoff:     BackoffConfig::default(),
    }
  }
}

impl Default for ListingConfig {
  fn default() -> Self {
    Self {
      kind:          ListingKind::Subject,
      category_id:   "11649".to_string(),
      start:         1,
      stop:          219_750,
      page_size:     250,
      item_selector: "li.ui-datalist-item".to_string(),
      link_selector: "a.titleLink".to_string(),
    }
  }
}

impl Default for HttpConfig {
  fn default() -> Self {
    Self {
      user_agent:   format!("diva/{}", env!("CARGO_PKG_VERSION")),
      timeout_secs: None,
      headers:      BTreeMap::new(),
    }
  }
}

impl Default for BackoffConfig {
  fn default() -> Self {
    Self { min_delay_ms: 500, max_delay_ms: 60_000, factor: 2.0, jitter: true, max_retries: None }
  }
}

impl Config {
  /// Platform configuration file location, e.g. `~/.config/diva/config.toml` on Linux.
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("diva").join("config.toml")
  }

  /// Platform data location for the output, e.g. `~/.local/share/diva/publications.jsonl`.
  pub fn default_output_path() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("diva").join("publications.jsonl")
  }

  /// Reads a configuration file, filling absent fields with defaults.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    let config: Self = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
  }

  /// Writes the configuration as TOML, creating parent directories.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(self)?)?;
    Ok(())
  }

  /// Rejects settings the crawler cannot work with.
  pub fn validate(&self) -> Result<()> {
    if self.listing.page_size == 0 {
      return Err(DivaError::Config("listing.page_size must be at least 1".to_string()));
    }
    if self.listing.start > self.listing.stop {
      return Err(DivaError::Config(format!(
        "listing.start ({}) is past listing.stop ({})",
        self.listing.start, self.listing.stop
      )));
    }
    Url::parse(&self.portal_url)?;
    Ok(())
  }

  /// The portal URL with a trailing slash, so relative paths resolve beneath it.
  pub fn portal_base(&self) -> Result<Url> {
    if self.portal_url.ends_with('/') {
      Ok(Url::parse(&self.portal_url)?)
    } else {
      Ok(Url::parse(&format!("{}/", self.portal_url))?)
    }
  }

  /// Sets the portal base URL.
  pub fn with_portal_url(mut self, url: impl Into<String>) -> Self {
    self.portal_url = url.into();
    self
  }

  /// Sets the output file.
  pub fn with_output_path(mut self, path: &Path) -> Self {
    self.output_path = path.to_path_buf();
    self
  }

  /// Sets the enumeration policy.
  pub fn with_enum_policy(mut self, policy: EnumPolicy) -> Self {
    self.enum_policy = policy;
    self
  }

  /// Switches the listing, resetting the page size to that listing's usual stride.
  pub fn with_listing_kind(mut self, kind: ListingKind) -> Self {
    self.listing.page_size = kind.default_page_size();
    self.listing.kind = kind;
    self
  }

  /// Crawls one subject category.
  pub fn with_category(self, category_id: impl Into<String>) -> Self {
    let mut config = self.with_listing_kind(ListingKind::Subject);
    config.listing.category_id = category_id.into();
    config
  }

  /// Sets the offset range `start..stop`.
  pub fn with_range(mut self, start: usize, stop: usize) -> Self {
    self.listing.start = start;
    self.listing.stop = stop;
    self
  }

  /// Sets the listing page size.
  pub fn with_page_size(mut self, page_size: usize) -> Self {
    self.listing.page_size = page_size;
    self
  }

  /// Sets the retry ceiling.
  pub fn with_max_retries(mut self, max_retries: Option<usize>) -> Self {
    self.backoff.max_retries = max_retries;
    self
  }
}

impl ListingKind {
  /// Entries per page the portal serves for this listing.
  pub fn default_page_size(&self) -> usize {
    match self {
      Self::Latest => 50,
      Self::Subject => 250,
    }
  }
}

impl HttpConfig {
  /// Request timeout, when configured.
  pub fn timeout(&self) -> Option<Duration> { self.timeout_secs.map(Duration::from_secs) }
}
