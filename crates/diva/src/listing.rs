//! Listing crawler: walks the portal's paginated result pages and collects publication ids.
//!
//! A listing page is plain HTML. Every entry is an `li.ui-datalist-item` holding an
//! `a.titleLink` whose `href` carries the publication id as its `pid` query parameter, e.g.
//! `record.jsf?pid=diva2:1600051&dswid=-1530`. Entries without a `pid` are not publications and
//! are skipped.
//!
//! # Examples
//!
//! ```
//! use diva::listing::{extract_identifiers, LinkSelectors};
//!
//! let html = r#"<ul>
//!   <li class="ui-datalist-item"><a class="titleLink" href="record.jsf?pid=diva2:1">One</a></li>
//!   <li class="ui-datalist-item"><a class="titleLink" href="about.jsf">About</a></li>
//! </ul>"#;
//! let selectors = LinkSelectors::new("li.ui-datalist-item", "a.titleLink")?;
//! assert_eq!(extract_identifiers(html, &selectors)?, ["diva2:1"]);
//! # Ok::<(), diva::error::DivaError>(())
//! ```

use scraper::{Html, Selector};

use super::*;

/// Query parameter naming the publication on listing links.
pub const PID_PARAMETER: &str = "pid";

/// Fixed window id the portal expects on `latest.jsf`.
const LATEST_DSWID: &str = "-9944";

/// Parsed CSS selectors used to find listing entries and their title links.
#[derive(Debug, Clone)]
pub struct LinkSelectors {
  /// Selects one listing entry
  item: Selector,
  /// Selects the title link inside an entry
  link: Selector,
}

impl LinkSelectors {
  /// Parses the entry and link selectors.
  pub fn new(item: &str, link: &str) -> Result<Self> {
    Ok(Self { item: parse_selector(item)?, link: parse_selector(link)? })
  }

  /// Selectors from the `listing` section of the configuration.
  pub fn from_config(listing: &ListingConfig) -> Result<Self> {
    Self::new(&listing.item_selector, &listing.link_selector)
  }
}

/// Parses one CSS selector, keeping the parser's complaint in the error.
fn parse_selector(selector: &str) -> Result<Selector> {
  Selector::parse(selector).map_err(|e| DivaError::Selector(format!("{selector}: {e}")))
}

/// The identifiers found on one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
  /// Offset the page was requested with
  pub offset:      usize,
  /// Publication ids in document order
  pub identifiers: Vec<String>,
}

/// Extracts the publication ids linked from a listing page, in document order.
///
/// # Errors
///
/// Returns [`DivaError::MalformedListingLink`] if any title link carries more than one `pid`, in
/// which case nothing from the page is returned.
pub fn extract_identifiers(html: &str, selectors: &LinkSelectors) -> Result<Vec<String>> {
  let document = Html::parse_document(html);
  let items: Vec<_> = document.select(&selectors.item).collect();
  debug!("found {} search items", items.len());

  let mut identifiers = Vec::new();
  for item in items {
    let Some(href) = item.select(&selectors.link).next().and_then(|a| a.value().attr("href"))
    else {
      continue;
    };

    let mut values = pid_values(href);
    match values.len() {
      0 => trace!("skipping link without {PID_PARAMETER}: {href}"),
      1 => identifiers.extend(values.pop()),
      _ => return Err(DivaError::MalformedListingLink { href: href.to_string(), values }),
    }
  }
  Ok(identifiers)
}

/// Every non-empty `pid` value in the query string of `href`.
fn pid_values(href: &str) -> Vec<String> {
  let without_fragment = href.split('#').next().unwrap_or(href);
  let Some((_, query)) = without_fragment.split_once('?') else {
    return Vec::new();
  };
  url::form_urlencoded::parse(query.as_bytes())
    .filter(|(key, value)| key == PID_PARAMETER && !value.is_empty())
    .map(|(_, value)| value.into_owned())
    .collect()
}

/// Walks the listing pages of one [`ListingConfig`] strictly in order.
#[derive(Debug, Clone)]
pub struct ListingCrawler {
  /// Shared HTTP client
  client:    DivaClient,
  /// Portal base URL, ending in `/`
  base:      Url,
  /// Which listing and offset range to walk
  listing:   ListingConfig,
  /// Entry and link selectors
  selectors: LinkSelectors,
}

impl ListingCrawler {
  /// Creates a crawler for the listing described by `config`.
  pub fn new(config: &Config, client: DivaClient) -> Result<Self> {
    config.validate()?;
    Ok(Self {
      client,
      base: config.portal_base()?,
      listing: config.listing.clone(),
      selectors: LinkSelectors::from_config(&config.listing)?,
    })
  }

  /// Offsets requested, `start` stepping by `page_size` while below `stop`.
  pub fn offsets(&self) -> impl Iterator<Item = usize> {
    (self.listing.start..self.listing.stop).step_by(self.listing.page_size.max(1))
  }

  /// The URL of the listing page at `offset`.
  pub fn page_url(&self, offset: usize) -> Result<Url> {
    let mut url = match self.listing.kind {
      ListingKind::Latest => {
        let mut url = self.base.join("latest.jsf")?;
        url.query_pairs_mut().append_pair("dswid", LATEST_DSWID);
        url
      },
      ListingKind::Subject => {
        let filter = serde_json::json!([[{ "categoryId": self.listing.category_id }]]);
        let mut url = self.base.join("resultList.jsf")?;
        url
          .query_pairs_mut()
          .append_pair("language", "sv")
          .append_pair("searchType", "SUBJECT")
          .append_pair("query", "")
          .append_pair("af", "[]")
          .append_pair("aq", &filter.to_string())
          .append_pair("aq2", "[[]]")
          .append_pair("aqe", "[]")
          .append_pair("noOfRows", &self.listing.page_size.to_string())
          .append_pair("sortOrder", "author_sort_asc")
          .append_pair("sortOrder2", "title_sort_asc")
          .append_pair("onlyFullText", "false")
          .append_pair("sf", "all");
        url
      },
    };
    url.query_pairs_mut().append_pair("p", &offset.to_string());
    Ok(url)
  }

  /// Fetches and parses the listing page at `offset`.
  pub async fn fetch_page(&self, offset: usize) -> Result<ListingPage> {
    let url = self.page_url(offset)?;
    info!("Fetching listing page {offset}");
    let html = self.client.get_text(&url).await?;
    let identifiers = extract_identifiers(&html, &self.selectors)?;
    debug!("{} publication ids on page {offset}", identifiers.len());
    Ok(ListingPage { offset, identifiers })
  }

  /// Lazily fetches every page in [`Self::offsets`], one after the other.
  pub fn pages(&self) -> impl Stream<Item = Result<ListingPage>> + '_ {
    stream::iter(self.offsets()).then(move |offset| self.fetch_page(offset))
  }

  /// Lazily yields every publication id of every page, in page and document order.
  pub fn identifiers(&self) -> impl Stream<Item = Result<String>> + '_ {
    self
      .pages()
      .map_ok(|page| stream::iter(page.identifiers.into_iter().map(Ok::<_, DivaError>)))
      .try_flatten()
  }
}
