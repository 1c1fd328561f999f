//! One crawl run: listing pages in, normalized publications out.
//!
//! A [`Session`] processes one identifier completely (fetch, normalize, write) before asking the
//! crawler for the next one. The first error aborts the run; everything written before it stays in
//! the sink.

use crate::{export::RecordFetcher, listing::ListingCrawler, sink::RecordSink};

use super::*;

/// Running totals for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
  /// Publications normalized and written
  pub publications: usize,
  /// Every distinct affiliation name seen so far
  pub institutions: BTreeSet<String>,
}

impl RunStats {
  /// Counts a publication and records its affiliation names.
  pub fn observe(&mut self, publication: &Publication) {
    self.publications += 1;
    self.institutions.extend(publication.affiliation_names().map(String::from));
  }
}

/// A crawl run over the configured listing.
#[derive(Debug)]
pub struct Session {
  /// Produces publication ids
  crawler: ListingCrawler,
  /// Turns ids into publications
  fetcher: RecordFetcher,
  /// Totals so far
  stats:   RunStats,
}

impl Session {
  /// Builds the crawler and fetcher for `config`, sharing one HTTP client.
  pub fn new(config: &Config) -> Result<Self> {
    let client = DivaClient::new(config)?;
    Ok(Self {
      crawler: ListingCrawler::new(config, client.clone())?,
      fetcher: RecordFetcher::with_client(config, client)?,
      stats:   RunStats::default(),
    })
  }

  /// Totals so far.
  pub fn stats(&self) -> &RunStats { &self.stats }

  /// The listing crawler of this session.
  pub fn crawler(&self) -> &ListingCrawler { &self.crawler }

  /// Fetches and normalizes a single publication without touching the totals.
  pub async fn fetch_one(&self, diva_id: &str) -> Result<Publication> {
    self.fetcher.fetch(diva_id).await
  }

  /// Crawls every configured listing page and writes each publication to `sink`.
  ///
  /// Returns the totals once the offset range is exhausted.
  ///
  /// # Errors
  ///
  /// The first error from the crawler, the fetcher or the sink ends the run.
  pub async fn run<S: RecordSink + ?Sized>(&mut self, sink: &mut S) -> Result<RunStats> {
    info!("Crawling {} listing pages", self.crawler.offsets().count());

    let outcome = self.process_all(sink).await;
    sink.flush().await?;
    outcome?;

    info!(
      "Finished with {} publications from {} institutions",
      self.stats.publications,
      self.stats.institutions.len()
    );
    Ok(self.stats.clone())
  }

  /// The fetch-normalize-write loop of [`Self::run`].
  async fn process_all<S: RecordSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
    let identifiers = self.crawler.identifiers();
    futures::pin_mut!(identifiers);

    while let Some(diva_id) = identifiers.try_next().await? {
      let publication = self.fetcher.fetch(&diva_id).await?;
      sink.write(&publication).await?;
      self.stats.observe(&publication);
      info!(
        "Number of institutions found: {} from a total of {} publications",
        self.stats.institutions.len(),
        self.stats.publications
      );
    }
    Ok(())
  }
}
