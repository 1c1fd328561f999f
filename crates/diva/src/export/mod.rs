//! Export fetcher: turns a publication id into a normalized [`Publication`].
//!
//! DiVA serves CSL-JSON through its export endpoint. Asking it for a single id returns a JSON array
//! wrapping exactly one publication object, although the body is frequently not valid JSON until
//! the defects in [`sanitize`](crate::sanitize) are repaired.
//!
//! # Examples
//!
//! ```no_run
//! use diva::{export::RecordFetcher, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = RecordFetcher::new(&Config::default())?;
//! let publication = fetcher.fetch("diva2:1600051").await?;
//! println!("{}", publication.doi_url());
//! # Ok(())
//! # }
//! ```

use crate::sanitize::sanitize_export_body;

use super::*;

mod json;

pub use json::{parse_publication_date, Normalizer};

/// Fetches and normalizes single records from the export endpoint.
#[derive(Debug, Clone)]
pub struct RecordFetcher {
  /// Shared HTTP client
  client:     DivaClient,
  /// Portal base URL, ending in `/`
  base:       Url,
  /// Field mapping applied to every fetched record
  normalizer: Normalizer,
}

impl RecordFetcher {
  /// Creates a fetcher with its own [`DivaClient`].
  pub fn new(config: &Config) -> Result<Self> { Self::with_client(config, DivaClient::new(config)?) }

  /// Creates a fetcher sharing an existing client.
  pub fn with_client(config: &Config, client: DivaClient) -> Result<Self> {
    Ok(Self {
      client,
      base: config.portal_base()?,
      normalizer: Normalizer::new(config.enum_policy),
    })
  }

  /// The export URL for one publication id.
  pub fn export_url(&self, diva_id: &str) -> Result<Url> {
    let filter = serde_json::json!([[{ "id": diva_id }]]);
    let mut url = self.base.join("export.jsf")?;
    url
      .query_pairs_mut()
      .append_pair("format", "csl_json")
      .append_pair("addFilename", "true")
      .append_pair("aq", &filter.to_string())
      .append_pair("aqe", "[]")
      .append_pair("aq2", "[[]]")
      .append_pair("onlyFullText", "false")
      .append_pair("noOfRows", "50")
      .append_pair("sortOrder", "title_sort_asc")
      .append_pair("sortOrder2", "title_sort_asc");
    Ok(url)
  }

  /// Fetches the export for `diva_id` and normalizes it.
  ///
  /// # Errors
  ///
  /// - [`DivaError::UpstreamStatus`] when the export endpoint does not answer `200 OK`
  /// - [`DivaError::RecordNotFound`] when the export holds no publication
  /// - [`DivaError::Json`] when the body is not JSON even after sanitizing
  /// - any normalization error from [`Normalizer::normalize`]
  pub async fn fetch(&self, diva_id: &str) -> Result<Publication> {
    let url = self.export_url(diva_id)?;
    info!("Fetching {diva_id}");
    let body = self.client.get_text(&url).await?;
    parse_export(diva_id, &body, &self.normalizer)
  }
}

/// Sanitizes and parses a raw export body, then normalizes its first publication object.
pub fn parse_export(diva_id: &str, body: &str, normalizer: &Normalizer) -> Result<Publication> {
  let document: Value = serde_json::from_str(&sanitize_export_body(body))?;

  let record = match document.as_array().and_then(|records| records.first()) {
    Some(record) if record.is_object() => record,
    _ => return Err(DivaError::RecordNotFound(diva_id.to_string())),
  };
  if let Some(fields) = record.as_object() {
    trace!("export fields for {diva_id}: {:?}", fields.keys().collect::<Vec<_>>());
  }

  normalizer.normalize(diva_id, record)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_export_url_embeds_id_filter() {
    let config = Config::default().with_portal_url("http://localhost/smash");
    let fetcher = RecordFetcher::new(&config).unwrap();
    let url = fetcher.export_url("diva2:1600051").unwrap();

    assert_eq!(url.path(), "/smash/export.jsf");
    let pairs: BTreeMap<_, _> = url.query_pairs().into_owned().collect();
    assert_eq!(pairs["format"], "csl_json");
    assert_eq!(pairs["addFilename"], "true");
    assert_eq!(pairs["aq"], r#"[[{"id":"diva2:1600051"}]]"#);
    assert_eq!(pairs["aq2"], "[[]]");
  }

  #[test]
  fn test_empty_or_null_export_is_not_found() {
    let normalizer = Normalizer::default();
    for body in ["[]", "[null]", "{}", "[\"diva2:1\"]"] {
      let err = parse_export("diva2:1", body, &normalizer).unwrap_err();
      assert!(matches!(err, DivaError::RecordNotFound(ref id) if id == "diva2:1"), "{body}: {err}");
    }
  }

  #[test]
  fn test_invalid_json_is_reported() {
    let err = parse_export("diva2:1", "[{\"title\": ", &Normalizer::default()).unwrap_err();
    assert!(matches!(err, DivaError::Json(_)));
  }

  #[test]
  fn test_defective_body_is_repaired_before_parsing() {
    let body = "[{\"type\": \"article-journal\",\n \"title\": \"The \\p-value\tdebate\",\n \
                \"note\": \"95\\% CI\"}]\n";
    let publication = parse_export("diva2:1599119", body, &Normalizer::default()).unwrap();
    assert_eq!(publication.title.as_deref(), Some("The p-value debate"));
    assert_eq!(publication.note.as_deref(), Some("95% CI"));
    assert_eq!(publication.kind, Some(PublicationType::ArticleJournal));
  }

  #[test]
  fn test_only_the_first_record_is_used() {
    let body = r#"[{"title": "First"}, {"title": "Second"}]"#;
    let publication = parse_export("diva2:1", body, &Normalizer::default()).unwrap();
    assert_eq!(publication.title.as_deref(), Some("First"));
  }
}
