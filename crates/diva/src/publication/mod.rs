//! Normalized publication records.
//!
//! A [`Publication`] starts out with nothing but its DiVA identifier and is filled in by a single
//! pass of the [`Normalizer`](crate::export::Normalizer) over one CSL-JSON export. Every field other
//! than [`Publication::diva_id`] is optional, because the portal omits fields inconsistently.
//!
//! # Examples
//!
//! ```
//! use diva::publication::Publication;
//!
//! let mut publication = Publication::new("diva2:1600051");
//! assert_eq!(publication.doi_url(), "");
//!
//! publication.doi = Some("10.1000/xyz".to_string());
//! assert_eq!(publication.doi_url(), "https://doi.org/10.1000/xyz");
//! ```

use super::*;

mod author;
mod kinds;

pub use author::{Affiliation, Author};
pub use kinds::{Language, PublicationStatus, PublicationType, RawEnum};

/// Resolver used for [`Publication::doi_url`].
pub const DOI_RESOLVER: &str = "https://doi.org/";
/// Resolver used for [`Publication::pubmed_url`].
pub const PUBMED_RESOLVER: &str = "https://pubmed.ncbi.nlm.nih.gov/";
/// National Library of Sweden URN:NBN resolver used for [`Publication::kb_urn_url`].
pub const KB_URN_RESOLVER: &str = "https://urn.kb.se/resolve?urn=";

/// One publication record from DiVA.
///
/// Serialized as one JSON object per line by the [`JsonLinesSink`](crate::sink::JsonLinesSink).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Publication {
  /// DiVA identifier (`pid`), e.g. `diva2:1600051`
  pub diva_id:          String,
  /// Full title
  pub title:            Option<String>,
  /// Abstract text
  #[serde(rename = "abstract")]
  pub abstract_text:    Option<String>,
  /// Digital Object Identifier
  pub doi:              Option<String>,
  /// URN:NBN persistent identifier
  pub urn_nbn:          Option<String>,
  /// PubMed identifier
  pub pubmed_id:        Option<String>,
  /// ISSN of the containing serial
  pub issn:             Option<String>,
  /// Publisher name
  pub publisher:        Option<String>,
  /// Journal, book or proceedings the publication appeared in
  pub container_title:  Option<String>,
  /// Free text note
  pub note:             Option<String>,
  /// Volume of the containing serial
  pub volume:           Option<String>,
  /// Issue number
  pub number:           Option<String>,
  /// Page range
  pub page:             Option<String>,
  /// Total number of pages
  pub number_of_pages:  Option<String>,
  /// Keywords in export order
  pub keywords:         Vec<String>,
  /// Authors in export order
  pub authors:          Vec<Author>,
  /// Language of the publication
  pub language:         Option<Language>,
  /// Publishing status
  pub status:           Option<PublicationStatus>,
  /// CSL item type
  #[serde(rename = "type")]
  pub kind:             Option<PublicationType>,
  /// Date of publication
  pub publication_date: Option<NaiveDate>,
}

impl Publication {
  /// Creates an empty record for `diva_id`.
  pub fn new(diva_id: impl Into<String>) -> Self {
    Self { diva_id: diva_id.into(), ..Default::default() }
  }

  /// DOI resolver link, or an empty string without a DOI.
  pub fn doi_url(&self) -> String {
    self.doi.as_deref().map(|doi| format!("{DOI_RESOLVER}{doi}")).unwrap_or_default()
  }

  /// PubMed link, or an empty string without a PubMed id.
  pub fn pubmed_url(&self) -> String {
    self.pubmed_id.as_deref().map(|id| format!("{PUBMED_RESOLVER}{id}")).unwrap_or_default()
  }

  /// URN:NBN resolver link with the URN percent-encoded, or an empty string without a URN.
  pub fn kb_urn_url(&self) -> String {
    self
      .urn_nbn
      .as_deref()
      .map(|urn| {
        let encoded: String = url::form_urlencoded::byte_serialize(urn.as_bytes()).collect();
        format!("{KB_URN_RESOLVER}{encoded}")
      })
      .unwrap_or_default()
  }

  /// Names of every affiliation of every author, in export order, repeats included.
  pub fn affiliation_names(&self) -> impl Iterator<Item = &str> {
    self.authors.iter().flat_map(|a| a.affiliations.iter()).map(|a| a.name.as_str())
  }
}

impl Display for Publication {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    writeln!(f, "title:{}", self.title.as_deref().unwrap_or(""))?;
    writeln!(f, "diva_id:{}", self.diva_id)?;
    match self.publication_date {
      Some(date) => write!(f, "date:{date}"),
      None => write!(f, "date:"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn with_identifiers() -> Publication {
    Publication {
      doi: Some("10.1000/xyz".into()),
      pubmed_id: Some("34567890".into()),
      urn_nbn: Some("urn:nbn:se:uu:diva-459123".into()),
      ..Publication::new("diva2:1600051")
    }
  }

  #[test]
  fn test_new_sets_only_the_identifier() {
    let publication = Publication::new("diva2:1");
    assert_eq!(publication, Publication { diva_id: "diva2:1".into(), ..Default::default() });
  }

  #[test]
  fn test_urls_are_empty_without_identifiers() {
    let publication = Publication::new("diva2:1");
    assert_eq!(publication.doi_url(), "");
    assert_eq!(publication.pubmed_url(), "");
    assert_eq!(publication.kb_urn_url(), "");
  }

  #[test]
  fn test_urls_substitute_identifiers() {
    let publication = with_identifiers();
    assert_eq!(publication.doi_url(), "https://doi.org/10.1000/xyz");
    assert_eq!(publication.pubmed_url(), "https://pubmed.ncbi.nlm.nih.gov/34567890");
    assert_eq!(
      publication.kb_urn_url(),
      "https://urn.kb.se/resolve?urn=urn%3Anbn%3Ase%3Auu%3Adiva-459123"
    );
  }

  #[test]
  fn test_affiliation_names_flatten_authors() {
    let mut publication = Publication::new("diva2:1");
    publication.authors = vec![
      Author {
        affiliations: vec![
          Affiliation { id: Some(1), name: "Uppsala University".into() },
          Affiliation { id: None, name: "Karolinska Institutet".into() },
        ],
        ..Default::default()
      },
      Author::default(),
      Author {
        affiliations: vec![Affiliation { id: Some(1), name: "Uppsala University".into() }],
        ..Default::default()
      },
    ];
    let names: Vec<&str> = publication.affiliation_names().collect();
    assert_eq!(names, ["Uppsala University", "Karolinska Institutet", "Uppsala University"]);
  }

  #[test]
  fn test_serializes_with_export_field_names() {
    let mut publication = with_identifiers();
    publication.kind = Some(PublicationType::ArticleJournal);
    publication.abstract_text = Some("An abstract".into());
    publication.publication_date = NaiveDate::from_ymd_opt(2021, 9, 27);

    let json = serde_json::to_value(&publication).unwrap();
    assert_eq!(json["type"], "article-journal");
    assert_eq!(json["abstract"], "An abstract");
    assert_eq!(json["publication_date"], "2021-09-27");
    assert!(json["title"].is_null());

    let back: Publication = serde_json::from_value(json).unwrap();
    assert_eq!(back, publication);
  }
}
