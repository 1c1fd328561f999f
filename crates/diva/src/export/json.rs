use chrono::{
  format::{parse, Parsed, StrftimeItems},
  DateTime,
};

use super::*;

/// Separator between the keywords of one `keyword` string.
const KEYWORD_DELIMITER: &str = "; ";

/// Leading artifact DiVA prefixes to some affiliation names.
const AFFILIATION_ARTIFACT: &str = "^,";

/// ISO-8601 layouts accepted for `published[0].raw` besides RFC 3339, extended and basic.
///
/// `%#z` takes `Z`, `+hh`, `+hhmm` and `+hh:mm`.
const ISO_8601_LAYOUTS: &[&str] = &[
  "%Y-%m-%d",
  "%Y-%m-%dT%H:%M:%S%.f%#z",
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M%#z",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%dT%H%#z",
  "%Y-%m-%dT%H",
  "%Y-%m-%d %H:%M:%S",
  "%Y%m%d",
  "%Y%m%dT%H%M%S%.f%#z",
  "%Y%m%dT%H%M%S%.f",
  "%Y%m%dT%H%M%#z",
  "%Y%m%dT%H%M",
  "%Y%m%dT%H%#z",
  "%Y%m%dT%H",
];

/// Maps one CSL-JSON publication object onto a [`Publication`].
///
/// Every field is looked up independently and left unset when missing, so a sparse export still
/// yields a record. Only values that are present but cannot be mapped fail the record.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
  /// Treatment of unknown `type`, `status` and `language` values
  policy: EnumPolicy,
}

impl Normalizer {
  /// Creates a normalizer with the given enumeration policy.
  pub fn new(policy: EnumPolicy) -> Self { Self { policy } }

  /// Builds a publication for `diva_id` from one export object.
  ///
  /// Normalizing the same object twice yields equal publications.
  pub fn normalize(&self, diva_id: &str, record: &Value) -> Result<Publication> {
    let mut publication = Publication::new(diva_id);

    publication.kind = self.map_enum(record)?;
    publication.status = self.map_enum(record)?;
    publication.language = self.map_enum(record)?;
    publication.title = string_field(record, "title");
    publication.abstract_text = string_field(record, "abstract");
    publication.authors = parse_authors(record);
    parse_identifiers(record, &mut publication);
    publication.keywords = parse_keywords(record);
    parse_medium(record, &mut publication)?;

    if publication.authors.is_empty() {
      debug!("no authors found for {diva_id}");
    }
    Ok(publication)
  }

  /// Looks up the raw value for `T` and maps it according to the policy.
  fn map_enum<T: RawEnum + Display>(&self, record: &Value) -> Result<Option<T>> {
    let Some(raw) = string_field(record, T::FIELD) else {
      return Ok(None);
    };

    let value = T::from_raw(&raw);
    if value.is_recognized() {
      return Ok(Some(value));
    }
    match self.policy {
      EnumPolicy::Strict => Err(DivaError::UnrecognizedValue { field: T::FIELD, value: raw }),
      EnumPolicy::Lenient => {
        warn!("keeping unrecognized {} value \"{value}\"", T::FIELD);
        Ok(Some(value))
      },
    }
  }
}

/// A scalar field as a string; numbers are rendered, anything else counts as absent.
fn string_field(record: &Value, key: &str) -> Option<String> { record.get(key).and_then(scalar) }

/// Renders strings and numbers.
fn scalar(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

/// `author[]` with their `affiliation[]`, in export order.
fn parse_authors(record: &Value) -> Vec<Author> {
  let Some(entries) = record.get("author").and_then(Value::as_array) else {
    return Vec::new();
  };

  entries
    .iter()
    .filter(|entry| {
      let is_object = entry.is_object();
      if !is_object {
        warn!("skipping author entry that is not an object: {entry}");
      }
      is_object
    })
    .map(|entry| Author {
      given_name:   string_field(entry, "given"),
      family_name:  string_field(entry, "family"),
      orcid:        string_field(entry, "ORCID"),
      affiliations: entry
        .get("affiliation")
        .and_then(Value::as_array)
        .map(|affiliations| affiliations.iter().map(parse_affiliation).collect())
        .unwrap_or_default(),
    })
    .collect()
}

/// One `affiliation` entry; the name is cleaned and the id parsed when possible.
fn parse_affiliation(entry: &Value) -> Affiliation {
  let name = string_field(entry, "name").map(|name| clean_affiliation_name(&name)).unwrap_or_default();
  let id = entry.get("id").and_then(|id| {
    let parsed = match id {
      Value::Number(n) => n.as_i64(),
      Value::String(s) => s.trim().parse().ok(),
      _ => None,
    };
    if parsed.is_none() && !id.is_null() {
      warn!("ignoring non-numeric affiliation id {id} for \"{name}\"");
    }
    parsed
  });
  Affiliation { id, name }
}

/// Strips the leading `^,` artifact and surrounding whitespace.
fn clean_affiliation_name(raw: &str) -> String {
  let trimmed = raw.trim();
  trimmed.strip_prefix(AFFILIATION_ARTIFACT).unwrap_or(trimmed).trim().to_string()
}

/// `NBN`, `DOI` and `PMID`, verbatim.
fn parse_identifiers(record: &Value, publication: &mut Publication) {
  publication.urn_nbn = string_field(record, "NBN");
  publication.doi = string_field(record, "DOI");
  publication.pubmed_id = string_field(record, "PMID");
}

/// `keyword` is one `; `-delimited string; a bare `;` belongs to the keyword.
fn parse_keywords(record: &Value) -> Vec<String> {
  string_field(record, "keyword")
    .map(|keywords| {
      keywords
        .split(KEYWORD_DELIMITER)
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(String::from)
        .collect()
    })
    .unwrap_or_default()
}

/// Journal, book or series details and the publication date.
fn parse_medium(record: &Value, publication: &mut Publication) -> Result<()> {
  publication.issn = string_field(record, "ISSN");
  publication.publisher = string_field(record, "publisher");
  publication.volume = string_field(record, "volume");
  publication.number = string_field(record, "number");
  publication.page = string_field(record, "page");
  publication.number_of_pages = string_field(record, "number-of-pages");
  publication.container_title = string_field(record, "container-title");
  publication.note = string_field(record, "note");

  let raw_date = record
    .get("published")
    .and_then(Value::as_array)
    .and_then(|published| published.first())
    .and_then(|first| first.get("raw"))
    .and_then(scalar);
  if let Some(raw) = raw_date {
    publication.publication_date = Some(parse_publication_date(&raw)?);
  }
  Ok(())
}

/// Parses an ISO-8601 date or date-time into its calendar date.
///
/// Reduced precision dates (`2021`, `2021-09`) resolve to their first day, and date-times keep the
/// date as written, whatever the offset.
///
/// ```
/// use chrono::NaiveDate;
/// use diva::export::parse_publication_date;
///
/// assert_eq!(parse_publication_date("2021-09-27")?, NaiveDate::from_ymd_opt(2021, 9, 27).unwrap());
/// assert_eq!(parse_publication_date("2021")?, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
/// # Ok::<(), diva::error::DivaError>(())
/// ```
pub fn parse_publication_date(raw: &str) -> Result<NaiveDate> {
  let raw = raw.trim();
  let invalid = || DivaError::InvalidDate(raw.to_string());

  if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
    return Ok(date_time.date_naive());
  }
  for layout in ISO_8601_LAYOUTS {
    let mut parsed = Parsed::new();
    if parse(&mut parsed, raw, StrftimeItems::new(layout)).is_ok() {
      if let Ok(date) = parsed.to_naive_date() {
        return Ok(date);
      }
    }
  }

  if !raw.is_ascii() {
    return Err(invalid());
  }
  let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
  let (year, month, day) = match raw.len() {
    4 if digits(raw) => (raw, "1", "1"),
    7 if digits(&raw[..4]) && &raw[4..5] == "-" && digits(&raw[5..]) => (&raw[..4], &raw[5..], "1"),
    _ => return Err(invalid()),
  };
  let year = year.parse().map_err(|_| invalid())?;
  let month = month.parse().map_err(|_| invalid())?;
  let day = day.parse().map_err(|_| invalid())?;
  NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}
