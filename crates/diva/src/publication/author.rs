use super::*;

/// An institution an author was affiliated with when the publication was registered.
///
/// # Examples
///
/// ```
/// use diva::publication::Affiliation;
///
/// let affiliation = Affiliation { id: Some(117), name: "Uppsala University".to_string() };
/// assert_eq!(affiliation.to_string(), "Uppsala University id:117");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Affiliation {
  /// DiVA's numeric organisation id, when the export carried one
  pub id:   Option<i64>,
  /// Organisation name
  pub name: String,
}

/// Author information for a DiVA publication.
///
/// Every name part is optional because the export omits them independently, e.g. corporate
/// authors only carry a `family` name.
///
/// # Examples
///
/// ```
/// use diva::publication::{Affiliation, Author};
///
/// let author = Author {
///   given_name:   Some("Anna".to_string()),
///   family_name:  Some("Svensson".to_string()),
///   orcid:        None,
///   affiliations: vec![Affiliation { id: Some(117), name: "Uppsala University".to_string() }],
/// };
/// assert_eq!(author.full_name(), "Anna Svensson");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
  /// Given name(s)
  pub given_name:   Option<String>,
  /// Family name
  pub family_name:  Option<String>,
  /// ORCID iD, verbatim from the export
  pub orcid:        Option<String>,
  /// Affiliations in export order
  pub affiliations: Vec<Affiliation>,
}

impl Author {
  /// Given and family name joined by a space, skipping the missing parts.
  pub fn full_name(&self) -> String {
    [self.given_name.as_deref(), self.family_name.as_deref()]
      .into_iter()
      .flatten()
      .collect::<Vec<_>>()
      .join(" ")
  }
}

impl Display for Affiliation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self.id {
      Some(id) => write!(f, "{} id:{}", self.name, id),
      None => write!(f, "{}", self.name),
    }
  }
}

impl Display for Author {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "* {}", self.full_name())?;
    if let Some(orcid) = &self.orcid {
      write!(f, " ({orcid})")?;
    }
    if !self.affiliations.is_empty() {
      let names: Vec<String> = self.affiliations.iter().map(ToString::to_string).collect();
      write!(f, " [{}]", names.join("; "))?;
    }
    Ok(())
  }
}
