//! Enumerations of the raw `type`, `status` and `language` values found in DiVA exports.
//!
//! Each enumeration keeps an `Unrecognized` variant that carries a raw value outside the known set,
//! so whether an unseen value aborts a record is left to the
//! [`Normalizer`](crate::export::Normalizer) instead of being baked into the type.

use super::*;

/// An enumeration over raw upstream strings with a catch-all for unseen values.
pub trait RawEnum: Sized {
  /// Name of the export field the value is read from.
  const FIELD: &'static str;

  /// Maps a raw upstream string, keeping unseen values in the `Unrecognized` variant.
  fn from_raw(raw: &str) -> Self;

  /// Whether this is one of the known values.
  fn is_recognized(&self) -> bool;
}

/// Declares an enumeration over raw upstream strings.
///
/// Generates `as_str`, a [`RawEnum`] impl, a strict [`FromStr`] that yields
/// [`DivaError::UnrecognizedValue`], [`Display`], and string-based serde impls.
macro_rules! raw_enum {
  (
    $(#[$meta:meta])*
    $name:ident, $field:literal {
      $($(#[$vmeta:meta])* $variant:ident => $raw:literal,)+
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub enum $name {
      $($(#[$vmeta])* $variant,)+
      /// A raw value outside the known set.
      Unrecognized(String),
    }

    impl $name {
      /// Every known variant, in declaration order.
      pub const KNOWN: &'static [$name] = &[$($name::$variant,)+];

      /// The raw upstream string for this value.
      pub fn as_str(&self) -> &str {
        match self {
          $(Self::$variant => $raw,)+
          Self::Unrecognized(raw) => raw,
        }
      }
    }

    impl RawEnum for $name {
      const FIELD: &'static str = $field;

      fn from_raw(raw: &str) -> Self {
        match raw {
          $($raw => Self::$variant,)+
          other => Self::Unrecognized(other.to_string()),
        }
      }

      fn is_recognized(&self) -> bool { !matches!(self, Self::Unrecognized(_)) }
    }

    impl FromStr for $name {
      type Err = DivaError;

      fn from_str(s: &str) -> Result<Self> {
        match Self::from_raw(s) {
          Self::Unrecognized(value) => Err(DivaError::UnrecognizedValue { field: $field, value }),
          known => Ok(known),
        }
      }
    }

    impl Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
      }
    }

    impl Serialize for $name {
      fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
      }
    }

    impl<'de> Deserialize<'de> for $name {
      fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_raw(&raw))
      }
    }
  };
}

raw_enum! {
  /// CSL item type of a publication.
  PublicationType, "type" {
    /// Journal article
    ArticleJournal => "article-journal",
    /// Newspaper article
    ArticleNewspaper => "article-newspaper",
    /// Book
    Book => "book",
    /// Book chapter
    Chapter => "chapter",
    /// Conference paper
    ConferencePaper => "paper-conference",
    /// Dataset
    Dataset => "dataset",
    /// Doctoral dissertation
    Dissertation => "dissertation",
    /// Unpublished manuscript
    Manuscript => "manuscript",
    /// Report
    Report => "report",
    /// Review
    Review => "review",
    /// Book review
    ReviewBook => "review-book",
    /// Musical work
    Song => "song",
    /// Talk or presentation
    Speech => "speech",
    /// Student thesis
    Thesis => "thesis",
  }
}

raw_enum! {
  /// Publishing status of a publication.
  PublicationStatus, "status" {
    /// Published
    Published => "Published",
    /// Published online ahead of the print issue
    EpubAheadOfPrint => "Epub ahead of print",
    /// In press
    InPress => "In press",
    /// Accepted for publication
    Accepted => "Accepted",
    /// Submitted for review
    Submitted => "Submitted",
  }
}

raw_enum! {
  /// Language of a publication, as a three letter bibliographic code.
  Language, "language" {
    /// English
    English => "eng",
    /// Swedish
    Swedish => "swe",
    /// Danish
    Danish => "dan",
    /// Latin
    Latin => "lat",
    /// Icelandic
    Icelandic => "ice",
    /// Faroese
    Faroese => "fao",
    /// Greenlandic
    Greenlandic => "kal",
    /// Finnish
    Finnish => "fin",
    /// Norwegian
    Norwegian => "nor",
    /// Spanish
    Spanish => "spa",
    /// Hungarian
    Hungarian => "hun",
    /// German
    German => "ger",
  }
}

impl Language {
  /// English name of the language, or the raw code when unrecognized.
  pub fn name(&self) -> &str {
    match self {
      Self::English => "English",
      Self::Swedish => "Swedish",
      Self::Danish => "Danish",
      Self::Latin => "Latin",
      Self::Icelandic => "Icelandic",
      Self::Faroese => "Faroese",
      Self::Greenlandic => "Greenlandic",
      Self::Finnish => "Finnish",
      Self::Norwegian => "Norwegian",
      Self::Spanish => "Spanish",
      Self::Hungarian => "Hungarian",
      Self::German => "German",
      Self::Unrecognized(raw) => raw,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_every_known_value_round_trips() {
    for kind in PublicationType::KNOWN {
      assert_eq!(&PublicationType::from_raw(kind.as_str()), kind);
    }
    for status in PublicationStatus::KNOWN {
      assert_eq!(&status.as_str().parse::<PublicationStatus>().unwrap(), status);
    }
    assert_eq!(Language::KNOWN.len(), 12);
    assert_eq!(PublicationType::KNOWN.len(), 14);
  }

  #[test]
  fn test_strict_parse_rejects_unknown() {
    let err = "poem".parse::<PublicationType>().unwrap_err();
    assert!(matches!(
      err,
      DivaError::UnrecognizedValue { field: "type", ref value } if value == "poem"
    ));
    assert!("published".parse::<PublicationStatus>().is_err(), "matching is case sensitive");
  }

  #[test]
  fn test_lenient_parse_keeps_raw_value() {
    let language = Language::from_raw("klingon");
    assert_eq!(language, Language::Unrecognized("klingon".into()));
    assert!(!language.is_recognized());
    assert_eq!(language.name(), "klingon");
    assert_eq!(Language::from_raw("swe").name(), "Swedish");
  }

  #[test]
  fn test_serializes_as_raw_string() {
    let status = PublicationStatus::EpubAheadOfPrint;
    assert_eq!(serde_json::to_string(&status).unwrap(), "\"Epub ahead of print\"");
    let back: PublicationStatus = serde_json::from_str("\"In press\"").unwrap();
    assert_eq!(back, PublicationStatus::InPress);
    let unknown: PublicationType = serde_json::from_str("\"broadcast\"").unwrap();
    assert_eq!(unknown, PublicationType::Unrecognized("broadcast".into()));
  }
}
