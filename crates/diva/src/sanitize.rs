//! Repairs for known escaping defects in the DiVA CSL-JSON export.
//!
//! The export endpoint emits raw control characters inside strings and backslash escapes that are
//! not valid JSON (`\p`, `\%`, `\o`). These are narrow patches for observed records, applied as
//! literal replacements in the order of [`KNOWN_ESCAPE_DEFECTS`]. Later entries rely on earlier
//! ones having run, so new patches are appended at the end.

/// Ordered `(find, replace)` pairs applied by [`sanitize_export_body`].
pub const KNOWN_ESCAPE_DEFECTS: &[(&str, &str)] = &[
  // raw newlines inside string values, e.g. diva2:1600051
  ("\n", ""),
  // e.g. diva2:1599119
  ("\\p", "p"),
  // e.g. diva2:1596811
  ("\\%", "%"),
  // names with diacritics exported as `\o`
  ("\\o", " o"),
  ("\t", " "),
];

/// Applies every entry of [`KNOWN_ESCAPE_DEFECTS`] to the raw export body.
pub fn sanitize_export_body(raw: &str) -> String {
  KNOWN_ESCAPE_DEFECTS
    .iter()
    .fold(raw.to_string(), |body, (find, replace)| body.replace(find, replace))
}
