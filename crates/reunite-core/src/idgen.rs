//! Human-readable id derivation for cases and matches.
//!
//! The pure parts (code derivation, formatting) live here so they can be
//! tested without a store; the sequence counting and collision retry loop
//! run inside a store transaction.

use chrono::NaiveDate;
use rand_core::{OsRng, RngCore};

use crate::case::CaseKind;

/// Placeholder location code when the report has no usable city.
const NO_LOCATION: &str = "XXX";

const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Location code: first 4 chars of the trimmed city, uppercased.
pub fn location_code(city: Option<&str>) -> String {
  match city.map(str::trim).filter(|c| !c.is_empty()) {
    Some(c) => c.chars().take(4).collect::<String>().to_uppercase(),
    None => NO_LOCATION.to_string(),
  }
}

/// Compose a sequential case id: `{TYPE}-{YYYYMM}-{LOC}-{SEQ:03}`.
pub fn case_id(kind: CaseKind, reported: NaiveDate, city: Option<&str>, seq: u32) -> String {
  format!(
    "{}-{}-{}-{:03}",
    kind.type_code(),
    reported.format("%Y%m"),
    location_code(city),
    seq,
  )
}

/// Compose the collision fallback: sequence replaced by 4 random uppercase
/// alphanumerics.
pub fn fallback_case_id(kind: CaseKind, reported: NaiveDate, city: Option<&str>) -> String {
  format!(
    "{}-{}-{}-{}",
    kind.type_code(),
    reported.format("%Y%m"),
    location_code(city),
    random_suffix(4),
  )
}

/// Generate a match id: `MATCH-{YYYYMMDD}-{4 random uppercase alnum}`.
pub fn match_id(date: NaiveDate) -> String {
  format!("MATCH-{}-{}", date.format("%Y%m%d"), random_suffix(4))
}

fn random_suffix(len: usize) -> String {
  let mut bytes = vec![0u8; len];
  OsRng.fill_bytes(&mut bytes);
  bytes
    .iter()
    .map(|b| SUFFIX_CHARSET[*b as usize % SUFFIX_CHARSET.len()] as char)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn case_id_composes_all_segments() {
    let id = case_id(CaseKind::MissingPerson, date(2025, 8, 3), Some("Pune"), 1);
    assert_eq!(id, "MP-202508-PUNE-001");
  }

  #[test]
  fn location_code_truncates_and_uppercases() {
    assert_eq!(location_code(Some("  mumbai ")), "MUMB");
    assert_eq!(location_code(Some("Goa")), "GOA");
  }

  #[test]
  fn missing_city_falls_back_to_placeholder() {
    assert_eq!(location_code(None), "XXX");
    assert_eq!(location_code(Some("   ")), "XXX");
    let id = case_id(CaseKind::UnidentifiedBody, date(2025, 1, 15), None, 42);
    assert_eq!(id, "UB-202501-XXX-042");
  }

  #[test]
  fn fallback_id_has_random_alnum_suffix() {
    let id = fallback_case_id(CaseKind::UnidentifiedPerson, date(2025, 8, 3), Some("Pune"));
    let suffix = id.rsplit('-').next().unwrap();
    assert_eq!(suffix.len(), 4);
    assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    assert!(id.starts_with("UP-202508-PUNE-"));
  }

  #[test]
  fn match_id_shape() {
    let id = match_id(date(2025, 8, 3));
    assert!(id.starts_with("MATCH-20250803-"));
    assert_eq!(id.len(), "MATCH-20250803-".len() + 4);
  }
}
