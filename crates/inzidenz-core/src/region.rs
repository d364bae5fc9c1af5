//! Region records: the cached snapshot of one district or city.
//!
//! Field names on the wire (and in persisted JSON) follow the upstream
//! feature-service attribute names, so a record can be stored exactly as it
//! was fetched.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// The upstream `OBJECTID` of a region.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RegionId(pub i64);

impl fmt::Display for RegionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

impl FromStr for RegionId {
  type Err = std::num::ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { s.trim().parse().map(Self) }
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

/// The upstream `last_update` value, kept verbatim.
///
/// Ordering is plain string ordering. The upstream format is not parsed into
/// a date; staleness means "sorts strictly after".
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LastUpdate(String);

impl LastUpdate {
  pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }

  pub fn as_str(&self) -> &str { &self.0 }

  /// `true` when there is no stored cursor, or `self` sorts strictly after it.
  pub fn is_newer_than(&self, stored: Option<&LastUpdate>) -> bool {
    match stored {
      None         => true,
      Some(cursor) => self > cursor,
    }
  }
}

impl fmt::Display for LastUpdate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for LastUpdate {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// One entry of the lightweight staleness feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastUpdateEntry {
  #[serde(rename = "OBJECTID")]
  pub object_id:   RegionId,
  pub last_update: LastUpdate,
}

/// The full attribute set of a region as of `last_update`.
///
/// A record is never edited in place; a newer `last_update` replaces it
/// wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
  #[serde(rename = "OBJECTID")]
  pub object_id:             RegionId,
  /// Federal state (`BL`).
  #[serde(rename = "BL")]
  pub state:                 String,
  pub county:                String,
  /// City or area name (`GEN`); the search index keys on this.
  #[serde(rename = "GEN")]
  pub city_area:             String,
  /// Kind of area, e.g. "Kreisfreie Stadt" (`BEZ`).
  #[serde(rename = "BEZ")]
  pub city_area_description: String,
  pub last_update:           LastUpdate,
  pub cases:                 i64,
  #[serde(default)]
  pub cases_per_100k:        Option<f64>,
  #[serde(default)]
  pub cases7_per_100k:       Option<f64>,
  #[serde(default)]
  pub cases7_bl_per_100k:    Option<f64>,
}

impl RegionRecord {
  /// "`name` (`description`)", the label used wherever a region is listed.
  pub fn label(&self) -> String {
    format!("{} ({})", self.city_area, self.city_area_description)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn newer_than_missing_cursor() {
    assert!(LastUpdate::from("2021-01-01").is_newer_than(None));
  }

  #[test]
  fn newer_is_strict_string_order() {
    let stored = LastUpdate::from("2021-01-01");
    assert!(!LastUpdate::from("2021-01-01").is_newer_than(Some(&stored)));
    assert!(!LastUpdate::from("2020-12-31").is_newer_than(Some(&stored)));
    assert!(LastUpdate::from("2021-01-02").is_newer_than(Some(&stored)));
  }

  #[test]
  fn comparison_stays_textual() {
    // Day-first upstream strings do not sort chronologically; that is kept.
    let stored = LastUpdate::from("31.12.2020, 00:00 Uhr");
    assert!(!LastUpdate::from("01.01.2021, 00:00 Uhr").is_newer_than(Some(&stored)));
  }

  #[test]
  fn record_parses_upstream_attributes() {
    let json = serde_json::json!({
      "OBJECTID": 224,
      "BL": "Bayern",
      "county": "SK München",
      "GEN": "München",
      "BEZ": "Kreisfreie Stadt",
      "last_update": "2021-01-01",
      "cases": 100,
      "cases_per_100k": 6.7,
      "cases7_per_100k": null
    });

    let record: RegionRecord = serde_json::from_value(json).unwrap();
    assert_eq!(record.object_id, RegionId(224));
    assert_eq!(record.city_area, "München");
    assert_eq!(record.cases, 100);
    assert_eq!(record.cases_per_100k, Some(6.7));
    assert_eq!(record.cases7_per_100k, None);
    assert_eq!(record.cases7_bl_per_100k, None);
    assert_eq!(record.label(), "München (Kreisfreie Stadt)");
  }

  #[test]
  fn region_id_from_str_trims() {
    assert_eq!(" 224 ".parse::<RegionId>().unwrap(), RegionId(224));
    assert!("abc".parse::<RegionId>().is_err());
  }
}
