//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Records are stored as compact JSON using the upstream attribute names, so
//! a stored row reads the same as the feed attribute object it came from.
//! Ids are plain integers and cursors the upstream text.

use inzidenz_core::RegionRecord;

use crate::Result;

pub fn encode_record(record: &RegionRecord) -> Result<String> {
  Ok(serde_json::to_string(record)?)
}

pub fn decode_record(s: &str) -> Result<RegionRecord> { Ok(serde_json::from_str(s)?) }

#[cfg(test)]
mod tests {
  use inzidenz_core::{LastUpdate, RegionId};

  use super::*;

  #[test]
  fn encoded_record_uses_upstream_names() {
    let record = RegionRecord {
      object_id:             RegionId(7),
      state:                 "Berlin".into(),
      county:                "SK Berlin Mitte".into(),
      city_area:             "Berlin Mitte".into(),
      city_area_description: "Bezirk".into(),
      last_update:           LastUpdate::from("2021-01-01"),
      cases:                 12,
      cases_per_100k:        None,
      cases7_per_100k:       Some(50.5),
      cases7_bl_per_100k:    None,
    };

    let json = encode_record(&record).unwrap();
    assert!(json.contains("\"OBJECTID\":7"));
    assert!(json.contains("\"GEN\":\"Berlin Mitte\""));
    assert_eq!(decode_record(&json).unwrap(), record);
  }
}
