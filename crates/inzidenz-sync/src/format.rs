//! Plain-text rendering of region records.
//!
//! The output carries no markup; the transport decides how to display it.

use std::collections::BTreeMap;

use inzidenz_core::RegionRecord;

/// One search result line: `ID: 224 - München (Kreisfreie Stadt)`.
pub fn short_info(record: &RegionRecord) -> String {
  format!("ID: {} - {}", record.object_id, record.label())
}

/// Message pushed to a subscriber after a refresh.
pub fn update_message(records: &[RegionRecord]) -> String {
  format!("Your update:\n\n{}", full_info(records))
}

/// Full report for a set of regions, sorted by name: states, per-region
/// details and a fixed-width overview table.
pub fn full_info(records: &[RegionRecord]) -> String {
  let mut sorted: Vec<&RegionRecord> = records.iter().collect();
  sorted.sort_by(|a, b| a.city_area.cmp(&b.city_area));

  let mut out = states_info(&sorted);
  out.push_str("\n\nCities/Areas\n");
  for record in &sorted {
    out.push_str(&city_info(record));
    out.push_str("\n\n");
  }
  out.push_str(&quick_overview(&sorted));
  out
}

fn states_info(records: &[&RegionRecord]) -> String {
  let mut states: BTreeMap<&str, Option<f64>> = BTreeMap::new();
  for record in records {
    states
      .entry(record.state.as_str())
      .or_insert(record.cases7_bl_per_100k);
  }

  let lines: Vec<String> = states
    .into_iter()
    .map(|(state, rate)| format!("{state}: {}", format_rate(rate)))
    .collect();

  format!("States - cases last 7 days per 100k:\n\t{}", lines.join("\n\t"))
}

fn city_info(record: &RegionRecord) -> String {
  format!(
    "{} (ID: {})\n\tCases last 7 days per 100k: {}\n\tCases: {}\n\tLast update: {}",
    record.label(),
    record.object_id,
    format_rate(record.cases7_per_100k),
    record.cases,
    record.last_update,
  )
}

fn quick_overview(records: &[&RegionRecord]) -> String {
  let rows: Vec<(String, String)> = records
    .iter()
    .map(|r| (r.label(), format_rate(r.cases7_per_100k)))
    .collect();

  let name_width = rows.iter().map(|(n, _)| n.chars().count()).max().unwrap_or(0);
  let rate_width = rows.iter().map(|(_, r)| r.chars().count()).max().unwrap_or(0);
  let rule = name_width + rate_width + 5;

  let mut out = format!("Quick overview (use landscape mode):\n{}\n", "_".repeat(rule));
  for (name, rate) in &rows {
    out.push_str(&format!("|{name:<name_width$} | {rate:>rate_width$}|\n"));
  }
  out.push_str(&"-".repeat(rule));
  out
}

fn format_rate(rate: Option<f64>) -> String {
  match rate {
    Some(v) => format!("{v:.2}"),
    None => "n/a".to_string(),
  }
}
