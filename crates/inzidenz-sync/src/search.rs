//! Region lookups for interactive queries.

use inzidenz_core::{
  Error, RegionId, RegionRecord, Result,
  search::{is_match, normalize},
  store::{RegionStore, SearchIndex},
};

/// Fuzzy city/area search.
///
/// Candidates come from the query's search bucket and are matched against
/// their current record, not the name they were indexed under. The result
/// order carries no meaning.
pub async fn find_regions<R>(store: &R, query: &str) -> Result<Vec<RegionRecord>>
where
  R: RegionStore + SearchIndex,
{
  if query.is_empty() {
    return Err(Error::InvalidArgument("search query must not be empty".into()));
  }

  let query = normalize(query);
  let candidates = store.lookup(&query).await.map_err(Error::store)?;

  let mut found = Vec::new();
  for id in candidates {
    let Some(record) = store.get(id).await.map_err(Error::store)? else {
      continue;
    };
    if is_match(&query, &normalize(&record.city_area)) {
      found.push(record);
    }
  }
  Ok(found)
}

/// Load one region, failing with [`Error::NotFound`] if it is unknown.
pub async fn region<R: RegionStore>(store: &R, id: RegionId) -> Result<RegionRecord> {
  store
    .get(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound(id))
}
