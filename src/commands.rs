//! Command implementations shared by the CLI.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::{Config, expand_tilde};
use crate::dataset::{Dataset, Record};
use crate::filter::build_filter;
use crate::model::RecordId;
use crate::search::tantivy::TantivyEngine;
use crate::search::{SearchEngine, SearchRequest, SearchResults};
use crate::store::RecordStore;
use crate::store::local::LocalRecordStore;

/// A record returned by [`search`], paired with its relevance.
#[derive(Debug, Clone)]
pub struct RankedRecord {
    /// Table the record belongs to.
    pub table: String,
    /// The record's primary-key identifier.
    pub id: RecordId,
    /// Relevance score assigned by the engine.
    pub relevance: f32,
    /// First non-empty searchable field value, for display.
    pub summary: Option<String>,
    /// The full stored record.
    pub record: Record,
}

/// Raw engine results for one dataset, as returned by [`search_raw`].
#[derive(Debug, Clone)]
pub struct DatasetResults {
    pub table: String,
    pub root: PathBuf,
    pub results: SearchResults,
}

/// Dataset summary returned by [`list`].
#[derive(Debug, Clone)]
pub struct DatasetInfo {
    pub table: String,
    pub root: PathBuf,
    pub records: usize,
    pub indexed: bool,
}

/// Search all configured datasets, returning records filtered to the
/// engine's matches and ordered by descending relevance.
///
/// # Errors
///
/// Returns an error for invalid arguments (empty query, zero limit), if
/// config loading fails, or if all per-dataset searches fail. Individual
/// dataset failures are collected and only surfaced when nothing succeeded.
pub fn search(query: &str, limit: usize) -> anyhow::Result<Vec<RankedRecord>> {
    SearchRequest::validate(query, limit)?;

    let config = Config::load()?;

    let mut all_results = Vec::new();
    let mut errors = Vec::new();

    for path_str in &config.datasets.paths {
        let path = expand_tilde(path_str);

        if !path.exists() {
            continue;
        }

        match Dataset::load(&path) {
            Ok(dataset) => match search_dataset(&dataset, query, limit) {
                Ok(results) => all_results.extend(results),
                Err(e) => errors.push(format!("Search in {}: {e}", path.display())),
            },
            Err(e) => errors.push(format!("Load {}: {e}", path.display())),
        }
    }

    if all_results.is_empty() && !errors.is_empty() {
        anyhow::bail!("Search failed:\n  {}", errors.join("\n  "));
    }

    // Merge across datasets by descending relevance. Scores from different
    // indexes are not strictly comparable, but a merged view is what the
    // convenience surface promises; use `search_raw` for per-dataset hits.
    all_results.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    all_results.truncate(limit);

    Ok(all_results)
}

/// Search a single dataset and materialize its ranked records.
fn search_dataset(dataset: &Dataset, query: &str, limit: usize) -> anyhow::Result<Vec<RankedRecord>> {
    let request = SearchRequest::for_model(&dataset.table, query, limit)?;

    if !TantivyEngine::index_exists(dataset) {
        anyhow::bail!(
            "No index found for dataset at {}. Run `relorder index` first.",
            dataset.root.display()
        );
    }

    let engine = TantivyEngine::open_for_dataset(dataset)?;
    let results = engine.query(&request)?;
    let filter = build_filter(&results);

    let store = LocalRecordStore::new(dataset);
    let records = store.fetch_by_filter(&filter)?;

    // First occurrence wins, mirroring the filter's duplicate handling.
    let mut relevance_by_id: HashMap<RecordId, f32> = HashMap::with_capacity(results.len());
    for hit in &results.hits {
        relevance_by_id.entry(hit.id.clone()).or_insert(hit.relevance);
    }

    Ok(records
        .into_iter()
        .filter_map(|record| {
            let id = store.record_id(&record)?;
            let relevance = relevance_by_id.get(&id).copied()?;
            let summary = dataset.table.search_fields.iter().find_map(|field| {
                record
                    .get(field)
                    .and_then(crate::model::scalar_text)
                    .filter(|text| !text.trim().is_empty())
            });
            Some(RankedRecord {
                table: dataset.table.name.clone(),
                id,
                relevance,
                summary,
                record,
            })
        })
        .collect())
}

/// Search all configured datasets, returning the raw engine results
/// (per-hit relevance plus aggregate statistics) without touching records.
///
/// # Errors
///
/// Returns an error for invalid arguments, if config loading fails, or if
/// every dataset search fails.
pub fn search_raw(query: &str, limit: usize) -> anyhow::Result<Vec<DatasetResults>> {
    SearchRequest::validate(query, limit)?;

    let config = Config::load()?;

    let mut all_results = Vec::new();
    let mut errors = Vec::new();

    for path_str in &config.datasets.paths {
        let path = expand_tilde(path_str);

        if !path.exists() {
            continue;
        }

        match Dataset::load(&path) {
            Ok(dataset) => {
                let raw = SearchRequest::for_model(&dataset.table, query, limit)
                    .map_err(anyhow::Error::from)
                    .and_then(|request| {
                        let engine = TantivyEngine::open_for_dataset(&dataset)?;
                        Ok(engine.query(&request)?)
                    });
                match raw {
                    Ok(results) => all_results.push(DatasetResults {
                        table: dataset.table.name.clone(),
                        root: dataset.root.clone(),
                        results,
                    }),
                    Err(e) => errors.push(format!("Search in {}: {e}", path.display())),
                }
            }
            Err(e) => errors.push(format!("Load {}: {e}", path.display())),
        }
    }

    if all_results.is_empty() && !errors.is_empty() {
        anyhow::bail!("Search failed:\n  {}", errors.join("\n  "));
    }

    Ok(all_results)
}

/// Build or rebuild the search index for all configured datasets.
///
/// # Returns
///
/// The number of datasets successfully indexed.
///
/// # Errors
///
/// Returns an error if config loading fails or all index operations fail.
pub fn index_all() -> anyhow::Result<usize> {
    let config = Config::load()?;
    let mut indexed_count = 0;
    let mut errors = Vec::new();

    for path_str in &config.datasets.paths {
        let path = expand_tilde(path_str);

        if !path.exists() {
            continue;
        }

        match Dataset::load(&path) {
            Ok(dataset) => match TantivyEngine::create_for_dataset(&dataset) {
                Ok(engine) => match engine.index_records(&dataset) {
                    Ok(count) => {
                        println!("Indexed: {} ({count} records)", path.display());
                        indexed_count += 1;
                    }
                    Err(e) => errors.push(format!("Index {}: {e}", path.display())),
                },
                Err(e) => errors.push(format!("Open index {}: {e}", path.display())),
            },
            Err(e) => errors.push(format!("Load {}: {e}", path.display())),
        }
    }

    if indexed_count == 0 && !errors.is_empty() {
        anyhow::bail!("Indexing failed:\n  {}", errors.join("\n  "));
    }

    if !errors.is_empty() {
        eprintln!("Warnings:\n  {}", errors.join("\n  "));
    }

    Ok(indexed_count)
}

/// List all configured datasets with record counts and index status.
///
/// # Errors
///
/// Returns an error if config loading fails or all datasets fail to load.
pub fn list() -> anyhow::Result<Vec<DatasetInfo>> {
    let config = Config::load()?;
    let mut datasets = Vec::new();
    let mut errors = Vec::new();

    for path_str in &config.datasets.paths {
        let path = expand_tilde(path_str);

        if !path.exists() {
            continue;
        }

        match Dataset::load(&path) {
            Ok(dataset) => {
                datasets.push(DatasetInfo {
                    table: dataset.table.name.clone(),
                    root: dataset.root.clone(),
                    records: dataset.records().len(),
                    indexed: TantivyEngine::index_exists(&dataset),
                });
            }
            Err(e) => errors.push(format!("Load {}: {e}", path.display())),
        }
    }

    if datasets.is_empty() && !errors.is_empty() {
        anyhow::bail!("List failed:\n  {}", errors.join("\n  "));
    }

    Ok(datasets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchError;

    #[test]
    fn search_rejects_zero_limit_before_touching_config() {
        let err = search("mouse", 0).unwrap_err();
        let search_err = err.downcast_ref::<SearchError>();
        assert!(matches!(search_err, Some(SearchError::InvalidArgument(_))));
    }

    #[test]
    fn search_rejects_empty_query() {
        let err = search("", 10).unwrap_err();
        assert!(err.to_string().contains("search text"));
    }

    #[test]
    fn search_raw_rejects_bad_arguments() {
        assert!(search_raw("", 10).is_err());
        assert!(search_raw("mouse", 0).is_err());
    }
}
