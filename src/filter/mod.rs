//! Ranked identifier filter built from search results.
//!
//! A [`RecordFilter`] restricts a record set to exactly the identifiers the
//! engine returned and orders it exactly by relevance rank. Ordering uses
//! an in-memory rank map and a stable sort; identifiers are never rendered
//! into query text.

use std::collections::HashMap;

use crate::model::RecordId;
use crate::search::SearchResults;

/// An identifier whitelist with an explicit order preference.
///
/// Constructed per search call via [`build_filter`] and consumed
/// immediately by the caller's record fetch. An empty filter matches zero
/// records; it never degrades to "no filter".
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    order: Vec<RecordId>,
    rank: HashMap<RecordId, usize>,
}

impl RecordFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// The identifier whitelist in relevance order (most relevant first).
    #[must_use]
    pub fn order(&self) -> &[RecordId] {
        &self.order
    }

    #[must_use]
    pub fn contains(&self, id: &RecordId) -> bool {
        self.rank.contains_key(id)
    }

    /// Relevance rank of an identifier (0 = most relevant), if whitelisted.
    #[must_use]
    pub fn rank(&self, id: &RecordId) -> Option<usize> {
        self.rank.get(id).copied()
    }

    /// Restrict `records` to the whitelist and order them by rank.
    ///
    /// `key` extracts the identifier from a record; records without an
    /// identifier, or with one outside the whitelist, are dropped. The sort
    /// is stable, so records sharing an identifier keep their input order.
    #[must_use]
    pub fn apply<T, F>(&self, records: Vec<T>, key: F) -> Vec<T>
    where
        F: Fn(&T) -> Option<RecordId>,
    {
        let mut kept: Vec<(usize, T)> = records
            .into_iter()
            .filter_map(|record| {
                let rank = key(&record).and_then(|id| self.rank(&id))?;
                Some((rank, record))
            })
            .collect();

        kept.sort_by_key(|(rank, _)| *rank);
        kept.into_iter().map(|(_, record)| record).collect()
    }
}

/// Project search results into a [`RecordFilter`].
///
/// The filter's order is exactly the identifier projection of the hits.
/// Should the engine ever return a duplicate identifier, the first
/// occurrence wins; hits arrive in descending relevance, so that is also
/// the highest-scored one.
#[must_use]
pub fn build_filter(results: &SearchResults) -> RecordFilter {
    let mut order = Vec::with_capacity(results.hits.len());
    let mut rank = HashMap::with_capacity(results.hits.len());

    for hit in &results.hits {
        if !rank.contains_key(&hit.id) {
            rank.insert(hit.id.clone(), order.len());
            order.push(hit.id.clone());
        }
    }

    RecordFilter { order, rank }
}
