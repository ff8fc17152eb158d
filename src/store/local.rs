//! In-memory record store over a loaded dataset.

use crate::dataset::{Dataset, Record};
use crate::filter::RecordFilter;
use crate::model::{self, RecordId};
use crate::store::{RecordStore, StoreError};

/// Record store backed by a dataset already loaded into memory.
pub struct LocalRecordStore<'a> {
    dataset: &'a Dataset,
}

impl<'a> LocalRecordStore<'a> {
    #[must_use]
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }
}

impl RecordStore for LocalRecordStore<'_> {
    fn fetch_by_filter(&self, filter: &RecordFilter) -> Result<Vec<Record>, StoreError> {
        if filter.is_empty() {
            return Ok(vec![]);
        }

        // Pre-restrict to the whitelist before cloning rows.
        let candidates: Vec<Record> = self
            .dataset
            .records()
            .iter()
            .filter(|record| {
                self.record_id(record)
                    .is_some_and(|id| filter.contains(&id))
            })
            .cloned()
            .collect();

        Ok(filter.apply(candidates, |record| self.record_id(record)))
    }

    fn len(&self) -> usize {
        self.dataset.records().len()
    }

    fn record_id(&self, record: &Record) -> Option<RecordId> {
        model::record_id(record, &self.dataset.table.primary_key)
    }
}
