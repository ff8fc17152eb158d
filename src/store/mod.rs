//! Record store trait and implementations.
//!
//! The store is the collaborator a search result is materialized against:
//! given a [`RecordFilter`](crate::filter::RecordFilter) it yields the
//! records restricted to the filter's whitelist, in the filter's order.

pub mod local;

use thiserror::Error;

use crate::dataset::Record;
use crate::filter::RecordFilter;
use crate::model::RecordId;

/// Errors that can occur during record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record missing primary key '{0}'")]
    MissingPrimaryKey(String),

    #[error("Failed to read records: {0}")]
    ReadError(String),
}

/// Trait for record stores (in-memory, JSON file, database, etc.).
pub trait RecordStore: Send + Sync {
    /// Fetch the records matching the filter, in the filter's order.
    ///
    /// An empty filter yields an empty record set, never the whole
    /// collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if records cannot be read.
    fn fetch_by_filter(&self, filter: &RecordFilter) -> Result<Vec<Record>, StoreError>;

    /// Number of records in the collection.
    fn len(&self) -> usize;

    /// True if the collection holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extract the primary-key identifier from one of this store's records.
    fn record_id(&self, record: &Record) -> Option<RecordId>;
}
