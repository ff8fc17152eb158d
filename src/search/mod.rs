//! Search engine trait and request/result types.

pub mod tantivy;

use thiserror::Error;

use crate::model::{Conditions, RecordId, SearchModel};

/// Errors surfaced by search execution.
///
/// Zero matches is not an error; it is a successfully-empty
/// [`SearchResults`]. None of these are retried by this layer: a bad
/// argument or bad metadata cannot succeed on retry.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Bad caller input (zero limit, empty search text).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The engine's backing store cannot be reached or opened.
    #[error("search engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Malformed field or condition metadata, or an unparsable query.
    #[error("query failed: {0}")]
    QueryFailed(String),
}

/// An immutable, validated search request.
///
/// Carries everything the engine needs: the search text, result limit, and
/// the model metadata (table, primary key, searchable fields, equality
/// conditions). Construct via [`SearchRequest::new`] or
/// [`SearchRequest::for_model`]; validation happens once, up front.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    text: String,
    limit: usize,
    table: String,
    primary_key: String,
    search_fields: Vec<String>,
    conditions: Conditions,
}

impl SearchRequest {
    /// Build a request, validating the search text and limit.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidArgument` if the search text is empty
    /// (or whitespace only) or the limit is zero.
    pub fn new(
        text: &str,
        limit: usize,
        table: &str,
        primary_key: &str,
        search_fields: Vec<String>,
        conditions: Conditions,
    ) -> Result<Self, SearchError> {
        Self::validate(text, limit)?;

        Ok(Self {
            text: text.to_string(),
            limit,
            table: table.to_string(),
            primary_key: primary_key.to_string(),
            search_fields,
            conditions,
        })
    }

    /// Validate search arguments without building a request.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidArgument` if the search text is empty
    /// (or whitespace only) or the limit is zero.
    pub fn validate(text: &str, limit: usize) -> Result<(), SearchError> {
        if text.trim().is_empty() {
            return Err(SearchError::InvalidArgument(
                "search text cannot be empty".to_string(),
            ));
        }
        if limit == 0 {
            return Err(SearchError::InvalidArgument(
                "limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Build a request from a model's metadata capability.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidArgument` for empty text or a zero limit.
    pub fn for_model(
        model: &impl SearchModel,
        text: &str,
        limit: usize,
    ) -> Result<Self, SearchError> {
        Self::new(
            text,
            limit,
            model.table(),
            model.primary_key(),
            model.search_fields().to_vec(),
            model.conditions().clone(),
        )
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    #[must_use]
    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    #[must_use]
    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }
}

/// A single ranked hit from the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: RecordId,
    pub relevance: f32,
}

/// Ranked hits plus aggregate relevance statistics.
///
/// Hit order is descending relevance as determined by the engine and is
/// preserved end-to-end; ties are broken by the engine, not redefined here.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub hits: Vec<SearchHit>,
    pub highest_relevance: f32,
    pub lowest_relevance: f32,
    pub average_relevance: f32,
}

impl SearchResults {
    /// Wrap a ranked hit list, deriving the relevance statistics.
    #[must_use]
    pub fn from_hits(hits: Vec<SearchHit>) -> Self {
        if hits.is_empty() {
            return Self::default();
        }

        let mut highest = f32::MIN;
        let mut lowest = f32::MAX;
        let mut sum = 0.0f32;
        for hit in &hits {
            highest = highest.max(hit.relevance);
            lowest = lowest.min(hit.relevance);
            sum += hit.relevance;
        }

        #[allow(clippy::cast_precision_loss)]
        let average = sum / hits.len() as f32;

        Self {
            hits,
            highest_relevance: highest,
            lowest_relevance: lowest,
            average_relevance: average,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }
}

/// Trait for search engines executing a [`SearchRequest`].
///
/// Implementations delegate tokenization, scoring, and condition filtering
/// to their backing index; this layer performs no re-ranking. Queries are
/// read-only and independent, so concurrent callers are safe.
pub trait SearchEngine: Send + Sync {
    /// Execute the request, returning at most `request.limit()` hits in
    /// descending relevance order.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::EngineUnavailable` if the backing store cannot
    /// be reached, or `SearchError::QueryFailed` for malformed field or
    /// condition metadata.
    fn query(&self, request: &SearchRequest) -> Result<SearchResults, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn request(text: &str, limit: usize) -> Result<SearchRequest, SearchError> {
        SearchRequest::new(
            text,
            limit,
            "products",
            "id",
            vec!["name".to_string()],
            BTreeMap::new(),
        )
    }

    mod request_tests {
        use super::*;

        #[test]
        fn valid_request() {
            let req = request("wireless mouse", 3).unwrap();
            assert_eq!(req.text(), "wireless mouse");
            assert_eq!(req.limit(), 3);
            assert_eq!(req.table(), "products");
            assert_eq!(req.primary_key(), "id");
        }

        #[test]
        fn zero_limit_rejected() {
            let err = request("mouse", 0).unwrap_err();
            assert!(matches!(err, SearchError::InvalidArgument(_)));
            assert!(err.to_string().contains("limit"));
        }

        #[test]
        fn empty_text_rejected() {
            let err = request("", 10).unwrap_err();
            assert!(matches!(err, SearchError::InvalidArgument(_)));
        }

        #[test]
        fn whitespace_text_rejected() {
            let err = request("   \t", 10).unwrap_err();
            assert!(matches!(err, SearchError::InvalidArgument(_)));
        }

        #[test]
        fn for_model_copies_metadata_verbatim() {
            struct Products {
                fields: Vec<String>,
                conditions: Conditions,
            }

            impl SearchModel for Products {
                fn table(&self) -> &str {
                    "products"
                }
                fn primary_key(&self) -> &str {
                    "id"
                }
                fn search_fields(&self) -> &[String] {
                    &self.fields
                }
                fn conditions(&self) -> &Conditions {
                    &self.conditions
                }
            }

            let mut conditions = Conditions::new();
            conditions.insert(
                "active".to_string(),
                crate::model::ConditionValue::Int(1),
            );
            let model = Products {
                fields: vec!["name".to_string(), "description".to_string()],
                conditions: conditions.clone(),
            };

            let req = SearchRequest::for_model(&model, "mouse", 5).unwrap();
            assert_eq!(req.table(), "products");
            assert_eq!(req.primary_key(), "id");
            assert_eq!(req.search_fields(), ["name", "description"]);
            assert_eq!(req.conditions(), &conditions);
        }
    }

    mod results_tests {
        use super::*;
        use crate::model::RecordId;

        #[test]
        fn empty_hits_have_zero_stats() {
            let results = SearchResults::from_hits(vec![]);
            assert!(results.is_empty());
            assert_eq!(results.highest_relevance, 0.0);
            assert_eq!(results.lowest_relevance, 0.0);
            assert_eq!(results.average_relevance, 0.0);
        }

        #[test]
        fn stats_derived_from_hits() {
            let results = SearchResults::from_hits(vec![
                SearchHit {
                    id: RecordId::Int(7),
                    relevance: 0.9,
                },
                SearchHit {
                    id: RecordId::Int(2),
                    relevance: 0.7,
                },
                SearchHit {
                    id: RecordId::Int(15),
                    relevance: 0.5,
                },
            ]);

            assert_eq!(results.len(), 3);
            assert!((results.highest_relevance - 0.9).abs() < f32::EPSILON);
            assert!((results.lowest_relevance - 0.5).abs() < f32::EPSILON);
            assert!((results.average_relevance - 0.7).abs() < 1e-6);
        }

        #[test]
        fn hit_order_preserved() {
            let hits = vec![
                SearchHit {
                    id: RecordId::Int(7),
                    relevance: 0.9,
                },
                SearchHit {
                    id: RecordId::Int(2),
                    relevance: 0.7,
                },
            ];
            let results = SearchResults::from_hits(hits.clone());
            assert_eq!(results.hits, hits);
        }
    }
}
