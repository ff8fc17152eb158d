//! Record identifiers, condition values, and search model metadata.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record identifier, either an integer or a string.
///
/// The variant matters: record stores with integer primary keys must never
/// see their identifiers silently re-typed as strings (or vice versa), so
/// the distinction is preserved everywhere, including through the search
/// engine's stored fields (see [`RecordId::to_term_text`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Render this identifier as the text stored in the engine's id field.
    ///
    /// JSON-encoded so that `Int(7)` ("7") and `Text("7")` ("\"7\"") remain
    /// distinct and [`RecordId::from_term_text`] can recover the exact
    /// variant. Identifiers are never interpolated into query text.
    #[must_use]
    pub fn to_term_text(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Text(s) => Value::String(s.clone()).to_string(),
        }
    }

    /// Parse an identifier back from its stored term text.
    #[must_use]
    pub fn from_term_text(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    /// Extract an identifier from a JSON value (integer or string).
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A required field=value equality constraint (e.g. `active = 1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl ConditionValue {
    /// Canonical term text for exact-match comparison in the engine.
    #[must_use]
    pub fn to_term_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Equality conditions keyed by field name.
pub type Conditions = BTreeMap<String, ConditionValue>;

/// Metadata capability a searchable record model must provide.
///
/// Replaces "instantiate the model and read its static metadata" with an
/// explicit provider: the table name, primary-key field, fields to search,
/// and required equality conditions.
pub trait SearchModel {
    /// Name of the record collection (table).
    fn table(&self) -> &str;

    /// Name of the primary-key field.
    fn primary_key(&self) -> &str;

    /// Fields whose text content is searched.
    fn search_fields(&self) -> &[String];

    /// Equality conditions narrowing the searchable subset.
    fn conditions(&self) -> &Conditions;
}

/// Extract the primary-key identifier from a stored record.
#[must_use]
pub fn record_id(record: &serde_json::Map<String, Value>, primary_key: &str) -> Option<RecordId> {
    record.get(primary_key).and_then(RecordId::from_value)
}

/// Render a record's scalar field value as indexable text.
///
/// Strings pass through, numbers and booleans are stringified; nulls,
/// arrays, and objects are not indexable.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
