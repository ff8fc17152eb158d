//! relorder - relevance-ranked record search.
//!
//! This library delegates full-text search over a record collection to an
//! external search engine (Tantivy), then turns the engine's ranked list of
//! record identifiers back into a record set filtered to exactly those
//! identifiers and ordered by descending relevance.
//!
//! # Modules
//!
//! - [`commands`] - High-level operations (search, scores, list, index)
//! - [`model`] - Record identifiers, condition values, and the
//!   [`model::SearchModel`] metadata capability
//! - [`search`] - Search request/result types, the engine trait, and the
//!   Tantivy implementation
//! - [`filter`] - Ranked identifier filter applied to record stores
//! - [`dataset`] - Record collection loading
//! - [`store`] - Record store trait and implementations
//! - [`config`] - Configuration loading
//! - [`cli`] - Command-line interface definitions

pub mod cli;
pub mod commands;
pub mod config;
pub mod dataset;
pub mod filter;
pub mod model;
pub mod search;
pub mod store;
