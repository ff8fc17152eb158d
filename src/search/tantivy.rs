//! Tantivy-based search engine with BM25 ranking.
//!
//! Implements [`SearchEngine`] by delegating tokenization, scoring, and
//! condition filtering to a Tantivy index built from a dataset's records.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::{BooleanQuery, Occur, Query, QueryParser, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, STORED, STRING, Schema, TEXT, Value};
use tantivy::{
    Index, IndexReader, IndexSettings, IndexWriter, ReloadPolicy, TantivyDocument, Term,
};

use crate::dataset::Dataset;
use crate::model::{self, RecordId, SearchModel, scalar_text};
use crate::search::{SearchEngine, SearchError, SearchHit, SearchRequest, SearchResults};

/// Default index directory name within a dataset root.
const INDEX_DIR: &str = ".index";

/// Default heap size for the index writer (50MB).
const WRITER_HEAP_SIZE: usize = 50_000_000;

/// Tantivy-backed search engine.
///
/// The schema is derived from the model metadata: the primary key as a raw
/// stored field (holding the JSON-encoded identifier), each searchable
/// field as tokenized text, and each condition field as a raw string for
/// exact equality terms.
pub struct TantivyEngine {
    index: Index,
    reader: IndexReader,
    index_path: PathBuf,
}

impl TantivyEngine {
    /// Build the Tantivy schema for a search model.
    ///
    /// A field name appearing in more than one role (e.g. a condition on a
    /// searchable field) is added once, in the first role encountered.
    fn build_schema(model: &impl SearchModel) -> Schema {
        let mut schema_builder = Schema::builder();
        let mut added: HashSet<&str> = HashSet::new();

        schema_builder.add_text_field(model.primary_key(), STRING | STORED);
        added.insert(model.primary_key());

        for name in model.search_fields() {
            if added.insert(name) {
                schema_builder.add_text_field(name, TEXT);
            }
        }

        for name in model.conditions().keys() {
            if added.insert(name) {
                schema_builder.add_text_field(name, STRING);
            }
        }

        schema_builder.build()
    }

    /// Open or create an index for writing at the specified path.
    ///
    /// An existing index is reused with its stored schema; otherwise a new
    /// index is created with a schema derived from the model.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be opened or created.
    pub fn create(index_path: &Path, model: &impl SearchModel) -> anyhow::Result<Self> {
        let index = if index_path.join("meta.json").exists() {
            let directory = MmapDirectory::open(index_path)?;
            Index::open(directory)?
        } else {
            std::fs::create_dir_all(index_path)?;
            let directory = MmapDirectory::open(index_path)?;
            Index::create(directory, Self::build_schema(model), IndexSettings::default())?
        };

        let reader = Self::reader_for(&index)?;

        Ok(Self {
            index,
            reader,
            index_path: index_path.to_path_buf(),
        })
    }

    /// Open an existing index for querying.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::EngineUnavailable` if the index does not exist
    /// or cannot be opened.
    pub fn open(index_path: &Path) -> Result<Self, SearchError> {
        if !index_path.join("meta.json").exists() {
            return Err(SearchError::EngineUnavailable(format!(
                "no index at {}",
                index_path.display()
            )));
        }

        let directory = MmapDirectory::open(index_path)
            .map_err(|e| SearchError::EngineUnavailable(e.to_string()))?;
        let index =
            Index::open(directory).map_err(|e| SearchError::EngineUnavailable(e.to_string()))?;
        let reader =
            Self::reader_for(&index).map_err(|e| SearchError::EngineUnavailable(e.to_string()))?;

        Ok(Self {
            index,
            reader,
            index_path: index_path.to_path_buf(),
        })
    }

    /// Open or create the writable index for a dataset, under `.index/`
    /// within the dataset root.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be opened or created.
    pub fn create_for_dataset(dataset: &Dataset) -> anyhow::Result<Self> {
        Self::create(&dataset.root.join(INDEX_DIR), &dataset.table)
    }

    /// Open the existing index for a dataset, for querying.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::EngineUnavailable` if the dataset has no index.
    pub fn open_for_dataset(dataset: &Dataset) -> Result<Self, SearchError> {
        Self::open(&dataset.root.join(INDEX_DIR))
    }

    /// Check if an index exists for a dataset.
    #[must_use]
    pub fn index_exists(dataset: &Dataset) -> bool {
        dataset.root.join(INDEX_DIR).join("meta.json").exists()
    }

    /// Get the index path.
    #[must_use]
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    fn reader_for(index: &Index) -> tantivy::Result<IndexReader> {
        index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
    }

    fn field(&self, name: &str) -> Result<Field, SearchError> {
        self.index
            .schema()
            .get_field(name)
            .map_err(|_| SearchError::QueryFailed(format!("unknown field '{name}'")))
    }

    /// Rebuild the index from a dataset's records.
    ///
    /// Clears any existing documents first. Records without a usable
    /// primary-key value are skipped with a warning. Returns the number of
    /// records indexed.
    ///
    /// # Errors
    ///
    /// Returns an error if a schema field is missing or the writer fails.
    pub fn index_records(&self, dataset: &Dataset) -> anyhow::Result<usize> {
        let mut writer: IndexWriter = self.index.writer(WRITER_HEAP_SIZE)?;
        writer.delete_all_documents()?;

        let primary_key = &dataset.table.primary_key;
        let schema = self.index.schema();
        let id_field = schema.get_field(primary_key)?;

        let mut indexed = 0;
        for record in dataset.records() {
            let Some(id) = model::record_id(record, primary_key) else {
                eprintln!("Warning: skipping record without primary key '{primary_key}'");
                continue;
            };

            let mut doc = TantivyDocument::new();
            doc.add_text(id_field, id.to_term_text());

            for name in &dataset.table.search_fields {
                if name == primary_key {
                    continue;
                }
                if let Some(text) = record.get(name).and_then(scalar_text) {
                    doc.add_text(schema.get_field(name)?, text);
                }
            }

            for name in dataset.table.conditions.keys() {
                if name == primary_key || dataset.table.search_fields.contains(name) {
                    continue;
                }
                if let Some(text) = record.get(name).and_then(scalar_text) {
                    doc.add_text(schema.get_field(name)?, text);
                }
            }

            writer.add_document(doc)?;
            indexed += 1;
        }

        writer.commit()?;
        self.reader.reload()?;

        Ok(indexed)
    }
}

impl SearchEngine for TantivyEngine {
    fn query(&self, request: &SearchRequest) -> Result<SearchResults, SearchError> {
        let search_fields: Vec<Field> = request
            .search_fields()
            .iter()
            .map(|name| self.field(name))
            .collect::<Result<_, _>>()?;

        if search_fields.is_empty() {
            return Err(SearchError::QueryFailed(
                "model declares no searchable fields".to_string(),
            ));
        }

        let query_parser = QueryParser::for_index(&self.index, search_fields);
        let text_query = query_parser
            .parse_query(request.text())
            .map_err(|e| SearchError::QueryFailed(e.to_string()))?;

        // Each equality condition becomes a mandatory exact-match clause.
        let query: Box<dyn Query> = if request.conditions().is_empty() {
            text_query
        } else {
            let mut clauses: Vec<(Occur, Box<dyn Query>)> = vec![(Occur::Must, text_query)];
            for (name, value) in request.conditions() {
                let term = Term::from_field_text(self.field(name)?, &value.to_term_text());
                clauses.push((
                    Occur::Must,
                    Box::new(TermQuery::new(term, IndexRecordOption::Basic)),
                ));
            }
            Box::new(BooleanQuery::new(clauses))
        };

        let id_field = self.field(request.primary_key())?;
        let searcher = self.reader.searcher();
        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(request.limit()))
            .map_err(|e| SearchError::QueryFailed(e.to_string()))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher
                .doc(doc_address)
                .map_err(|e| SearchError::QueryFailed(e.to_string()))?;

            let id_text = doc
                .get_first(id_field)
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    SearchError::QueryFailed(
                        "indexed document has no stored identifier".to_string(),
                    )
                })?;
            let id = RecordId::from_term_text(id_text).ok_or_else(|| {
                SearchError::QueryFailed(format!("malformed stored identifier '{id_text}'"))
            })?;

            hits.push(SearchHit {
                id,
                relevance: score,
            });
        }

        Ok(SearchResults::from_hits(hits))
    }
}
