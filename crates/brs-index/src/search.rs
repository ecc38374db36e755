//! The query façade.
//!
//! [`Searcher::execute`] runs the full pipeline:
//!
//! 1. **Policy**: reject over-long queries and identifier lookups
//! 2. **Parse**: validate field scopes and build the query tree
//! 3. **Compile**: analyze words and expand proximity, wildcards and XOR
//! 4. **Evaluate**: score matching documents against a searcher snapshot
//! 5. **Rank**: order by score, then document, and cap at the limit

use std::path::Path;

use brs_config::{Config, ScoringModel, SearchSettings};
use brs_query::{FieldIndex, ParseOptions, QueryNode, parse};
use serde::Serialize;
use tantivy::{Index, IndexReader, ReloadPolicy, TantivyDocument, schema::Value};
use tracing::debug;

use crate::{
    CompiledQuery, IndexError, QueryCompiler, SearchError,
    eval::{Evaluator, rank},
    policy::check_policy,
    schema::IndexSchema,
    view::{IndexView, TantivyView},
    writer::open_index,
};

/// A ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Publication number.
    pub id: String,
    /// Relevance score.
    pub score: f32,
}

/// A query after parsing and compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    /// Parsed query tree.
    pub ast: QueryNode,
    /// Index-level query.
    pub compiled: CompiledQuery,
}

/// Searches a patent index with BRS queries.
pub struct Searcher {
    /// Reader producing searcher snapshots.
    reader: IndexReader,
    /// Field handles.
    schema: IndexSchema,
    /// Compiles query trees.
    compiler: QueryCompiler,
    /// Query settings.
    settings: SearchSettings,
}

impl Searcher {
    /// Opens an existing index with default settings.
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        Self::new(open_index(path)?, SearchSettings::default())
    }

    /// Opens an existing index using configuration.
    pub fn open_with_config(path: &Path, config: &Config) -> Result<Self, IndexError> {
        Self::new(open_index(path)?, config.search.clone())
    }

    /// Creates a searcher over an opened index.
    pub fn new(index: Index, settings: SearchSettings) -> Result<Self, IndexError> {
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| IndexError::read(&e))?;
        Ok(Self {
            reader,
            schema: IndexSchema::new(),
            compiler: QueryCompiler::with_boosts(settings.boosts.clone()),
            settings,
        })
    }

    /// Returns the query settings.
    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Selects the scoring model.
    pub fn set_scoring(&mut self, scoring: ScoringModel) {
        self.settings.scoring = scoring;
    }

    /// Options used to parse queries.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            default_fields: self.settings.default_fields.clone(),
            default_operator: self.settings.default_operator.bool_op(),
        }
    }

    /// Returns the number of live documents.
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Returns true if any document contains the index term.
    pub fn has_term(&self, field: FieldIndex, term: &str) -> Result<bool, IndexError> {
        let searcher = self.reader.searcher();
        TantivyView::new(&searcher, &self.schema).has_term(field, term)
    }

    /// Checks policy, parses and compiles a query; `None` if it is empty.
    pub fn explain(&self, query: &str) -> Result<Option<Explanation>, SearchError> {
        check_policy(query, self.settings.max_query_length)?;
        let Some(ast) = parse(query, &self.parse_options())? else {
            return Ok(None);
        };
        let compiled = self.compiler.compile(&ast)?;
        Ok(Some(Explanation { ast, compiled }))
    }

    /// Runs a query with the configured result limit.
    pub fn execute(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        self.execute_with_limit(query, self.settings.limit)
    }

    /// Runs a query, returning at most `limit` hits in descending score order.
    pub fn execute_with_limit(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let Some(explanation) = self.explain(query)? else {
            return Ok(Vec::new());
        };
        Ok(self.search_compiled(&explanation.compiled, limit)?)
    }

    /// Evaluates a compiled query, returning at most `limit` hits.
    pub fn search_compiled(
        &self,
        query: &CompiledQuery,
        limit: usize,
    ) -> Result<Vec<SearchHit>, IndexError> {
        let searcher = self.reader.searcher();
        let view = TantivyView::new(&searcher, &self.schema);
        let matches = Evaluator::new(&view, self.settings.scoring).evaluate(query)?;
        let total = matches.len();

        let mut hits = Vec::with_capacity(total.min(limit));
        for (doc, score) in rank(matches, limit) {
            let Some(address) = view.address(doc) else {
                continue;
            };
            let stored: TantivyDocument = searcher.doc(address).map_err(|e| IndexError::read(&e))?;
            let id = stored
                .get_first(self.schema.id)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            hits.push(SearchHit { id, score });
        }
        debug_assert!(hits.len() <= limit);
        debug!(total, returned = hits.len(), "search complete");
        Ok(hits)
    }
}
