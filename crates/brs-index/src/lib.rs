//! Tantivy-backed patent index and BRS query execution.
//!
//! This crate provides:
//! - The patent schema and text analysis (stopwords, numbers, classification codes)
//! - Index building from [`PatentDocument`]s
//! - Compilation of parsed BRS queries into a small query algebra
//! - Evaluation of that algebra against any [`IndexView`], scored with tf-idf
//! - The [`Searcher`] façade enforcing the query policy
//!
//! # Example
//!
//! ```no_run
//! use brs_index::{BuildOptions, PatentDocument, Searcher, build_index};
//!
//! let docs = vec![PatentDocument::new("US-1", "battery charger")];
//! build_index("./index".as_ref(), docs, &BuildOptions::default()).unwrap();
//!
//! let searcher = Searcher::open("./index".as_ref()).unwrap();
//! for hit in searcher.execute("battery ADJ charger").unwrap() {
//!     println!("{} {:.3}", hit.id, hit.score);
//! }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod document;
mod error;
mod eval;
mod policy;
mod query;
mod schema;
mod search;
#[cfg(test)]
mod test_support;
mod view;
mod writer;

pub use analyzer::{
    BrsFilter, FieldAnalyzers, KEYWORD_TOKENIZER, STOPWORDS, TEXT_TOKENIZER, build_keyword_analyzer,
    build_text_analyzer, register_tokenizers,
};
pub use brs_config::ScoringModel;
pub use document::{PatentDocument, read_documents};
pub use error::{IndexError, PolicyViolation, SearchError};
pub use eval::{Evaluator, Matches, count_spans, idf, rank};
pub use policy::check_policy;
pub use query::{CompiledQuery, QueryCompiler, compile_phrase, compile_wildcard, compile_xor};
pub use schema::{ID_FIELD, IndexSchema, has_positions};
pub use search::{Explanation, SearchHit, Searcher};
pub use view::{IndexView, Posting, TantivyView};
pub use writer::{BuildOptions, IndexStats, IndexWriter, build_index, open_index};
