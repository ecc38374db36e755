//! Error types for the brs-index crate.

use std::{io, path::PathBuf};

use brs_query::QueryError;
use thiserror::Error;

/// Errors that can occur when working with the patent index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Failed to open or create the index.
    #[error("failed to open index at {path}: {message}")]
    OpenIndex {
        /// Path to the index directory.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Failed to write to the index.
    #[error("failed to write to index: {0}")]
    Write(String),

    /// Failed to commit changes to the index.
    #[error("failed to commit index: {0}")]
    Commit(String),

    /// Failed to read postings, terms or stored documents.
    #[error("failed to read index: {0}")]
    Read(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A source document could not be decoded.
    #[error("invalid document on line {line}: {message}")]
    InvalidDocument {
        /// 1-based line number in the source.
        line: usize,
        /// Decoder message.
        message: String,
    },

    /// A compiled wildcard pattern was rejected by the regex engine.
    #[error("invalid term pattern {pattern}: {message}")]
    InvalidPattern {
        /// The anchored pattern.
        pattern: String,
        /// Regex engine message.
        message: String,
    },
}

impl IndexError {
    /// Creates an `OpenIndex` error from a path and Tantivy error.
    pub(crate) fn open_index(path: PathBuf, source: &tantivy::TantivyError) -> Self {
        Self::OpenIndex {
            path,
            message: source.to_string(),
        }
    }

    /// Creates a `Write` error from a Tantivy error.
    pub(crate) fn write(source: &tantivy::TantivyError) -> Self {
        Self::Write(source.to_string())
    }

    /// Creates a `Commit` error from a Tantivy error.
    pub(crate) fn commit(source: &tantivy::TantivyError) -> Self {
        Self::Commit(source.to_string())
    }

    /// Creates a `Read` error from any displayable engine error.
    pub(crate) fn read(source: &impl ToString) -> Self {
        Self::Read(source.to_string())
    }
}

/// A query rejected by policy before parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    /// The query is longer than the configured limit.
    #[error("query is {length} characters long; the limit is {limit}")]
    QueryTooLong {
        /// Query length in characters.
        length: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// The query references a field that may not be searched.
    #[error("searching the '{field}' field is not permitted")]
    BannedField {
        /// The banned field name.
        field: String,
    },
}

/// Errors returned by [`Searcher::execute`](crate::Searcher::execute).
#[derive(Debug, Error)]
pub enum SearchError {
    /// Rejected before parsing.
    #[error("policy violation: {0}")]
    Policy(#[from] PolicyViolation),

    /// The query failed to validate, parse or compile.
    #[error("{0}")]
    Query(#[from] QueryError),

    /// The index failed while executing the query.
    #[error(transparent)]
    Index(#[from] IndexError),
}
