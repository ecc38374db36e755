//! Read access to an index, as needed by query evaluation.
//!
//! Documents are addressed by global numbers that run across all segments in
//! segment order. Deleted documents are never reported.

use std::{collections::BTreeSet, str};

use brs_query::FieldIndex;
use tantivy::{
    DocAddress, DocId, DocSet, Postings, Searcher as TvSearcher, SegmentReader, TERMINATED, Term,
};

use crate::{
    IndexError,
    schema::{IndexSchema, has_positions, record_option},
};

/// Occurrences of a term in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// Global document number.
    pub doc: u32,
    /// Term frequency.
    pub freq: u32,
    /// Token positions; empty for fields without positions.
    pub positions: Vec<u32>,
}

/// The operations query evaluation needs from an index.
pub trait IndexView {
    /// Number of live documents.
    fn num_docs(&self) -> u32;

    /// Every live document number, ascending.
    fn live_docs(&self) -> Vec<u32>;

    /// Number of documents containing the term.
    fn doc_freq(&self, field: FieldIndex, term: &str) -> Result<u32, IndexError>;

    /// Postings for the term in live documents, ascending by document.
    fn postings(&self, field: FieldIndex, term: &str) -> Result<Vec<Posting>, IndexError>;

    /// Distinct terms of the field starting with `prefix`, sorted.
    fn terms_with_prefix(&self, field: FieldIndex, prefix: &str)
    -> Result<Vec<String>, IndexError>;

    /// Returns true if any document contains the term.
    fn has_term(&self, field: FieldIndex, term: &str) -> Result<bool, IndexError> {
        Ok(self.doc_freq(field, term)? > 0)
    }
}

/// An [`IndexView`] over a Tantivy searcher snapshot.
pub struct TantivyView<'a> {
    /// Searcher snapshot.
    searcher: &'a TvSearcher,
    /// Field handles.
    schema: &'a IndexSchema,
    /// First global document number of each segment.
    bases: Vec<u32>,
}

impl<'a> TantivyView<'a> {
    /// Creates a view over a searcher snapshot.
    pub fn new(searcher: &'a TvSearcher, schema: &'a IndexSchema) -> Self {
        let mut bases = Vec::with_capacity(searcher.segment_readers().len());
        let mut next = 0;
        for reader in searcher.segment_readers() {
            bases.push(next);
            next += reader.max_doc();
        }
        Self {
            searcher,
            schema,
            bases,
        }
    }

    /// Maps a global document number back to its segment address.
    pub fn address(&self, doc: u32) -> Option<DocAddress> {
        let segment = self.bases.partition_point(|&base| base <= doc).checked_sub(1)?;
        let local = doc - self.bases[segment];
        let reader = self.searcher.segment_readers().get(segment)?;
        let ordinal = u32::try_from(segment).ok()?;
        (local < reader.max_doc()).then(|| DocAddress::new(ordinal, local))
    }

    /// Segment readers paired with their global base.
    fn segments(&self) -> impl Iterator<Item = (u32, &'a SegmentReader)> + '_ {
        let searcher: &'a TvSearcher = self.searcher;
        self.bases.iter().copied().zip(searcher.segment_readers())
    }

    /// Builds an index term.
    fn term(&self, field: FieldIndex, text: &str) -> Term {
        Term::from_field_text(self.schema.field(field), text)
    }
}

/// Returns true if a segment-local document is not deleted.
fn is_alive(reader: &SegmentReader, doc: DocId) -> bool {
    reader
        .alive_bitset()
        .is_none_or(|alive| alive.is_alive(doc))
}

impl IndexView for TantivyView<'_> {
    fn num_docs(&self) -> u32 {
        u32::try_from(self.searcher.num_docs()).unwrap_or(u32::MAX)
    }

    fn live_docs(&self) -> Vec<u32> {
        let mut docs = Vec::new();
        for (base, reader) in self.segments() {
            docs.extend(
                (0..reader.max_doc())
                    .filter(|&doc| is_alive(reader, doc))
                    .map(|doc| base + doc),
            );
        }
        docs
    }

    fn doc_freq(&self, field: FieldIndex, term: &str) -> Result<u32, IndexError> {
        let count = self
            .searcher
            .doc_freq(&self.term(field, term))
            .map_err(|e| IndexError::read(&e))?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    fn postings(&self, field: FieldIndex, term: &str) -> Result<Vec<Posting>, IndexError> {
        let term = self.term(field, term);
        let with_positions = has_positions(field);
        let mut result = Vec::new();

        for (base, reader) in self.segments() {
            let inverted = reader
                .inverted_index(self.schema.field(field))
                .map_err(|e| IndexError::read(&e))?;
            let Some(mut postings) = inverted.read_postings(&term, record_option(field))? else {
                continue;
            };

            let mut doc = postings.doc();
            while doc != TERMINATED {
                if is_alive(reader, doc) {
                    let mut positions = Vec::new();
                    if with_positions {
                        postings.positions(&mut positions);
                    }
                    result.push(Posting {
                        doc: base + doc,
                        freq: postings.term_freq(),
                        positions,
                    });
                }
                doc = postings.advance();
            }
        }
        Ok(result)
    }

    fn terms_with_prefix(
        &self,
        field: FieldIndex,
        prefix: &str,
    ) -> Result<Vec<String>, IndexError> {
        let mut terms = BTreeSet::new();
        for (_, reader) in self.segments() {
            let inverted = reader
                .inverted_index(self.schema.field(field))
                .map_err(|e| IndexError::read(&e))?;
            let mut stream = inverted.terms().range().ge(prefix.as_bytes()).into_stream()?;
            while stream.advance() {
                let key = stream.key();
                if !key.starts_with(prefix.as_bytes()) {
                    break;
                }
                if let Ok(text) = str::from_utf8(key) {
                    terms.insert(text.to_string());
                }
            }
        }
        Ok(terms.into_iter().collect())
    }
}
