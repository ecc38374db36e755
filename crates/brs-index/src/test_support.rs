//! Test helpers shared across brs-index unit tests.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use brs_query::FieldIndex;

use crate::{
    IndexError, PatentDocument,
    analyzer::FieldAnalyzers,
    view::{IndexView, Posting},
    writer::{BuildOptions, build_index},
};

/// An [`IndexView`] over documents analyzed in memory.
#[derive(Default)]
pub struct MemoryView {
    /// Analyzed tokens per document and field.
    docs: Vec<BTreeMap<FieldIndex, Vec<String>>>,
    /// Deleted document numbers.
    deleted: BTreeSet<u32>,
}

impl MemoryView {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document with one field set; returns its number.
    pub fn add(&mut self, field: FieldIndex, text: &str) -> u32 {
        let analyzers = FieldAnalyzers::new();
        let mut doc = BTreeMap::new();
        doc.insert(field, analyzers.analyze(field, text));
        self.docs.push(doc);
        u32::try_from(self.docs.len() - 1).unwrap()
    }

    /// Marks a document deleted.
    pub fn delete(&mut self, doc: u32) {
        self.deleted.insert(doc);
    }

    /// Live documents with their tokens in `field`.
    fn tokens(&self, field: FieldIndex) -> impl Iterator<Item = (u32, &[String])> {
        self.docs.iter().enumerate().filter_map(move |(i, doc)| {
            let doc_num = u32::try_from(i).unwrap();
            if self.deleted.contains(&doc_num) {
                return None;
            }
            doc.get(&field).map(|tokens| (doc_num, tokens.as_slice()))
        })
    }
}

impl IndexView for MemoryView {
    fn num_docs(&self) -> u32 {
        u32::try_from(self.docs.len() - self.deleted.len()).unwrap()
    }

    fn live_docs(&self) -> Vec<u32> {
        (0..u32::try_from(self.docs.len()).unwrap())
            .filter(|d| !self.deleted.contains(d))
            .collect()
    }

    fn doc_freq(&self, field: FieldIndex, term: &str) -> Result<u32, IndexError> {
        Ok(u32::try_from(self.postings(field, term)?.len()).unwrap())
    }

    fn postings(&self, field: FieldIndex, term: &str) -> Result<Vec<Posting>, IndexError> {
        Ok(self
            .tokens(field)
            .filter_map(|(doc, tokens)| {
                let positions: Vec<u32> = tokens
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| *t == term)
                    .map(|(p, _)| u32::try_from(p).unwrap())
                    .collect();
                (!positions.is_empty()).then(|| Posting {
                    doc,
                    freq: u32::try_from(positions.len()).unwrap(),
                    positions,
                })
            })
            .collect())
    }

    fn terms_with_prefix(
        &self,
        field: FieldIndex,
        prefix: &str,
    ) -> Result<Vec<String>, IndexError> {
        let terms: BTreeSet<String> = self
            .tokens(field)
            .flat_map(|(_, tokens)| tokens.iter())
            .filter(|t| t.starts_with(prefix))
            .cloned()
            .collect();
        Ok(terms.into_iter().collect())
    }
}

/// Builds a small on-disk index of titled patents.
pub fn title_index(dir: &Path, titles: &[(&str, &str)]) {
    let docs = titles
        .iter()
        .map(|(id, title)| PatentDocument::new(*id, *title));
    let options = BuildOptions {
        memory_limit_mb: 64,
        workers: 1,
    };
    build_index(dir, docs, &options).unwrap();
}
