//! Index schema definition for the patent index.
//!
//! - `id`: publication number (raw, stored)
//! - `ti`, `ab`, `clm`, `detd`: analyzed text with positions, not stored
//! - `cpc`: classification codes, frequencies only, not stored

use brs_query::FieldIndex;
use tantivy::schema::{
    Field, IndexRecordOption, STORED, STRING, Schema, TextFieldIndexing, TextOptions,
};

use crate::analyzer::{KEYWORD_TOKENIZER, TEXT_TOKENIZER};

/// Name of the identifier field.
pub const ID_FIELD: &str = "id";

/// Handles to all fields in the index schema.
#[derive(Debug, Clone)]
pub struct IndexSchema {
    /// The underlying Tantivy schema.
    schema: Schema,
    /// Publication number.
    pub id: Field,
    /// Title.
    pub title: Field,
    /// Abstract.
    pub abstract_text: Field,
    /// Claims.
    pub claims: Field,
    /// Detailed description.
    pub description: Field,
    /// Classification codes.
    pub classification: Field,
}

impl IndexSchema {
    /// Creates the schema.
    pub fn new() -> Self {
        let mut builder = Schema::builder();

        let id = builder.add_text_field(ID_FIELD, STRING | STORED);

        let text_options = TextOptions::default().set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(TEXT_TOKENIZER)
                .set_index_option(IndexRecordOption::WithFreqsAndPositions),
        );
        let title = builder.add_text_field(FieldIndex::Title.name(), text_options.clone());
        let abstract_text = builder.add_text_field(FieldIndex::Abstract.name(), text_options.clone());
        let claims = builder.add_text_field(FieldIndex::Claims.name(), text_options.clone());
        let description = builder.add_text_field(FieldIndex::Description.name(), text_options);

        // Codes are matched whole; positions are never needed.
        let keyword_options = TextOptions::default().set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(KEYWORD_TOKENIZER)
                .set_index_option(IndexRecordOption::WithFreqs),
        );
        let classification =
            builder.add_text_field(FieldIndex::Classification.name(), keyword_options);

        Self {
            schema: builder.build(),
            id,
            title,
            abstract_text,
            claims,
            description,
            classification,
        }
    }

    /// Returns a reference to the underlying Tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the Tantivy field backing a field index.
    pub fn field(&self, field: FieldIndex) -> Field {
        match field {
            FieldIndex::Abstract => self.abstract_text,
            FieldIndex::Claims => self.claims,
            FieldIndex::Classification => self.classification,
            FieldIndex::Description => self.description,
            FieldIndex::Title => self.title,
        }
    }
}

impl Default for IndexSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns true if the field records term positions, which proximity needs.
pub fn has_positions(field: FieldIndex) -> bool {
    field != FieldIndex::Classification
}

/// Postings detail to read for a field.
pub fn record_option(field: FieldIndex) -> IndexRecordOption {
    if has_positions(field) {
        IndexRecordOption::WithFreqsAndPositions
    } else {
        IndexRecordOption::WithFreqs
    }
}
