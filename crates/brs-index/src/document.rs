//! Patent documents as read from JSON Lines input.

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use serde_with::{OneOrMany, serde_as};

use crate::IndexError;

/// A patent ready for indexing.
///
/// Missing text fields index as empty. Classification codes accept a single
/// whitespace-separated string or a list.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PatentDocument {
    /// Publication number, stored and returned by searches.
    #[serde(alias = "publication_number")]
    pub id: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Abstract.
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    /// Claims.
    #[serde(default)]
    pub claims: String,
    /// Detailed description.
    #[serde(default)]
    pub description: String,
    /// Classification codes.
    #[serde(default, alias = "cpc")]
    #[serde_as(as = "OneOrMany<_>")]
    pub classification_codes: Vec<String>,
}

impl PatentDocument {
    /// Creates a document with an id and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Classification codes joined for the whitespace tokenizer.
    pub fn classification_text(&self) -> String {
        self.classification_codes.join(" ")
    }
}

/// Reads one document per non-blank line of JSON.
pub fn read_documents(reader: impl BufRead) -> Result<Vec<PatentDocument>, IndexError> {
    let mut documents = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let document =
            serde_json::from_str(&line).map_err(|e| IndexError::InvalidDocument {
                line: i + 1,
                message: e.to_string(),
            })?;
        documents.push(document);
    }
    Ok(documents)
}
