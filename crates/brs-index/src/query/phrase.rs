//! Proximity compilation.

use brs_query::{FieldIndex, QueryError};

use super::CompiledQuery;
use crate::schema::has_positions;

/// Compiles analyzed words into a proximity query.
///
/// No words match nothing and a single word is a plain term. Two or more words
/// need a field that records positions.
pub fn compile_phrase(
    field: FieldIndex,
    words: Vec<String>,
    slop: u32,
    ordered: bool,
) -> Result<CompiledQuery, QueryError> {
    let mut terms: Vec<String> = words.into_iter().filter(|w| !w.is_empty()).collect();
    match terms.len() {
        0 => Ok(CompiledQuery::Null),
        1 => Ok(CompiledQuery::Term {
            field,
            term: terms.remove(0),
        }),
        _ if !has_positions(field) => Err(QueryError::unsupported_field(field.name())),
        _ => Ok(CompiledQuery::Phrase {
            field,
            terms,
            slop,
            ordered,
        }),
    }
}

#[cfg(test)]
mod tests {
    use brs_query::QueryErrorKind;

    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_is_null() {
        assert_eq!(
            compile_phrase(FieldIndex::Title, Vec::new(), 1, true).unwrap(),
            CompiledQuery::Null
        );
        assert_eq!(
            compile_phrase(FieldIndex::Title, words(&["", ""]), 1, true).unwrap(),
            CompiledQuery::Null
        );
    }

    #[test]
    fn single_word_is_term() {
        assert_eq!(
            compile_phrase(FieldIndex::Title, words(&["battery"]), 3, false).unwrap(),
            CompiledQuery::Term {
                field: FieldIndex::Title,
                term: "battery".into()
            }
        );
    }

    #[test]
    fn keeps_slop_and_order() {
        let query = compile_phrase(FieldIndex::Claims, words(&["a1", "b2"]), 2, false).unwrap();
        assert_eq!(
            query,
            CompiledQuery::Phrase {
                field: FieldIndex::Claims,
                terms: words(&["a1", "b2"]),
                slop: 2,
                ordered: false,
            }
        );
    }

    #[test]
    fn classification_has_no_positions() {
        let err = compile_phrase(FieldIndex::Classification, words(&["H01M", "B60L"]), 1, true)
            .unwrap_err();
        assert!(matches!(err.kind, QueryErrorKind::UnsupportedField { .. }));
        assert!(
            compile_phrase(FieldIndex::Classification, words(&["H01M"]), 1, true).is_ok()
        );
    }
}
