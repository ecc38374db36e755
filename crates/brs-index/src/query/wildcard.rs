//! Wildcard compilation.

use brs_query::{
    FieldIndex, QueryError,
    wildcard::{MARKERS, WildcardKind, classify},
};

use super::CompiledQuery;

/// Compiles a raw wildcard pattern into a term, prefix or pattern query.
///
/// Free-text fields are indexed lowercased, so their patterns are lowercased
/// too; classification codes are matched verbatim.
pub fn compile_wildcard(field: FieldIndex, raw_pattern: &str) -> Result<CompiledQuery, QueryError> {
    let pattern = match field {
        FieldIndex::Classification => raw_pattern.to_string(),
        _ => raw_pattern.to_lowercase(),
    };

    let query = match classify(&pattern)? {
        WildcardKind::Term(term) => CompiledQuery::Term { field, term },
        WildcardKind::Prefix(prefix) => CompiledQuery::Prefix { field, prefix },
        WildcardKind::Pattern(regex) => CompiledQuery::Pattern {
            field,
            prefix: pattern.split(MARKERS).next().unwrap_or_default().to_string(),
            regex,
        },
    };
    Ok(query)
}
