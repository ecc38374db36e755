//! Query policy checks applied before parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::{PolicyViolation, schema::ID_FIELD};

/// References to the identifier field: `id:` at a word start, or an `.id.` suffix.
static ID_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bid:|\.id\.").expect("valid id reference regex"));

/// Rejects queries that are too long or reference the identifier field.
///
/// Length is measured in characters.
pub fn check_policy(query: &str, max_length: usize) -> Result<(), PolicyViolation> {
    let length = query.chars().count();
    if length > max_length {
        return Err(PolicyViolation::QueryTooLong {
            length,
            limit: max_length,
        });
    }
    if ID_REFERENCE.is_match(query) {
        return Err(PolicyViolation::BannedField {
            field: ID_FIELD.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_limit_is_inclusive() {
        assert!(check_policy(&"a".repeat(10_000), 10_000).is_ok());
        assert_eq!(
            check_policy(&"a".repeat(10_001), 10_000),
            Err(PolicyViolation::QueryTooLong {
                length: 10_001,
                limit: 10_000
            })
        );
    }

    #[test]
    fn length_counts_characters() {
        assert!(check_policy("ééé", 3).is_ok());
    }

    #[test]
    fn id_references_are_banned() {
        for query in ["id:123", "battery AND id:US-1", "(id:1)", "123.id.", "x OR (a).id."] {
            assert!(
                matches!(
                    check_policy(query, 100),
                    Err(PolicyViolation::BannedField { .. })
                ),
                "{query} should be rejected"
            );
        }
    }

    #[test]
    fn similar_words_are_allowed() {
        for query in ["paid:less", "fluid.ti.", "identity.ab.", "idle.ti. ADJ speed.ti."] {
            assert!(check_policy(query, 100).is_ok(), "{query} should pass");
        }
    }
}
