//! Wildcard pattern translation.
//!
//! Markers:
//!
//! - `?` matches exactly one character
//! - `*` or `$` matches one or more characters
//! - a trailing `$N` (N in 1..=99) matches between 1 and N characters
//!
//! A pattern without markers is an exact term, and a pattern whose only marker
//! is a final `*` or `$` is a prefix. A prefix also matches the bare prefix
//! term itself. Everything else becomes an anchored regular expression over
//! whole index terms.

use std::mem;

use crate::error::QueryError;

/// Characters that turn a word into a wildcard pattern.
pub const MARKERS: [char; 3] = ['*', '?', '$'];

/// Returns true if `text` contains any wildcard marker.
pub fn has_wildcard(text: &str) -> bool {
    text.contains(MARKERS)
}

/// How a wildcard pattern is matched against the term dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WildcardKind {
    /// No markers: an exact term.
    Term(String),
    /// Terms starting with this literal prefix, including the prefix itself.
    Prefix(String),
    /// Terms fully matching this anchored regular expression.
    Pattern(String),
}

/// One element of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    /// Literal text.
    Literal(String),
    /// `?`
    One,
    /// `*` or bare `$`
    Many,
    /// Trailing `$N`
    UpTo(u8),
}

impl Piece {
    /// Renders the piece as regular expression syntax.
    fn to_regex(&self) -> String {
        match self {
            Self::Literal(text) => regex::escape(text),
            Self::One => ".".to_string(),
            Self::Many => ".+".to_string(),
            Self::UpTo(n) => format!(".{{1,{n}}}"),
        }
    }
}

/// Splits a raw pattern into literal runs and markers.
fn pieces(pattern: &str) -> Result<Vec<Piece>, QueryError> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        let piece = match ch {
            '?' => Piece::One,
            '*' => Piece::Many,
            '$' => {
                let mut digits = String::new();
                while let Some(&(_, d)) = chars.peek().filter(|(_, d)| d.is_ascii_digit()) {
                    digits.push(d);
                    chars.next();
                }
                if digits.is_empty() {
                    Piece::Many
                } else {
                    let end = i + 1 + digits.len();
                    if end != pattern.len() {
                        return Err(QueryError::invalid_wildcard(
                            pattern,
                            "a length limit ($N) is only allowed at the end",
                        ));
                    }
                    match digits.parse::<u8>() {
                        Ok(n) if (1..=99).contains(&n) && !digits.starts_with('0') => {
                            Piece::UpTo(n)
                        }
                        _ => {
                            return Err(QueryError::invalid_wildcard(
                                pattern,
                                "a length limit ($N) must be between 1 and 99",
                            ));
                        }
                    }
                }
            }
            other => {
                literal.push(other);
                continue;
            }
        };
        if !literal.is_empty() {
            pieces.push(Piece::Literal(mem::take(&mut literal)));
        }
        pieces.push(piece);
    }
    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }

    if !pieces.iter().any(|p| matches!(p, Piece::Literal(_))) {
        return Err(QueryError::invalid_wildcard(
            pattern,
            "a wildcard needs at least one literal character",
        ));
    }
    Ok(pieces)
}

/// Translates a wildcard pattern into an anchored regular expression.
pub fn translate(pattern: &str) -> Result<String, QueryError> {
    let body: String = pieces(pattern)?.iter().map(Piece::to_regex).collect();
    Ok(format!("^{body}$"))
}

/// Classifies a wildcard pattern as an exact term, a prefix or a regex.
pub fn classify(pattern: &str) -> Result<WildcardKind, QueryError> {
    if !has_wildcard(pattern) {
        return Ok(WildcardKind::Term(pattern.to_string()));
    }

    let pieces = pieces(pattern)?;
    if let [Piece::Literal(prefix), Piece::Many] = pieces.as_slice() {
        return Ok(WildcardKind::Prefix(prefix.clone()));
    }

    let body: String = pieces.iter().map(Piece::to_regex).collect();
    Ok(WildcardKind::Pattern(format!("^{body}$")))
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;
    use crate::error::QueryErrorKind;

    fn pattern(raw: &str) -> Regex {
        Regex::new(&translate(raw).unwrap()).unwrap()
    }

    #[test]
    fn no_markers_is_exact_term() {
        assert_eq!(classify("battery").unwrap(), WildcardKind::Term("battery".into()));
        assert_eq!(classify("H01M10/44").unwrap(), WildcardKind::Term("H01M10/44".into()));
    }

    #[test]
    fn single_trailing_marker_is_prefix() {
        assert_eq!(classify("batter*").unwrap(), WildcardKind::Prefix("batter".into()));
        assert_eq!(classify("batter$").unwrap(), WildcardKind::Prefix("batter".into()));
    }

    #[test]
    fn other_patterns_are_regex() {
        assert_eq!(classify("b?t").unwrap(), WildcardKind::Pattern("^b.t$".into()));
        assert_eq!(classify("*ing").unwrap(), WildcardKind::Pattern("^.+ing$".into()));
        assert_eq!(classify("a*b*").unwrap(), WildcardKind::Pattern("^a.+b.+$".into()));
        assert_eq!(classify("batt$3").unwrap(), WildcardKind::Pattern("^batt.{1,3}$".into()));
        assert_eq!(classify("batt?*").unwrap(), WildcardKind::Pattern("^batt..+$".into()));
    }

    #[test]
    fn literals_are_escaped() {
        assert_eq!(translate("c++*").unwrap(), r"^c\+\+.+$");
        assert!(!pattern("a.c?").is_match("abcd"));
        assert!(pattern("a.c?").is_match("a.cd"));
    }

    #[test]
    fn bounded_suffix_limits_length() {
        let re = pattern("foo$3");
        assert!(re.is_match("foob"));
        assert!(re.is_match("foobar"));
        assert!(!re.is_match("foo"));
        assert!(!re.is_match("foobarx"));
    }

    #[test]
    fn two_digit_bound() {
        let re = pattern("x$12");
        assert!(re.is_match(&format!("x{}", "a".repeat(12))));
        assert!(!re.is_match(&format!("x{}", "a".repeat(13))));
    }

    #[test]
    fn unbounded_markers_need_one_char() {
        let re = pattern("bat*ry");
        assert!(re.is_match("battery"));
        assert!(!re.is_match("batry"));
        let re = pattern("c$t");
        assert!(re.is_match("cart"));
        assert!(!re.is_match("ct"));
    }

    #[test]
    fn invalid_length_limits() {
        for raw in ["a$0", "a$100", "a$3b", "a$05"] {
            let err = classify(raw).unwrap_err();
            assert!(
                matches!(err.kind, QueryErrorKind::InvalidWildcard { .. }),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn markers_only_is_invalid() {
        assert!(classify("*").is_err());
        assert!(classify("?$").is_err());
    }
}
