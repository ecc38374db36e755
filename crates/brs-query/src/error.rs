//! Error types for query tokenizing, validation, parsing and compilation.

use std::{error::Error, fmt};

/// A query error with optional source context.
///
/// Carries the original query string where available so the error can be
/// rendered with a pointer at the offending position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// The original query string (if available).
    pub query: Option<String>,
}

/// The specific kind of query error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// The numbers of opening and closing parentheses differ, or a closing
    /// parenthesis appears before its opening partner.
    UnmatchedParentheses {
        /// Byte offset of the offending parenthesis (or end of input).
        position: usize,
    },
    /// A double quote was opened but never closed.
    UnclosedQuote {
        /// Byte offset of the opening quote.
        position: usize,
    },
    /// A token carries a missing, unknown or duplicated field index.
    InvalidIndex {
        /// The offending token text.
        token: String,
        /// Byte offset of the token within the validated text.
        position: usize,
    },
    /// Malformed connective or operand placement.
    Syntax {
        /// Error message.
        message: String,
        /// Byte offset in the input (if known).
        position: Option<usize>,
    },
    /// A field suffix names a field that does not exist.
    UnknownField {
        /// The unrecognized field name.
        name: String,
    },
    /// A wildcard pattern cannot be translated.
    InvalidWildcard {
        /// The raw pattern text.
        pattern: String,
        /// Why the pattern was rejected.
        reason: String,
    },
    /// A phrase or proximity search targets a field without positions.
    UnsupportedField {
        /// Name of the field.
        field: String,
    },
}

impl QueryError {
    /// Creates an error of the given kind without query context.
    pub fn new(kind: QueryErrorKind) -> Self {
        Self { kind, query: None }
    }

    /// Creates an unmatched-parentheses error.
    pub fn unmatched_parentheses(position: usize) -> Self {
        Self::new(QueryErrorKind::UnmatchedParentheses { position })
    }

    /// Creates an invalid-index error for a token.
    pub fn invalid_index(token: impl Into<String>, position: usize) -> Self {
        Self::new(QueryErrorKind::InvalidIndex {
            token: token.into(),
            position,
        })
    }

    /// Creates a syntax error.
    pub fn syntax(message: impl Into<String>, position: Option<usize>) -> Self {
        Self::new(QueryErrorKind::Syntax {
            message: message.into(),
            position,
        })
    }

    /// Creates an invalid-wildcard error.
    pub fn invalid_wildcard(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::InvalidWildcard {
            pattern: pattern.into(),
            reason: reason.into(),
        })
    }

    /// Creates an unsupported-field error.
    pub fn unsupported_field(field: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::UnsupportedField {
            field: field.into(),
        })
    }

    /// Sets the query string for this error, keeping any existing one.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        if self.query.is_none() {
            self.query = Some(query.into());
        }
        self
    }

    /// Shifts the recorded byte position by `offset`.
    ///
    /// Used when an error raised inside a parenthesized group is reported
    /// against the enclosing text.
    pub fn offset_by(mut self, offset: usize) -> Self {
        match &mut self.kind {
            QueryErrorKind::UnmatchedParentheses { position }
            | QueryErrorKind::UnclosedQuote { position }
            | QueryErrorKind::InvalidIndex { position, .. } => *position += offset,
            QueryErrorKind::Syntax {
                position: Some(position),
                ..
            } => *position += offset,
            _ => {}
        }
        self
    }

    /// Returns true for errors detected before any parsing (unbalanced
    /// parentheses or quotes).
    pub fn is_structural(&self) -> bool {
        matches!(
            self.kind,
            QueryErrorKind::UnmatchedParentheses { .. } | QueryErrorKind::UnclosedQuote { .. }
        )
    }

    /// Returns the error message without context.
    pub fn message(&self) -> String {
        match &self.kind {
            QueryErrorKind::UnmatchedParentheses { .. } => "un-matched parentheses".to_string(),
            QueryErrorKind::UnclosedQuote { .. } => "unclosed quote".to_string(),
            QueryErrorKind::InvalidIndex { token, .. } => format!("invalid index: {token}"),
            QueryErrorKind::Syntax { message, .. } => message.clone(),
            QueryErrorKind::UnknownField { name } => format!("unknown field: {name}"),
            QueryErrorKind::InvalidWildcard { pattern, reason } => {
                format!("invalid wildcard '{pattern}': {reason}")
            }
            QueryErrorKind::UnsupportedField { field } => {
                format!("phrase search: {field} field has no positions")
            }
        }
    }

    /// Returns the byte position the error points at, if any.
    pub fn position(&self) -> Option<usize> {
        match &self.kind {
            QueryErrorKind::UnmatchedParentheses { position }
            | QueryErrorKind::UnclosedQuote { position }
            | QueryErrorKind::InvalidIndex { position, .. } => Some(*position),
            QueryErrorKind::Syntax { position, .. } => *position,
            _ => None,
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match &self.kind {
            QueryErrorKind::UnmatchedParentheses { .. } => {
                Some("Every ( needs a matching ) after it")
            }
            QueryErrorKind::UnclosedQuote { .. } => {
                Some("Add a closing quote (\") to complete the phrase")
            }
            QueryErrorKind::InvalidIndex { .. } | QueryErrorKind::UnknownField { .. } => Some(
                "Scope each term once with one of .ab. .clm. .cpc. .detd. .ti., \
                 either on the term or on an enclosing group",
            ),
            QueryErrorKind::Syntax { message, .. } if message.contains("ADJ") => {
                Some("Proximity operators join two words, e.g. 'battery ADJ2 charger'")
            }
            QueryErrorKind::UnsupportedField { .. } => {
                Some("Proximity and phrase searches only work on ti, ab, clm and detd")
            }
            _ => None,
        }
    }

    /// Returns the label used as the first word of the rendered message.
    fn prefix(&self) -> &'static str {
        match &self.kind {
            QueryErrorKind::UnmatchedParentheses { .. } | QueryErrorKind::UnclosedQuote { .. } => {
                "query structure error"
            }
            QueryErrorKind::InvalidIndex { .. } => "query index error",
            QueryErrorKind::Syntax { .. }
            | QueryErrorKind::UnknownField { .. }
            | QueryErrorKind::InvalidWildcard { .. } => "query syntax error",
            QueryErrorKind::UnsupportedField { .. } => "query error",
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.prefix(), self.message())?;

        if let Some(query) = &self.query {
            writeln!(f, "  {query}")?;
            if let Some(pos) = self.position() {
                let clamped = pos.min(query.len());
                writeln!(f, "  {}^", " ".repeat(clamped))?;
            }
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {suggestion}")?;
        }

        Ok(())
    }
}

impl Error for QueryError {}
