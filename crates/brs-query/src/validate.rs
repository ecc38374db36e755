//! Field-index scope validation.
//!
//! Every terminal token must end up scoped to exactly one field index: either
//! by its own `.xx.` suffix or `xx:` prefix, or by one on an enclosing group. A suffix may
//! appear at most once along any path from the root to a leaf.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    error::QueryError,
    lexer::{is_connective, is_wildcard_marker},
    token::{split_prefix, tokenize},
};

/// Process-wide validator with its patterns compiled once.
static VALIDATOR: LazyLock<Validator> = LazyLock::new(Validator::new);

/// How field indexes are resolved for the tokens being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// No field is in effect: every terminal token needs its own suffix.
    #[default]
    Unscoped,
    /// An enclosing group already supplied a field: suffixes are forbidden.
    Inherited,
    /// Default fields apply to unscoped tokens: suffixes are optional.
    Defaulted,
}

impl From<bool> for Scope {
    fn from(parent_has_index: bool) -> Self {
        if parent_has_index {
            Self::Inherited
        } else {
            Self::Unscoped
        }
    }
}

/// Compiled validation patterns.
struct Validator {
    /// Allow-listed trailing field suffix.
    index_suffix: Regex,
    /// A parenthesized group with an optional trailing suffix.
    group: Regex,
}

impl Validator {
    /// Compiles the validation patterns.
    fn new() -> Self {
        Self {
            index_suffix: Regex::new(r"\.(ab|clm|cpc|detd|ti)\.$").expect("valid index regex"),
            group: Regex::new(r"^\((?P<inside>.+)\)(\.[a-z]+\.)?$").expect("valid group regex"),
        }
    }

    /// Validates `text` under `scope`, recursing into groups.
    ///
    /// Reported positions are relative to `text`.
    fn check(&self, text: &str, scope: Scope) -> Result<(), QueryError> {
        for token in tokenize(text)? {
            if is_connective(token.text) || is_wildcard_marker(token.text) {
                continue;
            }

            let (prefix, body) = split_prefix(token.text);
            let prefixed = prefix.is_some();
            let suffixed = self.index_suffix.is_match(token.text);
            let has_index = prefixed || suffixed;
            let inherited = scope == Scope::Inherited;

            if (token.text.ends_with('.') && (inherited || !suffixed))
                || (prefixed && (inherited || suffixed))
            {
                return Err(QueryError::invalid_index(token.text, token.start));
            }
            if !body.starts_with('(') && !has_index && scope == Scope::Unscoped {
                return Err(QueryError::invalid_index(token.text, token.start));
            }

            if let Some(inside) = self.group.captures(body).and_then(|c| c.name("inside")) {
                let child = if inherited || has_index {
                    Scope::Inherited
                } else {
                    scope
                };
                let offset = token.start + (token.text.len() - body.len()) + inside.start();
                self.check(inside.as_str(), child)
                    .map_err(|e| e.offset_by(offset))?;
            }
        }
        Ok(())
    }
}

/// Validates field-index placement in `query`.
///
/// With `parent_has_index == false` every terminal token must carry one of
/// `.ab.`, `.clm.`, `.cpc.`, `.detd.` or `.ti.` unless an enclosing group
/// supplies it; with `true` the field is already set and no further suffix
/// may appear.
pub fn validate(query: &str, parent_has_index: bool) -> Result<(), QueryError> {
    validate_scoped(query, Scope::from(parent_has_index))
}

/// Validates field-index placement in `query` under an explicit scope.
pub fn validate_scoped(query: &str, scope: Scope) -> Result<(), QueryError> {
    VALIDATOR
        .check(query, scope)
        .map_err(|e| e.with_query(query))
}
