//! Compiled queries.
//!
//! A parsed [`QueryNode`](brs_query::QueryNode) compiles into a small closed
//! algebra of index operations, evaluated by [`Evaluator`](crate::Evaluator)
//! against any [`IndexView`](crate::IndexView).

mod compile;
mod phrase;
mod wildcard;
mod xor;

use std::fmt;

use brs_query::FieldIndex;
pub use compile::QueryCompiler;
pub use phrase::compile_phrase;
pub use wildcard::compile_wildcard;
pub use xor::compile_xor;

/// An index-level query.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledQuery {
    /// Matches nothing.
    Null,

    /// Documents containing an exact index term.
    Term {
        /// Field searched.
        field: FieldIndex,
        /// Analyzed term.
        term: String,
    },

    /// Documents with the terms within `slop` positions of each other.
    Phrase {
        /// Field searched.
        field: FieldIndex,
        /// Analyzed terms (at least two).
        terms: Vec<String>,
        /// Maximum distance between consecutive terms.
        slop: u32,
        /// Whether the terms must occur in order.
        ordered: bool,
    },

    /// Documents containing any term starting with `prefix`, the prefix included.
    Prefix {
        /// Field searched.
        field: FieldIndex,
        /// Literal prefix.
        prefix: String,
    },

    /// Documents containing any term fully matching an anchored regex.
    Pattern {
        /// Field searched.
        field: FieldIndex,
        /// Literal text before the first wildcard, used to narrow the term scan.
        prefix: String,
        /// Anchored regular expression.
        regex: String,
    },

    /// Every operand must match; `Not` operands subtract.
    And(Vec<Self>),

    /// Any operand may match.
    Or(Vec<Self>),

    /// Documents not matching the operand.
    Not(Box<Self>),

    /// Multiplies the operand's scores.
    Boost {
        /// Boosted query.
        query: Box<Self>,
        /// Score multiplier.
        factor: f32,
    },
}

impl CompiledQuery {
    /// Wraps a query in a boost, unless the factor is neutral or nothing can match.
    pub fn boosted(self, factor: f32) -> Self {
        if self == Self::Null || (factor - 1.0).abs() < f32::EPSILON {
            self
        } else {
            Self::Boost {
                query: Box::new(self),
                factor,
            }
        }
    }

    /// Negates a query.
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Writes a comma-separated operand list.
    fn fmt_list(f: &mut fmt::Formatter<'_>, name: &str, items: &[Self]) -> fmt::Result {
        write!(f, "{name}(")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Term { field, term } => write!(f, "{field}:{term}"),
            Self::Phrase {
                field,
                terms,
                slop,
                ordered,
            } => {
                let op = if *ordered { "ADJ" } else { "NEAR" };
                write!(f, "{field}:{op}{slop}[{}]", terms.join(" "))
            }
            Self::Prefix { field, prefix } => write!(f, "{field}:{prefix}*"),
            Self::Pattern { field, regex, .. } => write!(f, "{field}:/{regex}/"),
            Self::And(items) => Self::fmt_list(f, "AND", items),
            Self::Or(items) => Self::fmt_list(f, "OR", items),
            Self::Not(inner) => write!(f, "NOT({inner})"),
            Self::Boost { query, factor } => write!(f, "({query})^{factor}"),
        }
    }
}
