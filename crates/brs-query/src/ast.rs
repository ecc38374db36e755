//! Query abstract syntax tree.
//!
//! Every leaf carries the field it was resolved to during parsing, so the tree
//! can be compiled without any further scope information.

use std::fmt;

use crate::field::FieldIndex;

/// A boolean connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    /// All operands must match.
    And,
    /// At least one operand must match.
    Or,
    /// The first operand must match and none of the others.
    Not,
    /// At least one operand must match, but not all of them.
    Xor,
}

impl BoolOp {
    /// Returns the connective as written in a query.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Xor => "XOR",
        }
    }

    /// Parses a connective keyword (case-sensitive).
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NOT" => Some(Self::Not),
            "XOR" => Some(Self::Xor),
            _ => None,
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A parsed query node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    /// A single word in one field.
    Term {
        /// Resolved field.
        field: FieldIndex,
        /// The word as written.
        text: String,
    },

    /// Words that must occur near each other.
    Phrase {
        /// Resolved field.
        field: FieldIndex,
        /// The words in query order.
        words: Vec<String>,
        /// Maximum distance between consecutive words.
        slop: u32,
        /// Whether the words must occur in query order.
        ordered: bool,
    },

    /// A wildcard pattern using `*`, `?`, `$` or a trailing `$N`.
    Wildcard {
        /// Resolved field.
        field: FieldIndex,
        /// The raw pattern as written.
        pattern: String,
    },

    /// An explicitly parenthesized sub-expression.
    Group(Box<Self>),

    /// A boolean combination of operands.
    Boolean {
        /// The connective.
        op: BoolOp,
        /// Operands in textual order (at least two).
        operands: Vec<Self>,
    },
}

impl QueryNode {
    /// Creates a term node.
    pub fn term(field: FieldIndex, text: impl Into<String>) -> Self {
        Self::Term {
            field,
            text: text.into(),
        }
    }

    /// Creates a phrase node.
    pub fn phrase(field: FieldIndex, words: Vec<String>, slop: u32, ordered: bool) -> Self {
        Self::Phrase {
            field,
            words,
            slop,
            ordered,
        }
    }

    /// Creates a wildcard node.
    pub fn wildcard(field: FieldIndex, pattern: impl Into<String>) -> Self {
        Self::Wildcard {
            field,
            pattern: pattern.into(),
        }
    }

    /// Wraps a node in a group.
    pub fn group(inner: Self) -> Self {
        Self::Group(Box::new(inner))
    }

    /// Creates a boolean node; a single operand is returned unchanged.
    pub fn boolean(op: BoolOp, mut operands: Vec<Self>) -> Self {
        if operands.len() == 1
            && let Some(only) = operands.pop()
        {
            return only;
        }
        Self::Boolean { op, operands }
    }

    /// Formats the node as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Term { field, text } => writeln!(f, "{prefix}Term({field}, {text:?})"),
            Self::Phrase {
                field,
                words,
                slop,
                ordered,
            } => {
                let order = if *ordered { "ordered" } else { "unordered" };
                writeln!(f, "{prefix}Phrase({field}, {words:?}, slop={slop}, {order})")
            }
            Self::Wildcard { field, pattern } => {
                writeln!(f, "{prefix}Wildcard({field}, {pattern:?})")
            }
            Self::Group(inner) => {
                writeln!(f, "{prefix}Group")?;
                inner.fmt_tree(f, indent + 1)
            }
            Self::Boolean { op, operands } => {
                writeln!(f, "{prefix}{op}")?;
                for operand in operands {
                    operand.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }

    /// Formats the node as canonical query text.
    ///
    /// Every leaf carries its own field suffix, so the result validates
    /// without any default fields. Nested booleans after the first operand are
    /// parenthesized to keep the left-to-right reading.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Term { field, text } => format!("{text}{}", field.suffix()),
            Self::Wildcard { field, pattern } => format!("{pattern}{}", field.suffix()),
            Self::Phrase {
                field,
                words,
                slop,
                ordered,
            } => {
                let op = if *ordered { "ADJ" } else { "NEAR" };
                let op = if *slop == 1 {
                    op.to_string()
                } else {
                    format!("{op}{slop}")
                };
                let suffix = field.suffix();
                words
                    .iter()
                    .map(|w| format!("{w}{suffix}"))
                    .collect::<Vec<_>>()
                    .join(&format!(" {op} "))
            }
            Self::Group(inner) => format!("({})", inner.to_query_string()),
            Self::Boolean { op, operands } => operands
                .iter()
                .enumerate()
                .map(|(i, operand)| match operand {
                    Self::Boolean { .. } if i > 0 => format!("({})", operand.to_query_string()),
                    _ => operand.to_query_string(),
                })
                .collect::<Vec<_>>()
                .join(&format!(" {op} ")),
        }
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
