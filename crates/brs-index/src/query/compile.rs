//! Query compiler.
//!
//! Compiles a parsed query tree into a [`CompiledQuery`], analyzing words the
//! same way the target field was indexed.

use std::collections::BTreeMap;

use brs_query::{BoolOp, FieldIndex, QueryError, QueryNode};
use tracing::debug;

use super::{CompiledQuery, compile_phrase, compile_wildcard, compile_xor};
use crate::analyzer::FieldAnalyzers;

/// Compiles query trees into index queries.
#[derive(Clone, Default)]
pub struct QueryCompiler {
    /// Per-field analyzers.
    analyzers: FieldAnalyzers,
    /// Per-field score multipliers.
    boosts: BTreeMap<FieldIndex, f32>,
}

impl QueryCompiler {
    /// Creates a compiler without boosts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a compiler applying per-field score multipliers.
    pub fn with_boosts(boosts: BTreeMap<FieldIndex, f32>) -> Self {
        Self {
            analyzers: FieldAnalyzers::new(),
            boosts,
        }
    }

    /// Compiles a query tree.
    pub fn compile(&self, node: &QueryNode) -> Result<CompiledQuery, QueryError> {
        let compiled = match node {
            QueryNode::Term { field, text } => self.boost(*field, self.compile_term(*field, text)?),
            QueryNode::Phrase {
                field,
                words,
                slop,
                ordered,
            } => {
                let terms = words
                    .iter()
                    .flat_map(|w| self.analyzers.analyze(*field, w))
                    .collect();
                self.boost(*field, compile_phrase(*field, terms, *slop, *ordered)?)
            }
            QueryNode::Wildcard { field, pattern } => {
                self.boost(*field, compile_wildcard(*field, pattern)?)
            }
            QueryNode::Group(inner) => self.compile(inner)?,
            QueryNode::Boolean { op, operands } => {
                let operands = operands
                    .iter()
                    .map(|o| self.compile(o))
                    .collect::<Result<Vec<_>, _>>()?;
                compile_boolean(*op, operands)
            }
        };
        debug!(query = %compiled, "compiled");
        Ok(compiled)
    }

    /// Compiles a single word; words analyzing to several terms become an exact phrase.
    fn compile_term(&self, field: FieldIndex, text: &str) -> Result<CompiledQuery, QueryError> {
        compile_phrase(field, self.analyzers.analyze(field, text), 1, true)
    }

    /// Applies the configured boost for a field.
    fn boost(&self, field: FieldIndex, query: CompiledQuery) -> CompiledQuery {
        let factor = self.boosts.get(&field).copied().unwrap_or(1.0);
        query.boosted(factor)
    }
}

/// Combines compiled operands under a connective.
///
/// Operands that can never match (words made only of stopwords) are dropped
/// rather than emptying the whole combination.
fn compile_boolean(op: BoolOp, operands: Vec<CompiledQuery>) -> CompiledQuery {
    let combine: fn(Vec<CompiledQuery>) -> CompiledQuery = match op {
        BoolOp::And => CompiledQuery::And,
        BoolOp::Or => CompiledQuery::Or,
        BoolOp::Xor => compile_xor,
        BoolOp::Not => return compile_not(operands),
    };
    let mut operands = without_nulls(operands);
    if operands.len() > 1 {
        combine(operands)
    } else {
        operands.pop().unwrap_or(CompiledQuery::Null)
    }
}

/// `a NOT b NOT c` keeps `a` and subtracts every later operand.
fn compile_not(operands: Vec<CompiledQuery>) -> CompiledQuery {
    let mut operands = operands.into_iter();
    let Some(first) = operands.next() else {
        return CompiledQuery::Null;
    };
    if first == CompiledQuery::Null {
        return first;
    }
    let excluded = without_nulls(operands);
    if excluded.is_empty() {
        return first;
    }
    let mut all = Vec::with_capacity(excluded.len() + 1);
    all.push(first);
    all.extend(excluded.into_iter().map(CompiledQuery::negate));
    CompiledQuery::And(all)
}

/// Removes operands that match nothing.
fn without_nulls(operands: impl IntoIterator<Item = CompiledQuery>) -> Vec<CompiledQuery> {
    operands
        .into_iter()
        .filter(|o| *o != CompiledQuery::Null)
        .collect()
}
