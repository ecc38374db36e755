//! Query parser.
//!
//! Parses BRS query text into a [`QueryNode`] tree using recursive descent
//! over lexemes. Parenthesized groups are parsed by recursing into the text
//! between their outer parentheses.
//!
//! # Grammar
//!
//! ```text
//! query     → operand ((CONNECTIVE)? operand)*
//! operand   → proximity | QUOTED | GROUP
//! proximity → WORD (PROXIMITY WORD)*
//! ```
//!
//! # Binding (tightest first)
//!
//! 1. Wildcard markers merged into their neighboring words
//! 2. Proximity: `ADJ`, `ADJn`, `NEAR`, `NEARn`
//! 3. Grouping: `(...)`
//! 4. Connectives `AND`, `OR`, `NOT`, `XOR`, left to right in textual order;
//!    adjacent operands without a connective use the default operator

use std::mem;

use crate::{
    ast::{BoolOp, QueryNode},
    error::QueryError,
    field::FieldIndex,
    lexer::{Lexeme, lex},
    validate::{Scope, validate_scoped},
    wildcard::{classify, has_wildcard},
};

/// Options controlling how unscoped terms and juxtaposed operands resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fields searched by terms without a field suffix. Empty means every
    /// term must be scoped explicitly.
    pub default_fields: Vec<FieldIndex>,
    /// Connective joining adjacent operands.
    pub default_operator: BoolOp,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            default_fields: FieldIndex::TEXT.to_vec(),
            default_operator: BoolOp::And,
        }
    }
}

impl ParseOptions {
    /// Options requiring every term to carry its own field.
    pub fn strict() -> Self {
        Self {
            default_fields: Vec::new(),
            ..Self::default()
        }
    }

    /// Returns the validation scope implied by these options.
    pub fn scope(&self) -> Scope {
        if self.default_fields.is_empty() {
            Scope::Unscoped
        } else {
            Scope::Defaulted
        }
    }
}

/// Field resolution in effect for the lexemes being parsed.
#[derive(Debug, Clone, Copy)]
enum FieldContext<'a> {
    /// An enclosing group set the field.
    Inherited(FieldIndex),
    /// Fall back to the configured defaults.
    Defaults(&'a [FieldIndex]),
}

/// Recursive descent parser over one level of lexemes.
struct Parser<'a> {
    /// Lexemes at this nesting level.
    lexemes: Vec<Lexeme<'a>>,
    /// Current position in `lexemes`.
    position: usize,
    /// Field resolution for unscoped leaves.
    context: FieldContext<'a>,
    /// Parse options.
    options: &'a ParseOptions,
}

impl<'a> Parser<'a> {
    /// Lexes `text` and creates a parser for it.
    fn new(
        text: &'a str,
        context: FieldContext<'a>,
        options: &'a ParseOptions,
    ) -> Result<Self, QueryError> {
        Ok(Self {
            lexemes: lex(text)?,
            position: 0,
            context,
            options,
        })
    }

    /// Parses all lexemes; `None` if there are none.
    fn parse(mut self) -> Result<Option<QueryNode>, QueryError> {
        if self.lexemes.is_empty() {
            return Ok(None);
        }

        let mut run_op: Option<BoolOp> = None;
        let mut run = vec![self.parse_operand()?];

        while self.peek().is_some() {
            let op = if let Some(&Lexeme::Connective { op, start }) = self.peek() {
                self.advance();
                if self.peek().is_none() {
                    return Err(QueryError::syntax(
                        format!("{op} needs an operand after it"),
                        Some(start),
                    ));
                }
                op
            } else {
                self.options.default_operator
            };
            let operand = self.parse_operand()?;

            match run_op {
                Some(current) if current != op => {
                    let left = QueryNode::boolean(current, mem::take(&mut run));
                    run = vec![left, operand];
                }
                _ => run.push(operand),
            }
            run_op = Some(op);
        }

        Ok(Some(QueryNode::boolean(
            run_op.unwrap_or(self.options.default_operator),
            run,
        )))
    }

    /// Parses: operand → proximity | QUOTED | GROUP
    fn parse_operand(&mut self) -> Result<QueryNode, QueryError> {
        let Some(lexeme) = self.peek().cloned() else {
            return Err(QueryError::syntax("unexpected end of query", None));
        };
        self.advance();

        let node = match lexeme {
            Lexeme::Word { text, field, start } => {
                if matches!(self.peek(), Some(Lexeme::Proximity { .. })) {
                    return self.parse_proximity(text, field, start);
                }
                if has_wildcard(&text) {
                    classify(&text).map_err(|e| e.offset_by(start))?;
                    self.leaf(field, start, &text, |f| QueryNode::wildcard(f, text.clone()))?
                } else {
                    self.leaf(field, start, &text, |f| QueryNode::term(f, text.clone()))?
                }
            }
            Lexeme::Quoted { text, field, start } => {
                let words: Vec<String> = text.split_whitespace().map(String::from).collect();
                self.leaf(field, start, text, |f| {
                    QueryNode::phrase(f, words.clone(), 1, true)
                })?
            }
            Lexeme::Group {
                inner,
                inner_start,
                field,
                start,
            } => self.parse_group(inner, inner_start, field, start)?,
            Lexeme::Connective { op, start } => {
                return Err(QueryError::syntax(
                    format!("{op} needs an operand before it"),
                    Some(start),
                ));
            }
            Lexeme::Proximity { start, .. } => {
                return Err(QueryError::syntax(
                    "ADJ/NEAR needs a word on each side",
                    Some(start),
                ));
            }
        };

        if let Some(Lexeme::Proximity { start, .. }) = self.peek() {
            return Err(QueryError::syntax(
                "ADJ/NEAR only joins plain words",
                Some(*start),
            ));
        }
        Ok(node)
    }

    /// Parses: proximity → WORD (PROXIMITY WORD)*, with the first word consumed.
    fn parse_proximity(
        &mut self,
        first: String,
        first_field: Option<FieldIndex>,
        first_start: usize,
    ) -> Result<QueryNode, QueryError> {
        let mut words = vec![first];
        let mut explicit = first_field;
        let mut operator: Option<(bool, u32)> = None;

        check_plain(&words[0], first_start)?;

        while let Some(&Lexeme::Proximity {
            ordered,
            slop,
            start,
        }) = self.peek()
        {
            if operator.is_some_and(|current| current != (ordered, slop)) {
                return Err(QueryError::syntax(
                    "mixed ADJ/NEAR operators in one proximity chain need parentheses",
                    Some(start),
                ));
            }
            operator = Some((ordered, slop));
            self.advance();

            let Some(Lexeme::Word { text, field, start }) = self.peek().cloned() else {
                return Err(QueryError::syntax(
                    "ADJ/NEAR needs a word on each side",
                    Some(start),
                ));
            };
            self.advance();
            check_plain(&text, start)?;

            match (explicit, field) {
                (Some(a), Some(b)) if a != b => {
                    return Err(QueryError::syntax(
                        format!("proximity operands are in different fields ({a} and {b})"),
                        Some(start),
                    ));
                }
                (None, Some(b)) => explicit = Some(b),
                _ => {}
            }
            words.push(text);
        }

        let (ordered, slop) = operator.unwrap_or((true, 1));
        let label = words.join(" ");
        self.leaf(explicit, first_start, &label, |f| {
            QueryNode::phrase(f, words.clone(), slop, ordered)
        })
    }

    /// Parses a group by recursing into its inner text.
    fn parse_group(
        &self,
        inner: &'a str,
        inner_start: usize,
        field: Option<FieldIndex>,
        start: usize,
    ) -> Result<QueryNode, QueryError> {
        let context = match field {
            Some(field) => FieldContext::Inherited(field),
            None => self.context,
        };

        let child = Parser::new(inner, context, self.options)
            .and_then(Parser::parse)
            .map_err(|e| e.offset_by(inner_start))?;

        match child {
            Some(child) => Ok(QueryNode::group(child)),
            None => Err(QueryError::syntax("empty group", Some(start))),
        }
    }

    /// Builds a leaf in its resolved field(s).
    ///
    /// Several default fields produce an OR over one copy per field.
    fn leaf(
        &self,
        explicit: Option<FieldIndex>,
        start: usize,
        text: &str,
        make: impl Fn(FieldIndex) -> QueryNode,
    ) -> Result<QueryNode, QueryError> {
        if let Some(field) = explicit {
            return Ok(make(field));
        }
        match self.context {
            FieldContext::Inherited(field) => Ok(make(field)),
            FieldContext::Defaults([]) => Err(QueryError::invalid_index(text, start)),
            FieldContext::Defaults([field]) => Ok(make(*field)),
            FieldContext::Defaults(fields) => Ok(QueryNode::boolean(
                BoolOp::Or,
                fields.iter().map(|f| make(*f)).collect(),
            )),
        }
    }

    /// Returns the current lexeme without consuming it.
    fn peek(&self) -> Option<&Lexeme<'a>> {
        self.lexemes.get(self.position)
    }

    /// Advances to the next lexeme.
    fn advance(&mut self) {
        if self.position < self.lexemes.len() {
            self.position += 1;
        }
    }
}

/// Rejects wildcard words as proximity operands.
fn check_plain(word: &str, start: usize) -> Result<(), QueryError> {
    if has_wildcard(word) {
        return Err(QueryError::syntax(
            format!("wildcards are not allowed in proximity searches: {word}"),
            Some(start),
        ));
    }
    Ok(())
}

/// Parses a BRS query string into an AST.
///
/// The query is validated for field-index placement first. Returns
/// `Ok(None)` for an empty query.
pub fn parse(query: &str, options: &ParseOptions) -> Result<Option<QueryNode>, QueryError> {
    validate_scoped(query, options.scope())?;

    Parser::new(query, FieldContext::Defaults(&options.default_fields), options)
        .and_then(Parser::parse)
        .map_err(|e| e.with_query(query))
}

/// Counts the tokens in a query.
///
/// Splits on whitespace, `+` and parentheses, so a classification code such as
/// `H01M10/44.cpc.` counts as one token.
pub fn count_query_tokens(query: &str) -> usize {
    query
        .split(|c: char| c.is_whitespace() || matches!(c, '+' | '(' | ')'))
        .filter(|s| !s.is_empty())
        .count()
}
