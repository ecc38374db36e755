//! Query lexer.
//!
//! Classifies top-level tokens into lexemes for the parser and folds bare
//! wildcard markers into their neighboring words. A field may be given as a
//! `.xx.` suffix or an `xx:` prefix; both resolve to the lexeme's field.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    ast::BoolOp,
    error::{QueryError, QueryErrorKind},
    field::FieldIndex,
    token::{Token, split_prefix, split_suffix, tokenize},
};

/// Proximity connective with an optional distance.
static PROXIMITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<op>ADJ|NEAR)(?P<slop>\d*)$").expect("valid proximity regex"));

/// A bare wildcard marker token.
static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\*|\?|\$\d*)$").expect("valid marker regex"));

/// A classified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lexeme<'a> {
    /// A word, possibly containing wildcard markers.
    Word {
        /// Word text without its field suffix.
        text: String,
        /// Explicit field suffix.
        field: Option<FieldIndex>,
        /// Byte offset of the word.
        start: usize,
    },
    /// A double-quoted phrase.
    Quoted {
        /// Text between the quotes.
        text: &'a str,
        /// Explicit field suffix.
        field: Option<FieldIndex>,
        /// Byte offset of the opening quote.
        start: usize,
    },
    /// A parenthesized group.
    Group {
        /// Text between the outer parentheses.
        inner: &'a str,
        /// Byte offset of `inner`.
        inner_start: usize,
        /// Explicit field suffix.
        field: Option<FieldIndex>,
        /// Byte offset of the opening parenthesis.
        start: usize,
    },
    /// A boolean connective.
    Connective {
        /// The connective.
        op: BoolOp,
        /// Byte offset of the keyword.
        start: usize,
    },
    /// A proximity connective (`ADJ`, `ADJn`, `NEAR`, `NEARn`).
    Proximity {
        /// True for `ADJ`.
        ordered: bool,
        /// Maximum word distance.
        slop: u32,
        /// Byte offset of the keyword.
        start: usize,
    },
}

impl Lexeme<'_> {
    /// Byte offset of the lexeme.
    pub fn start(&self) -> usize {
        match self {
            Self::Word { start, .. }
            | Self::Quoted { start, .. }
            | Self::Group { start, .. }
            | Self::Connective { start, .. }
            | Self::Proximity { start, .. } => *start,
        }
    }
}

/// Returns true if `text` is a boolean or proximity connective.
pub fn is_connective(text: &str) -> bool {
    BoolOp::from_keyword(text).is_some() || PROXIMITY.is_match(text)
}

/// Returns true if `text` is a bare wildcard marker (`*`, `?`, `$`, `$N`).
pub fn is_wildcard_marker(text: &str) -> bool {
    MARKER.is_match(text)
}

/// Resolves a suffix name to a field index.
fn resolve_field(name: Option<&str>) -> Result<Option<FieldIndex>, QueryError> {
    name.map(|name| {
        FieldIndex::from_name(name).ok_or_else(|| {
            QueryError::new(QueryErrorKind::UnknownField {
                name: name.to_string(),
            })
        })
    })
    .transpose()
}

/// A token after classification, before wildcard markers are merged.
enum Item<'a> {
    /// A bare wildcard marker.
    Marker {
        /// Marker text.
        text: &'a str,
        /// Byte offset.
        start: usize,
    },
    /// Anything else.
    Lexeme(Lexeme<'a>),
}

impl Item<'_> {
    /// True if this item is a word that can absorb or be absorbed by a marker.
    fn is_word(&self) -> bool {
        matches!(self, Self::Lexeme(Lexeme::Word { .. }))
    }

    /// True if this item is a bare marker.
    fn is_marker(&self) -> bool {
        matches!(self, Self::Marker { .. })
    }
}

/// Classifies one token.
fn classify(token: Token<'_>) -> Result<Item<'_>, QueryError> {
    let text = token.text;
    let start = token.start;

    if let Some(op) = BoolOp::from_keyword(text) {
        return Ok(Item::Lexeme(Lexeme::Connective { op, start }));
    }
    if let Some(caps) = PROXIMITY.captures(text) {
        let ordered = caps.name("op").is_some_and(|m| m.as_str() == "ADJ");
        let digits = caps.name("slop").map_or("", |m| m.as_str());
        let slop = match digits {
            "" => 1,
            d if d.len() == 1 && d != "0" => d.parse().unwrap_or(1),
            _ => {
                return Err(QueryError::syntax(
                    format!("invalid proximity distance in {text}: expected ADJ1-ADJ9 or NEAR1-NEAR9"),
                    Some(start),
                ));
            }
        };
        return Ok(Item::Lexeme(Lexeme::Proximity {
            ordered,
            slop,
            start,
        }));
    }
    if is_wildcard_marker(text) {
        return Ok(Item::Marker { text, start });
    }

    let (prefix, rest) = split_prefix(text);
    let offset = text.len() - rest.len();
    if prefix.is_some() && rest.is_empty() {
        return Err(QueryError::syntax(
            format!("missing term after {text}"),
            Some(start),
        ));
    }
    let (body, suffix) = split_suffix(rest);
    let field = match (prefix, resolve_field(suffix)?) {
        (Some(_), Some(_)) => {
            return Err(QueryError::syntax(
                format!("a term takes a field prefix or a field suffix, not both: {text}"),
                Some(start),
            ));
        }
        (prefix, suffix) => prefix.or(suffix),
    };

    if body.starts_with('(') {
        let Some(inner) = body.strip_prefix('(').and_then(|b| b.strip_suffix(')')) else {
            return Err(QueryError::syntax(
                format!("unexpected text after group: {text}"),
                Some(start),
            ));
        };
        return Ok(Item::Lexeme(Lexeme::Group {
            inner,
            inner_start: start + offset + 1,
            field,
            start,
        }));
    }

    if body.starts_with('"') {
        let Some(inner) = body
            .strip_prefix('"')
            .and_then(|b| b.strip_suffix('"'))
        else {
            return Err(QueryError::syntax(
                format!("unexpected text after quoted phrase: {text}"),
                Some(start),
            ));
        };
        return Ok(Item::Lexeme(Lexeme::Quoted {
            text: inner,
            field,
            start,
        }));
    }

    Ok(Item::Lexeme(Lexeme::Word {
        text: body.to_string(),
        field,
        start,
    }))
}

/// A run of words and markers being merged into a single word.
struct Run {
    /// Concatenated text.
    text: String,
    /// Field suffix of the last piece.
    field: Option<FieldIndex>,
    /// Byte offset of the first piece.
    start: usize,
}

impl Run {
    /// Appends a piece; only the last piece of a run may carry a suffix.
    fn push(&mut self, text: &str, field: Option<FieldIndex>, start: usize) -> Result<(), QueryError> {
        if self.field.is_some() {
            return Err(QueryError::syntax(
                "a field suffix must follow the whole wildcard",
                Some(start),
            ));
        }
        self.text.push_str(text);
        self.field = field;
        Ok(())
    }
}

/// Folds bare markers into adjacent words.
///
/// The first pass decides which items join the run before them; the second
/// builds the merged sequence. A word joins a preceding marker, and a marker
/// joins a preceding word or marker.
fn merge_markers(items: Vec<Item<'_>>) -> Result<Vec<Lexeme<'_>>, QueryError> {
    let joins: Vec<bool> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            i > 0 && {
                let prev = &items[i - 1];
                (prev.is_marker() && (item.is_word() || item.is_marker()))
                    || (prev.is_word() && item.is_marker())
            }
        })
        .collect();

    let mut out = Vec::with_capacity(items.len());
    let mut run: Option<Run> = None;

    for (item, joins_previous) in items.into_iter().zip(joins) {
        if !joins_previous && let Some(done) = run.take() {
            out.push(Lexeme::Word {
                text: done.text,
                field: done.field,
                start: done.start,
            });
        }

        let (text, field, start) = match item {
            Item::Marker { text, start } => (text.to_string(), None, start),
            Item::Lexeme(Lexeme::Word { text, field, start }) => (text, field, start),
            Item::Lexeme(other) => {
                out.push(other);
                continue;
            }
        };

        match run.as_mut() {
            Some(current) => current.push(&text, field, start)?,
            None => {
                run = Some(Run { text, field, start });
            }
        }
    }

    if let Some(done) = run {
        out.push(Lexeme::Word {
            text: done.text,
            field: done.field,
            start: done.start,
        });
    }
    Ok(out)
}

/// Lexes `text` into classified lexemes with wildcard markers merged.
///
/// Positions are byte offsets into `text`.
pub fn lex(text: &str) -> Result<Vec<Lexeme<'_>>, QueryError> {
    let items = tokenize(text)?
        .into_iter()
        .map(classify)
        .collect::<Result<Vec<_>, _>>()?;
    merge_markers(items)
}
