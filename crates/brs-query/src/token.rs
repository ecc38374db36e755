//! Query tokenizer.
//!
//! Splits a raw query string into top-level tokens. Parenthesized groups stay
//! whole (including any nested groups and a trailing `.xx.` field suffix), so a
//! group is resolved later by recursing into the text between its outer
//! parentheses. A field may also lead a token as `ti:battery`.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    error::{QueryError, QueryErrorKind},
    field::FieldIndex,
};

/// Trailing field suffix such as `.ti.`.
static SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(?P<name>[a-z]+)\.$").expect("valid suffix regex"));

/// A top-level token: a contiguous slice of the query and its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token text, never empty and never surrounded by whitespace.
    pub text: &'a str,
    /// Byte offset of the token in the tokenized text.
    pub start: usize,
}

impl Token<'_> {
    /// Byte offset one past the end of the token.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Splits a trailing `.name.` suffix off `text`.
///
/// Returns the remaining body and the suffix name, if present. The name is not
/// checked against the known field indexes.
pub fn split_suffix(text: &str) -> (&str, Option<&str>) {
    match SUFFIX.captures(text) {
        Some(caps) => {
            let whole = caps.get(0).map_or(text.len(), |m| m.start());
            let name = caps.name("name").map(|m| m.as_str());
            (&text[..whole], name)
        }
        None => (text, None),
    }
}

/// Splits a leading `name:` field prefix off `text`.
///
/// Only known field names count; any other colon is part of the word.
pub fn split_prefix(text: &str) -> (Option<FieldIndex>, &str) {
    text.split_once(':')
        .and_then(|(name, rest)| FieldIndex::from_name(name).map(|field| (Some(field), rest)))
        .unwrap_or((None, text))
}

/// Checks that parentheses balance by counting, before any token is built.
fn check_balance(text: &str) -> Result<(), QueryError> {
    let opens = text.matches('(').count();
    let closes = text.matches(')').count();
    if opens == closes {
        return Ok(());
    }

    let mut stack = Vec::new();
    for (i, ch) in text.char_indices() {
        match ch {
            '(' => stack.push(i),
            ')' if stack.pop().is_none() => return Err(QueryError::unmatched_parentheses(i)),
            _ => {}
        }
    }

    let position = stack.first().copied().unwrap_or(text.len());
    Err(QueryError::unmatched_parentheses(position))
}

/// Pushes the token spanning `start..end`, if one was started.
fn flush<'a>(text: &'a str, start: Option<usize>, end: usize, tokens: &mut Vec<Token<'a>>) {
    if let Some(start) = start
        && start < end
    {
        tokens.push(Token {
            text: &text[start..end],
            start,
        });
    }
}

/// Tokenizes a query string into top-level tokens.
///
/// A token ends at unnested whitespace, when a closing parenthesis returns
/// the nesting level to zero (absorbing a directly following `.xx.` suffix),
/// or at the end of input. Whitespace inside parentheses or double quotes is
/// kept in the token.
pub fn tokenize(text: &str) -> Result<Vec<Token<'_>>, QueryError> {
    check_balance(text)?;

    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut token_start: Option<usize> = None;
    let mut open_quote: Option<usize> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if open_quote.is_some() {
            if ch == '"' {
                open_quote = None;
            }
            continue;
        }

        match ch {
            c if c.is_whitespace() && depth == 0 => {
                flush(text, token_start.take(), i, &mut tokens);
            }
            '"' => {
                token_start.get_or_insert(i);
                open_quote = Some(i);
            }
            '(' => {
                token_start.get_or_insert(i);
                depth += 1;
            }
            ')' => {
                if depth == 0 {
                    return Err(QueryError::unmatched_parentheses(i));
                }
                depth -= 1;
                if depth == 0 {
                    let mut end = i + 1;
                    if matches!(chars.peek(), Some(&(_, '.'))) {
                        while let Some(&(j, c)) = chars.peek() {
                            if c.is_whitespace() || matches!(c, '(' | ')' | '"') {
                                break;
                            }
                            end = j + c.len_utf8();
                            chars.next();
                        }
                    }
                    flush(text, token_start.take(), end, &mut tokens);
                }
            }
            _ => {
                token_start.get_or_insert(i);
            }
        }
    }

    if let Some(position) = open_quote {
        return Err(QueryError::new(QueryErrorKind::UnclosedQuote { position }));
    }
    if depth > 0 {
        return Err(QueryError::unmatched_parentheses(text.len()));
    }

    flush(text, token_start, text.len(), &mut tokens);
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<&str> {
        tokenize(input).unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn empty_input() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn splits_on_unnested_spaces() {
        assert_eq!(
            texts("battery.ti. AND charger.ab."),
            vec!["battery.ti.", "AND", "charger.ab."]
        );
    }

    #[test]
    fn group_stays_whole_with_suffix() {
        assert_eq!(
            texts("(battery OR cell).ti. AND charger.ab."),
            vec!["(battery OR cell).ti.", "AND", "charger.ab."]
        );
    }

    #[test]
    fn nested_groups_do_not_end_token() {
        assert_eq!(
            texts("((a OR b).ti. AND c) XOR d"),
            vec!["((a OR b).ti. AND c)", "XOR", "d"]
        );
    }

    #[test]
    fn adjacent_groups_split() {
        assert_eq!(texts("(a)(b).ti."), vec!["(a)", "(b).ti."]);
    }

    #[test]
    fn text_after_group_is_not_dropped() {
        assert_eq!(texts("(a)b"), vec!["(a)", "b"]);
    }

    #[test]
    fn offsets_point_into_input() {
        let input = "  alpha  (beta gamma).ab. ";
        for token in tokenize(input).unwrap() {
            assert_eq!(&input[token.start..token.end()], token.text);
        }
    }

    #[test]
    fn concatenation_reproduces_input() {
        let input = "(a OR (b AND c).ti.).ab.  NOT  \"x y\"  d*.clm.";
        let joined: String = tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect();
        let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        assert_eq!(strip(&joined), strip(input));
    }

    #[test]
    fn quoted_text_is_atomic() {
        assert_eq!(
            texts("\"battery charger\".ti. OR x"),
            vec!["\"battery charger\".ti.", "OR", "x"]
        );
    }

    #[test]
    fn unclosed_quote_fails() {
        let err = tokenize("a \"b c").unwrap_err();
        assert_eq!(err.kind, QueryErrorKind::UnclosedQuote { position: 2 });
    }

    #[test]
    fn more_opens_than_closes_fails() {
        let err = tokenize("(a OR (b)").unwrap_err();
        assert_eq!(err.kind, QueryErrorKind::UnmatchedParentheses { position: 0 });
    }

    #[test]
    fn more_closes_than_opens_fails() {
        let err = tokenize("a) OR b").unwrap_err();
        assert_eq!(err.kind, QueryErrorKind::UnmatchedParentheses { position: 1 });
    }

    #[test]
    fn balanced_but_misordered_fails() {
        let err = tokenize("a) OR (b").unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn split_suffix_variants() {
        assert_eq!(split_suffix("battery.ti."), ("battery", Some("ti")));
        assert_eq!(split_suffix("(a OR b).detd."), ("(a OR b)", Some("detd")));
        assert_eq!(split_suffix("battery"), ("battery", None));
        assert_eq!(split_suffix("U.S."), ("U.S.", None));
    }

    #[test]
    fn split_prefix_variants() {
        assert_eq!(split_prefix("ti:battery"), (Some(FieldIndex::Title), "battery"));
        assert_eq!(
            split_prefix("cpc:H01M10/44"),
            (Some(FieldIndex::Classification), "H01M10/44")
        );
        assert_eq!(split_prefix("ab:(a OR b)"), (Some(FieldIndex::Abstract), "(a OR b)"));
        assert_eq!(split_prefix("id:US-1"), (None, "id:US-1"));
        assert_eq!(split_prefix("TI:battery"), (None, "TI:battery"));
        assert_eq!(split_prefix("battery"), (None, "battery"));
    }

    #[test]
    fn prefixed_group_is_one_token() {
        assert_eq!(texts("ti:(a OR b) AND c"), vec!["ti:(a OR b)", "AND", "c"]);
    }
}
