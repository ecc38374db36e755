//! Text analysis pipelines for the patent index.
//!
//! Free-text fields (`ti`, `ab`, `clm`, `detd`) use:
//! 1. `SimpleTokenizer` - splits on whitespace and punctuation
//! 2. `RemoveLongFilter` - removes tokens longer than 40 bytes
//! 3. `LowerCaser` - converts tokens to lowercase
//! 4. [`BrsFilter`] - drops stopwords, numbers and one-character tokens
//!
//! Classification codes (`cpc`) are split on whitespace and kept verbatim.

use std::sync::LazyLock;

use brs_query::FieldIndex;
use regex::Regex;
use tantivy::{
    Index,
    tokenizer::{
        LowerCaser, RemoveLongFilter, SimpleTokenizer, TextAnalyzer, Token, TokenFilter,
        TokenStream, Tokenizer, WhitespaceTokenizer,
    },
};

/// Name of the free-text tokenizer registered with Tantivy.
pub const TEXT_TOKENIZER: &str = "brs_text";

/// Name of the classification-code tokenizer registered with Tantivy.
pub const KEYWORD_TOKENIZER: &str = "brs_keyword";

/// Maximum token length in bytes before filtering.
const MAX_TOKEN_LENGTH: usize = 40;

/// Shortest token kept, in characters.
const MIN_TOKEN_CHARS: usize = 2;

/// Words never indexed in free-text fields.
pub const STOPWORDS: [&str; 23] = [
    "an", "are", "by", "for", "if", "into", "is", "no", "not", "of", "on", "such", "that", "the",
    "their", "then", "there", "these", "they", "this", "to", "was", "will",
];

/// Plain or comma-grouped numbers, with an optional fraction.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+|\d{1,3}(,\d{3})*)(\.\d+)?$").expect("valid number regex")
});

/// Returns true if a lowercased token is dropped from free-text fields.
pub fn is_filtered(token: &str) -> bool {
    token.chars().count() < MIN_TOKEN_CHARS || STOPWORDS.contains(&token) || NUMBER.is_match(token)
}

/// Token filter removing stopwords, numbers and short tokens.
///
/// Surviving tokens are renumbered consecutively, so proximity distances
/// are measured in indexed words.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrsFilter;

impl TokenFilter for BrsFilter {
    type Tokenizer<T: Tokenizer> = BrsFilterWrapper<T>;

    fn transform<T: Tokenizer>(self, tokenizer: T) -> Self::Tokenizer<T> {
        BrsFilterWrapper(tokenizer)
    }
}

/// Tokenizer produced by [`BrsFilter`].
#[derive(Clone)]
pub struct BrsFilterWrapper<T>(T);

impl<T: Tokenizer> Tokenizer for BrsFilterWrapper<T> {
    type TokenStream<'a> = BrsFilterStream<T::TokenStream<'a>>;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> Self::TokenStream<'a> {
        BrsFilterStream {
            inner: self.0.token_stream(text),
            position: 0,
        }
    }
}

/// Token stream produced by [`BrsFilter`].
pub struct BrsFilterStream<T> {
    /// Upstream tokens.
    inner: T,
    /// Next position to assign.
    position: usize,
}

impl<T: TokenStream> TokenStream for BrsFilterStream<T> {
    fn advance(&mut self) -> bool {
        while self.inner.advance() {
            if is_filtered(&self.inner.token().text) {
                continue;
            }
            self.inner.token_mut().position = self.position;
            self.position += 1;
            return true;
        }
        false
    }

    fn token(&self) -> &Token {
        self.inner.token()
    }

    fn token_mut(&mut self) -> &mut Token {
        self.inner.token_mut()
    }
}

/// Builds the free-text analyzer.
pub fn build_text_analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
        .filter(LowerCaser)
        .filter(BrsFilter)
        .build()
}

/// Builds the classification-code analyzer.
pub fn build_keyword_analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(WhitespaceTokenizer::default()).build()
}

/// Registers both analyzers with an index.
pub fn register_tokenizers(index: &Index) {
    let tokenizers = index.tokenizers();
    tokenizers.register(TEXT_TOKENIZER, build_text_analyzer());
    tokenizers.register(KEYWORD_TOKENIZER, build_keyword_analyzer());
}

/// Analyzers for every field, used to turn query words into index terms.
#[derive(Clone)]
pub struct FieldAnalyzers {
    /// Free-text analyzer.
    text: TextAnalyzer,
    /// Classification-code analyzer.
    keyword: TextAnalyzer,
}

impl FieldAnalyzers {
    /// Creates the analyzers.
    pub fn new() -> Self {
        Self {
            text: build_text_analyzer(),
            keyword: build_keyword_analyzer(),
        }
    }

    /// Analyzes `text` as it would be indexed in `field`.
    pub fn analyze(&self, field: FieldIndex, text: &str) -> Vec<String> {
        let mut analyzer = match field {
            FieldIndex::Classification => self.keyword.clone(),
            _ => self.text.clone(),
        };
        let mut stream = analyzer.token_stream(text);
        let mut terms = Vec::new();
        while stream.advance() {
            terms.push(stream.token().text.clone());
        }
        terms
    }
}

impl Default for FieldAnalyzers {
    fn default() -> Self {
        Self::new()
    }
}
