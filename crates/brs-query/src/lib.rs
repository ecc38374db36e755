//! Parsing and validation for BRS patent search queries.
//!
//! The query language combines:
//!
//! - **Field suffixes**: `battery.ti.` - search one field (`ab`, `clm`, `cpc`, `detd`, `ti`)
//! - **Field prefixes**: `ti:battery`, `cpc:H01M10/44` - the same, written before the term
//! - **Scoped groups**: `(battery OR cell).ab.` - the suffix applies to every term inside
//! - **Connectives**: `AND`, `OR`, `NOT`, `XOR` - left to right, case-sensitive
//! - **Proximity**: `battery ADJ2 charger` (ordered), `battery NEAR charger` (any order)
//! - **Phrases**: `"fast charging"` - adjacent words in order
//! - **Wildcards**: `batter*`, `b?t`, `charg$`, `volt$2`
//!
//! # Example
//!
//! ```
//! use brs_query::{ParseOptions, parse};
//!
//! let node = parse("(battery OR cell).ti. AND charg*.ab.", &ParseOptions::strict()).unwrap();
//! assert!(node.is_some());
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod field;
mod lexer;
mod parser;
mod token;
mod validate;
pub mod wildcard;

pub use ast::{BoolOp, QueryNode};
pub use error::{QueryError, QueryErrorKind};
pub use field::FieldIndex;
pub use lexer::{Lexeme, lex};
pub use parser::{ParseOptions, count_query_tokens, parse};
pub use token::{Token, split_prefix, split_suffix, tokenize};
pub use validate::{Scope, validate, validate_scoped};
