//! brs: patent search with BRS queries
//!
//! The `brs` binary builds a full-text index from patent documents and searches it with the
//! BRS query language used by patent examiners: field suffixes such as `.ti.` and `.clm.`,
//! boolean connectives, `ADJ`/`NEAR` proximity and truncation wildcards. It also exposes the
//! query front end directly, so a query can be validated or its parse inspected without an
//! index.

#![warn(missing_docs)]

pub mod cli;
