//! Configuration validation.
//!
//! Reports non-fatal problems in a loaded configuration.

use std::fmt;

use brs_query::FieldIndex;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// `search.limit` is zero, so every search returns nothing.
    ZeroLimit,
    /// `search.max_query_length` is zero, so every query is rejected.
    ZeroQueryLength,
    /// A field appears more than once in `search.default_fields`.
    DuplicateDefaultField {
        /// The repeated field.
        field: FieldIndex,
    },
    /// A boost is zero or negative.
    NonPositiveBoost {
        /// The boosted field.
        field: FieldIndex,
        /// The configured multiplier.
        boost: f32,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLimit => write!(f, "search.limit is 0: searches will return no results"),
            Self::ZeroQueryLength => {
                write!(f, "search.max_query_length is 0: every query will be rejected")
            }
            Self::DuplicateDefaultField { field } => {
                write!(f, "default field '{field}' is listed more than once")
            }
            Self::NonPositiveBoost { field, boost } => {
                write!(f, "boost for '{field}' is {boost}: matches will not score")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    let search = &config.search;

    if search.limit == 0 {
        warnings.push(ConfigWarning::ZeroLimit);
    }
    if search.max_query_length == 0 {
        warnings.push(ConfigWarning::ZeroQueryLength);
    }

    let mut seen = Vec::new();
    for field in &search.default_fields {
        if seen.contains(field) {
            warnings.push(ConfigWarning::DuplicateDefaultField { field: *field });
        } else {
            seen.push(*field);
        }
    }

    for (field, boost) in &search.boosts {
        if *boost <= 0.0 {
            warnings.push(ConfigWarning::NonPositiveBoost {
                field: *field,
                boost: *boost,
            });
        }
    }

    warnings
}
