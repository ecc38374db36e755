//! Field indexes addressable from the query language.
//!
//! A field index is written as a trailing suffix on a token or group, e.g.
//! `battery.ti.` or `(charger OR adapter).ab.`.

use std::{fmt, str::FromStr};

/// A searchable field index.
///
/// The identifier field is deliberately absent: documents can never be looked
/// up by their raw id through the query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldIndex {
    /// Abstract text (`ab`).
    Abstract,
    /// Claims text (`clm`).
    Claims,
    /// Classification codes (`cpc`).
    Classification,
    /// Detailed description text (`detd`).
    Description,
    /// Title text (`ti`).
    Title,
}

impl FieldIndex {
    /// Every field index, in suffix-name order.
    pub const ALL: [Self; 5] = [
        Self::Abstract,
        Self::Claims,
        Self::Classification,
        Self::Description,
        Self::Title,
    ];

    /// The analyzed free-text fields (everything except classification codes).
    pub const TEXT: [Self; 4] = [Self::Title, Self::Abstract, Self::Claims, Self::Description];

    /// Returns the suffix name used in queries and as the index field name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Abstract => "ab",
            Self::Claims => "clm",
            Self::Classification => "cpc",
            Self::Description => "detd",
            Self::Title => "ti",
        }
    }

    /// Looks up a field index by its suffix name (case-sensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Returns the `.name.` suffix form.
    pub fn suffix(self) -> String {
        format!(".{}.", self.name())
    }
}

impl fmt::Display for FieldIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            format!(
                "unknown field index '{s}' (expected one of: {})",
                Self::ALL.map(Self::name).join(", ")
            )
        })
    }
}
