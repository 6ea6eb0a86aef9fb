//! Enumeration types for the Phase Quiz domain.
//!
//! Covers the question categories of the question bank and the
//! independent administrator capabilities.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Question types
// ---------------------------------------------------------------------------

/// The kind of challenge a question presents.
///
/// Serialized in `snake_case` (`word_search`, `multiple_choice`, ...) which
/// is also the representation stored in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum QuestionType {
    /// Unscramble the letters of a word.
    Anagram,
    /// Find hidden words in a letter grid.
    WordSearch,
    /// Pick the correct option out of several.
    MultipleChoice,
    /// Decide whether a statement is true or false.
    TrueFalse,
}

impl QuestionType {
    /// All question types, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Anagram,
        Self::WordSearch,
        Self::MultipleChoice,
        Self::TrueFalse,
    ];

    /// Stable wire/database representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anagram => "anagram",
            Self::WordSearch => "word_search",
            Self::MultipleChoice => "multiple_choice",
            Self::TrueFalse => "true_false",
        }
    }

    /// Human-readable label shown in the admin panel.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Anagram => "Anagram",
            Self::WordSearch => "Word Search",
            Self::MultipleChoice => "Multiple Choice",
            Self::TrueFalse => "True/False",
        }
    }

    /// Parse the stable representation produced by [`QuestionType::as_str`].
    ///
    /// Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl core::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Administrator capabilities
// ---------------------------------------------------------------------------

/// A single administrator permission.
///
/// Capabilities are independent flags: holding one never implies another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Capability {
    /// May edit token configuration.
    ModifyTokens,
    /// May edit phase configuration and the question bank.
    ModifyPhases,
    /// May read the analytics summary.
    ViewAnalytics,
    /// May inspect and delete game sessions.
    ManageSessions,
}
