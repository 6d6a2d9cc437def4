//! Errors produced while parsing leaf expressions
//!
//! Copyright (c) 2025 Dataval Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// A malformed transform expression inside a leaf schema
///
/// Positions are byte offsets into the whole leaf string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `int@` or `int@(1)`: nothing names the transform
    #[error("Invalid transform expression; {segment} (missing transform name at position {position})")]
    MissingName { segment: String, position: usize },

    /// `num_range(1,2` runs off the end of the input
    #[error("Invalid transform expression; {segment} (unterminated argument list starting at position {position})")]
    UnterminatedArguments { segment: String, position: usize },

    /// `f(g(1))`: arguments are raw text and cannot nest
    #[error("Invalid transform expression; {segment} (unexpected '(' at position {position})")]
    NestedParenthesis { segment: String, position: usize },

    /// `str_lower)` closes a list that was never opened
    #[error("Invalid transform expression; {segment} (unexpected ')' at position {position})")]
    UnexpectedCloseParen { segment: String, position: usize },

    /// `num_range(1,2)x`: only `@` may follow a closed argument list
    #[error("Invalid transform expression; {segment} (unexpected '{found}' at position {position})")]
    TrailingCharacters {
        segment: String,
        position: usize,
        found: char,
    },
}

impl ParseError {
    /// The transform expression that failed to parse
    pub fn segment(&self) -> &str {
        match self {
            ParseError::MissingName { segment, .. }
            | ParseError::UnterminatedArguments { segment, .. }
            | ParseError::NestedParenthesis { segment, .. }
            | ParseError::UnexpectedCloseParen { segment, .. }
            | ParseError::TrailingCharacters { segment, .. } => segment,
        }
    }

    /// Byte offset of the offending character
    pub fn position(&self) -> usize {
        match self {
            ParseError::MissingName { position, .. }
            | ParseError::UnterminatedArguments { position, .. }
            | ParseError::NestedParenthesis { position, .. }
            | ParseError::UnexpectedCloseParen { position, .. }
            | ParseError::TrailingCharacters { position, .. } => *position,
        }
    }
}
