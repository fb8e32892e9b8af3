//! Parser error types.

use crate::lexer::{Position, TokenKind};

/// A syntax error.
///
/// Carries the expected-vs-actual token kinds and the source position of
/// the first mismatch; parsing stops there.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// Description of what was expected (if applicable).
    pub expected: Option<String>,
    /// The actual token found.
    pub found: Option<TokenKind>,
    /// The location of the error.
    pub position: Position,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            expected: None,
            found: None,
            position,
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: TokenKind, position: Position) -> Self {
        let expected_str: String = expected.into();
        Self {
            message: format!("Expected {expected_str} but found {found:?}"),
            expected: Some(expected_str),
            found: Some(found),
            position,
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} at {}", self.message, self.position)
    }
}

impl std::error::Error for ParseError {}
