//! Lexer error types.

use super::Position;

/// A lexical error.
///
/// Raised for the single failure class the scanner has: a character that
/// cannot start any token. Everything else (unterminated strings included)
/// is consumed on a best-effort basis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// The error message.
    pub message: String,
    /// The location of the offending character.
    pub position: Position,
}

impl LexError {
    /// Creates a new lexical error.
    #[must_use]
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    /// Creates an "unexpected character" error.
    #[must_use]
    pub fn unexpected_char(c: char, position: Position) -> Self {
        Self::new(format!("Unexpected character '{c}'"), position)
    }
}

impl core::fmt::Display for LexError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} at {}", self.message, self.position)
    }
}

impl std::error::Error for LexError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_char_message() {
        let err = LexError::unexpected_char('%', Position::new(4, 2));
        assert_eq!(err.to_string(), "Unexpected character '%' at line 4, column 2");
    }
}
