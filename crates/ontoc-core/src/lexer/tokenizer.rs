//! DSL tokenizer implementation.

use super::{Keyword, LexError, Position, Token, TokenKind};

/// A lexer that tokenizes DSL input in a single left-to-right pass.
///
/// Whitespace, newlines, and `#` comments never produce tokens; statement
/// boundaries are recovered by the parser from keyword lookahead.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The current line (1-based).
    line: u32,
    /// The current column (1-based).
    column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Returns the current source position.
    const fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Skips whitespace (newlines included) and `#` comments.
    fn skip_trivia(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            // Comments run to the end of the line
            if self.peek() == Some('#') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            break;
        }
    }

    /// Consumes one character and produces a token at the given position.
    fn lex_single(&mut self, kind: TokenKind, position: Position) -> Token {
        self.advance();
        Token::new(kind, position)
    }

    /// Scans an identifier or keyword.
    ///
    /// Identifiers accept alphanumerics, `_`, and `-` after an alphabetic
    /// or `_` first character. The keyword table is consulted with the
    /// exact spelling.
    fn scan_identifier(&mut self, position: Position) -> Token {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            self.advance();
        }

        let text = &self.input[start..self.pos];

        match Keyword::from_str(text) {
            Some(keyword) => Token::new(TokenKind::Keyword(keyword), position),
            None => Token::new(TokenKind::Identifier(String::from(text)), position),
        }
    }

    /// Scans a number (integer or float).
    ///
    /// Digits plus at most one decimal point; the decimal point decides
    /// the variant.
    fn scan_number(&mut self, position: Position) -> Result<Token, LexError> {
        let start = self.pos;
        let mut is_float = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.' && !is_float {
                is_float = true;
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.input[start..self.pos];

        if is_float {
            match text.parse::<f64>() {
                Ok(f) => Ok(Token::new(TokenKind::Float(f), position)),
                Err(_) => Err(LexError::new(
                    format!("Invalid float literal '{text}'"),
                    position,
                )),
            }
        } else {
            match text.parse::<i64>() {
                Ok(i) => Ok(Token::new(TokenKind::Integer(i), position)),
                Err(_) => Err(LexError::new(
                    format!("Integer literal too large '{text}'"),
                    position,
                )),
            }
        }
    }

    /// Scans a string literal.
    ///
    /// A backslash takes the following character literally; there is no
    /// special-character table. A string cut off by end of input keeps
    /// whatever was read.
    fn scan_string(&mut self, position: Position) -> Token {
        self.advance(); // consume opening quote
        let mut value = String::new();

        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    if let Some(escaped) = self.advance() {
                        value.push(escaped);
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => break,
            }
        }

        Token::new(TokenKind::String(value), position)
    }

    /// Scans the next token.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] when the current character cannot start any
    /// token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia();
        let position = self.position();

        let Some(c) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, position));
        };

        match c {
            // Delimiters
            '{' => Ok(self.lex_single(TokenKind::LeftBrace, position)),
            '}' => Ok(self.lex_single(TokenKind::RightBrace, position)),
            '[' => Ok(self.lex_single(TokenKind::LeftBracket, position)),
            ']' => Ok(self.lex_single(TokenKind::RightBracket, position)),
            '(' => Ok(self.lex_single(TokenKind::LeftParen, position)),
            ')' => Ok(self.lex_single(TokenKind::RightParen, position)),
            ',' => Ok(self.lex_single(TokenKind::Comma, position)),
            ':' => Ok(self.lex_single(TokenKind::Colon, position)),
            '.' => Ok(self.lex_single(TokenKind::Dot, position)),

            // Operators
            '+' => Ok(self.lex_single(TokenKind::Plus, position)),
            '*' => Ok(self.lex_single(TokenKind::Star, position)),
            '/' => Ok(self.lex_single(TokenKind::Slash, position)),

            // `->` needs two-character lookahead before falling back to `-`
            '-' => {
                if self.peek_next() == Some('>') {
                    self.advance();
                    self.advance();
                    Ok(Token::new(TokenKind::Arrow, position))
                } else {
                    Ok(self.lex_single(TokenKind::Minus, position))
                }
            }

            // String literals
            '"' => Ok(self.scan_string(position)),

            // Numbers
            c if c.is_ascii_digit() => self.scan_number(position),

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' => Ok(self.scan_identifier(position)),

            c => Err(LexError::unexpected_char(c, position)),
        }
    }

    /// Tokenizes the entire input.
    ///
    /// The returned sequence always ends with an [`TokenKind::Eof`] token.
    ///
    /// # Errors
    ///
    /// Returns the first [`LexError`] encountered; no tokens are returned
    /// alongside it.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}
