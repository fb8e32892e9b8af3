//! # ontoc-core
//!
//! The compiler core for the ontology ETL DSL: lexical analysis, recursive
//! descent parsing into an AST, and syntax-directed Cypher code generation.
//!
//! One compile invocation is a pure, deterministic function of its input
//! text; the same source always yields the same tokens, AST, and output.
//! Nothing here touches a filesystem or process environment — sourcing the
//! input and placing the output belong to the CLI collaborator.
//!
//! ```rust
//! let cypher = ontoc_core::compile(
//!     "LOAD_CSV \"level1.csv\" AS measurement \
//!      MAP_COLUMNS { factory -> factory_id }",
//! )
//! .unwrap();
//! assert!(cypher.starts_with("// LOAD_CSV: level1.csv AS measurement"));
//! ```

pub mod ast;
pub mod codegen;
pub mod lexer;
pub mod parser;

pub use ast::Program;
pub use codegen::{generate, generate_blocks};
pub use lexer::{LexError, Lexer, Position, Token, TokenKind};
pub use parser::{ParseError, Parser};

/// A compilation error: lexical or syntactic.
///
/// These are the only two failure classes. There is no semantic category;
/// anything that parses generates.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The lexer hit an unrecognized character.
    Lex(LexError),
    /// The parser hit an unexpected token.
    Parse(ParseError),
}

impl core::fmt::Display for CompileError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Lex(e) => write!(f, "Lexical error: {e}"),
            Self::Parse(e) => write!(f, "Syntax error: {e}"),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lex(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<LexError> for CompileError {
    fn from(e: LexError) -> Self {
        Self::Lex(e)
    }
}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

/// Parses DSL source text into a [`Program`].
///
/// # Errors
///
/// Returns the first [`LexError`] or [`ParseError`] encountered, wrapped in
/// a [`CompileError`]; no partial AST accompanies an error.
pub fn parse(source: &str) -> Result<Program, CompileError> {
    let tokens = Lexer::new(source).tokenize()?;
    let program = Parser::new(tokens).parse_program()?;
    Ok(program)
}

/// Compiles DSL source text into Cypher query text.
///
/// This is the entire boundary contract with the outside world: source text
/// in, generated text or a structured error out.
///
/// # Errors
///
/// Returns a [`CompileError`] when the source fails to lex or parse;
/// generation itself never fails.
pub fn compile(source: &str) -> Result<String, CompileError> {
    Ok(codegen::generate(&parse(source)?))
}
