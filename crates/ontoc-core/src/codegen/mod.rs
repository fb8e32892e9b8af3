//! Cypher code generation.
//!
//! Syntax-directed: one independent translation rule per statement variant,
//! each emitting a self-contained text block opened by a `//` comment naming
//! the statement. Generation is stateless; every call returns a fresh
//! sequence of blocks.

mod cypher;
mod expr;

pub use cypher::{generate, generate_blocks};
