//! Error types for the ontoc command-line tool.

use std::path::PathBuf;

/// Errors that can occur while driving a compilation from the command line.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The input DSL file could not be read.
    #[error("Failed to read input file '{path}'")]
    ReadInput {
        /// Path to the input file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[error("Failed to write output file '{path}'")]
    WriteOutput {
        /// Path to the output file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The source failed to compile.
    #[error(transparent)]
    Compile(#[from] ontoc_core::CompileError),

    /// The parsed AST could not be serialized.
    #[error("Failed to serialize AST: {0}")]
    Serialization(#[from] serde_json::Error),
}
