//! AST node types for the ontology ETL DSL.
//!
//! Pure data with invariants, no behavior: the parser builds these nodes and
//! the code generator consumes them. Every node is immutable once
//! constructed and exclusively owned by its parent, so a [`Program`] is
//! always a tree.

mod expression;
mod statement;

pub use expression::{BinaryOp, ConcatPart, Expr, Number};
pub use statement::{
    AggregateFunction, AggregateStatement, AggregationClause, ComputeStatement, EnrichStatement,
    LoadStatement, NormalizeStatement, OrderedMap, Program, Statement, TimeWindow,
    UnitConvertStatement, ValidateStatement,
};
