#![allow(dead_code)]

use ontoc_core::ast::{
    AggregateStatement, ComputeStatement, EnrichStatement, Expr, LoadStatement,
    NormalizeStatement, Program, Statement, UnitConvertStatement, ValidateStatement,
};
use ontoc_core::{Lexer, ParseError, Parser, Token};

pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source)
        .tokenize()
        .unwrap_or_else(|e| panic!("Failed to tokenize: {source}\nError: {e}"))
}

pub fn parse(source: &str) -> Program {
    Parser::new(tokenize(source))
        .parse_program()
        .unwrap_or_else(|e| panic!("Failed to parse: {source}\nError: {e}"))
}

pub fn parse_err(source: &str) -> ParseError {
    Parser::new(tokenize(source))
        .parse_program()
        .expect_err(&format!("Expected parse error for: {source}"))
}

pub fn compile(source: &str) -> String {
    ontoc_core::compile(source)
        .unwrap_or_else(|e| panic!("Failed to compile: {source}\nError: {e}"))
}

fn single_statement(source: &str) -> Statement {
    let mut program = parse(source);
    assert_eq!(
        program.statements.len(),
        1,
        "Expected exactly one statement in: {source}"
    );
    program.statements.remove(0)
}

pub fn parse_load(source: &str) -> LoadStatement {
    match single_statement(source) {
        Statement::Load(s) => s,
        other => panic!("Expected LOAD_CSV, got {other:?}"),
    }
}

pub fn parse_normalize(source: &str) -> NormalizeStatement {
    match single_statement(source) {
        Statement::Normalize(s) => s,
        other => panic!("Expected NORMALIZE, got {other:?}"),
    }
}

pub fn parse_aggregate(source: &str) -> AggregateStatement {
    match single_statement(source) {
        Statement::Aggregate(s) => s,
        other => panic!("Expected AGGREGATE, got {other:?}"),
    }
}

pub fn parse_unit_convert(source: &str) -> UnitConvertStatement {
    match single_statement(source) {
        Statement::UnitConvert(s) => s,
        other => panic!("Expected UNIT_CONVERT, got {other:?}"),
    }
}

pub fn parse_enrich(source: &str) -> EnrichStatement {
    match single_statement(source) {
        Statement::Enrich(s) => s,
        other => panic!("Expected ENRICH, got {other:?}"),
    }
}

pub fn parse_compute(source: &str) -> ComputeStatement {
    match single_statement(source) {
        Statement::Compute(s) => s,
        other => panic!("Expected COMPUTE, got {other:?}"),
    }
}

pub fn parse_validate(source: &str) -> ValidateStatement {
    match single_statement(source) {
        Statement::Validate(s) => s,
        other => panic!("Expected VALIDATE, got {other:?}"),
    }
}

/// Parses an expression by embedding it in a minimal COMPUTE statement.
pub fn parse_expr(expr_source: &str) -> Expr {
    let source = format!("COMPUTE f FOR src GROUP BY key INTO tgt AS {expr_source}");
    parse_compute(&source).expression
}
