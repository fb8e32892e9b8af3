//! Tests for the expression grammar: precedence, the concatenation split,
//! function calls, and dotted identifiers.

mod common;
use common::*;

use ontoc_core::ast::{BinaryOp, ConcatPart, Expr, Number};

// ===================================================================
// Literals and identifiers
// ===================================================================

#[test]
fn integer_and_float_are_distinct() {
    assert_eq!(parse_expr("42"), Expr::Number(Number::Integer(42)));
    assert_eq!(parse_expr("42.0"), Expr::Number(Number::Float(42.0)));
}

#[test]
fn dotted_identifier() {
    assert_eq!(
        parse_expr("activity.value"),
        Expr::Identifier(String::from("activity.value"))
    );
}

#[test]
fn bare_string_literal() {
    assert_eq!(parse_expr("\"kwh\""), Expr::String(String::from("kwh")));
}

// ===================================================================
// Arithmetic
// ===================================================================

#[test]
fn numeric_plus_is_arithmetic() {
    let Expr::Binary { left, op, right } = parse_expr("1 + 2") else {
        panic!("Expected binary expression");
    };
    assert_eq!(op, BinaryOp::Add);
    assert_eq!(*left, Expr::Number(Number::Integer(1)));
    assert_eq!(*right, Expr::Number(Number::Integer(2)));
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    // 1 + 2 * 3 parses as 1 + (2 * 3)
    let Expr::Binary { left, op, right } = parse_expr("1 + 2 * 3") else {
        panic!("Expected binary expression");
    };
    assert_eq!(op, BinaryOp::Add);
    assert_eq!(*left, Expr::Number(Number::Integer(1)));
    assert!(matches!(
        *right,
        Expr::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}

#[test]
fn additive_is_left_associative() {
    // 10 - 2 - 3 parses as (10 - 2) - 3
    let Expr::Binary { left, op, right } = parse_expr("10 - 2 - 3") else {
        panic!("Expected binary expression");
    };
    assert_eq!(op, BinaryOp::Sub);
    assert!(matches!(
        *left,
        Expr::Binary {
            op: BinaryOp::Sub,
            ..
        }
    ));
    assert_eq!(*right, Expr::Number(Number::Integer(3)));
}

#[test]
fn multiplication_of_dotted_identifiers() {
    let Expr::Binary { left, op, right } = parse_expr("activity.value * emission_factor.co2")
    else {
        panic!("Expected binary expression");
    };
    assert_eq!(op, BinaryOp::Mul);
    assert_eq!(*left, Expr::Identifier(String::from("activity.value")));
    assert_eq!(*right, Expr::Identifier(String::from("emission_factor.co2")));
}

// ===================================================================
// Concatenation
// ===================================================================

#[test]
fn string_plus_string_is_concatenation() {
    assert_eq!(
        parse_expr("\"a\" + \"b\""),
        Expr::Concatenation(vec![
            ConcatPart::String(String::from("a")),
            ConcatPart::String(String::from("b")),
        ])
    );
}

#[test]
fn string_plus_dotted_identifier_is_concatenation() {
    assert_eq!(
        parse_expr("\"em_\" + activity.id"),
        Expr::Concatenation(vec![
            ConcatPart::String(String::from("em_")),
            ConcatPart::Identifier(String::from("activity.id")),
        ])
    );
}

#[test]
fn identifier_chain_commits_to_concatenation() {
    assert_eq!(
        parse_expr("prefix + \"-\" + suffix"),
        Expr::Concatenation(vec![
            ConcatPart::Identifier(String::from("prefix")),
            ConcatPart::String(String::from("-")),
            ConcatPart::Identifier(String::from("suffix")),
        ])
    );
}

#[test]
fn single_part_collapses_to_plain_expression() {
    // No `+` chain: stays a plain identifier, not a one-part concatenation
    assert_eq!(parse_expr("scope"), Expr::Identifier(String::from("scope")));
}

// ===================================================================
// Function calls
// ===================================================================

#[test]
fn function_call_with_single_argument() {
    assert_eq!(
        parse_expr("sum(value)"),
        Expr::FunctionCall {
            name: String::from("sum"),
            argument: String::from("value"),
        }
    );
}

#[test]
fn function_call_requires_identifier_argument() {
    let err = parse_err("COMPUTE f FOR s GROUP BY k INTO t AS sum(1)");
    assert_eq!(err.expected.as_deref(), Some("identifier"));
}
