//! DSL Parser implementation.

use super::error::ParseError;
use crate::ast::{
    AggregateFunction, AggregateStatement, AggregationClause, BinaryOp, ComputeStatement,
    ConcatPart, EnrichStatement, Expr, LoadStatement, NormalizeStatement, Number, OrderedMap,
    Program, Statement, TimeWindow, UnitConvertStatement, ValidateStatement,
};
use crate::lexer::{Keyword, Position, Token, TokenKind};

/// Recursive descent parser for the DSL.
///
/// Consumes a token sequence strictly left to right with one token of
/// lookahead (two for function-call detection). There is no error recovery:
/// the first mismatch aborts the parse.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Fallback for reads past the end of a sequence without an EOF token.
    eof: Token,
}

impl Parser {
    /// Creates a new parser over a token sequence.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            eof: Token::new(TokenKind::Eof, Position::start()),
        }
    }

    /// Parses the token sequence into a [`Program`].
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] at the first mismatch; no partial AST is
    /// produced alongside it.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();

        while !self.current().is_eof() {
            statements.push(self.parse_statement()?);
        }

        Ok(Program { statements })
    }

    /// Parses a single statement, dispatching on the leading keyword.
    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.current().as_keyword() {
            Some(Keyword::LoadCsv) => Ok(Statement::Load(self.parse_load_statement()?)),
            Some(Keyword::Normalize) => {
                Ok(Statement::Normalize(self.parse_normalize_statement()?))
            }
            Some(Keyword::Aggregate) => {
                Ok(Statement::Aggregate(self.parse_aggregate_statement()?))
            }
            Some(Keyword::UnitConvert) => {
                Ok(Statement::UnitConvert(self.parse_unit_convert_statement()?))
            }
            Some(Keyword::Enrich) => Ok(Statement::Enrich(self.parse_enrich_statement()?)),
            Some(Keyword::Compute) => Ok(Statement::Compute(self.parse_compute_statement()?)),
            Some(Keyword::Validate) => Ok(Statement::Validate(self.parse_validate_statement()?)),
            _ => Err(ParseError::unexpected(
                "LOAD_CSV, NORMALIZE, AGGREGATE, UNIT_CONVERT, ENRICH, COMPUTE, or VALIDATE",
                self.current().kind.clone(),
                self.current().position,
            )),
        }
    }

    /// Parses a `LOAD_CSV` statement.
    fn parse_load_statement(&mut self) -> Result<LoadStatement, ParseError> {
        self.expect_keyword(Keyword::LoadCsv)?;
        let path = self.expect_string()?;
        self.expect_keyword(Keyword::As)?;
        let node_label = self.expect_identifier()?;

        let mut column_map = OrderedMap::new();
        if self.check_keyword(Keyword::MapColumns) {
            self.advance();
            self.expect(&TokenKind::LeftBrace)?;

            while !self.check(&TokenKind::RightBrace) {
                let src = self.expect_identifier()?;
                self.expect(&TokenKind::Arrow)?;
                let dst = self.expect_identifier()?;
                column_map.insert(src, dst);

                if self.check(&TokenKind::Comma) {
                    self.advance();
                }
            }

            self.expect(&TokenKind::RightBrace)?;
        }

        Ok(LoadStatement {
            path,
            node_label,
            column_map,
        })
    }

    /// Parses a `NORMALIZE` statement.
    fn parse_normalize_statement(&mut self) -> Result<NormalizeStatement, ParseError> {
        self.expect_keyword(Keyword::Normalize)?;
        let node_label = self.expect_identifier()?;
        self.expect(&TokenKind::LeftBrace)?;

        let mut normalizations = OrderedMap::new();

        while !self.check(&TokenKind::RightBrace) {
            let property = self.expect_identifier()?;
            self.expect(&TokenKind::Colon)?;
            self.expect(&TokenKind::LeftBrace)?;

            let mut mappings = OrderedMap::new();
            while !self.check(&TokenKind::RightBrace) {
                let old_value = self.parse_value_literal()?;
                self.expect(&TokenKind::Colon)?;
                let new_value = self.parse_value_literal()?;
                mappings.insert(old_value, new_value);

                if self.check(&TokenKind::Comma) {
                    self.advance();
                }
            }

            self.expect(&TokenKind::RightBrace)?;
            normalizations.insert(property, mappings);

            if self.check(&TokenKind::Comma) {
                self.advance();
            }
        }

        self.expect(&TokenKind::RightBrace)?;
        Ok(NormalizeStatement {
            node_label,
            normalizations,
        })
    }

    /// Parses an `AGGREGATE` statement.
    fn parse_aggregate_statement(&mut self) -> Result<AggregateStatement, ParseError> {
        self.expect_keyword(Keyword::Aggregate)?;
        let source_label = self.expect_identifier()?;
        self.expect_keyword(Keyword::By)?;

        // Group-by key list
        self.expect(&TokenKind::LeftBracket)?;
        let mut group_by = Vec::new();
        while !self.check(&TokenKind::RightBracket) {
            group_by.push(self.expect_identifier()?);
            if self.check(&TokenKind::Comma) {
                self.advance();
            }
        }
        self.expect(&TokenKind::RightBracket)?;

        self.expect_keyword(Keyword::Into)?;
        let target_label = self.expect_identifier()?;

        // Aggregation clauses; the list may be empty
        let mut aggregations = Vec::new();
        while let Some(function) = self.current_aggregate_function() {
            self.advance();
            self.expect(&TokenKind::LeftParen)?;

            let field = match &self.current().kind {
                TokenKind::Identifier(_) => Some(self.expect_identifier()?),
                _ => None,
            };

            self.expect(&TokenKind::RightParen)?;
            self.expect_keyword(Keyword::As)?;
            let alias = self.expect_identifier()?;

            aggregations.push(AggregationClause {
                function,
                field,
                alias,
            });
        }

        // Optional time window
        let time_window = if self.check_keyword(Keyword::TimeWindow) {
            self.advance();
            let mode = self.expect_identifier()?;
            self.expect_keyword(Keyword::From)?;
            let source_field = self.expect_identifier()?;
            self.expect_keyword(Keyword::Into)?;
            let target_field = self.expect_identifier()?;
            Some(TimeWindow {
                mode,
                source_field,
                target_field,
            })
        } else {
            None
        };

        Ok(AggregateStatement {
            source_label,
            group_by,
            target_label,
            aggregations,
            time_window,
        })
    }

    /// Maps the current token to an aggregation function if it opens an
    /// aggregation clause.
    fn current_aggregate_function(&self) -> Option<AggregateFunction> {
        match self.current().as_keyword() {
            Some(Keyword::AggSum) => Some(AggregateFunction::Sum),
            Some(Keyword::AggCount) => Some(AggregateFunction::Count),
            Some(Keyword::TakeFirst) => Some(AggregateFunction::First),
            _ => None,
        }
    }

    /// Parses a `UNIT_CONVERT` statement.
    fn parse_unit_convert_statement(&mut self) -> Result<UnitConvertStatement, ParseError> {
        self.expect_keyword(Keyword::UnitConvert)?;
        let node_label = self.expect_identifier()?;
        self.expect(&TokenKind::Dot)?;
        let field = self.expect_identifier()?;
        self.expect_keyword(Keyword::From)?;
        let from_unit = self.parse_value_literal()?;
        self.expect_keyword(Keyword::To)?;
        let to_unit = self.parse_value_literal()?;
        self.expect_keyword(Keyword::Using)?;
        let conversion_table = self.expect_string()?;

        Ok(UnitConvertStatement {
            node_label,
            field,
            from_unit,
            to_unit,
            conversion_table,
        })
    }

    /// Parses an `ENRICH` statement.
    fn parse_enrich_statement(&mut self) -> Result<EnrichStatement, ParseError> {
        self.expect_keyword(Keyword::Enrich)?;
        let source_label = self.expect_identifier()?;
        self.expect_keyword(Keyword::With)?;
        let factor_table = self.parse_value_literal()?;
        self.expect_keyword(Keyword::Match)?;
        self.expect_keyword(Keyword::On)?;
        let match_key = self.expect_identifier()?;
        self.expect_keyword(Keyword::Output)?;
        let target_label = self.expect_identifier()?;
        self.expect_keyword(Keyword::As)?;
        self.expect(&TokenKind::LeftBrace)?;

        let mut output_fields = OrderedMap::new();
        while !self.check(&TokenKind::RightBrace) {
            let field_name = self.expect_identifier()?;
            self.expect(&TokenKind::Colon)?;
            let expr = self.parse_expression()?;
            output_fields.insert(field_name, expr);

            if self.check(&TokenKind::Comma) {
                self.advance();
            }
        }

        self.expect(&TokenKind::RightBrace)?;
        Ok(EnrichStatement {
            source_label,
            factor_table,
            match_key,
            target_label,
            output_fields,
        })
    }

    /// Parses a `COMPUTE` statement.
    fn parse_compute_statement(&mut self) -> Result<ComputeStatement, ParseError> {
        self.expect_keyword(Keyword::Compute)?;
        let field_name = self.expect_identifier()?;
        self.expect_keyword(Keyword::For)?;
        let source_label = self.expect_identifier()?;
        self.expect_keyword(Keyword::Group)?;
        self.expect_keyword(Keyword::By)?;

        // Either a bracketed key list or a single bare key
        let mut group_by = Vec::new();
        if self.check(&TokenKind::LeftBracket) {
            self.advance();
            while !self.check(&TokenKind::RightBracket) {
                group_by.push(self.expect_identifier()?);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                }
            }
            self.expect(&TokenKind::RightBracket)?;
        } else {
            group_by.push(self.expect_identifier()?);
        }

        self.expect_keyword(Keyword::Into)?;
        let target_label = self.expect_identifier()?;
        self.expect_keyword(Keyword::As)?;
        let expression = self.parse_expression()?;

        Ok(ComputeStatement {
            field_name,
            source_label,
            group_by,
            target_label,
            expression,
        })
    }

    /// Parses a `VALIDATE` statement.
    fn parse_validate_statement(&mut self) -> Result<ValidateStatement, ParseError> {
        self.expect_keyword(Keyword::Validate)?;
        let node_label = self.expect_identifier()?;
        self.expect_keyword(Keyword::With)?;
        let rule_name = self.expect_string()?;

        Ok(ValidateStatement {
            node_label,
            rule_name,
        })
    }

    /// Parses a value literal (identifier or string).
    fn parse_value_literal(&mut self) -> Result<String, ParseError> {
        match &self.current().kind {
            TokenKind::Identifier(value) | TokenKind::String(value) => {
                let value = value.clone();
                self.advance();
                Ok(value)
            }
            _ => Err(ParseError::unexpected(
                "identifier or string",
                self.current().kind.clone(),
                self.current().position,
            )),
        }
    }

    // --- Expressions ---

    /// Parses an expression.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if no expression starts at the current
    /// token.
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_additive()
    }

    /// Parses an addition/subtraction level expression.
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match &self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parses a multiplication/division level expression.
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_primary()?;

        loop {
            let op = match &self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_primary()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match &self.current().kind {
            TokenKind::Identifier(_) => {
                // Function call: identifier immediately followed by `(`,
                // with a single identifier argument
                if matches!(self.peek().kind, TokenKind::LeftParen) {
                    let name = self.expect_identifier()?;
                    self.expect(&TokenKind::LeftParen)?;
                    let argument = self.expect_identifier()?;
                    self.expect(&TokenKind::RightParen)?;
                    return Ok(Expr::FunctionCall { name, argument });
                }

                let first = self.parse_dotted_identifier()?;
                self.parse_concatenation(ConcatPart::Identifier(first))
            }
            TokenKind::String(_) => {
                let first = self.expect_string()?;
                self.parse_concatenation(ConcatPart::String(first))
            }
            TokenKind::Integer(value) => {
                let value = *value;
                self.advance();
                Ok(Expr::Number(Number::Integer(value)))
            }
            TokenKind::Float(value) => {
                let value = *value;
                self.advance();
                Ok(Expr::Number(Number::Float(value)))
            }
            _ => Err(ParseError::unexpected(
                "expression",
                self.current().kind.clone(),
                self.current().position,
            )),
        }
    }

    /// Parses an identifier with optional dotted field access
    /// (e.g., `activity.id`).
    fn parse_dotted_identifier(&mut self) -> Result<String, ParseError> {
        let name = self.expect_identifier()?;
        if self.check(&TokenKind::Dot) {
            self.advance();
            let field = self.expect_identifier()?;
            Ok(format!("{name}.{field}"))
        } else {
            Ok(name)
        }
    }

    /// Collects a `+`-chained concatenation starting from the given part.
    ///
    /// Once the left operand of the first observed `+` is an identifier or
    /// string, the scan commits to concatenation: each `+` is consumed, and
    /// the chain stops at the first continuation that is neither an
    /// identifier nor a string, leaving that token for the caller. A chain
    /// of one part collapses back to a plain expression.
    fn parse_concatenation(&mut self, first: ConcatPart) -> Result<Expr, ParseError> {
        let mut parts = vec![first];

        while self.check(&TokenKind::Plus) {
            self.advance();
            match &self.current().kind {
                TokenKind::Identifier(_) => {
                    let name = self.parse_dotted_identifier()?;
                    parts.push(ConcatPart::Identifier(name));
                }
                TokenKind::String(value) => {
                    parts.push(ConcatPart::String(value.clone()));
                    self.advance();
                }
                _ => break,
            }
        }

        if parts.len() == 1 {
            Ok(match parts.swap_remove(0) {
                ConcatPart::Identifier(name) => Expr::Identifier(name),
                ConcatPart::String(value) => Expr::String(value),
            })
        } else {
            Ok(Expr::Concatenation(parts))
        }
    }

    // --- Helper methods ---

    /// Returns the current token.
    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    /// Returns the next token without advancing.
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos + 1).unwrap_or(&self.eof)
    }

    /// Advances to the next token, sticking at the last one.
    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Checks if the current token matches the given kind.
    fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current().kind) == core::mem::discriminant(kind)
    }

    /// Checks if the current token is the given keyword.
    fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.current().kind, TokenKind::Keyword(kw) if *kw == keyword)
    }

    /// Expects the current token to be the given kind.
    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected(
                format!("{kind:?}"),
                self.current().kind.clone(),
                self.current().position,
            ))
        }
    }

    /// Expects the current token to be the given keyword.
    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected(
                keyword.as_str(),
                self.current().kind.clone(),
                self.current().position,
            ))
        }
    }

    /// Expects and returns an identifier.
    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match &self.current().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(ParseError::unexpected(
                "identifier",
                self.current().kind.clone(),
                self.current().position,
            )),
        }
    }

    /// Expects and returns a string literal.
    fn expect_string(&mut self) -> Result<String, ParseError> {
        match &self.current().kind {
            TokenKind::String(value) => {
                let value = value.clone();
                self.advance();
                Ok(value)
            }
            _ => Err(ParseError::unexpected(
                "string",
                self.current().kind.clone(),
                self.current().position,
            )),
        }
    }
}
