pub mod ast;
pub mod error;
pub mod formatter;

use crate::lexer::{Lexer, Token, TokenKind};
use crate::string::Ident;
use ast::{
    BlockStatement, BooleanLiteral, CallExpression, Expression, ExpressionStatement,
    FunctionLiteral, IfExpression, InfixExpression, InfixOperator, IntegerLiteral, LetStatement,
    PrefixExpression, PrefixOperator, Program, ReturnStatement, Statement, StringLiteral,
};
pub use error::{ParserError, ParserErrorKind};
use std::sync::Arc;

/// Binding powers from weakest to strongest. Token kinds without an infix
/// role sit at `Lowest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::EqualEqual | TokenKind::BangEqual => Precedence::Equals,
            TokenKind::LessThan | TokenKind::GreaterThan => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Star | TokenKind::Slash => Precedence::Product,
            TokenKind::LeftParenthesis => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<ParserError>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let cur_token = lexer.next_token();
        let peek_token = lexer.next_token();
        Self {
            lexer,
            cur_token,
            peek_token,
            errors: Vec::new(),
        }
    }

    /// Parses the whole token stream into a program.
    ///
    /// Errors never abort the parse. Each failed statement is dropped, its
    /// error recorded, and parsing resumes at the next token so the
    /// top-level loop always makes progress.
    pub fn parse_program(mut self) -> (Program, Vec<ParserError>) {
        let mut statements = Vec::new();

        while self.cur_token.kind != TokenKind::Eof {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        (Program::new(statements), self.errors)
    }

    fn next_token(&mut self) {
        self.cur_token = self.peek_token;
        self.peek_token = self.lexer.next_token();
    }

    fn expect_peek(&mut self, expected: TokenKind) -> bool {
        if self.peek_token.kind == expected {
            self.next_token();
            true
        } else {
            self.errors.push(ParserError {
                kind: ParserErrorKind::UnexpectedToken {
                    expected,
                    actual: self.peek_token.kind,
                },
                span: self.peek_token.span,
            });
            false
        }
    }

    fn cur_ident(&self) -> Ident {
        let lexeme = self
            .lexer
            .get_lexeme(&self.cur_token.span)
            .expect("Lexed token has a valid span");
        Ident {
            name: Arc::from(lexeme),
            span: self.cur_token.span,
        }
    }
}

// Statement parsing
impl<'src> Parser<'src> {
    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur_token.kind {
            TokenKind::KeywordLet => self.parse_let_statement().map(Statement::Let),
            TokenKind::KeywordReturn => self.parse_return_statement().map(Statement::Return),
            _ => self.parse_expression_statement().map(Statement::Expression),
        }
    }

    fn parse_let_statement(&mut self) -> Option<LetStatement> {
        let start = self.cur_token.span;

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.cur_ident();

        if !self.expect_peek(TokenKind::Equal) {
            return None;
        }
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        let mut span = start.merge(&value.span());

        if self.peek_token.kind == TokenKind::Semicolon {
            self.next_token();
            span = span.merge(&self.cur_token.span);
        }

        Some(LetStatement { name, value, span })
    }

    fn parse_return_statement(&mut self) -> Option<ReturnStatement> {
        let start = self.cur_token.span;
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        let mut span = start.merge(&value.span());

        if self.peek_token.kind == TokenKind::Semicolon {
            self.next_token();
            span = span.merge(&self.cur_token.span);
        }

        Some(ReturnStatement { value, span })
    }

    fn parse_expression_statement(&mut self) -> Option<ExpressionStatement> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        let mut span = expr.span();

        if self.peek_token.kind == TokenKind::Semicolon {
            self.next_token();
            span = span.merge(&self.cur_token.span);
        }

        Some(ExpressionStatement { expr, span })
    }

    // The body of a block runs until the closing brace. A missing brace ends
    // the block at end of input rather than erroring.
    fn parse_block_statement(&mut self) -> BlockStatement {
        let start = self.cur_token.span;
        let mut statements = Vec::new();

        self.next_token();
        while self.cur_token.kind != TokenKind::RightBrace && self.cur_token.kind != TokenKind::Eof
        {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        let span = start.merge(&self.cur_token.span);
        BlockStatement { statements, span }
    }
}

// Pratt parser for expressions
impl<'src> Parser<'src> {
    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        loop {
            if self.peek_token.kind == TokenKind::Semicolon
                || precedence >= Precedence::of(self.peek_token.kind)
            {
                break;
            }
            if let Some(operator) = self.peek_infix_operator() {
                self.next_token();
                left = self.parse_infix_expression(operator, left)?;
                continue;
            }
            if self.peek_token.kind == TokenKind::LeftParenthesis {
                self.next_token();
                left = self.parse_call_expression(left)?;
                continue;
            }
            break;
        }

        Some(left)
    }

    fn peek_infix_operator(&self) -> Option<InfixOperator> {
        match self.peek_token.kind {
            TokenKind::Plus => Some(InfixOperator::Add),
            TokenKind::Minus => Some(InfixOperator::Subtract),
            TokenKind::Star => Some(InfixOperator::Multiply),
            TokenKind::Slash => Some(InfixOperator::Divide),
            TokenKind::LessThan => Some(InfixOperator::LessThan),
            TokenKind::GreaterThan => Some(InfixOperator::GreaterThan),
            TokenKind::EqualEqual => Some(InfixOperator::EqualEqual),
            TokenKind::BangEqual => Some(InfixOperator::BangEqual),
            _ => None,
        }
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.cur_token.kind {
            TokenKind::Ident => Some(Expression::Identifier(self.cur_ident())),
            TokenKind::IntegerLiteral => self.parse_integer_literal(),
            TokenKind::StringLiteral => {
                let lexeme = self
                    .lexer
                    .get_lexeme(&self.cur_token.span)
                    .expect("Lexed token has a valid span");
                Some(Expression::Str(StringLiteral {
                    value: lexeme.into(),
                    span: self.cur_token.span,
                }))
            }
            TokenKind::KeywordTrue => Some(Expression::Boolean(BooleanLiteral {
                value: true,
                span: self.cur_token.span,
            })),
            TokenKind::KeywordFalse => Some(Expression::Boolean(BooleanLiteral {
                value: false,
                span: self.cur_token.span,
            })),
            TokenKind::Bang => self.parse_prefix_expression(PrefixOperator::Bang),
            TokenKind::Minus => self.parse_prefix_expression(PrefixOperator::Minus),
            TokenKind::LeftParenthesis => self.parse_grouped_expression(),
            TokenKind::KeywordIf => self.parse_if_expression(),
            TokenKind::KeywordFunction => self.parse_function_literal(),
            kind => {
                self.errors.push(ParserError {
                    kind: ParserErrorKind::NoPrefixParseFunction(kind),
                    span: self.cur_token.span,
                });
                None
            }
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let lexeme = self
            .lexer
            .get_lexeme(&self.cur_token.span)
            .expect("Lexed token has a valid span");
        match lexeme.parse::<i64>() {
            Ok(value) => Some(Expression::Integer(IntegerLiteral {
                value,
                span: self.cur_token.span,
            })),
            Err(_) => {
                self.errors.push(ParserError {
                    kind: ParserErrorKind::InvalidIntegerLiteral(lexeme.into()),
                    span: self.cur_token.span,
                });
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self, operator: PrefixOperator) -> Option<Expression> {
        let start = self.cur_token.span;
        self.next_token();

        let rhs = self.parse_expression(Precedence::Prefix)?;
        let span = start.merge(&rhs.span());
        Some(Expression::Prefix(PrefixExpression {
            operator,
            rhs: Box::new(rhs),
            span,
        }))
    }

    fn parse_infix_expression(
        &mut self,
        operator: InfixOperator,
        lhs: Expression,
    ) -> Option<Expression> {
        let precedence = Precedence::of(self.cur_token.kind);
        self.next_token();

        let rhs = self.parse_expression(precedence)?;
        let span = lhs.span().merge(&rhs.span());
        Some(Expression::Infix(InfixExpression {
            operator,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span,
        }))
    }

    // Grouping produces no node of its own.
    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();

        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RightParenthesis) {
            return None;
        }
        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let start = self.cur_token.span;

        if !self.expect_peek(TokenKind::LeftParenthesis) {
            return None;
        }
        self.next_token();

        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RightParenthesis) {
            return None;
        }
        if !self.expect_peek(TokenKind::LeftBrace) {
            return None;
        }
        let consequence = self.parse_block_statement();
        let mut span = start.merge(&consequence.span);

        let alternative = if self.peek_token.kind == TokenKind::KeywordElse {
            self.next_token();
            if !self.expect_peek(TokenKind::LeftBrace) {
                return None;
            }
            let block = self.parse_block_statement();
            span = span.merge(&block.span);
            Some(block)
        } else {
            None
        };

        Some(Expression::If(IfExpression {
            condition: Box::new(condition),
            consequence,
            alternative,
            span,
        }))
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let start = self.cur_token.span;

        if !self.expect_peek(TokenKind::LeftParenthesis) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::LeftBrace) {
            return None;
        }
        let body = self.parse_block_statement();
        let span = start.merge(&body.span);

        Some(Expression::Function(FunctionLiteral {
            parameters,
            body: Arc::new(body),
            span,
        }))
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Ident>> {
        let mut parameters = Vec::new();

        if self.peek_token.kind == TokenKind::RightParenthesis {
            self.next_token();
            return Some(parameters);
        }

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        parameters.push(self.cur_ident());

        while self.peek_token.kind == TokenKind::Comma {
            self.next_token();
            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }
            parameters.push(self.cur_ident());
        }

        if !self.expect_peek(TokenKind::RightParenthesis) {
            return None;
        }

        Some(parameters)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let arguments = self.parse_expression_list(TokenKind::RightParenthesis)?;
        let span = function.span().merge(&self.cur_token.span);
        Some(Expression::Call(CallExpression {
            function: Box::new(function),
            arguments,
            span,
        }))
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut expressions = Vec::new();

        if self.peek_token.kind == end {
            self.next_token();
            return Some(expressions);
        }

        self.next_token();
        expressions.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token.kind == TokenKind::Comma {
            self.next_token();
            self.next_token();
            expressions.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(expressions)
    }
}
