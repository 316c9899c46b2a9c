use crate::lexer::Span;
use crate::parser::ast::{InfixOperator, PrefixOperator};
use crate::string::IdentName;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum RuntimeErrorKind {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(IdentName),
    #[error("unknown operator: {operator}{operand}")]
    UnknownPrefixOperator {
        operator: PrefixOperator,
        operand: &'static str,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: &'static str,
        operator: InfixOperator,
        right: &'static str,
    },
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: &'static str,
        operator: InfixOperator,
        right: &'static str,
    },
    #[error("not a function: {0}")]
    NotAFunction(&'static str),
    #[error("wrong number of arguments: got {actual}, want {expected}")]
    WrongArgumentCount { actual: usize, expected: usize },
    #[error("division by zero")]
    DivisionByZero,
}

#[derive(Debug, Error, Clone)]
#[error("{kind}")]
pub struct RuntimeError {
    #[source]
    pub kind: RuntimeErrorKind,
    pub span: Span,
}

impl RuntimeError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            RuntimeErrorKind::IdentifierNotFound(_) => "RT001",
            RuntimeErrorKind::UnknownPrefixOperator { .. } => "RT002",
            RuntimeErrorKind::UnknownInfixOperator { .. } => "RT003",
            RuntimeErrorKind::TypeMismatch { .. } => "RT004",
            RuntimeErrorKind::NotAFunction(_) => "RT005",
            RuntimeErrorKind::WrongArgumentCount { .. } => "RT006",
            RuntimeErrorKind::DivisionByZero => "RT007",
        }
    }
}
