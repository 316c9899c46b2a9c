use crate::lexer::{Span, TokenKind};
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("expected next token to be {expected}, got {actual} instead")]
    UnexpectedToken {
        expected: TokenKind,
        actual: TokenKind,
    },
    #[error("no prefix parse function for {0} found")]
    NoPrefixParseFunction(TokenKind),
    #[error("could not parse {0:?} as integer")]
    InvalidIntegerLiteral(CompactString),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    pub span: Span,
}

impl ParserError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::UnexpectedToken { .. } => "PAR001",
            ParserErrorKind::NoPrefixParseFunction(_) => "PAR002",
            ParserErrorKind::InvalidIntegerLiteral(_) => "PAR003",
        }
    }
}
