use super::{LineBreaks, Token, TokenKind};

/// Interface for creating new token formatters.
pub trait TokenFormatter {
    /// Formats a token into a string.
    fn format(&self, token: &Token) -> String;
}

pub struct BasicFormatter<'src> {
    text: &'src str,
}

impl<'src> BasicFormatter<'src> {
    pub fn new(text: &'src str) -> Self {
        Self { text }
    }

    fn format_kind(kind: TokenKind) -> &'static str {
        match kind {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::LeftParenthesis => "LEFT_PAREN",
            TokenKind::RightParenthesis => "RIGHT_PAREN",
            TokenKind::LeftBrace => "LEFT_BRACE",
            TokenKind::RightBrace => "RIGHT_BRACE",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Equal => "ASSIGN",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Bang => "BANG",
            TokenKind::Star => "ASTERISK",
            TokenKind::Slash => "SLASH",
            TokenKind::LessThan => "LESS",
            TokenKind::GreaterThan => "GREATER",
            TokenKind::EqualEqual => "EQUAL_EQUAL",
            TokenKind::BangEqual => "BANG_EQUAL",
            TokenKind::IntegerLiteral => "INT",
            TokenKind::StringLiteral => "STRING",
            TokenKind::Ident => "IDENTIFIER",
            TokenKind::KeywordFunction => "FUNCTION",
            TokenKind::KeywordLet => "LET",
            TokenKind::KeywordTrue => "TRUE",
            TokenKind::KeywordFalse => "FALSE",
            TokenKind::KeywordIf => "IF",
            TokenKind::KeywordElse => "ELSE",
            TokenKind::KeywordReturn => "RETURN",
        }
    }
}

impl<'src> TokenFormatter for BasicFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        let lexeme = self.text.get(token.span.range()).unwrap_or("");
        format!("{} {}", Self::format_kind(token.kind), lexeme)
    }
}

pub struct LineFormatter<'src> {
    inner: BasicFormatter<'src>,
    line_breaks: LineBreaks,
}

impl<'src> LineFormatter<'src> {
    pub fn new(text: &'src str, line_breaks: LineBreaks) -> Self {
        Self {
            inner: BasicFormatter::new(text),
            line_breaks,
        }
    }
}

impl<'src> TokenFormatter for LineFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        let line = self.line_breaks.get_line_from_span(token.span);
        format!("({line}) {}", self.inner.format(token))
    }
}

pub struct DebugFormatter;

impl TokenFormatter for DebugFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token:?}")
    }
}
