//! Lexical errors.

use crate::Span;

/// What went wrong while tokenizing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxErrorKind {
    /// A quoted atom was not closed before end of input.
    #[error("unterminated quoted string")]
    UnterminatedQuote,
    /// A block comment was not closed before end of input.
    #[error("unterminated comment")]
    UnterminatedComment,
    /// A character that cannot start any token.
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
}

/// A fatal lexical error with its source position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct SyntaxError {
    /// The kind of error.
    pub kind: SyntaxErrorKind,
    /// Source location.
    pub span: Span,
    /// 1-based line of the span start.
    pub line: usize,
    /// 1-based column (in characters) of the span start.
    pub column: usize,
}

impl SyntaxError {
    /// Create an error, resolving its line and column against `source`.
    pub fn new(kind: SyntaxErrorKind, span: Span, source: &str) -> Self {
        let (line, column) = span.line_col(source);
        Self {
            kind,
            span,
            line,
            column,
        }
    }
}
