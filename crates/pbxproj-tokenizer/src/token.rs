//! Token types for the project-file tokenizer.

use crate::Span;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structural tokens
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `=`
    Equals,

    // Atom tokens
    /// Bare (unquoted) atom: `PBXGroup`, `46`, `sourcecode.c.objc`
    BareAtom,
    /// Quoted atom, double or single quotes: `"<group>"`, `'a b'`
    QuotedAtom,

    // Comment tokens
    /// Block comment: `/* ... */`
    BlockComment,
    /// Line comment: `// ...`
    LineComment,

    // Whitespace tokens (significant for comment attachment)
    /// Horizontal whitespace: spaces and tabs
    Whitespace,
    /// Newline: `\n` or `\r\n`
    Newline,

    // Special tokens
    /// End of file
    Eof,
    /// Tokenizer error (unterminated quote or comment, unrecognized input)
    Error,
}

impl TokenKind {
    /// Whether this token is trivia (whitespace or comments).
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::BlockComment
                | TokenKind::LineComment
        )
    }

    /// Whether this token is an atom.
    pub fn is_atom(&self) -> bool {
        matches!(self, TokenKind::BareAtom | TokenKind::QuotedAtom)
    }
}

/// A token with its kind, span, and source text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in the source text.
    pub span: Span,
    /// The source text of this token.
    pub text: &'src str,
}

impl<'src> Token<'src> {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span, text: &'src str) -> Self {
        Self { kind, span, text }
    }
}

/// Quoting style of an atom as it appeared in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quote {
    /// Bare word.
    #[default]
    None,
    /// `"..."`
    Double,
    /// `'...'`
    Single,
}

impl Quote {
    /// The delimiter character, if quoted.
    pub fn delimiter(self) -> Option<char> {
        match self {
            Quote::None => None,
            Quote::Double => Some('"'),
            Quote::Single => Some('\''),
        }
    }

    /// Whether this is a quoted style.
    pub fn is_quoted(self) -> bool {
        self != Quote::None
    }
}
