//! Lexer: structural tokens and atoms, with same-line comments attached.
//!
//! The [`Tokenizer`] reports every byte of the input, trivia included. The
//! lexer drops whitespace and turns each atom into an [`Atom`] that carries
//! its quoting style and any block comment that follows it on the same line,
//! which is how identifier annotations such as `29B97316FDCFA39411CA2CEA /* main.m */`
//! are captured. Comments that do not follow an atom are reported on their own.

use crate::{Quote, Span, SyntaxError, SyntaxErrorKind, Token, TokenKind, Tokenizer};

/// An atom: a bare or quoted word, with its attached comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom<'src> {
    /// Span of the atom, delimiters included (comment excluded).
    pub span: Span,
    /// The atom's text without quote delimiters. Escapes are left as written.
    pub text: &'src str,
    /// How the atom was quoted.
    pub quote: Quote,
    /// Text of a block comment following on the same line, trimmed. The
    /// writer puts exactly one space inside each delimiter.
    pub comment: Option<&'src str>,
}

/// Whether a standalone comment was a block or a line comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `/* ... */`
    Block,
    /// `// ...`
    Line,
}

/// A comment that is not attached to an atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment<'src> {
    /// Span of the whole comment.
    pub span: Span,
    /// Comment body without delimiters, trimmed.
    pub text: &'src str,
    /// Block or line.
    pub style: CommentStyle,
}

/// A lexeme produced by the [`Lexer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lexeme<'src> {
    /// `{`
    LBrace(Span),
    /// `}`
    RBrace(Span),
    /// `(`
    LParen(Span),
    /// `)`
    RParen(Span),
    /// `,`
    Comma(Span),
    /// `;`
    Semicolon(Span),
    /// `=`
    Equals(Span),
    /// A bare or quoted atom.
    Atom(Atom<'src>),
    /// A standalone comment.
    Comment(Comment<'src>),
    /// End of input.
    Eof(Span),
}

impl Lexeme<'_> {
    /// Source span of this lexeme.
    pub fn span(&self) -> Span {
        match self {
            Lexeme::LBrace(span)
            | Lexeme::RBrace(span)
            | Lexeme::LParen(span)
            | Lexeme::RParen(span)
            | Lexeme::Comma(span)
            | Lexeme::Semicolon(span)
            | Lexeme::Equals(span)
            | Lexeme::Eof(span) => *span,
            Lexeme::Atom(atom) => atom.span,
            Lexeme::Comment(comment) => comment.span,
        }
    }

    /// Short human-readable description, used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Lexeme::LBrace(_) => "`{`".to_string(),
            Lexeme::RBrace(_) => "`}`".to_string(),
            Lexeme::LParen(_) => "`(`".to_string(),
            Lexeme::RParen(_) => "`)`".to_string(),
            Lexeme::Comma(_) => "`,`".to_string(),
            Lexeme::Semicolon(_) => "`;`".to_string(),
            Lexeme::Equals(_) => "`=`".to_string(),
            Lexeme::Atom(atom) => format!("atom `{}`", atom.text),
            Lexeme::Comment(_) => "comment".to_string(),
            Lexeme::Eof(_) => "end of input".to_string(),
        }
    }
}

/// A lexer over project-file text.
#[derive(Clone)]
pub struct Lexer<'src> {
    tokenizer: Tokenizer<'src>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            tokenizer: Tokenizer::new(source),
        }
    }

    /// The full source text.
    pub fn source(&self) -> &'src str {
        self.tokenizer.source()
    }

    /// Get the next lexeme. Errors are fatal: the lexer should not be polled again.
    pub fn next_lexeme(&mut self) -> Result<Lexeme<'src>, SyntaxError> {
        loop {
            let token = self.tokenizer.next_token();
            let span = token.span;
            let lexeme = match token.kind {
                TokenKind::Whitespace | TokenKind::Newline => continue,
                TokenKind::LBrace => Lexeme::LBrace(span),
                TokenKind::RBrace => Lexeme::RBrace(span),
                TokenKind::LParen => Lexeme::LParen(span),
                TokenKind::RParen => Lexeme::RParen(span),
                TokenKind::Comma => Lexeme::Comma(span),
                TokenKind::Semicolon => Lexeme::Semicolon(span),
                TokenKind::Equals => Lexeme::Equals(span),
                TokenKind::Eof => Lexeme::Eof(span),
                TokenKind::BareAtom | TokenKind::QuotedAtom => {
                    let mut atom = atom_from_token(&token);
                    atom.comment = self.trailing_comment();
                    Lexeme::Atom(atom)
                }
                TokenKind::BlockComment => Lexeme::Comment(Comment {
                    span,
                    text: block_comment_body(token.text),
                    style: CommentStyle::Block,
                }),
                TokenKind::LineComment => Lexeme::Comment(Comment {
                    span,
                    text: token.text.trim_start_matches('/').trim(),
                    style: CommentStyle::Line,
                }),
                TokenKind::Error => return Err(self.error(&token)),
            };
            return Ok(lexeme);
        }
    }

    /// Consume a block comment that follows on the same line, if any.
    fn trailing_comment(&mut self) -> Option<&'src str> {
        let mut lookahead = self.tokenizer.clone();
        loop {
            let token = lookahead.next_token();
            match token.kind {
                TokenKind::Whitespace => continue,
                TokenKind::BlockComment => {
                    self.tokenizer = lookahead;
                    return Some(block_comment_body(token.text));
                }
                _ => return None,
            }
        }
    }

    fn error(&self, token: &Token<'src>) -> SyntaxError {
        let kind = if token.text.starts_with("/*") {
            SyntaxErrorKind::UnterminatedComment
        } else if token.text.starts_with(['"', '\'']) {
            SyntaxErrorKind::UnterminatedQuote
        } else {
            SyntaxErrorKind::UnexpectedCharacter(token.text.chars().next().unwrap_or('\0'))
        };
        SyntaxError::new(kind, token.span, self.source())
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Lexeme<'src>, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_lexeme() {
            Ok(Lexeme::Eof(_)) => None,
            other => Some(other),
        }
    }
}

fn atom_from_token<'src>(token: &Token<'src>) -> Atom<'src> {
    let (text, quote) = match token.kind {
        TokenKind::QuotedAtom => {
            let quote = if token.text.starts_with('\'') {
                Quote::Single
            } else {
                Quote::Double
            };
            (&token.text[1..token.text.len() - 1], quote)
        }
        _ => (token.text, Quote::None),
    };
    Atom {
        span: token.span,
        text,
        quote,
        comment: None,
    }
}

fn block_comment_body(text: &str) -> &str {
    text.strip_prefix("/*")
        .and_then(|s| s.strip_suffix("*/"))
        .unwrap_or(text)
        .trim()
}
