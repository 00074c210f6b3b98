//! Tokenizer for Xcode project files.

use crate::{Span, Token, TokenKind};
use tracing::trace;

/// A tokenizer that produces tokens, trivia included, from project-file text.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
        }
    }

    /// The full source text.
    #[inline]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Get the current byte position.
    #[inline]
    pub fn position(&self) -> u32 {
        self.pos
    }

    /// Check if we're at the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Peek at the nth character (0-indexed) without consuming.
    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    /// Check if the remaining text starts with the given prefix.
    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    /// Create a token from the given start position to current position.
    fn token(&self, kind: TokenKind, start: u32) -> Token<'src> {
        let span = Span::new(start, self.pos);
        let text = &self.source[start as usize..self.pos as usize];
        trace!("Token {:?} at {:?}: {:?}", kind, span, text);
        Token::new(kind, span, text)
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return self.token(TokenKind::Eof, start);
        };

        match c {
            // Structural tokens
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            '=' => self.single(TokenKind::Equals),

            '"' | '\'' => self.tokenize_quoted_atom(c),

            '/' if self.starts_with("/*") => self.tokenize_block_comment(),
            '/' if self.starts_with("//") => self.tokenize_line_comment(),

            ' ' | '\t' => self.tokenize_whitespace(),

            '\n' => self.single(TokenKind::Newline),
            '\r' if self.peek_nth(1) == Some('\n') => {
                self.advance();
                self.advance();
                self.token(TokenKind::Newline, start)
            }

            _ if is_bare_atom_char(c) => self.tokenize_bare_atom(),

            // Unrecognized character (stray `\r`, control characters)
            _ => self.single(TokenKind::Error),
        }
    }

    /// Consume one character as a token of the given kind.
    fn single(&mut self, kind: TokenKind) -> Token<'src> {
        let start = self.pos;
        self.advance();
        self.token(kind, start)
    }

    /// Tokenize horizontal whitespace (spaces and tabs).
    fn tokenize_whitespace(&mut self) -> Token<'src> {
        let start = self.pos;
        while let Some(' ' | '\t') = self.peek() {
            self.advance();
        }
        self.token(TokenKind::Whitespace, start)
    }

    /// Tokenize a bare atom. Stops before a `/*` so `path/* c */` keeps its comment.
    fn tokenize_bare_atom(&mut self) -> Token<'src> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_bare_atom_char(c) || self.starts_with("/*") {
                break;
            }
            self.advance();
        }
        self.token(TokenKind::BareAtom, start)
    }

    /// Tokenize a quoted atom, delimiters and escapes included verbatim.
    fn tokenize_quoted_atom(&mut self, quote: char) -> Token<'src> {
        let start = self.pos;
        self.advance();

        loop {
            match self.peek() {
                None => return self.token(TokenKind::Error, start),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_some() {
                        self.advance();
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        self.token(TokenKind::QuotedAtom, start)
    }

    /// Tokenize a block comment: `/* ... */`.
    fn tokenize_block_comment(&mut self) -> Token<'src> {
        let start = self.pos;
        self.advance();
        self.advance();

        loop {
            if self.starts_with("*/") {
                self.advance();
                self.advance();
                return self.token(TokenKind::BlockComment, start);
            }
            if self.advance().is_none() {
                return self.token(TokenKind::Error, start);
            }
        }
    }

    /// Tokenize a line comment: `// ...`.
    fn tokenize_line_comment(&mut self) -> Token<'src> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' {
                break;
            }
            self.advance();
        }
        self.token(TokenKind::LineComment, start)
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

/// Check if a character can appear in a bare atom.
///
/// Anything that is not whitespace, a control character, grammar punctuation,
/// or a quote may appear unquoted.
pub fn is_bare_atom_char(c: char) -> bool {
    !matches!(
        c,
        '{' | '}' | '(' | ')' | ',' | ';' | '=' | '"' | '\''
    ) && !c.is_whitespace()
        && !c.is_control()
}
