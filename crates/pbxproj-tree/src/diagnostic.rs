//! Build errors and their diagnostic rendering.

use ariadne::{Color, Label, Report, ReportKind, Source};
use pbxproj_tokenizer::{Span, SyntaxError, SyntaxErrorKind};

/// What the builder found wrong with a well-tokenized input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// A specific token was required.
    #[error("expected {expected}, found {found}")]
    Expected {
        /// What the grammar required.
        expected: &'static str,
        /// What was there instead.
        found: String,
    },
    /// Input ended inside a structure.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// Something follows the closing `}` of the root map.
    #[error("trailing content after the root object")]
    TrailingContent,
    /// A record in `objects` has no `isa` field.
    #[error("record {id} has no isa field")]
    MissingIsa {
        /// The record identifier.
        id: String,
    },
    /// An entry in `objects` is not a field map.
    #[error("object {id} is not a field map")]
    InvalidRecord {
        /// The entry key.
        id: String,
    },
    /// Two records share an identifier.
    #[error("duplicate identifier {id}")]
    DuplicateIdentifier {
        /// The repeated identifier.
        id: String,
    },
}

/// A grammatical error with source location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Source location.
    pub span: Span,
    /// 1-based line of the span start.
    pub line: usize,
    /// 1-based column (in characters) of the span start.
    pub column: usize,
}

impl ParseError {
    /// Create an error, resolving its line and column against `source`.
    pub fn new(kind: ParseErrorKind, span: Span, source: &str) -> Self {
        let (line, column) = span.line_col(source);
        Self {
            kind,
            span,
            line,
            column,
        }
    }
}

/// Any error that aborts building a document. No partial document survives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Malformed lexical structure.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// Malformed grammatical structure.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl BuildError {
    /// Source location of the error.
    pub fn span(&self) -> Span {
        match self {
            BuildError::Syntax(e) => e.span,
            BuildError::Parse(e) => e.span,
        }
    }

    /// 1-based `(line, column)` of the error.
    pub fn position(&self) -> (usize, usize) {
        match self {
            BuildError::Syntax(e) => (e.line, e.column),
            BuildError::Parse(e) => (e.line, e.column),
        }
    }

    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let report = self.build_report(filename);
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        let span = self.span();
        let range = span.start as usize..span.end.max(span.start + 1) as usize;
        let label = |message: &str| {
            Label::new((filename, range.clone()))
                .with_message(message)
                .with_color(Color::Red)
        };
        let report = Report::build(ReportKind::Error, (filename, range.clone()));

        match self {
            BuildError::Syntax(e) => match &e.kind {
                SyntaxErrorKind::UnterminatedQuote => report
                    .with_message("unterminated quoted string")
                    .with_label(label("string starts here"))
                    .with_help("add the closing quote"),
                SyntaxErrorKind::UnterminatedComment => report
                    .with_message("unterminated comment")
                    .with_label(label("comment starts here"))
                    .with_help("add a closing '*/'"),
                SyntaxErrorKind::UnexpectedCharacter(c) => report
                    .with_message(format!("unexpected character {c:?}"))
                    .with_label(label("not valid here")),
            },
            BuildError::Parse(e) => match &e.kind {
                ParseErrorKind::Expected { expected, found } => report
                    .with_message(format!("expected {expected}"))
                    .with_label(label(&format!("found {found}"))),
                ParseErrorKind::UnexpectedEof => report
                    .with_message("unexpected end of input")
                    .with_label(label("input ends here"))
                    .with_help("a '}' or ')' is missing"),
                ParseErrorKind::TrailingContent => report
                    .with_message("trailing content after the root object")
                    .with_label(label("unexpected content here"))
                    .with_help("the root '{...}' is the entire document; nothing can follow it"),
                ParseErrorKind::MissingIsa { id } => report
                    .with_message(format!("record {id} has no isa field"))
                    .with_label(label("record defined here"))
                    .with_help("every entry of `objects` needs an `isa = Kind;` field"),
                ParseErrorKind::InvalidRecord { id } => report
                    .with_message(format!("object {id} is not a field map"))
                    .with_label(label("expected '{' here")),
                ParseErrorKind::DuplicateIdentifier { id } => report
                    .with_message(format!("duplicate identifier {id}"))
                    .with_label(label("defined again here"))
                    .with_help("each identifier must appear only once in `objects`"),
            },
        }
    }
}
