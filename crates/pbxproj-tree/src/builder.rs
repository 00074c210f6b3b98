//! Recursive-descent document builder.
//!
//! Grammar, informally:
//!
//! ```text
//! document = "{" field* "}"
//! field    = atom "=" value ";"
//! value    = atom | "{" field* "}" | "(" [value ("," value)* [","]] ")"
//! ```
//!
//! The root `objects` map is special: each of its entries is promoted to a
//! [`Record`] and filed under the section named by its `isa` field.

use pbxproj_tokenizer::{Atom, CommentStyle, Lexeme, Lexer, Span};

use crate::diagnostic::{BuildError, ParseError, ParseErrorKind};
use crate::document::{Document, OBJECTS_KEY, Record, RootEntry};
use crate::scalar::is_identifier;
use crate::value::{Array, Field, Key, Object, Reference, Scalar, Value};

/// Builds a [`Document`] from source text.
pub struct DocumentBuilder<'src> {
    lexer: Lexer<'src>,
    doc: Document,
    /// Set while reading between records of `objects`, where section
    /// delimiter comments are meaningful.
    in_objects: bool,
    seen_objects: bool,
}

impl<'src> DocumentBuilder<'src> {
    /// Create a builder over `source`.
    pub fn new(source: &'src str) -> Self {
        let mut doc = Document::new();
        doc.head_comment = None;
        doc.entries.clear();
        Self {
            lexer: Lexer::new(source),
            doc,
            in_objects: false,
            seen_objects: false,
        }
    }

    /// Build the document. Any error discards everything built so far.
    pub fn build(mut self) -> Result<Document, BuildError> {
        let open = loop {
            match self.lexer.next_lexeme()? {
                Lexeme::Comment(comment) => {
                    if comment.style == CommentStyle::Line && self.doc.head_comment.is_none() {
                        self.doc.head_comment = Some(comment.text.to_string());
                    }
                }
                other => break other,
            }
        };
        match open {
            Lexeme::LBrace(_) => {}
            other => return Err(self.expected("`{`", other)),
        }

        self.parse_root()?;

        match self.next()? {
            Lexeme::Eof(_) => {}
            other => return Err(self.error(ParseErrorKind::TrailingContent, other.span())),
        }

        tracing::debug!(
            sections = self.doc.sections.len(),
            objects = self.doc.table.len(),
            "built document"
        );
        Ok(self.doc)
    }

    fn parse_root(&mut self) -> Result<(), BuildError> {
        loop {
            let atom = match self.next()? {
                Lexeme::RBrace(_) => return Ok(()),
                Lexeme::Atom(atom) => atom,
                other => return Err(self.expected("field name or `}`", other)),
            };
            let key = key_from_atom(&atom);
            self.expect_equals()?;

            if key.as_str() == OBJECTS_KEY {
                if self.seen_objects {
                    return Err(self.error(
                        ParseErrorKind::Expected {
                            expected: "a single `objects` map",
                            found: "a second one".to_string(),
                        },
                        atom.span,
                    ));
                }
                self.seen_objects = true;
                match self.next()? {
                    Lexeme::LBrace(_) => {}
                    other => return Err(self.expected("`{`", other)),
                }
                self.parse_objects()?;
                self.expect_semicolon()?;
                self.doc.entries.push(RootEntry::Objects(key));
                continue;
            }

            let first = self.next()?;
            let value = self.parse_value(first)?;
            self.expect_semicolon()?;
            tracing::trace!(key = key.as_str(), "root field");
            self.doc.entries.push(RootEntry::Field(Field { key, value }));
        }
    }

    fn parse_objects(&mut self) -> Result<(), BuildError> {
        loop {
            self.in_objects = true;
            let next = self.next();
            self.in_objects = false;
            match next? {
                Lexeme::RBrace(_) => return Ok(()),
                Lexeme::Atom(atom) => self.parse_record(atom)?,
                other => return Err(self.expected("record identifier or `}`", other)),
            }
        }
    }

    fn parse_record(&mut self, atom: Atom<'src>) -> Result<(), BuildError> {
        let id = atom.text.to_string();
        self.expect_equals()?;
        let fields = match self.next()? {
            Lexeme::LBrace(_) => self.parse_map()?,
            Lexeme::Eof(span) => return Err(self.error(ParseErrorKind::UnexpectedEof, span)),
            other => {
                return Err(self.error(ParseErrorKind::InvalidRecord { id }, other.span()));
            }
        };
        self.expect_semicolon()?;

        let Some(isa) = fields.get("isa").and_then(Value::as_str).map(str::to_string) else {
            return Err(self.error(ParseErrorKind::MissingIsa { id }, atom.span));
        };
        if self.doc.table.contains(&id) {
            return Err(self.error(ParseErrorKind::DuplicateIdentifier { id }, atom.span));
        }

        tracing::debug!(%id, %isa, "record");
        let record = Record {
            id: Scalar::from_source(atom.text, atom.quote),
            comment: atom.comment.map(str::to_string),
            fields,
        };
        let index = self.doc.push_section(&isa);
        self.doc.store(index, record);
        Ok(())
    }

    /// Parse fields up to and including the closing `}`.
    fn parse_map(&mut self) -> Result<Object, BuildError> {
        let mut object = Object::new();
        loop {
            let atom = match self.next()? {
                Lexeme::RBrace(_) => return Ok(object),
                Lexeme::Atom(atom) => atom,
                other => return Err(self.expected("field name or `}`", other)),
            };
            let key = key_from_atom(&atom);
            self.expect_equals()?;
            let first = self.next()?;
            let value = self.parse_value(first)?;
            self.expect_semicolon()?;
            tracing::trace!(key = key.as_str(), kind = value.kind_name(), "field");
            object.fields.push(Field { key, value });
        }
    }

    /// Parse items up to and including the closing `)`.
    fn parse_array(&mut self) -> Result<Array, BuildError> {
        let mut array = Array::default();
        loop {
            match self.next()? {
                Lexeme::RParen(_) => return Ok(array),
                first => {
                    let value = self.parse_value(first)?;
                    array.items.push(value);
                }
            }
            match self.next()? {
                Lexeme::Comma(_) => array.trailing_comma = true,
                Lexeme::RParen(_) => {
                    array.trailing_comma = false;
                    return Ok(array);
                }
                other => return Err(self.expected("`,` or `)`", other)),
            }
        }
    }

    fn parse_value(&mut self, first: Lexeme<'src>) -> Result<Value, BuildError> {
        match first {
            Lexeme::Atom(atom) => Ok(value_from_atom(&atom)),
            Lexeme::LBrace(_) => Ok(Value::Object(self.parse_map()?)),
            Lexeme::LParen(_) => Ok(Value::Array(self.parse_array()?)),
            other => Err(self.expected("a value", other)),
        }
    }

    /// Next lexeme, skipping standalone comments.
    fn next(&mut self) -> Result<Lexeme<'src>, BuildError> {
        loop {
            match self.lexer.next_lexeme()? {
                Lexeme::Comment(comment) => {
                    if self.in_objects
                        && let Some(isa) = section_begin(comment.text)
                    {
                        tracing::debug!(isa, "section");
                        self.doc.push_section(isa);
                    }
                }
                other => return Ok(other),
            }
        }
    }

    fn expect_equals(&mut self) -> Result<(), BuildError> {
        match self.next()? {
            Lexeme::Equals(_) => Ok(()),
            other => Err(self.expected("`=`", other)),
        }
    }

    fn expect_semicolon(&mut self) -> Result<(), BuildError> {
        match self.next()? {
            Lexeme::Semicolon(_) => Ok(()),
            other => Err(self.expected("`;`", other)),
        }
    }

    fn expected(&self, expected: &'static str, found: Lexeme<'_>) -> BuildError {
        let kind = match found {
            Lexeme::Eof(_) => ParseErrorKind::UnexpectedEof,
            _ => ParseErrorKind::Expected {
                expected,
                found: found.describe(),
            },
        };
        self.error(kind, found.span())
    }

    fn error(&self, kind: ParseErrorKind, span: Span) -> BuildError {
        BuildError::Parse(ParseError::new(kind, span, self.lexer.source()))
    }
}

/// `Begin PBXGroup section` → `PBXGroup`.
fn section_begin(comment: &str) -> Option<&str> {
    comment
        .strip_prefix("Begin ")?
        .strip_suffix(" section")
        .filter(|isa| !isa.is_empty())
}

fn key_from_atom(atom: &Atom<'_>) -> Key {
    Key {
        name: Scalar::from_source(atom.text, atom.quote),
        comment: atom.comment.map(str::to_string),
    }
}

fn value_from_atom(atom: &Atom<'_>) -> Value {
    let scalar = Scalar::from_source(atom.text, atom.quote);
    if atom.comment.is_some() || (!atom.quote.is_quoted() && is_identifier(atom.text)) {
        Value::Reference(Reference {
            id: scalar,
            comment: atom.comment.map(str::to_string),
        })
    } else {
        Value::Scalar(scalar)
    }
}

impl Document {
    /// Parse a project file.
    pub fn parse(source: &str) -> Result<Self, BuildError> {
        DocumentBuilder::new(source).build()
    }
}
