//! Low-level project file output writer.
//!
//! Tracks the nesting depth and writes whole lines, indented or flush-left.
//! Atom rendering (quoting, identifier comments) lives here too so that the
//! document walker only decides structure.

use std::borrow::Cow;

use pbxproj_tree::{Key, Reference, Scalar, Value, can_be_bare, escape_quoted};

use crate::options::WriteOptions;

/// Low-level project file writer.
pub struct PbxWriter {
    out: String,
    depth: usize,
    options: WriteOptions,
}

impl PbxWriter {
    /// Create a new writer with default options.
    pub fn new() -> Self {
        Self::with_options(WriteOptions::default())
    }

    /// Create a new writer with the given options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self {
            out: String::new(),
            depth: 0,
            options,
        }
    }

    /// The options in effect.
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Consume the writer and return the output.
    pub fn finish(self) -> String {
        self.out
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Increase the nesting depth.
    pub fn nest(&mut self) {
        self.depth += 1;
    }

    /// Decrease the nesting depth.
    pub fn unnest(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Write indentation for the current depth.
    pub fn write_indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(self.options.indent);
        }
    }

    /// Write an indented line.
    pub fn line(&mut self, s: &str) {
        self.write_indent();
        self.out.push_str(s);
        self.out.push('\n');
    }

    /// Write a line at column zero, whatever the depth.
    pub fn flush_line(&mut self, s: &str) {
        self.out.push_str(s);
        self.out.push('\n');
    }

    /// Write a raw string to the output.
    pub fn write_str(&mut self, s: &str) {
        self.out.push_str(s);
    }
}

impl Default for PbxWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a scalar, keeping its source quoting.
///
/// Quoted scalars keep their delimiter and raw escapes. A bare scalar that is
/// not safe as a bare word (set programmatically, or empty) is double-quoted.
pub fn format_scalar(scalar: &Scalar) -> Cow<'_, str> {
    match scalar.quote.delimiter() {
        Some(q) => Cow::Owned(format!("{q}{}{q}", scalar.raw)),
        None if can_be_bare(&scalar.raw) => Cow::Borrowed(&scalar.raw),
        None => Cow::Owned(format!("\"{}\"", escape_quoted(&scalar.raw, '"'))),
    }
}

/// Render `text /* comment */`, or just `text`.
fn with_comment<'a>(text: Cow<'a, str>, comment: Option<&str>) -> Cow<'a, str> {
    match comment {
        Some(comment) => Cow::Owned(format!("{text} /* {comment} */")),
        None => text,
    }
}

/// Render an identifier reference.
pub fn format_reference(reference: &Reference) -> Cow<'_, str> {
    with_comment(format_scalar(&reference.id), reference.comment.as_deref())
}

/// Render a field key with its comment.
pub fn format_key(key: &Key) -> Cow<'_, str> {
    with_comment(format_scalar(&key.name), key.comment.as_deref())
}

/// Render a scalar or reference value; `None` for containers and null.
pub fn format_atom(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Scalar(scalar) => Some(format_scalar(scalar)),
        Value::Reference(reference) => Some(format_reference(reference)),
        _ => None,
    }
}
