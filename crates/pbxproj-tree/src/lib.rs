//! Document model for Xcode project files.
//!
//! [`parse`] turns `project.pbxproj` text into a [`Document`]: the root
//! fields in order, one [`Section`] per record kind, and an [`ObjectTable`]
//! indexing every record by identifier. Values keep the formatting facts
//! (quote style, trailing commas, identifier comments) a writer needs to
//! reproduce the source.
//!
//! Documents are edited through the mutation API on [`Document`]
//! (`create_group`, `create_file_reference`, `attach_build_file`, ...),
//! which validates every precondition before changing anything.

mod builder;
mod diagnostic;
mod document;
mod ids;
mod mutate;
mod scalar;
mod value;

pub use builder::DocumentBuilder;
pub use diagnostic::{BuildError, ParseError, ParseErrorKind};
pub use document::{
    DEFAULT_HEAD_COMMENT, Document, OBJECTS_KEY, ObjectTable, Record, RootEntry, Section,
};
pub use ids::IdGenerator;
pub use mutate::{MutationError, file_type_for};
pub use pbxproj_tokenizer::{Quote, Span, SyntaxError, SyntaxErrorKind};
pub use scalar::{can_be_bare, escape_quoted, is_identifier, unescape_quoted};
pub use value::{Array, Field, Key, Object, Reference, Scalar, Value};

/// Parse a project file into a document.
pub fn parse(source: &str) -> Result<Document, BuildError> {
    Document::parse(source)
}
