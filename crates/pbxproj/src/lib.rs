//! Round-trip engine for Xcode `project.pbxproj` files.
//!
//! ```no_run
//! # fn main() -> Result<(), pbxproj::Error> {
//! let source = std::fs::read_to_string("App.xcodeproj/project.pbxproj").unwrap_or_default();
//! let mut doc = pbxproj::parse(&source)?;
//! if let Some(main) = doc.main_group().map(|g| g.id().to_string()) {
//!     doc.create_group(Some("Generated"), "Generated", Some(&main))?;
//! }
//! let text = pbxproj::write(&doc)?;
//! # let _ = text;
//! # Ok(())
//! # }
//! ```
//!
//! Writing an untouched document reproduces its source byte for byte, except
//! that every array gains a trailing comma after its last item and attached
//! comments are spaced as `/* text */`.

pub use pbxproj_format::{INLINE_RECORD_KINDS, WriteError, WriteOptions, write_document};
pub use pbxproj_tree::{
    Array, BuildError, DEFAULT_HEAD_COMMENT, Document, Field, IdGenerator, Key, MutationError,
    OBJECTS_KEY, Object, ObjectTable, ParseError, ParseErrorKind, Quote, Record, Reference,
    RootEntry, Scalar, Section, Span, SyntaxError, SyntaxErrorKind, Value, file_type_for,
};

/// Any error from parsing, editing or writing a project file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The text is not a well-formed project file.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// A mutation was rejected; the document is unchanged.
    #[error(transparent)]
    Mutation(#[from] MutationError),
    /// The document holds a value the writer cannot render.
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Parse project file text.
pub fn parse(source: &str) -> Result<Document, Error> {
    Ok(pbxproj_tree::parse(source)?)
}

/// Write a document with default options.
pub fn write(doc: &Document) -> Result<String, Error> {
    write_with(doc, &WriteOptions::default())
}

/// Write a document with the given options.
pub fn write_with(doc: &Document, options: &WriteOptions) -> Result<String, Error> {
    Ok(write_document(doc, options)?)
}
