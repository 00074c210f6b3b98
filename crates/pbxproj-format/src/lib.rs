//! Writer for Xcode project files.
//!
//! Renders a [`pbxproj_tree::Document`] with Xcode's conventions: tab
//! indentation, `/* Begin X section */` delimiters, one-line build files and
//! file references, identifier comments. An unmodified parse writes back
//! byte-identical, with two normalizations: arrays always end with a trailing
//! comma, and attached comments are written as `/* text */` with one space
//! inside each delimiter.

mod document_format;
mod options;
mod writer;

pub use document_format::{WriteError, write_document};
pub use options::{INLINE_RECORD_KINDS, WriteOptions};
pub use pbxproj_tree::{can_be_bare, escape_quoted, unescape_quoted};
pub use writer::{PbxWriter, format_atom, format_key, format_reference, format_scalar};
