//! Walks a [`Document`] and writes it in Xcode's layout.
//!
//! ```text
//! // !$*UTF8*$!
//! {
//! →archiveVersion = 1;
//! →objects = {
//!
//! /* Begin PBXBuildFile section */
//! →→ID /* main.m in Sources */ = {isa = PBXBuildFile; fileRef = ID /* main.m */; };
//! /* End PBXBuildFile section */
//! →};
//! →rootObject = ID /* Project object */;
//! }
//! ```
//!
//! Every array item is followed by a comma, including the last one, whether
//! or not the source had it. Attached comments are re-spaced to `/* text */`.

use std::borrow::Cow;

use pbxproj_tree::{Array, Document, Field, Key, Object, Record, RootEntry, Section, Value};

use crate::options::WriteOptions;
use crate::writer::{PbxWriter, format_atom, format_key};

/// The writer met a value it has no rendering for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    /// The document holds something no parse could have produced.
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),
}

/// Write a document with the given options.
pub fn write_document(doc: &Document, options: &WriteOptions) -> Result<String, WriteError> {
    tracing::debug!(
        drop_empty_values = options.drop_empty_values,
        sections = doc.sections().len(),
        "writing document"
    );
    let mut formatter = DocumentFormatter {
        w: PbxWriter::with_options(options.clone()),
    };
    formatter.document(doc)?;
    Ok(formatter.w.finish())
}

struct DocumentFormatter {
    w: PbxWriter,
}

impl DocumentFormatter {
    fn drop_empty(&self) -> bool {
        self.w.options().drop_empty_values
    }

    fn document(&mut self, doc: &Document) -> Result<(), WriteError> {
        if let Some(comment) = doc.head_comment() {
            self.w.flush_line(&format!("// {comment}"));
        }
        self.w.line("{");
        self.w.nest();
        for entry in doc.entries() {
            match entry {
                RootEntry::Field(field) => self.field(field)?,
                RootEntry::Objects(key) => {
                    self.w.line(&format!("{} = {{", format_key(key)));
                    for section in doc.sections() {
                        self.section(section)?;
                    }
                    self.w.line("};");
                }
            }
        }
        self.w.unnest();
        self.w.line("}");
        Ok(())
    }

    fn section(&mut self, section: &Section) -> Result<(), WriteError> {
        self.w.flush_line("");
        self.w.flush_line(&format!("/* Begin {} section */", section.isa));
        // Records sit one level inside `objects`.
        self.w.nest();
        for record in section.iter() {
            if record.isa() != Some(section.isa.as_str()) {
                return Err(WriteError::InternalInconsistency(format!(
                    "record {} has isa {:?} but is stored in section {}",
                    record.id(),
                    record.isa(),
                    section.isa
                )));
            }
            self.record(record)?;
        }
        self.w.unnest();
        self.w.flush_line(&format!("/* End {} section */", section.isa));
        Ok(())
    }

    fn record(&mut self, record: &Record) -> Result<(), WriteError> {
        check_comment(record.comment.as_deref())?;
        let key = format_key(&Key {
            name: record.id.clone(),
            comment: record.comment.clone(),
        })
        .into_owned();

        let inline = record
            .isa()
            .is_some_and(|isa| self.w.options().is_inline_kind(isa));
        if inline {
            let mut body = String::new();
            self.inline_fields(&record.fields, &mut body)?;
            self.w.line(&format!("{key} = {{{body}}};"));
            return Ok(());
        }

        self.w.line(&format!("{key} = {{"));
        self.object_body(&record.fields)?;
        self.w.line("};");
        Ok(())
    }

    fn object_body(&mut self, object: &Object) -> Result<(), WriteError> {
        self.w.nest();
        for field in &object.fields {
            self.field(field)?;
        }
        self.w.unnest();
        Ok(())
    }

    fn field(&mut self, field: &Field) -> Result<(), WriteError> {
        check_comment(field.key.comment.as_deref())?;
        let key = format_key(&field.key);
        match &field.value {
            Value::Null if self.drop_empty() => {}
            Value::Null => self.w.line(&format!("{key} = \"\";")),
            Value::Array(array) => {
                self.w.line(&format!("{key} = ("));
                self.array_items(array, field.key.as_str())?;
                self.w.line(");");
            }
            Value::Object(object) => {
                self.w.line(&format!("{key} = {{"));
                self.object_body(object)?;
                self.w.line("};");
            }
            atom => {
                let text = format_checked(atom)?;
                self.w.line(&format!("{key} = {text};"));
            }
        }
        Ok(())
    }

    fn array_items(&mut self, array: &Array, owner: &str) -> Result<(), WriteError> {
        self.w.nest();
        for item in &array.items {
            match item {
                Value::Null => return Err(null_in_array(owner)),
                Value::Array(inner) => {
                    self.w.line("(");
                    self.array_items(inner, owner)?;
                    self.w.line("),");
                }
                Value::Object(object) => {
                    self.w.line("{");
                    self.object_body(object)?;
                    self.w.line("},");
                }
                atom => {
                    let text = format_checked(atom)?;
                    self.w.line(&format!("{text},"));
                }
            }
        }
        self.w.unnest();
        Ok(())
    }

    /// `k = v; k = (a, b, ); k = {x = y; }; `
    fn inline_fields(&self, object: &Object, out: &mut String) -> Result<(), WriteError> {
        for field in &object.fields {
            if field.value.is_null() && self.drop_empty() {
                continue;
            }
            check_comment(field.key.comment.as_deref())?;
            out.push_str(&format_key(&field.key));
            out.push_str(" = ");
            self.inline_value(&field.value, field.key.as_str(), out)?;
            out.push_str("; ");
        }
        Ok(())
    }

    fn inline_value(&self, value: &Value, owner: &str, out: &mut String) -> Result<(), WriteError> {
        match value {
            Value::Null => out.push_str("\"\""),
            Value::Array(array) => {
                out.push('(');
                for item in &array.items {
                    if item.is_null() {
                        return Err(null_in_array(owner));
                    }
                    self.inline_value(item, owner, out)?;
                    out.push_str(", ");
                }
                out.push(')');
            }
            Value::Object(object) => {
                out.push('{');
                self.inline_fields(object, out)?;
                out.push('}');
            }
            atom => out.push_str(&format_checked(atom)?),
        }
        Ok(())
    }
}

/// A comment holding `*/` would end early and corrupt the output.
fn check_comment(comment: Option<&str>) -> Result<(), WriteError> {
    match comment {
        Some(text) if text.contains("*/") => Err(WriteError::InternalInconsistency(format!(
            "comment {text:?} contains `*/`"
        ))),
        _ => Ok(()),
    }
}

fn format_checked(atom: &Value) -> Result<Cow<'_, str>, WriteError> {
    if let Value::Reference(reference) = atom {
        check_comment(reference.comment.as_deref())?;
    }
    Ok(format_atom(atom).unwrap_or_default())
}

fn null_in_array(owner: &str) -> WriteError {
    WriteError::InternalInconsistency(format!("null item in array `{owner}`"))
}
