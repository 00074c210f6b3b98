//! The document model: root fields, sections, records and the object table.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::ids::IdGenerator;
use crate::value::{Field, Key, Object, Reference, Scalar, Value};

/// The comment Xcode writes on the first line of every project file.
pub const DEFAULT_HEAD_COMMENT: &str = "!$*UTF8*$!";

/// Name of the root field holding the records.
pub const OBJECTS_KEY: &str = "objects";

/// One identifier-keyed field map inside `objects`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The identifier, as written.
    pub id: Scalar,
    /// Comment written after the identifier.
    pub comment: Option<String>,
    /// Fields, `isa` usually first.
    pub fields: Object,
}

impl Record {
    /// Create a record.
    pub fn new(id: impl Into<String>, comment: Option<&str>, fields: Object) -> Self {
        Record {
            id: Scalar::new(id),
            comment: comment.map(str::to_string),
            fields,
        }
    }

    /// The identifier.
    pub fn id(&self) -> &str {
        self.id.raw()
    }

    /// The `isa` discriminator.
    pub fn isa(&self) -> Option<&str> {
        self.fields.get("isa").and_then(Value::as_str)
    }

    /// Get a field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get an array field.
    pub fn array(&self, key: &str) -> Option<&crate::Array> {
        self.get(key).and_then(Value::as_array)
    }

    /// A reference to this record, carrying its comment.
    pub fn reference(&self) -> Reference {
        Reference {
            id: self.id.clone(),
            comment: self.comment.clone(),
        }
    }
}

/// All records of one kind, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// The record kind (`PBXGroup`, `PBXFileReference`, ...).
    pub isa: String,
    /// Records keyed by identifier.
    pub records: IndexMap<String, Record>,
}

impl Section {
    /// An empty section.
    pub fn new(isa: impl Into<String>) -> Self {
        Section {
            isa: isa.into(),
            records: IndexMap::new(),
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the section has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }
}

/// A top-level entry of the root map.
#[derive(Debug, Clone, PartialEq)]
pub enum RootEntry {
    /// An ordinary `key = value;` field.
    Field(Field),
    /// The `objects` field; its content lives in the document's sections.
    Objects(Key),
}

/// Identifier index over every record of a document.
///
/// Maps each live identifier to the name of the section holding it, and
/// remembers identifiers freed by removal so they are never handed out again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectTable {
    index: HashMap<String, String>,
    retired: HashSet<String>,
}

impl ObjectTable {
    /// Whether `id` names a live record.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Section holding `id`.
    pub fn section_of(&self, id: &str) -> Option<&str> {
        self.index.get(id).map(String::as_str)
    }

    /// Whether `id` belonged to a removed record.
    pub fn is_retired(&self, id: &str) -> bool {
        self.retired.contains(id)
    }

    /// Whether `id` is live or retired.
    pub fn is_taken(&self, id: &str) -> bool {
        self.contains(id) || self.is_retired(id)
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Live identifiers, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    fn insert(&mut self, id: &str, section: &str) {
        self.index.insert(id.to_string(), section.to_string());
    }

    fn retire(&mut self, id: &str) {
        if self.index.remove(id).is_some() {
            self.retired.insert(id.to_string());
        }
    }
}

/// A parsed project file.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) head_comment: Option<String>,
    pub(crate) entries: Vec<RootEntry>,
    pub(crate) sections: Vec<Section>,
    pub(crate) table: ObjectTable,
    pub(crate) ids: IdGenerator,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.head_comment == other.head_comment
            && self.entries == other.entries
            && self.sections == other.sections
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty project file: the standard head comment and an empty `objects` map.
    pub fn new() -> Self {
        Document {
            head_comment: Some(DEFAULT_HEAD_COMMENT.to_string()),
            entries: vec![RootEntry::Objects(Key::new(OBJECTS_KEY))],
            sections: Vec::new(),
            table: ObjectTable::default(),
            ids: IdGenerator::new(),
        }
    }

    /// Replace the identifier generator, e.g. with [`IdGenerator::seeded`].
    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Replace the identifier generator in place.
    pub fn set_id_generator(&mut self, ids: IdGenerator) {
        self.ids = ids;
    }

    /// Text of the leading `//` comment.
    pub fn head_comment(&self) -> Option<&str> {
        self.head_comment.as_deref()
    }

    /// Set or clear the leading comment.
    pub fn set_head_comment(&mut self, comment: Option<&str>) {
        self.head_comment = comment.map(str::to_string);
    }

    /// Root entries in order.
    pub fn entries(&self) -> &[RootEntry] {
        &self.entries
    }

    /// Sections in order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The section for a record kind.
    pub fn section(&self, isa: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.isa == isa)
    }

    /// Records of one kind, in order.
    pub fn records_of<'a>(&'a self, isa: &str) -> impl Iterator<Item = &'a Record> + use<'a> {
        self.section(isa).into_iter().flat_map(Section::iter)
    }

    /// Every record, section by section.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.sections.iter().flat_map(Section::iter)
    }

    /// The object table.
    pub fn objects(&self) -> &ObjectTable {
        &self.table
    }

    /// Look up a record by identifier.
    pub fn record(&self, id: &str) -> Option<&Record> {
        let isa = self.table.section_of(id)?;
        self.section(isa)?.records.get(id)
    }

    /// Look up a record for direct field edits.
    ///
    /// Edits made here bypass every check of the mutation API.
    pub fn record_mut(&mut self, id: &str) -> Option<&mut Record> {
        let isa = self.table.section_of(id)?;
        self.sections
            .iter_mut()
            .find(|s| s.isa == isa)?
            .records
            .get_mut(id)
    }

    /// A root field value.
    pub fn root_field(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find_map(|entry| match entry {
            RootEntry::Field(field) if field.key.as_str() == key => Some(&field.value),
            _ => None,
        })
    }

    /// Set a root field. An existing field keeps its position; a new one is
    /// appended. `objects` cannot be set this way.
    pub fn set_root_field(&mut self, key: &str, value: Value) -> Option<Value> {
        if key == OBJECTS_KEY {
            return None;
        }
        for entry in &mut self.entries {
            if let RootEntry::Field(field) = entry
                && field.key.as_str() == key
            {
                return Some(std::mem::replace(&mut field.value, value));
            }
        }
        self.entries.push(RootEntry::Field(Field {
            key: Key::new(key),
            value,
        }));
        None
    }

    /// The record named by the `rootObject` field.
    pub fn project(&self) -> Option<&Record> {
        let id = self.root_field("rootObject")?.as_str()?;
        self.record(id)
    }

    /// The project's `mainGroup`.
    pub fn main_group(&self) -> Option<&Record> {
        let id = self.project()?.get("mainGroup")?.as_str()?;
        self.record(id)
    }

    /// The first group whose `name` (or, lacking one, `path`) is `name`.
    pub fn find_group_by_name(&self, name: &str) -> Option<&Record> {
        self.records_of("PBXGroup").find(|group| {
            group
                .get("name")
                .or_else(|| group.get("path"))
                .and_then(Value::text)
                .is_some_and(|text| text == name)
        })
    }

    /// Whether any live or retired record uses `id`.
    pub(crate) fn is_taken(&self, id: &str) -> bool {
        self.table.is_taken(id)
    }

    /// A fresh identifier, unique for the lifetime of this document.
    pub fn generate_id(&mut self) -> String {
        let table = &self.table;
        self.ids.generate(|id| table.is_taken(id))
    }

    /// Index of the section for `isa`, appending it if new.
    pub(crate) fn push_section(&mut self, isa: &str) -> usize {
        if let Some(index) = self.sections.iter().position(|s| s.isa == isa) {
            return index;
        }
        self.sections.push(Section::new(isa));
        self.sections.len() - 1
    }

    /// Index of the section for `isa`, inserting a new one at its sorted place.
    pub(crate) fn sorted_section(&mut self, isa: &str) -> usize {
        if let Some(index) = self.sections.iter().position(|s| s.isa == isa) {
            return index;
        }
        let index = self
            .sections
            .iter()
            .position(|s| s.isa.as_str() > isa)
            .unwrap_or(self.sections.len());
        tracing::debug!(isa, index, "new section");
        self.sections.insert(index, Section::new(isa));
        self.ensure_objects_entry();
        index
    }

    /// Store a record in section `index`. The caller has checked the identifier.
    pub(crate) fn store(&mut self, index: usize, record: Record) {
        let section = &mut self.sections[index];
        self.table.insert(record.id(), &section.isa);
        section.records.insert(record.id().to_string(), record);
    }

    /// Remove a record and retire its identifier.
    pub(crate) fn take(&mut self, id: &str) -> Option<Record> {
        let isa = self.table.section_of(id)?.to_string();
        let record = self
            .sections
            .iter_mut()
            .find(|s| s.isa == isa)?
            .records
            .shift_remove(id)?;
        self.table.retire(id);
        Some(record)
    }

    fn ensure_objects_entry(&mut self) {
        if !self
            .entries
            .iter()
            .any(|e| matches!(e, RootEntry::Objects(_)))
        {
            self.entries.push(RootEntry::Objects(Key::new(OBJECTS_KEY)));
        }
    }
}
