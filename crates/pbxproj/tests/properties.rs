//! Generated documents write, read back and write again to the same text, and
//! generated project text in Xcode's layout reads back and writes unchanged.

use std::collections::BTreeMap;

use pbxproj::{
    Array, Document, INLINE_RECORD_KINDS, Object, Record, Reference, Value, WriteOptions, parse,
    write, write_with,
};
use proptest::prelude::*;

const KINDS: &[&str] = &[
    "PBXBuildFile",
    "PBXFileReference",
    "PBXGroup",
    "PBXNativeTarget",
    "XCBuildConfiguration",
];

fn key() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_.]{0,10}".prop_filter("reserved key", |k| k != "isa" && k != "objects")
}

fn comment() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-zA-Z0-9 ._-]{1,12}").prop_map(|c| {
        c.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())
    })
}

fn identifier() -> impl Strategy<Value = String> {
    "[0-9A-F]{24}"
}

fn atom() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 _./$()\"'\\\\<>=-]{0,16}".prop_map(|s| Value::scalar(s.as_str())),
        (identifier(), comment())
            .prop_map(|(id, c)| Value::Reference(Reference::new(id, c.as_deref()))),
    ]
}

/// Any value except null.
fn value() -> impl Strategy<Value = Value> {
    atom().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(|items| Value::Array(Array::new(items))),
            prop::collection::vec((key(), field_value(inner)), 0..4).prop_map(|fields| {
                Value::Object(
                    fields
                        .into_iter()
                        .fold(Object::new(), |object, (k, v)| object.with(&k, v)),
                )
            }),
        ]
    })
}

/// Null is only meaningful as a field value.
fn field_value(inner: impl Strategy<Value = Value>) -> impl Strategy<Value = Value> {
    prop_oneof![4 => inner, 1 => Just(Value::Null)]
}

fn record() -> impl Strategy<Value = Record> {
    (
        identifier(),
        comment(),
        prop::sample::select(KINDS),
        prop::collection::vec((key(), field_value(value())), 0..5),
    )
        .prop_map(|(id, comment, isa, fields)| {
            let fields = fields
                .into_iter()
                .fold(Object::new().with("isa", isa), |object, (k, v)| object.with(&k, v));
            Record::new(id, comment.as_deref(), fields)
        })
}

fn document() -> impl Strategy<Value = Document> {
    (
        prop::collection::vec((key(), field_value(value())), 0..4),
        prop::collection::vec(record(), 0..8),
    )
        .prop_map(|(root, records)| {
            let mut doc = Document::new();
            for (k, v) in root {
                doc.set_root_field(&k, v);
            }
            for record in records {
                // Generated identifiers may collide; the first one wins.
                let _ = doc.add_record(record);
            }
            doc
        })
}

proptest! {
    #[test]
    fn written_documents_are_a_fixed_point(doc in document(), drop_empty_values in any::<bool>()) {
        let options = WriteOptions::new().drop_empty_values(drop_empty_values);
        let once = write_with(&doc, &options).unwrap();
        let reread = parse(&once).unwrap_or_else(|e| panic!("{e}\n{once}"));
        let twice = write_with(&reread, &options).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn reread_documents_keep_their_records(doc in document()) {
        let once = write_with(&doc, &WriteOptions::default()).unwrap();
        let reread = parse(&once).unwrap();
        let ids: Vec<&str> = doc.records().map(Record::id).collect();
        let reread_ids: Vec<&str> = reread.records().map(Record::id).collect();
        prop_assert_eq!(ids, reread_ids);
        for record in doc.records() {
            prop_assert_eq!(reread.record(record.id()).and_then(Record::isa), record.isa());
        }
    }
}

/// A field value already spelled the way Xcode writes it.
#[derive(Debug, Clone)]
enum Text {
    Atom(String),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

fn atom_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9_./$<>-]{1,10}".prop_filter("line comment", |s| !s.starts_with("//")),
        "[a-zA-Z0-9 _./<>=-]{0,10}".prop_map(|s| format!("\"{s}\"")),
        (identifier(), prop::option::of("[a-zA-Z0-9._-]([a-zA-Z0-9 ._-]{0,8}[a-zA-Z0-9._-])?"))
            .prop_map(|(id, c)| match c {
                Some(c) => format!("{id} /* {c} */"),
                None => id,
            }),
    ]
}

fn field_text() -> impl Strategy<Value = Text> {
    prop_oneof![
        3 => atom_text().prop_map(Text::Atom),
        1 => prop::collection::vec(atom_text(), 0..4).prop_map(Text::List),
        1 => prop::collection::btree_map(key(), atom_text(), 0..3).prop_map(Text::Map),
    ]
}

/// `(isa, comment, fields)` per identifier.
type RecordText = (&'static str, Option<String>, BTreeMap<String, Text>);

fn project_text() -> impl Strategy<Value = String> {
    prop::collection::btree_map(
        identifier(),
        (
            prop::sample::select(KINDS),
            comment(),
            prop::collection::btree_map(key(), field_text(), 0..5),
        ),
        0..8,
    )
    .prop_map(|records| render_project(&records))
}

fn render_project(records: &BTreeMap<String, RecordText>) -> String {
    let mut sections: BTreeMap<&str, Vec<(&String, &RecordText)>> = BTreeMap::new();
    for (id, record) in records {
        sections.entry(record.0).or_default().push((id, record));
    }

    let mut out = String::from("// !$*UTF8*$!\n{\n\tarchiveVersion = 1;\n\tobjects = {\n");
    for (isa, members) in &sections {
        out.push_str(&format!("\n/* Begin {isa} section */\n"));
        for (id, (_, comment, fields)) in members {
            let key = match comment {
                Some(c) => format!("{id} /* {c} */"),
                None => id.to_string(),
            };
            if INLINE_RECORD_KINDS.contains(isa) {
                out.push_str(&format!("\t\t{key} = {{isa = {isa}; "));
                for (k, v) in fields {
                    let v = match v {
                        Text::Atom(a) => a.clone(),
                        Text::List(items) => {
                            format!("({})", items.iter().map(|i| format!("{i}, ")).collect::<String>())
                        }
                        Text::Map(map) => format!(
                            "{{{}}}",
                            map.iter().map(|(k, v)| format!("{k} = {v}; ")).collect::<String>()
                        ),
                    };
                    out.push_str(&format!("{k} = {v}; "));
                }
                out.push_str("};\n");
                continue;
            }
            out.push_str(&format!("\t\t{key} = {{\n\t\t\tisa = {isa};\n"));
            for (k, v) in fields {
                match v {
                    Text::Atom(a) => out.push_str(&format!("\t\t\t{k} = {a};\n")),
                    Text::List(items) => {
                        out.push_str(&format!("\t\t\t{k} = (\n"));
                        for item in items {
                            out.push_str(&format!("\t\t\t\t{item},\n"));
                        }
                        out.push_str("\t\t\t);\n");
                    }
                    Text::Map(map) => {
                        out.push_str(&format!("\t\t\t{k} = {{\n"));
                        for (mk, mv) in map {
                            out.push_str(&format!("\t\t\t\t{mk} = {mv};\n"));
                        }
                        out.push_str("\t\t\t};\n");
                    }
                }
            }
            out.push_str("\t\t};\n");
        }
        out.push_str(&format!("/* End {isa} section */\n"));
    }
    out.push_str("\t};\n\trootObject = 29B97313FDCFA39411CA2CEA /* Project object */;\n}\n");
    out
}

proptest! {
    #[test]
    fn project_text_writes_back_unchanged(source in project_text()) {
        let doc = parse(&source).unwrap_or_else(|e| panic!("{e}\n{source}"));
        prop_assert_eq!(write(&doc).unwrap(), source);
    }
}
