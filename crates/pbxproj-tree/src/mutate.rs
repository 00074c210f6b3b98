//! Mutation API.
//!
//! Every operation checks all of its preconditions before touching the
//! document, so a failed call leaves it exactly as it was.

use crate::document::{Document, Record, RootEntry};
use crate::value::{Array, Object, Reference, Value};

/// Record kinds that can hold children.
const GROUP_KINDS: &[&str] = &["PBXGroup", "PBXVariantGroup"];

/// Record kinds a build file may point at.
const FILE_KINDS: &[&str] = &[
    "PBXFileReference",
    "PBXVariantGroup",
    "XCVersionGroup",
    "PBXReferenceProxy",
];

/// Xcode's "all actions" mask for new build phases.
const BUILD_ACTION_MASK: &str = "2147483647";

/// Why a mutation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// A supplied identifier does not name a suitable record.
    #[error("{expected} {id} not found")]
    NotFound {
        /// The identifier that failed to resolve.
        id: String,
        /// What kind of record was required.
        expected: &'static str,
    },
    /// The change would break a membership or uniqueness rule.
    #[error("conflict on {id}: {reason}")]
    Conflict {
        /// The identifier involved.
        id: String,
        /// What the change would break.
        reason: String,
    },
}

fn not_found(id: &str, expected: &'static str) -> MutationError {
    MutationError::NotFound {
        id: id.to_string(),
        expected,
    }
}

/// Text that becomes a `/* ... */` comment must not close it early.
fn check_comment(text: &str) -> Result<(), MutationError> {
    if text.contains("*/") {
        return Err(MutationError::Conflict {
            id: text.to_string(),
            reason: "`*/` cannot appear in a comment".to_string(),
        });
    }
    Ok(())
}

impl Document {
    /// Create a `PBXGroup`, optionally linking it into `parent`'s children.
    ///
    /// The new group has an empty `children` list; `path` is null when not given.
    pub fn create_group(
        &mut self,
        path: Option<&str>,
        name: &str,
        parent: Option<&str>,
    ) -> Result<&Record, MutationError> {
        check_comment(name)?;
        if let Some(parent) = parent {
            self.expect_group(parent)?;
        }

        let fields = Object::new()
            .with("isa", "PBXGroup")
            .with("children", Value::empty_array())
            .with("name", name)
            .with("path", path)
            .with("sourceTree", Value::quoted("<group>"));
        let id = self.insert_record("PBXGroup", Some(name), fields);
        if let Some(parent) = parent {
            self.link(parent, "children", Reference::new(&id, Some(name)));
        }
        tracing::debug!(%id, group_name = name, ?parent, "created group");
        self.created(&id)
    }

    /// Create a `PBXFileReference` for `path` and add it to `group`.
    ///
    /// Without an explicit `file_type` the type is guessed from the extension.
    pub fn create_file_reference(
        &mut self,
        path: &str,
        file_type: Option<&str>,
        group: &str,
    ) -> Result<&Record, MutationError> {
        self.expect_group(group)?;

        let basename = path.rsplit('/').next().unwrap_or(path);
        let file_type = file_type.unwrap_or_else(|| file_type_for(path));
        let mut fields = Object::new()
            .with("isa", "PBXFileReference")
            .with("lastKnownFileType", file_type);
        if basename != path {
            fields.insert("name", Value::scalar(basename));
        }
        let fields = fields
            .with("path", path)
            .with("sourceTree", Value::quoted("<group>"));

        let id = self.insert_record("PBXFileReference", Some(basename), fields);
        self.link(group, "children", Reference::new(&id, Some(basename)));
        tracing::debug!(%id, path, group, "created file reference");
        self.created(&id)
    }

    /// Wrap `file_ref` in a new `PBXBuildFile` and append it to `phase`'s files.
    ///
    /// Fails with [`MutationError::Conflict`] if the phase already builds the file.
    pub fn attach_build_file(
        &mut self,
        file_ref: &str,
        phase: &str,
    ) -> Result<&Record, MutationError> {
        let file = self
            .record(file_ref)
            .filter(|r| r.isa().is_some_and(|isa| FILE_KINDS.contains(&isa)))
            .ok_or_else(|| not_found(file_ref, "file reference"))?;
        let file_comment = file.comment.clone();
        let phase_record = self.expect_phase(phase)?;
        let phase_name = phase_display_name(phase_record);

        if self.build_file_in(phase, file_ref).is_some() {
            return Err(MutationError::Conflict {
                id: file_ref.to_string(),
                reason: format!("already attached to build phase {phase}"),
            });
        }

        let label = file_comment.as_deref().unwrap_or(file_ref);
        let comment = format!("{label} in {phase_name}");
        check_comment(&comment)?;
        let fields = Object::new()
            .with("isa", "PBXBuildFile")
            .with("fileRef", Reference::new(file_ref, file_comment.as_deref()));
        let id = self.insert_record("PBXBuildFile", Some(&comment), fields);
        self.link(phase, "files", Reference::new(&id, Some(&comment)));
        tracing::debug!(%id, file_ref, phase, "attached build file");
        self.created(&id)
    }

    /// Remove the build file wrapping `file_ref` from `phase` and delete it.
    pub fn detach_build_file(
        &mut self,
        file_ref: &str,
        phase: &str,
    ) -> Result<Record, MutationError> {
        self.expect_phase(phase)?;
        let build_file = self
            .build_file_in(phase, file_ref)
            .ok_or_else(|| not_found(file_ref, "build file in phase"))?;

        if let Some(files) = self.array_mut(phase, "files") {
            files.remove_references(&build_file);
        }
        let record = self
            .take(&build_file)
            .ok_or_else(|| not_found(&build_file, "build file"))?;
        tracing::debug!(id = %build_file, file_ref, phase, "detached build file");
        Ok(record)
    }

    /// Unlink `child` from `group`'s children. The child record itself stays.
    pub fn remove_from_group(&mut self, child: &str, group: &str) -> Result<&Record, MutationError> {
        let members = self.expect_group(group)?;
        if !members.is_some_and(|children| children.contains_reference(child)) {
            return Err(not_found(child, "group member"));
        }

        if let Some(children) = self.array_mut(group, "children") {
            children.remove_references(child);
        }
        tracing::debug!(child, group, "removed from group");
        self.created(group)
    }

    /// Insert a caller-built record under the section of its `isa`.
    ///
    /// Its identifier must be new to this document, retired ones included.
    pub fn add_record(&mut self, record: Record) -> Result<&Record, MutationError> {
        if let Some(comment) = &record.comment {
            check_comment(comment)?;
        }
        let Some(isa) = record.isa().map(str::to_string) else {
            return Err(MutationError::Conflict {
                id: record.id().to_string(),
                reason: "record has no isa field".to_string(),
            });
        };
        if self.is_taken(record.id()) {
            return Err(MutationError::Conflict {
                id: record.id().to_string(),
                reason: "identifier already in use".to_string(),
            });
        }
        let id = record.id().to_string();
        let index = self.sorted_section(&isa);
        self.store(index, record);
        tracing::debug!(%id, %isa, "added record");
        self.created(&id)
    }

    /// Delete a record and every array reference to it.
    ///
    /// Build files wrapping the record (`fileRef`) are deleted with it. Any
    /// other field that points at it is a [`MutationError::Conflict`].
    /// Identifiers are retired: they will not be generated again for this document.
    pub fn remove_record(&mut self, id: &str) -> Result<Record, MutationError> {
        if !self.objects().contains(id) {
            return Err(not_found(id, "record"));
        }

        let mut wrappers = Vec::new();
        for record in self.records().filter(|r| r.id() != id) {
            if !record.fields.fields.iter().any(|f| pins_reference(&f.value, id)) {
                continue;
            }
            let wraps = record.isa() == Some("PBXBuildFile")
                && record
                    .get("fileRef")
                    .and_then(Value::as_reference)
                    .is_some_and(|r| r.id() == id);
            let others = record
                .fields
                .fields
                .iter()
                .filter(|f| f.key.as_str() != "fileRef")
                .any(|f| pins_reference(&f.value, id));
            if !wraps || others {
                return Err(MutationError::Conflict {
                    id: id.to_string(),
                    reason: format!("still referenced by {}", record.id()),
                });
            }
            wrappers.push(record.id().to_string());
        }
        if self.pinned_at_root(id) {
            return Err(MutationError::Conflict {
                id: id.to_string(),
                reason: "still referenced by a root field".to_string(),
            });
        }

        for wrapper in &wrappers {
            if let Some(holder) = self.pinned_by(wrapper) {
                return Err(MutationError::Conflict {
                    id: wrapper.clone(),
                    reason: format!("still referenced by {holder}"),
                });
            }
        }

        for wrapper in &wrappers {
            self.purge(wrapper);
        }
        let record = self.purge(id).ok_or_else(|| not_found(id, "record"))?;
        tracing::debug!(id, wrappers = wrappers.len(), "removed record");
        Ok(record)
    }

    /// What refers to `id` other than as an array item, if anything.
    fn pinned_by(&self, id: &str) -> Option<String> {
        if self.pinned_at_root(id) {
            return Some("a root field".to_string());
        }
        self.records()
            .filter(|r| r.id() != id)
            .find(|r| r.fields.fields.iter().any(|f| pins_reference(&f.value, id)))
            .map(|r| r.id().to_string())
    }

    fn pinned_at_root(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| match entry {
            RootEntry::Field(field) => pins_reference(&field.value, id),
            RootEntry::Objects(_) => false,
        })
    }

    /// Take a record out and drop every array reference to it.
    fn purge(&mut self, id: &str) -> Option<Record> {
        let record = self.take(id)?;
        let mut purged = 0;
        for section in &mut self.sections {
            for other in section.records.values_mut() {
                for field in &mut other.fields.fields {
                    purged += purge_references(&mut field.value, id);
                }
            }
        }
        tracing::trace!(id, purged, "purged references");
        Some(record)
    }

    /// Create an empty build phase of kind `isa`, optionally appending it to
    /// `target`'s `buildPhases`.
    pub fn create_build_phase(
        &mut self,
        isa: &str,
        name: Option<&str>,
        target: Option<&str>,
    ) -> Result<&Record, MutationError> {
        if !isa.ends_with("BuildPhase") {
            return Err(MutationError::Conflict {
                id: isa.to_string(),
                reason: "not a build phase kind".to_string(),
            });
        }
        if let Some(name) = name {
            check_comment(name)?;
        }
        if let Some(target) = target {
            let phases = self
                .record(target)
                .filter(|r| r.isa().is_some_and(|isa| isa.ends_with("Target")))
                .ok_or_else(|| not_found(target, "target"))?
                .get("buildPhases");
            if phases.is_some_and(|v| v.as_array().is_none()) {
                return Err(MutationError::Conflict {
                    id: target.to_string(),
                    reason: "buildPhases is not an array".to_string(),
                });
            }
        }

        let fields = Object::new()
            .with("isa", isa)
            .with("buildActionMask", BUILD_ACTION_MASK)
            .with("files", Value::empty_array());
        let fields = match name {
            Some(name) => fields.with("name", Value::quoted(name)),
            None => fields,
        }
        .with("runOnlyForDeploymentPostprocessing", "0");

        let comment = name.map_or_else(|| kind_display_name(isa).to_string(), str::to_string);
        let id = self.insert_record(isa, Some(&comment), fields);
        if let Some(target) = target {
            self.link(target, "buildPhases", Reference::new(&id, Some(&comment)));
        }
        tracing::debug!(%id, isa, target_id = ?target, "created build phase");
        self.created(&id)
    }

    /// Set `key` in the `buildSettings` of every `XCBuildConfiguration`, or of
    /// those named `configuration`. Returns how many were changed.
    pub fn set_build_setting(
        &mut self,
        key: &str,
        value: Value,
        configuration: Option<&str>,
    ) -> Result<usize, MutationError> {
        let ids = self.configurations(configuration)?;
        for id in &ids {
            let Some(record) = self.record_mut(id) else {
                continue;
            };
            match record.fields.get_mut("buildSettings") {
                Some(Value::Object(settings)) => {
                    settings.insert(key, value.clone());
                }
                _ => {
                    record
                        .fields
                        .insert("buildSettings", Object::new().with(key, value.clone()).into());
                }
            }
        }
        tracing::debug!(key, configurations = ids.len(), "set build setting");
        Ok(ids.len())
    }

    /// Remove `key` from matching configurations. Returns how many had it.
    pub fn remove_build_setting(
        &mut self,
        key: &str,
        configuration: Option<&str>,
    ) -> Result<usize, MutationError> {
        let ids = self.configurations(configuration)?;
        let mut removed = 0;
        for id in &ids {
            if let Some(Value::Object(settings)) = self
                .record_mut(id)
                .and_then(|r| r.fields.get_mut("buildSettings"))
                && settings.remove(key).is_some()
            {
                removed += 1;
            }
        }
        tracing::debug!(key, removed, "removed build setting");
        Ok(removed)
    }

    /// Identifiers of the build configurations matching `name`.
    fn configurations(&self, name: Option<&str>) -> Result<Vec<String>, MutationError> {
        let ids: Vec<String> = self
            .records_of("XCBuildConfiguration")
            .filter(|r| match name {
                None => true,
                Some(name) => r
                    .get("name")
                    .and_then(Value::text)
                    .is_some_and(|n| n == name),
            })
            .map(|r| r.id().to_string())
            .collect();
        if ids.is_empty() {
            return Err(not_found(name.unwrap_or("*"), "build configuration"));
        }
        Ok(ids)
    }

    /// Check `id` is a group whose `children`, if present, is an array.
    fn expect_group(&self, id: &str) -> Result<Option<&Array>, MutationError> {
        let group = self
            .record(id)
            .filter(|r| r.isa().is_some_and(|isa| GROUP_KINDS.contains(&isa)))
            .ok_or_else(|| not_found(id, "group"))?;
        match group.get("children") {
            None => Ok(None),
            Some(Value::Array(children)) => Ok(Some(children)),
            Some(_) => Err(MutationError::Conflict {
                id: id.to_string(),
                reason: "children is not an array".to_string(),
            }),
        }
    }

    /// Check `id` is a build phase with a `files` array.
    fn expect_phase(&self, id: &str) -> Result<&Record, MutationError> {
        self.record(id)
            .filter(|r| r.isa().is_some_and(|isa| isa.ends_with("BuildPhase")))
            .filter(|r| r.array("files").is_some())
            .ok_or_else(|| not_found(id, "build phase"))
    }

    /// The build file in `phase` that points at `file_ref`.
    fn build_file_in(&self, phase: &str, file_ref: &str) -> Option<String> {
        let files = self.record(phase)?.array("files")?;
        files
            .reference_ids()
            .find(|id| {
                self.record(id)
                    .and_then(|bf| bf.get("fileRef"))
                    .and_then(Value::as_str)
                    .is_some_and(|target| target == file_ref)
            })
            .map(str::to_string)
    }

    /// Allocate an identifier and store a new record under its kind's section.
    fn insert_record(&mut self, isa: &str, comment: Option<&str>, fields: Object) -> String {
        let id = self.generate_id();
        let index = self.sorted_section(isa);
        self.store(index, Record::new(id.as_str(), comment, fields));
        id
    }

    /// Append `reference` to the array `key` of `owner`, creating the array if absent.
    fn link(&mut self, owner: &str, key: &str, reference: Reference) {
        let Some(record) = self.record_mut(owner) else {
            return;
        };
        match record.fields.get_mut(key) {
            Some(Value::Array(array)) => array.push(reference.into()),
            _ => {
                record
                    .fields
                    .insert(key, Array::new(vec![reference.into()]).into());
            }
        }
    }

    fn array_mut(&mut self, owner: &str, key: &str) -> Option<&mut Array> {
        self.record_mut(owner)?.fields.get_mut(key)?.as_array_mut()
    }

    fn created(&self, id: &str) -> Result<&Record, MutationError> {
        self.record(id).ok_or_else(|| not_found(id, "record"))
    }
}

/// Whether `value` refers to `id` other than as a plain array item.
fn pins_reference(value: &Value, id: &str) -> bool {
    match value {
        Value::Reference(reference) => reference.id() == id,
        Value::Object(object) => object.fields.iter().any(|f| pins_reference(&f.value, id)),
        Value::Array(array) => array
            .items
            .iter()
            .any(|item| !matches!(item, Value::Reference(_)) && pins_reference(item, id)),
        _ => false,
    }
}

/// Remove references to `id` from every array inside `value`.
fn purge_references(value: &mut Value, id: &str) -> usize {
    match value {
        Value::Array(array) => {
            let mut removed = array.remove_references(id);
            for item in &mut array.items {
                removed += purge_references(item, id);
            }
            removed
        }
        Value::Object(object) => object
            .fields
            .iter_mut()
            .map(|field| purge_references(&mut field.value, id))
            .sum(),
        _ => 0,
    }
}

/// How Xcode names a phase in build-file comments.
fn phase_display_name(phase: &Record) -> String {
    if let Some(name) = phase.get("name").and_then(Value::text) {
        return name.into_owned();
    }
    kind_display_name(phase.isa().unwrap_or_default()).to_string()
}

/// `PBXSourcesBuildPhase` → `Sources`.
fn kind_display_name(isa: &str) -> &str {
    let name = isa.strip_prefix("PBX").unwrap_or(isa);
    name.strip_suffix("BuildPhase").unwrap_or(name)
}

/// Guess `lastKnownFileType` from a path's extension.
pub fn file_type_for(path: &str) -> &'static str {
    let basename = path.rsplit('/').next().unwrap_or(path);
    let extension = basename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match extension {
        "m" => "sourcecode.c.objc",
        "h" => "sourcecode.c.h",
        "swift" => "sourcecode.swift",
        "c" => "sourcecode.c.c",
        "cpp" => "sourcecode.cpp.cpp",
        "plist" => "text.plist.xml",
        "framework" => "wrapper.framework",
        "a" => "archive.ar",
        "dylib" => "compiled.mach-o.dylib",
        "png" => "image.png",
        "storyboard" => "file.storyboard",
        "xib" => "file.xib",
        "xcassets" => "folder.assetcatalog",
        "json" => "text.json",
        "strings" => "text.plist.strings",
        _ => "text",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::IdGenerator;
    use pbxproj_testhelpers::setup;

    const PROJECT: &str = "// !$*UTF8*$!
{
\tobjects = {

/* Begin PBXFileReference section */
\t\t1D6058910D05DD3D006BFB54 /* App.app */ = {isa = PBXFileReference; explicitFileType = wrapper.application; path = App.app; sourceTree = BUILT_PRODUCTS_DIR; };
\t\t29B97316FDCFA39411CA2CEA /* main.m */ = {isa = PBXFileReference; lastKnownFileType = sourcecode.c.objc; path = main.m; sourceTree = \"<group>\"; };
/* End PBXFileReference section */

/* Begin PBXGroup section */
\t\t29B97314FDCFA39411CA2CEA /* CustomTemplate */ = {
\t\t\tisa = PBXGroup;
\t\t\tchildren = (
\t\t\t\t1D6058910D05DD3D006BFB54 /* App.app */,
\t\t\t\t29B97316FDCFA39411CA2CEA /* main.m */,
\t\t\t);
\t\t\tname = CustomTemplate;
\t\t\tsourceTree = \"<group>\";
\t\t};
/* End PBXGroup section */

/* Begin PBXNativeTarget section */
\t\t1D6058900D05DD3D006BFB54 /* App */ = {
\t\t\tisa = PBXNativeTarget;
\t\t\tbuildPhases = (
\t\t\t\t1D60588D0D05DD3D006BFB54 /* Sources */,
\t\t\t);
\t\t\tname = App;
\t\t};
/* End PBXNativeTarget section */

/* Begin PBXSourcesBuildPhase section */
\t\t1D60588D0D05DD3D006BFB54 /* Sources */ = {
\t\t\tisa = PBXSourcesBuildPhase;
\t\t\tbuildActionMask = 2147483647;
\t\t\tfiles = (
\t\t\t);
\t\t\trunOnlyForDeploymentPostprocessing = 0;
\t\t};
/* End PBXSourcesBuildPhase section */

/* Begin XCBuildConfiguration section */
\t\tC01FCF4F08A954540054247B /* Debug */ = {
\t\t\tisa = XCBuildConfiguration;
\t\t\tbuildSettings = {
\t\t\t\tSDKROOT = iphoneos;
\t\t\t};
\t\t\tname = Debug;
\t\t};
\t\tC01FCF5008A954540054247B /* Release */ = {
\t\t\tisa = XCBuildConfiguration;
\t\t\tbuildSettings = {
\t\t\t\tSDKROOT = iphoneos;
\t\t\t};
\t\t\tname = Release;
\t\t};
/* End XCBuildConfiguration section */
\t};
}
";

    const GROUP: &str = "29B97314FDCFA39411CA2CEA";
    const MAIN_M: &str = "29B97316FDCFA39411CA2CEA";
    const APP: &str = "1D6058910D05DD3D006BFB54";
    const TARGET: &str = "1D6058900D05DD3D006BFB54";
    const SOURCES: &str = "1D60588D0D05DD3D006BFB54";

    fn project() -> Document {
        Document::parse(PROJECT)
            .unwrap()
            .with_id_generator(IdGenerator::seeded(42))
    }

    fn children(doc: &Document, group: &str) -> Vec<String> {
        doc.record(group)
            .and_then(|g| g.array("children"))
            .unwrap()
            .reference_ids()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_create_group_links_parent() {
        setup();
        let mut doc = project();
        let before = doc.objects().len();

        let group = doc.create_group(None, "Resources", Some(GROUP)).unwrap();
        let id = group.id().to_string();
        assert_eq!(group.isa(), Some("PBXGroup"));
        assert_eq!(group.comment.as_deref(), Some("Resources"));
        assert!(group.get("path").unwrap().is_null());
        assert!(group.array("children").unwrap().is_empty());

        assert_eq!(doc.objects().len(), before + 1);
        assert_eq!(children(&doc, GROUP), [APP, MAIN_M, id.as_str()]);
    }

    #[test]
    fn test_create_group_missing_parent() {
        setup();
        let mut doc = project();
        let snapshot = doc.clone();
        let err = doc
            .create_group(Some("x"), "X", Some("000000000000000000000000"))
            .unwrap_err();
        assert_eq!(
            err,
            MutationError::NotFound {
                id: "000000000000000000000000".into(),
                expected: "group"
            }
        );
        // A file reference is not a group either.
        assert!(doc.create_group(None, "X", Some(MAIN_M)).is_err());
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn test_create_file_reference() {
        setup();
        let mut doc = project();
        let file = doc
            .create_file_reference("Vendor/Lib.framework", None, GROUP)
            .unwrap();
        let id = file.id().to_string();
        assert_eq!(file.comment.as_deref(), Some("Lib.framework"));
        assert_eq!(
            file.get("lastKnownFileType").and_then(Value::as_str),
            Some("wrapper.framework")
        );
        assert_eq!(file.get("name").and_then(Value::as_str), Some("Lib.framework"));
        assert_eq!(
            file.get("path").and_then(Value::as_str),
            Some("Vendor/Lib.framework")
        );
        assert!(children(&doc, GROUP).contains(&id));

        let plain = doc.create_file_reference("notes.md", Some("net.daringfireball.markdown"), GROUP).unwrap();
        assert!(plain.get("name").is_none());
        assert_eq!(
            plain.get("lastKnownFileType").and_then(Value::as_str),
            Some("net.daringfireball.markdown")
        );
    }

    #[test]
    fn test_attach_build_file() {
        setup();
        let mut doc = project();
        let build_file = doc.attach_build_file(MAIN_M, SOURCES).unwrap();
        let id = build_file.id().to_string();
        assert_eq!(build_file.comment.as_deref(), Some("main.m in Sources"));
        let file_ref = build_file.get("fileRef").and_then(Value::as_reference).unwrap();
        assert_eq!(file_ref.id(), MAIN_M);
        assert_eq!(file_ref.comment.as_deref(), Some("main.m"));

        let files = doc.record(SOURCES).and_then(|p| p.array("files")).unwrap();
        assert_eq!(files.reference_ids().collect::<Vec<_>>(), [id.as_str()]);
        assert_eq!(doc.records_of("PBXBuildFile").count(), 1);
    }

    #[test]
    fn test_attach_twice_conflicts() {
        setup();
        let mut doc = project();
        doc.attach_build_file(MAIN_M, SOURCES).unwrap();
        let snapshot = doc.clone();
        assert!(matches!(
            doc.attach_build_file(MAIN_M, SOURCES),
            Err(MutationError::Conflict { .. })
        ));
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn test_attach_missing_sides() {
        setup();
        let mut doc = project();
        let snapshot = doc.clone();
        assert_eq!(
            doc.attach_build_file(MAIN_M, "FFFFFFFFFFFFFFFFFFFFFFFF").unwrap_err(),
            MutationError::NotFound {
                id: "FFFFFFFFFFFFFFFFFFFFFFFF".into(),
                expected: "build phase"
            }
        );
        assert_eq!(
            doc.attach_build_file(GROUP, SOURCES).unwrap_err(),
            MutationError::NotFound {
                id: GROUP.into(),
                expected: "file reference"
            }
        );
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn test_detach_build_file() {
        setup();
        let mut doc = project();
        let id = doc.attach_build_file(MAIN_M, SOURCES).unwrap().id().to_string();
        let removed = doc.detach_build_file(MAIN_M, SOURCES).unwrap();
        assert_eq!(removed.id(), id);
        assert!(doc.record(SOURCES).and_then(|p| p.array("files")).unwrap().is_empty());
        assert!(doc.objects().is_retired(&id));
        assert!(doc.detach_build_file(MAIN_M, SOURCES).is_err());
    }

    #[test]
    fn test_remove_from_group() {
        setup();
        let mut doc = project();
        let group = doc.remove_from_group(MAIN_M, GROUP).unwrap();
        assert_eq!(group.id(), GROUP);
        assert_eq!(children(&doc, GROUP), [APP]);
        // The file reference itself survives.
        assert!(doc.record(MAIN_M).is_some());
        assert_eq!(
            doc.remove_from_group(MAIN_M, GROUP).unwrap_err(),
            MutationError::NotFound {
                id: MAIN_M.into(),
                expected: "group member"
            }
        );
    }

    #[test]
    fn test_remove_record_purges_references() {
        setup();
        let mut doc = project();
        doc.remove_record(MAIN_M).unwrap();
        assert_eq!(children(&doc, GROUP), [APP]);
        assert!(doc.objects().is_retired(MAIN_M));
        assert!(doc.remove_record(MAIN_M).is_err());
    }

    #[test]
    fn test_remove_record_takes_wrapping_build_files() {
        setup();
        let mut doc = project();
        let build_file = doc.attach_build_file(MAIN_M, SOURCES).unwrap().id().to_string();
        doc.remove_record(MAIN_M).unwrap();
        assert!(doc.record(&build_file).is_none());
        assert!(doc.objects().is_retired(&build_file));
        assert!(doc.record(SOURCES).and_then(|p| p.array("files")).unwrap().is_empty());
    }

    #[test]
    fn test_remove_record_refuses_while_referenced() {
        setup();
        let mut doc = project();
        let project_record = Record::new(
            "29B97313FDCFA39411CA2CEA",
            Some("Project object"),
            Object::new()
                .with("isa", "PBXProject")
                .with("mainGroup", Reference::new(GROUP, Some("CustomTemplate"))),
        );
        doc.add_record(project_record).unwrap();
        doc.set_root_field("rootObject", Reference::new(TARGET, None).into());
        let before = doc.clone();

        let err = doc.remove_record(GROUP).unwrap_err();
        assert!(matches!(err, MutationError::Conflict { .. }), "{err}");
        let err = doc.remove_record(TARGET).unwrap_err();
        assert!(matches!(err, MutationError::Conflict { .. }), "{err}");
        assert_eq!(doc, before);
        assert!(doc.objects().contains(GROUP));
    }

    #[test]
    fn test_names_cannot_close_comments() {
        setup();
        let mut doc = project();
        let before = doc.clone();
        let rejected = [
            doc.create_group(None, "a */ b", Some(GROUP)).map(|_| ()),
            doc.create_build_phase("PBXShellScriptBuildPhase", Some("*/"), Some(TARGET))
                .map(|_| ()),
            doc.add_record(Record::new(
                "AAAAAAAAAAAAAAAAAAAAAAAA",
                Some("x */"),
                Object::new().with("isa", "PBXGroup"),
            ))
            .map(|_| ()),
        ];
        for result in rejected {
            assert!(matches!(result, Err(MutationError::Conflict { .. })), "{result:?}");
        }
        assert_eq!(doc, before);
    }

    #[test]
    fn test_create_build_phase() {
        setup();
        let mut doc = project();
        let phase = doc
            .create_build_phase("PBXResourcesBuildPhase", None, Some(TARGET))
            .unwrap();
        let id = phase.id().to_string();
        assert_eq!(phase.comment.as_deref(), Some("Resources"));
        assert_eq!(
            phase.get("buildActionMask").and_then(Value::as_str),
            Some("2147483647")
        );
        let phases: Vec<_> = doc
            .record(TARGET)
            .and_then(|t| t.array("buildPhases"))
            .unwrap()
            .reference_ids()
            .map(str::to_string)
            .collect();
        assert_eq!(phases, [SOURCES, id.as_str()]);

        // Sorted into place between the existing sections.
        let names: Vec<_> = doc.sections().iter().map(|s| s.isa.as_str()).collect();
        assert_eq!(
            names,
            [
                "PBXFileReference",
                "PBXGroup",
                "PBXNativeTarget",
                "PBXResourcesBuildPhase",
                "PBXSourcesBuildPhase",
                "XCBuildConfiguration"
            ]
        );

        assert!(matches!(
            doc.create_build_phase("PBXGroup", None, None),
            Err(MutationError::Conflict { .. })
        ));
        assert!(doc.create_build_phase("PBXCopyFilesBuildPhase", Some("Embed"), Some(GROUP)).is_err());
    }

    #[test]
    fn test_build_settings() {
        setup();
        let mut doc = project();
        assert_eq!(
            doc.set_build_setting("ENABLE_BITCODE", "NO".into(), Some("Debug")).unwrap(),
            1
        );
        assert_eq!(doc.set_build_setting("SWIFT_VERSION", "5.0".into(), None).unwrap(), 2);

        let settings = |id: &str| {
            doc.record(id)
                .and_then(|r| r.get("buildSettings"))
                .and_then(Value::as_object)
                .cloned()
                .unwrap()
        };
        assert!(settings("C01FCF4F08A954540054247B").contains_key("ENABLE_BITCODE"));
        assert!(!settings("C01FCF5008A954540054247B").contains_key("ENABLE_BITCODE"));

        assert_eq!(doc.remove_build_setting("ENABLE_BITCODE", None).unwrap(), 1);
        assert!(matches!(
            doc.set_build_setting("X", "1".into(), Some("Profile")),
            Err(MutationError::NotFound { .. })
        ));
    }

    #[test]
    fn test_generated_ids_avoid_retired() {
        setup();
        let mut doc = project();
        let first = doc.create_group(None, "A", None).unwrap().id().to_string();
        doc.remove_record(&first).unwrap();
        // Replaying the same seed would draw `first` again; it must be skipped.
        doc.set_id_generator(IdGenerator::seeded(42));
        let second = doc.create_group(None, "B", None).unwrap().id().to_string();
        assert_ne!(first, second);
    }

    #[test]
    fn test_add_record() {
        setup();
        let mut doc = project();
        let record = Record::new(
            "AAAAAAAAAAAAAAAAAAAAAAAA",
            Some("Debug"),
            Object::new().with("isa", "XCConfigurationList"),
        );
        doc.add_record(record.clone()).unwrap();
        assert_eq!(doc.records_of("XCConfigurationList").count(), 1);
        assert!(matches!(
            doc.add_record(record),
            Err(MutationError::Conflict { .. })
        ));

        let untyped = Record::new("BBBBBBBBBBBBBBBBBBBBBBBB", None, Object::new());
        assert!(doc.add_record(untyped).is_err());
        assert!(!doc.objects().contains("BBBBBBBBBBBBBBBBBBBBBBBB"));
    }

    #[test]
    fn test_file_type_for() {
        assert_eq!(file_type_for("a/b/main.m"), "sourcecode.c.objc");
        assert_eq!(file_type_for("View.swift"), "sourcecode.swift");
        assert_eq!(file_type_for("libz.dylib"), "compiled.mach-o.dylib");
        assert_eq!(file_type_for("README"), "text");
        assert_eq!(file_type_for("dir.d/README"), "text");
    }
}
