//! Options for writing project files.

/// Options for writing a [`Document`](pbxproj_tree::Document).
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Omit fields whose value is null (default: false).
    /// When false, a null field is written as `key = "";`.
    pub drop_empty_values: bool,

    /// Indentation string (default: "\t")
    pub indent: &'static str,

    /// Record kinds written on a single line
    /// (default: `PBXBuildFile`, `PBXFileReference`)
    pub inline_record_kinds: &'static [&'static str],
}

/// Record kinds Xcode writes on one line.
pub const INLINE_RECORD_KINDS: &[&str] = &["PBXBuildFile", "PBXFileReference"];

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            drop_empty_values: false,
            indent: "\t",
            inline_record_kinds: INLINE_RECORD_KINDS,
        }
    }
}

impl WriteOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Omit null-valued fields.
    pub fn drop_empty_values(mut self, drop: bool) -> Self {
        self.drop_empty_values = drop;
        self
    }

    /// Set a custom indentation string.
    pub fn indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self
    }

    /// Set which record kinds are written on a single line.
    pub fn inline_record_kinds(mut self, kinds: &'static [&'static str]) -> Self {
        self.inline_record_kinds = kinds;
        self
    }

    /// Whether records of kind `isa` are written on a single line.
    pub fn is_inline_kind(&self, isa: &str) -> bool {
        self.inline_record_kinds.contains(&isa)
    }
}
