//! Test utilities shared by the pbxproj crates.
//!
//! - [`setup`] installs a tracing subscriber that writes through the test
//!   harness, filtered by `RUST_LOG` (default `debug`).
//! - [`assert_text_eq!`] compares two texts and, on mismatch, panics with a
//!   unified line diff instead of two giant string literals.
//! - [`fixture!`] reads `tests/fixtures/<name>.pbxproj` of the calling crate.

use std::path::Path;
use std::sync::Once;

use similar::{ChangeTag, TextDiff};
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the test tracing subscriber. Safe to call from every test.
pub fn setup() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
        tracing::trace!("test tracing initialized");
    });
}

/// Render a line diff between `expected` and `actual`.
///
/// Tabs are shown as `→` so indentation mistakes are visible.
pub fn render_diff(expected: &str, actual: &str) -> String {
    let diff = TextDiff::from_lines(expected, actual);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => ' ',
        };
        out.push(sign);
        out.push_str(&change.value().replace('\t', "→"));
        if change.missing_newline() {
            out.push_str("\n\\ no newline at end of text\n");
        }
    }
    out
}

/// Lines present in `actual` but not in `expected`, in order.
pub fn added_lines(expected: &str, actual: &str) -> Vec<String> {
    TextDiff::from_lines(expected, actual)
        .iter_all_changes()
        .filter(|c| c.tag() == ChangeTag::Insert)
        .map(|c| c.value().trim_end_matches('\n').to_string())
        .collect()
}

/// Lines present in `expected` but not in `actual`, in order.
pub fn removed_lines(expected: &str, actual: &str) -> Vec<String> {
    TextDiff::from_lines(expected, actual)
        .iter_all_changes()
        .filter(|c| c.tag() == ChangeTag::Delete)
        .map(|c| c.value().trim_end_matches('\n').to_string())
        .collect()
}

/// Read `<manifest_dir>/tests/fixtures/<name>.pbxproj`, panicking if absent.
pub fn load_fixture(manifest_dir: &str, name: &str) -> String {
    let path = Path::new(manifest_dir)
        .join("tests/fixtures")
        .join(format!("{name}.pbxproj"));
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

/// Load a fixture of the crate this is expanded in.
#[macro_export]
macro_rules! fixture {
    ($name:expr) => {
        $crate::load_fixture(env!("CARGO_MANIFEST_DIR"), $name)
    };
}

/// Assert two texts are byte-identical, printing a line diff otherwise.
#[macro_export]
macro_rules! assert_text_eq {
    ($expected:expr, $actual:expr $(,)?) => {{
        let expected: &str = &$expected;
        let actual: &str = &$actual;
        if expected != actual {
            panic!(
                "texts differ (- expected, + actual):\n{}",
                $crate::render_diff(expected, actual)
            );
        }
    }};
}
