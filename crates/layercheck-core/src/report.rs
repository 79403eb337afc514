//! Violation records and report rendering.

use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Remediation hint appended to every violation in the text report.
const HINT: &str = "move shared code to a lower layer, or add an explicit allow rule";

/// A single layer-boundary violation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Source file containing the offending import.
    pub file_path: PathBuf,
    /// Line number of the import statement.
    pub line_number: usize,
    /// The imported module as written in source.
    pub import_module: String,
    /// Package owning the source file.
    pub from_package: String,
    /// Package being imported.
    pub to_package: String,
    /// Layer of the source package.
    pub from_layer: String,
    /// Layer of the imported package.
    pub to_layer: String,
    /// Why this import is a violation.
    pub reason: String,
}

/// JSON shape of a violation.
#[derive(Debug, Serialize)]
struct ViolationRecord<'a> {
    file: String,
    line: usize,
    import: &'a str,
    from_package: &'a str,
    to_package: &'a str,
    from_layer: &'a str,
    to_layer: &'a str,
    reason: &'a str,
}

impl<'a> From<&'a Violation> for ViolationRecord<'a> {
    fn from(v: &'a Violation) -> Self {
        Self {
            file: v.file_path.display().to_string(),
            line: v.line_number,
            import: &v.import_module,
            from_package: &v.from_package,
            to_package: &v.to_package,
            from_layer: &v.from_layer,
            to_layer: &v.to_layer,
            reason: &v.reason,
        }
    }
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    violations: Vec<ViolationRecord<'a>>,
    count: usize,
}

/// Renders violations as a human-readable text report.
///
/// File paths are shown relative to `root_dir` when provided; files outside
/// the root fall back to their absolute path.
#[must_use]
pub fn format_text(violations: &[Violation], root_dir: Option<&Path>) -> String {
    if violations.is_empty() {
        return "No layer violations found.".to_string();
    }

    let plural = if violations.len() == 1 { "" } else { "s" };
    let mut out = format!("Found {} layer violation{plural}:\n", violations.len());

    for v in violations {
        let shown_path = root_dir
            .and_then(|root| v.file_path.strip_prefix(root).ok())
            .unwrap_or(&v.file_path);

        let _ = write!(
            out,
            "\n{}:{}\n  import: {}\n  from: {} (layer: {})\n  to: {} (layer: {})\n  reason: {}\n  hint: {HINT}\n",
            shown_path.display(),
            v.line_number,
            v.import_module,
            v.from_package,
            v.from_layer,
            v.to_package,
            v.to_layer,
            v.reason,
        );
    }

    out
}

/// Renders violations as a JSON document with a `violations` array and a
/// `count` field.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn format_json(violations: &[Violation]) -> Result<String, serde_json::Error> {
    let report = Report {
        violations: violations.iter().map(ViolationRecord::from).collect(),
        count: violations.len(),
    };
    serde_json::to_string_pretty(&report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_violation() -> Violation {
        Violation {
            file_path: PathBuf::from("/root/packages/pkg-tier2/src/pkg_tier2/bad_import.py"),
            line_number: 42,
            import_module: "pkg_tier3.models".to_string(),
            from_package: "pkg-tier2".to_string(),
            to_package: "pkg-tier3".to_string(),
            from_layer: "tier2".to_string(),
            to_layer: "tier3".to_string(),
            reason: "violation: tier2 (level 1) cannot import from tier3 (level 2)".to_string(),
        }
    }

    #[test]
    fn empty_report_is_a_single_sentence() {
        assert_eq!(format_text(&[], None), "No layer violations found.");
    }

    #[test]
    fn text_report_shows_all_fields() {
        let text = format_text(&[sample_violation()], None);
        assert!(text.contains("1 layer violation"));
        assert!(text.contains("bad_import.py:42"));
        assert!(text.contains("pkg_tier3.models"));
        assert!(text.contains("pkg-tier2 (layer: tier2)"));
        assert!(text.contains("pkg-tier3 (layer: tier3)"));
        assert!(text.contains(HINT));
    }

    #[test]
    fn text_report_uses_relative_paths_under_root() {
        let text = format_text(&[sample_violation()], Some(Path::new("/root")));
        assert!(text.contains("packages/pkg-tier2/src/pkg_tier2/bad_import.py:42"));
        assert!(!text.contains("/root/packages"));
    }

    #[test]
    fn text_report_falls_back_to_absolute_outside_root() {
        let text = format_text(&[sample_violation()], Some(Path::new("/other")));
        assert!(text.contains("/root/packages/pkg-tier2/src/pkg_tier2/bad_import.py:42"));
    }

    #[test]
    fn text_report_pluralizes_header() {
        let text = format_text(&[sample_violation(), sample_violation()], None);
        assert!(text.contains("2 layer violations"));
    }

    #[test]
    fn json_report_round_trips() {
        let violations = [sample_violation()];
        let json = format_json(&violations).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["count"], 1);
        let list = parsed["violations"].as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(
            list[0]["file"],
            "/root/packages/pkg-tier2/src/pkg_tier2/bad_import.py"
        );
        assert_eq!(list[0]["line"], 42);
        assert_eq!(list[0]["import"], "pkg_tier3.models");
        assert_eq!(list[0]["from_layer"], "tier2");
        assert_eq!(list[0]["to_layer"], "tier3");
    }

    #[test]
    fn json_report_handles_empty_list() {
        let json = format_json(&[]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["count"], 0);
        assert!(parsed["violations"].as_array().unwrap().is_empty());
    }
}
