//! Tree-sitter based import scanner for Python source files.
//!
//! Walks a directory tree, parses each `*.py` file with the Python grammar,
//! and collects every import statement with its originating file and line.
//! Files that cannot be read or parsed are skipped silently: a single bad
//! file degrades coverage, never the whole scan.

use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};
use walkdir::WalkDir;

/// A detected import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// The imported module as a dotted name (e.g., `pkg_tier1.models`).
    pub module: String,
    /// Source file containing the import.
    pub file_path: PathBuf,
    /// Line number of the import statement (1-indexed).
    pub line_number: usize,
}

/// Scans a single Python file for imports.
///
/// Returns an empty list when the file cannot be read, decoded, or parsed.
#[must_use]
pub fn scan_file(file_path: &Path) -> Vec<Import> {
    let Ok(source) = std::fs::read_to_string(file_path) else {
        tracing::debug!(file = %file_path.display(), "skipping unreadable file");
        return Vec::new();
    };
    scan_source(&source, file_path)
}

/// Scans Python source text for imports, attributing them to `file_path`.
#[must_use]
pub fn scan_source(source: &str, file_path: &Path) -> Vec<Import> {
    let mut parser = Parser::new();
    if parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .is_err()
    {
        return Vec::new();
    }
    let Some(tree) = parser.parse(source, None) else {
        tracing::debug!(file = %file_path.display(), "skipping unparseable file");
        return Vec::new();
    };

    // Tree-sitter degrades to a partial tree on syntax errors instead of
    // failing; a file with error nodes contributes no imports at all.
    if tree.root_node().has_error() {
        tracing::debug!(file = %file_path.display(), "skipping file with syntax errors");
        return Vec::new();
    }

    let src = source.as_bytes();
    let mut imports = Vec::new();

    // Imports may appear at any nesting depth, so walk the whole tree.
    let mut stack = vec![tree.root_node()];
    while let Some(node) = stack.pop() {
        match node.kind() {
            "import_statement" => collect_plain_import(&node, src, file_path, &mut imports),
            "import_from_statement" => collect_from_import(&node, src, file_path, &mut imports),
            _ => {}
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }

    imports
}

/// Scans all Python files under `root`, honoring the ignore glob patterns.
///
/// Files are visited in sorted path order so repeated scans of an unchanged
/// tree yield identical results.
#[must_use]
pub fn scan_directory(root: &Path, ignore_patterns: &[String]) -> Vec<Import> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("py"))
        .collect();
    files.sort();

    let mut all_imports = Vec::new();
    for file in files {
        if should_ignore(&file, root, ignore_patterns) {
            tracing::debug!(file = %file.display(), "ignored by pattern");
            continue;
        }
        all_imports.extend(scan_file(&file));
    }

    tracing::debug!(count = all_imports.len(), root = %root.display(), "scan complete");
    all_imports
}

/// Handles `import a.b, c as d` statements: one [`Import`] per named module.
fn collect_plain_import(node: &Node<'_>, src: &[u8], file_path: &Path, out: &mut Vec<Import>) {
    let line_number = node.start_position().row + 1;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        let module = match child.kind() {
            "dotted_name" => Some(node_text(&child, src)),
            "aliased_import" => child
                .child_by_field_name("name")
                .map(|name| node_text(&name, src)),
            _ => None,
        };
        if let Some(module) = module {
            out.push(Import {
                module: module.to_string(),
                file_path: file_path.to_path_buf(),
                line_number,
            });
        }
    }
}

/// Handles `from a.b import c` statements: one [`Import`] keyed on the module,
/// ignoring the imported names. `from . import x` carries no resolvable
/// module name and is skipped; `from .sub import x` records `sub`.
fn collect_from_import(node: &Node<'_>, src: &[u8], file_path: &Path, out: &mut Vec<Import>) {
    let Some(module_node) = node.child_by_field_name("module_name") else {
        return;
    };

    let module = match module_node.kind() {
        "dotted_name" => Some(node_text(&module_node, src).to_string()),
        "relative_import" => (0..module_node.child_count())
            .filter_map(|i| module_node.child(i))
            .find(|c| c.kind() == "dotted_name")
            .map(|c| node_text(&c, src).to_string()),
        _ => None,
    };

    if let Some(module) = module {
        out.push(Import {
            module,
            file_path: file_path.to_path_buf(),
            line_number: node.start_position().row + 1,
        });
    }
}

fn node_text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
    std::str::from_utf8(&src[node.start_byte()..node.end_byte()]).unwrap_or("")
}

/// Checks a file against ignore patterns, relative to the scan root.
fn should_ignore(file_path: &Path, root: &Path, patterns: &[String]) -> bool {
    let rel = file_path.strip_prefix(root).unwrap_or(file_path);
    let rel_str = rel.to_string_lossy().replace('\\', "/");

    patterns.iter().any(|p| matches_pattern(&rel_str, p))
}

/// Glob matching with monorepo-style `**` semantics.
///
/// A pattern containing `**` is split on `**`: a pattern that reduces to
/// nothing matches everything; otherwise every literal segment between `**`
/// separators must appear, in order, as a `/segment/` substring of the
/// normalized path. Segments still carrying `*`/`?` fall through to full
/// glob matching, as do patterns without `**`.
#[must_use]
pub fn matches_pattern(path: &str, pattern: &str) -> bool {
    let pattern = pattern.replace('\\', "/");

    if pattern.contains("**") {
        let segments: Vec<&str> = pattern
            .split("**")
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty())
            .collect();

        if segments.is_empty() {
            return true;
        }

        if segments.iter().any(|s| s.contains('*') || s.contains('?')) {
            return glob_matches(path, &pattern);
        }

        let normalized = format!("/{path}/");
        let mut pos = 0usize;
        for segment in segments {
            let needle = format!("/{segment}/");
            let Some(found) = normalized[pos..].find(&needle) else {
                return false;
            };
            // Keep the trailing slash available for the next segment.
            pos += found + needle.len() - 1;
        }
        return true;
    }

    glob_matches(path, &pattern)
}

fn glob_matches(path: &str, pattern: &str) -> bool {
    glob::Pattern::new(pattern).is_ok_and(|p| p.matches(path))
}
