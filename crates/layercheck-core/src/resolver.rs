//! Resolves import module names to monorepo packages.
//!
//! The resolver indexes the conventional layout
//! `<root>/packages/<package>/src/<module>/` once at construction; a module
//! directory counts only if it carries an `__init__.py`. Classification of an
//! import target is then a lookup over the top-level dotted-name segment:
//! standard library, local package, or third-party.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Common standard-library top-level module names.
///
/// Kept as static data versioned with the tool rather than queried from a
/// live interpreter, so classification is deterministic.
const STDLIB_MODULES: &[&str] = &[
    "abc",
    "argparse",
    "ast",
    "asyncio",
    "base64",
    "collections",
    "contextlib",
    "copy",
    "csv",
    "dataclasses",
    "datetime",
    "decimal",
    "enum",
    "fnmatch",
    "functools",
    "glob",
    "hashlib",
    "html",
    "http",
    "importlib",
    "inspect",
    "io",
    "itertools",
    "json",
    "logging",
    "math",
    "os",
    "pathlib",
    "pickle",
    "pprint",
    "queue",
    "random",
    "re",
    "shutil",
    "signal",
    "socket",
    "sqlite3",
    "string",
    "subprocess",
    "sys",
    "tempfile",
    "textwrap",
    "threading",
    "time",
    "traceback",
    "types",
    "typing",
    "unittest",
    "urllib",
    "uuid",
    "warnings",
    "xml",
    "zipfile",
    // Built-in modules
    "builtins",
    "_thread",
    "errno",
    "gc",
    "marshal",
    "posix",
    "pwd",
    "grp",
];

/// Maps import module names to the monorepo packages that own them.
#[derive(Debug)]
pub struct PackageResolver {
    root: PathBuf,
    module_to_package: HashMap<String, String>,
}

impl PackageResolver {
    /// Builds a resolver for a monorepo root, eagerly indexing
    /// `packages/<pkg>/src/<module>/` entries that contain an `__init__.py`.
    ///
    /// A missing `packages/` directory yields an empty index.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        let mut module_to_package = HashMap::new();

        let packages_dir = root.join("packages");
        if let Ok(entries) = std::fs::read_dir(&packages_dir) {
            for pkg_entry in entries.filter_map(Result::ok) {
                let pkg_dir = pkg_entry.path();
                if !pkg_dir.is_dir() {
                    continue;
                }
                let pkg_name = pkg_entry.file_name().to_string_lossy().into_owned();

                let Ok(src_entries) = std::fs::read_dir(pkg_dir.join("src")) else {
                    continue;
                };
                for module_entry in src_entries.filter_map(Result::ok) {
                    let module_dir = module_entry.path();
                    if module_dir.is_dir() && module_dir.join("__init__.py").exists() {
                        let module_name = module_entry.file_name().to_string_lossy().into_owned();
                        module_to_package.insert(module_name, pkg_name.clone());
                    }
                }
            }
        }

        tracing::debug!(
            modules = module_to_package.len(),
            root = %root.display(),
            "package index built"
        );

        Self {
            root: root.to_path_buf(),
            module_to_package,
        }
    }

    /// Resolves a dotted import module to its owning local package.
    ///
    /// Returns `None` for standard-library, third-party, and unrecognized
    /// modules.
    #[must_use]
    pub fn resolve(&self, import_module: &str) -> Option<&str> {
        let top_module = top_segment(import_module);

        if self.is_stdlib(top_module) {
            return None;
        }

        self.module_to_package.get(top_module).map(String::as_str)
    }

    /// Whether a module (or its top-level segment) is in the standard library.
    #[must_use]
    pub fn is_stdlib(&self, module: &str) -> bool {
        STDLIB_MODULES.contains(&module) || STDLIB_MODULES.contains(&top_segment(module))
    }

    /// Whether a module is third-party: neither stdlib nor a local package.
    #[must_use]
    pub fn is_third_party(&self, module: &str) -> bool {
        if self.is_stdlib(module) {
            return false;
        }
        !self.module_to_package.contains_key(top_segment(module))
    }

    /// Determines which package a source file belongs to.
    ///
    /// Files outside the monorepo root, or outside the `packages/` tree, are
    /// unowned and return `None`.
    #[must_use]
    pub fn source_package(&self, file_path: &Path) -> Option<String> {
        let rel = file_path.strip_prefix(&self.root).ok()?;
        let mut parts = rel.components().map(|c| c.as_os_str().to_string_lossy());

        if parts.next()? != "packages" {
            return None;
        }
        parts.next().map(std::borrow::Cow::into_owned)
    }

    /// Number of indexed local modules.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.module_to_package.len()
    }
}

fn top_segment(module: &str) -> &str {
    module.split('.').next().unwrap_or(module)
}
