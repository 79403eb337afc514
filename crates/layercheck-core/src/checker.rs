//! Cross-references scanned imports against the layer policy.

use std::path::Path;

use crate::config::LayersConfig;
use crate::report::Violation;
use crate::resolver::PackageResolver;
use crate::scanner;

/// Ignore patterns appended when test files are excluded from the check.
///
/// Test code is allowed to reach across layers for fixture composition, so
/// these are on by default.
const DEFAULT_TEST_IGNORES: &[&str] = &["**/tests/**", "**/test_*.py"];

/// Fallback layer name for a package that resolved as local but is declared
/// in no layer.
const UNKNOWN_LAYER: &str = "unknown";

/// Checks every import under `<root>/packages` against the layering policy.
///
/// A root without a `packages/` directory is trivially compliant and yields
/// an empty list. Imports from unowned files, imports of stdlib or
/// third-party modules, and self-imports are skipped before the policy is
/// consulted. The result order follows the sorted file walk, so repeated
/// runs over an unchanged tree are identical.
#[must_use]
pub fn check_layers(root: &Path, config: &LayersConfig, include_tests: bool) -> Vec<Violation> {
    let mut ignore_patterns = config.ignore_paths.clone();
    if !include_tests {
        for pattern in DEFAULT_TEST_IGNORES {
            if !ignore_patterns.iter().any(|p| p == pattern) {
                ignore_patterns.push((*pattern).to_string());
            }
        }
    }

    let packages_dir = root.join("packages");
    if !packages_dir.is_dir() {
        tracing::info!(root = %root.display(), "no packages directory, nothing to check");
        return Vec::new();
    }

    let resolver = PackageResolver::new(root);
    let imports = scanner::scan_directory(&packages_dir, &ignore_patterns);

    tracing::info!(
        imports = imports.len(),
        modules = resolver.module_count(),
        "checking imports against {} layers",
        config.layers.len()
    );

    let mut violations = Vec::new();

    for import in imports {
        let Some(from_package) = resolver.source_package(&import.file_path) else {
            continue;
        };
        let Some(to_package) = resolver.resolve(&import.module) else {
            continue;
        };
        if from_package == to_package {
            continue;
        }

        let decision = config.is_import_allowed(&from_package, to_package);
        if decision.is_allowed() {
            continue;
        }

        violations.push(Violation {
            from_layer: layer_name_or_unknown(config, &from_package),
            to_layer: layer_name_or_unknown(config, to_package),
            file_path: import.file_path,
            line_number: import.line_number,
            import_module: import.module,
            from_package,
            to_package: to_package.to_string(),
            reason: decision.reason().to_string(),
        });
    }

    tracing::info!(violations = violations.len(), "check complete");
    violations
}

/// Defensive fallback for resolver/config drift: a locally resolved package
/// may still be absent from every declared layer.
fn layer_name_or_unknown(config: &LayersConfig, package: &str) -> String {
    config
        .get_layer_for_package(package)
        .map_or_else(|| UNKNOWN_LAYER.to_string(), |l| l.name.clone())
}
