//! Layer policy configuration loaded from `layers.yaml`.
//!
//! The YAML file declares named layers in foundational-first order, glob
//! patterns to ignore, an allow-list of import exceptions, and the default
//! layering rule. Deserialization goes through a raw serde DTO which is then
//! converted into the validated [`LayersConfig`] domain model.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The default layering rule: imports may only target the same or a more
/// foundational layer.
pub const RULE_SAME_OR_LOWER: &str = "same_or_lower";

/// Errors raised while loading or validating a layers config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file does not exist.
    #[error("config file not found: {path}")]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The config file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not valid YAML or does not match the expected schema.
    /// serde_yaml messages name the offending key or list index.
    #[error("invalid config: {message}")]
    Parse {
        /// Parse error detail.
        message: String,
    },

    /// The YAML parsed but a field-level constraint failed.
    #[error("config validation: {0}")]
    Validation(String),
}

/// A named layer in the dependency hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// Layer name (e.g., `"tier1"`).
    pub name: String,
    /// Packages belonging to this layer.
    pub packages: Vec<String>,
    /// Ordinal level assigned by declaration order; lower = more foundational.
    pub level: usize,
}

/// An explicit `(from, to)` package pair exempted from the default rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AllowedImport {
    /// Importing package.
    #[serde(rename = "from")]
    pub from_package: String,
    /// Imported package.
    #[serde(rename = "to")]
    pub to_package: String,
}

/// Outcome of an import-policy decision, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportDecision {
    /// The import is allowed.
    Allow {
        /// Why the import is allowed.
        reason: String,
    },
    /// The import violates the layering policy.
    Deny {
        /// Why the import is denied.
        reason: String,
    },
}

impl ImportDecision {
    /// Whether the decision allows the import.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    /// The reason string attached to the decision.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Allow { reason } | Self::Deny { reason } => reason,
        }
    }
}

/// The parsed and validated layering policy. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct LayersConfig {
    /// Declared layers, in declaration (level) order.
    pub layers: Vec<Layer>,
    /// Glob patterns for paths excluded from scanning.
    pub ignore_paths: Vec<String>,
    /// Explicit import exceptions.
    pub allowed_imports: Vec<AllowedImport>,
    /// Name of the default rule applied when no allow-list entry matches.
    pub default_rule: String,
}

impl LayersConfig {
    /// Finds the layer whose package list contains `package_name`.
    ///
    /// Layers are searched in declaration order; the first match wins.
    #[must_use]
    pub fn get_layer_for_package(&self, package_name: &str) -> Option<&Layer> {
        self.layers
            .iter()
            .find(|layer| layer.packages.iter().any(|p| p == package_name))
    }

    /// Decides whether an import from `from_package` to `to_package` is
    /// allowed under this policy.
    ///
    /// Packages absent from every layer are not the checker's concern and are
    /// always allowed. The allow-list wins over the default rule regardless
    /// of relative levels.
    #[must_use]
    pub fn is_import_allowed(&self, from_package: &str, to_package: &str) -> ImportDecision {
        let (Some(from_layer), Some(to_layer)) = (
            self.get_layer_for_package(from_package),
            self.get_layer_for_package(to_package),
        ) else {
            return ImportDecision::Allow {
                reason: "not configured".to_string(),
            };
        };

        let allow_listed = self
            .allowed_imports
            .iter()
            .any(|a| a.from_package == from_package && a.to_package == to_package);
        if allow_listed {
            return ImportDecision::Allow {
                reason: "explicitly allowed".to_string(),
            };
        }

        if self.default_rule == RULE_SAME_OR_LOWER {
            if to_layer.level <= from_layer.level {
                return ImportDecision::Allow {
                    reason: format!("allowed: {} <= {}", to_layer.name, from_layer.name),
                };
            }
            return ImportDecision::Deny {
                reason: format!(
                    "violation: {} (level {}) cannot import from {} (level {})",
                    from_layer.name, from_layer.level, to_layer.name, to_layer.level
                ),
            };
        }

        // Fail-open on unknown rule names, preserved from the original tool.
        tracing::warn!(rule = %self.default_rule, "unknown default rule, allowing import");
        ImportDecision::Allow {
            reason: "unknown rule".to_string(),
        }
    }
}

// ── Raw YAML representation (serde DTO layer) ──

#[derive(Debug, Deserialize)]
struct RawConfig {
    layers: Vec<RawLayer>,
    #[serde(default)]
    ignore: IgnoreSection,
    #[serde(default)]
    allow: AllowSection,
    #[serde(default)]
    rules: RulesSection,
}

#[derive(Debug, Deserialize)]
struct RawLayer {
    name: String,
    #[serde(default)]
    packages: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct IgnoreSection {
    #[serde(default)]
    paths: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AllowSection {
    #[serde(default)]
    imports: Vec<AllowedImport>,
}

#[derive(Debug, Default, Deserialize)]
struct RulesSection {
    #[serde(default)]
    default: Option<String>,
}

/// Loads and validates a layers configuration from a YAML file.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file is missing, unreadable, not valid
/// YAML, does not match the schema, or declares a layer with an empty name.
pub fn load_config(path: &Path) -> Result<LayersConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config(&content)
}

/// Parses a layers configuration from a YAML string.
///
/// # Errors
///
/// Returns [`ConfigError`] when the YAML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<LayersConfig, ConfigError> {
    let raw: RawConfig = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
        message: e.to_string(),
    })?;

    let layers: Vec<Layer> = raw
        .layers
        .into_iter()
        .enumerate()
        .map(|(level, l)| Layer {
            name: l.name,
            packages: l.packages,
            level,
        })
        .collect();

    for (i, layer) in layers.iter().enumerate() {
        if layer.name.is_empty() {
            return Err(ConfigError::Validation(format!(
                "layers[{i}]: `name` must be non-empty"
            )));
        }
    }

    Ok(LayersConfig {
        layers,
        ignore_paths: raw.ignore.paths,
        allowed_imports: raw.allow.imports,
        default_rule: raw
            .rules
            .default
            .unwrap_or_else(|| RULE_SAME_OR_LOWER.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r"
layers:
  - name: tier1
    packages: [pkg-tier1]
  - name: tier2
    packages: [pkg-tier2]
  - name: tier3
    packages: [pkg-tier3]
ignore:
  paths:
    - '**/migrations/**'
allow:
  imports:
    - {from: pkg-tier1, to: pkg-tier2}
rules:
  default: same_or_lower
";

    #[test]
    fn parses_layers_with_positional_levels() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.layers.len(), 3);
        assert_eq!(config.layers[0].name, "tier1");
        assert_eq!(config.layers[0].level, 0);
        assert_eq!(config.layers[2].level, 2);
        assert_eq!(config.default_rule, RULE_SAME_OR_LOWER);
        assert_eq!(config.ignore_paths, vec!["**/migrations/**"]);
    }

    #[test]
    fn packages_default_to_empty() {
        let config = parse_config("layers:\n  - name: solo\n").unwrap();
        assert!(config.layers[0].packages.is_empty());
        assert!(config.allowed_imports.is_empty());
        assert!(config.ignore_paths.is_empty());
    }

    #[test]
    fn missing_layers_key_is_an_error() {
        let err = parse_config("ignore:\n  paths: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("layers"));
    }

    #[test]
    fn non_mapping_document_is_an_error() {
        let err = parse_config("just a string").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn wrong_type_for_packages_is_an_error() {
        let err = parse_config("layers:\n  - name: a\n    packages: 42\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn empty_layer_name_fails_validation() {
        let err = parse_config("layers:\n  - name: ''\n").unwrap_err();
        assert!(err.to_string().contains("layers[0]"));
    }

    #[test]
    fn missing_file_reports_not_found() {
        let err = load_config(Path::new("/nonexistent/layers.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn finds_layer_for_package() {
        let config = parse_config(SAMPLE).unwrap();
        let layer = config.get_layer_for_package("pkg-tier2").unwrap();
        assert_eq!(layer.name, "tier2");
        assert_eq!(layer.level, 1);
        assert!(config.get_layer_for_package("pkg-missing").is_none());
    }

    #[test]
    fn unconfigured_package_is_not_our_concern() {
        let config = parse_config(SAMPLE).unwrap();
        let decision = config.is_import_allowed("pkg-tier1", "requests");
        assert!(decision.is_allowed());
        assert_eq!(decision.reason(), "not configured");
    }

    #[test]
    fn allow_list_wins_over_level_order() {
        let config = parse_config(SAMPLE).unwrap();
        let decision = config.is_import_allowed("pkg-tier1", "pkg-tier2");
        assert!(decision.is_allowed());
        assert_eq!(decision.reason(), "explicitly allowed");
    }

    #[test]
    fn same_or_lower_allows_downward_import() {
        let config = parse_config(SAMPLE).unwrap();
        assert!(config.is_import_allowed("pkg-tier2", "pkg-tier1").is_allowed());
        assert!(config.is_import_allowed("pkg-tier2", "pkg-tier2").is_allowed());
    }

    #[test]
    fn same_or_lower_denies_upward_import() {
        let config = parse_config(SAMPLE).unwrap();
        let decision = config.is_import_allowed("pkg-tier2", "pkg-tier3");
        assert!(!decision.is_allowed());
        assert_eq!(
            decision.reason(),
            "violation: tier2 (level 1) cannot import from tier3 (level 2)"
        );
    }

    #[test]
    fn unknown_rule_fails_open() {
        let mut config = parse_config(SAMPLE).unwrap();
        config.default_rule = "strict_acyclic".to_string();
        let decision = config.is_import_allowed("pkg-tier2", "pkg-tier3");
        assert!(decision.is_allowed());
        assert_eq!(decision.reason(), "unknown rule");
    }
}
