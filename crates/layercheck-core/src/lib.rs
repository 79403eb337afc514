//! # layercheck-core
//!
//! Static import-boundary checking for Python monorepos laid out as
//! `<root>/packages/<package>/src/<module>/`.
//!
//! The pipeline is strictly one-directional:
//!
//! 1. [`load_config`] parses the `layers.yaml` policy into a [`LayersConfig`];
//! 2. [`scanner::scan_directory`] extracts [`Import`]s from the source tree
//!    via Tree-sitter;
//! 3. [`PackageResolver`] classifies import targets as local, stdlib, or
//!    third-party;
//! 4. [`check_layers`] cross-references imports against the policy into
//!    [`Violation`]s;
//! 5. [`report::format_text`] / [`report::format_json`] render the result.
//!
//! ## Example
//!
//! ```ignore
//! use layercheck_core::{check_layers, load_config};
//!
//! let config = load_config(std::path::Path::new("layers.yaml"))?;
//! let violations = check_layers(std::path::Path::new("."), &config, false);
//! println!("{}", layercheck_core::report::format_text(&violations, None));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod checker;
pub mod config;
pub mod report;
pub mod resolver;
pub mod scanner;

pub use checker::check_layers;
pub use config::{load_config, parse_config, ConfigError, ImportDecision, Layer, LayersConfig};
pub use report::{format_json, format_text, Violation};
pub use resolver::PackageResolver;
pub use scanner::{scan_directory, scan_file, Import};
