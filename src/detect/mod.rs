//! Dependency detection over generated source text.
//!
//! Two independent passes run over the same input: an import scan (explicit
//! signal) and a registry pattern scan (inferred signal). Results concatenate
//! in that order and de-duplicate by name keeping the first occurrence, so
//! import-based hits win. Detection is pure: no I/O, no shared mutable
//! state, and malformed input degrades to best-effort output instead of
//! raising.

mod imports;

use std::collections::HashSet;

use log::debug;
use serde::Serialize;

use crate::registry::Registry;

/// Where a detection came from.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DetectionSource {
    Import,
    Pattern,
}

impl std::fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionSource::Import => write!(f, "import"),
            DetectionSource::Pattern => write!(f, "pattern"),
        }
    }
}

/// One detected package with registry metadata (or placeholders for unknown
/// imports).
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DetectedPackage {
    pub name: String,
    pub version: String,
    pub is_dev: bool,
    pub description: String,
    pub source: DetectionSource,
}

/// Detects package usage in source text against an injected registry.
#[derive(Debug)]
pub struct Detector {
    registry: Registry,
}

impl Detector {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Detect required packages. The result contains no duplicate names;
    /// import-pass entries come first in scan order, then pattern-pass
    /// entries in registry order.
    #[tracing::instrument(skip(self, source))]
    pub fn detect(&self, source: &str) -> Vec<DetectedPackage> {
        let mut detected = self.detect_from_imports(source);
        detected.extend(self.detect_from_patterns(source));

        let mut seen = HashSet::new();
        detected.retain(|package| seen.insert(package.name.clone()));

        debug!("detected {} unique package(s)", detected.len());
        detected
    }

    fn detect_from_imports(&self, source: &str) -> Vec<DetectedPackage> {
        let mut packages = Vec::new();
        for specifier in imports::scan_specifiers(source) {
            // Relative/local paths are never external packages.
            if specifier.starts_with('.') || specifier.starts_with('/') {
                continue;
            }
            let name = imports::base_package_name(specifier);
            if imports::is_builtin_module(&name) {
                continue;
            }
            match self.registry.get(&name) {
                Some(record) => packages.push(DetectedPackage {
                    name,
                    version: record.version.clone(),
                    is_dev: record.dev,
                    description: record.description.clone(),
                    source: DetectionSource::Import,
                }),
                // Unknown imports are still reported, with placeholder
                // metadata.
                None => packages.push(DetectedPackage {
                    name,
                    version: "latest".to_string(),
                    is_dev: false,
                    description: "Package detected from imports".to_string(),
                    source: DetectionSource::Import,
                }),
            }
        }
        packages
    }

    fn detect_from_patterns(&self, source: &str) -> Vec<DetectedPackage> {
        let mut packages = Vec::new();
        for compiled in self.registry.compiled() {
            // One matching pattern is sufficient evidence; skip the rest.
            if compiled.patterns.iter().any(|regex| regex.is_match(source)) {
                packages.push(DetectedPackage {
                    name: compiled.record.name.clone(),
                    version: compiled.record.version.clone(),
                    is_dev: compiled.record.dev,
                    description: compiled.record.description.clone(),
                    source: DetectionSource::Pattern,
                });
            }
        }
        packages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> Detector {
        Detector::new(Registry::builtin().unwrap())
    }

    fn names(packages: &[DetectedPackage]) -> Vec<&str> {
        packages.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn empty_input_yields_empty_sequence() {
        assert!(detector().detect("").is_empty());
    }

    #[test]
    fn relative_imports_and_builtins_yield_nothing() {
        let source = r#"
            import { helper } from "./utils"
            import config from "../config"
            import fs from "fs"
            const path = require("path")
        "#;
        assert!(detector().detect(source).is_empty());
    }

    #[test]
    fn known_import_uses_registry_metadata() {
        let packages = detector().detect(r#"import axios from "axios""#);
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "axios");
        assert_eq!(packages[0].version, "^1.5.0");
        assert_eq!(packages[0].source, DetectionSource::Import);
        assert!(!packages[0].is_dev);
    }

    #[test]
    fn unknown_import_is_reported_with_placeholders() {
        let packages = detector().detect(r#"import Foo from "react""#);
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "react");
        assert_eq!(packages[0].version, "latest");
        assert_eq!(packages[0].description, "Package detected from imports");
        assert_eq!(packages[0].source, DetectionSource::Import);
    }

    #[test]
    fn scoped_and_deep_imports_collapse_to_base_names() {
        let packages = detector().detect(
            "import { useQuery } from \"@tanstack/react-query/build\"\nimport debounce from \"lodash/debounce\"",
        );
        let found = names(&packages);
        assert!(found.contains(&"@tanstack/react-query"));
        assert!(found.contains(&"lodash"));
    }

    #[test]
    fn import_entry_precedes_pattern_entry() {
        let source = "import Foo from \"react\"\nconst chart = <LineChart data={data} />";
        let packages = detector().detect(source);
        assert_eq!(packages[0].name, "react");
        assert_eq!(packages[0].source, DetectionSource::Import);
        let recharts = packages.iter().find(|p| p.name == "recharts").unwrap();
        assert_eq!(recharts.source, DetectionSource::Pattern);
        assert!(
            names(&packages).iter().position(|n| *n == "react")
                < names(&packages).iter().position(|n| *n == "recharts")
        );
    }

    #[test]
    fn import_detection_wins_over_pattern_for_the_same_package() {
        // axios both imported and used by pattern: one entry, import-sourced
        let source = "import axios from \"axios\"\naxios.get(url)";
        let packages = detector().detect(source);
        let axios: Vec<_> = packages.iter().filter(|p| p.name == "axios").collect();
        assert_eq!(axios.len(), 1);
        assert_eq!(axios[0].source, DetectionSource::Import);
    }

    #[test]
    fn no_two_entries_share_a_name() {
        let source = r#"
            import { useQuery } from "react-query"
            import { useMutation } from "react-query"
            const q = useQuery()
        "#;
        let packages = detector().detect(source);
        let mut seen = std::collections::HashSet::new();
        for package in &packages {
            assert!(seen.insert(&package.name), "duplicate {}", package.name);
        }
    }

    #[test]
    fn pattern_entries_follow_registry_order() {
        let source = "const a = <AnimatePresence />; const b = useSpring()";
        let packages = detector().detect(source);
        let framer = packages.iter().position(|p| p.name == "framer-motion");
        let spring = packages.iter().position(|p| p.name == "react-spring");
        assert!(framer.unwrap() < spring.unwrap());
    }

    #[test]
    fn detection_is_idempotent() {
        let source = "import { motion } from \"framer-motion\"\nmotion.div";
        let detector = detector();
        assert_eq!(detector.detect(source), detector.detect(source));
    }

    #[test]
    fn malformed_source_still_detects() {
        let source = "export default function( { return < import axios from \"axios\"";
        let packages = detector().detect(source);
        assert!(names(&packages).contains(&"axios"));
    }

    #[test]
    fn dev_dependency_flag_carries_through() {
        let packages = detector().detect("import type {} from \"typescript\"");
        let ts = packages.iter().find(|p| p.name == "typescript").unwrap();
        assert!(ts.is_dev);
    }
}
