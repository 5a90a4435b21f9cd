//! Import/require specifier scanning.
//!
//! This is a text scan, not a parser: the input is arbitrary generated code
//! that may not even be syntactically valid, and an unmatched import is
//! cheaper than a failed parse.

use regex::Regex;
use std::sync::LazyLock;

static IMPORT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\bimport\s+[^'";]*?from\s*['"]([^'"]+)['"]"#)
        .expect("import-from pattern is valid")
});

static IMPORT_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bimport\s*['"]([^'"]+)['"]"#).expect("bare import pattern is valid")
});

static REQUIRE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("require pattern is valid")
});

/// Node built-ins that never name an installable package.
const BUILTIN_MODULES: &[&str] = &[
    "fs",
    "path",
    "http",
    "https",
    "url",
    "crypto",
    "os",
    "util",
    "events",
    "stream",
    "buffer",
    "child_process",
    "cluster",
    "net",
    "dns",
    "readline",
    "zlib",
    "querystring",
    "assert",
    "vm",
];

pub(crate) fn is_builtin_module(name: &str) -> bool {
    BUILTIN_MODULES.contains(&name)
}

/// Extract module specifiers: `import … from` matches first, then bare
/// side-effect imports, then `require()` calls, each in source order.
pub(crate) fn scan_specifiers(source: &str) -> Vec<&str> {
    let mut specifiers = Vec::new();
    for regex in [&*IMPORT_FROM, &*IMPORT_BARE, &*REQUIRE] {
        for captures in regex.captures_iter(source) {
            if let Some(specifier) = captures.get(1) {
                specifiers.push(specifier.as_str());
            }
        }
    }
    specifiers
}

/// Collapse a specifier to the installable package name: scoped specifiers
/// keep the first two segments, everything else keeps the first.
pub(crate) fn base_package_name(specifier: &str) -> String {
    if specifier.starts_with('@') {
        specifier
            .split('/')
            .take(2)
            .collect::<Vec<_>>()
            .join("/")
    } else {
        specifier
            .split('/')
            .next()
            .unwrap_or(specifier)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_es_imports_in_source_order() {
        let source = r#"
            import React from "react"
            import { format } from 'date-fns'
        "#;
        assert_eq!(scan_specifiers(source), vec!["react", "date-fns"]);
    }

    #[test]
    fn scans_multi_line_import_clauses() {
        let source = "import {\n  Card,\n  CardContent,\n} from \"@/components/ui/card\"";
        assert_eq!(scan_specifiers(source), vec!["@/components/ui/card"]);
    }

    #[test]
    fn scans_require_calls_and_side_effect_imports() {
        let source = "import \"./globals.css\"\nconst axios = require('axios')";
        assert_eq!(scan_specifiers(source), vec!["./globals.css", "axios"]);
    }

    #[test]
    fn base_name_collapses_scoped_and_deep_specifiers() {
        assert_eq!(base_package_name("@tanstack/react-query/core"), "@tanstack/react-query");
        assert_eq!(base_package_name("lodash/debounce"), "lodash");
        assert_eq!(base_package_name("react"), "react");
    }

    #[test]
    fn builtins_are_recognised() {
        assert!(is_builtin_module("fs"));
        assert!(is_builtin_module("child_process"));
        assert!(!is_builtin_module("react"));
    }
}
