//! Static package registry: known packages, their versions and the usage
//! patterns that betray them.
//!
//! A registry is immutable once constructed and is injected into the
//! detector, keeping detection referentially transparent. Records preserve
//! insertion order (the pattern pass iterates them in order) and are indexed
//! by name for exact, case-sensitive lookup.

mod data;

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A registry entry for one known package.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PackageRecord {
    /// Canonical package name (`@scope/name` or bare)
    pub name: String,
    /// Version range reported on detection
    pub version: String,
    /// Whether the package belongs in devDependencies
    #[serde(default)]
    pub dev: bool,
    pub description: String,
    /// Regex fragments; matching any one marks the package as used
    #[serde(default)]
    pub patterns: Vec<String>,
}

#[derive(Debug)]
pub(crate) struct CompiledRecord {
    pub(crate) record: PackageRecord,
    pub(crate) patterns: Vec<Regex>,
}

fn compile(record: PackageRecord) -> Result<CompiledRecord> {
    let patterns = record
        .patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).with_context(|| {
                format!(
                    "Invalid detection pattern {:?} for package {}",
                    pattern, record.name
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CompiledRecord { record, patterns })
}

/// The immutable package database.
#[derive(Debug)]
pub struct Registry {
    records: Vec<CompiledRecord>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// The built-in database ported from the host application's package
    /// manager: UI, state, web3, AI and tooling packages.
    pub fn builtin() -> Result<Self> {
        Self::from_records(data::builtin_records())
    }

    /// Build a registry from records. Duplicate names are a construction
    /// error; use [`Registry::extend`] to override.
    pub fn from_records(records: Vec<PackageRecord>) -> Result<Self> {
        let mut registry = Registry {
            records: Vec::with_capacity(records.len()),
            index: HashMap::new(),
        };
        for record in records {
            if registry.index.contains_key(&record.name) {
                bail!("Duplicate registry record: {}", record.name);
            }
            registry.push(compile(record)?);
        }
        Ok(registry)
    }

    /// Parse records from a JSON array (the `--registry` file format).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<PackageRecord> =
            serde_json::from_str(json).context("Failed to parse registry records")?;
        Self::from_records(records)
    }

    /// Add or replace records by name. Replacements keep their original
    /// position in the pattern-pass order; new records append.
    pub fn extend(&mut self, records: Vec<PackageRecord>) -> Result<()> {
        for record in records {
            let compiled = compile(record)?;
            match self.index.get(&compiled.record.name) {
                Some(&i) => self.records[i] = compiled,
                None => self.push(compiled),
            }
        }
        Ok(())
    }

    fn push(&mut self, compiled: CompiledRecord) {
        self.index
            .insert(compiled.record.name.clone(), self.records.len());
        self.records.push(compiled);
    }

    /// Exact, case-sensitive lookup by package name.
    pub fn get(&self, name: &str) -> Option<&PackageRecord> {
        self.index.get(name).map(|&i| &self.records[i].record)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &PackageRecord> {
        self.records.iter().map(|compiled| &compiled.record)
    }

    pub(crate) fn compiled(&self) -> &[CompiledRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, patterns: &[&str]) -> PackageRecord {
        PackageRecord {
            name: name.to_string(),
            version: "^1.0.0".to_string(),
            dev: false,
            description: format!("{name} description"),
            patterns: patterns.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn builtin_registry_compiles_and_contains_known_packages() {
        let registry = Registry::builtin().unwrap();
        assert!(registry.len() > 30);
        assert!(registry.contains("framer-motion"));
        assert!(registry.contains("@tanstack/react-query"));
        let typescript = registry.get("typescript").unwrap();
        assert!(typescript.dev);
    }

    #[test]
    fn lookup_is_case_sensitive_and_exact() {
        let registry = Registry::builtin().unwrap();
        assert!(registry.get("Axios").is_none());
        assert!(registry.get("axios").is_some());
    }

    #[test]
    fn duplicate_records_are_rejected() {
        let result = Registry::from_records(vec![record("a", &[]), record("a", &[])]);
        assert!(result.unwrap_err().to_string().contains("Duplicate"));
    }

    #[test]
    fn invalid_patterns_are_rejected_with_context() {
        let result = Registry::from_records(vec![record("broken", &["("])]);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("broken"), "{message}");
    }

    #[test]
    fn extend_replaces_in_place_and_appends() {
        let mut registry = Registry::from_records(vec![record("a", &[]), record("b", &[])]).unwrap();
        let mut replacement = record("a", &[]);
        replacement.version = "^2.0.0".to_string();
        registry.extend(vec![replacement, record("c", &[])]).unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("a").unwrap().version, "^2.0.0");
        let order: Vec<&str> = registry.records().map(|r| r.name.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn json_round_trip() {
        let json = r#"[
            {"name": "leftpad", "version": "^1.0.0", "description": "padding",
             "patterns": ["leftPad\\("]}
        ]"#;
        let registry = Registry::from_json_str(json).unwrap();
        assert_eq!(registry.get("leftpad").unwrap().patterns.len(), 1);
    }
}
