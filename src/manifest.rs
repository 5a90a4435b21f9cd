//! The `package.json`-style manifest the simulated installer maintains.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::detect::DetectedPackage;
use crate::runtime::Runtime;

pub const MANIFEST_FILE: &str = "package.json";

/// One manifest entry, flattened for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    pub name: String,
    pub version: String,
    pub dev: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Manifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
}

impl Manifest {
    #[tracing::instrument(skip(runtime, path))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        let manifest: Manifest = serde_json::from_str(&content)
            .with_context(|| format!("Invalid manifest at {}", path.display()))?;
        Ok(manifest)
    }

    /// Load the manifest, or start a fresh one when none exists yet.
    pub fn load_or_default<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        if runtime.exists(path) {
            Self::load(runtime, path)
        } else {
            Ok(Manifest::default())
        }
    }

    pub fn save<R: Runtime>(&self, runtime: &R, path: &Path) -> Result<()> {
        let mut json = serde_json::to_string_pretty(self).context("Failed to encode manifest")?;
        json.push('\n');
        runtime.write(path, json.as_bytes())
    }

    /// Fold detected packages in; dev-flagged detections land in
    /// `devDependencies`. Returns how many entries were added or changed.
    pub fn merge_detected(&mut self, packages: &[DetectedPackage]) -> usize {
        let mut changed = 0;
        for package in packages {
            let target = if package.is_dev {
                &mut self.dev_dependencies
            } else {
                &mut self.dependencies
            };
            match target.get(&package.name) {
                Some(version) if version == &package.version => {}
                _ => {
                    target.insert(package.name.clone(), package.version.clone());
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Drop a package from whichever table holds it. Returns whether an
    /// entry was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.dependencies.remove(name).is_some() | self.dev_dependencies.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.dependencies.len() + self.dev_dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.dev_dependencies.is_empty()
    }

    /// All entries, regular dependencies first.
    pub fn entries(&self) -> Vec<ManifestEntry> {
        let regular = self.dependencies.iter().map(|(name, version)| ManifestEntry {
            name: name.clone(),
            version: version.clone(),
            dev: false,
        });
        let dev = self
            .dev_dependencies
            .iter()
            .map(|(name, version)| ManifestEntry {
                name: name.clone(),
                version: version.clone(),
                dev: true,
            });
        regular.chain(dev).collect()
    }
}
