//! Simulated package installation over the local manifest.
//!
//! No registry server is contacted: "installing" means folding detected
//! packages into the workspace manifest and reporting counts, which is what
//! the host surfaces back to the user. Per-package failures go into the
//! report's error channel instead of aborting the batch.

use std::path::PathBuf;

use anyhow::Result;
use log::debug;

use crate::detect::DetectedPackage;
use crate::manifest::{MANIFEST_FILE, Manifest, ManifestEntry};
use crate::runtime::Runtime;

/// Outcome of one simulated install run.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallReport {
    /// Packages processed this run
    pub installed: Vec<DetectedPackage>,
    /// Entries newly added to or changed in the manifest
    pub newly_added: usize,
    /// Total entries in the manifest after the run
    pub total: usize,
    pub errors: Vec<String>,
}

impl InstallReport {
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Installs detections into a manifest rooted at a workspace directory.
pub struct Installer<'a, R: Runtime> {
    runtime: &'a R,
    root: PathBuf,
}

impl<'a, R: Runtime> Installer<'a, R> {
    pub fn new(runtime: &'a R, root: PathBuf) -> Self {
        Self { runtime, root }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Merge the detected packages into the manifest, creating the workspace
    /// directory and manifest as needed.
    #[tracing::instrument(skip(self, packages))]
    pub fn install(&self, packages: &[DetectedPackage]) -> Result<InstallReport> {
        if !self.runtime.exists(&self.root) {
            self.runtime.create_dir_all(&self.root)?;
        }
        let manifest_path = self.manifest_path();
        let manifest_existed = self.runtime.exists(&manifest_path);
        let mut manifest = Manifest::load_or_default(self.runtime, &manifest_path)?;

        let newly_added = manifest.merge_detected(packages);
        if newly_added > 0 || !manifest_existed {
            manifest.save(self.runtime, &manifest_path)?;
        }
        debug!(
            "installed {} package(s), {} new, manifest at {:?}",
            packages.len(),
            newly_added,
            manifest_path
        );

        Ok(InstallReport {
            installed: packages.to_vec(),
            newly_added,
            total: manifest.len(),
            errors: Vec::new(),
        })
    }

    /// Entries currently recorded in the manifest; empty when none exists.
    pub fn installed(&self) -> Result<Vec<ManifestEntry>> {
        let manifest = Manifest::load_or_default(self.runtime, &self.manifest_path())?;
        Ok(manifest.entries())
    }

    /// Drop one package from the manifest. Returns whether it was recorded.
    #[tracing::instrument(skip(self))]
    pub fn uninstall(&self, name: &str) -> Result<bool> {
        let manifest_path = self.manifest_path();
        let mut manifest = Manifest::load_or_default(self.runtime, &manifest_path)?;
        if !manifest.remove(name) {
            return Ok(false);
        }
        manifest.save(self.runtime, &manifest_path)?;
        Ok(true)
    }
}
