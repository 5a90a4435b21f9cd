//! Install command: detect packages and merge them into the manifest.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::install::Installer;
use crate::runtime::Runtime;

use super::config::Config;
use super::read_source;

#[tracing::instrument(skip(runtime, root, registry_path))]
pub fn install<R: Runtime>(
    runtime: R,
    source_path: &Path,
    root: Option<PathBuf>,
    registry_path: Option<PathBuf>,
) -> Result<()> {
    let config = Config::new(runtime, root, registry_path)?;
    let source = read_source(&config.runtime, source_path)?;

    let packages = config.detector.detect(&source);
    let installer = Installer::new(&config.runtime, config.root.clone());
    let report = installer.install(&packages)?;

    for package in &report.installed {
        let dev = if package.is_dev { " [dev]" } else { "" };
        println!("{} {}{}", package.name, package.version, dev);
    }
    println!(
        "Installed {} package(s): {} new, {} total in {}.",
        report.installed.len(),
        report.newly_added,
        report.total,
        installer.manifest_path().display()
    );
    if !report.success() {
        for error in &report.errors {
            eprintln!("{error}");
        }
        anyhow::bail!("{} package(s) failed to install", report.errors.len());
    }
    Ok(())
}
