//! Detect command: list the packages a snippet appears to use.

use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

use super::config::Config;
use super::read_source;

#[tracing::instrument(skip(runtime, root, registry_path))]
pub fn detect<R: Runtime>(
    runtime: R,
    source_path: &Path,
    root: Option<PathBuf>,
    registry_path: Option<PathBuf>,
) -> Result<()> {
    let config = Config::new(runtime, root, registry_path)?;
    let source = read_source(&config.runtime, source_path)?;
    debug!("detecting packages in {} byte(s)", source.len());

    let packages = config.detector.detect(&source);
    if packages.is_empty() {
        println!("No packages detected.");
        return Ok(());
    }
    for package in &packages {
        let dev = if package.is_dev { " [dev]" } else { "" };
        println!(
            "{} {} ({}){}  {}",
            package.name, package.version, package.source, dev, package.description
        );
    }
    println!("Detected {} package(s).", packages.len());
    Ok(())
}
