//! Uninstall command: drop a package from the workspace manifest.

use anyhow::Result;
use std::path::PathBuf;

use crate::install::Installer;
use crate::runtime::Runtime;

use super::paths::default_root;

#[tracing::instrument(skip(runtime, root))]
pub fn uninstall<R: Runtime>(runtime: R, name: &str, root: Option<PathBuf>) -> Result<()> {
    let root = match root {
        Some(path) => path,
        None => default_root(&runtime)?,
    };
    let installer = Installer::new(&runtime, root);
    if installer.uninstall(name)? {
        println!("Removed {name}.");
        Ok(())
    } else {
        anyhow::bail!("Package {} is not installed.", name)
    }
}
