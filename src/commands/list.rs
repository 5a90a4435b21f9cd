//! List command: show packages recorded in the workspace manifest.

use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::install::Installer;
use crate::runtime::Runtime;

use super::paths::default_root;

#[tracing::instrument(skip(runtime, root))]
pub fn list<R: Runtime>(runtime: R, root: Option<PathBuf>) -> Result<()> {
    let root = match root {
        Some(path) => path,
        None => default_root(&runtime)?,
    };
    debug!("listing manifest entries under {:?}", root);

    let installer = Installer::new(&runtime, root);
    let entries = installer.installed()?;
    if entries.is_empty() {
        println!("No packages installed.");
        return Ok(());
    }
    for entry in entries {
        let dev = if entry.dev { " [dev]" } else { "" };
        println!("{} {}{}", entry.name, entry.version, dev);
    }
    Ok(())
}
