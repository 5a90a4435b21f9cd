//! Fmt command: tidy a snippet with the default formatting options.

use anyhow::Result;
use std::path::Path;

use crate::format::{self, FormatOptions};
use crate::runtime::Runtime;

use super::read_source;

#[tracing::instrument(skip(runtime))]
pub fn fmt<R: Runtime>(runtime: R, source_path: &Path, write: bool) -> Result<()> {
    let source = read_source(&runtime, source_path)?;
    let formatted = format::format(&source, &FormatOptions::default());
    if write {
        if source_path == Path::new("-") {
            anyhow::bail!("Cannot write formatted output back to stdin");
        }
        runtime.write(source_path, formatted.as_bytes())?;
        println!("Formatted {}", source_path.display());
    } else {
        print!("{formatted}");
        if !formatted.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
