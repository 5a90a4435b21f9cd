//! Render command: preview a snippet with the stock capability library.

use anyhow::Result;
use std::path::Path;

use crate::runtime::Runtime;
use crate::sandbox::{RenderOutcome, Renderer, library};

use super::read_source;

#[tracing::instrument(skip(runtime))]
pub fn render<R: Runtime>(runtime: R, source_path: &Path) -> Result<()> {
    let source = read_source(&runtime, source_path)?;
    let renderer = Renderer::new();
    match renderer.render(&source, &library::component_library()) {
        RenderOutcome::Success(node) => {
            println!("{node}");
            Ok(())
        }
        RenderOutcome::Failure { message } => {
            anyhow::bail!("Render failed: {message}")
        }
    }
}
