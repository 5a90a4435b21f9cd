//! Lint command: report heuristic diagnostics for a snippet.

use anyhow::Result;
use std::path::Path;

use crate::format;
use crate::runtime::Runtime;

use super::read_source;

#[tracing::instrument(skip(runtime))]
pub fn lint<R: Runtime>(runtime: R, source_path: &Path) -> Result<()> {
    let source = read_source(&runtime, source_path)?;
    let report = format::lint(&source);
    if report.is_clean() {
        println!("No issues found.");
        return Ok(());
    }

    let mut diagnostics: Vec<_> = report.errors.iter().chain(&report.warnings).collect();
    diagnostics.sort_by_key(|diagnostic| (diagnostic.line, diagnostic.column));
    for diagnostic in diagnostics {
        println!(
            "{}:{} {} {} {}",
            diagnostic.line,
            diagnostic.column,
            diagnostic.severity,
            diagnostic.rule,
            diagnostic.message
        );
    }
    if !report.errors.is_empty() {
        anyhow::bail!("Lint found {} error(s)", report.errors.len());
    }
    Ok(())
}
