//! Workspace root resolution.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::runtime::Runtime;

/// Default workspace root: `PREVIEWKIT_ROOT` if set, otherwise
/// `~/.previewkit`.
pub(crate) fn default_root<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    if let Ok(root) = runtime.env_var("PREVIEWKIT_ROOT") {
        if !root.is_empty() {
            return Ok(PathBuf::from(root));
        }
    }
    runtime
        .home_dir()
        .map(|home| home.join(".previewkit"))
        .context("Could not determine home directory")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use crate::test_utils::{configure_mock_runtime_basics, test_root};
    use mockall::predicate::eq;

    #[test]
    fn default_root_falls_back_to_home() {
        let mut runtime = MockRuntime::new();
        configure_mock_runtime_basics(&mut runtime);

        let root = default_root(&runtime).unwrap();
        assert_eq!(root, test_root());
    }

    #[test]
    fn default_root_prefers_the_environment() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq("PREVIEWKIT_ROOT"))
            .returning(|_| Ok("/custom/root".to_string()));

        let root = default_root(&runtime).unwrap();
        assert_eq!(root, PathBuf::from("/custom/root"));
    }

    #[test]
    fn default_root_errors_without_home() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq("PREVIEWKIT_ROOT"))
            .returning(|_| Err(std::env::VarError::NotPresent));
        runtime.expect_home_dir().returning(|| None);

        assert!(default_root(&runtime).is_err());
    }
}
