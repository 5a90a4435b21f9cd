//! Shared command wiring: runtime, registry and workspace root.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::detect::Detector;
use crate::registry::{PackageRecord, Registry};
use crate::runtime::Runtime;

use super::paths::default_root;

#[derive(Debug)]
pub struct Config<R: Runtime> {
    pub runtime: R,
    pub detector: Detector,
    pub root: PathBuf,
}

impl<R: Runtime> Config<R> {
    /// Assemble the builtin registry, optionally extended from a JSON file
    /// of extra records, and resolve the workspace root.
    pub fn new(
        runtime: R,
        root: Option<PathBuf>,
        registry_path: Option<PathBuf>,
    ) -> Result<Self> {
        let root = match root {
            Some(path) => path,
            None => default_root(&runtime)?,
        };
        let mut registry = Registry::builtin()?;
        if let Some(path) = registry_path {
            let text = runtime
                .read_to_string(&path)
                .with_context(|| format!("Failed to read registry file {}", path.display()))?;
            let records: Vec<PackageRecord> = serde_json::from_str(&text)
                .with_context(|| format!("Invalid registry file {}", path.display()))?;
            registry.extend(records)?;
        }
        Ok(Self {
            runtime,
            detector: Detector::new(registry),
            root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use crate::test_utils::{configure_mock_runtime_basics, test_root};
    use mockall::predicate::eq;

    #[test]
    fn config_uses_the_builtin_registry_by_default() {
        let mut runtime = MockRuntime::new();
        configure_mock_runtime_basics(&mut runtime);

        let config = Config::new(runtime, None, None).unwrap();
        assert!(config.detector.registry().contains("axios"));
        assert_eq!(config.root, test_root());
    }

    #[test]
    fn config_extends_the_registry_from_a_file() {
        let mut runtime = MockRuntime::new();
        let registry_path = PathBuf::from("/tmp/registry.json");
        runtime
            .expect_read_to_string()
            .with(eq(registry_path.clone()))
            .returning(|_| {
                Ok(r#"[
                    {"name": "leftpad", "version": "^1.0.0", "description": "padding"}
                ]"#
                .into())
            });

        let config = Config::new(runtime, Some(PathBuf::from("/ws")), Some(registry_path)).unwrap();
        assert!(config.detector.registry().contains("leftpad"));
        assert!(config.detector.registry().contains("axios"));
    }

    #[test]
    fn config_rejects_malformed_registry_files() {
        let mut runtime = MockRuntime::new();
        let registry_path = PathBuf::from("/tmp/broken.json");
        runtime
            .expect_read_to_string()
            .with(eq(registry_path.clone()))
            .returning(|_| Ok("not json".into()));

        let result = Config::new(runtime, Some(PathBuf::from("/ws")), Some(registry_path));
        assert!(result.unwrap_err().to_string().contains("Invalid registry"));
    }
}
