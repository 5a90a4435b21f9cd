pub mod commands;
pub mod detect;
pub mod format;
pub mod install;
pub mod manifest;
pub mod registry;
pub mod runtime;
pub mod sandbox;

/// Test utilities for cross-platform path handling.
#[cfg(test)]
pub mod test_utils {
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    /// Returns a test home directory path based on the platform.
    /// - Unix: `/home/user`
    /// - Windows: `C:\Users\user`
    pub fn test_home() -> PathBuf {
        #[cfg(not(windows))]
        {
            PathBuf::from("/home/user")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\Users\user")
        }
    }

    /// Returns the test workspace root path based on the platform.
    /// - Unix: `/home/user/.previewkit`
    /// - Windows: `C:\Users\user\.previewkit`
    pub fn test_root() -> PathBuf {
        test_home().join(".previewkit")
    }

    /// Configure a mock runtime with common defaults for tests.
    /// - home dir set to [`test_home`]
    /// - PREVIEWKIT_ROOT absent
    pub fn configure_mock_runtime_basics(runtime: &mut MockRuntime) {
        runtime.expect_home_dir().returning(|| Some(test_home()));

        runtime
            .expect_env_var()
            .with(eq("PREVIEWKIT_ROOT"))
            .returning(|_| Err(std::env::VarError::NotPresent));
    }
}
