//! Typed anvil build configuration.
//!
//! This crate handles:
//! - mapping a parsed document onto [`AnvilConfig`]
//! - loading and mapping a build file in one step
//! - the validate/cache policies of argument hooks

pub mod config;
pub mod error;
mod helpers;
pub mod hooks;

pub use config::{
    AnvilConfig, ArgumentConfig, BuildConfig, DependencyConfig, ProfileConfig, TargetConfig,
    WorkspaceConfig, DEFAULT_LIBS_PATH, DEFAULT_TARGET_PATH,
};
pub use error::{ConfigError, ConfigResult};
pub use hooks::{CachePolicy, ValidateStr};

use anvil_yaml::ParseOptions;
use std::path::Path;
use tracing::info;

/// Parses the build file at `path` and maps it.
pub fn load(path: impl AsRef<Path>, options: &ParseOptions) -> ConfigResult<AnvilConfig> {
    let path = path.as_ref();
    let root = anvil_yaml::parse_file(path, options)?;
    let config = AnvilConfig::from_node(&root)?;
    info!(path = %path.display(), "loaded build configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "package: \"demo\"\ntargets: [{{name: \"demo\"}}]").unwrap();

        let config = load(file.path(), &ParseOptions::default()).unwrap();
        assert_eq!(config.package.as_deref(), Some("demo"));
        assert_eq!(config.targets[0].name.as_deref(), Some("demo"));
    }

    #[test]
    fn test_load_reports_path_and_position() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "package: \"demo\"\nversion: 'oops").unwrap();

        let err = load(file.path(), &ParseOptions::default()).unwrap_err();
        let ConfigError::Load(located) = &err else {
            panic!("expected a load error, got {err:?}");
        };
        assert_eq!(located.path, file.path());
        let text = err.to_string();
        assert!(text.ends_with(":2:10 -> Reached EOF while looking for matching `'`."), "{text}");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("anvil.yaml"), &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
