//! Configuration file support for gn2bazel.
//!
//! gn2bazel supports two configuration file locations:
//! - Global: `~/.gn2bazel/config.toml` - User-wide defaults
//! - Project: `<checkout>/.gn2bazel/config.toml` - Checkout-specific overrides
//!
//! Project config takes precedence over global config, and command line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::translate::DataPolicy;

/// Name of the per-user and per-checkout configuration directory.
pub const CONFIG_DIR: &str = ".gn2bazel";

/// Name of the configuration file inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// gn2bazel configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Conversion settings
    pub convert: ConvertConfig,
}

/// Settings for `gn2bazel convert`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// The gn executable to run
    pub gn: Option<String>,

    /// Where BUILD files are written
    pub out: Option<PathBuf>,

    /// Regex of target identities to skip
    pub exclude: Option<String>,

    /// Which dependency types become `data` (copy, copy-and-action)
    pub data_deps: Option<String>,

    /// Don't write placeholder BUILD files into the checkout
    pub skip_markers: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.convert.gn.is_some() {
            self.convert.gn = other.convert.gn;
        }
        if other.convert.out.is_some() {
            self.convert.out = other.convert.out;
        }
        if other.convert.exclude.is_some() {
            self.convert.exclude = other.convert.exclude;
        }
        if other.convert.data_deps.is_some() {
            self.convert.data_deps = other.convert.data_deps;
        }
        if other.convert.skip_markers.is_some() {
            self.convert.skip_markers = other.convert.skip_markers;
        }
    }

    /// Parse the data dependency policy from the config string.
    pub fn data_policy(&self) -> Result<Option<DataPolicy>> {
        self.convert
            .data_deps
            .as_deref()
            .map(|s| {
                s.parse::<DataPolicy>()
                    .map_err(anyhow::Error::msg)
                    .context("invalid `convert.data_deps` in config")
            })
            .transpose()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (`<checkout>/.gn2bazel/config.toml`)
/// 2. Global config (`~/.gn2bazel/config.toml`)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global config directory (~/.gn2bazel).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR))
}

/// Get the global config path (~/.gn2bazel/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Get the project config path (`<checkout>/.gn2bazel/config.toml`).
pub fn project_config_path(checkout: &Path) -> PathBuf {
    checkout.join(CONFIG_DIR).join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.convert.gn.is_none());
        assert!(config.convert.exclude.is_none());
        assert!(config.convert.skip_markers.is_none());
        assert!(config.data_policy().unwrap().is_none());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[convert]
gn = "/opt/depot_tools/gn"
out = "bazel-out"
exclude = "^//third_party/"
data_deps = "copy"
skip_markers = true
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.convert.gn.as_deref(), Some("/opt/depot_tools/gn"));
        assert_eq!(config.convert.out, Some(PathBuf::from("bazel-out")));
        assert_eq!(config.convert.exclude.as_deref(), Some("^//third_party/"));
        assert_eq!(config.data_policy().unwrap(), Some(DataPolicy::CopyOnly));
        assert_eq!(config.convert.skip_markers, Some(true));
    }

    #[test]
    fn test_config_bad_data_policy() {
        let mut config = Config::default();
        config.convert.data_deps = Some("everything".to_string());

        let err = config.data_policy().unwrap_err();
        assert!(format!("{:#}", err).contains("convert.data_deps"));
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.convert.gn = Some("gn".to_string());
        base.convert.exclude = Some("^//v8".to_string());

        let mut override_cfg = Config::default();
        override_cfg.convert.gn = Some("/usr/local/bin/gn".to_string());

        base.merge(override_cfg);

        assert_eq!(base.convert.gn.as_deref(), Some("/usr/local/bin/gn"));
        assert_eq!(base.convert.exclude.as_deref(), Some("^//v8")); // Not overridden
    }

    #[test]
    fn test_config_merge_skip_markers() {
        let mut base = Config::default();
        base.convert.skip_markers = Some(true);

        // Unset leaves the base value alone
        base.merge(Config::default());
        assert_eq!(base.convert.skip_markers, Some(true));

        let mut override_cfg = Config::default();
        override_cfg.convert.skip_markers = Some(false);
        base.merge(override_cfg);
        assert_eq!(base.convert.skip_markers, Some(false));
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = project_config_path(tmp.path());

        std::fs::write(
            &global_path,
            r#"
[convert]
gn = "/usr/bin/gn"
exclude = "^//testing/"
"#,
        )
        .unwrap();

        std::fs::create_dir_all(project_path.parent().unwrap()).unwrap();
        std::fs::write(
            &project_path,
            r#"
[convert]
exclude = "^//build/"
"#,
        )
        .unwrap();

        let config = load_config(Some(&global_path), &project_path);
        assert_eq!(config.convert.gn.as_deref(), Some("/usr/bin/gn"));
        assert_eq!(config.convert.exclude.as_deref(), Some("^//build/"));
    }

    #[test]
    fn test_malformed_config_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[convert\nexclude = ").unwrap();

        assert!(Config::load(&path).is_err());
        let config = load_config(None, &path);
        assert!(config.convert.exclude.is_none());
    }
}
