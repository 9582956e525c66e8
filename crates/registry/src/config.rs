use std::{
    collections::HashSet,
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use cmdrest_types::CommandDescriptor;
use dirs_next::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Environment variable that overrides the catalog location.
pub const CONFIG_PATH_ENV: &str = "CMDREST_CONFIG_PATH";

/// A catalog of command descriptors to expose over HTTP.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub commands: Vec<CommandDescriptor>,
}

impl CatalogConfig {
    /// Loads the catalog from the default location.
    ///
    /// Returns `Ok(None)` when no catalog file exists so callers can fall back
    /// to built-in descriptors.
    pub fn load() -> Result<Option<Self>> {
        let path = default_config_path();
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    /// Loads a catalog from `path`; JSON for `.json` files, YAML otherwise.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("read catalog {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config: CatalogConfig = if is_json {
            serde_json::from_str(&content).with_context(|| format!("parse JSON catalog {}", path.display()))?
        } else {
            serde_yaml::from_str(&content).with_context(|| format!("parse YAML catalog {}", path.display()))?
        };
        config.validate()?;
        info!(path = %path.display(), commands = config.commands.len(), "loaded command catalog");
        Ok(config)
    }

    /// Rejects catalogs that would mount two handlers at the same prefix.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for command in &self.commands {
            if !seen.insert(command.name.as_str()) {
                bail!("duplicate command '{}' in catalog", command.name);
            }
        }
        Ok(())
    }
}

/// Get the default path for the catalog file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cmdrest")
        .join("commands.yaml")
}

pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_var_overrides_default_path() {
        temp_env::with_var(CONFIG_PATH_ENV, Some("/etc/cmdrest/catalog.json"), || {
            assert_eq!(default_config_path(), PathBuf::from("/etc/cmdrest/catalog.json"));
        });
    }

    #[test]
    fn blank_env_var_falls_back_to_config_dir() {
        temp_env::with_var(CONFIG_PATH_ENV, Some("  "), || {
            let path = default_config_path();
            assert!(path.ends_with("cmdrest/commands.yaml"), "{}", path.display());
        });
    }

    #[test]
    fn load_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.yaml");
        temp_env::with_var(CONFIG_PATH_ENV, Some(missing.to_str().expect("utf-8 path")), || {
            assert!(CatalogConfig::load().expect("load").is_none());
        });
    }

    #[test]
    fn validate_rejects_duplicates() {
        let config = CatalogConfig {
            commands: vec![
                CommandDescriptor::new("ls").flag("Long", "l", true),
                CommandDescriptor::new("ls").flag("All", "a", true),
            ],
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate command 'ls'"), "{err}");
    }
}
