//! Configuration loading and data folder resolution

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Resolve a tool's config file following priority order:
/// 1. Command-line argument (highest priority)
/// 2. Platform config directory (`~/.config/voxset/<name>` etc.)
/// 3. None: compiled defaults apply
pub fn resolve_config_file(cli_arg: Option<&Path>, name: &str) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }
    find_config_file(name).ok()
}

/// Locate a config file under the platform config directory
///
/// Checks `~/.config/voxset/<name>` (or the platform equivalent), then
/// `/etc/voxset/<name>` on Linux.
pub fn find_config_file(name: &str) -> Result<PathBuf> {
    if let Some(dir) = dirs::config_dir() {
        let user_config = dir.join("voxset").join(name);
        if user_config.exists() {
            return Ok(user_config);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/voxset").join(name);
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config(format!("No config file found: {}", name)))
}

/// Load and parse a TOML config file into `T`
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Resolve a service API key from 2-tier configuration
///
/// **Priority:** ENV → TOML
///
/// `remediation` is appended to the error when no key is found, so each tool
/// can list its own configuration options.
pub fn resolve_api_key(
    env_var_name: &str,
    toml_value: Option<&str>,
    remediation: &str,
) -> Result<String> {
    let env_key = std::env::var(env_var_name).ok();
    let mut sources = Vec::new();

    if env_key.as_deref().map(is_valid_key).unwrap_or(false) {
        sources.push("environment");
    }
    if toml_value.map(is_valid_key).unwrap_or(false) {
        sources.push("TOML");
    }

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "API key {} found in multiple sources: {}. Using environment (highest priority).",
            env_var_name,
            sources.join(", ")
        );
    }

    if let Some(key) = env_key {
        if is_valid_key(&key) {
            info!("API key {} loaded from environment variable", env_var_name);
            return Ok(key);
        }
    }

    if let Some(key) = toml_value {
        if is_valid_key(key) {
            info!("API key {} loaded from TOML config", env_var_name);
            return Ok(key.to_string());
        }
    }

    Err(Error::Config(format!(
        "{} not configured.\n{}",
        env_var_name, remediation
    )))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc123"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[test]
    fn test_resolve_api_key_from_toml() {
        let key = resolve_api_key("VOXSET_TEST_KEY_UNSET", Some("toml-key"), "set it").unwrap();
        assert_eq!(key, "toml-key");
    }

    #[test]
    fn test_resolve_api_key_missing() {
        let result = resolve_api_key("VOXSET_TEST_KEY_UNSET", None, "set VOXSET_TEST_KEY_UNSET");
        assert!(result.is_err());
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("set VOXSET_TEST_KEY_UNSET"));
    }

    #[test]
    fn test_resolve_config_file_cli_wins() {
        let resolved = resolve_config_file(Some(Path::new("/tmp/custom.toml")), "missing.toml");
        assert_eq!(resolved, Some(PathBuf::from("/tmp/custom.toml")));
    }

    #[test]
    fn test_resolve_config_file_absent() {
        assert_eq!(resolve_config_file(None, "definitely-not-here.toml"), None);
    }
}
