//! Configuration loading

use crate::{Config, ConfigFormat};
use regex::Regex;
use scriptweb_core::{Error, Result};
use std::env;
use std::fs;
use std::path::Path;

/// Overrides `server.listen`
pub const ENV_LISTEN: &str = "SCRIPTWEB_LISTEN";
/// Overrides `observability.logging.level`
pub const ENV_LOG_LEVEL: &str = "SCRIPTWEB_LOG_LEVEL";

/// Load configuration from a file
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file {}: {e}", path.display())))?;

    let format = ConfigFormat::from_path(path)?;

    load_from_str(&content, format)
}

/// Expand environment variables in configuration string
/// Supports syntax: ${VAR} and ${VAR:-default}
fn expand_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}")
        .map_err(|e| Error::Config(format!("Invalid regex: {e}")))?;

    let mut result = String::with_capacity(content.len());
    let mut last_match = 0;

    for cap in re.captures_iter(content) {
        let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let var_name = var_name.as_str();
        let default_value = cap.get(3).map(|m| m.as_str());

        let value = match (env::var(var_name), default_value) {
            (Ok(val), _) => val,
            (Err(_), Some(default)) => default.to_string(),
            (Err(_), None) => {
                return Err(Error::Config(format!(
                    "Environment variable '{var_name}' not set and no default provided"
                )));
            }
        };

        result.push_str(&content[last_match..full_match.start()]);
        result.push_str(&value);
        last_match = full_match.end();
    }

    result.push_str(&content[last_match..]);

    Ok(result)
}

/// Load configuration from a string
pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<Config> {
    // Expand environment variables first
    let expanded_content = expand_env_vars(content)?;

    // An empty YAML document means "all defaults"
    if expanded_content.trim().is_empty() {
        return Ok(Config::default());
    }

    let config = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse YAML: {e}")))?,
        ConfigFormat::Toml => toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {e}")))?,
        ConfigFormat::Json => serde_json::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse JSON: {e}")))?,
    };

    Ok(config)
}

/// Apply `SCRIPTWEB_*` environment overrides
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Ok(listen) = env::var(ENV_LISTEN) {
        config.server.listen = listen
            .parse()
            .map_err(|e| Error::Config(format!("{ENV_LISTEN}='{listen}' is not an address: {e}")))?;
        tracing::debug!(listen = %config.server.listen, "Listen address overridden from environment");
    }

    if let Ok(level) = env::var(ENV_LOG_LEVEL) {
        config.observability.logging.level = level;
    }

    Ok(())
}

/// Load, apply environment overrides and validate
pub fn load_config<P: AsRef<Path>>(path: P, env_overrides: bool) -> Result<Config> {
    let mut config = load_from_file(path)?;

    if env_overrides {
        apply_env_overrides(&mut config)?;
    }

    crate::validator::validate_config(&config)?;

    Ok(config)
}

/// Like [`load_config`], falling back to defaults when no path is given
pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path, true),
        None => {
            let mut config = Config::default();
            apply_env_overrides(&mut config)?;
            crate::validator::validate_config(&config)?;
            Ok(config)
        }
    }
}
