//! Configuration validation

use crate::types::ScriptVariant;
use crate::Config;
use scriptweb_core::{Error, Result};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_server(config)?;
    validate_script(config)?;
    validate_logging(config)?;

    Ok(())
}

fn validate_server(config: &Config) -> Result<()> {
    if config.server.request_timeout.is_zero() {
        return Err(Error::Config("request_timeout must be > 0".to_string()));
    }

    if config.server.request_timeout.as_secs() > 300 {
        tracing::warn!("request_timeout is very high (>5 minutes)");
    }

    if config.server.request_timeout <= config.script.timeout {
        tracing::warn!(
            request_timeout = ?config.server.request_timeout,
            script_timeout = ?config.script.timeout,
            "request_timeout does not leave room for the script timeout"
        );
    }

    Ok(())
}

fn validate_script(config: &Config) -> Result<()> {
    let script = &config.script;

    if script.timeout.is_zero() {
        return Err(Error::Config("script.timeout must be > 0".to_string()));
    }

    if script.max_operations == 0 {
        return Err(Error::Config("script.max_operations must be > 0".to_string()));
    }

    match (script.variant, &script.source) {
        (ScriptVariant::Custom, None) => {
            return Err(Error::Config(
                "script.source is required for the custom variant".to_string(),
            ));
        }
        (ScriptVariant::Copy | ScriptVariant::ListCopy, Some(_)) => {
            tracing::warn!(
                variant = ?script.variant,
                "script.source is ignored unless variant is custom"
            );
        }
        _ => {}
    }

    for import in &script.imports {
        if !is_identifier(import) {
            return Err(Error::Config(format!(
                "Invalid import name: '{import}' (must be an identifier)"
            )));
        }
    }

    if !script.strict_variables {
        tracing::warn!("strict_variables is off; undeclared names fail only at run time");
    }

    Ok(())
}

fn validate_logging(config: &Config) -> Result<()> {
    let level = config.observability.logging.level.to_ascii_lowercase();

    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(Error::Config(format!(
            "Invalid log level: {} (must be one of {})",
            config.observability.logging.level,
            LOG_LEVELS.join(", ")
        )));
    }

    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptweb_scripting::ScriptSource;
    use std::time::Duration;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_request_timeout() {
        let mut config = Config::default();
        config.server.request_timeout = Duration::ZERO;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_script_limits() {
        let mut config = Config::default();
        config.script.timeout = Duration::ZERO;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.script.max_operations = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_custom_requires_source() {
        let mut config = Config::default();
        config.script.variant = ScriptVariant::Custom;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("script.source"));

        config.script.source = Some(ScriptSource::inline("Person()"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_import_names() {
        let mut config = Config::default();
        config.script.imports = vec!["models".to_string(), "_private2".to_string()];
        assert!(validate_config(&config).is_ok());

        for bad in ["", "2models", "my-models", "a b"] {
            config.script.imports = vec![bad.to_string()];
            assert!(validate_config(&config).is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn test_log_level() {
        let mut config = Config::default();
        config.observability.logging.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.logging.level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }
}
