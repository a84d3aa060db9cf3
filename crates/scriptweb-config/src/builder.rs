//! Configuration builder

use crate::types::{
    CaptureConfig, Config, Environment, LogFormat, ScriptConfig, ScriptVariant,
};
use scriptweb_scripting::ScriptSource;
use std::net::SocketAddr;
use std::time::Duration;

/// Builder for constructing configuration programmatically
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set listen address
    pub fn listen(mut self, addr: SocketAddr) -> Self {
        self.config.server.listen = addr;
        self
    }

    /// Set hosting environment
    pub fn environment(mut self, environment: Environment) -> Self {
        self.config.server.environment = environment;
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.server.request_timeout = timeout;
        self
    }

    /// Replace the script section
    pub fn script(mut self, script: ScriptConfig) -> Self {
        self.config.script = script;
        self
    }

    /// Select a built-in variant
    pub fn variant(mut self, variant: ScriptVariant) -> Self {
        self.config.script.variant = variant;
        self
    }

    /// Use a custom script source
    pub fn custom_source(mut self, source: ScriptSource) -> Self {
        self.config.script.variant = ScriptVariant::Custom;
        self.config.script.source = Some(source);
        self
    }

    /// Replace the capture section
    pub fn capture(mut self, capture: CaptureConfig) -> Self {
        self.config.capture = capture;
        self
    }

    /// Set log level and format
    pub fn logging(mut self, level: impl Into<String>, format: LogFormat) -> Self {
        self.config.observability.logging.level = level.into();
        self.config.observability.logging.format = format;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> scriptweb_core::Result<Config> {
        crate::validator::validate_config(&self.config)?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();

        let config = ConfigBuilder::new()
            .listen(addr)
            .environment(Environment::Production)
            .variant(ScriptVariant::ListCopy)
            .logging("debug", LogFormat::Json)
            .build()
            .unwrap();

        assert_eq!(config.server.listen, addr);
        assert_eq!(config.server.environment, Environment::Production);
        assert_eq!(config.script.variant, ScriptVariant::ListCopy);
        assert_eq!(config.observability.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_builder_custom_source() {
        let config = ConfigBuilder::new()
            .custom_source(ScriptSource::inline("Person()"))
            .build()
            .unwrap();

        assert_eq!(config.script.variant, ScriptVariant::Custom);
        assert!(config.script.source.is_some());
    }

    #[test]
    fn test_builder_validates() {
        let result = ConfigBuilder::new()
            .variant(ScriptVariant::Custom)
            .build();
        assert!(result.is_err());

        let result = ConfigBuilder::new()
            .request_timeout(Duration::ZERO)
            .build();
        assert!(result.is_err());
    }
}
