//! Configuration types

use scriptweb_scripting::ScriptSource;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// HTTP server
    #[serde(default)]
    pub server: ServerConfig,

    /// Script compilation and execution
    #[serde(default)]
    pub script: ScriptConfig,

    /// What the index page captures
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Observability
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Hosting environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Error pages include panic details
    #[default]
    Development,
    /// Error pages show only the request id
    Production,
}

impl Environment {
    /// Whether this is the development environment
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Hosting environment
    #[serde(default)]
    pub environment: Environment,

    /// Request timeout
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Graceful shutdown timeout (wait for in-flight requests)
    #[serde(default = "default_shutdown_timeout", with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            environment: Environment::default(),
            request_timeout: default_request_timeout(),
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}

/// Which script the index page runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptVariant {
    /// Copy every field into a new person and return it
    #[default]
    Copy,
    /// Build a list of copies and return one of them
    ListCopy,
    /// Use `script.source`
    Custom,
}

/// Script configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScriptConfig {
    /// Script variant
    #[serde(default)]
    pub variant: ScriptVariant,

    /// Source for the custom variant (inline `code` or file `path`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ScriptSource>,

    /// Namespaces whose types are reachable unqualified
    #[serde(default = "default_imports")]
    pub imports: Vec<String>,

    /// Reject free variables the globals type does not declare at compile time
    #[serde(default = "default_true")]
    pub strict_variables: bool,

    /// Skip execution when compilation reports errors
    #[serde(default = "default_true")]
    pub gate_on_errors: bool,

    /// Maximum run time
    #[serde(default = "default_script_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Operation budget per run
    #[serde(default = "default_max_operations")]
    pub max_operations: u64,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            variant: ScriptVariant::default(),
            source: None,
            imports: default_imports(),
            strict_variables: true,
            gate_on_errors: true,
            timeout: default_script_timeout(),
            max_operations: default_max_operations(),
        }
    }
}

/// What the index page captures besides the JSON and equality flag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Per-stage timings
    pub stage_timings: bool,

    /// Compiler diagnostics
    pub diagnostics: bool,

    /// Raw script text
    pub script_text: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            stage_timings: true,
            diagnostics: true,
            script_text: false,
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

fn default_true() -> bool {
    true
}

// Default functions
fn default_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_imports() -> Vec<String> {
    vec!["models".to_string()]
}

fn default_script_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_max_operations() -> u64 {
    100_000
}
