//! Script engine trait and abstractions

use crate::diagnostic::{self, Diagnostic};
use crate::error::{Result, ScriptError};
use crate::options::ScriptOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Supported scripting languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLanguage {
    /// Rhai scripting language
    Rhai,
}

impl ScriptLanguage {
    /// Get file extension for this language
    pub fn extension(&self) -> &str {
        match self {
            Self::Rhai => "rhai",
        }
    }

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "rhai" => Some(Self::Rhai),
            _ => None,
        }
    }
}

impl fmt::Display for ScriptLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rhai => write!(f, "rhai"),
        }
    }
}

/// Script source (inline or file-based)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptSource {
    /// Inline script code
    Inline {
        /// Script code
        code: String,
        /// Optional name for debugging
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// File-based script
    File {
        /// Path to script file
        path: PathBuf,
    },
}

impl ScriptSource {
    /// Create inline script source
    pub fn inline<S: Into<String>>(code: S) -> Self {
        Self::Inline {
            code: code.into(),
            name: None,
        }
    }

    /// Create inline script with name
    pub fn inline_named<S: Into<String>, N: Into<String>>(code: S, name: N) -> Self {
        Self::Inline {
            code: code.into(),
            name: Some(name.into()),
        }
    }

    /// Create file-based script source
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        Self::File { path: path.into() }
    }

    /// Get script code, reading the file if needed
    pub fn load(&self) -> Result<String> {
        match self {
            Self::Inline { code, .. } => Ok(code.clone()),
            Self::File { path } => std::fs::read_to_string(path).map_err(|e| ScriptError::Io {
                message: format!("Failed to read script file {:?}: {}", path, e),
            }),
        }
    }

    /// Read a file source into an inline source named after the file.
    /// Inline sources are returned unchanged.
    pub fn resolve(self) -> Result<Self> {
        match self {
            Self::Inline { .. } => Ok(self),
            Self::File { .. } => {
                let code = self.load()?;
                Ok(Self::inline_named(code, self.name()))
            }
        }
    }

    /// Get a descriptive name for this script
    pub fn name(&self) -> String {
        match self {
            Self::Inline { name, .. } => name.clone().unwrap_or_else(|| "inline".to_string()),
            Self::File { path } => path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string(),
        }
    }
}

/// Output of [`ScriptEngine::compile`]
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    /// Errors and warnings
    pub diagnostics: Vec<Diagnostic>,
    /// Runnable form; `None` when there are error diagnostics
    pub program: Option<Arc<dyn Program>>,
}

impl Compilation {
    /// Whether any diagnostic is an error
    pub fn has_errors(&self) -> bool {
        diagnostic::has_errors(&self.diagnostics)
    }
}

/// Script engine trait
///
/// This trait abstracts over different scripting languages. An engine turns
/// source text into a [`Program`]; syntax and name problems are reported as
/// diagnostics, `Err` is reserved for environmental failures such as a type
/// library that cannot be materialized.
pub trait ScriptEngine: Send + Sync + fmt::Debug {
    /// Get the language this engine supports
    fn language(&self) -> ScriptLanguage;

    /// Compile `code`, treating `globals` as declared free variables
    fn compile(&self, code: &str, globals: &[String], options: &ScriptOptions)
        -> Result<Compilation>;
}

/// A compiled, runnable script
pub trait Program: Send + Sync + fmt::Debug {
    /// Run with each entry of `globals` bound as a variable and return the
    /// value of the final expression
    fn run(&self, globals: &serde_json::Map<String, serde_json::Value>)
        -> Result<serde_json::Value>;

    /// Ask a running evaluation to stop at its next checkpoint
    fn cancel(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_language_extension() {
        assert_eq!(ScriptLanguage::from_extension("RHAI"), Some(ScriptLanguage::Rhai));
        assert_eq!(ScriptLanguage::from_extension("lua"), None);
        assert_eq!(ScriptLanguage::Rhai.extension(), "rhai");
    }

    #[test]
    fn test_source_names() {
        assert_eq!(ScriptSource::inline("1").name(), "inline");
        assert_eq!(ScriptSource::inline_named("1", "copy").name(), "copy");
        assert_eq!(ScriptSource::file("/tmp/scripts/copy.rhai").name(), "copy.rhai");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = ScriptSource::file("/definitely/not/here.rhai");
        assert!(matches!(source.load(), Err(ScriptError::Io { .. })));
    }

    #[test]
    fn test_resolve_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answer.rhai");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"40 + 2")
            .unwrap();

        let resolved = ScriptSource::file(&path).resolve().unwrap();
        assert_eq!(resolved, ScriptSource::inline_named("40 + 2", "answer.rhai"));
    }

    #[test]
    fn test_source_deserializes_untagged() {
        let inline: ScriptSource = serde_json::from_str(r#"{"code": "1 + 1"}"#).unwrap();
        assert_eq!(inline, ScriptSource::inline("1 + 1"));

        let file: ScriptSource = serde_json::from_str(r#"{"path": "copy.rhai"}"#).unwrap();
        assert_eq!(file, ScriptSource::file("copy.rhai"));
    }
}
