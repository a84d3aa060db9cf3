//! Script compilation and execution error types

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use std::time::Duration;

/// Script result type
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Script error
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScriptError {
    /// The unit has error diagnostics and cannot run
    #[error("Script compilation failed: {}", first_error(.diagnostics))]
    Compilation {
        /// All diagnostics produced by compilation
        diagnostics: Vec<Diagnostic>,
    },

    /// The script references a name the globals type does not declare
    #[error("Script binding error: '{name}' is not declared by the globals type{}", at_line(.line))]
    Binding {
        /// Undeclared name
        name: String,
        /// Script line, if known
        line: Option<usize>,
    },

    /// The script failed while running
    #[error("Script runtime error: {message}{}", at_line(.line))]
    Runtime {
        /// Error message
        message: String,
        /// Script line where the error occurred
        line: Option<usize>,
    },

    /// The script did not finish in time
    #[error("Script timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// A referenced type library could not be loaded
    #[error("Script reference '{namespace}' could not be loaded: {message}")]
    Reference {
        /// Library namespace
        namespace: String,
        /// Error message
        message: String,
    },

    /// Globals or return value did not convert
    #[error("Script type error: {message}")]
    Conversion {
        /// Error message
        message: String,
    },

    /// The execution worker panicked or was cancelled
    #[error("Script panic: {message}")]
    Panic {
        /// Panic message
        message: String,
    },

    /// Reading a script file failed
    #[error("Script IO error: {message}")]
    Io {
        /// Error message
        message: String,
    },
}

fn first_error(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .find(|d| d.is_error())
        .map(ToString::to_string)
        .unwrap_or_else(|| "no error diagnostics".to_string())
}

fn at_line(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

impl ScriptError {
    /// Error for running a unit whose compilation failed.
    ///
    /// An undeclared name is reported as [`ScriptError::Binding`], anything
    /// else as [`ScriptError::Compilation`].
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let first = diagnostics.iter().find(|d| d.is_error());
        match first {
            Some(Diagnostic {
                code: DiagnosticCode::UndeclaredName,
                symbol: Some(name),
                line,
                ..
            }) => Self::Binding {
                name: name.clone(),
                line: *line,
            },
            _ => Self::Compilation {
                diagnostics: diagnostics.to_vec(),
            },
        }
    }

    /// Create a runtime error
    pub fn runtime<S: Into<String>>(message: S) -> Self {
        Self::Runtime {
            message: message.into(),
            line: None,
        }
    }

    /// Create a timeout error
    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Create a reference error
    pub fn reference<N: Into<String>>(namespace: N, message: impl std::fmt::Display) -> Self {
        Self::Reference {
            namespace: namespace.into(),
            message: message.to_string(),
        }
    }

    /// Create a conversion error
    pub fn conversion(message: impl std::fmt::Display) -> Self {
        Self::Conversion {
            message: message.to_string(),
        }
    }

    /// Create a panic error
    pub fn panic<S: Into<String>>(message: S) -> Self {
        Self::Panic {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ScriptError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

impl From<Box<rhai::EvalAltResult>> for ScriptError {
    fn from(err: Box<rhai::EvalAltResult>) -> Self {
        classify(&err)
    }
}

/// Map an evaluation error to a [`ScriptError`], looking through
/// function-call and module wrappers to the error that caused them.
fn classify(err: &rhai::EvalAltResult) -> ScriptError {
    use rhai::EvalAltResult;

    match err {
        EvalAltResult::ErrorInFunctionCall(_, _, inner, _)
        | EvalAltResult::ErrorInModule(_, inner, _) => classify(inner),
        EvalAltResult::ErrorVariableNotFound(name, pos) => ScriptError::Binding {
            name: name.clone(),
            line: pos.line(),
        },
        EvalAltResult::ErrorRuntime(value, pos) => ScriptError::Runtime {
            message: value.to_string(),
            line: pos.line(),
        },
        other => ScriptError::Runtime {
            message: other.to_string(),
            line: other.position().line(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undeclared_name_becomes_binding_error() {
        let diagnostics = vec![
            Diagnostic::warning(DiagnosticCode::EmptyScript, "empty"),
            Diagnostic::error(DiagnosticCode::UndeclaredName, "Variable not found: Nickname")
                .at(Some(2), Some(9))
                .with_symbol("Nickname"),
        ];

        let err = ScriptError::from_diagnostics(&diagnostics);
        assert!(matches!(
            err,
            ScriptError::Binding { ref name, line: Some(2) } if name == "Nickname"
        ));
        assert_eq!(
            err.to_string(),
            "Script binding error: 'Nickname' is not declared by the globals type at line 2"
        );
    }

    #[test]
    fn test_syntax_error_becomes_compilation_error() {
        let diagnostics =
            vec![Diagnostic::error(DiagnosticCode::Syntax, "Expecting ';'").at(Some(4), Some(1))];

        let err = ScriptError::from_diagnostics(&diagnostics);
        assert!(matches!(err, ScriptError::Compilation { .. }));
        assert!(err.to_string().contains("(4,1): error syntax: Expecting ';'"));
    }

    #[test]
    fn test_timeout_display() {
        let err = ScriptError::timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "Script timeout after 250ms");
    }

    #[test]
    fn test_runtime_error_from_nested_call() {
        let inner: Box<rhai::EvalAltResult> = "bad date".into();
        let wrapped = Box::new(rhai::EvalAltResult::ErrorInFunctionCall(
            "check".to_string(),
            String::new(),
            inner,
            rhai::Position::NONE,
        ));

        let err = ScriptError::from(wrapped);
        assert!(matches!(err, ScriptError::Runtime { ref message, .. } if message == "bad date"));
    }
}
