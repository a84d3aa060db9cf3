//! Compiler diagnostics

use serde::Serialize;
use std::fmt;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Compilation succeeded but something looks wrong
    Warning,
    /// The unit cannot be executed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// What kind of problem a diagnostic reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    /// The source does not parse
    Syntax,
    /// A free variable is not a field of the globals type
    UndeclaredName,
    /// An imported namespace has no matching type library
    UnresolvedImport,
    /// The source has no statements
    EmptyScript,
}

impl DiagnosticCode {
    /// Stable identifier used in rendered diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::UndeclaredName => "undeclared-name",
            Self::UnresolvedImport => "unresolved-import",
            Self::EmptyScript => "empty-script",
        }
    }
}

/// A single compiler message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Problem kind
    pub code: DiagnosticCode,
    /// Human-readable message
    pub message: String,
    /// 1-based line, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// 1-based column, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    /// The offending name for [`DiagnosticCode::UndeclaredName`] and
    /// [`DiagnosticCode::UnresolvedImport`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic without a position
    pub fn error<S: Into<String>>(code: DiagnosticCode, message: S) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            line: None,
            column: None,
            symbol: None,
        }
    }

    /// Create a warning diagnostic without a position
    pub fn warning<S: Into<String>>(code: DiagnosticCode, message: S) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, message)
        }
    }

    /// Attach a source position
    pub fn at(mut self, line: Option<usize>, column: Option<usize>) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// Attach the offending symbol
    pub fn with_symbol<S: Into<String>>(mut self, symbol: S) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Whether this diagnostic blocks execution
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, "({line},{column}): ")?,
            (Some(line), None) => write!(f, "({line}): ")?,
            _ => {}
        }
        write!(f, "{} {}: {}", self.severity, self.code.as_str(), self.message)
    }
}

/// Whether any diagnostic in the list is an error
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}
