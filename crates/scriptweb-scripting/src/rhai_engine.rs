//! Rhai script engine implementation

use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::engine::{Compilation, Program, ScriptEngine, ScriptLanguage};
use crate::error::{Result, ScriptError};
use crate::options::{ScriptOptions, TypeLibrary};
use chrono::NaiveDate;
use rhai::{Dynamic, Engine, EvalAltResult, Module, ParseError, ParseErrorType, Scope, AST};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Date layouts accepted by `parse_date`
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// Rhai script engine.
///
/// Every compilation gets its own `rhai::Engine` configured from the
/// options, so nothing leaks between units.
#[derive(Debug, Default, Clone, Copy)]
pub struct RhaiEngine;

impl RhaiEngine {
    /// Create new Rhai engine
    pub fn new() -> Self {
        Self
    }

    fn build_engine(options: &ScriptOptions, cancelled: &Arc<AtomicBool>) -> Engine {
        let mut engine = Engine::new();

        let limits = options.limits();
        engine.set_max_expr_depths(limits.max_expr_depth, limits.max_function_expr_depth);
        engine.set_max_operations(limits.max_operations);
        engine.set_max_string_size(limits.max_string_size);
        engine.set_max_array_size(limits.max_array_size);
        engine.set_max_map_size(limits.max_map_size);
        engine.set_strict_variables(options.strict_variables());
        engine.disable_symbol("eval");

        let flag = Arc::clone(cancelled);
        engine.on_progress(move |_| flag.load(Ordering::Relaxed).then_some(Dynamic::UNIT));

        Self::register_functions(&mut engine);
        engine
    }

    /// Register helper functions available to every script
    fn register_functions(engine: &mut Engine) {
        engine.register_fn(
            "parse_date",
            |text: &str| -> std::result::Result<String, Box<EvalAltResult>> {
                parse_date(text)
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .ok_or_else(|| {
                        format!("String '{text}' was not recognized as a valid date.").into()
                    })
            },
        );

        engine.register_fn("unix_time", || -> i64 { chrono::Utc::now().timestamp() });

        // Logging (for debugging scripts)
        engine.register_fn("log_debug", |msg: &str| {
            debug!(script_log = msg);
        });

        engine.register_fn("log_info", |msg: &str| {
            tracing::info!(script_log = msg);
        });

        engine.register_fn("log_warn", |msg: &str| {
            warn!(script_log = msg);
        });
    }

    /// Build the module holding a library's constructors
    fn library_module(library: &TypeLibrary) -> Result<Module> {
        let mut module = Module::new();

        for ctor in library.constructors() {
            let template = ctor
                .template()
                .map_err(|e| ScriptError::reference(library.namespace(), e))?;
            let value = rhai::serde::to_dynamic(&template)
                .map_err(|e| ScriptError::reference(library.namespace(), e))?;

            module.set_native_fn(
                ctor.name(),
                move || -> std::result::Result<Dynamic, Box<EvalAltResult>> { Ok(value.clone()) },
            );
        }

        Ok(module)
    }
}

/// Parse a date in one of [`DATE_FORMATS`]
fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text.trim(), format).ok())
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        let pos = err.position();
        let diagnostic = match err.err_type() {
            ParseErrorType::VariableUndefined(name) => {
                Diagnostic::error(DiagnosticCode::UndeclaredName, err.err_type().to_string())
                    .with_symbol(name.clone())
            }
            other => Diagnostic::error(DiagnosticCode::Syntax, other.to_string()),
        };
        diagnostic.at(pos.line(), pos.position())
    }
}

impl ScriptEngine for RhaiEngine {
    fn language(&self) -> ScriptLanguage {
        ScriptLanguage::Rhai
    }

    fn compile(
        &self,
        code: &str,
        globals: &[String],
        options: &ScriptOptions,
    ) -> Result<Compilation> {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut engine = Self::build_engine(options, &cancelled);
        let mut diagnostics = Vec::new();

        for library in options.references() {
            let module = Self::library_module(library)?;
            if options.is_imported(library.namespace()) {
                engine.register_global_module(module.into());
            } else {
                engine.register_static_module(library.namespace(), module.into());
            }
            trace!(namespace = library.namespace(), "Type library registered");
        }

        for import in options.imports() {
            if !options.references().iter().any(|l| l.namespace() == import) {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticCode::UnresolvedImport,
                        format!("The namespace '{import}' could not be found (missing reference?)"),
                    )
                    .with_symbol(import.clone()),
                );
            }
        }

        if code.trim().is_empty() {
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::EmptyScript,
                "Script has no statements; it will return ()",
            ));
        }

        let mut scope = Scope::new();
        for name in globals {
            scope.push_dynamic(name.as_str(), Dynamic::UNIT);
        }

        let ast = match engine.compile_with_scope(&scope, code) {
            Ok(ast) => Some(ast),
            Err(err) => {
                diagnostics.push(Diagnostic::from(&err));
                None
            }
        };

        let mut compilation = Compilation {
            diagnostics,
            program: None,
        };
        if let (Some(ast), false) = (ast, compilation.has_errors()) {
            compilation.program = Some(Arc::new(RhaiProgram {
                engine: Arc::new(engine),
                ast,
                cancelled,
            }));
        }

        debug!(
            diagnostics = compilation.diagnostics.len(),
            runnable = compilation.program.is_some(),
            "Rhai script compiled"
        );
        Ok(compilation)
    }
}

/// Compiled Rhai script together with the engine it was compiled for
#[derive(Debug)]
struct RhaiProgram {
    engine: Arc<Engine>,
    ast: AST,
    cancelled: Arc<AtomicBool>,
}

impl Program for RhaiProgram {
    fn run(
        &self,
        globals: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let mut scope = Scope::new();
        for (name, value) in globals {
            let value = rhai::serde::to_dynamic(value).map_err(|e| {
                ScriptError::conversion(format!("global '{name}' could not be bound: {e}"))
            })?;
            scope.push_dynamic(name.as_str(), value);
        }

        let result: Dynamic = self.engine.eval_ast_with_scope(&mut scope, &self.ast)?;

        rhai::serde::from_dynamic::<serde_json::Value>(&result).map_err(|e| {
            ScriptError::conversion(format!(
                "return value of type '{}' could not be read: {e}",
                result.type_name()
            ))
        })
    }

    /// Cancellation is sticky: later runs of this program stop at once.
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}
