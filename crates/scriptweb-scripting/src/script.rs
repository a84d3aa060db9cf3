//! Script units: create, compile, run

use crate::diagnostic::{self, Diagnostic};
use crate::engine::{Compilation, Program, ScriptEngine, ScriptSource};
use crate::error::{Result, ScriptError};
use crate::globals::ScriptGlobals;
use crate::options::ScriptOptions;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptState<R> {
    /// Value of the script's final expression
    pub return_value: R,
    /// Wall-clock time spent evaluating
    pub elapsed: Duration,
}

/// A script bound to a globals type `G` and a return type `R`.
///
/// Creating a unit does not parse anything. [`Script::compile`] reports
/// problems as diagnostics; [`Script::run`] refuses to evaluate a unit whose
/// compilation produced errors.
pub struct Script<G, R> {
    engine: Arc<dyn ScriptEngine>,
    source: ScriptSource,
    options: ScriptOptions,
    compilation: Option<Compilation>,
    _types: PhantomData<fn(&G) -> R>,
}

impl<G, R> fmt::Debug for Script<G, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Script")
            .field("language", &self.engine.language())
            .field("script", &self.source.name())
            .field("compiled", &self.compilation.is_some())
            .finish()
    }
}

impl<G, R> Script<G, R>
where
    G: ScriptGlobals,
    R: DeserializeOwned,
{
    /// Create a unit. Never fails; the source is not read or parsed yet.
    pub fn create(
        engine: Arc<dyn ScriptEngine>,
        source: ScriptSource,
        options: ScriptOptions,
    ) -> Self {
        Self {
            engine,
            source,
            options,
            compilation: None,
            _types: PhantomData,
        }
    }

    /// Script source
    pub fn source(&self) -> &ScriptSource {
        &self.source
    }

    /// Compilation options
    pub fn options(&self) -> &ScriptOptions {
        &self.options
    }

    /// Diagnostics of the last compilation (empty before compiling)
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.compilation
            .as_ref()
            .map(|c| c.diagnostics.as_slice())
            .unwrap_or_default()
    }

    /// Compile the unit and return its diagnostics.
    ///
    /// Compiling twice is a no-op. `Err` only when the source cannot be read
    /// or a referenced type library cannot be loaded.
    pub fn compile(&mut self) -> Result<&[Diagnostic]> {
        if self.compilation.is_none() {
            let code = self.source.load()?;
            let globals = G::variable_names();
            let compilation = self.engine.compile(&code, &globals, &self.options)?;

            for diag in &compilation.diagnostics {
                trace!(script = %self.source.name(), diagnostic = %diag, "Compiler diagnostic");
            }
            debug!(
                script = %self.source.name(),
                language = %self.engine.language(),
                diagnostics = compilation.diagnostics.len(),
                "Script compiled"
            );
            self.compilation = Some(compilation);
        }
        Ok(self.diagnostics())
    }

    /// Compile if needed, bind `globals` and evaluate.
    ///
    /// Fails with [`ScriptError::Compilation`] or [`ScriptError::Binding`]
    /// when compilation produced errors; never returns a value for a broken
    /// unit.
    pub async fn run(&mut self, globals: &G) -> Result<ScriptState<R>> {
        let program = self.program()?;
        let variables = globals.to_variables()?;

        let started = Instant::now();
        let handle = tokio::task::spawn_blocking({
            let program = Arc::clone(&program);
            move || program.run(&variables)
        });

        let joined = match self.options.timeout() {
            Some(limit) => match tokio::time::timeout(limit, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    program.cancel();
                    warn!(
                        script = %self.source.name(),
                        timeout_ms = limit.as_millis(),
                        "Script run timed out"
                    );
                    return Err(ScriptError::timeout(limit));
                }
            },
            None => handle.await,
        };
        let value = joined.map_err(|e| ScriptError::panic(e.to_string()))??;
        let elapsed = started.elapsed();

        trace!(
            script = %self.source.name(),
            elapsed_us = elapsed.as_micros(),
            "Script executed"
        );

        let return_value = serde_json::from_value(value).map_err(ScriptError::conversion)?;
        Ok(ScriptState {
            return_value,
            elapsed,
        })
    }

    fn program(&mut self) -> Result<Arc<dyn Program>> {
        self.compile()?;
        let compilation = self
            .compilation
            .as_ref()
            .ok_or_else(|| ScriptError::runtime("unit was not compiled"))?;

        if diagnostic::has_errors(&compilation.diagnostics) {
            return Err(ScriptError::from_diagnostics(&compilation.diagnostics));
        }
        compilation
            .program
            .clone()
            .ok_or_else(|| ScriptError::runtime("engine produced no program"))
    }
}
