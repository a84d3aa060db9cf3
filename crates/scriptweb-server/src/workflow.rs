//! Script workflow: configure, create, compile, run, compare, serialize

use crate::library::person_library;
use crate::models::{RunReport, Stage, StageFailure, StageTiming, StageTimings};
use crate::scripts;
use chrono::Utc;
use scriptweb_config::{CaptureConfig, Config, ScriptConfig};
use scriptweb_core::{Person, Result};
use scriptweb_scripting::diagnostic::{self, Diagnostic};
use scriptweb_scripting::{
    RhaiEngine, Script, ScriptEngine, ScriptError, ScriptLimits, ScriptOptions, ScriptSource,
};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info};

/// A failed stage and its cause
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct WorkflowError {
    /// Stage that failed
    pub stage: Stage,
    /// Cause
    #[source]
    pub source: StageError,
}

/// Cause of a stage failure
#[derive(Debug, Error)]
pub enum StageError {
    /// Compilation or execution error
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// JSON serialization error
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WorkflowError {
    /// Attribute an error to `stage`
    pub fn new(stage: Stage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    fn at<E: Into<StageError>>(stage: Stage) -> impl FnOnce(E) -> Self {
        move |err| Self::new(stage, err)
    }
}

/// Runs the person-copy script once per call.
///
/// Holds only immutable settings; options, engine state and the script
/// unit are rebuilt on every [`ScriptWorkflow::execute`].
pub struct ScriptWorkflow {
    script: ScriptConfig,
    capture: CaptureConfig,
    source: ScriptSource,
    engine: Arc<dyn ScriptEngine>,
}

impl fmt::Debug for ScriptWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptWorkflow")
            .field("variant", &self.script.variant)
            .field("script", &self.source.name())
            .field("capture", &self.capture)
            .finish()
    }
}

impl ScriptWorkflow {
    /// Create a workflow, reading a custom script file if one is configured
    pub fn new(script: ScriptConfig, capture: CaptureConfig) -> Result<Self> {
        let source = scripts::resolve_source(&script)?;

        Ok(Self {
            script,
            capture,
            source,
            engine: Arc::new(RhaiEngine::new()),
        })
    }

    /// Create a workflow from the `script` and `capture` sections
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.script.clone(), config.capture.clone())
    }

    /// Use a different engine
    pub fn with_engine(mut self, engine: Arc<dyn ScriptEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// The script this workflow runs
    pub fn source(&self) -> &ScriptSource {
        &self.source
    }

    /// Compilation options: configured imports plus the `models` library
    pub fn script_options(&self) -> ScriptOptions {
        ScriptOptions::default()
            .with_imports(self.script.imports.iter().cloned())
            .with_references([person_library()])
            .with_strict_variables(self.script.strict_variables)
            .with_limits(ScriptLimits {
                max_operations: self.script.max_operations,
                ..ScriptLimits::default()
            })
            .with_timeout(self.script.timeout)
    }

    /// Run every stage against `person`.
    ///
    /// Never fails: a failing stage is logged, recorded in
    /// [`RunReport::failure`], and the fields it did not reach keep their
    /// defaults.
    pub async fn execute(&self, person: &Person) -> RunReport {
        let mut report = RunReport {
            script_name: self.source.name(),
            started_at: Some(Utc::now()),
            timings: self.capture.stage_timings.then(StageTimings::default),
            script_text: if self.capture.script_text {
                self.source.load().ok()
            } else {
                None
            },
            ..RunReport::default()
        };

        if let Err(err) = self.run_stages(person, &mut report).await {
            error!(
                stage = %err.stage,
                script = %report.script_name,
                error = %err.source,
                "Script workflow failed"
            );
            report.failure = Some(StageFailure {
                stage: err.stage,
                message: err.source.to_string(),
            });
        }

        report
    }

    async fn run_stages(
        &self,
        person: &Person,
        report: &mut RunReport,
    ) -> std::result::Result<(), WorkflowError> {
        let origin = Instant::now();

        let (options, timing) = timed(origin, || self.script_options());
        record(report, Stage::Configure, timing);

        let (mut script, timing) = timed(origin, || {
            Script::<Person, Person>::create(Arc::clone(&self.engine), self.source.clone(), options)
        });
        record(report, Stage::Create, timing);

        let (compiled, timing) = timed(origin, || script.compile().map(<[Diagnostic]>::to_vec));
        record(report, Stage::Compile, timing);
        let diagnostics = compiled.map_err(WorkflowError::at(Stage::Compile))?;

        info!(
            script = %report.script_name,
            elapsed_us = timing.elapsed.as_micros(),
            diagnostics = diagnostics.len(),
            "Compiling script took {:?}",
            timing.elapsed
        );

        if self.capture.diagnostics {
            report.diagnostics = Some(diagnostics.iter().map(ToString::to_string).collect());
        }

        if self.script.gate_on_errors && diagnostic::has_errors(&diagnostics) {
            return Err(WorkflowError::new(
                Stage::Compile,
                ScriptError::from_diagnostics(&diagnostics),
            ));
        }

        let started = Instant::now();
        let result = script.run(person).await;
        let timing = StageTiming {
            offset: started.duration_since(origin),
            elapsed: started.elapsed(),
        };
        record(report, Stage::Run, timing);
        let state = result.map_err(WorkflowError::at(Stage::Run))?;

        debug!(
            script = %report.script_name,
            elapsed_us = state.elapsed.as_micros(),
            "Script returned"
        );

        report.people_equal = *person == state.return_value;
        report.original_person_json =
            serde_json::to_string_pretty(person).map_err(WorkflowError::at(Stage::Serialize))?;
        report.scripted_person_json = serde_json::to_string_pretty(&state.return_value)
            .map_err(WorkflowError::at(Stage::Serialize))?;

        Ok(())
    }
}

/// Run `f`, measuring it against `origin`
fn timed<T>(origin: Instant, f: impl FnOnce() -> T) -> (T, StageTiming) {
    let started = Instant::now();
    let value = f();
    let timing = StageTiming {
        offset: started.duration_since(origin),
        elapsed: started.elapsed(),
    };
    (value, timing)
}

fn record(report: &mut RunReport, stage: Stage, timing: StageTiming) {
    if let Some(timings) = report.timings.as_mut() {
        timings.record(stage, timing);
    }
}
