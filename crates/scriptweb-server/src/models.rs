//! View models for the run report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Workflow stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Build compilation options
    Configure,
    /// Create the script unit
    Create,
    /// Compile the unit
    Compile,
    /// Run the unit against the input
    Run,
    /// Serialize input and output for display
    Serialize,
}

impl Stage {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Configure => "configure",
            Stage::Create => "create",
            Stage::Compile => "compile",
            Stage::Run => "run",
            Stage::Serialize => "serialize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a stage started, relative to the start of the request, and how long
/// it took
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTiming {
    /// Start offset from the beginning of the workflow
    #[serde(with = "humantime_serde")]
    pub offset: Duration,
    /// Time spent in the stage
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
}

impl StageTiming {
    /// End offset from the beginning of the workflow
    pub fn end(&self) -> Duration {
        self.offset + self.elapsed
    }

    /// Elapsed time in milliseconds with microsecond precision, e.g. `"1.234 ms"`
    pub fn display(&self) -> String {
        format!("{:.3} ms", self.elapsed.as_secs_f64() * 1000.0)
    }

    /// Start offset formatted like [`StageTiming::display`]
    pub fn display_offset(&self) -> String {
        format!("{:.3} ms", self.offset.as_secs_f64() * 1000.0)
    }
}

/// Timings of every stage that ran
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimings {
    /// Building compilation options
    pub configure: Option<StageTiming>,
    /// Creating the script unit
    pub create: Option<StageTiming>,
    /// Compiling
    pub compile: Option<StageTiming>,
    /// Running
    pub run: Option<StageTiming>,
}

impl StageTimings {
    /// Record the timing of `stage`. Serialization is not timed.
    pub fn record(&mut self, stage: Stage, timing: StageTiming) {
        match stage {
            Stage::Configure => self.configure = Some(timing),
            Stage::Create => self.create = Some(timing),
            Stage::Compile => self.compile = Some(timing),
            Stage::Run => self.run = Some(timing),
            Stage::Serialize => {}
        }
    }

    /// Recorded timings in stage order, labelled
    pub fn entries(&self) -> Vec<(&'static str, StageTiming)> {
        [
            ("Create script options", self.configure),
            ("Create script", self.create),
            ("Compile", self.compile),
            ("Run", self.run),
        ]
        .into_iter()
        .filter_map(|(label, timing)| timing.map(|t| (label, t)))
        .collect()
    }
}

/// The stage that stopped the workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFailure {
    /// Failed stage
    pub stage: Stage,
    /// Error message
    pub message: String,
}

/// Result of one workflow execution, rendered by the index page.
///
/// Fields the workflow never reached keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Whether the script returned a person equal to the input
    pub people_equal: bool,
    /// Input as indented JSON
    pub original_person_json: String,
    /// Script result as indented JSON
    pub scripted_person_json: String,
    /// Name of the script that ran
    pub script_name: String,
    /// Per-stage timings, when captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timings: Option<StageTimings>,
    /// Compiler diagnostics, when captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Vec<String>>,
    /// Script text, when captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_text: Option<String>,
    /// Set when a stage failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<StageFailure>,
    /// When the run started
    pub started_at: Option<DateTime<Utc>>,
}

impl RunReport {
    /// Whether every stage succeeded
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_display() {
        let timing = StageTiming {
            offset: Duration::from_micros(500),
            elapsed: Duration::from_micros(1234),
        };
        assert_eq!(timing.display(), "1.234 ms");
        assert_eq!(timing.display_offset(), "0.500 ms");
        assert_eq!(timing.end(), Duration::from_micros(1734));
    }

    #[test]
    fn test_entries_skip_missing_stages() {
        let mut timings = StageTimings::default();
        timings.record(Stage::Configure, StageTiming::default());
        timings.record(Stage::Compile, StageTiming::default());
        timings.record(Stage::Serialize, StageTiming::default());

        let labels: Vec<_> = timings.entries().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, ["Create script options", "Compile"]);
    }

    #[test]
    fn test_default_report() {
        let report = RunReport::default();
        assert!(!report.people_equal);
        assert!(report.original_person_json.is_empty());
        assert!(report.succeeded());
    }

    #[test]
    fn test_report_json_omits_uncaptured() {
        let json = serde_json::to_value(RunReport::default()).unwrap();
        assert!(json.get("timings").is_none());
        assert!(json.get("failure").is_none());
        assert_eq!(json["people_equal"], false);
    }

    #[test]
    fn test_failure_serialization() {
        let failure = StageFailure {
            stage: Stage::Run,
            message: "boom".to_string(),
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["stage"], "run");
        assert_eq!(Stage::Compile.to_string(), "compile");
    }
}
