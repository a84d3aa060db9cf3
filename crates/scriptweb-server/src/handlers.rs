//! HTTP handlers for the script pages

use crate::fixtures;
use crate::models::RunReport;
use crate::workflow::ScriptWorkflow;
use askama::Template;
use axum::{
    extract::State,
    http::{header::CACHE_CONTROL, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use scriptweb_config::{Config, Environment};
use scriptweb_core::{Error, Person, Result};
use std::any::Any;
use std::sync::Arc;

/// Request id header set by the router
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const NO_STORE: &str = "no-store, no-cache";

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    workflow: Arc<ScriptWorkflow>,
    environment: Environment,
}

impl AppState {
    /// Create a new application state
    #[must_use]
    pub fn new(workflow: ScriptWorkflow, environment: Environment) -> Self {
        Self {
            workflow: Arc::new(workflow),
            environment,
        }
    }

    /// Build the workflow described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let workflow = ScriptWorkflow::from_config(config)?;
        Ok(Self::new(workflow, config.server.environment))
    }

    /// The script workflow
    pub fn workflow(&self) -> &ScriptWorkflow {
        &self.workflow
    }

    /// Hosting environment
    pub fn environment(&self) -> Environment {
        self.environment
    }
}

/// Helper struct for rendering Askama templates
#[derive(Debug)]
pub struct HtmlTemplate<T>(pub T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                let err = Error::Template(err.to_string());
                tracing::error!(error = %err, "Failed to render template");
                (err.to_status_code(), err.to_string()).into_response()
            }
        }
    }
}

/// One row of the timings table
#[derive(Debug, Clone)]
pub struct TimingRow {
    /// Stage label
    pub label: &'static str,
    /// Start offset
    pub offset: String,
    /// Elapsed time
    pub elapsed: String,
}

/// Index page template
#[derive(Debug, Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub full_name: String,
    pub script_name: String,
    pub people_equal: bool,
    pub original_person_json: String,
    pub scripted_person_json: String,
    pub show_timings: bool,
    pub timings: Vec<TimingRow>,
    pub show_diagnostics: bool,
    pub diagnostics: Vec<String>,
    pub show_script: bool,
    pub script_text: String,
    pub failed: bool,
    pub failed_stage: String,
    pub failure_message: String,
}

impl IndexTemplate {
    /// Page for `report`, produced from `person`
    pub fn new(person: &Person, report: RunReport) -> Self {
        let timings = report
            .timings
            .as_ref()
            .map(|t| {
                t.entries()
                    .into_iter()
                    .map(|(label, timing)| TimingRow {
                        label,
                        offset: timing.display_offset(),
                        elapsed: timing.display(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let (failed_stage, failure_message) = report
            .failure
            .as_ref()
            .map(|f| (f.stage.to_string(), f.message.clone()))
            .unwrap_or_default();

        Self {
            full_name: person.full_name(),
            script_name: report.script_name,
            people_equal: report.people_equal,
            original_person_json: report.original_person_json,
            scripted_person_json: report.scripted_person_json,
            show_timings: report.timings.is_some(),
            timings,
            show_diagnostics: report.diagnostics.is_some(),
            diagnostics: report.diagnostics.unwrap_or_default(),
            show_script: report.script_text.is_some(),
            script_text: report.script_text.unwrap_or_default(),
            failed: report.failure.is_some(),
            failed_stage,
            failure_message,
        }
    }
}

/// Error page template
#[derive(Debug, Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub show_request_id: bool,
    pub request_id: String,
    pub show_details: bool,
    pub details: String,
}

impl ErrorTemplate {
    /// Error page with an optional request id and panic details
    pub fn new(request_id: Option<String>, details: Option<String>) -> Self {
        Self {
            show_request_id: request_id.as_deref().is_some_and(|id| !id.is_empty()),
            request_id: request_id.unwrap_or_default(),
            show_details: details.is_some(),
            details: details.unwrap_or_default(),
        }
    }
}

/// `GET /`: run the script and render the report
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let person = fixtures::person_to_copy();
    let report = state.workflow.execute(&person).await;

    HtmlTemplate(IndexTemplate::new(&person, report))
}

/// `GET /api/run`: run the script and return the report as JSON
pub async fn api_run(State(state): State<AppState>) -> Json<RunReport> {
    let person = fixtures::person_to_copy();
    Json(state.workflow.execute(&person).await)
}

/// `GET /Home/Error`
pub async fn error_page(headers: HeaderMap) -> Response {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    (
        [(CACHE_CONTROL, NO_STORE)],
        HtmlTemplate(ErrorTemplate::new(Some(request_id), None)),
    )
        .into_response()
}

/// Render a caught panic as the error page
pub fn panic_response(err: Box<dyn Any + Send + 'static>, show_details: bool) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %message, "Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(CACHE_CONTROL, NO_STORE)],
        HtmlTemplate(ErrorTemplate::new(None, show_details.then_some(message))),
    )
        .into_response()
}
