//! # scriptweb Server
//!
//! The web front end:
//! - [`ScriptWorkflow`] - configure, create, compile and run the person-copy
//!   script, timing each stage
//! - Askama pages for the run report and the error page
//! - axum router with request ids, tracing, timeouts and panic recovery
//! - Server lifecycle with graceful shutdown

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod fixtures;
pub mod handlers;
pub mod library;
pub mod models;
pub mod router;
pub mod scripts;
pub mod server;
pub mod shutdown;
pub mod workflow;

pub use handlers::AppState;
pub use models::{RunReport, Stage, StageFailure, StageTiming, StageTimings};
pub use router::build_router;
pub use server::Server;
pub use shutdown::{ShutdownSignal, SignalHandler};
pub use workflow::{ScriptWorkflow, WorkflowError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::models::RunReport;
    pub use crate::server::Server;
    pub use crate::shutdown::{ShutdownSignal, SignalHandler};
    pub use crate::workflow::ScriptWorkflow;
}
