//! # scriptweb Scripting
//!
//! Compile-and-run support for scripts bound to a typed input ("globals").
//!
//! ## Pieces
//!
//! - [`ScriptOptions`] - imports, referenced [`TypeLibrary`]s, limits, timeout
//! - [`Script`] - a script unit: create, compile (diagnostics), run
//! - [`ScriptEngine`] / [`Program`] - the engine seam; [`RhaiEngine`] is the
//!   implementation used by the server
//! - [`Diagnostic`] - compiler messages, independent of execution
//!
//! Values cross the engine seam as `serde_json::Value`, so any
//! `Serialize` type can be a globals type and any `DeserializeOwned` type a
//! return type.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod diagnostic;
pub mod engine;
pub mod error;
pub mod globals;
pub mod options;
pub mod rhai_engine;
pub mod script;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use engine::{Compilation, Program, ScriptEngine, ScriptLanguage, ScriptSource};
pub use error::{Result, ScriptError};
pub use globals::ScriptGlobals;
pub use options::{ScriptLimits, ScriptOptions, TypeConstructor, TypeLibrary};
pub use rhai_engine::RhaiEngine;
pub use script::{Script, ScriptState};

/// Prelude with commonly used types
pub mod prelude {
    pub use crate::diagnostic::{Diagnostic, Severity};
    pub use crate::engine::{ScriptEngine, ScriptSource};
    pub use crate::error::{Result, ScriptError};
    pub use crate::options::{ScriptOptions, TypeLibrary};
    pub use crate::script::{Script, ScriptState};
}
