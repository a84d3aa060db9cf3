//! # scriptweb Core
//!
//! Core types and error handling shared by the scriptweb crates:
//! - Error types
//! - The [`Person`] record that scripts receive and return

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod error;
pub mod person;

pub use error::{Error, Result};
pub use person::Person;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::person::Person;
}
