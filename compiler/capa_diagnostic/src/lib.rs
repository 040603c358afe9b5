//! Diagnostic system for the capa compiler.
//!
//! - Error codes for searchability (`E1xxx` declaration, `E2xxx` resolution,
//!   `E3xxx` structural, `W4xxx` warnings)
//! - A [`Diagnostic`] record rendered as `message [file:line:column]`
//! - A [`DiagnosticSink`] created by the caller and passed by `&mut` through
//!   every pass, instead of a process-wide logger
//!
//! Fatal conditions travel as `Result` errors in `capa_model` and are only
//! turned into diagnostics at the driver boundary; the sink itself is where
//! the recoverable (warning) tier lands during a run.

mod diagnostic;
mod error_code;
mod sink;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use sink::{DiagnosticSink, SinkConfig};
