//! Backend diagnostics and the sink they are forwarded to.
//!
//! The emit cache never acts on diagnostics itself. It collects the syntactic
//! and semantic [`Diagnostic`]s reported by the compiler backend for each file
//! it compiles and forwards them into a [`DiagnosticSink`]; whether errors stop
//! the build is the host's decision.

#![warn(missing_docs)]

pub mod diagnostic;
pub mod severity;
pub mod sink;

pub use diagnostic::{Diagnostic, Location};
pub use severity::Severity;
pub use sink::DiagnosticSink;
