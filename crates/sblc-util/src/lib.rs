//! sblc-util - Shared infrastructure for the Snowball compiler.
//!
//! This crate provides the pieces every phase of the pipeline needs:
//!
//! - [`Span`] - source location tracking (byte offsets plus line/column)
//! - [`Symbol`] - interned identifiers
//! - [`Diagnostic`] and [`Phase`] - error payloads with a uniform
//!   `"<phase> error at <line>:<col>: <message>"` rendering
//! - [`CompileError`] - the fatal error taxonomy shared by all phases
//!
//! Compilation is single-threaded and pure: one translation is a function
//! from source text to target text, and the first error aborts it. All
//! phases therefore return `Result<_, CompileError>` and propagate with
//! `?` rather than accumulating diagnostics.

mod diagnostic;
mod error;
mod span;
mod symbol;

pub use diagnostic::{Diagnostic, Phase};
pub use error::CompileError;
pub use span::Span;
pub use symbol::Symbol;
