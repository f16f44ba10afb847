//! The fatal error taxonomy.
//!
//! Compile-time errors fall into the classes below; all of them abort
//! translation. Each variant wraps a [`Diagnostic`] so the phase, source
//! position, and message survive the trip up to the driver.

use thiserror::Error;

use crate::{Diagnostic, Phase, Span};

/// Any error that aborts a translation.
///
/// Constructors fill in the [`Phase`] appropriate for each class:
/// escape errors are detected during lexing, name and mode errors during
/// semantic analysis.
///
/// # Examples
///
/// ```
/// use sblc_util::{CompileError, Span};
///
/// let err = CompileError::name("duplicate declaration of 'v'", Span::DUMMY);
/// assert_eq!(format!("{}", err), "semantic error at 1:1: duplicate declaration of 'v'");
/// ```
#[derive(Debug, Error)]
pub enum CompileError {
    /// Tokenization failure: unterminated string or comment, invalid
    /// character, malformed number.
    #[error("{0}")]
    Lex(Diagnostic),

    /// Syntax error.
    #[error("{0}")]
    Parse(Diagnostic),

    /// Undeclared or duplicate name, or a name used with the wrong kind.
    #[error("{0}")]
    Name(Diagnostic),

    /// Command illegal in the current direction.
    #[error("{0}")]
    Mode(Diagnostic),

    /// Unknown or malformed string-def reference.
    #[error("{0}")]
    Escape(Diagnostic),

    /// Failure while emitting target code.
    #[error("{0}")]
    Codegen(Diagnostic),
}

impl CompileError {
    /// Lexical error at `span`.
    pub fn lex(message: impl Into<String>, span: Span) -> Self {
        CompileError::Lex(Diagnostic::new(Phase::Lex, message, span))
    }

    /// Syntax error at `span`.
    pub fn parse(message: impl Into<String>, span: Span) -> Self {
        CompileError::Parse(Diagnostic::new(Phase::Parse, message, span))
    }

    /// Name error (undeclared, duplicate, wrong kind) at `span`.
    pub fn name(message: impl Into<String>, span: Span) -> Self {
        CompileError::Name(Diagnostic::new(Phase::Semantic, message, span))
    }

    /// Mode error (command illegal in current direction) at `span`.
    pub fn mode(message: impl Into<String>, span: Span) -> Self {
        CompileError::Mode(Diagnostic::new(Phase::Semantic, message, span))
    }

    /// String-escape error at `span`.
    pub fn escape(message: impl Into<String>, span: Span) -> Self {
        CompileError::Escape(Diagnostic::new(Phase::Lex, message, span))
    }

    /// Code generation error at `span`.
    pub fn codegen(message: impl Into<String>, span: Span) -> Self {
        CompileError::Codegen(Diagnostic::new(Phase::Codegen, message, span))
    }

    /// The wrapped diagnostic.
    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            CompileError::Lex(d)
            | CompileError::Parse(d)
            | CompileError::Name(d)
            | CompileError::Mode(d)
            | CompileError::Escape(d)
            | CompileError::Codegen(d) => d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_errors_report_lex_phase() {
        let err = CompileError::escape("undefined string escape '{foo}'", Span::DUMMY);
        assert_eq!(err.diagnostic().phase, Phase::Lex);
    }

    #[test]
    fn test_mode_errors_report_semantic_phase() {
        let err = CompileError::mode("routine used in forward mode", Span::DUMMY);
        assert_eq!(err.diagnostic().phase, Phase::Semantic);
    }

    #[test]
    fn test_display_delegates_to_diagnostic() {
        let err = CompileError::parse("expected command", Span::new(0, 1, 7, 2));
        assert_eq!(format!("{}", err), "parse error at 7:2: expected command");
    }
}
