//! Diagnostic payloads.
//!
//! Every compile-time failure carries a [`Diagnostic`]: the phase that
//! detected it, the source position, and a message. Rendering is
//! deliberately one line (`"parse error at 3:14: expected ')'"`) because
//! the driver prints exactly one diagnostic and exits.

use std::fmt;

use crate::Span;

/// The pipeline phase that produced a diagnostic.
///
/// # Examples
///
/// ```
/// use sblc_util::Phase;
///
/// assert_eq!(format!("{}", Phase::Lex), "lex");
/// assert_eq!(format!("{}", Phase::Semantic), "semantic");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Tokenization and string-escape expansion.
    Lex,
    /// Syntax analysis.
    Parse,
    /// Name resolution, mode analysis, grouping and among compilation.
    Semantic,
    /// Target code emission.
    Codegen,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lex => write!(f, "lex"),
            Phase::Parse => write!(f, "parse"),
            Phase::Semantic => write!(f, "semantic"),
            Phase::Codegen => write!(f, "codegen"),
        }
    }
}

/// A single fatal diagnostic.
///
/// # Examples
///
/// ```
/// use sblc_util::{Diagnostic, Phase, Span};
///
/// let diag = Diagnostic::new(Phase::Parse, "expected ')'", Span::new(5, 6, 2, 3));
/// assert_eq!(format!("{}", diag), "parse error at 2:3: expected ')'");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Phase that detected the problem.
    pub phase: Phase,
    /// Human-readable description.
    pub message: String,
    /// Source location.
    pub span: Span,
}

impl Diagnostic {
    /// Creates a diagnostic.
    pub fn new(phase: Phase, message: impl Into<String>, span: Span) -> Self {
        Self {
            phase,
            message: message.into(),
            span,
        }
    }

    /// Line number of the diagnostic (1-based).
    #[inline]
    pub fn line(&self) -> u32 {
        self.span.line
    }

    /// Column number of the diagnostic (1-based).
    #[inline]
    pub fn column(&self) -> u32 {
        self.span.column
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error at {}:{}: {}",
            self.phase, self.span.line, self.span.column, self.message
        )
    }
}
