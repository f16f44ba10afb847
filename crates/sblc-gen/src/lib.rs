//! sblc-gen - Code generation for the Snowball compiler.
//!
//! ============================================================================
//! TARGET AND SHAPE
//! ============================================================================
//!
//! The generator lowers an analyzed program to one self-contained Python
//! module:
//!
//! ```text
//! runtime preamble      _Env: buffer, cursor, limit, limit_backward,
//!                       bra, ket; the primitive operations, each with a
//!                       forward and a backward form
//! grouping tables       _g_<name> = frozenset('...')
//! state constructor     _new_env: integer / boolean / string slots
//! routines              def _r_f_<name>(e) / _r_b_<name>(e) -> bool
//! among tables          _a_<id> = ((key, arm, guard), ...)
//! externals             def <name>(word) -> str
//! ```
//!
//! Generated routines compose by returning a success flag; commands that
//! can fail leave the restoration of cursor, limit, bra, ket, and buffer
//! content to the enclosing backtrack point (`or`, `try`, `do`, `not`,
//! `test`, `repeat`, `loop`, `goto`, `gopast`, among attempts), each of
//! which snapshots the full state before the attempt. This realizes the
//! value-restoration semantics of the abstract machine without an undo
//! log.
//!
//! Externals lowercase their input and hand back the original word when
//! the routine fails, so a caller cannot distinguish "no rule fired"
//! from failure.

pub mod python;
pub mod runtime;
pub mod writer;

mod edge_cases;

pub use python::generate;
