//! sblc-lex - Lexical analyzer for the Snowball language.
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! The lexer transforms Snowball source text into a stream of tokens. It is
//! a hand-written, direct-coded scanner: each token class has a dedicated
//! lexer function, dispatched on the first character.
//!
//! Beyond ordinary tokenization, the Snowball lexer owns two sublanguages
//! that never reach the parser:
//!
//! 1. STRING ESCAPES. The `stringescapes XY` directive nominates two
//!    delimiter characters (`{` and `}` by default). Inside a string
//!    literal, `{name}` splices in the value bound by a prior
//!    `stringdef name hex '...'`. Expansion happens here, inline, so every
//!    later stage sees plain Unicode strings.
//!
//! 2. DIRECTIVES. `stringescapes` and `stringdef` are consumed by the
//!    lexer itself (they rebind its escape table mid-stream) and produce
//!    no tokens.
//!
//! Comments are `// ...` to end of line and non-nesting `/* ... */`.
//! Keywords are matched after identifier scanning against the fixed
//! reserved set in [`token::keyword_from_ident`].
//!
//! Errors (unterminated string or comment, invalid hex, unknown escape
//! name) are fatal and carry the line/column where scanning stopped.

pub mod cursor;
pub mod escape;
pub mod lexer;
pub mod token;

mod edge_cases;

pub use lexer::{tokenize, Lexer};
pub use token::Token;
