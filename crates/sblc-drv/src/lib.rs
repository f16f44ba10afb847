//! sblc-drv - Compiler driver.
//!
//! ============================================================================
//! PIPELINE ORCHESTRATION
//! ============================================================================
//!
//! The driver wires the phases together and is the only place that
//! touches the filesystem:
//!
//! ```text
//! Source (.sbl)
//!      |
//!      v
//! [sblc-lex]  -> tokens (escape expansion happens here)
//!      |
//!      v
//! [sblc-par]  -> AST
//!      |
//!      v
//! [sblc-sem]  -> Analysis (names, modes, groupings, amongs)
//!      |
//!      v
//! [sblc-gen]  -> Python module text
//! ```
//!
//! Each phase returns `Result` and the first error aborts the
//! translation; there is no recovery. The library surface is two
//! functions, [`translate_string`] and [`translate_file`]; the `sblc`
//! binary is a thin wrapper over them.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use sblc_par::Parser;
use sblc_util::CompileError;

/// A driver-level failure: a compile error or file I/O trouble.
#[derive(Debug, Error)]
pub enum Error {
    /// The source failed to translate.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A file could not be read or written.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Translates Snowball source text to a Python module.
///
/// # Example
///
/// ```
/// let source = "externals ( stem ) define stem as ( backwards ( ['ly'] delete ) )";
/// let python = sblc_drv::translate_string(source).unwrap();
/// assert!(python.contains("def stem(word):"));
/// ```
pub fn translate_string(source: &str) -> Result<String, CompileError> {
    let tokens = sblc_lex::tokenize(source)?;
    let program = Parser::new(tokens).parse()?;
    let analysis = sblc_sem::analyze(&program)?;
    Ok(sblc_gen::generate(&program, &analysis))
}

/// Reads a `.sbl` file and translates it to a Python module.
pub fn translate_file(path: &Path) -> Result<String, Error> {
    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;
    Ok(translate_string(&source)?)
}

/// Translates `input` and writes the module to `output`.
pub fn compile_to_file(input: &Path, output: &Path) -> Result<(), Error> {
    let python = translate_file(input)?;
    fs::write(output, python).map_err(|source| Error::Io {
        path: output.to_owned(),
        source,
    })
}
