//! The `sblc` command-line driver.
//!
//! Usage: `sblc INPUT.sbl OUTPUT` (the word `compile` may precede the
//! arguments). Exit code 0 on success; any lex, parse, semantic, or I/O
//! failure prints a one-line diagnostic to stderr and exits 1.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Result};

const USAGE: &str = "\
usage: sblc [compile] INPUT.sbl OUTPUT

Translates a Snowball program to a Python module. Every routine listed
in the source's `externals` section becomes a function in the output
that maps a word to its stemmed form.

options:
    -h, --help    print this message and exit
";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {}", error);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print!("{}", USAGE);
        return Ok(ExitCode::SUCCESS);
    }

    // Allow `sblc compile in.sbl out` as well as `sblc in.sbl out`.
    if args.first().map(String::as_str) == Some("compile") {
        args.remove(0);
    }

    let [input, output] = args.as_slice() else {
        bail!("expected INPUT and OUTPUT arguments (try --help)");
    };

    sblc_drv::compile_to_file(Path::new(input), Path::new(output))?;
    Ok(ExitCode::SUCCESS)
}
