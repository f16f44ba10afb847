//! sblc-sem - Semantic analysis for the Snowball compiler.
//!
//! ============================================================================
//! RESPONSIBILITIES
//! ============================================================================
//!
//! The analyzer sits between the parser and the code generator and
//! establishes every contract the generator relies on:
//!
//! 1. NAME RESOLUTION. One symbol table spans all header sections;
//!    duplicates and undeclared uses are rejected, and every use site is
//!    checked against its declared kind ([`check`]).
//!
//! 2. DEFINITIONS. Every declared routine has exactly one `define ... as`
//!    body; every declared grouping has exactly one definition,
//!    materialized to a concrete character set ([`groupings`]).
//!
//! 3. DIRECTION. Each routine body is classified forward or backward;
//!    calls propagate direction, `backwardmode` pins it, and a routine
//!    reached both ways is split into two forms only when it contains
//!    direction-sensitive commands ([`modes`]).
//!
//! 4. AMONG COMPILATION. Key lists become duplicate-checked dispatch
//!    tables in longest-match order, reversed-trie style for backward
//!    amongs, and `substring` commands are paired with their `among`
//!    ([`among`], [`check`]).
//!
//! The result of all four is an [`Analysis`], which together with the AST
//! is everything code generation needs.

pub mod among;
pub mod check;
pub mod groupings;
pub mod modes;
pub mod table;

mod edge_cases;

pub use among::{AmongEntry, AmongInfo};
pub use modes::{Mode, RoutineInfo};
pub use table::{SymKind, SymbolInfo, SymbolTable};

use rustc_hash::FxHashMap;
use sblc_par::{Cmd, Decl, Program};
use sblc_util::{CompileError, Span, Symbol};

/// Everything the code generator needs beyond the AST itself.
#[derive(Debug)]
pub struct Analysis {
    /// The program-wide symbol table.
    pub table: SymbolTable,
    /// Materialized grouping character sets, sorted.
    pub groupings: FxHashMap<Symbol, Vec<char>>,
    /// Per-routine direction facts.
    pub routines: FxHashMap<Symbol, RoutineInfo>,
    /// Compiled amongs, indexed by among id.
    pub amongs: Vec<AmongInfo>,
    /// substring id → the among it pairs with.
    pub substring_among: FxHashMap<usize, usize>,
    /// External routine names in declaration order.
    pub externals: Vec<Symbol>,
}

impl Analysis {
    /// True when the among with this id has a paired `substring`.
    pub fn among_paired(&self, among_id: usize) -> bool {
        self.substring_among.values().any(|&id| id == among_id)
    }
}

/// A routine definition found in the program.
pub(crate) struct DefRef<'a> {
    pub backward: bool,
    pub body: &'a Cmd,
}

/// All routine definitions, keyed by name.
pub(crate) struct Defs<'a> {
    map: FxHashMap<Symbol, DefRef<'a>>,
}

impl<'a> Defs<'a> {
    pub(crate) fn get(&self, name: Symbol) -> Option<&DefRef<'a>> {
        self.map.get(&name)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Symbol, &DefRef<'a>)> {
        self.map.iter()
    }
}

/// Collects routine definitions and validates them against the table.
fn collect_defs<'a>(
    program: &'a Program,
    table: &SymbolTable,
) -> Result<Defs<'a>, CompileError> {
    let mut map: FxHashMap<Symbol, DefRef<'a>> = FxHashMap::default();
    for decl in &program.decls {
        let Decl::RoutineDef(def) = decl else {
            continue;
        };
        table.resolve_kind(def.name, def.span, SymKind::Routine)?;
        if map.contains_key(&def.name) {
            return Err(CompileError::name(
                format!("routine '{}' is defined twice", def.name),
                def.span,
            ));
        }
        map.insert(
            def.name,
            DefRef {
                backward: def.backward,
                body: &def.body,
            },
        );
    }
    for name in table.names_of_kind(SymKind::Routine) {
        if !map.contains_key(&name) {
            let span = table.get(name).map(|info| info.span).unwrap_or_default();
            return Err(CompileError::name(
                format!("routine '{}' has no definition", name),
                span,
            ));
        }
    }
    Ok(Defs { map })
}

/// Runs the whole semantic analysis.
///
/// # Example
///
/// ```
/// use sblc_lex::tokenize;
/// use sblc_par::Parser;
///
/// let source = "externals ( stem ) define stem as ( backwards ( ['ly'] delete ) )";
/// let program = Parser::new(tokenize(source).unwrap()).parse().unwrap();
/// let analysis = sblc_sem::analyze(&program).unwrap();
/// assert_eq!(analysis.externals.len(), 1);
/// ```
pub fn analyze(program: &Program) -> Result<Analysis, CompileError> {
    let table = SymbolTable::build(program)?;
    let groupings = groupings::materialize(program, &table)?;
    let defs = collect_defs(program, &table)?;
    let substring_among = check::check_program(program, &table)?;
    let (routines, among_uses) = modes::analyze_modes(&table, &defs, program.among_count)?;
    let amongs = among::compile_amongs(program, &among_uses)?;

    let mut externals = Vec::new();
    for (name, info) in table.iter() {
        if info.kind == SymKind::Routine && info.external {
            externals.push(name);
        }
    }
    if externals.is_empty() {
        return Err(CompileError::name(
            "program declares no externals; nothing to generate",
            Span::DUMMY,
        ));
    }

    Ok(Analysis {
        table,
        groupings,
        routines,
        amongs,
        substring_among,
        externals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sblc_lex::tokenize;
    use sblc_par::Parser;

    fn analyze_str(source: &str) -> Result<Analysis, CompileError> {
        let program = Parser::new(tokenize(source).unwrap()).parse().unwrap();
        analyze(&program)
    }

    #[test]
    fn test_minimal_program_analyzes() {
        let analysis = analyze_str(
            "externals ( stem ) define stem as ( backwards ( ['ly'] delete ) )",
        )
        .unwrap();
        assert_eq!(analysis.externals[0].as_str(), "stem");
        let stem = &analysis.routines[&Symbol::intern("stem")];
        assert!(stem.sensitive);
        assert_eq!(stem.forms(), (true, false));
    }

    #[test]
    fn test_backwardmode_routines_are_backward() {
        let analysis = analyze_str(
            "routines ( R1 ) externals ( stem ) integers ( p1 ) \
             backwardmode ( define R1 as $p1 <= cursor ) \
             define stem as ( backwards R1 )",
        )
        .unwrap();
        let r1 = &analysis.routines[&Symbol::intern("R1")];
        assert!(r1.backward_def);
        assert_eq!(r1.forms(), (false, true));
    }

    #[test]
    fn test_insensitive_routine_gets_single_form() {
        // R1 only compares integers; called backward but emitted once.
        let analysis = analyze_str(
            "routines ( R1 ) externals ( stem ) integers ( p1 ) \
             define R1 as $p1 <= cursor \
             define stem as ( backwards R1 )",
        )
        .unwrap();
        let r1 = &analysis.routines[&Symbol::intern("R1")];
        assert!(!r1.sensitive);
        assert_eq!(r1.forms(), (true, false));
    }

    #[test]
    fn test_sensitive_routine_called_both_ways_gets_two_forms() {
        let analysis = analyze_str(
            "routines ( eat ) externals ( stem ) \
             define eat as ( 'a' ) \
             define stem as ( eat backwards eat )",
        )
        .unwrap();
        let eat = &analysis.routines[&Symbol::intern("eat")];
        assert!(eat.sensitive);
        assert_eq!(eat.forms(), (true, true));
    }

    #[test]
    fn test_sensitivity_propagates_through_calls() {
        let analysis = analyze_str(
            "routines ( inner outer ) externals ( stem ) \
             define inner as ( next ) \
             define outer as inner \
             define stem as outer",
        )
        .unwrap();
        assert!(analysis.routines[&Symbol::intern("outer")].sensitive);
    }

    #[test]
    fn test_backward_routine_called_forward_is_mode_error() {
        let err = analyze_str(
            "routines ( R1 ) externals ( stem ) \
             backwardmode ( define R1 as next ) \
             define stem as R1",
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::Mode(_)));
        assert!(err.diagnostic().message.contains("backwardmode"));
    }

    #[test]
    fn test_substring_pairs_with_following_among() {
        let analysis = analyze_str(
            "externals ( stem ) \
             define stem as ( substring among ( 'er' (delete) ) )",
        )
        .unwrap();
        assert_eq!(analysis.substring_among[&0], 0);
        assert!(analysis.among_paired(0));
    }

    #[test]
    fn test_undeclared_name_in_body() {
        let err = analyze_str("externals ( stem ) define stem as ( ghost )").unwrap_err();
        assert!(matches!(err, CompileError::Name(_)));
        assert!(err.diagnostic().message.contains("undeclared"));
    }

    #[test]
    fn test_routine_without_definition() {
        let err = analyze_str("routines ( lost ) externals ( stem ) define stem as next")
            .unwrap_err();
        assert!(err.diagnostic().message.contains("no definition"));
    }

    #[test]
    fn test_no_externals_rejected() {
        let err = analyze_str("routines ( r ) define r as next").unwrap_err();
        assert!(err.diagnostic().message.contains("externals"));
    }

    #[test]
    fn test_mutual_recursion_is_handled() {
        // The sensitivity fixpoint and mode worklist must terminate on
        // cyclic call graphs.
        let analysis = analyze_str(
            "routines ( a b ) externals ( stem ) \
             define a as ( try b ) \
             define b as ( try a next ) \
             define stem as a",
        )
        .unwrap();
        assert!(analysis.routines[&Symbol::intern("a")].sensitive);
        assert!(analysis.routines[&Symbol::intern("b")].sensitive);
    }
}
