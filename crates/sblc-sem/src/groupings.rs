//! Grouping materialization.
//!
//! A grouping definition combines string literals and previously defined
//! groupings with `+` (union) and `-` (difference). Definitions are
//! evaluated in source order, so a grouping may only reference groupings
//! defined above it; the result is a concrete, sorted set of code points
//! handed to the code generator.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use sblc_par::{Decl, Program, SetItem, SetOp};
use sblc_util::{CompileError, Symbol};

use crate::table::{SymKind, SymbolTable};

/// Materializes every grouping to its character set.
///
/// Errors: definition of an undeclared or non-grouping name, duplicate
/// definitions, references to groupings not yet defined, and declared
/// groupings that never receive a definition.
pub fn materialize(
    program: &Program,
    table: &SymbolTable,
) -> Result<FxHashMap<Symbol, Vec<char>>, CompileError> {
    let mut sets: FxHashMap<Symbol, Vec<char>> = FxHashMap::default();

    for decl in &program.decls {
        let Decl::GroupingDef(def) = decl else {
            continue;
        };
        table.resolve_kind(def.name, def.span, SymKind::Grouping)?;
        if sets.contains_key(&def.name) {
            return Err(CompileError::name(
                format!("grouping '{}' is defined twice", def.name),
                def.span,
            ));
        }

        let mut set: BTreeSet<char> = BTreeSet::new();
        for (op, item) in &def.items {
            let chars: Vec<char> = match item {
                SetItem::Lit(text) => text.chars().collect(),
                SetItem::Name(name, span) => {
                    table.resolve_kind(*name, *span, SymKind::Grouping)?;
                    sets.get(name)
                        .ok_or_else(|| {
                            CompileError::name(
                                format!("grouping '{}' used before its definition", name),
                                *span,
                            )
                        })?
                        .clone()
                }
            };
            match op {
                SetOp::Union => set.extend(chars),
                SetOp::Diff => {
                    for c in chars {
                        set.remove(&c);
                    }
                }
            }
        }
        sets.insert(def.name, set.into_iter().collect());
    }

    for name in table.names_of_kind(SymKind::Grouping) {
        if !sets.contains_key(&name) {
            let span = table.get(name).map(|info| info.span).unwrap_or_default();
            return Err(CompileError::name(
                format!("grouping '{}' has no definition", name),
                span,
            ));
        }
    }

    Ok(sets)
}
