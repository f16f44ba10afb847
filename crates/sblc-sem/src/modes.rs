//! Direction (mode) analysis.
//!
//! Routine bodies run forward by default. A definition inside
//! `backwardmode ( ... )` runs backward, and `backwards C` switches the
//! lexical context of `C` to backward (a no-op when already backward -
//! nesting is flat). Calls propagate the caller's direction to callees
//! not pinned by `backwardmode`.
//!
//! The analysis answers three questions for the code generator:
//!
//! 1. In which directions is each routine reached? A routine reached in
//!    both directions is emitted twice only when it (transitively)
//!    contains direction-sensitive commands; `define R1 as $p1 <= cursor`
//!    reads the same either way and gets a single form.
//! 2. Which direction does each `among` run in (its dispatch table and
//!    guard references depend on it)?
//! 3. Mode errors: a `backwardmode` routine called from forward context,
//!    and `reverse` inside backward context.

use rustc_hash::{FxHashMap, FxHashSet};
use sblc_par::{Cmd, CmdKind};
use sblc_util::{CompileError, Symbol};

use crate::check::collect_calls;
use crate::table::{SymKind, SymbolTable};
use crate::Defs;

/// Execution direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Forward,
    Backward,
}

/// Per-routine facts computed by the mode analysis.
#[derive(Clone, Copy, Debug)]
pub struct RoutineInfo {
    /// Defined inside `backwardmode ( ... )`.
    pub backward_def: bool,
    /// Reached (or seeded) in forward direction.
    pub called_forward: bool,
    /// Reached (or seeded) in backward direction.
    pub called_backward: bool,
    /// Contains direction-sensitive commands, directly or through calls.
    pub sensitive: bool,
}

impl RoutineInfo {
    /// Which function forms the code generator emits: `(forward, backward)`.
    ///
    /// Insensitive routines collapse to a single forward form that is
    /// valid in either direction.
    pub fn forms(&self) -> (bool, bool) {
        if self.backward_def {
            return (false, true);
        }
        if !self.sensitive {
            return (true, false);
        }
        (self.called_forward, self.called_backward)
    }
}

/// Directions in which each `among` is reached, indexed by among id.
#[derive(Clone, Copy, Debug, Default)]
pub struct AmongUse {
    pub forward: bool,
    pub backward: bool,
}

/// Runs the mode analysis over every routine.
pub(crate) fn analyze_modes(
    table: &SymbolTable,
    defs: &Defs<'_>,
    among_count: usize,
) -> Result<(FxHashMap<Symbol, RoutineInfo>, Vec<AmongUse>), CompileError> {
    // Pass 1: direct sensitivity and the call graph.
    let mut sensitive: FxHashMap<Symbol, bool> = FxHashMap::default();
    let mut calls: FxHashMap<Symbol, Vec<Symbol>> = FxHashMap::default();
    for (&name, def) in defs.iter() {
        sensitive.insert(name, direct_sensitive(def.body, table));
        let mut callees = Vec::new();
        collect_calls(def.body, table, &mut callees);
        calls.insert(name, callees.into_iter().map(|(sym, _)| sym).collect());
    }

    // Pass 2: sensitivity reaches through calls (fixpoint; the call graph
    // may be cyclic).
    loop {
        let mut changed = false;
        for (&name, callees) in &calls {
            if sensitive[&name] {
                continue;
            }
            if callees.iter().any(|callee| sensitive.get(callee) == Some(&true)) {
                sensitive.insert(name, true);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    // Pass 3: direction propagation. Every routine is seeded in its
    // definition direction; calls add the caller's direction.
    let mut walker = ModeWalker {
        table,
        defs,
        among_uses: vec![AmongUse::default(); among_count],
        visited: FxHashSet::default(),
        worklist: Vec::new(),
    };
    for (&name, def) in defs.iter() {
        let mode = if def.backward {
            Mode::Backward
        } else {
            Mode::Forward
        };
        walker.enqueue(name, mode);
    }
    while let Some((name, mode)) = walker.worklist.pop() {
        let body = walker.defs.get(name).expect("queued routine has a body").body;
        walker.walk(body, mode)?;
    }

    let mut routines = FxHashMap::default();
    for (&name, def) in defs.iter() {
        routines.insert(
            name,
            RoutineInfo {
                backward_def: def.backward,
                called_forward: walker.visited.contains(&(name, Mode::Forward)),
                called_backward: walker.visited.contains(&(name, Mode::Backward)),
                sensitive: sensitive[&name],
            },
        );
    }
    Ok((routines, walker.among_uses))
}

struct ModeWalker<'a> {
    table: &'a SymbolTable,
    defs: &'a Defs<'a>,
    among_uses: Vec<AmongUse>,
    visited: FxHashSet<(Symbol, Mode)>,
    worklist: Vec<(Symbol, Mode)>,
}

impl<'a> ModeWalker<'a> {
    fn enqueue(&mut self, name: Symbol, mode: Mode) {
        if self.visited.insert((name, mode)) {
            self.worklist.push((name, mode));
        }
    }

    fn call(&mut self, name: Symbol, span: sblc_util::Span, mode: Mode) -> Result<(), CompileError> {
        let Some(def) = self.defs.get(name) else {
            return Ok(()); // undefined routines are reported elsewhere
        };
        if def.backward && mode == Mode::Forward {
            return Err(CompileError::mode(
                format!(
                    "routine '{}' is defined in backwardmode but called in forward mode",
                    name
                ),
                span,
            ));
        }
        let effective = if def.backward { Mode::Backward } else { mode };
        self.enqueue(name, effective);
        Ok(())
    }

    fn walk(&mut self, cmd: &Cmd, mode: Mode) -> Result<(), CompileError> {
        match &cmd.kind {
            CmdKind::Seq(parts) | CmdKind::Or(parts) | CmdKind::And(parts) => {
                for part in parts {
                    self.walk(part, mode)?;
                }
                Ok(())
            }
            CmdKind::Not(inner)
            | CmdKind::Test(inner)
            | CmdKind::Try(inner)
            | CmdKind::Do(inner)
            | CmdKind::Fail(inner)
            | CmdKind::Repeat(inner)
            | CmdKind::Goto(inner)
            | CmdKind::Gopast(inner)
            | CmdKind::Loop(_, inner)
            | CmdKind::Atleast(_, inner)
            | CmdKind::StrCmd { body: inner, .. } => self.walk(inner, mode),
            CmdKind::SetLimit(bound, inner) => {
                self.walk(bound, mode)?;
                self.walk(inner, mode)
            }
            CmdKind::Backwards(inner) => self.walk(inner, Mode::Backward),
            CmdKind::Reverse(inner) => {
                if mode == Mode::Backward {
                    return Err(CompileError::mode(
                        "reverse is not allowed in backward mode",
                        cmd.span,
                    ));
                }
                self.walk(inner, Mode::Backward)
            }
            CmdKind::Name(name) => {
                if let Some(info) = self.table.get(*name) {
                    if info.kind == SymKind::Routine {
                        return self.call(*name, cmd.span, mode);
                    }
                }
                Ok(())
            }
            CmdKind::Among(among) => {
                let uses = &mut self.among_uses[among.id];
                match mode {
                    Mode::Forward => uses.forward = true,
                    Mode::Backward => uses.backward = true,
                }
                for arm in &among.arms {
                    for key in &arm.keys {
                        if let Some((routine, span)) = key.routine {
                            self.call(routine, span, mode)?;
                        }
                    }
                    if let Some(action) = &arm.action {
                        self.walk(action, mode)?;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// True when the command's own emission depends on direction.
///
/// Calls are not considered here; sensitivity through calls is closed
/// over the call graph by the fixpoint in [`analyze_modes`].
fn direct_sensitive(cmd: &Cmd, table: &SymbolTable) -> bool {
    match &cmd.kind {
        CmdKind::Literal(_)
        | CmdKind::Non(..)
        | CmdKind::Next
        | CmdKind::Hop(_)
        | CmdKind::Goto(_)
        | CmdKind::Gopast(_)
        | CmdKind::ToMark(_)
        | CmdKind::AtMark(_)
        | CmdKind::ToLimit
        | CmdKind::AtLimit
        | CmdKind::SetLimit(..)
        | CmdKind::Bra
        | CmdKind::Ket
        | CmdKind::SliceFrom(_)
        | CmdKind::SliceTo(..)
        | CmdKind::Delete
        | CmdKind::Insert(_)
        | CmdKind::Attach(_)
        | CmdKind::Substring { .. }
        | CmdKind::Among(_)
        | CmdKind::Backwards(_)
        | CmdKind::Reverse(_)
        | CmdKind::StrCmd { .. } => true,

        CmdKind::Name(name) => {
            matches!(table.get(*name), Some(info) if info.kind == SymKind::Grouping)
        }

        CmdKind::Seq(parts) | CmdKind::Or(parts) | CmdKind::And(parts) => {
            parts.iter().any(|part| direct_sensitive(part, table))
        }
        CmdKind::Not(inner)
        | CmdKind::Test(inner)
        | CmdKind::Try(inner)
        | CmdKind::Do(inner)
        | CmdKind::Fail(inner)
        | CmdKind::Repeat(inner)
        | CmdKind::Loop(_, inner)
        | CmdKind::Atleast(_, inner) => direct_sensitive(inner, table),

        CmdKind::True
        | CmdKind::False
        | CmdKind::SetMark(..)
        | CmdKind::Set(..)
        | CmdKind::Unset(..)
        | CmdKind::IntOp { .. } => false,
    }
}
