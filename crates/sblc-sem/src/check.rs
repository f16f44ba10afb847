//! Command legality checks.
//!
//! One walk per routine body validates everything that does not depend on
//! direction:
//!
//! - every bare name resolves, with a kind usable in that position
//!   (`setmark` wants an integer, `set` a boolean, and so on);
//! - `]` only appears after `[`, and slice commands (`<-`, `->`,
//!   `delete`) only run with an established bra/ket pair on every path;
//! - `substring` is followed by an `among` in the same routine body, and
//!   no two `substring`s share one.
//!
//! The bra/ket analysis is conservative across alternatives: after an
//! `or`, only marks established in every branch count as established.

use rustc_hash::FxHashMap;
use sblc_par::{AmongCmd, Cmd, CmdKind, Decl, Expr, ExprKind, Program, StringArg};
use sblc_util::{CompileError, Span, Symbol};

use crate::table::{SymKind, SymbolTable};

/// Abstract bra/ket state on one control path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Marks {
    bra: bool,
    ket: bool,
}

impl Marks {
    const NONE: Marks = Marks {
        bra: false,
        ket: false,
    };

    fn meet(self, other: Marks) -> Marks {
        Marks {
            bra: self.bra && other.bra,
            ket: self.ket && other.ket,
        }
    }
}

/// Runs the legality walk over every routine body.
///
/// Returns the substring-to-among pairing (substring id → among id).
pub fn check_program(
    program: &Program,
    table: &SymbolTable,
) -> Result<FxHashMap<usize, usize>, CompileError> {
    let mut checker = Checker {
        table,
        pairs: FxHashMap::default(),
        pending: None,
    };
    for decl in &program.decls {
        let Decl::RoutineDef(def) = decl else {
            continue;
        };
        checker.pending = None;
        checker.walk(&def.body, Marks::NONE)?;
        if let Some((_, span)) = checker.pending.take() {
            return Err(CompileError::mode(
                "substring without a following among",
                span,
            ));
        }
    }
    Ok(checker.pairs)
}

struct Checker<'a> {
    table: &'a SymbolTable,
    /// substring id → among id.
    pairs: FxHashMap<usize, usize>,
    /// An unconsumed substring, waiting for its among.
    pending: Option<(usize, Span)>,
}

impl<'a> Checker<'a> {
    fn walk(&mut self, cmd: &Cmd, state: Marks) -> Result<Marks, CompileError> {
        match &cmd.kind {
            CmdKind::Seq(parts) => {
                let mut state = state;
                for part in parts {
                    state = self.walk(part, state)?;
                }
                Ok(state)
            }
            CmdKind::Or(alts) | CmdKind::And(alts) => {
                let mut merged: Option<Marks> = None;
                for alt in alts {
                    let after = self.walk(alt, state)?;
                    merged = Some(match merged {
                        Some(m) => m.meet(after),
                        None => after,
                    });
                }
                Ok(merged.unwrap_or(state))
            }
            CmdKind::Not(inner) => {
                self.walk(inner, state)?;
                // not restores state whether or not the body matched.
                Ok(state)
            }
            CmdKind::Test(inner)
            | CmdKind::Try(inner)
            | CmdKind::Do(inner)
            | CmdKind::Fail(inner)
            | CmdKind::Repeat(inner)
            | CmdKind::Goto(inner)
            | CmdKind::Gopast(inner)
            | CmdKind::Backwards(inner)
            | CmdKind::Reverse(inner) => self.walk(inner, state),
            CmdKind::Loop(count, inner) | CmdKind::Atleast(count, inner) => {
                self.check_expr(count)?;
                self.walk(inner, state)
            }
            CmdKind::SetLimit(bound, inner) => {
                let state = self.walk(bound, state)?;
                self.walk(inner, state)
            }
            CmdKind::StrCmd {
                name,
                name_span,
                body,
            } => {
                self.table
                    .resolve_kind(*name, *name_span, SymKind::StringVar)?;
                // The body operates on the string variable with fresh marks.
                self.walk(body, Marks::NONE)?;
                Ok(state)
            }

            CmdKind::Bra => Ok(Marks {
                bra: true,
                ket: false,
            }),
            CmdKind::Ket => {
                if !state.bra {
                    return Err(CompileError::mode("']' without a preceding '['", cmd.span));
                }
                Ok(Marks {
                    bra: true,
                    ket: true,
                })
            }
            CmdKind::SliceFrom(arg) => {
                self.check_string_arg(arg)?;
                self.require_slice(state, cmd.span, "'<-'")?;
                Ok(state)
            }
            CmdKind::SliceTo(name, name_span) => {
                self.table
                    .resolve_kind(*name, *name_span, SymKind::StringVar)?;
                self.require_slice(state, cmd.span, "'->'")?;
                Ok(state)
            }
            CmdKind::Delete => {
                self.require_slice(state, cmd.span, "delete")?;
                Ok(state)
            }
            CmdKind::Insert(arg) | CmdKind::Attach(arg) => {
                self.check_string_arg(arg)?;
                Ok(state)
            }

            CmdKind::SetMark(name, name_span) => {
                self.table.resolve_kind(*name, *name_span, SymKind::Integer)?;
                Ok(state)
            }
            CmdKind::ToMark(expr) | CmdKind::AtMark(expr) | CmdKind::Hop(expr) => {
                self.check_expr(expr)?;
                Ok(state)
            }
            CmdKind::Set(name, name_span) | CmdKind::Unset(name, name_span) => {
                self.table.resolve_kind(*name, *name_span, SymKind::Boolean)?;
                Ok(state)
            }
            CmdKind::IntOp {
                name,
                name_span,
                expr,
                ..
            } => {
                self.table.resolve_kind(*name, *name_span, SymKind::Integer)?;
                self.check_expr(expr)?;
                Ok(state)
            }

            CmdKind::Name(name) => {
                let info = self.table.resolve(*name, cmd.span)?;
                match info.kind {
                    SymKind::Routine | SymKind::Grouping | SymKind::Boolean => Ok(state),
                    kind => Err(CompileError::name(
                        format!(
                            "'{}' is {}, which cannot be used as a command",
                            name,
                            kind.describe()
                        ),
                        cmd.span,
                    )),
                }
            }
            CmdKind::Non(name, name_span) => {
                self.table
                    .resolve_kind(*name, *name_span, SymKind::Grouping)?;
                Ok(state)
            }

            CmdKind::Substring { id } => {
                if self.pending.is_some() {
                    return Err(CompileError::mode(
                        "substring must be matched by an among before the next substring",
                        cmd.span,
                    ));
                }
                self.pending = Some((*id, cmd.span));
                Ok(state)
            }
            CmdKind::Among(among) => self.walk_among(among, state),

            CmdKind::Literal(_)
            | CmdKind::Next
            | CmdKind::True
            | CmdKind::False
            | CmdKind::ToLimit
            | CmdKind::AtLimit => Ok(state),
        }
    }

    fn walk_among(&mut self, among: &AmongCmd, state: Marks) -> Result<Marks, CompileError> {
        if let Some((substring_id, _)) = self.pending.take() {
            self.pairs.insert(substring_id, among.id);
        }
        let mut merged: Option<Marks> = None;
        for arm in &among.arms {
            for key in &arm.keys {
                if let Some((routine, span)) = key.routine {
                    self.table.resolve_kind(routine, span, SymKind::Routine)?;
                }
            }
            let after = match &arm.action {
                Some(action) => self.walk(action, state)?,
                None => state,
            };
            merged = Some(match merged {
                Some(m) => m.meet(after),
                None => after,
            });
        }
        Ok(merged.unwrap_or(state))
    }

    fn require_slice(&self, state: Marks, span: Span, what: &str) -> Result<(), CompileError> {
        if state.bra && state.ket {
            Ok(())
        } else {
            Err(CompileError::mode(
                format!("{} requires an established '[' ... ']' region", what),
                span,
            ))
        }
    }

    fn check_string_arg(&self, arg: &StringArg) -> Result<(), CompileError> {
        match arg {
            StringArg::Lit(_) => Ok(()),
            StringArg::Var(name, span) => {
                self.table.resolve_kind(*name, *span, SymKind::StringVar)?;
                Ok(())
            }
        }
    }

    fn check_expr(&self, expr: &Expr) -> Result<(), CompileError> {
        match &expr.kind {
            ExprKind::Name(name) => {
                self.table.resolve_kind(*name, expr.span, SymKind::Integer)?;
                Ok(())
            }
            ExprKind::SizeOf(name, span) => {
                self.table.resolve_kind(*name, *span, SymKind::StringVar)?;
                Ok(())
            }
            ExprKind::Neg(inner) => self.check_expr(inner),
            ExprKind::Add(a, b)
            | ExprKind::Sub(a, b)
            | ExprKind::Mul(a, b)
            | ExprKind::Div(a, b) => {
                self.check_expr(a)?;
                self.check_expr(b)
            }
            ExprKind::Num(_)
            | ExprKind::Cursor
            | ExprKind::Limit
            | ExprKind::Size
            | ExprKind::MaxInt
            | ExprKind::MinInt => Ok(()),
        }
    }
}

/// Convenience: routine names called from a command, including among
/// key guards. Used by the mode analysis.
pub(crate) fn collect_calls(cmd: &Cmd, table: &SymbolTable, out: &mut Vec<(Symbol, Span)>) {
    match &cmd.kind {
        CmdKind::Name(name) => {
            if let Some(info) = table.get(*name) {
                if info.kind == SymKind::Routine {
                    out.push((*name, cmd.span));
                }
            }
        }
        CmdKind::Among(among) => {
            for arm in &among.arms {
                for key in &arm.keys {
                    if let Some((routine, span)) = key.routine {
                        out.push((routine, span));
                    }
                }
                if let Some(action) = &arm.action {
                    collect_calls(action, table, out);
                }
            }
        }
        CmdKind::Seq(parts) | CmdKind::Or(parts) | CmdKind::And(parts) => {
            for part in parts {
                collect_calls(part, table, out);
            }
        }
        CmdKind::Not(inner)
        | CmdKind::Test(inner)
        | CmdKind::Try(inner)
        | CmdKind::Do(inner)
        | CmdKind::Fail(inner)
        | CmdKind::Repeat(inner)
        | CmdKind::Goto(inner)
        | CmdKind::Gopast(inner)
        | CmdKind::Backwards(inner)
        | CmdKind::Reverse(inner)
        | CmdKind::Loop(_, inner)
        | CmdKind::Atleast(_, inner) => collect_calls(inner, table, out),
        CmdKind::SetLimit(bound, inner) => {
            collect_calls(bound, table, out);
            collect_calls(inner, table, out);
        }
        CmdKind::StrCmd { body, .. } => collect_calls(body, table, out),
        _ => {}
    }
}
