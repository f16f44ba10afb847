//! Lowering from the analyzed AST to Python source.
//!
//! Every routine form becomes one Python function over the shared
//! execution state `e`, composing through the success flag `r`: a command
//! is emitted under the assumption that control reaches it with `r`
//! true, and it leaves `r` holding its own outcome. Sequences chain with
//! `if r:` blocks; the backtracking combinators snapshot the state and
//! restore it on their failing paths.
//!
//! Direction is static: the generator knows the mode of the code it is
//! emitting and picks the forward or backward primitive (`eq_s` vs
//! `eq_s_b`), so the generated module never tests a direction flag at
//! run time. Cursor save/restore across a successful `do`, `test`, or
//! `and` uses an absolute position in forward code and a
//! distance-from-the-end in backward code, which stays valid across
//! buffer edits.

use sblc_par::{
    AmongCmd, Cmd, CmdKind, Decl, Expr, ExprKind, IntOp, Program, RoutineDef, StringArg,
};
use sblc_sem::{Analysis, Mode, SymKind};
use sblc_util::Symbol;

use crate::runtime::PRELUDE;
use crate::writer::{py_str, Writer};

/// Generates the complete Python module for an analyzed program.
pub fn generate(program: &Program, analysis: &Analysis) -> String {
    let mut generator = Generator {
        program,
        analysis,
        w: Writer::new(),
        var_id: 0,
    };
    generator.emit_module();
    generator.w.finish()
}

struct Generator<'a> {
    program: &'a Program,
    analysis: &'a Analysis,
    w: Writer,
    /// Per-function counter for snapshot variables.
    var_id: usize,
}

impl<'a> Generator<'a> {
    fn emit_module(&mut self) {
        self.w.line("# -*- coding: utf-8 -*-");
        self.w
            .line("# Generated by sblc, the Snowball-to-Python compiler. Do not edit.");
        self.w.blank();
        self.w.raw(PRELUDE);
        self.w.blank();

        self.emit_groupings();
        self.emit_env_ctor();
        self.emit_routines();
        self.emit_among_tables();
        self.emit_externals();
    }

    // =========================================================================
    // Static tables and constructors
    // =========================================================================

    fn emit_groupings(&mut self) {
        let mut names: Vec<Symbol> = self.analysis.groupings.keys().copied().collect();
        names.sort_by_key(|name| name.as_str());
        for name in names {
            let chars: String = self.analysis.groupings[&name].iter().collect();
            self.w
                .line(&format!("_g_{} = frozenset({})", name, py_str(&chars)));
        }
        if !self.analysis.groupings.is_empty() {
            self.w.blank();
        }
    }

    /// The execution-state constructor, keyed to the declared slots.
    fn emit_env_ctor(&mut self) {
        self.w.line("def _new_env(value):");
        self.w.indent();
        self.w.line("e = _Env(value)");
        for name in self.analysis.table.names_of_kind(SymKind::Integer) {
            self.w.line(&format!("e.i_{} = 0", name));
        }
        for name in self.analysis.table.names_of_kind(SymKind::Boolean) {
            self.w.line(&format!("e.b_{} = False", name));
        }
        for name in self.analysis.table.names_of_kind(SymKind::StringVar) {
            self.w.line(&format!("e.s_{} = []", name));
        }
        self.w.line("return e");
        self.w.dedent();
        self.w.blank();
    }

    fn emit_among_tables(&mut self) {
        for (id, info) in self.analysis.amongs.iter().enumerate() {
            if info.used_forward {
                self.emit_among_table(id, Mode::Forward);
            }
            if info.used_backward {
                self.emit_among_table(id, Mode::Backward);
            }
        }
    }

    fn emit_among_table(&mut self, id: usize, mode: Mode) {
        let name = self.among_table_name(id, mode);
        self.w.line(&format!("{} = (", name));
        self.w.indent();
        let entries = self.analysis.amongs[id].entries.clone();
        for entry in &entries {
            let guard = match entry.routine {
                Some(routine) => self.routine_ref(routine, mode),
                None => "None".to_owned(),
            };
            self.w.line(&format!(
                "({}, {}, {}),",
                py_str(&entry.key),
                entry.arm + 1,
                guard
            ));
        }
        self.w.dedent();
        self.w.line(")");
        self.w.blank();
    }

    /// Table name for an among in a given direction. An among reached in
    /// both directions gets two tables (the guard references differ).
    fn among_table_name(&self, id: usize, mode: Mode) -> String {
        let info = &self.analysis.amongs[id];
        if mode == Mode::Backward && info.used_forward && info.used_backward {
            format!("_a_b_{}", id)
        } else {
            format!("_a_{}", id)
        }
    }

    // =========================================================================
    // Routines
    // =========================================================================

    fn emit_routines(&mut self) {
        for decl in &self.program.decls {
            let Decl::RoutineDef(def) = decl else {
                continue;
            };
            let info = &self.analysis.routines[&def.name];
            let (forward, backward) = info.forms();
            if forward {
                self.emit_routine(def, Mode::Forward);
            }
            if backward {
                self.emit_routine(def, Mode::Backward);
            }
        }
    }

    fn emit_routine(&mut self, def: &RoutineDef, mode: Mode) {
        self.var_id = 0;
        self.w
            .line(&format!("def {}(e):", form_name(def.name, mode)));
        self.w.indent();
        self.w.line("r = True");

        // Substring results must exist before their paired among reads
        // them, whatever path control takes.
        let mut substrings = Vec::new();
        collect_substrings(&def.body, &mut substrings);
        for substring_id in substrings {
            if let Some(&among_id) = self.analysis.substring_among.get(&substring_id) {
                self.w.line(&format!("a_{} = 0", among_id));
            }
        }

        self.emit_cmd(&def.body, mode);
        self.w.line("return r");
        self.w.dedent();
        self.w.blank();
    }

    // =========================================================================
    // Commands
    // =========================================================================

    fn emit_cmd(&mut self, cmd: &Cmd, mode: Mode) {
        match &cmd.kind {
            CmdKind::Seq(parts) => {
                let mut opened = 0;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        self.w.line("if r:");
                        self.w.indent();
                        opened += 1;
                    }
                    self.emit_cmd(part, mode);
                }
                for _ in 0..opened {
                    self.w.dedent();
                }
            }

            CmdKind::Or(alts) => {
                let v = self.fresh_var();
                self.w.line(&format!("{} = e.snapshot()", v));
                let mut opened = 0;
                for (i, alt) in alts.iter().enumerate() {
                    if i > 0 {
                        self.w.line("if not r:");
                        self.w.indent();
                        opened += 1;
                        self.w.line(&format!("e.restore({})", v));
                    }
                    self.emit_cmd(alt, mode);
                }
                for _ in 0..opened {
                    self.w.dedent();
                }
            }

            CmdKind::And(parts) => {
                let v = self.fresh_var();
                self.w.line(&format!("{} = {}", v, cursor_save(mode)));
                let mut opened = 0;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        self.w.line("if r:");
                        self.w.indent();
                        opened += 1;
                        self.w.line(&cursor_restore(&v, mode));
                    }
                    self.emit_cmd(part, mode);
                }
                for _ in 0..opened {
                    self.w.dedent();
                }
            }

            CmdKind::Not(inner) => {
                let v = self.fresh_var();
                self.w.line(&format!("{} = e.snapshot()", v));
                self.emit_cmd(inner, mode);
                self.w.line(&format!("e.restore({})", v));
                self.w.line("r = not r");
            }

            CmdKind::Test(inner) => {
                let v = self.fresh_var();
                self.w.line(&format!("{} = e.snapshot()", v));
                self.emit_cmd(inner, mode);
                self.w.line("if r:");
                self.w.indent();
                self.w.line(&snapshot_cursor_restore(&v, mode));
                self.w.dedent();
                self.w.line("else:");
                self.w.indent();
                self.w.line(&format!("e.restore({})", v));
                self.w.dedent();
            }

            CmdKind::Try(inner) => {
                let v = self.fresh_var();
                self.w.line(&format!("{} = e.snapshot()", v));
                self.emit_cmd(inner, mode);
                self.w.line("if not r:");
                self.w.indent();
                self.w.line(&format!("e.restore({})", v));
                self.w.line("r = True");
                self.w.dedent();
            }

            CmdKind::Do(inner) => {
                let v = self.fresh_var();
                self.w.line(&format!("{} = e.snapshot()", v));
                self.emit_cmd(inner, mode);
                self.w.line("if not r:");
                self.w.indent();
                self.w.line(&format!("e.restore({})", v));
                self.w.dedent();
                self.w.line(&snapshot_cursor_restore(&v, mode));
                self.w.line("r = True");
            }

            CmdKind::Fail(inner) => {
                self.emit_cmd(inner, mode);
                self.w.line("r = False");
            }

            CmdKind::Repeat(inner) => {
                self.w.line("while True:");
                self.w.indent();
                let v = self.fresh_var();
                self.w.line(&format!("{} = e.snapshot()", v));
                self.emit_cmd(inner, mode);
                self.w.line("if not r:");
                self.w.indent();
                self.w.line(&format!("e.restore({})", v));
                self.w.line("break");
                self.w.dedent();
                self.w.dedent();
                self.w.line("r = True");
            }

            CmdKind::Loop(count, inner) => {
                self.emit_loop(count, inner, mode);
            }

            CmdKind::Atleast(count, inner) => {
                self.emit_loop(count, inner, mode);
                self.w.line("if r:");
                self.w.indent();
                self.emit_cmd(
                    &Cmd {
                        kind: CmdKind::Repeat(inner.clone()),
                        span: cmd.span,
                    },
                    mode,
                );
                self.w.dedent();
            }

            CmdKind::Goto(inner) => self.emit_scan(inner, mode, true),
            CmdKind::Gopast(inner) => self.emit_scan(inner, mode, false),

            CmdKind::Backwards(inner) => {
                if mode == Mode::Backward {
                    // Nesting is flat: backwards inside backward mode is a
                    // direction no-op.
                    self.emit_cmd(inner, mode);
                } else {
                    self.emit_direction_flip(inner);
                }
            }
            CmdKind::Reverse(inner) => {
                // The analyzer rejects reverse in backward mode, so this
                // is always a forward-to-backward flip.
                self.emit_direction_flip(inner);
            }

            CmdKind::SetLimit(bound, inner) => {
                let v1 = self.fresh_var();
                self.w.line(&format!("{} = {}", v1, cursor_save(mode)));
                self.emit_cmd(bound, mode);
                self.w.line("if r:");
                self.w.indent();
                let v2 = self.fresh_var();
                match mode {
                    Mode::Forward => {
                        // The outer limit is kept as a distance from the
                        // buffer end so edits inside the window survive.
                        self.w
                            .line(&format!("{} = len(e.chars) - e.limit", v2));
                        self.w.line("e.limit = e.cursor");
                        self.w.line(&cursor_restore(&v1, mode));
                        self.emit_cmd(inner, mode);
                        self.w
                            .line(&format!("e.limit = len(e.chars) - {}", v2));
                    }
                    Mode::Backward => {
                        self.w.line(&format!("{} = e.limit_backward", v2));
                        self.w.line("e.limit_backward = e.cursor");
                        self.w.line(&cursor_restore(&v1, mode));
                        self.emit_cmd(inner, mode);
                        self.w.line(&format!("e.limit_backward = {}", v2));
                    }
                }
                self.w.dedent();
            }

            CmdKind::Next => self.w.line(&format!("r = e.{}(1)", hop_fn(mode))),
            CmdKind::Hop(count) => {
                let count = self.emit_ae(count);
                self.w
                    .line(&format!("r = e.{}({})", hop_fn(mode), count));
            }
            CmdKind::True => self.w.line("pass"),
            CmdKind::False => self.w.line("r = False"),

            CmdKind::Bra => match mode {
                Mode::Forward => self.w.line("e.bra = e.cursor"),
                Mode::Backward => self.w.line("e.ket = e.cursor"),
            },
            CmdKind::Ket => match mode {
                Mode::Forward => self.w.line("e.ket = e.cursor"),
                Mode::Backward => self.w.line("e.bra = e.cursor"),
            },
            CmdKind::SliceFrom(arg) => {
                let arg = self.string_arg(arg);
                self.w.line(&format!("e.slice_from({})", arg));
            }
            CmdKind::SliceTo(name, _) => {
                self.w.line(&format!("e.s_{} = e.slice_to()", name));
            }
            CmdKind::Delete => self.w.line("e.slice_from('')"),
            CmdKind::Insert(arg) => {
                let arg = self.string_arg(arg);
                match mode {
                    Mode::Forward => self.w.line(&format!("e.insert({})", arg)),
                    Mode::Backward => self.w.line(&format!("e.insert_b({})", arg)),
                }
            }
            CmdKind::Attach(arg) => {
                let arg = self.string_arg(arg);
                match mode {
                    Mode::Forward => self.w.line(&format!("e.attach({})", arg)),
                    Mode::Backward => self.w.line(&format!("e.attach_b({})", arg)),
                }
            }

            CmdKind::SetMark(name, _) => self.w.line(&format!("e.i_{} = e.cursor", name)),
            CmdKind::ToMark(expr) => {
                let expr = self.emit_ae(expr);
                let fn_name = match mode {
                    Mode::Forward => "to_mark",
                    Mode::Backward => "to_mark_b",
                };
                self.w.line(&format!("r = e.{}({})", fn_name, expr));
            }
            CmdKind::AtMark(expr) => {
                let expr = self.emit_ae(expr);
                self.w.line(&format!("r = e.cursor == {}", expr));
            }
            CmdKind::ToLimit => match mode {
                Mode::Forward => self.w.line("e.cursor = e.limit"),
                Mode::Backward => self.w.line("e.cursor = e.limit_backward"),
            },
            CmdKind::AtLimit => match mode {
                Mode::Forward => self.w.line("r = e.cursor == e.limit"),
                Mode::Backward => self.w.line("r = e.cursor == e.limit_backward"),
            },

            CmdKind::Set(name, _) => self.w.line(&format!("e.b_{} = True", name)),
            CmdKind::Unset(name, _) => self.w.line(&format!("e.b_{} = False", name)),

            CmdKind::IntOp { name, op, expr, .. } => {
                let expr = self.emit_ae(expr);
                let slot = format!("e.i_{}", name);
                let stmt = match op {
                    IntOp::Assign => format!("{} = {}", slot, expr),
                    IntOp::AddAssign => format!("{} += {}", slot, expr),
                    IntOp::SubAssign => format!("{} -= {}", slot, expr),
                    IntOp::MulAssign => format!("{} *= {}", slot, expr),
                    IntOp::DivAssign => format!("{0} = int({0} / ({1}))", slot, expr),
                    IntOp::Eq => format!("r = {} == {}", slot, expr),
                    IntOp::Ne => format!("r = {} != {}", slot, expr),
                    IntOp::Lt => format!("r = {} < {}", slot, expr),
                    IntOp::Gt => format!("r = {} > {}", slot, expr),
                    IntOp::Le => format!("r = {} <= {}", slot, expr),
                    IntOp::Ge => format!("r = {} >= {}", slot, expr),
                };
                self.w.line(&stmt);
            }

            CmdKind::StrCmd { name, body, .. } => {
                let v = self.fresh_var();
                self.w.line(&format!(
                    "{} = (e.chars, e.cursor, e.limit, e.limit_backward, e.bra, e.ket)",
                    v
                ));
                self.w.line(&format!("e.chars = e.s_{}", name));
                self.w.line("e.cursor = 0");
                self.w.line("e.limit = len(e.chars)");
                self.w.line("e.limit_backward = 0");
                self.w.line("e.bra = 0");
                self.w.line("e.ket = 0");
                self.emit_cmd(body, mode);
                self.w.line(&format!("e.s_{} = e.chars", name));
                self.w.line(&format!(
                    "(e.chars, e.cursor, e.limit, e.limit_backward, e.bra, e.ket) = {}",
                    v
                ));
            }

            CmdKind::Literal(text) => {
                let fn_name = match mode {
                    Mode::Forward => "eq_s",
                    Mode::Backward => "eq_s_b",
                };
                self.w
                    .line(&format!("r = e.{}({})", fn_name, py_str(text)));
            }

            CmdKind::Name(name) => {
                let info = self
                    .analysis
                    .table
                    .get(*name)
                    .expect("analysis resolved every name");
                match info.kind {
                    SymKind::Routine => {
                        let target = self.routine_ref(*name, mode);
                        self.w.line(&format!("r = {}(e)", target));
                    }
                    SymKind::Grouping => {
                        let fn_name = match mode {
                            Mode::Forward => "in_grouping",
                            Mode::Backward => "in_grouping_b",
                        };
                        self.w
                            .line(&format!("r = e.{}(_g_{})", fn_name, name));
                    }
                    SymKind::Boolean => self.w.line(&format!("r = e.b_{}", name)),
                    _ => unreachable!("checker rejects other kinds in command position"),
                }
            }

            CmdKind::Non(name, _) => {
                let fn_name = match mode {
                    Mode::Forward => "out_grouping",
                    Mode::Backward => "out_grouping_b",
                };
                self.w.line(&format!("r = e.{}(_g_{})", fn_name, name));
            }

            CmdKind::Substring { id } => {
                let among_id = self.analysis.substring_among[id];
                let table = self.among_table_name(among_id, mode);
                self.w.line(&format!(
                    "a_{} = e.{}({})",
                    among_id,
                    find_among_fn(mode),
                    table
                ));
                self.w.line(&format!("r = a_{} != 0", among_id));
            }

            CmdKind::Among(among) => self.emit_among(among, mode),
        }
    }

    fn emit_loop(&mut self, count: &Expr, inner: &Cmd, mode: Mode) {
        let v = self.fresh_var();
        self.w.line(&format!("{} = e.snapshot()", v));
        let count = self.emit_ae(count);
        self.w.line(&format!("for _ in range({}):", count));
        self.w.indent();
        self.emit_cmd(inner, mode);
        self.w.line("if not r:");
        self.w.indent();
        self.w.line("break");
        self.w.dedent();
        self.w.dedent();
        self.w.line("if not r:");
        self.w.indent();
        self.w.line(&format!("e.restore({})", v));
        self.w.dedent();
    }

    /// goto / gopast: scan for a position where the body matches.
    fn emit_scan(&mut self, inner: &Cmd, mode: Mode, stop_before: bool) {
        self.w.line("while True:");
        self.w.indent();
        let v = self.fresh_var();
        self.w.line(&format!("{} = e.snapshot()", v));
        self.emit_cmd(inner, mode);
        self.w.line("if r:");
        self.w.indent();
        if stop_before {
            self.w.line(&snapshot_cursor_restore(&v, mode));
        }
        self.w.line("break");
        self.w.dedent();
        self.w.line(&format!("e.restore({})", v));
        match mode {
            Mode::Forward => {
                self.w.line("if e.cursor >= e.limit:");
                self.w.indent();
                self.w.line("r = False");
                self.w.line("break");
                self.w.dedent();
                self.w.line("e.cursor += 1");
            }
            Mode::Backward => {
                self.w.line("if e.cursor <= e.limit_backward:");
                self.w.indent();
                self.w.line("r = False");
                self.w.line("break");
                self.w.dedent();
                self.w.line("e.cursor -= 1");
            }
        }
        self.w.dedent();
    }

    /// `backwards C` / `reverse C` entered from forward code.
    ///
    /// The entry cursor sits at or left of the backward window, so it is
    /// stable across edits and can be restored as an absolute position.
    fn emit_direction_flip(&mut self, inner: &Cmd) {
        let v1 = self.fresh_var();
        let v2 = self.fresh_var();
        self.w.line(&format!("{} = e.limit_backward", v1));
        self.w.line(&format!("{} = e.cursor", v2));
        self.w.line("e.limit_backward = e.cursor");
        self.w.line("e.cursor = e.limit");
        self.emit_cmd(inner, Mode::Backward);
        self.w.line(&format!("e.cursor = {}", v2));
        self.w.line(&format!("e.limit_backward = {}", v1));
    }

    fn emit_among(&mut self, among: &AmongCmd, mode: Mode) {
        let paired = self.analysis.among_paired(among.id);
        if !paired {
            let table = self.among_table_name(among.id, mode);
            self.w.line(&format!(
                "a_{} = e.{}({})",
                among.id,
                find_among_fn(mode),
                table
            ));
        }
        self.w.line(&format!("r = a_{} != 0", among.id));

        let has_actions = among.arms.iter().any(|arm| arm.action.is_some());
        if !has_actions {
            return;
        }
        self.w.line("if r:");
        self.w.indent();
        let mut first = true;
        for (arm_index, arm) in among.arms.iter().enumerate() {
            let Some(action) = &arm.action else {
                continue;
            };
            let keyword = if first { "if" } else { "elif" };
            self.w.line(&format!(
                "{} a_{} == {}:",
                keyword, among.id, arm_index + 1
            ));
            self.w.indent();
            self.emit_cmd(action, mode);
            self.w.dedent();
            first = false;
        }
        self.w.dedent();
    }

    // =========================================================================
    // Externals
    // =========================================================================

    fn emit_externals(&mut self) {
        for &name in &self.analysis.externals {
            let info = &self.analysis.routines[&name];
            let mode = if info.backward_def {
                Mode::Backward
            } else {
                Mode::Forward
            };
            self.w.line(&format!("def {}(word):", name));
            self.w.indent();
            self.w.line("e = _new_env(word.lower())");
            if info.backward_def {
                self.w.line("e.cursor = e.limit");
            }
            self.w
                .line(&format!("if {}(e):", self.routine_ref(name, mode)));
            self.w.indent();
            self.w.line("return ''.join(e.chars)");
            self.w.dedent();
            self.w.line("return word");
            self.w.dedent();
            self.w.blank();
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn fresh_var(&mut self) -> String {
        self.var_id += 1;
        format!("v{}", self.var_id)
    }

    fn string_arg(&self, arg: &StringArg) -> String {
        match arg {
            StringArg::Lit(text) => py_str(text),
            StringArg::Var(name, _) => format!("e.s_{}", name),
        }
    }

    fn routine_ref(&self, name: Symbol, mode: Mode) -> String {
        let info = &self.analysis.routines[&name];
        let (forward, backward) = info.forms();
        if mode == Mode::Backward && backward {
            form_name(name, Mode::Backward)
        } else if forward {
            form_name(name, Mode::Forward)
        } else {
            form_name(name, Mode::Backward)
        }
    }

    fn emit_ae(&self, expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Num(value) => value.to_string(),
            ExprKind::Name(name) => format!("e.i_{}", name),
            ExprKind::Cursor => "e.cursor".to_owned(),
            ExprKind::Limit => "e.limit".to_owned(),
            ExprKind::Size => "len(e.chars)".to_owned(),
            ExprKind::SizeOf(name, _) => format!("len(e.s_{})", name),
            ExprKind::MaxInt => "2147483647".to_owned(),
            ExprKind::MinInt => "-2147483648".to_owned(),
            ExprKind::Neg(inner) => format!("-({})", self.emit_ae(inner)),
            ExprKind::Add(a, b) => format!("({} + {})", self.emit_ae(a), self.emit_ae(b)),
            ExprKind::Sub(a, b) => format!("({} - {})", self.emit_ae(a), self.emit_ae(b)),
            ExprKind::Mul(a, b) => format!("({} * {})", self.emit_ae(a), self.emit_ae(b)),
            ExprKind::Div(a, b) => {
                // Snowball division truncates toward zero; Python's //
                // floors, so go through float truncation.
                format!("int({} / {})", self.emit_ae(a), self.emit_ae(b))
            }
        }
    }
}

/// Mangled Python name of a routine form.
fn form_name(name: Symbol, mode: Mode) -> String {
    match mode {
        Mode::Forward => format!("_r_f_{}", name),
        Mode::Backward => format!("_r_b_{}", name),
    }
}

fn hop_fn(mode: Mode) -> &'static str {
    match mode {
        Mode::Forward => "hop",
        Mode::Backward => "hop_b",
    }
}

fn find_among_fn(mode: Mode) -> &'static str {
    match mode {
        Mode::Forward => "find_among",
        Mode::Backward => "find_among_b",
    }
}

/// Expression that captures the cursor for a later restore.
fn cursor_save(mode: Mode) -> &'static str {
    match mode {
        Mode::Forward => "e.cursor",
        Mode::Backward => "len(e.chars) - e.cursor",
    }
}

/// Statement restoring a cursor captured by [`cursor_save`].
fn cursor_restore(var: &str, mode: Mode) -> String {
    match mode {
        Mode::Forward => format!("e.cursor = {}", var),
        Mode::Backward => format!("e.cursor = len(e.chars) - {}", var),
    }
}

/// Statement restoring only the cursor component of a full snapshot.
///
/// Backward code measures from the buffer end so the position survives
/// length changes made by the body.
fn snapshot_cursor_restore(var: &str, mode: Mode) -> String {
    match mode {
        Mode::Forward => format!("e.cursor = {}[0]", var),
        Mode::Backward => format!("e.cursor = len(e.chars) - (len({0}[5]) - {0}[0])", var),
    }
}

/// Substring ids appearing in a routine body, in source order.
fn collect_substrings(cmd: &Cmd, out: &mut Vec<usize>) {
    match &cmd.kind {
        CmdKind::Substring { id } => out.push(*id),
        CmdKind::Seq(parts) | CmdKind::Or(parts) | CmdKind::And(parts) => {
            for part in parts {
                collect_substrings(part, out);
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
        | CmdKind::Atleast(_, inner)
        | CmdKind::StrCmd { body: inner, .. } => collect_substrings(inner, out),
        CmdKind::SetLimit(bound, inner) => {
            collect_substrings(bound, out);
            collect_substrings(inner, out);
        }
        CmdKind::Among(among) => {
            for arm in &among.arms {
                if let Some(action) = &arm.action {
                    collect_substrings(action, out);
                }
            }
        }
        _ => {}
    }
}
