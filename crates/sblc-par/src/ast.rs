//! AST node definitions for Snowball programs.
//!
//! The parser produces exactly what the grammar says; name kinds (is
//! `foo` a routine, a grouping, a boolean?) are not known here. Bare
//! names parse as [`CmdKind::Name`] and are classified by the semantic
//! analyzer.

use sblc_util::{Span, Symbol};

/// A parsed compilation unit: the declarations in source order.
#[derive(Debug, Clone)]
pub struct Program {
    /// Top-level declarations in source order.
    pub decls: Vec<Decl>,
    /// Number of `among` commands in the program (ids are `0..count`).
    pub among_count: usize,
    /// Number of `substring` commands in the program.
    pub substring_count: usize,
}

/// A top-level declaration.
#[derive(Debug, Clone)]
pub enum Decl {
    /// A header section: `routines ( ... )`, `integers ( ... )`, etc.
    Names {
        kind: DeclKind,
        names: Vec<(Symbol, Span)>,
    },

    /// `define NAME as COMMAND`
    RoutineDef(RoutineDef),

    /// `define NAME <charset expression>`
    GroupingDef(GroupingDef),
}

/// Which header section a name list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Strings,
    Integers,
    Booleans,
    Routines,
    Externals,
    Groupings,
}

/// A routine definition.
#[derive(Debug, Clone)]
pub struct RoutineDef {
    pub name: Symbol,
    pub span: Span,
    /// True when the definition appeared inside `backwardmode ( ... )`.
    pub backward: bool,
    pub body: Cmd,
}

/// A grouping definition: literals and earlier groupings combined with
/// `+` (union) and `-` (difference).
#[derive(Debug, Clone)]
pub struct GroupingDef {
    pub name: Symbol,
    pub span: Span,
    /// The first item carries [`SetOp::Union`].
    pub items: Vec<(SetOp, SetItem)>,
}

/// Union or difference in a grouping definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    Union,
    Diff,
}

/// One operand of a grouping definition.
#[derive(Debug, Clone)]
pub enum SetItem {
    /// A string literal contributing its characters.
    Lit(String),
    /// A previously defined grouping.
    Name(Symbol, Span),
}

/// A literal or string-variable argument to `<-`, `insert`, or `attach`.
#[derive(Debug, Clone)]
pub enum StringArg {
    Lit(String),
    Var(Symbol, Span),
}

/// A command with its source location.
#[derive(Debug, Clone)]
pub struct Cmd {
    pub kind: CmdKind,
    pub span: Span,
}

/// The command forms of the language.
#[derive(Debug, Clone)]
pub enum CmdKind {
    /// Juxtaposition: every command must succeed in order.
    Seq(Vec<Cmd>),
    /// `C1 or C2 or ...`: first success wins, state restored between.
    Or(Vec<Cmd>),
    /// `C1 and C2 and ...`: all from the same start position.
    And(Vec<Cmd>),

    /// `not C`
    Not(Box<Cmd>),
    /// `test C`
    Test(Box<Cmd>),
    /// `try C`
    Try(Box<Cmd>),
    /// `do C`
    Do(Box<Cmd>),
    /// `fail C`
    Fail(Box<Cmd>),
    /// `goto C`
    Goto(Box<Cmd>),
    /// `gopast C`
    Gopast(Box<Cmd>),
    /// `repeat C`
    Repeat(Box<Cmd>),
    /// `loop AE C`
    Loop(Expr, Box<Cmd>),
    /// `atleast AE C`
    Atleast(Expr, Box<Cmd>),
    /// `backwards C`
    Backwards(Box<Cmd>),
    /// `reverse C`
    Reverse(Box<Cmd>),
    /// `setlimit C1 for C2`
    SetLimit(Box<Cmd>, Box<Cmd>),

    /// `next`
    Next,
    /// `hop AE`
    Hop(Expr),
    /// `true`
    True,
    /// `false`
    False,

    /// `[` - left slice mark
    Bra,
    /// `]` - right slice mark
    Ket,
    /// `<- S`
    SliceFrom(StringArg),
    /// `-> s`
    SliceTo(Symbol, Span),
    /// `delete`
    Delete,
    /// `insert S` (also `<+ S`)
    Insert(StringArg),
    /// `attach S`
    Attach(StringArg),

    /// `setmark i`
    SetMark(Symbol, Span),
    /// `tomark AE`
    ToMark(Expr),
    /// `atmark AE`
    AtMark(Expr),
    /// `tolimit`
    ToLimit,
    /// `atlimit`
    AtLimit,

    /// `set b`
    Set(Symbol, Span),
    /// `unset b`
    Unset(Symbol, Span),

    /// `$i OP AE`
    IntOp {
        name: Symbol,
        name_span: Span,
        op: IntOp,
        expr: Expr,
    },
    /// `$s C` - run a command over a string variable
    StrCmd {
        name: Symbol,
        name_span: Span,
        body: Box<Cmd>,
    },

    /// A string literal match.
    Literal(String),
    /// A bare name: routine call, grouping match, or boolean test.
    Name(Symbol),
    /// `non [-] G` - complement grouping match.
    Non(Symbol, Span),

    /// `substring` - the matching half of a split among.
    Substring {
        /// Program-wide substring index, assigned by the parser.
        id: usize,
    },
    /// `among ( ... )`
    Among(AmongCmd),
}

/// Integer-slot operations and comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl IntOp {
    /// True for `==`, `!=`, `<`, `>`, `<=`, `>=`.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            IntOp::Eq | IntOp::Ne | IntOp::Lt | IntOp::Gt | IntOp::Le | IntOp::Ge
        )
    }
}

/// An `among` command.
#[derive(Debug, Clone)]
pub struct AmongCmd {
    /// Program-wide among index, assigned by the parser.
    pub id: usize,
    pub arms: Vec<AmongArm>,
}

/// A run of keys sharing one optional action.
#[derive(Debug, Clone)]
pub struct AmongArm {
    pub keys: Vec<AmongKey>,
    pub action: Option<Cmd>,
}

/// One key of an among: a literal, optionally guarded by a routine.
#[derive(Debug, Clone)]
pub struct AmongKey {
    pub text: String,
    pub routine: Option<(Symbol, Span)>,
    pub span: Span,
}

/// An arithmetic expression with its source location.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Arithmetic expression forms.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Integer literal.
    Num(i32),
    /// Declared integer slot.
    Name(Symbol),
    /// Current cursor position.
    Cursor,
    /// Current forward limit.
    Limit,
    /// Length of the current string (`size` / `len`).
    Size,
    /// Length of a string variable (`sizeof` / `lenof`).
    SizeOf(Symbol, Span),
    /// Largest representable integer.
    MaxInt,
    /// Smallest representable integer.
    MinInt,
    /// Unary negation.
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
}
