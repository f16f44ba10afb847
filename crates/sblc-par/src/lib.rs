//! sblc-par - Parser (syntactic analyzer) for the Snowball language.
//!
//! ============================================================================
//! GRAMMAR
//! ============================================================================
//!
//! A program is a sequence of top-level declarations:
//!
//! ```ebnf
//! program      = { declaration } ;
//!
//! declaration  = "routines"  name-list
//!              | "externals" name-list
//!              | "integers"  name-list
//!              | "booleans"  name-list
//!              | "strings"   name-list
//!              | "groupings" name-list
//!              | "define" name "as" command          (* routine body *)
//!              | "define" name charset-expr          (* grouping *)
//!              | "backwardmode" "(" { declaration } ")" ;
//!
//! name-list    = "(" { name } ")" ;
//!
//! charset-expr = charset-item { ("+" | "-") charset-item } ;
//! charset-item = string | name ;
//! ```
//!
//! Command expressions form the second half of the grammar. Precedence,
//! loosest to tightest: `or`, `and`, juxtaposition (sequence), unary
//! prefixes, atoms. Note that sequence binds tightest of the three
//! combinators, so `A B or C D` groups as `(A B) or (C D)`.
//!
//! ```ebnf
//! command   = conjunct { "or" conjunct } ;
//! conjunct  = sequence { "and" sequence } ;
//! sequence  = prefixed { prefixed } ;
//! prefixed  = ("not" | "test" | "try" | "do" | "fail" | "goto"
//!              | "gopast" | "repeat" | "backwards" | "reverse") prefixed
//!           | ("loop" | "atleast") ae prefixed
//!           | "setlimit" prefixed "for" prefixed
//!           | atom ;
//! ```
//!
//! The parser is a hand-written recursive descent over the token stream;
//! each non-terminal has a corresponding method. The first syntax error
//! aborts with a `ParseError{line, col, expected, got}`-style diagnostic.

pub mod ast;

mod cmd;
mod edge_cases;
mod expr;

pub use ast::*;

use sblc_lex::Token;
use sblc_util::{CompileError, Span, Symbol};

/// Recursive-descent parser over a token stream.
///
/// # Example
///
/// ```
/// use sblc_lex::tokenize;
/// use sblc_par::Parser;
///
/// let tokens = tokenize("externals ( stem ) define stem as ( delete )").unwrap();
/// let program = Parser::new(tokens).parse().unwrap();
/// assert_eq!(program.decls.len(), 2);
/// ```
pub struct Parser {
    /// Token stream from the lexer, ending with [`Token::Eof`].
    tokens: Vec<(Token, Span)>,

    /// Current position in the token stream.
    position: usize,

    /// Running count of `among` commands, used to assign ids.
    pub(crate) among_count: usize,

    /// Running count of `substring` commands, used to assign ids.
    pub(crate) substring_count: usize,
}

impl Parser {
    /// Creates a parser for the given token stream.
    pub fn new(tokens: Vec<(Token, Span)>) -> Self {
        Self {
            tokens,
            position: 0,
            among_count: 0,
            substring_count: 0,
        }
    }

    /// Parses a whole program.
    pub fn parse(mut self) -> Result<Program, CompileError> {
        let mut decls = Vec::new();
        while !self.check(&Token::Eof) {
            self.parse_decl(&mut decls, false)?;
        }
        Ok(Program {
            decls,
            among_count: self.among_count,
            substring_count: self.substring_count,
        })
    }

    /// Parses one declaration into `decls`.
    ///
    /// `backward` is true inside a `backwardmode ( ... )` block and is
    /// recorded on every routine definition encountered there.
    fn parse_decl(&mut self, decls: &mut Vec<Decl>, backward: bool) -> Result<(), CompileError> {
        let kind = match self.current() {
            Token::Routines => Some(DeclKind::Routines),
            Token::Externals => Some(DeclKind::Externals),
            Token::Integers => Some(DeclKind::Integers),
            Token::Booleans => Some(DeclKind::Booleans),
            Token::Strings => Some(DeclKind::Strings),
            Token::Groupings => Some(DeclKind::Groupings),
            _ => None,
        };
        if let Some(kind) = kind {
            self.advance();
            let names = self.parse_name_list()?;
            decls.push(Decl::Names { kind, names });
            return Ok(());
        }

        match self.current() {
            Token::Define => {
                self.advance();
                let (name, span) = self.expect_ident("a name after define")?;
                if self.eat(&Token::As) {
                    let body = self.parse_cmd()?;
                    decls.push(Decl::RoutineDef(RoutineDef {
                        name,
                        span,
                        backward,
                        body,
                    }));
                } else {
                    let items = self.parse_charset_expr()?;
                    decls.push(Decl::GroupingDef(GroupingDef { name, span, items }));
                }
                Ok(())
            }
            Token::BackwardMode => {
                self.advance();
                self.expect(&Token::LParen, "'(' after backwardmode")?;
                while !self.check(&Token::RParen) {
                    if self.check(&Token::Eof) {
                        return Err(self.error_here("')' closing backwardmode"));
                    }
                    self.parse_decl(decls, true)?;
                }
                self.advance(); // ')'
                Ok(())
            }
            _ => Err(self.error_here("a declaration")),
        }
    }

    /// Parses `( name name ... )`.
    fn parse_name_list(&mut self) -> Result<Vec<(Symbol, Span)>, CompileError> {
        self.expect(&Token::LParen, "'('")?;
        let mut names = Vec::new();
        while !self.eat(&Token::RParen) {
            if self.check(&Token::Eof) {
                return Err(self.error_here("')' closing the name list"));
            }
            names.push(self.expect_ident("a name")?);
        }
        Ok(names)
    }

    /// Parses the right-hand side of a grouping definition.
    fn parse_charset_expr(&mut self) -> Result<Vec<(SetOp, SetItem)>, CompileError> {
        let mut items = vec![(SetOp::Union, self.parse_charset_item()?)];
        loop {
            let op = if self.eat(&Token::Plus) {
                SetOp::Union
            } else if self.eat(&Token::Minus) {
                SetOp::Diff
            } else {
                break;
            };
            items.push((op, self.parse_charset_item()?));
        }
        Ok(items)
    }

    fn parse_charset_item(&mut self) -> Result<SetItem, CompileError> {
        match self.current().clone() {
            Token::Str(text) => {
                self.advance();
                Ok(SetItem::Lit(text))
            }
            Token::Ident(name) => {
                let span = self.current_span();
                self.advance();
                Ok(SetItem::Name(name, span))
            }
            _ => Err(self.error_here("a string or grouping name")),
        }
    }

    // =========================================================================
    // Token-stream plumbing
    // =========================================================================

    /// The token at the current position.
    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.position].0
    }

    /// The span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.tokens[self.position].1
    }

    /// Moves past the current token. Saturates at Eof.
    pub(crate) fn advance(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
    }

    /// True when the current token equals `token`.
    pub(crate) fn check(&self, token: &Token) -> bool {
        self.current() == token
    }

    /// Consumes the current token if it equals `token`.
    pub(crate) fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Requires `token`, or fails with "expected ..., got ...".
    pub(crate) fn expect(&mut self, token: &Token, expected: &str) -> Result<(), CompileError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error_here(expected))
        }
    }

    /// Requires an identifier token.
    pub(crate) fn expect_ident(&mut self, expected: &str) -> Result<(Symbol, Span), CompileError> {
        match *self.current() {
            Token::Ident(name) => {
                let span = self.current_span();
                self.advance();
                Ok((name, span))
            }
            _ => Err(self.error_here(expected)),
        }
    }

    /// "expected X, got Y" at the current token.
    pub(crate) fn error_here(&self, expected: &str) -> CompileError {
        CompileError::parse(
            format!("expected {}, got {}", expected, describe(self.current())),
            self.current_span(),
        )
    }
}

/// Renders a token for error messages.
fn describe(token: &Token) -> String {
    match token {
        Token::Ident(name) => format!("identifier '{}'", name),
        Token::Int(value) => format!("number {}", value),
        Token::Str(text) => format!("string '{}'", text),
        Token::Eof => "end of input".to_owned(),
        Token::LParen => "'('".to_owned(),
        Token::RParen => "')'".to_owned(),
        Token::LBracket => "'['".to_owned(),
        Token::RBracket => "']'".to_owned(),
        Token::Dollar => "'$'".to_owned(),
        Token::Assign => "'='".to_owned(),
        Token::PlusAssign => "'+='".to_owned(),
        Token::MinusAssign => "'-='".to_owned(),
        Token::StarAssign => "'*='".to_owned(),
        Token::SlashAssign => "'/='".to_owned(),
        Token::EqEq => "'=='".to_owned(),
        Token::Ne => "'!='".to_owned(),
        Token::Lt => "'<'".to_owned(),
        Token::Gt => "'>'".to_owned(),
        Token::Le => "'<='".to_owned(),
        Token::Ge => "'>='".to_owned(),
        Token::Plus => "'+'".to_owned(),
        Token::Minus => "'-'".to_owned(),
        Token::Star => "'*'".to_owned(),
        Token::Slash => "'/'".to_owned(),
        Token::LeftArrow => "'<-'".to_owned(),
        Token::RightArrow => "'->'".to_owned(),
        Token::InsertArrow => "'<+'".to_owned(),
        other => format!("'{}'", keyword_text(other)),
    }
}

/// Text of a keyword token.
fn keyword_text(token: &Token) -> &'static str {
    match token {
        Token::Strings => "strings",
        Token::Integers => "integers",
        Token::Booleans => "booleans",
        Token::Routines => "routines",
        Token::Externals => "externals",
        Token::Groupings => "groupings",
        Token::Define => "define",
        Token::As => "as",
        Token::BackwardMode => "backwardmode",
        Token::Hex => "hex",
        Token::Decimal => "decimal",
        Token::Among => "among",
        Token::Substring => "substring",
        Token::Backwards => "backwards",
        Token::Reverse => "reverse",
        Token::And => "and",
        Token::Or => "or",
        Token::Not => "not",
        Token::Test => "test",
        Token::Try => "try",
        Token::Do => "do",
        Token::Fail => "fail",
        Token::Goto => "goto",
        Token::Gopast => "gopast",
        Token::Repeat => "repeat",
        Token::Loop => "loop",
        Token::Atleast => "atleast",
        Token::Hop => "hop",
        Token::Next => "next",
        Token::SetMark => "setmark",
        Token::ToMark => "tomark",
        Token::AtMark => "atmark",
        Token::ToLimit => "tolimit",
        Token::AtLimit => "atlimit",
        Token::SetLimit => "setlimit",
        Token::For => "for",
        Token::Insert => "insert",
        Token::Attach => "attach",
        Token::Delete => "delete",
        Token::Slice => "slice",
        Token::From => "from",
        Token::To => "to",
        Token::Set => "set",
        Token::Unset => "unset",
        Token::Non => "non",
        Token::True => "true",
        Token::False => "false",
        Token::MaxInt => "maxint",
        Token::MinInt => "minint",
        Token::Cursor => "cursor",
        Token::Limit => "limit",
        Token::Size => "size",
        Token::SizeOf => "sizeof",
        Token::Len => "len",
        Token::LenOf => "lenof",
        _ => "?",
    }
}
