//! Command expression parsing.
//!
//! Precedence, loosest to tightest: `or`, `and`, sequence, unary
//! prefixes, atoms. Unary prefixes take exactly one prefixed operand, so
//! `not 'e' R2` negates only the literal.

use sblc_lex::Token;
use sblc_util::CompileError;

use crate::ast::{AmongArm, AmongCmd, AmongKey, Cmd, CmdKind, IntOp, StringArg};
use crate::Parser;

impl Parser {
    /// Parses a full command expression (`or` level).
    pub(crate) fn parse_cmd(&mut self) -> Result<Cmd, CompileError> {
        let first = self.parse_conjunct()?;
        if !self.check(&Token::Or) {
            return Ok(first);
        }
        let span = first.span;
        let mut alts = vec![first];
        while self.eat(&Token::Or) {
            alts.push(self.parse_conjunct()?);
        }
        Ok(Cmd {
            kind: CmdKind::Or(alts),
            span,
        })
    }

    /// Parses the `and` level.
    fn parse_conjunct(&mut self) -> Result<Cmd, CompileError> {
        let first = self.parse_sequence()?;
        if !self.check(&Token::And) {
            return Ok(first);
        }
        let span = first.span;
        let mut parts = vec![first];
        while self.eat(&Token::And) {
            parts.push(self.parse_sequence()?);
        }
        Ok(Cmd {
            kind: CmdKind::And(parts),
            span,
        })
    }

    /// Parses juxtaposed commands.
    fn parse_sequence(&mut self) -> Result<Cmd, CompileError> {
        let first = self.parse_prefixed()?;
        if !starts_cmd(self.current()) {
            return Ok(first);
        }
        let span = first.span;
        let mut parts = vec![first];
        while starts_cmd(self.current()) {
            parts.push(self.parse_prefixed()?);
        }
        Ok(Cmd {
            kind: CmdKind::Seq(parts),
            span,
        })
    }

    /// Parses unary prefix commands and atoms.
    fn parse_prefixed(&mut self) -> Result<Cmd, CompileError> {
        let span = self.current_span();
        let kind = match self.current() {
            Token::Not => {
                self.advance();
                CmdKind::Not(Box::new(self.parse_prefixed()?))
            }
            Token::Test => {
                self.advance();
                CmdKind::Test(Box::new(self.parse_prefixed()?))
            }
            Token::Try => {
                self.advance();
                CmdKind::Try(Box::new(self.parse_prefixed()?))
            }
            Token::Do => {
                self.advance();
                CmdKind::Do(Box::new(self.parse_prefixed()?))
            }
            Token::Fail => {
                self.advance();
                CmdKind::Fail(Box::new(self.parse_prefixed()?))
            }
            Token::Goto => {
                self.advance();
                CmdKind::Goto(Box::new(self.parse_prefixed()?))
            }
            Token::Gopast => {
                self.advance();
                CmdKind::Gopast(Box::new(self.parse_prefixed()?))
            }
            Token::Repeat => {
                self.advance();
                CmdKind::Repeat(Box::new(self.parse_prefixed()?))
            }
            Token::Backwards => {
                self.advance();
                CmdKind::Backwards(Box::new(self.parse_prefixed()?))
            }
            Token::Reverse => {
                self.advance();
                CmdKind::Reverse(Box::new(self.parse_prefixed()?))
            }
            Token::Loop => {
                self.advance();
                let count = self.parse_ae()?;
                CmdKind::Loop(count, Box::new(self.parse_prefixed()?))
            }
            Token::Atleast => {
                self.advance();
                let count = self.parse_ae()?;
                CmdKind::Atleast(count, Box::new(self.parse_prefixed()?))
            }
            Token::SetLimit => {
                self.advance();
                let bound = Box::new(self.parse_prefixed()?);
                self.expect(&Token::For, "'for' in setlimit")?;
                CmdKind::SetLimit(bound, Box::new(self.parse_prefixed()?))
            }
            _ => return self.parse_atom(),
        };
        Ok(Cmd { kind, span })
    }

    /// Parses an atomic command.
    fn parse_atom(&mut self) -> Result<Cmd, CompileError> {
        let span = self.current_span();
        let kind = match self.current().clone() {
            Token::LParen => {
                self.advance();
                // An empty group is the always-succeeding command.
                if self.eat(&Token::RParen) {
                    CmdKind::True
                } else {
                    let inner = self.parse_cmd()?;
                    self.expect(&Token::RParen, "')'")?;
                    return Ok(inner);
                }
            }
            Token::Str(text) => {
                self.advance();
                CmdKind::Literal(text)
            }
            Token::Ident(name) => {
                self.advance();
                CmdKind::Name(name)
            }
            Token::LBracket => {
                self.advance();
                CmdKind::Bra
            }
            Token::RBracket => {
                self.advance();
                CmdKind::Ket
            }
            Token::LeftArrow => {
                self.advance();
                CmdKind::SliceFrom(self.parse_string_arg()?)
            }
            Token::RightArrow => {
                self.advance();
                let (name, name_span) = self.expect_ident("a string variable after '->'")?;
                CmdKind::SliceTo(name, name_span)
            }
            Token::InsertArrow => {
                self.advance();
                CmdKind::Insert(self.parse_string_arg()?)
            }
            Token::Insert => {
                self.advance();
                CmdKind::Insert(self.parse_string_arg()?)
            }
            Token::Attach => {
                self.advance();
                CmdKind::Attach(self.parse_string_arg()?)
            }
            Token::Delete => {
                self.advance();
                CmdKind::Delete
            }
            Token::Next => {
                self.advance();
                CmdKind::Next
            }
            Token::Hop => {
                self.advance();
                CmdKind::Hop(self.parse_ae()?)
            }
            Token::True => {
                self.advance();
                CmdKind::True
            }
            Token::False => {
                self.advance();
                CmdKind::False
            }
            Token::ToLimit => {
                self.advance();
                CmdKind::ToLimit
            }
            Token::AtLimit => {
                self.advance();
                CmdKind::AtLimit
            }
            Token::SetMark => {
                self.advance();
                let (name, name_span) = self.expect_ident("an integer name after setmark")?;
                CmdKind::SetMark(name, name_span)
            }
            Token::ToMark => {
                self.advance();
                CmdKind::ToMark(self.parse_ae()?)
            }
            Token::AtMark => {
                self.advance();
                CmdKind::AtMark(self.parse_ae()?)
            }
            Token::Set => {
                self.advance();
                let (name, name_span) = self.expect_ident("a boolean name after set")?;
                CmdKind::Set(name, name_span)
            }
            Token::Unset => {
                self.advance();
                let (name, name_span) = self.expect_ident("a boolean name after unset")?;
                CmdKind::Unset(name, name_span)
            }
            Token::Non => {
                self.advance();
                // Written non-G in practice; the '-' is optional noise.
                self.eat(&Token::Minus);
                let (name, name_span) = self.expect_ident("a grouping name after non")?;
                CmdKind::Non(name, name_span)
            }
            Token::Dollar => {
                self.advance();
                let (name, name_span) = self.expect_ident("a name after '$'")?;
                let op = match self.current() {
                    Token::Assign => Some(IntOp::Assign),
                    Token::PlusAssign => Some(IntOp::AddAssign),
                    Token::MinusAssign => Some(IntOp::SubAssign),
                    Token::StarAssign => Some(IntOp::MulAssign),
                    Token::SlashAssign => Some(IntOp::DivAssign),
                    Token::EqEq => Some(IntOp::Eq),
                    Token::Ne => Some(IntOp::Ne),
                    Token::Lt => Some(IntOp::Lt),
                    Token::Gt => Some(IntOp::Gt),
                    Token::Le => Some(IntOp::Le),
                    Token::Ge => Some(IntOp::Ge),
                    _ => None,
                };
                match op {
                    Some(op) => {
                        self.advance();
                        CmdKind::IntOp {
                            name,
                            name_span,
                            op,
                            expr: self.parse_ae()?,
                        }
                    }
                    None => CmdKind::StrCmd {
                        name,
                        name_span,
                        body: Box::new(self.parse_prefixed()?),
                    },
                }
            }
            Token::Substring => {
                self.advance();
                let id = self.substring_count;
                self.substring_count += 1;
                CmdKind::Substring { id }
            }
            Token::Among => {
                self.advance();
                return Ok(Cmd {
                    kind: CmdKind::Among(self.parse_among()?),
                    span,
                });
            }
            _ => return Err(self.error_here("a command")),
        };
        Ok(Cmd { kind, span })
    }

    /// Parses a literal or string-variable argument.
    fn parse_string_arg(&mut self) -> Result<StringArg, CompileError> {
        match self.current().clone() {
            Token::Str(text) => {
                self.advance();
                Ok(StringArg::Lit(text))
            }
            Token::Ident(name) => {
                let span = self.current_span();
                self.advance();
                Ok(StringArg::Var(name, span))
            }
            _ => Err(self.error_here("a string or string variable")),
        }
    }

    /// Parses `among ( ... )` after the keyword.
    ///
    /// Keys accumulate until a parenthesized action closes the arm;
    /// trailing keys with no action form a final arm of their own.
    fn parse_among(&mut self) -> Result<AmongCmd, CompileError> {
        let id = self.among_count;
        self.among_count += 1;

        self.expect(&Token::LParen, "'(' after among")?;
        let mut arms = Vec::new();
        let mut keys: Vec<AmongKey> = Vec::new();
        loop {
            match self.current().clone() {
                Token::Str(text) => {
                    let span = self.current_span();
                    self.advance();
                    let routine = match *self.current() {
                        Token::Ident(name) => {
                            let routine_span = self.current_span();
                            self.advance();
                            Some((name, routine_span))
                        }
                        _ => None,
                    };
                    keys.push(AmongKey {
                        text,
                        routine,
                        span,
                    });
                }
                Token::LParen => {
                    if keys.is_empty() {
                        return Err(self.error_here("a string before the among action"));
                    }
                    self.advance();
                    let action = if self.eat(&Token::RParen) {
                        Cmd {
                            kind: CmdKind::True,
                            span: self.current_span(),
                        }
                    } else {
                        let action = self.parse_cmd()?;
                        self.expect(&Token::RParen, "')' closing the among action")?;
                        action
                    };
                    arms.push(AmongArm {
                        keys: std::mem::take(&mut keys),
                        action: Some(action),
                    });
                }
                Token::RParen => {
                    self.advance();
                    if !keys.is_empty() {
                        arms.push(AmongArm { keys, action: None });
                    }
                    break;
                }
                _ => return Err(self.error_here("a string, '(', or ')' in among")),
            }
        }
        if arms.is_empty() {
            return Err(CompileError::parse("empty among", self.current_span()));
        }
        Ok(AmongCmd { id, arms })
    }
}

/// True when `token` can begin a command (used to extend sequences).
fn starts_cmd(token: &Token) -> bool {
    matches!(
        token,
        Token::LParen
            | Token::LBracket
            | Token::RBracket
            | Token::Str(_)
            | Token::Ident(_)
            | Token::Dollar
            | Token::LeftArrow
            | Token::RightArrow
            | Token::InsertArrow
            | Token::Not
            | Token::Test
            | Token::Try
            | Token::Do
            | Token::Fail
            | Token::Goto
            | Token::Gopast
            | Token::Repeat
            | Token::Loop
            | Token::Atleast
            | Token::Hop
            | Token::Next
            | Token::SetMark
            | Token::ToMark
            | Token::AtMark
            | Token::ToLimit
            | Token::AtLimit
            | Token::SetLimit
            | Token::Insert
            | Token::Attach
            | Token::Delete
            | Token::Set
            | Token::Unset
            | Token::Non
            | Token::True
            | Token::False
            | Token::Backwards
            | Token::Reverse
            | Token::Among
            | Token::Substring
    )
}
