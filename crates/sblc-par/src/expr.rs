//! Arithmetic expression parsing.
//!
//! Expressions appear after `$name OP`, `hop`, `loop`, `atleast`,
//! `tomark`, and `atmark`. Conventional precedence: unary minus binds
//! tightest, then `*` `/`, then `+` `-`.

use sblc_lex::Token;
use sblc_util::CompileError;

use crate::ast::{Expr, ExprKind};
use crate::Parser;

impl Parser {
    /// Parses an arithmetic expression.
    pub(crate) fn parse_ae(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_ae_term()?;
        loop {
            let make: fn(Box<Expr>, Box<Expr>) -> ExprKind = if self.check(&Token::Plus) {
                ExprKind::Add
            } else if self.check(&Token::Minus) {
                ExprKind::Sub
            } else {
                break;
            };
            self.advance();
            let right = self.parse_ae_term()?;
            let span = left.span;
            left = Expr {
                kind: make(Box::new(left), Box::new(right)),
                span,
            };
        }
        Ok(left)
    }

    fn parse_ae_term(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_ae_factor()?;
        loop {
            let make: fn(Box<Expr>, Box<Expr>) -> ExprKind = if self.check(&Token::Star) {
                ExprKind::Mul
            } else if self.check(&Token::Slash) {
                ExprKind::Div
            } else {
                break;
            };
            self.advance();
            let right = self.parse_ae_factor()?;
            let span = left.span;
            left = Expr {
                kind: make(Box::new(left), Box::new(right)),
                span,
            };
        }
        Ok(left)
    }

    fn parse_ae_factor(&mut self) -> Result<Expr, CompileError> {
        let span = self.current_span();
        let kind = match self.current().clone() {
            Token::Minus => {
                self.advance();
                ExprKind::Neg(Box::new(self.parse_ae_factor()?))
            }
            Token::Int(value) => {
                self.advance();
                ExprKind::Num(value)
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_ae()?;
                self.expect(&Token::RParen, "')'")?;
                return Ok(inner);
            }
            Token::Cursor => {
                self.advance();
                ExprKind::Cursor
            }
            Token::Limit => {
                self.advance();
                ExprKind::Limit
            }
            Token::Size | Token::Len => {
                self.advance();
                ExprKind::Size
            }
            Token::SizeOf | Token::LenOf => {
                self.advance();
                let (name, name_span) = self.expect_ident("a string variable after sizeof")?;
                ExprKind::SizeOf(name, name_span)
            }
            Token::MaxInt => {
                self.advance();
                ExprKind::MaxInt
            }
            Token::MinInt => {
                self.advance();
                ExprKind::MinInt
            }
            Token::Ident(name) => {
                self.advance();
                ExprKind::Name(name)
            }
            _ => return Err(self.error_here("an expression")),
        };
        Ok(Expr { kind, span })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sblc_lex::tokenize;

    fn parse_expr(source: &str) -> Expr {
        let mut parser = Parser::new(tokenize(source).unwrap());
        let expr = parser.parse_ae().expect("expression parse failed");
        assert!(parser.check(&Token::Eof), "trailing tokens");
        expr
    }

    #[test]
    fn test_precedence_mul_over_add() {
        let expr = parse_expr("1 + 2 * 3");
        match expr.kind {
            ExprKind::Add(left, right) => {
                assert!(matches!(left.kind, ExprKind::Num(1)));
                assert!(matches!(right.kind, ExprKind::Mul(..)));
            }
            other => panic!("expected add, got {:?}", other),
        }
    }

    #[test]
    fn test_left_associativity() {
        let expr = parse_expr("1 - 2 - 3");
        match expr.kind {
            ExprKind::Sub(left, _) => assert!(matches!(left.kind, ExprKind::Sub(..))),
            other => panic!("expected sub, got {:?}", other),
        }
    }

    #[test]
    fn test_parens_override() {
        let expr = parse_expr("(1 + 2) * 3");
        match expr.kind {
            ExprKind::Mul(left, _) => assert!(matches!(left.kind, ExprKind::Add(..))),
            other => panic!("expected mul, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_minus() {
        let expr = parse_expr("-x + 1");
        match expr.kind {
            ExprKind::Add(left, _) => assert!(matches!(left.kind, ExprKind::Neg(_))),
            other => panic!("expected add, got {:?}", other),
        }
    }

    #[test]
    fn test_nullary_keywords() {
        assert!(matches!(parse_expr("cursor").kind, ExprKind::Cursor));
        assert!(matches!(parse_expr("limit").kind, ExprKind::Limit));
        assert!(matches!(parse_expr("size").kind, ExprKind::Size));
        assert!(matches!(parse_expr("len").kind, ExprKind::Size));
        assert!(matches!(parse_expr("maxint").kind, ExprKind::MaxInt));
        assert!(matches!(parse_expr("minint").kind, ExprKind::MinInt));
    }

    #[test]
    fn test_sizeof_takes_a_name() {
        let expr = parse_expr("sizeof s");
        assert!(matches!(expr.kind, ExprKind::SizeOf(..)));
        let expr = parse_expr("lenof s");
        assert!(matches!(expr.kind, ExprKind::SizeOf(..)));
    }
}
