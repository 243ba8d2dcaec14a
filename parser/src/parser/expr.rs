//! Expression parsing.
//!
//! Precedence, lowest first:
//! - Logical: or, and, not
//! - Comparison: ==, !=, <, <=, >, >= (chainable)
//! - Primary: literals, references, parenthesized expressions

use super::Parser;
use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::TokenKind;

impl Parser {
    /// Parse an expression.
    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_and()?;

        while self.check(&TokenKind::Or) {
            self.advance();
            let right = self.parse_and()?;
            let span = left.span().to(right.span());
            left = Expr::BinaryOp(BinaryOp::Or, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_not()?;

        while self.check(&TokenKind::And) {
            self.advance();
            let right = self.parse_not()?;
            let span = left.span().to(right.span());
            left = Expr::BinaryOp(BinaryOp::And, Box::new(left), Box::new(right), span);
        }

        Ok(left)
    }

    fn parse_not(&mut self) -> ParseResult<Expr> {
        if self.check(&TokenKind::Not) {
            let start = self.advance().span;
            let expr = self.parse_not()?;
            let span = start.to(expr.span());
            Ok(Expr::UnaryOp(UnaryOp::Not, Box::new(expr), span))
        } else {
            self.parse_comparison()
        }
    }

    /// `a < b <= c` is read as `a < b and b <= c`.
    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let first = self.parse_primary()?;
        let mut links: Vec<Expr> = Vec::new();
        let mut left = first.clone();

        while let Some(op) = self.comparison_op() {
            self.advance();
            let right = self.parse_primary()?;
            let span = left.span().to(right.span());
            links.push(Expr::BinaryOp(
                op,
                Box::new(left),
                Box::new(right.clone()),
                span,
            ));
            left = right;
        }

        self.reject_reserved()?;

        let mut links = links.into_iter();
        let Some(mut chain) = links.next() else {
            return Ok(first);
        };
        for link in links {
            let span = chain.span().to(link.span());
            chain = Expr::BinaryOp(BinaryOp::And, Box::new(chain), Box::new(link), span);
        }
        Ok(chain)
    }

    fn comparison_op(&self) -> Option<BinaryOp> {
        match self.peek().kind {
            TokenKind::EqEq => Some(BinaryOp::Eq),
            TokenKind::NotEq => Some(BinaryOp::NotEq),
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::LtEq => Some(BinaryOp::LtEq),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::GtEq => Some(BinaryOp::GtEq),
            _ => None,
        }
    }

    fn reject_reserved(&self) -> ParseResult<()> {
        let token = self.peek();
        match token.kind {
            TokenKind::In | TokenKind::Is => Err(ParseError::unsupported_operator(
                token.kind.name(),
                token.span.start,
            )),
            _ => Ok(()),
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();

        let literal = |kind: LiteralKind| -> ParseResult<Expr> {
            Ok(Expr::Literal(Literal {
                kind,
                span: token.span,
            }))
        };

        match &token.kind {
            TokenKind::None => {
                self.advance();
                literal(LiteralKind::None)
            }
            TokenKind::True => {
                self.advance();
                literal(LiteralKind::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                literal(LiteralKind::Bool(false))
            }
            TokenKind::Int(n) => {
                let n = *n;
                self.advance();
                literal(LiteralKind::Int(n))
            }
            TokenKind::Float(f) => {
                let f = *f;
                self.advance();
                literal(LiteralKind::Float(f))
            }
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                literal(LiteralKind::String(s))
            }

            // Negative numeric literal
            TokenKind::Minus => {
                self.advance();
                let next = self.advance();
                let span = token.span.to(next.span);
                let kind = match next.kind {
                    TokenKind::Int(n) => LiteralKind::Int(-n),
                    TokenKind::Float(f) => LiteralKind::Float(-f),
                    other => {
                        return Err(ParseError::unexpected_token(
                            "number after '-'",
                            other.name(),
                            next.span,
                        ))
                    }
                };
                Ok(Expr::Literal(Literal { kind, span }))
            }

            // Parenthesized expression
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }

            // Factor reference, optionally indexed
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();

                if !self.check(&TokenKind::LBracket) {
                    let slot = Slot {
                        name,
                        offset: 0,
                        indexed: false,
                    };
                    return Ok(Expr::Var(slot, token.span));
                }

                self.advance();
                let offset = self.parse_offset(&name)?;
                let close = self.expect(&TokenKind::RBracket).map_err(|_| {
                    ParseError::malformed_offset(format!("{}[{}", name, offset))
                })?;
                let slot = Slot {
                    name,
                    offset,
                    indexed: true,
                };
                Ok(Expr::Var(slot, token.span.to(close.span)))
            }

            TokenKind::In | TokenKind::Is => Err(ParseError::unsupported_operator(
                token.kind.name(),
                token.span.start,
            )),

            _ => Err(ParseError::unexpected_token(
                "expression",
                token.kind.name(),
                token.span,
            )),
        }
    }

    /// Parse the integer between `[` and `]`.
    fn parse_offset(&mut self, name: &str) -> ParseResult<i64> {
        let negative = if self.check(&TokenKind::Minus) {
            self.advance();
            true
        } else {
            false
        };

        let token = self.advance();
        match token.kind {
            TokenKind::Int(n) if negative => Ok(-n),
            TokenKind::Int(n) => Ok(n),
            other => {
                let found = match other {
                    TokenKind::Ident(s) => s,
                    TokenKind::Float(f) => f.to_string(),
                    TokenKind::RBracket => String::new(),
                    other => other.name().to_string(),
                };
                let sign = if negative { "-" } else { "" };
                Err(ParseError::malformed_offset(format!(
                    "{}[{}{}]",
                    name, sign, found
                )))
            }
        }
    }
}
