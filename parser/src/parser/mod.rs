//! Parser for predicate strings.
//!
//! - `expr`: precedence climbing over `or`, `and`, `not` and comparisons

mod expr;

use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, Token, TokenKind};

// ==================== PARSER STATE ====================

/// Parser state.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a new parser from predicate text.
    pub fn new(input: &str) -> ParseResult<Self> {
        if input.trim().is_empty() {
            return Err(ParseError::Empty);
        }
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self { tokens, pos: 0 })
    }

    /// Parse the whole input as one expression.
    pub fn parse(mut self) -> ParseResult<Expr> {
        let expr = self.parse_expr()?;
        if !self.check(&TokenKind::Eof) {
            let token = self.peek();
            return Err(ParseError::unexpected_token(
                "end of input",
                token.kind.name(),
                token.span,
            ));
        }
        Ok(expr)
    }
}

// ==================== TOKEN HELPERS ====================

impl Parser {
    pub(crate) fn peek(&self) -> &Token {
        // The lexer always terminates the stream with Eof.
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = self.peek();
            Err(ParseError::unexpected_token(
                kind.name(),
                token.kind.name(),
                token.span,
            ))
        }
    }
}

// ==================== PUBLIC API ====================

/// Parse a predicate into its AST.
pub fn parse_expr(input: &str) -> ParseResult<Expr> {
    Parser::new(input)?.parse()
}

// ==================== TESTS ====================
