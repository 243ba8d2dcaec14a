//! Lexer (tokenizer) for predicate strings.

use crate::{ParseError, ParseResult, Span};

/// Token types.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords (case-sensitive)
    And,
    Or,
    Not,
    True,
    False,
    None,
    /// Reserved, rejected by the parser.
    In,
    /// Reserved, rejected by the parser.
    Is,

    // Literals
    Ident(String),
    Int(i64),
    Float(f64),
    String(String),

    // Symbols
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    EqEq,     // ==
    NotEq,    // !=
    Lt,       // <
    LtEq,     // <=
    Gt,       // >
    GtEq,     // >=
    Minus,    // -

    // End of input
    Eof,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::True => "True",
            TokenKind::False => "False",
            TokenKind::None => "None",
            TokenKind::In => "in",
            TokenKind::Is => "is",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Int(_) => "integer",
            TokenKind::Float(_) => "float",
            TokenKind::String(_) => "string",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Minus => "-",
            TokenKind::Eof => "end of input",
        }
    }
}

/// A token with its span.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Lexer state.
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            pos: 0,
        }
    }

    /// Tokenize all input into a vector of tokens ending with `Eof`.
    pub fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn next_char(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.pos = pos + c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> ParseResult<Token> {
        self.skip_whitespace();

        let start = self.pos;
        let Some(c) = self.next_char() else {
            return Ok(Token::new(TokenKind::Eof, Span::new(start, start)));
        };

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '-' => TokenKind::Minus,
            '=' => {
                if self.peek_char() == Some('=') {
                    self.next_char();
                    TokenKind::EqEq
                } else {
                    return Err(ParseError::unsupported_operator("=", start));
                }
            }
            '!' => {
                if self.peek_char() == Some('=') {
                    self.next_char();
                    TokenKind::NotEq
                } else {
                    return Err(ParseError::unsupported_operator("!", start));
                }
            }
            '<' => {
                if self.peek_char() == Some('=') {
                    self.next_char();
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.peek_char() == Some('=') {
                    self.next_char();
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '"' | '\'' => self.scan_string(c, start)?,
            '_' | 'a'..='z' | 'A'..='Z' => self.scan_ident_or_keyword(c),
            '0'..='9' | '.' => self.scan_number(c, start)?,
            _ => return Err(ParseError::unexpected_char(c, start)),
        };

        Ok(Token::new(kind, Span::new(start, self.pos)))
    }

    fn scan_string(&mut self, quote: char, start: usize) -> ParseResult<TokenKind> {
        let mut value = String::new();

        loop {
            match self.next_char() {
                None => return Err(ParseError::UnterminatedString { pos: start }),
                Some(c) if c == quote => break,
                Some('\\') => {
                    let escaped = match self.next_char() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some('\'') => '\'',
                        Some(c) => {
                            return Err(ParseError::InvalidEscape {
                                ch: c,
                                pos: self.pos - c.len_utf8() - 1,
                            })
                        }
                        None => return Err(ParseError::UnterminatedString { pos: start }),
                    };
                    value.push(escaped);
                }
                Some(c) => value.push(c),
            }
        }

        Ok(TokenKind::String(value))
    }

    fn scan_ident_or_keyword(&mut self, first: char) -> TokenKind {
        let mut ident = String::new();
        ident.push(first);

        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                ident.push(c);
                self.next_char();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "True" => TokenKind::True,
            "False" => TokenKind::False,
            "None" => TokenKind::None,
            "in" => TokenKind::In,
            "is" => TokenKind::Is,
            _ => TokenKind::Ident(ident),
        }
    }

    fn scan_number(&mut self, first: char, start: usize) -> ParseResult<TokenKind> {
        let mut seen_dot = first == '.';
        let mut seen_exp = false;

        while let Some(c) = self.peek_char() {
            match c {
                '0'..='9' | '_' => {
                    self.next_char();
                }
                '.' if !seen_dot && !seen_exp => {
                    seen_dot = true;
                    self.next_char();
                }
                'e' | 'E' if !seen_exp => {
                    seen_exp = true;
                    self.next_char();
                    if matches!(self.peek_char(), Some('+' | '-')) {
                        self.next_char();
                    }
                }
                _ => break,
            }
        }

        let text = &self.input[start..self.pos];
        let cleaned: String = text.chars().filter(|c| *c != '_').collect();

        if seen_dot || seen_exp {
            cleaned
                .parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| ParseError::invalid_number(text, start))
        } else {
            cleaned
                .parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|_| ParseError::invalid_number(text, start))
        }
    }
}
