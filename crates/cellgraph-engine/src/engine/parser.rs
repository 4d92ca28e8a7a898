//! Formula parser
//!
//! A recursive descent parser for cell formulas. Unary minus binds tighter
//! than `*` and `/`, which bind tighter than `+` and `-`; binary operators
//! are left-associative. Parentheses group.
//!
//! ```text
//! formula := '='? expr
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | primary
//! primary := NUMBER | CELL_ID | '(' expr ')'
//! ```
//!
//! Trees are capped at [`MAX_DEPTH`] levels. Parentheses, unary minus and
//! each operator in a chain like `1+1+1` all add a level, so evaluating or
//! dropping an accepted tree never recurses deeper than that.

use std::fmt;

use super::cell_id::CellId;
use super::expr::{BinaryOp, Expr};
use super::FORMULA_MARKER;
use crate::error::ParseError;

/// Deepest expression tree [`parse_formula`] will build.
pub const MAX_DEPTH: usize = 256;

/// Parse formula text into an expression tree.
///
/// # Example
/// ```rust
/// use cellgraph_engine::engine::{parse_formula, BinaryOp, Expr};
///
/// let expr = parse_formula("=1+2").unwrap();
/// assert_eq!(expr, Expr::binary(BinaryOp::Add, Expr::Number(1.0), Expr::Number(2.0)));
/// ```
pub fn parse_formula(formula: &str) -> Result<Expr, ParseError> {
    let formula = formula.trim();
    let formula = formula.strip_prefix(FORMULA_MARKER).unwrap_or(formula);

    let mut parser = FormulaParser::new(formula)?;
    if parser.current == Token::Eof {
        return Err(ParseError::Empty);
    }

    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    if parser.current != Token::Eof {
        return Err(parser.unexpected("an operator or end of formula"));
    }

    Ok(expr)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    CellId(CellId),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {}", n),
            Token::CellId(id) => write!(f, "reference {}", id),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::LeftParen => f.write_str("'('"),
            Token::RightParen => f.write_str("')'"),
            Token::Eof => f.write_str("end of formula"),
        }
    }
}

struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    current: Token,
    /// Byte offset where `current` starts.
    token_start: usize,
    depth: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> Result<Self, ParseError> {
        let mut parser = Self {
            input,
            pos: 0,
            current: Token::Eof,
            token_start: 0,
            depth: 0,
        };
        parser.advance()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance(&mut self) -> Result<(), ParseError> {
        self.skip_whitespace();
        self.token_start = self.pos;
        self.current = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> Result<Token, ParseError> {
        let Some(c) = self.peek_char() else {
            return Ok(Token::Eof);
        };

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.pos += c.len_utf8();
            return Ok(token);
        }

        if c.is_ascii_digit() || c == '.' {
            return self.scan_number();
        }

        if c.is_ascii_alphabetic() {
            return self.scan_cell_id();
        }

        Err(ParseError::UnexpectedChar {
            ch: c,
            pos: self.pos,
        })
    }

    fn scan_number(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        self.consume_while(|c| c.is_ascii_digit());
        if self.peek_char() == Some('.') {
            self.pos += 1;
            self.consume_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            self.pos += 1;
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.pos += 1;
            }
            self.consume_while(|c| c.is_ascii_digit());
        }

        let text = &self.input[start..self.pos];
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| ParseError::InvalidNumber {
                text: text.to_string(),
                pos: start,
            })
    }

    fn scan_cell_id(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        self.consume_while(|c| c.is_ascii_alphabetic());
        self.consume_while(|c| c.is_ascii_digit());

        let name = &self.input[start..self.pos];
        CellId::parse(name)
            .map(Token::CellId)
            .map_err(|_| ParseError::InvalidReference {
                name: name.to_string(),
                pos: start,
            })
    }

    fn consume_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek_char() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        self.consume_while(char::is_whitespace);
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: self.current.to_string(),
            pos: self.token_start,
        }
    }

    /// Go one level deeper, failing at `current` once the cap is reached.
    fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep {
                max: MAX_DEPTH,
                pos: self.token_start,
            });
        }
        self.depth += 1;
        Ok(())
    }

    // === Grammar ===

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let outer = self.depth;
        let mut left = self.parse_term()?;
        loop {
            let op = match self.current {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Subtract,
                _ => break,
            };
            self.descend()?;
            self.advance()?;
            let right = self.parse_term()?;
            left = Expr::binary(op, left, right);
        }
        self.depth = outer;
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let outer = self.depth;
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current {
                Token::Star => BinaryOp::Multiply,
                Token::Slash => BinaryOp::Divide,
                _ => break,
            };
            self.descend()?;
            self.advance()?;
            let right = self.parse_unary()?;
            left = Expr::binary(op, left, right);
        }
        self.depth = outer;
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.current == Token::Minus {
            self.descend()?;
            self.advance()?;
            let operand = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::negate(operand));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match std::mem::replace(&mut self.current, Token::Eof) {
            Token::Number(n) => {
                self.advance()?;
                Ok(Expr::Number(n))
            }
            Token::CellId(id) => {
                self.advance()?;
                Ok(Expr::Reference(id))
            }
            Token::LeftParen => {
                self.current = Token::LeftParen;
                self.descend()?;
                self.advance()?;
                let inner = self.parse_expression()?;
                if self.current != Token::RightParen {
                    return Err(self.unexpected("')'"));
                }
                self.depth -= 1;
                self.advance()?;
                Ok(inner)
            }
            other => {
                self.current = other;
                Err(self.unexpected("a number, cell reference or '('"))
            }
        }
    }
}
