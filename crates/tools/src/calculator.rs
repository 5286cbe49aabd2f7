//! Calculator tool — evaluates arithmetic expressions safely.
//!
//! Input is checked against an explicit allow-list (digits, `+ - * / ( ) .`
//! and whitespace) before anything else happens. Accepted text is parsed by
//! a recursive-descent parser into an [`Expr`] tree whose only node kinds are
//! numbers, negation, and the four binary operators, so nothing but
//! arithmetic is reachable. Results are rounded to 2 decimal places.

use async_trait::async_trait;
use thinkloop_core::error::ToolError;
use thinkloop_core::tool::{Arguments, Tool, ToolParameter, sole_string_arg};

pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Evaluate a mathematical expression. Supports +, -, *, /, parentheses, and decimal numbers."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![ToolParameter::new(
            "expression",
            "string - the expression to evaluate (e.g. '10 * 1.5 + 20')",
        )]
    }

    async fn execute(&self, arguments: &Arguments) -> Result<String, ToolError> {
        let expr = sole_string_arg(arguments, "expression")?;
        let value = evaluate(&expr)?;
        Ok(render_number(value))
    }
}

/// Why an expression was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("expression contains a disallowed character: '{0}'")]
    DisallowedCharacter(char),

    #[error("empty expression")]
    Empty,

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("unexpected token: {0}")]
    UnexpectedToken(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NotFinite,

    #[error("expression nests deeper than {0} levels")]
    TooDeep(usize),

    #[error("expression has more than {0} tokens")]
    TooLong(usize),
}

impl From<EvalError> for ToolError {
    fn from(e: EvalError) -> Self {
        ToolError::ExecutionFailed(e.to_string())
    }
}

/// Maximum nesting of parentheses and unary minus.
pub const MAX_DEPTH: usize = 64;

/// Maximum number of tokens in one expression.
pub const MAX_TOKENS: usize = 512;

/// Round to 2 decimal places.
///
/// Magnitudes too large to scale by 100 have no fractional part and are
/// returned unchanged.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / 100.0;
    // -0.0 prints as "-0.0"
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Shortest round-trip rendering, keeping `.0` on integral values.
pub fn render_number(value: f64) -> String {
    format!("{value:?}")
}

/// Check, parse, evaluate, and round an expression.
pub fn evaluate(input: &str) -> Result<f64, EvalError> {
    if let Some(c) = input.chars().find(|c| !is_allowed(*c)) {
        return Err(EvalError::DisallowedCharacter(c));
    }

    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }
    if tokens.len() > MAX_TOKENS {
        return Err(EvalError::TooLong(MAX_TOKENS));
    }

    let mut parser = Parser::new(&tokens);
    let tree = parser.parse_expr()?;
    if let Some(tok) = parser.peek() {
        return Err(EvalError::UnexpectedToken(tok.to_string()));
    }

    let value = round2(tree.eval()?);
    if !value.is_finite() {
        return Err(EvalError::NotFinite);
    }
    Ok(value)
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit()
        || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.' | ' ' | '\t' | '\n' | '\r')
}

// ── Expression tree ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    fn eval(&self) -> Result<f64, EvalError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Neg(inner) => Ok(-inner.eval()?),
            Expr::Binary(op, lhs, rhs) => {
                let l = lhs.eval()?;
                let r = rhs.eval()?;
                match op {
                    BinOp::Add => Ok(l + r),
                    BinOp::Sub => Ok(l - r),
                    BinOp::Mul => Ok(l * r),
                    BinOp::Div if r == 0.0 => Err(EvalError::DivisionByZero),
                    BinOp::Div => Ok(l / r),
                }
            }
        }
    }
}

// ── Tokenizer ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let num_str: String = chars[start..i].iter().collect();
                let num: f64 = num_str
                    .parse()
                    .map_err(|_| EvalError::InvalidNumber(num_str.clone()))?;
                tokens.push(Token::Number(num));
            }
            c => return Err(EvalError::DisallowedCharacter(c)),
        }
    }

    Ok(tokens)
}

// ── Parser ────────────────────────────────────────────────────────────────

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn descend(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    // expr = term (('+' | '-') term)*
    fn parse_expr(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.consume();
            let right = self.parse_term()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // term = unary (('*' | '/') unary)*
    fn parse_term(&mut self) -> Result<Expr, EvalError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.consume();
            let right = self.parse_unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    // unary = '-' unary | primary
    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        if let Some(Token::Minus) = self.peek() {
            self.consume();
            self.descend()?;
            let operand = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::Neg(Box::new(operand)));
        }
        self.parse_primary()
    }

    // primary = NUMBER | '(' expr ')'
    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        match self.consume() {
            Some(Token::Number(n)) => Ok(Expr::Number(*n)),
            Some(Token::LParen) => {
                self.descend()?;
                let inner = self.parse_expr()?;
                self.depth -= 1;
                match self.consume() {
                    Some(Token::RParen) => Ok(inner),
                    Some(tok) => Err(EvalError::UnexpectedToken(tok.to_string())),
                    None => Err(EvalError::UnexpectedEnd),
                }
            }
            Some(tok) => Err(EvalError::UnexpectedToken(tok.to_string())),
            None => Err(EvalError::UnexpectedEnd),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
