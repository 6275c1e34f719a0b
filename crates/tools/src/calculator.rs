//! Calculator tool: evaluates arithmetic expressions.
//!
//! Input is the bare expression, e.g. `Calculator[(123 + 456) * 789 / 12]`,
//! or `Calculator(expression="...")` in the call dialect.
//!
//! Grammar (recursive descent, lowest precedence first):
//!
//! ```text
//! expr    = term (('+' | '-') term)*
//! term    = power (('*' | '/' | '%') power)*
//! power   = unary ('^' power)?          // right-associative
//! unary   = '-' unary | primary
//! primary = NUMBER | '(' expr ')'
//! ```

use agentloops_core::action::ToolInput;
use agentloops_core::error::ToolError;
use agentloops_core::tool::Tool;
use async_trait::async_trait;
use tracing::debug;

pub struct CalculatorTool;

/// Nesting limit for parentheses, unary minus and `^` chains.
const MAX_DEPTH: usize = 256;

pub const NAME: &str = "Calculator";

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "An exact arithmetic calculator. Input a math expression, get the result. \
         Supports + - * / % ^, parentheses and decimals. Example: (123 + 456) * 789 / 12"
    }

    async fn invoke(&self, input: ToolInput) -> Result<String, ToolError> {
        let expr = input
            .primary("expression")
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'expression' argument".into()))?;
        debug!(expression = %expr, "Evaluating");

        let value = evaluate(expr).map_err(|reason| ToolError::ExecutionFailed {
            tool_name: NAME.into(),
            reason,
        })?;
        Ok(format_number(value))
    }
}

/// Integers print without a trailing `.0`.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Evaluate an arithmetic expression string.
pub fn evaluate(expr: &str) -> Result<f64, String> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser::new(&tokens);
    let result = parser.parse_expr()?;
    if let Some(tok) = parser.peek() {
        return Err(format!(
            "Unexpected token at position {}: {:?}",
            parser.pos, tok
        ));
    }
    if !result.is_finite() {
        return Err("Result is not a finite number".into());
    }
    Ok(result)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        let simple = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' | '×' => Some(Token::Star),
            '/' | '÷' => Some(Token::Slash),
            '%' => Some(Token::Percent),
            '^' => Some(Token::Caret),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            _ => None,
        };
        if let Some(tok) = simple {
            tokens.push(tok);
            chars.next();
            continue;
        }
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c.is_ascii_digit() || c == '.' {
            let mut end = start;
            while let Some(&(i, d)) = chars.peek() {
                if d.is_ascii_digit() || d == '.' {
                    end = i + d.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let num_str = &input[start..end];
            let num: f64 = num_str
                .parse()
                .map_err(|_| format!("Invalid number: {}", num_str))?;
            tokens.push(Token::Number(num));
            continue;
        }
        return Err(format!("Unexpected character: '{}'", c));
    }

    Ok(tokens)
}

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

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn parse_expr(&mut self) -> Result<f64, String> {
        let mut left = self.parse_term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.consume();
                    left += self.parse_term()?;
                }
                Some(Token::Minus) => {
                    self.consume();
                    left -= self.parse_term()?;
                }
                _ => return Ok(left),
            }
        }
    }

    fn parse_term(&mut self) -> Result<f64, String> {
        let mut left = self.parse_power()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.consume();
                    left *= self.parse_power()?;
                }
                Some(Token::Slash) => {
                    self.consume();
                    let right = self.parse_power()?;
                    if right == 0.0 {
                        return Err("Division by zero".into());
                    }
                    left /= right;
                }
                Some(Token::Percent) => {
                    self.consume();
                    let right = self.parse_power()?;
                    if right == 0.0 {
                        return Err("Modulo by zero".into());
                    }
                    left %= right;
                }
                _ => return Ok(left),
            }
        }
    }

    fn parse_power(&mut self) -> Result<f64, String> {
        let base = self.parse_unary()?;
        if let Some(Token::Caret) = self.peek() {
            self.consume();
            let exponent = self.parse_power()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    /// Every recursive path of the grammar passes through here, so this is
    /// where nesting is bounded.
    fn parse_unary(&mut self) -> Result<f64, String> {
        if self.depth >= MAX_DEPTH {
            return Err("Expression nested too deeply".into());
        }
        self.depth += 1;
        let result = self.parse_negation();
        self.depth -= 1;
        result
    }

    fn parse_negation(&mut self) -> Result<f64, String> {
        if let Some(Token::Minus) = self.peek() {
            self.consume();
            let val = self.parse_unary()?;
            return Ok(-val);
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<f64, String> {
        match self.consume() {
            Some(Token::Number(n)) => Ok(*n),
            Some(Token::LParen) => {
                let val = self.parse_expr()?;
                match self.consume() {
                    Some(Token::RParen) => Ok(val),
                    _ => Err("Expected closing parenthesis".into()),
                }
            }
            Some(tok) => Err(format!("Unexpected token: {:?}", tok)),
            None => Err("Unexpected end of expression".into()),
        }
    }
}
