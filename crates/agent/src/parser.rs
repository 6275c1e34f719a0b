//! ActionParser: turns one model turn into a typed [`Action`].
//!
//! Parsing happens in two stages:
//!
//! 1. **Extraction** ([`extract`]): locate the `Thought:` and `Action:`
//!    lines inside the full response. No `Action:` line is
//!    [`ParseError::NoAction`].
//! 2. **Action grammar** ([`parse_action`]): a small recursive-descent
//!    parser over the action text, supporting two dialects:
//!
//! ```text
//! action  = ident ws ( call | bracket )
//! call    = '(' ws [ arg ( ws ',' ws arg )* ws [','] ] ws ')'
//! arg     = ident ws '=' ws '"' { char | '\"' | '\\' } '"'
//! bracket = '[' { any char except ']' } ']'
//! ```
//!
//! `Finish[answer]` and `finish(answer="...")` produce
//! [`Action::Finish`]. The bracket body ends at the first `]`, so an
//! answer containing a literal `]` is truncated there.
//!
//! Unknown tool names are not a parse error; the registry reports them at
//! dispatch time.

use agentloops_core::action::{Action, Arguments, ToolInput};
use agentloops_core::error::ParseError;

const THOUGHT_PREFIX: &str = "Thought:";
const ACTION_PREFIX: &str = "Action:";
const FINISH: &str = "finish";

/// The `Thought:`/`Action:` segments of one model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<'a> {
    pub thought: Option<&'a str>,
    pub action: &'a str,
}

/// A fully parsed model turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTurn {
    pub thought: Option<String>,
    /// The action text exactly as the model wrote it (trimmed).
    pub raw_action: String,
    pub action: Action,
}

/// Parse a complete model response.
pub fn parse(text: &str) -> Result<ModelTurn, ParseError> {
    let extracted = extract(text)?;
    let action = parse_action(extracted.action)?;
    Ok(ModelTurn {
        thought: extracted.thought.map(str::to_string),
        raw_action: extracted.action.to_string(),
        action,
    })
}

/// Find the first `Thought:` and the first `Action:` line.
pub fn extract(text: &str) -> Result<Extracted<'_>, ParseError> {
    let mut thought = None;
    let mut action = None;

    for line in text.lines() {
        let line = line.trim_start();
        if thought.is_none() {
            if let Some(rest) = line.strip_prefix(THOUGHT_PREFIX) {
                thought = Some(rest.trim());
                continue;
            }
        }
        if let Some(rest) = line.strip_prefix(ACTION_PREFIX) {
            action = Some(rest.trim());
            break;
        }
    }

    let action = action.ok_or(ParseError::NoAction)?;
    Ok(Extracted { thought, action })
}

/// Parse the text following `Action:`.
pub fn parse_action(text: &str) -> Result<Action, ParseError> {
    let mut cursor = Cursor::new(text.trim());

    let name = cursor.ident();
    if name.is_empty() {
        return Err(ParseError::NoToolName);
    }
    cursor.skip_ws();

    match cursor.peek() {
        Some('[') => {
            cursor.bump();
            let body = cursor.bracket_body()?;
            if is_finish(name) {
                Ok(Action::Finish {
                    answer: body.to_string(),
                })
            } else {
                Ok(Action::Tool {
                    name: name.to_string(),
                    input: ToolInput::Text(body.to_string()),
                })
            }
        }
        Some('(') => {
            cursor.bump();
            let args = cursor.call_args()?;
            if is_finish(name) {
                finish_from_args(args)
            } else {
                Ok(Action::Tool {
                    name: name.to_string(),
                    input: ToolInput::Args(args),
                })
            }
        }
        Some(c) => Err(ParseError::MalformedArgs(format!(
            "expected '(' or '[' after '{name}', found '{c}'"
        ))),
        None => Err(ParseError::MalformedArgs(format!(
            "expected '(' or '[' after '{name}'"
        ))),
    }
}

fn is_finish(name: &str) -> bool {
    name.eq_ignore_ascii_case(FINISH)
}

fn finish_from_args(args: Arguments) -> Result<Action, ParseError> {
    let answer = match args.get("answer") {
        Some(answer) => answer.to_string(),
        None if args.len() == 1 => args.iter().map(|(_, v)| v.to_string()).collect(),
        None => {
            return Err(ParseError::MalformedArgs(
                "finish requires an 'answer' argument".into(),
            ));
        }
    };
    Ok(Action::Finish { answer })
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn ident(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn expect(&mut self, want: char, context: &str) -> Result<(), ParseError> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(ParseError::MalformedArgs(format!(
                "expected '{want}' {context}, found '{c}'"
            ))),
            None => Err(ParseError::MalformedArgs(format!(
                "expected '{want}' {context}, found end of input"
            ))),
        }
    }

    /// Everything up to the first `]`, verbatim.
    fn bracket_body(&mut self) -> Result<&'a str, ParseError> {
        let rest = self.rest();
        let end = rest
            .find(']')
            .ok_or_else(|| ParseError::MalformedArgs("unterminated '['".into()))?;
        self.pos += end + 1;
        Ok(&rest[..end])
    }

    fn call_args(&mut self) -> Result<Arguments, ParseError> {
        let mut args = Arguments::new();
        self.skip_ws();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(args);
        }

        loop {
            self.skip_ws();
            let name = self.ident();
            if name.is_empty() {
                return Err(match self.peek() {
                    None => ParseError::MalformedArgs("unterminated '('".into()),
                    Some(c) => ParseError::MalformedArgs(format!(
                        "expected argument name, found '{c}'"
                    )),
                });
            }
            self.skip_ws();
            self.expect('=', &format!("after argument '{name}'"))?;
            self.skip_ws();
            let value = self.quoted(name)?;
            // Duplicate names: the last value wins.
            args.insert(name, value);

            self.skip_ws();
            match self.bump() {
                Some(',') => {
                    self.skip_ws();
                    if self.peek() == Some(')') {
                        self.bump();
                        return Ok(args);
                    }
                }
                Some(')') => return Ok(args),
                Some(c) => {
                    return Err(ParseError::MalformedArgs(format!(
                        "expected ',' or ')' after argument '{name}', found '{c}'"
                    )));
                }
                None => return Err(ParseError::MalformedArgs("unterminated '('".into())),
            }
        }
    }

    fn quoted(&mut self, name: &str) -> Result<String, ParseError> {
        match self.peek() {
            Some('"') => {
                self.bump();
            }
            _ => {
                return Err(ParseError::MalformedArgs(format!(
                    "value of '{name}' must be a double-quoted string"
                )));
            }
        }

        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(value),
                Some('\\') => match self.bump() {
                    Some(c @ ('"' | '\\')) => value.push(c),
                    Some(c) => {
                        value.push('\\');
                        value.push(c);
                    }
                    None => break,
                },
                Some(c) => value.push(c),
                None => break,
            }
        }
        Err(ParseError::MalformedArgs(format!(
            "unterminated string for '{name}'"
        )))
    }
}
