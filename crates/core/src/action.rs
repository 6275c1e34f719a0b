//! Typed actions parsed from one model turn.
//!
//! An [`Action`] is produced once by the action parser, consumed once by a
//! loop, and never mutated in between. Its `Display` form is the canonical
//! text recorded in a loop's history.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered `name → value` pairs from a call-dialect action.
///
/// Insertion order is preserved. Inserting an existing name replaces its
/// value in place, so the last occurrence wins without moving the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arguments(Vec<(String, String)>);

impl Arguments {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a pair, replacing the value of an existing name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Arguments::new();
        for (k, v) in iter {
            args.insert(k, v);
        }
        args
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            write!(f, "{name}=\"{escaped}\"")?;
        }
        Ok(())
    }
}

/// What a tool receives: the verbatim bracket body, or the decomposed
/// call-dialect arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolInput {
    Text(String),
    Args(Arguments),
}

impl ToolInput {
    /// The tool's main input regardless of dialect.
    ///
    /// Bracket input is returned as-is. For call-dialect input, the value
    /// named `key` is preferred, falling back to the only argument when
    /// exactly one was given.
    pub fn primary(&self, key: &str) -> Option<&str> {
        match self {
            ToolInput::Text(text) => Some(text.as_str()),
            ToolInput::Args(args) => args.get(key).or_else(|| {
                if args.len() == 1 {
                    args.iter().next().map(|(_, v)| v)
                } else {
                    None
                }
            }),
        }
    }

    /// A named argument. Bracket input has no names.
    pub fn arg(&self, key: &str) -> Option<&str> {
        match self {
            ToolInput::Text(_) => None,
            ToolInput::Args(args) => args.get(key),
        }
    }
}

/// A parsed, typed instruction derived from one model turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Invoke a registered tool.
    Tool { name: String, input: ToolInput },
    /// Stop and return the answer.
    Finish { answer: String },
}

impl Action {
    pub fn is_finish(&self) -> bool {
        matches!(self, Action::Finish { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tool {
                name,
                input: ToolInput::Text(text),
            } => write!(f, "{name}[{text}]"),
            Action::Tool {
                name,
                input: ToolInput::Args(args),
            } => write!(f, "{name}({args})"),
            Action::Finish { answer } => write!(f, "Finish[{answer}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_argument_keeps_position_and_last_value() {
        let args: Arguments = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        let pairs: Vec<_> = args.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn display_renders_both_dialects() {
        let call = Action::Tool {
            name: "get_weather".into(),
            input: ToolInput::Args([("city", "Beijing")].into_iter().collect()),
        };
        assert_eq!(call.to_string(), r#"get_weather(city="Beijing")"#);

        let bracket = Action::Tool {
            name: "Search".into(),
            input: ToolInput::Text("rust async".into()),
        };
        assert_eq!(bracket.to_string(), "Search[rust async]");
    }

    #[test]
    fn display_escapes_quotes() {
        let args: Arguments = [("q", r#"say "hi""#)].into_iter().collect();
        assert_eq!(args.to_string(), r#"q="say \"hi\"""#);
    }

    #[test]
    fn primary_falls_back_to_single_argument() {
        let input = ToolInput::Args([("expr", "1+1")].into_iter().collect());
        assert_eq!(input.primary("expression"), Some("1+1"));

        let input = ToolInput::Args([("a", "1"), ("b", "2")].into_iter().collect());
        assert_eq!(input.primary("expression"), None);
        assert_eq!(input.arg("b"), Some("2"));

        let input = ToolInput::Text("2 * 3".into());
        assert_eq!(input.primary("expression"), Some("2 * 3"));
        assert_eq!(input.arg("expression"), None);
    }
}
