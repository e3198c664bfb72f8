//! Generated statements.
//!
//! One statement per line, `<reference>.<setter>(<args>)`:
//!
//! ```text
//! plt.figure(1).axes[0].set_position([0.125, 0.11, 0.775, 0.77])
//! plt.figure(1).axes[0].texts[0].set_text("Peak \"A\"")
//! plt.figure(1).set_size_inches(16.256, 10.16)
//! ```

use std::fmt;

use figkit_core::ElementId;

use crate::error::{EditError, EditResult};
use crate::property::{ArgValue, PropertyPath};

/// A setter call on an element, as written in the generated block.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub target: ElementId,
    pub property: PropertyPath,
    pub args: Vec<ArgValue>,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.target, self.property)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

/// Parses one statement. `line` is 1-based and only used in errors.
pub fn parse_statement(text: &str, line: usize) -> EditResult<Statement> {
    let text = text.trim();
    let split = text
        .find(".set_")
        .ok_or_else(|| EditError::parse(line, "expected '.set_...(' call"))?;
    let target: ElementId = text[..split]
        .parse()
        .map_err(|e: figkit_core::ReferenceError| EditError::parse(line, e.to_string()))?;

    let call = &text[split + 1..];
    let open = call
        .find('(')
        .ok_or_else(|| EditError::parse(line, "expected '('"))?;
    let property: PropertyPath = call[..open]
        .parse()
        .map_err(|e: String| EditError::parse(line, e))?;
    let inner = call[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| EditError::parse(line, "expected ')' at end of statement"))?;

    let args = ArgParser::new(inner, line).parse_all()?;
    Ok(Statement {
        target,
        property,
        args,
    })
}

/// Parses every statement of a block body, skipping blank and comment lines.
///
/// `first_line` is the 1-based line number of the first line of `body`.
pub fn parse_block(body: &str, first_line: usize) -> EditResult<Vec<Statement>> {
    body.lines()
        .enumerate()
        .filter(|(_, l)| {
            let l = l.trim();
            !l.is_empty() && !l.starts_with('#')
        })
        .map(|(i, l)| parse_statement(l, first_line + i))
        .collect()
}

/// Renders statements and checks that each one parses back unchanged.
pub fn render_verified(statements: &[Statement]) -> EditResult<Vec<String>> {
    statements
        .iter()
        .map(|statement| {
            let text = statement.to_string();
            let parsed = parse_statement(&text, 1).map_err(|e| EditError::SerializationMismatch {
                statement: text.clone(),
                reason: e.to_string(),
            })?;
            if parsed != *statement {
                return Err(EditError::SerializationMismatch {
                    statement: text,
                    reason: format!("parsed back as {:?}", parsed.args),
                });
            }
            Ok(text)
        })
        .collect()
}

/// Tokenizer for the argument list of a setter call.
struct ArgParser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
}

impl<'a> ArgParser<'a> {
    fn new(text: &'a str, line: usize) -> Self {
        Self {
            chars: text.chars().peekable(),
            line,
        }
    }

    fn error(&self, message: impl Into<String>) -> EditError {
        EditError::parse(self.line, message)
    }

    fn skip_ws(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn parse_all(mut self) -> EditResult<Vec<ArgValue>> {
        let mut args = Vec::new();
        loop {
            self.skip_ws();
            if self.chars.peek().is_none() {
                return Ok(args);
            }
            args.push(self.value()?);
            self.skip_ws();
            match self.chars.next() {
                None => return Ok(args),
                Some(',') => continue,
                Some(c) => return Err(self.error(format!("unexpected '{}' after argument", c))),
            }
        }
    }

    fn value(&mut self) -> EditResult<ArgValue> {
        match self.chars.peek().copied() {
            Some(q @ ('"' | '\'')) => {
                self.chars.next();
                self.string(q).map(ArgValue::Str)
            }
            Some('[') => {
                self.chars.next();
                self.numbers(']').map(ArgValue::List)
            }
            Some('(') => {
                self.chars.next();
                self.numbers(')').map(ArgValue::Tuple)
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let word = self.word();
                match word.as_str() {
                    "True" => Ok(ArgValue::Bool(true)),
                    "False" => Ok(ArgValue::Bool(false)),
                    other => Err(self.error(format!("unsupported literal '{}'", other))),
                }
            }
            Some(_) => self.number().map(ArgValue::Number),
            None => Err(self.error("missing argument")),
        }
    }

    fn word(&mut self) -> String {
        let mut out = String::new();
        while let Some(&c) = self.chars.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            out.push(c);
            self.chars.next();
        }
        out
    }

    fn number(&mut self) -> EditResult<f64> {
        let mut raw = String::new();
        while let Some(&c) = self.chars.peek() {
            if !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')) {
                break;
            }
            raw.push(c);
            self.chars.next();
        }
        let value: f64 = raw
            .parse()
            .map_err(|_| self.error(format!("invalid number '{}'", raw)))?;
        if !value.is_finite() {
            return Err(self.error(format!("non-finite number '{}'", raw)));
        }
        Ok(value)
    }

    fn numbers(&mut self, close: char) -> EditResult<Vec<f64>> {
        let mut out = Vec::new();
        loop {
            self.skip_ws();
            if self.chars.peek() == Some(&close) {
                self.chars.next();
                return Ok(out);
            }
            out.push(self.number()?);
            self.skip_ws();
            match self.chars.next() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(out),
                Some(c) => return Err(self.error(format!("unexpected '{}' in sequence", c))),
                None => return Err(self.error(format!("missing '{}'", close))),
            }
        }
    }

    fn string(&mut self, quote: char) -> EditResult<String> {
        let mut out = String::new();
        loop {
            match self.chars.next() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.chars.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c @ ('\\' | '"' | '\'')) => out.push(c),
                    Some(c) => return Err(self.error(format!("unknown escape '\\{}'", c))),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => out.push(c),
            }
        }
    }
}
