//! Property setters and their argument values.
//!
//! A [`PropertyPath`] names the setter a change is replayed through, an
//! [`ArgValue`] is one argument of that call. Both render as the literal text
//! used in generated statements.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Setter invoked on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertyPath {
    /// `set_position`: `[x, y, w, h]` for axes, `(x, y)` for text
    Position,
    /// `set_loc`: legend anchor `(x, y)` in axes fraction
    Loc,
    /// `set_extent`: image `[left, right, bottom, top]` in data units
    Extent,
    Rotation,
    Text,
    Color,
    FontSize,
    /// `set_size_inches(w, h)` on the figure
    SizeInches,
}

impl PropertyPath {
    pub const ALL: [PropertyPath; 8] = [
        PropertyPath::Position,
        PropertyPath::Loc,
        PropertyPath::Extent,
        PropertyPath::Rotation,
        PropertyPath::Text,
        PropertyPath::Color,
        PropertyPath::FontSize,
        PropertyPath::SizeInches,
    ];

    /// Method name as written in generated code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Position => "set_position",
            Self::Loc => "set_loc",
            Self::Extent => "set_extent",
            Self::Rotation => "set_rotation",
            Self::Text => "set_text",
            Self::Color => "set_color",
            Self::FontSize => "set_fontsize",
            Self::SizeInches => "set_size_inches",
        }
    }

    /// Human readable name used in history labels.
    pub fn label(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Loc => "legend location",
            Self::Extent => "image extent",
            Self::Rotation => "rotation",
            Self::Text => "text",
            Self::Color => "color",
            Self::FontSize => "font size",
            Self::SizeInches => "figure size",
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyPath::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown setter '{}'", s))
    }
}

/// One argument of a setter call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArgValue {
    Number(f64),
    Str(String),
    Bool(bool),
    /// `[a, b, ...]`
    List(Vec<f64>),
    /// `(a, b, ...)`
    Tuple(Vec<f64>),
}

impl ArgValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ArgValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numbers of a list or tuple argument.
    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            ArgValue::List(v) | ArgValue::Tuple(v) => Some(v),
            _ => None,
        }
    }

    /// Returns `true` when every number in the argument is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            ArgValue::Number(v) => v.is_finite(),
            ArgValue::List(v) | ArgValue::Tuple(v) => v.iter().all(|x| x.is_finite()),
            ArgValue::Str(_) | ArgValue::Bool(_) => true,
        }
    }

    /// Equality with an absolute tolerance on numbers.
    pub fn approx_eq(&self, other: &ArgValue, eps: f64) -> bool {
        match (self, other) {
            (ArgValue::Number(a), ArgValue::Number(b)) => (a - b).abs() <= eps,
            (ArgValue::List(a), ArgValue::List(b)) | (ArgValue::Tuple(a), ArgValue::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= eps)
            }
            _ => self == other,
        }
    }
}

/// Compares two argument lists with [`ArgValue::approx_eq`].
pub fn args_approx_eq(a: &[ArgValue], b: &[ArgValue], eps: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.approx_eq(y, eps))
}

fn write_numbers(f: &mut fmt::Formatter<'_>, values: &[f64]) -> fmt::Result {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", v)?;
    }
    Ok(())
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // f64 Display is the shortest text that parses back to the same value
            ArgValue::Number(v) => write!(f, "{}", v),
            ArgValue::Bool(true) => f.write_str("True"),
            ArgValue::Bool(false) => f.write_str("False"),
            ArgValue::Str(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '\\' => f.write_str("\\\\")?,
                        '"' => f.write_str("\\\"")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"")
            }
            ArgValue::List(values) => {
                f.write_str("[")?;
                write_numbers(f, values)?;
                f.write_str("]")
            }
            ArgValue::Tuple(values) => {
                f.write_str("(")?;
                write_numbers(f, values)?;
                f.write_str(")")
            }
        }
    }
}
