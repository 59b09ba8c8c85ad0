//! Typed scalar values and their tagged text codec.
//!
//! A [`Value`] is one of four scalar kinds. For durable storage each value
//! is encoded as a text payload plus a single-character type tag:
//!
//! | variant | tag | encoding |
//! |---------|-----|----------|
//! | `Str`   | `s` | the string itself |
//! | `Int`   | `i` | decimal |
//! | `Double`| `d` | shortest decimal that parses back to the same bits |
//! | `Bool`  | `b` | `"1"` / `"0"` |
//!
//! This pair is the durable wire format — the tags must not change without
//! a migration story.

use crate::error::{Result, StoreError};

/// A scalar value stored under a (script id, key) pair.
///
/// Closed over four kinds. There is no null variant: absence is modeled as
/// `Option::None` at lookup time, never as a value.
///
/// Equality is structural per variant. Different variants are never equal,
/// and `Double` follows IEEE-754 (`NaN != NaN`, `-0.0 == 0.0`).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 string.
    Str(String),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit IEEE-754 floating point.
    Double(f64),
    /// Boolean.
    Bool(bool),
}

impl Value {
    /// The variant name, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "Str",
            Value::Int(_) => "Int",
            Value::Double(_) => "Double",
            Value::Bool(_) => "Bool",
        }
    }

    /// Get the string if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer if this is an `Int`.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the double if this is a `Double`.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Get the boolean if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Encode to the `(text, tag)` pair persisted by the durable backend.
    ///
    /// `f64::Display` in Rust prints the shortest decimal that parses back
    /// to the identical bits, so the double encoding round-trips exactly.
    pub fn encode(&self) -> (String, char) {
        match self {
            Value::Str(s) => (s.clone(), 's'),
            Value::Int(i) => (i.to_string(), 'i'),
            Value::Double(d) => (d.to_string(), 'd'),
            Value::Bool(b) => ((if *b { "1" } else { "0" }).to_string(), 'b'),
        }
    }

    /// Decode a stored `(tag, text)` pair back into a value.
    ///
    /// The exact inverse of [`encode`](Self::encode). Text that does not
    /// fully parse as the tagged kind is an error — `i32`/`f64` parsing
    /// rejects trailing garbage rather than truncating — and so is an
    /// unrecognized tag.
    pub fn decode(tag: char, text: &str) -> Result<Value> {
        match tag {
            's' => Ok(Value::Str(text.to_string())),
            'i' => text
                .parse::<i32>()
                .map(Value::Int)
                .map_err(|e| StoreError::new(format!("invalid integer {text:?}: {e}"))),
            'd' => text
                .parse::<f64>()
                .map(Value::Double)
                .map_err(|e| StoreError::new(format!("invalid double {text:?}: {e}"))),
            'b' => match text {
                "1" => Ok(Value::Bool(true)),
                "0" => Ok(Value::Bool(false)),
                _ => Err(StoreError::new(format!("invalid boolean {text:?}"))),
            },
            other => Err(StoreError::new(format!("unknown type tag {other:?}"))),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
