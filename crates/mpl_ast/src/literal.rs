//! Literal values

use std::fmt::{Display, Formatter};
use thiserror::Error;

/// A numeric literal
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Integer(u64),
    /// An integer too large for 64 bits, kept exactly as written
    BigInteger(String),
    Float(f64),
}

/// A number lexeme that does not denote a value
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NumberError {
    #[error("{0:?} is not a number")]
    Invalid(String),
}

impl Number {
    /// Reads a number from its lexeme, in any of the decimal, fractional, exponent, hex and
    /// binary forms.
    pub fn from_lexeme(lexeme: &str) -> Result<Self, NumberError> {
        let radix = |digits: &str, radix: u32| {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return Err(NumberError::Invalid(lexeme.to_string()));
            }
            Ok(u64::from_str_radix(digits, radix)
                .map(Number::Integer)
                .unwrap_or_else(|_| Number::BigInteger(lexeme.to_string())))
        };
        if let Some(hex) = lexeme
            .strip_prefix("0x")
            .or_else(|| lexeme.strip_prefix("0X"))
        {
            return radix(hex, 16);
        }
        if let Some(bin) = lexeme
            .strip_prefix("0b")
            .or_else(|| lexeme.strip_prefix("0B"))
        {
            return radix(bin, 2);
        }
        if lexeme.contains(['.', 'e', 'E']) {
            return lexeme
                .parse::<f64>()
                .map(Number::Float)
                .map_err(|_| NumberError::Invalid(lexeme.to_string()));
        }
        radix(lexeme, 10)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{i}"),
            Number::BigInteger(lexeme) => write!(f, "{lexeme}"),
            Number::Float(float) => write!(f, "{float:?}"),
        }
    }
}

/// The value of a literal expression
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(Number),
    /// A string with its escapes already processed
    String(String),
    /// The verbatim contents of a `"""` string
    RawString(String),
    Bool(bool),
    /// `⊥`
    Bottom,
}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Number(n) => write!(f, "{n}"),
            LiteralValue::String(s) => write!(f, "{s:?}"),
            LiteralValue::RawString(s) => write!(f, "r{s:?}"),
            LiteralValue::Bool(b) => write!(f, "{b}"),
            LiteralValue::Bottom => write!(f, "⊥"),
        }
    }
}
