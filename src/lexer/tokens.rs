use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Number,
    String,
    Name,
    Operator,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Number => write!(f, "number"),
            TokenKind::String => write!(f, "string"),
            TokenKind::Name => write!(f, "name"),
            TokenKind::Operator => write!(f, "operator"),
        }
    }
}

/// A numeric literal, or the text of a string literal, name or operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    Number(f64),
    Text(String),
}

impl From<f64> for TokenValue {
    fn from(value: f64) -> Self {
        TokenValue::Number(value)
    }
}

impl From<String> for TokenValue {
    fn from(value: String) -> Self {
        TokenValue::Text(value)
    }
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        TokenValue::Text(value.to_string())
    }
}

impl Display for TokenValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenValue::Number(number) => write!(f, "{}", number),
            TokenValue::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Serializes as `{ "type": "number", "value": 1.0 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub value: TokenValue,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.kind, self.value)
    }
}

impl Token {
    pub fn number(value: f64) -> Self {
        Token {
            kind: TokenKind::Number,
            value: TokenValue::Number(value),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Token {
            kind: TokenKind::String,
            value: TokenValue::Text(value.into()),
        }
    }

    pub fn name(value: impl Into<String>) -> Self {
        Token {
            kind: TokenKind::Name,
            value: TokenValue::Text(value.into()),
        }
    }

    pub fn operator(value: impl Into<String>) -> Self {
        Token {
            kind: TokenKind::Operator,
            value: TokenValue::Text(value.into()),
        }
    }
}
