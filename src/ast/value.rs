use std::{cmp::Ordering, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::errors::errors::{EvaluateError, EvaluateErrorImpl};

/// The result of evaluating an expression.
///
/// Booleans are represented as the numbers `1` and `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    String(String),
    Array(Vec<Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Truthiness used by `?:`, `&&` and `||`: non-zero numbers, non-empty
    /// strings and every array are true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) => true,
        }
    }

    /// Truthiness used by `!`, `if`, `and`, `or` and `not`: only numbers above zero.
    pub fn is_positive(&self) -> bool {
        matches!(self, Value::Number(n) if *n > 0.0)
    }

    pub fn as_number(&self, operation: &str) -> Result<f64, EvaluateError> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(type_mismatch(operation, "number", other)),
        }
    }

    pub fn as_array(&self, operation: &str) -> Result<&[Value], EvaluateError> {
        match self {
            Value::Array(values) => Ok(values),
            other => Err(type_mismatch(operation, "array", other)),
        }
    }

    pub fn as_str(&self, operation: &str) -> Result<&str, EvaluateError> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(type_mismatch(operation, "string", other)),
        }
    }

    /// Orders two numbers or two strings; anything else is a type mismatch.
    pub fn compare(&self, other: &Value, operation: &str) -> Result<Option<Ordering>, EvaluateError> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(a.partial_cmp(b)),
            (Value::String(a), Value::String(b)) => Ok(Some(a.cmp(b))),
            (Value::Number(_), other) => Err(type_mismatch(operation, "number", other)),
            (Value::String(_), other) => Err(type_mismatch(operation, "string", other)),
            (other, _) => Err(type_mismatch(operation, "number or string", other)),
        }
    }
}

fn type_mismatch(operation: &str, expected: &str, received: &Value) -> EvaluateError {
    EvaluateError::new(EvaluateErrorImpl::TypeMismatch {
        operation: operation.to_string(),
        expected: expected.to_string(),
        received: received.type_name().to_string(),
    })
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Number(if value { 1.0 } else { 0.0 })
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}
