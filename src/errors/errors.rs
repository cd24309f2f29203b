use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A tokenization failure: malformed source text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    internal_error: ParseErrorImpl,
    position: Position,
}

impl ParseError {
    pub fn new(error_impl: ParseErrorImpl, position: Position) -> Self {
        ParseError {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal(&self) -> &ParseErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ParseErrorImpl::InvalidExponent { .. } => "InvalidExponent",
            ParseErrorImpl::InvalidNumber { .. } => "InvalidNumber",
            ParseErrorImpl::InvalidOperator { .. } => "InvalidOperator",
            ParseErrorImpl::TrailingOperator { .. } => "TrailingOperator",
            ParseErrorImpl::UnterminatedString { .. } => "UnterminatedString",
        }
    }

    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ParseErrorImpl::InvalidExponent { .. } => ErrorTip::Suggestion(String::from(
                "An exponent marker must be followed by at least one digit",
            )),
            ParseErrorImpl::InvalidNumber { token } if token.chars().all(|c| c == '.') => {
                ErrorTip::Suggestion(String::from("A number needs at least one digit"))
            }
            ParseErrorImpl::InvalidNumber { .. } => ErrorTip::Suggestion(String::from(
                "Numbers cannot be directly followed by a letter",
            )),
            ParseErrorImpl::InvalidOperator { token } => ErrorTip::Suggestion(format!(
                "`{}` is not an allowed operator, enable it with `update_operators`",
                token
            )),
            ParseErrorImpl::TrailingOperator { .. } => ErrorTip::Suggestion(String::from(
                "An expression cannot end with an operator",
            )),
            ParseErrorImpl::UnterminatedString { .. } => ErrorTip::None,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.get_error_name(), self.internal_error)
    }
}

impl std::error::Error for ParseError {}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorImpl {
    #[error("invalid exponent in number {token:?}")]
    InvalidExponent { token: String },
    #[error("invalid number {token:?}")]
    InvalidNumber { token: String },
    #[error("invalid operator {token:?}")]
    InvalidOperator { token: String },
    #[error("trailing operator {token:?}")]
    TrailingOperator { token: String },
    #[error("unterminated string {token:?}")]
    UnterminatedString { token: String },
}

/// An evaluation failure: a well-formed token stream that cannot be reduced.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluateError {
    internal_error: EvaluateErrorImpl,
}

impl EvaluateError {
    pub fn new(error_impl: EvaluateErrorImpl) -> Self {
        EvaluateError {
            internal_error: error_impl,
        }
    }

    pub fn get_internal(&self) -> &EvaluateErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            EvaluateErrorImpl::ArgumentRange { .. } => "ArgumentRange",
            EvaluateErrorImpl::BadToken { .. } => "BadToken",
            EvaluateErrorImpl::DivideByZero { .. } => "DivideByZero",
            EvaluateErrorImpl::UndefinedSymbol { .. } => "UndefinedSymbol",
            EvaluateErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            EvaluateErrorImpl::MissingArguments { .. } => "MissingArguments",
        }
    }

    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            EvaluateErrorImpl::BadToken { expected, .. } if expected == ")" => {
                ErrorTip::Suggestion(String::from("Did you forget a closing parenthesis?"))
            }
            EvaluateErrorImpl::UndefinedSymbol { symbol } => ErrorTip::Suggestion(format!(
                "Define `{}` with `define_name` or `define_function` before evaluating",
                symbol
            )),
            _ => ErrorTip::None,
        }
    }
}

impl Display for EvaluateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.get_error_name(), self.internal_error)
    }
}

impl std::error::Error for EvaluateError {}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluateErrorImpl {
    #[error("at \"{call}\": {requirement}")]
    ArgumentRange { call: String, requirement: String },
    #[error("expected token with id {expected:?}, found {found:?}")]
    BadToken { expected: String, found: String },
    #[error("attempt to divide by 0 {context}")]
    DivideByZero { context: String },
    #[error("the symbol {symbol:?} is not defined")]
    UndefinedSymbol { symbol: String },
    #[error("{operation}: expected {expected}, received {received}")]
    TypeMismatch {
        operation: String,
        expected: String,
        received: String,
    },
    #[error("{function}: expected at least {expected} arguments, received {received}")]
    MissingArguments {
        function: String,
        expected: usize,
        received: usize,
    },
}

/// Either stage of `Evaluator::evaluate` on source text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Evaluate(#[from] EvaluateError),
}

impl Error {
    pub fn get_error_name(&self) -> &str {
        match self {
            Error::Parse(error) => error.get_error_name(),
            Error::Evaluate(error) => error.get_error_name(),
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match self {
            Error::Parse(error) => error.get_tip(),
            Error::Evaluate(error) => error.get_tip(),
        }
    }

    pub fn get_position(&self) -> Option<&Position> {
        match self {
            Error::Parse(error) => Some(error.get_position()),
            Error::Evaluate(_) => None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}
