//! Utility macros for the expression engine.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_MATH_FN!` - Registers a single-argument numeric function
//!
//! These macros reduce boilerplate in the lexer and the built-in library.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's value (anything convertible into a TokenValue)
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, 42.0);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr) => {
        $crate::lexer::tokens::Token {
            kind: $kind,
            value: $crate::lexer::tokens::TokenValue::from($value),
        }
    };
}

/// Registers a function that reads one numeric argument and applies `$body`.
///
/// # Arguments
///
/// * `$evaluator` - The Evaluator to register into
/// * `$name` - The function name
/// * `$body` - An expression of type `fn(f64) -> f64`
///
/// # Example
///
/// ```ignore
/// MK_MATH_FN!(evaluator, "abs", f64::abs);
/// ```
#[macro_export]
macro_rules! MK_MATH_FN {
    ($evaluator:expr, $name:literal, $body:expr) => {
        $evaluator.define_function($name, |call, args| {
            let x = call.number_arg(args, 0)?;
            Ok($crate::ast::value::Value::Number(($body)(x)))
        })
    };
}
