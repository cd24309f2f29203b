//! Evaluation of parsed expressions.
//!
//! This module contains the public `Evaluator` and everything it needs to
//! reduce a tree of nodes to a value:
//!
//! - `evaluator`: symbol definition protocol and the evaluate entry points
//! - `expr`: node reduction, operand access and function call context
//! - `operators`: the built-in operator behaviors
//! - `stdlib`: the built-in constants and functions

pub mod evaluator;
pub mod expr;
pub mod operators;
pub mod stdlib;

#[cfg(test)]
mod tests;
