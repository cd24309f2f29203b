//! Expression tree and value types.
//!
//! - `Node`: one use of a symbol, holding the operands captured while parsing
//! - `Value`: what a node evaluates to (number, string or array)

pub mod ast;
pub mod value;
