//! Symbol table and Pratt parser.
//!
//! Tokens are turned into a tree of `Node`s by a precedence climbing parser.
//! Every symbol in the table carries a binding power and a kind that decides
//! its null denotation (prefix position) and left denotation (after a left
//! operand):
//!
//! - `lookups`: binding powers, symbol kinds, the symbol table and the built-in operator table
//! - `parser`: the per-evaluation cursor over a token sequence
//! - `expr`: the expression loop and the nud/led handlers

pub mod expr;
pub mod lookups;
pub mod parser;
