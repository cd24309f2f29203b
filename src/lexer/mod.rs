//! Lexical analysis module for the expression engine.
//!
//! This module contains the tokenizer that converts source text into a
//! sequence of typed tokens for evaluation. It handles:
//!
//! - A single left-to-right scan dispatched on character class
//! - Names, numeric literals (with fraction and exponent), quoted strings
//! - Greedy matching of multi-character operators against a configurable set
//! - Token positions in error reports

pub mod lexer;
pub mod operators;
pub mod tokens;
