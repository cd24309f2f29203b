//! Error types and error handling for the expression engine.
//!
//! This module defines the two failure taxonomies:
//!
//! - Parse errors raised while tokenizing source text, with the position
//!   of the offending token
//! - Evaluate errors raised while walking the token stream or reducing
//!   the resulting tree
//! - A crate-level error joining both for callers that hand in raw text

pub mod errors;
