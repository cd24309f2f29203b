//! The evaluation cursor.
//!
//! A `Parser` walks one token sequence, turning each token into a node
//! derived from its symbol-table entry. It holds:
//! - The token sequence and the read position
//! - The active symbol (the node the cursor is positioned on)
//! - A shared borrow of the symbol table used for lookups
//!
//! Every evaluation builds its own `Parser`, so evaluations started from
//! inside a built-in function never disturb the outer cursor.

use std::rc::Rc;

use crate::{
    ast::{ast::Node, value::Value},
    errors::errors::{EvaluateError, EvaluateErrorImpl},
    lexer::tokens::{Token, TokenKind, TokenValue},
};

use super::lookups::{Symbol, SymbolTable, END_SYMBOL_ID, LITERAL_SYMBOL_ID};

/// Deepest expression tree a single evaluation may build.
pub const MAX_DEPTH: usize = 256;

pub struct Parser<'a> {
    /// The symbol table nodes are derived from
    symbols: &'a SymbolTable,
    /// The list of tokens to evaluate
    tokens: &'a [Token],
    /// Index of the next unread token
    pos: usize,
    /// The most recently derived node, not yet consumed into a subtree
    active: Node,
    /// Open sub-expressions plus operators chained onto them
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a cursor positioned on the first token.
    pub fn new(symbols: &'a SymbolTable, tokens: &'a [Token]) -> Result<Self, EvaluateError> {
        let mut pos = 0;
        let active = derive_next(symbols, tokens, &mut pos)?;

        Ok(Parser {
            symbols,
            tokens,
            pos,
            active,
            depth: 0,
        })
    }

    /// Returns the active node without advancing.
    pub fn active(&self) -> &Node {
        &self.active
    }

    /// Returns the id of the active node.
    pub fn active_id(&self) -> &str {
        self.active.id()
    }

    pub fn symbols(&self) -> &'a SymbolTable {
        self.symbols
    }

    /// Moves to the next token and returns the previously active node.
    ///
    /// Past the end of input the end sentinel is produced again, so advancing
    /// at the end is idempotent.
    pub fn advance(&mut self) -> Result<Node, EvaluateError> {
        let next = derive_next(self.symbols, self.tokens, &mut self.pos)?;
        log::trace!("advance: {} -> {}", self.active.id(), next.id());
        Ok(std::mem::replace(&mut self.active, next))
    }

    /// Advances only if the active node has id `expected_id`.
    pub fn expect(&mut self, expected_id: &str) -> Result<Node, EvaluateError> {
        if self.active.id() != expected_id {
            return Err(EvaluateError::new(EvaluateErrorImpl::BadToken {
                expected: expected_id.to_string(),
                found: self.active.id().to_string(),
            }));
        }

        self.advance()
    }

    /// Records one more level of tree depth, failing past `MAX_DEPTH`.
    pub fn descend(&mut self) -> Result<(), EvaluateError> {
        if self.depth >= MAX_DEPTH {
            return Err(EvaluateError::new(EvaluateErrorImpl::BadToken {
                expected: format!("at most {} nested expressions", MAX_DEPTH),
                found: self.active.id().to_string(),
            }));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn ascend(&mut self, levels: usize) {
        self.depth = self.depth.saturating_sub(levels);
    }

    /// Checks if there are more tokens to consume.
    pub fn has_tokens(&self) -> bool {
        self.active.id() != END_SYMBOL_ID
    }
}

/// Derives a node for the token at `pos`, or the end sentinel past the end.
fn derive_next(
    symbols: &SymbolTable,
    tokens: &[Token],
    pos: &mut usize,
) -> Result<Node, EvaluateError> {
    let token = match tokens.get(*pos) {
        Some(token) => token,
        None => return Ok(Node::derive(lookup(symbols, END_SYMBOL_ID)?)),
    };
    *pos += 1;

    match (&token.kind, &token.value) {
        (TokenKind::Number, TokenValue::Number(number)) => Ok(Node::literal(
            lookup(symbols, LITERAL_SYMBOL_ID)?,
            Value::Number(*number),
        )),
        (TokenKind::Number, TokenValue::Text(text)) => {
            Err(EvaluateError::new(EvaluateErrorImpl::BadToken {
                expected: "number".to_string(),
                found: text.clone(),
            }))
        }
        (TokenKind::String, value) => Ok(Node::literal(
            lookup(symbols, LITERAL_SYMBOL_ID)?,
            Value::String(value.to_string()),
        )),
        (TokenKind::Name | TokenKind::Operator, value) => {
            Ok(Node::derive(lookup(symbols, &value.to_string())?))
        }
    }
}

fn lookup<'a>(symbols: &'a SymbolTable, id: &str) -> Result<&'a Rc<Symbol>, EvaluateError> {
    symbols.get(id).ok_or_else(|| {
        EvaluateError::new(EvaluateErrorImpl::UndefinedSymbol {
            symbol: id.to_string(),
        })
    })
}
