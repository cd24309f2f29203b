use std::{fmt::Debug, rc::Rc};

use crate::parser::lookups::{BindingPower, Symbol};

use super::value::Value;

/// One use of a symbol in an expression.
///
/// A node is derived from the canonical table entry for its id and owns the
/// operands captured while parsing, so nested or recursive uses of the same
/// symbol never share state and the table entry itself is never mutated.
#[derive(Clone)]
pub struct Node {
    symbol: Rc<Symbol>,
    /// Literal payload of number and string tokens.
    pub value: Option<Value>,
    pub first: Option<Box<Node>>,
    pub second: Option<Box<Node>>,
    pub third: Option<Box<Node>>,
    /// Function arguments or array elements, in source order.
    pub args: Vec<Node>,
    /// Set when an infix symbol was used in prefix position (unary minus).
    pub prefix: bool,
}

impl Node {
    pub fn derive(symbol: &Rc<Symbol>) -> Self {
        Node {
            symbol: Rc::clone(symbol),
            value: None,
            first: None,
            second: None,
            third: None,
            args: vec![],
            prefix: false,
        }
    }

    pub fn literal(symbol: &Rc<Symbol>, value: Value) -> Self {
        let mut node = Node::derive(symbol);
        node.value = Some(value);
        node
    }

    pub fn symbol(&self) -> &Rc<Symbol> {
        &self.symbol
    }

    pub fn id(&self) -> &str {
        &self.symbol.id
    }

    pub fn lbp(&self) -> BindingPower {
        self.symbol.lbp
    }

    pub fn set_first(&mut self, node: Node) {
        self.first = Some(Box::new(node));
    }

    pub fn set_second(&mut self, node: Node) {
        self.second = Some(Box::new(node));
    }

    pub fn set_third(&mut self, node: Node) {
        self.third = Some(Box::new(node));
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("Node");
        debug.field("id", &self.symbol.id);
        if let Some(value) = &self.value {
            debug.field("value", value);
        }
        if let Some(first) = &self.first {
            debug.field("first", first);
        }
        if let Some(second) = &self.second {
            debug.field("second", second);
        }
        if let Some(third) = &self.third {
            debug.field("third", third);
        }
        if !self.args.is_empty() {
            debug.field("args", &self.args);
        }
        if self.prefix {
            debug.field("prefix", &self.prefix);
        }
        debug.finish()
    }
}
