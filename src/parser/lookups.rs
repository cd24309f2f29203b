use std::{collections::HashMap, fmt::Debug, rc::Rc};

use crate::{
    ast::{ast::Node, value::Value},
    errors::errors::EvaluateError,
    evaluator::{
        evaluator::Evaluator,
        expr::{FunctionCall, Operands},
        operators::*,
    },
};

use super::{expr::*, parser::Parser};

pub type BindingPower = u32;

pub const DEFAULT_BP: BindingPower = 0;
pub const TERNARY_BP: BindingPower = 20;
pub const LOGICAL_BP: BindingPower = 30;
pub const RELATIONAL_BP: BindingPower = 40;
pub const ADDITIVE_BP: BindingPower = 50;
pub const MULTIPLICATIVE_BP: BindingPower = 60;
pub const EXPONENT_BP: BindingPower = 70;
/// Power at which prefix operators parse their operand.
pub const UNARY_BP: BindingPower = 70;
pub const MEMBER_BP: BindingPower = 80;

pub const END_SYMBOL_ID: &str = "(end)";
pub const LITERAL_SYMBOL_ID: &str = "(literal)";

pub type NUDHandler = Rc<dyn Fn(&mut Parser<'_>, Node) -> Result<Node, EvaluateError>>;
pub type LEDHandler = Rc<dyn Fn(&mut Parser<'_>, Node, Node) -> Result<Node, EvaluateError>>;
pub type OperatorHandler = Rc<dyn Fn(&Operands<'_>) -> Result<Value, EvaluateError>>;
pub type FunctionHandler = Rc<dyn Fn(&FunctionCall<'_>, &[Value]) -> Result<Value, EvaluateError>>;

/// How a function symbol turns its parsed arguments into values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentMode {
    /// Bare `()`; only a dot-syntax receiver is passed.
    None,
    /// If the first value is an array its elements replace it.
    Spread,
    /// Values are passed exactly as written.
    Exact,
}

pub enum SymbolKind {
    /// Pure punctuation and the end-of-input sentinel.
    Punctuation,
    /// Number and string tokens; the value lives on the node.
    Literal,
    Constant(Value),
    Prefix {
        eval: OperatorHandler,
        nud: Option<NUDHandler>,
    },
    Infix {
        eval: OperatorHandler,
        led: Option<LEDHandler>,
        nud: Option<NUDHandler>,
    },
    InfixRight {
        eval: OperatorHandler,
    },
    Function {
        eval: FunctionHandler,
        arguments: ArgumentMode,
    },
}

impl SymbolKind {
    pub fn name(&self) -> &'static str {
        match self {
            SymbolKind::Punctuation => "punctuation",
            SymbolKind::Literal => "literal",
            SymbolKind::Constant(_) => "constant",
            SymbolKind::Prefix { .. } => "prefix",
            SymbolKind::Infix { .. } => "infix",
            SymbolKind::InfixRight { .. } => "infix-right",
            SymbolKind::Function { .. } => "function",
        }
    }
}

/// The canonical definition stored in the symbol table.
pub struct Symbol {
    pub id: String,
    pub lbp: BindingPower,
    pub kind: SymbolKind,
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Symbol")
            .field("id", &self.id)
            .field("lbp", &self.lbp)
            .field("kind", &self.kind.name())
            .finish()
    }
}

#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    symbols: HashMap<String, Rc<Symbol>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Registers `symbol`, replacing any previous definition with the same id.
    pub fn define(&mut self, symbol: Symbol) {
        self.symbols.insert(symbol.id.clone(), Rc::new(symbol));
    }

    pub fn get(&self, id: &str) -> Option<&Rc<Symbol>> {
        self.symbols.get(id)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.symbols.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Registers the structural symbols every evaluator needs: punctuation,
/// the end and literal sentinels, and parenthesized grouping.
pub fn create_structural_lookups(evaluator: &mut Evaluator) {
    for id in [":", ",", ")", "]", "}", END_SYMBOL_ID] {
        evaluator.define_simple(id);
    }
    evaluator.define_symbol(Symbol {
        id: LITERAL_SYMBOL_ID.to_string(),
        lbp: DEFAULT_BP,
        kind: SymbolKind::Literal,
    });

    evaluator.define_prefix_operator(
        "(",
        PrefixOperator::new(eval_first).with_nud(parse_grouping_expr(")")),
    );
}

/// Registers the built-in operator table.
pub fn create_operator_lookups(evaluator: &mut Evaluator) {
    // Prefix
    evaluator.define_prefix_operator("!", PrefixOperator::new(eval_not));
    evaluator.define_prefix_operator(
        "[",
        PrefixOperator::new(eval_array).with_nud(Rc::new(parse_array_expr)),
    );
    evaluator.define_prefix_operator(
        "{",
        PrefixOperator::new(eval_first).with_nud(parse_grouping_expr("}")),
    );

    // Member
    evaluator.define_infix_operator(".", MEMBER_BP, InfixOperator::new(eval_member));

    // Additive, multiplicative and exponent
    evaluator.define_infix_operator("+", ADDITIVE_BP, InfixOperator::new(eval_add));
    evaluator.define_infix_operator(
        "-",
        ADDITIVE_BP,
        InfixOperator::new(eval_subtract).with_nud(Rc::new(parse_negation_expr)),
    );
    evaluator.define_infix_operator("*", MULTIPLICATIVE_BP, InfixOperator::new(eval_multiply));
    evaluator.define_infix_operator("/", MULTIPLICATIVE_BP, InfixOperator::new(eval_divide));
    evaluator.define_infix_operator("%", MULTIPLICATIVE_BP, InfixOperator::new(eval_modulo));
    evaluator.define_infix_operator("^", EXPONENT_BP, InfixOperator::new(eval_power));

    // Relational
    evaluator.define_infix_operator("==", RELATIONAL_BP, InfixOperator::new(eval_equals));
    evaluator.define_infix_operator("!=", RELATIONAL_BP, InfixOperator::new(eval_not_equals));
    evaluator.define_infix_operator("<", RELATIONAL_BP, InfixOperator::new(eval_less));
    evaluator.define_infix_operator("<=", RELATIONAL_BP, InfixOperator::new(eval_less_equals));
    evaluator.define_infix_operator(">", RELATIONAL_BP, InfixOperator::new(eval_greater));
    evaluator.define_infix_operator(">=", RELATIONAL_BP, InfixOperator::new(eval_greater_equals));

    // Ternary
    evaluator.define_infix_operator(
        "?",
        TERNARY_BP,
        InfixOperator::new(eval_ternary).with_led(Rc::new(parse_ternary_expr)),
    );

    // Logical
    evaluator.define_infix_operator_right_assoc("&&", LOGICAL_BP, eval_and);
    evaluator.define_infix_operator_right_assoc("||", LOGICAL_BP, eval_or);
}

/// Behaviors of a user-defined prefix operator.
pub struct PrefixOperator {
    pub eval: OperatorHandler,
    pub nud: Option<NUDHandler>,
}

impl PrefixOperator {
    pub fn new<F>(eval: F) -> Self
    where
        F: Fn(&Operands<'_>) -> Result<Value, EvaluateError> + 'static,
    {
        PrefixOperator {
            eval: Rc::new(eval),
            nud: None,
        }
    }

    pub fn with_nud(mut self, nud: NUDHandler) -> Self {
        self.nud = Some(nud);
        self
    }
}

/// Behaviors of a user-defined infix operator.
pub struct InfixOperator {
    pub eval: OperatorHandler,
    pub led: Option<LEDHandler>,
    pub nud: Option<NUDHandler>,
}

impl InfixOperator {
    pub fn new<F>(eval: F) -> Self
    where
        F: Fn(&Operands<'_>) -> Result<Value, EvaluateError> + 'static,
    {
        InfixOperator {
            eval: Rc::new(eval),
            led: None,
            nud: None,
        }
    }

    pub fn with_led(mut self, led: LEDHandler) -> Self {
        self.led = Some(led);
        self
    }

    pub fn with_nud(mut self, nud: NUDHandler) -> Self {
        self.nud = Some(nud);
        self
    }
}

/// Boxes a closure as an operator handler for the batch definition methods.
pub fn operator_handler<F>(eval: F) -> OperatorHandler
where
    F: Fn(&Operands<'_>) -> Result<Value, EvaluateError> + 'static,
{
    Rc::new(eval)
}

/// Boxes a closure as a function handler for the batch definition methods.
pub fn function_handler<F>(eval: F) -> FunctionHandler
where
    F: Fn(&FunctionCall<'_>, &[Value]) -> Result<Value, EvaluateError> + 'static,
{
    Rc::new(eval)
}
