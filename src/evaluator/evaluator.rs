//! The evaluator: owner of the symbol table and the tokenizer.
//!
//! This module contains the `Evaluator` structure and its definition
//! protocol. Evaluating a source builds a fresh cursor over its tokens,
//! parses one expression with the Pratt loop and reduces the resulting tree.

use std::rc::Rc;

use crate::{
    ast::value::Value,
    errors::errors::{Error, EvaluateError, EvaluateErrorImpl},
    lexer::{lexer::Tokenizer, tokens::Token},
    parser::{
        expr::parse_expr,
        lookups::{
            create_operator_lookups, create_structural_lookups, ArgumentMode, BindingPower,
            FunctionHandler, InfixOperator, OperatorHandler, PrefixOperator, Symbol, SymbolKind,
            SymbolTable, DEFAULT_BP, END_SYMBOL_ID,
        },
        parser::Parser,
    },
};

use super::{
    expr::{FunctionCall, Operands},
    stdlib::create_stdlib,
};

/// Input accepted by `Evaluator::evaluate`: source text or an already
/// tokenized sequence.
#[derive(Debug, Clone, Copy)]
pub enum Source<'s> {
    Text(&'s str),
    Tokens(&'s [Token]),
}

impl<'s> From<&'s str> for Source<'s> {
    fn from(text: &'s str) -> Self {
        Source::Text(text)
    }
}

impl<'s> From<&'s String> for Source<'s> {
    fn from(text: &'s String) -> Self {
        Source::Text(text)
    }
}

impl<'s> From<&'s [Token]> for Source<'s> {
    fn from(tokens: &'s [Token]) -> Self {
        Source::Tokens(tokens)
    }
}

impl<'s> From<&'s Vec<Token>> for Source<'s> {
    fn from(tokens: &'s Vec<Token>) -> Self {
        Source::Tokens(tokens)
    }
}

/// The expression evaluator.
///
/// Holds the symbol table every evaluation looks symbols up in, and the
/// tokenizer used when it is handed source text. Cursor state never lives
/// here, so built-in functions can evaluate nested expressions through a
/// shared reference while an outer evaluation is in progress.
#[derive(Debug, Clone)]
pub struct Evaluator {
    /// Canonical symbol definitions by id
    symbol_table: SymbolTable,
    /// Tokenizer used for text sources
    tokenizer: Tokenizer,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

impl Evaluator {
    /// Creates an evaluator with the built-in operators, constants and functions.
    pub fn new() -> Self {
        let mut evaluator = Evaluator::empty();
        create_operator_lookups(&mut evaluator);
        create_stdlib(&mut evaluator);

        log::debug!("evaluator ready with {} symbols", evaluator.symbol_table.len());
        evaluator
    }

    /// Creates an evaluator that only knows literals, grouping and punctuation.
    pub fn empty() -> Self {
        let mut evaluator = Evaluator {
            symbol_table: SymbolTable::new(),
            tokenizer: Tokenizer::new(),
        };
        create_structural_lookups(&mut evaluator);
        evaluator
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbol_table
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Merges operator overrides into the tokenizer, so a newly defined
    /// operator symbol can also be spelled in source text.
    pub fn update_operators<I, K>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        self.tokenizer.update_operators(overrides);
    }

    /// Evaluates source text or a token sequence.
    pub fn evaluate<'s>(&self, source: impl Into<Source<'s>>) -> Result<Value, Error> {
        match source.into() {
            Source::Text(text) => {
                let tokens = self.tokenizer.tokenize(text)?;
                Ok(self.evaluate_tokens(&tokens)?)
            }
            Source::Tokens(tokens) => Ok(self.evaluate_tokens(tokens)?),
        }
    }

    /// Defines every entry of `names` as a constant, then evaluates `source`.
    ///
    /// The names stay defined after the call returns.
    pub fn evaluate_with_names<'s, I, K, V>(
        &mut self,
        source: impl Into<Source<'s>>,
        names: I,
    ) -> Result<Value, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.define_names(names);
        self.evaluate(source)
    }

    /// Parses and reduces one expression from `tokens`.
    ///
    /// Every call gets its own cursor, which makes this safe to call from
    /// inside a function that is itself being evaluated.
    pub fn evaluate_tokens(&self, tokens: &[Token]) -> Result<Value, EvaluateError> {
        log::debug!("evaluating {} tokens", tokens.len());

        let mut parser = Parser::new(&self.symbol_table, tokens)?;
        let root = parse_expr(&mut parser, DEFAULT_BP)?;

        if parser.has_tokens() {
            return Err(EvaluateError::new(EvaluateErrorImpl::BadToken {
                expected: END_SYMBOL_ID.to_string(),
                found: parser.active_id().to_string(),
            }));
        }

        let value = root.evaluate(self)?;
        log::debug!("evaluated to {}", value);
        Ok(value)
    }

    /// Registers `symbol`, replacing any previous definition with its id.
    pub fn define_symbol(&mut self, symbol: Symbol) {
        log::debug!("defining {} symbol {:?}", symbol.kind.name(), symbol.id);
        self.symbol_table.define(symbol);
    }

    /// Registers a placeholder with no behavior, used for punctuation.
    pub fn define_simple(&mut self, id: impl Into<String>) {
        self.define_symbol(Symbol {
            id: id.into(),
            lbp: DEFAULT_BP,
            kind: SymbolKind::Punctuation,
        });
    }

    /// Registers a constant that always evaluates to `value`.
    pub fn define_name(&mut self, id: impl Into<String>, value: impl Into<Value>) {
        self.define_symbol(Symbol {
            id: id.into(),
            lbp: DEFAULT_BP,
            kind: SymbolKind::Constant(value.into()),
        });
    }

    pub fn define_names<I, K, V>(&mut self, names: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (id, value) in names {
            self.define_name(id, value);
        }
    }

    /// Registers a function called as `id(a, b, ...)`.
    ///
    /// When the first value is an array its elements replace it, so
    /// `sum(1, 2, 3)` and `sum([1, 2, 3])` hand the same values to `eval`.
    pub fn define_function<F>(&mut self, id: impl Into<String>, eval: F)
    where
        F: Fn(&FunctionCall<'_>, &[Value]) -> Result<Value, EvaluateError> + 'static,
    {
        self.define_function_with_mode(id, Rc::new(eval), ArgumentMode::Spread);
    }

    /// Registers a function called with bare parentheses, `id()`.
    pub fn define_function_no_args<F>(&mut self, id: impl Into<String>, eval: F)
    where
        F: Fn(&FunctionCall<'_>, &[Value]) -> Result<Value, EvaluateError> + 'static,
    {
        self.define_function_with_mode(id, Rc::new(eval), ArgumentMode::None);
    }

    /// Registers a function whose values are passed exactly as written,
    /// typically with an array first, as in `[1, 2].sumA()` or `sumA([1, 2])`.
    pub fn define_array_function<F>(&mut self, id: impl Into<String>, eval: F)
    where
        F: Fn(&FunctionCall<'_>, &[Value]) -> Result<Value, EvaluateError> + 'static,
    {
        self.define_function_with_mode(id, Rc::new(eval), ArgumentMode::Exact);
    }

    pub fn define_functions<I, K>(&mut self, functions: I)
    where
        I: IntoIterator<Item = (K, FunctionHandler)>,
        K: Into<String>,
    {
        for (id, eval) in functions {
            self.define_function_with_mode(id, eval, ArgumentMode::Spread);
        }
    }

    pub fn define_function_with_mode(
        &mut self,
        id: impl Into<String>,
        eval: FunctionHandler,
        arguments: ArgumentMode,
    ) {
        self.define_symbol(Symbol {
            id: id.into(),
            lbp: DEFAULT_BP,
            kind: SymbolKind::Function { eval, arguments },
        });
    }

    /// Registers a left-associative infix operator with binding power `lbp`.
    pub fn define_infix_operator(
        &mut self,
        id: impl Into<String>,
        lbp: BindingPower,
        operator: InfixOperator,
    ) {
        self.define_symbol(Symbol {
            id: id.into(),
            lbp,
            kind: SymbolKind::Infix {
                eval: operator.eval,
                led: operator.led,
                nud: operator.nud,
            },
        });
    }

    pub fn define_infix_operators<I, K>(&mut self, operators: I)
    where
        I: IntoIterator<Item = (K, BindingPower, InfixOperator)>,
        K: Into<String>,
    {
        for (id, lbp, operator) in operators {
            self.define_infix_operator(id, lbp, operator);
        }
    }

    /// Registers an infix operator whose chains group from the right.
    pub fn define_infix_operator_right_assoc<F>(
        &mut self,
        id: impl Into<String>,
        lbp: BindingPower,
        eval: F,
    ) where
        F: Fn(&Operands<'_>) -> Result<Value, EvaluateError> + 'static,
    {
        self.define_infix_operator_right_assoc_handler(id, lbp, Rc::new(eval));
    }

    pub fn define_infix_operators_right_assoc<I, K>(&mut self, operators: I)
    where
        I: IntoIterator<Item = (K, BindingPower, OperatorHandler)>,
        K: Into<String>,
    {
        for (id, lbp, eval) in operators {
            self.define_infix_operator_right_assoc_handler(id, lbp, eval);
        }
    }

    fn define_infix_operator_right_assoc_handler(
        &mut self,
        id: impl Into<String>,
        lbp: BindingPower,
        eval: OperatorHandler,
    ) {
        self.define_symbol(Symbol {
            id: id.into(),
            lbp,
            kind: SymbolKind::InfixRight { eval },
        });
    }

    /// Registers a prefix operator. Without a custom null denotation it
    /// parses a single operand.
    pub fn define_prefix_operator(&mut self, id: impl Into<String>, operator: PrefixOperator) {
        self.define_symbol(Symbol {
            id: id.into(),
            lbp: DEFAULT_BP,
            kind: SymbolKind::Prefix {
                eval: operator.eval,
                nud: operator.nud,
            },
        });
    }

    pub fn define_prefix_operators<I, K>(&mut self, operators: I)
    where
        I: IntoIterator<Item = (K, PrefixOperator)>,
        K: Into<String>,
    {
        for (id, operator) in operators {
            self.define_prefix_operator(id, operator);
        }
    }

    /// Removes a symbol; returns whether it was defined.
    pub fn delete_symbol(&mut self, id: &str) -> bool {
        let existed = self.symbol_table.remove(id);
        log::debug!("deleting symbol {:?} (defined: {})", id, existed);
        existed
    }
}
