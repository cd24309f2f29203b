use crate::{
    ast::{ast::Node, value::Value},
    errors::errors::{EvaluateError, EvaluateErrorImpl},
    lexer::tokens::Token,
    parser::lookups::{ArgumentMode, SymbolKind, LITERAL_SYMBOL_ID},
};

use super::evaluator::Evaluator;

/// The operands of one operator node, evaluated on demand.
///
/// Operands are only evaluated when an operator asks for them, so `?:` can
/// skip the branch it does not take.
pub struct Operands<'a> {
    node: &'a Node,
    evaluator: &'a Evaluator,
}

impl<'a> Operands<'a> {
    pub fn new(node: &'a Node, evaluator: &'a Evaluator) -> Self {
        Operands { node, evaluator }
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn evaluator(&self) -> &'a Evaluator {
        self.evaluator
    }

    /// The operator's spelling.
    pub fn id(&self) -> &'a str {
        self.node.id()
    }

    /// Set when an infix operator was used in prefix position.
    pub fn is_prefix(&self) -> bool {
        self.node.prefix
    }

    pub fn first(&self) -> Result<Value, EvaluateError> {
        self.operand(self.node.first.as_deref())
    }

    pub fn second(&self) -> Result<Value, EvaluateError> {
        self.operand(self.node.second.as_deref())
    }

    pub fn third(&self) -> Result<Value, EvaluateError> {
        self.operand(self.node.third.as_deref())
    }

    fn operand(&self, node: Option<&Node>) -> Result<Value, EvaluateError> {
        match node {
            Some(node) => node.evaluate(self.evaluator),
            None => Err(EvaluateError::new(EvaluateErrorImpl::BadToken {
                expected: "operand".to_string(),
                found: self.node.id().to_string(),
            })),
        }
    }
}

/// The context a function symbol is evaluated in.
///
/// Gives built-in and user functions their own name for error messages, and
/// a handle on the evaluator for calling other functions by name.
pub struct FunctionCall<'a> {
    name: &'a str,
    evaluator: &'a Evaluator,
}

impl<'a> FunctionCall<'a> {
    pub fn new(name: &'a str, evaluator: &'a Evaluator) -> Self {
        FunctionCall { name, evaluator }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn evaluator(&self) -> &'a Evaluator {
        self.evaluator
    }

    /// Returns the argument at `index` or fails with `MissingArguments`.
    pub fn arg<'v>(&self, args: &'v [Value], index: usize) -> Result<&'v Value, EvaluateError> {
        args.get(index).ok_or_else(|| {
            EvaluateError::new(EvaluateErrorImpl::MissingArguments {
                function: self.name.to_string(),
                expected: index + 1,
                received: args.len(),
            })
        })
    }

    pub fn number_arg(&self, args: &[Value], index: usize) -> Result<f64, EvaluateError> {
        self.arg(args, index)?.as_number(self.name)
    }

    pub fn array_arg<'v>(&self, args: &'v [Value], index: usize) -> Result<&'v [Value], EvaluateError> {
        self.arg(args, index)?.as_array(self.name)
    }

    pub fn str_arg<'v>(&self, args: &'v [Value], index: usize) -> Result<&'v str, EvaluateError> {
        self.arg(args, index)?.as_str(self.name)
    }

    /// Reads every argument as a number.
    pub fn numbers(&self, args: &[Value]) -> Result<Vec<f64>, EvaluateError> {
        args.iter().map(|value| value.as_number(self.name)).collect()
    }

    /// Spells the call with its argument values, e.g. `mod(5, 0)`.
    pub fn describe(&self, args: &[Value]) -> String {
        let rendered: Vec<String> = args.iter().map(render_argument).collect();
        format!("{}({})", self.name, rendered.join(", "))
    }

    /// Builds an `ArgumentRange` failure that quotes the call, e.g.
    /// `at "sqrt(-1)": argument must be greater than 0`.
    pub fn range_error(&self, args: &[Value], requirement: &str) -> EvaluateError {
        EvaluateError::new(EvaluateErrorImpl::ArgumentRange {
            call: self.describe(args),
            requirement: requirement.to_string(),
        })
    }

    pub fn divide_by_zero(&self, args: &[Value]) -> EvaluateError {
        EvaluateError::new(EvaluateErrorImpl::DivideByZero {
            context: format!("at \"{}\"", self.describe(args)),
        })
    }

    /// Evaluates `function(args...)` in a nested evaluation with its own cursor.
    pub fn call(&self, function: &str, args: &[Value]) -> Result<Value, EvaluateError> {
        let mut tokens = vec![Token::name(function), Token::operator("(")];
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                tokens.push(Token::operator(","));
            }
            push_value_tokens(&mut tokens, arg);
        }
        tokens.push(Token::operator(")"));

        log::trace!("{} calls {} with {} arguments", self.name, function, args.len());
        self.evaluator.evaluate_tokens(&tokens)
    }
}

fn render_argument(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{:?}", s),
        Value::Array(values) => {
            let parts: Vec<String> = values.iter().map(render_argument).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Number(n) => n.to_string(),
    }
}

/// Spells `value` back as the tokens of a literal.
fn push_value_tokens(tokens: &mut Vec<Token>, value: &Value) {
    match value {
        Value::Number(n) => tokens.push(Token::number(*n)),
        Value::String(s) => tokens.push(Token::string(s.as_str())),
        Value::Array(values) => {
            tokens.push(Token::operator("["));
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    tokens.push(Token::operator(","));
                }
                push_value_tokens(tokens, value);
            }
            tokens.push(Token::operator("]"));
        }
    }
}

impl Node {
    pub fn evaluate(&self, evaluator: &Evaluator) -> Result<Value, EvaluateError> {
        self.evaluate_with(evaluator, None)
    }

    /// Evaluates the node, handing `receiver` to a function as its leading
    /// value. This is how `a.f(b)` becomes `f(a, b)`.
    pub fn evaluate_with(
        &self,
        evaluator: &Evaluator,
        receiver: Option<Value>,
    ) -> Result<Value, EvaluateError> {
        let symbol = self.symbol();

        if receiver.is_some() && !matches!(symbol.kind, SymbolKind::Function { .. }) {
            return Err(EvaluateError::new(EvaluateErrorImpl::TypeMismatch {
                operation: ".".to_string(),
                expected: "function".to_string(),
                received: symbol.kind.name().to_string(),
            }));
        }

        match &symbol.kind {
            SymbolKind::Punctuation => Err(EvaluateError::new(EvaluateErrorImpl::BadToken {
                expected: "expression".to_string(),
                found: self.id().to_string(),
            })),
            SymbolKind::Literal => self.value.clone().ok_or_else(|| {
                EvaluateError::new(EvaluateErrorImpl::BadToken {
                    expected: LITERAL_SYMBOL_ID.to_string(),
                    found: self.id().to_string(),
                })
            }),
            SymbolKind::Constant(value) => Ok(value.clone()),
            SymbolKind::Prefix { eval, .. }
            | SymbolKind::Infix { eval, .. }
            | SymbolKind::InfixRight { eval } => eval(&Operands::new(self, evaluator)),
            SymbolKind::Function { eval, arguments } => {
                let mut values = Vec::with_capacity(self.args.len() + 1);
                values.extend(receiver);
                for arg in &self.args {
                    values.push(arg.evaluate(evaluator)?);
                }

                if *arguments == ArgumentMode::Spread {
                    if let Some(Value::Array(_)) = values.first() {
                        let mut rest = values.split_off(1);
                        if let Some(Value::Array(elements)) = values.pop() {
                            values = elements;
                        }
                        values.append(&mut rest);
                    }
                }

                eval(&FunctionCall::new(self.id(), evaluator), &values)
            }
        }
    }
}
