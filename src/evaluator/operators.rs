use std::cmp::Ordering;

use crate::{
    ast::value::Value,
    errors::errors::{EvaluateError, EvaluateErrorImpl},
};

use super::expr::Operands;

/// Grouping: `(a)` and `{a}`.
pub fn eval_first(operands: &Operands) -> Result<Value, EvaluateError> {
    operands.first()
}

pub fn eval_not(operands: &Operands) -> Result<Value, EvaluateError> {
    Ok(Value::from(!operands.first()?.is_positive()))
}

pub fn eval_array(operands: &Operands) -> Result<Value, EvaluateError> {
    let evaluator = operands.evaluator();
    let elements = operands
        .node()
        .args
        .iter()
        .map(|element| element.evaluate(evaluator))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Value::Array(elements))
}

/// `a.f(b)`: evaluates `a` and hands it to `f` as its leading value.
pub fn eval_member(operands: &Operands) -> Result<Value, EvaluateError> {
    let receiver = operands.first()?;
    let function = operands.node().second.as_deref().ok_or_else(|| {
        EvaluateError::new(EvaluateErrorImpl::BadToken {
            expected: "function".to_string(),
            found: operands.id().to_string(),
        })
    })?;

    function.evaluate_with(operands.evaluator(), Some(receiver))
}

/// Adds numbers; concatenates when either side is a string.
pub fn eval_add(operands: &Operands) -> Result<Value, EvaluateError> {
    match (operands.first()?, operands.second()?) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (a @ Value::String(_), b) | (a, b @ Value::String(_)) => {
            Ok(Value::String(format!("{}{}", a, b)))
        }
        (a, b) => {
            let offending = if a.is_array() { a } else { b };
            offending.as_number(operands.id()).map(Value::Number)
        }
    }
}

/// Binary subtraction, or negation when used in prefix position.
pub fn eval_subtract(operands: &Operands) -> Result<Value, EvaluateError> {
    let a = operands.first()?.as_number(operands.id())?;

    if operands.is_prefix() {
        return Ok(Value::Number(-a));
    }

    let b = operands.second()?.as_number(operands.id())?;
    Ok(Value::Number(a - b))
}

pub fn eval_multiply(operands: &Operands) -> Result<Value, EvaluateError> {
    let (a, b) = numbers(operands)?;
    Ok(Value::Number(a * b))
}

pub fn eval_divide(operands: &Operands) -> Result<Value, EvaluateError> {
    let (a, b) = numbers(operands)?;
    check_divisor(operands, b)?;
    Ok(Value::Number(a / b))
}

pub fn eval_modulo(operands: &Operands) -> Result<Value, EvaluateError> {
    let (a, b) = numbers(operands)?;
    check_divisor(operands, b)?;
    Ok(Value::Number(a % b))
}

pub fn eval_power(operands: &Operands) -> Result<Value, EvaluateError> {
    let (a, b) = numbers(operands)?;
    Ok(Value::Number(a.powf(b)))
}

pub fn eval_equals(operands: &Operands) -> Result<Value, EvaluateError> {
    Ok(Value::from(operands.first()? == operands.second()?))
}

pub fn eval_not_equals(operands: &Operands) -> Result<Value, EvaluateError> {
    Ok(Value::from(operands.first()? != operands.second()?))
}

pub fn eval_less(operands: &Operands) -> Result<Value, EvaluateError> {
    compare(operands, |ordering| ordering == Ordering::Less)
}

pub fn eval_less_equals(operands: &Operands) -> Result<Value, EvaluateError> {
    compare(operands, |ordering| ordering != Ordering::Greater)
}

pub fn eval_greater(operands: &Operands) -> Result<Value, EvaluateError> {
    compare(operands, |ordering| ordering == Ordering::Greater)
}

pub fn eval_greater_equals(operands: &Operands) -> Result<Value, EvaluateError> {
    compare(operands, |ordering| ordering != Ordering::Less)
}

/// `c ? a : b`; only the chosen branch is evaluated.
pub fn eval_ternary(operands: &Operands) -> Result<Value, EvaluateError> {
    if operands.first()?.is_truthy() {
        operands.second()
    } else {
        operands.third()
    }
}

/// The right side is only evaluated when the left side is truthy.
pub fn eval_and(operands: &Operands) -> Result<Value, EvaluateError> {
    if !operands.first()?.is_truthy() {
        return Ok(Value::from(false));
    }
    Ok(Value::from(operands.second()?.is_truthy()))
}

/// The right side is only evaluated when the left side is falsy.
pub fn eval_or(operands: &Operands) -> Result<Value, EvaluateError> {
    if operands.first()?.is_truthy() {
        return Ok(Value::from(true));
    }
    Ok(Value::from(operands.second()?.is_truthy()))
}

fn numbers(operands: &Operands) -> Result<(f64, f64), EvaluateError> {
    let a = operands.first()?.as_number(operands.id())?;
    let b = operands.second()?.as_number(operands.id())?;
    Ok((a, b))
}

fn check_divisor(operands: &Operands, divisor: f64) -> Result<(), EvaluateError> {
    if divisor == 0.0 {
        return Err(EvaluateError::new(EvaluateErrorImpl::DivideByZero {
            context: format!("using the {:?} operator", operands.id()),
        }));
    }
    Ok(())
}

/// Incomparable numbers (NaN) compare false under every operator.
fn compare<F>(operands: &Operands, accept: F) -> Result<Value, EvaluateError>
where
    F: Fn(Ordering) -> bool,
{
    let a = operands.first()?;
    let b = operands.second()?;
    let ordering = a.compare(&b, operands.id())?;

    Ok(Value::from(ordering.map_or(false, accept)))
}
