//! The built-in library.
//!
//! Registers the constants, the numeric functions (which accept either
//! separate arguments or a single array) and the array functions (which
//! take an array first and are usually called with dot syntax, as in
//! `[1, 2, 3].sumA()`).

use std::f64::consts;

use crate::{
    ast::value::Value,
    errors::errors::EvaluateError,
    MK_MATH_FN,
};

use super::{evaluator::Evaluator, expr::FunctionCall};

pub fn create_stdlib(evaluator: &mut Evaluator) {
    define_constants(evaluator);
    define_math_functions(evaluator);
    define_logic_functions(evaluator);
    define_aggregate_functions(evaluator);
    define_random_functions(evaluator);
    define_array_functions(evaluator);
}

fn define_constants(evaluator: &mut Evaluator) {
    evaluator.define_names([
        ("FALSE", 0.0),
        ("TRUE", 1.0),
        ("false", 0.0),
        ("true", 1.0),
        ("E", consts::E),
        ("LN2", consts::LN_2),
        ("LN10", consts::LN_10),
        ("PI", consts::PI),
        ("SQRT1_2", consts::FRAC_1_SQRT_2),
        ("SQRT2", consts::SQRT_2),
    ]);
}

fn define_math_functions(evaluator: &mut Evaluator) {
    MK_MATH_FN!(evaluator, "abs", f64::abs);
    MK_MATH_FN!(evaluator, "ceiling", f64::ceil);
    MK_MATH_FN!(evaluator, "cos", f64::cos);
    MK_MATH_FN!(evaluator, "exp", f64::exp);
    MK_MATH_FN!(evaluator, "fac", factorial);
    MK_MATH_FN!(evaluator, "floor", f64::floor);
    MK_MATH_FN!(evaluator, "round", |x: f64| (x + 0.5).floor());
    MK_MATH_FN!(evaluator, "sin", f64::sin);
    MK_MATH_FN!(evaluator, "tan", f64::tan);

    evaluator.define_function("acos", |call, args| {
        let x = call.number_arg(args, 0)?;
        require(call, args, (-1.0..=1.0).contains(&x), "argument must be in range [-1, 1]")?;
        Ok(Value::Number(x.acos()))
    });
    evaluator.define_function("asin", |call, args| {
        let x = call.number_arg(args, 0)?;
        require(call, args, (-1.0..=1.0).contains(&x), "argument must be in range [-1, 1]")?;
        Ok(Value::Number(x.asin()))
    });
    evaluator.define_function("atan", |call, args| {
        let x = call.number_arg(args, 0)?;
        require(call, args, (-1.0..=1.0).contains(&x), "argument must be in range [-1, 1]")?;
        Ok(Value::Number(x.atan()))
    });

    evaluator.define_function("ln", |call, args| {
        let x = call.number_arg(args, 0)?;
        require(call, args, x > 0.0, "argument must be greater than 0")?;
        Ok(Value::Number(x.ln()))
    });
    evaluator.define_function("log", |call, args| {
        let x = call.number_arg(args, 0)?;
        require(call, args, x > 0.0, "argument must be greater than 0")?;
        Ok(Value::Number(x.log10()))
    });
    evaluator.define_function("sqrt", |call, args| {
        let x = call.number_arg(args, 0)?;
        require(call, args, x > 0.0, "argument must be greater than 0")?;
        Ok(Value::Number(x.sqrt()))
    });

    evaluator.define_function("pow", |call, args| {
        let x = call.number_arg(args, 0)?;
        let y = call.number_arg(args, 1)?;
        Ok(Value::Number(x.powf(y)))
    });
    evaluator.define_function("mod", |call, args| {
        let x = call.number_arg(args, 0)?;
        let y = call.number_arg(args, 1)?;
        if y == 0.0 {
            return Err(call.divide_by_zero(args));
        }
        Ok(Value::Number(x % y))
    });
    evaluator.define_function("quotient", |call, args| {
        let x = call.number_arg(args, 0)?;
        let y = call.number_arg(args, 1)?;
        if y == 0.0 {
            return Err(call.divide_by_zero(args));
        }
        Ok(Value::Number((x / y).floor()))
    });
}

fn define_logic_functions(evaluator: &mut Evaluator) {
    evaluator.define_function("and", |_, args| {
        Ok(Value::from(args.iter().all(Value::is_positive)))
    });
    evaluator.define_function("or", |_, args| {
        Ok(Value::from(args.iter().any(Value::is_positive)))
    });
    evaluator.define_function("not", |call, args| {
        Ok(Value::from(!call.arg(args, 0)?.is_positive()))
    });
    evaluator.define_function("if", |call, args| {
        let branch = if call.arg(args, 0)?.is_positive() { 1 } else { 2 };
        Ok(call.arg(args, branch)?.clone())
    });

    // choose(i, a, b, ...) returns the i-th choice, counting from 1
    evaluator.define_function("choose", |call, args| {
        let index = call.number_arg(args, 0)?;
        let choices = args.len() - 1;
        if index.fract() != 0.0 || index < 1.0 || index > choices as f64 {
            return Err(call.range_error(args, "the index is out of bounds"));
        }
        Ok(args[index as usize].clone())
    });
}

fn define_aggregate_functions(evaluator: &mut Evaluator) {
    evaluator.define_function("max", |call, args| {
        Ok(Value::Number(max(&call.numbers(args)?)))
    });
    evaluator.define_function("min", |call, args| {
        Ok(Value::Number(min(&call.numbers(args)?)))
    });
    evaluator.define_function("sum", |call, args| {
        Ok(Value::Number(call.numbers(args)?.iter().fold(0.0, |a, b| a + b)))
    });
    evaluator.define_function("product", |call, args| {
        Ok(Value::Number(call.numbers(args)?.iter().product()))
    });
    evaluator.define_function("mean", |call, args| {
        let values = call.numbers(args)?;
        require(call, args, !values.is_empty(), "at least one value is required")?;
        Ok(Value::Number(mean(&values)))
    });
    evaluator.define_function("median", |call, args| {
        let values = call.numbers(args)?;
        require(call, args, !values.is_empty(), "at least one value is required")?;
        Ok(Value::Number(median(values)))
    });
}

fn define_random_functions(evaluator: &mut Evaluator) {
    evaluator.define_function_no_args("rand", |_, _| Ok(Value::Number(rand::random::<f64>())));

    evaluator.define_function("randInt", |call, args| {
        let a = call.number_arg(args, 0)?;
        let b = call.number_arg(args, 1)?;
        Ok(Value::Number(a + (rand::random::<f64>() * (b - a)).trunc()))
    });
    evaluator.define_function("randRange", |call, args| {
        let a = call.number_arg(args, 0)?;
        let b = call.number_arg(args, 1)?;
        Ok(Value::Number(a + rand::random::<f64>() * (b - a)))
    });
}

fn define_array_functions(evaluator: &mut Evaluator) {
    // Reductions over the receiver
    evaluator.define_array_function("andA", |call, args| {
        Ok(Value::from(call.array_arg(args, 0)?.iter().all(Value::is_positive)))
    });
    evaluator.define_array_function("orA", |call, args| {
        Ok(Value::from(call.array_arg(args, 0)?.iter().any(Value::is_positive)))
    });
    evaluator.define_array_function("maxA", |call, args| {
        Ok(Value::Number(max(&array_numbers(call, args)?)))
    });
    evaluator.define_array_function("minA", |call, args| {
        Ok(Value::Number(min(&array_numbers(call, args)?)))
    });
    evaluator.define_array_function("sumA", |call, args| {
        Ok(Value::Number(array_numbers(call, args)?.iter().fold(0.0, |a, b| a + b)))
    });
    evaluator.define_array_function("productA", |call, args| {
        Ok(Value::Number(array_numbers(call, args)?.iter().product()))
    });
    evaluator.define_array_function("meanA", |call, args| {
        let values = array_numbers(call, args)?;
        require(call, args, !values.is_empty(), "the array must not be empty")?;
        Ok(Value::Number(mean(&values)))
    });
    evaluator.define_array_function("medianA", |call, args| {
        let values = array_numbers(call, args)?;
        require(call, args, !values.is_empty(), "the array must not be empty")?;
        Ok(Value::Number(median(values)))
    });

    // Reshaping
    evaluator.define_array_function("includesA", |call, args| {
        let array = call.array_arg(args, 0)?;
        let needle = call.arg(args, 1)?;
        Ok(Value::from(array.contains(needle)))
    });
    evaluator.define_array_function("joinA", |call, args| {
        let array = call.array_arg(args, 0)?;
        let separator = match args.get(1) {
            Some(value) => value.as_str(call.name())?,
            None => ",",
        };
        let parts: Vec<String> = array.iter().map(Value::to_string).collect();
        Ok(Value::String(parts.join(separator)))
    });
    evaluator.define_array_function("reverseA", |call, args| {
        let mut array = call.array_arg(args, 0)?.to_vec();
        array.reverse();
        Ok(Value::Array(array))
    });
    evaluator.define_array_function("sliceA", |call, args| {
        let array = call.array_arg(args, 0)?;
        let len = array.len();
        let start = match args.get(1) {
            Some(value) => slice_index(value.as_number(call.name())?, len),
            None => 0,
        };
        let end = match args.get(2) {
            Some(value) => slice_index(value.as_number(call.name())?, len),
            None => len,
        };
        Ok(Value::Array(array[start..end.max(start)].to_vec()))
    });

    // Callbacks, named by a string: [1, 2].mapA("fac")
    evaluator.define_array_function("mapA", |call, args| {
        let array = call.array_arg(args, 0)?;
        let function = call.str_arg(args, 1)?;
        let mapped = array
            .iter()
            .map(|element| call.call(function, std::slice::from_ref(element)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(mapped))
    });
    evaluator.define_array_function("filterA", |call, args| {
        let array = call.array_arg(args, 0)?;
        let function = call.str_arg(args, 1)?;
        let mut kept = vec![];
        for element in array {
            if call.call(function, std::slice::from_ref(element))?.is_truthy() {
                kept.push(element.clone());
            }
        }
        Ok(Value::Array(kept))
    });
    evaluator.define_array_function("everyA", |call, args| {
        let array = call.array_arg(args, 0)?;
        let function = call.str_arg(args, 1)?;
        for element in array {
            if !call.call(function, std::slice::from_ref(element))?.is_truthy() {
                return Ok(Value::from(false));
            }
        }
        Ok(Value::from(true))
    });
    evaluator.define_array_function("someA", |call, args| {
        let array = call.array_arg(args, 0)?;
        let function = call.str_arg(args, 1)?;
        for element in array {
            if call.call(function, std::slice::from_ref(element))?.is_truthy() {
                return Ok(Value::from(true));
            }
        }
        Ok(Value::from(false))
    });

    // reduceA(a, f, acc?) calls f(acc, element, index, a) for every element.
    // Without an initial accumulator the first element seeds it.
    evaluator.define_array_function("reduceA", |call, args| {
        let array = call.array_arg(args, 0)?;
        let function = call.str_arg(args, 1)?;

        let (mut acc, skip) = match args.get(2) {
            Some(initial) => (initial.clone(), 0),
            None => match array.first() {
                Some(first) => (first.clone(), 1),
                None => {
                    return Err(call.range_error(
                        args,
                        "an empty array needs an initial accumulator",
                    ))
                }
            },
        };

        let whole = Value::Array(array.to_vec());
        for (index, element) in array.iter().enumerate().skip(skip) {
            acc = call.call(
                function,
                &[acc, element.clone(), Value::Number(index as f64), whole.clone()],
            )?;
        }
        Ok(acc)
    });
}

/// Multiplies x, x - 1, ... while the factor stays positive; a run that
/// does not land exactly on 0 flips the sign.
///
/// Stops as soon as the product overflows, which also bounds the loop for
/// inputs too large for `n - 1.0` to change `n`.
fn factorial(x: f64) -> f64 {
    let mut result: f64 = 1.0;
    let mut n = x;
    while n > 0.0 {
        result *= n;
        n -= 1.0;
        if result.is_infinite() {
            return if x.fract() == 0.0 { result } else { -result };
        }
    }
    if n == 0.0 {
        result
    } else {
        -result
    }
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Resolves a slice bound: negative values count from the end, and the
/// result is clamped to `[0, len]`.
fn slice_index(index: f64, len: usize) -> usize {
    let index = index.trunc();
    let resolved = if index < 0.0 { len as f64 + index } else { index };
    resolved.clamp(0.0, len as f64) as usize
}

fn array_numbers(call: &FunctionCall, args: &[Value]) -> Result<Vec<f64>, EvaluateError> {
    call.numbers(call.array_arg(args, 0)?)
}

fn require(
    call: &FunctionCall,
    args: &[Value],
    condition: bool,
    requirement: &str,
) -> Result<(), EvaluateError> {
    if condition {
        Ok(())
    } else {
        Err(call.range_error(args, requirement))
    }
}
