//! Unit tests for the evaluator module.
//!
//! Covers the operator table, the built-in library and the definition
//! protocol.

use pretty_assertions::assert_eq;

use crate::{
    ast::value::Value,
    errors::errors::{Error, EvaluateErrorImpl},
    parser::lookups::{operator_handler, InfixOperator, PrefixOperator},
};

use super::{evaluator::Evaluator, operators::eval_first};

fn eval(source: &str) -> Value {
    Evaluator::new()
        .evaluate(source)
        .unwrap_or_else(|e| panic!("{:?} failed: {}", source, e))
}

fn number(source: &str) -> f64 {
    match eval(source) {
        Value::Number(n) => n,
        other => panic!("{:?} evaluated to {:?}", source, other),
    }
}

fn error_name(source: &str) -> String {
    Evaluator::new()
        .evaluate(source)
        .unwrap_err()
        .get_error_name()
        .to_string()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_arithmetic() {
    assert_eq!(number("2 + 3 * 4"), 14.0);
    assert_eq!(number("(2 + 3) * 4"), 20.0);
    assert_eq!(number("10 - 4 - 3"), 3.0);
    assert_eq!(number("7 / 2"), 3.5);
    assert_eq!(number("7 % 4"), 3.0);
    assert_eq!(number("-7 % 4"), -3.0);
    assert_eq!(number("2 ^ 10"), 1024.0);
}

#[test]
fn test_exponent_and_unary_minus() {
    assert_eq!(number("2 ^ 3 ^ 2"), 64.0);
    assert_eq!(number("2 ^ -3"), 0.125);
    assert_eq!(number("-2 ^ 2"), 4.0);
    assert_eq!(number("-(2 ^ 2)"), -4.0);
    assert_eq!(number("--3"), 3.0);
    assert_eq!(number("1 - -1"), 2.0);
}

#[test]
fn test_comparisons() {
    assert_eq!(number("1 < 2"), 1.0);
    assert_eq!(number("2 <= 2"), 1.0);
    assert_eq!(number("1 > 2"), 0.0);
    assert_eq!(number("2 >= 3"), 0.0);
    assert_eq!(number("1 + 1 == 2"), 1.0);
    assert_eq!(number("1 != 1"), 0.0);
    assert_eq!(number("\"abc\" < \"abd\""), 1.0);
    assert_eq!(number("\"a\" == \"a\""), 1.0);
    assert_eq!(number("[1, 2] == [1, 2]"), 1.0);
}

#[test]
fn test_comparison_type_mismatch() {
    assert_eq!(error_name("1 < \"a\""), "TypeMismatch");
    assert_eq!(error_name("[1] > 0"), "TypeMismatch");
}

#[test]
fn test_logic() {
    assert_eq!(number("1 && 1"), 1.0);
    assert_eq!(number("1 && 0"), 0.0);
    assert_eq!(number("0 || 2"), 1.0);
    assert_eq!(number("0 || 0"), 0.0);
    assert_eq!(number("1 && 0 || 1"), 1.0);
    assert_eq!(number("!0"), 1.0);
    assert_eq!(number("!3"), 0.0);
    assert_eq!(number("!-1"), 1.0);
}

#[test]
fn test_logic_short_circuits() {
    let mut evaluator = Evaluator::new();
    evaluator.define_function("boom", |call, args| Err(call.range_error(args, "always fails")));

    assert_eq!(evaluator.evaluate("0 && boom()").unwrap(), Value::Number(0.0));
    assert_eq!(evaluator.evaluate("1 || boom()").unwrap(), Value::Number(1.0));
    assert_eq!(evaluator.evaluate("0 && 0 && boom()").unwrap(), Value::Number(0.0));

    let error = evaluator.evaluate("1 && boom()").unwrap_err();
    assert_eq!(error.get_error_name(), "ArgumentRange");
    let error = evaluator.evaluate("0 || boom()").unwrap_err();
    assert_eq!(error.get_error_name(), "ArgumentRange");
}

#[test]
fn test_ternary_skips_other_branch() {
    let mut evaluator = Evaluator::new();
    evaluator.define_function("boom", |call, args| Err(call.range_error(args, "always fails")));

    assert_eq!(evaluator.evaluate("1 ? 2 : boom()").unwrap(), Value::Number(2.0));
    assert_eq!(evaluator.evaluate("0 ? boom() : 3").unwrap(), Value::Number(3.0));
    assert_eq!(evaluator.evaluate("\"\" ? 1 : 2").unwrap(), Value::Number(2.0));
}

#[test]
fn test_strings() {
    assert_eq!(eval("\"ab\" + \"cd\""), Value::from("abcd"));
    assert_eq!(eval("\"n=\" + 1"), Value::from("n=1"));
    assert_eq!(eval("1.5 + \"x\""), Value::from("1.5x"));
    assert_eq!(error_name("\"a\" * 2"), "TypeMismatch");
    assert_eq!(error_name("\"a\" - 1"), "TypeMismatch");
    assert_eq!(error_name("[1] + 1"), "TypeMismatch");
}

#[test]
fn test_division_by_zero() {
    assert_eq!(error_name("1 / 0"), "DivideByZero");
    assert_eq!(error_name("1 % 0"), "DivideByZero");
    assert_eq!(error_name("mod(5, 0)"), "DivideByZero");
    assert_eq!(error_name("quotient(5, 0)"), "DivideByZero");

    let error = Evaluator::new().evaluate("mod(5, 0)").unwrap_err();
    assert_eq!(
        error,
        Error::Evaluate(crate::errors::errors::EvaluateError::new(
            EvaluateErrorImpl::DivideByZero {
                context: "at \"mod(5, 0)\"".to_string(),
            }
        ))
    );
}

#[test]
fn test_constants() {
    assert_eq!(number("PI"), std::f64::consts::PI);
    assert_eq!(number("E"), std::f64::consts::E);
    assert_eq!(number("SQRT2 * SQRT1_2"), std::f64::consts::SQRT_2 * std::f64::consts::FRAC_1_SQRT_2);
    assert_eq!(number("LN2 + LN10"), std::f64::consts::LN_2 + std::f64::consts::LN_10);
    assert_eq!(number("TRUE + true"), 2.0);
    assert_eq!(number("FALSE + false"), 0.0);
}

#[test]
fn test_single_argument_functions() {
    assert_eq!(number("abs(-3)"), 3.0);
    assert_eq!(number("ceiling(1.2)"), 2.0);
    assert_eq!(number("floor(1.8)"), 1.0);
    assert_eq!(number("round(2.5)"), 3.0);
    assert_eq!(number("round(-2.5)"), -2.0);
    assert_eq!(number("exp(0)"), 1.0);
    assert_eq!(number("cos(0)"), 1.0);
    assert_eq!(number("sin(0)"), 0.0);
    assert_eq!(number("tan(9)"), 9f64.tan());
    assert_eq!(number("sqrt(16)"), 4.0);
    assert_close(number("ln(E)"), 1.0);
    assert_close(number("log(1000)"), 3.0);
    assert_eq!(number("acos(1)"), 0.0);
    assert_close(number("asin(-1)"), -std::f64::consts::FRAC_PI_2);
    assert_close(number("atan(1)"), std::f64::consts::FRAC_PI_4);
    assert_eq!(number("pow(2, 8)"), 256.0);
    assert_eq!(number("quotient(7, 2)"), 3.0);
    assert_eq!(number("mod(7, 3)"), 1.0);
}

#[test]
fn test_factorial() {
    assert_eq!(number("fac(0)"), 1.0);
    assert_eq!(number("fac(5)"), 120.0);
    assert_eq!(number("fac(fac(3))"), 720.0);
    assert_eq!(number("fac(-2)"), -1.0);
}

#[test]
fn test_factorial_overflow_stops() {
    assert!(number("fac(170)").is_finite());
    assert_eq!(number("fac(171)"), f64::INFINITY);
    assert_eq!(number("fac(1e9)"), f64::INFINITY);
    assert_eq!(number("fac(1e20)"), f64::INFINITY);
    assert_eq!(number("fac(200.5)"), f64::NEG_INFINITY);
}

#[test]
fn test_domain_errors() {
    for source in [
        "acos(1.5)",
        "asin(2)",
        "atan(-1.1)",
        "sqrt(-1)",
        "sqrt(0)",
        "ln(0)",
        "log(-10)",
        "choose(0, 1, 2)",
        "choose(3, 1, 2)",
        "choose(1.5, 1, 2)",
    ] {
        assert_eq!(error_name(source), "ArgumentRange", "source: {}", source);
    }

    let error = Evaluator::new().evaluate("sqrt(-1)").unwrap_err();
    assert_eq!(error.to_string(), "ArgumentRange: at \"sqrt(-1)\": argument must be greater than 0");
}

#[test]
fn test_missing_arguments() {
    assert_eq!(error_name("abs()"), "MissingArguments");
    assert_eq!(error_name("pow(2)"), "MissingArguments");
    assert_eq!(error_name("abs(\"x\")"), "TypeMismatch");
}

#[test]
fn test_logic_functions() {
    assert_eq!(number("and(1, 2, 3)"), 1.0);
    assert_eq!(number("and(1, 0)"), 0.0);
    assert_eq!(number("or(0, -1, 2)"), 1.0);
    assert_eq!(number("or(0, -1)"), 0.0);
    assert_eq!(number("not(0)"), 1.0);
    assert_eq!(number("not(5)"), 0.0);
    assert_eq!(number("if(1, 10, 20)"), 10.0);
    assert_eq!(number("if(0, 10, 20)"), 20.0);
    assert_eq!(number("choose(2, 10, 20, 30)"), 20.0);
}

#[test]
fn test_aggregates_accept_both_forms() {
    for (separate, array, expected) in [
        ("sum(1, 2, 3)", "sum([1, 2, 3])", 6.0),
        ("product(2, 3, 4)", "product([2, 3, 4])", 24.0),
        ("max(1, 9, 3)", "max([1, 9, 3])", 9.0),
        ("min(4, -2, 3)", "min([4, -2, 3])", -2.0),
        ("mean(1, 2, 3, 6)", "mean([1, 2, 3, 6])", 3.0),
        ("median(3, 1, 2)", "median([3, 1, 2])", 2.0),
        ("median(4, 1, 3, 2)", "median([4, 1, 3, 2])", 2.5),
    ] {
        assert_eq!(number(separate), expected, "source: {}", separate);
        assert_eq!(number(array), expected, "source: {}", array);
    }

    assert_eq!(eval("sum()").to_string(), "0");
    assert_eq!(eval("[].sumA()").to_string(), "0");
    assert_eq!(number("[1, 2].sum(3)"), 6.0);
    assert_eq!(error_name("mean()"), "ArgumentRange");
}

#[test]
fn test_random_functions() {
    let evaluator = Evaluator::new();
    for _ in 0..100 {
        let Value::Number(r) = evaluator.evaluate("rand()").unwrap() else {
            panic!("rand() is not a number");
        };
        assert!((0.0..1.0).contains(&r));

        let Value::Number(i) = evaluator.evaluate("randInt(3, 7)").unwrap() else {
            panic!("randInt() is not a number");
        };
        assert!((3.0..7.0).contains(&i));
        assert_eq!(i.fract(), 0.0);

        let Value::Number(x) = evaluator.evaluate("randRange(-1, 1)").unwrap() else {
            panic!("randRange() is not a number");
        };
        assert!((-1.0..1.0).contains(&x));
    }
}

#[test]
fn test_arrays() {
    assert_eq!(eval("[1, 2, 1 + 2]"), Value::from(vec![1, 2, 3]));
    assert_eq!(eval("[]"), Value::Array(vec![]));
    assert_eq!(eval("[[1], \"a\"]"), Value::Array(vec![Value::from(vec![1]), Value::from("a")]));
}

#[test]
fn test_array_reductions() {
    assert_eq!(number("[1, 2, 3].andA()"), 1.0);
    assert_eq!(number("[1, 2, 0].andA()"), 0.0);
    assert_eq!(number("[1, 2, 3].orA()"), 1.0);
    assert_eq!(number("[-1, -2, 0].orA()"), 0.0);
    assert_eq!(number("[1, 9, 3].maxA()"), 9.0);
    assert_eq!(number("[1, 9, 3].minA()"), 1.0);
    assert_eq!(number("[1, 2, 3].meanA()"), 2.0);
    assert_eq!(number("[1, 2, 3].medianA()"), 2.0);
    assert_eq!(number("[1, 2, 3, 4].medianA()"), 2.5);
    assert_eq!(number("[1, 2, 3].productA()"), 6.0);
    assert_eq!(number("[1, 2, 3].sumA()"), 6.0);
    assert_eq!(number("sumA([1, 2, 3])"), 6.0);
    assert_eq!(error_name("[].meanA()"), "ArgumentRange");
    assert_eq!(error_name("sumA(1)"), "TypeMismatch");
}

#[test]
fn test_array_reshaping() {
    assert_eq!(number("[1, 2, 4, 5].includesA(2)"), 1.0);
    assert_eq!(number("[1, 2, 4, 5].includesA(3)"), 0.0);
    assert_eq!(eval("[\"a\", \"b\", \"c\"].joinA(\"_\")"), Value::from("a_b_c"));
    assert_eq!(eval("[1, 2, 3].joinA()"), Value::from("1,2,3"));
    assert_eq!(eval("[1, 2, 3].reverseA()"), Value::from(vec![3, 2, 1]));
    assert_eq!(eval("[1, 2, 3, 4].sliceA(1, 3)"), Value::from(vec![2, 3]));
    assert_eq!(eval("[1, 2, 3, 4].sliceA(2)"), Value::from(vec![3, 4]));
    assert_eq!(eval("[1, 2, 3, 4].sliceA(-2)"), Value::from(vec![3, 4]));
    assert_eq!(eval("[1, 2, 3, 4].sliceA(3, 1)"), Value::Array(vec![]));
    assert_eq!(eval("[1, 2, 3, 4].sliceA(1, 100)"), Value::from(vec![2, 3, 4]));
}

#[test]
fn test_array_callbacks() {
    let mut evaluator = Evaluator::new();
    evaluator.define_function("small", |call, args| {
        Ok(Value::from(call.number_arg(args, 0)? < 3.0))
    });
    evaluator.define_function("reducer", |call, args| {
        Ok(Value::Number(call.number_arg(args, 0)? + call.number_arg(args, 1)?))
    });

    let eval = |source: &str| evaluator.evaluate(source).unwrap();

    assert_eq!(eval("[1, 2, 3].mapA(\"fac\")"), Value::from(vec![1, 2, 6]));
    assert_eq!(eval("[1, 2, 1 + 2].mapA(\"fac\")"), Value::from(vec![1, 2, 6]));
    assert_eq!(eval("[1, 2, 4, 5].filterA(\"small\")"), Value::from(vec![1, 2]));
    assert_eq!(eval("[1, 2].everyA(\"small\")"), Value::Number(1.0));
    assert_eq!(eval("[1, 2, 11].everyA(\"small\")"), Value::Number(0.0));
    assert_eq!(eval("[5, 1].someA(\"small\")"), Value::Number(1.0));
    assert_eq!(eval("[5, 6].someA(\"small\")"), Value::Number(0.0));
    assert_eq!(eval("[0, 1, 2, 3].reduceA(\"reducer\")"), Value::Number(6.0));
    assert_eq!(eval("[1, 2, 3].reduceA(\"reducer\")"), Value::Number(6.0));
    assert_eq!(eval("[1, 2, 3].reduceA(\"reducer\", 10)"), Value::Number(16.0));
    assert_eq!(eval("mapA([4], \"sqrt\")"), Value::from(vec![2]));

    let error = evaluator.evaluate("[].reduceA(\"reducer\")").unwrap_err();
    assert_eq!(error.get_error_name(), "ArgumentRange");

    let error = evaluator.evaluate("[1].mapA(\"missing\")").unwrap_err();
    assert_eq!(error.get_error_name(), "UndefinedSymbol");
}

#[test]
fn test_reduce_receives_index_and_array() {
    let mut evaluator = Evaluator::new();
    evaluator.define_function("weigh", |call, args| {
        let acc = call.number_arg(args, 0)?;
        let element = call.number_arg(args, 1)?;
        let index = call.number_arg(args, 2)?;
        let length = call.array_arg(args, 3)?.len() as f64;
        Ok(Value::Number(acc + element * index + length))
    });

    // 0 + (1*0 + 3) + (2*1 + 3) + (3*2 + 3)
    let value = evaluator.evaluate("[1, 2, 3].reduceA(\"weigh\", 0)").unwrap();
    assert_eq!(value, Value::Number(17.0));
}

#[test]
fn test_member_requires_function() {
    assert_eq!(error_name("[1, 2].PI"), "TypeMismatch");
}

#[test]
fn test_trailing_tokens_rejected() {
    let error = Evaluator::new().evaluate("1 2").unwrap_err();
    assert_eq!(error.get_error_name(), "BadToken");

    let error = Evaluator::new().evaluate("(1))").unwrap_err();
    assert_eq!(error.get_error_name(), "BadToken");
}

#[test]
fn test_empty_source() {
    assert_eq!(error_name(""), "BadToken");
}

#[test]
fn test_define_and_delete_function() {
    let mut evaluator = Evaluator::new();
    evaluator.define_function("double", |call, args| {
        Ok(Value::Number(2.0 * call.number_arg(args, 0)?))
    });

    assert_eq!(evaluator.evaluate("double(21)").unwrap(), Value::Number(42.0));
    assert!(evaluator.delete_symbol("double"));
    assert!(!evaluator.delete_symbol("double"));
    assert_eq!(
        evaluator.evaluate("double(21)").unwrap_err().get_error_name(),
        "UndefinedSymbol"
    );
}

#[test]
fn test_define_names() {
    let mut evaluator = Evaluator::new();
    evaluator.define_name("x", 4.0);
    evaluator.define_names([("y", Value::from(2.0)), ("greeting", Value::from("hi"))]);

    assert_eq!(evaluator.evaluate("x * y").unwrap(), Value::Number(8.0));
    assert_eq!(evaluator.evaluate("greeting + \"!\"").unwrap(), Value::from("hi!"));

    evaluator.define_name("x", 10.0);
    assert_eq!(evaluator.evaluate("x").unwrap(), Value::Number(10.0));
}

#[test]
fn test_evaluate_with_names_persists() {
    let mut evaluator = Evaluator::new();
    let value = evaluator
        .evaluate_with_names("a + b", [("a", 1.0), ("b", 2.0)])
        .unwrap();

    assert_eq!(value, Value::Number(3.0));
    assert_eq!(evaluator.evaluate("a").unwrap(), Value::Number(1.0));
}

#[test]
fn test_define_no_args_function() {
    let mut evaluator = Evaluator::new();
    evaluator.define_function_no_args("answer", |_, _| Ok(Value::Number(42.0)));

    assert_eq!(evaluator.evaluate("answer()").unwrap(), Value::Number(42.0));
    assert_eq!(
        evaluator.evaluate("answer(1)").unwrap_err().get_error_name(),
        "BadToken"
    );
}

#[test]
fn test_define_infix_operator() {
    let mut evaluator = Evaluator::new();
    evaluator.update_operators([("=>", true)]);
    evaluator.define_infix_operator(
        "=>",
        15,
        InfixOperator::new(|operands| {
            let a = operands.first()?.is_positive();
            let b = operands.second()?.is_positive();
            Ok(Value::from(!a || b))
        }),
    );

    assert_eq!(evaluator.evaluate("1 => 0").unwrap(), Value::Number(0.0));
    assert_eq!(evaluator.evaluate("0 => 0").unwrap(), Value::Number(1.0));
    // binds looser than && and +
    assert_eq!(evaluator.evaluate("0 && 1 => 0").unwrap(), Value::Number(1.0));
    assert_eq!(evaluator.evaluate("1 + 1 => 0").unwrap(), Value::Number(0.0));
}

#[test]
fn test_define_right_assoc_operator() {
    let mut evaluator = Evaluator::new();
    evaluator.update_operators([("**", true)]);
    evaluator.define_infix_operator_right_assoc("**", 75, |operands| {
        let a = operands.first()?.as_number("**")?;
        let b = operands.second()?.as_number("**")?;
        Ok(Value::Number(a.powf(b)))
    });

    assert_eq!(evaluator.evaluate("2 ** 3 ** 2").unwrap(), Value::Number(512.0));
    assert_eq!(evaluator.evaluate("2 ^ 3 ^ 2").unwrap(), Value::Number(64.0));
}

#[test]
fn test_define_batch_operators() {
    let mut evaluator = Evaluator::new();
    evaluator.update_operators([("<>", true), ("#", true)]);
    evaluator.define_infix_operators([(
        "<>",
        40,
        InfixOperator::new(|operands| Ok(Value::from(operands.first()? != operands.second()?))),
    )]);
    evaluator.define_infix_operators_right_assoc([(
        "#",
        30,
        operator_handler(|operands| {
            let a = operands.first()?.as_number("#")?;
            let b = operands.second()?.as_number("#")?;
            Ok(Value::Number(a * 10.0 + b))
        }),
    )]);
    evaluator.define_prefix_operators([(
        "~",
        PrefixOperator::new(|operands| {
            let a = operands.first()?.as_number("~")?;
            Ok(Value::Number(-a - 1.0))
        }),
    )]);
    evaluator.update_operators([("~", true)]);

    assert_eq!(evaluator.evaluate("1 <> 2").unwrap(), Value::Number(1.0));
    assert_eq!(evaluator.evaluate("1 # 2 # 3").unwrap(), Value::Number(33.0));
    assert_eq!(evaluator.evaluate("~5").unwrap(), Value::Number(-6.0));
}

#[test]
fn test_define_named_prefix_operator() {
    let mut evaluator = Evaluator::new();
    evaluator.define_prefix_operator("id", PrefixOperator::new(eval_first));

    assert_eq!(evaluator.evaluate("id 3 + 4").unwrap(), Value::Number(7.0));
    assert_eq!(evaluator.evaluate("id 2 ^ 3").unwrap(), Value::Number(8.0));
}

#[test]
fn test_define_functions_batch() {
    let mut evaluator = Evaluator::new();
    evaluator.define_functions([
        (
            "inc",
            crate::parser::lookups::function_handler(|call, args| {
                Ok(Value::Number(call.number_arg(args, 0)? + 1.0))
            }),
        ),
        (
            "count",
            crate::parser::lookups::function_handler(|_, args| Ok(Value::from(args.len() as f64))),
        ),
    ]);

    assert_eq!(evaluator.evaluate("inc(1)").unwrap(), Value::Number(2.0));
    assert_eq!(evaluator.evaluate("count([1, 2, 3])").unwrap(), Value::Number(3.0));
}

#[test]
fn test_function_calls_nested_evaluation() {
    let mut evaluator = Evaluator::new();
    evaluator.define_function("twice", |call, args| {
        let name = call.str_arg(args, 0)?;
        let once = call.call(name, &args[1..])?;
        call.call(name, &[once])
    });

    assert_eq!(evaluator.evaluate("twice(\"fac\", 3)").unwrap(), Value::Number(720.0));
    assert_eq!(evaluator.evaluate("twice(\"abs\", -2) + 1").unwrap(), Value::Number(3.0));
}

#[test]
fn test_empty_evaluator() {
    let evaluator = Evaluator::empty();

    assert_eq!(evaluator.evaluate("(1)").unwrap(), Value::Number(1.0));
    assert_eq!(evaluator.evaluate("\"a\"").unwrap(), Value::from("a"));
    assert_eq!(
        evaluator.evaluate("1 + 1").unwrap_err().get_error_name(),
        "UndefinedSymbol"
    );
}
