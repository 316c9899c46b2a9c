use macaque::interpreter::TreeWalkInterpreter;
use macaque::parser::Parser;
use macaque::value::error::RuntimeError;
use macaque::value::formatter::{BasicFormatter, ValueFormatter};
use macaque::value::MonkeyValue;

fn evaluate(input: &str) -> Result<MonkeyValue, RuntimeError> {
    let (program, errors) = Parser::new(input).parse_program();
    assert!(
        errors.is_empty(),
        "Unexpected parse errors for {input:?}: {errors:?}"
    );
    TreeWalkInterpreter::new().run(&program)
}

fn check_integer(input: &str, expected: i64) {
    match evaluate(input) {
        Ok(MonkeyValue::Integer(value)) => {
            assert_eq!(value, expected, "Failed test {input:?}")
        }
        result => panic!("Expected integer {expected} for {input:?} but got {result:?}"),
    }
}

fn check_boolean(input: &str, expected: bool) {
    match evaluate(input) {
        Ok(MonkeyValue::Bool(value)) => {
            assert_eq!(value, expected, "Failed test {input:?}")
        }
        result => panic!("Expected boolean {expected} for {input:?} but got {result:?}"),
    }
}

fn check_null(input: &str) {
    match evaluate(input) {
        Ok(MonkeyValue::Null) => {}
        result => panic!("Expected null for {input:?} but got {result:?}"),
    }
}

fn check_error(input: &str, expected: &str) {
    match evaluate(input) {
        Err(error) => assert_eq!(error.to_string(), expected, "Failed test {input:?}"),
        Ok(value) => panic!("Expected error {expected:?} for {input:?} but got {value:?}"),
    }
}

#[test]
fn test_integer_expressions() {
    let cases = [
        ("5", 5),
        ("10", 10),
        ("-5", -5),
        ("-10", -10),
        ("5 + 5 + 5 + 5 - 10", 10),
        ("2 * 2 * 2 * 2 * 2", 32),
        ("-50 + 100 + -50", 0),
        ("5 * 2 + 10", 20),
        ("5 + 2 * 10", 25),
        ("20 + 2 * -10", 0),
        ("50 / 2 * 2 + 10", 60),
        ("2 * (5 + 10)", 30),
        ("3 * 3 * 3 + 10", 37),
        ("3 * (3 * 3) + 10", 37),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
        ("5 + 5 * 2", 15),
    ];
    for (input, expected) in cases {
        check_integer(input, expected);
    }
}

#[test]
fn test_boolean_expressions() {
    let cases = [
        ("true", true),
        ("false", false),
        ("1 < 2", true),
        ("1 > 2", false),
        ("1 < 1", false),
        ("1 > 1", false),
        ("1 == 1", true),
        ("1 != 1", false),
        ("1 == 2", false),
        ("1 != 2", true),
        ("true == true", true),
        ("false == false", true),
        ("true == false", false),
        ("true != false", true),
        ("false != true", true),
        ("(1 < 2) == true", true),
        ("(1 < 2) == false", false),
        ("(1 > 2) == true", false),
        ("(1 > 2) == false", true),
    ];
    for (input, expected) in cases {
        check_boolean(input, expected);
    }
}

#[test]
fn test_bang_operator() {
    let cases = [
        ("!true", false),
        ("!false", true),
        ("!5", false),
        ("!!true", true),
        ("!!false", false),
        ("!!5", true),
    ];
    for (input, expected) in cases {
        check_boolean(input, expected);
    }
}

#[test]
fn test_string_expressions() {
    match evaluate("\"hello world\"") {
        Ok(MonkeyValue::Str(value)) => assert_eq!(value, "hello world"),
        result => panic!("Expected a string but got {result:?}"),
    }
}

// Only false and null are falsy; zero is truthy.
#[test]
fn test_if_else_expressions() {
    check_integer("if (true) { 10 }", 10);
    check_null("if (false) { 10 }");
    check_integer("if (1) { 10 }", 10);
    check_integer("if (0) { 10 } else { 1 }", 10);
    check_integer("if (1 < 2) { 10 }", 10);
    check_null("if (1 > 2) { 10 }");
    check_integer("if (1 > 2) { 10 } else { 20 }", 20);
    check_integer("if (1 < 2) { 10 } else { 20 }", 10);
}

#[test]
fn test_return_statements() {
    let cases = [
        ("return 10;", 10),
        ("return 10; 9;", 10),
        ("return 2 * 5; 9;", 10),
        ("9; return 2 * 5; 9;", 10),
        (
            "if (10 > 1) {
  if (10 > 1) {
    return 10;
  }
  return 1;
}",
            10,
        ),
    ];
    for (input, expected) in cases {
        check_integer(input, expected);
    }
}

#[test]
fn test_let_statements() {
    let cases = [
        ("let a = 5; a;", 5),
        ("let a = 5 * 5; a;", 25),
        ("let a = 5; let b = a; b;", 5),
        ("let a = 5; let b = a; let c = a + b + 5; c;", 15),
        (
            "let a = 5; let b = a > 3; let c = a * 99; if (b) { 10 } else { 1 };",
            10,
        ),
    ];
    for (input, expected) in cases {
        check_integer(input, expected);
    }
}

#[test]
fn test_function_value() {
    let result = evaluate("fn(x) { x + 2; };").expect("Evaluation should succeed");
    let MonkeyValue::Function(ref function) = result else {
        panic!("Expected a function but got {result:?}");
    };
    assert_eq!(function.parameters.len(), 1);
    assert_eq!(&*function.parameters[0].name, "x");
    assert_eq!(function.body.to_string(), "(x + 2)");
    assert_eq!(result.to_string(), "fn(x) {\n(x + 2)\n}");
}

#[test]
fn test_function_application() {
    let cases = [
        ("let identity = fn(x) { x; }; identity(5);", 5),
        ("let identity = fn(x) { return x; }; identity(5);", 5),
        ("let double = fn(x) { x * 2; }; double(5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5, 5);", 10),
        ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20),
        ("fn(x) { x; }(5)", 5),
        ("fn(x) { return x; 10; }(5)", 5),
    ];
    for (input, expected) in cases {
        check_integer(input, expected);
    }
}

#[test]
fn test_closures() {
    check_integer(
        "let newAdder = fn(x) { fn(y) { x + y } };
let addTwo = newAdder(2);
addTwo(3);",
        5,
    );
    check_integer(
        "let newClosure = fn(a) { fn() { a; } };
let closure = newClosure(99);
closure();",
        99,
    );
}

#[test]
fn test_higher_order_functions() {
    check_integer(
        "let add = fn(a, b) { a + b };
let applyTwice = fn(f, x) { f(f(x, x), f(x, x)) };
applyTwice(add, 3);",
        12,
    );
}

// Recursion works through late binding in the enclosing environment.
#[test]
fn test_recursion() {
    check_boolean(
        "let counter = fn(x) {
  if (x > 100) {
    return true;
  } else {
    counter(x + 1);
  }
};
counter(0);",
        true,
    );
}

// A let inside a call frame shadows the outer binding instead of writing it.
#[test]
fn test_shadowing() {
    check_integer(
        "let x = 5;
let f = fn() { let x = 10; x };
f() + x;",
        15,
    );
}

#[test]
fn test_error_handling() {
    let cases = [
        ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
        ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
        ("-true", "unknown operator: -BOOLEAN"),
        ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
        ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
        (
            "if (10 > 1) { true + false; }",
            "unknown operator: BOOLEAN + BOOLEAN",
        ),
        (
            "if (10 > 1) {
  if (10 > 1) {
    return true + false;
  }
  return 1;
}",
            "unknown operator: BOOLEAN + BOOLEAN",
        ),
        ("foobar", "identifier not found: foobar"),
        ("\"Hello\" + \"World\"", "unknown operator: STRING + STRING"),
        ("\"Hello\" - 5", "type mismatch: STRING - INTEGER"),
        ("true < false", "unknown operator: BOOLEAN < BOOLEAN"),
        ("5 / 0", "division by zero"),
        ("let x = 5; x(3);", "not a function: INTEGER"),
        (
            "fn(x) { x; }(1, 2)",
            "wrong number of arguments: got 2, want 1",
        ),
        (
            "let add = fn(x, y) { x + y }; add(1);",
            "wrong number of arguments: got 1, want 2",
        ),
    ];
    for (input, expected) in cases {
        check_error(input, expected);
    }
}

// The first failing argument wins; later arguments never evaluate.
#[test]
fn test_argument_errors_short_circuit() {
    check_error(
        "let add = fn(x, y) { x + y }; add(missing, boom);",
        "identifier not found: missing",
    );
}

#[test]
fn test_error_rendering() {
    let error = evaluate("foobar;").expect_err("Evaluation should fail");
    let formatter = BasicFormatter;
    assert_eq!(
        formatter.format_error(&error),
        "ERROR: identifier not found: foobar"
    );
}

// Arithmetic wraps on 64-bit overflow.
#[test]
fn test_integer_overflow_wraps() {
    check_integer("9223372036854775807 + 1", i64::MIN);
    check_integer("-9223372036854775807 - 2", i64::MAX);
    check_integer("9223372036854775807 * 2", -2);
}

#[test]
fn test_empty_program() {
    check_null("");
}
