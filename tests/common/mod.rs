#![allow(dead_code)]

use std::rc::Rc;

use zen_lisp::convert::bind_inputs;
use zen_lisp::interpreter::CapturedOutput;
use zen_lisp::value::Object;
use zen_lisp::{parse, parse_and_run, Environment, Error, EvalConfig, EvalError, Evaluator, Value};

pub fn run(source: &str) -> Result<Value, Error> {
    parse_and_run(source, &Environment::new())
}

pub fn run_ok(source: &str) -> Value {
    run(source).unwrap_or_else(|e| panic!("`{}` failed: {}", source, e))
}

pub fn run_in(source: &str, env: &Environment) -> Value {
    parse_and_run(source, env).unwrap_or_else(|e| panic!("`{}` failed: {}", source, e))
}

pub fn eval_err(source: &str) -> EvalError {
    eval_err_in(source, &Environment::new())
}

pub fn eval_err_in(source: &str, env: &Environment) -> EvalError {
    match parse_and_run(source, env) {
        Err(Error::Eval(e)) => e,
        other => panic!("expected a runtime error for `{}`, got {:?}", source, other),
    }
}

/// Environment with every key of `json` bound as a `$` input.
pub fn env_with_inputs(json: &str) -> Environment {
    let env = Environment::new();
    bind_inputs(&env, json).expect("valid input JSON");
    env
}

/// Evaluate with printed lines captured instead of written to stdout.
pub fn run_captured(source: &str, env: &Environment) -> (Result<Value, EvalError>, Vec<String>) {
    run_captured_with(source, env, EvalConfig::default())
}

pub fn run_captured_with(
    source: &str,
    env: &Environment,
    config: EvalConfig,
) -> (Result<Value, EvalError>, Vec<String>) {
    let output = CapturedOutput::new();
    let evaluator = Evaluator::new(config).with_output(Rc::new(output.clone()));
    let expressions = parse(source).expect("source parses");
    let result = evaluator.evaluate(&expressions, env);
    (result, output.lines())
}

pub fn num(n: f64) -> Value {
    Value::Number(n)
}

pub fn s(text: &str) -> Value {
    Value::string(text)
}

pub fn list(items: Vec<Value>) -> Value {
    Value::list(items)
}

pub fn obj(fields: &[(&str, Value)]) -> Value {
    Value::object(
        fields
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect::<Object>(),
    )
}
