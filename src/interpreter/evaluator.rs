use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, trace};

use super::builtins::{self, Operands};
use super::environment::{Environment, INPUT_PREFIX};
use super::error::{Error, EvalError};
use super::parser;
use crate::ast::{Atom, Expression, FunctionDefinition, ObjectLiteral};
use crate::diagnostic::Diagnostic;
use crate::stack::ensure_sufficient_stack;
use crate::value::{Closure, Function, Object, Value};

/// Nesting depth past which evaluation fails with `StackOverflow`.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// The operator name that is never treated as a property access.
const NOT: &str = "not";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    pub max_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Where `print` sends its values.
pub trait Output {
    fn print(&self, values: &[Value]);
}

/// Writes space-separated values to standard output, one call per line.
#[derive(Debug, Default)]
pub struct StdoutOutput;

impl Output for StdoutOutput {
    fn print(&self, values: &[Value]) {
        println!("{}", join_values(values));
    }
}

/// Collects printed lines in memory.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    lines: Rc<RefCell<Vec<String>>>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl Output for CapturedOutput {
    fn print(&self, values: &[Value]) {
        self.lines.borrow_mut().push(join_values(values));
    }
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct Evaluator {
    config: EvalConfig,
    output: Rc<dyn Output>,
    depth: Cell<usize>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(EvalConfig::default())
    }
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Self {
        Self {
            config,
            output: Rc::new(StdoutOutput),
            depth: Cell::new(0),
        }
    }

    pub fn with_output(mut self, output: Rc<dyn Output>) -> Self {
        self.output = output;
        self
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn output(&self) -> &dyn Output {
        self.output.as_ref()
    }

    /// Evaluate each expression in order, yielding the last value.
    pub fn evaluate(&self, expressions: &[Expression], env: &Environment) -> Result<Value, EvalError> {
        let mut last = Value::Null;
        for expression in expressions {
            last = self.evaluate_expression(expression, env)?;
        }
        Ok(last)
    }

    pub fn evaluate_expression(&self, expression: &Expression, env: &Environment) -> Result<Value, EvalError> {
        let depth = self.depth.get() + 1;
        if depth > self.config.max_depth {
            return Err(EvalError::StackOverflow {
                depth: self.config.max_depth,
            });
        }
        self.depth.set(depth);
        let result = ensure_sufficient_stack(|| self.evaluate_inner(expression, env));
        self.depth.set(depth - 1);
        result
    }

    fn evaluate_inner(&self, expression: &Expression, env: &Environment) -> Result<Value, EvalError> {
        match expression {
            Expression::Atom(atom) => self.evaluate_atom(atom, env),
            Expression::List(items) => self.evaluate_list(items, env),
            Expression::Object(literal) => self.evaluate_object(literal, env),
            Expression::Function(definition) => {
                self.define_function(definition, env);
                Ok(Value::Null)
            }
        }
    }

    fn evaluate_atom(&self, atom: &Atom, env: &Environment) -> Result<Value, EvalError> {
        match atom {
            Atom::Symbol(name) => match env.get(name) {
                Some(value) => Ok(value),
                None if name.starts_with(INPUT_PREFIX) => Err(EvalError::unknown_input(name.to_string())),
                None => Ok(Value::String(name.clone())),
            },
            other => Ok(other.to_value()),
        }
    }

    fn evaluate_list(&self, items: &[Expression], env: &Environment) -> Result<Value, EvalError> {
        let Some((head, args)) = items.split_first() else {
            return Ok(Value::Null);
        };

        let Some(name) = head.as_atom().and_then(Atom::as_text).map(|text| &**text) else {
            return match self.evaluate_expression(head, env)? {
                Value::Function(function) => {
                    let values = self.evaluate_args(args, env)?;
                    self.call(&function, values)
                }
                _ => Err(EvalError::unknown_function(head.to_string())),
            };
        };

        // `(key target)` reads a field when `key` names nothing else.
        let mut evaluated_first = None;
        if args.len() == 1 && name != NOT && !env.contains(name) {
            let target = self.evaluate_expression(&args[0], env)?;
            if let Some(field) = target.field(name) {
                return Ok(field);
            }
            evaluated_first = Some(target);
        }

        if let Some(Value::Function(function)) = env.get(name) {
            let values = self.evaluate_args(args, env)?;
            return self.call(&function, values);
        }

        match builtins::lookup(name) {
            Some(builtin) => builtin(&mut Operands::new(self, env, name, args, evaluated_first)),
            None => Err(EvalError::unknown_function(name)),
        }
    }

    fn evaluate_args(&self, args: &[Expression], env: &Environment) -> Result<Vec<Value>, EvalError> {
        args.iter()
            .map(|arg| self.evaluate_expression(arg, env))
            .collect()
    }

    /// Spread fields first, then declared properties in source order.
    fn evaluate_object(&self, literal: &ObjectLiteral, env: &Environment) -> Result<Value, EvalError> {
        let mut fields = Object::new();
        if let Some(spread) = &literal.spread {
            match self.evaluate_expression(spread, env)? {
                Value::Object(base) => {
                    fields.extend(base.iter().map(|(key, value)| (key.clone(), value.clone())));
                }
                other => return Err(EvalError::invalid_spread(other.type_name())),
            }
        }
        for (key, expression) in &literal.properties {
            let value = self.evaluate_expression(expression, env)?;
            fields.insert(key.to_string(), value);
        }
        Ok(Value::object(fields))
    }

    fn define_function(&self, definition: &FunctionDefinition, env: &Environment) {
        let name = definition.name().clone();
        debug!(
            function = %name,
            params = definition.parameters().len(),
            "defining function"
        );
        let closure = Closure {
            name: name.clone(),
            params: definition.parameters().to_vec(),
            body: definition.body.clone(),
            env: env.clone(),
        };
        env.define(name.to_string(), Value::Function(Rc::new(Function::Closure(closure))));
    }

    /// Invoke a callable with already evaluated arguments.
    ///
    /// Closures run in a fresh child of their defining scope; missing
    /// arguments are null and extra ones are ignored.
    pub fn call(&self, function: &Function, args: Vec<Value>) -> Result<Value, EvalError> {
        match function {
            Function::Native(native) => {
                trace!(function = %native.name, args = args.len(), "calling native function");
                (native.func)(&args)
            }
            Function::Closure(closure) => {
                trace!(
                    function = %closure.name,
                    args = args.len(),
                    depth = self.depth.get(),
                    "calling function"
                );
                let scope = Environment::with_parent(&closure.env);
                let mut args = args.into_iter();
                for param in &closure.params {
                    scope.define(param.to_string(), args.next().unwrap_or(Value::Null));
                }
                self.evaluate_expression(&closure.body, &scope)
            }
        }
    }
}

/// Evaluate with the default configuration.
pub fn evaluate(expressions: &[Expression], env: &Environment) -> Result<Value, EvalError> {
    Evaluator::default().evaluate(expressions, env)
}

pub fn evaluate_expression(expression: &Expression, env: &Environment) -> Result<Value, EvalError> {
    Evaluator::default().evaluate_expression(expression, env)
}

pub fn parse_and_run(source: &str, env: &Environment) -> Result<Value, Error> {
    let expressions = parser::parse(source)?;
    Ok(evaluate(&expressions, env)?)
}

pub fn parse_and_run_with_diagnostics(
    source: &str,
    env: &Environment,
    evaluator: &Evaluator,
) -> Result<Value, Vec<Diagnostic>> {
    let expressions =
        parser::parse_with_max_nesting(source, evaluator.config().max_depth).map_err(|e| vec![e.to_diagnostic()])?;
    evaluator
        .evaluate(&expressions, env)
        .map_err(|e| vec![e.to_diagnostic()])
}
