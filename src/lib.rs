pub mod ast;
pub mod cli;
pub mod config;
pub mod convert;
pub mod diagnostic;
pub mod format;
pub mod interpreter;
pub mod lexer;
pub mod stack;
pub mod value;

pub use ast::{Atom, Expression, FunctionDefinition, ObjectLiteral};
pub use interpreter::{
    evaluate, evaluate_expression, parse, parse_and_run, parse_and_run_with_diagnostics, Environment, Error,
    EvalConfig, EvalError, Evaluator, ParseError,
};
pub use lexer::{tokenize, Token};
pub use value::Value;
