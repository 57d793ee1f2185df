pub mod builtins;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use environment::{Environment, INPUT_PREFIX};
pub use error::{Error, EvalError, ParseError};
pub use evaluator::{
    evaluate, evaluate_expression, parse_and_run, parse_and_run_with_diagnostics, CapturedOutput, EvalConfig,
    Evaluator, Output, StdoutOutput, DEFAULT_MAX_DEPTH,
};
pub use parser::{parse, parse_with_max_nesting, TokenParser};
