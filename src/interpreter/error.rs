use crate::diagnostic::{Diagnostic, Label, Span};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected end of input, expected `{expected}`")]
    UnexpectedEof { expected: char, span: Span },

    #[error("unexpected closing bracket `{bracket}`")]
    UnexpectedClosingBracket { bracket: char, span: Span },

    #[error("object key must be a string, found `{found}`")]
    InvalidObjectKey { found: String, span: Span },

    #[error("invalid function definition: {message}")]
    InvalidFunctionDefinition { message: String, span: Span },

    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("{message}")]
    Lex { message: String, span: Span },

    #[error("brackets nested more than {limit} deep")]
    NestingTooDeep { limit: usize, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedEof { span, .. }
            | Self::UnexpectedClosingBracket { span, .. }
            | Self::InvalidObjectKey { span, .. }
            | Self::InvalidFunctionDefinition { span, .. }
            | Self::UnterminatedString { span }
            | Self::Lex { span, .. }
            | Self::NestingTooDeep { span, .. } => *span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let span = self.span();
        match self {
            Self::UnexpectedEof { expected, .. } => Diagnostic::error(self.to_string())
                .with_code("E0101")
                .with_label(Label::new(span, format!("expected `{}` here", expected))),
            Self::UnexpectedClosingBracket { .. } => Diagnostic::error(self.to_string())
                .with_code("E0102")
                .with_label(Label::new(span, "no matching opening bracket"))
                .with_help("remove the bracket or add the missing opener"),
            Self::InvalidObjectKey { .. } => Diagnostic::error(self.to_string())
                .with_code("E0103")
                .with_label(Label::new(span, "not a valid key"))
                .with_help("object literals alternate `key value`; keys are bare words or quoted strings"),
            Self::InvalidFunctionDefinition { .. } => Diagnostic::error(self.to_string())
                .with_code("E0104")
                .with_label(Label::new(span, ""))
                .with_help("write `(defun (name param ...) body)`"),
            Self::UnterminatedString { .. } => Diagnostic::error(self.to_string())
                .with_code("E0105")
                .with_label(Label::new(span, "missing closing `\"`")),
            Self::Lex { .. } => Diagnostic::error(self.to_string())
                .with_code("E0100")
                .with_label(Label::new(span, "")),
            Self::NestingTooDeep { .. } => Diagnostic::error(self.to_string())
                .with_code("E0106")
                .with_label(Label::new(span, "nesting limit reached here"))
                .with_help("raise the limit with `--max-depth`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("unknown function or property: {name}")]
    UnknownFunction { name: String },

    #[error("unknown input: {name}")]
    UnknownInput { name: String },

    #[error("`{name}` expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("type error: {message}")]
    TypeError { message: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("maximum evaluation depth of {depth} exceeded")]
    StackOverflow { depth: usize },

    #[error("invalid operation: {message}")]
    InvalidOperation { message: String },
}

impl EvalError {
    pub fn unknown_function(name: impl Into<String>) -> Self {
        Self::UnknownFunction { name: name.into() }
    }

    pub fn unknown_input(name: impl Into<String>) -> Self {
        Self::UnknownInput { name: name.into() }
    }

    pub fn arity(name: impl Into<String>, expected: impl Into<String>, got: usize) -> Self {
        Self::Arity {
            name: name.into(),
            expected: expected.into(),
            got,
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError {
            message: message.into(),
        }
    }

    pub fn invalid_spread(found: &str) -> Self {
        Self::type_error(format!("spread value must be an object, found {}", found))
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownFunction { .. } => "E0201",
            Self::UnknownInput { .. } => "E0202",
            Self::Arity { .. } => "E0203",
            Self::TypeError { .. } => "E0204",
            Self::DivisionByZero => "E0205",
            Self::StackOverflow { .. } => "E0206",
            Self::InvalidOperation { .. } => "E0207",
        }
    }

    /// Runtime errors carry no span; the diagnostic is message-only.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.to_string()).with_code(self.code());
        match self {
            Self::UnknownInput { name } => diagnostic.with_note(format!(
                "inputs are supplied by the caller; `{}` was not provided",
                name
            )),
            Self::StackOverflow { .. } => {
                diagnostic.with_help("check for a function that calls itself without a base case")
            }
            _ => diagnostic,
        }
    }
}

/// Either stage of running source text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("runtime error: {0}")]
    Eval(#[from] EvalError),
}

impl Error {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Parse(error) => error.to_diagnostic(),
            Error::Eval(error) => error.to_diagnostic(),
        }
    }
}
