use indexmap::IndexMap;
use std::rc::Rc;

use super::error::ParseError;
use super::evaluator::DEFAULT_MAX_DEPTH;
use crate::ast::{Atom, Expression, FunctionDefinition, ObjectLiteral};
use crate::diagnostic::Span;
use crate::lexer::{is_numeric_literal, tokenize, SpannedToken, Token};
use crate::stack::ensure_sufficient_stack;

/// Keyword heading a function definition list.
pub const DEFUN: &str = "defun";

/// Token introducing the base object of an object literal.
pub const SPREAD: &str = "...";

/// Recursive-descent parser over a token stream.
pub struct TokenParser {
    tokens: Vec<SpannedToken>,
    current: usize,
    source_len: usize,
    depth: usize,
    max_nesting: usize,
}

impl TokenParser {
    pub fn new(tokens: Vec<SpannedToken>, source_len: usize) -> Self {
        Self {
            tokens,
            current: 0,
            source_len,
            depth: 0,
            max_nesting: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit how deeply brackets may nest.
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current).map(|st| &st.token)
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.current)
            .map(|st| st.span)
            .unwrap_or_else(|| Span::point(self.source_len))
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.current).cloned();
        if token.is_some() {
            self.current += 1;
        }
        token
    }

    fn is_word(&self, word: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w == word)
    }

    /// Parse every top-level expression.
    pub fn parse(&mut self) -> Result<Vec<Expression>, ParseError> {
        let mut expressions = Vec::new();
        while self.peek().is_some() {
            expressions.push(self.parse_expression()?);
        }
        Ok(expressions)
    }

    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let Some(SpannedToken { token, span }) = self.advance() else {
            return Err(ParseError::UnexpectedEof {
                expected: ')',
                span: self.current_span(),
            });
        };

        match token {
            Token::LParen | Token::LBrace => {
                if self.depth >= self.max_nesting {
                    return Err(ParseError::NestingTooDeep {
                        limit: self.max_nesting,
                        span,
                    });
                }
                self.depth += 1;
                let result = ensure_sufficient_stack(|| match token {
                    Token::LParen => self.parse_list(span),
                    _ => self.parse_object(),
                });
                self.depth -= 1;
                result
            }
            Token::RParen => Err(ParseError::UnexpectedClosingBracket { bracket: ')', span }),
            Token::RBrace => Err(ParseError::UnexpectedClosingBracket { bracket: '}', span }),
            Token::Word(word) => parse_atom(&word, span).map(Expression::Atom),
        }
    }

    fn parse_list(&mut self, open: Span) -> Result<Expression, ParseError> {
        if self.is_word(DEFUN) {
            self.advance();
            return self.parse_function_definition(open);
        }

        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.eof(')')),
                Some(Token::RParen) => {
                    self.advance();
                    return Ok(Expression::List(items));
                }
                Some(_) => items.push(self.parse_expression()?),
            }
        }
    }

    /// After `(defun`: a signature list of symbols, one body, then `)`.
    fn parse_function_definition(&mut self, open: Span) -> Result<Expression, ParseError> {
        let signature_span = self.current_span();
        let signature = match self.peek() {
            None => return Err(self.eof(')')),
            Some(Token::LParen) => self.parse_expression()?,
            Some(_) => {
                return Err(invalid_definition("expected a `(name param ...)` signature", signature_span));
            }
        };

        let Expression::List(items) = signature else {
            return Err(invalid_definition("expected a `(name param ...)` signature", signature_span));
        };
        if items.is_empty() {
            return Err(invalid_definition("the signature needs a function name", signature_span));
        }

        let mut params = Vec::with_capacity(items.len());
        for item in &items {
            match item.as_symbol() {
                Some(name) => params.push(Rc::from(name)),
                None => {
                    return Err(invalid_definition(
                        format!("`{}` is not a valid parameter name", item),
                        signature_span,
                    ));
                }
            }
        }

        let body = match self.peek() {
            None => return Err(self.eof(')')),
            Some(Token::RParen) => {
                return Err(invalid_definition("missing function body", open.merge(self.current_span())));
            }
            Some(_) => self.parse_expression()?,
        };

        match self.peek() {
            None => Err(self.eof(')')),
            Some(Token::RParen) => {
                self.advance();
                Ok(Expression::Function(FunctionDefinition {
                    params,
                    body: Rc::new(body),
                }))
            }
            Some(_) => Err(invalid_definition(
                "a function has exactly one body expression",
                self.current_span(),
            )),
        }
    }

    fn parse_object(&mut self) -> Result<Expression, ParseError> {
        let mut object = ObjectLiteral {
            spread: None,
            properties: IndexMap::new(),
        };

        if self.is_word(SPREAD) {
            self.advance();
            if self.peek().is_none() {
                return Err(self.eof('}'));
            }
            object.spread = Some(Box::new(self.parse_expression()?));
        }

        loop {
            match self.peek() {
                None => return Err(self.eof('}')),
                Some(Token::RBrace) => {
                    self.advance();
                    return Ok(Expression::Object(object));
                }
                Some(_) => {
                    let key_span = self.current_span();
                    let key = self.parse_expression()?;
                    let Some(name) = key.as_atom().and_then(Atom::as_text).cloned() else {
                        return Err(ParseError::InvalidObjectKey {
                            found: key.to_string(),
                            span: key_span,
                        });
                    };
                    if self.peek().is_none() {
                        return Err(self.eof('}'));
                    }
                    let value = self.parse_expression()?;
                    object.properties.insert(name, value);
                }
            }
        }
    }

    fn eof(&self, expected: char) -> ParseError {
        ParseError::UnexpectedEof {
            expected,
            span: Span::point(self.source_len),
        }
    }
}

fn invalid_definition(message: impl Into<String>, span: Span) -> ParseError {
    ParseError::InvalidFunctionDefinition {
        message: message.into(),
        span,
    }
}

/// Classify a word token. Quotes are stripped here and nowhere else.
pub fn parse_atom(word: &str, span: Span) -> Result<Atom, ParseError> {
    match word {
        "true" => return Ok(Atom::Bool(true)),
        "false" => return Ok(Atom::Bool(false)),
        "null" => return Ok(Atom::Null),
        _ => {}
    }

    if is_numeric_literal(word) {
        if let Ok(n) = word.parse::<f64>() {
            return Ok(Atom::Number(n));
        }
    }

    if let Some(rest) = word.strip_prefix('"') {
        return match rest.strip_suffix('"') {
            Some(text) if !text.contains('"') => Ok(Atom::String(Rc::from(text))),
            _ if !rest.contains('"') => Err(ParseError::UnterminatedString { span }),
            // Quoted runs glued to other characters stay a plain word.
            _ => Ok(Atom::Symbol(Rc::from(word))),
        };
    }

    Ok(Atom::Symbol(Rc::from(word)))
}

/// Tokenize and parse source text into its top-level expressions.
pub fn parse(source: &str) -> Result<Vec<Expression>, ParseError> {
    parse_with_max_nesting(source, DEFAULT_MAX_DEPTH)
}

pub fn parse_with_max_nesting(source: &str, max_nesting: usize) -> Result<Vec<Expression>, ParseError> {
    let tokens = tokenize(source)?;
    TokenParser::new(tokens, source.len())
        .with_max_nesting(max_nesting)
        .parse()
}
