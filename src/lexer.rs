use chumsky::prelude::*;
use std::fmt;

use crate::diagnostic::Span;
use crate::interpreter::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LParen,
    RParen,
    LBrace,
    RBrace,
    /// Any other run of characters. Quoted runs keep their `"` characters;
    /// the parser decides what the word means.
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Word(word) => write!(f, "{}", word),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Matches `-?[0-9]+(\.[0-9]+)?`.
pub fn is_numeric_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(whole) && fraction.map_or(true, all_digits)
}

pub fn lexer<'a>() -> impl Parser<'a, &'a str, Vec<(Token, SimpleSpan)>, extra::Err<Rich<'a, char>>> {
    let bracket = choice((
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just('{').to(Token::LBrace),
        just('}').to(Token::RBrace),
    ));

    // An unclosed quote swallows the rest of the input.
    let quoted = just('"')
        .then(none_of("\"").repeated())
        .then(just('"').or_not())
        .ignored();

    let bare = none_of("(){}\"")
        .filter(|c: &char| !c.is_whitespace())
        .ignored();

    let word = quoted
        .or(bare)
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| Token::Word(s.to_string()));

    let token = bracket
        .or(word)
        .map_with(|tok, e| (tok, e.span()))
        .padded();

    token
        .repeated()
        .collect::<Vec<_>>()
        .padded()
        .then_ignore(end())
}

/// Splits source text into bracket and word tokens.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, ParseError> {
    lexer()
        .parse(source)
        .into_result()
        .map(|tokens| {
            tokens
                .into_iter()
                .map(|(token, span)| SpannedToken {
                    token,
                    span: span.into(),
                })
                .collect()
        })
        .map_err(|errors| {
            let (message, span) = errors
                .first()
                .map(|e| (e.to_string(), Span::from(*e.span())))
                .unwrap_or_else(|| ("invalid input".to_string(), Span::point(0)));
            ParseError::Lex { message, span }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        tokenize(source)
            .expect("lexer failed")
            .into_iter()
            .map(|st| st.token)
            .collect()
    }

    fn word(text: &str) -> Token {
        Token::Word(text.to_string())
    }

    #[test]
    fn test_brackets_split_mid_word() {
        assert_eq!(
            lex("(abc)def{x}"),
            vec![
                Token::LParen,
                word("abc"),
                Token::RParen,
                word("def"),
                Token::LBrace,
                word("x"),
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn test_simple_call() {
        assert_eq!(
            lex("(+ 1 2.5 -3)"),
            vec![Token::LParen, word("+"), word("1"), word("2.5"), word("-3"), Token::RParen]
        );
    }

    #[test]
    fn test_quoted_run_is_verbatim() {
        assert_eq!(
            lex(r#"(print "a (b) {c}")"#),
            vec![Token::LParen, word("print"), word(r#""a (b) {c}""#), Token::RParen]
        );
    }

    #[test]
    fn test_quote_glued_to_word() {
        assert_eq!(lex(r#"ab"c d"e f"#), vec![word(r#"ab"c d"e"#), word("f")]);
    }

    #[test]
    fn test_unclosed_quote_runs_to_end() {
        assert_eq!(lex(r#"(x "open (y)"#), vec![Token::LParen, word("x"), word(r#""open (y)"#)]);
    }

    #[test]
    fn test_all_whitespace_separates() {
        assert_eq!(
            lex("{...\n$1\tvelocity\r\n 0.8}"),
            vec![Token::LBrace, word("..."), word("$1"), word("velocity"), word("0.8"), Token::RBrace]
        );
    }

    #[test]
    fn test_blank_input() {
        assert!(lex("").is_empty());
        assert!(lex("   \n\t ").is_empty());
    }

    #[test]
    fn test_numeric_literal_pattern() {
        for text in ["0", "42", "-7", "3.14", "-0.5"] {
            assert!(is_numeric_literal(text), "{text} should be numeric");
        }
        for text in ["", "-", ".5", "5.", "1e3", "+1", "1.2.3", "abc", "--1"] {
            assert!(!is_numeric_literal(text), "{text} should not be numeric");
        }
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("(ab  cd)").unwrap();
        let spans: Vec<Span> = tokens.iter().map(|t| t.span).collect();
        assert_eq!(
            spans,
            vec![Span::new(0, 1), Span::new(1, 3), Span::new(5, 7), Span::new(7, 8)]
        );
    }
}
