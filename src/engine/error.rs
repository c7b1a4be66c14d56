// ABOUTME: Error types raised by the Monkey parser and evaluator.
// ABOUTME: Display strings are what the console shows in error entries.

use std::fmt;

use thiserror::Error;

use crate::engine::ast::Operator;
use crate::engine::token::Token;

/// What the parser was looking for when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Identifier,
    Assignment,
    Expression,
    ClosingParen,
    ClosingBracket,
    ClosingBrace,
    OpeningParen,
    OpeningBrace,
    Parameter,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            Expected::Identifier => "an identifier",
            Expected::Assignment => "'='",
            Expected::Expression => "an expression",
            Expected::ClosingParen => "')'",
            Expected::ClosingBracket => "']'",
            Expected::ClosingBrace => "'}'",
            Expected::OpeningParen => "'('",
            Expected::OpeningBrace => "'{'",
            Expected::Parameter => "a parameter name",
        };
        write!(f, "{}", what)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("SyntaxError: expected {expected}, found {}", found_str(.found))]
    Unexpected {
        expected: Expected,
        found: Option<Token>,
    },
    #[error("SyntaxError: expression too deeply nested (limit {0})")]
    TooDeeplyNested(usize),
}

fn found_str(found: &Option<Token>) -> String {
    match found {
        Some(token) => token.to_string(),
        None => "end of input".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("NameError: name '{0}' is not defined")]
    UnknownIdentifier(String),
    #[error("TypeError: unsupported operand type(s) for {operator}: '{left}' and '{right}'")]
    TypeMismatch {
        operator: Operator,
        left: &'static str,
        right: &'static str,
    },
    #[error("TypeError: bad operand type for unary {operator}: '{operand}'")]
    BadOperand {
        operator: Operator,
        operand: &'static str,
    },
    #[error("TypeError: '{0}' object is not callable")]
    NotCallable(&'static str),
    #[error(
        "TypeError: function takes {expected} positional {} but {given} {} given",
        noun(*.expected),
        verb(*.given)
    )]
    WrongArgumentCount { expected: usize, given: usize },
    #[error("TypeError: {0}")]
    Type(String),
    #[error("IndexError: {0}")]
    Index(String),
    #[error("ZeroDivisionError: division by zero")]
    DivisionByZero,
    #[error("OverflowError: integer overflow")]
    Overflow,
    #[error("RecursionError: maximum recursion depth exceeded ({0})")]
    RecursionLimit(usize),
    #[error("RecursionError: expression nesting too deep ({0})")]
    NestingLimit(usize),
    #[error("KeyboardInterrupt: evaluation interrupted")]
    Interrupted,
}

fn noun(count: usize) -> &'static str {
    if count == 1 { "argument" } else { "arguments" }
}

fn verb(count: usize) -> &'static str {
    if count == 1 { "was" } else { "were" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_expectation_and_token() {
        let err = ParseError::Unexpected {
            expected: Expected::Assignment,
            found: Some(Token::Int(5)),
        };
        assert_eq!(err.to_string(), "SyntaxError: expected '=', found 5");
    }

    #[test]
    fn parse_error_at_end_of_input() {
        let err = ParseError::Unexpected {
            expected: Expected::ClosingBrace,
            found: None,
        };
        assert_eq!(
            err.to_string(),
            "SyntaxError: expected '}', found end of input"
        );
    }

    #[test]
    fn nesting_error_names_the_limit() {
        assert_eq!(
            ParseError::TooDeeplyNested(256).to_string(),
            "SyntaxError: expression too deeply nested (limit 256)"
        );
    }

    #[test]
    fn argument_count_message_is_pluralized() {
        let one = EvalError::WrongArgumentCount {
            expected: 1,
            given: 2,
        };
        assert_eq!(
            one.to_string(),
            "TypeError: function takes 1 positional argument but 2 were given"
        );
        let many = EvalError::WrongArgumentCount {
            expected: 2,
            given: 1,
        };
        assert_eq!(
            many.to_string(),
            "TypeError: function takes 2 positional arguments but 1 was given"
        );
    }
}
