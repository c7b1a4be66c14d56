// ABOUTME: Pratt parser — builds a Program from the lexer's token stream.
// ABOUTME: Collects every statement error, skipping to the next ';' to recover.

use std::iter::Peekable;
use std::rc::Rc;

use crate::engine::ast::{Block, Expression, Operator, Program, Statement};
use crate::engine::error::{Expected, ParseError};
use crate::engine::lexer::Lexer;
use crate::engine::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

impl Precedence {
    fn of(token: &Token) -> Self {
        match token {
            Token::Equal | Token::NotEqual => Precedence::Equals,
            Token::LessThan | Token::GreaterThan => Precedence::LessGreater,
            Token::Plus | Token::Minus => Precedence::Sum,
            Token::Asterisk | Token::Slash => Precedence::Product,
            Token::LParen => Precedence::Call,
            Token::LBracket => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }
}

fn infix_operator(token: &Token) -> Option<Operator> {
    match token {
        Token::Plus => Some(Operator::Plus),
        Token::Minus => Some(Operator::Minus),
        Token::Asterisk => Some(Operator::Multiply),
        Token::Slash => Some(Operator::Divide),
        Token::LessThan => Some(Operator::LessThan),
        Token::GreaterThan => Some(Operator::GreaterThan),
        Token::Equal => Some(Operator::Equal),
        Token::NotEqual => Some(Operator::NotEqual),
        _ => None,
    }
}

/// Bounds the height of any parsed expression tree, so neither parsing nor
/// evaluating a single line can exhaust the worker's stack.
pub const MAX_NESTING: usize = 256;

pub struct Parser<'a> {
    tokens: Peekable<Lexer<'a>>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            tokens: lexer.peekable(),
            depth: 0,
        }
    }

    /// Parse the whole input. Returns every statement error found, not just the first.
    pub fn parse(mut self) -> Result<Program, Vec<ParseError>> {
        let mut statements = Vec::new();
        let mut errors = Vec::new();

        while self.tokens.peek().is_some() {
            if self.tokens.next_if_eq(&Token::Semicolon).is_some() {
                continue;
            }
            match self.next_statement() {
                Ok(statement) => statements.push(statement),
                Err(err) => {
                    errors.push(err);
                    self.skip_statement();
                }
            }
        }

        if errors.is_empty() {
            Ok(Program { statements })
        } else {
            Err(errors)
        }
    }

    fn next_statement(&mut self) -> Result<Statement, ParseError> {
        let statement = match self.tokens.peek() {
            Some(Token::Let) => {
                self.tokens.next();
                let name = self.expect_identifier()?;
                self.expect(Token::Assign, Expected::Assignment)?;
                Statement::Let(name, self.next_expression(Precedence::Lowest)?)
            }
            Some(Token::Return) => {
                self.tokens.next();
                Statement::Return(self.next_expression(Precedence::Lowest)?)
            }
            _ => Statement::Expression(self.next_expression(Precedence::Lowest)?),
        };
        self.tokens.next_if_eq(&Token::Semicolon);
        Ok(statement)
    }

    fn skip_statement(&mut self) {
        for token in self.tokens.by_ref() {
            if token == Token::Semicolon {
                break;
            }
        }
    }

    fn expect(&mut self, wanted: Token, expected: Expected) -> Result<(), ParseError> {
        match self.tokens.next() {
            Some(token) if token == wanted => Ok(()),
            found => Err(ParseError::Unexpected { expected, found }),
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match self.tokens.next() {
            Some(Token::Ident(name)) => Ok(name),
            found => Err(ParseError::Unexpected {
                expected: Expected::Identifier,
                found,
            }),
        }
    }

    fn next_expression(&mut self, precedence: Precedence) -> Result<Expression, ParseError> {
        let entered = self.depth;
        let result = self.next_nested_expression(precedence);
        self.depth = entered;
        result
    }

    /// One level deeper for each prefix and each infix step, which tracks the tree's height.
    fn nest(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ParseError::TooDeeplyNested(MAX_NESTING));
        }
        Ok(())
    }

    fn next_nested_expression(&mut self, precedence: Precedence) -> Result<Expression, ParseError> {
        self.nest()?;
        let token = self.tokens.next();
        let mut left = self.parse_prefix(token)?;

        loop {
            let next_precedence = match self.tokens.peek() {
                Some(token) => Precedence::of(token),
                None => break,
            };
            if precedence >= next_precedence {
                break;
            }
            let Some(token) = self.tokens.next() else {
                break;
            };
            self.nest()?;
            left = self.parse_infix(left, token)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self, token: Option<Token>) -> Result<Expression, ParseError> {
        match token {
            Some(Token::Ident(name)) => Ok(Expression::Identifier(name)),
            Some(Token::Int(val)) => Ok(Expression::Integer(val)),
            Some(Token::Str(val)) => Ok(Expression::Str(val)),
            Some(Token::True) => Ok(Expression::Boolean(true)),
            Some(Token::False) => Ok(Expression::Boolean(false)),
            Some(Token::Bang) => self.parse_prefix_operator(Operator::Not),
            Some(Token::Minus) => self.parse_prefix_operator(Operator::Minus),
            Some(Token::LParen) => {
                let expr = self.next_expression(Precedence::Lowest)?;
                self.expect(Token::RParen, Expected::ClosingParen)?;
                Ok(expr)
            }
            Some(Token::LBracket) => Ok(Expression::Array(
                self.parse_list(Token::RBracket, Expected::ClosingBracket)?,
            )),
            Some(Token::If) => self.parse_if(),
            Some(Token::Function) => self.parse_function(),
            found => Err(ParseError::Unexpected {
                expected: Expected::Expression,
                found,
            }),
        }
    }

    fn parse_prefix_operator(&mut self, operator: Operator) -> Result<Expression, ParseError> {
        let right = self.next_expression(Precedence::Prefix)?;
        Ok(Expression::Prefix {
            operator,
            right: Box::new(right),
        })
    }

    fn parse_infix(&mut self, left: Expression, token: Token) -> Result<Expression, ParseError> {
        match token {
            Token::LParen => Ok(Expression::Call {
                function: Box::new(left),
                arguments: self.parse_list(Token::RParen, Expected::ClosingParen)?,
            }),
            Token::LBracket => {
                let index = self.next_expression(Precedence::Lowest)?;
                self.expect(Token::RBracket, Expected::ClosingBracket)?;
                Ok(Expression::Index {
                    left: Box::new(left),
                    index: Box::new(index),
                })
            }
            token => match infix_operator(&token) {
                Some(operator) => {
                    let right = self.next_expression(Precedence::of(&token))?;
                    Ok(Expression::Infix {
                        operator,
                        left: Box::new(left),
                        right: Box::new(right),
                    })
                }
                None => Err(ParseError::Unexpected {
                    expected: Expected::Expression,
                    found: Some(token),
                }),
            },
        }
    }

    /// Parse comma-separated expressions up to and including `close`.
    fn parse_list(&mut self, close: Token, expected: Expected) -> Result<Vec<Expression>, ParseError> {
        let mut items = Vec::new();
        if self.tokens.next_if_eq(&close).is_some() {
            return Ok(items);
        }
        loop {
            items.push(self.next_expression(Precedence::Lowest)?);
            match self.tokens.next() {
                Some(Token::Comma) => continue,
                Some(token) if token == close => return Ok(items),
                found => return Err(ParseError::Unexpected { expected, found }),
            }
        }
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.expect(Token::LBrace, Expected::OpeningBrace)?;
        let mut block = Vec::new();
        loop {
            match self.tokens.peek() {
                Some(Token::RBrace) => {
                    self.tokens.next();
                    return Ok(block);
                }
                Some(_) => block.push(self.next_statement()?),
                None => {
                    return Err(ParseError::Unexpected {
                        expected: Expected::ClosingBrace,
                        found: None,
                    });
                }
            }
        }
    }

    fn parse_if(&mut self) -> Result<Expression, ParseError> {
        self.expect(Token::LParen, Expected::OpeningParen)?;
        let condition = self.next_expression(Precedence::Lowest)?;
        self.expect(Token::RParen, Expected::ClosingParen)?;
        let consequence = self.parse_block()?;
        let alternative = if self.tokens.next_if_eq(&Token::Else).is_some() {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function(&mut self) -> Result<Expression, ParseError> {
        self.expect(Token::LParen, Expected::OpeningParen)?;
        let mut params = Vec::new();
        if self.tokens.next_if_eq(&Token::RParen).is_none() {
            loop {
                match self.tokens.next() {
                    Some(Token::Ident(name)) => params.push(name),
                    found => {
                        return Err(ParseError::Unexpected {
                            expected: Expected::Parameter,
                            found,
                        });
                    }
                }
                match self.tokens.next() {
                    Some(Token::Comma) => continue,
                    Some(Token::RParen) => break,
                    found => {
                        return Err(ParseError::Unexpected {
                            expected: Expected::ClosingParen,
                            found,
                        });
                    }
                }
            }
        }
        let body = self.parse_block()?;
        Ok(Expression::Function {
            params: Rc::new(params),
            body: Rc::new(body),
        })
    }
}
