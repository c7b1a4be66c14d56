// ABOUTME: Abstract syntax tree for Monkey programs.
// ABOUTME: Display renders the canonical, fully parenthesized source form.

use std::fmt;
use std::rc::Rc;

pub type Block = Vec<Statement>;

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(String, Expression),
    Return(Expression),
    Expression(Expression),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Not,
    LessThan,
    GreaterThan,
    Equal,
    NotEqual,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(String),
    Integer(i64),
    Str(String),
    Boolean(bool),
    Array(Vec<Expression>),
    Prefix {
        operator: Operator,
        right: Box<Expression>,
    },
    Infix {
        operator: Operator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        consequence: Block,
        alternative: Option<Block>,
    },
    /// Parameters and body are shared with every closure created from this literal.
    Function {
        params: Rc<Vec<String>>,
        body: Rc<Block>,
    },
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Index {
        left: Box<Expression>,
        index: Box<Expression>,
    },
}

/// Join displayable items with ", ".
pub fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a block as indented statements, one per line.
pub fn format_block(block: &[Statement]) -> String {
    block
        .iter()
        .fold(String::from("\n"), |acc, stmt| acc + &format!("    {};\n", stmt))
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Not => "!",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
        };
        write!(f, "{}", symbol)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(name, expr) => write!(f, "let {} = {}", name, expr),
            Statement::Return(expr) => write!(f, "return {}", expr),
            Statement::Expression(expr) => write!(f, "{}", expr),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(name) => write!(f, "{}", name),
            Expression::Integer(val) => write!(f, "{}", val),
            Expression::Str(val) => write!(f, "\"{}\"", val),
            Expression::Boolean(val) => write!(f, "{}", val),
            Expression::Array(items) => write!(f, "[{}]", join(items)),
            Expression::Prefix { operator, right } => write!(f, "({}{})", operator, right),
            Expression::Infix {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if {} {{{}}}", condition, format_block(consequence))?;
                if let Some(alternative) = alternative {
                    write!(f, " else {{{}}}", format_block(alternative))?;
                }
                Ok(())
            }
            Expression::Function { params, body } => {
                write!(f, "fn({}) {{{}}}", params.join(", "), format_block(body))
            }
            Expression::Call {
                function,
                arguments,
            } => write!(f, "{}({})", function, join(arguments)),
            Expression::Index { left, index } => write!(f, "({}[{}])", left, index),
        }
    }
}
