// ABOUTME: Tree-walking evaluator for Monkey programs.
// ABOUTME: Collects printed output, bounds recursion depth, and honours the interrupt flag.

use crate::engine::Interrupt;
use crate::engine::ast::{Expression, Operator, Program, Statement};
use crate::engine::error::EvalError;
use crate::engine::object::{Builtin, Env, Function, Object};

/// Early exit from a block: a `return` unwinding to the enclosing call, or an error.
#[derive(Debug)]
enum Unwind {
    Return(Object),
    Error(EvalError),
}

impl From<EvalError> for Unwind {
    fn from(err: EvalError) -> Self {
        Unwind::Error(err)
    }
}

type EvalResult = Result<Object, Unwind>;

/// Live `eval_expression` frames allowed across all active calls. Caps stack use
/// even when `max_call_depth` is configured very high.
pub const MAX_EXPRESSION_DEPTH: usize = 2048;

pub struct Evaluator<'a> {
    interrupt: &'a Interrupt,
    max_call_depth: usize,
    depth: usize,
    nesting: usize,
    output: Vec<String>,
}

impl<'a> Evaluator<'a> {
    pub fn new(interrupt: &'a Interrupt, max_call_depth: usize) -> Self {
        Self {
            interrupt,
            max_call_depth,
            depth: 0,
            nesting: 0,
            output: Vec::new(),
        }
    }

    /// Lines written by `print` so far, in order.
    pub fn into_output(self) -> Vec<String> {
        self.output
    }

    /// Evaluate a program in `env`. A top-level `return` ends the program with its value.
    pub fn eval_program(&mut self, program: &Program, env: &Env) -> Result<Object, EvalError> {
        match self.eval_block(&program.statements, env) {
            Ok(object) | Err(Unwind::Return(object)) => Ok(object),
            Err(Unwind::Error(err)) => Err(err),
        }
    }

    fn eval_block(&mut self, block: &[Statement], env: &Env) -> EvalResult {
        let mut result = Object::Null;
        for statement in block {
            result = self.eval_statement(statement, env)?;
        }
        Ok(result)
    }

    fn eval_statement(&mut self, statement: &Statement, env: &Env) -> EvalResult {
        if self.interrupt.is_triggered() {
            return Err(EvalError::Interrupted.into());
        }
        match statement {
            Statement::Let(name, expr) => {
                let value = self.eval_expression(expr, env)?;
                env.set(name.clone(), value);
                Ok(Object::Null)
            }
            Statement::Return(expr) => {
                let value = self.eval_expression(expr, env)?;
                Err(Unwind::Return(value))
            }
            Statement::Expression(expr) => self.eval_expression(expr, env),
        }
    }

    fn eval_expression(&mut self, expr: &Expression, env: &Env) -> EvalResult {
        if self.nesting >= MAX_EXPRESSION_DEPTH {
            return Err(EvalError::NestingLimit(MAX_EXPRESSION_DEPTH).into());
        }
        self.nesting += 1;
        let result = self.eval_nested_expression(expr, env);
        self.nesting -= 1;
        result
    }

    fn eval_nested_expression(&mut self, expr: &Expression, env: &Env) -> EvalResult {
        match expr {
            Expression::Identifier(name) => env
                .get(name)
                .ok_or_else(|| EvalError::UnknownIdentifier(name.clone()).into()),
            Expression::Integer(val) => Ok(Object::Integer(*val)),
            Expression::Str(val) => Ok(Object::Str(val.clone())),
            Expression::Boolean(val) => Ok(Object::Boolean(*val)),
            Expression::Array(items) => Ok(Object::Array(self.eval_all(items, env)?)),
            Expression::Prefix { operator, right } => {
                let right = self.eval_expression(right, env)?;
                Ok(apply_prefix(*operator, right)?)
            }
            Expression::Infix {
                operator,
                left,
                right,
            } => {
                let left = self.eval_expression(left, env)?;
                let right = self.eval_expression(right, env)?;
                Ok(apply_infix(*operator, left, right)?)
            }
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                if self.eval_expression(condition, env)?.is_truthy() {
                    self.eval_block(consequence, env)
                } else if let Some(alternative) = alternative {
                    self.eval_block(alternative, env)
                } else {
                    Ok(Object::Null)
                }
            }
            Expression::Function { params, body } => Ok(Object::Function(Function {
                params: params.clone(),
                body: body.clone(),
                env: env.clone(),
            })),
            Expression::Call {
                function,
                arguments,
            } => {
                let callee = self.eval_expression(function, env)?;
                let args = self.eval_all(arguments, env)?;
                Ok(self.apply(callee, args)?)
            }
            Expression::Index { left, index } => {
                let left = self.eval_expression(left, env)?;
                let index = self.eval_expression(index, env)?;
                Ok(apply_index(left, index)?)
            }
        }
    }

    fn eval_all(&mut self, exprs: &[Expression], env: &Env) -> Result<Vec<Object>, Unwind> {
        exprs
            .iter()
            .map(|expr| self.eval_expression(expr, env))
            .collect()
    }

    fn apply(&mut self, callee: Object, args: Vec<Object>) -> Result<Object, EvalError> {
        match callee {
            Object::Function(func) => self.apply_function(func, args),
            Object::Builtin(builtin) => self.apply_builtin(builtin, args),
            other => Err(EvalError::NotCallable(other.type_name())),
        }
    }

    fn apply_function(&mut self, func: Function, args: Vec<Object>) -> Result<Object, EvalError> {
        if func.params.len() != args.len() {
            return Err(EvalError::WrongArgumentCount {
                expected: func.params.len(),
                given: args.len(),
            });
        }
        if self.depth >= self.max_call_depth {
            return Err(EvalError::RecursionLimit(self.max_call_depth));
        }

        let scope = Env::extend(&func.env);
        for (name, value) in func.params.iter().zip(args) {
            scope.set(name.clone(), value);
        }

        self.depth += 1;
        let result = self.eval_block(&func.body, &scope);
        self.depth -= 1;

        match result {
            Ok(object) | Err(Unwind::Return(object)) => Ok(object),
            Err(Unwind::Error(err)) => Err(err),
        }
    }

    fn apply_builtin(&mut self, builtin: Builtin, args: Vec<Object>) -> Result<Object, EvalError> {
        match (builtin, args.as_slice()) {
            (Builtin::Print, _) => {
                let line = args
                    .iter()
                    .map(|arg| arg.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                self.output.push(line);
                Ok(Object::Null)
            }
            (Builtin::Len, [Object::Str(s)]) => Ok(Object::Integer(s.chars().count() as i64)),
            (Builtin::Len, [Object::Array(items)]) => Ok(Object::Integer(items.len() as i64)),
            (Builtin::First, [Object::Array(items)]) => {
                Ok(items.first().cloned().unwrap_or(Object::Null))
            }
            (Builtin::Last, [Object::Array(items)]) => {
                Ok(items.last().cloned().unwrap_or(Object::Null))
            }
            (Builtin::Rest, [Object::Array(items)]) => match items.split_first() {
                Some((_, rest)) => Ok(Object::Array(rest.to_vec())),
                None => Ok(Object::Null),
            },
            (Builtin::Push, [Object::Array(items), value]) => {
                let mut items = items.clone();
                items.push(value.clone());
                Ok(Object::Array(items))
            }
            (Builtin::Push, [other, _]) => Err(EvalError::Type(format!(
                "push() argument 1 must be list, not {}",
                other.type_name()
            ))),
            (Builtin::Push, _) => Err(EvalError::Type(format!(
                "push() takes exactly 2 arguments ({} given)",
                args.len()
            ))),
            (builtin, [other]) => Err(EvalError::Type(format!(
                "object of type '{}' has no {}()",
                other.type_name(),
                builtin.name()
            ))),
            (builtin, _) => Err(EvalError::Type(format!(
                "{}() takes exactly one argument ({} given)",
                builtin.name(),
                args.len()
            ))),
        }
    }
}

fn apply_prefix(operator: Operator, right: Object) -> Result<Object, EvalError> {
    match (operator, right) {
        (Operator::Not, right) => Ok(Object::Boolean(!right.is_truthy())),
        (Operator::Minus, Object::Integer(val)) => {
            val.checked_neg().map(Object::Integer).ok_or(EvalError::Overflow)
        }
        (operator, right) => Err(EvalError::BadOperand {
            operator,
            operand: right.type_name(),
        }),
    }
}

fn apply_infix(operator: Operator, left: Object, right: Object) -> Result<Object, EvalError> {
    use Object::{Integer, Str};
    match (operator, left, right) {
        (Operator::Plus, Integer(l), Integer(r)) => checked(l.checked_add(r)),
        (Operator::Minus, Integer(l), Integer(r)) => checked(l.checked_sub(r)),
        (Operator::Multiply, Integer(l), Integer(r)) => checked(l.checked_mul(r)),
        (Operator::Divide, Integer(_), Integer(0)) => Err(EvalError::DivisionByZero),
        (Operator::Divide, Integer(l), Integer(r)) => checked(l.checked_div(r)),
        (Operator::LessThan, Integer(l), Integer(r)) => Ok((l < r).into()),
        (Operator::GreaterThan, Integer(l), Integer(r)) => Ok((l > r).into()),
        (Operator::Plus, Str(l), Str(r)) => Ok(Str(l + &r)),
        (Operator::Equal, l, r) => Ok((l == r).into()),
        (Operator::NotEqual, l, r) => Ok((l != r).into()),
        (operator, l, r) => Err(EvalError::TypeMismatch {
            operator,
            left: l.type_name(),
            right: r.type_name(),
        }),
    }
}

fn checked(result: Option<i64>) -> Result<Object, EvalError> {
    result.map(Object::Integer).ok_or(EvalError::Overflow)
}

fn apply_index(left: Object, index: Object) -> Result<Object, EvalError> {
    match (left, index) {
        (Object::Array(items), Object::Integer(i)) => {
            if i < 0 {
                return Err(EvalError::Index("list indices must be positive".to_string()));
            }
            items
                .get(i as usize)
                .cloned()
                .ok_or_else(|| EvalError::Index("list index out of range".to_string()))
        }
        (Object::Array(_), other) => Err(EvalError::Type(format!(
            "list indices must be integers, not {}",
            other.type_name()
        ))),
        (other, _) => Err(EvalError::Type(format!(
            "object of type '{}' has no index",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::lexer::Lexer;
    use crate::engine::parser::Parser;

    fn run_with_depth(input: &str, max_call_depth: usize) -> (Result<Object, EvalError>, Vec<String>) {
        let program = Parser::new(Lexer::new(input))
            .parse()
            .expect("no parse errors");
        let interrupt = Interrupt::default();
        let mut evaluator = Evaluator::new(&interrupt, max_call_depth);
        let result = evaluator.eval_program(&program, &Env::new());
        (result, evaluator.into_output())
    }

    fn eval(input: &str) -> Result<Object, EvalError> {
        run_with_depth(input, 64).0
    }

    fn assert_value(input: &str, expected: Object) {
        match eval(input) {
            Ok(value) => assert_eq!(value, expected, "input: {}", input),
            Err(err) => panic!("input {:?} failed: {}", input, err),
        }
    }

    fn assert_error(input: &str, expected: EvalError) {
        match eval(input) {
            Ok(value) => panic!("input {:?} returned {}", input, value),
            Err(err) => assert_eq!(err, expected, "input: {}", input),
        }
    }

    #[test]
    fn integer_arithmetic() {
        assert_value("5 + 5 * 2 - 10 / 2", 10.into());
        assert_value("-(3 - 10)", 7.into());
        assert_value("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50.into());
    }

    #[test]
    fn comparisons_and_negation() {
        assert_value("1 < 2 == true", true.into());
        assert_value("!5", false.into());
        assert_value("!!true", true.into());
        assert_value("\"a\" == \"a\"", true.into());
        assert_value("1 != 1", false.into());
    }

    #[test]
    fn if_without_alternative_is_null() {
        assert_value("if (false) { 10 }", Object::Null);
        assert_value("if (1 > 2) { 10 } else { 20 }", 20.into());
    }

    #[test]
    fn let_binds_and_evaluates_to_null() {
        assert_value("let x = 5;", Object::Null);
        assert_value("let x = 5; x;", 5.into());
    }

    #[test]
    fn return_unwinds_nested_blocks() {
        assert_value("if (10 > 1) { if (10 > 1) { return 10; } return 1; }", 10.into());
        assert_value("let f = fn() { return 1; 2 }; f()", 1.into());
    }

    #[test]
    fn closures_capture_environment() {
        let input = "
            let newAdder = fn(x) { fn(y) { x + y } };
            let addTwo = newAdder(2);
            addTwo(3);";
        assert_value(input, 5.into());
    }

    #[test]
    fn function_scope_does_not_leak() {
        let input = "
            let first = 10;
            let second = 10;
            let third = 10;
            let ourFunction = fn(first) { let second = 20; first + second + third; };
            ourFunction(20) + first + second;";
        assert_value(input, 70.into());
    }

    #[test]
    fn builtins() {
        assert_value(r#"len("four")"#, 4.into());
        assert_value("len([1, 2])", 2.into());
        assert_value("first([1, 2])", 1.into());
        assert_value("last([1, 2])", 2.into());
        assert_value("rest([1, 2])", Object::Array(vec![2.into()]));
        assert_value("rest([])", Object::Null);
        assert_value("push([0], 3)", Object::Array(vec![0.into(), 3.into()]));
        assert_value("[1, 2, 3][1]", 2.into());
    }

    #[test]
    fn print_collects_output_lines() {
        let (result, output) = run_with_depth("print(1, 2); print(\"three\"); 4", 64);
        assert_eq!(result, Ok(4.into()));
        assert_eq!(output, vec!["1 2", "three"]);
    }

    #[test]
    fn output_before_an_error_is_kept() {
        let (result, output) = run_with_depth("print(3); len(1)", 64);
        assert!(result.is_err());
        assert_eq!(output, vec!["3"]);
    }

    #[test]
    fn runtime_errors() {
        assert_error("foobar", EvalError::UnknownIdentifier("foobar".to_string()));
        assert_error(
            "5 + true",
            EvalError::TypeMismatch {
                operator: Operator::Plus,
                left: "int",
                right: "bool",
            },
        );
        assert_error(
            "-true",
            EvalError::BadOperand {
                operator: Operator::Minus,
                operand: "bool",
            },
        );
        assert_error("1 / 0", EvalError::DivisionByZero);
        assert_error("5(1)", EvalError::NotCallable("int"));
        assert_error(
            "fn(x) { x }(1, 2)",
            EvalError::WrongArgumentCount {
                expected: 1,
                given: 2,
            },
        );
        assert_error(
            "len(1)",
            EvalError::Type("object of type 'int' has no len()".to_string()),
        );
        assert_error(
            "[][-1]",
            EvalError::Index("list indices must be positive".to_string()),
        );
        assert_error(
            "[1][\"a\"]",
            EvalError::Type("list indices must be integers, not string".to_string()),
        );
        assert_error("9223372036854775807 + 1", EvalError::Overflow);
    }

    #[test]
    fn runaway_recursion_hits_the_depth_limit() {
        let (result, _) = run_with_depth("let f = fn(n) { f(n + 1) }; f(0)", 32);
        assert_eq!(result, Err(EvalError::RecursionLimit(32)));
    }

    #[test]
    fn depth_counters_unwind_after_an_error() {
        let program = Parser::new(Lexer::new("let f = fn(n) { f(n + 1) }; f(0)"))
            .parse()
            .expect("no parse errors");
        let retry = Parser::new(Lexer::new("let g = fn(n) { if (n == 0) { 0 } else { g(n - 1) } }; g(20)"))
            .parse()
            .expect("no parse errors");
        let interrupt = Interrupt::default();
        let env = Env::new();
        let mut evaluator = Evaluator::new(&interrupt, 32);
        assert_eq!(
            evaluator.eval_program(&program, &env),
            Err(EvalError::RecursionLimit(32))
        );
        assert_eq!(evaluator.depth, 0);
        assert_eq!(evaluator.nesting, 0);
        assert_eq!(evaluator.eval_program(&retry, &env), Ok(0.into()));
    }

    #[test]
    fn triggered_interrupt_stops_evaluation() {
        let program = Parser::new(Lexer::new("let a = 1; a"))
            .parse()
            .expect("no parse errors");
        let interrupt = Interrupt::default();
        interrupt.trigger();
        let mut evaluator = Evaluator::new(&interrupt, 64);
        let result = evaluator.eval_program(&program, &Env::new());
        assert_eq!(result, Err(EvalError::Interrupted));
    }

    #[test]
    fn map_and_reduce_written_in_monkey() {
        let input = "
            let map = fn(arr, f) {
              let iter = fn(arr, acc) {
                if (len(arr) == 0) { acc } else { iter(rest(arr), push(acc, f(first(arr)))) }
              };
              iter(arr, [])
            };
            let reduce = fn(arr, initial, f) {
              let iter = fn(arr, result) {
                if (len(arr) == 0) { result } else { iter(rest(arr), f(result, first(arr))) }
              };
              iter(arr, initial)
            };
            reduce(map([1, 2, 3, 4], fn(x) { x * 2 }), 0, fn(a, b) { a + b });";
        assert_value(input, 20.into());
    }
}
