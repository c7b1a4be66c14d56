// ABOUTME: Runtime values and lexical environments of the Monkey interpreter.
// ABOUTME: Env is a cheap-to-clone handle onto a shared, parent-linked scope.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::engine::ast::{Block, format_block};

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Null,
    Boolean(bool),
    Integer(i64),
    Str(String),
    Array(Vec<Object>),
    Function(Function),
    Builtin(Builtin),
}

impl Object {
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "null",
            Object::Boolean(_) => "bool",
            Object::Integer(_) => "int",
            Object::Str(_) => "string",
            Object::Array(_) => "list",
            Object::Function(_) => "function",
            Object::Builtin(_) => "builtin_function",
        }
    }
}

impl From<bool> for Object {
    fn from(val: bool) -> Self {
        Object::Boolean(val)
    }
}

impl From<i64> for Object {
    fn from(val: i64) -> Self {
        Object::Integer(val)
    }
}

impl From<&str> for Object {
    fn from(val: &str) -> Self {
        Object::Str(val.to_string())
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Null => write!(f, "null"),
            Object::Boolean(val) => write!(f, "{}", val),
            Object::Integer(val) => write!(f, "{}", val),
            Object::Str(val) => write!(f, "{}", val),
            Object::Array(items) => write!(f, "[{}]", crate::engine::ast::join(items)),
            Object::Function(func) => write!(f, "{}", func),
            Object::Builtin(builtin) => write!(f, "<built-in function {}>", builtin.name()),
        }
    }
}

/// A closure: parameters and body shared with the literal, plus its defining scope.
#[derive(Clone)]
pub struct Function {
    pub params: Rc<Vec<String>>,
    pub body: Rc<Block>,
    pub env: Env,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.body, &other.body) && Rc::ptr_eq(&self.env.0, &other.env.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The env may contain this function; printing it would recurse forever.
        f.debug_struct("Function")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fn({}) {{{}}}",
            self.params.join(", "),
            format_block(&self.body)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Len,
    First,
    Last,
    Rest,
    Push,
    Print,
}

impl Builtin {
    pub const ALL: [Builtin; 6] = [
        Builtin::Len,
        Builtin::First,
        Builtin::Last,
        Builtin::Rest,
        Builtin::Push,
        Builtin::Print,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Len => "len",
            Builtin::First => "first",
            Builtin::Last => "last",
            Builtin::Rest => "rest",
            Builtin::Push => "push",
            Builtin::Print => "print",
        }
    }
}

#[derive(Debug, Default)]
struct Scope {
    store: HashMap<String, Object>,
    parent: Option<Env>,
}

#[derive(Debug, Clone)]
pub struct Env(Rc<RefCell<Scope>>);

impl Env {
    /// A fresh global scope with every builtin bound.
    pub fn new() -> Self {
        let env = Env(Rc::new(RefCell::new(Scope::default())));
        for builtin in Builtin::ALL {
            env.set(builtin.name().to_string(), Object::Builtin(builtin));
        }
        env
    }

    /// A child scope whose lookups fall back to `parent`.
    pub fn extend(parent: &Env) -> Self {
        Env(Rc::new(RefCell::new(Scope {
            store: HashMap::new(),
            parent: Some(parent.clone()),
        })))
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        let scope = self.0.borrow();
        match scope.store.get(name) {
            Some(object) => Some(object.clone()),
            None => scope.parent.as_ref().and_then(|parent| parent.get(name)),
        }
    }

    pub fn set(&self, name: String, value: Object) {
        self.0.borrow_mut().store.insert(name, value);
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_bound_in_new_env() {
        let env = Env::new();
        assert_eq!(env.get("len"), Some(Object::Builtin(Builtin::Len)));
        assert_eq!(env.get("print"), Some(Object::Builtin(Builtin::Print)));
    }

    #[test]
    fn child_scope_shadows_and_falls_back() {
        let global = Env::new();
        global.set("x".to_string(), 1.into());
        global.set("y".to_string(), 2.into());

        let child = Env::extend(&global);
        child.set("x".to_string(), 10.into());

        assert_eq!(child.get("x"), Some(Object::Integer(10)));
        assert_eq!(child.get("y"), Some(Object::Integer(2)));
        assert_eq!(global.get("x"), Some(Object::Integer(1)));
        assert_eq!(child.get("missing"), None);
    }

    #[test]
    fn truthiness() {
        assert!(!Object::Null.is_truthy());
        assert!(!Object::Boolean(false).is_truthy());
        assert!(Object::Integer(0).is_truthy());
        assert!(Object::from("").is_truthy());
    }

    #[test]
    fn display_of_values() {
        let list = Object::Array(vec![1.into(), "two".into(), true.into()]);
        assert_eq!(list.to_string(), "[1, two, true]");
        assert_eq!(Object::Null.to_string(), "null");
        assert_eq!(
            Object::Builtin(Builtin::Len).to_string(),
            "<built-in function len>"
        );
    }
}
