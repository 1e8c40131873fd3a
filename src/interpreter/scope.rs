use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::interpreter::{evaluator::builtin::BUILTIN_TABLE, value::core::Value};

/// One level of the scope chain.
#[derive(Default)]
struct Namespace {
    bindings: HashMap<String, Value>,
    outer:    Option<Scope>,
}

/// A shared handle to a namespace and, through it, to every enclosing one.
///
/// Cloning a `Scope` clones the handle: function values keep the scope they
/// were defined in alive by holding a clone.
///
/// # Example
/// ```
/// use pyrite::interpreter::{scope::Scope, value::core::Value};
///
/// let root = Scope::root();
/// root.assign("x", Value::Integer(1));
///
/// let inner = root.child();
/// inner.assign("y", Value::Integer(2));
///
/// assert_eq!(inner.lookup("x"), Some(Value::Integer(1)));
/// assert_eq!(root.lookup("y"), None);
/// assert!(root.lookup("len").is_some());
/// ```
#[derive(Clone, Default)]
pub struct Scope(Rc<RefCell<Namespace>>);

impl Scope {
    /// Creates the outermost scope, pre-populated with the built-in
    /// functions.
    #[must_use]
    pub fn root() -> Self {
        let bindings = BUILTIN_TABLE.iter()
                                    .map(|builtin| (builtin.name.to_string(), Value::Builtin(builtin)))
                                    .collect();
        Self(Rc::new(RefCell::new(Namespace { bindings,
                                              outer: None })))
    }

    /// Creates an empty scope enclosed by `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Self(Rc::new(RefCell::new(Namespace { bindings: HashMap::new(),
                                              outer:    Some(self.clone()), })))
    }

    /// Resolves `name` from the innermost scope outward.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut current = self.clone();
        loop {
            let next = {
                let namespace = current.0.borrow();
                if let Some(value) = namespace.bindings.get(name) {
                    return Some(value.clone());
                }
                namespace.outer.clone()?
            };
            current = next;
        }
    }

    /// Binds `name` in this scope, shadowing any outer binding.
    pub fn assign(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Returns the binding of `name` in this scope only.
    #[must_use]
    pub fn get_local(&self, name: &str) -> Option<Value> {
        self.0.borrow().bindings.get(name).cloned()
    }

    /// Number of enclosing scopes; the root has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.0.borrow().outer.clone();
        while let Some(scope) = current {
            depth += 1;
            current = scope.0.borrow().outer.clone();
        }
        depth
    }

    /// Names bound in this scope, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.borrow().bindings.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns `true` if both handles refer to the same namespace.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
         .field("depth", &self.depth())
         .field("names", &self.names())
         .finish()
    }
}
