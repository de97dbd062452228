use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// A single scope frame: a mapping from names to values plus an optional
/// pointer to the enclosing frame. The outermost frame is the globals.
/// Closures hold strong references into the chain, so a frame lives for as
/// long as any function that captured it.
#[derive(Debug, Clone)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    pub variables: HashMap<String, Object>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment {
            enclosing,
            variables: HashMap::new(),
        }
    }

    /// Binds a new value under the name in this frame.
    pub fn define(&mut self, name: &str, value: Object) {
        self.variables.insert(name.to_string(), value);
    }

    /// Returns the frame `distance` hops up the enclosing chain. The
    /// resolver computed the distance against the same chain, so every hop
    /// must land on a frame.
    fn ancestor(&self, distance: usize) -> Rc<RefCell<Environment>> {
        let mut frame = self.enclosing.clone()
            .unwrap_or_else(|| panic!("missing frame at hop 1 of {distance}"));

        for hop in 2..=distance {
            let parent = frame.borrow().enclosing.clone()
                .unwrap_or_else(|| panic!("missing frame at hop {hop} of {distance}"));
            frame = parent;
        }

        frame
    }

    /// Assigns a new value to an existing name, walking the enclosing chain.
    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.variables.contains_key(&name.lexeme) {
            self.variables.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    /// Assigns a new value to the name in the frame at the given distance.
    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Object) {
        if distance > 0 {
            self.ancestor(distance).borrow_mut().variables.insert(name.lexeme.clone(), value);
        } else {
            self.variables.insert(name.lexeme.clone(), value);
        }
    }

    /// Returns the value bound to the name, walking the enclosing chain.
    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(variable) = self.variables.get(&name.lexeme) {
            return Ok(variable.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    /// Returns the value bound to the name in the frame at the given distance.
    pub fn get_at(&self, distance: usize, name: &Token) -> Result<Object, RuntimeError> {
        let variable = if distance > 0 {
            self.ancestor(distance).borrow().variables.get(&name.lexeme).cloned()
        } else {
            self.variables.get(&name.lexeme).cloned()
        };

        variable.ok_or_else(|| RuntimeError {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn define_and_get() {
        let mut environment = Environment::default();
        environment.define("a", Object::from(1.0));

        assert_eq!(environment.get(&Token::from("a")).unwrap(), Object::from(1.0));
        assert!(environment.get(&Token::from("b")).is_err());
    }

    #[test]
    fn define_shadows_in_same_frame() {
        let mut environment = Environment::default();
        environment.define("a", Object::from(1.0));
        environment.define("a", Object::from(2.0));

        assert_eq!(environment.get(&Token::from("a")).unwrap(), Object::from(2.0));
    }

    #[test]
    fn get_walks_enclosing_chain() {
        let globals = Rc::new(RefCell::new(Environment::default()));
        globals.borrow_mut().define("a", Object::from("global"));

        let inner = Environment::new(Some(Rc::clone(&globals)));
        assert_eq!(inner.get(&Token::from("a")).unwrap(), Object::from("global"));
    }

    #[test]
    fn assign_writes_to_defining_frame() {
        let globals = Rc::new(RefCell::new(Environment::default()));
        globals.borrow_mut().define("a", Object::from(1.0));

        let mut inner = Environment::new(Some(Rc::clone(&globals)));
        inner.assign(&Token::from("a"), Object::from(2.0)).unwrap();

        assert!(inner.variables.is_empty());
        assert_eq!(globals.borrow().get(&Token::from("a")).unwrap(), Object::from(2.0));
    }

    #[test]
    fn assign_to_undefined_errors() {
        let mut environment = Environment::default();
        let error = environment.assign(&Token::from("ghost"), Object::from(1.0)).unwrap_err();

        assert_eq!(error.message, "Undefined variable 'ghost'.");
    }

    #[test]
    fn get_at_reaches_exact_frame() {
        let globals = Rc::new(RefCell::new(Environment::default()));
        globals.borrow_mut().define("a", Object::from("global"));

        let middle = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&globals)))));
        middle.borrow_mut().define("a", Object::from("middle"));

        let inner = Environment::new(Some(Rc::clone(&middle)));

        assert_eq!(inner.get_at(1, &Token::from("a")).unwrap(), Object::from("middle"));
        assert_eq!(inner.get_at(2, &Token::from("a")).unwrap(), Object::from("global"));
    }

    #[test]
    fn assign_at_reaches_exact_frame() {
        let globals = Rc::new(RefCell::new(Environment::default()));
        globals.borrow_mut().define("a", Object::from("global"));

        let mut inner = Environment::new(Some(Rc::clone(&globals)));
        inner.assign_at(1, &Token::from("a"), Object::from("changed"));

        assert_eq!(globals.borrow().get(&Token::from("a")).unwrap(), Object::from("changed"));
    }
}
