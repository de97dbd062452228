use std::collections::HashMap;
use std::mem;

use crate::error::{Error, ResolveError};
use crate::expr::Expr;
use crate::interpreter::Interpreter;
use crate::stmt::{ClassData, FunctionData, Stmt};
use crate::token::Token;

enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

enum ClassType {
    None,
    Class,
    Subclass,
}

/// Static pass over the parsed program, run before interpretation.
///
/// Walks the tree once, tracking a stack of block scopes, and registers the
/// lexical distance of every local variable reference with the interpreter.
/// A scope entry is `false` while the name is declared but its initializer
/// has not finished, and `true` once the name is usable. Scope related
/// mistakes (duplicate names, `this` outside a class, ...) are reported here
/// without stopping the pass, so a single run surfaces all of them.
pub struct Resolver<'a, 'w> {
    interpreter: &'a mut Interpreter<'w>,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl<'a, 'w> Resolver<'a, 'w> {
    pub fn new(interpreter: &'a mut Interpreter<'w>) -> Self {
        Resolver {
            interpreter,
            scopes: vec![],
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    /// Resolves the statements in order.
    pub fn resolve(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Introduces the name in the innermost scope without making it usable.
    /// At global scope this is a no-op; globals may be redeclared freely.
    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };

        if scope.contains_key(&name.lexeme) {
            ResolveError {
                token: name.clone(),
                message: "Variable with this name already declared in this scope.".to_string(),
            }.throw();
        }

        scope.insert(name.lexeme.clone(), false);
    }

    /// Marks the name as usable in the innermost scope.
    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    /// Searches the scopes innermost outward and registers the distance of
    /// the match. No match means the name lives in globals and nothing is
    /// registered.
    fn resolve_local(&mut self, id: usize, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(id, depth);
                return;
            }
        }
    }

    fn resolve_function(&mut self, function: &FunctionData, r#type: FunctionType) {
        let enclosing_function = mem::replace(&mut self.current_function, r#type);

        self.begin_scope();
        for param in &function.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve(&function.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(data) => self.resolve_expr(&data.expr),
            Stmt::Print(data) => self.resolve_expr(&data.expr),
            Stmt::Var(data) => {
                self.declare(&data.name);
                if let Some(initializer) = &data.initializer {
                    self.resolve_expr(initializer);
                }
                self.define(&data.name);
            },
            Stmt::Block(data) => {
                self.begin_scope();
                self.resolve(&data.statements);
                self.end_scope();
            },
            Stmt::If(data) => {
                self.resolve_expr(&data.condition);
                self.resolve_stmt(&data.then_branch);
                if let Some(else_branch) = &data.else_branch {
                    self.resolve_stmt(else_branch);
                }
            },
            Stmt::While(data) => {
                self.resolve_expr(&data.condition);
                self.resolve_stmt(&data.body);
            },
            Stmt::Function(data) => {
                self.declare(&data.name);
                self.define(&data.name);

                self.resolve_function(data, FunctionType::Function);
            },
            Stmt::Return(data) => {
                if let FunctionType::None = self.current_function {
                    ResolveError {
                        token: data.keyword.clone(),
                        message: "Cannot return from top-level code.".to_string(),
                    }.throw();
                }

                if let Some(value) = &data.value {
                    if let FunctionType::Initializer = self.current_function {
                        ResolveError {
                            token: data.keyword.clone(),
                            message: "Cannot return a value from an initializer.".to_string(),
                        }.throw();
                        return;
                    }

                    self.resolve_expr(value);
                }
            },
            Stmt::Class(data) => self.resolve_class(data),
        }
    }

    fn resolve_class(&mut self, data: &ClassData) {
        let enclosing_class = mem::replace(&mut self.current_class, ClassType::Class);

        self.declare(&data.name);
        self.define(&data.name);

        if let Some(superclass) = &data.superclass {
            if data.name.lexeme == superclass.name.lexeme {
                ResolveError {
                    token: superclass.name.clone(),
                    message: "A class cannot inherit from itself.".to_string(),
                }.throw();
            }

            self.current_class = ClassType::Subclass;

            self.resolve_local(superclass.id, &superclass.name);

            // Method closures reach the superclass through this extra scope.
            self.begin_scope();
            self.define(&Token::from("super"));
        }

        self.begin_scope();
        self.define(&Token::from("this"));

        for method in &data.methods {
            let function_type = if method.name.lexeme == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };
            self.resolve_function(method, function_type);
        }

        self.end_scope();

        if data.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {},
            Expr::Grouping(data) => self.resolve_expr(&data.expr),
            Expr::Unary(data) => self.resolve_expr(&data.expr),
            Expr::Binary(data) => {
                self.resolve_expr(&data.left);
                self.resolve_expr(&data.right);
            },
            Expr::Logical(data) => {
                self.resolve_expr(&data.left);
                self.resolve_expr(&data.right);
            },
            Expr::Variable(data) => {
                // Declared but not yet defined means the variable's own
                // initializer is reading it.
                let entry = self.scopes.last().and_then(|scope| scope.get(&data.name.lexeme));
                if entry == Some(&false) {
                    ResolveError {
                        token: data.name.clone(),
                        message: "Cannot read local variable in its own initializer.".to_string(),
                    }.throw();
                }

                self.resolve_local(data.id, &data.name);
            },
            Expr::Assign(data) => {
                self.resolve_expr(&data.value);
                self.resolve_local(data.id, &data.name);
            },
            Expr::Call(data) => {
                self.resolve_expr(&data.callee);

                for argument in &data.arguments {
                    self.resolve_expr(argument);
                }
            },
            Expr::Get(data) => self.resolve_expr(&data.object),
            Expr::Set(data) => {
                self.resolve_expr(&data.value);
                self.resolve_expr(&data.object);
            },
            Expr::This(data) => {
                if let ClassType::None = self.current_class {
                    ResolveError {
                        token: data.keyword.clone(),
                        message: "Can't use 'this' outside of a class.".to_string(),
                    }.throw();

                    return;
                }

                self.resolve_local(data.id, &data.keyword);
            },
            Expr::Super(data) => {
                let complaint = match self.current_class {
                    ClassType::Subclass => None,
                    ClassType::None => Some("Cannot use 'super' outside of a class."),
                    ClassType::Class => Some("Cannot use 'super' in a class with no superclass."),
                };

                if let Some(message) = complaint {
                    ResolveError {
                        token: data.keyword.clone(),
                        message: message.to_string(),
                    }.throw();
                }

                self.resolve_local(data.id, &data.keyword);
            },
        }
    }
}
