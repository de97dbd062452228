use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::mem;
use std::rc::Rc;

use crate::class::Class;
use crate::environment::Environment;
use crate::error::{Error, RuntimeError, Unwind};
use crate::expr::{BinaryData, CallData, Expr, SuperData, UnaryData};
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::{ClassData, Stmt};
use crate::token::{Token, Type};

/// Walks a resolved statement list and executes it.
///
/// The interpreter owns the global environment and a pointer to the current
/// one, plus the resolution table built by the resolver that maps expression
/// identities to lexical distances. Everything the program prints goes to the
/// output sink.
pub struct Interpreter<'a> {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<usize, usize>,
    output: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    pub fn new(output: &'a mut dyn Write) -> Self {
        let globals = Rc::new(RefCell::new(Environment::new(None)));

        for native in NativeFunction::natives() {
            let name = native.name.lexeme.clone();
            globals.borrow_mut().define(&name, Object::from(native));
        }

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            output,
        }
    }

    /// Executes the statements in order.
    /// A runtime error reports itself and aborts the rest of the program.
    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            if let Err(unwind) = self.execute(statement) {
                match unwind {
                    Unwind::Error(error) => error.throw(),
                    Unwind::Return(_) => unreachable!("return outside of a function"),
                };
                return;
            }
        }
    }

    /// Registers the lexical distance of a resolved expression.
    /// Called by the resolver before interpretation starts.
    pub fn resolve(&mut self, id: usize, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Returns the registered distance of a resolved expression.
    #[cfg(test)]
    pub(crate) fn resolved_depth(&self, id: usize) -> Option<usize> {
        self.locals.get(&id).copied()
    }

    /// Executes the statements inside the given environment, restoring the
    /// previous environment on every exit path.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<(), Unwind> {
        let previous = mem::replace(&mut self.environment, environment);
        let result = statements.iter().try_for_each(|statement| self.execute(statement));
        self.environment = previous;

        result
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        match stmt {
            Stmt::Expression(data) => {
                self.evaluate(&data.expr)?;
                Ok(())
            },
            Stmt::Print(data) => {
                let value = self.evaluate(&data.expr)?;
                writeln!(self.output, "{value}").expect("output to be writable");
                Ok(())
            },
            Stmt::Var(data) => {
                let value = match &data.initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Object::from(Literal::Nil),
                };

                self.environment.borrow_mut().define(&data.name.lexeme, value);
                Ok(())
            },
            Stmt::Block(data) => {
                let environment = Environment::new(Some(Rc::clone(&self.environment)));
                self.execute_block(&data.statements, Rc::new(RefCell::new(environment)))
            },
            Stmt::If(data) => {
                if self.evaluate(&data.condition)?.is_truthy() {
                    self.execute(&data.then_branch)
                } else if let Some(else_branch) = &data.else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            },
            Stmt::While(data) => {
                while self.evaluate(&data.condition)?.is_truthy() {
                    self.execute(&data.body)?;
                }
                Ok(())
            },
            Stmt::Function(data) => {
                let function = Function::new(
                    Rc::new(data.clone()),
                    Rc::clone(&self.environment),
                    false,
                );

                self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));
                Ok(())
            },
            Stmt::Return(data) => {
                let value = match &data.value {
                    Some(value) => self.evaluate(value)?,
                    None => Object::from(Literal::Nil),
                };

                Err(Unwind::Return(value))
            },
            Stmt::Class(data) => self.execute_class(data),
        }
    }

    /// Executes a class declaration.
    /// The class name is defined before the methods are built so that they
    /// can refer to the class. When there is a superclass, the methods close
    /// over an extra frame that binds `super`.
    fn execute_class(&mut self, data: &ClassData) -> Result<(), Unwind> {
        let superclass = match &data.superclass {
            Some(variable) => match self.look_up_variable(&variable.name, variable.id)? {
                Object::Class(class) => Some(class),
                _ => {
                    return Err(RuntimeError {
                        token: variable.name.clone(),
                        message: "Superclass must be a class.".to_string(),
                    }.into());
                },
            },
            None => None,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(Literal::Nil));

        let enclosing = superclass.as_ref().map(|superclass| {
            let mut environment = Environment::new(Some(Rc::clone(&self.environment)));
            environment.define("super", Object::Class(Rc::clone(superclass)));
            mem::replace(&mut self.environment, Rc::new(RefCell::new(environment)))
        });

        let mut methods = HashMap::new();
        for method in &data.methods {
            let function = Function::new(
                Rc::new(method.clone()),
                Rc::clone(&self.environment),
                method.name.lexeme == "init",
            );
            methods.insert(method.name.lexeme.clone(), function);
        }

        let class = Class::new(data.name.lexeme.clone(), superclass, methods);

        if let Some(enclosing) = enclosing {
            self.environment = enclosing;
        }

        self.environment.borrow_mut().assign(&data.name, Object::from(Rc::new(class)))?;
        Ok(())
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, Unwind> {
        match expr {
            Expr::Literal(literal) => Ok(Object::from(literal.clone())),
            Expr::Grouping(data) => self.evaluate(&data.expr),
            Expr::Logical(data) => {
                let left = self.evaluate(&data.left)?;

                // The result is the value that decided the outcome, not a bool.
                match data.operator.r#type {
                    Type::Or if left.is_truthy() => Ok(left),
                    Type::And if !left.is_truthy() => Ok(left),
                    _ => self.evaluate(&data.right),
                }
            },
            Expr::Unary(data) => self.evaluate_unary(data),
            Expr::Binary(data) => self.evaluate_binary(data),
            Expr::Variable(data) => Ok(self.look_up_variable(&data.name, data.id)?),
            Expr::Assign(data) => {
                let value = self.evaluate(&data.value)?;

                match self.locals.get(&data.id) {
                    Some(distance) => {
                        self.environment.borrow_mut().assign_at(*distance, &data.name, value.clone());
                    },
                    None => {
                        self.globals.borrow_mut().assign(&data.name, value.clone())?;
                    },
                }

                Ok(value)
            },
            Expr::Call(data) => self.evaluate_call(data),
            Expr::Get(data) => {
                let object = self.evaluate(&data.object)?;

                match &object {
                    Object::Instance(instance) => Ok(instance.borrow().get(&data.name, &object)?),
                    _ => Err(RuntimeError {
                        token: data.name.clone(),
                        message: "Only instances have properties.".to_string(),
                    }.into()),
                }
            },
            Expr::Set(data) => {
                let object = self.evaluate(&data.object)?;

                let Object::Instance(instance) = object else {
                    return Err(RuntimeError {
                        token: data.name.clone(),
                        message: "Only instances have fields.".to_string(),
                    }.into());
                };

                let value = self.evaluate(&data.value)?;
                instance.borrow_mut().set(&data.name, value.clone());

                Ok(value)
            },
            Expr::This(data) => Ok(self.look_up_variable(&data.keyword, data.id)?),
            Expr::Super(data) => self.evaluate_super(data),
        }
    }

    fn evaluate_unary(&mut self, data: &UnaryData) -> Result<Object, Unwind> {
        let right = self.evaluate(&data.expr)?;

        match data.operator.r#type {
            Type::Bang => Ok(Object::from(!right.is_truthy())),
            Type::Minus => match right {
                Object::Literal(Literal::Number(number)) => Ok(Object::from(-number)),
                _ => Err(RuntimeError {
                    token: data.operator.clone(),
                    message: "Operand must be a number.".to_string(),
                }.into()),
            },
            _ => unreachable!(),
        }
    }

    fn evaluate_binary(&mut self, data: &BinaryData) -> Result<Object, Unwind> {
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;

        match data.operator.r#type {
            // Equality works across every pair of values.
            Type::EqualEqual => return Ok(Object::from(left == right)),
            Type::BangEqual => return Ok(Object::from(left != right)),

            // Plus is overloaded for numbers and strings.
            Type::Plus => {
                return match (left, right) {
                    (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => {
                        Ok(Object::from(l + r))
                    },
                    (Object::Literal(Literal::String(l)), Object::Literal(Literal::String(r))) => {
                        Ok(Object::from(l + &r))
                    },
                    _ => Err(RuntimeError {
                        token: data.operator.clone(),
                        message: "Operands must be two numbers or two strings.".to_string(),
                    }.into()),
                };
            },
            _ => {},
        }

        // Every other binary operator requires two numbers.
        let (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) = (left, right) else {
            return Err(RuntimeError {
                token: data.operator.clone(),
                message: "Operands must be numbers.".to_string(),
            }.into());
        };

        match data.operator.r#type {
            Type::Greater => Ok(Object::from(l > r)),
            Type::GreaterEqual => Ok(Object::from(l >= r)),
            Type::Less => Ok(Object::from(l < r)),
            Type::LessEqual => Ok(Object::from(l <= r)),
            Type::Minus => Ok(Object::from(l - r)),
            // Division by zero follows IEEE-754.
            Type::Slash => Ok(Object::from(l / r)),
            Type::Star => Ok(Object::from(l * r)),
            _ => unreachable!(),
        }
    }

    fn evaluate_call(&mut self, data: &CallData) -> Result<Object, Unwind> {
        let callee = self.evaluate(&data.callee)?;

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let callable: &dyn Callable = match &callee {
            Object::Function(function) => function,
            Object::NativeFunction(function) => function,
            Object::Class(class) => class,
            _ => {
                return Err(RuntimeError {
                    token: data.paren.clone(),
                    message: "Can only call functions and classes.".to_string(),
                }.into());
            },
        };

        if arguments.len() != callable.arity() {
            return Err(RuntimeError {
                token: data.paren.clone(),
                message: format!(
                    "Expected {} arguments but got {}.",
                    callable.arity(),
                    arguments.len(),
                ),
            }.into());
        }

        Ok(callable.call(self, arguments)?)
    }

    /// Evaluates a `super` method access.
    /// The resolver pinned `super` at a fixed distance; `this` lives exactly
    /// one frame below it.
    fn evaluate_super(&mut self, data: &SuperData) -> Result<Object, Unwind> {
        let distance = *self.locals.get(&data.id).expect("'super' to be resolved");

        let superclass = self.environment.borrow().get_at(distance, &data.keyword)?;
        let Object::Class(superclass) = superclass else { unreachable!() };

        let this = self.environment.borrow().get_at(distance - 1, &Token::from("this"))?;

        match superclass.find_method(&data.method.lexeme) {
            Some(method) => Ok(Object::from(method.bind(this))),
            None => Err(RuntimeError {
                token: data.method.clone(),
                message: format!("Undefined property '{}'.", data.method.lexeme),
            }.into()),
        }
    }

    fn look_up_variable(&self, name: &Token, id: usize) -> Result<Object, RuntimeError> {
        match self.locals.get(&id) {
            Some(distance) => self.environment.borrow().get_at(*distance, name),
            None => self.globals.borrow().get(name),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::expr::{GroupingData, LogicalData, next_id, VariableData};

    fn number(value: f64) -> Expr {
        Expr::Literal(Literal::Number(value))
    }

    fn string(value: &str) -> Expr {
        Expr::Literal(Literal::String(value.to_string()))
    }

    fn binary(left: Expr, r#type: Type, lexeme: &str, right: Expr) -> Expr {
        Expr::Binary(BinaryData {
            left: Box::new(left),
            operator: Token::new(r#type, lexeme.to_string(), None, 1),
            right: Box::new(right),
        })
    }

    #[test]
    fn evaluate_literal() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let result = interpreter.evaluate(&number(12.0)).unwrap();
        assert_eq!(result, Object::from(12.0));
    }

    #[test]
    fn evaluate_grouping() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let expr = Expr::Grouping(GroupingData { expr: Box::new(number(12.0)) });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(12.0));
    }

    #[test]
    fn evaluate_unary_minus() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let expr = Expr::Unary(UnaryData {
            operator: Token::new(Type::Minus, String::from("-"), None, 1),
            expr: Box::new(number(12.0)),
        });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(-12.0));
    }

    #[test]
    fn evaluate_unary_bang() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let expr = Expr::Unary(UnaryData {
            operator: Token::new(Type::Bang, String::from("!"), None, 1),
            expr: Box::new(Expr::Literal(Literal::Nil)),
        });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(true));
    }

    #[test]
    fn evaluate_arithmetic() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let expr = binary(
            number(6.0),
            Type::Minus, "-",
            binary(number(12.0), Type::Minus, "-", number(24.0)),
        );
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(18.0));
    }

    #[test]
    fn evaluate_division_by_zero() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let expr = binary(number(1.0), Type::Slash, "/", number(0.0));
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(f64::INFINITY));
    }

    #[test]
    fn evaluate_string_concatenation() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let expr = binary(string("Hello"), Type::Plus, "+", string("World"));
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from("HelloWorld"));
    }

    #[test]
    fn evaluate_string_plus_number_errors() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let expr = binary(string("1"), Type::Plus, "+", number(2.0));
        let Err(Unwind::Error(error)) = interpreter.evaluate(&expr) else {
            panic!("expected a runtime error");
        };

        assert_eq!(error.message, "Operands must be two numbers or two strings.");
        assert_eq!(error.token.line, 1);
    }

    #[test]
    fn evaluate_comparisons() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let expr = binary(number(12.0), Type::Greater, ">", number(12.0));
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(false));

        let expr = binary(number(12.0), Type::GreaterEqual, ">=", number(12.0));
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(true));

        let expr = binary(number(12.0), Type::LessEqual, "<=", number(11.0));
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(false));
    }

    #[test]
    fn evaluate_comparison_requires_numbers() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let expr = binary(number(1.0), Type::Less, "<", string("2"));
        let Err(Unwind::Error(error)) = interpreter.evaluate(&expr) else {
            panic!("expected a runtime error");
        };

        assert_eq!(error.message, "Operands must be numbers.");
    }

    #[test]
    fn evaluate_equality_across_types() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let expr = binary(number(1.0), Type::EqualEqual, "==", string("1"));
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(false));

        let expr = binary(Expr::Literal(Literal::Nil), Type::EqualEqual, "==", Expr::Literal(Literal::Nil));
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(true));
    }

    #[test]
    fn evaluate_logical_returns_deciding_value() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let or = Expr::Logical(LogicalData {
            left: Box::new(string("hi")),
            operator: Token::new(Type::Or, String::from("or"), None, 1),
            right: Box::new(number(2.0)),
        });
        assert_eq!(interpreter.evaluate(&or).unwrap(), Object::from("hi"));

        let and = Expr::Logical(LogicalData {
            left: Box::new(Expr::Literal(Literal::Nil)),
            operator: Token::new(Type::And, String::from("and"), None, 1),
            right: Box::new(number(2.0)),
        });
        assert_eq!(interpreter.evaluate(&and).unwrap(), Object::from(Literal::Nil));
    }

    #[test]
    fn undefined_variable_errors() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let expr = Expr::Variable(VariableData { id: next_id(), name: Token::from("ghost") });
        let Err(Unwind::Error(error)) = interpreter.evaluate(&expr) else {
            panic!("expected a runtime error");
        };

        assert_eq!(error.message, "Undefined variable 'ghost'.");
    }

    #[test]
    fn clock_is_defined_in_globals() {
        let mut output = Vec::new();
        let interpreter = Interpreter::new(&mut output);

        let clock = interpreter.globals.borrow().get(&Token::from("clock")).unwrap();
        assert_eq!(clock.to_string(), "<native fn clock>");
    }

    #[test]
    fn print_writes_to_the_output_sink() {
        let mut output = Vec::new();
        let mut interpreter = Interpreter::new(&mut output);

        let statements = vec![Stmt::Print(crate::stmt::PrintData {
            expr: binary(number(1.0), Type::Plus, "+", number(2.0)),
        })];
        interpreter.interpret(&statements);

        drop(interpreter);
        assert_eq!(std::str::from_utf8(&output).unwrap(), "3\n");
    }
}
