use crate::expr::Expr;
use crate::stmt::{FunctionData, Stmt};

/// Renders parse trees in a Lisp style prefix notation.
/// A re-parse of the printed output would build an isomorphic tree, which
/// makes it handy for asserting on parser behaviour.
pub struct AstPrinter;

impl AstPrinter {
    /// Prints the expression.
    pub fn print(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(literal) => literal.to_string(),
            Expr::Logical(data) => format!(
                "({} {} {})",
                data.operator.lexeme,
                self.print(&data.left),
                self.print(&data.right),
            ),
            Expr::Unary(data) => format!("({} {})", data.operator.lexeme, self.print(&data.expr)),
            Expr::Binary(data) => format!(
                "({} {} {})",
                data.operator.lexeme,
                self.print(&data.left),
                self.print(&data.right),
            ),
            Expr::Grouping(data) => format!("(group {})", self.print(&data.expr)),
            Expr::Variable(data) => data.name.lexeme.clone(),
            Expr::Assign(data) => format!("(= {} {})", data.name.lexeme, self.print(&data.value)),
            Expr::Call(data) => {
                let arguments: Vec<String> = data.arguments
                    .iter()
                    .map(|argument| self.print(argument))
                    .collect();

                format!("{}({})", self.print(&data.callee), arguments.join(" "))
            },
            Expr::Get(data) => format!("(. {} {})", self.print(&data.object), data.name.lexeme),
            Expr::Set(data) => format!(
                "(.= {} {} {})",
                self.print(&data.object),
                data.name.lexeme,
                self.print(&data.value),
            ),
            Expr::This(_) => String::from("this"),
            Expr::Super(data) => format!("(super {})", data.method.lexeme),
        }
    }

    /// Prints the statement.
    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(data) => format!("(expr {})", self.print(&data.expr)),
            Stmt::Print(data) => format!("(print {})", self.print(&data.expr)),
            Stmt::Var(data) => match &data.initializer {
                Some(initializer) => {
                    format!("(var {} = {})", data.name.lexeme, self.print(initializer))
                },
                None => format!("(var {})", data.name.lexeme),
            },
            Stmt::Block(data) => self.print_block(&data.statements),
            Stmt::If(data) => {
                let mut out = format!(
                    "(if {} {}",
                    self.print(&data.condition),
                    self.print_stmt(&data.then_branch),
                );
                if let Some(else_branch) = &data.else_branch {
                    out += &format!(" else {}", self.print_stmt(else_branch));
                }

                out + ")"
            },
            Stmt::While(data) => format!(
                "(while {} {})",
                self.print(&data.condition),
                self.print_stmt(&data.body),
            ),
            Stmt::Function(data) => self.print_function(data),
            Stmt::Return(data) => match &data.value {
                Some(value) => format!("(return {})", self.print(value)),
                None => String::from("(return)"),
            },
            Stmt::Class(data) => {
                let mut out = format!("(class {}", data.name.lexeme);
                if let Some(superclass) = &data.superclass {
                    out += &format!(" < {}", superclass.name.lexeme);
                }
                for method in &data.methods {
                    out += &format!(" {}", self.print_function(method));
                }

                out + ")"
            },
        }
    }

    fn print_block(&self, statements: &[Stmt]) -> String {
        let inner: Vec<String> = statements
            .iter()
            .map(|statement| self.print_stmt(statement))
            .collect();

        match inner.is_empty() {
            true => String::from("{ }"),
            false => format!("{{ {} }}", inner.join(" ")),
        }
    }

    fn print_function(&self, data: &FunctionData) -> String {
        let params: Vec<&str> = data.params
            .iter()
            .map(|param| param.lexeme.as_str())
            .collect();

        format!(
            "(fun {}({}) {})",
            data.name.lexeme,
            params.join(" "),
            self.print_block(&data.body),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::expr::{BinaryData, GroupingData, UnaryData};
    use crate::literal::Literal;
    use crate::token::{Token, Type};

    #[test]
    fn print_nested_expression() {
        // -123 * (45.67)
        let expr = Expr::Binary(BinaryData {
            left: Box::new(Expr::Unary(UnaryData {
                operator: Token::new(Type::Minus, String::from("-"), None, 1),
                expr: Box::new(Expr::Literal(Literal::Number(123.0))),
            })),
            operator: Token::new(Type::Star, String::from("*"), None, 1),
            right: Box::new(Expr::Grouping(GroupingData {
                expr: Box::new(Expr::Literal(Literal::Number(45.67))),
            })),
        });

        assert_eq!(AstPrinter.print(&expr), "(* (- 123) (group 45.67))");
    }
}
