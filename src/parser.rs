use crate::error::{Error, ParseError};
use crate::expr::*;
use crate::literal::Literal;
use crate::stmt::*;
use crate::token::{Token, Type};

type ParseResult<T> = Result<T, ParseError>;

/// Builds the statement list out of the scanner's tokens.
///
/// One method per grammar rule, tightest binding deepest:
///
/// - program        → declaration* EOF
/// - declaration    → classDecl | funDecl | varDecl | statement
/// - classDecl      → "class" IDENTIFIER ( "<" IDENTIFIER )? "{" function* "}"
/// - funDecl        → "fun" function
/// - function       → IDENTIFIER "(" parameters? ")" block
/// - parameters     → IDENTIFIER ( "," IDENTIFIER )*
/// - varDecl        → "var" IDENTIFIER ( "=" expression )? ";"
/// - statement      → exprStmt | printStmt | block | ifStmt | whileStmt
///                  | forStmt | returnStmt
/// - block          → "{" declaration* "}"
/// - expression     → assignment
/// - assignment     → ( call "." )? IDENTIFIER "=" assignment | logicOr
/// - logicOr        → logicAnd ( "or" logicAnd )*
/// - logicAnd       → equality ( "and" equality )*
/// - equality       → comparison ( ( "!=" | "==" ) comparison )*
/// - comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )*
/// - term           → factor ( ( "-" | "+" ) factor )*
/// - factor         → unary ( ( "/" | "*" ) unary )*
/// - unary          → ( "!" | "-" ) unary | call
/// - call           → primary ( "(" arguments? ")" | "." IDENTIFIER )*
/// - arguments      → expression ( "," expression )*
/// - primary        → "true" | "false" | "nil" | NUMBER | STRING | "this"
///                  | "super" "." IDENTIFIER | IDENTIFIER | "(" expression ")"
///
/// A `for` loop has no node of its own; it is rewritten into while/block
/// form while parsing.
pub struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, cursor: 0 }
    }

    /// Parses the whole token list. Statements that fail to parse are
    /// reported through the error sink and dropped; callers check the error
    /// flag before running what comes back.
    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut program = Vec::new();

        while !self.is_at_end() {
            if let Some(statement) = self.declaration() {
                program.push(statement);
            }
        }

        program
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.cursor]
    }

    fn prev(&self) -> &Token {
        &self.tokens[self.cursor - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().r#type == Type::EOF
    }

    /// Consumes the next token, refusing to move past the end marker.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.cursor += 1;
        }

        self.prev()
    }

    fn next_is(&self, r#type: Type) -> bool {
        !self.is_at_end() && self.peek().r#type == r#type
    }

    /// Consumes the next token when its type is one of the given ones.
    fn advance_if(&mut self, types: &[Type]) -> bool {
        if types.iter().any(|&r#type| self.next_is(r#type)) {
            self.advance();
            return true;
        }

        false
    }

    /// Demands a token of the given type; anything else is a syntax error
    /// anchored at the offending token.
    fn expect(&mut self, r#type: Type, message: &str) -> ParseResult<&Token> {
        if !self.next_is(r#type) {
            return Err(ParseError {
                token: self.peek().clone(),
                message: message.to_string(),
            });
        }

        Ok(self.advance())
    }

    /// Parses a declaration, recovering at the next statement boundary when
    /// it goes wrong.
    fn declaration(&mut self) -> Option<Stmt> {
        let result = match self.peek().r#type {
            Type::Class => {
                self.advance();
                self.class_declaration()
            },
            Type::Fun => {
                self.advance();
                self.function("function").map(Stmt::Function)
            },
            Type::Var => {
                self.advance();
                self.var_declaration()
            },
            _ => self.statement(),
        };

        match result {
            Ok(statement) => Some(statement),
            Err(error) => {
                error.throw();
                self.synchronize();
                None
            },
        }
    }

    fn class_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.expect(Type::Identifier, "Expect class name.")?.clone();

        let mut superclass = None;
        if self.advance_if(&[Type::Less]) {
            let name = self.expect(Type::Identifier, "Expect superclass name.")?.clone();
            superclass = Some(VariableData { id: next_id(), name });
        }

        self.expect(Type::LeftBrace, "Expect '{' before class body.")?;

        let mut methods = Vec::new();
        while !self.next_is(Type::RightBrace) && !self.is_at_end() {
            methods.push(self.function("method")?);
        }

        self.expect(Type::RightBrace, "Expect '}' after class body.")?;

        Ok(Stmt::Class(ClassData { name, superclass, methods }))
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.expect(Type::Identifier, "Expect variable name.")?.clone();

        let initializer = match self.advance_if(&[Type::Equal]) {
            true => Some(self.expression()?),
            false => None,
        };

        self.expect(Type::Semicolon, "Expect ';' after variable declaration.")?;

        Ok(Stmt::Var(VarData { name, initializer }))
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        match self.peek().r#type {
            Type::For => {
                self.advance();
                self.for_statement()
            },
            Type::If => {
                self.advance();
                self.if_statement()
            },
            Type::Print => {
                self.advance();
                self.print_statement()
            },
            Type::Return => {
                self.advance();
                self.return_statement()
            },
            Type::While => {
                self.advance();
                self.while_statement()
            },
            Type::LeftBrace => {
                self.advance();
                Ok(Stmt::Block(BlockData { statements: self.block()? }))
            },
            _ => self.expression_statement(),
        }
    }

    /// Rewrites `for (init; cond; incr) body` into while/block form: the
    /// increment joins the body in a block, the condition (or a bare `true`)
    /// drives the loop, and the initializer wraps the result in one more
    /// block so its variable scopes to the loop.
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(Type::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = match self.peek().r#type {
            Type::Semicolon => {
                self.advance();
                None
            },
            Type::Var => {
                self.advance();
                Some(self.var_declaration()?)
            },
            _ => Some(self.expression_statement()?),
        };

        let mut condition = None;
        if !self.next_is(Type::Semicolon) {
            condition = Some(self.expression()?);
        }
        self.expect(Type::Semicolon, "Expect ';' after loop condition.")?;

        let mut increment = None;
        if !self.next_is(Type::RightParen) {
            increment = Some(self.expression()?);
        }
        self.expect(Type::RightParen, "Expect ')' after for clauses.")?;

        let body = self.statement()?;

        let body = match increment {
            Some(increment) => Stmt::Block(BlockData {
                statements: vec![body, Stmt::Expression(ExpressionData { expr: increment })],
            }),
            None => body,
        };

        let looped = Stmt::While(WhileData {
            condition: condition.unwrap_or(Expr::Literal(Literal::Bool(true))),
            body: Box::new(body),
        });

        Ok(match initializer {
            Some(initializer) => Stmt::Block(BlockData { statements: vec![initializer, looped] }),
            None => looped,
        })
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(Type::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.expect(Type::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);

        // An `else` binds to the nearest `if`.
        let mut else_branch = None;
        if self.advance_if(&[Type::Else]) {
            else_branch = Some(Box::new(self.statement()?));
        }

        Ok(Stmt::If(IfData { condition, then_branch, else_branch }))
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.expect(Type::Semicolon, "Expect ';' after value.")?;

        Ok(Stmt::Print(PrintData { expr }))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.prev().clone();

        let mut value = None;
        if !self.next_is(Type::Semicolon) {
            value = Some(self.expression()?);
        }

        self.expect(Type::Semicolon, "Expect ';' after return value.")?;

        Ok(Stmt::Return(ReturnData { keyword, value }))
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(Type::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.expect(Type::RightParen, "Expect ')' after condition.")?;

        let body = Box::new(self.statement()?);

        Ok(Stmt::While(WhileData { condition, body }))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.expect(Type::Semicolon, "Expect ';' after expression.")?;

        Ok(Stmt::Expression(ExpressionData { expr }))
    }

    /// Parses the name, parameter list and body shared by function and
    /// method declarations. `kind` shows up in the error messages.
    fn function(&mut self, kind: &str) -> ParseResult<FunctionData> {
        let name = self.expect(Type::Identifier, &format!("Expect {kind} name."))?.clone();

        self.expect(Type::LeftParen, &format!("Expect '(' after {kind} name."))?;

        let mut params = Vec::new();
        if !self.next_is(Type::RightParen) {
            loop {
                if params.len() >= 255 {
                    // Reported without aborting the parse.
                    ParseError {
                        token: self.peek().clone(),
                        message: "Cannot have more than 255 parameters.".to_string(),
                    }.throw();
                }

                params.push(self.expect(Type::Identifier, "Expect parameter name.")?.clone());

                if !self.advance_if(&[Type::Comma]) {
                    break;
                }
            }
        }
        self.expect(Type::RightParen, "Expect ')' after parameters.")?;

        self.expect(Type::LeftBrace, &format!("Expect '{{' before {kind} body."))?;
        let body = self.block()?;

        Ok(FunctionData { name, params, body })
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.next_is(Type::RightBrace) && !self.is_at_end() {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }

        self.expect(Type::RightBrace, "Expect '}' after block.")?;

        Ok(statements)
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    /// Parses the left side as a plain expression first; only when an `=`
    /// follows must it turn out to be a variable or a property access.
    /// Anything else is reported and handed back untouched, so the parse
    /// keeps going.
    fn assignment(&mut self) -> ParseResult<Expr> {
        let target = self.or()?;

        if !self.advance_if(&[Type::Equal]) {
            return Ok(target);
        }

        let equals = self.prev().clone();
        let value = Box::new(self.assignment()?);

        match target {
            Expr::Variable(variable) => Ok(Expr::Assign(AssignData {
                id: next_id(),
                name: variable.name,
                value,
            })),
            Expr::Get(get) => Ok(Expr::Set(SetData {
                object: get.object,
                name: get.name,
                value,
            })),
            target => {
                ParseError {
                    token: equals,
                    message: "Invalid assignment target.".to_string(),
                }.throw();

                Ok(target)
            },
        }
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while self.advance_if(&[Type::Or]) {
            let operator = self.prev().clone();
            expr = Expr::Logical(LogicalData {
                left: Box::new(expr),
                operator,
                right: Box::new(self.and()?),
            });
        }

        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while self.advance_if(&[Type::And]) {
            let operator = self.prev().clone();
            expr = Expr::Logical(LogicalData {
                left: Box::new(expr),
                operator,
                right: Box::new(self.equality()?),
            });
        }

        Ok(expr)
    }

    /// One precedence level of left-associative binary operators; `operand`
    /// parses the next-tighter level.
    fn binary_level(
        &mut self,
        operators: &[Type],
        operand: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let mut expr = operand(self)?;

        while self.advance_if(operators) {
            let operator = self.prev().clone();
            expr = Expr::Binary(BinaryData {
                left: Box::new(expr),
                operator,
                right: Box::new(operand(self)?),
            });
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        self.binary_level(&[Type::BangEqual, Type::EqualEqual], Self::comparison)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        self.binary_level(
            &[Type::Greater, Type::GreaterEqual, Type::Less, Type::LessEqual],
            Self::term,
        )
    }

    fn term(&mut self) -> ParseResult<Expr> {
        self.binary_level(&[Type::Minus, Type::Plus], Self::factor)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        self.binary_level(&[Type::Slash, Type::Star], Self::unary)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.advance_if(&[Type::Bang, Type::Minus]) {
            let operator = self.prev().clone();

            return Ok(Expr::Unary(UnaryData {
                operator,
                expr: Box::new(self.unary()?),
            }));
        }

        self.call()
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.advance_if(&[Type::LeftParen]) {
                expr = self.arguments(expr)?;
            } else if self.advance_if(&[Type::Dot]) {
                let name = self.expect(Type::Identifier, "Expect property name after '.'.")?.clone();
                expr = Expr::Get(GetData { object: Box::new(expr), name });
            } else {
                return Ok(expr);
            }
        }
    }

    /// Parses a call's argument list up to and including the closing paren,
    /// which anchors runtime errors for the call.
    fn arguments(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();

        if !self.next_is(Type::RightParen) {
            loop {
                if arguments.len() >= 255 {
                    // Reported without aborting the parse.
                    ParseError {
                        token: self.peek().clone(),
                        message: "Cannot have more than 255 arguments.".to_string(),
                    }.throw();
                }

                arguments.push(self.expression()?);

                if !self.advance_if(&[Type::Comma]) {
                    break;
                }
            }
        }

        let paren = self.expect(Type::RightParen, "Expect ')' after arguments.")?.clone();

        Ok(Expr::Call(CallData { callee: Box::new(callee), paren, arguments }))
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();

        match token.r#type {
            Type::False => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(false)))
            },
            Type::True => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(true)))
            },
            Type::Nil => {
                self.advance();
                Ok(Expr::Literal(Literal::Nil))
            },
            Type::Number | Type::String => {
                self.advance();
                let literal = token.literal.expect("number or string token to carry its value");
                Ok(Expr::Literal(literal))
            },
            Type::Super => {
                self.advance();
                self.expect(Type::Dot, "Expect '.' after 'super'.")?;
                let method = self.expect(Type::Identifier, "Expect superclass method name.")?.clone();

                Ok(Expr::Super(SuperData { id: next_id(), keyword: token, method }))
            },
            Type::This => {
                self.advance();
                Ok(Expr::This(ThisData { id: next_id(), keyword: token }))
            },
            Type::Identifier => {
                self.advance();
                Ok(Expr::Variable(VariableData { id: next_id(), name: token }))
            },
            Type::LeftParen => {
                self.advance();
                let expr = Box::new(self.expression()?);
                self.expect(Type::RightParen, "Expect ')' after expression.")?;

                Ok(Expr::Grouping(GroupingData { expr }))
            },
            _ => Err(ParseError {
                token,
                message: "Expect expression.".to_string(),
            }),
        }
    }

    /// Skips ahead to a likely statement boundary after a syntax error, so
    /// one mistake yields one diagnostic instead of a cascade.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.prev().r#type == Type::Semicolon {
                return;
            }

            match self.peek().r#type {
                Type::Class | Type::Fun | Type::Var | Type::For
                | Type::If | Type::While | Type::Print | Type::Return => return,
                _ => {},
            }

            self.advance();
        }
    }
}
