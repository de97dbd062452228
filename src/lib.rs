//! Lox is a small dynamically typed scripting language with lexical scoping,
//! first-class functions, closures and class based inheritance. This crate
//! implements it by walking the syntax tree directly: a recursive descent
//! parser builds the tree and the evaluator executes it node by node,
//! following the language described in the
//! [Crafting Interpreters](https://craftinginterpreters.com/) book by Bob
//! Nystrom.
//!
//! ## Scanning
//! The first step is scanning, implemented in the [`scanner`](scanner)
//! module. The scanner turns the source text into a flat list of
//! [`Token`](token::Token)s, ending with a synthetic end-of-file token. For
//! example, `1 + 2` becomes:
//! ```text
//! [Number(1), Plus, Number(2), EOF]
//! ```
//! Lexical problems like an unterminated string or a stray character are
//! reported as a [`ScanError`](error::ScanError) and scanning carries on from
//! the next character, so a single run can surface every lexical error in the
//! file.
//!
//! ## Parsing
//! The second step is parsing, implemented in the [`parser`](parser) module
//! as a recursive descent parser with one level of precedence per grammar
//! rule. The parser produces [`Stmt`](stmt::Stmt)s, which contain
//! [`Expr`](expr::Expr)s; `print 1 + 2;` becomes:
//! ```text
//! Print {
//!     Binary {
//!         left: Number(1),
//!         operator: Plus,
//!         right: Number(2),
//!     }
//! }
//! ```
//! Syntax errors are reported as a [`ParseError`](error::ParseError). After
//! reporting, the parser synchronizes: it skips ahead to the next statement
//! boundary and keeps going, so one mistake does not drown the rest of the
//! file in cascading errors.
//!
//! ## Resolving
//! The third step is resolution, implemented in the [`resolver`](resolver)
//! module. The resolver is a static pass over the parse tree that computes,
//! for every variable reference, how many environment frames sit between the
//! use and the declaration it refers to. The interpreter later uses these
//! distances for variable access, which is what makes closures, `this` and
//! `super` behave according to lexical scope rather than whatever happens to
//! be in scope at runtime. The pass also rejects programs that are
//! syntactically fine but semantically wrong, like `return` at the top level
//! or a class inheriting from itself, reporting them as a
//! [`ResolveError`](error::ResolveError).
//!
//! ## Interpreting
//! The final step is interpreting, implemented in the
//! [`interpreter`](interpreter) module as a straightforward walk of the tree.
//! Values are [`Object`](object::Object)s; scopes are
//! [`Environment`](environment::Environment) frames chained to their parents,
//! with the globals at the root. Functions capture the frame they were
//! declared in, which keeps the whole chain alive for as long as the function
//! value exists. Mistakes that can only be caught while the program runs,
//! like adding a string to a number or calling something that is not
//! callable, are reported as a [`RuntimeError`](error::RuntimeError) and
//! abort the current run.

use std::io::Write;
use std::{fs, process};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// The entry point of the interpreter.
/// Holds the interpreter state so that a prompt session keeps its globals
/// between entries. Program output goes to the given sink; diagnostics go to
/// stderr.
#[allow(non_camel_case_types)]
pub struct lox<'a> {
    interpreter: Interpreter<'a>,
}

impl<'a> lox<'a> {
    pub fn new(output: &'a mut dyn Write) -> Self {
        lox {
            interpreter: Interpreter::new(output),
        }
    }

    /// Runs the file at the given path.
    /// Exits with 65 for compile errors and 70 for runtime errors.
    pub fn run_file(&mut self, path: &str) {
        let contents = fs::read_to_string(path)
            .expect("script file to be readable");

        self.run(&contents);

        if error::did_error() {
            process::exit(65);
        }
        if error::did_runtime_error() {
            process::exit(70);
        }
    }

    /// Runs an interactive prompt, one entry at a time.
    /// An empty line, `exit` or `quit` ends the session. History persists to
    /// the home directory when there is one.
    pub fn run_prompt(&mut self) {
        let mut editor = DefaultEditor::new()
            .expect("line editor to be available");

        let history = home::home_dir().map(|dir| dir.join(".lox_history"));
        if let Some(history) = &history {
            let _ = editor.load_history(history);
        }

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    if line.is_empty() || line == "exit" || line == "quit" {
                        break;
                    }

                    let _ = editor.add_history_entry(line.as_str());

                    self.run(&line);
                    error::reset_error();
                },
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(error) => {
                    eprintln!("{error}");
                    break;
                },
            }
        }

        if let Some(history) = &history {
            let _ = editor.save_history(history);
        }
    }

    fn run(&mut self, source: &str) {
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens();

        let mut parser = Parser::new(tokens);
        let statements = parser.parse();

        // The scanner and the parser both run to completion; a lexical error
        // does not hide the syntax errors behind it.
        if error::did_error() {
            return;
        }

        let mut resolver = Resolver::new(&mut self.interpreter);
        resolver.resolve(&statements);

        if error::did_error() {
            return;
        }

        self.interpreter.interpret(&statements);
    }
}
