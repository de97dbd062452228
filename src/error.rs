use std::sync::atomic::{AtomicBool, Ordering};

use crate::object::Object;
use crate::token::{Token, Type};

static HAD_ERROR: AtomicBool = AtomicBool::new(false);
static HAD_RUNTIME_ERROR: AtomicBool = AtomicBool::new(false);

/// Whether a compile stage (scanning, parsing or resolution) has reported
/// an error for the current run.
pub fn did_error() -> bool {
    HAD_ERROR.load(Ordering::Relaxed)
}

/// Whether the current run hit a runtime error.
pub fn did_runtime_error() -> bool {
    HAD_RUNTIME_ERROR.load(Ordering::Relaxed)
}

/// Clears both flags. The prompt calls this between entries so one bad line
/// does not poison the next.
pub fn reset_error() {
    HAD_ERROR.store(false, Ordering::Relaxed);
    HAD_RUNTIME_ERROR.store(false, Ordering::Relaxed);
}

fn report(line: usize, location: &str, message: &str) {
    eprintln!("[line {line}] Error{location}: {message}");
    HAD_ERROR.store(true, Ordering::Relaxed);
}

fn report_at_token(token: &Token, message: &str) {
    if token.r#type == Type::EOF {
        report(token.line, " at end", message);
    } else {
        report(token.line, &format!(" at '{}'", token.lexeme), message);
    }
}

/// Shared surface of the four error families.
pub trait Error {
    /// Reports the error on stderr and latches the matching flag.
    fn throw(&self);
}

/// A lexical error, located by source line only.
#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Error for ScanError {
    fn throw(&self) {
        report(self.line, "", &self.message);
    }
}

/// A syntax error, anchored at the offending token.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Error for ParseError {
    fn throw(&self) {
        report_at_token(&self.token, &self.message);
    }
}

/// A scope or binding mistake caught by the static pass.
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Error for ResolveError {
    fn throw(&self) {
        report_at_token(&self.token, &self.message);
    }
}

/// An error raised while the program runs.
/// The token anchors the reported line: the operator of a binary expression,
/// the closing paren of a call, or the property name of an access.
#[derive(Debug)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Error for RuntimeError {
    fn throw(&self) {
        eprintln!("{}\n[line {}]", self.message, self.token.line);
        HAD_RUNTIME_ERROR.store(true, Ordering::Relaxed);
    }
}

/// Non-local exits of the evaluator. A `return` statement unwinds to the
/// enclosing call boundary carrying its value; a runtime error unwinds the
/// whole `run` invocation.
#[derive(Debug)]
pub enum Unwind {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}
