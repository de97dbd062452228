use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};
use substring::Substring;

use crate::error::{Error, ScanError};
use crate::literal::Literal;
use crate::token::{Token, Type};

/// Turns source text into a flat token sequence.
/// Lexical errors go to the error sink and scanning picks back up at the
/// next character, so one pass reports them all.
pub struct Scanner<'a> {
    source: &'a str,
    chars: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source,
            chars: source.chars().peekmore(),
            tokens: vec![],
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Tokenizes the whole source. The returned sequence always ends with a
    /// synthetic EOF token carrying the final line number.
    pub fn scan_tokens(&mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens.push(Token::new(Type::EOF, String::new(), None, self.line));
        self.tokens.clone()
    }

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    /// Consumes one character, keeping the char index in step with the
    /// iterator.
    fn advance(&mut self) -> char {
        let char = self.chars.next().expect("tried to advance past the end of the source");
        self.current += 1;
        char
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_next(&mut self) -> Option<char> {
        let char = self.chars.peek_next().copied();
        self.chars.reset_cursor();
        char
    }

    /// Whether the character after the next one equals `expected`. Settles
    /// one- versus two-character operators before consuming anything.
    fn match_next(&mut self, expected: char) -> bool {
        self.peek_next() == Some(expected)
    }

    /// Consumes `count` characters and emits them as a single token.
    fn take(&mut self, count: usize, r#type: Type) {
        for _ in 0..count {
            self.advance();
        }

        self.add_token(r#type, None);
    }

    /// Emits a token whose lexeme is the source slice scanned since `start`.
    fn add_token(&mut self, r#type: Type, literal: Option<Literal>) {
        let lexeme = self.source.substring(self.start, self.current).to_string();
        self.tokens.push(Token::new(r#type, lexeme, literal, self.line));
    }

    /// Scans a string literal. Strings may span lines; an unterminated one
    /// is reported at the line of its opening quote.
    fn string(&mut self) {
        let opening_line = self.line;

        self.advance(); // opening quote

        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }

            if c == '\n' {
                self.line += 1;
            }

            self.advance();
        }

        if self.is_at_end() {
            ScanError {
                line: opening_line,
                message: String::from("Unterminated String."),
            }.throw();
            return;
        }

        self.advance(); // closing quote

        // The quotes stay in the lexeme; the payload is the text between them.
        let value = self.source.substring(self.start + 1, self.current - 1).to_string();
        self.add_token(Type::String, Some(Literal::String(value)));
    }

    /// Scans a number literal.
    /// A dot only belongs to the number when a digit follows it, so `123.`
    /// scans as a number and a separate dot.
    fn number(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && matches!(self.peek_next(), Some(c) if c.is_ascii_digit()) {
            self.advance();

            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }

        let lexeme = self.source.substring(self.start, self.current);
        let number: f64 = lexeme.parse().expect("number lexeme to be a valid double");

        self.add_token(Type::Number, Some(Literal::Number(number)));
    }

    /// Scans an identifier, promoting it to a keyword token when it matches
    /// one of the reserved words.
    fn identifier(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.advance();
        }

        let r#type = match self.source.substring(self.start, self.current) {
            "and"    => Type::And,
            "class"  => Type::Class,
            "else"   => Type::Else,
            "false"  => Type::False,
            "for"    => Type::For,
            "fun"    => Type::Fun,
            "if"     => Type::If,
            "nil"    => Type::Nil,
            "or"     => Type::Or,
            "print"  => Type::Print,
            "return" => Type::Return,
            "super"  => Type::Super,
            "this"   => Type::This,
            "true"   => Type::True,
            "var"    => Type::Var,
            "while"  => Type::While,
            _        => Type::Identifier,
        };

        self.add_token(r#type, None);
    }

    fn scan_token(&mut self) {
        let c = self.peek().expect("scan_token to be called before the end of the source");

        match c {
            '(' => self.take(1, Type::LeftParen),
            ')' => self.take(1, Type::RightParen),
            '{' => self.take(1, Type::LeftBrace),
            '}' => self.take(1, Type::RightBrace),
            ',' => self.take(1, Type::Comma),
            '.' => self.take(1, Type::Dot),
            '-' => self.take(1, Type::Minus),
            '+' => self.take(1, Type::Plus),
            ';' => self.take(1, Type::Semicolon),
            '*' => self.take(1, Type::Star),

            // Greedy longest match on the operators that may pair with '='.
            '!' | '=' | '<' | '>' => {
                let (r#type, length) = match (c, self.match_next('=')) {
                    ('!', true) => (Type::BangEqual, 2),
                    ('!', false) => (Type::Bang, 1),
                    ('=', true) => (Type::EqualEqual, 2),
                    ('=', false) => (Type::Equal, 1),
                    ('<', true) => (Type::LessEqual, 2),
                    ('<', false) => (Type::Less, 1),
                    ('>', true) => (Type::GreaterEqual, 2),
                    ('>', false) => (Type::Greater, 1),
                    _ => unreachable!(),
                };

                self.take(length, r#type);
            },

            // A second slash starts a comment that eats the rest of the line.
            '/' => {
                if self.match_next('/') {
                    while matches!(self.peek(), Some(c) if c != '\n') {
                        self.advance();
                    }
                } else {
                    self.take(1, Type::Slash);
                }
            },

            ' ' | '\r' | '\t' => {
                self.advance();
            },

            '\n' => {
                self.advance();
                self.line += 1;
            },

            '"' => self.string(),

            c if c.is_ascii_digit() => self.number(),

            // Underscores are identifier characters too.
            c if c.is_alphabetic() || c == '_' => self.identifier(),

            _ => {
                self.advance();

                ScanError {
                    line: self.line,
                    message: String::from("Unexpected Character."),
                }.throw();
            },
        }
    }
}
