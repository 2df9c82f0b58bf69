use crate::diagnostics::{Diagnostics, Reporter};
use crate::token::{Literal, Span, Token, TokenKind};

/// Scan `source` into tokens, sending lexical errors to `reporter`.
///
/// Always returns a token list ending in exactly one `EOF` token.
pub fn scan_tokens<R: Reporter>(source: &str, reporter: R) -> Vec<Token> {
    Scanner::new(source, reporter).scan_tokens()
}

/// Lox source scanner.
///
/// Single left-to-right pass over the source with one character of
/// lookahead (two for the fractional part of a number). Errors go to the
/// injected [`Reporter`] and the offending lexeme is dropped; the scan itself
/// cannot fail.
///
/// `start` and `current` are byte offsets and always sit on char boundaries,
/// with `start <= current <= source.len()`.
pub struct Scanner<'a, R: Reporter> {
    source: &'a str,
    reporter: R,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    start_line: usize,
    error_count: usize,
}

impl<'a> Scanner<'a, Diagnostics> {
    /// Tokenize the entire source, collecting every lexical error.
    ///
    /// Returns the collected errors instead of the tokens if there were any.
    pub fn tokenize(source: &'a str) -> Result<Vec<Token>, Diagnostics> {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens(source, &mut diagnostics);
        if diagnostics.had_error() {
            Err(diagnostics)
        } else {
            Ok(tokens)
        }
    }
}

impl<'a, R: Reporter> Scanner<'a, R> {
    /// Create a new scanner for the given source.
    pub fn new(source: &'a str, reporter: R) -> Self {
        Self {
            source,
            reporter,
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            start_line: 1,
            error_count: 0,
        }
    }

    /// Scan all tokens from the source. Consumes the scanner.
    pub fn scan_tokens(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.start_line = self.line;
            self.scan_token();
        }

        let end = self.source.len();
        self.tokens.push(Token::new(
            TokenKind::Eof,
            "",
            Literal::None,
            self.line,
            Span::new(end, end),
        ));

        log::debug!(
            "scanned {} tokens over {} lines ({} errors)",
            self.tokens.len(),
            self.line,
            self.error_count
        );
        self.tokens
    }

    /// Scan the next lexeme.
    fn scan_token(&mut self) {
        let c = self.advance();

        match c {
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            '.' => self.add_token(TokenKind::Dot),
            '-' => self.add_token(TokenKind::Minus),
            '+' => self.add_token(TokenKind::Plus),
            ';' => self.add_token(TokenKind::Semicolon),
            '*' => self.add_token(TokenKind::Star),

            // One or two characters, longest match wins
            '!' => {
                let kind = if self.match_char('=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                };
                self.add_token(kind);
            }
            '=' => {
                let kind = if self.match_char('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.match_char('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.match_char('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.add_token(kind);
            }

            '/' => {
                if self.match_char('/') {
                    // Runs to the end of the line; the newline itself is left
                    // for the main loop so the line count stays right.
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }

            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,

            '"' => self.scan_string(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_alpha(c) => self.scan_identifier(),

            _ => self.error(self.line, "Unexpected character."),
        }
    }

    // --- Scanners ---

    /// Scan a string literal. No escape sequences; the value is the raw text
    /// between the quotes and may span lines.
    fn scan_string(&mut self) {
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.error(self.start_line, "Unterminated string.");
            return;
        }

        self.advance(); // closing quote

        let value = &self.source[self.start + 1..self.current - 1];
        self.add_literal(TokenKind::String, Literal::String(value.to_string()));
    }

    /// Scan a number literal: digits with an optional `.digits` fraction.
    /// A `.` not followed by a digit is left for the next lexeme.
    fn scan_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text = &self.source[self.start..self.current];
        match text.parse::<f64>() {
            Ok(value) => self.add_literal(TokenKind::Number, Literal::Number(value)),
            Err(_) => self.error(self.line, "Invalid number."),
        }
    }

    /// Scan an identifier or reserved word.
    fn scan_identifier(&mut self) {
        while is_alpha_numeric(self.peek()) {
            self.advance();
        }

        let text = &self.source[self.start..self.current];
        let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }

    // --- Helpers ---

    fn add_token(&mut self, kind: TokenKind) {
        self.add_literal(kind, Literal::None);
    }

    fn add_literal(&mut self, kind: TokenKind, literal: Literal) {
        let text = &self.source[self.start..self.current];
        let token = Token::new(
            kind,
            text,
            literal,
            self.start_line,
            Span::new(self.start, self.current),
        );
        log::trace!("line {}: {}", token.line, token);
        self.tokens.push(token);
    }

    fn error(&mut self, line: usize, message: &str) {
        log::debug!("lexical error at line {line}: {message}");
        self.error_count += 1;
        self.reporter.error(line, message);
    }

    /// Consume the next character only if it is `expected`.
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() != expected || self.is_at_end() {
            return false;
        }
        self.current += expected.len_utf8();
        true
    }

    fn peek(&self) -> char {
        self.source[self.current..].chars().next().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        if !self.is_at_end() {
            self.current += c.len_utf8();
        }
        c
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alpha_numeric(c: char) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}
