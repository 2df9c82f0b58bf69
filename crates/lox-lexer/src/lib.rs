//! Lox Lexer
//!
//! Tokenizes Lox source text into a flat stream of tokens.
//! Handles one- and two-character operators, line comments,
//! string and number literals, identifiers and reserved words.
//! Lexical errors are reported through a [`Reporter`] and never stop the scan.
//!
//! # Example
//!
//! ```
//! use lox_lexer::{Scanner, TokenKind};
//!
//! let tokens = Scanner::tokenize("").unwrap();
//! assert_eq!(tokens.len(), 1); // Just EOF
//! assert_eq!(tokens[0].kind, TokenKind::Eof);
//! ```

pub mod diagnostics;
pub mod scanner;
pub mod token;

pub use diagnostics::{ConsoleReporter, Diagnostics, Reporter};
pub use scanner::{scan_tokens, Scanner};
pub use token::{Literal, Span, Token, TokenKind};

/// A single lexical error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[line {line}] Error{location}: {message}")]
pub struct LexerError {
    pub message: String,
    pub location: String,
    pub line: usize,
}
