//! Error reporting side-channel for the scanner.
//!
//! The scanner never fails: every lexical error is handed to a [`Reporter`]
//! and scanning carries on. Callers decide what an error means by choosing
//! the reporter and inspecting it once the scan is done.

use std::io::{self, Write};

use crate::LexerError;

/// Receives lexical errors as they are found.
///
/// Implementations must not panic; the scanner calls this in the middle of a
/// pass and expects to continue afterwards.
pub trait Reporter {
    /// Record an error at `line`. `location` is either empty or starts with a
    /// space (e.g. `" at end"`).
    fn report(&mut self, line: usize, location: &str, message: &str);

    /// Record an error with no location.
    fn error(&mut self, line: usize, message: &str) {
        self.report(line, "", message);
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, line: usize, location: &str, message: &str) {
        (**self).report(line, location, message);
    }
}

/// Collects errors in memory. Displays as one line per error.
#[derive(Debug, Clone, Default, PartialEq, thiserror::Error)]
#[error("{}", join_lines(.errors))]
pub struct Diagnostics {
    errors: Vec<LexerError>,
}

fn join_lines(errors: &[LexerError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[LexerError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<LexerError> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Forget everything collected so far.
    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

impl Reporter for Diagnostics {
    fn report(&mut self, line: usize, location: &str, message: &str) {
        self.errors.push(LexerError {
            message: message.to_string(),
            location: location.to_string(),
            line,
        });
    }
}

/// Writes each error as a line of text, `stderr` by default.
pub struct ConsoleReporter<W: Write = io::Stderr> {
    out: W,
    error_count: usize,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::with_writer(io::stderr())
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            error_count: 0,
        }
    }

    pub fn had_error(&self) -> bool {
        self.error_count > 0
    }

    /// Number of errors written so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, line: usize, location: &str, message: &str) {
        self.error_count += 1;
        let err = LexerError {
            message: message.to_string(),
            location: location.to_string(),
            line,
        };
        // A broken stderr must not abort the scan.
        let _ = writeln!(self.out, "{err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diagnostics_collects_in_order() {
        let mut diags = Diagnostics::new();
        assert!(!diags.had_error());

        diags.error(1, "Unexpected character.");
        diags.report(4, " at end", "Unterminated string.");

        assert!(diags.had_error());
        assert_eq!(diags.len(), 2);
        assert_eq!(diags.errors()[0].line, 1);
        assert_eq!(diags.errors()[0].location, "");
        assert_eq!(diags.errors()[1].location, " at end");
    }

    #[test]
    fn test_diagnostics_display_one_line_per_error() {
        let mut diags = Diagnostics::new();
        diags.error(1, "Unexpected character.");
        diags.error(2, "Unterminated string.");
        assert_eq!(
            diags.to_string(),
            "[line 1] Error: Unexpected character.\n[line 2] Error: Unterminated string."
        );
    }

    #[test]
    fn test_diagnostics_as_boxed_error() {
        let mut diags = Diagnostics::new();
        diags.error(9, "Unterminated string.");
        let boxed: Box<dyn std::error::Error> = Box::new(diags);
        assert_eq!(boxed.to_string(), "[line 9] Error: Unterminated string.");
    }

    #[test]
    fn test_empty_diagnostics_display() {
        assert_eq!(Diagnostics::new().to_string(), "");
    }

    #[test]
    fn test_diagnostics_clear() {
        let mut diags = Diagnostics::new();
        diags.error(1, "Unexpected character.");
        diags.clear();
        assert!(diags.is_empty());
        assert!(!diags.had_error());
    }

    #[test]
    fn test_console_reporter_format() {
        let mut reporter = ConsoleReporter::with_writer(Vec::new());
        assert!(!reporter.had_error());

        reporter.error(3, "Unexpected character.");
        reporter.report(5, " at 'x'", "Bad thing.");

        assert!(reporter.had_error());
        assert_eq!(reporter.error_count(), 2);
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            text,
            "[line 3] Error: Unexpected character.\n[line 5] Error at 'x': Bad thing.\n"
        );
    }

    #[test]
    fn test_reporter_through_mut_ref() {
        fn report_one<R: Reporter>(mut reporter: R) {
            reporter.error(7, "Unexpected character.");
        }

        let mut diags = Diagnostics::new();
        report_one(&mut diags);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.errors()[0].line, 7);
    }
}
