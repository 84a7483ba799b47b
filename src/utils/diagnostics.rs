//! MathCad input diagnostics
//!
//! Translation never rejects input, so this module offers a separate,
//! advisory check that explains why a translation may come out wrong:
//!
//! - Unbalanced parentheses
//! - Unknown `@` markers (left untranslated)
//! - Text outside the outermost form (dropped by translation)
//! - Nested groups inside `*` operands (split on whitespace)
//!
//! ## Example
//!
//! ```rust
//! use mcad2tex::diagnostics::check_mathcad;
//!
//! let result = check_mathcad("(@IS n 1");
//! assert!(result.has_errors());
//! ```

use std::fmt;

use crate::core::translator::forms::{find_forms, matching_paren, outermost_form};
use crate::core::translator::MARKER_TOKEN;
use crate::data::symbols::is_marker;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - translation might not be perfect
    Warning,
    /// Error - translation will likely produce broken LaTeX
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Human-readable message
    pub message: String,
    /// Line number (1-indexed)
    pub line: Option<usize>,
    /// Column number (1-indexed)
    pub column: Option<usize>,
    /// Relevant source text
    pub source_text: Option<String>,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            line: None,
            column: None,
            source_text: None,
            suggestion: None,
        }
    }

    /// Add location information
    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Add source text
    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    /// Add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)?;

        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, "\n  --> line {}:{}", line, col)?;
        }

        if let Some(ref source) = self.source_text {
            write!(f, "\n  |\n  | {}", source)?;
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Check result with summary
#[derive(Debug, Default)]
pub struct CheckResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// Number of errors
    pub errors: usize,
    /// Number of warnings
    pub warnings: usize,
    /// Number of info messages
    pub infos: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Check if there are any issues at all
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.errors > 0 {
            parts.push(format!(
                "{} error{}",
                self.errors,
                if self.errors == 1 { "" } else { "s" }
            ));
        }
        if self.warnings > 0 {
            parts.push(format!(
                "{} warning{}",
                self.warnings,
                if self.warnings == 1 { "" } else { "s" }
            ));
        }
        if self.infos > 0 {
            parts.push(format!(
                "{} note{}",
                self.infos,
                if self.infos == 1 { "" } else { "s" }
            ));
        }
        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Check a MathCad expression for issues
pub fn check_mathcad(input: &str) -> CheckResult {
    let mut result = CheckResult::new();
    let line_offsets = compute_line_offsets(input);

    check_paren_balance(input, &line_offsets, &mut result);
    check_markers(input, &line_offsets, &mut result);
    check_surrounding_text(input, &mut result);
    check_multiply_operands(input, &line_offsets, &mut result);

    result
}

/// Compute byte offsets for each line start
fn compute_line_offsets(input: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, c) in input.char_indices() {
        if c == '\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// Convert byte offset to line and column
fn offset_to_location(offset: usize, line_offsets: &[usize]) -> (usize, usize) {
    let line = line_offsets
        .iter()
        .position(|&o| o > offset)
        .unwrap_or(line_offsets.len())
        - 1;

    let column = offset - line_offsets.get(line).unwrap_or(&0) + 1;
    (line + 1, column) // 1-indexed
}

fn check_paren_balance(input: &str, line_offsets: &[usize], result: &mut CheckResult) {
    let mut open: Vec<usize> = Vec::new();

    for (offset, c) in input.char_indices() {
        match c {
            '(' => open.push(offset),
            ')' => {
                if open.pop().is_none() {
                    let (line, col) = offset_to_location(offset, line_offsets);
                    result.add(
                        Diagnostic::new(DiagnosticLevel::Error, "unmatched closing parenthesis ')'")
                            .with_location(line, col)
                            .with_suggestion("Check for a missing opening parenthesis"),
                    );
                }
            }
            _ => {}
        }
    }

    if let Some(&first) = open.first() {
        let (line, col) = offset_to_location(first, line_offsets);
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Error,
                format!(
                    "{} unclosed parenthes{}",
                    open.len(),
                    if open.len() == 1 { "is" } else { "es" }
                ),
            )
            .with_location(line, col)
            .with_suggestion("Forms that never close are not translated"),
        );
    }
}

fn check_markers(input: &str, line_offsets: &[usize], result: &mut CheckResult) {
    for token in MARKER_TOKEN.find_iter(input) {
        if is_marker(token.as_str()) {
            continue;
        }
        let (line, col) = offset_to_location(token.start(), line_offsets);
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Warning,
                format!("unknown marker `{}`", token.as_str()),
            )
            .with_location(line, col)
            .with_suggestion("The marker will be left untranslated"),
        );
    }
}

fn check_surrounding_text(input: &str, result: &mut CheckResult) {
    let trimmed = input.trim();
    if trimmed.is_empty() || outermost_form(trimmed).is_some() {
        return;
    }

    // Only relevant when some form exists to be matched
    let Some(open) = trimmed.find('(') else {
        return;
    };
    if matching_paren(trimmed, open).is_none() {
        return;
    }

    result.add(
        Diagnostic::new(
            DiagnosticLevel::Info,
            "input is not a single parenthesized form",
        )
        .with_source(trimmed)
        .with_suggestion("Text around the first matched form is dropped unless context is preserved"),
    );
}

fn check_multiply_operands(input: &str, line_offsets: &[usize], result: &mut CheckResult) {
    for form in find_forms(input, "*") {
        if !form.body.contains('(') {
            continue;
        }
        let (line, col) = offset_to_location(form.start, line_offsets);
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Info,
                "`*` operands containing groups are split on whitespace",
            )
            .with_location(line, col)
            .with_source(&input[form.start..form.end])
            .with_suggestion("Nested forms inside a product are not translated as a unit"),
        );
    }
}

/// Format diagnostics for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Error => "\x1b[31m",   // Red
                DiagnosticLevel::Warning => "\x1b[33m", // Yellow
                DiagnosticLevel::Info => "\x1b[34m",    // Blue
            };
            output.push_str(color);
            output.push_str(&format!("{}", diag));
            output.push_str("\x1b[0m\n\n");
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    // Summary
    if use_color {
        if result.has_errors() {
            output.push_str("\x1b[31m");
        } else if result.warnings > 0 {
            output.push_str("\x1b[33m");
        } else {
            output.push_str("\x1b[32m");
        }
    }

    output.push_str(&format!("Summary: {}", result.summary()));

    if use_color {
        output.push_str("\x1b[0m");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_expression() {
        let result = check_mathcad("(@PRODUCT (@IS n 1) k (@PARENS (@SCALE 8 (^ x 2))))");
        assert!(result.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(result.summary(), "no issues found");
    }

    #[test]
    fn test_unclosed_paren() {
        let result = check_mathcad("(@IS n 1");
        assert!(result.has_errors());
        assert_eq!(result.diagnostics[0].line, Some(1));
        assert_eq!(result.diagnostics[0].column, Some(1));
    }

    #[test]
    fn test_unmatched_close() {
        let result = check_mathcad("x)\n(y))");
        assert_eq!(result.errors, 2);
        assert_eq!(result.diagnostics[1].line, Some(2));
        assert_eq!(result.diagnostics[1].column, Some(4));
    }

    #[test]
    fn test_unknown_marker() {
        let result = check_mathcad("(@FOO x)");
        assert!(!result.has_errors());
        assert_eq!(result.warnings, 1);
        assert!(result.diagnostics[0].message.contains("@FOO"));
    }

    #[test]
    fn test_surrounding_text_note() {
        let result = check_mathcad("a (@IS n 1) b");
        assert_eq!(result.infos, 1);

        let result = check_mathcad("a + b");
        assert!(result.is_empty());
    }

    #[test]
    fn test_multiply_note() {
        let result = check_mathcad("(* a (^ x 2))");
        assert_eq!(result.infos, 1);
        assert!(check_mathcad("(* a b)").is_empty());
    }

    #[test]
    fn test_summary_format() {
        let mut result = CheckResult::new();
        result.add(Diagnostic::new(DiagnosticLevel::Error, "test"));
        result.add(Diagnostic::new(DiagnosticLevel::Warning, "test"));

        let summary = result.summary();
        assert!(summary.contains("1 error"));
        assert!(summary.contains("1 warning"));
    }

    #[test]
    fn test_format_without_color() {
        let result = check_mathcad("(@FOO x)");
        let text = format_diagnostics(&result, false);
        assert!(text.starts_with("warning: unknown marker `@FOO`"));
        assert!(text.ends_with("Summary: 1 warning"));
    }
}
