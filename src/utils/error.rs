//! Error handling for mcad2tex
//!
//! Translation itself never fails; it only produces warnings. The error
//! type covers the outer layers (reading input, strict mode in the CLI).

use std::fmt;

/// Conversion error type
#[derive(Debug, Clone)]
pub enum ConversionError {
    /// Invalid input (e.g. undecodable bytes on stdin)
    InvalidInput { message: String },
    /// IO error (for file operations)
    IoError { message: String },
    /// Warnings were produced while running in strict mode
    StrictMode { warnings: usize },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            ConversionError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
            ConversionError::StrictMode { warnings } => {
                write!(
                    f,
                    "{} translation warning{} in strict mode",
                    warnings,
                    if *warnings == 1 { "" } else { "s" }
                )
            }
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::InvalidData {
            ConversionError::InvalidInput {
                message: err.to_string(),
            }
        } else {
            ConversionError::IoError {
                message: err.to_string(),
            }
        }
    }
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

/// What a warning is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// An `@MARKER` token with no table entry was left as-is
    UnknownMarker,
    /// Text outside a matched form was discarded
    DroppedContext,
    /// Nesting exceeded the configured depth
    DepthLimit,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::UnknownMarker => write!(f, "unknown-marker"),
            WarningKind::DroppedContext => write!(f, "dropped-context"),
            WarningKind::DepthLimit => write!(f, "depth-limit"),
        }
    }
}

/// Conversion warnings (non-fatal issues)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionWarning {
    pub kind: WarningKind,
    pub message: String,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl ConversionWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
            suggestion: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(l) = self.line {
            write!(f, "Warning at line {}: {}", l, self.message)?;
        } else {
            write!(f, "Warning: {}", self.message)?;
        }
        if let Some(ref sug) = self.suggestion {
            write!(f, " ({})", sug)?;
        }
        Ok(())
    }
}

/// Conversion output with optional warnings
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The translated LaTeX
    pub content: String,
    /// Any warnings generated during translation
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionOutput {
    pub fn new(content: String) -> Self {
        Self {
            content,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(content: String, warnings: Vec<ConversionWarning>) -> Self {
        Self { content, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Fail with [`ConversionError::StrictMode`] if any warning was produced
    pub fn into_strict(self) -> ConversionResult<String> {
        if self.has_warnings() {
            Err(ConversionError::StrictMode {
                warnings: self.warnings.len(),
            })
        } else {
            Ok(self.content)
        }
    }
}
