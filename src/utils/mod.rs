//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Input diagnostics and error reporting
//! - Error, warning and result types

pub mod diagnostics;
pub mod error;

// Re-export commonly used items
pub use diagnostics::{check_mathcad, format_diagnostics, CheckResult, Diagnostic, DiagnosticLevel};
pub use error::{
    ConversionError, ConversionOutput, ConversionResult, ConversionWarning, WarningKind,
};
