//! # mcad2tex
//!
//! MathCad S-expression to LaTeX math translator written in Rust.
//!
//! ## Features
//!
//! - **Pattern Rules**: Products, equalities, parentheses, scaling, powers
//!   and multiplication rendered by an ordered list of matchers
//! - **Extended Forms**: Sums, integrals, roots, derivatives, limits,
//!   fractions, relations, units and matrices when they make up the whole input
//! - **Symbol Tables**: Marker tokens, Greek letters and special characters
//! - **Diagnostics**: Advisory checks for malformed input
//! - **WASM Support**: Compiles to WebAssembly for browser usage
//!
//! ## Usage Examples
//!
//! ```rust
//! use mcad2tex::mathcad_to_latex;
//!
//! let latex = mathcad_to_latex("(@PRODUCT (@IS n 1) k (@PARENS (@SCALE 8 (^ x 2))))");
//! assert_eq!(latex, r"\prod_{n=1}^{k} \left(8 \cdot x^2\right)");
//! ```
//!
//! ### Options
//!
//! ```rust
//! use mcad2tex::{mathcad_to_latex_with_options, TranslateOptions};
//!
//! let latex = mathcad_to_latex_with_options("(/ a b)", &TranslateOptions::classic());
//! assert_eq!(latex, "(/ a b)");
//!
//! let latex = mathcad_to_latex_with_options("(/ a b)", &TranslateOptions::default());
//! assert_eq!(latex, r"\frac{a}{b}");
//! ```

/// Core translation modules
pub mod core;

/// Data layer - static mappings
pub mod data;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export core translation functions
pub use core::refine::refine_latex;
pub use core::translator;
pub use core::translator::{
    translate, translate_with_diagnostics, translate_with_options, Rule, TranslateContext,
    TranslateOptions,
};

// Re-export symbol data
pub use data::symbols;

// Re-export utilities
pub use utils::diagnostics;
pub use utils::error::{
    ConversionError, ConversionOutput, ConversionResult, ConversionWarning, WarningKind,
};

/// Translate a MathCad expression to LaTeX math code
///
/// # Arguments
/// * `input` - MathCad S-expression text
///
/// # Returns
/// LaTeX math code
pub fn mathcad_to_latex(input: &str) -> String {
    translate(input)
}

/// Translate a MathCad expression to LaTeX math code with custom options
pub fn mathcad_to_latex_with_options(input: &str, options: &TranslateOptions) -> String {
    translate_with_options(input, options)
}

/// Translate and collect warnings about untranslated or dropped text
pub fn mathcad_to_latex_with_diagnostics(
    input: &str,
    options: &TranslateOptions,
) -> ConversionOutput {
    translate_with_diagnostics(input, options)
}

/// Translate, failing if anything was left untranslated or dropped
pub fn mathcad_to_latex_strict(
    input: &str,
    options: &TranslateOptions,
) -> ConversionResult<String> {
    translate_with_diagnostics(input, options).into_strict()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mathcad_to_latex_basic() {
        assert_eq!(mathcad_to_latex("(@IS n 1)"), "n=1");
        assert_eq!(mathcad_to_latex("α"), "\\alpha");
    }

    #[test]
    fn test_options_preset_classic() {
        let opts = TranslateOptions::classic();
        assert!(!opts.extended_forms);
        assert!(!opts.preserve_context);
        assert!(!opts.refine);
    }

    #[test]
    fn test_options_preset_readable() {
        let opts = TranslateOptions::readable();
        assert!(opts.extended_forms);
        assert!(opts.refine);
    }

    #[test]
    fn test_with_diagnostics() {
        let output = mathcad_to_latex_with_diagnostics("(@NTHROOT 3 x)", &TranslateOptions::default());
        assert_eq!(output.content, "\\sqrt[3]{x}");
        assert!(!output.has_warnings());
    }

    #[test]
    fn test_strict() {
        let options = TranslateOptions::default();
        assert_eq!(
            mathcad_to_latex_strict("(^ x 2)", &options).ok(),
            Some("x^2".to_string())
        );
        assert!(matches!(
            mathcad_to_latex_strict("(@BOGUS x)", &options),
            Err(ConversionError::StrictMode { .. })
        ));
    }
}
