//! WASM bindings for mcad2tex
//!
//! This module provides the browser entry points: one input string in,
//! one LaTeX string (plus warnings) out.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

/// Translation options (exposed to WASM)
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Render extended forms (sums, integrals, fractions, ...)
    #[serde(default = "default_true")]
    pub extended_forms: bool,
    /// Keep text around a matched form instead of dropping it
    #[serde(default)]
    pub preserve_context: bool,
    /// Run the LaTeX refine pass on the result
    #[serde(default)]
    pub refine: bool,
}

#[cfg(feature = "wasm")]
impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            extended_forms: true,
            preserve_context: false,
            refine: false,
        }
    }
}

#[cfg(feature = "wasm")]
impl From<ConvertOptions> for crate::TranslateOptions {
    fn from(opts: ConvertOptions) -> Self {
        crate::TranslateOptions {
            extended_forms: opts.extended_forms,
            preserve_context: opts.preserve_context,
            refine: opts.refine,
            ..Default::default()
        }
    }
}

#[cfg(feature = "wasm")]
fn default_true() -> bool {
    true
}

/// Conversion result with additional metadata
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct ConvertResult {
    /// The translated LaTeX
    pub output: String,
    /// Whether the translation was successful
    pub success: bool,
    /// Error message if translation failed
    pub error: Option<String>,
    /// Warnings during translation
    pub warnings: Vec<String>,
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Translate a MathCad expression to LaTeX
///
/// # Arguments
/// * `input` - MathCad S-expression text
///
/// # Returns
/// LaTeX math code (without $ delimiters)
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "mathcadToLatex")]
pub fn mathcad_to_latex_wasm(input: &str) -> String {
    crate::mathcad_to_latex(input)
}

/// Translate a MathCad expression to LaTeX with options
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "mathcadToLatexWithOptions")]
pub fn mathcad_to_latex_with_options_wasm(input: &str, options: JsValue) -> JsValue {
    let opts: ConvertOptions = serde_wasm_bindgen::from_value(options).unwrap_or_default();
    let options: crate::TranslateOptions = opts.into();

    let result = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        crate::mathcad_to_latex_with_diagnostics(input, &options)
    })) {
        Ok(converted) => ConvertResult {
            output: converted.content,
            success: true,
            error: None,
            warnings: converted.warnings.iter().map(|w| w.to_string()).collect(),
        },
        Err(e) => {
            let error_msg = if let Some(s) = e.downcast_ref::<&str>() {
                format!("Translation failed: {}", s)
            } else if let Some(s) = e.downcast_ref::<String>() {
                format!("Translation failed: {}", s)
            } else {
                "Translation failed: unknown error (check browser console for details)".to_string()
            };
            ConvertResult {
                output: String::new(),
                success: false,
                error: Some(error_msg),
                warnings: vec![],
            }
        }
    };

    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Get version information
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Check a MathCad expression for potential issues
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "checkMathcad")]
pub fn check_mathcad_wasm(input: &str) -> JsValue {
    use crate::diagnostics::DiagnosticLevel;

    let result = crate::diagnostics::check_mathcad(input);

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for d in &result.diagnostics {
        match d.level {
            DiagnosticLevel::Error => errors.push(d.message.clone()),
            DiagnosticLevel::Warning => warnings.push(d.message.clone()),
            DiagnosticLevel::Info => infos.push(d.message.clone()),
        }
    }

    let summary = CheckSummary {
        errors,
        warnings,
        infos,
        has_errors: result.has_errors(),
    };
    serde_wasm_bindgen::to_value(&summary).unwrap_or(JsValue::NULL)
}

/// Summary of MathCad check results
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct CheckSummary {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
    pub has_errors: bool,
}
