//! Core translation modules
//!
//! This module contains the translation engine:
//! - `translator`: MathCad to LaTeX pattern-matching translator
//! - `refine`: optional LaTeX cleanup pass

pub mod refine;
pub mod translator;

// Re-export main types and functions
pub use refine::refine_latex;
pub use translator::{
    translate, translate_with_diagnostics, translate_with_options, Rule, TranslateContext,
    TranslateOptions,
};
