//! Data layer - Static mappings
//!
//! This module contains all static data used for MathCad → LaTeX translation:
//! - Marker token mappings
//! - Greek letter and special symbol mappings
//! - Math function names
//! - Units and physical constants

pub mod symbols;

// Re-export commonly used items
pub use symbols::{
    is_marker, lookup_char, lookup_constant, lookup_marker, lookup_unit, CONSTANTS,
    GREEK_LETTERS, MARKER_SYMBOLS, MATH_FUNCTIONS, SPECIAL_SYMBOLS, UNITS,
};
