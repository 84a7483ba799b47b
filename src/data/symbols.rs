//! MathCad marker and symbol mappings
//!
//! The tables here drive the flat substitution pass: every `@MARKER` token
//! and every mapped character is replaced by its LaTeX rendering. Markers
//! that carry no visible output map to the empty string.

use phf::phf_map;

/// MathCad marker token to LaTeX
pub static MARKER_SYMBOLS: phf::Map<&'static str, &'static str> = phf_map! {
    // Big operators
    "@PRODUCT" => "\\prod",
    "@SUM" => "\\sum",
    "@INTEGRAL" => "\\int",
    "@LIMIT" => "\\lim",

    // Calculus
    "@DERIV" => "\\frac{\\mathrm{d}}{\\mathrm{d}}",
    "@PART_DERIV" => "\\partial",
    "@GRAD" => "\\nabla",
    "@PRIME" => "'",
    "@NTHROOT" => "\\sqrt",
    "@LEFT_HAND" => "^{-}",
    "@RIGHT_HAND" => "^{+}",

    // Operators written as markers
    "@*" => "\\cdot",
    "@^" => "^",
    "@/" => "\\frac",
    "@+" => "+",
    "@-" => "-",
    "@NEG" => "-",
    "@SCALE" => "\\cdot",
    "@RSCALE" => "\\,",
    "@DOT" => "\\cdot",
    "@CROSS" => "\\times",

    // Relations and logic
    "@IS" => "=",
    "@EQ" => "=",
    "@NEQ" => "\\neq",
    "@LEQ" => "\\leq",
    "@GEQ" => "\\geq",
    "@ELEMENT_OF" => "\\in",
    "@AND" => "\\land",
    "@OR" => "\\lor",
    "@NOT" => "\\neg",
    "@XOR" => "\\oplus",
    "@SYM_EVAL" => "\\rightarrow",

    // Structural markers with no rendering of their own
    "@APPLY" => "",
    "@ARGS" => "",
    "@PARENS" => "",
    "@LABEL" => "",
    "@ID" => "",
    "@SUB" => "_",
    "@MATRIX" => "",
    "@KW_STACK" => "",
    "@PLACEHOLDER" => "",
};

/// Greek letters (Unicode to LaTeX)
pub static GREEK_LETTERS: phf::Map<char, &'static str> = phf_map! {
    // Lowercase
    'α' => "\\alpha",
    'β' => "\\beta",
    'γ' => "\\gamma",
    'δ' => "\\delta",
    'ε' => "\\epsilon",
    'ζ' => "\\zeta",
    'η' => "\\eta",
    'θ' => "\\theta",
    'ϑ' => "\\vartheta",
    'ι' => "\\iota",
    'κ' => "\\kappa",
    'λ' => "\\lambda",
    'μ' => "\\mu",
    'ν' => "\\nu",
    'ξ' => "\\xi",
    'ο' => "o",
    'π' => "\\pi",
    'ρ' => "\\rho",
    'σ' => "\\sigma",
    'τ' => "\\tau",
    'υ' => "\\upsilon",
    'φ' => "\\phi",
    'ϕ' => "\\varphi",
    'χ' => "\\chi",
    'ψ' => "\\psi",
    'ω' => "\\omega",

    // Uppercase (letters identical to Latin ones render as Latin)
    'Α' => "A",
    'Β' => "B",
    'Γ' => "\\Gamma",
    'Δ' => "\\Delta",
    'Ε' => "E",
    'Ζ' => "Z",
    'Η' => "H",
    'Θ' => "\\Theta",
    'Ι' => "I",
    'Κ' => "K",
    'Λ' => "\\Lambda",
    'Μ' => "M",
    'Ν' => "N",
    'Ξ' => "\\Xi",
    'Ο' => "O",
    'Π' => "\\Pi",
    'Ρ' => "P",
    'Σ' => "\\Sigma",
    'Τ' => "T",
    'Υ' => "\\Upsilon",
    'Φ' => "\\Phi",
    'Χ' => "X",
    'Ψ' => "\\Psi",
    'Ω' => "\\Omega",
};

/// Non-letter symbols that MathCad emits as plain Unicode
pub static SPECIAL_SYMBOLS: phf::Map<char, &'static str> = phf_map! {
    '∞' => "\\infty",
    'ℏ' => "\\hbar",
    '†' => "{\\dagger}",
    '‡' => "{\\ddagger}",
    '∗' => "^{*}",
    '°' => "^{\\circ}",
    '′' => "^{\\prime}",
    '″' => "^{\\prime\\prime}",
    '‴' => "^{\\prime\\prime\\prime}",
};

/// Function names understood by `@APPLY`.
///
/// A `#` in the value marks where the argument list goes; values without it
/// are followed by a parenthesized argument list.
pub static MATH_FUNCTIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "sin" => "\\sin",
    "cos" => "\\cos",
    "tan" => "\\tan",
    "cot" => "\\cot",
    "sec" => "\\sec",
    "csc" => "\\csc",
    "arcsin" => "\\arcsin",
    "arccos" => "\\arccos",
    "arctan" => "\\arctan",
    "sinh" => "\\sinh",
    "cosh" => "\\cosh",
    "tanh" => "\\tanh",
    "ln" => "\\ln",
    "log" => "\\log",
    "log10" => "\\log_{10}",
    "exp" => "\\exp",
    "max" => "\\max",
    "min" => "\\min",
    "abs" => "\\left|#\\right|",
};

/// Unit names inside `(@LABEL UNIT ...)`
pub static UNITS: phf::Map<&'static str, &'static str> = phf_map! {
    // SI base units
    "m" => "\\mathrm{m}",
    "kg" => "\\mathrm{kg}",
    "s" => "\\mathrm{s}",
    "A" => "\\mathrm{A}",
    "K" => "\\mathrm{K}",
    "mol" => "\\mathrm{mol}",
    "cd" => "\\mathrm{cd}",

    // Derived SI units
    "N" => "\\mathrm{N}",
    "n" => "\\mathrm{n}",
    "newton" => "\\mathrm{N}",
    "Pa" => "\\mathrm{Pa}",
    "J" => "\\mathrm{J}",
    "W" => "\\mathrm{W}",
    "C" => "\\mathrm{C}",
    "V" => "\\mathrm{V}",
    "F" => "\\mathrm{F}",
    "Ω" => "\\Omega",
    "S" => "\\mathrm{S}",
    "T" => "\\mathrm{T}",
    "H" => "\\mathrm{H}",
    "Hz" => "\\mathrm{Hz}",

    // Common non-SI units
    "min" => "\\mathrm{min}",
    "h" => "\\mathrm{h}",
    "day" => "\\mathrm{day}",
    "deg" => "^{\\circ}",
    "rad" => "\\mathrm{rad}",
    "sr" => "\\mathrm{sr}",
    "L" => "\\mathrm{L}",
    "g" => "\\mathrm{g}",
    "t" => "\\mathrm{t}",
    "eV" => "\\mathrm{eV}",
    "bar" => "\\mathrm{bar}",
    "atm" => "\\mathrm{atm}",
    "in" => "\\mathrm{in}",
    "ft" => "\\mathrm{ft}",
    "mi" => "\\mathrm{mi}",
    "lb" => "\\mathrm{lb}",
};

/// Physical constants inside `(@LABEL CONSTANT ...)`.
///
/// Subscripted constants are keyed as `base_sub`, matching
/// `(@ID base (@SUB sub))`.
pub static CONSTANTS: phf::Map<&'static str, &'static str> = phf_map! {
    // Fundamental constants
    "c" => "c",
    "e_c" => "e",
    "h" => "h",
    "ℏ" => "\\hbar",
    "k" => "k_\\mathrm{B}",
    "m_u" => "m_\\mathrm{u}",
    "N_A" => "N_\\mathrm{A}",
    "R" => "R",
    "R_∞" => "R_{\\infty}",
    "α" => "\\alpha",
    "γ" => "\\gamma",
    "ε_0" => "\\varepsilon_0",
    "μ_0" => "\\mu_0",
    "σ" => "\\sigma",
    "Φ_0" => "\\Phi_0",

    // Further constants
    "G" => "G",
    "g" => "g",
    "M_e" => "m_\\mathrm{e}",
    "M_p" => "m_\\mathrm{p}",
    "M_n" => "m_\\mathrm{n}",
    "q_e" => "e",
    "F" => "F",
    "n_0" => "n_0",
    "K_J" => "K_\\mathrm{J}",
    "R_K" => "R_\\mathrm{K}",
    "μ_B" => "\\mu_\\mathrm{B}",
    "μ_N" => "\\mu_\\mathrm{N}",
    "a_0" => "a_0",
    "E_h" => "E_\\mathrm{h}",
    "λ_C" => "\\lambda_\\mathrm{C}",
};

/// Look up a marker token such as `@SUM`
#[inline]
pub fn lookup_marker(token: &str) -> Option<&'static str> {
    MARKER_SYMBOLS.get(token).copied()
}

/// Look up a single character in the Greek and special symbol tables
#[inline]
pub fn lookup_char(ch: char) -> Option<&'static str> {
    GREEK_LETTERS
        .get(&ch)
        .or_else(|| SPECIAL_SYMBOLS.get(&ch))
        .copied()
}

/// Look up a unit name, falling back to a case-insensitive match
pub fn lookup_unit(name: &str) -> Option<&'static str> {
    UNITS.get(name).copied().or_else(|| {
        UNITS
            .entries()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, latex)| *latex)
    })
}

/// Look up a physical constant by its MathCad name
#[inline]
pub fn lookup_constant(name: &str) -> Option<&'static str> {
    CONSTANTS.get(name).copied()
}

/// Check if a token is a known marker
#[inline]
pub fn is_marker(token: &str) -> bool {
    MARKER_SYMBOLS.contains_key(token)
}
