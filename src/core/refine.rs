//! LaTeX refine pass
//!
//! Optional cleanup applied after translation: bare function names become
//! commands, bare superscripts get braces, and big operators with both
//! limits are set in display style. Running it twice changes nothing.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref FUNCTION_NAME: Regex = Regex::new(
        r"(^|[^\\A-Za-z])(arcsin|arccos|arctan|sinh|cosh|tanh|sin|cos|tan|cot|sec|csc|log|ln|exp|max|min|lim)\b"
    ).unwrap();

    static ref BARE_SUPERSCRIPT: Regex = Regex::new(r"\^([A-Za-z0-9.]+)").unwrap();

    static ref BIG_OPERATOR: Regex = Regex::new(
        r"(\\displaystyle)?\\(int|sum|prod)(_\{[^{}]*\}\^\{[^{}]*\})"
    ).unwrap();
}

/// Refine translated LaTeX for typesetting
pub fn refine_latex(latex: &str) -> String {
    if latex.is_empty() {
        return String::new();
    }

    let refined = FUNCTION_NAME.replace_all(latex, |caps: &Captures| {
        format!("{}\\{}", &caps[1], &caps[2])
    });

    let refined = BARE_SUPERSCRIPT.replace_all(&refined, "^{${1}}");

    let refined = BIG_OPERATOR.replace_all(&refined, |caps: &Captures| {
        if caps.get(1).is_some() {
            caps[0].to_string()
        } else {
            format!("\\displaystyle\\{}{}", &caps[2], &caps[3])
        }
    });

    refined.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_function_names() {
        assert_eq!(refine_latex("sin(x) + cos(y)"), "\\sin(x) + \\cos(y)");
        assert_eq!(refine_latex("\\sin(x)"), "\\sin(x)");
        assert_eq!(refine_latex("cosine"), "cosine");
        assert_eq!(refine_latex("sinh x"), "\\sinh x");
    }

    #[test]
    fn test_superscripts() {
        assert_eq!(refine_latex("x^2"), "x^{2}");
        assert_eq!(refine_latex("x^10 + y^{3}"), "x^{10} + y^{3}");
    }

    #[test]
    fn test_big_operators() {
        assert_eq!(
            refine_latex("\\prod_{n=1}^{k} n"),
            "\\displaystyle\\prod_{n=1}^{k} n"
        );
        assert_eq!(refine_latex("\\int x"), "\\int x");
    }

    #[test]
    fn test_idempotent() {
        let once = refine_latex("\\sum_{i=1}^{n} sin(x)^2");
        assert_eq!(refine_latex(&once), once);
        assert_eq!(once, "\\displaystyle\\sum_{i=1}^{n} \\sin(x)^{2}");
    }

    #[test]
    fn test_empty() {
        assert_eq!(refine_latex(""), "");
    }
}
