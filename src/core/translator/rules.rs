//! Ordered form matchers
//!
//! Core rules are tried in a fixed priority order against the whole input.
//! Each one searches for its form anywhere in the string (first match
//! wins) and recurses into the captured sub-expressions.
//!
//! Extended rules only apply when the input as a whole is a single group
//! whose head they recognize; they are checked before the core rules.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use super::context::TranslateContext;
use super::forms::{find_forms, first_token, group_inner, is_bare, outermost_form, Form};
use super::{render_operand, substitute, translate_text};
use crate::data::symbols::{lookup_constant, lookup_unit, MATH_FUNCTIONS};

lazy_static! {
    static ref NUMBER: Regex = Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").unwrap();
}

/// Largest matrix `@MATRIX` will lay out
const MAX_MATRIX_CELLS: usize = 4096;

/// Prime counts above this are written as `f^{(n)}`
const MAX_PRIME_MARKS: usize = 16;

/// A core special-case form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `(@PRODUCT (@IS var lower) upper body)`
    Product,
    /// `(@IS var value)`
    Equality,
    /// `(@PARENS (inner))`
    Parens,
    /// `(@SCALE factor inner)`
    Scale,
    /// `(^ base exponent)`
    Power,
    /// `(* a b ...)`
    Multiply,
}

/// Core rules in priority order
pub const CORE_RULES: [Rule; 6] = [
    Rule::Product,
    Rule::Equality,
    Rule::Parens,
    Rule::Scale,
    Rule::Power,
    Rule::Multiply,
];

/// Heads recognized by [`apply_extended`]
pub const EXTENDED_HEADS: &[&str] = &[
    "@SUM",
    "@INTEGRAL",
    "@NTHROOT",
    "@DERIV",
    "@PART_DERIV",
    "@LIMIT",
    "@NEG",
    "@NOT",
    "@AND",
    "@OR",
    "@APPLY",
    "@PRIME",
    "/",
    "+",
    "-",
    "@LEQ",
    "@GEQ",
    "@NEQ",
    "<",
    ">",
    "@ELEMENT_OF",
    "@XOR",
    "@CROSS",
    "@DOT",
    "@EQ",
    "=",
    "^",
    "@LABEL",
    "@ID",
    "@SUB",
    "@MATRIX",
    "@RSCALE",
    "@SYM_EVAL",
];

/// Binary relations and operators rendered infix
const INFIX_OPERATORS: &[(&str, &str)] = &[
    ("@LEQ", "\\leq"),
    ("@GEQ", "\\geq"),
    ("@NEQ", "\\neq"),
    ("<", "<"),
    (">", ">"),
    ("@ELEMENT_OF", "\\in"),
    ("@XOR", "\\oplus"),
    ("@CROSS", "\\times"),
    ("@DOT", "\\cdot"),
    ("@EQ", "="),
    ("=", "="),
];

/// A successful core rule match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub rule: Rule,
    /// Byte span of the matched form in the input
    pub start: usize,
    pub end: usize,
    /// Rendered LaTeX for the form
    pub output: String,
}

impl Rule {
    /// Head token that introduces this form
    pub fn head(self) -> &'static str {
        match self {
            Rule::Product => "@PRODUCT",
            Rule::Equality => "@IS",
            Rule::Parens => "@PARENS",
            Rule::Scale => "@SCALE",
            Rule::Power => "^",
            Rule::Multiply => "*",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Rule::Product => "product",
            Rule::Equality => "equality",
            Rule::Parens => "parens",
            Rule::Scale => "scale",
            Rule::Power => "power",
            Rule::Multiply => "multiply",
        }
    }

    /// Find the first occurrence of this form in `text` and render it
    pub fn apply(self, text: &str, ctx: &mut TranslateContext) -> Option<RuleMatch> {
        for form in find_forms(text, self.head()) {
            let output = match self {
                Rule::Product => product(&form, ctx),
                Rule::Equality => equality(&form, ctx),
                Rule::Parens => parens(&form, ctx),
                Rule::Scale => scale(&form, ctx),
                Rule::Power => power(&form, ctx),
                Rule::Multiply => multiply(&form, ctx),
            };
            if let Some(output) = output {
                debug!(
                    "{} form at {}..{} (depth {})",
                    self.name(),
                    form.start,
                    form.end,
                    ctx.depth()
                );
                return Some(RuleMatch {
                    rule: self,
                    start: form.start,
                    end: form.end,
                    output,
                });
            }
        }
        None
    }
}

/// Check if `token` starts a form the current options recognize
pub fn is_form_head(token: &str, ctx: &TranslateContext) -> bool {
    CORE_RULES.iter().any(|rule| rule.head() == token)
        || (ctx.options.extended_forms && EXTENDED_HEADS.contains(&token))
}

/// `(@IS var value)` split into its two arguments
fn is_pair(arg: &str) -> Option<(&str, &str)> {
    let form = outermost_form(arg)?;
    if form.head != Rule::Equality.head() {
        return None;
    }
    match form.args().as_slice() {
        [var, value] => Some((*var, *value)),
        _ => None,
    }
}

/// Shared shape of `@PRODUCT` and `@SUM`
fn bound_operator(command: &str, form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    let args = form.args();
    let (var, lower) = is_pair(args.first()?)?;
    let upper = args.get(1)?;
    let body = form.rest_after(2)?;

    let var = render_operand(var, ctx);
    let lower = render_operand(lower, ctx);
    let upper = render_operand(upper, ctx);
    let body = translate_text(body, ctx);
    Some(format!("{}_{{{}={}}}^{{{}}} {}", command, var, lower, upper, body))
}

fn product(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    bound_operator("\\prod", form, ctx)
}

fn equality(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    match form.args().as_slice() {
        [var, value] => {
            let var = render_operand(var, ctx);
            let value = render_operand(value, ctx);
            Some(format!("{}={}", var, value))
        }
        _ => None,
    }
}

fn parens(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    let args = form.args();
    let [group] = args.as_slice() else {
        return None;
    };
    let inner = group_inner(group)?;
    Some(format!("\\left({}\\right)", render_inner(inner, ctx)))
}

/// Translate the content of a group whose parentheses were stripped.
///
/// `(@PARENS (@SCALE 8 x))` carries the scale form without its own parens.
fn render_inner(inner: &str, ctx: &mut TranslateContext) -> String {
    match first_token(inner) {
        Some(token) if is_form_head(token, ctx) => translate_text(&format!("({})", inner), ctx),
        _ => translate_text(inner, ctx),
    }
}

fn scale(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    let args = form.args();
    let factor = args.first()?;
    if !NUMBER.is_match(factor) {
        return None;
    }
    let inner = form.rest_after(1)?;
    Some(format!("{} \\cdot {}", factor, translate_text(inner, ctx)))
}

fn power(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    match form.args().as_slice() {
        [base, exponent] if is_bare(base) && is_bare(exponent) => Some(format!(
            "{}^{}",
            substitute(base, ctx),
            substitute(exponent, ctx)
        )),
        _ => None,
    }
}

/// Operands are split on whitespace only, so nested groups come apart
fn multiply(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    let operands: Vec<&str> = form.body.split_whitespace().collect();
    if operands.is_empty() {
        return None;
    }
    let rendered: Vec<String> = operands
        .into_iter()
        .map(|operand| translate_text(operand, ctx))
        .collect();
    Some(rendered.join(" \\cdot "))
}

/// Render `text` if it is a single group with an extended head
pub fn apply_extended(text: &str, ctx: &mut TranslateContext) -> Option<String> {
    let form = outermost_form(text)?;
    if !EXTENDED_HEADS.contains(&form.head) {
        return None;
    }

    let output = match form.head {
        "@SUM" => bound_operator("\\sum", &form, ctx),
        "@INTEGRAL" => integral(&form, ctx),
        "@NTHROOT" => nth_root(&form, ctx),
        "@DERIV" => derivative("\\mathrm{d}", &form, ctx),
        "@PART_DERIV" => derivative("\\partial", &form, ctx),
        "@LIMIT" => limit(&form, ctx),
        "/" => fraction(&form, ctx),
        "+" => chain(" + ", 2, &form, ctx),
        "-" => subtract(&form, ctx),
        "@NEG" => negate(&form, ctx),
        "@AND" => chain(" \\land ", 2, &form, ctx),
        "@OR" => chain(" \\lor ", 2, &form, ctx),
        "@NOT" => unary("\\neg ", &form, ctx),
        "@APPLY" => apply_function(&form, ctx),
        "@PRIME" => prime(&form, ctx),
        "^" => grouped_power(&form, ctx),
        "@LABEL" => label(&form, ctx),
        "@ID" => identifier(&form, ctx),
        "@SUB" => subscript(&form, ctx),
        "@MATRIX" => matrix(&form, ctx),
        "@RSCALE" => unit_result(&form, ctx),
        "@SYM_EVAL" => symbolic_evaluation(&form, ctx),
        head => INFIX_OPERATORS
            .iter()
            .find(|(name, _)| *name == head)
            .and_then(|(_, op)| infix(op, &form, ctx)),
    };

    if output.is_some() {
        debug!("extended {} form (depth {})", form.head, ctx.depth());
    }
    output
}

fn integral(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    match form.args().as_slice() {
        [lower, upper, integrand, var] => {
            let lower = render_operand(lower, ctx);
            let upper = render_operand(upper, ctx);
            let integrand = render_operand(integrand, ctx);
            let var = render_operand(var, ctx);
            Some(format!(
                "\\int_{{{}}}^{{{}}} {} \\, d{}",
                lower, upper, integrand, var
            ))
        }
        _ => None,
    }
}

fn nth_root(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    match form.args().as_slice() {
        [order, radicand] => {
            let radicand = render_operand(radicand, ctx);
            if matches!(*order, "2" | "@PLACEHOLDER") {
                Some(format!("\\sqrt{{{}}}", radicand))
            } else {
                let order = render_operand(order, ctx);
                Some(format!("\\sqrt[{}]{{{}}}", order, radicand))
            }
        }
        _ => None,
    }
}

fn derivative(symbol: &str, form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    match form.args().as_slice() {
        [var, order, function] => {
            let var = render_operand(var, ctx);
            let function = render_operand(function, ctx);
            let sep = if symbol == "\\partial" { " " } else { "" };
            if matches!(*order, "1" | "@PLACEHOLDER") {
                Some(format!(
                    "\\frac{{{}}}{{{}{}{}}} {}",
                    symbol, symbol, sep, var, function
                ))
            } else {
                let order = render_operand(order, ctx);
                Some(format!(
                    "\\frac{{{}^{{{}}}}}{{{}{}{}^{{{}}}}} {}",
                    symbol, order, symbol, sep, var, order, function
                ))
            }
        }
        _ => None,
    }
}

fn limit(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    let args = form.args();
    let (var, target, direction, function) = match args.as_slice() {
        [var, target, function] => (*var, *target, "", *function),
        [var, target, "@LEFT_HAND", function] => (*var, *target, "^{-}", *function),
        [var, target, "@RIGHT_HAND", function] => (*var, *target, "^{+}", *function),
        _ => return None,
    };
    let var = render_operand(var, ctx);
    let target = render_operand(target, ctx);
    let function = render_operand(function, ctx);
    Some(format!(
        "\\lim_{{{} \\to {}{}}} {}",
        var, target, direction, function
    ))
}

fn fraction(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    match form.args().as_slice() {
        [numerator, denominator] => {
            let numerator = render_operand(numerator, ctx);
            let denominator = render_operand(denominator, ctx);
            Some(format!("\\frac{{{}}}{{{}}}", numerator, denominator))
        }
        _ => None,
    }
}

fn chain(separator: &str, min_args: usize, form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    let args = form.args();
    if args.len() < min_args {
        return None;
    }
    let rendered: Vec<String> = args.iter().map(|arg| render_operand(arg, ctx)).collect();
    Some(rendered.join(separator))
}

fn subtract(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    match form.args().as_slice() {
        [_] => negate(form, ctx),
        [minuend, subtrahend] => {
            let minuend = render_operand(minuend, ctx);
            let subtrahend = render_operand(subtrahend, ctx);
            Some(format!("{} - {}", minuend, subtrahend))
        }
        _ => None,
    }
}

fn negate(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    let args = form.args();
    let [operand] = args.as_slice() else {
        return None;
    };
    let operand = render_operand(operand, ctx);
    if operand.contains(|c: char| c == ' ' || c == '+' || c == '-') {
        Some(format!("-\\left({}\\right)", operand))
    } else {
        Some(format!("-{}", operand))
    }
}

fn unary(prefix: &str, form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    let args = form.args();
    let [operand] = args.as_slice() else {
        return None;
    };
    Some(format!("{}{}", prefix, render_operand(operand, ctx)))
}

fn infix(op: &str, form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    match form.args().as_slice() {
        [left, right] => {
            let left = render_operand(left, ctx);
            let right = render_operand(right, ctx);
            Some(format!("{} {} {}", left, op, right))
        }
        _ => None,
    }
}

/// `(@APPLY f (@ARGS a b))` → `f(a, b)`
fn apply_function(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    let args = form.args();
    let (function, call_args) = match args.as_slice() {
        [function] => (*function, None),
        [function, call_args] => (*function, Some(*call_args)),
        _ => return None,
    };

    let name = match MATH_FUNCTIONS.get(function.to_lowercase().as_str()) {
        Some(latex) => (*latex).to_string(),
        None => render_operand(function, ctx),
    };

    let Some(call_args) = call_args else {
        return Some(name.replace('#', ""));
    };
    let args_form = outermost_form(call_args)?;
    if args_form.head != "@ARGS" {
        return None;
    }
    let rendered: Vec<String> = args_form
        .args()
        .iter()
        .map(|arg| render_operand(arg, ctx))
        .collect();
    let joined = rendered.join(", ");

    if name.contains('#') {
        Some(name.replace('#', &joined))
    } else {
        Some(format!("{}({})", name, joined))
    }
}

fn prime(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    let args = form.args();
    let (function, count) = match args.as_slice() {
        [function] => (*function, 1),
        [function, count] => (*function, count.parse::<usize>().ok()?),
        _ => return None,
    };
    let function = render_operand(function, ctx);
    if count > MAX_PRIME_MARKS {
        Some(format!("{}^{{({})}}", function, count))
    } else {
        Some(format!("{}{}", function, "'".repeat(count)))
    }
}

/// `(^ base exponent)` with a compound operand; bare pairs are left to the core rule
fn grouped_power(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    match form.args().as_slice() {
        [base, exponent] if !(is_bare(base) && is_bare(exponent)) => {
            let base = render_operand(base, ctx);
            let exponent = render_operand(exponent, ctx);
            if is_compound(&base) {
                Some(format!("\\left({}\\right)^{{{}}}", base, exponent))
            } else {
                Some(format!("{}^{{{}}}", base, exponent))
            }
        }
        _ => None,
    }
}

fn is_compound(latex: &str) -> bool {
    latex.contains(|c: char| c == ' ' || c == '+' || c == '-')
}

/// `(@LABEL KIND name)` where KIND is VARIABLE, UNIT, CONSTANT or FUNCTION
fn label(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    let args = form.args();
    let [kind, name] = args.as_slice() else {
        return None;
    };

    let output = match kind.to_ascii_uppercase().as_str() {
        "UNIT" if is_bare(name) => match lookup_unit(name) {
            Some(latex) => latex.to_string(),
            None => format!("\\mathrm{{{}}}", substitute(name, ctx)),
        },
        "CONSTANT" => constant(name, ctx),
        "FUNCTION" if is_bare(name) => format!("\\operatorname{{{}}}", substitute(name, ctx)),
        _ => render_operand(name, ctx),
    };
    Some(output)
}

/// Known constants by name, or `(@ID base (@SUB sub))` keyed as `base_sub`
fn constant(name: &str, ctx: &mut TranslateContext) -> String {
    if let Some(latex) = lookup_constant(name) {
        return latex.to_string();
    }

    let subscripted = outermost_form(name)
        .filter(|id| id.head == "@ID")
        .and_then(|id| match id.args().as_slice() {
            [base, sub] => Some(format!("{}_{}", base, subscript_source(sub))),
            _ => None,
        });
    match subscripted.as_deref().and_then(lookup_constant) {
        Some(latex) => latex.to_string(),
        None => render_operand(name, ctx),
    }
}

/// Raw text of a subscript argument: `(@SUB 0)` gives `0`
fn subscript_source(arg: &str) -> &str {
    match outermost_form(arg) {
        Some(sub) if sub.head == "@SUB" => sub.body,
        _ => arg,
    }
}

/// `(@ID name)` or `(@ID name (@SUB sub))`
fn identifier(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    match form.args().as_slice() {
        [name] => Some(render_operand(name, ctx)),
        [name, sub] => {
            let name = render_operand(name, ctx);
            let sub = render_operand(subscript_source(sub), ctx);
            Some(format!("{}_{{{}}}", name, sub))
        }
        _ => None,
    }
}

/// `(@SUB base sub)` → `base_{sub}`; a lone `(@SUB sub)` → `_{sub}`
fn subscript(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    match form.args().as_slice() {
        [sub] => Some(format!("_{{{}}}", render_operand(sub, ctx))),
        [base, sub] => {
            let base = render_operand(base, ctx);
            let sub = render_operand(sub, ctx);
            Some(format!("{}_{{{}}}", base, sub))
        }
        _ => None,
    }
}

/// `(@MATRIX rows cols e11 e12 ...)`, row-major, short element lists padded with `0`
fn matrix(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    let args = form.args();
    let [rows, cols, elements @ ..] = args.as_slice() else {
        return Some("\\begin{pmatrix} \\end{pmatrix}".to_string());
    };
    if elements.is_empty() {
        return Some("\\begin{pmatrix} \\end{pmatrix}".to_string());
    }

    let rows: usize = rows.parse().ok()?;
    let cols: usize = cols.parse().ok()?;
    rows.checked_mul(cols)
        .filter(|&cells| cells > 0 && cells <= MAX_MATRIX_CELLS)?;

    let mut lines = Vec::with_capacity(rows);
    for row in 0..rows {
        let cells: Vec<String> = (0..cols)
            .map(|col| match elements.get(row * cols + col) {
                Some(element) => render_operand(element, ctx),
                None => "0".to_string(),
            })
            .collect();
        lines.push(cells.join(" & "));
    }
    Some(format!(
        "\\begin{{pmatrix}}\n{}\n\\end{{pmatrix}}",
        lines.join(" \\\\\n")
    ))
}

/// `(@RSCALE value unit)`: a result shown in a chosen unit
fn unit_result(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    let args = form.args();
    let [value, unit] = args.as_slice() else {
        return None;
    };

    let parenthesized = outermost_form(value)
        .filter(|parens| parens.head == Rule::Parens.head())
        .and_then(|parens| group_inner(parens.body));
    let value = match parenthesized {
        Some(inner) => render_inner(inner, ctx),
        None => render_operand(value, ctx),
    };
    let unit = render_operand(unit, ctx);
    Some(format!("{}\\,{}", value, unit))
}

/// `(@SYM_EVAL expr [(@KW_STACK ...)] result)` → `expr \rightarrow result`
fn symbolic_evaluation(form: &Form, ctx: &mut TranslateContext) -> Option<String> {
    let args = form.args();
    let (expr, result) = match args.as_slice() {
        [expr] => (*expr, None),
        [expr, keywords] if is_keyword_stack(keywords) => (*expr, None),
        [expr, keywords, result, ..] if is_keyword_stack(keywords) => (*expr, Some(*result)),
        [expr, result, ..] => (*expr, Some(*result)),
        [] => return None,
    };

    let expr = render_operand(expr, ctx);
    match result {
        Some(result) => Some(format!("{} \\rightarrow {}", expr, render_operand(result, ctx))),
        None => Some(expr),
    }
}

fn is_keyword_stack(arg: &str) -> bool {
    outermost_form(arg).is_some_and(|keywords| keywords.head == "@KW_STACK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::translator::TranslateOptions;

    fn run(rule: Rule, text: &str) -> Option<String> {
        let options = TranslateOptions::default();
        let mut ctx = TranslateContext::new(&options);
        rule.apply(text, &mut ctx).map(|m| m.output)
    }

    fn run_extended(text: &str) -> Option<String> {
        let options = TranslateOptions::default();
        let mut ctx = TranslateContext::new(&options);
        apply_extended(text, &mut ctx)
    }

    #[test]
    fn test_product_requires_is_binding() {
        assert_eq!(
            run(Rule::Product, "(@PRODUCT (@IS n 1) k n)").as_deref(),
            Some("\\prod_{n=1}^{k} n")
        );
        assert_eq!(run(Rule::Product, "(@PRODUCT n k n)"), None);
        assert_eq!(run(Rule::Product, "(@PRODUCT (@IS n 1) k)"), None);
    }

    #[test]
    fn test_equality_is_unanchored() {
        let m = {
            let options = TranslateOptions::default();
            let mut ctx = TranslateContext::new(&options);
            Rule::Equality.apply("lead (@IS n 1) trail", &mut ctx)
        };
        let m = m.unwrap();
        assert_eq!(m.output, "n=1");
        assert_eq!((m.start, m.end), (5, 14));
    }

    #[test]
    fn test_scale_requires_numeric_factor() {
        assert_eq!(
            run(Rule::Scale, "(@SCALE 2.5 x)").as_deref(),
            Some("2.5 \\cdot x")
        );
        assert_eq!(run(Rule::Scale, "(@SCALE k x)"), None);
    }

    #[test]
    fn test_power_skips_nested_candidates() {
        // The first `(^` has a nested base; the second one matches
        assert_eq!(
            run(Rule::Power, "(^ (a) 2) (^ b 3)").as_deref(),
            Some("b^3")
        );
        assert_eq!(run(Rule::Power, "(^ (a) 2)"), None);
    }

    #[test]
    fn test_multiply_splits_on_whitespace() {
        assert_eq!(
            run(Rule::Multiply, "(* a (^ x 2))").as_deref(),
            Some("a \\cdot (^ \\cdot x \\cdot 2)")
        );
        // Runs of whitespace do not produce empty operands
        assert_eq!(
            run(Rule::Multiply, "(* a  b)").as_deref(),
            Some("a \\cdot b")
        );
        assert_eq!(
            run(Rule::Multiply, "(*  a\tb )").as_deref(),
            Some("a \\cdot b")
        );
    }

    #[test]
    fn test_extended_requires_whole_group() {
        assert_eq!(run_extended("(/ a b)").as_deref(), Some("\\frac{a}{b}"));
        assert_eq!(run_extended("x (/ a b)"), None);
        assert_eq!(run_extended("(/ a b c)"), None);
        assert_eq!(run_extended("(@PRODUCT (@IS n 1) k n)"), None);
    }

    #[test]
    fn test_extended_calculus() {
        assert_eq!(
            run_extended("(@INTEGRAL 0 1 (^ x 2) x)").as_deref(),
            Some("\\int_{0}^{1} x^2 \\, dx")
        );
        assert_eq!(
            run_extended("(@NTHROOT 3 x)").as_deref(),
            Some("\\sqrt[3]{x}")
        );
        assert_eq!(
            run_extended("(@NTHROOT @PLACEHOLDER x)").as_deref(),
            Some("\\sqrt{x}")
        );
        assert_eq!(
            run_extended("(@DERIV x 1 f)").as_deref(),
            Some("\\frac{\\mathrm{d}}{\\mathrm{d}x} f")
        );
        assert_eq!(
            run_extended("(@DERIV x 2 f)").as_deref(),
            Some("\\frac{\\mathrm{d}^{2}}{\\mathrm{d}x^{2}} f")
        );
        assert_eq!(
            run_extended("(@PART_DERIV y 1 g)").as_deref(),
            Some("\\frac{\\partial}{\\partial y} g")
        );
        assert_eq!(
            run_extended("(@LIMIT x 0 @RIGHT_HAND f)").as_deref(),
            Some("\\lim_{x \\to 0^{+}} f")
        );
    }

    #[test]
    fn test_extended_arithmetic_and_logic() {
        assert_eq!(run_extended("(+ a b c)").as_deref(), Some("a + b + c"));
        assert_eq!(run_extended("(- a b)").as_deref(), Some("a - b"));
        assert_eq!(run_extended("(- a)").as_deref(), Some("-a"));
        assert_eq!(
            run_extended("(@NEG (+ a b))").as_deref(),
            Some("-\\left(a + b\\right)")
        );
        assert_eq!(run_extended("(@LEQ a b)").as_deref(), Some("a \\leq b"));
        assert_eq!(run_extended("(@AND p q)").as_deref(), Some("p \\land q"));
        assert_eq!(run_extended("(@NOT p)").as_deref(), Some("\\neg p"));
    }

    #[test]
    fn test_apply_function() {
        assert_eq!(
            run_extended("(@APPLY sin (@ARGS x))").as_deref(),
            Some("\\sin(x)")
        );
        assert_eq!(
            run_extended("(@APPLY abs (@ARGS x))").as_deref(),
            Some("\\left|x\\right|")
        );
        assert_eq!(
            run_extended("(@APPLY f (@ARGS x y))").as_deref(),
            Some("f(x, y)")
        );
        assert_eq!(run_extended("(@APPLY f (g x))"), None);
    }

    #[test]
    fn test_prime() {
        assert_eq!(run_extended("(@PRIME f)").as_deref(), Some("f'"));
        assert_eq!(run_extended("(@PRIME f 2)").as_deref(), Some("f''"));
        assert_eq!(
            run_extended("(@PRIME f 12)").as_deref(),
            Some("f''''''''''''")
        );
        assert_eq!(run_extended("(@PRIME f 40)").as_deref(), Some("f^{(40)}"));
        assert_eq!(run_extended("(@PRIME f x)"), None);
    }

    #[test]
    fn test_grouped_power() {
        // Bare operands stay with the core rule
        assert_eq!(run_extended("(^ x 2)"), None);
        assert_eq!(
            run_extended("(^ (@LABEL VARIABLE x) 2)").as_deref(),
            Some("x^{2}")
        );
        assert_eq!(
            run_extended("(^ (+ a b) 2)").as_deref(),
            Some("\\left(a + b\\right)^{2}")
        );
        assert_eq!(
            run_extended("(^ e (* i π))").as_deref(),
            Some("e^{i \\cdot \\pi}")
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(run_extended("(@LABEL VARIABLE x)").as_deref(), Some("x"));
        assert_eq!(run_extended("(@LABEL VARIABLE α)").as_deref(), Some("\\alpha"));
        assert_eq!(
            run_extended("(@LABEL UNIT m)").as_deref(),
            Some("\\mathrm{m}")
        );
        assert_eq!(
            run_extended("(@LABEL UNIT Ω)").as_deref(),
            Some("\\Omega")
        );
        assert_eq!(
            run_extended("(@LABEL UNIT furlong)").as_deref(),
            Some("\\mathrm{furlong}")
        );
        assert_eq!(
            run_extended("(@LABEL FUNCTION erf)").as_deref(),
            Some("\\operatorname{erf}")
        );
        assert_eq!(run_extended("(@LABEL VARIABLE)"), None);
    }

    #[test]
    fn test_label_constant() {
        assert_eq!(
            run_extended("(@LABEL CONSTANT k)").as_deref(),
            Some("k_\\mathrm{B}")
        );
        assert_eq!(
            run_extended("(@LABEL CONSTANT (@ID ε (@SUB 0)))").as_deref(),
            Some("\\varepsilon_0")
        );
        // Unknown constants render like any other identifier
        assert_eq!(
            run_extended("(@LABEL CONSTANT (@ID v (@SUB 0)))").as_deref(),
            Some("v_{0}")
        );
        assert_eq!(run_extended("(@LABEL CONSTANT q)").as_deref(), Some("q"));
    }

    #[test]
    fn test_subscripts() {
        assert_eq!(run_extended("(@SUB x 1)").as_deref(), Some("x_{1}"));
        assert_eq!(run_extended("(@SUB 1)").as_deref(), Some("_{1}"));
        assert_eq!(
            run_extended("(@ID x (@SUB max))").as_deref(),
            Some("x_{max}")
        );
        assert_eq!(run_extended("(@ID θ)").as_deref(), Some("\\theta"));
    }

    #[test]
    fn test_matrix() {
        assert_eq!(
            run_extended("(@MATRIX 2 2 a b c d)").as_deref(),
            Some("\\begin{pmatrix}\na & b \\\\\nc & d\n\\end{pmatrix}")
        );
        assert_eq!(
            run_extended("(@MATRIX 2 1 (^ x 2))").as_deref(),
            Some("\\begin{pmatrix}\nx^2 \\\\\n0\n\\end{pmatrix}")
        );
        assert_eq!(
            run_extended("(@MATRIX 2)").as_deref(),
            Some("\\begin{pmatrix} \\end{pmatrix}")
        );
        assert_eq!(run_extended("(@MATRIX n 2 a b)"), None);
        assert_eq!(run_extended("(@MATRIX 100000 100000 a)"), None);
    }

    #[test]
    fn test_equations_and_results() {
        assert_eq!(run_extended("(@EQ a b)").as_deref(), Some("a = b"));
        assert_eq!(run_extended("(= y (^ x 2))").as_deref(), Some("y = x^2"));
        assert_eq!(
            run_extended("(@RSCALE 5 (@LABEL UNIT kg))").as_deref(),
            Some("5\\,\\mathrm{kg}")
        );
        assert_eq!(
            run_extended("(@RSCALE (@PARENS (+ a b)) (@LABEL UNIT m))").as_deref(),
            Some("a + b\\,\\mathrm{m}")
        );
        assert_eq!(
            run_extended("(@SYM_EVAL (+ x x) (@KW_STACK simplify) (* 2 x))").as_deref(),
            Some("x + x \\rightarrow 2 \\cdot x")
        );
        assert_eq!(
            run_extended("(@SYM_EVAL a b)").as_deref(),
            Some("a \\rightarrow b")
        );
        assert_eq!(run_extended("(@SYM_EVAL a)").as_deref(), Some("a"));
    }
}
