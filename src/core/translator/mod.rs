//! MathCad to LaTeX translator
//!
//! A best-effort string rewriter. The input is scanned for special forms in
//! a fixed priority order; the first form found is rendered (recursing into
//! its sub-expressions) and becomes the whole output. Input with no special
//! form gets a single pass of flat marker/symbol substitution.

pub mod context;
pub mod forms;
pub mod rules;

pub use context::{TranslateContext, TranslateOptions, DEFAULT_MAX_DEPTH};
pub use rules::{Rule, RuleMatch, CORE_RULES, EXTENDED_HEADS};

use lazy_static::lazy_static;
use log::{trace, warn};
use regex::Regex;

use crate::core::refine::refine_latex;
use crate::data::symbols::{lookup_char, lookup_marker};
use crate::utils::error::{ConversionOutput, WarningKind};

lazy_static! {
    /// `@NAME` markers and `@` followed by an operator character
    pub(crate) static ref MARKER_TOKEN: Regex = Regex::new(r"@(?:[A-Z_]+|[*^/+\-])").unwrap();
}

/// Translate a MathCad expression to LaTeX with default options
pub fn translate(input: &str) -> String {
    translate_with_options(input, &TranslateOptions::default())
}

/// Translate a MathCad expression to LaTeX with custom options
pub fn translate_with_options(input: &str, options: &TranslateOptions) -> String {
    translate_with_diagnostics(input, options).content
}

/// Translate and collect warnings about untranslated or dropped text
pub fn translate_with_diagnostics(input: &str, options: &TranslateOptions) -> ConversionOutput {
    let mut ctx = TranslateContext::new(options);
    let mut content = translate_text(input, &mut ctx);
    if options.refine {
        content = refine_latex(&content);
    }
    ConversionOutput::with_warnings(content, ctx.into_warnings())
}

/// Recursive entry point used by the rules
pub(crate) fn translate_text(text: &str, ctx: &mut TranslateContext) -> String {
    if !ctx.enter() {
        warn!("nesting deeper than {} levels, substituting only", ctx.options.max_depth);
        ctx.warn(
            WarningKind::DepthLimit,
            format!(
                "nesting deeper than {} levels was not translated",
                ctx.options.max_depth
            ),
        );
        return substitute(text, ctx);
    }
    let output = dispatch(text, ctx);
    ctx.leave();
    output
}

fn dispatch(text: &str, ctx: &mut TranslateContext) -> String {
    if ctx.options.extended_forms {
        if let Some(output) = rules::apply_extended(text, ctx) {
            return output;
        }
    }

    match find_core(text, ctx) {
        Some(found) => splice(text, found, ctx),
        None => substitute(text, ctx),
    }
}

/// First core rule, in priority order, that matches somewhere in `text`
fn find_core(text: &str, ctx: &mut TranslateContext) -> Option<RuleMatch> {
    CORE_RULES.iter().find_map(|rule| rule.apply(text, ctx))
}

/// Combine a rule match with the text around it
fn splice(text: &str, found: RuleMatch, ctx: &mut TranslateContext) -> String {
    let prefix = &text[..found.start];
    let suffix = &text[found.end..];

    if prefix.trim().is_empty() && suffix.trim().is_empty() {
        return found.output;
    }

    if !ctx.options.preserve_context {
        ctx.warn(
            WarningKind::DroppedContext,
            format!(
                "text around the {} form was dropped: `{}`",
                found.rule.name(),
                text.trim()
            ),
        );
        return found.output;
    }

    // Later forms are siblings and stay at the current depth
    let mut output = substitute(prefix, ctx);
    output.push_str(&found.output);
    let mut rest = suffix;
    loop {
        if rest.trim().is_empty() {
            output.push_str(rest);
            break;
        }
        if ctx.options.extended_forms {
            if let Some(extended) = rules::apply_extended(rest, ctx) {
                output.push_str(&rest[..rest.len() - rest.trim_start().len()]);
                output.push_str(&extended);
                break;
            }
        }
        match find_core(rest, ctx) {
            Some(next) => {
                output.push_str(&substitute(&rest[..next.start], ctx));
                output.push_str(&next.output);
                rest = &rest[next.end..];
            }
            None => {
                output.push_str(&substitute(rest, ctx));
                break;
            }
        }
    }
    output
}

/// Render one argument: groups are translated, bare tokens substituted
pub(crate) fn render_operand(arg: &str, ctx: &mut TranslateContext) -> String {
    if arg.trim_start().starts_with('(') {
        translate_text(arg, ctx)
    } else {
        substitute(arg, ctx)
    }
}

/// Flat substitution of marker tokens and mapped characters.
///
/// Unknown markers are kept verbatim. A command ending in a letter is
/// separated from a following letter or digit by one space.
pub(crate) fn substitute(text: &str, ctx: &mut TranslateContext) -> String {
    let mut output = String::with_capacity(text.len());
    let mut last = 0;

    for token in MARKER_TOKEN.find_iter(text) {
        substitute_chars(&text[last..token.start()], &mut output);
        match lookup_marker(token.as_str()) {
            Some(latex) => {
                let next = text[token.end()..].chars().next();
                push_command(&mut output, latex, next);
            }
            None => {
                ctx.warn(
                    WarningKind::UnknownMarker,
                    format!("unknown marker `{}` left untranslated", token.as_str()),
                );
                output.push_str(token.as_str());
            }
        }
        last = token.end();
    }
    substitute_chars(&text[last..], &mut output);

    trace!("substituted `{}` -> `{}`", text, output);
    output
}

fn substitute_chars(text: &str, output: &mut String) {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match lookup_char(c) {
            Some(latex) => push_command(output, latex, chars.peek().copied()),
            None => output.push(c),
        }
    }
}

fn push_command(output: &mut String, latex: &str, next: Option<char>) {
    output.push_str(latex);
    let ends_in_name = latex.starts_with('\\') && latex.ends_with(|c: char| c.is_ascii_alphabetic());
    if ends_in_name && next.is_some_and(char::is_alphanumeric) {
        output.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reference_expression() {
        assert_eq!(
            translate("(@PRODUCT (@IS n 1) k (@PARENS (@SCALE 8 (^ x 2))))"),
            "\\prod_{n=1}^{k} \\left(8 \\cdot x^2\\right)"
        );
    }

    #[test]
    fn test_core_forms() {
        assert_eq!(translate("(@IS n 1)"), "n=1");
        assert_eq!(translate("(@PARENS (x))"), "\\left(x\\right)");
        assert_eq!(translate("(^ x 2)"), "x^2");
        assert_eq!(translate("(* a b c)"), "a \\cdot b \\cdot c");
        assert_eq!(translate("(@SCALE 3 y)"), "3 \\cdot y");
    }

    #[test]
    fn test_parens_with_bare_form_inside() {
        assert_eq!(translate("(@PARENS (* a b))"), "\\left(a \\cdot b\\right)");
        assert_eq!(translate("(@PARENS (a b))"), "\\left(a b\\right)");
    }

    #[test]
    fn test_fallback_substitution() {
        assert_eq!(translate("@LEQ"), "\\leq");
        assert_eq!(translate("a @GEQ b"), "a \\geq b");
        assert_eq!(translate("(@ARGS)"), "()");
        assert_eq!(
            translate_with_options("(@APPLY f)", &TranslateOptions::classic()),
            "( f)"
        );
        assert_eq!(translate("(@SUMX)"), "(@SUMX)");
    }

    #[test]
    fn test_greek_spacing() {
        assert_eq!(translate("αx"), "\\alpha x");
        assert_eq!(translate("2π"), "2\\pi");
        assert_eq!(translate("α+β"), "\\alpha+\\beta");
        assert_eq!(translate("x°"), "x^{\\circ}");
    }

    #[test]
    fn test_identity_without_markers() {
        for s in ["", "x", "a + b", "f(x) = y", "hello world", "(a (b c))"] {
            assert_eq!(translate(s), s);
        }
    }

    #[test]
    fn test_whole_string_capture() {
        assert_eq!(translate("a (@IS n 1) b"), "n=1");
        let output = translate_with_diagnostics("a (@IS n 1) b", &TranslateOptions::default());
        assert!(output
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::DroppedContext));
    }

    #[test]
    fn test_preserve_context() {
        let options = TranslateOptions::contextual();
        assert_eq!(
            translate_with_options("α = (@IS n 1) and (^ x 2)", &options),
            "\\alpha = n=1 and x^2"
        );
    }

    #[test]
    fn test_preserve_context_many_siblings() {
        let input = vec!["(^ a 1)"; 300].join(" + ");
        let output = translate_with_diagnostics(&input, &TranslateOptions::contextual());
        assert_eq!(output.content, vec!["a^1"; 300].join(" + "));
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_preserve_context_trailing_extended_form() {
        let options = TranslateOptions::contextual();
        assert_eq!(
            translate_with_options("(@IS n 1) (/ a b)", &options),
            "n=1 \\frac{a}{b}"
        );
    }

    #[test]
    fn test_unknown_marker_warning() {
        let output = translate_with_diagnostics("@FOO x", &TranslateOptions::default());
        assert_eq!(output.content, "@FOO x");
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].kind, WarningKind::UnknownMarker);
    }

    #[test]
    fn test_depth_limit() {
        let options = TranslateOptions {
            max_depth: 2,
            ..Default::default()
        };
        let output = translate_with_diagnostics("(@PARENS ((@PARENS ((@PARENS (x))))))", &options);
        assert!(output
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::DepthLimit));
    }

    #[test]
    fn test_classic_keeps_extended_heads_flat() {
        let classic = TranslateOptions::classic();
        assert_eq!(translate_with_options("(/ a b)", &classic), "(/ a b)");
        assert_eq!(translate("(/ a b)"), "\\frac{a}{b}");
    }

    #[test]
    fn test_refine_option() {
        let options = TranslateOptions::readable();
        assert_eq!(
            translate_with_options("(@SUM (@IS i 1) 10 (^ i 2))", &options),
            "\\displaystyle\\sum_{i=1}^{10} i^{2}"
        );
    }
}
