//! Translation options and per-call state

use crate::utils::error::{ConversionWarning, WarningKind};

/// Default recursion limit for nested forms
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for MathCad to LaTeX translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Recognize outermost forms beyond the core six (`@SUM`, `@INTEGRAL`,
    /// `/`, `+`, relations, function application, ...)
    pub extended_forms: bool,
    /// Keep text around a matched form instead of dropping it
    pub preserve_context: bool,
    /// Run the LaTeX refine pass on the result
    pub refine: bool,
    /// Nesting depth at which translation stops recursing
    pub max_depth: usize,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            extended_forms: true,
            preserve_context: false,
            refine: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TranslateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the six core forms plus flat substitution
    pub fn classic() -> Self {
        Self {
            extended_forms: false,
            ..Default::default()
        }
    }

    /// Extended forms, keeping text around matched forms
    pub fn contextual() -> Self {
        Self {
            preserve_context: true,
            ..Default::default()
        }
    }

    /// Extended forms with the refine pass applied
    pub fn readable() -> Self {
        Self {
            refine: true,
            ..Default::default()
        }
    }
}

/// State threaded through one translation call
#[derive(Debug)]
pub struct TranslateContext<'o> {
    pub options: &'o TranslateOptions,
    depth: usize,
    warnings: Vec<ConversionWarning>,
}

impl<'o> TranslateContext<'o> {
    pub fn new(options: &'o TranslateOptions) -> Self {
        Self {
            options,
            depth: 0,
            warnings: Vec::new(),
        }
    }

    /// Enter one nesting level; returns false once the depth limit is hit
    pub fn enter(&mut self) -> bool {
        if self.depth >= self.options.max_depth {
            return false;
        }
        self.depth += 1;
        true
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Record a warning, skipping exact duplicates
    pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        let message = message.into();
        if self
            .warnings
            .iter()
            .any(|w| w.kind == kind && w.message == message)
        {
            return;
        }
        self.warnings.push(ConversionWarning::new(kind, message));
    }

    pub fn warnings(&self) -> &[ConversionWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ConversionWarning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let classic = TranslateOptions::classic();
        assert!(!classic.extended_forms);
        assert!(!classic.preserve_context);

        let contextual = TranslateOptions::contextual();
        assert!(contextual.extended_forms);
        assert!(contextual.preserve_context);

        assert!(TranslateOptions::readable().refine);
        assert_eq!(TranslateOptions::new().max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_depth_limit() {
        let options = TranslateOptions {
            max_depth: 2,
            ..Default::default()
        };
        let mut ctx = TranslateContext::new(&options);
        assert!(ctx.enter());
        assert!(ctx.enter());
        assert!(!ctx.enter());
        ctx.leave();
        assert_eq!(ctx.depth(), 1);
    }

    #[test]
    fn test_duplicate_warnings_collapse() {
        let options = TranslateOptions::default();
        let mut ctx = TranslateContext::new(&options);
        ctx.warn(WarningKind::UnknownMarker, "unknown marker `@FOO`");
        ctx.warn(WarningKind::UnknownMarker, "unknown marker `@FOO`");
        ctx.warn(WarningKind::UnknownMarker, "unknown marker `@BAR`");
        assert_eq!(ctx.warnings().len(), 2);
    }
}
