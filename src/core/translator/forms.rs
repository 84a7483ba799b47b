//! Parenthesized group scanning
//!
//! MathCad expressions carry no explicit tree: nesting lives in balanced
//! parenthesis groups inside the string. These helpers locate groups by
//! their head token and split group bodies into arguments.

/// A parenthesized form located in a source string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Form<'a> {
    /// Byte offset of the opening parenthesis
    pub start: usize,
    /// Byte offset just past the closing parenthesis
    pub end: usize,
    /// Head token (`@PRODUCT`, `^`, `*`, ...)
    pub head: &'a str,
    /// Everything between the head and the closing parenthesis, trimmed
    pub body: &'a str,
}

impl<'a> Form<'a> {
    /// Top-level arguments of the form
    pub fn args(&self) -> Vec<&'a str> {
        split_top_level(self.body)
    }

    /// Raw body text following the first `n` arguments
    pub fn rest_after(&self, n: usize) -> Option<&'a str> {
        rest_after(self.body, n)
    }
}

/// Find the byte offset of the parenthesis closing the one at `open`
pub fn matching_paren(text: &str, open: usize) -> Option<usize> {
    if !text[open..].starts_with('(') {
        return None;
    }

    let mut depth = 0usize;
    for (offset, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Locate every balanced `(<head> ...)` group in source order.
///
/// The head must be followed by whitespace, so `(@SUMX ...)` is not a
/// `@SUM` form. Groups that never close are skipped.
pub fn find_forms<'a>(text: &'a str, head: &str) -> Forms<'a> {
    Forms {
        text,
        pattern: format!("({}", head),
        pos: 0,
    }
}

/// Lazy iterator returned by [`find_forms`]
#[derive(Debug, Clone)]
pub struct Forms<'a> {
    text: &'a str,
    pattern: String,
    pos: usize,
}

impl<'a> Iterator for Forms<'a> {
    type Item = Form<'a>;

    fn next(&mut self) -> Option<Form<'a>> {
        let text = self.text;
        while let Some(found) = text[self.pos..].find(self.pattern.as_str()) {
            let start = self.pos + found;
            let after_head = start + self.pattern.len();
            self.pos = start + 1;

            let followed_by_space = text[after_head..]
                .chars()
                .next()
                .is_some_and(char::is_whitespace);
            if !followed_by_space {
                continue;
            }

            if let Some(close) = matching_paren(text, start) {
                return Some(Form {
                    start,
                    end: close + 1,
                    head: &text[start + 1..after_head],
                    body: text[after_head..close].trim(),
                });
            }
        }
        self.pos = text.len();
        None
    }
}

/// Parse `text` as exactly one group, e.g. `(@IS n 1)` or `(^ x 2)`.
///
/// Surrounding whitespace is allowed; any other surrounding text is not.
pub fn outermost_form(text: &str) -> Option<Form<'_>> {
    let leading = text.len() - text.trim_start().len();
    let trimmed = text.trim();
    if !trimmed.starts_with('(') {
        return None;
    }

    let close = matching_paren(trimmed, 0)?;
    if close + 1 != trimmed.len() {
        return None;
    }

    let inner = &trimmed[1..close];
    let head_len = inner
        .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .unwrap_or(inner.len());
    if head_len == 0 {
        return None;
    }

    Some(Form {
        start: leading,
        end: leading + trimmed.len(),
        head: &inner[..head_len],
        body: inner[head_len..].trim(),
    })
}

/// Content of a group argument without its outer parentheses.
///
/// `"(x)"` gives `"x"`; a bare token or an unbalanced group gives `None`.
pub fn group_inner(arg: &str) -> Option<&str> {
    let trimmed = arg.trim();
    let close = matching_paren(trimmed, 0)?;
    if close + 1 == trimmed.len() {
        Some(trimmed[1..close].trim())
    } else {
        None
    }
}

/// A bare token: no parentheses and no whitespace
#[inline]
pub fn is_bare(arg: &str) -> bool {
    !arg.is_empty() && !arg.contains(|c: char| c == '(' || c == ')' || c.is_whitespace())
}

/// First whitespace-delimited token of `text`
#[inline]
pub fn first_token(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}

/// Split `content` into top-level arguments.
///
/// Whitespace separates arguments only outside nested groups, and an
/// opening parenthesis glued to a preceding token starts a new argument.
pub fn split_top_level(content: &str) -> Vec<&str> {
    arg_spans(content)
        .into_iter()
        .map(|(start, end)| &content[start..end])
        .collect()
}

/// Raw text following the first `n` top-level arguments, trimmed.
///
/// Returns `None` when there are not more than `n` arguments.
pub fn rest_after(content: &str, n: usize) -> Option<&str> {
    let spans = arg_spans(content);
    let &(start, _) = spans.get(n)?;
    Some(content[start..].trim())
}

fn arg_spans(content: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut current: Option<usize> = None;

    for (offset, c) in content.char_indices() {
        match c {
            '(' => {
                if depth == 0 {
                    if let Some(start) = current.take() {
                        spans.push((start, offset));
                    }
                    current = Some(offset);
                }
                depth += 1;
            }
            ')' => {
                depth = depth.saturating_sub(1);
                if current.is_none() {
                    current = Some(offset);
                }
            }
            c if c.is_whitespace() && depth == 0 => {
                if let Some(start) = current.take() {
                    spans.push((start, offset));
                }
            }
            _ => {
                if current.is_none() {
                    current = Some(offset);
                }
            }
        }
    }

    if let Some(start) = current {
        spans.push((start, content.len()));
    }
    spans
}
