//! Conditional blocks in template text.
//!
//! Templates use `[if EXPR]`, `[else]` and `[endif]` to keep or drop the text
//! between them. Directives are removed from the output whatever their
//! outcome. A line that held nothing but directives disappears completely,
//! and runs of blank lines left behind by dropped blocks are collapsed.
//!
//! ```text
//! services:
//!   [if UseREST]
//!   rest: enabled
//!   [else]
//!   rest: disabled
//!   [endif]
//! ```

use log::{debug, trace};

use crate::expr;
use crate::flags::FlagSet;

/// Instruction recognised inside `[...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive<'a> {
    If(&'a str),
    Else,
    EndIf,
}

impl<'a> Directive<'a> {
    /// Recognises a directive at the start of `input`, which must begin with
    /// `[`. Returns the directive and the length of its bracketed span.
    ///
    /// The span ends at the first `]`, which may be on a later line. Without
    /// one the bracket is plain text.
    fn parse(input: &'a str) -> Option<(Directive<'a>, usize)> {
        let close = input.find(']')?;
        let inner = input[1..close].trim();

        let directive = if inner.eq_ignore_ascii_case("else") {
            Directive::Else
        } else if inner.eq_ignore_ascii_case("endif") {
            Directive::EndIf
        } else {
            let keyword = inner.get(..2)?;
            let condition = &inner[2..];
            if !keyword.eq_ignore_ascii_case("if") || !condition.starts_with(char::is_whitespace) {
                return None;
            }
            Directive::If(condition.trim())
        };

        Some((directive, close + 1))
    }
}

/// One open `[if]` block.
#[derive(Debug)]
struct Frame<'a> {
    condition: &'a str,
    is_true: bool,
    in_else: bool,
}

impl Frame<'_> {
    /// Whether the branch currently being read is the one that was taken.
    fn is_active(&self) -> bool {
        self.is_true != self.in_else
    }
}

fn is_horizontal_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

struct BlockProcessor<'a, 'f, F: ?Sized> {
    flags: &'f F,
    stack: Vec<Frame<'a>>,
    visible: bool,
    out: String,
    /// Drop horizontal whitespace that directly follows a directive.
    trim: bool,
    /// Byte offset in `out` where the current output line starts.
    line_start: usize,
    line_has_content: bool,
    line_has_directive: bool,
    /// 1-based source line, for log messages only.
    source_line: usize,
}

impl<'a, 'f, F: FlagSet + ?Sized> BlockProcessor<'a, 'f, F> {
    fn new(flags: &'f F, capacity: usize) -> Self {
        Self {
            flags,
            stack: Vec::new(),
            visible: true,
            out: String::with_capacity(capacity),
            trim: false,
            line_start: 0,
            line_has_content: false,
            line_has_directive: false,
            source_line: 1,
        }
    }

    fn run(mut self, content: &'a str) -> String {
        let mut rest = content;
        while let Some(c) = rest.chars().next() {
            if c == '[' {
                if let Some((directive, len)) = Directive::parse(rest) {
                    self.apply(directive);
                    self.source_line += rest[..len].matches('\n').count();
                    rest = &rest[len..];
                    continue;
                }
            }
            self.emit(c);
            rest = &rest[c.len_utf8()..];
        }
        self.finish()
    }

    fn apply(&mut self, directive: Directive<'a>) {
        match directive {
            Directive::If(condition) => {
                let is_true = expr::evaluate(condition, self.flags);
                trace!("[if {}] is {} on line {}", condition, is_true, self.source_line);
                self.stack.push(Frame { condition, is_true, in_else: false });
            }
            Directive::Else => match self.stack.last_mut() {
                Some(frame) => frame.in_else = true,
                None => debug!("Ignoring [else] without [if] on line {}", self.source_line),
            },
            Directive::EndIf => {
                if self.stack.pop().is_none() {
                    debug!("Ignoring [endif] without [if] on line {}", self.source_line);
                }
            }
        }
        self.visible = self.stack.iter().all(Frame::is_active);
        self.line_has_directive = true;
        self.trim = true;
    }

    fn emit(&mut self, c: char) {
        if c == '\n' {
            self.source_line += 1;
        }
        if !self.visible {
            return;
        }
        if self.trim && is_horizontal_space(c) {
            return;
        }
        self.trim = false;

        if c == '\n' {
            if self.line_has_content || !self.line_has_directive {
                self.out.push('\n');
            } else {
                self.out.truncate(self.line_start);
            }
            self.line_start = self.out.len();
            self.line_has_content = false;
            self.line_has_directive = false;
        } else {
            self.out.push(c);
            if !is_horizontal_space(c) {
                self.line_has_content = true;
            }
        }
    }

    fn finish(mut self) -> String {
        if self.line_has_directive && !self.line_has_content {
            self.out.truncate(self.line_start);
        }
        for frame in &self.stack {
            debug!("[if {}] is never closed", frame.condition);
        }
        collapse_blank_lines(&self.out)
    }
}

/// Renders the conditional blocks of `content` against `flags`.
///
/// Never fails. Unterminated directives are copied as literal text, and
/// `[else]`/`[endif]` without an open `[if]` are dropped.
pub fn render<F: FlagSet + ?Sized>(content: &str, flags: &F) -> String {
    BlockProcessor::new(flags, content.len()).run(content)
}

/// Conditions of all `[if ...]` directives in `content`, in source order.
pub fn conditions(content: &str) -> Vec<&str> {
    content
        .match_indices('[')
        .filter_map(|(start, _)| match Directive::parse(&content[start..]) {
            Some((Directive::If(condition), _)) => Some(condition),
            _ => None,
        })
        .collect()
}

/// Collapses every run of blank lines into a single blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_blank = false;
    for line in text.split_inclusive('\n') {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        out.push_str(line);
        previous_blank = blank;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_parse() {
        assert_eq!(Directive::parse("[if A]rest"), Some((Directive::If("A"), 6)));
        assert_eq!(Directive::parse("[IF  A AND B ]"), Some((Directive::If("A AND B"), 14)));
        assert_eq!(Directive::parse("[ Else ]"), Some((Directive::Else, 8)));
        assert_eq!(Directive::parse("[ENDIF]\n"), Some((Directive::EndIf, 7)));
        assert_eq!(Directive::parse("[if\tA]"), Some((Directive::If("A"), 6)));
        assert_eq!(Directive::parse("[if A\n]kept"), Some((Directive::If("A"), 7)));
        assert_eq!(Directive::parse("[\nendif\n]"), Some((Directive::EndIf, 9)));
    }

    #[test]
    fn test_not_directives() {
        assert_eq!(Directive::parse("[if]"), None);
        assert_eq!(Directive::parse("[ifA]"), None);
        assert_eq!(Directive::parse("[elsewhere]"), None);
        assert_eq!(Directive::parse("[endif x]"), None);
        assert_eq!(Directive::parse("[1, 2, 3]"), None);
        assert_eq!(Directive::parse("[if A"), None);
        assert_eq!(Directive::parse("[é]"), None);
    }

    #[test]
    fn test_conditions() {
        let content = "[if A]a[else]b[endif]\n[if (B OR C)]\n[ifbroken\n[endif]\n[if D";
        assert_eq!(conditions(content), vec!["A", "(B OR C)"]);

        let content = "[if first\nsecond] x [endif]";
        assert_eq!(conditions(content), vec!["first\nsecond"]);
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb\n"), "a\n\nb\n");
        assert_eq!(collapse_blank_lines("a\n \n\t\n\nb"), "a\n \nb");
        assert_eq!(collapse_blank_lines("a\n\n"), "a\n\n");
        assert_eq!(collapse_blank_lines(""), "");
    }
}
