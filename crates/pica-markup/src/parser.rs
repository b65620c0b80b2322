//! The tag-stack parser producing style-resolved text runs.
//!
//! One call consumes one line of marked-up text (no newlines) and emits an
//! ordered sequence of [`TextRun`]s covering the entire line with no gaps
//! and no overlaps. Styles cascade through parallel style/tag stacks whose
//! index 0 is a fixed sentinel: the sheet's complete default style under the
//! root tag. A closing tag that would pop the sentinel is ignored, so
//! unbalanced markup can never crash the parser.

use pica_style::{Dialect, Style, StyleSheet};

use crate::grammar::{AttributesMap, TagGrammar, TagTokenKind};

/// The originating tag of a text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// The tag name, or `"default"` for text outside any tag.
    pub name: String,
    /// Attributes parsed from the opening tag.
    pub attributes: AttributesMap,
}

impl Tag {
    /// The sentinel tag owning text outside any markup.
    #[must_use]
    pub fn root() -> Self {
        Self {
            name: "default".to_string(),
            attributes: AttributesMap::new(),
        }
    }
}

/// A maximal substring with one resolved style and one owning tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// The literal text of the run.
    pub text: String,
    /// The fully resolved style (complete — rooted at the sheet default).
    pub style: Style,
    /// The innermost enclosing tag.
    pub tag: Tag,
}

/// Parse one line of marked-up text into style-resolved runs.
///
/// Gaps before each tag match are emitted with the current top-of-stack
/// style; opening tags push the merged child style, closing tags pop unless
/// only the sentinel remains. A line with no matches yields exactly one run
/// (even when empty), and a line consisting solely of tags yields none.
#[must_use]
pub fn parse_line(line: &str, grammar: &TagGrammar, sheet: &StyleSheet) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut style_stack: Vec<Style> = vec![sheet.default_style().clone()];
    let mut tag_stack: Vec<Tag> = vec![Tag::root()];

    let matches = grammar.scan(line);
    if matches.is_empty() {
        runs.push(make_run(line, &style_stack, &tag_stack));
        return runs;
    }

    let mut cursor = 0;
    for token in matches {
        if token.start > cursor {
            runs.push(make_run(&line[cursor..token.start], &style_stack, &tag_stack));
        }

        match token.kind {
            TagTokenKind::Close { .. } => {
                // Never pop the sentinel: unbalanced closing tags are a
                // silent no-op.
                if style_stack.len() > 1 {
                    let _ = style_stack.pop();
                    let _ = tag_stack.pop();
                }
            }
            TagTokenKind::Open {
                name,
                attributes,
                value,
            } => {
                let tag_style = sheet.tag_style(&name).cloned().unwrap_or_default();
                let overlay = match value {
                    Some(ref v) if grammar.dialect() == Dialect::Bbcode => {
                        tag_style.with_bbcode_value(v)
                    }
                    _ => tag_style,
                };
                let top = style_stack
                    .last()
                    .expect("style stack holds at least the sentinel");
                style_stack.push(top.merged_with(&overlay));
                tag_stack.push(Tag { name, attributes });
            }
        }

        cursor = token.end;
    }

    if cursor < line.len() {
        runs.push(make_run(&line[cursor..], &style_stack, &tag_stack));
    }

    runs
}

/// Parse a whole (newline-separated) marked-up text into per-line runs.
///
/// After parsing, the final line is checked for a dangling opening bracket —
/// a tag cut off mid-stream — and each affected run is truncated at the last
/// bracket so a partial tag is never rendered. Only the final line gets this
/// treatment; it is an accommodation for progressively revealed text, not a
/// general validation rule.
#[must_use]
pub fn parse_text(text: &str, grammar: &TagGrammar, sheet: &StyleSheet) -> Vec<Vec<TextRun>> {
    let mut lines: Vec<Vec<TextRun>> = text
        .split('\n')
        .map(|line| parse_line(line, grammar, sheet))
        .collect();

    let open = grammar.dialect().open_bracket();
    if let Some(last) = lines.last_mut() {
        for run in last {
            if let Some(idx) = run.text.rfind(open) {
                run.text.truncate(idx);
            }
        }
    }

    lines
}

/// Build a run from the current stack tops.
fn make_run(text: &str, style_stack: &[Style], tag_stack: &[Tag]) -> TextRun {
    TextRun {
        text: text.to_string(),
        style: style_stack
            .last()
            .expect("style stack holds at least the sentinel")
            .clone(),
        tag: tag_stack
            .last()
            .expect("tag stack holds at least the sentinel")
            .clone(),
    }
}
