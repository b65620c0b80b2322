//! The greedy word-wrap engine.
//!
//! Re-flows a full marked-up string to a maximum line width by inserting
//! newlines, re-emitting valid markup. Greedy and single-pass: each line is
//! filled as much as possible before breaking, never looking ahead. Tag
//! tokens pass through unmodified and drive a style cascade identical to the
//! parser's, so the width oracle always measures with the active style.

use pica_markup::{Segment, TagGrammar};
use pica_style::{Style, StyleSheet};

use crate::measure::TextMeasurer;

/// Wrapping parameters, read from the resolved default style by the caller.
#[derive(Debug, Clone, Copy)]
pub struct WrapOptions {
    /// Maximum measured line width.
    pub max_width: f32,
    /// Letter spacing applied during measurement.
    pub letter_spacing: f32,
    /// Split over-wide words character by character instead of pushing them
    /// to their own line.
    pub break_words: bool,
}

impl WrapOptions {
    /// Read the wrapping parameters from a resolved style.
    #[must_use]
    pub fn from_style(style: &Style) -> Self {
        Self {
            max_width: style.word_wrap_width.unwrap_or(100.0),
            letter_spacing: style.letter_spacing.unwrap_or(0.0),
            break_words: style.break_words.unwrap_or(false),
        }
    }
}

/// Wrap `text` so that no line's measured width exceeds
/// `options.max_width`, except where a single atomic unit (a word, or in
/// break mode a character) is itself wider — it is then placed alone on its
/// line.
///
/// The output is marked-up text with additional newlines; whitespace
/// adjacent to an inserted break collapses into the break, so wrapping never
/// leaves stray spaces at line edges.
#[must_use]
pub fn wrap_text(
    text: &str,
    grammar: &TagGrammar,
    sheet: &StyleSheet,
    measurer: &dyn TextMeasurer,
    options: &WrapOptions,
) -> String {
    let mut result = String::new();
    let mut style_stack: Vec<Style> = vec![sheet.default_style().clone()];

    let lines: Vec<&str> = text.split('\n').collect();
    for (i, line) in lines.iter().enumerate() {
        let mut space_left = options.max_width;
        let mut first_word_of_line = true;

        for segment in grammar.split_keeping_tags(line) {
            match segment {
                Segment::Tag(token) => {
                    // Tags are atomic: they take no width and pass through
                    // unmodified, but they change the measuring style.
                    result.push_str(&token.raw);
                    if token.is_closing() {
                        if style_stack.len() > 1 {
                            let _ = style_stack.pop();
                        }
                    } else {
                        let tag_style =
                            sheet.tag_style(token.name()).cloned().unwrap_or_default();
                        let top = style_stack
                            .last()
                            .expect("style stack holds at least the sentinel");
                        style_stack.push(top.merged_with(&tag_style));
                    }
                }
                Segment::Text(segment_text) => {
                    let style = style_stack
                        .last()
                        .expect("style stack holds at least the sentinel")
                        .clone();
                    for word in tokenize(&segment_text) {
                        place_word(
                            word,
                            &style,
                            measurer,
                            options,
                            &mut result,
                            &mut space_left,
                            first_word_of_line,
                        );
                        first_word_of_line = false;
                    }
                }
            }
        }

        if i + 1 < lines.len() {
            result.push('\n');
        }
    }

    collapse_wrap_whitespace(&result)
}

/// Place one word (or whitespace token) into the output, breaking the line
/// as needed.
fn place_word(
    word: &str,
    style: &Style,
    measurer: &dyn TextMeasurer,
    options: &WrapOptions,
    result: &mut String,
    space_left: &mut f32,
    first_word_of_line: bool,
) {
    let spacing = options.letter_spacing;
    let word_width = if spacing > 0.0 {
        word.chars()
            .map(|c| measurer.measure_width(c.encode_utf8(&mut [0; 4]), style) + spacing)
            .sum()
    } else {
        measurer.measure_width(word, style)
    };

    if options.break_words && word_width > *space_left {
        // The word cannot fit as a unit: split it in the middle, breaking
        // just before the character that would overflow.
        for c in word.chars() {
            let char_width = measurer.measure_width(c.encode_utf8(&mut [0; 4]), style) + spacing;
            if char_width > *space_left {
                result.push('\n');
                result.push(c);
                *space_left = options.max_width - char_width;
            } else {
                result.push(c);
                *space_left -= char_width;
            }
        }
    } else if options.break_words {
        result.push_str(word);
        *space_left -= word_width;
    } else {
        let padded_width = word_width + spacing;
        if padded_width > *space_left {
            // Skip the newline if this is the first word of its line —
            // an over-wide leading word would otherwise produce an empty
            // line above itself.
            if !first_word_of_line {
                result.push('\n');
            }
            result.push_str(word);
            *space_left = options.max_width - word_width;
        } else {
            *space_left -= padded_width;
            result.push_str(word);
        }
    }
}

/// Split a text fragment into words and whitespace, preserving both.
///
/// Words are maximal runs of non-whitespace; each whitespace character is
/// its own token, so inter-word spacing is charged against the line budget
/// one character at a time.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(start) = word_start.take() {
                tokens.push(&text[start..i]);
            }
            tokens.push(&text[i..i + c.len_utf8()]);
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(start) = word_start {
        tokens.push(&text[start..]);
    }

    tokens
}

/// Collapse whitespace-newline-whitespace artifact sequences into a single
/// newline, left to right, non-overlapping: `ws \n ws`, then `ws \n`, then
/// `\n ws`. Wrap-inserted breaks therefore never keep stray spaces adjacent
/// to them.
fn collapse_wrap_whitespace(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        let after = chars.get(i + 2).copied();

        if c.is_whitespace()
            && next == Some('\n')
            && after.is_some_and(char::is_whitespace)
        {
            out.push('\n');
            i += 3;
        } else if c.is_whitespace() && next == Some('\n') {
            out.push('\n');
            i += 2;
        } else if c == '\n' && next.is_some_and(char::is_whitespace) {
            out.push('\n');
            i += 2;
        } else {
            out.push(c);
            i += 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_words_and_spaces() {
        assert_eq!(tokenize("aa bb"), vec!["aa", " ", "bb"]);
        assert_eq!(tokenize(" x  "), vec![" ", "x", " ", " "]);
        assert_eq!(tokenize(""), Vec::<&str>::new());
    }

    #[test]
    fn test_collapse_space_newline_space() {
        assert_eq!(collapse_wrap_whitespace("aa \n bb"), "aa\nbb");
        assert_eq!(collapse_wrap_whitespace("aa \nbb"), "aa\nbb");
        assert_eq!(collapse_wrap_whitespace("aa\n bb"), "aa\nbb");
        assert_eq!(collapse_wrap_whitespace("aa\nbb"), "aa\nbb");
    }

    #[test]
    fn test_collapse_is_single_pass_left_to_right() {
        // Two artifact sequences in one string both collapse.
        assert_eq!(collapse_wrap_whitespace("a \nb \nc"), "a\nb\nc");
    }
}
