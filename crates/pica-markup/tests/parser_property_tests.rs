//! Property tests for parser robustness on arbitrary input.
//!
//! The parser's contract is total: any line, however malformed, yields runs
//! covering all of its non-tag text, with the stack never popping below the
//! sentinel. These properties are exercised with random strings, including
//! ones full of brackets, slashes, and partial tags.

use quickcheck_macros::quickcheck;

use pica_markup::{TagGrammar, parse_line, parse_text};
use pica_style::{Style, StyleSheet};

fn test_sheet() -> StyleSheet {
    let mut sheet = StyleSheet::new();
    sheet.set_tag_style(
        "b",
        Style {
            font_weight: Some("bold".to_string()),
            ..Style::default()
        },
        false,
    );
    sheet.set_tag_style(
        "i",
        Style {
            font_style: Some("italic".to_string()),
            ..Style::default()
        },
        false,
    );
    sheet
}

#[quickcheck]
fn prop_parse_line_never_panics(input: String) -> bool {
    let line: String = input.chars().filter(|c| *c != '\n').collect();
    let sheet = test_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    let _ = parse_line(&line, &grammar, &sheet);
    true
}

#[quickcheck]
fn prop_parse_text_never_panics(input: String) -> bool {
    let sheet = test_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    let _ = parse_text(&input, &grammar, &sheet);
    true
}

#[quickcheck]
fn prop_tagless_input_round_trips(input: String) -> bool {
    // Strip newlines and bracket characters so no tag can match and the
    // last-line truncation cannot engage.
    let line: String = input
        .chars()
        .filter(|c| *c != '\n' && *c != '<' && *c != '[')
        .collect();
    let sheet = test_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    let runs = parse_line(&line, &grammar, &sheet);
    let rebuilt: String = runs.iter().map(|r| r.text.as_str()).collect();
    rebuilt == line
}

#[quickcheck]
fn prop_resolved_styles_are_complete(input: String) -> bool {
    // Every emitted run carries a fully resolved style: the cascade root is
    // complete, so no property may come out unset.
    let line: String = input.chars().filter(|c| *c != '\n').collect();
    let sheet = test_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    parse_line(&line, &grammar, &sheet).iter().all(|run| {
        run.style.fill.is_some()
            && run.style.font_size.is_some()
            && run.style.valign.is_some()
            && run.style.letter_spacing.is_some()
    })
}

#[quickcheck]
fn prop_closing_tag_floods_never_underflow(count: u8) -> bool {
    // A pathological stream of closing tags must leave default-styled text,
    // not a crash or a stack underflow.
    let line = format!("{}text", "</b>".repeat(usize::from(count)));
    let sheet = test_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    let runs = parse_line(&line, &grammar, &sheet);
    runs.len() == 1 && runs[0].tag.name == "default"
}
