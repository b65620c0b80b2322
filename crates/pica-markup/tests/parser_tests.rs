//! Integration tests for the tag-stack parser.

use pica_markup::{TagGrammar, parse_line, parse_text};
use pica_style::{Dialect, FontSize, Style, StyleSheet};

/// Helper: XML sheet with a bold `b` tag and a red `em` tag.
fn xml_sheet() -> StyleSheet {
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
        "em",
        Style {
            fill: Some("#ff0000".to_string()),
            ..Style::default()
        },
        false,
    );
    sheet
}

/// Helper: BBCode sheet (presets registered automatically).
fn bbcode_sheet() -> StyleSheet {
    let mut sheet = StyleSheet::new();
    sheet.set_tag_style(
        "default",
        Style {
            dialect: Some(Dialect::Bbcode),
            ..Style::default()
        },
        false,
    );
    // Rebuild through from_map so presets register, as hosts do.
    StyleSheet::from_map(sheet.clone().into())
}

#[test]
fn test_plain_text_single_default_run() {
    let sheet = xml_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    let runs = parse_line("no markup here", &grammar, &sheet);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "no markup here");
    assert_eq!(runs[0].tag.name, "default");
    assert_eq!(runs[0].style, *sheet.default_style());
}

#[test]
fn test_bold_run_between_default_runs() {
    let sheet = xml_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    let runs = parse_line("a<b>bold</b>c", &grammar, &sheet);

    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0].text, "a");
    assert_eq!(runs[0].style.font_weight.as_deref(), Some("normal"));

    assert_eq!(runs[1].text, "bold");
    assert_eq!(runs[1].tag.name, "b");
    assert_eq!(runs[1].style.font_weight.as_deref(), Some("bold"));
    // Everything else inherits from the default.
    assert_eq!(runs[1].style.font_family.as_deref(), Some("Arial"));

    assert_eq!(runs[2].text, "c");
    assert_eq!(runs[2].style.font_weight.as_deref(), Some("normal"));
}

#[test]
fn test_nested_styles_innermost_wins() {
    let mut sheet = xml_sheet();
    sheet.set_tag_style(
        "big",
        Style {
            font_size: Some(FontSize::Px(40.0)),
            fill: Some("#00ff00".to_string()),
            ..Style::default()
        },
        false,
    );
    let grammar = TagGrammar::from_sheet(&sheet);
    let runs = parse_line("<big><em>x</em></big>", &grammar, &sheet);

    assert_eq!(runs.len(), 1);
    // em's fill (innermost) wins over big's fill; big's size is inherited.
    assert_eq!(runs[0].style.fill.as_deref(), Some("#ff0000"));
    assert_eq!(runs[0].style.font_size, Some(FontSize::Px(40.0)));
    assert_eq!(runs[0].tag.name, "em");
}

#[test]
fn test_unbalanced_closing_tags_are_ignored() {
    let sheet = xml_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    let runs = parse_line("</b></b>text</b>", &grammar, &sheet);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "text");
    assert_eq!(runs[0].style, *sheet.default_style());
}

#[test]
fn test_unknown_tag_degrades_to_literal_text() {
    let sheet = xml_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    let runs = parse_line("a<u>plain</u>b", &grammar, &sheet);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "a<u>plain</u>b");
}

#[test]
fn test_bbcode_color_value() {
    let sheet = bbcode_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    let runs = parse_line("[color=#ff0000]red[/color]", &grammar, &sheet);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "red");
    assert_eq!(runs[0].style.fill.as_deref(), Some("#ff0000"));
    assert_eq!(runs[0].tag.name, "color");
}

#[test]
fn test_bbcode_size_value() {
    let sheet = bbcode_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    let runs = parse_line("[size=30]big[/size]", &grammar, &sheet);
    assert_eq!(runs.len(), 1);
    assert!((runs[0].style.font_size_px() - 30.0).abs() < 0.01);
}

#[test]
fn test_bbcode_without_value_uses_sheet_style() {
    let sheet = bbcode_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    let runs = parse_line("[outline]x[/outline]", &grammar, &sheet);
    assert_eq!(runs.len(), 1);
    assert!((runs[0].style.stroke_thickness.unwrap() - 6.0).abs() < 0.01);
    // The preset's empty stroke string is merged as-is.
    assert_eq!(runs[0].style.stroke.as_deref(), Some(""));
}

#[test]
fn test_dangling_tag_truncated_on_last_line() {
    let sheet = xml_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    let lines = parse_text("hello <b", &grammar, &sheet);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].len(), 1);
    assert_eq!(lines[0][0].text, "hello ");
}

#[test]
fn test_dangling_tag_not_truncated_mid_document() {
    let sheet = xml_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    let lines = parse_text("hello <b\nworld", &grammar, &sheet);
    // The first line keeps its literal "<b"; only the last line is guarded.
    assert_eq!(lines[0][0].text, "hello <b");
    assert_eq!(lines[1][0].text, "world");
}

#[test]
fn test_truncation_cuts_at_last_bracket() {
    let sheet = xml_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    let lines = parse_text("a<b>x</b> 1 < 2 <e", &grammar, &sheet);
    let last_run = lines[0].last().unwrap();
    // Text after the close tag is " 1 < 2 <e"; truncation cuts at the last
    // bracket, leaving the literal comparison intact.
    assert_eq!(last_run.text, " 1 < 2 ");
}

#[test]
fn test_runs_cover_line_without_gaps() {
    let sheet = xml_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    let line = "a<b>bb</b>c<em>d</em>e";
    let runs = parse_line(line, &grammar, &sheet);
    let rebuilt: String = runs.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(rebuilt, "abbcde");
}

#[test]
fn test_multiline_stacks_reset_per_line() {
    // Stacks are scratch state per parse call: a tag left open on one line
    // does not style the next line.
    let sheet = xml_sheet();
    let grammar = TagGrammar::from_sheet(&sheet);
    let lines = parse_text("<b>bold\nplain", &grammar, &sheet);
    assert_eq!(lines[0][0].style.font_weight.as_deref(), Some("bold"));
    assert_eq!(lines[1][0].style.font_weight.as_deref(), Some("normal"));
}
