//! The tag recognizer: scanning, token classification, and splitting.
//!
//! A [`TagGrammar`] recognizes, at any position in a line, either an opening
//! tag (bracket, one *known* tag name, attributes, closing bracket) or a
//! closing tag (bracket, slash, known name, closing bracket). Tag names not
//! in the current set are not matched and therefore flow through as literal
//! text.

use std::collections::{HashMap, HashSet};

use pica_style::{Dialect, StyleSheet};

/// Map of attribute names to values for an opening tag.
pub type AttributesMap = HashMap<String, String>;

/// One recognized tag occurrence in a line.
#[derive(Debug, Clone, PartialEq)]
pub struct TagToken {
    /// Byte offset of the opening bracket in the scanned line.
    pub start: usize,
    /// Byte offset one past the closing bracket.
    pub end: usize,
    /// The matched source text, brackets included.
    pub raw: String,
    /// Whether this opens or closes a tag, plus the parsed payload.
    pub kind: TagTokenKind,
}

/// The payload of a [`TagToken`].
#[derive(Debug, Clone, PartialEq)]
pub enum TagTokenKind {
    /// An opening tag.
    Open {
        /// The tag name (always in the recognized set).
        name: String,
        /// XML attributes (`name="value"` pairs). Empty for BBCode.
        attributes: AttributesMap,
        /// The BBCode `=value` shorthand, when present.
        value: Option<String>,
    },
    /// A closing tag.
    Close {
        /// The tag name (always in the recognized set).
        name: String,
    },
}

impl TagToken {
    /// The tag name this token opens or closes.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.kind {
            TagTokenKind::Open { name, .. } | TagTokenKind::Close { name } => name,
        }
    }

    /// Whether this token closes a tag.
    #[must_use]
    pub fn is_closing(&self) -> bool {
        matches!(self.kind, TagTokenKind::Close { .. })
    }
}

/// A piece of a line split on tag boundaries: either literal text or one tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text between tags (never empty).
    Text(String),
    /// One recognized tag.
    Tag(TagToken),
}

/// A recognizer for one tag dialect over a fixed tag-name set.
///
/// Built fresh from the style sheet whenever the name set changes; holds no
/// other state and all scanning methods take `&self`.
#[derive(Debug, Clone)]
pub struct TagGrammar {
    dialect: Dialect,
    names: HashSet<String>,
}

impl TagGrammar {
    /// Build a recognizer for `dialect` over the given tag names.
    pub fn new<I, S>(dialect: Dialect, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dialect,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a recognizer from a style sheet: its dialect and its current
    /// tag-name set.
    #[must_use]
    pub fn from_sheet(sheet: &StyleSheet) -> Self {
        Self::new(sheet.dialect(), sheet.tag_names().map(str::to_string))
    }

    /// The dialect this recognizer was built for.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Find every tag occurrence in `line`, left to right, with byte offsets.
    ///
    /// Positions where a bracket does not begin a well-formed tag with a
    /// known name are skipped, leaving that text literal.
    #[must_use]
    pub fn scan(&self, line: &str) -> Vec<TagToken> {
        let open = self.dialect.open_bracket();
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < line.len() {
            let Some(rel) = line[pos..].find(open) else {
                break;
            };
            let at = pos + rel;
            match self.try_match_at(line, at) {
                Some(token) => {
                    pos = token.end;
                    tokens.push(token);
                }
                None => pos = at + open.len_utf8(),
            }
        }

        tokens
    }

    /// Whether `token` is, in its entirety, exactly one tag.
    ///
    /// This is the classifier the word-wrap engine uses to decide whether a
    /// split fragment passes through unmodified.
    #[must_use]
    pub fn is_tag(&self, token: &str) -> bool {
        self.try_match_at(token, 0)
            .is_some_and(|m| m.end == token.len())
    }

    /// Split `line` into alternating literal-text and tag segments, in
    /// order. Empty text gaps (between adjacent tags) are omitted.
    #[must_use]
    pub fn split_keeping_tags(&self, line: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for token in self.scan(line) {
            if token.start > cursor {
                segments.push(Segment::Text(line[cursor..token.start].to_string()));
            }
            cursor = token.end;
            segments.push(Segment::Tag(token));
        }
        if cursor < line.len() {
            segments.push(Segment::Text(line[cursor..].to_string()));
        }

        segments
    }

    /// Try to match one complete tag starting at byte offset `start`.
    fn try_match_at(&self, line: &str, start: usize) -> Option<TagToken> {
        let mut cur = Cursor::new(&line[start..]);

        if !cur.eat(self.dialect.open_bracket()) {
            return None;
        }
        let closing = cur.eat('/');

        let name = cur.eat_while(is_name_char);
        if name.is_empty() || !self.names.contains(name) {
            return None;
        }
        let name = name.to_string();

        let kind = if closing {
            let _ = cur.skip_whitespace();
            if !cur.eat(self.dialect.close_bracket()) {
                return None;
            }
            TagTokenKind::Close { name }
        } else {
            let (attributes, value) = match self.dialect {
                Dialect::Xml => (self.parse_xml_attributes(&mut cur)?, None),
                Dialect::Bbcode => (AttributesMap::new(), self.parse_bbcode_value(&mut cur)?),
            };
            let _ = cur.skip_whitespace();
            if !cur.eat(self.dialect.close_bracket()) {
                return None;
            }
            TagTokenKind::Open {
                name,
                attributes,
                value,
            }
        };

        let end = start + cur.pos;
        Some(TagToken {
            start,
            end,
            raw: line[start..end].to_string(),
            kind,
        })
    }

    /// Parse zero or more XML attributes: whitespace, name, `=`, then a
    /// value quoted with `"` or `'` (quotes may be backslash-escaped inside).
    fn parse_xml_attributes(&self, cur: &mut Cursor<'_>) -> Option<AttributesMap> {
        let mut attributes = AttributesMap::new();

        loop {
            let checkpoint = cur.pos;
            let ws = cur.skip_whitespace();
            // An attribute requires at least one space after the name or the
            // previous value.
            if ws == 0 || !cur.peek().is_some_and(is_name_char) {
                cur.pos = checkpoint;
                break;
            }
            let attr_name = cur.eat_while(is_name_char).to_string();
            if !cur.eat('=') {
                return None;
            }
            let quote = cur.peek()?;
            if quote != '"' && quote != '\'' {
                return None;
            }
            let value = parse_quoted(cur)?;
            let _ = attributes.insert(attr_name, value);
        }

        Some(attributes)
    }

    /// Parse the BBCode `=value` shorthand: a bare `[A-Za-z0-9_#-]+` word or
    /// a single-quoted string. Repeated `=value` groups are accepted; the
    /// first one wins.
    fn parse_bbcode_value(&self, cur: &mut Cursor<'_>) -> Option<Option<String>> {
        let mut value = None;

        while cur.eat('=') {
            let parsed = if cur.peek() == Some('\'') {
                parse_quoted(cur)?
            } else {
                let word = cur.eat_while(is_bbcode_value_char);
                if word.is_empty() {
                    return None;
                }
                word.to_string()
            };
            if value.is_none() {
                value = Some(parsed);
            }
        }

        Some(value)
    }
}

/// Characters allowed in tag and attribute names.
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Characters allowed in a bare BBCode value.
fn is_bbcode_value_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '#'
}

/// Parse a quoted string at the cursor. The opening quote character decides
/// the closing one; a backslash escapes the quote character inside.
fn parse_quoted(cur: &mut Cursor<'_>) -> Option<String> {
    let quote = cur.bump()?;
    let mut value = String::new();

    loop {
        let c = cur.bump()?;
        if c == '\\' && cur.peek() == Some(quote) {
            let _ = cur.bump();
            value.push(quote);
        } else if c == quote {
            return Some(value);
        } else {
            value.push(c);
        }
    }
}

/// A byte-offset cursor over a string slice.
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume characters while `pred` holds; returns the consumed slice.
    fn eat_while(&mut self, pred: fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(pred) {
            let _ = self.bump();
        }
        &self.input[start..self.pos]
    }

    /// Consume whitespace; returns how many characters were consumed.
    fn skip_whitespace(&mut self) -> usize {
        let mut count = 0;
        while self.peek().is_some_and(char::is_whitespace) {
            let _ = self.bump();
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xml(names: &[&str]) -> TagGrammar {
        TagGrammar::new(Dialect::Xml, names.iter().copied())
    }

    fn bbcode(names: &[&str]) -> TagGrammar {
        TagGrammar::new(Dialect::Bbcode, names.iter().copied())
    }

    #[test]
    fn test_scan_simple_pair() {
        let tokens = xml(&["b"]).scan("a<b>bold</b>c");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].start, 1);
        assert_eq!(tokens[0].end, 4);
        assert_eq!(tokens[0].name(), "b");
        assert!(!tokens[0].is_closing());
        assert!(tokens[1].is_closing());
        assert_eq!(tokens[1].raw, "</b>");
    }

    #[test]
    fn test_unknown_name_is_literal() {
        assert!(xml(&["b"]).scan("a<i>text</i>").is_empty());
    }

    #[test]
    fn test_longer_name_in_set_matches() {
        let grammar = xml(&["b", "bold"]);
        let tokens = grammar.scan("<bold>x</bold>");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].name(), "bold");
        // A name that merely starts with a known name does not match.
        assert!(grammar.scan("<boldx>").is_empty());
    }

    #[test]
    fn test_xml_attributes() {
        let tokens = xml(&["link"]).scan(r#"<link href="a.html" id='x'>go</link>"#);
        let TagTokenKind::Open { attributes, .. } = &tokens[0].kind else {
            panic!("expected opening tag");
        };
        assert_eq!(attributes.get("href").map(String::as_str), Some("a.html"));
        assert_eq!(attributes.get("id").map(String::as_str), Some("x"));
    }

    #[test]
    fn test_xml_attribute_escaped_quote() {
        let tokens = xml(&["q"]).scan(r#"<q title="say \"hi\"">x</q>"#);
        let TagTokenKind::Open { attributes, .. } = &tokens[0].kind else {
            panic!("expected opening tag");
        };
        assert_eq!(
            attributes.get("title").map(String::as_str),
            Some(r#"say "hi""#)
        );
    }

    #[test]
    fn test_attribute_requires_whitespace() {
        // No space between name and attribute: not a tag.
        assert!(xml(&["b"]).scan(r#"<bhref="x">"#).is_empty());
    }

    #[test]
    fn test_bbcode_value() {
        let tokens = bbcode(&["color"]).scan("[color=#ff0000]red[/color]");
        assert_eq!(tokens.len(), 2);
        let TagTokenKind::Open { value, .. } = &tokens[0].kind else {
            panic!("expected opening tag");
        };
        assert_eq!(value.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_bbcode_quoted_value() {
        let tokens = bbcode(&["font"]).scan("[font='Comic Sans']x[/font]");
        let TagTokenKind::Open { value, .. } = &tokens[0].kind else {
            panic!("expected opening tag");
        };
        assert_eq!(value.as_deref(), Some("Comic Sans"));
    }

    #[test]
    fn test_is_tag_classifier() {
        let grammar = xml(&["b"]);
        assert!(grammar.is_tag("<b>"));
        assert!(grammar.is_tag("</b>"));
        assert!(!grammar.is_tag("<b>text"));
        assert!(!grammar.is_tag("text"));
        assert!(!grammar.is_tag("<i>"));
    }

    #[test]
    fn test_split_keeping_tags_alternates() {
        let segments = xml(&["b"]).split_keeping_tags("a<b>bold</b>c");
        assert_eq!(segments.len(), 5);
        assert_eq!(segments[0], Segment::Text("a".to_string()));
        assert!(matches!(segments[1], Segment::Tag(_)));
        assert_eq!(segments[2], Segment::Text("bold".to_string()));
        assert!(matches!(segments[3], Segment::Tag(_)));
        assert_eq!(segments[4], Segment::Text("c".to_string()));
    }

    #[test]
    fn test_unterminated_tag_is_literal() {
        assert!(xml(&["b"]).scan("hello <b").is_empty());
        assert!(bbcode(&["b"]).scan("hello [b").is_empty());
    }

    #[test]
    fn test_whitespace_before_close_bracket() {
        assert_eq!(xml(&["b"]).scan("<b >x</b >").len(), 2);
    }
}
