//! Tag grammar recognizer and tag-stack parser for the pica text renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tag grammar** — a hand-rolled recognizer for one tag dialect over the
//!   current tag-name set. Names outside the set never match, so unknown
//!   tags degrade to literal text instead of erroring.
//! - **Tag-stack parser** — consumes one line of marked-up text and resolves
//!   a style and originating tag for every literal run, by maintaining
//!   parallel style/tag stacks rooted at a sentinel that malformed markup
//!   can never pop.
//!
//! The recognizer is an explicit scanner rather than a compiled pattern: it
//! is rebuilt (cheaply) from the style sheet whenever the tag-name set
//! changes, and exposes in-order matching with byte offsets plus a
//! whole-token classifier used by the word-wrap engine.

/// The tag recognizer: scanning, token classification, and splitting.
pub mod grammar;
/// The tag-stack parser producing style-resolved text runs.
pub mod parser;

pub use grammar::{AttributesMap, Segment, TagGrammar, TagToken, TagTokenKind};
pub use parser::{Tag, TextRun, parse_line, parse_text};
