//! Style records, style sheets, and the cascade for the pica text renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Style** — an open record of optional text-styling properties. `None`
//!   means "unset, inherit from the enclosing style"; styles never default a
//!   property independently of the cascade.
//! - **Cascade** — [`Style::merged_with`], a pure merge in which the overlay's
//!   explicitly-set properties win and everything else is inherited. The root
//!   of every cascade is the complete [`Style::base`] default, so a fully
//!   resolved style always has every property defined.
//! - **Style sheet** — the mapping from tag name to partial style, with the
//!   reserved `"default"` entry holding the cascade root.
//! - **Value types** — alignment, vertical alignment, tag dialect, font size
//!   (number or unit string), plus color parsing and font-size unit
//!   conversion.
//! - **BBCode presets** — the standard tag styles registered automatically
//!   when a sheet uses the BBCode dialect.

/// Color string parsing (hex and named colors).
pub mod color;
/// Style sheet: tag name → partial style, plus the `"default"` cascade root.
pub mod sheet;
/// The open style record and the cascade merge.
pub mod style;
/// Keyword and scalar value types used by style properties.
pub mod values;

pub use color::parse_color;
pub use sheet::StyleSheet;
pub use style::Style;
pub use values::{Align, Dialect, FontSize, VerticalAlign, font_size_to_px};
