//! Keyword and scalar value types used by style properties.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use pica_common::warning::warn_once;

/// Pixels per `em`/`rem` unit (the conventional 16px em square).
const PX_PER_EM: f32 = 16.0;
/// Pixels per percentage point of the em square.
const PX_PER_PERCENT: f32 = 16.0 / 100.0;
/// Pixels per typographic point.
const PX_PER_PT: f32 = 1.328_147_2;

/// Horizontal alignment of each laid-out line within the widest line.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Align {
    /// Lines start at the left edge (zero slack offset).
    #[default]
    Left,
    /// Lines are centered (half the slack on each side).
    Center,
    /// Lines end at the right edge (full slack offset).
    Right,
}

/// Which bracket/attribute convention marks up tags in the source text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Dialect {
    /// Angle brackets with XML attribute syntax: `<tag attr="v">…</tag>`.
    #[default]
    Xml,
    /// Square brackets with an inline value shorthand: `[tag=v]…[/tag]`.
    Bbcode,
}

impl Dialect {
    /// The character that opens a tag in this dialect.
    #[must_use]
    pub const fn open_bracket(self) -> char {
        match self {
            Self::Xml => '<',
            Self::Bbcode => '[',
        }
    }

    /// The character that closes a tag in this dialect.
    #[must_use]
    pub const fn close_bracket(self) -> char {
        match self {
            Self::Xml => '>',
            Self::Bbcode => ']',
        }
    }
}

/// How a run's glyph baseline is positioned relative to its line's vertical
/// extent.
///
/// Serialized as either a keyword string (`"top"`, `"middle"`, `"bottom"`,
/// `"baseline"`) or a bare number (an offset from the line's top baseline —
/// positive values raise the glyph).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "VerticalAlignRepr", into = "VerticalAlignRepr")]
pub enum VerticalAlign {
    /// Anchor the run's own ascent at the top of the line box.
    Top,
    /// Center the run's ascent+descent within the line's extent.
    Middle,
    /// Anchor the run's descent at the bottom of the line's extent.
    Bottom,
    /// Align the run's baseline with the line's common baseline.
    Baseline,
    /// Numeric offset from the line's baseline; positive is higher.
    Offset(f32),
}

impl Default for VerticalAlign {
    fn default() -> Self {
        Self::Baseline
    }
}

/// Serde wire shape for [`VerticalAlign`]: keyword string or bare number.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum VerticalAlignRepr {
    Keyword(String),
    Number(f32),
}

impl From<VerticalAlignRepr> for VerticalAlign {
    fn from(repr: VerticalAlignRepr) -> Self {
        match repr {
            VerticalAlignRepr::Number(n) => Self::Offset(n),
            VerticalAlignRepr::Keyword(word) => match word.as_str() {
                "top" => Self::Top,
                "middle" => Self::Middle,
                "bottom" => Self::Bottom,
                "baseline" => Self::Baseline,
                other => {
                    warn_once("style", &format!("unknown valign keyword '{other}'"));
                    Self::Baseline
                }
            },
        }
    }
}

impl From<VerticalAlign> for VerticalAlignRepr {
    fn from(valign: VerticalAlign) -> Self {
        match valign {
            VerticalAlign::Top => Self::Keyword("top".to_string()),
            VerticalAlign::Middle => Self::Keyword("middle".to_string()),
            VerticalAlign::Bottom => Self::Keyword("bottom".to_string()),
            VerticalAlign::Baseline => Self::Keyword("baseline".to_string()),
            VerticalAlign::Offset(n) => Self::Number(n),
        }
    }
}

/// A font size: either a pixel number or a string carrying a unit.
///
/// The string form exists for two reasons: host sheets may say `"30pt"`, and
/// the BBCode `size` preset stores the bare unit (`"px"`) so that an inline
/// value can be prefixed onto it (`[size=30]` → `"30px"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontSize {
    /// A size in pixels.
    Px(f32),
    /// A size string with a unit suffix, e.g. `"30px"`, `"12pt"`, `"1.5em"`.
    Text(String),
}

impl FontSize {
    /// Resolve this size to pixels, converting unit strings with
    /// [`font_size_to_px`].
    #[must_use]
    pub fn px(&self) -> f32 {
        match self {
            Self::Px(n) => *n,
            Self::Text(s) => font_size_to_px(s),
        }
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self::Px(crate::style::DEFAULT_FONT_SIZE_PX)
    }
}

/// Convert a font-size string with a unit suffix to pixels.
///
/// Supports `px`, `pt`, `em`, `rem`, and `%` with the fixed ratios used
/// throughout this workspace (16px em square). A missing unit means pixels.
/// An unparseable number falls back to the default font size with a warning.
#[must_use]
pub fn font_size_to_px(size: &str) -> f32 {
    let trimmed = size.trim();
    let unit_start = trimmed
        .find(|c: char| c.is_ascii_alphabetic() || c == '%')
        .unwrap_or(trimmed.len());
    let (value_str, unit) = trimmed.split_at(unit_start);

    let Ok(value) = value_str.trim().parse::<f32>() else {
        warn_once(
            "style",
            &format!("unparseable font size '{size}', using default"),
        );
        return crate::style::DEFAULT_FONT_SIZE_PX;
    };

    match unit {
        "%" => value * PX_PER_PERCENT,
        "em" | "rem" => value * PX_PER_EM,
        "pt" => value * PX_PER_PT,
        "px" | "" => value,
        other => {
            warn_once("style", &format!("unsupported font-size unit '{other}'"));
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_keywords_round_trip() {
        assert_eq!("center".parse::<Align>().unwrap(), Align::Center);
        assert_eq!(Align::Right.to_string(), "right");
    }

    #[test]
    fn test_dialect_brackets() {
        assert_eq!(Dialect::Xml.open_bracket(), '<');
        assert_eq!(Dialect::Bbcode.open_bracket(), '[');
        assert_eq!(Dialect::Bbcode.close_bracket(), ']');
    }

    #[test]
    fn test_font_size_units() {
        assert!((font_size_to_px("26") - 26.0).abs() < 0.01);
        assert!((font_size_to_px("26px") - 26.0).abs() < 0.01);
        assert!((font_size_to_px("2em") - 32.0).abs() < 0.01);
        assert!((font_size_to_px("100%") - 16.0).abs() < 0.01);
        assert!((font_size_to_px("10pt") - 13.281_472).abs() < 0.01);
    }

    #[test]
    fn test_font_size_fallback_on_garbage() {
        assert!((font_size_to_px("huge") - crate::style::DEFAULT_FONT_SIZE_PX).abs() < 0.01);
    }
}
