//! The open style record and the cascade merge.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::values::{Align, Dialect, FontSize, VerticalAlign};

/// Default font size in pixels, used wherever a size is missing or invalid.
pub const DEFAULT_FONT_SIZE_PX: f32 = 26.0;

/// An open record of text-styling properties.
///
/// Every property is optional: `None` means "unset — inherit from the
/// enclosing style". Styles cascade by [`Style::merged_with`]; because the
/// root of the cascade is the complete [`Style::base`], a fully resolved
/// style always has every property defined, and readers may fall back to the
/// base defaults with `unwrap_or` without changing behavior.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Style {
    /// Horizontal line alignment. Only the `"default"` entry's value is
    /// consulted during layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,

    /// When wrapping, split words wider than the line character by character.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_words: Option<bool>,

    /// Draw span bounds and baselines for runs using this style.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,

    /// Tag bracket convention. Only the `"default"` entry's value is
    /// consulted when building the recognizer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<Dialect>,

    /// Whether runs using this style cast a drop shadow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_shadow: Option<bool>,

    /// Shadow offset direction in radians.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_shadow_angle: Option<f32>,

    /// Shadow blur radius. Participates in canvas and hitbox padding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_shadow_blur: Option<f32>,

    /// Shadow color string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_shadow_color: Option<String>,

    /// Shadow offset distance in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_shadow_distance: Option<f32>,

    /// Fill color string. An unset fill skips the fill pass entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,

    /// Font family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    /// Font size: pixels or a unit string. See [`FontSize`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,

    /// Font style keyword: `"normal"`, `"italic"`, `"oblique"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,

    /// Font variant keyword: `"normal"`, `"small-caps"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_variant: Option<String>,

    /// Font weight keyword or numeric string: `"normal"`, `"bold"`, `"700"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,

    /// Extra spacing inserted between characters, in pixels. Non-zero spacing
    /// switches layout to per-character draw instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f32>,

    /// Extra vertical spacing between lines, in pixels. Only the `"default"`
    /// entry's value is consulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<f32>,

    /// Texture padding in pixels; shrinks hitboxes to stay aligned with
    /// rendered glyphs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,

    /// Stroke color string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,

    /// Stroke thickness in pixels. Zero skips the stroke pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_thickness: Option<f32>,

    /// Vertical alignment of runs within their line. See [`VerticalAlign`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valign: Option<VerticalAlign>,

    /// Whether to word-wrap the source text before layout. Only the
    /// `"default"` entry's value is consulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_wrap: Option<bool>,

    /// Maximum line width for word wrapping, in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_wrap_width: Option<f32>,
}

impl Style {
    /// The complete base style: every property defined.
    ///
    /// This is the root of every cascade and the value of a fresh sheet's
    /// `"default"` entry.
    #[must_use]
    pub fn base() -> Self {
        Self {
            align: Some(Align::Left),
            break_words: Some(false),
            debug: Some(false),
            dialect: Some(Dialect::Xml),
            drop_shadow: Some(false),
            drop_shadow_angle: Some(PI / 6.0),
            drop_shadow_blur: Some(0.0),
            drop_shadow_color: Some("#000000".to_string()),
            drop_shadow_distance: Some(5.0),
            fill: Some("black".to_string()),
            font_family: Some("Arial".to_string()),
            font_size: Some(FontSize::Px(DEFAULT_FONT_SIZE_PX)),
            font_style: Some("normal".to_string()),
            font_variant: Some("normal".to_string()),
            font_weight: Some("normal".to_string()),
            letter_spacing: Some(0.0),
            line_spacing: Some(0.0),
            padding: Some(0.0),
            stroke: Some("black".to_string()),
            stroke_thickness: Some(0.0),
            valign: Some(VerticalAlign::Baseline),
            word_wrap: Some(false),
            word_wrap_width: Some(100.0),
        }
    }

    /// Merge `overlay` onto `self`: the overlay's explicitly-set properties
    /// win, unset properties inherit from `self`.
    ///
    /// Pure — both inputs are left untouched and the result is a new value,
    /// so stack frames never share mutable style state.
    #[must_use]
    pub fn merged_with(&self, overlay: &Self) -> Self {
        Self {
            align: overlay.align.or(self.align),
            break_words: overlay.break_words.or(self.break_words),
            debug: overlay.debug.or(self.debug),
            dialect: overlay.dialect.or(self.dialect),
            drop_shadow: overlay.drop_shadow.or(self.drop_shadow),
            drop_shadow_angle: overlay.drop_shadow_angle.or(self.drop_shadow_angle),
            drop_shadow_blur: overlay.drop_shadow_blur.or(self.drop_shadow_blur),
            drop_shadow_color: overlay
                .drop_shadow_color
                .clone()
                .or_else(|| self.drop_shadow_color.clone()),
            drop_shadow_distance: overlay.drop_shadow_distance.or(self.drop_shadow_distance),
            fill: overlay.fill.clone().or_else(|| self.fill.clone()),
            font_family: overlay
                .font_family
                .clone()
                .or_else(|| self.font_family.clone()),
            font_size: overlay
                .font_size
                .clone()
                .or_else(|| self.font_size.clone()),
            font_style: overlay
                .font_style
                .clone()
                .or_else(|| self.font_style.clone()),
            font_variant: overlay
                .font_variant
                .clone()
                .or_else(|| self.font_variant.clone()),
            font_weight: overlay
                .font_weight
                .clone()
                .or_else(|| self.font_weight.clone()),
            letter_spacing: overlay.letter_spacing.or(self.letter_spacing),
            line_spacing: overlay.line_spacing.or(self.line_spacing),
            padding: overlay.padding.or(self.padding),
            stroke: overlay.stroke.clone().or_else(|| self.stroke.clone()),
            stroke_thickness: overlay.stroke_thickness.or(self.stroke_thickness),
            valign: overlay.valign.or(self.valign),
            word_wrap: overlay.word_wrap.or(self.word_wrap),
            word_wrap_width: overlay.word_wrap_width.or(self.word_wrap_width),
        }
    }

    /// Apply a BBCode inline value (`[tag=value]…`) to this tag style.
    ///
    /// String-valued properties are prefixed with the value; numeric
    /// properties are replaced by the value parsed as a number, falling back
    /// to the configured number when parsing fails (lenient — no error path
    /// exists for a bad numeric value). Keyword properties are replaced when
    /// the value parses as a keyword. Unset properties stay unset.
    #[must_use]
    pub fn with_bbcode_value(&self, value: &str) -> Self {
        let prefix = |s: &Option<String>| {
            s.as_ref().map(|existing| format!("{value}{existing}"))
        };
        let numeric = |n: Option<f32>| n.map(|existing| value.parse().unwrap_or(existing));

        Self {
            align: self.align.map(|a| value.parse().unwrap_or(a)),
            break_words: self.break_words,
            debug: self.debug,
            dialect: self.dialect,
            drop_shadow: self.drop_shadow,
            drop_shadow_angle: numeric(self.drop_shadow_angle),
            drop_shadow_blur: numeric(self.drop_shadow_blur),
            drop_shadow_color: prefix(&self.drop_shadow_color),
            drop_shadow_distance: numeric(self.drop_shadow_distance),
            fill: prefix(&self.fill),
            font_family: prefix(&self.font_family),
            font_size: self.font_size.clone().map(|fs| match fs {
                FontSize::Px(n) => FontSize::Px(value.parse().unwrap_or(n)),
                FontSize::Text(s) => FontSize::Text(format!("{value}{s}")),
            }),
            font_style: prefix(&self.font_style),
            font_variant: prefix(&self.font_variant),
            font_weight: prefix(&self.font_weight),
            letter_spacing: numeric(self.letter_spacing),
            line_spacing: numeric(self.line_spacing),
            padding: numeric(self.padding),
            stroke: prefix(&self.stroke),
            stroke_thickness: numeric(self.stroke_thickness),
            valign: self.valign.map(|v| match v {
                VerticalAlign::Offset(n) => VerticalAlign::Offset(value.parse().unwrap_or(n)),
                keyword => keyword,
            }),
            word_wrap: self.word_wrap,
            word_wrap_width: numeric(self.word_wrap_width),
        }
    }

    /// Resolved font size in pixels.
    #[must_use]
    pub fn font_size_px(&self) -> f32 {
        self.font_size
            .as_ref()
            .map_or(DEFAULT_FONT_SIZE_PX, FontSize::px)
    }

    /// The CSS-font-shorthand descriptor for this style, e.g.
    /// `"italic normal bold 26px Arial"`.
    ///
    /// Used as the cache key for font-metric lookups, so two styles that
    /// resolve to the same face and size share measurements.
    #[must_use]
    pub fn font_string(&self) -> String {
        let style = self.font_style.as_deref().unwrap_or("normal");
        let variant = self.font_variant.as_deref().unwrap_or("normal");
        let weight = self.font_weight.as_deref().unwrap_or("normal");
        let family = self.font_family.as_deref().unwrap_or("Arial");
        format!("{style} {variant} {weight} {}px {family}", self.font_size_px())
    }

    /// Whether this style selects a bold face.
    ///
    /// Accepts `"bold"`/`"bolder"`, numeric weights ≥ 700, and the BBCode
    /// preset's `fontStyle: "bold"` spelling.
    #[must_use]
    pub fn is_bold(&self) -> bool {
        let weight_bold = self.font_weight.as_deref().is_some_and(|w| {
            w.eq_ignore_ascii_case("bold")
                || w.eq_ignore_ascii_case("bolder")
                || w.parse::<u16>().is_ok_and(|n| n >= 700)
        });
        weight_bold
            || self
                .font_style
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("bold"))
    }

    /// Whether this style selects an italic face.
    #[must_use]
    pub fn is_italic(&self) -> bool {
        self.font_style
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("italic") || s.eq_ignore_ascii_case("oblique"))
    }
}
