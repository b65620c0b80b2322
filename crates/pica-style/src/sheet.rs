//! Style sheet: tag name → partial style, plus the `"default"` cascade root.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::style::Style;
use crate::values::{Align, Dialect, FontSize};

/// The reserved sheet key that holds the complete base style.
pub const DEFAULT_KEY: &str = "default";

/// A mapping from tag name to partial style.
///
/// The reserved `"default"` entry is kept separately and is always complete —
/// it is the root of every cascade. All other entries are partial overlays.
/// The set of recognized tag names is exactly the non-default key set at the
/// time a recognizer is built from this sheet.
///
/// All mutation goes through the setter methods so that a host node can keep
/// its dirty flag consistent; the fields are deliberately private.
///
/// Serialized as a flat map including the `"default"` key, matching the shape
/// hosts supply as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Style>", into = "BTreeMap<String, Style>")]
pub struct StyleSheet {
    /// The complete base style.
    default: Style,
    /// Partial styles keyed by tag name (never contains `"default"`).
    tags: BTreeMap<String, Style>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            default: Style::base(),
            tags: BTreeMap::new(),
        }
    }
}

impl StyleSheet {
    /// A sheet containing only the complete base style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sheet from a flat map (which may include a `"default"` entry).
    ///
    /// When the resulting sheet's dialect is BBCode, the standard preset tag
    /// styles are registered afterwards with `overwrite`, shadowing
    /// same-named entries from the map.
    #[must_use]
    pub fn from_map(styles: BTreeMap<String, Style>) -> Self {
        let mut sheet = Self::new();
        for (name, style) in styles {
            sheet.set_tag_style(&name, style, false);
        }

        if sheet.dialect() == Dialect::Bbcode {
            for (name, style) in bbcode_presets() {
                sheet.set_tag_style(name, style, true);
            }
        }

        sheet
    }

    /// Set or update one tag's style.
    ///
    /// For `"default"`, the style is merged onto the current default (which
    /// therefore stays complete). For any other name, the style replaces the
    /// existing entry when `overwrite` is set and is merged onto it
    /// otherwise.
    pub fn set_tag_style(&mut self, name: &str, style: Style, overwrite: bool) {
        if name == DEFAULT_KEY {
            self.default = self.default.merged_with(&style);
        } else if overwrite {
            let _ = self.tags.insert(name.to_string(), style);
        } else {
            let merged = match self.tags.get(name) {
                Some(previous) => previous.merged_with(&style),
                None => style,
            };
            let _ = self.tags.insert(name.to_string(), merged);
        }
    }

    /// Remove one tag's style. Removing `"default"` restores the base style.
    ///
    /// A removed tag name leaves the recognized set, so its occurrences in
    /// text degrade to literal text on the next layout.
    pub fn delete_tag_style(&mut self, name: &str) {
        if name == DEFAULT_KEY {
            self.default = Style::base();
        } else {
            let _ = self.tags.remove(name);
        }
    }

    /// The complete base style (cascade root).
    #[must_use]
    pub fn default_style(&self) -> &Style {
        &self.default
    }

    /// The partial style configured for a tag name, if any.
    #[must_use]
    pub fn tag_style(&self, name: &str) -> Option<&Style> {
        self.tags.get(name)
    }

    /// The recognized tag names, in sorted order (excludes `"default"`).
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// The sheet's tag dialect, read from the default style.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.default.dialect.unwrap_or_default()
    }

    /// All styles in the sheet, default first.
    pub fn styles(&self) -> impl Iterator<Item = &Style> {
        std::iter::once(&self.default).chain(self.tags.values())
    }

    /// The largest stroke thickness configured anywhere in the sheet.
    ///
    /// Every line is inset by this amount so strokes never clip at the
    /// canvas edge.
    #[must_use]
    pub fn max_stroke_thickness(&self) -> f32 {
        self.styles()
            .map(|s| s.stroke_thickness.unwrap_or(0.0))
            .fold(0.0, f32::max)
    }

    /// Padding reserved for drop shadows: the largest configured shadow
    /// distance plus the largest configured blur, across all styles.
    #[must_use]
    pub fn drop_shadow_padding(&self) -> f32 {
        let max_distance = self
            .styles()
            .map(|s| s.drop_shadow_distance.unwrap_or(0.0))
            .fold(0.0, f32::max);
        let max_blur = self
            .styles()
            .map(|s| s.drop_shadow_blur.unwrap_or(0.0))
            .fold(0.0, f32::max);
        max_distance + max_blur
    }
}

impl From<BTreeMap<String, Style>> for StyleSheet {
    fn from(styles: BTreeMap<String, Style>) -> Self {
        Self::from_map(styles)
    }
}

impl From<StyleSheet> for BTreeMap<String, Style> {
    fn from(sheet: StyleSheet) -> Self {
        let mut map = sheet.tags;
        let _ = map.insert(DEFAULT_KEY.to_string(), sheet.default);
        map
    }
}

/// The standard BBCode tag styles, registered when a sheet's dialect is
/// BBCode: `b`, `i`, `color`, `outline`, `font`, `shadow`, `size`,
/// `spacing`, `align`.
///
/// String-valued properties are seeded empty so the inline value prefixes
/// onto them; `size` is seeded with the bare `"px"` unit for the same reason.
fn bbcode_presets() -> Vec<(&'static str, Style)> {
    vec![
        (
            "b",
            Style {
                font_style: Some("bold".to_string()),
                ..Style::default()
            },
        ),
        (
            "i",
            Style {
                font_style: Some("italic".to_string()),
                ..Style::default()
            },
        ),
        (
            "color",
            Style {
                fill: Some(String::new()),
                ..Style::default()
            },
        ),
        (
            "outline",
            Style {
                stroke: Some(String::new()),
                stroke_thickness: Some(6.0),
                ..Style::default()
            },
        ),
        (
            "font",
            Style {
                font_family: Some(String::new()),
                ..Style::default()
            },
        ),
        (
            "shadow",
            Style {
                drop_shadow: Some(true),
                drop_shadow_color: Some(String::new()),
                drop_shadow_blur: Some(3.0),
                drop_shadow_distance: Some(3.0),
                drop_shadow_angle: Some(2.0),
                ..Style::default()
            },
        ),
        (
            "size",
            Style {
                font_size: Some(FontSize::Text("px".to_string())),
                ..Style::default()
            },
        ),
        (
            "spacing",
            Style {
                letter_spacing: Some(0.0),
                ..Style::default()
            },
        ),
        (
            "align",
            Style {
                align: Some(Align::Left),
                ..Style::default()
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sheet_has_complete_default() {
        let sheet = StyleSheet::new();
        assert!(sheet.default_style().fill.is_some());
        assert_eq!(sheet.tag_names().count(), 0);
    }

    #[test]
    fn test_set_tag_style_merges_by_default() {
        let mut sheet = StyleSheet::new();
        sheet.set_tag_style(
            "em",
            Style {
                font_style: Some("italic".to_string()),
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
        let em = sheet.tag_style("em").unwrap();
        assert_eq!(em.font_style.as_deref(), Some("italic"));
        assert_eq!(em.fill.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_set_tag_style_overwrite_replaces() {
        let mut sheet = StyleSheet::new();
        sheet.set_tag_style(
            "em",
            Style {
                font_style: Some("italic".to_string()),
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
            true,
        );
        let em = sheet.tag_style("em").unwrap();
        assert_eq!(em.font_style, None);
    }

    #[test]
    fn test_default_entry_merges_and_stays_complete() {
        let mut sheet = StyleSheet::new();
        sheet.set_tag_style(
            DEFAULT_KEY,
            Style {
                fill: Some("#333333".to_string()),
                ..Style::default()
            },
            false,
        );
        assert_eq!(sheet.default_style().fill.as_deref(), Some("#333333"));
        assert!(sheet.default_style().font_family.is_some());
    }

    #[test]
    fn test_delete_default_restores_base() {
        let mut sheet = StyleSheet::new();
        sheet.set_tag_style(
            DEFAULT_KEY,
            Style {
                fill: Some("#333333".to_string()),
                ..Style::default()
            },
            false,
        );
        sheet.delete_tag_style(DEFAULT_KEY);
        assert_eq!(sheet.default_style().fill.as_deref(), Some("black"));
    }

    #[test]
    fn test_bbcode_sheet_registers_presets() {
        let mut map = BTreeMap::new();
        let _ = map.insert(
            DEFAULT_KEY.to_string(),
            Style {
                dialect: Some(Dialect::Bbcode),
                ..Style::default()
            },
        );
        let sheet = StyleSheet::from_map(map);
        assert!(sheet.tag_style("color").is_some());
        assert!(sheet.tag_style("size").is_some());
        assert!(sheet.tag_style("shadow").is_some());
        // XML sheets get none of them.
        let xml = StyleSheet::from_map(BTreeMap::new());
        assert!(xml.tag_style("color").is_none());
    }

    #[test]
    fn test_padding_maxima_span_all_styles() {
        let mut sheet = StyleSheet::new();
        sheet.set_tag_style(
            "glow",
            Style {
                drop_shadow_distance: Some(4.0),
                drop_shadow_blur: Some(2.0),
                stroke_thickness: Some(3.0),
                ..Style::default()
            },
            false,
        );
        // Base default carries dropShadowDistance 5 even with shadows off;
        // the maxima are taken over configured values, not enabled ones.
        assert!((sheet.drop_shadow_padding() - 7.0).abs() < 0.01);
        assert!((sheet.max_stroke_thickness() - 3.0).abs() < 0.01);
    }
}
