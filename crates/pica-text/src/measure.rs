//! Fontdue-backed text measurement.
//!
//! Implements the measurement collaborator ([`TextMeasurer`]) with real font
//! data: per-character advance widths for the width oracle and
//! ascent/descent from the font's horizontal line metrics. Metrics are
//! cached per font descriptor string, so styles resolving to the same face
//! and size share one lookup.

use std::cell::RefCell;
use std::collections::HashMap;

use fontdue::{Font, FontSettings};

use pica_common::warning::warn_once;
use pica_layout::{FontProperties, TextMeasurer};
use pica_style::Style;

use crate::error::FontError;

/// Common system font paths to search for a default (regular) font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/SFNS.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// System font paths for bold variants.
const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// System font paths for italic variants.
const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/Library/Fonts/Arial Italic.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansOblique.ttf",
    // Windows
    "C:\\Windows\\Fonts\\ariali.ttf",
];

/// System font paths for bold-italic variants.
const FONT_BOLD_ITALIC_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/Library/Fonts/Arial Bold Italic.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBoldOblique.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// Text measurement backed by fontdue's per-glyph metrics.
///
/// Holds a regular face plus optional bold/italic/bold-italic variants,
/// selected per style with fallback through exact match → partial match →
/// regular. Uses `Font::metrics()` (not `Font::rasterize()`) so that
/// measurement never pays for bitmap generation.
pub struct FontMeasurer {
    font: Font,
    font_bold: Option<Font>,
    font_italic: Option<Font>,
    font_bold_italic: Option<Font>,
    /// Metrics cache keyed by the style's font descriptor string.
    metrics_cache: RefCell<HashMap<String, FontProperties>>,
}

impl std::fmt::Debug for FontMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMeasurer")
            .field("has_bold", &self.font_bold.is_some())
            .field("has_italic", &self.font_italic.is_some())
            .field("has_bold_italic", &self.font_bold_italic.is_some())
            .finish_non_exhaustive()
    }
}

impl FontMeasurer {
    /// Load fonts from the known system locations.
    ///
    /// The regular face is required; variants are optional and fall back to
    /// it (with a one-time warning) when missing.
    ///
    /// # Errors
    ///
    /// [`FontError::NoSystemFont`] if no regular face could be loaded.
    pub fn from_system_fonts() -> Result<Self, FontError> {
        let font = load_font_from_paths(FONT_SEARCH_PATHS).ok_or(FontError::NoSystemFont {
            searched: FONT_SEARCH_PATHS.len(),
        })?;

        let font_bold = load_font_from_paths(FONT_BOLD_SEARCH_PATHS);
        let font_italic = load_font_from_paths(FONT_ITALIC_SEARCH_PATHS);
        let font_bold_italic = load_font_from_paths(FONT_BOLD_ITALIC_SEARCH_PATHS);
        if font_bold.is_none() {
            warn_once("font", "no bold system font found, falling back to regular");
        }
        if font_italic.is_none() {
            warn_once("font", "no italic system font found, falling back to regular");
        }

        Ok(Self {
            font,
            font_bold,
            font_italic,
            font_bold_italic,
            metrics_cache: RefCell::new(HashMap::new()),
        })
    }

    /// Build a measurer from raw font bytes (regular required, variants
    /// optional).
    ///
    /// # Errors
    ///
    /// [`FontError::Parse`] if any provided bytes fail to parse.
    pub fn from_font_bytes(
        regular: &[u8],
        bold: Option<&[u8]>,
        italic: Option<&[u8]>,
        bold_italic: Option<&[u8]>,
    ) -> Result<Self, FontError> {
        let parse = |bytes: &[u8]| {
            Font::from_bytes(bytes.to_vec(), FontSettings::default()).map_err(|reason| {
                FontError::Parse {
                    reason: reason.to_string(),
                }
            })
        };

        Ok(Self {
            font: parse(regular)?,
            font_bold: bold.map(parse).transpose()?,
            font_italic: italic.map(parse).transpose()?,
            font_bold_italic: bold_italic.map(parse).transpose()?,
            metrics_cache: RefCell::new(HashMap::new()),
        })
    }

    /// Select the best available face for a style's weight and slant,
    /// falling back through exact match → partial match → regular.
    #[must_use]
    pub fn font_for(&self, style: &Style) -> &Font {
        match (style.is_bold(), style.is_italic()) {
            (true, true) => self
                .font_bold_italic
                .as_ref()
                .or(self.font_bold.as_ref())
                .unwrap_or(&self.font),
            (true, false) => self.font_bold.as_ref().unwrap_or(&self.font),
            (false, true) => self.font_italic.as_ref().unwrap_or(&self.font),
            (false, false) => &self.font,
        }
    }
}

/// Try to load a font from a list of filesystem paths.
fn load_font_from_paths(paths: &[&str]) -> Option<Font> {
    for path in paths {
        if let Ok(data) = std::fs::read(path) {
            if let Ok(font) = Font::from_bytes(data, FontSettings::default()) {
                return Some(font);
            }
        }
    }
    None
}

impl TextMeasurer for FontMeasurer {
    fn measure_width(&self, text: &str, style: &Style) -> f32 {
        let font = self.font_for(style);
        let px = style.font_size_px();
        // Sum per-character advance widths, matching the cursor advancement
        // used by the rendering surface.
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| font.metrics(ch, px).advance_width)
            .sum()
    }

    fn font_properties(&self, style: &Style) -> FontProperties {
        let key = style.font_string();
        if let Some(props) = self.metrics_cache.borrow().get(&key) {
            return *props;
        }

        let font = self.font_for(style);
        let px = style.font_size_px();
        let props = font.horizontal_line_metrics(px).map_or_else(
            || FontProperties {
                // No horizontal metrics in the face; approximate with the
                // conventional 80/20 split of the em square.
                ascent: px * 0.8,
                descent: px * 0.2,
                font_size: px,
            },
            |lm| {
                let ascent = lm.ascent;
                let descent = -lm.descent;
                FontProperties {
                    ascent,
                    descent,
                    font_size: ascent + descent,
                }
            },
        );

        let _ = self.metrics_cache.borrow_mut().insert(key, props);
        props
    }
}
