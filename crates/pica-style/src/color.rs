//! Color string parsing (hex and named colors).
//!
//! Style color properties are plain strings so the BBCode inline-value
//! prefixing works on them; parsing to RGBA happens only at the rendering
//! surface.

use pica_common::warning::warn_once;

/// Named colors recognized in style strings.
const NAMED_COLORS: &[(&str, [u8; 4])] = &[
    ("black", [0x00, 0x00, 0x00, 0xff]),
    ("white", [0xff, 0xff, 0xff, 0xff]),
    ("red", [0xff, 0x00, 0x00, 0xff]),
    ("green", [0x00, 0x80, 0x00, 0xff]),
    ("lime", [0x00, 0xff, 0x00, 0xff]),
    ("blue", [0x00, 0x00, 0xff, 0xff]),
    ("yellow", [0xff, 0xff, 0x00, 0xff]),
    ("cyan", [0x00, 0xff, 0xff, 0xff]),
    ("magenta", [0xff, 0x00, 0xff, 0xff]),
    ("gray", [0x80, 0x80, 0x80, 0xff]),
    ("grey", [0x80, 0x80, 0x80, 0xff]),
    ("orange", [0xff, 0xa5, 0x00, 0xff]),
    ("purple", [0x80, 0x00, 0x80, 0xff]),
    ("brown", [0xa5, 0x2a, 0x2a, 0xff]),
    ("pink", [0xff, 0xc0, 0xcb, 0xff]),
    ("transparent", [0x00, 0x00, 0x00, 0x00]),
];

/// Parse a color string into RGBA bytes.
///
/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, and the named colors above.
/// Returns `None` (with a one-time warning) for anything else, leaving the
/// fallback choice to the caller.
#[must_use]
pub fn parse_color(value: &str) -> Option<[u8; 4]> {
    let value = value.trim();

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex).or_else(|| {
            warn_once("style", &format!("invalid hex color '{value}'"));
            None
        });
    }

    let lowered = value.to_ascii_lowercase();
    if let Some((_, rgba)) = NAMED_COLORS.iter().find(|(name, _)| *name == lowered) {
        return Some(*rgba);
    }

    warn_once("style", &format!("unknown color '{value}'"));
    None
}

/// Parse the hex digits after a `#`.
fn parse_hex(hex: &str) -> Option<[u8; 4]> {
    let nibble = |c: char| c.to_digit(16).map(|d| d as u8);

    match hex.len() {
        3 => {
            let mut chars = hex.chars();
            let r = nibble(chars.next()?)?;
            let g = nibble(chars.next()?)?;
            let b = nibble(chars.next()?)?;
            Some([r * 17, g * 17, b * 17, 0xff])
        }
        6 | 8 => {
            let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
            let r = byte(0)?;
            let g = byte(2)?;
            let b = byte(4)?;
            let a = if hex.len() == 8 { byte(6)? } else { 0xff };
            Some([r, g, b, a])
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_six_digits() {
        assert_eq!(parse_color("#ff0000"), Some([0xff, 0x00, 0x00, 0xff]));
        assert_eq!(parse_color("#2563eb"), Some([0x25, 0x63, 0xeb, 0xff]));
    }

    #[test]
    fn test_hex_three_digits() {
        assert_eq!(parse_color("#f00"), Some([0xff, 0x00, 0x00, 0xff]));
    }

    #[test]
    fn test_hex_with_alpha() {
        assert_eq!(parse_color("#ff000080"), Some([0xff, 0x00, 0x00, 0x80]));
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(parse_color("black"), Some([0, 0, 0, 0xff]));
        assert_eq!(parse_color("White"), Some([0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn test_unknown_color_is_none() {
        assert_eq!(parse_color("chartreuse-ish"), None);
        assert_eq!(parse_color("#zz0000"), None);
    }
}
