//! Hit-region construction and point resolution.
//!
//! One hitbox is built per draw instruction, in paint order. Resolution
//! walks the list front to back and returns the first containing rectangle,
//! so overlapping hitboxes resolve in document order. The query is O(number
//! of instructions) and runs once per pointer event.

use pica_markup::Tag;

use crate::layout::DrawInstruction;

/// An axis-aligned rectangle, half-open on the right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Whether the rectangle contains a point (half-open: the right and
    /// bottom edges are outside).
    #[must_use]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// A rectangle tagged with the markup element that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Hitbox {
    /// The owning tag.
    pub tag: Tag,
    /// The glyph rectangle in local coordinates.
    pub rect: Rect,
}

/// Build one hitbox per draw instruction, in paint order.
///
/// `shrink` is the host's texture padding plus the drop-shadow padding; the
/// rectangle is shifted by it so hitboxes stay aligned with rendered glyphs
/// after the padding-driven coordinate shift.
#[must_use]
pub fn build_hitboxes(instructions: &[DrawInstruction], shrink: f32) -> Vec<Hitbox> {
    instructions
        .iter()
        .map(|inst| Hitbox {
            tag: inst.tag.clone(),
            rect: Rect {
                x: inst.x - shrink,
                y: inst.y - inst.ascent - shrink,
                width: inst.width,
                height: inst.ascent + inst.descent,
            },
        })
        .collect()
}

/// Resolve a local point to the first hitbox containing it, in insertion
/// order. `None` means the point touches no tagged text.
#[must_use]
pub fn pick(hitboxes: &[Hitbox], px: f32, py: f32) -> Option<&Hitbox> {
    hitboxes.iter().find(|hb| hb.rect.contains(px, py))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_containment_half_open() {
        let rect = Rect {
            x: 10.0,
            y: 10.0,
            width: 5.0,
            height: 5.0,
        };
        assert!(rect.contains(10.0, 10.0));
        assert!(rect.contains(14.9, 14.9));
        assert!(!rect.contains(15.0, 10.0));
        assert!(!rect.contains(10.0, 15.0));
        assert!(!rect.contains(9.9, 10.0));
    }
}
