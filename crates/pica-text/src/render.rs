//! Software rendering surface (shadow/stroke/fill passes to an RGBA buffer).
//!
//! Executes a [`Layout`]'s draw instructions against fontdue glyph bitmaps,
//! alpha-blending into an [`image`] buffer sized by the layout's canvas. The
//! surface knows nothing about markup or cascades — it reads one resolved
//! style per instruction and performs three ordered passes:
//!
//! 1. **shadow** — skipped for styles without `dropShadow`
//! 2. **stroke** — skipped at zero stroke thickness or unset stroke color
//! 3. **fill** — skipped for styles with an unset fill
//!
//! Per-style debug flags add span bounds and baselines on top.

use std::path::Path;

use anyhow::Result;
use image::{ImageBuffer, Rgba, RgbaImage};

use pica_layout::{DrawInstruction, Layout};
use pica_style::parse_color;

use crate::measure::FontMeasurer;

/// Debug overlay colors (span bounds, baseline, top, bottom).
const DEBUG_BOUNDS: [u8; 4] = [0xff, 0xff, 0xff, 0x1a];
const DEBUG_BASELINE: [u8; 4] = [0x44, 0xbb, 0x44, 0xff];
const DEBUG_TOP: [u8; 4] = [0xbb, 0x44, 0x44, 0xff];
const DEBUG_BOTTOM: [u8; 4] = [0x44, 0x44, 0xbb, 0xff];

/// A software surface that rasterizes draw instructions to RGBA pixels.
pub struct SoftwareSurface {
    buffer: RgbaImage,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for SoftwareSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl SoftwareSurface {
    /// Create a transparent surface sized for a layout's canvas.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(layout: &Layout) -> Self {
        let width = layout.canvas.width.ceil().max(1.0) as u32;
        let height = layout.canvas.height.ceil().max(1.0) as u32;
        Self {
            buffer: ImageBuffer::from_pixel(width, height, Rgba([0, 0, 0, 0])),
            width,
            height,
        }
    }

    /// Surface width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Execute a layout's instructions: shadow pass, then stroke pass, then
    /// fill pass, then debug overlays.
    pub fn render(&mut self, layout: &Layout, measurer: &FontMeasurer) {
        // First pass: draw the shadows only.
        for inst in &layout.instructions {
            if inst.style.drop_shadow != Some(true) {
                continue;
            }
            let color = inst
                .style
                .drop_shadow_color
                .as_deref()
                .and_then(parse_color)
                .unwrap_or([0, 0, 0, 0xff]);
            let angle = inst.style.drop_shadow_angle.unwrap_or(0.0);
            let distance = inst.style.drop_shadow_distance.unwrap_or(0.0);
            let blur = inst.style.drop_shadow_blur.unwrap_or(0.0);
            // Blur is approximated by attenuating the stamp; the blur radius
            // still participates in canvas padding upstream.
            let attenuation = 1.0 / (1.0 + blur * 0.5);
            self.stamp(
                inst,
                measurer,
                color,
                angle.cos() * distance,
                angle.sin() * distance,
                attenuation,
            );
        }

        // Second pass: draw the strokes only.
        for inst in &layout.instructions {
            let thickness = inst.style.stroke_thickness.unwrap_or(0.0);
            if inst.style.stroke.is_none() || thickness <= 0.0 {
                continue;
            }
            let color = inst
                .style
                .stroke
                .as_deref()
                .and_then(parse_color)
                .unwrap_or([0, 0, 0, 0xff]);
            // Fontdue has no glyph stroking; stamp the glyph at radius
            // offsets around the fill position.
            let diagonal = thickness * std::f32::consts::FRAC_1_SQRT_2;
            let offsets = [
                (thickness, 0.0),
                (-thickness, 0.0),
                (0.0, thickness),
                (0.0, -thickness),
                (diagonal, diagonal),
                (diagonal, -diagonal),
                (-diagonal, diagonal),
                (-diagonal, -diagonal),
            ];
            for (dx, dy) in offsets {
                self.stamp(inst, measurer, color, dx, dy, 1.0);
            }
        }

        // Third pass: draw the fills only.
        for inst in &layout.instructions {
            let Some(fill) = inst.style.fill.as_deref() else {
                continue;
            };
            let color = parse_color(fill).unwrap_or([0, 0, 0, 0xff]);
            self.stamp(inst, measurer, color, 0.0, 0.0, 1.0);
        }

        // Last pass: debug overlays for styles that ask for them.
        for inst in &layout.instructions {
            if inst.style.debug == Some(true) {
                self.draw_debug_overlay(inst);
            }
        }
    }

    /// Stamp one instruction's glyphs at an offset from its position.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss
    )]
    fn stamp(
        &mut self,
        inst: &DrawInstruction,
        measurer: &FontMeasurer,
        color: [u8; 4],
        dx: f32,
        dy: f32,
        alpha_scale: f32,
    ) {
        let font = measurer.font_for(&inst.style);
        let px = inst.style.font_size_px();
        let mut cursor_x = inst.x + dx;
        let baseline_y = inst.y + dy;

        for ch in inst.text.chars() {
            if ch.is_control() {
                continue;
            }

            let (metrics, bitmap) = font.rasterize(ch, px);
            let glyph_x = (cursor_x + metrics.xmin as f32) as i32;
            let glyph_y = (baseline_y - metrics.ymin as f32 - metrics.height as f32) as i32;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = f32::from(bitmap[gy * metrics.width + gx]) * alpha_scale;
                    if coverage <= 0.0 {
                        continue;
                    }
                    let px_x = glyph_x + gx as i32;
                    let px_y = glyph_y + gy as i32;
                    if px_x < 0
                        || px_y < 0
                        || (px_x as u32) >= self.width
                        || (px_y as u32) >= self.height
                    {
                        continue;
                    }
                    let alpha = (coverage * f32::from(color[3]) / 255.0) as u8;
                    let bg = *self.buffer.get_pixel(px_x as u32, px_y as u32);
                    let blended = alpha_blend(Rgba([color[0], color[1], color[2], 255]), bg, alpha);
                    self.buffer.put_pixel(px_x as u32, px_y as u32, blended);
                }
            }

            cursor_x += metrics.advance_width;
        }
    }

    /// Draw span bounds and baseline/top/bottom lines for one instruction.
    #[allow(clippy::cast_possible_truncation)]
    fn draw_debug_overlay(&mut self, inst: &DrawInstruction) {
        let left = inst.x;
        let top = inst.y - inst.ascent;
        let bottom = inst.y + inst.descent;

        self.fill_rect(left, top, inst.width, inst.ascent + inst.descent, DEBUG_BOUNDS);
        self.draw_hline(left, inst.width, inst.y, DEBUG_BASELINE);
        self.draw_hline(left, inst.width, top, DEBUG_TOP);
        self.draw_hline(left, inst.width, bottom, DEBUG_BOTTOM);
    }

    /// Blend a translucent rectangle onto the buffer.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap
    )]
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: [u8; 4]) {
        let x = x as i32;
        let y = y as i32;
        for dy in 0..height as u32 {
            for dx in 0..width as u32 {
                let px = x + dx as i32;
                let py = y + dy as i32;
                if px >= 0 && py >= 0 && (px as u32) < self.width && (py as u32) < self.height {
                    let bg = *self.buffer.get_pixel(px as u32, py as u32);
                    let blended =
                        alpha_blend(Rgba([color[0], color[1], color[2], 255]), bg, color[3]);
                    self.buffer.put_pixel(px as u32, py as u32, blended);
                }
            }
        }
    }

    /// Draw a one-pixel horizontal line.
    fn draw_hline(&mut self, x: f32, width: f32, y: f32, color: [u8; 4]) {
        self.fill_rect(x, y, width, 1.0, color);
    }

    /// Save the rendered surface as a PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be written to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.buffer
            .save(path)
            .map_err(|e| anyhow::anyhow!("failed to save render to '{}': {e}", path.display()))?;
        Ok(())
    }

    /// Consume the surface and return its pixel buffer.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.buffer
    }
}

/// Alpha blend a foreground color onto a background color.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_blend(fg: Rgba<u8>, bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = f32::from(alpha) / 255.0;
    let inv_a = 1.0 - a;

    Rgba([
        f32::from(fg[0]).mul_add(a, f32::from(bg[0]) * inv_a) as u8,
        f32::from(fg[1]).mul_add(a, f32::from(bg[1]) * inv_a) as u8,
        f32::from(fg[2]).mul_add(a, f32::from(bg[2]) * inv_a) as u8,
        bg[3].max(alpha),
    ])
}
