//! Line layout: extents, alignment, vertical placement, draw instructions.
//!
//! Given per-line style-resolved runs and their measurements, this module
//! computes line extents, alignment offsets, per-run baselines, and the
//! absolute draw position of every run — or of every character, when a run
//! carries non-zero letter spacing. The output is a flat instruction list in
//! paint order, consumed by a rendering surface that knows nothing about
//! markup or styles beyond a single record per instruction.

use pica_markup::{Tag, TextRun};
use pica_style::{Align, Style, StyleSheet, VerticalAlign};

use crate::measure::{FontProperties, TextMeasurer};

/// A text run with its measurements filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredRun {
    /// The literal text of the run.
    pub text: String,
    /// The fully resolved style.
    pub style: Style,
    /// The innermost enclosing tag.
    pub tag: Tag,
    /// Measured advance width, including intra-run letter spacing.
    pub width: f32,
    /// Measured height (the font's ascent + descent).
    pub height: f32,
    /// Metrics of the font the style resolves to.
    pub font: FontProperties,
}

/// Derived vertical and horizontal extents of one laid-out line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Total measured width, including half-spacing at run boundaries.
    pub width: f32,
    /// Lowest extent across the line's runs (≤ 0, below the baseline).
    pub y_min: f32,
    /// Highest extent across the line's runs (≥ 0, above the baseline;
    /// includes the configured line spacing on every line after the first).
    pub y_max: f32,
}

/// Final absolute position for one drawable unit: a run, or a single
/// character when letter spacing applies.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawInstruction {
    /// The text to draw.
    pub text: String,
    /// The fully resolved style to draw it with.
    pub style: Style,
    /// Left edge of the text, in canvas coordinates.
    pub x: f32,
    /// Baseline y, in canvas coordinates.
    pub y: f32,
    /// Measured advance width of `text`.
    pub width: f32,
    /// Font ascent above the baseline.
    pub ascent: f32,
    /// Font descent below the baseline (positive).
    pub descent: f32,
    /// The tag owning this text, for hit-region construction.
    pub tag: Tag,
}

/// Overall canvas dimensions, including stroke and shadow padding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasSize {
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
}

/// The complete result of a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Draw instructions in paint order.
    pub instructions: Vec<DrawInstruction>,
    /// Canvas dimensions.
    pub canvas: CanvasSize,
    /// Per-line derived metrics, in line order.
    pub lines: Vec<LineMetrics>,
}

/// Fill in measurements for parsed runs using the external measurer.
///
/// A run's width is its measured advance plus `(chars − 1) × letterSpacing`;
/// its height is the resolved font's line box height.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn measure_lines(
    lines: Vec<Vec<TextRun>>,
    measurer: &dyn TextMeasurer,
) -> Vec<Vec<MeasuredRun>> {
    lines
        .into_iter()
        .map(|line| {
            line.into_iter()
                .map(|run| {
                    let font = measurer.font_properties(&run.style);
                    let spacing = run.style.letter_spacing.unwrap_or(0.0);
                    let mut width = measurer.measure_width(&run.text, &run.style);
                    if !run.text.is_empty() {
                        width += (run.text.chars().count() as f32 - 1.0) * spacing;
                    }
                    MeasuredRun {
                        text: run.text,
                        style: run.style,
                        tag: run.tag,
                        width,
                        height: font.font_size,
                        font,
                    }
                })
                .collect()
        })
        .collect()
}

/// Compute final draw positions and canvas size for measured lines.
///
/// The measurer is consulted again only for per-character widths of runs
/// with non-zero letter spacing; it must be the same measurer used by
/// [`measure_lines`] (and by the wrap engine) for positions to stay
/// consistent.
#[must_use]
pub fn compute_layout(
    lines: &[Vec<MeasuredRun>],
    sheet: &StyleSheet,
    measurer: &dyn TextMeasurer,
) -> Layout {
    let default = sheet.default_style();
    let line_spacing = default.line_spacing.unwrap_or(0.0);
    let align = default.align.unwrap_or_default();

    let metrics: Vec<LineMetrics> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| line_metrics(line, line_spacing, i == 0))
        .collect();
    let max_line_width = metrics.iter().map(|m| m.width).fold(0.0, f32::max);

    let max_stroke = sheet.max_stroke_thickness();
    let shadow_pad = sheet.drop_shadow_padding();
    let padding = shadow_pad + max_stroke;

    let canvas = CanvasSize {
        width: max_line_width + 2.0 * padding,
        height: metrics.iter().map(|m| m.y_max - m.y_min).sum::<f32>() + 2.0 * padding,
    };

    let mut instructions = Vec::new();
    let mut base_y = padding;

    for (line, m) in lines.iter().zip(&metrics) {
        let mut x = padding
            + match align {
                Align::Left => 0.0,
                Align::Center => (max_line_width - m.width) / 2.0,
                Align::Right => max_line_width - m.width,
            };

        let run_count = line.len();
        for (j, run) in line.iter().enumerate() {
            let spacing = run.style.letter_spacing.unwrap_or(0.0);
            let FontProperties {
                ascent, descent, ..
            } = run.font;

            // Baseline y for this run: top-aligned baseline plus the
            // adjustment its vertical-alignment mode calls for.
            let mut y = base_y + ascent;
            match run.style.valign.unwrap_or_default() {
                VerticalAlign::Top => {}
                VerticalAlign::Baseline => y += m.y_max - ascent,
                VerticalAlign::Middle => y += (m.y_max - m.y_min - ascent - descent) / 2.0,
                VerticalAlign::Bottom => y += m.y_max - m.y_min - ascent - descent,
                // Positive offsets raise the glyph.
                VerticalAlign::Offset(v) => y += m.y_max - ascent - v,
            }

            if spacing == 0.0 {
                instructions.push(DrawInstruction {
                    text: run.text.clone(),
                    style: run.style.clone(),
                    x,
                    y,
                    width: run.width,
                    ascent,
                    descent,
                    tag: run.tag.clone(),
                });
                x += run.width;
            } else {
                // Letter-spaced runs are emitted character by character,
                // with half a spacing unit on each side of every character
                // (including run boundaries) so the total matches the width
                // used during wrapping.
                let chars: Vec<char> = run.text.chars().collect();
                let char_count = chars.len();
                for (k, c) in chars.into_iter().enumerate() {
                    if k > 0 || j > 0 {
                        x += spacing / 2.0;
                    }
                    let mut buf = [0; 4];
                    let char_text = c.encode_utf8(&mut buf);
                    let char_width = measurer.measure_width(char_text, &run.style);
                    instructions.push(DrawInstruction {
                        text: char_text.to_string(),
                        style: run.style.clone(),
                        x,
                        y,
                        width: char_width,
                        ascent,
                        descent,
                        tag: run.tag.clone(),
                    });
                    x += char_width;
                    if k + 1 < char_count || j + 1 < run_count {
                        x += spacing / 2.0;
                    }
                }
            }
        }

        base_y += m.y_max - m.y_min;
    }

    Layout {
        instructions,
        canvas,
        lines: metrics,
    }
}

/// Derive one line's width and vertical extents.
///
/// A numeric vertical alignment shifts the run's extent window by its
/// offset; every other mode contributes `[−descent, ascent]`. The line's
/// height is governed by its tallest and deepest member regardless of
/// individual baselines.
fn line_metrics(line: &[MeasuredRun], line_spacing: f32, is_first: bool) -> LineMetrics {
    let mut width = 0.0;
    let mut y_min = 0.0_f32;
    let mut y_max = 0.0_f32;

    let run_count = line.len();
    for (j, run) in line.iter().enumerate() {
        let spacing = run.style.letter_spacing.unwrap_or(0.0);
        if !run.text.is_empty() {
            // Half a spacing unit before the first character and after the
            // last one, except at the line edges.
            if j > 0 {
                width += spacing / 2.0;
            }
            if j + 1 < run_count {
                width += spacing / 2.0;
            }
        }
        width += run.width;

        match run.style.valign {
            Some(VerticalAlign::Offset(v)) => {
                y_min = y_min.min(v - run.font.descent);
                y_max = y_max.max(v + run.font.ascent);
            }
            _ => {
                y_min = y_min.min(-run.font.descent);
                y_max = y_max.max(run.font.ascent);
            }
        }
    }

    if !is_first && line_spacing != 0.0 {
        y_max += line_spacing;
    }

    LineMetrics { width, y_min, y_max }
}
