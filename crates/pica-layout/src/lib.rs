//! Word wrap, line layout, and hit regions for the pica text renderer.
//!
//! # Architecture
//!
//! This crate is the middle of the pipeline:
//!
//! ```text
//! markup ──► wrap ──► parse ──► measure ──► layout ──► hitboxes
//!             │                    │           │
//!             └── width oracle ────┴── font metrics (external)
//! ```
//!
//! The same [`TextMeasurer`] drives both the wrap engine and the layout
//! engine, so wrap decisions stay consistent with final widths. Everything
//! here is a pure, blocking computation: no caching, no shared state — the
//! host node owns the dirty flag and the computed results.

/// Hit-region construction and point resolution.
pub mod hit;
/// Line layout: extents, alignment, vertical placement, draw instructions.
pub mod layout;
/// Measurement collaborator interfaces and the test measurer.
pub mod measure;
/// The greedy word-wrap engine.
pub mod wrap;

pub use hit::{Hitbox, Rect, build_hitboxes, pick};
pub use layout::{
    CanvasSize, DrawInstruction, Layout, LineMetrics, MeasuredRun, compute_layout, measure_lines,
};
pub use measure::{FontProperties, MonospaceMeasurer, TextMeasurer};
pub use wrap::{WrapOptions, wrap_text};
