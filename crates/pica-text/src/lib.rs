//! Tagged-text node, font measurement, and software rendering for pica.
//!
//! # Architecture
//!
//! [`TaggedText`] is the top of the pipeline:
//!
//! ```text
//! set_text / style setters ──► dirty ──► update() ──► Layout + Hitboxes
//!                                            │
//!                               wrap → parse → measure → layout
//! ```
//!
//! The node owns the style sheet, the source text, and a dirty flag. Every
//! mutation goes through a setter that marks the node dirty; update()
//! recomputes the cached layout only when dirty and swaps the whole
//! result atomically, so pointer hit-testing never observes a half-rebuilt
//! hitbox list. Rendering and measurement are collaborators behind traits:
//! [`FontMeasurer`] implements the measurement side with fontdue, and
//! [`SoftwareSurface`] rasterizes draw instructions in three ordered passes
//! (shadow, stroke, fill).

/// Error taxonomy for node queries and font loading.
pub mod error;
/// Fontdue-backed text measurement.
pub mod measure;
/// The tagged-text node: ownership, dirty tracking, cached layout.
pub mod node;
/// Software rendering surface (shadow/stroke/fill passes to an RGBA buffer).
pub mod render;

pub use error::{FontError, TextError};
pub use measure::FontMeasurer;
pub use node::TaggedText;
pub use render::SoftwareSurface;
