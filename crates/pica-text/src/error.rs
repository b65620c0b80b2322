//! Error taxonomy for node queries and font loading.
//!
//! Malformed markup is never an error — the parser recovers silently — so
//! the only failures surfaced here are usage errors (querying a node that
//! has not been laid out) and font discovery problems. Both are fatal to the
//! call, never to the node.

use thiserror::Error;

/// Usage errors reported by [`crate::TaggedText`] queries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextError {
    /// A measurement, layout, or hit-test query ran before any successful
    /// layout pass.
    #[error("text has not been laid out yet; call update() before querying")]
    NotLaidOut,
}

/// Errors from font discovery and parsing in [`crate::FontMeasurer`].
#[derive(Debug, Error)]
pub enum FontError {
    /// No regular font could be loaded from any known system location.
    #[error("no usable font found in any of the {searched} known system locations")]
    NoSystemFont {
        /// How many paths were tried.
        searched: usize,
    },
    /// Font bytes were found but could not be parsed.
    #[error("failed to parse font data: {reason}")]
    Parse {
        /// The parser's explanation.
        reason: String,
    },
}
