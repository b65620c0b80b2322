//! The tagged-text node: ownership, dirty tracking, cached layout.

use pica_layout::{
    CanvasSize, Hitbox, Layout, TextMeasurer, WrapOptions, build_hitboxes, compute_layout,
    measure_lines, pick, wrap_text,
};
use pica_markup::{Tag, TagGrammar, parse_text};
use pica_style::{Style, StyleSheet};

use crate::error::TextError;

/// One layout pass's complete output, swapped in atomically.
#[derive(Debug, Clone)]
struct Computed {
    layout: Layout,
    hitboxes: Vec<Hitbox>,
}

/// A 2D text node rendering marked-up, styled, word-wrapped text.
///
/// The node owns its source text, its style sheet, and a dirty flag. All
/// mutation goes through setters so the flag stays consistent; the resolved
/// style state and computed layout are only reachable through shared
/// references. Re-running [`TaggedText::update`] on a clean node is a no-op,
/// and two passes over unchanged state produce identical results.
#[derive(Debug, Clone)]
pub struct TaggedText {
    text: String,
    styles: StyleSheet,
    dirty: bool,
    computed: Option<Computed>,
}

impl TaggedText {
    /// Create a node with the given source text and style sheet.
    ///
    /// The node starts dirty; call [`TaggedText::update`] before querying.
    pub fn new(text: impl Into<String>, styles: StyleSheet) -> Self {
        Self {
            text: text.into(),
            styles,
            dirty: true,
            computed: None,
        }
    }

    /// The current source text (markup included).
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the source text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.dirty = true;
    }

    /// The current style sheet (read-only; use the setters to mutate).
    #[must_use]
    pub fn style_sheet(&self) -> &StyleSheet {
        &self.styles
    }

    /// Replace the style sheet wholesale.
    pub fn set_style_sheet(&mut self, styles: StyleSheet) {
        self.styles = styles;
        self.dirty = true;
    }

    /// Set or update one tag's style. See [`StyleSheet::set_tag_style`].
    pub fn set_tag_style(&mut self, name: &str, style: Style, overwrite: bool) {
        self.styles.set_tag_style(name, style, overwrite);
        self.dirty = true;
    }

    /// Remove one tag's style; its occurrences degrade to literal text on
    /// the next layout. See [`StyleSheet::delete_tag_style`].
    pub fn delete_tag_style(&mut self, name: &str) {
        self.styles.delete_tag_style(name);
        self.dirty = true;
    }

    /// Whether the node has changes not yet reflected in the cached layout.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recompute the layout if dirty; a no-op otherwise.
    ///
    /// The pipeline is wrap (when enabled) → parse → measure → layout →
    /// hitboxes. The measurer must be the same collaborator across calls for
    /// results to be comparable; it drives both wrap decisions and final
    /// positions. The new layout and hitbox list replace the old ones in a
    /// single assignment, so readers never observe a partial rebuild.
    pub fn update(&mut self, measurer: &dyn TextMeasurer) {
        if !self.dirty && self.computed.is_some() {
            return;
        }

        let default = self.styles.default_style();
        let grammar = TagGrammar::from_sheet(&self.styles);

        let source = if default.word_wrap == Some(true) {
            wrap_text(
                &self.text,
                &grammar,
                &self.styles,
                measurer,
                &WrapOptions::from_style(default),
            )
        } else {
            self.text.clone()
        };

        let lines = parse_text(&source, &grammar, &self.styles);
        let measured = measure_lines(lines, measurer);
        let layout = compute_layout(&measured, &self.styles, measurer);

        let shrink =
            self.styles.default_style().padding.unwrap_or(0.0) + self.styles.drop_shadow_padding();
        let hitboxes = build_hitboxes(&layout.instructions, shrink);

        self.computed = Some(Computed { layout, hitboxes });
        self.dirty = false;
    }

    /// The most recently computed layout.
    ///
    /// # Errors
    ///
    /// [`TextError::NotLaidOut`] if no layout pass has run yet.
    pub fn layout(&self) -> Result<&Layout, TextError> {
        self.computed
            .as_ref()
            .map(|c| &c.layout)
            .ok_or(TextError::NotLaidOut)
    }

    /// The most recently computed canvas size.
    ///
    /// # Errors
    ///
    /// [`TextError::NotLaidOut`] if no layout pass has run yet.
    pub fn canvas_size(&self) -> Result<CanvasSize, TextError> {
        self.layout().map(|l| l.canvas)
    }

    /// The most recently computed hitboxes, in paint order.
    ///
    /// # Errors
    ///
    /// [`TextError::NotLaidOut`] if no layout pass has run yet.
    pub fn hitboxes(&self) -> Result<&[Hitbox], TextError> {
        self.computed
            .as_ref()
            .map(|c| c.hitboxes.as_slice())
            .ok_or(TextError::NotLaidOut)
    }

    /// Resolve a local point to the tag that produced the text under it.
    ///
    /// Reads the most recently computed hitbox list; never triggers a layout
    /// pass itself. `Ok(None)` means the point touches no tagged text.
    ///
    /// # Errors
    ///
    /// [`TextError::NotLaidOut`] if no layout pass has run yet.
    pub fn hit_test(&self, x: f32, y: f32) -> Result<Option<&Tag>, TextError> {
        Ok(pick(self.hitboxes()?, x, y).map(|hb| &hb.tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pica_layout::MonospaceMeasurer;

    #[test]
    fn test_query_before_layout_is_a_usage_error() {
        let node = TaggedText::new("hi", StyleSheet::new());
        assert_eq!(node.layout().unwrap_err(), TextError::NotLaidOut);
        assert_eq!(node.canvas_size().unwrap_err(), TextError::NotLaidOut);
        assert_eq!(node.hit_test(0.0, 0.0).unwrap_err(), TextError::NotLaidOut);
    }

    #[test]
    fn test_update_clears_dirty_and_is_idempotent() {
        let mut node = TaggedText::new("hi", StyleSheet::new());
        let measurer = MonospaceMeasurer::default();
        assert!(node.is_dirty());

        node.update(&measurer);
        assert!(!node.is_dirty());
        let first = node.layout().unwrap().clone();

        // A clean re-render is a no-op.
        node.update(&measurer);
        assert_eq!(*node.layout().unwrap(), first);
    }

    #[test]
    fn test_setters_mark_dirty() {
        let mut node = TaggedText::new("hi", StyleSheet::new());
        let measurer = MonospaceMeasurer::default();
        node.update(&measurer);

        node.set_text("bye");
        assert!(node.is_dirty());
        node.update(&measurer);

        node.set_tag_style("b", Style::default(), false);
        assert!(node.is_dirty());
        node.update(&measurer);

        node.delete_tag_style("b");
        assert!(node.is_dirty());
    }
}
