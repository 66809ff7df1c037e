use serde::{Deserialize, Serialize};

/// What put the current hover target in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoverSource {
    /// Pointer hit-test over an arc.
    Pointer,
    /// Explicit focus by index, e.g. keyboard navigation.
    Focus,
}

/// Public tooltip state exposed to host applications.
///
/// At most one segment is referenced at a time; replacing the target hides
/// the previous tooltip implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipState {
    pub visible: bool,
    pub segment_index: Option<usize>,
    pub source: Option<HoverSource>,
    /// Pixel position the tooltip box is anchored to.
    pub x: f64,
    pub y: f64,
}

impl Default for TooltipState {
    fn default() -> Self {
        Self {
            visible: false,
            segment_index: None,
            source: None,
            x: 0.0,
            y: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartInteractionState {
    cursor: Option<(f64, f64)>,
    tooltip: TooltipState,
}

impl ChartInteractionState {
    #[must_use]
    pub fn cursor(self) -> Option<(f64, f64)> {
        self.cursor
    }

    #[must_use]
    pub fn tooltip(self) -> TooltipState {
        self.tooltip
    }

    #[must_use]
    pub fn hovered_index(self) -> Option<usize> {
        self.tooltip.segment_index
    }

    /// Applies a pointer move whose hit-test resolved to `hit`.
    ///
    /// The tooltip follows the pointer while it stays over an arc. Returns
    /// `true` when the hovered segment changed.
    pub fn on_pointer_move(&mut self, x: f64, y: f64, hit: Option<usize>) -> bool {
        self.cursor = Some((x, y));
        let previous = self.tooltip.segment_index;
        match hit {
            Some(index) => self.show(index, HoverSource::Pointer, x, y),
            None => self.hide(),
        }
        previous != self.tooltip.segment_index
    }

    pub fn on_pointer_leave(&mut self) {
        self.cursor = None;
        self.hide();
    }

    /// Shows the tooltip for `index` anchored at `(x, y)`.
    pub fn focus(&mut self, index: usize, x: f64, y: f64) {
        self.show(index, HoverSource::Focus, x, y);
    }

    /// Drops a focus-driven tooltip; pointer-driven ones are left alone.
    pub fn blur(&mut self) {
        if self.tooltip.source == Some(HoverSource::Focus) {
            self.hide();
        }
    }

    pub fn clear(&mut self) {
        self.cursor = None;
        self.hide();
    }

    fn show(&mut self, index: usize, source: HoverSource, x: f64, y: f64) {
        self.tooltip = TooltipState {
            visible: true,
            segment_index: Some(index),
            source: Some(source),
            x,
            y,
        };
    }

    fn hide(&mut self) {
        self.tooltip = TooltipState::default();
    }
}
