//! Windowing and scroll-into-view for long lists
//!
//! Rendering every row of a list with a thousand entries is too slow on TV
//! hardware, so only a window around the selection is rendered and the
//! elided rows are replaced by spacers of the same estimated height.

use crate::config::LayoutConfig;

use super::cursor::{EdgeMode, SelectionCursor};

/// Render instructions for a windowed list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSpec {
    /// First rendered index (inclusive)
    pub start: usize,
    /// Last rendered index (inclusive)
    pub end: usize,
    pub top_spacer: f32,
    pub bottom_spacer: f32,
}

impl WindowSpec {
    /// Number of rendered rows
    pub fn rendered_count(&self) -> usize {
        self.end + 1 - self.start
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }
}

/// Compute the rendered window around the cursor
///
/// Returns `None` for an empty collection.
pub fn recompute_window(
    cursor: &SelectionCursor,
    buffer: usize,
    item_height: f32,
) -> Option<WindowSpec> {
    if cursor.is_empty() {
        return None;
    }

    let last = cursor.item_count() - 1;
    let start = cursor.index().saturating_sub(buffer);
    let end = (cursor.index() + buffer).min(last);

    Some(WindowSpec {
        start,
        end,
        top_spacer: start as f32 * item_height,
        bottom_spacer: (last - end) as f32 * item_height,
    })
}

/// Virtualization policy: full list below the threshold, window above
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPolicy {
    pub buffer: usize,
    pub threshold: usize,
    pub item_height: f32,
}

impl WindowPolicy {
    pub fn from_layout(layout: &LayoutConfig) -> Self {
        Self {
            buffer: layout.visible_buffer,
            threshold: layout.virtualize_threshold,
            item_height: layout.item_height,
        }
    }

    pub fn window(&self, cursor: &SelectionCursor) -> Option<WindowSpec> {
        if cursor.item_count() <= self.threshold {
            return (!cursor.is_empty()).then(|| WindowSpec {
                start: 0,
                end: cursor.item_count() - 1,
                top_spacer: 0.0,
                bottom_spacer: 0.0,
            });
        }
        recompute_window(cursor, self.buffer, self.item_height)
    }
}

// ============================================================================
// Scroll into view
// ============================================================================

/// Request to move the container's scroll position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub scroll_top: f32,
}

/// Scroll state of one list container
///
/// Items are assumed to be laid out at `index * item_height`. On every
/// selection change the selected row is brought into view with `inset`
/// padding from the edges so focus rings are never clipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub scroll_top: f32,
    pub viewport_height: f32,
    pub item_height: f32,
    pub inset: f32,
    mounted: bool,
}

impl ScrollState {
    pub fn new(viewport_height: f32, item_height: f32, inset: f32) -> Self {
        Self {
            scroll_top: 0.0,
            viewport_height,
            item_height,
            inset,
            mounted: false,
        }
    }

    fn item_bounds(&self, index: usize) -> (f32, f32) {
        let top = index as f32 * self.item_height;
        (top, top + self.item_height)
    }

    /// Whether the item is fully inside the viewport, inset included
    pub fn is_visible(&self, index: usize) -> bool {
        let (top, bottom) = self.item_bounds(index);
        top >= self.scroll_top + self.inset
            && bottom <= self.scroll_top + self.viewport_height - self.inset
    }

    /// First render: scroll only when the initial selection is off screen
    pub fn on_mount(&mut self, index: usize) -> Option<ScrollRequest> {
        self.mounted = true;
        if self.is_visible(index) {
            return None;
        }
        self.scroll_to(index)
    }

    /// Selection changed: bring the new item into view
    pub fn on_index_change(&mut self, index: usize) -> Option<ScrollRequest> {
        if !self.mounted {
            return self.on_mount(index);
        }
        self.scroll_to(index)
    }

    fn scroll_to(&mut self, index: usize) -> Option<ScrollRequest> {
        let (top, bottom) = self.item_bounds(index);

        let target = if top < self.scroll_top + self.inset {
            (top - self.inset).max(0.0)
        } else if bottom > self.scroll_top + self.viewport_height - self.inset {
            bottom + self.inset - self.viewport_height
        } else {
            return None;
        };

        if (target - self.scroll_top).abs() < f32::EPSILON {
            return None;
        }
        self.scroll_top = target;
        Some(ScrollRequest { scroll_top: target })
    }
}

// ============================================================================
// List viewport: cursor + window + scroll
// ============================================================================

/// Output of a list navigation step for the view layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListFrame {
    pub selected: usize,
    pub window: Option<WindowSpec>,
    pub scroll: Option<ScrollRequest>,
}

/// A list's cursor together with its windowing and scroll state
#[derive(Debug, Clone)]
pub struct ListViewport {
    pub cursor: SelectionCursor,
    pub policy: WindowPolicy,
    pub scroll: ScrollState,
    pub edge_mode: EdgeMode,
}

impl ListViewport {
    pub fn new(item_count: usize, layout: &LayoutConfig, viewport_height: f32) -> Self {
        Self {
            cursor: SelectionCursor::new(item_count),
            policy: WindowPolicy::from_layout(layout),
            scroll: ScrollState::new(viewport_height, layout.item_height, layout.scroll_inset),
            edge_mode: EdgeMode::Wrap,
        }
    }

    pub fn with_edge_mode(mut self, edge_mode: EdgeMode) -> Self {
        self.edge_mode = edge_mode;
        self
    }

    pub fn selected(&self) -> usize {
        self.cursor.index()
    }

    pub fn mount(&mut self) -> ListFrame {
        let scroll = if self.cursor.is_empty() {
            None
        } else {
            self.scroll.on_mount(self.cursor.index())
        };
        self.frame(scroll)
    }

    /// Move the selection and produce the new frame
    pub fn move_by(&mut self, delta: isize) -> ListFrame {
        let before = self.cursor.index();
        let after = self.cursor.move_by(delta, self.edge_mode);
        let scroll = if after != before {
            self.scroll.on_index_change(after)
        } else {
            None
        };
        self.frame(scroll)
    }

    /// Replace the underlying items; selection returns to the top
    pub fn replace_items(&mut self, item_count: usize) -> ListFrame {
        self.cursor.reset(item_count);
        let scroll = if item_count > 0 {
            self.scroll.on_index_change(0)
        } else {
            None
        };
        self.frame(scroll)
    }

    pub fn current_frame(&self) -> ListFrame {
        self.frame(None)
    }

    fn frame(&self, scroll: Option<ScrollRequest>) -> ListFrame {
        ListFrame {
            selected: self.cursor.index(),
            window: self.policy.window(&self.cursor),
            scroll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_500_items_centered() {
        let cursor = SelectionCursor::at(250, 500);
        let window = recompute_window(&cursor, 25, 10.0).unwrap();
        assert_eq!((window.start, window.end), (225, 275));
        assert_eq!(window.top_spacer, 2250.0);
        assert_eq!(window.bottom_spacer, (499 - 275) as f32 * 10.0);
        assert_eq!(window.rendered_count(), 51);
    }

    #[test]
    fn test_window_clamped_at_edges() {
        let cursor = SelectionCursor::at(3, 10);
        let window = recompute_window(&cursor, 5, 1.0).unwrap();
        assert_eq!((window.start, window.end), (0, 8));
        assert_eq!(window.top_spacer, 0.0);
        assert_eq!(window.bottom_spacer, 1.0);

        let cursor = SelectionCursor::at(9, 10);
        let window = recompute_window(&cursor, 5, 1.0).unwrap();
        assert_eq!((window.start, window.end), (4, 9));
        assert_eq!(window.bottom_spacer, 0.0);
    }

    #[test]
    fn test_window_always_contains_selection() {
        for count in 1..40usize {
            for index in 0..count {
                for buffer in [0usize, 1, 3, 25] {
                    let cursor = SelectionCursor::at(index, count);
                    let w = recompute_window(&cursor, buffer, 1.0).unwrap();
                    assert!(w.start <= index && index <= w.end);
                    assert!(w.end < count);
                }
            }
        }
    }

    #[test]
    fn test_empty_list_has_no_window() {
        assert!(recompute_window(&SelectionCursor::new(0), 5, 1.0).is_none());
    }

    #[test]
    fn test_policy_below_threshold_renders_everything() {
        let policy = WindowPolicy {
            buffer: 2,
            threshold: 50,
            item_height: 10.0,
        };
        let window = policy.window(&SelectionCursor::at(30, 40)).unwrap();
        assert_eq!((window.start, window.end), (0, 39));
        assert_eq!(window.top_spacer, 0.0);

        let window = policy.window(&SelectionCursor::at(30, 60)).unwrap();
        assert_eq!((window.start, window.end), (28, 32));
    }

    #[test]
    fn test_mount_skips_scroll_when_visible() {
        let mut scroll = ScrollState::new(500.0, 100.0, 20.0);
        assert_eq!(scroll.on_mount(1), None);
    }

    #[test]
    fn test_mount_scrolls_when_selection_offscreen() {
        let mut scroll = ScrollState::new(500.0, 100.0, 20.0);
        let request = scroll.on_mount(10).unwrap();
        // bottom of item 10 is 1100, plus inset, minus viewport
        assert_eq!(request.scroll_top, 620.0);
        assert!(scroll.is_visible(10));
    }

    #[test]
    fn test_scroll_up_keeps_inset() {
        let mut scroll = ScrollState::new(500.0, 100.0, 20.0);
        scroll.on_mount(10);
        let request = scroll.on_index_change(3).unwrap();
        assert_eq!(request.scroll_top, 280.0);
    }

    #[test]
    fn test_scroll_to_first_item_never_negative() {
        let mut scroll = ScrollState::new(500.0, 100.0, 20.0);
        scroll.on_mount(10);
        let request = scroll.on_index_change(0).unwrap();
        assert_eq!(request.scroll_top, 0.0);
    }

    #[test]
    fn test_viewport_wraps_and_scrolls() {
        let layout = LayoutConfig {
            item_height: 100.0,
            scroll_inset: 0.0,
            ..Default::default()
        };
        let mut viewport = ListViewport::new(20, &layout, 500.0);
        assert_eq!(viewport.mount().scroll, None);

        let frame = viewport.move_by(-1);
        assert_eq!(frame.selected, 19);
        assert_eq!(frame.scroll.unwrap().scroll_top, 1500.0);

        let frame = viewport.move_by(1);
        assert_eq!(frame.selected, 0);
        assert_eq!(frame.scroll.unwrap().scroll_top, 0.0);
    }
}
