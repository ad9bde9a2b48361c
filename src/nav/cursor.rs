//! Selection cursor over an ordered collection

/// Whether moving past either end wraps around or stops at the edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeMode {
    /// Carousels, sidebar, modal lists
    #[default]
    Wrap,
    /// Paginated lists, where the edge is handled by the pagination cursor
    Clamp,
}

/// A logical selection index over `item_count` items
///
/// `index < item_count` holds whenever `item_count > 0`; with zero items the
/// index is pinned to 0 and every move is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionCursor {
    index: usize,
    item_count: usize,
}

impl SelectionCursor {
    pub fn new(item_count: usize) -> Self {
        Self {
            index: 0,
            item_count,
        }
    }

    /// Cursor starting at `index`, clamped into range
    pub fn at(index: usize, item_count: usize) -> Self {
        let mut cursor = Self::new(item_count);
        cursor.set_index(index);
        cursor
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Move by `delta`, returning the new index
    pub fn move_by(&mut self, delta: isize, mode: EdgeMode) -> usize {
        if self.item_count == 0 {
            return self.index;
        }

        let count = self.item_count as isize;
        let target = self.index as isize + delta;
        let next = match mode {
            EdgeMode::Wrap => target.rem_euclid(count),
            EdgeMode::Clamp => target.clamp(0, count - 1),
        };
        self.index = next as usize;
        self.index
    }

    pub fn next(&mut self, mode: EdgeMode) -> usize {
        self.move_by(1, mode)
    }

    pub fn prev(&mut self, mode: EdgeMode) -> usize {
        self.move_by(-1, mode)
    }

    /// Jump to an index, clamped into range
    pub fn set_index(&mut self, index: usize) {
        self.index = if self.item_count == 0 {
            0
        } else {
            index.min(self.item_count - 1)
        };
    }

    /// The underlying sequence was replaced wholesale
    pub fn reset(&mut self, item_count: usize) {
        self.item_count = item_count;
        self.index = 0;
    }

    /// The sequence grew or shrank in place; keep the selection if still valid
    pub fn resize(&mut self, item_count: usize) {
        self.item_count = item_count;
        self.set_index(self.index);
    }

    pub fn is_at_start(&self) -> bool {
        self.index == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.item_count == 0 || self.index == self.item_count - 1
    }
}
