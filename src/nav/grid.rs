//! Row-major grid cursor
//!
//! Used by the conference detail grid and the settings sections. The grid
//! does not know about the sidebar: a Left at column 0 is reported as
//! [`GridMove::LeftEdge`] and the caller forwards it to the focus router.

use super::cursor::{EdgeMode, SelectionCursor};

/// Result of a grid navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMove {
    Moved(usize),
    /// Already at the target; nothing changed
    Unchanged,
    /// Left pressed in the first column
    LeftEdge,
    /// Up pressed in the first row
    PastTop,
    /// Down pressed with no item a full row below
    PastBottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCursor {
    cursor: SelectionCursor,
    columns: usize,
}

impl GridCursor {
    pub fn new(item_count: usize, columns: usize) -> Self {
        Self {
            cursor: SelectionCursor::new(item_count),
            columns: columns.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.cursor.index()
    }

    pub fn item_count(&self) -> usize {
        self.cursor.item_count()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn set_index(&mut self, index: usize) {
        self.cursor.set_index(index);
    }

    pub fn reset(&mut self, item_count: usize) {
        self.cursor.reset(item_count);
    }

    /// The column layout changed (e.g. after a resize)
    pub fn set_columns(&mut self, columns: usize) {
        self.columns = columns.max(1);
    }

    pub fn column(&self) -> usize {
        self.cursor.index() % self.columns
    }

    /// Index of the first item of the last row
    pub fn last_row_start(&self) -> usize {
        match self.cursor.item_count() {
            0 => 0,
            n => (n - 1) / self.columns * self.columns,
        }
    }

    /// Right wraps from the last item back to the first
    pub fn right(&mut self) -> GridMove {
        if self.cursor.is_empty() {
            return GridMove::Unchanged;
        }
        GridMove::Moved(self.cursor.next(EdgeMode::Wrap))
    }

    pub fn left(&mut self) -> GridMove {
        if self.cursor.is_empty() {
            return GridMove::Unchanged;
        }
        if self.column() == 0 {
            return GridMove::LeftEdge;
        }
        GridMove::Moved(self.cursor.prev(EdgeMode::Clamp))
    }

    /// One row down, or `PastBottom` when no item sits a full row below
    pub fn down(&mut self) -> GridMove {
        if self.cursor.is_empty() {
            return GridMove::Unchanged;
        }
        let target = self.cursor.index() + self.columns;
        if target >= self.cursor.item_count() {
            return GridMove::PastBottom;
        }
        self.cursor.set_index(target);
        GridMove::Moved(target)
    }

    /// One row down, landing on the last item when the row below is short
    pub fn down_or_last(&mut self) -> GridMove {
        match self.down() {
            GridMove::PastBottom => {
                let last = self.cursor.item_count() - 1;
                if self.cursor.index() == last {
                    GridMove::Unchanged
                } else {
                    self.cursor.set_index(last);
                    GridMove::Moved(last)
                }
            }
            other => other,
        }
    }

    /// One row up, or `PastTop` from the first row
    pub fn up(&mut self) -> GridMove {
        if self.cursor.is_empty() {
            return GridMove::Unchanged;
        }
        match self.cursor.index().checked_sub(self.columns) {
            Some(target) => {
                self.cursor.set_index(target);
                GridMove::Moved(target)
            }
            None => GridMove::PastTop,
        }
    }

    /// One row up, stopping at index 0
    pub fn up_or_first(&mut self) -> GridMove {
        match self.up() {
            GridMove::PastTop if self.cursor.index() != 0 => {
                self.cursor.set_index(0);
                GridMove::Moved(0)
            }
            GridMove::PastTop => GridMove::Unchanged,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_at_column_zero_is_edge() {
        let mut grid = GridCursor::new(10, 4);
        grid.set_index(4);
        assert_eq!(grid.left(), GridMove::LeftEdge);
        assert_eq!(grid.index(), 4);
        grid.set_index(5);
        assert_eq!(grid.left(), GridMove::Moved(4));
    }

    #[test]
    fn test_right_wraps_over_whole_grid() {
        let mut grid = GridCursor::new(10, 4);
        grid.set_index(9);
        assert_eq!(grid.right(), GridMove::Moved(0));
    }

    #[test]
    fn test_down_or_last_clamps_to_last_item() {
        let mut grid = GridCursor::new(10, 4);
        grid.set_index(7);
        assert_eq!(grid.down_or_last(), GridMove::Moved(9));
        assert_eq!(grid.down_or_last(), GridMove::Unchanged);
    }

    #[test]
    fn test_down_reports_past_bottom() {
        let mut grid = GridCursor::new(10, 4);
        grid.set_index(6);
        assert_eq!(grid.down(), GridMove::PastBottom);
        assert_eq!(grid.index(), 6);
    }

    #[test]
    fn test_up_from_first_row() {
        let mut grid = GridCursor::new(10, 4);
        grid.set_index(2);
        assert_eq!(grid.up(), GridMove::PastTop);
        assert_eq!(grid.up_or_first(), GridMove::Moved(0));
        assert_eq!(grid.up_or_first(), GridMove::Unchanged);
    }

    #[test]
    fn test_last_row_start() {
        assert_eq!(GridCursor::new(15, 4).last_row_start(), 12);
        assert_eq!(GridCursor::new(16, 4).last_row_start(), 12);
        assert_eq!(GridCursor::new(0, 4).last_row_start(), 0);
    }

    #[test]
    fn test_empty_grid_is_noop() {
        let mut grid = GridCursor::new(0, 4);
        assert_eq!(grid.right(), GridMove::Unchanged);
        assert_eq!(grid.left(), GridMove::Unchanged);
        assert_eq!(grid.down(), GridMove::Unchanged);
        assert_eq!(grid.up(), GridMove::Unchanged);
    }
}
