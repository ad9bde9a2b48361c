//! Horizontal lecture position per conference row
//!
//! Positions are keyed by the row's absolute index in the fetched sequence,
//! not its slot in the on-screen window, so scrolling a row out of view and
//! back restores where the user left it.

use std::collections::HashMap;

/// Result of a horizontal step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselMove {
    Moved(usize),
    /// Left at position 0; focus should go to the sidebar
    LeftEdge,
    /// The row has no lectures
    Empty,
}

#[derive(Debug, Clone, Default)]
pub struct CarouselTracker {
    positions: HashMap<usize, usize>,
}

impl CarouselTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected lecture of a row, clamped to its current length
    pub fn position(&self, row: usize, len: usize) -> usize {
        let stored = self.positions.get(&row).copied().unwrap_or(0);
        if len == 0 { 0 } else { stored.min(len - 1) }
    }

    pub fn move_right(&mut self, row: usize, len: usize) -> CarouselMove {
        if len == 0 {
            return CarouselMove::Empty;
        }
        let next = (self.position(row, len) + 1) % len;
        self.positions.insert(row, next);
        CarouselMove::Moved(next)
    }

    pub fn move_left(&mut self, row: usize, len: usize) -> CarouselMove {
        if len == 0 {
            return CarouselMove::Empty;
        }
        match self.position(row, len) {
            0 => CarouselMove::LeftEdge,
            current => {
                self.positions.insert(row, current - 1);
                CarouselMove::Moved(current - 1)
            }
        }
    }

    /// Forget every row, used when the underlying query is replaced
    pub fn clear(&mut self) {
        self.positions.clear();
    }
}
