//! Cursor, grid and windowing primitives shared by every list view

pub mod cursor;
pub mod grid;
pub mod window;

pub use cursor::{EdgeMode, SelectionCursor};
pub use grid::{GridCursor, GridMove};
pub use window::{
    ListFrame, ListViewport, ScrollRequest, ScrollState, WindowPolicy, WindowSpec,
    recompute_window,
};
