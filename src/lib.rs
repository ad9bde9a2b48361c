pub mod app;
pub mod carousel;
pub mod config;
pub mod error;
pub mod focus;
pub mod generation;
pub mod keymap;
pub mod media;
pub mod nav;
pub mod pagination;
pub mod player;
pub mod router;
pub mod search;
pub mod sidebar;
pub mod source;
pub mod store;
pub mod types;
pub mod views;

pub use app::{App, AppEvent, Snapshot};
pub use config::Config;
pub use error::{CccTvError, Result};
pub use focus::{FocusRouter, HandleResult, Region};
pub use keymap::{KeyEvent, RemoteKey, parse_key_script};
pub use router::View;
pub use source::{FixtureSource, ItemSource, MediaApi};
pub use store::{FileStore, MemoryStore, SharedStore};
pub use types::{ConferenceRow, Lecture};
