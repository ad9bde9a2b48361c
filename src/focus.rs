//! Focus routing between the sidebar, content views and the player
//!
//! Exactly one region owns input at a time. The router only decides which
//! handler sees a key; each handler mutates its own state and reports back
//! through [`HandleResult`]. Focus transitions that cross regions (left edge
//! to sidebar, sidebar back to content) are applied here so handlers never
//! reach into each other.
//!
//! The modal selector is not stored as a separate region. It is derived from
//! the player: while the player is active and reports an open modal, every
//! key goes to the modal.

use crate::keymap::RemoteKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    Sidebar,
    #[default]
    ContentList,
    ContentPlayer,
    /// Overlay inside the player; only meaningful while it is active
    ModalSelector,
}

impl Region {
    pub fn is_content(self) -> bool {
        matches!(self, Region::ContentList | Region::ContentPlayer)
    }
}

/// Result from handling a key in one region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleResult {
    /// Key consumed, nothing further to do
    Handled,
    /// Key not claimed; ignored
    #[default]
    NotHandled,
    /// Left pressed on the leftmost element
    LeftEdge,
    /// Sidebar asked to give focus back to the content region
    ReturnToContent,
    /// The highlighted entry was activated
    Activate,
    /// The region asked to be closed
    Close,
}

impl HandleResult {
    pub fn is_handled(self) -> bool {
        !matches!(self, HandleResult::NotHandled)
    }
}

/// Anything that reacts to remote keys while focused
pub trait KeyHandler {
    fn handle_key(&mut self, key: RemoteKey) -> HandleResult;
}

/// A handler that can open a modal capturing all input
pub trait ModalHost: KeyHandler {
    fn modal_open(&self) -> bool;
    fn handle_modal_key(&mut self, key: RemoteKey) -> HandleResult;
}

/// Outcome of routing one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routed {
    /// Region whose handler received the key
    pub region: Region,
    pub result: HandleResult,
}

#[derive(Debug, Clone, Default)]
pub struct FocusRouter {
    active: Region,
    /// Content region to return to when leaving the sidebar
    last_content: Region,
}

impl FocusRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored region, ignoring any modal overlay
    pub fn active_region(&self) -> Region {
        self.active
    }

    /// The region that will receive the next key
    pub fn effective_region(&self, player: &dyn ModalHost) -> Region {
        match self.active {
            Region::ContentPlayer if player.modal_open() => Region::ModalSelector,
            region => region,
        }
    }

    /// Move focus unconditionally
    ///
    /// The modal selector is owned by the player, so requesting it focuses
    /// the player.
    pub fn request_focus(&mut self, region: Region) {
        let region = match region {
            Region::ModalSelector => Region::ContentPlayer,
            other => other,
        };
        if region.is_content() {
            self.last_content = region;
        }
        if region != self.active {
            tracing::debug!("focus {:?} -> {:?}", self.active, region);
        }
        self.active = region;
    }

    /// Deliver a key to the focused region and apply cross-region moves
    pub fn route_key(
        &mut self,
        key: RemoteKey,
        sidebar: &mut dyn KeyHandler,
        content: &mut dyn KeyHandler,
        player: &mut dyn ModalHost,
    ) -> Routed {
        let region = self.effective_region(player);
        let result = match region {
            Region::Sidebar => sidebar.handle_key(key),
            Region::ContentList => content.handle_key(key),
            Region::ContentPlayer => player.handle_key(key),
            Region::ModalSelector => player.handle_modal_key(key),
        };

        match (region, result) {
            (Region::ContentList, HandleResult::LeftEdge) => {
                self.request_focus(Region::Sidebar);
            }
            (Region::Sidebar, HandleResult::ReturnToContent) => {
                self.request_focus(self.last_content);
            }
            _ => {}
        }

        Routed { region, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        keys: Vec<RemoteKey>,
        reply: HandleResult,
    }

    impl KeyHandler for Recorder {
        fn handle_key(&mut self, key: RemoteKey) -> HandleResult {
            self.keys.push(key);
            self.reply
        }
    }

    #[derive(Default)]
    struct FakePlayer {
        keys: Vec<RemoteKey>,
        modal: bool,
        modal_keys: Vec<RemoteKey>,
    }

    impl KeyHandler for FakePlayer {
        fn handle_key(&mut self, key: RemoteKey) -> HandleResult {
            self.keys.push(key);
            HandleResult::Handled
        }
    }

    impl ModalHost for FakePlayer {
        fn modal_open(&self) -> bool {
            self.modal
        }

        fn handle_modal_key(&mut self, key: RemoteKey) -> HandleResult {
            self.modal_keys.push(key);
            HandleResult::Handled
        }
    }

    #[test]
    fn test_key_goes_only_to_active_region() {
        let mut router = FocusRouter::new();
        let (mut sidebar, mut content, mut player) =
            (Recorder::default(), Recorder::default(), FakePlayer::default());

        router.route_key(RemoteKey::Down, &mut sidebar, &mut content, &mut player);
        assert_eq!(content.keys, vec![RemoteKey::Down]);
        assert!(sidebar.keys.is_empty());
        assert!(player.keys.is_empty());
    }

    #[test]
    fn test_left_edge_moves_focus_to_sidebar() {
        let mut router = FocusRouter::new();
        let mut sidebar = Recorder {
            reply: HandleResult::ReturnToContent,
            ..Default::default()
        };
        let mut content = Recorder {
            reply: HandleResult::LeftEdge,
            ..Default::default()
        };
        let mut player = FakePlayer::default();

        router.route_key(RemoteKey::Left, &mut sidebar, &mut content, &mut player);
        assert_eq!(router.active_region(), Region::Sidebar);

        router.route_key(RemoteKey::Right, &mut sidebar, &mut content, &mut player);
        assert_eq!(router.active_region(), Region::ContentList);
        assert_eq!(content.keys.len(), 1);
    }

    #[test]
    fn test_modal_overrides_player() {
        let mut router = FocusRouter::new();
        router.request_focus(Region::ContentPlayer);
        let (mut sidebar, mut content) = (Recorder::default(), Recorder::default());
        let mut player = FakePlayer {
            modal: true,
            ..Default::default()
        };

        for key in [
            RemoteKey::Left,
            RemoteKey::Right,
            RemoteKey::Up,
            RemoteKey::Down,
            RemoteKey::Enter,
        ] {
            let routed = router.route_key(key, &mut sidebar, &mut content, &mut player);
            assert_eq!(routed.region, Region::ModalSelector);
        }
        assert_eq!(player.modal_keys.len(), 5);
        assert!(player.keys.is_empty());
        assert!(content.keys.is_empty());
    }

    #[test]
    fn test_request_modal_focuses_player() {
        let mut router = FocusRouter::new();
        router.request_focus(Region::ModalSelector);
        assert_eq!(router.active_region(), Region::ContentPlayer);
    }

    #[test]
    fn test_unclaimed_key_is_ignored() {
        let mut router = FocusRouter::new();
        let (mut sidebar, mut content, mut player) =
            (Recorder::default(), Recorder::default(), FakePlayer::default());
        let routed = router.route_key(RemoteKey::Mute, &mut sidebar, &mut content, &mut player);
        assert_eq!(routed.result, HandleResult::NotHandled);
        assert_eq!(router.active_region(), Region::ContentList);
    }
}
