//! Lecture grid of a single conference

use super::{Activation, ContentView, LoadSlot, ViewRequest};
use crate::error::Result;
use crate::focus::{HandleResult, KeyHandler};
use crate::generation::Ticket;
use crate::keymap::RemoteKey;
use crate::nav::{GridCursor, GridMove};
use crate::types::{ConferenceRow, Lecture};

pub struct ConferenceView {
    acronym: String,
    conference: Option<ConferenceRow>,
    grid: GridCursor,
    load: LoadSlot,
    requests: Vec<ViewRequest>,
}

impl ConferenceView {
    /// Mount for `acronym` and queue its load
    pub fn open(acronym: &str, columns: usize) -> Self {
        let mut load = LoadSlot::default();
        let ticket = load.begin();
        Self {
            acronym: acronym.to_string(),
            conference: None,
            grid: GridCursor::new(0, columns),
            load,
            requests: vec![ViewRequest::LoadConference {
                ticket,
                acronym: acronym.to_string(),
            }],
        }
    }

    pub fn acronym(&self) -> &str {
        &self.acronym
    }

    pub fn conference(&self) -> Option<&ConferenceRow> {
        self.conference.as_ref()
    }

    pub fn grid(&self) -> &GridCursor {
        &self.grid
    }

    pub fn load_state(&self) -> &LoadSlot {
        &self.load
    }

    pub fn complete(&mut self, ticket: Ticket, result: Result<ConferenceRow>) {
        if let Some(conference) = self.load.finish(ticket, result) {
            self.grid.reset(conference.lectures().len());
            self.conference = Some(conference);
        }
    }

    fn lectures(&self) -> &[Lecture] {
        self.conference.as_ref().map(|c| c.lectures()).unwrap_or(&[])
    }
}

impl KeyHandler for ConferenceView {
    fn handle_key(&mut self, key: RemoteKey) -> HandleResult {
        let step = match key {
            RemoteKey::Back => return HandleResult::Close,
            RemoteKey::Enter if !self.lectures().is_empty() => return HandleResult::Activate,
            RemoteKey::Left if self.lectures().is_empty() => return HandleResult::LeftEdge,
            RemoteKey::Right => self.grid.right(),
            RemoteKey::Left => self.grid.left(),
            RemoteKey::Down => self.grid.down_or_last(),
            RemoteKey::Up => self.grid.up_or_first(),
            _ => return HandleResult::NotHandled,
        };
        match step {
            GridMove::LeftEdge => HandleResult::LeftEdge,
            _ => HandleResult::Handled,
        }
    }
}

impl ContentView for ConferenceView {
    fn activation(&self) -> Option<Activation> {
        let conference = self.conference.as_ref()?;
        conference
            .lectures()
            .get(self.grid.index())
            .map(|lecture| Activation::Play {
                lecture: lecture.clone(),
                conference_title: Some(conference.title.clone()),
            })
    }

    fn take_requests(&mut self) -> Vec<ViewRequest> {
        std::mem::take(&mut self.requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LectureNodes;

    fn loaded(lectures: usize) -> ConferenceView {
        let mut view = ConferenceView::open("38c3", 4);
        let Some(ViewRequest::LoadConference { ticket, acronym }) = view.take_requests().pop()
        else {
            panic!("expected conference load");
        };
        assert_eq!(acronym, "38c3");
        view.complete(
            ticket,
            Ok(ConferenceRow {
                id: "38c3".into(),
                title: "38C3".into(),
                lectures: LectureNodes {
                    nodes: (0..lectures)
                        .map(|i| Lecture {
                            guid: format!("t{i}"),
                            title: format!("Talk {i}"),
                            ..Default::default()
                        })
                        .collect(),
                },
                ..Default::default()
            }),
        );
        view
    }

    #[test]
    fn test_grid_movement() {
        let mut view = loaded(10);
        view.handle_key(RemoteKey::Down);
        assert_eq!(view.grid().index(), 4);
        view.handle_key(RemoteKey::Down);
        view.handle_key(RemoteKey::Down);
        assert_eq!(view.grid().index(), 9);
        view.handle_key(RemoteKey::Right);
        assert_eq!(view.grid().index(), 0);
        view.handle_key(RemoteKey::Up);
        assert_eq!(view.grid().index(), 0);
    }

    #[test]
    fn test_left_at_column_zero_goes_to_sidebar() {
        let mut view = loaded(10);
        view.handle_key(RemoteKey::Right);
        assert_eq!(view.handle_key(RemoteKey::Left), HandleResult::Handled);
        assert_eq!(view.handle_key(RemoteKey::Left), HandleResult::LeftEdge);
    }

    #[test]
    fn test_enter_plays_with_conference_title() {
        let mut view = loaded(3);
        view.handle_key(RemoteKey::Right);
        assert_eq!(view.handle_key(RemoteKey::Enter), HandleResult::Activate);
        assert_eq!(
            view.activation(),
            Some(Activation::Play {
                lecture: view.lectures()[1].clone(),
                conference_title: Some("38C3".to_string()),
            })
        );
    }

    #[test]
    fn test_back_closes_while_loading() {
        let mut view = ConferenceView::open("camp2023", 4);
        assert!(view.load_state().is_loading());
        assert_eq!(view.handle_key(RemoteKey::Enter), HandleResult::NotHandled);
        assert_eq!(view.handle_key(RemoteKey::Back), HandleResult::Close);
    }

    #[test]
    fn test_reopened_view_ignores_earlier_load() {
        let mut slow = ConferenceView::open("slow", 4);
        let Some(ViewRequest::LoadConference { ticket, .. }) = slow.take_requests().pop() else {
            panic!("expected conference load");
        };

        let mut fast = ConferenceView::open("fast", 4);
        fast.complete(
            ticket,
            Ok(ConferenceRow {
                id: "slow".into(),
                ..Default::default()
            }),
        );
        assert!(fast.conference().is_none());
        assert!(fast.load_state().is_loading());
    }
}
