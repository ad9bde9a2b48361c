mod common;

use std::time::Duration;

use ccctv::focus::{HandleResult, Region};
use ccctv::player::{ControlRole, PlayerState};
use ccctv::router::View;
use ccctv::store::Watchlist;
use ccctv::types::LectureNodes;
use ccctv::ConferenceRow;
use common::{TestApp, conference, conferences, unplayable};

#[tokio::test(start_paused = true)]
async fn test_enter_opens_player_and_back_twice_closes() {
    let mut t = TestApp::new(conferences(3, 4)).await;

    t.press("ArrowRight").await;
    t.press("Enter").await;
    assert_eq!(t.app.effective_region(), Region::ContentPlayer);
    let player = t.app.player().unwrap();
    assert_eq!(player.lecture().guid, "conf0-talk1");
    assert_eq!(player.lecture().conference_title.as_deref(), Some("Conference 0"));
    assert_eq!(player.controls().state(), PlayerState::Active);

    // First Back only hides the freshly shown controls
    t.press("Escape").await;
    assert_eq!(t.app.player().unwrap().controls().state(), PlayerState::Idle);

    let routed = t.press("Escape").await.unwrap();
    assert_eq!(routed.result, HandleResult::Close);
    assert!(t.app.player().is_none());
    assert_eq!(t.app.effective_region(), Region::ContentList);
    assert_eq!(*t.app.router().current(), View::Recent);
}

#[tokio::test(start_paused = true)]
async fn test_controls_hide_after_inactivity() {
    let mut t = TestApp::new(conferences(2, 2)).await;
    t.press("Enter").await;
    assert!(t.app.player().unwrap().controls().controls_visible());

    tokio::time::sleep(Duration::from_secs(5)).await;
    t.app.run_until_idle(common::SETTLE).await;
    assert_eq!(t.app.player().unwrap().controls().state(), PlayerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_activity_postpones_hiding() {
    let mut t = TestApp::new(conferences(2, 2)).await;
    t.press("Enter").await;

    tokio::time::sleep(Duration::from_secs(3)).await;
    t.press("MediaFastForward").await;
    tokio::time::sleep(Duration::from_secs(2)).await;
    t.app.run_until_idle(common::SETTLE).await;

    // The first timer fired but was superseded by the key press
    assert!(t.app.player().unwrap().controls().controls_visible());
}

#[tokio::test(start_paused = true)]
async fn test_watchlist_button_updates_watchlist_view() {
    let mut t = TestApp::new(conferences(2, 3)).await;
    t.press("Enter").await;

    t.press("ArrowUp").await;
    t.press_n("ArrowRight", 3).await;
    assert_eq!(
        t.app.player().unwrap().controls().focused_role(),
        Some(ControlRole::Watchlist)
    );
    t.press("Enter").await;

    let entries = t.app.views().watchlist.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].lecture.guid, "conf0-talk0");
    assert_eq!(entries[0].lecture.conference_title.as_deref(), Some("Conference 0"));
    assert!(Watchlist::new(t.store.clone()).contains("conf0-talk0"));

    // Buttons focused: Back hides, the second Back closes
    t.press("Escape").await;
    t.press("Escape").await;
    assert!(t.app.player().is_none());

    t.app.navigate(View::Watchlist);
    t.press("Enter").await;
    assert_eq!(t.app.player().unwrap().lecture().guid, "conf0-talk0");
}

#[tokio::test(start_paused = true)]
async fn test_position_resumes_on_reopen() {
    let mut t = TestApp::new(conferences(2, 2)).await;
    t.press("Enter").await;
    t.app.player_mut().unwrap().surface_mut().seek(600.0);

    t.press("Escape").await;
    t.press("Escape").await;
    assert!(t.app.player().is_none());

    t.press("Enter").await;
    let player = t.app.player().unwrap();
    assert_eq!(player.surface().current_time(), 600.0);
}

#[tokio::test(start_paused = true)]
async fn test_unplayable_lecture_leaves_focus_on_list() {
    let rows = vec![
        ConferenceRow {
            id: "slides".into(),
            title: "Slides".into(),
            lectures: LectureNodes {
                nodes: vec![unplayable("slides-only")],
            },
            ..Default::default()
        },
        conference(1, 2),
    ];
    let mut t = TestApp::new(rows).await;

    t.press("Enter").await;
    assert!(t.app.player().is_none());
    assert_eq!(t.app.effective_region(), Region::ContentList);
    assert!(t.app.notice().unwrap().contains("slides-only"));

    // The surface was handed back, so the next lecture still plays
    t.press("ArrowDown").await;
    t.press("Enter").await;
    assert_eq!(t.app.player().unwrap().lecture().guid, "conf1-talk0");
    assert!(t.app.notice().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_stop_key_acts_like_back() {
    let mut t = TestApp::new(conferences(2, 2)).await;
    t.press("Enter").await;

    t.press("MediaStop").await;
    t.press("MediaStop").await;
    assert!(t.app.player().is_none());
}
