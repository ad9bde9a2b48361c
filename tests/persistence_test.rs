mod common;

use std::sync::Arc;

use ccctv::router::View;
use ccctv::views::settings::{ActionOutcome, SettingsSection};
use ccctv::{FileStore, SharedStore};
use common::{TestApp, conferences};
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> SharedStore {
    Arc::new(FileStore::open(dir.path().join("store.json")).unwrap())
}

#[tokio::test(start_paused = true)]
async fn test_watchlist_and_position_survive_restart() {
    let dir = TempDir::new().unwrap();

    {
        let mut t = TestApp::with_store(conferences(2, 3), open_store(&dir)).await;
        t.press("Enter").await;
        t.press("ArrowUp").await;
        t.press_n("ArrowRight", 3).await;
        t.press("Enter").await;
        t.app.player_mut().unwrap().surface_mut().seek(900.0);
        t.press("Escape").await;
        t.press("Escape").await;
        assert!(t.app.player().is_none());
    }

    let mut t = TestApp::with_store(conferences(2, 3), open_store(&dir)).await;
    t.app.navigate(View::Watchlist);
    let entries = t.app.views().watchlist.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].lecture.guid, "conf0-talk0");

    t.press("Enter").await;
    assert_eq!(t.app.player().unwrap().surface().current_time(), 900.0);
}

#[tokio::test(start_paused = true)]
async fn test_clear_actions_reset_saved_state() {
    let dir = TempDir::new().unwrap();
    let mut t = TestApp::with_store(conferences(2, 3), open_store(&dir)).await;

    // Save a position and a watchlist entry for the first lecture
    t.press("Enter").await;
    t.press("ArrowUp").await;
    t.press_n("ArrowRight", 3).await;
    t.press("Enter").await;
    t.app.player_mut().unwrap().surface_mut().seek(120.0);
    t.press("Escape").await;
    t.press("Escape").await;
    assert_eq!(t.app.views().watchlist.entries().len(), 1);

    t.app.navigate(View::Settings);
    t.press_n("ArrowDown", 20).await;
    assert_eq!(t.app.views().settings.section(), SettingsSection::Actions);

    // Actions: clear cache, then clear watchlist
    t.press("Enter").await;
    assert_eq!(
        t.app.views().settings.last_action(),
        Some(&ActionOutcome::CacheCleared(1))
    );
    t.press("ArrowRight").await;
    t.press("Enter").await;
    assert_eq!(
        t.app.views().settings.last_action(),
        Some(&ActionOutcome::WatchlistCleared)
    );
    assert!(t.app.views().watchlist.entries().is_empty());

    let reopened = open_store(&dir);
    assert!(reopened.keys().is_empty());
}
