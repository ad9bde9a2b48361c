mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use ccctv::MemoryStore;
use ccctv::focus::Region;
use ccctv::router::View;
use common::{ScriptedSource, TestApp, conferences};

#[tokio::test(start_paused = true)]
async fn test_home_failure_shows_error_and_keeps_navigation() {
    let source = Arc::new(ScriptedSource::new(conferences(4, 3)).failing_pages());
    let mut t = TestApp::with_source(source.clone(), MemoryStore::shared()).await;

    let pages = t.app.views().home.pages();
    assert_eq!(pages.total_fetched(), 0);
    assert!(!pages.is_loading_initial());
    assert!(pages.last_error().unwrap().contains("HTTP 503"));
    assert!(t.app.snapshot().to_string().contains("HTTP 503"));

    // Nothing to focus, Left still reaches the sidebar
    t.press("ArrowLeft").await;
    assert_eq!(t.app.effective_region(), Region::Sidebar);

    t.open_menu("Popular").await;
    assert_eq!(*t.app.router().current(), View::Popular);
    assert!(t.app.views().popular.load_state().error().is_some());

    t.open_menu("Events").await;
    assert_eq!(*t.app.router().current(), View::Events);
    assert_eq!(t.app.views().events.conferences().len(), 4);
    assert_eq!(t.app.effective_region(), Region::ContentList);

    // Once the feed answers again, reopening Popular recovers
    source.fail_pages.store(false, Ordering::SeqCst);
    t.open_menu("Popular").await;
    assert!(t.app.views().popular.load_state().error().is_none());
    assert_eq!(t.app.views().popular.lectures().len(), 9);
}

#[tokio::test(start_paused = true)]
async fn test_search_failure_shows_error_inline() {
    let source = Arc::new(ScriptedSource::new(conferences(3, 3)).failing_search());
    let mut t = TestApp::with_source(source, MemoryStore::shared()).await;

    t.open_menu("Search").await;
    t.type_text("talk").await;
    let search = &t.app.views().search;
    assert!(search.error().unwrap().contains("HTTP 500"));
    assert!(!search.is_searching());
    assert!(search.results().is_empty());
    assert!(t.app.snapshot().to_string().contains("error:"));

    // Caret from the end of "talk" to the sidebar
    t.press_n("ArrowLeft", 5).await;
    assert_eq!(t.app.effective_region(), Region::Sidebar);

    t.open_menu("Recent").await;
    assert_eq!(*t.app.router().current(), View::Recent);
    assert_eq!(t.app.views().home.focused().unwrap().1.guid, "conf0-talk0");
}

#[tokio::test(start_paused = true)]
async fn test_late_conference_load_does_not_replace_newer_one() {
    let source = ScriptedSource::new(conferences(3, 4))
        .slow_conference("conf0", Duration::from_secs(10));
    let mut t = TestApp::with_source(Arc::new(source), MemoryStore::shared()).await;

    // Open conf0, give up while it loads, then open conf1
    t.open_menu("Events").await;
    t.press("Enter").await;
    assert_eq!(*t.app.router().current(), View::Conference("conf0".into()));
    assert!(t.app.views().conference.as_ref().unwrap().load_state().is_loading());
    t.press("Escape").await;
    t.press("ArrowDown").await;
    t.press("Enter").await;

    let view = t.app.views().conference.as_ref().unwrap();
    assert_eq!(view.acronym(), "conf1");
    assert_eq!(view.conference().unwrap().title, "Conference 1");

    tokio::time::sleep(Duration::from_secs(15)).await;
    t.app.run_until_idle(common::SETTLE).await;

    let view = t.app.views().conference.as_ref().unwrap();
    assert_eq!(*t.app.router().current(), View::Conference("conf1".into()));
    assert_eq!(view.conference().unwrap().title, "Conference 1");
    assert_eq!(view.conference().unwrap().lectures()[0].guid, "conf1-talk0");
}
