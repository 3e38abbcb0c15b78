//! Listener lifecycle tests.
//!
//! Rules covered:
//! - At most one listener is attached, however often subscribe is called
//! - Unsubscribing twice is the same as once
//! - Dropping the manager detaches its listener
//! - Every snapshot rebuilds the whole feed
//! - Writes outside the posts collection do not trigger a re-render
//! - A snapshot that leaves the view unchanged is not re-published
//! - Changing the sort order re-publishes the feed in the new order
//! - "Liked by me" follows the session live at reconcile time

use super::*;
use crate::FeedStatus;
use board_core::PostId;

#[tokio::test]
async fn subscribe_twice_keeps_one_listener() {
    let h = harness(SortOrder::Newest);
    h.feed.subscribe(SortOrder::Newest).await.unwrap();
    h.feed.subscribe(SortOrder::Oldest).await.unwrap();
    h.feed.resubscribe().await.unwrap();

    assert_eq!(h.db.listener_count(POSTS_PATH), 1);
    assert_eq!(h.feed.sort(), SortOrder::Oldest);
}

#[tokio::test]
async fn unsubscribe_is_idempotent() {
    let h = harness(SortOrder::Newest);
    h.feed.subscribe(SortOrder::Newest).await.unwrap();

    h.feed.unsubscribe().await;
    let after_once = (h.db.total_listeners(), h.feed.state().status);
    h.feed.unsubscribe().await;
    let after_twice = (h.db.total_listeners(), h.feed.state().status);

    assert_eq!(after_once, after_twice);
    assert_eq!(after_twice, (0, FeedStatus::Idle));
    assert!(!h.feed.is_subscribed().await);
}

#[tokio::test]
async fn drop_detaches_listener() {
    let h = harness(SortOrder::Newest);
    h.feed.subscribe(SortOrder::Newest).await.unwrap();
    assert_eq!(h.db.total_listeners(), 1);

    let db = h.db.clone();
    drop(h);
    assert_eq!(db.total_listeners(), 0);
}

#[tokio::test]
async fn snapshots_rebuild_the_feed() {
    let h = harness(SortOrder::Oldest);
    let mut rx = h.feed.watch();
    h.feed.subscribe(SortOrder::Oldest).await.unwrap();
    wait_for(&mut rx, |s| s.status == FeedStatus::Live).await;

    seed(&h.db, "a", record("first", "alice", 1)).await;
    seed(&h.db, "b", record("second", "bob", 2)).await;
    let state = wait_for(&mut rx, |s| s.view.len() == 2).await;
    assert_eq!(state.view.ids(), vec![PostId::from("a"), PostId::from("b")]);

    h.db.remove(&format!("{POSTS_PATH}/a")).await.unwrap();
    let state = wait_for(&mut rx, |s| s.view.len() == 1).await;
    assert_eq!(state.view.ids(), vec![PostId::from("b")]);
}

#[tokio::test]
async fn loading_until_first_snapshot() {
    let h = harness(SortOrder::Newest);
    let mut rx = h.feed.watch();
    assert_eq!(h.feed.state().status, FeedStatus::Idle);

    h.feed.subscribe(SortOrder::Newest).await.unwrap();
    // The initial snapshot is queued but the listener task has not run yet.
    assert!(h.feed.state().is_loading());

    let state = wait_for(&mut rx, |s| s.status == FeedStatus::Live).await;
    assert!(state.view.is_empty());
}

#[tokio::test]
async fn unrelated_writes_do_not_rerender() {
    let h = harness(SortOrder::Newest);
    let mut rx = h.feed.watch();
    seed(&h.db, "a", record("hello", "alice", 1)).await;
    h.feed.subscribe(SortOrder::Newest).await.unwrap();
    let first = wait_for(&mut rx, |s| s.view.len() == 1).await;

    // A notification write does not touch posts; a post write does.
    h.db.push("notifications", json!({"x": 1})).await.unwrap();
    h.db.set(&format!("{POSTS_PATH}/a/content"), json!("hello again"))
        .await
        .unwrap();
    let second = wait_for(&mut rx, |s| {
        s.view.posts.first().map(|p| p.content.as_str()) == Some("hello again")
    })
    .await;
    assert_eq!(second.renders, first.renders + 1);
}

#[tokio::test]
async fn ignored_fields_do_not_rerender() {
    let h = harness(SortOrder::Newest);
    let mut rx = h.feed.watch();
    seed(&h.db, "a", record("hello", "alice", 1)).await;
    h.feed.subscribe(SortOrder::Newest).await.unwrap();
    let first = wait_for(&mut rx, |s| s.view.len() == 1).await;

    // The listener sees this snapshot, but the view it builds is unchanged.
    h.db.set(&format!("{POSTS_PATH}/a/extra"), json!("not rendered"))
        .await
        .unwrap();
    seed(&h.db, "b", record("second", "bob", 2)).await;

    let second = wait_for(&mut rx, |s| s.view.len() == 2).await;
    assert_eq!(second.renders, first.renders + 1);
}

#[tokio::test]
async fn set_sort_republishes_in_new_order() {
    let h = harness(SortOrder::Newest);
    let mut rx = h.feed.watch();
    seed(&h.db, "a", record("first", "alice", 1)).await;
    seed(&h.db, "b", record("second", "bob", 2)).await;
    h.feed.subscribe(SortOrder::Newest).await.unwrap();
    let state = wait_for(&mut rx, |s| s.view.len() == 2).await;
    assert_eq!(state.view.ids(), vec![PostId::from("b"), PostId::from("a")]);

    h.feed.set_sort(SortOrder::Oldest).await.unwrap();
    let state = wait_for(&mut rx, |s| {
        s.status == FeedStatus::Live && s.view.sort == SortOrder::Oldest
    })
    .await;
    assert_eq!(state.view.ids(), vec![PostId::from("a"), PostId::from("b")]);
    assert_eq!(h.db.listener_count(POSTS_PATH), 1);
}

#[tokio::test]
async fn liked_by_me_follows_live_session() {
    let h = harness(SortOrder::Newest);
    let mut rx = h.feed.watch();
    let mut post = record("likeable", "alice", 1);
    post["likes"] = json!({"bob": true});
    seed(&h.db, "a", post).await;

    h.session.replace(Some(alice()));
    h.feed.subscribe(SortOrder::Newest).await.unwrap();
    let state = wait_for(&mut rx, |s| s.view.len() == 1).await;
    assert!(!state.view.posts[0].liked_by_me);
    assert_eq!(state.view.posts[0].like_count, 1);

    h.session.replace(Some(bob()));
    h.feed.resubscribe().await.unwrap();
    let state = wait_for(&mut rx, |s| {
        s.status == FeedStatus::Live && s.view.posts.first().is_some_and(|p| p.liked_by_me)
    })
    .await;
    assert_eq!(state.view.posts[0].like_count, 1);
}

#[tokio::test]
async fn hashtag_filter_is_one_shot() {
    let h = harness(SortOrder::Newest);
    seed(&h.db, "a", record("#Rust is nice", "alice", 1)).await;
    seed(&h.db, "b", record("no tags", "bob", 2)).await;
    seed(&h.db, "c", record("more #rust #async", "bob", 3)).await;

    let view = h.feed.filter_by_hashtag("Rust").await.unwrap();
    assert_eq!(view.ids(), vec![PostId::from("c"), PostId::from("a")]);
    assert_eq!(h.db.total_listeners(), 0);
    assert_eq!(h.db.read_count(), 1);
}
