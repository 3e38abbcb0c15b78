//! Post creation.
//!
//! Rules covered:
//! - A created post comes back through the live feed with its content and hashtags
//! - Invalid input and a missing session never reach the backend
//! - Content of exactly the maximum length is accepted, one more is not
//! - An image is uploaded before the post is written
//! - A failed upload leaves no post behind
//! - The post form is cleared only on success

use super::*;
use crate::MutationError;
use board_backend::memory::DbOp;
use board_backend::BackendError;
use board_core::{extract_hashtags, LocalFile, SortOrder, ValidationError};
use feed_sync::{FeedStatus, FeedSubscriptionManager};
use std::time::Duration;

#[tokio::test]
async fn created_post_round_trips_through_feed() {
    let h = harness();
    h.sign_in(&alice());
    let feed = FeedSubscriptionManager::new(
        h.backend.database.clone(),
        h.session.clone(),
        h.notices.clone(),
        SortOrder::Newest,
    );
    let mut rx = feed.watch();
    feed.subscribe(SortOrder::Newest).await.unwrap();

    let content = "Shipping #Rust today #rust";
    let id = h.coordinator.create_post(content, None).await.unwrap();

    let state = tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| s.status == FeedStatus::Live && s.view.len() == 1),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();

    let post = state.view.get(&id).unwrap();
    assert_eq!(post.content, content);
    assert_eq!(post.hashtags, extract_hashtags(content));
    assert_eq!(post.image_url, None);
    assert_eq!(post.author, "alice@example.com");
    assert_eq!(post.owner, Some(alice().id));
    assert!(post.created_at > 0);
    assert!(!post.is_edited());
    assert_eq!(h.last_notice(), "Post published");
}

#[tokio::test]
async fn empty_content_rejected_without_network() {
    let h = harness();
    h.sign_in(&alice());

    for content in ["", "   ", "\n\t"] {
        let err = h.coordinator.create_post(content, None).await.unwrap_err();
        assert_eq!(err, MutationError::Validation(ValidationError::EmptyContent));
    }
    assert_eq!(h.backend.database.write_count(), 0);
    assert_eq!(h.backend.storage.upload_count(), 0);
    assert_eq!(h.last_notice(), "Please enter some content");
}

#[tokio::test]
async fn signed_out_create_is_rejected() {
    let h = harness();
    let err = h.coordinator.create_post("hello", None).await.unwrap_err();
    assert_eq!(err, MutationError::NotLoggedIn);
    assert_eq!(h.backend.database.write_count(), 0);
}

#[tokio::test]
async fn content_length_boundary() {
    let h = harness();
    h.sign_in(&alice());

    let exactly = "a".repeat(1000);
    let id = h.coordinator.create_post(&exactly, None).await.unwrap();
    assert_eq!(h.stored(&id).unwrap()["content"], exactly.as_str());

    let over = "a".repeat(1001);
    let err = h.coordinator.create_post(&over, None).await.unwrap_err();
    assert_eq!(
        err,
        MutationError::Validation(ValidationError::ContentTooLong { len: 1001, max: 1000 })
    );
    assert_eq!(h.backend.database.write_count(), 1);
}

#[tokio::test]
async fn image_is_uploaded_first() {
    let h = harness();
    h.sign_in(&alice());

    let image = LocalFile::new("cat.png", vec![0xCA, 0xFE]);
    let id = h.coordinator.create_post("look", Some(image)).await.unwrap();

    let url = h.stored(&id).unwrap()["imageUrl"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(url.starts_with("memory://storage/images/"));
    assert!(url.ends_with("_cat.png"));
    let path = url.trim_start_matches("memory://storage/");
    assert_eq!(h.backend.storage.object(path), Some(vec![0xCA, 0xFE]));
}

#[tokio::test]
async fn failed_upload_aborts_post() {
    let h = harness();
    h.sign_in(&alice());
    h.coordinator.drafts().set_post_content("look");
    h.coordinator
        .drafts()
        .set_image(Some(LocalFile::new("cat.png", vec![1])));
    h.backend
        .storage
        .fail_next_upload(BackendError::Upload("quota exceeded".into()));

    let err = h.coordinator.submit_post().await.unwrap_err();
    assert!(matches!(err, MutationError::Upload(_)));
    assert_eq!(h.backend.database.write_count(), 0);
    assert!(h.last_notice().starts_with("Failed to post"));
    assert_eq!(h.coordinator.drafts().post_content(), "look");
    assert!(h.coordinator.drafts().image().is_some());
}

#[tokio::test]
async fn submit_clears_form_on_success() {
    let h = harness();
    h.sign_in(&alice());
    h.coordinator.drafts().set_post_content("hi #there");
    h.coordinator
        .drafts()
        .set_image(Some(LocalFile::new("a.png", vec![1])));

    let id = h.coordinator.submit_post().await.unwrap();
    let stored = h.stored(&id).unwrap();
    assert_eq!(stored["hashtags"], serde_json::json!(["#there"]));
    assert_eq!(h.coordinator.drafts().post_content(), "");
    assert!(h.coordinator.drafts().image().is_none());
}

#[tokio::test]
async fn backend_rejection_keeps_draft() {
    let h = harness();
    h.sign_in(&alice());
    h.coordinator.drafts().set_post_content("hello");
    h.backend
        .database
        .fail_next(DbOp::Push, BackendError::PermissionDenied("posts".into()));

    let err = h.coordinator.submit_post().await.unwrap_err();
    assert!(matches!(err, MutationError::Backend { .. }));
    assert_eq!(h.coordinator.drafts().post_content(), "hello");
    assert!(h.notices.current().unwrap().is_error());
}
