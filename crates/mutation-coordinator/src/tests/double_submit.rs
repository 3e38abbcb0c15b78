//! In-flight controls.
//!
//! Rules covered:
//! - A second submit while the first is in flight is rejected locally
//! - Controls come back after success and after failure
//! - Controls are per post for comments, edits and deletes

use super::*;
use crate::MutationError;
use board_backend::memory::DbOp;
use board_backend::BackendError;
use board_core::Control;
use std::time::Duration;

#[tokio::test]
async fn double_post_submit_rejected() {
    let h = harness();
    h.sign_in(&alice());
    h.backend.database.set_latency(Duration::from_millis(20));

    let first = {
        let coordinator = h.coordinator.clone();
        tokio::spawn(async move { coordinator.create_post("once", None).await })
    };
    tokio::task::yield_now().await;
    assert!(!h.coordinator.controls().is_enabled(&Control::PostButton));

    let second = h.coordinator.create_post("once", None).await;
    assert_eq!(second, Err(MutationError::AlreadyInFlight));

    first.await.unwrap().unwrap();
    assert!(h.coordinator.controls().is_enabled(&Control::PostButton));
    assert_eq!(h.backend.database.write_count(), 1);
}

#[tokio::test]
async fn control_re_enabled_after_failure() {
    let h = harness();
    h.sign_in(&alice());
    h.backend
        .database
        .fail_next(DbOp::Push, BackendError::Network("offline".into()));

    assert!(h.coordinator.create_post("try", None).await.is_err());
    assert_eq!(h.coordinator.controls().in_flight(), 0);

    h.coordinator.create_post("again", None).await.unwrap();
}

#[tokio::test]
async fn comment_controls_are_per_post() {
    let h = harness();
    h.sign_in(&alice());
    let a = h.coordinator.create_post("a", None).await.unwrap();
    let b = h.coordinator.create_post("b", None).await.unwrap();
    h.backend.database.set_latency(Duration::from_millis(20));

    let pending = {
        let coordinator = h.coordinator.clone();
        let a = a.clone();
        tokio::spawn(async move { coordinator.add_comment(&a, "first").await })
    };
    tokio::task::yield_now().await;

    assert_eq!(
        h.coordinator.add_comment(&a, "again").await,
        Err(MutationError::AlreadyInFlight)
    );
    h.coordinator.add_comment(&b, "elsewhere").await.unwrap();
    pending.await.unwrap().unwrap();

    assert!(h.coordinator.controls().is_enabled(&Control::CommentSubmit(a)));
}

#[tokio::test]
async fn rejected_input_never_disables_control() {
    let h = harness();
    h.sign_in(&alice());
    let _ = h.coordinator.create_post("", None).await;
    let _ = h.coordinator.create_post(&"x".repeat(1001), None).await;
    assert_eq!(h.coordinator.controls().in_flight(), 0);
}
