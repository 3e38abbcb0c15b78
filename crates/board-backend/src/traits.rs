//! Backend collaborator contracts.
//!
//! The client never talks to a concrete backend directly. Everything goes
//! through these traits so the realtime database, blob storage and auth
//! provider can be swapped (the in-memory backend in [`crate::memory`] is
//! what tests and the demo use).

use async_trait::async_trait;
use board_core::Identity;
use serde_json::{Map, Value};
use tokio::sync::{mpsc, watch};

use crate::BackendResult;
use crate::BackendError;

/// Identifier of an attached value listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// An event delivered to a value listener.
#[derive(Debug, Clone, PartialEq)]
pub enum ListenEvent {
    /// Full value at the listened path. `Value::Null` means nothing is stored.
    Snapshot(Value),
    /// The backend cancelled the listener. No further events follow.
    Cancelled(BackendError),
}

/// A live value listener.
///
/// The first event is the current value; after that, one snapshot per write
/// that touches the listened path. The listener stays attached until
/// [`Database::detach`] is called with its id.
#[derive(Debug)]
pub struct Listener {
    pub id: ListenerId,
    pub events: mpsc::UnboundedReceiver<ListenEvent>,
}

/// Realtime tree database.
///
/// Paths are slash-separated (`posts/<key>/likes/<uid>`). Values may contain
/// [`crate::ServerValue::timestamp`] sentinels anywhere; the backend resolves
/// them on write.
#[async_trait]
pub trait Database: Send + Sync {
    /// Appends `value` under a new time-ordered child key of `path` and
    /// returns the key.
    async fn push(&self, path: &str, value: Value) -> BackendResult<String>;

    /// Replaces the value at `path`. Setting `Value::Null` removes it.
    async fn set(&self, path: &str, value: Value) -> BackendResult<()>;

    /// Sets each child of `path` named in `fields`, leaving the others alone.
    async fn update(&self, path: &str, fields: Map<String, Value>) -> BackendResult<()>;

    /// Removes the value at `path` and everything below it.
    async fn remove(&self, path: &str) -> BackendResult<()>;

    /// One-shot read.
    async fn get(&self, path: &str) -> BackendResult<Option<Value>>;

    /// Attaches a value listener to `path`.
    async fn listen(&self, path: &str) -> BackendResult<Listener>;

    /// Detaches a listener. Detaching an unknown id is a no-op.
    fn detach(&self, id: ListenerId);
}

/// Blob storage with public download URLs.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Stores `bytes` at `path` and returns the object's public URL.
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> BackendResult<String>;
}

/// Email/password authentication provider.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Identity>;

    /// Creates an account and signs it in.
    async fn sign_up(&self, email: &str, password: &str) -> BackendResult<Identity>;

    async fn sign_out(&self) -> BackendResult<()>;

    /// Auth-state stream. Holds the current identity and changes every time
    /// the provider signs someone in or out.
    fn auth_state(&self) -> watch::Receiver<Option<Identity>>;
}
