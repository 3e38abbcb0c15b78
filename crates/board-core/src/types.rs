//! Core types for the posting board.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable identifier of an authenticated user (assigned by the auth backend).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Creates a user ID from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the user ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque post key assigned by the backend when the post is pushed.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub String);

impl PostId {
    /// Creates a post ID from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the post ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PostId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The signed-in identity as reported by the auth backend.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
}

impl Identity {
    pub fn new(id: impl Into<UserId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}

/// Feed ordering by creation timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first (descending).
    #[default]
    Newest,
    /// Oldest first (ascending).
    Oldest,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
        }
    }

    /// Anything other than `"newest"` sorts oldest-first, like the sort selector.
    pub fn parse_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "newest" | "desc" | "descending" => Self::Newest,
            _ => Self::Oldest,
        }
    }
}

/// A comment attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Commenter display name (their email).
    pub user: String,
    pub text: String,
    pub timestamp: i64,
}

/// A post materialized from a feed snapshot.
///
/// Posts are transient copies: the backend owns the record, and every
/// snapshot produces fresh values. `like_count` and `liked_by_me` are derived
/// from `likes` and the session that was live when the snapshot was reconciled.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    /// Author display name (their email at creation time).
    pub author: String,
    /// Identity that created the post; the only one allowed to edit or delete it.
    pub owner: Option<UserId>,
    pub content: String,
    pub image_url: Option<String>,
    pub hashtags: Vec<String>,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    pub likes: BTreeMap<UserId, bool>,
    pub comments: Vec<Comment>,
    pub like_count: usize,
    pub liked_by_me: bool,
}

impl Post {
    /// Returns true if the post has been edited at least once.
    pub fn is_edited(&self) -> bool {
        self.updated_at.is_some()
    }

    /// Returns true if the post carries the given hashtag.
    pub fn has_hashtag(&self, tag: &str) -> bool {
        self.hashtags.iter().any(|t| t == tag)
    }
}

/// Returns true iff `session` is present and is the post's owner.
pub fn can_mutate(post: &Post, session: Option<&Identity>) -> bool {
    match (session, post.owner.as_ref()) {
        (Some(identity), Some(owner)) => identity.id == *owner,
        _ => false,
    }
}

/// Kind of notification written for a post owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Comment => "comment",
        }
    }
}

/// A notification addressed to a post owner. Write-only from this client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub target: UserId,
    pub kind: NotificationKind,
    pub post_id: PostId,
    pub from: UserId,
    pub from_email: String,
}

/// A file picked by the user for upload alongside a post.
#[derive(Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl std::fmt::Debug for LocalFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}
