//! Snapshot reconciliation.
//!
//! Turns a full snapshot of the posts collection into an ordered list of
//! [`Post`] view-models. Reconciliation is pure and total: missing or
//! mistyped optional fields fall back to their empty value, and only records
//! that are not objects at all are left out (and reported in
//! [`FeedView::skipped`]).

use board_core::{Comment, Identity, Post, PostId, SortOrder, UserId};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The ordered feed produced from one snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedView {
    pub posts: Vec<Post>,
    pub sort: SortOrder,
    /// Keys whose records could not be materialized.
    pub skipped: Vec<PostId>,
}

impl FeedView {
    pub fn empty(sort: SortOrder) -> Self {
        Self {
            posts: Vec::new(),
            sort,
            skipped: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == *id)
    }

    pub fn ids(&self) -> Vec<PostId> {
        self.posts.iter().map(|post| post.id.clone()).collect()
    }
}

/// Builds the feed for `snapshot` ordered by `sort`.
///
/// `viewer` is the identity live at reconcile time; it only affects
/// `liked_by_me`. Posts with equal timestamps keep snapshot order.
pub fn reconcile(snapshot: &Value, sort: SortOrder, viewer: Option<&Identity>) -> FeedView {
    let mut view = FeedView::empty(sort);
    let Some(records) = snapshot.as_object() else {
        return view;
    };

    for (key, record) in records {
        match materialize(key, record, viewer) {
            Some(post) => view.posts.push(post),
            None => view.skipped.push(PostId::from(key.as_str())),
        }
    }

    match sort {
        SortOrder::Oldest => view.posts.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::Newest => view.posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
    view
}

/// Materializes one raw record. Returns `None` if it is not an object.
pub fn materialize(key: &str, record: &Value, viewer: Option<&Identity>) -> Option<Post> {
    let fields = record.as_object()?;

    let likes: BTreeMap<UserId, bool> = fields
        .get("likes")
        .and_then(Value::as_object)
        .map(|likes| {
            likes
                .iter()
                .map(|(uid, v)| (UserId::from(uid.as_str()), v.as_bool().unwrap_or(true)))
                .collect()
        })
        .unwrap_or_default();

    let comments = fields
        .get("comments")
        .and_then(Value::as_object)
        .map(|comments| comments.values().filter_map(comment).collect())
        .unwrap_or_default();

    let hashtags = fields
        .get("hashtags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let liked_by_me = viewer.is_some_and(|identity| likes.contains_key(&identity.id));

    Some(Post {
        id: PostId::from(key),
        author: string(fields, "author").unwrap_or_default(),
        owner: string(fields, "userId").map(UserId::from),
        content: string(fields, "content").unwrap_or_default(),
        image_url: string(fields, "imageUrl").filter(|url| !url.is_empty()),
        hashtags,
        created_at: fields.get("timestamp").and_then(millis).unwrap_or(0),
        updated_at: fields.get("updatedAt").and_then(millis),
        like_count: likes.len(),
        liked_by_me,
        likes,
        comments,
    })
}

fn comment(raw: &Value) -> Option<Comment> {
    let fields = raw.as_object()?;
    Some(Comment {
        user: string(fields, "user").unwrap_or_default(),
        text: string(fields, "text").unwrap_or_default(),
        timestamp: fields.get("timestamp").and_then(millis).unwrap_or(0),
    })
}

fn string(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields.get(name).and_then(Value::as_str).map(str::to_string)
}

fn millis(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
}
