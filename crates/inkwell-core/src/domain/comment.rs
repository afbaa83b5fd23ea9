use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - reader feedback attached to a post.
///
/// Comments start out unapproved; moderation flips the flag or deletes the
/// row. The approval state is tracked here, display filtering is left to the
/// presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub approved: bool,
}

impl Comment {
    /// Create a new, unapproved comment on a post.
    pub fn new(post_id: Uuid, author: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author,
            content,
            created_at: Utc::now(),
            approved: false,
        }
    }

    /// Mark the comment as fit for display. Idempotent.
    pub fn approve(&mut self) {
        self.approved = true;
    }
}
