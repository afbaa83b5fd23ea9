use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog post. `published_at = None` means draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a new draft post.
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            created_at: Utc::now(),
            published_at: None,
        }
    }

    /// Stamp the post with the current time, making it publicly visible.
    /// Publishing again re-stamps; the field never reverts to `None`.
    pub fn publish(&mut self) {
        self.published_at = Some(Utc::now());
    }

    pub fn is_draft(&self) -> bool {
        self.published_at.is_none()
    }

    /// Whether the post is visible in the public listing at `now`.
    pub fn is_published_at(&self, now: DateTime<Utc>) -> bool {
        self.published_at.map(|p| p <= now).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_is_draft() {
        let post = Post::new(Uuid::new_v4(), "Title".into(), "Body".into());
        assert!(post.is_draft());
        assert!(!post.is_published_at(Utc::now()));
    }

    #[test]
    fn publish_stamps_current_time() {
        let mut post = Post::new(Uuid::new_v4(), "Title".into(), "Body".into());
        post.publish();

        let stamp = post.published_at.expect("publish must set the timestamp");
        assert!(stamp <= Utc::now());
        assert!(post.is_published_at(Utc::now()));
    }

    #[test]
    fn publish_twice_keeps_latest_stamp() {
        let mut post = Post::new(Uuid::new_v4(), "Title".into(), "Body".into());
        post.publish();
        let first = post.published_at.unwrap();

        post.publish();
        let second = post.published_at.expect("must never revert to draft");
        assert!(second >= first);
    }

    #[test]
    fn future_publish_date_is_not_visible_yet() {
        let mut post = Post::new(Uuid::new_v4(), "Title".into(), "Body".into());
        let now = Utc::now();
        post.published_at = Some(now + chrono::TimeDelta::hours(1));

        assert!(!post.is_published_at(now));
        assert!(!post.is_draft());
    }
}
