//! In-memory repository implementations.
//!
//! Used as the fallback when no database is configured, and as the backing
//! store for handler tests. Note: data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::{Comment, Post, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};

/// In-memory post store behind an async RwLock.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        self.store.write().await.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_published(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut posts: Vec<Post> = store
            .values()
            .filter(|p| p.is_published_at(now))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts)
    }

    async fn list_drafts(&self) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut posts: Vec<Post> = store.values().filter(|p| p.is_draft()).cloned().collect();
        posts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(posts)
    }
}

/// In-memory comment store behind an async RwLock.
#[derive(Default)]
pub struct InMemoryCommentRepository {
    store: RwLock<HashMap<Uuid, Comment>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: Comment) -> Result<Comment, RepoError> {
        self.store.write().await.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let store = self.store.read().await;
        let mut comments: Vec<Comment> = store
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn delete_by_post(&self, post_id: Uuid) -> Result<(), RepoError> {
        self.store.write().await.retain(|_, c| c.post_id != post_id);
        Ok(())
    }
}

/// In-memory user store behind an async RwLock.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        self.store.write().await.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn post_published_at(offset_minutes: i64) -> Post {
        let mut post = Post::new(Uuid::new_v4(), "Title".into(), "Body".into());
        post.published_at = Some(Utc::now() + TimeDelta::minutes(offset_minutes));
        post
    }

    #[tokio::test]
    async fn published_listing_excludes_drafts_and_future_posts() {
        let repo = InMemoryPostRepository::new();
        let draft = Post::new(Uuid::new_v4(), "Draft".into(), "Body".into());
        let future = post_published_at(60);
        let live = post_published_at(-60);

        repo.save(draft).await.unwrap();
        repo.save(future).await.unwrap();
        repo.save(live.clone()).await.unwrap();

        let listed = repo.list_published(Utc::now()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, live.id);
    }

    #[tokio::test]
    async fn published_listing_is_newest_first() {
        let repo = InMemoryPostRepository::new();
        let older = post_published_at(-120);
        let newer = post_published_at(-10);
        let middle = post_published_at(-60);

        repo.save(older.clone()).await.unwrap();
        repo.save(newer.clone()).await.unwrap();
        repo.save(middle.clone()).await.unwrap();

        let listed = repo.list_published(Utc::now()).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![newer.id, middle.id, older.id]);
    }

    #[tokio::test]
    async fn drafts_are_oldest_first_and_exclude_published() {
        let repo = InMemoryPostRepository::new();

        let mut first = Post::new(Uuid::new_v4(), "First".into(), "Body".into());
        first.created_at = Utc::now() - TimeDelta::hours(2);
        let mut second = Post::new(Uuid::new_v4(), "Second".into(), "Body".into());
        second.created_at = Utc::now() - TimeDelta::hours(1);
        let published = post_published_at(-5);

        repo.save(second.clone()).await.unwrap();
        repo.save(first.clone()).await.unwrap();
        repo.save(published).await.unwrap();

        let drafts = repo.list_drafts().await.unwrap();
        let ids: Vec<Uuid> = drafts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn published_draft_appears_exactly_once_at_the_top() {
        let repo = InMemoryPostRepository::new();
        let older = post_published_at(-60);
        repo.save(older).await.unwrap();

        let mut post = Post::new(Uuid::new_v4(), "Fresh".into(), "Body".into());
        repo.save(post.clone()).await.unwrap();
        assert!(repo.list_published(Utc::now()).await.unwrap().len() == 1);

        post.publish();
        repo.save(post.clone()).await.unwrap();

        let listed = repo.list_published(Utc::now()).await.unwrap();
        let matching: Vec<_> = listed.iter().filter(|p| p.id == post.id).collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(listed[0].id, post.id);
    }

    #[tokio::test]
    async fn delete_missing_post_is_not_found() {
        let repo = InMemoryPostRepository::new();
        let result = repo.delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn comments_for_post_are_oldest_first() {
        let repo = InMemoryCommentRepository::new();
        let post_id = Uuid::new_v4();

        let mut early = Comment::new(post_id, "ada".into(), "First!".into());
        early.created_at = Utc::now() - TimeDelta::minutes(10);
        let late = Comment::new(post_id, "bob".into(), "Second".into());
        let elsewhere = Comment::new(Uuid::new_v4(), "eve".into(), "Other".into());

        repo.save(late.clone()).await.unwrap();
        repo.save(early.clone()).await.unwrap();
        repo.save(elsewhere).await.unwrap();

        let comments = repo.find_by_post(post_id).await.unwrap();
        let ids: Vec<Uuid> = comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![early.id, late.id]);
    }

    #[tokio::test]
    async fn delete_by_post_removes_the_whole_thread() {
        let repo = InMemoryCommentRepository::new();
        let post_id = Uuid::new_v4();

        repo.save(Comment::new(post_id, "ada".into(), "One".into()))
            .await
            .unwrap();
        repo.save(Comment::new(post_id, "bob".into(), "Two".into()))
            .await
            .unwrap();
        let kept = Comment::new(Uuid::new_v4(), "eve".into(), "Other".into());
        repo.save(kept.clone()).await.unwrap();

        repo.delete_by_post(post_id).await.unwrap();

        assert!(repo.find_by_post(post_id).await.unwrap().is_empty());
        assert!(repo.find_by_id(kept.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn user_lookup_by_email() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("author@example.com".into(), "hash".into());
        repo.save(user.clone()).await.unwrap();

        let found = repo.find_by_email("author@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }
}
