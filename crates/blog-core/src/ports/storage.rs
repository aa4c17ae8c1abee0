//! Storage traits for persistence
//!
//! Backends translate their native failures into [`crate::BlogError`]:
//! a uniqueness violation is `Conflict`, a dangling reference is `NotFound`.

use crate::Result;
use async_trait::async_trait;
use blog_types::{
    NewPost, NewProfile, NewUser, Post, PostChanges, PostId, Profile, User, UserId,
};

/// Post store
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts, newest first
    async fn list_posts(&self) -> Result<Vec<Post>>;
    async fn list_posts_by_author(&self, author_id: UserId) -> Result<Vec<Post>>;
    async fn get_post(&self, id: PostId) -> Result<Option<Post>>;
    /// Fails with `NotFound` when `author_id` names no user
    async fn create_post(&self, post: NewPost) -> Result<Post>;
    /// Returns `None` when no post has this id
    async fn update_post(&self, id: PostId, changes: PostChanges) -> Result<Option<Post>>;
    /// Returns whether a post was removed
    async fn delete_post(&self, id: PostId) -> Result<bool>;
}

/// User store
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn get_user(&self, id: UserId) -> Result<Option<User>>;
    /// Fails with `Conflict` when the email is taken
    async fn create_user(&self, user: NewUser) -> Result<User>;
    /// Removes every user along with their posts and profiles
    async fn delete_all_users(&self) -> Result<u64>;
}

/// Profile store
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fails with `NotFound` for an unknown user and `Conflict` when the
    /// user already has a profile
    async fn create_profile(&self, profile: NewProfile) -> Result<Profile>;
    async fn get_profile_by_user(&self, user_id: UserId) -> Result<Option<Profile>>;
}
