//! User and profile service

use blog_core::ports::{PostStore, ProfileStore, UserStore};
use blog_core::{
    validate, BlogError, CreateProfileRequest, CreateUserRequest, Profile, Result, User,
    UserDetail, UserId,
};
use std::sync::Arc;
use tracing::info;

pub struct UserService {
    users: Arc<dyn UserStore>,
    profiles: Arc<dyn ProfileStore>,
    posts: Arc<dyn PostStore>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        profiles: Arc<dyn ProfileStore>,
        posts: Arc<dyn PostStore>,
    ) -> Self {
        Self {
            users,
            profiles,
            posts,
        }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.users.list_users().await
    }

    pub async fn get(&self, id: UserId) -> Result<UserDetail> {
        let user = self
            .users
            .get_user(id)
            .await?
            .ok_or_else(|| BlogError::not_found("User", id))?;

        let profile = self.profiles.get_profile_by_user(id).await?;
        let posts = self.posts.list_posts_by_author(id).await?;

        Ok(UserDetail {
            user,
            profile,
            posts,
        })
    }

    pub async fn create(&self, req: CreateUserRequest) -> Result<User> {
        let new_user = validate::new_user(req)?;
        let user = self.users.create_user(new_user).await?;

        info!("Created user: id={}, email={}", user.id, user.email);
        Ok(user)
    }

    pub async fn create_profile(&self, user_id: UserId, req: CreateProfileRequest) -> Result<Profile> {
        let profile = self
            .profiles
            .create_profile(validate::new_profile(user_id, req))
            .await?;

        info!("Created profile: id={}, user={}", profile.id, user_id);
        Ok(profile)
    }

    /// Remove every user, cascading to their posts and profiles
    pub async fn delete_all(&self) -> Result<u64> {
        let removed = self.users.delete_all_users().await?;
        info!("Deleted {} users", removed);
        Ok(removed)
    }
}
