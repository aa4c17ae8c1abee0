//! Post service

use blog_core::ports::{PostStore, UserStore};
use blog_core::{
    validate, BlogError, CreatePostRequest, Post, PostId, PostWithAuthor, Result,
    UpdatePostRequest,
};
use std::sync::Arc;
use tracing::{debug, info};

pub struct PostService {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>, users: Arc<dyn UserStore>) -> Self {
        Self { posts, users }
    }

    pub async fn list(&self) -> Result<Vec<Post>> {
        self.posts.list_posts().await
    }

    pub async fn get(&self, id: PostId) -> Result<PostWithAuthor> {
        let post = self
            .posts
            .get_post(id)
            .await?
            .ok_or_else(|| BlogError::not_found("Post", id))?;

        let author = match post.author_id {
            Some(author_id) => self.users.get_user(author_id).await?,
            None => None,
        };

        Ok(PostWithAuthor { post, author })
    }

    pub async fn create(&self, req: CreatePostRequest) -> Result<Post> {
        let new_post = validate::new_post(req)?;
        let post = self.posts.create_post(new_post).await?;

        info!("Created post: id={}, author={:?}", post.id, post.author_id);
        Ok(post)
    }

    pub async fn update(&self, id: PostId, req: UpdatePostRequest) -> Result<Post> {
        let changes = req.into_changes();
        if changes.is_empty() {
            debug!("PATCH for post {} changes no fields", id);
        }

        let post = self
            .posts
            .update_post(id, changes)
            .await?
            .ok_or_else(|| BlogError::not_found("Post", id))?;

        info!("Updated post: id={}", post.id);
        Ok(post)
    }

    pub async fn delete(&self, id: PostId) -> Result<()> {
        if !self.posts.delete_post(id).await? {
            return Err(BlogError::not_found("Post", id));
        }

        info!("Deleted post: id={}", id);
        Ok(())
    }
}
