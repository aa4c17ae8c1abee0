//! Demo data loaded at startup when `seed` is enabled

use crate::AppState;
use blog_core::{CreatePostRequest, CreateProfileRequest, CreateUserRequest, Result};
use tracing::info;

fn user(email: &str, name: &str) -> CreateUserRequest {
    CreateUserRequest {
        email: Some(email.to_string()),
        name: Some(name.to_string()),
    }
}

fn post(title: &str, content: &str, author_id: i64) -> CreatePostRequest {
    CreatePostRequest {
        title: Some(title.to_string()),
        content: Some(content.to_string()),
        author_id: Some(author_id),
    }
}

/// Replace all users (and their posts and profiles) with the demo set
pub async fn run(state: &AppState) -> Result<()> {
    state.users.delete_all().await?;

    let alice = state.users.create(user("alice@example.com", "Alice")).await?;
    let bob = state.users.create(user("bob@example.com", "Bob")).await?;

    state
        .users
        .create_profile(
            alice.id,
            CreateProfileRequest {
                bio: Some("Hello, I am Alice".to_string()),
            },
        )
        .await?;

    state
        .posts
        .create(post("First Post", "Prisma + PostgreSQL", alice.id))
        .await?;
    state
        .posts
        .create(post("Second Post", "Relations are easy", alice.id))
        .await?;
    state.posts.create(post("Bob Post", "By Bob", bob.id)).await?;

    info!("Seed completed");
    Ok(())
}
