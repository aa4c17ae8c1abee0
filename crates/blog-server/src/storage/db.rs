//! SQLite database layer (embedded, no external dependencies)

use anyhow::{Context, Result};
use async_trait::async_trait;
use blog_core::ports::{PostStore, ProfileStore, UserStore};
use blog_core::{
    BlogError, NewPost, NewProfile, NewUser, Post, PostChanges, PostId, Profile, User, UserId,
};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        // Create parent directory if needed
        if let Some(parent) = std::path::Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        Self::with_pool(pool).await
    }

    /// A private database that lives as long as this value.
    ///
    /// Every connection to `sqlite::memory:` opens a fresh database, so the
    /// pool is pinned to one connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        tracing::info!("SQLite connection established, running migrations...");

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database initialization complete");

        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        // Users table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT UNIQUE NOT NULL,
                name TEXT NOT NULL,
                created_at DATETIME NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Profiles table (1:1 with users)
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                bio TEXT,
                user_id INTEGER UNIQUE NOT NULL REFERENCES users(id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Posts table (N:1 with users)
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT,
                author_id INTEGER REFERENCES users(id) ON DELETE CASCADE,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_posts_author_id ON posts (author_id)
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

/// Translate a driver error into the API taxonomy.
///
/// `on_foreign_key` names the referenced entity a dangling reference points to.
fn map_err(err: sqlx::Error, on_foreign_key: Option<(&'static str, i64)>) -> BlogError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return BlogError::Conflict(db_err.message().to_string());
        }
        if db_err.is_foreign_key_violation() {
            if let Some((entity, id)) = on_foreign_key {
                return BlogError::not_found(entity, id);
            }
        }
    }
    BlogError::Database(err.to_string())
}

fn db_err(err: sqlx::Error) -> BlogError {
    map_err(err, None)
}

const POST_COLUMNS: &str = "id, title, content, author_id, created_at, updated_at";

#[async_trait]
impl PostStore for Database {
    async fn list_posts(&self) -> blog_core::Result<Vec<Post>> {
        let rows: Vec<PostRow> = sqlx::query_as(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn list_posts_by_author(&self, author_id: UserId) -> blog_core::Result<Vec<Post>> {
        let rows: Vec<PostRow> = sqlx::query_as(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE author_id = ?1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn get_post(&self, id: PostId) -> blog_core::Result<Option<Post>> {
        let row: Option<PostRow> =
            sqlx::query_as(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(row.map(|r| r.into()))
    }

    async fn create_post(&self, post: NewPost) -> blog_core::Result<Post> {
        let now = Utc::now();
        let author = post.author_id.map(|id| ("User", id));

        let row: PostRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO posts (title, content, author_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.author_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_err(e, author))?;

        Ok(row.into())
    }

    async fn update_post(
        &self,
        id: PostId,
        changes: PostChanges,
    ) -> blog_core::Result<Option<Post>> {
        // NULL binds keep the stored value
        let row: Option<PostRow> = sqlx::query_as(&format!(
            r#"
            UPDATE posts
            SET title = COALESCE(?1, title),
                content = COALESCE(?2, content),
                updated_at = ?3
            WHERE id = ?4
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(changes.title)
        .bind(changes.content)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|r| r.into()))
    }

    async fn delete_post(&self, id: PostId) -> blog_core::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for Database {
    async fn list_users(&self) -> blog_core::Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, name, created_at FROM users ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn get_user(&self, id: UserId) -> blog_core::Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, name, created_at FROM users WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|r| r.into()))
    }

    async fn create_user(&self, user: NewUser) -> blog_core::Result<User> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (email, name, created_at)
            VALUES (?1, ?2, ?3)
            RETURNING id, email, name, created_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match map_err(e, None) {
            BlogError::Conflict(_) => {
                BlogError::Conflict(format!("Email already in use: {}", user.email))
            }
            other => other,
        })?;

        Ok(row.into())
    }

    async fn delete_all_users(&self) -> blog_core::Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ProfileStore for Database {
    async fn create_profile(&self, profile: NewProfile) -> blog_core::Result<Profile> {
        let user_id = profile.user_id;

        let row: ProfileRow = sqlx::query_as(
            r#"
            INSERT INTO profiles (bio, user_id)
            VALUES (?1, ?2)
            RETURNING id, bio, user_id
            "#,
        )
        .bind(&profile.bio)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match map_err(e, Some(("User", user_id))) {
            BlogError::Conflict(_) => {
                BlogError::Conflict(format!("User {} already has a profile", user_id))
            }
            other => other,
        })?;

        Ok(row.into())
    }

    async fn get_profile_by_user(&self, user_id: UserId) -> blog_core::Result<Option<Profile>> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT id, bio, user_id FROM profiles WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|r| r.into()))
    }
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: Option<String>,
    author_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(r: PostRow) -> Self {
        Post {
            id: r.id,
            title: r.title,
            content: r.content,
            author_id: r.author_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            email: r.email,
            name: r.name,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    bio: Option<String>,
    user_id: i64,
}

impl From<ProfileRow> for Profile {
    fn from(r: ProfileRow) -> Self {
        Profile {
            id: r.id,
            bio: r.bio,
            user_id: r.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn db() -> Database {
        Database::in_memory().await.unwrap()
    }

    fn new_post(title: &str, author_id: Option<UserId>) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: Some("B".to_string()),
            author_id,
        }
    }

    fn alice() -> NewUser {
        NewUser {
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_post() {
        let db = db().await;
        let created = db.create_post(new_post("A", None)).await.unwrap();

        let fetched = db.get_post(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(db.get_post(created.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_coalesces_missing_fields() {
        let db = db().await;
        let created = db.create_post(new_post("A", None)).await.unwrap();

        let updated = db
            .update_post(
                created.id,
                PostChanges {
                    title: Some("C".to_string()),
                    content: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "C");
        assert_eq!(updated.content.as_deref(), Some("B"));

        assert!(db
            .update_post(999, PostChanges::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_posts_newest_first() {
        let db = db().await;
        for title in ["one", "two", "three"] {
            db.create_post(new_post(title, None)).await.unwrap();
        }

        let titles: Vec<String> = db
            .list_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["three", "two", "one"]);
    }

    #[tokio::test]
    async fn test_delete_post() {
        let db = db().await;
        let created = db.create_post(new_post("A", None)).await.unwrap();

        assert!(db.delete_post(created.id).await.unwrap());
        assert!(!db.delete_post(created.id).await.unwrap());
        assert!(db.get_post(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_author_maps_to_not_found() {
        let db = db().await;

        let err = db.create_post(new_post("A", Some(5))).await.unwrap_err();
        assert_eq!(err, BlogError::not_found("User", 5));
        assert!(db.list_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unique_violations_map_to_conflict() {
        let db = db().await;
        let user = db.create_user(alice()).await.unwrap();

        let err = db.create_user(alice()).await.unwrap_err();
        assert!(matches!(err, BlogError::Conflict(_)));
        assert_eq!(db.list_users().await.unwrap().len(), 1);

        let profile = NewProfile {
            bio: Some("Hello".to_string()),
            user_id: user.id,
        };
        db.create_profile(profile.clone()).await.unwrap();
        let err = db.create_profile(profile).await.unwrap_err();
        assert!(matches!(err, BlogError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_profile_for_unknown_user() {
        let db = db().await;
        let err = db
            .create_profile(NewProfile {
                bio: None,
                user_id: 3,
            })
            .await
            .unwrap_err();
        assert_eq!(err, BlogError::not_found("User", 3));
    }

    #[tokio::test]
    async fn test_delete_all_users_cascades() {
        let db = db().await;
        let user = db.create_user(alice()).await.unwrap();
        db.create_profile(NewProfile {
            bio: None,
            user_id: user.id,
        })
        .await
        .unwrap();
        db.create_post(new_post("A", Some(user.id))).await.unwrap();
        db.create_post(new_post("orphan", None)).await.unwrap();

        assert_eq!(db.delete_all_users().await.unwrap(), 1);
        assert!(db.get_profile_by_user(user.id).await.unwrap().is_none());
        assert!(db.list_posts_by_author(user.id).await.unwrap().is_empty());
        assert_eq!(db.list_posts().await.unwrap().len(), 1);
    }
}
