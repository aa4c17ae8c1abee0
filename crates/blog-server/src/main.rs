//! Blog API Server
//!
//! CRUD endpoints for posts, users and profiles over either an in-memory
//! store or an embedded SQLite database.

mod config;
mod error;
mod extractors;
mod handlers;
mod seed;
mod services;
mod storage;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use blog_core::ports::{PostStore, ProfileStore, UserStore};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{ServerConfig, StorageBackend};
use crate::services::{PostService, UserService};
use crate::storage::{Database, MemoryStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub users: Arc<UserService>,
}

impl AppState {
    /// Wire both services to one backend
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: PostStore + UserStore + ProfileStore + 'static,
    {
        let posts: Arc<dyn PostStore> = store.clone();
        let users: Arc<dyn UserStore> = store.clone();
        let profiles: Arc<dyn ProfileStore> = store;

        Self {
            posts: Arc::new(PostService::new(posts.clone(), users.clone())),
            users: Arc::new(UserService::new(users, profiles, posts)),
        }
    }
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Blog API Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = ServerConfig::load().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, storage={}",
        config.bind_address(),
        config.storage
    );

    let state = match config.storage {
        StorageBackend::Memory => AppState::new(Arc::new(MemoryStore::new())),
        StorageBackend::Sqlite => {
            let db = Database::new(&config.database_path)
                .await
                .context("Failed to initialize database")?;
            AppState::new(Arc::new(db))
        }
    };

    if config.seed {
        seed::run(&state).await.context("Failed to seed database")?;
    }

    let app = app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .context("Failed to bind to address")?;

    info!("Server: http://localhost:{}", config.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Build the HTTP router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(
            "/posts",
            get(handlers::posts::list).post(handlers::posts::create),
        )
        .route(
            "/posts/:id",
            get(handlers::posts::get)
                .patch(handlers::posts::update)
                .delete(handlers::posts::delete),
        )
        .route(
            "/users",
            get(handlers::users::list).post(handlers::users::create),
        )
        .route("/users/:id", get(handlers::users::get))
        .route("/users/:id/profile", post(handlers::users::create_profile))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
