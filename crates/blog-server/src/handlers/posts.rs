//! Post handlers

use crate::error::ApiResult;
use crate::extractors::{parse_id, JsonBody};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use blog_core::{CreatePostRequest, Post, PostWithAuthor, UpdatePostRequest};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    message: String,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Post>>> {
    Ok(Json(state.posts.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PostWithAuthor>> {
    let id = parse_id("Post", &id)?;
    Ok(Json(state.posts.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let post = state.posts.create(req).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdatePostRequest>,
) -> ApiResult<Json<Post>> {
    let id = parse_id("Post", &id)?;
    Ok(Json(state.posts.update(id, req).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id("Post", &id)?;
    state.posts.delete(id).await?;
    Ok(Json(MessageResponse {
        message: format!("Post {} deleted", id),
    }))
}

#[cfg(test)]
mod tests {
    use crate::handlers::testing::{memory_app, send, sqlite_app};
    use axum::http::{Method, StatusCode};
    use axum::Router;
    use serde_json::json;

    async fn create_post(app: &Router, title: &str, content: &str) -> serde_json::Value {
        let (status, body) = send(
            app,
            Method::POST,
            "/posts",
            Some(json!({ "title": title, "content": content })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    async fn check_crud_roundtrip(app: Router) {
        let created = create_post(&app, "A", "B").await;
        let id = created["id"].as_i64().unwrap();

        let (status, fetched) = send(&app, Method::GET, &format!("/posts/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        for field in ["id", "title", "content", "authorId", "createdAt", "updatedAt"] {
            assert_eq!(fetched[field], created[field], "field {}", field);
        }
        assert!(fetched["author"].is_null());

        let (status, body) =
            send(&app, Method::DELETE, &format!("/posts/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], format!("Post {} deleted", id));

        let (status, body) = send(&app, Method::GET, &format!("/posts/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");

        let (status, _) = send(&app, Method::DELETE, &format!("/posts/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    async fn check_patch_keeps_absent_and_null(app: Router) {
        let created = create_post(&app, "A", "B").await;
        let uri = format!("/posts/{}", created["id"]);

        let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "title": "C" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "C");
        assert_eq!(body["content"], "B");

        let (status, body) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(json!({ "title": null, "content": null })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "C");
        assert_eq!(body["content"], "B");

        let (_, fetched) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(fetched["title"], "C");
        assert_eq!(fetched["content"], "B");
    }

    async fn check_list_newest_first(app: Router) {
        for title in ["one", "two", "three"] {
            create_post(&app, title, "body").await;
        }

        let (status, body) = send(&app, Method::GET, "/posts", None).await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["three", "two", "one"]);
    }

    #[tokio::test]
    async fn test_crud_roundtrip_memory() {
        check_crud_roundtrip(memory_app()).await;
    }

    #[tokio::test]
    async fn test_crud_roundtrip_sqlite() {
        check_crud_roundtrip(sqlite_app().await).await;
    }

    #[tokio::test]
    async fn test_patch_keeps_absent_and_null_memory() {
        check_patch_keeps_absent_and_null(memory_app()).await;
    }

    #[tokio::test]
    async fn test_patch_keeps_absent_and_null_sqlite() {
        check_patch_keeps_absent_and_null(sqlite_app().await).await;
    }

    #[tokio::test]
    async fn test_list_newest_first_memory() {
        check_list_newest_first(memory_app()).await;
    }

    #[tokio::test]
    async fn test_list_newest_first_sqlite() {
        check_list_newest_first(sqlite_app().await).await;
    }

    #[tokio::test]
    async fn test_create_requires_fields() {
        let app = memory_app();

        let (status, body) = send(&app, Method::POST, "/posts", Some(json!({ "title": "A" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields: content");

        let (status, body) = send(&app, Method::POST, "/posts", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields: title, content");
    }

    #[tokio::test]
    async fn test_create_with_unknown_author() {
        let app = sqlite_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/posts",
            Some(json!({ "title": "A", "content": "B", "authorId": 77 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found: 77");

        let (_, posts) = send(&app, Method::GET, "/posts", None).await;
        assert!(posts.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_includes_author() {
        let app = memory_app();
        let (_, user) = send(
            &app,
            Method::POST,
            "/users",
            Some(json!({ "email": "bob@example.com", "name": "Bob" })),
        )
        .await;

        let (status, post) = send(
            &app,
            Method::POST,
            "/posts",
            Some(json!({ "title": "Bob Post", "content": "By Bob", "authorId": user["id"] })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, fetched) = send(&app, Method::GET, &format!("/posts/{}", post["id"]), None).await;
        assert_eq!(fetched["authorId"], user["id"]);
        assert_eq!(fetched["author"]["email"], "bob@example.com");
    }

    #[tokio::test]
    async fn test_patch_missing_and_malformed() {
        let app = memory_app();

        let (status, _) =
            send(&app, Method::PATCH, "/posts/42", Some(json!({ "title": "C" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, "/posts/not-a-number", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let created = create_post(&app, "A", "B").await;
        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/posts/{}", created["id"]),
            Some(json!({ "title": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation");
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let app = memory_app();

        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Blog API");

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
