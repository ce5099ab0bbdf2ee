/**
 * Post Routes
 * CRUD API endpoints for blog posts
 */
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::models::{Comment, PostUpdate, ResolvedPost};
use crate::db::store;
use crate::error::ApiError;
use crate::routes::{check_id_match, parse_uuid, require};
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Post list item for GET /posts
#[derive(Debug, Serialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub author: String,
    pub title: String,
    pub content: Option<String>,
}

/// Full post view for GET /posts/:id and POST /posts
#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub id: Uuid,
    pub author: String,
    pub title: String,
    pub content: Option<String>,
    pub comment: Vec<Comment>,
}

/// Request body for POST /posts. Fields are optional so missing ones can
/// be reported with a 400 naming the field instead of a deserialize error.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<String>,
}

/// Request body for PUT /posts/:id
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

impl From<ResolvedPost> for PostSummary {
    fn from(post: ResolvedPost) -> Self {
        Self {
            id: post.id,
            author: post.author_name(),
            title: post.title,
            content: post.content,
        }
    }
}

impl From<ResolvedPost> for PostDetail {
    fn from(post: ResolvedPost) -> Self {
        Self {
            id: post.id,
            author: post.author_name(),
            title: post.title,
            content: post.content,
            comment: post.comments.0,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /posts - list all posts with their author resolved
pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostSummary>>, ApiError> {
    let posts = store::list_posts(&state.pool).await?;
    Ok(Json(posts.into_iter().map(PostSummary::from).collect()))
}

/// GET /posts/:id - single post with comments
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostDetail>, ApiError> {
    let post = store::get_post(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(post.into()))
}

/// POST /posts - create a post; the referenced author must exist
pub async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let title = require(&payload.title, "title")?;
    let content = require(&payload.content, "content")?;
    let author_id = parse_uuid(require(&payload.author_id, "author_id")?, "author_id")?;

    if store::get_author(&state.pool, author_id).await?.is_none() {
        return Err(ApiError::Conflict("No Author".to_string()));
    }

    let post = store::create_post(&state.pool, title, Some(content), author_id).await?;
    Ok((StatusCode::CREATED, Json(PostDetail::from(post))))
}

/// PUT /posts/:id - partial update over title/content/author
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<StatusCode, ApiError> {
    check_id_match(id, payload.id.as_deref())?;

    let author_id = payload
        .author
        .as_deref()
        .map(|value| parse_uuid(value, "author"))
        .transpose()?;
    let update = PostUpdate {
        title: payload.title,
        content: payload.content,
        author_id,
    };

    if !store::update_post(&state.pool, id, update).await? {
        return Err(ApiError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /posts/:id - idempotent single-post delete
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    store::delete_post(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use chrono::Utc;
    use sqlx::types::Json as SqlJson;
    use tower::ServiceExt;

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_post_missing_title_returns_400() {
        let response = testing::app()
            .oneshot(json_request("POST", "/posts", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing `title` in request body");
    }

    #[tokio::test]
    async fn test_create_post_missing_author_id_returns_400() {
        let response = testing::app()
            .oneshot(json_request(
                "POST",
                "/posts",
                r#"{"title":"T","content":"C"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing `author_id` in request body");
    }

    #[tokio::test]
    async fn test_create_post_invalid_author_id_returns_400() {
        let response = testing::app()
            .oneshot(json_request(
                "POST",
                "/posts",
                r#"{"title":"T","content":"C","author_id":"not-a-uuid"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_post_id_mismatch_returns_400_without_updating() {
        let path_id = Uuid::new_v4();
        let body_id = Uuid::new_v4();
        // The mismatch must short-circuit before any store call, so the
        // unreachable test store never gets hit.
        let response = testing::app()
            .oneshot(json_request(
                "PUT",
                &format!("/posts/{path_id}"),
                &format!(r#"{{"id":"{body_id}","title":"changed"}}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "Request path id and request body id values must match"
        );
    }

    #[tokio::test]
    async fn test_update_post_missing_body_id_returns_400() {
        let response = testing::app()
            .oneshot(json_request(
                "PUT",
                &format!("/posts/{}", Uuid::new_v4()),
                r#"{"title":"changed"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_posts_store_failure_returns_opaque_500() {
        let response = testing::app()
            .oneshot(Request::builder().uri("/posts").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "internal server error");
    }

    #[test]
    fn test_post_views_map_title_and_content_straight() {
        let post = ResolvedPost {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            title: "The Title".to_string(),
            content: Some("The Content".to_string()),
            created: Utc::now(),
            comments: SqlJson(vec![Comment {
                id: Uuid::new_v4(),
                content: "first!".to_string(),
            }]),
            author_first_name: Some("Ada".to_string()),
            author_last_name: Some("Lovelace".to_string()),
        };

        let summary = serde_json::to_value(PostSummary::from(post.clone())).unwrap();
        assert_eq!(summary["title"], "The Title");
        assert_eq!(summary["content"], "The Content");
        assert_eq!(summary["author"], "Ada Lovelace");

        let detail = serde_json::to_value(PostDetail::from(post)).unwrap();
        assert_eq!(detail["title"], "The Title");
        assert_eq!(detail["content"], "The Content");
        assert_eq!(detail["comment"][0]["content"], "first!");
    }
}
