/**
 * Author Routes
 * CRUD API endpoints for authors, including the post cascade on delete
 */
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::models::{Author, AuthorUpdate};
use crate::db::store;
use crate::error::ApiError;
use crate::routes::{check_id_match, require};
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Author view for all author endpoints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorView {
    pub id: Uuid,
    pub name: String,
    pub user_name: String,
}

/// Request body for POST /authors. Fields are optional so missing ones
/// can be reported with a 400 naming the field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
}

/// Request body for PUT /authors/:id
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthorRequest {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
}

impl From<Author> for AuthorView {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.display_name(),
            user_name: author.user_name,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /authors - list all authors
pub async fn list_authors(
    State(state): State<AppState>,
) -> Result<Json<Vec<AuthorView>>, ApiError> {
    let authors = store::list_authors(&state.pool).await?;
    Ok(Json(authors.into_iter().map(AuthorView::from).collect()))
}

/// POST /authors - create an author with a unique userName
pub async fn create_author(
    State(state): State<AppState>,
    Json(payload): Json<CreateAuthorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let first_name = require(&payload.first_name, "firstName")?;
    let last_name = require(&payload.last_name, "lastName")?;
    let user_name = require(&payload.user_name, "userName")?;

    if store::find_author_by_user_name(&state.pool, user_name, None)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already taken".to_string()));
    }

    let author = store::create_author(&state.pool, first_name, last_name, user_name).await?;
    Ok((StatusCode::CREATED, Json(AuthorView::from(author))))
}

/// PUT /authors/:id - partial update; userName must stay unique among
/// all other authors
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAuthorRequest>,
) -> Result<Json<AuthorView>, ApiError> {
    check_id_match(id, payload.id.as_deref())?;

    if let Some(user_name) = payload.user_name.as_deref() {
        if store::find_author_by_user_name(&state.pool, user_name, Some(id))
            .await?
            .is_some()
        {
            return Err(ApiError::Conflict("Username is taken".to_string()));
        }
    }

    let update = AuthorUpdate {
        first_name: payload.first_name,
        last_name: payload.last_name,
        user_name: payload.user_name,
    };
    let author = store::update_author(&state.pool, id, update)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(author.into()))
}

/// DELETE /authors/:id - remove the author's posts, then the author
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    store::delete_author_cascade(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
