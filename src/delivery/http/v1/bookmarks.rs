use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::domain::bookmark::BookmarkDraft;
use crate::usecase::contracts::BookmarkRepository;
use crate::usecase::error::UsecaseError;
use crate::usecase::sanitize::sanitize_bookmark;
use crate::AppState;

// Ids that are not integers cannot name a stored bookmark.
fn parse_id(raw: &str) -> Result<i64, UsecaseError> {
    raw.parse()
        .map_err(|_| UsecaseError::NotFound("Bookmark".to_string()))
}

fn parse_body(
    payload: Result<Json<BookmarkDraft>, JsonRejection>,
) -> Result<BookmarkDraft, UsecaseError> {
    payload.map(|Json(draft)| draft).map_err(|rejection| {
        tracing::warn!(error = %rejection, "unreadable request body");
        UsecaseError::Validation(rejection.body_text())
    })
}

#[tracing::instrument(skip(state))]
pub async fn list_bookmarks<R: BookmarkRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling list bookmarks request");

    let bookmarks = state.bookmarks_usecase.list_bookmarks().await?;
    let response: Vec<_> = bookmarks.into_iter().map(sanitize_bookmark).collect();

    tracing::debug!(count = response.len(), "bookmarks listed successfully");
    Ok((StatusCode::OK, Json(response)))
}

#[tracing::instrument(skip(state))]
pub async fn get_bookmark<R: BookmarkRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(bookmark_id): Path<String>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!(%bookmark_id, "handling get bookmark request");

    let id = parse_id(&bookmark_id)?;
    let bookmark = state.bookmarks_usecase.get_bookmark(id).await?;

    tracing::debug!(bookmark_id = id, "bookmark retrieved successfully");
    Ok((StatusCode::OK, Json(sanitize_bookmark(bookmark))))
}

#[tracing::instrument(skip(state, payload))]
pub async fn create_bookmark<R: BookmarkRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    payload: Result<Json<BookmarkDraft>, JsonRejection>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling create bookmark request");

    let draft = parse_body(payload)?;
    let bookmark = state.bookmarks_usecase.create_bookmark(draft).await?;
    let location = format!("/bookmarks/{}", bookmark.id);

    metrics::counter!("bookmarks_created_total").increment(1);
    tracing::debug!(bookmark_id = bookmark.id, "bookmark created successfully");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(sanitize_bookmark(bookmark)),
    ))
}

#[tracing::instrument(skip(state, payload))]
pub async fn update_bookmark<R: BookmarkRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(bookmark_id): Path<String>,
    payload: Result<Json<BookmarkDraft>, JsonRejection>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!(%bookmark_id, "handling update bookmark request");

    let id = parse_id(&bookmark_id)?;
    let patch = parse_body(payload)?;
    state.bookmarks_usecase.update_bookmark(id, patch).await?;

    metrics::counter!("bookmarks_updated_total").increment(1);
    tracing::debug!(bookmark_id = id, "bookmark updated successfully");
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state))]
pub async fn delete_bookmark<R: BookmarkRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(bookmark_id): Path<String>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!(%bookmark_id, "handling delete bookmark request");

    let id = parse_id(&bookmark_id)?;
    state.bookmarks_usecase.delete_bookmark(id).await?;

    metrics::counter!("bookmarks_deleted_total").increment(1);
    tracing::debug!(bookmark_id = id, "bookmark deleted successfully");
    Ok(StatusCode::NO_CONTENT)
}
