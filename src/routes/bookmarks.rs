use axum::{extract::State, Json};

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    infrastructure::{DocId, UpdateResult},
    models::Bookmarks,
    routes::extract::ApiPath,
};

pub async fn bookmark(
    State(state): State<AppState>,
    ApiPath((uid, tid)): ApiPath<(DocId, DocId)>,
) -> AppResult<Json<UpdateResult>> {
    Ok(Json(state.bookmarks.bookmark(uid, tid).await?))
}

pub async fn unbookmark(
    State(state): State<AppState>,
    ApiPath((uid, tid)): ApiPath<(DocId, DocId)>,
) -> AppResult<Json<UpdateResult>> {
    Ok(Json(state.bookmarks.unbookmark(uid, tid).await?))
}

pub async fn view_bookmarks(
    State(state): State<AppState>,
    ApiPath(uid): ApiPath<DocId>,
) -> AppResult<Json<Bookmarks>> {
    state
        .bookmarks
        .view_bookmarks(uid)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", uid)))
}
