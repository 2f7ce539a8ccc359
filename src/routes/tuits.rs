use axum::{extract::State, http::StatusCode, Json};

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    infrastructure::{DeleteResult, DocId, UpdateResult},
    models::{AuthoredTuit, Tuit, TuitContent, TuitPatch},
    routes::extract::{ApiJson, ApiPath},
};

pub async fn find_all_tuits(State(state): State<AppState>) -> AppResult<Json<Vec<Tuit>>> {
    Ok(Json(state.tuits.find_all_tuits().await?))
}

pub async fn find_tuit_by_id(
    State(state): State<AppState>,
    ApiPath(tid): ApiPath<DocId>,
) -> AppResult<Json<Tuit>> {
    state
        .tuits
        .find_tuit_by_id(tid)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Tuit {} not found", tid)))
}

pub async fn find_tuits_by_user(
    State(state): State<AppState>,
    ApiPath(uid): ApiPath<DocId>,
) -> AppResult<Json<Vec<Tuit>>> {
    Ok(Json(state.tuits.find_tuits_by_user(uid).await?))
}

pub async fn create_tuit(
    State(state): State<AppState>,
    ApiJson(authored): ApiJson<AuthoredTuit>,
) -> AppResult<(StatusCode, Json<Tuit>)> {
    let tuit = state
        .tuits
        .create_tuit(authored.posted_by, authored.content)
        .await?;
    Ok((StatusCode::CREATED, Json(tuit)))
}

pub async fn create_tuit_by_user(
    State(state): State<AppState>,
    ApiPath(uid): ApiPath<DocId>,
    ApiJson(content): ApiJson<TuitContent>,
) -> AppResult<(StatusCode, Json<Tuit>)> {
    let tuit = state.tuits.create_tuit(uid, content).await?;
    Ok((StatusCode::CREATED, Json(tuit)))
}

pub async fn update_tuit(
    State(state): State<AppState>,
    ApiPath(tid): ApiPath<DocId>,
    ApiJson(patch): ApiJson<TuitPatch>,
) -> AppResult<Json<UpdateResult>> {
    Ok(Json(state.tuits.update_tuit(tid, &patch).await?))
}

pub async fn delete_tuit(
    State(state): State<AppState>,
    ApiPath(tid): ApiPath<DocId>,
) -> AppResult<Json<DeleteResult>> {
    Ok(Json(state.tuits.delete_tuit(tid).await?))
}

pub async fn delete_tuits_by_user(
    State(state): State<AppState>,
    ApiPath(uid): ApiPath<DocId>,
) -> AppResult<Json<DeleteResult>> {
    Ok(Json(state.tuits.delete_tuits_by_user(uid).await?))
}
