use axum::{extract::State, http::StatusCode, Json};

use crate::{
    app_state::AppState,
    error::AppResult,
    infrastructure::{DeleteResult, DocId},
    models::Like,
    routes::extract::ApiPath,
};

pub async fn find_all_tuits_liked_by_user(
    State(state): State<AppState>,
    ApiPath(uid): ApiPath<DocId>,
) -> AppResult<Json<Vec<Like>>> {
    Ok(Json(state.likes.find_all_tuits_liked_by_user(uid).await?))
}

pub async fn find_all_users_that_liked_tuit(
    State(state): State<AppState>,
    ApiPath(tid): ApiPath<DocId>,
) -> AppResult<Json<Vec<Like>>> {
    Ok(Json(state.likes.find_all_users_that_liked_tuit(tid).await?))
}

pub async fn user_likes_tuit(
    State(state): State<AppState>,
    ApiPath((uid, tid)): ApiPath<(DocId, DocId)>,
) -> AppResult<(StatusCode, Json<Like>)> {
    let like = state.likes.user_likes_tuit(uid, tid).await?;
    Ok((StatusCode::CREATED, Json(like)))
}

pub async fn user_unlikes_tuit(
    State(state): State<AppState>,
    ApiPath((uid, tid)): ApiPath<(DocId, DocId)>,
) -> AppResult<Json<DeleteResult>> {
    Ok(Json(state.likes.user_unlikes_tuit(uid, tid).await?))
}

pub async fn delete_likes_of_tuit(
    State(state): State<AppState>,
    ApiPath(tid): ApiPath<DocId>,
) -> AppResult<Json<DeleteResult>> {
    Ok(Json(state.likes.tuit_deleted(tid).await?))
}
