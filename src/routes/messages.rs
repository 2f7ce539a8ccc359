use axum::{extract::State, http::StatusCode, Json};

use crate::{
    app_state::AppState,
    error::AppResult,
    infrastructure::{DeleteResult, DocId},
    models::{Message, MessageContent},
    routes::extract::{ApiJson, ApiPath},
};

pub async fn send(
    State(state): State<AppState>,
    ApiPath((uid, receiveid)): ApiPath<(DocId, DocId)>,
    ApiJson(content): ApiJson<MessageContent>,
) -> AppResult<(StatusCode, Json<Message>)> {
    let message = state.messages.send(uid, receiveid, content).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(msgid): ApiPath<DocId>,
) -> AppResult<Json<DeleteResult>> {
    Ok(Json(state.messages.delete(msgid).await?))
}

pub async fn view_received(
    State(state): State<AppState>,
    ApiPath(uid): ApiPath<DocId>,
) -> AppResult<Json<Vec<Message>>> {
    Ok(Json(state.messages.view_received(uid).await?))
}

pub async fn view_sent(
    State(state): State<AppState>,
    ApiPath(uid): ApiPath<DocId>,
) -> AppResult<Json<Vec<Message>>> {
    Ok(Json(state.messages.view_sent(uid).await?))
}
