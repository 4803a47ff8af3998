//! Contract workflow events

use api_types::workflow::{ContractBatch, ContractEnd, NoSub};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState, user};

pub async fn waiting(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ContractBatch>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .contract_waiting(&payload.ids, &user.actor())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn active(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ContractBatch>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .contract_active(&payload.ids, &user.actor())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn cancelled(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ContractEnd>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .contract_cancelled(&payload.ids, payload.end_reason.as_deref(), &user.actor())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn terminated(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ContractEnd>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .contract_terminated(&payload.ids, payload.end_reason.as_deref(), &user.actor())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn check_sub(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ContractBatch>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .check_sub_state(&payload.ids, &user.actor())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Outcome "no substitute" of the confirmation dialog
pub async fn no_sub(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<NoSub>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .mark_no_sub(&payload.ids, payload.reason.as_deref(), &user.actor())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Outcome "substitute proposed" of the confirmation dialog
pub async fn sub(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ContractBatch>,
) -> Result<StatusCode, ServerError> {
    state.engine.mark_sub(&payload.ids, &user.actor()).await?;
    Ok(StatusCode::NO_CONTENT)
}
