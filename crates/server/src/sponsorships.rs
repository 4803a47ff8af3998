//! Sponsorship API endpoints

use api_types::sponsorship::{
    ContractState, CorrespondentChange, ParentSuggestion, SdsState, SponsorshipCreated,
    SponsorshipNew, SponsorshipUpdate, SponsorshipView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

pub(crate) fn sds_state_to_api(state: engine::SdsState) -> SdsState {
    match state {
        engine::SdsState::Draft => SdsState::Draft,
        engine::SdsState::Active => SdsState::Active,
        engine::SdsState::SubWaiting => SdsState::SubWaiting,
        engine::SdsState::Sub => SdsState::Sub,
        engine::SdsState::SubAccept => SdsState::SubAccept,
        engine::SdsState::SubReject => SdsState::SubReject,
        engine::SdsState::NoSub => SdsState::NoSub,
        engine::SdsState::Cancelled => SdsState::Cancelled,
    }
}

fn sds_state_from_api(state: SdsState) -> engine::SdsState {
    match state {
        SdsState::Draft => engine::SdsState::Draft,
        SdsState::Active => engine::SdsState::Active,
        SdsState::SubWaiting => engine::SdsState::SubWaiting,
        SdsState::Sub => engine::SdsState::Sub,
        SdsState::SubAccept => engine::SdsState::SubAccept,
        SdsState::SubReject => engine::SdsState::SubReject,
        SdsState::NoSub => engine::SdsState::NoSub,
        SdsState::Cancelled => engine::SdsState::Cancelled,
    }
}

pub(crate) fn contract_state_to_api(state: engine::ContractState) -> ContractState {
    match state {
        engine::ContractState::Draft => ContractState::Draft,
        engine::ContractState::Waiting => ContractState::Waiting,
        engine::ContractState::Active => ContractState::Active,
        engine::ContractState::Terminated => ContractState::Terminated,
        engine::ContractState::Cancelled => ContractState::Cancelled,
    }
}

pub(crate) fn sponsorship_view(sponsorship: engine::Sponsorship) -> SponsorshipView {
    SponsorshipView {
        id: sponsorship.id,
        partner_id: sponsorship.partner_id,
        correspondent_id: sponsorship.correspondent_id,
        child_id: sponsorship.child_id,
        kind: sponsorship.kind,
        state: contract_state_to_api(sponsorship.state),
        end_reason: sponsorship.end_reason,
        origin_id: sponsorship.origin_id,
        parent_id: sponsorship.parent_id,
        sub_sponsorship_id: sponsorship.sub_sponsorship_id,
        sds_state: sds_state_to_api(sponsorship.sds_state),
        sds_state_date: sponsorship.sds_state_date,
        color: sponsorship.color,
        no_sub_reason: sponsorship.no_sub_reason,
        sds_uid: sponsorship.sds_uid,
        sub_notes: sponsorship.sub_notes,
        cancel_gifts_on_termination: sponsorship.cancel_gifts_on_termination,
        created_at: sponsorship.created_at,
    }
}

/// Handle requests for creating a draft sponsorship
pub async fn sponsorship_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SponsorshipNew>,
) -> Result<(StatusCode, Json<SponsorshipCreated>), ServerError> {
    let cmd = engine::SponsorshipNew {
        partner_id: payload.partner_id,
        correspondent_id: payload.correspondent_id,
        child_id: payload.child_id,
        kind: payload.kind,
        origin_id: payload.origin_id,
        parent_id: payload.parent_id,
        sds_uid: payload.sds_uid,
        sub_notes: payload.sub_notes,
    };
    let id = state.engine.create_sponsorship(cmd, &user.actor()).await?;

    Ok((StatusCode::CREATED, Json(SponsorshipCreated { id })))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SponsorshipView>, ServerError> {
    let sponsorship = state.engine.sponsorship(id, &user.actor()).await?;
    Ok(Json(sponsorship_view(sponsorship)))
}

/// Handle partial updates of a sponsorship
pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SponsorshipUpdate>,
) -> Result<Json<SponsorshipView>, ServerError> {
    let update = engine::SponsorshipUpdate {
        sds_state: payload.sds_state.map(sds_state_from_api),
        color: payload.color,
        parent_id: payload.parent_id,
        origin_id: payload.origin_id,
        sub_sponsorship_id: payload.sub_sponsorship_id,
        sds_uid: payload.sds_uid,
        no_sub_reason: payload.no_sub_reason,
        sub_notes: payload.sub_notes,
        cancel_gifts_on_termination: payload.cancel_gifts_on_termination,
    };
    let sponsorship = state
        .engine
        .update_sponsorship(id, update, &user.actor())
        .await?;

    Ok(Json(sponsorship_view(sponsorship)))
}

pub async fn change_correspondent(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CorrespondentChange>,
) -> Result<Json<SponsorshipView>, ServerError> {
    let sponsorship = state
        .engine
        .change_correspondent(id, payload.correspondent_id, &user.actor())
        .await?;

    Ok(Json(sponsorship_view(sponsorship)))
}

/// Sponsorship of the correspondent that a new substitute would be linked to
pub async fn suggest_parent(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(correspondent_id): Path<Uuid>,
) -> Result<Json<ParentSuggestion>, ServerError> {
    let parent_id = state
        .engine
        .suggest_parent(correspondent_id, &user.actor())
        .await?;

    Ok(Json(ParentSuggestion { parent_id }))
}
