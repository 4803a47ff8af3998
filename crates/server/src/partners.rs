//! Partner API endpoints

use api_types::partner::{PartnerCreated, PartnerNew, PartnerView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

pub async fn partner_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PartnerNew>,
) -> Result<(StatusCode, Json<PartnerCreated>), ServerError> {
    let cmd = engine::PartnerNew {
        reference: payload.reference,
        firstname: payload.firstname,
        lastname: payload.lastname,
        email: payload.email,
        phone: payload.phone,
        lang: payload.lang,
        commercial_partner_id: payload.commercial_partner_id,
    };
    let id = state.engine.new_partner(cmd, &user.actor()).await?;

    Ok((StatusCode::CREATED, Json(PartnerCreated { id })))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PartnerView>, ServerError> {
    let partner = state.engine.partner(id, &user.actor()).await?;

    Ok(Json(PartnerView {
        id: partner.id,
        commercial_partner_id: partner.commercial_partner(),
        reference: partner.reference,
        firstname: partner.firstname,
        lastname: partner.lastname,
        email: partner.email,
        phone: partner.phone,
        lang: partner.lang,
    }))
}
