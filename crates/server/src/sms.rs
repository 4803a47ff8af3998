//! SMS sponsorship endpoints
//!
//! Except for the registration of new requests, these routes are public:
//! the visitor only knows the link received by SMS.

use api_types::sms::{
    Country, FieldOfficeRef, SmsChangeChild, SmsChangeChildResult, SmsChildData, SmsConfirm,
    SmsConfirmResult, SmsPartner, SmsRequestCreated, SmsRequestNew, SmsSponsorshipForm,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use engine::Actor;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, sponsorships::contract_state_to_api, user};

fn step1_path(request_id: i64) -> String {
    format!("/sms_sponsorship/step1/{request_id}")
}

fn child_data(data: engine::SmsChildData) -> SmsChildData {
    match data {
        engine::SmsChildData::Invalid => SmsChildData {
            invalid_sms_child_request: Some(true),
            ..Default::default()
        },
        engine::SmsChildData::Confirmed => SmsChildData {
            sponsorship_confirmed: Some(true),
            ..Default::default()
        },
        engine::SmsChildData::NoChild => SmsChildData {
            has_a_child: Some(false),
            invalid_sms_child_request: Some(false),
            ..Default::default()
        },
        engine::SmsChildData::Child {
            child,
            field_office,
            countries,
            partner,
        } => SmsChildData {
            invalid_sms_child_request: Some(false),
            sponsorship_confirmed: None,
            has_a_child: Some(true),
            display_name: Some(child.display_name()),
            id: Some(child.id),
            name: Some(child.name),
            birthdate: child.birthdate,
            desc_en: child.desc_en,
            field_office: field_office.map(|fo| FieldOfficeRef {
                id: fo.id,
                name: fo.name,
            }),
            gender: child.gender,
            image_url: child.image_url,
            age: child.age,
            countries: Some(
                countries
                    .into_iter()
                    .map(|fo| Country {
                        value: fo.country_code,
                        text: fo.name,
                    })
                    .collect(),
            ),
            partner: partner.map(|p| SmsPartner {
                firstname: p.firstname,
                lastname: p.lastname,
                email: p.email,
            }),
        },
    }
}

/// Register a child request received by the SMS gateway
pub async fn request_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SmsRequestNew>,
) -> Result<(StatusCode, Json<SmsRequestCreated>), ServerError> {
    let id = state
        .engine
        .new_sms_request(
            &payload.sender,
            payload.child_id,
            payload.partner_id,
            &user.actor(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SmsRequestCreated {
            id,
            url: step1_path(id),
        }),
    ))
}

/// Step 1: redirect to the form application
pub async fn step1_redirect(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let location = format!("{}?child_request_id={id}", state.sms_form_url);
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)])
}

/// Data shown by the form; always a list of one object
pub async fn get_child_data(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<SmsChildData>>, ServerError> {
    let data = state.engine.sms_child_data(id, &Actor::Public).await?;
    Ok(Json(vec![child_data(data)]))
}

pub async fn confirm(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SmsConfirm>,
) -> Result<Json<SmsConfirmResult>, ServerError> {
    let form = engine::SmsSponsorForm {
        firstname: payload.firstname,
        lastname: payload.lastname,
        email: payload.email,
    };
    let sponsorship_id = state
        .engine
        .confirm_sms_sponsorship(id, form, &Actor::Public)
        .await?;

    Ok(Json(SmsConfirmResult {
        result: "success".to_string(),
        sponsorship_id,
    }))
}

/// Select another child matching the visitor's preferences
pub async fn change_child(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SmsChangeChild>,
) -> Result<Json<SmsChangeChildResult>, ServerError> {
    let child_id = state
        .engine
        .change_sms_child(
            id,
            &payload.gender,
            &payload.age,
            &payload.country,
            &Actor::Public,
        )
        .await?;

    Ok(Json(SmsChangeChildResult { child_id }))
}

/// Step 2: data prefilling the registration form
pub async fn step2_form(
    State(state): State<ServerState>,
    Path(sponsorship_id): Path<Uuid>,
) -> Result<Json<SmsSponsorshipForm>, ServerError> {
    let (sponsorship, partner) = state
        .engine
        .sms_sponsorship_form(sponsorship_id, &Actor::Public)
        .await?;

    Ok(Json(SmsSponsorshipForm {
        sponsorship_id: sponsorship.id,
        child_id: sponsorship.child_id,
        state: contract_state_to_api(sponsorship.state),
        firstname: partner.firstname,
        lastname: partner.lastname,
        email: partner.email,
        phone: partner.phone,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_only_has_the_flag() {
        let data = child_data(engine::SmsChildData::Invalid);
        assert_eq!(data.invalid_sms_child_request, Some(true));
        assert_eq!(data.has_a_child, None);
        assert_eq!(data.countries, None);
    }

    #[test]
    fn childless_request_is_valid() {
        let data = child_data(engine::SmsChildData::NoChild);
        assert_eq!(data.invalid_sms_child_request, Some(false));
        assert_eq!(data.has_a_child, Some(false));
    }
}
