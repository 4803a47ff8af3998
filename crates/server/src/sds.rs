//! SDS status lists

use api_types::{
    sds::{FollowerSet, SdsGroup, SdsGroups, SdsStateChoice},
    sponsorship::SponsorshipList,
};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    ServerError,
    server::ServerState,
    sponsorships::{sds_state_to_api, sponsorship_view},
    user,
};

/// The legal SDS states with their labels
pub async fn states(_: Extension<user::Model>) -> Json<Vec<SdsStateChoice>> {
    Json(
        engine::SdsState::ALL
            .into_iter()
            .map(|state| SdsStateChoice {
                state: sds_state_to_api(state),
                label: state.label().to_string(),
            })
            .collect(),
    )
}

/// Sponsorship counts grouped by SDS state
pub async fn groups(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<SdsGroups>, ServerError> {
    let groups = state.engine.sds_groups(&user.actor()).await?;

    Ok(Json(SdsGroups {
        groups: groups
            .into_iter()
            .map(|group| SdsGroup {
                state: sds_state_to_api(group.state),
                label: group.label.to_string(),
                count: group.count,
                folded: group.folded,
            })
            .collect(),
    }))
}

/// Sponsorships waiting for a substitute followed by the user
pub async fn followed(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<SponsorshipList>, ServerError> {
    let sponsorships = state.engine.followed_sub_waiting(&user.actor()).await?;

    Ok(Json(SponsorshipList {
        sponsorships: sponsorships.into_iter().map(sponsorship_view).collect(),
    }))
}

pub async fn set_follower(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<FollowerSet>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .set_sds_follower(&payload.lang_code, &payload.username, &user.actor())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
