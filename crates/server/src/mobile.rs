//! Mobile app endpoints

use std::collections::HashMap;

use api_types::{
    OneOrMany,
    mobile::{
        ChildApp, ChildBio, ChildBioResponse, ChildConnectData, ChildIds, ChildImage, ChildTime,
        Location,
    },
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn parse_ids(ids: &str) -> Result<Vec<Uuid>, ServerError> {
    ids.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            Uuid::parse_str(id).map_err(|_| ServerError::Generic(format!("invalid child id {id}")))
        })
        .collect()
}

fn connect_data(child: engine::Child) -> ChildConnectData {
    ChildConnectData {
        full_name: child.display_name(),
        id: child.id,
        global_id: child.global_id,
        local_id: child.local_id,
        name: child.name,
        preferred_name: child.firstname,
        last_name: child.lastname,
        gender: child.gender,
        birth_date: child.birthdate,
        age: child.age,
        image_url: child.image_url,
        sponsorship_status: child.sponsorship_status,
        project_id: child.project_id,
    }
}

fn image(picture: engine::ChildPicture) -> ChildImage {
    ChildImage {
        id: picture.id,
        child_id: picture.child_id,
        image_url: picture.image_url,
        date: picture.date,
    }
}

fn location(project: engine::Project) -> Location {
    Location {
        fcp_id: project.fcp_id,
        name: project.name,
        city: project.city,
        country: project.country,
        latitude: project.latitude,
        longitude: project.longitude,
    }
}

/// Tile data: the children under `Child` (or `Children` with `multi`),
/// their pictures, the location of the first child and the time there
pub async fn children(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ChildIds>,
) -> Result<Json<ChildApp>, ServerError> {
    let ids = parse_ids(&query.ids)?;
    let Some(data) = state.engine.child_app_data(&ids, &user.actor()).await? else {
        return Ok(Json(ChildApp::default()));
    };

    let children = OneOrMany::from_vec(data.children.into_iter().map(connect_data).collect());
    let (child, children) = if query.multi {
        (None, Some(children))
    } else {
        (Some(children), None)
    };

    Ok(Json(ChildApp {
        child,
        children,
        images: Some(data.pictures.into_iter().map(image).collect()),
        location: Some(data.project.map(location)),
        time: Some(ChildTime {
            child_time: data.child_time,
        }),
    }))
}

/// The children data alone, as used by letter tiles
pub async fn children_no_wrap(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ChildIds>,
) -> Result<Json<Option<OneOrMany<ChildConnectData>>>, ServerError> {
    let ids = parse_ids(&query.ids)?;
    if ids.is_empty() {
        return Ok(Json(None));
    }
    let children = state
        .engine
        .children_connect_data(&ids, &user.actor())
        .await?;

    Ok(Json(Some(OneOrMany::from_vec(
        children.into_iter().map(connect_data).collect(),
    ))))
}

/// Children sponsored by the partner given as `userid`
pub async fn sponsor_children(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<ChildConnectData>>, ServerError> {
    let children = state
        .engine
        .mobile_sponsor_children(&params, &user.actor())
        .await?;

    Ok(Json(children.into_iter().map(connect_data).collect()))
}

pub async fn child_bio(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ChildBioResponse>, ServerError> {
    let child = state
        .engine
        .mobile_child_bio(&params, &user.actor())
        .await?;

    Ok(Json(ChildBioResponse {
        result: ChildBio {
            name: child.name,
            first_name: child.firstname,
            last_name: child.lastname,
            gender: child.gender,
            birthdate: child.birthdate,
            age: child.age,
            weight: child.weight,
            height: child.height,
            education_level: child.education_level,
            academic_performance: child.academic_performance,
            vocational_training_type: child.vocational_training_type,
            sponsorship_status: child.sponsorship_status,
        },
    }))
}
