use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::{net::SocketAddr, sync::Arc};

use crate::{completion, mobile, partners, sds, sms, sponsorships, user, workflow};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
    /// Page of the front-end form application the SMS link redirects to.
    pub sms_form_url: Arc<str>,
}

impl ServerState {
    pub fn new(engine: Engine, db: DatabaseConnection, sms_form_url: &str) -> Self {
        Self {
            engine: Arc::new(engine),
            db,
            sms_form_url: Arc::from(sms_form_url),
        }
    }
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Routes reached by anonymous visitors following an SMS link.
fn public_router() -> Router<ServerState> {
    Router::new()
        .route("/sms_sponsorship/step1/{id}", get(sms::step1_redirect))
        .route(
            "/sms_sponsorship/step1/{id}/get_child_data",
            post(sms::get_child_data),
        )
        .route("/sms_sponsorship/step1/{id}/confirm", post(sms::confirm))
        .route(
            "/sms_sponsorship/step1/{id}/change_child",
            post(sms::change_child),
        )
        .route(
            "/sms_sponsorship/step2/{sponsorship_id}",
            get(sms::step2_form),
        )
}

pub fn router(state: ServerState) -> Router {
    let private = Router::new()
        .route("/partners", post(partners::partner_new))
        .route("/partners/{id}", get(partners::get))
        .route("/partners/{id}/sub_parent", get(sponsorships::suggest_parent))
        .route("/sponsorships", post(sponsorships::sponsorship_new))
        .route(
            "/sponsorships/{id}",
            get(sponsorships::get).patch(sponsorships::update),
        )
        .route(
            "/sponsorships/{id}/correspondent",
            post(sponsorships::change_correspondent),
        )
        .route("/contracts/waiting", post(workflow::waiting))
        .route("/contracts/active", post(workflow::active))
        .route("/contracts/cancelled", post(workflow::cancelled))
        .route("/contracts/terminated", post(workflow::terminated))
        .route("/contracts/check_sub", post(workflow::check_sub))
        .route("/contracts/no_sub", post(workflow::no_sub))
        .route("/contracts/sub", post(workflow::sub))
        .route("/sds/states", get(sds::states))
        .route("/sds/groups", get(sds::groups))
        .route("/sds/followed", get(sds::followed))
        .route("/sds/followers", axum::routing::put(sds::set_follower))
        .route("/journals", post(completion::journal_new))
        .route("/journals/{id}/rules", get(completion::rules))
        .route("/journals/{id}/complete", post(completion::complete))
        .route("/completion_rules", post(completion::rule_new))
        .route("/mobile/children", get(mobile::children))
        .route("/mobile/children/connect", get(mobile::children_no_wrap))
        .route("/mobile/sponsor_children", get(mobile::sponsor_children))
        .route("/mobile/child_bio", get(mobile::child_bio))
        .route("/sms_requests", post(sms::request_new))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    private.merge(public_router()).with_state(state)
}

pub async fn run(state: ServerState, addr: SocketAddr) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(state, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
